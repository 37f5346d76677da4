//! Configuration for the bakery order service.
//!
//! Configuration is TOML. Values may reference environment variables as `${VAR}` or
//! `${VAR:-default}`, which are substituted before parsing.
//!
//! A file may pull in others with `include = ["storage.toml", "api.toml"]`. A
//! top-level section can be defined by only one of the files.

pub mod builders;
mod loader;

pub use builders::config::ConfigBuilder;

use bakery_types::SecretString;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error that occurs during file I/O operations.
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
	/// Error that occurs when parsing TOML configuration.
	#[error("Configuration error: {0}")]
	Parse(String),
	/// Error that occurs when configuration validation fails.
	#[error("Validation error: {0}")]
	Validation(String),
}

impl From<toml::de::Error> for ConfigError {
	fn from(err: toml::de::Error) -> Self {
		// Keep the message, drop the echoed input
		ConfigError::Parse(err.message().to_string())
	}
}

/// Top-level service configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
	pub service: ServiceConfig,
	pub storage: StorageConfig,
	pub identity: IdentityConfig,
	#[serde(default)]
	pub orders: OrdersConfig,
	/// HTTP API server. The API is not started when absent.
	pub api: Option<ApiConfig>,
}

/// Identity of this service instance.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServiceConfig {
	/// Instance name, used in logs.
	pub id: String,
}

/// Storage backend selection.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
	/// Backend the engine is built on.
	pub primary: String,
	/// Backend configurations keyed by implementation name.
	pub implementations: HashMap<String, toml::Value>,
}

/// Bearer credential settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IdentityConfig {
	/// Key used to sign and verify bearer tokens.
	pub token_secret: SecretString,
	/// Lifetime of issued tokens.
	#[serde(default = "default_token_ttl_seconds")]
	pub token_ttl_seconds: u64,
}

/// Listing and aggregation settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OrdersConfig {
	/// Page size used when a listing request does not give one.
	#[serde(default = "default_page_size")]
	pub default_page_size: u32,
	/// Larger page sizes are clamped to this value.
	#[serde(default = "default_max_page_size")]
	pub max_page_size: u32,
	/// Trailing window for the dashboard's recent order count.
	#[serde(default = "default_recent_window_days")]
	pub recent_window_days: u32,
}

impl Default for OrdersConfig {
	fn default() -> Self {
		Self {
			default_page_size: default_page_size(),
			max_page_size: default_max_page_size(),
			recent_window_days: default_recent_window_days(),
		}
	}
}

/// HTTP API settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
	/// Serve the API when `bakery serve` runs.
	#[serde(default)]
	pub enabled: bool,
	/// Bind address.
	#[serde(default = "default_api_host")]
	pub host: String,
	/// Bind port.
	#[serde(default = "default_api_port")]
	pub port: u16,
	/// Requests running longer than this are aborted.
	#[serde(default = "default_api_timeout")]
	pub timeout_seconds: u64,
	/// Request bodies above this many bytes are rejected with 413.
	#[serde(default = "default_max_request_size")]
	pub max_request_size: usize,
	/// CORS configuration. Any origin is allowed when absent.
	pub cors: Option<CorsConfig>,
}

/// CORS configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CorsConfig {
	/// Origins allowed to call the API from a browser.
	pub allowed_origins: Vec<String>,
	/// Request headers allowed cross-origin. Any header when empty.
	#[serde(default)]
	pub allowed_headers: Vec<String>,
	/// Methods allowed cross-origin. The four API methods when empty.
	#[serde(default)]
	pub allowed_methods: Vec<String>,
}

/// Returns the default token lifetime of one day.
fn default_token_ttl_seconds() -> u64 {
	86_400
}

fn default_page_size() -> u32 {
	20
}

fn default_max_page_size() -> u32 {
	100
}

fn default_recent_window_days() -> u32 {
	7
}

fn default_api_host() -> String {
	"127.0.0.1".to_string()
}

fn default_api_port() -> u16 {
	5000
}

fn default_api_timeout() -> u64 {
	30
}

/// Returns the default maximum request size of 1MB.
fn default_max_request_size() -> usize {
	1024 * 1024
}

/// Shortest accepted token secret, in bytes.
const MIN_TOKEN_SECRET_LEN: usize = 16;

/// Substitutes `${VAR}` and `${VAR:-fallback}` placeholders from the environment.
///
/// A placeholder without a fallback must name a set variable. Inputs above 1MB are
/// rejected.
pub(crate) fn resolve_env_vars(input: &str) -> Result<String, ConfigError> {
	const MAX_INPUT_SIZE: usize = 1024 * 1024;
	if input.len() > MAX_INPUT_SIZE {
		return Err(ConfigError::Validation(format!(
			"Configuration file too large: {} bytes (max: {} bytes)",
			input.len(),
			MAX_INPUT_SIZE
		)));
	}

	let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]{0,127})(?::-([^}]{0,256}))?\}")
		.map_err(|e| ConfigError::Parse(format!("Regex error: {}", e)))?;

	let mut result = String::with_capacity(input.len());
	let mut last_end = 0;

	for cap in re.captures_iter(input) {
		let (Some(full_match), Some(var_name)) = (cap.get(0), cap.get(1)) else {
			continue;
		};
		let value = match std::env::var(var_name.as_str()) {
			Ok(v) => v,
			Err(_) => match cap.get(2) {
				Some(default) => default.as_str().to_string(),
				None => {
					return Err(ConfigError::Validation(format!(
						"Environment variable '{}' not found",
						var_name.as_str()
					)))
				},
			},
		};

		result.push_str(&input[last_end..full_match.start()]);
		result.push_str(&value);
		last_end = full_match.end();
	}
	result.push_str(&input[last_end..]);

	Ok(result)
}

impl Config {
	/// Loads configuration from a file, following `include` directives.
	///
	/// Each top-level section must be unique across all configuration files.
	pub async fn from_file(path: &str) -> Result<Self, ConfigError> {
		let path_buf = Path::new(path);
		let base_dir = path_buf.parent().unwrap_or_else(|| Path::new("."));

		let mut loader = loader::ConfigLoader::new(base_dir);
		let file_name = path_buf
			.file_name()
			.ok_or_else(|| ConfigError::Validation(format!("Invalid path: {}", path)))?;
		loader.load_config(file_name).await
	}

	/// Checks cross-field constraints that serde defaults cannot express.
	fn validate(&self) -> Result<(), ConfigError> {
		if self.service.id.trim().is_empty() {
			return Err(ConfigError::Validation("Service ID cannot be empty".into()));
		}

		if self.storage.implementations.is_empty() {
			return Err(ConfigError::Validation(
				"At least one storage implementation must be configured".into(),
			));
		}
		if self.storage.primary.is_empty() {
			return Err(ConfigError::Validation(
				"Storage primary implementation cannot be empty".into(),
			));
		}
		if !self
			.storage
			.implementations
			.contains_key(&self.storage.primary)
		{
			return Err(ConfigError::Validation(format!(
				"Primary storage '{}' not found in implementations",
				self.storage.primary
			)));
		}

		if self.identity.token_secret.len() < MIN_TOKEN_SECRET_LEN {
			return Err(ConfigError::Validation(format!(
				"identity.token_secret must be at least {} bytes",
				MIN_TOKEN_SECRET_LEN
			)));
		}
		if self.identity.token_ttl_seconds == 0 {
			return Err(ConfigError::Validation(
				"identity.token_ttl_seconds must be greater than 0".into(),
			));
		}

		let orders = &self.orders;
		if orders.default_page_size == 0 {
			return Err(ConfigError::Validation(
				"orders.default_page_size must be greater than 0".into(),
			));
		}
		if orders.max_page_size < orders.default_page_size {
			return Err(ConfigError::Validation(format!(
				"orders.max_page_size ({}) cannot be smaller than orders.default_page_size ({})",
				orders.max_page_size, orders.default_page_size
			)));
		}
		if orders.recent_window_days == 0 {
			return Err(ConfigError::Validation(
				"orders.recent_window_days must be greater than 0".into(),
			));
		}

		if let Some(api) = &self.api {
			if api.enabled && api.port == 0 {
				return Err(ConfigError::Validation("api.port cannot be 0".into()));
			}
			if api.max_request_size == 0 {
				return Err(ConfigError::Validation(
					"api.max_request_size must be greater than 0".into(),
				));
			}
		}

		Ok(())
	}
}

/// Parses TOML, resolving environment variables first and validating afterwards.
impl FromStr for Config {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let resolved = resolve_env_vars(s)?;
		let config: Config = toml::from_str(&resolved)?;
		config.validate()?;
		Ok(config)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const MINIMAL: &str = r#"
[service]
id = "bakery-test"

[storage]
primary = "memory"
[storage.implementations.memory]

[identity]
token_secret = "0123456789abcdef0123456789abcdef"
"#;

	#[test]
	fn test_env_var_resolution() {
		std::env::set_var("BAKERY_TEST_HOST", "localhost");
		std::env::set_var("BAKERY_TEST_PORT", "5432");

		let input = "host = \"${BAKERY_TEST_HOST}:${BAKERY_TEST_PORT}\"";
		let result = resolve_env_vars(input).unwrap();
		assert_eq!(result, "host = \"localhost:5432\"");

		std::env::remove_var("BAKERY_TEST_HOST");
		std::env::remove_var("BAKERY_TEST_PORT");
	}

	#[test]
	fn test_env_var_with_default() {
		let input = "value = \"${BAKERY_MISSING_VAR:-default_value}\"";
		let result = resolve_env_vars(input).unwrap();
		assert_eq!(result, "value = \"default_value\"");
	}

	#[test]
	fn test_missing_env_var_error() {
		let input = "value = \"${BAKERY_MISSING_VAR}\"";
		let result = resolve_env_vars(input);
		assert!(result.is_err());
		assert!(result.unwrap_err().to_string().contains("BAKERY_MISSING_VAR"));
	}

	#[test]
	fn test_minimal_config_defaults() {
		let config: Config = MINIMAL.parse().unwrap();
		assert_eq!(config.service.id, "bakery-test");
		assert_eq!(config.identity.token_ttl_seconds, 86_400);
		assert_eq!(config.orders.default_page_size, 20);
		assert_eq!(config.orders.max_page_size, 100);
		assert_eq!(config.orders.recent_window_days, 7);
		assert!(config.api.is_none());
	}

	#[test]
	fn test_secret_from_env() {
		std::env::set_var("BAKERY_TEST_SECRET", "a-very-long-signing-secret");
		let config_str = MINIMAL.replace(
			"0123456789abcdef0123456789abcdef",
			"${BAKERY_TEST_SECRET}",
		);
		let config: Config = config_str.parse().unwrap();
		assert_eq!(
			config.identity.token_secret.expose_secret(),
			"a-very-long-signing-secret"
		);
		assert!(!format!("{:?}", config).contains("a-very-long-signing-secret"));
		std::env::remove_var("BAKERY_TEST_SECRET");
	}

	#[test]
	fn test_unknown_primary_rejected() {
		let config_str = MINIMAL.replace("primary = \"memory\"", "primary = \"file\"");
		let err = config_str.parse::<Config>().unwrap_err();
		assert!(err.to_string().contains("Primary storage 'file'"));
	}

	#[test]
	fn test_short_secret_rejected() {
		let config_str = MINIMAL.replace("0123456789abcdef0123456789abcdef", "short");
		let err = config_str.parse::<Config>().unwrap_err();
		assert!(err.to_string().contains("token_secret"));
	}

	#[test]
	fn test_page_size_bounds() {
		let config_str = format!(
			"{}\n[orders]\ndefault_page_size = 50\nmax_page_size = 10\n",
			MINIMAL
		);
		let err = config_str.parse::<Config>().unwrap_err();
		assert!(err.to_string().contains("max_page_size"));
	}

	#[test]
	fn test_api_section() {
		let config_str = format!(
			"{}\n[api]\nenabled = true\nport = 8080\n[api.cors]\nallowed_origins = [\"http://localhost:3000\"]\n",
			MINIMAL
		);
		let config: Config = config_str.parse().unwrap();
		let api = config.api.unwrap();
		assert!(api.enabled);
		assert_eq!(api.port, 8080);
		assert_eq!(api.host, "127.0.0.1");
		assert_eq!(api.cors.unwrap().allowed_origins.len(), 1);
	}
}
