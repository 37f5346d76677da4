//! Main entry point for the bakery order service.
//!
//! Serves the HTTP API by default. The remaining subcommands seed the catalog and
//! administer users against the configured storage; with the file backend they must
//! run while the server is stopped.

use bakery_config::Config;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

mod apis;
mod factory_registry;
mod seed;
mod server;

/// Command-line arguments for the bakery service.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
	/// Path to configuration file
	#[arg(short, long, default_value = "config/bakery.toml")]
	config: PathBuf,

	/// Log level (trace, debug, info, warn, error)
	#[arg(short, long, default_value = "info")]
	log_level: String,

	#[command(subcommand)]
	command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Command {
	/// Run the HTTP API (default)
	Serve,
	/// Load cakes, customization options and users from a TOML file
	Seed {
		#[arg(short, long, default_value = "config/seed.toml")]
		file: PathBuf,
	},
	/// Grant administrator rights to a registered user
	MakeAdmin {
		#[arg(short, long)]
		email: String,
	},
	/// Print a bearer token for a registered user
	IssueToken {
		#[arg(short, long)]
		email: String,
	},
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	use tracing_subscriber::{fmt, EnvFilter};

	let env_filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

	fmt()
		.with_env_filter(env_filter)
		.with_thread_ids(true)
		.with_target(true)
		.init();

	let config_path = args
		.config
		.to_str()
		.ok_or("Configuration path is not valid UTF-8")?;
	let config = Config::from_file(config_path).await?;
	tracing::info!("Loaded configuration [{}]", config.service.id);

	let engine = factory_registry::build_engine_from_config(config.clone())?;

	match args.command.unwrap_or(Command::Serve) {
		Command::Serve => {
			let Some(api_config) = config.api.filter(|api| api.enabled) else {
				tracing::warn!("API server is disabled in configuration, nothing to serve");
				return Ok(());
			};
			tracing::info!("Started bakery service");
			server::start_server(api_config, Arc::new(engine)).await?;
			tracing::info!("Stopped bakery service");
		},
		Command::Seed { file } => {
			let seed_file = seed::SeedFile::load(&file).await?;
			seed::apply(&engine, seed_file).await?;
		},
		Command::MakeAdmin { email } => {
			let user = engine.directory().set_admin(&email, true).await?;
			tracing::info!(user_id = %user.id, email = %user.email, "Granted admin rights");
		},
		Command::IssueToken { email } => {
			let token = engine.directory().issue_token(&email).await?;
			println!("{}", token);
		},
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_args_default_values() {
		let args = Args::parse_from(["bakery"]);
		assert_eq!(args.config, PathBuf::from("config/bakery.toml"));
		assert_eq!(args.log_level, "info");
		assert_eq!(args.command, None);
	}

	#[test]
	fn test_subcommands() {
		let args = Args::parse_from(["bakery", "-c", "custom.toml", "seed"]);
		assert_eq!(args.config, PathBuf::from("custom.toml"));
		assert_eq!(
			args.command,
			Some(Command::Seed {
				file: PathBuf::from("config/seed.toml")
			})
		);

		let args = Args::parse_from(["bakery", "make-admin", "--email", "olive@example.com"]);
		assert_eq!(
			args.command,
			Some(Command::MakeAdmin {
				email: "olive@example.com".into()
			})
		);

		let args = Args::parse_from(["bakery", "issue-token", "-e", "cara@example.com"]);
		assert!(matches!(args.command, Some(Command::IssueToken { .. })));
	}

	#[tokio::test]
	async fn test_loads_sample_config() {
		let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../../config/bakery.toml");
		let config = Config::from_file(path).await.unwrap();
		assert_eq!(config.storage.primary, "file");
		assert!(config.api.is_some_and(|api| api.enabled));
	}

	#[tokio::test]
	async fn test_sample_seed_parses() {
		let path = PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/../../config/seed.toml"));
		let seed = seed::SeedFile::load(&path).await.unwrap();
		assert_eq!(seed.cakes.len(), 8);
		assert!(seed.users.iter().any(|u| u.is_admin));
	}
}
