//! Catalog and user seeding from a TOML file.
//!
//! Cakes and options with an explicit id are replaced in place, so a seed file can be
//! applied repeatedly. Users whose email is already registered are left untouched.

use bakery_account::{AccountError, NewUser};
use bakery_catalog::{CakeDraft, CatalogError, CatalogStore, CustomizationCatalog, OptionDraft};
use bakery_core::BakeryEngine;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SeedError {
	#[error("Failed to read seed file: {0}")]
	Io(#[from] std::io::Error),
	#[error("Failed to parse seed file: {0}")]
	Parse(#[from] toml::de::Error),
	#[error("Catalog error: {0}")]
	Catalog(#[from] CatalogError),
	#[error("Account error: {0}")]
	Account(#[from] AccountError),
}

/// Contents of a seed file.
#[derive(Debug, Default, Deserialize)]
pub struct SeedFile {
	#[serde(default)]
	pub cakes: Vec<CakeDraft>,
	#[serde(default)]
	pub customizations: Vec<OptionDraft>,
	#[serde(default)]
	pub users: Vec<NewUser>,
}

/// What a seeding run changed.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SeedReport {
	pub cakes: usize,
	pub customizations: usize,
	pub users_created: usize,
	pub users_skipped: usize,
}

impl SeedFile {
	pub async fn load(path: &Path) -> Result<Self, SeedError> {
		let contents = tokio::fs::read_to_string(path).await?;
		Ok(toml::from_str(&contents)?)
	}
}

pub async fn apply(engine: &BakeryEngine, seed: SeedFile) -> Result<SeedReport, SeedError> {
	let mut report = SeedReport::default();

	for draft in seed.cakes {
		let cake = engine.catalog().upsert_cake(draft).await?;
		tracing::debug!(cake_id = %cake.id, name = %cake.name, "Seeded cake");
		report.cakes += 1;
	}

	for draft in seed.customizations {
		let option = engine.catalog().upsert_option(draft).await?;
		tracing::debug!(option_id = %option.id, name = %option.name, "Seeded customization");
		report.customizations += 1;
	}

	for user in seed.users {
		match engine.directory().register_user(user).await {
			Ok(user) => {
				tracing::debug!(user_id = %user.id, email = %user.email, "Seeded user");
				report.users_created += 1;
			},
			Err(AccountError::DuplicateEmail(email)) => {
				tracing::info!(email = %email, "User already exists, skipping");
				report.users_skipped += 1;
			},
			Err(e) => return Err(e.into()),
		}
	}

	tracing::info!(
		cakes = report.cakes,
		customizations = report.customizations,
		users_created = report.users_created,
		users_skipped = report.users_skipped,
		"Seeding complete"
	);
	Ok(report)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::factory_registry::build_engine_from_config;
	use bakery_config::ConfigBuilder;
	use rust_decimal::dec;
	use std::io::Write;
	use tempfile::NamedTempFile;

	const SEED: &str = r#"
[[cakes]]
id = 1
name = "Chocolate Dream"
description = "Rich chocolate layers"
price = 45.00

[[cakes]]
id = 2
name = "Lemon Delight"
unit_price = 42.00

[[customizations]]
id = 1
category = "topping"
name = "Sprinkles"
price = 5.00

[[customizations]]
category = "extra"
name = "Candles"
price = 0.50
per_unit = true

[[users]]
name = "Emma Wilson"
email = "emma@example.com"

[[users]]
name = "Baker Admin"
email = "admin@example.com"
is_admin = true
"#;

	fn seed_file() -> NamedTempFile {
		let mut file = NamedTempFile::new().unwrap();
		file.write_all(SEED.as_bytes()).unwrap();
		file
	}

	#[tokio::test]
	async fn test_apply_seed_file() {
		let engine = build_engine_from_config(ConfigBuilder::new().build()).unwrap();
		let file = seed_file();

		let seed = SeedFile::load(file.path()).await.unwrap();
		let report = apply(&engine, seed).await.unwrap();
		assert_eq!(
			report,
			SeedReport {
				cakes: 2,
				customizations: 2,
				users_created: 2,
				users_skipped: 0,
			}
		);

		let cakes = engine.catalog().list_cakes().await.unwrap();
		assert_eq!(cakes.len(), 2);
		assert_eq!(cakes[1].unit_price, dec!(42.00));

		let options = engine.catalog().list_active().await.unwrap();
		assert!(options.iter().any(|o| o.name == "Candles" && o.per_unit));

		let admin = engine
			.directory()
			.find_by_email("admin@example.com")
			.await
			.unwrap()
			.unwrap();
		assert!(admin.is_admin);
	}

	#[tokio::test]
	async fn test_reapply_skips_existing_users() {
		let engine = build_engine_from_config(ConfigBuilder::new().build()).unwrap();
		let file = seed_file();

		apply(&engine, SeedFile::load(file.path()).await.unwrap())
			.await
			.unwrap();
		let report = apply(&engine, SeedFile::load(file.path()).await.unwrap())
			.await
			.unwrap();
		assert_eq!(report.users_created, 0);
		assert_eq!(report.users_skipped, 2);
		// Explicit ids replace in place
		assert_eq!(engine.catalog().list_cakes().await.unwrap().len(), 2);
	}

	#[tokio::test]
	async fn test_malformed_seed_file() {
		let mut file = NamedTempFile::new().unwrap();
		file.write_all(b"[[cakes]]\nname = 3\n").unwrap();
		assert!(matches!(
			SeedFile::load(file.path()).await,
			Err(SeedError::Parse(_))
		));
	}
}
