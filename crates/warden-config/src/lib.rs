// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Layered configuration for the directory hygiene audit.
//!
//! Sources, lowest precedence first:
//! 1. Built-in defaults
//! 2. Config file (`/etc/warden/warden.toml`, or the path given on the command line)
//! 3. Environment variables (`WARDEN_*`)
//!
//! ```ignore
//! use warden_config::load_config;
//!
//! let config = load_config()?;
//! println!("auditing {}", config.policy.org_email_domain);
//! ```

pub mod env;
pub mod error;
pub mod layer;
pub mod sections;
pub mod sources;

pub use env::{load_secret_env, SecretEnvError};
pub use error::ConfigError;
pub use layer::WardenConfigLayer;
pub use sections::*;
pub use sources::{
	ConfigSource, DefaultsSource, EnvSource, Precedence, TomlSource, SYSTEM_CONFIG_PATH,
};

use tracing::{debug, info};

/// Fully resolved configuration.
#[derive(Debug, Clone, Default)]
pub struct WardenConfig {
	pub database: DatabaseConfig,
	pub identity: IdentityConfig,
	pub smtp: Option<SmtpConfig>,
	pub report: ReportConfig,
	pub schedule: ScheduleConfig,
	pub policy: PolicyConfig,
	pub logging: LoggingConfig,
}

/// Load configuration from the system config file and the environment.
pub fn load_config() -> Result<WardenConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::system()),
		Box::new(EnvSource),
	])
}

/// Load configuration with a custom config file path.
pub fn load_config_with_file(
	config_path: impl Into<std::path::PathBuf>,
) -> Result<WardenConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::new(config_path)),
		Box::new(EnvSource),
	])
}

fn load_from_sources(mut sources: Vec<Box<dyn ConfigSource>>) -> Result<WardenConfig, ConfigError> {
	sources.sort_by_key(|s| s.precedence());

	let mut merged = WardenConfigLayer::default();
	for source in sources {
		debug!(source = source.name(), "loading configuration source");
		merged.merge(source.load()?);
	}

	finalize(merged)
}

/// Resolve a merged layer into a validated configuration.
pub fn finalize(layer: WardenConfigLayer) -> Result<WardenConfig, ConfigError> {
	let database = layer.database.unwrap_or_default().finalize();
	let identity = layer.identity.unwrap_or_default().finalize();
	let smtp = layer.smtp.and_then(|l| l.finalize());
	let report = layer.report.unwrap_or_default().finalize();
	let schedule = layer.schedule.unwrap_or_default().finalize();
	let policy = layer.policy.unwrap_or_default().finalize();
	let logging = layer.logging.unwrap_or_default().finalize();

	let config = WardenConfig {
		database,
		identity,
		smtp,
		report,
		schedule,
		policy,
		logging,
	};
	validate_config(&config)?;

	info!(
		database = %config.database.url,
		identity_base_url = %config.identity.base_url,
		identity_token_configured = config.identity.api_token.is_some(),
		smtp_configured = config.smtp.is_some(),
		report_recipient_configured = config.report.recipient.is_some(),
		job_id = %config.schedule.job_id,
		org_email_domain = %config.policy.org_email_domain,
		client_reassignment_enabled = config.policy.client_reassignment_enabled,
		"configuration loaded"
	);

	Ok(config)
}

/// Validate cross-field configuration rules.
fn validate_config(config: &WardenConfig) -> Result<(), ConfigError> {
	if config.identity.base_url.is_empty() {
		return Err(ConfigError::Validation(
			"WARDEN_IDENTITY_BASE_URL (or [identity].base_url) must be set".to_string(),
		));
	}

	if config.policy.client_reassignment_enabled && config.policy.target_client_id.is_none() {
		return Err(ConfigError::Validation(
			"policy.client_reassignment_enabled requires policy.target_client_id".to_string(),
		));
	}

	if config.policy.item_list_page_length <= 0 {
		return Err(ConfigError::Validation(format!(
			"policy.item_list_page_length must be positive, got {}",
			config.policy.item_list_page_length
		)));
	}

	if config.schedule.default_interval_hours < 0 {
		return Err(ConfigError::Validation(format!(
			"schedule.default_interval_hours must not be negative, got {}",
			config.schedule.default_interval_hours
		)));
	}

	Ok(())
}
