// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sources: defaults, TOML file, and environment variables.

use std::path::PathBuf;

use tracing::{debug, trace};

use crate::env::load_secret_env;
use crate::error::ConfigError;
use crate::layer::WardenConfigLayer;
use crate::sections::{
	DatabaseConfigLayer, IdentityConfigLayer, LoggingConfigLayer, PolicyConfigLayer,
	ReportConfigLayer, ScheduleConfigLayer, SmtpConfigLayer,
};

pub const SYSTEM_CONFIG_PATH: &str = "/etc/warden/warden.toml";

/// Source precedence levels (higher = overrides lower).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
	Defaults = 10,
	ConfigFile = 20,
	Environment = 50,
}

pub trait ConfigSource: Send + Sync {
	fn name(&self) -> &'static str;
	fn precedence(&self) -> Precedence;
	fn load(&self) -> Result<WardenConfigLayer, ConfigError>;
}

pub struct DefaultsSource;

impl ConfigSource for DefaultsSource {
	fn name(&self) -> &'static str {
		"defaults"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Defaults
	}

	fn load(&self) -> Result<WardenConfigLayer, ConfigError> {
		Ok(WardenConfigLayer::default())
	}
}

pub struct TomlSource {
	path: PathBuf,
}

impl TomlSource {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	pub fn system() -> Self {
		Self::new(SYSTEM_CONFIG_PATH)
	}
}

impl ConfigSource for TomlSource {
	fn name(&self) -> &'static str {
		"toml-config"
	}

	fn precedence(&self) -> Precedence {
		Precedence::ConfigFile
	}

	fn load(&self) -> Result<WardenConfigLayer, ConfigError> {
		if !self.path.exists() {
			debug!(path = %self.path.display(), "config file not found, skipping");
			return Ok(WardenConfigLayer::default());
		}

		debug!(path = %self.path.display(), "loading config file");
		let content = std::fs::read_to_string(&self.path).map_err(|e| ConfigError::FileRead {
			path: self.path.clone(),
			source: e,
		})?;

		let layer: WardenConfigLayer =
			toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
				path: self.path.clone(),
				source: e,
			})?;

		trace!("parsed config layer from TOML");
		Ok(layer)
	}
}

/// Environment variable source.
///
/// Convention: WARDEN_<SECTION>_<FIELD>
pub struct EnvSource;

impl ConfigSource for EnvSource {
	fn name(&self) -> &'static str {
		"environment"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Environment
	}

	fn load(&self) -> Result<WardenConfigLayer, ConfigError> {
		debug!("loading environment variables");
		Ok(WardenConfigLayer {
			database: Some(DatabaseConfigLayer {
				url: env_var("WARDEN_DATABASE_URL"),
			}),
			identity: Some(load_identity_from_env()?),
			smtp: Some(load_smtp_from_env()?),
			report: Some(ReportConfigLayer {
				recipient: env_var("WARDEN_REPORT_RECIPIENT"),
				environment_label: env_var("WARDEN_REPORT_ENVIRONMENT"),
			}),
			schedule: Some(ScheduleConfigLayer {
				job_id: env_var("WARDEN_SCHEDULE_JOB_ID"),
				default_interval_hours: env_i64("WARDEN_SCHEDULE_DEFAULT_INTERVAL_HOURS")?,
			}),
			policy: Some(load_policy_from_env()?),
			logging: Some(LoggingConfigLayer {
				level: env_var("WARDEN_LOG_LEVEL"),
				persist: env_bool("WARDEN_LOG_PERSIST"),
				buffer_capacity: env_usize("WARDEN_LOG_BUFFER_CAPACITY")?,
			}),
		})
	}
}

fn env_var(name: &str) -> Option<String> {
	std::env::var(name).ok().filter(|s| !s.is_empty())
}

fn env_bool(name: &str) -> Option<bool> {
	env_var(name).map(|v| v.eq_ignore_ascii_case("true") || v == "1")
}

fn env_list(name: &str) -> Option<Vec<String>> {
	env_var(name).map(|v| {
		v.split(',')
			.map(str::trim)
			.filter(|s| !s.is_empty())
			.map(str::to_string)
			.collect()
	})
}

fn env_parse<T: std::str::FromStr>(name: &str, kind: &str) -> Result<Option<T>, ConfigError> {
	match env_var(name) {
		Some(v) => v.parse().map(Some).map_err(|_| ConfigError::InvalidValue {
			key: name.to_string(),
			message: format!("invalid {kind} value '{v}'"),
		}),
		None => Ok(None),
	}
}

fn env_u16(name: &str) -> Result<Option<u16>, ConfigError> {
	env_parse(name, "u16")
}

fn env_u64(name: &str) -> Result<Option<u64>, ConfigError> {
	env_parse(name, "u64")
}

fn env_i64(name: &str) -> Result<Option<i64>, ConfigError> {
	env_parse(name, "i64")
}

fn env_usize(name: &str) -> Result<Option<usize>, ConfigError> {
	env_parse(name, "usize")
}

fn env_i64_list(name: &str) -> Result<Option<Vec<i64>>, ConfigError> {
	match env_list(name) {
		Some(items) => items
			.iter()
			.map(|v| {
				v.parse().map_err(|_| ConfigError::InvalidValue {
					key: name.to_string(),
					message: format!("invalid i64 list element '{v}'"),
				})
			})
			.collect::<Result<Vec<i64>, _>>()
			.map(Some),
		None => Ok(None),
	}
}

fn load_identity_from_env() -> Result<IdentityConfigLayer, ConfigError> {
	Ok(IdentityConfigLayer {
		base_url: env_var("WARDEN_IDENTITY_BASE_URL"),
		timeout_secs: env_u64("WARDEN_IDENTITY_TIMEOUT_SECS")?,
		api_token: load_secret_env("WARDEN_IDENTITY_API_TOKEN")
			.map_err(|e| ConfigError::Secret(e.to_string()))?,
	})
}

fn load_smtp_from_env() -> Result<SmtpConfigLayer, ConfigError> {
	Ok(SmtpConfigLayer {
		host: env_var("WARDEN_SMTP_HOST"),
		port: env_u16("WARDEN_SMTP_PORT")?,
		username: env_var("WARDEN_SMTP_USERNAME"),
		password: load_secret_env("WARDEN_SMTP_PASSWORD")
			.map_err(|e| ConfigError::Secret(e.to_string()))?,
		from_address: env_var("WARDEN_SMTP_FROM_ADDRESS"),
		from_name: env_var("WARDEN_SMTP_FROM_NAME"),
		use_tls: env_bool("WARDEN_SMTP_USE_TLS"),
	})
}

fn load_policy_from_env() -> Result<PolicyConfigLayer, ConfigError> {
	Ok(PolicyConfigLayer {
		org_email_domain: env_var("WARDEN_POLICY_ORG_EMAIL_DOMAIN"),
		excluded_email_domains: env_list("WARDEN_POLICY_EXCLUDED_EMAIL_DOMAINS"),
		excluded_org_addresses: env_list("WARDEN_POLICY_EXCLUDED_ORG_ADDRESSES"),
		preview_email_domain: env_var("WARDEN_POLICY_PREVIEW_EMAIL_DOMAIN"),
		preview_last_name: env_var("WARDEN_POLICY_PREVIEW_LAST_NAME"),
		default_group_name: env_var("WARDEN_POLICY_DEFAULT_GROUP_NAME"),
		admin_groups: env_list("WARDEN_POLICY_ADMIN_GROUPS"),
		item_list_page_length: env_i64("WARDEN_POLICY_ITEM_LIST_PAGE_LENGTH")?,
		client_reassignment_enabled: env_bool("WARDEN_POLICY_CLIENT_REASSIGNMENT_ENABLED"),
		misassigned_client_ids: env_i64_list("WARDEN_POLICY_MISASSIGNED_CLIENT_IDS")?,
		target_client_id: env_i64("WARDEN_POLICY_TARGET_CLIENT_ID")?,
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Write;

	#[test]
	fn test_precedence_ordering() {
		assert!(Precedence::Environment > Precedence::ConfigFile);
		assert!(Precedence::ConfigFile > Precedence::Defaults);
	}

	#[test]
	fn test_defaults_source_returns_empty_layer() {
		let layer = DefaultsSource.load().unwrap();
		assert!(layer.database.is_none());
		assert!(layer.policy.is_none());
	}

	#[test]
	fn test_toml_source_missing_file_returns_empty() {
		let layer = TomlSource::new("/nonexistent/warden.toml").load().unwrap();
		assert!(layer.identity.is_none());
	}

	#[test]
	fn test_toml_source_reads_sections() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		write!(
			file,
			r#"
[identity]
base_url = "https://idp.example.com/api"

[policy]
org_email_domain = "corp.example.com"
admin_groups = ["Admins", "Security"]
"#
		)
		.unwrap();

		let layer = TomlSource::new(file.path()).load().unwrap();
		assert_eq!(
			layer.identity.unwrap().base_url.as_deref(),
			Some("https://idp.example.com/api")
		);
		let policy = layer.policy.unwrap();
		assert_eq!(policy.org_email_domain.as_deref(), Some("corp.example.com"));
		assert_eq!(
			policy.admin_groups,
			Some(vec!["Admins".to_string(), "Security".to_string()])
		);
	}

	#[test]
	fn test_toml_source_rejects_invalid_toml() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		write!(file, "[policy\norg_email_domain = ").unwrap();

		let result = TomlSource::new(file.path()).load();
		assert!(matches!(result, Err(ConfigError::TomlParse { .. })));
	}

	#[test]
	fn test_env_list_splits_and_trims() {
		std::env::set_var("WARDEN_TEST_LIST", " a.com, b.com ,,c.com");
		let list = env_list("WARDEN_TEST_LIST").unwrap();
		std::env::remove_var("WARDEN_TEST_LIST");
		assert_eq!(list, vec!["a.com", "b.com", "c.com"]);
	}

	#[test]
	fn test_env_i64_list_rejects_garbage() {
		std::env::set_var("WARDEN_TEST_ID_LIST", "1,two,3");
		let result = env_i64_list("WARDEN_TEST_ID_LIST");
		std::env::remove_var("WARDEN_TEST_ID_LIST");
		assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
	}
}
