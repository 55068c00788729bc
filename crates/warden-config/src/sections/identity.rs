// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Identity service connection settings.

use serde::Deserialize;
use warden_common_secret::SecretString;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct IdentityConfig {
	/// Base URL of the identity service API. Empty means unconfigured.
	pub base_url: String,
	pub api_token: Option<SecretString>,
	pub timeout_secs: u64,
}

impl Default for IdentityConfig {
	fn default() -> Self {
		Self {
			base_url: String::new(),
			api_token: None,
			timeout_secs: DEFAULT_TIMEOUT_SECS,
		}
	}
}

/// The token is never read from TOML; it comes from the environment only.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IdentityConfigLayer {
	#[serde(default)]
	pub base_url: Option<String>,
	#[serde(default)]
	pub timeout_secs: Option<u64>,
	#[serde(skip)]
	pub api_token: Option<SecretString>,
}

impl IdentityConfigLayer {
	pub fn merge(&mut self, other: IdentityConfigLayer) {
		if other.base_url.is_some() {
			self.base_url = other.base_url;
		}
		if other.timeout_secs.is_some() {
			self.timeout_secs = other.timeout_secs;
		}
		if other.api_token.is_some() {
			self.api_token = other.api_token;
		}
	}

	pub fn finalize(self) -> IdentityConfig {
		IdentityConfig {
			base_url: self
				.base_url
				.map(|u| u.trim_end_matches('/').to_string())
				.unwrap_or_default(),
			api_token: self.api_token,
			timeout_secs: self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
		}
	}
}
