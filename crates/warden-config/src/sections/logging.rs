// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Logging configuration.

use serde::Deserialize;

const DEFAULT_LEVEL: &str = "info";
const DEFAULT_BUFFER_CAPACITY: usize = 10_000;

#[derive(Debug, Clone)]
pub struct LoggingConfig {
	pub level: String,
	/// Write captured log entries to the `application_log` table after each invocation.
	pub persist: bool,
	pub buffer_capacity: usize,
}

impl Default for LoggingConfig {
	fn default() -> Self {
		Self {
			level: DEFAULT_LEVEL.to_string(),
			persist: true,
			buffer_capacity: DEFAULT_BUFFER_CAPACITY,
		}
	}
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingConfigLayer {
	#[serde(default)]
	pub level: Option<String>,
	#[serde(default)]
	pub persist: Option<bool>,
	#[serde(default)]
	pub buffer_capacity: Option<usize>,
}

impl LoggingConfigLayer {
	pub fn merge(&mut self, other: LoggingConfigLayer) {
		if other.level.is_some() {
			self.level = other.level;
		}
		if other.persist.is_some() {
			self.persist = other.persist;
		}
		if other.buffer_capacity.is_some() {
			self.buffer_capacity = other.buffer_capacity;
		}
	}

	pub fn finalize(self) -> LoggingConfig {
		LoggingConfig {
			level: self.level.unwrap_or_else(|| DEFAULT_LEVEL.to_string()),
			persist: self.persist.unwrap_or(true),
			buffer_capacity: self.buffer_capacity.unwrap_or(DEFAULT_BUFFER_CAPACITY),
		}
	}
}
