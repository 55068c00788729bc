// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Captured log entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
	Trace,
	Debug,
	Info,
	Warn,
	Error,
}

impl LogLevel {
	pub fn from_tracing(level: &tracing::Level) -> Self {
		match *level {
			tracing::Level::TRACE => LogLevel::Trace,
			tracing::Level::DEBUG => LogLevel::Debug,
			tracing::Level::INFO => LogLevel::Info,
			tracing::Level::WARN => LogLevel::Warn,
			tracing::Level::ERROR => LogLevel::Error,
		}
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			LogLevel::Trace => "TRACE",
			LogLevel::Debug => "DEBUG",
			LogLevel::Info => "INFO",
			LogLevel::Warn => "WARN",
			LogLevel::Error => "ERROR",
		}
	}
}

impl std::fmt::Display for LogLevel {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
	/// Monotonically increasing within one buffer.
	pub id: u64,
	pub timestamp: DateTime<Utc>,
	pub level: LogLevel,
	pub target: String,
	pub message: String,
	pub fields: Vec<(String, String)>,
}

impl LogEntry {
	pub fn new(
		id: u64,
		level: LogLevel,
		target: String,
		message: String,
		fields: Vec<(String, String)>,
	) -> Self {
		Self {
			id,
			timestamp: Utc::now(),
			level,
			target,
			message,
			fields,
		}
	}

	/// Fields as a JSON object, or `None` when there are none.
	pub fn fields_json(&self) -> Option<serde_json::Value> {
		if self.fields.is_empty() {
			return None;
		}
		let map = self
			.fields
			.iter()
			.map(|(k, v)| (k.clone(), serde_json::Value::String(v.clone())))
			.collect::<serde_json::Map<_, _>>();
		Some(serde_json::Value::Object(map))
	}
}
