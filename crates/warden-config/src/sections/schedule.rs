// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Run schedule settings.

use serde::Deserialize;

pub const DEFAULT_JOB_ID: &str = "directory-hygiene-audit";
const DEFAULT_INTERVAL_HOURS: i64 = 24;

#[derive(Debug, Clone)]
pub struct ScheduleConfig {
	/// Key of the run-state row in `automation_control`.
	pub job_id: String,
	/// Interval written when the run-state row is first seeded.
	pub default_interval_hours: i64,
}

impl Default for ScheduleConfig {
	fn default() -> Self {
		Self {
			job_id: DEFAULT_JOB_ID.to_string(),
			default_interval_hours: DEFAULT_INTERVAL_HOURS,
		}
	}
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScheduleConfigLayer {
	#[serde(default)]
	pub job_id: Option<String>,
	#[serde(default)]
	pub default_interval_hours: Option<i64>,
}

impl ScheduleConfigLayer {
	pub fn merge(&mut self, other: ScheduleConfigLayer) {
		if other.job_id.is_some() {
			self.job_id = other.job_id;
		}
		if other.default_interval_hours.is_some() {
			self.default_interval_hours = other.default_interval_hours;
		}
	}

	pub fn finalize(self) -> ScheduleConfig {
		ScheduleConfig {
			job_id: self.job_id.unwrap_or_else(|| DEFAULT_JOB_ID.to_string()),
			default_interval_hours: self
				.default_interval_hours
				.unwrap_or(DEFAULT_INTERVAL_HOURS),
		}
	}
}
