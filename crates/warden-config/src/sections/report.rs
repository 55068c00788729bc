// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Report distribution settings.

use serde::Deserialize;

#[derive(Debug, Clone, Default)]
pub struct ReportConfig {
	/// Distribution address for every report. `None` means reports are only logged.
	pub recipient: Option<String>,
	/// Prepended to every subject as `"<LABEL> - <subject>"`.
	pub environment_label: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportConfigLayer {
	#[serde(default)]
	pub recipient: Option<String>,
	#[serde(default)]
	pub environment_label: Option<String>,
}

impl ReportConfigLayer {
	pub fn merge(&mut self, other: ReportConfigLayer) {
		if other.recipient.is_some() {
			self.recipient = other.recipient;
		}
		if other.environment_label.is_some() {
			self.environment_label = other.environment_label;
		}
	}

	pub fn finalize(self) -> ReportConfig {
		ReportConfig {
			recipient: self.recipient,
			environment_label: self.environment_label.map(|l| l.to_uppercase()),
		}
	}
}
