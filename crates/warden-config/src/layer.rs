// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use serde::Deserialize;

use crate::sections::{
	DatabaseConfigLayer, IdentityConfigLayer, LoggingConfigLayer, PolicyConfigLayer,
	ReportConfigLayer, ScheduleConfigLayer, SmtpConfigLayer,
};

/// One source's partial view of the configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WardenConfigLayer {
	#[serde(default)]
	pub database: Option<DatabaseConfigLayer>,
	#[serde(default)]
	pub identity: Option<IdentityConfigLayer>,
	#[serde(default)]
	pub smtp: Option<SmtpConfigLayer>,
	#[serde(default)]
	pub report: Option<ReportConfigLayer>,
	#[serde(default)]
	pub schedule: Option<ScheduleConfigLayer>,
	#[serde(default)]
	pub policy: Option<PolicyConfigLayer>,
	#[serde(default)]
	pub logging: Option<LoggingConfigLayer>,
}

macro_rules! merge_section {
	($self:ident, $other:ident, $field:ident) => {
		match ($self.$field.as_mut(), $other.$field) {
			(Some(existing), Some(incoming)) => existing.merge(incoming),
			(None, Some(incoming)) => $self.$field = Some(incoming),
			(_, None) => {}
		}
	};
}

impl WardenConfigLayer {
	/// Merge `other` on top of `self`; fields set in `other` win.
	pub fn merge(&mut self, other: WardenConfigLayer) {
		merge_section!(self, other, database);
		merge_section!(self, other, identity);
		merge_section!(self, other, smtp);
		merge_section!(self, other, report);
		merge_section!(self, other, schedule);
		merge_section!(self, other, policy);
		merge_section!(self, other, logging);
	}
}
