// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! One-directional corrective writes against the identity service.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, instrument};
use warden_identity::{ClientAssignment, IdentityRecord, IdentityService};

use crate::error::Result;

pub const DISABLED_NOTES: &str = "user had no active groups";
pub const DISABLED_KEYWORDS: &str = "disabled by directory hygiene audit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Remediation {
	Disable,
	NormalizeListLength(i64),
	ReassignClient(i64),
}

impl Remediation {
	pub fn name(&self) -> &'static str {
		match self {
			Remediation::Disable => "disable",
			Remediation::NormalizeListLength(_) => "normalize_list_length",
			Remediation::ReassignClient(_) => "reassign_client",
		}
	}

	/// Mutates `record` toward the target state. Returns whether anything changed.
	pub fn apply(&self, record: &mut IdentityRecord) -> bool {
		let before = record.clone();
		match *self {
			Remediation::Disable => {
				record.access_enabled = false;
				record.notes = DISABLED_NOTES.to_string();
				record.keywords = DISABLED_KEYWORDS.to_string();
			}
			Remediation::NormalizeListLength(length) => {
				record.item_list_page_length = length;
			}
			Remediation::ReassignClient(target) => {
				let name = record
					.client
					.as_ref()
					.filter(|c| c.id == target)
					.and_then(|c| c.name.clone());
				record.client = Some(ClientAssignment {
					id: target,
					name,
					secured: false,
				});
			}
		}
		*record != before
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RemediationOutcome {
	Applied,
	AlreadyCompliant,
}

pub struct RemediationExecutor {
	identity: Arc<dyn IdentityService>,
}

impl RemediationExecutor {
	pub fn new(identity: Arc<dyn IdentityService>) -> Self {
		Self { identity }
	}

	/// Read, mutate, and write back only when the record changed.
	#[instrument(skip(self, remediation), fields(action = remediation.name()))]
	pub async fn execute(&self, user_id: i64, remediation: Remediation) -> Result<RemediationOutcome> {
		let mut record = self.identity.read_identity(user_id).await?;
		if !remediation.apply(&mut record) {
			debug!(user_id, "already compliant");
			return Ok(RemediationOutcome::AlreadyCompliant);
		}

		self.identity.update_identity(user_id, &record).await?;
		info!(user_id, "remediation applied");
		Ok(RemediationOutcome::Applied)
	}
}
