// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Interval gate deciding, from persisted state alone, whether a run is due.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{error, info, instrument};
use warden_db::{DbError, RunScheduleState, RunStateStore};

/// A run is due when at least `interval_hours` have passed since the last
/// completed run. A job that has never run is always due. An interval too
/// large to represent is never due.
pub fn is_due(state: &RunScheduleState, now: DateTime<Utc>) -> bool {
	let Some(last) = state.last_execute_at else {
		return true;
	};
	match Duration::try_hours(state.interval_hours) {
		Some(interval) => now - last >= interval,
		None => {
			error!(
				job_id = %state.job_id,
				interval_hours = state.interval_hours,
				"stored interval out of range; skipping run"
			);
			false
		}
	}
}

pub struct ScheduleGate {
	store: Arc<dyn RunStateStore>,
	job_id: String,
}

impl ScheduleGate {
	pub fn new(store: Arc<dyn RunStateStore>, job_id: impl Into<String>) -> Self {
		Self {
			store,
			job_id: job_id.into(),
		}
	}

	pub fn job_id(&self) -> &str {
		&self.job_id
	}

	pub async fn should_run(&self) -> bool {
		self.should_run_at(Utc::now()).await
	}

	/// Records the check, then decides. Any store failure answers `false`.
	#[instrument(skip(self), fields(job_id = %self.job_id))]
	pub async fn should_run_at(&self, now: DateTime<Utc>) -> bool {
		let state = match self.store.load(&self.job_id).await {
			Ok(state) => state,
			Err(e) => {
				error!(error = %e, "failed to read run state; skipping run");
				return false;
			}
		};

		if let Err(e) = self.store.record_check(&self.job_id, now).await {
			error!(error = %e, "failed to record schedule check; skipping run");
			return false;
		}

		let due = is_due(&state, now);
		info!(
			due,
			interval_hours = state.interval_hours,
			last_execute_at = ?state.last_execute_at,
			"schedule checked"
		);
		due
	}

	pub async fn record_run_completed(&self) -> Result<(), DbError> {
		self.record_run_completed_at(Utc::now()).await
	}

	#[instrument(skip(self), fields(job_id = %self.job_id))]
	pub async fn record_run_completed_at(&self, at: DateTime<Utc>) -> Result<(), DbError> {
		self.store.record_run(&self.job_id, at).await.map_err(|e| {
			error!(error = %e, "failed to record completed run");
			e
		})
	}
}
