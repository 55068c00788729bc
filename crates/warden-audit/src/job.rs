// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Job wrapper that admits a run through the schedule gate.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{info, instrument};

use crate::gate::ScheduleGate;
use crate::orchestrator::AuditOrchestrator;

#[derive(Debug, thiserror::Error)]
pub enum JobError {
	#[error("job failed: {message}")]
	Failed { message: String, retryable: bool },

	#[error("job cancelled")]
	Cancelled,
}

#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn cancel(&self) {
		self.0.store(true, Ordering::SeqCst);
	}

	pub fn is_cancelled(&self) -> bool {
		self.0.load(Ordering::SeqCst)
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerSource {
	Schedule,
	Manual,
}

#[derive(Debug, Clone)]
pub struct JobContext {
	pub run_id: String,
	pub triggered_by: TriggerSource,
	pub cancellation_token: CancellationToken,
}

impl JobContext {
	pub fn new(triggered_by: TriggerSource) -> Self {
		Self {
			run_id: uuid::Uuid::new_v4().to_string(),
			triggered_by,
			cancellation_token: CancellationToken::new(),
		}
	}
}

#[derive(Debug, Clone)]
pub struct JobOutput {
	pub message: String,
	pub metadata: Option<serde_json::Value>,
}

#[async_trait]
pub trait Job: Send + Sync {
	fn id(&self) -> &str;
	fn name(&self) -> &str;
	fn description(&self) -> &str;
	async fn run(&self, ctx: &JobContext) -> Result<JobOutput, JobError>;
}

pub struct HygieneAuditJob {
	gate: ScheduleGate,
	orchestrator: AuditOrchestrator,
}

impl HygieneAuditJob {
	pub fn new(gate: ScheduleGate, orchestrator: AuditOrchestrator) -> Self {
		Self { gate, orchestrator }
	}
}

#[async_trait]
impl Job for HygieneAuditJob {
	fn id(&self) -> &str {
		self.gate.job_id()
	}

	fn name(&self) -> &str {
		"Directory Hygiene Audit"
	}

	fn description(&self) -> &str {
		"Disable group-less accounts, audit login methods and second factors, normalize list settings"
	}

	#[instrument(skip(self, ctx), fields(job_id = %self.gate.job_id(), run_id = %ctx.run_id))]
	async fn run(&self, ctx: &JobContext) -> Result<JobOutput, JobError> {
		if ctx.cancellation_token.is_cancelled() {
			return Err(JobError::Cancelled);
		}

		if !self.gate.should_run().await {
			info!(triggered_by = ?ctx.triggered_by, "run not due");
			return Ok(JobOutput {
				message: "Run not due".to_string(),
				metadata: Some(serde_json::json!({ "skipped": true })),
			});
		}

		if ctx.cancellation_token.is_cancelled() {
			return Err(JobError::Cancelled);
		}

		let summary = self.orchestrator.run().await;
		let run_recorded = self.gate.record_run_completed().await.is_ok();

		info!(
			reported = summary.total_reported(),
			failed = summary.total_failures(),
			skipped_phases = summary.skipped_phases(),
			run_recorded,
			"hygiene audit completed"
		);

		let phases = serde_json::to_value(&summary).map_err(|e| JobError::Failed {
			message: format!("failed to serialize run summary: {e}"),
			retryable: false,
		})?;

		Ok(JobOutput {
			message: format!(
				"Audit completed: {} reported, {} failed, {} phases skipped",
				summary.total_reported(),
				summary.total_failures(),
				summary.skipped_phases()
			),
			metadata: Some(serde_json::json!({
				"skipped": false,
				"run_recorded": run_recorded,
				"summary": phases,
			})),
		})
	}
}
