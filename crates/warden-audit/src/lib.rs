// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Directory hygiene audit.
//!
//! A run is admitted by [`ScheduleGate`], then [`AuditOrchestrator`] walks
//! each phase: fetch a candidate set, classify or remediate each identity,
//! and hand the phase's findings to a report sink.

pub mod classify;
pub mod error;
pub mod gate;
pub mod job;
pub mod orchestrator;
pub mod remediate;

#[cfg(test)]
pub(crate) mod testing;

pub use classify::{
	classify_client, classify_login_provider, classify_password, password_lookup_failed,
	ClassificationResult, LoginProviderFinding, PasswordWithout2faFinding, RoleTier,
	WrongClientFinding, NO_VALID_PROVIDER_MESSAGE, PASSWORD_WITHOUT_2FA_MESSAGE,
};
pub use error::{AuditError, Result};
pub use gate::{is_due, ScheduleGate};
pub use job::{
	CancellationToken, HygieneAuditJob, Job, JobContext, JobError, JobOutput, TriggerSource,
};
pub use orchestrator::{
	AuditOrchestrator, ItemFailure, Phase, PhaseOutcome, ReportStatus, RunSummary,
};
pub use remediate::{
	Remediation, RemediationExecutor, RemediationOutcome, DISABLED_KEYWORDS, DISABLED_NOTES,
};
