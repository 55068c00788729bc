// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Sequential audit phases with per-identity isolation.
//!
//! A phase whose candidate fetch fails is skipped. An identity whose
//! lookups or writes fail is excluded from that phase's report. A report
//! that cannot be delivered is logged. None of these stop the run.

use std::sync::Arc;

use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::Serialize;
use tracing::{error, info, instrument, warn};
use warden_config::PolicyConfig;
use warden_db::{CandidateStore, CandidateUser};
use warden_identity::IdentityService;
use warden_report::{Report, ReportRow, ReportSink};

use crate::classify::{
	classify_client, classify_login_provider, classify_password, password_lookup_failed,
	ClassificationResult, LoginProviderFinding, RoleTier,
};
use crate::error::{AuditError, Result};
use crate::remediate::{Remediation, RemediationExecutor, RemediationOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
	NoGroup,
	LoginProvider,
	SecondFactor,
	ItemListLength,
	ClientAssignment,
}

impl Phase {
	pub fn as_str(&self) -> &'static str {
		match self {
			Phase::NoGroup => "no_group",
			Phase::LoginProvider => "login_provider",
			Phase::SecondFactor => "second_factor",
			Phase::ItemListLength => "item_list_length",
			Phase::ClientAssignment => "client_assignment",
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemFailure {
	pub user_id: i64,
	pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ReportStatus {
	NotNeeded,
	Delivered,
	Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhaseOutcome {
	pub phase: Phase,
	pub candidates: usize,
	/// Identities processed without error.
	pub succeeded: usize,
	/// Remediations that needed no write.
	pub already_compliant: usize,
	/// Rows in the phase's report.
	pub reported: usize,
	pub failures: Vec<ItemFailure>,
	pub skipped: Option<String>,
	pub report: ReportStatus,
}

impl PhaseOutcome {
	fn new(phase: Phase, candidates: usize) -> Self {
		Self {
			phase,
			candidates,
			succeeded: 0,
			already_compliant: 0,
			reported: 0,
			failures: Vec::new(),
			skipped: None,
			report: ReportStatus::NotNeeded,
		}
	}

	fn skipped(phase: Phase, reason: &AuditError) -> Self {
		error!(phase = phase.as_str(), error = %reason, "candidate fetch failed; skipping phase");
		Self {
			skipped: Some(reason.to_string()),
			..Self::new(phase, 0)
		}
	}

	fn succeed(&mut self, remediation: Option<RemediationOutcome>) {
		self.succeeded += 1;
		if remediation == Some(RemediationOutcome::AlreadyCompliant) {
			self.already_compliant += 1;
		}
	}

	fn fail(&mut self, user_id: i64, reason: AuditError) {
		warn!(phase = self.phase.as_str(), user_id, error = %reason, "identity excluded from phase");
		self.failures.push(ItemFailure {
			user_id,
			reason: reason.to_string(),
		});
	}

	pub fn is_skipped(&self) -> bool {
		self.skipped.is_some()
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
	pub started_at: DateTime<Utc>,
	pub finished_at: DateTime<Utc>,
	pub phases: Vec<PhaseOutcome>,
}

impl RunSummary {
	pub fn phase(&self, phase: Phase) -> Option<&PhaseOutcome> {
		self.phases.iter().find(|p| p.phase == phase)
	}

	pub fn total_reported(&self) -> usize {
		self.phases.iter().map(|p| p.reported).sum()
	}

	pub fn total_failures(&self) -> usize {
		self.phases.iter().map(|p| p.failures.len()).sum()
	}

	pub fn skipped_phases(&self) -> usize {
		self.phases.iter().filter(|p| p.is_skipped()).count()
	}
}

fn row(user: &CandidateUser) -> ReportRow {
	ReportRow::new(
		user.id,
		user.first_name.clone(),
		user.last_name.clone(),
		user.email.clone(),
	)
}

pub struct AuditOrchestrator {
	candidates: Arc<dyn CandidateStore>,
	identity: Arc<dyn IdentityService>,
	sink: Arc<dyn ReportSink>,
	executor: RemediationExecutor,
	policy: PolicyConfig,
}

impl AuditOrchestrator {
	pub fn new(
		candidates: Arc<dyn CandidateStore>,
		identity: Arc<dyn IdentityService>,
		sink: Arc<dyn ReportSink>,
		policy: PolicyConfig,
	) -> Self {
		Self {
			executor: RemediationExecutor::new(identity.clone()),
			candidates,
			identity,
			sink,
			policy,
		}
	}

	/// Reports are dated with the host's local calendar day.
	pub async fn run(&self) -> RunSummary {
		self.run_on(Local::now().date_naive()).await
	}

	/// Run every phase in order, dating reports with `date`.
	#[instrument(skip(self))]
	pub async fn run_on(&self, date: NaiveDate) -> RunSummary {
		let started_at = Utc::now();
		let mut phases = vec![
			self.no_group_phase(date).await,
			self.login_provider_phase(date).await,
			self.second_factor_phase(date).await,
			self.item_list_phase(date).await,
		];

		match (
			self.policy.client_reassignment_enabled,
			self.policy.target_client_id,
		) {
			(true, Some(target)) => phases.push(self.client_phase(target, date).await),
			_ => info!("client reassignment disabled"),
		}

		RunSummary {
			started_at,
			finished_at: Utc::now(),
			phases,
		}
	}

	async fn deliver(&self, outcome: &mut PhaseOutcome, report: Report) {
		outcome.reported = report.rows.len();
		outcome.report = if report.is_empty() {
			ReportStatus::NotNeeded
		} else {
			match self.sink.deliver(&report).await {
				Ok(()) => ReportStatus::Delivered,
				Err(e) => {
					error!(phase = outcome.phase.as_str(), error = %e, "report delivery failed");
					ReportStatus::Failed {
						reason: e.to_string(),
					}
				}
			}
		};

		info!(
			phase = outcome.phase.as_str(),
			candidates = outcome.candidates,
			succeeded = outcome.succeeded,
			reported = outcome.reported,
			failed = outcome.failures.len(),
			"phase completed"
		);
	}

	#[instrument(skip(self))]
	async fn no_group_phase(&self, date: NaiveDate) -> PhaseOutcome {
		let users = match self.candidates.users_without_groups().await {
			Ok(users) => users,
			Err(e) => return PhaseOutcome::skipped(Phase::NoGroup, &AuditError::from(e)),
		};

		let mut outcome = PhaseOutcome::new(Phase::NoGroup, users.len());
		let mut rows = Vec::new();
		for user in &users {
			match self.executor.execute(user.id, Remediation::Disable).await {
				Ok(result) => {
					if let Err(e) = self.candidates.record_disabled(user.id).await {
						warn!(user_id = user.id, error = %e, "failed to record disablement");
					}
					outcome.succeed(Some(result));
					rows.push(row(user));
				}
				Err(e) => outcome.fail(user.id, e),
			}
		}

		self.deliver(&mut outcome, Report::disabled_users(rows, date))
			.await;
		outcome
	}

	async fn role_tier(&self, user_id: i64) -> Result<RoleTier> {
		let group_ids = self.identity.read_groups_of(user_id).await?;
		let mut names = Vec::with_capacity(group_ids.len());
		for group_id in group_ids {
			names.push(self.identity.read_group(group_id).await?.name);
		}
		Ok(RoleTier::from_group_names(&names, &self.policy.admin_groups))
	}

	async fn evaluate_login(&self, user: &CandidateUser) -> Result<LoginProviderFinding> {
		let tier = self.role_tier(user.id).await?;
		let profile = self.identity.read_authentication_profile(user.id).await?;
		Ok(classify_login_provider(user, &profile, tier))
	}

	#[instrument(skip(self))]
	async fn login_provider_phase(&self, date: NaiveDate) -> PhaseOutcome {
		let users = match self.candidates.org_users().await {
			Ok(users) => users,
			Err(e) => return PhaseOutcome::skipped(Phase::LoginProvider, &AuditError::from(e)),
		};

		let mut outcome = PhaseOutcome::new(Phase::LoginProvider, users.len());
		let mut findings = Vec::new();
		for user in &users {
			match self.evaluate_login(user).await {
				Ok(finding) => {
					outcome.succeed(None);
					if !finding.is_valid {
						findings.push(finding);
					}
				}
				Err(e) => outcome.fail(user.id, e),
			}
		}

		let multiple = findings.iter().filter(|f| f.has_multiple_providers).count();
		let no_valid = findings.iter().filter(|f| f.has_no_valid_provider).count();
		let rows = findings
			.into_iter()
			.map(|f| ClassificationResult::LoginProvider(f).to_report_row())
			.collect();

		self.deliver(
			&mut outcome,
			Report::login_method(rows, multiple, no_valid, date),
		)
		.await;
		outcome
	}

	#[instrument(skip(self))]
	async fn second_factor_phase(&self, date: NaiveDate) -> PhaseOutcome {
		let users = match self.candidates.non_org_users().await {
			Ok(users) => users,
			Err(e) => return PhaseOutcome::skipped(Phase::SecondFactor, &AuditError::from(e)),
		};

		let mut outcome = PhaseOutcome::new(Phase::SecondFactor, users.len());
		let mut rows = Vec::new();
		for user in &users {
			let finding = match self.identity.read_authentication_profile(user.id).await {
				Ok(profile) => classify_password(user, &profile),
				Err(e) => {
					warn!(user_id = user.id, error = %e, "failed to read login profile");
					Some(password_lookup_failed(user, &e))
				}
			};
			outcome.succeed(None);
			if let Some(finding) = finding {
				rows.push(ClassificationResult::PasswordWithout2fa(finding).to_report_row());
			}
		}

		self.deliver(&mut outcome, Report::second_factor(rows, date))
			.await;
		outcome
	}

	#[instrument(skip(self))]
	async fn item_list_phase(&self, date: NaiveDate) -> PhaseOutcome {
		let users = match self.candidates.item_list_users().await {
			Ok(users) => users,
			Err(e) => return PhaseOutcome::skipped(Phase::ItemListLength, &AuditError::from(e)),
		};

		let page_length = self.policy.item_list_page_length;
		let mut outcome = PhaseOutcome::new(Phase::ItemListLength, users.len());
		let mut rows = Vec::new();
		for user in &users {
			match self
				.executor
				.execute(user.id, Remediation::NormalizeListLength(page_length))
				.await
			{
				Ok(result) => {
					outcome.succeed(Some(result));
					rows.push(row(user));
				}
				Err(e) => outcome.fail(user.id, e),
			}
		}

		self.deliver(
			&mut outcome,
			Report::item_list_length(rows, page_length, date),
		)
		.await;
		outcome
	}

	async fn reassign_if_misassigned(
		&self,
		user: &CandidateUser,
		target: i64,
	) -> Result<Option<ClassificationResult>> {
		let record = self.identity.read_identity(user.id).await?;
		let Some(finding) = classify_client(user, &record, &self.policy.misassigned_client_ids)
		else {
			return Ok(None);
		};
		self.executor
			.execute(user.id, Remediation::ReassignClient(target))
			.await?;
		Ok(Some(ClassificationResult::WrongClient(finding)))
	}

	#[instrument(skip(self))]
	async fn client_phase(&self, target: i64, date: NaiveDate) -> PhaseOutcome {
		let users = match self.candidates.org_users_outside_client(target).await {
			Ok(users) => users,
			Err(e) => return PhaseOutcome::skipped(Phase::ClientAssignment, &AuditError::from(e)),
		};

		let mut outcome = PhaseOutcome::new(Phase::ClientAssignment, users.len());
		let mut rows = Vec::new();
		for user in &users {
			match self.reassign_if_misassigned(user, target).await {
				Ok(finding) => {
					outcome.succeed(None);
					if let Some(finding) = finding {
						rows.push(finding.to_report_row());
					}
				}
				Err(e) => outcome.fail(user.id, e),
			}
		}

		self.deliver(
			&mut outcome,
			Report::client_reassignment(rows, target, date),
		)
		.await;
		outcome
	}
}
