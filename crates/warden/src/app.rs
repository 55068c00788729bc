// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Wiring from configuration to a runnable audit job.

use std::sync::Arc;
use std::time::Duration;

use sqlx::SqlitePool;
use tracing::{info, warn};
use warden_audit::{AuditOrchestrator, HygieneAuditJob, ScheduleGate};
use warden_config::{PolicyConfig, WardenConfig};
use warden_db::{
	AppLogRecord, CandidateFilter, CandidateRepository, DbError, LogRepository, RunStateRepository,
};
use warden_identity::{HttpIdentityClient, IdentityError};
use warden_logs::{LogBuffer, LogEntry};
use warden_report::{LogReportSink, MailReportSink, ReportSink};
use warden_smtp::{is_valid_email, SmtpClient, SmtpError};

pub fn candidate_filter(policy: &PolicyConfig) -> CandidateFilter {
	CandidateFilter {
		org_email_domain: policy.org_email_domain.clone(),
		excluded_email_domains: policy.excluded_email_domains.clone(),
		excluded_org_addresses: policy.excluded_org_addresses.clone(),
		preview_email_domain: policy.preview_email_domain.clone(),
		preview_last_name: policy.preview_last_name.clone(),
		default_group_name: policy.default_group_name.clone(),
		item_list_page_length: policy.item_list_page_length,
	}
}

/// Mail when both SMTP and a recipient are configured, otherwise log.
pub fn build_sink(config: &WardenConfig) -> Result<Arc<dyn ReportSink>, SmtpError> {
	let label = config.report.environment_label.clone();
	match (&config.smtp, &config.report.recipient) {
		(Some(smtp), Some(recipient)) => {
			if !is_valid_email(recipient) {
				return Err(SmtpError::Address(recipient.clone()));
			}
			let client = SmtpClient::new(smtp.clone())?;
			info!(%recipient, "reports will be mailed");
			Ok(Arc::new(MailReportSink::new(
				Box::new(client),
				recipient.clone(),
				label,
			)))
		}
		_ => {
			warn!("SMTP or report recipient not configured; reports will be logged only");
			Ok(Arc::new(LogReportSink::new(label)))
		}
	}
}

pub fn build_identity_client(config: &WardenConfig) -> Result<HttpIdentityClient, IdentityError> {
	let client = HttpIdentityClient::with_timeout(
		config.identity.base_url.clone(),
		Duration::from_secs(config.identity.timeout_secs),
	)?;
	Ok(match &config.identity.api_token {
		Some(token) => client.with_api_token(token.clone()),
		None => client,
	})
}

pub fn build_job(
	config: &WardenConfig,
	pool: SqlitePool,
) -> Result<HygieneAuditJob, Box<dyn std::error::Error>> {
	let identity = Arc::new(build_identity_client(config)?);
	let candidates = Arc::new(CandidateRepository::new(
		pool.clone(),
		candidate_filter(&config.policy),
	));
	let sink = build_sink(config)?;

	let gate = ScheduleGate::new(
		Arc::new(RunStateRepository::new(pool)),
		config.schedule.job_id.clone(),
	);
	let orchestrator = AuditOrchestrator::new(candidates, identity, sink, config.policy.clone());
	Ok(HygieneAuditJob::new(gate, orchestrator))
}

pub fn to_record(entry: &LogEntry) -> AppLogRecord {
	AppLogRecord {
		logged_at: entry.timestamp,
		level: entry.level.as_str().to_string(),
		target: entry.target.clone(),
		message: entry.message.clone(),
		fields: entry.fields_json(),
	}
}

/// Take every captured event as a log record. An overflow warning is
/// emitted first so it lands in the drained batch.
pub fn drain_records(buffer: &LogBuffer) -> Vec<AppLogRecord> {
	let dropped = buffer.dropped();
	if dropped > 0 {
		warn!(dropped, "log buffer overflowed; oldest entries lost");
	}
	buffer.drain().iter().map(to_record).collect()
}

/// Drain captured events into the application log table.
pub async fn persist_logs(buffer: &LogBuffer, pool: SqlitePool) -> Result<u64, DbError> {
	let records = drain_records(buffer);
	if records.is_empty() {
		return Ok(0);
	}
	LogRepository::new(pool).insert_batch(&records).await
}
