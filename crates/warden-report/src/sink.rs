// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Report delivery.

use async_trait::async_trait;
use tracing::{info, instrument};
use warden_smtp::EmailSender;

use crate::document::{prefixed_subject, Report};
use crate::error::ReportError;
use crate::render::{render_html, render_text};

/// Destination for rendered reports. Delivery is attempted once.
#[async_trait]
pub trait ReportSink: Send + Sync {
	async fn deliver(&self, report: &Report) -> Result<(), ReportError>;
}

/// Mails each report to a single distribution address.
pub struct MailReportSink {
	sender: Box<dyn EmailSender>,
	recipient: String,
	environment_label: Option<String>,
}

impl MailReportSink {
	pub fn new(
		sender: Box<dyn EmailSender>,
		recipient: impl Into<String>,
		environment_label: Option<String>,
	) -> Self {
		Self {
			sender,
			recipient: recipient.into(),
			environment_label,
		}
	}
}

#[async_trait]
impl ReportSink for MailReportSink {
	#[instrument(skip(self, report), fields(kind = report.kind.as_str(), rows = report.rows.len()))]
	async fn deliver(&self, report: &Report) -> Result<(), ReportError> {
		if report.is_empty() {
			return Err(ReportError::Empty(report.subject.clone()));
		}

		let subject = prefixed_subject(self.environment_label.as_deref(), &report.subject);
		self.sender
			.send_email(
				&self.recipient,
				&subject,
				&render_html(report),
				&render_text(report),
			)
			.await?;

		info!(subject = %subject, recipient = %self.recipient, "report mailed");
		Ok(())
	}
}

/// Writes reports to the log when no mail transport is configured.
#[derive(Debug, Default)]
pub struct LogReportSink {
	environment_label: Option<String>,
}

impl LogReportSink {
	pub fn new(environment_label: Option<String>) -> Self {
		Self { environment_label }
	}
}

#[async_trait]
impl ReportSink for LogReportSink {
	async fn deliver(&self, report: &Report) -> Result<(), ReportError> {
		if report.is_empty() {
			return Err(ReportError::Empty(report.subject.clone()));
		}

		let subject = prefixed_subject(self.environment_label.as_deref(), &report.subject);
		info!(
			kind = report.kind.as_str(),
			subject = %subject,
			rows = report.rows.len(),
			body = %render_text(report),
			"report generated (mail delivery not configured)"
		);
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::document::ReportRow;
	use chrono::NaiveDate;
	use parking_lot::Mutex;
	use std::sync::Arc;
	use warden_smtp::SmtpError;

	#[derive(Debug, Clone, PartialEq)]
	struct SentMail {
		to: String,
		subject: String,
		html: String,
		text: String,
	}

	#[derive(Default, Clone)]
	struct FakeSender {
		sent: Arc<Mutex<Vec<SentMail>>>,
		fail: bool,
	}

	#[async_trait]
	impl EmailSender for FakeSender {
		async fn send_email(
			&self,
			to: &str,
			subject: &str,
			body_html: &str,
			body_text: &str,
		) -> Result<(), SmtpError> {
			if self.fail {
				return Err(SmtpError::Send("relay refused".to_string()));
			}
			self.sent.lock().push(SentMail {
				to: to.to_string(),
				subject: subject.to_string(),
				html: body_html.to_string(),
				text: body_text.to_string(),
			});
			Ok(())
		}
	}

	fn report() -> Report {
		Report::disabled_users(
			vec![ReportRow::new(1, "Ada", "Lovelace", "ada@example.com")],
			NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
		)
	}

	#[tokio::test]
	async fn test_mail_sink_prefixes_subject() {
		let sender = FakeSender::default();
		let sink = MailReportSink::new(
			Box::new(sender.clone()),
			"it-ops@example.com",
			Some("PROD".to_string()),
		);

		sink.deliver(&report()).await.unwrap();

		let sent = sender.sent.lock();
		assert_eq!(sent.len(), 1);
		assert_eq!(sent[0].to, "it-ops@example.com");
		assert_eq!(sent[0].subject, "PROD - Users With No Groups Report");
		assert!(sent[0].html.contains("ada@example.com"));
		assert!(sent[0].text.contains("Total users disabled: 1"));
	}

	#[tokio::test]
	async fn test_mail_sink_surfaces_delivery_error() {
		let sender = FakeSender {
			fail: true,
			..Default::default()
		};
		let sink = MailReportSink::new(Box::new(sender), "it-ops@example.com", None);
		assert!(matches!(
			sink.deliver(&report()).await,
			Err(ReportError::Delivery(_))
		));
	}

	#[tokio::test]
	async fn test_empty_report_not_sent() {
		let sender = FakeSender::default();
		let sink = MailReportSink::new(Box::new(sender.clone()), "it-ops@example.com", None);
		let empty = Report::disabled_users(Vec::new(), NaiveDate::from_ymd_opt(2025, 6, 1).unwrap());

		assert!(matches!(sink.deliver(&empty).await, Err(ReportError::Empty(_))));
		assert!(sender.sent.lock().is_empty());
	}

	#[tokio::test]
	async fn test_log_sink_accepts_report() {
		let sink = LogReportSink::new(None);
		sink.deliver(&report()).await.unwrap();
	}
}
