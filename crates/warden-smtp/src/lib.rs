// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! SMTP delivery for audit reports.
//!
//! [`SmtpClient`] sends multipart (plain text + HTML) messages through
//! [`lettre`]. Callers depend on the [`EmailSender`] trait so report delivery
//! can be exercised without a mail server.
//!
//! ```no_run
//! use warden_smtp::{EmailSender, SmtpClient};
//!
//! # async fn example(config: warden_config::SmtpConfig) -> Result<(), warden_smtp::SmtpError> {
//! let client = SmtpClient::new(config)?;
//! client
//! 	.send_email(
//! 		"it-ops@example.com",
//! 		"Users With No Groups Report",
//! 		"<p>No users found.</p>",
//! 		"No users found.",
//! 	)
//! 	.await?;
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use lettre::{
	message::{header::ContentType, Mailbox, MultiPart, SinglePart},
	transport::smtp::authentication::Credentials,
	AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use warden_config::SmtpConfig;

#[derive(Debug, thiserror::Error)]
pub enum SmtpError {
	#[error("connection failed: {0}")]
	Connection(String),

	#[error("send failed: {0}")]
	Send(String),

	#[error("invalid email address: {0}")]
	Address(String),
}

/// Something that can deliver a multipart email.
#[async_trait]
pub trait EmailSender: Send + Sync {
	async fn send_email(
		&self,
		to: &str,
		subject: &str,
		body_html: &str,
		body_text: &str,
	) -> Result<(), SmtpError>;
}

pub struct SmtpClient {
	transport: AsyncSmtpTransport<Tokio1Executor>,
	from_mailbox: Mailbox,
}

impl SmtpClient {
	/// Build the transport. No connection is made until the first send.
	///
	/// # Errors
	///
	/// Returns [`SmtpError::Address`] if the sender address is invalid, or
	/// [`SmtpError::Connection`] if the STARTTLS relay cannot be configured.
	#[tracing::instrument(
		name = "smtp_client_new",
		skip(config),
		fields(host = %config.host, port = %config.port, use_tls = %config.use_tls)
	)]
	pub fn new(config: SmtpConfig) -> Result<Self, SmtpError> {
		let from_mailbox = sender_mailbox(&config.from_name, &config.from_address)?;

		let builder = if config.use_tls {
			AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
				.map_err(|e| SmtpError::Connection(format!("{e}")))?
		} else {
			AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host)
		};

		let mut builder = builder.port(config.port);

		if let (Some(username), Some(password)) = (config.username, config.password) {
			builder = builder.credentials(Credentials::new(username, password.into_inner()));
		}

		let transport = builder.build();

		tracing::debug!("SMTP client initialized");

		Ok(Self {
			transport,
			from_mailbox,
		})
	}

	pub fn from_mailbox(&self) -> &Mailbox {
		&self.from_mailbox
	}
}

#[async_trait]
impl EmailSender for SmtpClient {
	#[tracing::instrument(
		name = "smtp_send_email",
		skip(self, body_html, body_text),
		fields(to = %to, subject = %subject)
	)]
	async fn send_email(
		&self,
		to: &str,
		subject: &str,
		body_html: &str,
		body_text: &str,
	) -> Result<(), SmtpError> {
		let message = build_message(&self.from_mailbox, to, subject, body_html, body_text)?;

		tracing::debug!("sending email");

		self.transport
			.send(message)
			.await
			.map_err(|e| SmtpError::Send(format!("{e}")))?;

		tracing::info!("email sent");

		Ok(())
	}
}

fn sender_mailbox(name: &str, address: &str) -> Result<Mailbox, SmtpError> {
	format!("{name} <{address}>")
		.parse()
		.map_err(|e| SmtpError::Address(format!("{e}")))
}

fn build_message(
	from: &Mailbox,
	to: &str,
	subject: &str,
	body_html: &str,
	body_text: &str,
) -> Result<Message, SmtpError> {
	let to_mailbox: Mailbox = to.parse().map_err(|e| SmtpError::Address(format!("{e}")))?;

	Message::builder()
		.from(from.clone())
		.to(to_mailbox)
		.subject(subject)
		.multipart(
			MultiPart::alternative()
				.singlepart(
					SinglePart::builder()
						.header(ContentType::TEXT_PLAIN)
						.body(body_text.to_string()),
				)
				.singlepart(
					SinglePart::builder()
						.header(ContentType::TEXT_HTML)
						.body(body_html.to_string()),
				),
		)
		.map_err(|e| SmtpError::Send(format!("failed to build message: {e}")))
}

/// Syntactic check of an email address; says nothing about deliverability.
pub fn is_valid_email(email: &str) -> bool {
	email.parse::<Mailbox>().is_ok()
}
