// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use warden_smtp::SmtpError;

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
	#[error("report delivery failed: {0}")]
	Delivery(#[from] SmtpError),

	#[error("report has no rows: {0}")]
	Empty(String),
}
