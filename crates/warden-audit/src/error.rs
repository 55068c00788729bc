// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use warden_db::DbError;
use warden_identity::IdentityError;
use warden_report::ReportError;

/// Failure of a single collaborator call during a run.
#[derive(Debug, thiserror::Error)]
pub enum AuditError {
	#[error("identity service: {0}")]
	Identity(#[from] IdentityError),

	#[error("store: {0}")]
	Store(#[from] DbError),

	#[error("report: {0}")]
	Report(#[from] ReportError),
}

pub type Result<T> = std::result::Result<T, AuditError>;
