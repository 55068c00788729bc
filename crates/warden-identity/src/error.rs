// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use thiserror::Error;

/// Errors returned by the identity service.
#[derive(Debug, Error)]
pub enum IdentityError {
	/// Network-level error during HTTP communication.
	#[error("Network error: {0}")]
	Network(#[from] reqwest::Error),

	#[error("Request timed out")]
	Timeout,

	/// The API token was rejected.
	#[error("Identity service rejected credentials")]
	Unauthorized,

	#[error("Not found: {0}")]
	NotFound(String),

	#[error("Identity service error: {status} - {message}")]
	ApiError { status: u16, message: String },

	#[error("Invalid response from identity service: {0}")]
	InvalidResponse(String),

	#[error("Client configuration error: {0}")]
	Config(String),
}

pub type Result<T> = std::result::Result<T, IdentityError>;
