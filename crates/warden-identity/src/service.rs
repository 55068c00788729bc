// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{AuthenticationProfile, GroupRef, IdentityRecord};

/// Operations the audit needs from the identity service.
///
/// Callers treat every error the same way; the variants exist for logging.
#[async_trait]
pub trait IdentityService: Send + Sync {
	async fn read_identity(&self, id: i64) -> Result<IdentityRecord>;
	async fn update_identity(&self, id: i64, record: &IdentityRecord) -> Result<()>;
	async fn read_authentication_profile(&self, id: i64) -> Result<AuthenticationProfile>;
	async fn read_groups_of(&self, id: i64) -> Result<Vec<i64>>;
	async fn read_group(&self, group_id: i64) -> Result<GroupRef>;
}
