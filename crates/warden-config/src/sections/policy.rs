// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Audit policy: candidate filters, admin groups, and remediation targets.

use serde::{Deserialize, Serialize};

const DEFAULT_ORG_EMAIL_DOMAIN: &str = "example.com";
const DEFAULT_PREVIEW_EMAIL_DOMAIN: &str = "previewuser.com";
const DEFAULT_PREVIEW_LAST_NAME: &str = "Preview";
const DEFAULT_GROUP_NAME: &str = "Everyone";
const DEFAULT_ITEM_LIST_PAGE_LENGTH: i64 = 200;

fn default_admin_groups() -> Vec<String> {
	vec![
		"System Administrators".to_string(),
		"Directory Administrators".to_string(),
	]
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyConfig {
	/// Domain of the organization whose users must sign in through Okta.
	pub org_email_domain: String,
	/// Vendor and service-account domains excluded from every candidate set.
	pub excluded_email_domains: Vec<String>,
	/// Shared org mailboxes that are exempt from the login-provider check.
	pub excluded_org_addresses: Vec<String>,
	pub preview_email_domain: String,
	pub preview_last_name: String,
	/// The catch-all group every account is a member of.
	pub default_group_name: String,
	/// Membership in any of these groups makes a user elevated.
	pub admin_groups: Vec<String>,
	pub item_list_page_length: i64,
	pub client_reassignment_enabled: bool,
	pub misassigned_client_ids: Vec<i64>,
	pub target_client_id: Option<i64>,
}

impl Default for PolicyConfig {
	fn default() -> Self {
		PolicyConfigLayer::default().finalize()
	}
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct PolicyConfigLayer {
	#[serde(default)]
	pub org_email_domain: Option<String>,
	#[serde(default)]
	pub excluded_email_domains: Option<Vec<String>>,
	#[serde(default)]
	pub excluded_org_addresses: Option<Vec<String>>,
	#[serde(default)]
	pub preview_email_domain: Option<String>,
	#[serde(default)]
	pub preview_last_name: Option<String>,
	#[serde(default)]
	pub default_group_name: Option<String>,
	#[serde(default)]
	pub admin_groups: Option<Vec<String>>,
	#[serde(default)]
	pub item_list_page_length: Option<i64>,
	#[serde(default)]
	pub client_reassignment_enabled: Option<bool>,
	#[serde(default)]
	pub misassigned_client_ids: Option<Vec<i64>>,
	#[serde(default)]
	pub target_client_id: Option<i64>,
}

impl PolicyConfigLayer {
	pub fn merge(&mut self, other: PolicyConfigLayer) {
		if other.org_email_domain.is_some() {
			self.org_email_domain = other.org_email_domain;
		}
		if other.excluded_email_domains.is_some() {
			self.excluded_email_domains = other.excluded_email_domains;
		}
		if other.excluded_org_addresses.is_some() {
			self.excluded_org_addresses = other.excluded_org_addresses;
		}
		if other.preview_email_domain.is_some() {
			self.preview_email_domain = other.preview_email_domain;
		}
		if other.preview_last_name.is_some() {
			self.preview_last_name = other.preview_last_name;
		}
		if other.default_group_name.is_some() {
			self.default_group_name = other.default_group_name;
		}
		if other.admin_groups.is_some() {
			self.admin_groups = other.admin_groups;
		}
		if other.item_list_page_length.is_some() {
			self.item_list_page_length = other.item_list_page_length;
		}
		if other.client_reassignment_enabled.is_some() {
			self.client_reassignment_enabled = other.client_reassignment_enabled;
		}
		if other.misassigned_client_ids.is_some() {
			self.misassigned_client_ids = other.misassigned_client_ids;
		}
		if other.target_client_id.is_some() {
			self.target_client_id = other.target_client_id;
		}
	}

	pub fn finalize(self) -> PolicyConfig {
		PolicyConfig {
			org_email_domain: self
				.org_email_domain
				.map(|d| d.trim_start_matches('@').to_lowercase())
				.unwrap_or_else(|| DEFAULT_ORG_EMAIL_DOMAIN.to_string()),
			excluded_email_domains: self.excluded_email_domains.unwrap_or_default(),
			excluded_org_addresses: self
				.excluded_org_addresses
				.unwrap_or_default()
				.into_iter()
				.map(|a| a.to_lowercase())
				.collect(),
			preview_email_domain: self
				.preview_email_domain
				.unwrap_or_else(|| DEFAULT_PREVIEW_EMAIL_DOMAIN.to_string()),
			preview_last_name: self
				.preview_last_name
				.unwrap_or_else(|| DEFAULT_PREVIEW_LAST_NAME.to_string()),
			default_group_name: self
				.default_group_name
				.unwrap_or_else(|| DEFAULT_GROUP_NAME.to_string()),
			admin_groups: self.admin_groups.unwrap_or_else(default_admin_groups),
			item_list_page_length: self
				.item_list_page_length
				.unwrap_or(DEFAULT_ITEM_LIST_PAGE_LENGTH),
			client_reassignment_enabled: self.client_reassignment_enabled.unwrap_or(false),
			misassigned_client_ids: self.misassigned_client_ids.unwrap_or_default(),
			target_client_id: self.target_client_id,
		}
	}
}
