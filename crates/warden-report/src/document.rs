// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Report documents, one constructor per audit phase.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
	DisabledUsers,
	LoginMethod,
	SecondFactor,
	ItemListLength,
	ClientReassignment,
}

impl ReportKind {
	pub fn as_str(&self) -> &'static str {
		match self {
			ReportKind::DisabledUsers => "disabled_users",
			ReportKind::LoginMethod => "login_method",
			ReportKind::SecondFactor => "second_factor",
			ReportKind::ItemListLength => "item_list_length",
			ReportKind::ClientReassignment => "client_reassignment",
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRow {
	pub user_id: i64,
	pub first_name: String,
	pub last_name: String,
	pub email: String,
	pub issue: Option<String>,
	/// Rendered with emphasis (login report: users with extra providers).
	#[serde(default)]
	pub highlighted: bool,
}

impl ReportRow {
	pub fn new(
		user_id: i64,
		first_name: impl Into<String>,
		last_name: impl Into<String>,
		email: impl Into<String>,
	) -> Self {
		Self {
			user_id,
			first_name: first_name.into(),
			last_name: last_name.into(),
			email: email.into(),
			issue: None,
			highlighted: false,
		}
	}

	pub fn with_issue(mut self, issue: impl Into<String>) -> Self {
		self.issue = Some(issue.into());
		self
	}

	pub fn highlighted(mut self, highlighted: bool) -> Self {
		self.highlighted = highlighted;
		self
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
	pub kind: ReportKind,
	pub subject: String,
	pub intro: String,
	pub date_line: String,
	pub show_issue_column: bool,
	pub rows: Vec<ReportRow>,
	/// Tallies printed under a "Summary:" heading.
	pub summary: Vec<String>,
	pub total_line: String,
}

fn long_date(date: NaiveDate) -> String {
	date.format("%B %d, %Y").to_string()
}

impl Report {
	pub fn disabled_users(rows: Vec<ReportRow>, date: NaiveDate) -> Self {
		Self {
			kind: ReportKind::DisabledUsers,
			subject: "Users With No Groups Report".to_string(),
			intro: "The following users have been disabled due to having no active groups:"
				.to_string(),
			date_line: format!("Users disabled on {}", long_date(date)),
			show_issue_column: false,
			total_line: format!("Total users disabled: {}", rows.len()),
			summary: Vec::new(),
			rows,
		}
	}

	/// `multiple_providers` and `no_valid_provider` are counts over `rows`.
	pub fn login_method(
		rows: Vec<ReportRow>,
		multiple_providers: usize,
		no_valid_provider: usize,
		date: NaiveDate,
	) -> Self {
		Self {
			kind: ReportKind::LoginMethod,
			subject: "Org Users With Invalid Login Method".to_string(),
			intro: "The following users have a problem with the login method on their \
			        accounts. These need to be reviewed and resolved."
				.to_string(),
			date_line: format!("Login validation performed on {}", long_date(date)),
			show_issue_column: true,
			summary: vec![
				format!("Users with multiple providers: {multiple_providers}"),
				format!("Users with no valid provider: {no_valid_provider}"),
			],
			total_line: format!("Total users with issues: {}", rows.len()),
			rows,
		}
	}

	pub fn second_factor(rows: Vec<ReportRow>, date: NaiveDate) -> Self {
		Self {
			kind: ReportKind::SecondFactor,
			subject: "Users That Require 2FA Setup".to_string(),
			intro: "The following external users need to have 2FA enabled on their accounts."
				.to_string(),
			date_line: format!(
				"Password authentication validation performed on {}",
				long_date(date)
			),
			show_issue_column: true,
			summary: Vec::new(),
			total_line: format!(
				"Total users with password auth without 2FA: {}",
				rows.len()
			),
			rows,
		}
	}

	pub fn item_list_length(rows: Vec<ReportRow>, page_length: i64, date: NaiveDate) -> Self {
		Self {
			kind: ReportKind::ItemListLength,
			subject: format!(
				"Item List Page Length Update - {}",
				date.format("%m/%d/%Y")
			),
			intro: format!(
				"The following users had their Item List Page Length updated to {page_length}:"
			),
			date_line: format!("Item List Page Length updated on {}", long_date(date)),
			show_issue_column: false,
			summary: Vec::new(),
			total_line: format!("Total users updated: {}", rows.len()),
			rows,
		}
	}

	pub fn client_reassignment(rows: Vec<ReportRow>, target_client_id: i64, date: NaiveDate) -> Self {
		Self {
			kind: ReportKind::ClientReassignment,
			subject: "Users Reassigned To Client".to_string(),
			intro: format!(
				"The following users were reassigned to client {target_client_id}:"
			),
			date_line: format!("Client assignment updated on {}", long_date(date)),
			show_issue_column: true,
			summary: Vec::new(),
			total_line: format!("Total users reassigned: {}", rows.len()),
			rows,
		}
	}

	pub fn is_empty(&self) -> bool {
		self.rows.is_empty()
	}
}

/// `"<LABEL> - <subject>"` when a label is configured.
pub fn prefixed_subject(environment_label: Option<&str>, subject: &str) -> String {
	match environment_label.map(str::trim).filter(|l| !l.is_empty()) {
		Some(label) => format!("{label} - {subject}"),
		None => subject.to_string(),
	}
}
