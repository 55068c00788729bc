// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Candidate-set queries over the directory mirror, plus the disablement
//! audit trail.

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::error::Result;

/// One row of a candidate set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateUser {
	pub id: i64,
	pub first_name: String,
	pub last_name: String,
	pub email: String,
}

impl CandidateUser {
	pub fn new(
		id: i64,
		first_name: impl Into<String>,
		last_name: impl Into<String>,
		email: impl Into<String>,
	) -> Self {
		Self {
			id,
			first_name: first_name.into(),
			last_name: last_name.into(),
			email: email.into(),
		}
	}
}

/// Policy parameters that shape the candidate queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateFilter {
	/// Lowercase, without a leading `@`.
	pub org_email_domain: String,
	pub excluded_email_domains: Vec<String>,
	pub excluded_org_addresses: Vec<String>,
	pub preview_email_domain: String,
	pub preview_last_name: String,
	pub default_group_name: String,
	pub item_list_page_length: i64,
}

impl Default for CandidateFilter {
	fn default() -> Self {
		Self {
			org_email_domain: "example.com".to_string(),
			excluded_email_domains: Vec::new(),
			excluded_org_addresses: Vec::new(),
			preview_email_domain: "previewuser.com".to_string(),
			preview_last_name: "Preview".to_string(),
			default_group_name: "Everyone".to_string(),
			item_list_page_length: 200,
		}
	}
}

type CandidateRow = (i64, String, String, String);

const SELECT_USERS: &str =
	"SELECT DISTINCT u.id, u.first_name, u.last_name, u.email FROM directory_users u";

fn into_candidates(rows: Vec<CandidateRow>) -> Vec<CandidateUser> {
	rows.into_iter()
		.map(|(id, first_name, last_name, email)| CandidateUser {
			id,
			first_name,
			last_name,
			email,
		})
		.collect()
}

fn domain_suffix(domain: &str) -> String {
	format!("%@{}", domain.trim_start_matches('@').to_lowercase())
}

#[derive(Clone)]
pub struct CandidateRepository {
	pool: SqlitePool,
	filter: CandidateFilter,
}

impl CandidateRepository {
	pub fn new(pool: SqlitePool, filter: CandidateFilter) -> Self {
		Self { pool, filter }
	}

	async fn fetch(&self, mut qb: QueryBuilder<'_, Sqlite>) -> Result<Vec<CandidateUser>> {
		qb.push(" ORDER BY u.id");
		let rows: Vec<CandidateRow> = qb.build_query_as().fetch_all(&self.pool).await?;
		Ok(into_candidates(rows))
	}

	fn push_org_population(&self, qb: &mut QueryBuilder<'_, Sqlite>) {
		qb.push(" WHERE lower(u.email) LIKE ")
			.push_bind(domain_suffix(&self.filter.org_email_domain))
			.push(" AND u.access_enabled = 1");
		if !self.filter.excluded_org_addresses.is_empty() {
			qb.push(" AND lower(u.email) NOT IN (");
			let mut separated = qb.separated(", ");
			for address in &self.filter.excluded_org_addresses {
				separated.push_bind(address.to_lowercase());
			}
			separated.push_unseparated(")");
		}
	}

	/// Enabled users whose only membership is the default catch-all group.
	#[tracing::instrument(skip(self))]
	pub async fn users_without_groups(&self) -> Result<Vec<CandidateUser>> {
		let mut qb = QueryBuilder::<Sqlite>::new(SELECT_USERS);
		qb.push(
			r#"
			JOIN directory_group_members m ON m.user_id = u.id
			JOIN directory_groups g ON g.id = m.group_id
			WHERE u.access_enabled = 1
			AND (SELECT COUNT(*) FROM directory_group_members m2 WHERE m2.user_id = u.id) = 1
			AND g.name = "#,
		)
		.push_bind(self.filter.default_group_name.clone());
		for domain in &self.filter.excluded_email_domains {
			qb.push(" AND lower(u.email) NOT LIKE ")
				.push_bind(format!("%{}%", domain.to_lowercase()));
		}
		self.fetch(qb).await
	}

	/// Enabled users in the organization's email domain, minus exempt mailboxes.
	#[tracing::instrument(skip(self))]
	pub async fn org_users(&self) -> Result<Vec<CandidateUser>> {
		let mut qb = QueryBuilder::<Sqlite>::new(SELECT_USERS);
		self.push_org_population(&mut qb);
		self.fetch(qb).await
	}

	/// Users outside the organization, preview, and excluded domains.
	#[tracing::instrument(skip(self))]
	pub async fn non_org_users(&self) -> Result<Vec<CandidateUser>> {
		let mut qb = QueryBuilder::<Sqlite>::new(SELECT_USERS);
		qb.push(" WHERE lower(u.email) NOT LIKE ")
			.push_bind(domain_suffix(&self.filter.org_email_domain))
			.push(" AND lower(u.email) NOT LIKE ")
			.push_bind(domain_suffix(&self.filter.preview_email_domain));
		for domain in &self.filter.excluded_email_domains {
			qb.push(" AND lower(u.email) NOT LIKE ")
				.push_bind(domain_suffix(domain));
		}
		self.fetch(qb).await
	}

	/// Non-preview users whose item-list page length differs from policy.
	#[tracing::instrument(skip(self))]
	pub async fn item_list_users(&self) -> Result<Vec<CandidateUser>> {
		let mut qb = QueryBuilder::<Sqlite>::new(SELECT_USERS);
		qb.push(" WHERE u.item_list_page_length <> ")
			.push_bind(self.filter.item_list_page_length)
			.push(" AND u.last_name NOT LIKE ")
			.push_bind(self.filter.preview_last_name.clone());
		self.fetch(qb).await
	}

	/// Organization users not assigned to `target_client_id`.
	#[tracing::instrument(skip(self))]
	pub async fn org_users_outside_client(&self, target_client_id: i64) -> Result<Vec<CandidateUser>> {
		let mut qb = QueryBuilder::<Sqlite>::new(SELECT_USERS);
		self.push_org_population(&mut qb);
		qb.push(" AND (u.client_id IS NULL OR u.client_id <> ")
			.push_bind(target_client_id)
			.push(")");
		self.fetch(qb).await
	}

	/// Append a row to the disablement audit trail.
	#[tracing::instrument(skip(self))]
	pub async fn record_disabled(&self, user_id: i64) -> Result<()> {
		sqlx::query("INSERT INTO disabled_users (user_id, disabled_at) VALUES (?, ?)")
			.bind(user_id)
			.bind(Utc::now())
			.execute(&self.pool)
			.await?;
		Ok(())
	}
}

#[async_trait]
pub trait CandidateStore: Send + Sync {
	async fn users_without_groups(&self) -> Result<Vec<CandidateUser>>;
	async fn org_users(&self) -> Result<Vec<CandidateUser>>;
	async fn non_org_users(&self) -> Result<Vec<CandidateUser>>;
	async fn item_list_users(&self) -> Result<Vec<CandidateUser>>;
	async fn org_users_outside_client(&self, target_client_id: i64) -> Result<Vec<CandidateUser>>;
	async fn record_disabled(&self, user_id: i64) -> Result<()>;
}

#[async_trait]
impl CandidateStore for CandidateRepository {
	async fn users_without_groups(&self) -> Result<Vec<CandidateUser>> {
		self.users_without_groups().await
	}

	async fn org_users(&self) -> Result<Vec<CandidateUser>> {
		self.org_users().await
	}

	async fn non_org_users(&self) -> Result<Vec<CandidateUser>> {
		self.non_org_users().await
	}

	async fn item_list_users(&self) -> Result<Vec<CandidateUser>> {
		self.item_list_users().await
	}

	async fn org_users_outside_client(&self, target_client_id: i64) -> Result<Vec<CandidateUser>> {
		self.org_users_outside_client(target_client_id).await
	}

	async fn record_disabled(&self, user_id: i64) -> Result<()> {
		self.record_disabled(user_id).await
	}
}
