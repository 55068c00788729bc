// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Structured application log persistence.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppLogRecord {
	pub logged_at: DateTime<Utc>,
	pub level: String,
	pub target: String,
	pub message: String,
	pub fields: Option<serde_json::Value>,
}

#[derive(Clone)]
pub struct LogRepository {
	pool: SqlitePool,
}

impl LogRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	/// Insert all records in one transaction. Returns the number written.
	#[tracing::instrument(skip(self, records), fields(count = records.len()))]
	pub async fn insert_batch(&self, records: &[AppLogRecord]) -> Result<u64> {
		if records.is_empty() {
			return Ok(0);
		}

		let mut tx = self.pool.begin().await?;
		for record in records {
			let fields = record
				.fields
				.as_ref()
				.map(serde_json::to_string)
				.transpose()?;
			sqlx::query(
				r#"
				INSERT INTO application_log (logged_at, level, target, message, fields)
				VALUES (?, ?, ?, ?, ?)
				"#,
			)
			.bind(record.logged_at)
			.bind(&record.level)
			.bind(&record.target)
			.bind(&record.message)
			.bind(fields)
			.execute(&mut *tx)
			.await?;
		}
		tx.commit().await?;

		Ok(records.len() as u64)
	}

	/// Most recent records first.
	#[tracing::instrument(skip(self))]
	pub async fn recent(&self, limit: u32) -> Result<Vec<AppLogRecord>> {
		let rows = sqlx::query_as::<_, (DateTime<Utc>, String, String, String, Option<String>)>(
			r#"
			SELECT logged_at, level, target, message, fields
			FROM application_log
			ORDER BY id DESC
			LIMIT ?
			"#,
		)
		.bind(limit as i64)
		.fetch_all(&self.pool)
		.await?;

		rows.into_iter()
			.map(|(logged_at, level, target, message, fields)| {
				Ok(AppLogRecord {
					logged_at,
					level,
					target,
					message,
					fields: fields.as_deref().map(serde_json::from_str).transpose()?,
				})
			})
			.collect()
	}
}
