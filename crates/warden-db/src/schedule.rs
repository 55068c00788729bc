// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Persisted run-schedule state, one row per job in `automation_control`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::error::{DbError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunScheduleState {
	pub job_id: String,
	pub interval_hours: i64,
	/// `None` when the job has never completed a run.
	pub last_execute_at: Option<DateTime<Utc>>,
	pub last_check_at: Option<DateTime<Utc>>,
}

#[derive(Clone)]
pub struct RunStateRepository {
	pool: SqlitePool,
}

impl RunStateRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	/// Load the run-state row. A missing row is `DbError::NotFound`.
	#[tracing::instrument(skip(self))]
	pub async fn load(&self, job_id: &str) -> Result<RunScheduleState> {
		let row = sqlx::query_as::<_, (String, i64, Option<DateTime<Utc>>, Option<DateTime<Utc>>)>(
			r#"
			SELECT job_id, interval_hours, last_execute_at, last_check_at
			FROM automation_control
			WHERE job_id = ?
			"#,
		)
		.bind(job_id)
		.fetch_optional(&self.pool)
		.await?;

		row.map(
			|(job_id, interval_hours, last_execute_at, last_check_at)| RunScheduleState {
				job_id,
				interval_hours,
				last_execute_at,
				last_check_at,
			},
		)
		.ok_or_else(|| DbError::NotFound(format!("run state for job {job_id}")))
	}

	#[tracing::instrument(skip(self))]
	pub async fn record_check(&self, job_id: &str, at: DateTime<Utc>) -> Result<()> {
		let result = sqlx::query("UPDATE automation_control SET last_check_at = ? WHERE job_id = ?")
			.bind(at)
			.bind(job_id)
			.execute(&self.pool)
			.await?;

		if result.rows_affected() == 0 {
			return Err(DbError::NotFound(format!("run state for job {job_id}")));
		}
		Ok(())
	}

	#[tracing::instrument(skip(self))]
	pub async fn record_run(&self, job_id: &str, at: DateTime<Utc>) -> Result<()> {
		let result =
			sqlx::query("UPDATE automation_control SET last_execute_at = ? WHERE job_id = ?")
				.bind(at)
				.bind(job_id)
				.execute(&self.pool)
				.await?;

		if result.rows_affected() == 0 {
			return Err(DbError::NotFound(format!("run state for job {job_id}")));
		}
		Ok(())
	}
}

#[async_trait]
pub trait RunStateStore: Send + Sync {
	async fn load(&self, job_id: &str) -> Result<RunScheduleState>;
	async fn record_check(&self, job_id: &str, at: DateTime<Utc>) -> Result<()>;
	async fn record_run(&self, job_id: &str, at: DateTime<Utc>) -> Result<()>;
}

#[async_trait]
impl RunStateStore for RunStateRepository {
	async fn load(&self, job_id: &str) -> Result<RunScheduleState> {
		self.load(job_id).await
	}

	async fn record_check(&self, job_id: &str, at: DateTime<Utc>) -> Result<()> {
		self.record_check(job_id, at).await
	}

	async fn record_run(&self, job_id: &str, at: DateTime<Utc>) -> Result<()> {
		self.record_run(job_id, at).await
	}
}
