// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use sqlx::sqlite::SqlitePool;

use crate::error::Result;

const MIGRATIONS: &[(&str, &str)] = &[
	(
		"001_automation_control",
		include_str!("../migrations/001_automation_control.sql"),
	),
	("002_directory", include_str!("../migrations/002_directory.sql")),
	(
		"003_application_log",
		include_str!("../migrations/003_application_log.sql"),
	),
];

/// Run all schema migrations.
///
/// Every statement is `CREATE ... IF NOT EXISTS`, so this is safe to run on
/// each invocation.
#[tracing::instrument(skip(pool))]
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
	for (name, sql) in MIGRATIONS {
		for stmt in sql.split(';').filter(|s| !s.trim().is_empty()) {
			sqlx::query(stmt).execute(pool).await?;
		}
		tracing::debug!(migration = name, "migration applied");
	}
	Ok(())
}

/// Insert the run-state row for `job_id` if it does not exist yet.
///
/// An existing row keeps its interval and timestamps. Returns true when a
/// row was created.
#[tracing::instrument(skip(pool))]
pub async fn seed_run_state(pool: &SqlitePool, job_id: &str, interval_hours: i64) -> Result<bool> {
	let result = sqlx::query(
		r#"
		INSERT INTO automation_control (job_id, interval_hours, last_execute_at, last_check_at)
		VALUES (?, ?, NULL, NULL)
		ON CONFLICT(job_id) DO NOTHING
		"#,
	)
	.bind(job_id)
	.bind(interval_hours)
	.execute(pool)
	.await?;

	let created = result.rows_affected() > 0;
	if created {
		tracing::info!(job_id, interval_hours, "seeded run-state row");
	}
	Ok(created)
}
