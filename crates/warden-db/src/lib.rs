// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! SQLite persistence for the directory hygiene audit: run-schedule state,
//! candidate-set queries, the disablement audit trail, and application logs.

pub mod app_log;
pub mod candidate;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod schedule;

#[cfg(test)]
pub mod testing;

pub use app_log::{AppLogRecord, LogRepository};
pub use candidate::{CandidateFilter, CandidateRepository, CandidateStore, CandidateUser};
pub use error::{DbError, Result};
pub use migrations::{run_migrations, seed_run_state};
pub use pool::create_pool;
pub use schedule::{RunScheduleState, RunStateRepository, RunStateStore};
