// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sections. Each section has a partial `*Layer` used for
//! merging sources and a resolved runtime type.

mod database;
mod identity;
mod logging;
mod policy;
mod report;
mod schedule;
mod smtp;

pub use database::{DatabaseConfig, DatabaseConfigLayer};
pub use identity::{IdentityConfig, IdentityConfigLayer};
pub use logging::{LoggingConfig, LoggingConfigLayer};
pub use policy::{PolicyConfig, PolicyConfigLayer};
pub use report::{ReportConfig, ReportConfigLayer};
pub use schedule::{ScheduleConfig, ScheduleConfigLayer, DEFAULT_JOB_ID};
pub use smtp::{SmtpConfig, SmtpConfigLayer};
