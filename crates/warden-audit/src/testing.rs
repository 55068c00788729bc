// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! In-memory collaborators for audit tests.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use warden_db::{CandidateStore, CandidateUser, DbError, RunScheduleState, RunStateStore};
use warden_identity::{
	AuthenticationProfile, GroupRef, IdentityError, IdentityRecord, IdentityService,
};
use warden_report::{Report, ReportError, ReportSink};
use warden_smtp::SmtpError;

pub fn identity_record(id: i64, email: &str) -> IdentityRecord {
	IdentityRecord {
		id,
		first_name: "Test".to_string(),
		last_name: format!("User{id}"),
		email: email.to_string(),
		access_enabled: true,
		notes: String::new(),
		keywords: String::new(),
		item_list_page_length: 200,
		client: None,
	}
}

pub fn candidate(id: i64, email: &str) -> CandidateUser {
	CandidateUser::new(id, "Test", format!("User{id}"), email)
}

pub struct FakeRunStateStore {
	state: Mutex<Option<RunScheduleState>>,
	fail_writes: Mutex<bool>,
}

impl FakeRunStateStore {
	pub fn with_state(state: RunScheduleState) -> Self {
		Self {
			state: Mutex::new(Some(state)),
			fail_writes: Mutex::new(false),
		}
	}

	pub fn empty() -> Self {
		Self {
			state: Mutex::new(None),
			fail_writes: Mutex::new(false),
		}
	}

	pub fn fail_writes(&self) {
		*self.fail_writes.lock() = true;
	}

	pub fn state(&self) -> Option<RunScheduleState> {
		self.state.lock().clone()
	}

	fn update(
		&self,
		job_id: &str,
		f: impl FnOnce(&mut RunScheduleState),
	) -> warden_db::Result<()> {
		if *self.fail_writes.lock() {
			return Err(DbError::Internal("write refused".to_string()));
		}
		match self.state.lock().as_mut() {
			Some(state) if state.job_id == job_id => {
				f(state);
				Ok(())
			}
			_ => Err(DbError::NotFound(format!("run state {job_id}"))),
		}
	}
}

#[async_trait]
impl RunStateStore for FakeRunStateStore {
	async fn load(&self, job_id: &str) -> warden_db::Result<RunScheduleState> {
		self.state
			.lock()
			.clone()
			.filter(|s| s.job_id == job_id)
			.ok_or_else(|| DbError::NotFound(format!("run state {job_id}")))
	}

	async fn record_check(&self, job_id: &str, at: DateTime<Utc>) -> warden_db::Result<()> {
		self.update(job_id, |s| s.last_check_at = Some(at))
	}

	async fn record_run(&self, job_id: &str, at: DateTime<Utc>) -> warden_db::Result<()> {
		self.update(job_id, |s| s.last_execute_at = Some(at))
	}
}

#[derive(Default)]
pub struct FakeIdentityService {
	records: Mutex<HashMap<i64, IdentityRecord>>,
	profiles: Mutex<HashMap<i64, AuthenticationProfile>>,
	memberships: Mutex<HashMap<i64, Vec<i64>>>,
	groups: Mutex<HashMap<i64, GroupRef>>,
	failing: Mutex<HashSet<i64>>,
	updates: Mutex<usize>,
}

impl FakeIdentityService {
	pub fn put_record(&self, record: IdentityRecord) {
		self.records.lock().insert(record.id, record);
	}

	pub fn put_profile(&self, user_id: i64, profile: AuthenticationProfile) {
		self.profiles.lock().insert(user_id, profile);
	}

	pub fn put_group(&self, id: i64, name: &str) {
		self.groups.lock().insert(
			id,
			GroupRef {
				id,
				name: name.to_string(),
			},
		);
	}

	pub fn put_membership(&self, user_id: i64, group_ids: Vec<i64>) {
		self.memberships.lock().insert(user_id, group_ids);
	}

	/// Every call touching this user fails.
	pub fn fail_user(&self, user_id: i64) {
		self.failing.lock().insert(user_id);
	}

	pub fn record(&self, user_id: i64) -> Option<IdentityRecord> {
		self.records.lock().get(&user_id).cloned()
	}

	pub fn update_count(&self) -> usize {
		*self.updates.lock()
	}

	fn check(&self, user_id: i64) -> warden_identity::Result<()> {
		if self.failing.lock().contains(&user_id) {
			return Err(IdentityError::ApiError {
				status: 500,
				message: format!("upstream failure for user {user_id}"),
			});
		}
		Ok(())
	}
}

#[async_trait]
impl IdentityService for FakeIdentityService {
	async fn read_identity(&self, user_id: i64) -> warden_identity::Result<IdentityRecord> {
		self.check(user_id)?;
		self.record(user_id)
			.ok_or_else(|| IdentityError::NotFound(format!("user {user_id}")))
	}

	async fn update_identity(
		&self,
		user_id: i64,
		record: &IdentityRecord,
	) -> warden_identity::Result<()> {
		self.check(user_id)?;
		self.records.lock().insert(user_id, record.clone());
		*self.updates.lock() += 1;
		Ok(())
	}

	async fn read_authentication_profile(
		&self,
		user_id: i64,
	) -> warden_identity::Result<AuthenticationProfile> {
		self.check(user_id)?;
		self.profiles
			.lock()
			.get(&user_id)
			.cloned()
			.ok_or_else(|| IdentityError::NotFound(format!("login profile {user_id}")))
	}

	async fn read_groups_of(&self, user_id: i64) -> warden_identity::Result<Vec<i64>> {
		self.check(user_id)?;
		Ok(self
			.memberships
			.lock()
			.get(&user_id)
			.cloned()
			.unwrap_or_default())
	}

	async fn read_group(&self, group_id: i64) -> warden_identity::Result<GroupRef> {
		self.groups
			.lock()
			.get(&group_id)
			.cloned()
			.ok_or_else(|| IdentityError::NotFound(format!("group {group_id}")))
	}
}

/// Candidate sets keyed by query. `None` makes the query fail.
#[derive(Default)]
pub struct FakeCandidateStore {
	pub without_groups: Option<Vec<CandidateUser>>,
	pub org: Option<Vec<CandidateUser>>,
	pub non_org: Option<Vec<CandidateUser>>,
	pub item_list: Option<Vec<CandidateUser>>,
	pub outside_client: Option<Vec<CandidateUser>>,
	pub fail_audit_trail: bool,
	pub disabled: Mutex<Vec<i64>>,
}

impl FakeCandidateStore {
	pub fn all_empty() -> Self {
		Self {
			without_groups: Some(Vec::new()),
			org: Some(Vec::new()),
			non_org: Some(Vec::new()),
			item_list: Some(Vec::new()),
			outside_client: Some(Vec::new()),
			..Default::default()
		}
	}

	pub fn disabled(&self) -> Vec<i64> {
		self.disabled.lock().clone()
	}

	fn fetch(set: &Option<Vec<CandidateUser>>, name: &str) -> warden_db::Result<Vec<CandidateUser>> {
		set.clone()
			.ok_or_else(|| DbError::Internal(format!("{name} query failed")))
	}
}

#[async_trait]
impl CandidateStore for FakeCandidateStore {
	async fn users_without_groups(&self) -> warden_db::Result<Vec<CandidateUser>> {
		Self::fetch(&self.without_groups, "users_without_groups")
	}

	async fn org_users(&self) -> warden_db::Result<Vec<CandidateUser>> {
		Self::fetch(&self.org, "org_users")
	}

	async fn non_org_users(&self) -> warden_db::Result<Vec<CandidateUser>> {
		Self::fetch(&self.non_org, "non_org_users")
	}

	async fn item_list_users(&self) -> warden_db::Result<Vec<CandidateUser>> {
		Self::fetch(&self.item_list, "item_list_users")
	}

	async fn org_users_outside_client(
		&self,
		_target_client_id: i64,
	) -> warden_db::Result<Vec<CandidateUser>> {
		Self::fetch(&self.outside_client, "org_users_outside_client")
	}

	async fn record_disabled(&self, user_id: i64) -> warden_db::Result<()> {
		if self.fail_audit_trail {
			return Err(DbError::Internal("audit trail insert failed".to_string()));
		}
		self.disabled.lock().push(user_id);
		Ok(())
	}
}

#[derive(Default)]
pub struct RecordingSink {
	pub fail: bool,
	reports: Mutex<Vec<Report>>,
}

impl RecordingSink {
	pub fn failing() -> Self {
		Self {
			fail: true,
			..Default::default()
		}
	}

	pub fn reports(&self) -> Vec<Report> {
		self.reports.lock().clone()
	}
}

#[async_trait]
impl ReportSink for RecordingSink {
	async fn deliver(&self, report: &Report) -> Result<(), ReportError> {
		self.reports.lock().push(report.clone());
		if self.fail {
			return Err(SmtpError::Connection("relay unreachable".to_string()).into());
		}
		Ok(())
	}
}
