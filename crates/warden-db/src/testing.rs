// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use sqlx::sqlite::SqlitePool;

pub async fn create_test_pool() -> SqlitePool {
	SqlitePool::connect(":memory:").await.unwrap()
}

pub struct TestUser {
	pub id: i64,
	pub first_name: String,
	pub last_name: String,
	pub email: String,
	pub access_enabled: bool,
	pub item_list_page_length: i64,
	pub client_id: Option<i64>,
}

impl TestUser {
	pub fn new(id: i64, email: &str) -> Self {
		Self {
			id,
			first_name: format!("First{id}"),
			last_name: format!("Last{id}"),
			email: email.to_string(),
			access_enabled: true,
			item_list_page_length: 200,
			client_id: None,
		}
	}

	pub fn disabled(mut self) -> Self {
		self.access_enabled = false;
		self
	}

	pub fn page_length(mut self, length: i64) -> Self {
		self.item_list_page_length = length;
		self
	}

	pub fn last_name(mut self, name: &str) -> Self {
		self.last_name = name.to_string();
		self
	}

	pub fn client(mut self, client_id: i64) -> Self {
		self.client_id = Some(client_id);
		self
	}
}

pub async fn insert_user(pool: &SqlitePool, user: TestUser) {
	sqlx::query(
		r#"
		INSERT INTO directory_users (id, first_name, last_name, email, access_enabled, item_list_page_length, client_id)
		VALUES (?, ?, ?, ?, ?, ?, ?)
		"#,
	)
	.bind(user.id)
	.bind(&user.first_name)
	.bind(&user.last_name)
	.bind(&user.email)
	.bind(user.access_enabled)
	.bind(user.item_list_page_length)
	.bind(user.client_id)
	.execute(pool)
	.await
	.unwrap();
}

pub async fn insert_group(pool: &SqlitePool, id: i64, name: &str) {
	sqlx::query("INSERT INTO directory_groups (id, name) VALUES (?, ?)")
		.bind(id)
		.bind(name)
		.execute(pool)
		.await
		.unwrap();
}

pub async fn insert_membership(pool: &SqlitePool, user_id: i64, group_id: i64) {
	sqlx::query("INSERT INTO directory_group_members (user_id, group_id) VALUES (?, ?)")
		.bind(user_id)
		.bind(group_id)
		.execute(pool)
		.await
		.unwrap();
}
