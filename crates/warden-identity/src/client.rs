// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! HTTP implementation of [`IdentityService`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::{debug, error, instrument, trace};
use warden_common_secret::SecretString;

use crate::error::{IdentityError, Result};
use crate::service::IdentityService;
use crate::types::{AuthenticationProfile, GroupRef, IdentityRecord};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Returns the standard user agent, `warden/{version}`.
pub fn user_agent() -> String {
	format!("warden/{}", env!("CARGO_PKG_VERSION"))
}

/// HTTP client builder with the standard user agent.
pub fn builder() -> ClientBuilder {
	Client::builder().user_agent(user_agent())
}

#[derive(Debug, Clone)]
pub struct HttpIdentityClient {
	http_client: Client,
	base_url: String,
	api_token: Option<SecretString>,
}

impl HttpIdentityClient {
	pub fn new(base_url: impl Into<String>) -> Result<Self> {
		Self::with_timeout(base_url, DEFAULT_TIMEOUT)
	}

	pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
		let http_client = builder()
			.timeout(timeout)
			.build()
			.map_err(|e| IdentityError::Config(format!("failed to build HTTP client: {e}")))?;

		Ok(Self {
			http_client,
			base_url: base_url.into().trim_end_matches('/').to_string(),
			api_token: None,
		})
	}

	pub fn with_api_token(mut self, token: SecretString) -> Self {
		self.api_token = Some(token);
		self
	}

	fn url(&self, path: &str) -> String {
		format!("{}{}", self.base_url, path)
	}

	fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
		match &self.api_token {
			Some(token) => request.bearer_auth(token.expose()),
			None => request,
		}
	}

	async fn send(&self, request: RequestBuilder, what: &str) -> Result<reqwest::Response> {
		let response = self.authorize(request).send().await.map_err(|e| {
			if e.is_timeout() {
				error!(resource = what, "identity request timed out");
				return IdentityError::Timeout;
			}
			error!(resource = what, error = %e, "network error during identity request");
			IdentityError::Network(e)
		})?;

		let status = response.status();
		debug!(resource = what, status = %status, "identity service responded");

		if status.is_success() {
			return Ok(response);
		}

		let status_code = status.as_u16();
		let body = response.text().await.unwrap_or_default();
		match status_code {
			401 | 403 => {
				error!(status = status_code, "identity service rejected credentials");
				Err(IdentityError::Unauthorized)
			}
			404 => Err(IdentityError::NotFound(what.to_string())),
			_ => {
				error!(status = status_code, body = %body, "identity service error");
				Err(IdentityError::ApiError {
					status: status_code,
					message: body,
				})
			}
		}
	}

	async fn get_json<T: DeserializeOwned>(&self, path: &str, what: &str) -> Result<T> {
		let response = self.send(self.http_client.get(self.url(path)), what).await?;
		let body = response.text().await?;
		trace!(resource = what, body = %body, "response body");

		serde_json::from_str(&body).map_err(|e| {
			error!(resource = what, error = %e, "failed to parse identity response");
			IdentityError::InvalidResponse(format!("{what}: {e}"))
		})
	}

	#[instrument(skip(self))]
	pub async fn read_identity(&self, id: i64) -> Result<IdentityRecord> {
		self.get_json(&format!("/users/{id}"), &format!("user {id}"))
			.await
	}

	#[instrument(skip(self, record))]
	pub async fn update_identity(&self, id: i64, record: &IdentityRecord) -> Result<()> {
		let request = self.http_client.put(self.url(&format!("/users/{id}"))).json(record);
		self.send(request, &format!("user {id}")).await?;
		debug!(user_id = id, "identity updated");
		Ok(())
	}

	#[instrument(skip(self))]
	pub async fn read_authentication_profile(&self, id: i64) -> Result<AuthenticationProfile> {
		self.get_json(
			&format!("/users/{id}/login-profile"),
			&format!("login profile of user {id}"),
		)
		.await
	}

	#[instrument(skip(self))]
	pub async fn read_groups_of(&self, id: i64) -> Result<Vec<i64>> {
		self.get_json(
			&format!("/users/{id}/groups"),
			&format!("groups of user {id}"),
		)
		.await
	}

	#[instrument(skip(self))]
	pub async fn read_group(&self, group_id: i64) -> Result<GroupRef> {
		self.get_json(&format!("/groups/{group_id}"), &format!("group {group_id}"))
			.await
	}
}

#[async_trait]
impl IdentityService for HttpIdentityClient {
	async fn read_identity(&self, id: i64) -> Result<IdentityRecord> {
		self.read_identity(id).await
	}

	async fn update_identity(&self, id: i64, record: &IdentityRecord) -> Result<()> {
		self.update_identity(id, record).await
	}

	async fn read_authentication_profile(&self, id: i64) -> Result<AuthenticationProfile> {
		self.read_authentication_profile(id).await
	}

	async fn read_groups_of(&self, id: i64) -> Result<Vec<i64>> {
		self.read_groups_of(id).await
	}

	async fn read_group(&self, group_id: i64) -> Result<GroupRef> {
		self.read_group(group_id).await
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::types::ClientAssignment;
	use serde_json::json;
	use wiremock::matchers::{body_json, header, method, path};
	use wiremock::{Mock, MockServer, ResponseTemplate};

	fn record_json() -> serde_json::Value {
		json!({
			"id": 1001,
			"first_name": "Grace",
			"last_name": "Hopper",
			"email": "grace@example.com",
			"access_enabled": true,
			"notes": "",
			"keywords": "",
			"item_list_page_length": 50,
			"client": { "id": 77, "name": "Litigation", "secured": true }
		})
	}

	#[test]
	fn test_user_agent_format() {
		let ua = user_agent();
		assert!(ua.starts_with("warden/"));
		assert_eq!(ua.split('/').count(), 2);
	}

	#[test]
	fn test_base_url_trailing_slash_trimmed() {
		let client = HttpIdentityClient::new("https://idp.example.com/api/").unwrap();
		assert_eq!(client.url("/users/1"), "https://idp.example.com/api/users/1");
	}

	#[tokio::test]
	async fn test_read_identity_sends_bearer_token() {
		let server = MockServer::start().await;
		Mock::given(method("GET"))
			.and(path("/users/1001"))
			.and(header("authorization", "Bearer test-token"))
			.respond_with(ResponseTemplate::new(200).set_body_json(record_json()))
			.mount(&server)
			.await;

		let client = HttpIdentityClient::new(server.uri())
			.unwrap()
			.with_api_token(SecretString::from("test-token"));
		let record = client.read_identity(1001).await.unwrap();

		assert_eq!(record.first_name, "Grace");
		assert_eq!(
			record.client,
			Some(ClientAssignment {
				id: 77,
				name: Some("Litigation".to_string()),
				secured: true,
			})
		);
	}

	#[tokio::test]
	async fn test_update_identity_puts_record() {
		let server = MockServer::start().await;
		let mut record: IdentityRecord = serde_json::from_value(record_json()).unwrap();
		record.access_enabled = false;

		Mock::given(method("PUT"))
			.and(path("/users/1001"))
			.and(body_json(serde_json::to_value(&record).unwrap()))
			.respond_with(ResponseTemplate::new(204))
			.expect(1)
			.mount(&server)
			.await;

		let client = HttpIdentityClient::new(server.uri()).unwrap();
		client.update_identity(1001, &record).await.unwrap();
	}

	#[tokio::test]
	async fn test_read_groups_and_group() {
		let server = MockServer::start().await;
		Mock::given(method("GET"))
			.and(path("/users/5/groups"))
			.respond_with(ResponseTemplate::new(200).set_body_json(json!([3, 9])))
			.mount(&server)
			.await;
		Mock::given(method("GET"))
			.and(path("/groups/9"))
			.respond_with(
				ResponseTemplate::new(200)
					.set_body_json(json!({ "id": 9, "name": "System Administrators" })),
			)
			.mount(&server)
			.await;

		let client = HttpIdentityClient::new(server.uri()).unwrap();
		assert_eq!(client.read_groups_of(5).await.unwrap(), vec![3, 9]);
		assert_eq!(
			client.read_group(9).await.unwrap(),
			GroupRef {
				id: 9,
				name: "System Administrators".to_string()
			}
		);
	}

	#[tokio::test]
	async fn test_read_authentication_profile() {
		let server = MockServer::start().await;
		Mock::given(method("GET"))
			.and(path("/users/5/login-profile"))
			.respond_with(ResponseTemplate::new(200).set_body_json(json!({
				"password": { "is_enabled": true, "two_factor_protocol": "Email" },
				"openid_connect": [{ "provider_name": "Okta-Standard", "is_enabled": true }]
			})))
			.mount(&server)
			.await;

		let client = HttpIdentityClient::new(server.uri()).unwrap();
		let profile = client.read_authentication_profile(5).await.unwrap();
		assert!(profile.password.unwrap().has_second_factor());
		assert_eq!(profile.openid_connect[0].provider_name, "Okta-Standard");
	}

	#[tokio::test]
	async fn test_status_mapping() {
		let server = MockServer::start().await;
		Mock::given(method("GET"))
			.and(path("/users/1"))
			.respond_with(ResponseTemplate::new(401))
			.mount(&server)
			.await;
		Mock::given(method("GET"))
			.and(path("/users/2"))
			.respond_with(ResponseTemplate::new(404))
			.mount(&server)
			.await;
		Mock::given(method("GET"))
			.and(path("/users/3"))
			.respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
			.mount(&server)
			.await;
		Mock::given(method("GET"))
			.and(path("/users/4"))
			.respond_with(ResponseTemplate::new(200).set_body_string("not json"))
			.mount(&server)
			.await;

		let client = HttpIdentityClient::new(server.uri()).unwrap();
		assert!(matches!(
			client.read_identity(1).await,
			Err(IdentityError::Unauthorized)
		));
		assert!(matches!(
			client.read_identity(2).await,
			Err(IdentityError::NotFound(_))
		));
		match client.read_identity(3).await {
			Err(IdentityError::ApiError { status, message }) => {
				assert_eq!(status, 503);
				assert_eq!(message, "maintenance");
			}
			other => panic!("expected ApiError, got {other:?}"),
		}
		assert!(matches!(
			client.read_identity(4).await,
			Err(IdentityError::InvalidResponse(_))
		));
	}

	#[tokio::test]
	async fn test_timeout_maps_to_timeout_error() {
		let server = MockServer::start().await;
		Mock::given(method("GET"))
			.and(path("/users/1"))
			.respond_with(
				ResponseTemplate::new(200)
					.set_body_json(record_json())
					.set_delay(Duration::from_millis(500)),
			)
			.mount(&server)
			.await;

		let client =
			HttpIdentityClient::with_timeout(server.uri(), Duration::from_millis(50)).unwrap();
		assert!(matches!(
			client.read_identity(1).await,
			Err(IdentityError::Timeout)
		));
	}
}
