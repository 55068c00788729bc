// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Wire types exchanged with the identity service.

use serde::{Deserialize, Serialize};

/// A user account as held by the identity service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityRecord {
	pub id: i64,
	pub first_name: String,
	pub last_name: String,
	pub email: String,
	pub access_enabled: bool,
	#[serde(default)]
	pub notes: String,
	#[serde(default)]
	pub keywords: String,
	pub item_list_page_length: i64,
	#[serde(default)]
	pub client: Option<ClientAssignment>,
}

/// The organizational client an account is filed under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientAssignment {
	pub id: i64,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	#[serde(default)]
	pub secured: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupRef {
	pub id: i64,
	pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordMethod {
	pub is_enabled: bool,
	/// Second-factor protocol marker. Blank counts as unset.
	#[serde(default)]
	pub two_factor_protocol: Option<String>,
}

impl PasswordMethod {
	pub fn has_second_factor(&self) -> bool {
		self.two_factor_protocol
			.as_deref()
			.is_some_and(|p| !p.trim().is_empty())
	}
}

/// A non-federated credential method. Presence alone is what matters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialMethod {
	#[serde(default)]
	pub is_enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FederatedMethod {
	pub provider_name: String,
	pub is_enabled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FederationProtocol {
	OpenIdConnect,
	Saml2,
}

impl FederationProtocol {
	/// Label used when describing an offending provider, e.g. `OpenIDConnect: Google`.
	pub fn label(&self) -> &'static str {
		match self {
			FederationProtocol::OpenIdConnect => "OpenIDConnect",
			FederationProtocol::Saml2 => "SAML2",
		}
	}
}

impl std::fmt::Display for FederationProtocol {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.label())
	}
}

/// Snapshot of a user's configured sign-in methods.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticationProfile {
	#[serde(default)]
	pub password: Option<PasswordMethod>,
	#[serde(default)]
	pub integrated_authentication: Option<CredentialMethod>,
	#[serde(default)]
	pub active_directory: Option<CredentialMethod>,
	#[serde(default)]
	pub client_certificate: Option<CredentialMethod>,
	#[serde(default)]
	pub rsa: Option<CredentialMethod>,
	#[serde(default)]
	pub openid_connect: Vec<FederatedMethod>,
	#[serde(default)]
	pub saml2: Vec<FederatedMethod>,
}

impl AuthenticationProfile {
	/// Names of the non-federated credential methods that are present, in
	/// a fixed order.
	pub fn credential_methods(&self) -> Vec<&'static str> {
		[
			("Password", self.password.is_some()),
			(
				"IntegratedAuthentication",
				self.integrated_authentication.is_some(),
			),
			("ActiveDirectory", self.active_directory.is_some()),
			("ClientCertificate", self.client_certificate.is_some()),
			("RSA", self.rsa.is_some()),
		]
		.into_iter()
		.filter_map(|(name, present)| present.then_some(name))
		.collect()
	}

	/// All federated entries, OpenID Connect first, then SAML2.
	pub fn federated_methods(
		&self,
	) -> impl Iterator<Item = (FederationProtocol, &FederatedMethod)> + '_ {
		self.openid_connect
			.iter()
			.map(|m| (FederationProtocol::OpenIdConnect, m))
			.chain(self.saml2.iter().map(|m| (FederationProtocol::Saml2, m)))
	}
}
