// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Pure classifiers over identity data.
//!
//! Each classifier takes already-fetched inputs and returns a finding only
//! when the identity is out of policy. Fetching lives in the orchestrator.

use serde::Serialize;
use warden_db::CandidateUser;
use warden_identity::{AuthenticationProfile, ClientAssignment, IdentityRecord};
use warden_report::ReportRow;

pub const NO_VALID_PROVIDER_MESSAGE: &str = "No valid Okta or OktaAdmin provider found";
pub const PASSWORD_WITHOUT_2FA_MESSAGE: &str =
	"User has password authentication enabled but 2FA is not configured";

const OKTA_STANDARD_LABEL: &str = "Okta (standard)";
const OKTA_ADMIN_LABEL: &str = "OktaAdmin";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleTier {
	Elevated,
	Standard,
}

impl RoleTier {
	/// Elevated when any group name matches an admin group, ignoring case.
	pub fn from_group_names<S: AsRef<str>>(group_names: &[S], admin_groups: &[String]) -> Self {
		let elevated = group_names.iter().any(|name| {
			admin_groups
				.iter()
				.any(|admin| admin.eq_ignore_ascii_case(name.as_ref()))
		});
		if elevated {
			RoleTier::Elevated
		} else {
			RoleTier::Standard
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginProviderFinding {
	pub user: CandidateUser,
	pub tier: RoleTier,
	pub is_valid: bool,
	pub invalid_providers: Vec<String>,
	pub message: Option<String>,
	pub has_multiple_providers: bool,
	pub has_no_valid_provider: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PasswordWithout2faFinding {
	pub user: CandidateUser,
	pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WrongClientFinding {
	pub user: CandidateUser,
	pub client: ClientAssignment,
}

/// A retained per-identity finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClassificationResult {
	LoginProvider(LoginProviderFinding),
	PasswordWithout2fa(PasswordWithout2faFinding),
	WrongClient(WrongClientFinding),
}

impl ClassificationResult {
	pub fn user(&self) -> &CandidateUser {
		match self {
			ClassificationResult::LoginProvider(f) => &f.user,
			ClassificationResult::PasswordWithout2fa(f) => &f.user,
			ClassificationResult::WrongClient(f) => &f.user,
		}
	}

	pub fn issue(&self) -> String {
		match self {
			ClassificationResult::LoginProvider(f) => f.message.clone().unwrap_or_default(),
			ClassificationResult::PasswordWithout2fa(f) => f.message.clone(),
			ClassificationResult::WrongClient(f) => {
				format!("Reassigned from client {}", f.client.id)
			}
		}
	}

	pub fn to_report_row(&self) -> ReportRow {
		let user = self.user();
		let highlighted = matches!(
			self,
			ClassificationResult::LoginProvider(f) if f.has_multiple_providers
		);
		ReportRow::new(
			user.id,
			user.first_name.clone(),
			user.last_name.clone(),
			user.email.clone(),
		)
		.with_issue(self.issue())
		.highlighted(highlighted)
	}
}

#[derive(Debug, Default)]
struct ProviderScan {
	has_okta: bool,
	has_okta_admin: bool,
	invalid: Vec<String>,
}

fn scan_providers(profile: &AuthenticationProfile) -> ProviderScan {
	let mut scan = ProviderScan {
		invalid: profile
			.credential_methods()
			.into_iter()
			.map(str::to_string)
			.collect(),
		..Default::default()
	};

	for (protocol, method) in profile.federated_methods() {
		if !method.is_enabled {
			continue;
		}
		let name = method.provider_name.to_lowercase();
		if name.contains("okta") {
			if name.contains("oktaadmin") {
				scan.has_okta_admin = true;
			} else {
				scan.has_okta = true;
			}
		} else {
			scan.invalid
				.push(format!("{}: {}", protocol.label(), method.provider_name));
		}
	}

	scan
}

/// Classify an identity's sign-in methods against its role tier.
///
/// Always returns the evaluation; callers keep only invalid ones.
pub fn classify_login_provider(
	user: &CandidateUser,
	profile: &AuthenticationProfile,
	tier: RoleTier,
) -> LoginProviderFinding {
	let scan = scan_providers(profile);

	let (has_required, has_other, required_message, extras_prefix, other_label) = match tier {
		RoleTier::Elevated => (
			scan.has_okta_admin,
			scan.has_okta,
			"Administrator must use OktaAdmin provider",
			"Admin user has additional providers",
			OKTA_STANDARD_LABEL,
		),
		RoleTier::Standard => (
			scan.has_okta,
			scan.has_okta_admin,
			"User must use Okta provider",
			"User has additional providers",
			OKTA_ADMIN_LABEL,
		),
	};

	let is_valid = has_required && !has_other && scan.invalid.is_empty();
	let mut has_multiple_providers = false;
	let mut has_no_valid_provider = false;

	let message = if is_valid {
		None
	} else if !scan.has_okta && !scan.has_okta_admin {
		has_no_valid_provider = true;
		Some(NO_VALID_PROVIDER_MESSAGE.to_string())
	} else if !has_required {
		Some(required_message.to_string())
	} else {
		has_multiple_providers = true;
		let mut extras = scan.invalid.clone();
		if has_other {
			extras.push(other_label.to_string());
		}
		Some(format!("{extras_prefix}: {}", extras.join(", ")))
	};

	LoginProviderFinding {
		user: user.clone(),
		tier,
		is_valid,
		invalid_providers: scan.invalid,
		message,
		has_multiple_providers,
		has_no_valid_provider,
	}
}

/// Password enabled without a second-factor marker is a finding.
pub fn classify_password(
	user: &CandidateUser,
	profile: &AuthenticationProfile,
) -> Option<PasswordWithout2faFinding> {
	match &profile.password {
		Some(password) if password.is_enabled && !password.has_second_factor() => {
			Some(PasswordWithout2faFinding {
				user: user.clone(),
				message: PASSWORD_WITHOUT_2FA_MESSAGE.to_string(),
			})
		}
		_ => None,
	}
}

/// A failed profile lookup is still reported, with the error text.
pub fn password_lookup_failed(
	user: &CandidateUser,
	error: &dyn std::fmt::Display,
) -> PasswordWithout2faFinding {
	PasswordWithout2faFinding {
		user: user.clone(),
		message: format!("Error checking authentication settings: {error}"),
	}
}

/// Reportable when the client is present, unsecured, and in the misassigned list.
pub fn classify_client(
	user: &CandidateUser,
	record: &IdentityRecord,
	misassigned_client_ids: &[i64],
) -> Option<WrongClientFinding> {
	let client = record.client.as_ref()?;
	if client.secured || !misassigned_client_ids.contains(&client.id) {
		return None;
	}
	Some(WrongClientFinding {
		user: user.clone(),
		client: client.clone(),
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;
	use warden_identity::{CredentialMethod, FederatedMethod, PasswordMethod};

	fn user() -> CandidateUser {
		CandidateUser::new(42, "Grace", "Hopper", "grace@example.com")
	}

	fn saml(name: &str, enabled: bool) -> FederatedMethod {
		FederatedMethod {
			provider_name: name.to_string(),
			is_enabled: enabled,
		}
	}

	fn profile_with_saml(names: &[&str]) -> AuthenticationProfile {
		AuthenticationProfile {
			saml2: names.iter().map(|n| saml(n, true)).collect(),
			..Default::default()
		}
	}

	#[test]
	fn test_role_tier_is_case_insensitive() {
		let admins = vec!["System Administrators".to_string()];
		assert_eq!(
			RoleTier::from_group_names(&["everyone", "SYSTEM ADMINISTRATORS"], &admins),
			RoleTier::Elevated
		);
		assert_eq!(
			RoleTier::from_group_names(&["Everyone"], &admins),
			RoleTier::Standard
		);
	}

	#[test]
	fn test_standard_with_okta_is_valid() {
		let finding = classify_login_provider(
			&user(),
			&profile_with_saml(&["Okta-Standard"]),
			RoleTier::Standard,
		);
		assert!(finding.is_valid);
		assert!(finding.invalid_providers.is_empty());
		assert!(finding.message.is_none());
	}

	#[test]
	fn test_standard_with_only_okta_admin() {
		let finding = classify_login_provider(
			&user(),
			&profile_with_saml(&["OktaAdmin-Legal"]),
			RoleTier::Standard,
		);
		assert!(!finding.is_valid);
		assert_eq!(finding.message.as_deref(), Some("User must use Okta provider"));
		assert!(!finding.has_no_valid_provider);
		assert!(!finding.has_multiple_providers);
	}

	#[test]
	fn test_elevated_requires_okta_admin() {
		let finding = classify_login_provider(
			&user(),
			&profile_with_saml(&["Okta"]),
			RoleTier::Elevated,
		);
		assert!(!finding.is_valid);
		assert_eq!(
			finding.message.as_deref(),
			Some("Administrator must use OktaAdmin provider")
		);
	}

	#[test]
	fn test_elevated_with_both_okta_providers() {
		let finding = classify_login_provider(
			&user(),
			&profile_with_saml(&["OktaAdmin", "Okta"]),
			RoleTier::Elevated,
		);
		assert!(!finding.is_valid);
		assert!(finding.has_multiple_providers);
		assert_eq!(
			finding.message.as_deref(),
			Some("Admin user has additional providers: Okta (standard)")
		);
		assert!(ClassificationResult::LoginProvider(finding)
			.to_report_row()
			.highlighted);
	}

	#[test]
	fn test_extra_methods_are_listed_in_order() {
		let profile = AuthenticationProfile {
			password: Some(PasswordMethod {
				is_enabled: true,
				two_factor_protocol: None,
			}),
			rsa: Some(CredentialMethod::default()),
			openid_connect: vec![saml("Google", true), saml("Disabled", false)],
			saml2: vec![saml("Okta", true), saml("OktaAdmin", true)],
			..Default::default()
		};
		let finding = classify_login_provider(&user(), &profile, RoleTier::Standard);
		assert!(finding.has_multiple_providers);
		assert_eq!(
			finding.invalid_providers,
			vec!["Password", "RSA", "OpenIDConnect: Google"]
		);
		assert_eq!(
			finding.message.as_deref(),
			Some("User has additional providers: Password, RSA, OpenIDConnect: Google, OktaAdmin")
		);
	}

	#[test]
	fn test_no_okta_at_all() {
		let profile = AuthenticationProfile {
			active_directory: Some(CredentialMethod::default()),
			saml2: vec![saml("Okta", false)],
			..Default::default()
		};
		let finding = classify_login_provider(&user(), &profile, RoleTier::Elevated);
		assert!(!finding.is_valid);
		assert!(finding.has_no_valid_provider);
		assert!(!finding.has_multiple_providers);
		assert_eq!(finding.message.as_deref(), Some(NO_VALID_PROVIDER_MESSAGE));
		assert!(!ClassificationResult::LoginProvider(finding)
			.to_report_row()
			.highlighted);
	}

	#[test]
	fn test_password_without_marker_is_one_finding() {
		let profile = AuthenticationProfile {
			password: Some(PasswordMethod {
				is_enabled: true,
				two_factor_protocol: Some(" ".to_string()),
			}),
			..Default::default()
		};
		let finding = classify_password(&user(), &profile).unwrap();
		assert_eq!(finding.message, PASSWORD_WITHOUT_2FA_MESSAGE);
	}

	#[test]
	fn test_password_with_marker_or_disabled_is_clean() {
		let with_marker = AuthenticationProfile {
			password: Some(PasswordMethod {
				is_enabled: true,
				two_factor_protocol: Some("Email".to_string()),
			}),
			..Default::default()
		};
		let disabled = AuthenticationProfile {
			password: Some(PasswordMethod {
				is_enabled: false,
				two_factor_protocol: None,
			}),
			..Default::default()
		};
		assert!(classify_password(&user(), &with_marker).is_none());
		assert!(classify_password(&user(), &disabled).is_none());
		assert!(classify_password(&user(), &AuthenticationProfile::default()).is_none());
	}

	#[test]
	fn test_password_lookup_failure_message() {
		let finding = password_lookup_failed(&user(), &"connection reset");
		assert_eq!(
			finding.message,
			"Error checking authentication settings: connection reset"
		);
	}

	fn record(client: Option<ClientAssignment>) -> IdentityRecord {
		IdentityRecord {
			id: 42,
			first_name: "Grace".to_string(),
			last_name: "Hopper".to_string(),
			email: "grace@example.com".to_string(),
			access_enabled: true,
			notes: String::new(),
			keywords: String::new(),
			item_list_page_length: 200,
			client,
		}
	}

	#[test]
	fn test_client_classifier() {
		let misassigned = [1020443];
		let wrong = ClientAssignment {
			id: 1020443,
			name: None,
			secured: false,
		};
		let finding = classify_client(&user(), &record(Some(wrong.clone())), &misassigned).unwrap();
		assert_eq!(
			ClassificationResult::WrongClient(finding).issue(),
			"Reassigned from client 1020443"
		);

		let secured = ClientAssignment {
			secured: true,
			..wrong.clone()
		};
		assert!(classify_client(&user(), &record(Some(secured)), &misassigned).is_none());

		let other = ClientAssignment { id: 7, ..wrong };
		assert!(classify_client(&user(), &record(Some(other)), &misassigned).is_none());
		assert!(classify_client(&user(), &record(None), &misassigned).is_none());
	}

	fn provider_name() -> impl Strategy<Value = String> {
		prop_oneof![
			Just("Okta".to_string()),
			Just("okta-standard".to_string()),
			Just("OktaAdmin".to_string()),
			Just("OKTAADMIN-Legal".to_string()),
			"[A-Z][a-z]{2,8}".prop_filter("not okta", |s| !s.to_lowercase().contains("okta")),
		]
	}

	fn arb_profile() -> impl Strategy<Value = AuthenticationProfile> {
		(
			any::<bool>(),
			any::<bool>(),
			prop::collection::vec((provider_name(), any::<bool>()), 0..4),
			prop::collection::vec((provider_name(), any::<bool>()), 0..4),
		)
			.prop_map(|(password, rsa, oidc, saml2)| AuthenticationProfile {
				password: password.then_some(PasswordMethod {
					is_enabled: true,
					two_factor_protocol: None,
				}),
				rsa: rsa.then(CredentialMethod::default),
				openid_connect: oidc.into_iter().map(|(n, e)| saml(&n, e)).collect(),
				saml2: saml2.into_iter().map(|(n, e)| saml(&n, e)).collect(),
				..Default::default()
			})
	}

	proptest! {
		#[test]
		fn validity_matches_provider_law(profile in arb_profile(), elevated in any::<bool>()) {
			let tier = if elevated { RoleTier::Elevated } else { RoleTier::Standard };
			let scan = scan_providers(&profile);
			let finding = classify_login_provider(&user(), &profile, tier);

			let expected = match tier {
				RoleTier::Elevated => scan.has_okta_admin && !scan.has_okta && scan.invalid.is_empty(),
				RoleTier::Standard => scan.has_okta && !scan.has_okta_admin && scan.invalid.is_empty(),
			};
			prop_assert_eq!(finding.is_valid, expected);
			prop_assert_eq!(finding.message.is_none(), finding.is_valid);
			prop_assert!(!(finding.has_multiple_providers && finding.has_no_valid_provider));
			prop_assert_eq!(
				finding.has_no_valid_provider,
				!scan.has_okta && !scan.has_okta_admin
			);
		}
	}
}
