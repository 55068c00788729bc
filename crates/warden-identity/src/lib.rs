// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Client for the identity service that owns user accounts, groups, and
//! sign-in configuration.
//!
//! The audit depends on the [`IdentityService`] trait; [`HttpIdentityClient`]
//! is the REST implementation:
//!
//! | Operation                     | Request                         |
//! |-------------------------------|---------------------------------|
//! | `read_identity`               | `GET /users/{id}`               |
//! | `update_identity`             | `PUT /users/{id}`               |
//! | `read_authentication_profile` | `GET /users/{id}/login-profile` |
//! | `read_groups_of`              | `GET /users/{id}/groups`        |
//! | `read_group`                  | `GET /groups/{id}`              |

pub mod client;
pub mod error;
pub mod service;
pub mod types;

pub use client::{builder, user_agent, HttpIdentityClient};
pub use error::{IdentityError, Result};
pub use service::IdentityService;
pub use types::{
	AuthenticationProfile, ClientAssignment, CredentialMethod, FederatedMethod,
	FederationProtocol, GroupRef, IdentityRecord, PasswordMethod,
};
