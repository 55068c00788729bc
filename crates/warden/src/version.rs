// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Build information for `warden version`.

#[derive(Debug, Clone, Copy)]
pub struct BuildInfo {
	pub version: &'static str,
	pub git_sha: &'static str,
	pub platform_os: &'static str,
	pub platform_arch: &'static str,
}

impl BuildInfo {
	pub const fn current() -> Self {
		Self {
			version: env!("CARGO_PKG_VERSION"),
			git_sha: match option_env!("WARDEN_GIT_SHA") {
				Some(sha) => sha,
				None => "unknown",
			},
			platform_os: std::env::consts::OS,
			platform_arch: std::env::consts::ARCH,
		}
	}
}

pub fn format_version_info() -> String {
	let info = BuildInfo::current();
	format!(
		"warden version: {}\n\
		 Git SHA:        {}\n\
		 Platform:       {}-{}",
		info.version, info.git_sha, info.platform_os, info.platform_arch,
	)
}
