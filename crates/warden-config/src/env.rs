// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Secret loading from environment variables with `*_FILE` support.

use std::path::PathBuf;

use warden_common_secret::SecretString;

#[derive(Debug, thiserror::Error)]
pub enum SecretEnvError {
	#[error("both {name} and {name}_FILE are set; use only one")]
	Ambiguous { name: String },

	#[error("failed to read {name}_FILE at {path}: {source}")]
	FileRead {
		name: String,
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},
}

/// Load a secret from `NAME` or from the file named by `NAME_FILE`.
///
/// File contents are trimmed of trailing newlines. Empty values count as unset.
pub fn load_secret_env(name: &str) -> Result<Option<SecretString>, SecretEnvError> {
	let direct = std::env::var(name).ok().filter(|v| !v.is_empty());
	let file_var = format!("{name}_FILE");
	let file = std::env::var(&file_var).ok().filter(|v| !v.is_empty());

	match (direct, file) {
		(Some(_), Some(_)) => Err(SecretEnvError::Ambiguous {
			name: name.to_string(),
		}),
		(Some(value), None) => Ok(Some(SecretString::new(value))),
		(None, Some(path)) => {
			let path = PathBuf::from(path);
			let content = std::fs::read_to_string(&path).map_err(|source| SecretEnvError::FileRead {
				name: name.to_string(),
				path: path.clone(),
				source,
			})?;
			let trimmed = content.trim_end_matches(['\r', '\n']).to_string();
			if trimmed.is_empty() {
				Ok(None)
			} else {
				Ok(Some(SecretString::new(trimmed)))
			}
		}
		(None, None) => Ok(None),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Write;

	#[test]
	fn missing_secret_is_none() {
		let loaded = load_secret_env("WARDEN_TEST_SECRET_THAT_IS_NEVER_SET").unwrap();
		assert!(loaded.is_none());
	}

	#[test]
	fn secret_read_from_file() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(file, "from-file-token").unwrap();

		std::env::set_var("WARDEN_TEST_FILE_SECRET_FILE", file.path());
		let loaded = load_secret_env("WARDEN_TEST_FILE_SECRET").unwrap().unwrap();
		std::env::remove_var("WARDEN_TEST_FILE_SECRET_FILE");

		assert_eq!(loaded.expose(), "from-file-token");
	}

	#[test]
	fn both_sources_is_ambiguous() {
		std::env::set_var("WARDEN_TEST_BOTH_SECRET", "a");
		std::env::set_var("WARDEN_TEST_BOTH_SECRET_FILE", "/tmp/nope");
		let result = load_secret_env("WARDEN_TEST_BOTH_SECRET");
		std::env::remove_var("WARDEN_TEST_BOTH_SECRET");
		std::env::remove_var("WARDEN_TEST_BOTH_SECRET_FILE");

		assert!(matches!(result, Err(SecretEnvError::Ambiguous { .. })));
	}
}
