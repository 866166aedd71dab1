// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Client identifier resolution.
//!
//! A client id identifies the originating user or session across hits. The
//! caller may pin one per call; otherwise a fresh UUID v4 is generated. Pinned
//! ids are passed through verbatim and are not required to be UUIDs. An empty
//! id counts as absent.

use uuid::{Uuid, Variant};

/// Generates a fresh random client id in hyphenated UUID v4 form.
pub fn generate() -> String {
	Uuid::new_v4().to_string()
}

/// Returns the supplied client id, or a freshly generated one when absent.
pub fn resolve(supplied: Option<&str>) -> String {
	match supplied {
		Some(id) if !id.is_empty() => id.to_string(),
		_ => generate(),
	}
}

/// Returns true if `id` is a hyphenated RFC 4122 UUID with version 4.
pub fn is_uuid_v4(id: &str) -> bool {
	id.len() == 36
		&& Uuid::parse_str(id)
			.map(|uuid| uuid.get_version_num() == 4 && uuid.get_variant() == Variant::RFC4122)
			.unwrap_or(false)
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	#[test]
	fn test_generate_is_uuid_v4() {
		let id = generate();
		assert!(is_uuid_v4(&id), "{id} should be a v4 uuid");
	}

	#[test]
	fn test_generate_is_distinct() {
		assert_ne!(generate(), generate());
	}

	#[test]
	fn test_resolve_none_generates() {
		assert!(is_uuid_v4(&resolve(None)));
	}

	#[test]
	fn test_resolve_empty_generates() {
		assert!(is_uuid_v4(&resolve(Some(""))));
	}

	#[test]
	fn test_is_uuid_v4_rejects_other_versions() {
		assert!(!is_uuid_v4("00000000-0000-1000-8000-000000000000"));
		assert!(!is_uuid_v4("abc-123"));
		assert!(!is_uuid_v4(""));
	}

	#[test]
	fn test_is_uuid_v4_rejects_simple_form() {
		let simple = Uuid::new_v4().simple().to_string();
		assert!(!is_uuid_v4(&simple));
	}

	proptest! {
		#[test]
		fn resolve_supplied_is_identity(id in ".{1,64}") {
			prop_assert_eq!(resolve(Some(&id)), id);
		}
	}
}
