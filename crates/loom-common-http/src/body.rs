// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Response body decoding.

use serde_json::{Map, Value};

/// Decodes a response body as JSON.
///
/// A zero-length body decodes to an empty object. Anything else must be valid
/// JSON; malformed input is returned as an error rather than swallowed.
pub fn decode_json_body(body: &[u8]) -> serde_json::Result<Value> {
	if body.is_empty() {
		return Ok(Value::Object(Map::new()));
	}
	serde_json::from_slice(body)
}
