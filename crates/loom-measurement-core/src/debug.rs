// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Typed view of the validation server's response.
//!
//! In debug mode the collection endpoint answers with a JSON document
//! describing how each hit was parsed instead of silently accepting it.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Top-level validation server response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebugResponse {
	#[serde(default)]
	pub hit_parsing_result: Vec<HitParsingResult>,
	#[serde(default)]
	pub parser_message: Vec<ParserMessage>,
}

impl DebugResponse {
	/// Returns true only if the first hit parsing result reports validity.
	///
	/// A response without any parsing result is not valid.
	pub fn is_valid(&self) -> bool {
		self
			.hit_parsing_result
			.first()
			.map(|result| result.valid)
			.unwrap_or(false)
	}

	/// All messages attached to hits with an `ERROR` message type.
	pub fn errors(&self) -> impl Iterator<Item = &ParserMessage> {
		self
			.hit_parsing_result
			.iter()
			.flat_map(|result| result.parser_message.iter())
			.filter(|message| message.is_error())
	}
}

/// Parsing outcome for a single hit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HitParsingResult {
	#[serde(default)]
	pub valid: bool,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub hit: Option<String>,
	#[serde(default)]
	pub parser_message: Vec<ParserMessage>,
}

/// A diagnostic emitted by the validation server.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParserMessage {
	#[serde(default)]
	pub message_type: String,
	#[serde(default)]
	pub description: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub message_code: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub parameter: Option<String>,
}

impl ParserMessage {
	pub fn is_error(&self) -> bool {
		self.message_type.eq_ignore_ascii_case("ERROR")
	}
}

/// Checks the first `hitParsingResult` entry of an undecoded body.
///
/// Works on the raw JSON so that bodies which do not match
/// [`DebugResponse`] are still judged by the one field that matters.
pub fn first_hit_valid(body: &Value) -> bool {
	body
		.get("hitParsingResult")
		.and_then(|results| results.get(0))
		.and_then(|result| result.get("valid"))
		.and_then(Value::as_bool)
		.unwrap_or(false)
}
