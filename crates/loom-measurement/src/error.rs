// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for the measurement SDK.

use std::path::PathBuf;

use loom_measurement_core::DebugResponse;
use serde_json::Value;
use thiserror::Error;

/// Measurement SDK errors.
///
/// Dispatch failures fall into four categories: the transport failed
/// ([`RequestFailed`](Self::RequestFailed)), the body could not be decoded
/// ([`DecodeFailed`](Self::DecodeFailed)), the validation server rejected the
/// hit ([`ValidationFailed`](Self::ValidationFailed)), or the endpoint
/// answered with a non-200 status ([`ServerError`](Self::ServerError)).
#[derive(Debug, Error)]
pub enum MeasurementError {
	/// Tracking id is missing or empty.
	#[error("invalid tracking id: must not be empty")]
	InvalidTrackingId,

	/// Base URL is not a valid absolute URL.
	#[error("invalid base URL: {0}")]
	InvalidBaseUrl(String),

	/// HTTP request failed.
	#[error("HTTP request failed: {0}")]
	RequestFailed(#[from] reqwest::Error),

	/// Response body was present but not valid JSON.
	#[error("failed to decode response body: {0}")]
	DecodeFailed(#[from] serde_json::Error),

	/// Debug mode only: the validation server reported the hit as invalid.
	#[error("hit rejected by validation server")]
	ValidationFailed { body: Value },

	/// Endpoint returned a status other than 200.
	#[error("server error ({status}): {body}")]
	ServerError { status: u16, body: Value },

	/// Configuration could not be loaded.
	#[error(transparent)]
	Config(#[from] ConfigError),
}

impl MeasurementError {
	/// The decoded response body, for failures that carry one.
	pub fn body(&self) -> Option<&Value> {
		match self {
			Self::ValidationFailed { body } | Self::ServerError { body, .. } => Some(body),
			_ => None,
		}
	}

	/// The HTTP status, for failures that carry one.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::ValidationFailed { .. } => Some(200),
			Self::ServerError { status, .. } => Some(*status),
			Self::RequestFailed(e) => e.status().map(|s| s.as_u16()),
			_ => None,
		}
	}

	/// Decodes the carried body into the validation server's diagnostic shape.
	///
	/// Returns `None` if there is no body or it does not match that shape.
	pub fn debug_response(&self) -> Option<DebugResponse> {
		self
			.body()
			.and_then(|body| serde_json::from_value(body.clone()).ok())
	}
}

/// Result type alias for measurement operations.
pub type Result<T> = std::result::Result<T, MeasurementError>;

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Config file could not be read.
	#[error("failed to read config file {path}: {source}")]
	FileRead {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	/// TOML parsing error.
	#[error("TOML parse error in {path}: {source}")]
	TomlParse {
		path: PathBuf,
		#[source]
		source: toml::de::Error,
	},

	/// Missing required field.
	#[error("missing required field: {0}")]
	MissingField(String),

	/// Invalid value.
	#[error("invalid value for {key}: {message}")]
	InvalidValue { key: String, message: String },
}
