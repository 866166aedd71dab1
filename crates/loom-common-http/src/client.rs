// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Shared HTTP client construction and per-request User-Agent handling.

use reqwest::header::USER_AGENT;
use reqwest::{Client, ClientBuilder, RequestBuilder};
use std::time::Duration;

/// Creates a new HTTP client builder.
///
/// No default User-Agent is installed; callers that want one attach it per
/// request with [`RequestBuilderExt::optional_user_agent`], so that hits are
/// sent without the header unless it was configured.
pub fn builder() -> ClientBuilder {
	Client::builder()
}

/// Creates a new HTTP client builder with an optional overall request timeout.
///
/// `None` leaves reqwest's default of no timeout in place.
///
/// # Example
/// ```ignore
/// let client = loom_common_http::builder_with_timeout(Some(Duration::from_secs(30)))
///     .build()?;
/// ```
pub fn builder_with_timeout(timeout: Option<Duration>) -> ClientBuilder {
	match timeout {
		Some(timeout) => builder().timeout(timeout),
		None => builder(),
	}
}

/// Creates a new HTTP client with an optional overall request timeout.
pub fn new_client(timeout: Option<Duration>) -> reqwest::Result<Client> {
	builder_with_timeout(timeout).build()
}

/// Extension methods for [`RequestBuilder`].
pub trait RequestBuilderExt {
	/// Attaches a `User-Agent` header only when `user_agent` is non-empty.
	fn optional_user_agent(self, user_agent: Option<&str>) -> Self;
}

impl RequestBuilderExt for RequestBuilder {
	fn optional_user_agent(self, user_agent: Option<&str>) -> Self {
		match user_agent {
			Some(ua) if !ua.is_empty() => self.header(USER_AGENT, ua),
			_ => self,
		}
	}
}
