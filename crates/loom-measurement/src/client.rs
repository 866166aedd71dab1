// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Measurement protocol client: hit builders and dispatch.

use std::time::Duration;

use loom_common_http::RequestBuilderExt;
use loom_measurement_core::client_id::resolve as resolve_client_id;
use loom_measurement_core::{
	fields, first_hit_valid, Event, Exception, Hit, HitParams, HitType, Pageview,
	Refund, ScreenView, Social, Transaction, REFUND_ACTION, REFUND_CATEGORY,
};
use reqwest::{Client, StatusCode, Url};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::ClientConfig;
use crate::error::{MeasurementError, Result};
use crate::options::{EventOptions, HitOptions, RefundOptions, TransactionOptions};

/// SDK version for identification.
const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");
/// SDK name for identification.
const SDK_NAME: &str = "loom-measurement-rust";

/// Successful dispatch outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HitResponse {
	/// The client id the hit was sent with, supplied or generated.
	pub client_id: String,
}

/// Builder for constructing a [`MeasurementClient`].
pub struct MeasurementClientBuilder {
	tracking_id: Option<String>,
	user_agent: Option<String>,
	debug: bool,
	protocol_version: Option<u32>,
	base_url: Option<String>,
	request_timeout: Option<Duration>,
}

impl MeasurementClientBuilder {
	/// Creates a new builder with default settings.
	pub fn new() -> Self {
		Self {
			tracking_id: None,
			user_agent: None,
			debug: false,
			protocol_version: None,
			base_url: None,
			request_timeout: None,
		}
	}

	/// Sets the tracking id of the destination property.
	pub fn tracking_id(mut self, tracking_id: impl Into<String>) -> Self {
		self.tracking_id = Some(tracking_id.into());
		self
	}

	/// Sets the `User-Agent` header sent with every hit.
	pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
		self.user_agent = Some(user_agent.into());
		self
	}

	/// Sends hits to the validation endpoint and enforces its verdict.
	pub fn debug(mut self, debug: bool) -> Self {
		self.debug = debug;
		self
	}

	/// Overrides the protocol version (default 1).
	pub fn protocol_version(mut self, version: u32) -> Self {
		self.protocol_version = Some(version);
		self
	}

	/// Overrides the collection host.
	///
	/// Example: `https://www.google-analytics.com`
	pub fn base_url(mut self, url: impl Into<String>) -> Self {
		self.base_url = Some(url.into());
		self
	}

	/// Sets an overall HTTP request timeout. There is none by default.
	pub fn request_timeout(mut self, timeout: Duration) -> Self {
		self.request_timeout = Some(timeout);
		self
	}

	/// Builds the MeasurementClient.
	pub fn build(self) -> Result<MeasurementClient> {
		let tracking_id = self
			.tracking_id
			.filter(|id| !id.is_empty())
			.ok_or(MeasurementError::InvalidTrackingId)?;

		let mut config = ClientConfig::new(tracking_id);
		config.user_agent = self.user_agent.filter(|ua| !ua.is_empty());
		config.debug = self.debug;
		if let Some(version) = self.protocol_version {
			config.protocol_version = version;
		}
		if let Some(base_url) = self.base_url {
			config.base_url = base_url;
		}
		config.request_timeout = self.request_timeout;

		MeasurementClient::new(config)
	}
}

impl Default for MeasurementClientBuilder {
	fn default() -> Self {
		Self::new()
	}
}

/// Client for sending hits to a measurement protocol endpoint.
///
/// Each call is independent: the client only holds configuration and a
/// pooled HTTP client, so any number of sends may be in flight at once.
/// Nothing is retried; every failure is returned to the caller.
///
/// # Example
///
/// ```ignore
/// use loom_measurement::{EventOptions, MeasurementClient};
///
/// let client = MeasurementClient::builder()
///     .tracking_id("UA-XXXXX-Y")
///     .build()?;
///
/// let sent = client.event("Video", "Play", EventOptions::default()).await?;
/// println!("sent as {}", sent.client_id);
/// ```
#[derive(Debug, Clone)]
pub struct MeasurementClient {
	config: ClientConfig,
	http_client: Client,
}

impl MeasurementClient {
	/// Creates a new builder for constructing a MeasurementClient.
	pub fn builder() -> MeasurementClientBuilder {
		MeasurementClientBuilder::new()
	}

	/// Creates a client from a resolved configuration.
	pub fn new(mut config: ClientConfig) -> Result<Self> {
		if config.tracking_id.is_empty() {
			return Err(MeasurementError::InvalidTrackingId);
		}

		config.base_url = normalize_base_url(&config.base_url)?;

		let http_client = loom_common_http::new_client(config.request_timeout)?;

		info!(
			base_url = %config.base_url,
			debug = config.debug,
			sdk_name = SDK_NAME,
			sdk_version = SDK_VERSION,
			"Measurement client initialized"
		);

		Ok(Self {
			config,
			http_client,
		})
	}

	/// Creates a client from environment configuration.
	pub fn from_env() -> Result<Self> {
		Self::new(ClientConfig::from_env()?)
	}

	pub fn config(&self) -> &ClientConfig {
		&self.config
	}

	pub fn tracking_id(&self) -> &str {
		&self.config.tracking_id
	}

	pub fn set_tracking_id(&mut self, tracking_id: impl Into<String>) {
		self.config.tracking_id = tracking_id.into();
	}

	pub fn user_agent(&self) -> Option<&str> {
		self.config.user_agent.as_deref()
	}

	/// Sets or clears the `User-Agent` header. An empty string clears it.
	pub fn set_user_agent(&mut self, user_agent: Option<String>) {
		self.config.user_agent = user_agent.filter(|ua| !ua.is_empty());
	}

	pub fn debug(&self) -> bool {
		self.config.debug
	}

	pub fn set_debug(&mut self, debug: bool) {
		self.config.debug = debug;
	}

	pub fn protocol_version(&self) -> u32 {
		self.config.protocol_version
	}

	pub fn set_protocol_version(&mut self, version: u32) {
		self.config.protocol_version = version;
	}

	pub fn base_url(&self) -> &str {
		&self.config.base_url
	}

	pub fn set_base_url(&mut self, base_url: impl Into<String>) -> Result<()> {
		self.config.base_url = normalize_base_url(&base_url.into())?;
		Ok(())
	}

	pub fn collect_path(&self) -> &str {
		&self.config.collect_path
	}

	pub fn set_collect_path(&mut self, path: impl Into<String>) {
		self.config.collect_path = path.into();
	}

	pub fn debug_path(&self) -> &str {
		&self.config.debug_path
	}

	pub fn set_debug_path(&mut self, path: impl Into<String>) {
		self.config.debug_path = path.into();
	}

	pub fn batch_path(&self) -> &str {
		&self.config.batch_path
	}

	/// The URL hits are currently posted to.
	pub fn collect_url(&self) -> String {
		self.config.collect_url()
	}

	/// Records a page view (`dh`, `dp`, `dt`).
	pub async fn pageview(
		&self,
		hostname: impl Into<String>,
		url: impl Into<String>,
		title: impl Into<String>,
		options: HitOptions,
	) -> Result<HitResponse> {
		let hit = Pageview::new(hostname, url, title);
		self.send_hit(&hit, options.client_id.as_deref()).await
	}

	/// Records a custom event (`ec`, `ea`, optional `el`, `ev`).
	pub async fn event(
		&self,
		category: impl Into<String>,
		action: impl Into<String>,
		options: EventOptions,
	) -> Result<HitResponse> {
		let hit = Event {
			label: options.label,
			value: options.value,
			..Event::new(category, action)
		};
		self.send_hit(&hit, options.client_id.as_deref()).await
	}

	/// Records an application screen view (`an`, `av`, `aid`, `aiid`, `cd`).
	pub async fn screen(
		&self,
		app_name: impl Into<String>,
		app_version: impl Into<String>,
		app_id: impl Into<String>,
		app_installer_id: impl Into<String>,
		screen_name: impl Into<String>,
		options: HitOptions,
	) -> Result<HitResponse> {
		let hit = ScreenView {
			app_name: app_name.into(),
			app_version: app_version.into(),
			app_id: app_id.into(),
			app_installer_id: app_installer_id.into(),
			screen_name: screen_name.into(),
		};
		self.send_hit(&hit, options.client_id.as_deref()).await
	}

	/// Records an e-commerce transaction (`ti`, optional `ta`, `tr`, `ts`, `tt`, `cu`).
	pub async fn transaction(
		&self,
		transaction_id: impl Into<String>,
		options: TransactionOptions,
	) -> Result<HitResponse> {
		let hit = Transaction {
			transaction_id: transaction_id.into(),
			affiliation: options.affiliation,
			revenue: options.revenue,
			shipping: options.shipping,
			tax: options.tax,
			currency: options.currency,
		};
		self.send_hit(&hit, options.client_id.as_deref()).await
	}

	/// Records a social interaction (`sa`, `sn`, `st`).
	pub async fn social(
		&self,
		action: impl Into<String>,
		network: impl Into<String>,
		target: impl Into<String>,
		options: HitOptions,
	) -> Result<HitResponse> {
		let hit = Social::new(action, network, target);
		self.send_hit(&hit, options.client_id.as_deref()).await
	}

	/// Records an exception (`exd`, `exf`).
	pub async fn exception(
		&self,
		description: impl Into<String>,
		is_fatal: bool,
		options: HitOptions,
	) -> Result<HitResponse> {
		let hit = Exception::new(description, is_fatal);
		self.send_hit(&hit, options.client_id.as_deref()).await
	}

	/// Records a refund as an `event` hit with `pa=refund`.
	pub async fn refund(
		&self,
		transaction_id: impl Into<String>,
		options: RefundOptions,
	) -> Result<HitResponse> {
		let hit = Refund {
			transaction_id: transaction_id.into(),
			category: options
				.category
				.unwrap_or_else(|| REFUND_CATEGORY.to_string()),
			action: options.action.unwrap_or_else(|| REFUND_ACTION.to_string()),
			non_interaction: options.non_interaction.unwrap_or(true),
		};
		self.send_hit(&hit, options.client_id.as_deref()).await
	}

	/// Sends any hit definition.
	pub async fn send_hit<H: Hit + ?Sized>(
		&self,
		hit: &H,
		client_id: Option<&str>,
	) -> Result<HitResponse> {
		self.send(hit.hit_type(), Some(hit.params()), client_id).await
	}

	/// Builds the full payload for a hit without sending it.
	///
	/// The identity fields `v`, `tid`, `cid` and `t` come first; `params` is
	/// merged over them.
	pub fn payload(
		&self,
		hit_type: HitType,
		params: Option<HitParams>,
		client_id: Option<&str>,
	) -> HitParams {
		let mut payload = HitParams::new()
			.with(fields::VERSION, self.config.protocol_version)
			.with(fields::TRACKING_ID, &self.config.tracking_id)
			.with(fields::CLIENT_ID, resolve_client_id(client_id))
			.with(fields::HIT_TYPE, hit_type.as_str());

		if let Some(params) = params {
			payload.merge(params);
		}

		payload
	}

	/// Dispatches a hit and interprets the response.
	///
	/// Resolves with the client id the hit was sent with. In production mode
	/// any 200 response succeeds. In debug mode a 200 response must also
	/// report the first parsed hit as valid, otherwise the decoded body is
	/// returned as [`MeasurementError::ValidationFailed`]. Any other status
	/// yields [`MeasurementError::ServerError`] with the decoded body.
	pub async fn send(
		&self,
		hit_type: HitType,
		params: Option<HitParams>,
		client_id: Option<&str>,
	) -> Result<HitResponse> {
		let payload = self.payload(hit_type, params, client_id);
		let client_id = payload.get_wire(fields::CLIENT_ID).unwrap_or_default();
		let url = self.config.collect_url();

		debug!(url = %url, hit_type = %hit_type, client_id = %client_id, "Sending hit");

		let response = self
			.http_client
			.post(&url)
			.optional_user_agent(self.config.user_agent.as_deref())
			.form(&payload)
			.send()
			.await?;

		let status = response.status();
		let bytes = response.bytes().await?;
		let body = loom_common_http::decode_json_body(&bytes)?;

		if status != StatusCode::OK {
			warn!(status = status.as_u16(), hit_type = %hit_type, "Hit rejected by endpoint");
			return Err(MeasurementError::ServerError {
				status: status.as_u16(),
				body,
			});
		}

		if self.config.debug && !first_hit_valid(&body) {
			warn!(hit_type = %hit_type, client_id = %client_id, "Hit failed validation");
			return Err(MeasurementError::ValidationFailed { body });
		}

		debug!(hit_type = %hit_type, client_id = %client_id, "Hit sent");

		Ok(HitResponse { client_id })
	}
}

fn normalize_base_url(base_url: &str) -> Result<String> {
	let trimmed = base_url.trim_end_matches('/');
	Url::parse(trimmed).map_err(|_| MeasurementError::InvalidBaseUrl(base_url.to_string()))?;
	Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
	use super::*;
	use loom_measurement_core::client_id::is_uuid_v4;

	fn test_client() -> MeasurementClient {
		MeasurementClient::builder()
			.tracking_id("UA-12345-1")
			.build()
			.unwrap()
	}

	#[test]
	fn test_builder_requires_tracking_id() {
		let result = MeasurementClientBuilder::new().build();
		assert!(matches!(result, Err(MeasurementError::InvalidTrackingId)));
	}

	#[test]
	fn test_builder_rejects_empty_tracking_id() {
		let result = MeasurementClientBuilder::new().tracking_id("").build();
		assert!(matches!(result, Err(MeasurementError::InvalidTrackingId)));
	}

	#[test]
	fn test_builder_rejects_invalid_base_url() {
		let result = MeasurementClientBuilder::new()
			.tracking_id("UA-1-1")
			.base_url("not a url")
			.build();
		assert!(matches!(result, Err(MeasurementError::InvalidBaseUrl(_))));
	}

	#[test]
	fn test_builder_normalizes_base_url() {
		let client = MeasurementClientBuilder::new()
			.tracking_id("UA-1-1")
			.base_url("http://localhost:9000/")
			.build()
			.unwrap();
		assert_eq!(client.base_url(), "http://localhost:9000");
		assert_eq!(client.collect_url(), "http://localhost:9000/collect");
	}

	#[test]
	fn test_builder_defaults() {
		let client = test_client();
		assert_eq!(client.protocol_version(), 1);
		assert!(!client.debug());
		assert!(client.user_agent().is_none());
		assert_eq!(client.batch_path(), "/batch");
		assert_eq!(
			client.collect_url(),
			"https://www.google-analytics.com/collect"
		);
	}

	#[test]
	fn test_builder_drops_empty_user_agent() {
		let client = MeasurementClientBuilder::new()
			.tracking_id("UA-1-1")
			.user_agent("")
			.build()
			.unwrap();
		assert!(client.user_agent().is_none());
	}

	#[test]
	fn test_setters() {
		let mut client = test_client();
		client.set_tracking_id("UA-2-2");
		client.set_user_agent(Some("agent/1".to_string()));
		client.set_debug(true);
		client.set_protocol_version(2);
		client.set_debug_path("/validate");
		client.set_collect_path("/c");
		client.set_base_url("http://localhost:1234/").unwrap();

		assert_eq!(client.tracking_id(), "UA-2-2");
		assert_eq!(client.user_agent(), Some("agent/1"));
		assert!(client.debug());
		assert_eq!(client.protocol_version(), 2);
		assert_eq!(client.collect_url(), "http://localhost:1234/validate/c");
	}

	#[test]
	fn test_set_user_agent_empty_clears() {
		let mut client = test_client();
		client.set_user_agent(Some("agent/1".to_string()));
		client.set_user_agent(Some(String::new()));
		assert!(client.user_agent().is_none());
	}

	#[test]
	fn test_set_base_url_rejects_invalid() {
		let mut client = test_client();
		assert!(client.set_base_url("::nope").is_err());
		assert_eq!(client.base_url(), "https://www.google-analytics.com");
	}

	#[test]
	fn test_new_rejects_empty_tracking_id() {
		let result = MeasurementClient::new(ClientConfig::new(""));
		assert!(matches!(result, Err(MeasurementError::InvalidTrackingId)));
	}

	#[test]
	fn test_payload_identity_fields() {
		let client = test_client();
		let payload = client.payload(HitType::Pageview, None, Some("abc-123"));

		assert_eq!(payload.keys().collect::<Vec<_>>(), vec!["cid", "t", "tid", "v"]);
		assert_eq!(payload.get_wire("v").as_deref(), Some("1"));
		assert_eq!(payload.get_wire("tid").as_deref(), Some("UA-12345-1"));
		assert_eq!(payload.get_wire("cid").as_deref(), Some("abc-123"));
		assert_eq!(payload.get_wire("t").as_deref(), Some("pageview"));
	}

	#[test]
	fn test_payload_generates_client_id() {
		let client = test_client();
		let payload = client.payload(HitType::Event, None, None);
		let cid = payload.get_wire("cid").unwrap();
		assert!(is_uuid_v4(&cid));
	}

	#[test]
	fn test_payload_merges_params() {
		let client = test_client();
		let params = Event::new("Video", "Play").params();
		let payload = client.payload(HitType::Event, Some(params), None);

		assert_eq!(payload.len(), 6);
		assert_eq!(payload.get_wire("ec").as_deref(), Some("Video"));
		assert!(!payload.contains_key("el"));
	}

	#[test]
	fn test_payload_params_take_precedence() {
		let client = test_client();
		let params = HitParams::new().with("cid", "override");
		let payload = client.payload(HitType::Event, Some(params), Some("original"));
		assert_eq!(payload.get_wire("cid").as_deref(), Some("override"));
	}
}
