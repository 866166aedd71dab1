// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Client configuration and layered loading.
//!
//! Configuration is assembled from layers with increasing precedence:
//! built-in defaults, an optional TOML file, then environment variables.
//!
//! Environment convention: `LOOM_MEASUREMENT_<FIELD>`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use loom_measurement_core::PROTOCOL_VERSION;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::ConfigError;

pub const DEFAULT_BASE_URL: &str = "https://www.google-analytics.com";
pub const DEFAULT_COLLECT_PATH: &str = "/collect";
pub const DEFAULT_DEBUG_PATH: &str = "/debug";
/// Declared for completeness; no batching is performed.
pub const DEFAULT_BATCH_PATH: &str = "/batch";

pub const ENV_TRACKING_ID: &str = "LOOM_MEASUREMENT_TRACKING_ID";
pub const ENV_USER_AGENT: &str = "LOOM_MEASUREMENT_USER_AGENT";
pub const ENV_DEBUG: &str = "LOOM_MEASUREMENT_DEBUG";
pub const ENV_PROTOCOL_VERSION: &str = "LOOM_MEASUREMENT_PROTOCOL_VERSION";
pub const ENV_BASE_URL: &str = "LOOM_MEASUREMENT_BASE_URL";
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "LOOM_MEASUREMENT_REQUEST_TIMEOUT_SECS";

/// Resolved configuration for a [`MeasurementClient`](crate::MeasurementClient).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
	/// Destination property, e.g. `UA-XXXXX-Y`.
	pub tracking_id: String,
	/// Sent as the `User-Agent` header when non-empty.
	pub user_agent: Option<String>,
	/// Use the validation endpoint and require a valid parsing result.
	pub debug: bool,
	pub protocol_version: u32,
	pub base_url: String,
	pub collect_path: String,
	pub debug_path: String,
	pub batch_path: String,
	/// Overall HTTP timeout. `None` waits for the transport indefinitely.
	pub request_timeout: Option<Duration>,
}

impl ClientConfig {
	/// Creates a configuration with defaults for everything but the tracking id.
	pub fn new(tracking_id: impl Into<String>) -> Self {
		Self {
			tracking_id: tracking_id.into(),
			user_agent: None,
			debug: false,
			protocol_version: PROTOCOL_VERSION,
			base_url: DEFAULT_BASE_URL.to_string(),
			collect_path: DEFAULT_COLLECT_PATH.to_string(),
			debug_path: DEFAULT_DEBUG_PATH.to_string(),
			batch_path: DEFAULT_BATCH_PATH.to_string(),
			request_timeout: None,
		}
	}

	/// The URL hits are posted to.
	///
	/// `base_url + collect_path`, or `base_url + debug_path + collect_path` in
	/// debug mode.
	pub fn collect_url(&self) -> String {
		if self.debug {
			format!("{}{}{}", self.base_url, self.debug_path, self.collect_path)
		} else {
			format!("{}{}", self.base_url, self.collect_path)
		}
	}

	/// Loads configuration from the environment on top of the defaults.
	pub fn from_env() -> Result<Self, ConfigError> {
		load_config(None)
	}
}

/// A partial configuration where every field is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MeasurementConfigLayer {
	pub tracking_id: Option<String>,
	pub user_agent: Option<String>,
	pub debug: Option<bool>,
	pub protocol_version: Option<u32>,
	pub base_url: Option<String>,
	pub collect_path: Option<String>,
	pub debug_path: Option<String>,
	pub request_timeout_secs: Option<u64>,
}

impl MeasurementConfigLayer {
	/// Overlays `other` on top of this layer.
	pub fn merge(&mut self, other: Self) {
		if other.tracking_id.is_some() {
			self.tracking_id = other.tracking_id;
		}
		if other.user_agent.is_some() {
			self.user_agent = other.user_agent;
		}
		if other.debug.is_some() {
			self.debug = other.debug;
		}
		if other.protocol_version.is_some() {
			self.protocol_version = other.protocol_version;
		}
		if other.base_url.is_some() {
			self.base_url = other.base_url;
		}
		if other.collect_path.is_some() {
			self.collect_path = other.collect_path;
		}
		if other.debug_path.is_some() {
			self.debug_path = other.debug_path;
		}
		if other.request_timeout_secs.is_some() {
			self.request_timeout_secs = other.request_timeout_secs;
		}
	}

	/// Resolves the layer into a full configuration.
	pub fn finalize(self) -> Result<ClientConfig, ConfigError> {
		let tracking_id = self
			.tracking_id
			.filter(|id| !id.is_empty())
			.ok_or_else(|| ConfigError::MissingField("tracking_id".to_string()))?;

		let mut config = ClientConfig::new(tracking_id);
		config.user_agent = self.user_agent.filter(|ua| !ua.is_empty());
		config.debug = self.debug.unwrap_or(false);
		config.protocol_version = self.protocol_version.unwrap_or(PROTOCOL_VERSION);
		if let Some(base_url) = self.base_url {
			config.base_url = base_url.trim_end_matches('/').to_string();
		}
		if let Some(collect_path) = self.collect_path {
			config.collect_path = collect_path;
		}
		if let Some(debug_path) = self.debug_path {
			config.debug_path = debug_path;
		}
		config.request_timeout = self.request_timeout_secs.map(Duration::from_secs);

		Ok(config)
	}
}

/// Source precedence levels (higher = overrides lower).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
	Defaults = 10,
	ConfigFile = 20,
	Environment = 50,
	Cli = 100,
}

/// A source of configuration layers.
pub trait ConfigSource {
	fn name(&self) -> &'static str;
	fn precedence(&self) -> Precedence;
	fn load(&self) -> Result<MeasurementConfigLayer, ConfigError>;
}

/// Built-in defaults source.
pub struct DefaultsSource;

impl ConfigSource for DefaultsSource {
	fn name(&self) -> &'static str {
		"defaults"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Defaults
	}

	fn load(&self) -> Result<MeasurementConfigLayer, ConfigError> {
		debug!("loading defaults");
		Ok(MeasurementConfigLayer::default())
	}
}

/// TOML file configuration source. A missing file yields an empty layer.
pub struct TomlSource {
	path: PathBuf,
}

impl TomlSource {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}
}

impl ConfigSource for TomlSource {
	fn name(&self) -> &'static str {
		"toml-config"
	}

	fn precedence(&self) -> Precedence {
		Precedence::ConfigFile
	}

	fn load(&self) -> Result<MeasurementConfigLayer, ConfigError> {
		if !self.path.exists() {
			debug!(path = %self.path.display(), "config file not found, skipping");
			return Ok(MeasurementConfigLayer::default());
		}

		debug!(path = %self.path.display(), "loading config file");
		let content = std::fs::read_to_string(&self.path).map_err(|e| ConfigError::FileRead {
			path: self.path.clone(),
			source: e,
		})?;

		let layer: MeasurementConfigLayer =
			toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
				path: self.path.clone(),
				source: e,
			})?;

		trace!("parsed config layer from TOML");
		Ok(layer)
	}
}

/// Environment variable source.
pub struct EnvSource<F = fn(&str) -> Option<String>> {
	lookup: F,
}

impl EnvSource {
	/// Reads from the process environment.
	pub fn new() -> Self {
		Self {
			lookup: |name| std::env::var(name).ok(),
		}
	}
}

impl Default for EnvSource {
	fn default() -> Self {
		Self::new()
	}
}

impl<F> EnvSource<F>
where
	F: Fn(&str) -> Option<String>,
{
	/// Reads variables through `lookup` instead of the process environment.
	pub fn with_lookup(lookup: F) -> Self {
		Self { lookup }
	}

	fn env_var(&self, name: &str) -> Option<String> {
		(self.lookup)(name).filter(|s| !s.is_empty())
	}

	fn env_bool(&self, name: &str) -> Option<bool> {
		self
			.env_var(name)
			.map(|v| v.eq_ignore_ascii_case("true") || v == "1")
	}

	fn env_u32(&self, name: &str) -> Result<Option<u32>, ConfigError> {
		match self.env_var(name) {
			Some(v) => v.parse().map(Some).map_err(|_| ConfigError::InvalidValue {
				key: name.to_string(),
				message: format!("invalid u32 value '{v}'"),
			}),
			None => Ok(None),
		}
	}

	fn env_u64(&self, name: &str) -> Result<Option<u64>, ConfigError> {
		match self.env_var(name) {
			Some(v) => v.parse().map(Some).map_err(|_| ConfigError::InvalidValue {
				key: name.to_string(),
				message: format!("invalid u64 value '{v}'"),
			}),
			None => Ok(None),
		}
	}
}

impl<F> ConfigSource for EnvSource<F>
where
	F: Fn(&str) -> Option<String>,
{
	fn name(&self) -> &'static str {
		"environment"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Environment
	}

	fn load(&self) -> Result<MeasurementConfigLayer, ConfigError> {
		debug!("loading environment variables");
		Ok(MeasurementConfigLayer {
			tracking_id: self.env_var(ENV_TRACKING_ID),
			user_agent: self.env_var(ENV_USER_AGENT),
			debug: self.env_bool(ENV_DEBUG),
			protocol_version: self.env_u32(ENV_PROTOCOL_VERSION)?,
			base_url: self.env_var(ENV_BASE_URL),
			collect_path: None,
			debug_path: None,
			request_timeout_secs: self.env_u64(ENV_REQUEST_TIMEOUT_SECS)?,
		})
	}
}

/// Merges the given sources in precedence order and finalizes the result.
pub fn load_from_sources(sources: &[&dyn ConfigSource]) -> Result<ClientConfig, ConfigError> {
	let mut ordered: Vec<&dyn ConfigSource> = sources.to_vec();
	ordered.sort_by_key(|source| source.precedence());

	let mut layer = MeasurementConfigLayer::default();
	for source in ordered {
		trace!(source = source.name(), "applying config source");
		layer.merge(source.load()?);
	}
	layer.finalize()
}

/// Loads configuration from defaults, an optional TOML file and the environment.
pub fn load_config(path: Option<&Path>) -> Result<ClientConfig, ConfigError> {
	let env = EnvSource::new();
	match path {
		Some(path) => {
			let file = TomlSource::new(path);
			load_from_sources(&[&DefaultsSource, &file, &env])
		}
		None => load_from_sources(&[&DefaultsSource, &env]),
	}
}
