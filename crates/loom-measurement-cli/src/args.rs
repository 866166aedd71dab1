// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Command-line arguments and their mapping onto configuration.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use loom_measurement::config::{ConfigSource, Precedence};
use loom_measurement::{ConfigError, MeasurementConfigLayer};

/// Send measurement protocol hits from the command line.
#[derive(Parser, Debug)]
#[command(name = "loom-measure", version)]
pub struct Cli {
	/// Tracking id of the destination property
	#[arg(long, global = true)]
	pub tracking_id: Option<String>,

	/// Client id to send the hit as (a UUID v4 is generated when absent)
	#[arg(long, global = true)]
	pub client_id: Option<String>,

	/// User-Agent header to send
	#[arg(long, global = true)]
	pub user_agent: Option<String>,

	/// Send to the validation endpoint and report its diagnostics
	#[arg(long, global = true)]
	pub debug: bool,

	/// Collection host, e.g. https://www.google-analytics.com
	#[arg(long, global = true)]
	pub base_url: Option<String>,

	/// TOML config file
	#[arg(long, global = true, env = "LOOM_MEASUREMENT_CONFIG")]
	pub config: Option<PathBuf>,

	#[command(subcommand)]
	pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
	/// Record a page view
	Pageview {
		hostname: String,
		url: String,
		title: String,
	},
	/// Record a custom event
	Event {
		category: String,
		action: String,
		#[arg(long)]
		label: Option<String>,
		#[arg(long)]
		value: Option<i64>,
	},
	/// Record an application screen view
	Screen(ScreenArgs),
	/// Record an e-commerce transaction
	Transaction(TransactionArgs),
	/// Record a social interaction
	Social {
		action: String,
		network: String,
		target: String,
	},
	/// Record an exception
	Exception {
		description: String,
		#[arg(long)]
		fatal: bool,
	},
	/// Record a refund for a transaction
	Refund {
		transaction_id: String,
		#[arg(long)]
		category: Option<String>,
		#[arg(long)]
		action: Option<String>,
		/// Send the refund as an interactive event
		#[arg(long)]
		interactive: bool,
	},
}

#[derive(Args, Debug)]
pub struct ScreenArgs {
	pub app_name: String,
	pub app_version: String,
	pub app_id: String,
	pub app_installer_id: String,
	pub screen_name: String,
}

#[derive(Args, Debug)]
pub struct TransactionArgs {
	pub transaction_id: String,
	#[arg(long)]
	pub affiliation: Option<String>,
	#[arg(long)]
	pub revenue: Option<f64>,
	#[arg(long)]
	pub shipping: Option<f64>,
	#[arg(long)]
	pub tax: Option<f64>,
	#[arg(long)]
	pub currency: Option<String>,
}

/// Command-line flags as the highest-precedence config layer.
pub struct CliSource {
	layer: MeasurementConfigLayer,
}

impl CliSource {
	pub fn new(cli: &Cli) -> Self {
		Self {
			layer: MeasurementConfigLayer {
				tracking_id: cli.tracking_id.clone(),
				user_agent: cli.user_agent.clone(),
				debug: cli.debug.then_some(true),
				base_url: cli.base_url.clone(),
				..Default::default()
			},
		}
	}
}

impl ConfigSource for CliSource {
	fn name(&self) -> &'static str {
		"cli"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Cli
	}

	fn load(&self) -> Result<MeasurementConfigLayer, ConfigError> {
		Ok(self.layer.clone())
	}
}
