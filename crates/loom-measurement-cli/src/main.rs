// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

mod args;

use anyhow::Context;
use clap::Parser;
use loom_measurement::config::{load_from_sources, DefaultsSource, EnvSource, TomlSource};
use loom_measurement::{
	EventOptions, HitOptions, HitResponse, MeasurementClient, MeasurementError, RefundOptions,
	TransactionOptions,
};
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

use args::{Cli, CliSource, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
		.with_writer(std::io::stderr)
		.init();

	let cli = Cli::parse();

	let env = EnvSource::new();
	let flags = CliSource::new(&cli);
	let config = match &cli.config {
		Some(path) => {
			let file = TomlSource::new(path);
			load_from_sources(&[&DefaultsSource, &file, &env, &flags])
		}
		None => load_from_sources(&[&DefaultsSource, &env, &flags]),
	}
	.context("failed to load measurement configuration")?;

	let client = MeasurementClient::new(config).context("failed to create measurement client")?;
	debug!(url = %client.collect_url(), "Client ready");

	match send(&client, cli.command, cli.client_id).await {
		Ok(sent) => {
			println!("{}", sent.client_id);
			Ok(())
		}
		Err(err) => {
			if let Some(body) = err.body() {
				eprintln!("{}", serde_json::to_string_pretty(body)?);
			}
			error!(error = %err, "Hit was not accepted");
			std::process::exit(1);
		}
	}
}

async fn send(
	client: &MeasurementClient,
	command: Command,
	client_id: Option<String>,
) -> Result<HitResponse, MeasurementError> {
	match command {
		Command::Pageview {
			hostname,
			url,
			title,
		} => {
			client
				.pageview(hostname, url, title, HitOptions { client_id })
				.await
		}
		Command::Event {
			category,
			action,
			label,
			value,
		} => {
			let options = EventOptions {
				label,
				value,
				client_id,
			};
			client.event(category, action, options).await
		}
		Command::Screen(screen) => {
			client
				.screen(
					screen.app_name,
					screen.app_version,
					screen.app_id,
					screen.app_installer_id,
					screen.screen_name,
					HitOptions { client_id },
				)
				.await
		}
		Command::Transaction(tx) => {
			let options = TransactionOptions {
				affiliation: tx.affiliation,
				revenue: tx.revenue,
				shipping: tx.shipping,
				tax: tx.tax,
				currency: tx.currency,
				client_id,
			};
			client.transaction(tx.transaction_id, options).await
		}
		Command::Social {
			action,
			network,
			target,
		} => {
			client
				.social(action, network, target, HitOptions { client_id })
				.await
		}
		Command::Exception { description, fatal } => {
			client
				.exception(description, fatal, HitOptions { client_id })
				.await
		}
		Command::Refund {
			transaction_id,
			category,
			action,
			interactive,
		} => {
			let options = RefundOptions {
				category,
				action,
				non_interaction: interactive.then_some(false),
				client_id,
			};
			client.refund(transaction_id, options).await
		}
	}
}
