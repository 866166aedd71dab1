// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Measurement protocol Rust SDK for Loom.
//!
//! This crate formats analytics hits and posts them, form-encoded, to a
//! measurement protocol collection endpoint.
//!
//! # Features
//!
//! - **Hit builders**: pageviews, events, screen views, transactions, social
//!   interactions, exceptions and refunds
//! - **Client ids**: pin one per call or let the SDK generate a UUID v4
//! - **Debug mode**: posts to the validation endpoint and surfaces its
//!   diagnostics as [`MeasurementError::ValidationFailed`]
//! - **Layered config**: defaults, TOML file and `LOOM_MEASUREMENT_*`
//!   environment variables
//!
//! # Example
//!
//! ```ignore
//! use loom_measurement::{EventOptions, HitOptions, MeasurementClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = MeasurementClient::builder()
//!         .tracking_id("UA-XXXXX-Y")
//!         .user_agent("my-app/1.0")
//!         .build()?;
//!
//!     let sent = client
//!         .pageview("example.com", "/home", "Home", HitOptions::default())
//!         .await?;
//!
//!     // Reuse the generated id for the rest of the session.
//!     client
//!         .event(
//!             "Video",
//!             "Play",
//!             EventOptions {
//!                 client_id: Some(sent.client_id),
//!                 ..Default::default()
//!             },
//!         )
//!         .await?;
//!
//!     Ok(())
//! }
//! ```

mod client;
pub mod config;
mod error;
mod options;

pub use client::{HitResponse, MeasurementClient, MeasurementClientBuilder};
pub use config::{load_config, ClientConfig, MeasurementConfigLayer};
pub use error::{ConfigError, MeasurementError, Result};
pub use options::{EventOptions, HitOptions, RefundOptions, TransactionOptions};

// Re-export core types for convenience
pub use loom_measurement_core::{
	DebugResponse, Event, Exception, Hit, HitParams, HitParsingResult, HitType, Pageview,
	ParamValue, ParserMessage, Refund, ScreenView, Social, Transaction,
};
