// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Per-operation option structs.
//!
//! Every field defaults to `None`, meaning "not supplied". Optional protocol
//! fields are only sent when supplied with a truthy value.

/// Options shared by hits that have no optional fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HitOptions {
	/// Pins the client id; a fresh UUID v4 is generated when absent.
	pub client_id: Option<String>,
}

impl HitOptions {
	pub fn with_client_id(client_id: impl Into<String>) -> Self {
		Self {
			client_id: Some(client_id.into()),
		}
	}
}

/// Options for [`MeasurementClient::event`](crate::MeasurementClient::event).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventOptions {
	pub label: Option<String>,
	pub value: Option<i64>,
	pub client_id: Option<String>,
}

/// Options for [`MeasurementClient::transaction`](crate::MeasurementClient::transaction).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionOptions {
	pub affiliation: Option<String>,
	pub revenue: Option<f64>,
	pub shipping: Option<f64>,
	pub tax: Option<f64>,
	pub currency: Option<String>,
	pub client_id: Option<String>,
}

/// Options for [`MeasurementClient::refund`](crate::MeasurementClient::refund).
///
/// Absent values fall back to category `Ecommerce`, action `Refund` and
/// non-interaction `true`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefundOptions {
	pub category: Option<String>,
	pub action: Option<String>,
	pub non_interaction: Option<bool>,
	pub client_id: Option<String>,
}
