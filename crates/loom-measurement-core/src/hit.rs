// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Hit types and their protocol field mappings.
//!
//! Each hit definition maps its semantic fields onto protocol short codes.
//! Mandatory fields are always emitted. Optional fields are emitted only when
//! supplied with a truthy value (non-empty string, non-zero number); the
//! collection endpoint treats an absent field differently from a zero-valued
//! one.
//!
//! | Hit | `t` | Fields |
//! |-----|-----|--------|
//! | [`Pageview`] | `pageview` | `dh`, `dp`, `dt` |
//! | [`Event`] | `event` | `ec`, `ea`, optional `el`, `ev` |
//! | [`ScreenView`] | `screenview` | `an`, `av`, `aid`, `aiid`, `cd` |
//! | [`Transaction`] | `transaction` | `ti`, optional `ta`, `tr`, `ts`, `tt`, `cu` |
//! | [`Social`] | `social` | `sa`, `sn`, `st` |
//! | [`Exception`] | `exception` | `exd`, `exf` |
//! | [`Refund`] | `event` | `ec`, `ea`, `ni`, `ti`, `pa=refund` |

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::fields;
use crate::params::HitParams;

/// Default event category for refunds.
pub const REFUND_CATEGORY: &str = "Ecommerce";
/// Default event action for refunds.
pub const REFUND_ACTION: &str = "Refund";
/// Product action forced on every refund.
pub const REFUND_PRODUCT_ACTION: &str = "refund";

/// The `t` tag carried by every hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HitType {
	Pageview,
	Event,
	ScreenView,
	Transaction,
	Social,
	Exception,
}

impl HitType {
	pub const fn as_str(&self) -> &'static str {
		match self {
			Self::Pageview => "pageview",
			Self::Event => "event",
			Self::ScreenView => "screenview",
			Self::Transaction => "transaction",
			Self::Social => "social",
			Self::Exception => "exception",
		}
	}
}

impl fmt::Display for HitType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for HitType {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"pageview" => Ok(Self::Pageview),
			"event" => Ok(Self::Event),
			"screenview" => Ok(Self::ScreenView),
			"transaction" => Ok(Self::Transaction),
			"social" => Ok(Self::Social),
			"exception" => Ok(Self::Exception),
			_ => Err(format!("unknown hit type: {}", s)),
		}
	}
}

/// A hit definition that can be dispatched to the collection endpoint.
pub trait Hit {
	/// The `t` tag this hit is sent with.
	fn hit_type(&self) -> HitType;

	/// The hit-specific fields, without the identity fields.
	fn params(&self) -> HitParams;
}

/// A page view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pageview {
	pub hostname: String,
	pub url: String,
	pub title: String,
}

impl Pageview {
	pub fn new(
		hostname: impl Into<String>,
		url: impl Into<String>,
		title: impl Into<String>,
	) -> Self {
		Self {
			hostname: hostname.into(),
			url: url.into(),
			title: title.into(),
		}
	}
}

impl Hit for Pageview {
	fn hit_type(&self) -> HitType {
		HitType::Pageview
	}

	fn params(&self) -> HitParams {
		HitParams::new()
			.with(fields::DOCUMENT_HOSTNAME, &self.hostname)
			.with(fields::DOCUMENT_PATH, &self.url)
			.with(fields::DOCUMENT_TITLE, &self.title)
	}
}

/// A custom event.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Event {
	pub category: String,
	pub action: String,
	pub label: Option<String>,
	pub value: Option<i64>,
}

impl Event {
	pub fn new(category: impl Into<String>, action: impl Into<String>) -> Self {
		Self {
			category: category.into(),
			action: action.into(),
			label: None,
			value: None,
		}
	}

	pub fn with_label(mut self, label: impl Into<String>) -> Self {
		self.label = Some(label.into());
		self
	}

	pub fn with_value(mut self, value: i64) -> Self {
		self.value = Some(value);
		self
	}
}

impl Hit for Event {
	fn hit_type(&self) -> HitType {
		HitType::Event
	}

	fn params(&self) -> HitParams {
		let mut params = HitParams::new()
			.with(fields::EVENT_CATEGORY, &self.category)
			.with(fields::EVENT_ACTION, &self.action);
		params.insert_truthy(fields::EVENT_LABEL, self.label.as_deref());
		params.insert_truthy(fields::EVENT_VALUE, self.value);
		params
	}
}

/// A mobile or desktop application screen view.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScreenView {
	pub app_name: String,
	pub app_version: String,
	pub app_id: String,
	pub app_installer_id: String,
	pub screen_name: String,
}

impl Hit for ScreenView {
	fn hit_type(&self) -> HitType {
		HitType::ScreenView
	}

	fn params(&self) -> HitParams {
		HitParams::new()
			.with(fields::APP_NAME, &self.app_name)
			.with(fields::APP_VERSION, &self.app_version)
			.with(fields::APP_ID, &self.app_id)
			.with(fields::APP_INSTALLER_ID, &self.app_installer_id)
			.with(fields::SCREEN_NAME, &self.screen_name)
	}
}

/// An e-commerce transaction.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Transaction {
	pub transaction_id: String,
	pub affiliation: Option<String>,
	pub revenue: Option<f64>,
	pub shipping: Option<f64>,
	pub tax: Option<f64>,
	/// ISO 4217 currency code.
	pub currency: Option<String>,
}

impl Transaction {
	pub fn new(transaction_id: impl Into<String>) -> Self {
		Self {
			transaction_id: transaction_id.into(),
			..Default::default()
		}
	}
}

impl Hit for Transaction {
	fn hit_type(&self) -> HitType {
		HitType::Transaction
	}

	fn params(&self) -> HitParams {
		let mut params = HitParams::new().with(fields::TRANSACTION_ID, &self.transaction_id);
		params.insert_truthy(fields::TRANSACTION_AFFILIATION, self.affiliation.as_deref());
		params.insert_truthy(fields::TRANSACTION_REVENUE, self.revenue);
		params.insert_truthy(fields::TRANSACTION_SHIPPING, self.shipping);
		params.insert_truthy(fields::TRANSACTION_TAX, self.tax);
		params.insert_truthy(fields::CURRENCY_CODE, self.currency.as_deref());
		params
	}
}

/// A social interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Social {
	pub action: String,
	pub network: String,
	pub target: String,
}

impl Social {
	pub fn new(
		action: impl Into<String>,
		network: impl Into<String>,
		target: impl Into<String>,
	) -> Self {
		Self {
			action: action.into(),
			network: network.into(),
			target: target.into(),
		}
	}
}

impl Hit for Social {
	fn hit_type(&self) -> HitType {
		HitType::Social
	}

	fn params(&self) -> HitParams {
		HitParams::new()
			.with(fields::SOCIAL_ACTION, &self.action)
			.with(fields::SOCIAL_NETWORK, &self.network)
			.with(fields::SOCIAL_TARGET, &self.target)
	}
}

/// An exception report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exception {
	pub description: String,
	pub is_fatal: bool,
}

impl Exception {
	pub fn new(description: impl Into<String>, is_fatal: bool) -> Self {
		Self {
			description: description.into(),
			is_fatal,
		}
	}
}

impl Hit for Exception {
	fn hit_type(&self) -> HitType {
		HitType::Exception
	}

	fn params(&self) -> HitParams {
		HitParams::new()
			.with(fields::EXCEPTION_DESCRIPTION, &self.description)
			.with(fields::EXCEPTION_FATAL, self.is_fatal)
	}
}

/// A refund, sent as a non-interaction `event` hit with `pa=refund`.
///
/// Category, action and non-interaction default to `Ecommerce`, `Refund` and
/// `true`; the product action is always `refund`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Refund {
	pub transaction_id: String,
	pub category: String,
	pub action: String,
	pub non_interaction: bool,
}

impl Refund {
	pub fn new(transaction_id: impl Into<String>) -> Self {
		Self {
			transaction_id: transaction_id.into(),
			category: REFUND_CATEGORY.to_string(),
			action: REFUND_ACTION.to_string(),
			non_interaction: true,
		}
	}
}

impl Hit for Refund {
	fn hit_type(&self) -> HitType {
		HitType::Event
	}

	fn params(&self) -> HitParams {
		HitParams::new()
			.with(fields::EVENT_CATEGORY, &self.category)
			.with(fields::EVENT_ACTION, &self.action)
			.with(fields::NON_INTERACTION, self.non_interaction)
			.with(fields::TRANSACTION_ID, &self.transaction_id)
			.with(fields::PRODUCT_ACTION, REFUND_PRODUCT_ACTION)
	}
}
