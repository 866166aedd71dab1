// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Core types for the Loom measurement protocol client.
//!
//! This crate holds the protocol vocabulary shared by the SDK and the CLI:
//!
//! - [`HitType`] and the [`Hit`] definitions with their field mappings
//! - [`HitParams`], the field-code to value map sent as a form body
//! - [`client_id`] generation and resolution
//! - [`DebugResponse`], the validation server's diagnostics
//!
//! Nothing here performs I/O.

pub mod client_id;
pub mod debug;
pub mod fields;
pub mod hit;
pub mod params;

pub use debug::{first_hit_valid, DebugResponse, HitParsingResult, ParserMessage};
pub use hit::{
	Event, Exception, Hit, HitType, Pageview, Refund, ScreenView, Social, Transaction,
	REFUND_ACTION, REFUND_CATEGORY, REFUND_PRODUCT_ACTION,
};
pub use params::{HitParams, ParamValue};

/// Default measurement protocol version.
pub const PROTOCOL_VERSION: u32 = 1;
