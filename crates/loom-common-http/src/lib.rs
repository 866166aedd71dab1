// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Shared HTTP utilities for Loom.
//!
//! This crate provides:
//! - HTTP client construction with an optional request timeout
//! - A request extension that attaches `User-Agent` only when configured
//! - JSON response body decoding with an empty-body fallback

mod body;
mod client;

pub use body::decode_json_body;
pub use client::{builder, builder_with_timeout, new_client, RequestBuilderExt};
