// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Measurement protocol field codes.

// Present on every hit.
pub const VERSION: &str = "v";
pub const TRACKING_ID: &str = "tid";
pub const CLIENT_ID: &str = "cid";
pub const HIT_TYPE: &str = "t";

// pageview
pub const DOCUMENT_HOSTNAME: &str = "dh";
pub const DOCUMENT_PATH: &str = "dp";
pub const DOCUMENT_TITLE: &str = "dt";

// event
pub const EVENT_CATEGORY: &str = "ec";
pub const EVENT_ACTION: &str = "ea";
pub const EVENT_LABEL: &str = "el";
pub const EVENT_VALUE: &str = "ev";
pub const NON_INTERACTION: &str = "ni";

// screenview
pub const APP_NAME: &str = "an";
pub const APP_VERSION: &str = "av";
pub const APP_ID: &str = "aid";
pub const APP_INSTALLER_ID: &str = "aiid";
pub const SCREEN_NAME: &str = "cd";

// transaction
pub const TRANSACTION_ID: &str = "ti";
pub const TRANSACTION_AFFILIATION: &str = "ta";
pub const TRANSACTION_REVENUE: &str = "tr";
pub const TRANSACTION_SHIPPING: &str = "ts";
pub const TRANSACTION_TAX: &str = "tt";
pub const CURRENCY_CODE: &str = "cu";
pub const PRODUCT_ACTION: &str = "pa";

// social
pub const SOCIAL_ACTION: &str = "sa";
pub const SOCIAL_NETWORK: &str = "sn";
pub const SOCIAL_TARGET: &str = "st";

// exception
pub const EXCEPTION_DESCRIPTION: &str = "exd";
pub const EXCEPTION_FATAL: &str = "exf";
