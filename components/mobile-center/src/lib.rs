/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

#![allow(unknown_lints)]
#![warn(rust_2018_idioms)]

//! # Mobile Center
//!
//! Core of the Mobile Center SDK: the [`MobileCenter`] entry point, the
//! [`MobileCenterService`] contract that services such as Push implement,
//! and the pieces services share.
//!
//! - [`channel::Channel`]: the batching log pipeline services enqueue logs into.
//! - [`ingestion`]: the log model and its JSON serialization.
//! - [`storage`]: the SQLite backed preferences store.
//! - [`crypto`]: algorithm tagged encryption of stored values.
//! - [`platform`]: the host app model (context, activities, intents and bundles).
//! - [`ui_thread`]: the thread that user facing callbacks run on.

pub mod channel;
pub mod config;
pub mod crypto;
mod error;
pub mod ingestion;
pub mod logging;
mod mobile_center;
pub mod platform;
pub mod service;
pub mod storage;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
pub mod ui_thread;

pub use crate::channel::Channel;
pub use crate::config::{GroupConfiguration, MobileCenterConfiguration};
pub use crate::error::{ApiResult, Error, MobileCenterApiError, Result};
pub use crate::logging::LogLevel;
pub use crate::mobile_center::{MobileCenter, KEY_ENABLED};
pub use crate::platform::{Activity, Bundle, BundleValue, Context, Intent};
pub use crate::service::{
    ActivityLifecycleCallbacks, MobileCenterService, ServiceCore, ServiceDescriptor,
};
