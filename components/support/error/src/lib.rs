/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! Shared error plumbing for the SDK crates.
//!
//! Every crate keeps an "internal" error type used by its implementation and a
//! smaller "public" error type handed back to the app. [`GetErrorHandling`]
//! describes how one maps to the other and whether the conversion should be
//! logged or reported; [`HandleError`] applies it at the API boundary.

mod handling;
mod reporting;

pub use handling::{convert_log_report_error, ErrorHandling, GetErrorHandling, HandleError};
pub use reporting::{
    report_error_to_app, set_application_error_reporter, unset_application_error_reporter,
    ApplicationErrorReporter,
};

/// Initialize logging for unit tests. Safe to call from every test, only the
/// first call installs the logger.
#[cfg(feature = "testing")]
pub fn init_for_tests() {
    let _ = env_logger::builder().is_test(true).try_init();
}
