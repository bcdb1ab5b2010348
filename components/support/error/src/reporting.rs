/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use parking_lot::RwLock;

/// Application hook for errors the SDK considers worth surfacing (crash
/// reporting, telemetry...). Until one is installed reports are only logged.
pub trait ApplicationErrorReporter: Sync + Send {
    fn report_error(&self, type_name: String, message: String);
}

struct DefaultApplicationErrorReporter;

impl ApplicationErrorReporter for DefaultApplicationErrorReporter {
    fn report_error(&self, type_name: String, message: String) {
        log::error!("error reported: {}: {}", type_name, message);
    }
}

lazy_static::lazy_static! {
    static ref APPLICATION_ERROR_REPORTER: RwLock<Box<dyn ApplicationErrorReporter>> =
        RwLock::new(Box::new(DefaultApplicationErrorReporter));
}

pub fn set_application_error_reporter(reporter: Box<dyn ApplicationErrorReporter>) {
    *APPLICATION_ERROR_REPORTER.write() = reporter;
}

pub fn unset_application_error_reporter() {
    *APPLICATION_ERROR_REPORTER.write() = Box::new(DefaultApplicationErrorReporter)
}

pub fn report_error_to_app(type_name: String, message: String) {
    APPLICATION_ERROR_REPORTER
        .read()
        .report_error(type_name, message);
}
