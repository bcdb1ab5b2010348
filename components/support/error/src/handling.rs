/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! Helpers for components to "handle" errors.

/// Describes what error reporting action should be taken.
#[derive(Debug, Default)]
pub struct ErrorReporting {
    /// If Some(level), will write a log message at that level.
    log_level: Option<log::Level>,
    /// If Some(report_class) will call the error reporter with details.
    report_class: Option<String>,
}

/// Specifies how an "internal" error is converted to an "external" public error and
/// any logging or reporting that should happen.
pub struct ErrorHandling<E> {
    /// The external error that should be returned.
    pub err: E,
    /// How the error should be reported.
    pub reporting: ErrorReporting,
}

impl<E> ErrorHandling<E> {
    /// Convert and log the error at `level`.
    pub fn log(err: E, level: log::Level) -> Self {
        Self {
            err,
            reporting: ErrorReporting {
                log_level: Some(level),
                ..Default::default()
            },
        }
    }

    /// Convert, log and hand the error to the application's reporter.
    pub fn report(err: E, level: log::Level, report_class: impl Into<String>) -> Self {
        Self {
            err,
            reporting: ErrorReporting {
                log_level: Some(level),
                report_class: Some(report_class.into()),
            },
        }
    }

    /// For errors that indicate a bug in the SDK rather than a problem with
    /// the app or the device.
    pub fn unexpected(err: E, report_class: Option<&str>) -> Self {
        Self::report(
            err,
            log::Level::Error,
            report_class.unwrap_or("unexpected"),
        )
    }
}

/// A trait to define how errors are converted and reported.
pub trait GetErrorHandling {
    type ExternalError;

    /// Return how to handle our internal errors
    fn get_error_handling(&self) -> ErrorHandling<Self::ExternalError>;
}

/// Handle the specified "internal" error, taking any logging or error
/// reporting actions and converting the error to the public error.
pub fn convert_log_report_error<IE, EE>(e: IE) -> EE
where
    IE: GetErrorHandling<ExternalError = EE> + std::error::Error,
    EE: std::error::Error,
{
    let handling = e.get_error_handling();
    let reporting = handling.reporting;
    if let Some(level) = reporting.log_level {
        log::log!(level, "{}", e);
    }
    if let Some(report_class) = reporting.report_class {
        crate::report_error_to_app(report_class, e.to_string());
    }
    handling.err
}

/// Extension for `Result`s carrying an internal error, used at the public API
/// boundary: `internal_call().handle_error()`.
pub trait HandleError<T, IE> {
    fn handle_error<EE>(self) -> Result<T, EE>
    where
        IE: GetErrorHandling<ExternalError = EE> + std::error::Error,
        EE: std::error::Error;
}

impl<T, IE> HandleError<T, IE> for Result<T, IE> {
    fn handle_error<EE>(self) -> Result<T, EE>
    where
        IE: GetErrorHandling<ExternalError = EE> + std::error::Error,
        EE: std::error::Error,
    {
        self.map_err(convert_log_report_error)
    }
}
