/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use error_support::{ErrorHandling, GetErrorHandling, HandleError};

// Functions which are part of the public API should use this Result.
pub type ApiResult<T> = std::result::Result<T, PushApiError>;

#[derive(Debug, thiserror::Error)]
pub enum PushApiError {
    /// Mobile Center wasn't started with the Push service yet.
    #[error("Push is not started: {reason}")]
    NotStarted { reason: String },

    #[error("Storage error: {reason}")]
    StorageError { reason: String },

    #[error("Unexpected error: {reason}")]
    UnexpectedError { reason: String },
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    MobileCenter(#[from] mobile_center::Error),
}

impl GetErrorHandling for Error {
    type ExternalError = PushApiError;

    fn get_error_handling(&self) -> ErrorHandling<Self::ExternalError> {
        let reason = self.to_string();
        let Self::MobileCenter(inner) = self;
        match inner {
            mobile_center::Error::NotStarted(_) | mobile_center::Error::NotConfigured => {
                ErrorHandling::log(PushApiError::NotStarted { reason }, log::Level::Error)
            }
            mobile_center::Error::SqlError(_) | mobile_center::Error::StorageError(_) => {
                ErrorHandling::report(
                    PushApiError::StorageError { reason },
                    log::Level::Error,
                    "push-storage",
                )
            }
            _ => ErrorHandling::unexpected(PushApiError::UnexpectedError { reason }, None),
        }
    }
}

/// Converts the result of a core call for the public API.
pub(crate) fn api<T>(result: mobile_center::Result<T>) -> ApiResult<T> {
    result.map_err(Error::from).handle_error()
}
