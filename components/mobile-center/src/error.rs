/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use error_support::{ErrorHandling, GetErrorHandling};

pub type Result<T, E = Error> = std::result::Result<T, E>;
// Functions which are part of the public API should use this Result.
pub type ApiResult<T> = std::result::Result<T, MobileCenterApiError>;

/// Errors returned to the app from the public [`crate::MobileCenter`] API.
#[derive(Debug, thiserror::Error)]
pub enum MobileCenterApiError {
    #[error("Mobile Center is not ready: {reason}")]
    NotConfigured { reason: String },

    #[error("Invalid argument: {reason}")]
    InvalidArgument { reason: String },

    #[error("Storage error: {reason}")]
    StorageError { reason: String },

    #[error("Crypto error: {reason}")]
    CryptoError { reason: String },

    #[error("Unexpected error: {reason}")]
    UnexpectedError { reason: String },
}

/// Internal errors, shared by the core and the service crates.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Error executing SQL: {0}")]
    SqlError(#[from] rusqlite::Error),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Error parsing JSON data: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid log: {0}")]
    InvalidLog(String),

    #[error("No log factory registered for log type {0:?}")]
    UnknownLogType(String),

    #[error("Crypto error: {0}")]
    CryptoError(String),

    #[error("Base64 decode error: {0}")]
    Base64Decode(#[from] base64::DecodeError),

    #[error("Decrypted data is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("App secret may not be empty")]
    InvalidAppSecret,

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Mobile Center hasn't been configured")]
    NotConfigured,

    #[error("{0} service hasn't been started")]
    NotStarted(String),
}

impl GetErrorHandling for Error {
    type ExternalError = MobileCenterApiError;

    fn get_error_handling(&self) -> ErrorHandling<Self::ExternalError> {
        let reason = self.to_string();
        match self {
            Self::SqlError(_) | Self::StorageError(_) => ErrorHandling::report(
                MobileCenterApiError::StorageError { reason },
                log::Level::Error,
                "mobile-center-storage",
            ),
            Self::InvalidAppSecret | Self::InvalidConfiguration(_) => ErrorHandling::log(
                MobileCenterApiError::InvalidArgument { reason },
                log::Level::Error,
            ),
            Self::NotConfigured | Self::NotStarted(_) => ErrorHandling::log(
                MobileCenterApiError::NotConfigured { reason },
                log::Level::Error,
            ),
            Self::CryptoError(_) | Self::Base64Decode(_) | Self::Utf8(_) => ErrorHandling::log(
                MobileCenterApiError::CryptoError { reason },
                log::Level::Warn,
            ),
            _ => ErrorHandling::unexpected(
                MobileCenterApiError::UnexpectedError { reason },
                None,
            ),
        }
    }
}
