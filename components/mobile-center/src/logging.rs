/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! SDK log levels.
//!
//! The SDK logs through the `log` facade, using the service's log tag as the
//! record target (`"MobileCenter"`, `"MobileCenterPush"`...). The app decides
//! how verbose the SDK is with [`set_log_level`]; the levels follow the
//! Android priorities the host platform uses.

use std::{
    fmt::Display,
    str::FromStr,
    sync::atomic::{AtomicU8, Ordering},
};

use crate::Error;

/// Log tag of the core SDK, service tags are built by appending the service name.
pub const LOG_TAG: &str = "MobileCenter";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum LogLevel {
    Verbose = 2,
    Debug = 3,
    Info = 4,
    Warn = 5,
    Error = 6,
    Assert = 7,
    None = 8,
}

impl LogLevel {
    /// The most verbose `log` level that passes at this SDK level. `Assert`
    /// only lets through assertion failures, which the SDK never logs.
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            Self::Verbose => log::LevelFilter::Trace,
            Self::Debug => log::LevelFilter::Debug,
            Self::Info => log::LevelFilter::Info,
            Self::Warn => log::LevelFilter::Warn,
            Self::Error => log::LevelFilter::Error,
            Self::Assert | Self::None => log::LevelFilter::Off,
        }
    }

    fn from_u8(value: u8) -> Self {
        match value {
            2 => Self::Verbose,
            3 => Self::Debug,
            4 => Self::Info,
            5 => Self::Warn,
            6 => Self::Error,
            7 => Self::Assert,
            _ => Self::None,
        }
    }
}

impl Default for LogLevel {
    fn default() -> Self {
        Self::Assert
    }
}

impl Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Verbose => "verbose",
                Self::Debug => "debug",
                Self::Info => "info",
                Self::Warn => "warn",
                Self::Error => "error",
                Self::Assert => "assert",
                Self::None => "none",
            }
        )
    }
}

impl FromStr for LogLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_lowercase().as_str() {
            "verbose" => Self::Verbose,
            "debug" => Self::Debug,
            "info" => Self::Info,
            "warn" => Self::Warn,
            "error" => Self::Error,
            "assert" => Self::Assert,
            "none" => Self::None,
            _ => {
                return Err(Error::InvalidConfiguration(format!(
                    "Invalid log level {:?}",
                    s
                )))
            }
        })
    }
}

static LOG_LEVEL: AtomicU8 = AtomicU8::new(LogLevel::Assert as u8);

pub fn set_log_level(level: LogLevel) {
    LOG_LEVEL.store(level as u8, Ordering::SeqCst);
    log::set_max_level(level.to_level_filter());
}

pub fn get_log_level() -> LogLevel {
    LogLevel::from_u8(LOG_LEVEL.load(Ordering::SeqCst))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_level_filters() {
        assert_eq!(LogLevel::Verbose.to_level_filter(), log::LevelFilter::Trace);
        assert_eq!(LogLevel::Warn.to_level_filter(), log::LevelFilter::Warn);
        assert_eq!(LogLevel::Assert.to_level_filter(), log::LevelFilter::Off);
        assert!(LogLevel::Debug < LogLevel::Error);
    }

    #[test]
    fn test_parse() {
        assert_eq!("VERBOSE".parse::<LogLevel>().unwrap(), LogLevel::Verbose);
        assert_eq!(LogLevel::Info.to_string().parse::<LogLevel>().unwrap(), LogLevel::Info);
        assert!("loud".parse::<LogLevel>().is_err());
    }

    #[test]
    fn test_set_and_get() {
        let previous = get_log_level();
        set_log_level(LogLevel::Debug);
        assert_eq!(get_log_level(), LogLevel::Debug);
        assert_eq!(log::max_level(), log::LevelFilter::Debug);
        set_log_level(previous);
    }
}
