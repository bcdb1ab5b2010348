/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! Provides configuration for the [MobileCenter](`crate::MobileCenter`) entry
//! point and for the channel groups owned by services.

use std::time::Duration;

use crate::logging::LogLevel;

/// How the channel should batch the logs of one group.
///
/// The channel owns batching; services only tell it their preferences when
/// they register their group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupConfiguration {
    /// Number of logs that triggers sending a batch.
    pub trigger_count: usize,

    /// Maximum time a log waits before its batch is sent.
    pub trigger_interval: Duration,

    /// Maximum number of batches in flight for the group.
    pub max_parallel_batches: usize,
}

impl GroupConfiguration {
    pub const DEFAULT_TRIGGER_COUNT: usize = 50;
    pub const DEFAULT_TRIGGER_INTERVAL: Duration = Duration::from_millis(3000);
    pub const DEFAULT_MAX_PARALLEL_BATCHES: usize = 3;

    pub fn with_trigger_count(mut self, trigger_count: usize) -> Self {
        self.trigger_count = trigger_count;
        self
    }
}

impl Default for GroupConfiguration {
    fn default() -> Self {
        Self {
            trigger_count: Self::DEFAULT_TRIGGER_COUNT,
            trigger_interval: Self::DEFAULT_TRIGGER_INTERVAL,
            max_parallel_batches: Self::DEFAULT_MAX_PARALLEL_BATCHES,
        }
    }
}

#[derive(Clone, Debug)]
pub struct MobileCenterConfiguration {
    /// Application secret issued by the Mobile Center portal.
    pub app_secret: String,

    /// OS Path to the preferences database
    pub database_path: String,

    /// SDK log level applied when configuring.
    pub log_level: LogLevel,
}

#[cfg(test)]
// To avoid shipping a configuration with an empty secret, the default is only for tests
impl Default for MobileCenterConfiguration {
    fn default() -> MobileCenterConfiguration {
        MobileCenterConfiguration {
            app_secret: String::from("00000000-0000-0000-0000-000000000000"),
            database_path: String::from(""),
            log_level: LogLevel::default(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_group_defaults() {
        let config = GroupConfiguration::default();
        assert_eq!(config.trigger_count, 50);
        assert_eq!(config.trigger_interval, Duration::from_secs(3));
        assert_eq!(config.max_parallel_batches, 3);

        let config = config.with_trigger_count(1);
        assert_eq!(config.trigger_count, 1);
        assert_eq!(config.max_parallel_batches, 3);
    }
}
