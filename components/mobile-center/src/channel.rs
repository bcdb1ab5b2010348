/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! The ingestion channel, as seen by services.
//!
//! The channel persists, batches and sends logs. It lives outside of this
//! crate; services only register their group and enqueue logs into it.

use crate::{config::GroupConfiguration, ingestion::Log};

pub trait Channel: Send + Sync {
    /// Queue `log` for sending in the batches of `group_name`.
    fn enqueue(&self, log: Box<dyn Log>, group_name: &str);

    /// Start accepting logs for `group_name`, batched according to `config`.
    fn add_group(&self, group_name: &str, config: &GroupConfiguration);

    /// Stop accepting logs for `group_name`. Logs already queued are kept.
    fn remove_group(&self, group_name: &str);

    /// Delete every log queued for `group_name`.
    fn clear(&self, group_name: &str);
}
