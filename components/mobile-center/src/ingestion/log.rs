/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use std::any::Any;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::Result;

/// Fields common to every log. The channel fills them in when it accepts a
/// log, so they are absent on freshly created logs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,

    /// Session the log belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sid: Option<Uuid>,
}

impl LogMetadata {
    /// Metadata stamped with the current time.
    pub fn now() -> Self {
        Self {
            timestamp: Some(Utc::now()),
            sid: None,
        }
    }
}

pub trait Log: Send + Sync + std::fmt::Debug {
    /// Value of the `"type"` field identifying this log on the wire.
    fn log_type(&self) -> &'static str;

    fn metadata(&self) -> &LogMetadata;

    fn metadata_mut(&mut self) -> &mut LogMetadata;

    /// JSON object of the log's own fields. The serializer adds `"type"`.
    fn to_json(&self) -> Result<serde_json::Value>;

    fn as_any(&self) -> &dyn Any;
}

/// Builds a log of one type back from its JSON object.
pub trait LogFactory: Send + Sync {
    fn create(&self, json: serde_json::Value) -> Result<Box<dyn Log>>;
}
