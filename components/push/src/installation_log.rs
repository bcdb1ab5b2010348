/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use std::any::Any;

use mobile_center::{
    ingestion::{Log, LogFactory, LogMetadata},
    Error, Result,
};
use serde::{Deserialize, Serialize};

/// Log type of [`PushInstallationLog`].
pub const TYPE: &str = "push_installation";

/// Registers the device push token of this installation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PushInstallationLog {
    #[serde(flatten)]
    pub metadata: LogMetadata,

    pub push_token: String,
}

impl PushInstallationLog {
    pub fn new(push_token: impl Into<String>) -> Self {
        Self {
            metadata: LogMetadata::default(),
            push_token: push_token.into(),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.push_token.is_empty() {
            return Err(Error::InvalidLog("pushToken may not be empty".into()));
        }
        Ok(())
    }
}

impl Log for PushInstallationLog {
    fn log_type(&self) -> &'static str {
        TYPE
    }

    fn metadata(&self) -> &LogMetadata {
        &self.metadata
    }

    fn metadata_mut(&mut self) -> &mut LogMetadata {
        &mut self.metadata
    }

    fn to_json(&self) -> Result<serde_json::Value> {
        self.validate()?;
        Ok(serde_json::to_value(self)?)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

pub struct PushInstallationLogFactory;

impl LogFactory for PushInstallationLogFactory {
    fn create(&self, json: serde_json::Value) -> Result<Box<dyn Log>> {
        let log: PushInstallationLog = serde_json::from_value(json)?;
        log.validate()?;
        Ok(Box::new(log))
    }
}
