/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! The seam to the Firebase Cloud Messaging client of the host app.

use std::collections::HashMap;

/// Access to the Firebase client, installed by the host with
/// [`crate::set_firebase_bridge`].
#[cfg_attr(test, mockall::automock)]
pub trait FirebaseBridge: Send + Sync {
    /// The current registration token, `None` until Firebase has one.
    fn token(&self) -> Option<String>;

    fn set_analytics_collection_enabled(&self, enabled: bool);
}

/// Notification part of a [`RemoteMessage`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoteNotification {
    pub title: Option<String>,
    pub body: Option<String>,
}

/// A message delivered by Firebase while the app is in the foreground.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoteMessage {
    pub message_id: Option<String>,
    pub notification: Option<RemoteNotification>,
    pub data: HashMap<String, String>,
}
