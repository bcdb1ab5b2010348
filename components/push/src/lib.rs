/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

#![allow(unknown_lints)]
#![warn(rust_2018_idioms)]
//! # Mobile Center Push
//!
//! Push notifications for Mobile Center, on top of Firebase Cloud Messaging.
//!
//! The service does two things:
//!
//! * It registers the device: every new Firebase registration token is sent to
//!   the Mobile Center backend as a `push_installation` log, so the backend can
//!   target this installation.
//! * It delivers notifications to the app's [`PushListener`]. Messages received
//!   while the app is in the foreground are delivered on the UI thread with
//!   their title and message. When the app is in the background the system
//!   shows the notification itself; clicking it launches an activity whose
//!   intent carries the message extras, and the listener is then called with
//!   the custom data only.
//!
//! ## Usage
//!
//! The host installs its Firebase client with [`set_firebase_bridge`], starts
//! the service through `MobileCenter::start(vec![Push::get_instance()])`, and
//! forwards Firebase callbacks to [`on_token_refresh`] and
//! [`on_message_received`]. Firebase analytics collection is disabled when the
//! service starts unless [`enable_firebase_analytics`] was called before.

use std::sync::Arc;

mod error;
mod firebase;
mod installation_log;
mod notification;
mod push;

pub use error::{ApiResult, Error, PushApiError};
pub use firebase::{FirebaseBridge, RemoteMessage, RemoteNotification};
pub use installation_log::{PushInstallationLog, PushInstallationLogFactory};
pub use notification::{PushListener, PushNotification, EXTRA_GOOGLE_MESSAGE_ID};
pub use push::{Push, PREFERENCE_KEY_PUSH_TOKEN, PUSH_GROUP, SERVICE_NAME};

use mobile_center::MobileCenterService;

pub const LOG_TAG: &str = "MobileCenterPush";

/// Check whether Push service is enabled or not.
pub fn is_enabled() -> ApiResult<bool> {
    error::api(Push::get_instance().is_instance_enabled())
}

/// Enable or disable Push service.
pub fn set_enabled(enabled: bool) -> ApiResult<()> {
    error::api(Push::get_instance().set_instance_enabled(enabled))
}

/// Set the listener notified of push notifications, `None` removes it.
pub fn set_listener(listener: Option<Arc<dyn PushListener>>) {
    Push::get_instance().set_listener(listener)
}

/// Allow Firebase to collect analytics. Call it before starting the service
/// to keep collection on.
pub fn enable_firebase_analytics() {
    Push::get_instance().enable_firebase_analytics()
}

pub fn set_firebase_bridge(bridge: Option<Arc<dyn FirebaseBridge>>) {
    Push::get_instance().set_firebase_bridge(bridge)
}

/// Forward of Firebase's token refresh callback.
pub fn on_token_refresh(token: &str) -> ApiResult<()> {
    error::api(Push::get_instance().on_token_refresh(token))
}

/// Forward of Firebase's foreground message callback.
pub fn on_message_received(message: RemoteMessage) {
    Push::get_instance().on_message_received(message)
}
