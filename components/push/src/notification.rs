/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use std::collections::HashMap;

use mobile_center::{Activity, Bundle, BundleValue};

use crate::{firebase::RemoteMessage, LOG_TAG};

/// Intent extra holding the Firebase message id.
pub const EXTRA_GOOGLE_MESSAGE_ID: &str = "google.message_id";

/// Intent extras Firebase adds to every message; everything else is custom data.
pub const EXTRA_STANDARD_KEYS: [&str; 4] = [
    EXTRA_GOOGLE_MESSAGE_ID,
    "google.sent_time",
    "collapse_key",
    "from",
];

/// A push notification as handed to [`PushListener`].
///
/// Title and message are only known for messages received in the
/// foreground; when the user clicks a notification shown by the system,
/// only the custom data reaches the app.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PushNotification {
    pub title: Option<String>,
    pub message: Option<String>,
    pub custom_data: HashMap<String, String>,
}

impl PushNotification {
    /// Builds the notification of a clicked background push from the
    /// extras of the activity intent.
    pub fn from_extras(extras: &Bundle) -> Self {
        let mut custom_data = HashMap::new();
        for (key, value) in extras.iter() {
            if EXTRA_STANDARD_KEYS.contains(&key) {
                continue;
            }
            match value {
                BundleValue::String(s) => {
                    custom_data.insert(key.to_owned(), s.clone());
                }
                other => log::debug!(
                    target: LOG_TAG,
                    "Ignoring non string push extra {}={}",
                    key,
                    other
                ),
            }
        }
        Self {
            title: None,
            message: None,
            custom_data,
        }
    }
}

impl From<RemoteMessage> for PushNotification {
    fn from(message: RemoteMessage) -> Self {
        let (title, message_body) = match message.notification {
            Some(n) => (n.title, n.body),
            None => (None, None),
        };
        Self {
            title,
            message: message_body,
            custom_data: message.data,
        }
    }
}

/// Receives push notifications, on the UI thread for foreground messages.
pub trait PushListener: Send + Sync {
    /// `activity` is the activity in the foreground, if any.
    fn on_push_notification_received(
        &self,
        activity: Option<&Activity>,
        notification: &PushNotification,
    );
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::firebase::RemoteNotification;

    #[test]
    fn test_from_extras_drops_standard_keys() {
        let extras = Bundle::new()
            .with(EXTRA_GOOGLE_MESSAGE_ID, "reserved value by google")
            .with("google.sent_time", 1234i64)
            .with("collapse_key", "reserved value by google")
            .with("from", "reserved value by google")
            .with("custom", "value")
            .with("other", "x");
        let notification = PushNotification::from_extras(&extras);
        assert_eq!(notification.title, None);
        assert_eq!(notification.message, None);
        let expected: HashMap<String, String> = [("custom", "value"), ("other", "x")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        assert_eq!(notification.custom_data, expected);
    }

    #[test]
    fn test_from_extras_skips_non_strings() {
        let extras = Bundle::new().with("count", 3i32).with("flag", true).with("a", "b");
        let notification = PushNotification::from_extras(&extras);
        assert_eq!(notification.custom_data.len(), 1);
        assert_eq!(notification.custom_data["a"], "b");
    }

    #[test]
    fn test_from_remote_message() {
        let mut data = HashMap::new();
        data.insert("a".to_string(), "b".to_string());
        let notification = PushNotification::from(RemoteMessage {
            message_id: Some("reserved value by google".into()),
            notification: Some(RemoteNotification {
                title: Some("mytitle".into()),
                body: Some("mymessage".into()),
            }),
            data: data.clone(),
        });
        assert_eq!(notification.title.as_deref(), Some("mytitle"));
        assert_eq!(notification.message.as_deref(), Some("mymessage"));
        assert_eq!(notification.custom_data, data);

        let notification = PushNotification::from(RemoteMessage {
            data: data.clone(),
            ..Default::default()
        });
        assert_eq!(notification.title, None);
        assert_eq!(notification.message, None);
        assert_eq!(notification.custom_data, data);
    }
}
