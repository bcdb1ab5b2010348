/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

use mobile_center::{
    ingestion::LogFactory, ui_thread::UiThread, Activity, ActivityLifecycleCallbacks, Bundle,
    Channel, Context, GroupConfiguration, MobileCenterService, Result, ServiceCore,
    ServiceDescriptor,
};
use parking_lot::Mutex;

use crate::{
    firebase::{FirebaseBridge, RemoteMessage},
    installation_log::{self, PushInstallationLog, PushInstallationLogFactory},
    notification::{PushListener, PushNotification, EXTRA_GOOGLE_MESSAGE_ID},
    LOG_TAG,
};

pub const SERVICE_NAME: &str = "Push";

/// Channel group of push logs.
pub const PUSH_GROUP: &str = "group_push";

/// Preference key of the last token sent.
pub const PREFERENCE_KEY_PUSH_TOKEN: &str = "Push.push_token";

/// Token logs are sent right away.
const TRIGGER_COUNT: usize = 1;

// Firebase collects analytics unless told otherwise, we opt out unless the app opted in.
static FIREBASE_ANALYTICS_ENABLED: AtomicBool = AtomicBool::new(false);

lazy_static::lazy_static! {
    static ref INSTANCE: Mutex<Option<Arc<Push>>> = Mutex::new(None);
}

#[derive(Default)]
struct PushState {
    /// Token last sent in this process, reset when disabled.
    push_token: Option<String>,
    listener: Option<Arc<dyn PushListener>>,
    /// Id of the last clicked background push, kept when disabled.
    last_google_message_id: Option<String>,
    /// Activity currently in the foreground.
    activity: Option<Arc<Activity>>,
    ui_thread: Option<Arc<dyn UiThread>>,
    firebase: Option<Arc<dyn FirebaseBridge>>,
}

/// Push notifications service.
///
/// Locking: the push state lock is always taken before the core lock, and
/// listeners are called with neither held.
pub struct Push {
    core: ServiceCore,
    state: Mutex<PushState>,
}

impl Push {
    /// Get shared instance.
    pub fn get_instance() -> Arc<Self> {
        INSTANCE
            .lock()
            .get_or_insert_with(|| Arc::new(Self::new()))
            .clone()
    }

    /// Drops the shared instance and the analytics opt in.
    pub fn unset_instance() {
        INSTANCE.lock().take();
        FIREBASE_ANALYTICS_ENABLED.store(false, Ordering::SeqCst);
    }

    pub fn new() -> Self {
        Self {
            core: ServiceCore::new(ServiceDescriptor {
                service_name: SERVICE_NAME,
                logger_tag: LOG_TAG,
                group_name: Some(PUSH_GROUP),
                group_config: GroupConfiguration::default().with_trigger_count(TRIGGER_COUNT),
            }),
            state: Mutex::new(PushState::default()),
        }
    }

    pub fn set_listener(&self, listener: Option<Arc<dyn PushListener>>) {
        self.state.lock().listener = listener;
    }

    pub fn set_firebase_bridge(&self, bridge: Option<Arc<dyn FirebaseBridge>>) {
        self.state.lock().firebase = bridge;
    }

    pub fn enable_firebase_analytics(&self) {
        log::debug!(target: LOG_TAG, "Enabling firebase analytics collection.");
        FIREBASE_ANALYTICS_ENABLED.store(true, Ordering::SeqCst);
        if let Some(firebase) = &self.state.lock().firebase {
            firebase.set_analytics_collection_enabled(true);
        }
    }

    /// Sends `token` to the backend unless it was already sent.
    pub fn on_token_refresh(&self, token: &str) -> Result<()> {
        let mut state = self.state.lock();
        self.refresh_token(&mut state, token)
    }

    /// Handles a message received while the app is in the foreground.
    pub fn on_message_received(self: &Arc<Self>, message: RemoteMessage) {
        log::info!(
            target: LOG_TAG,
            "Received push message in foreground id={}",
            message.message_id.as_deref().unwrap_or_default()
        );
        let ui_thread = {
            let state = self.state.lock();
            if state.listener.is_none() || !self.is_active() {
                return;
            }
            state.ui_thread.clone()
        };
        let notification = PushNotification::from(message);
        let push = Arc::clone(self);
        let task = move || push.deliver_foreground_notification(&notification);
        match ui_thread {
            Some(ui_thread) => ui_thread.run_on_ui_thread(Box::new(task)),
            None => task(),
        }
    }

    fn deliver_foreground_notification(&self, notification: &PushNotification) {
        let (listener, activity) = {
            let state = self.state.lock();
            match &state.listener {
                Some(listener) if self.is_active() => (listener.clone(), state.activity.clone()),
                _ => return,
            }
        };
        listener.on_push_notification_received(activity.as_deref(), notification);
    }

    /// Notifies the listener if `activity` was launched by clicking a push.
    fn check_push_in_activity_intent(&self, activity: &Arc<Activity>) {
        let (listener, notification) = {
            let mut state = self.state.lock();
            state.activity = Some(activity.clone());
            let listener = match &state.listener {
                Some(listener) if self.is_active() => listener.clone(),
                _ => return,
            };
            let extras = match activity.intent().extras() {
                Some(extras) => extras,
                None => return,
            };
            let google_message_id = match extras.get_string(EXTRA_GOOGLE_MESSAGE_ID) {
                Some(id) => id,
                None => return,
            };
            if state.last_google_message_id.as_deref() == Some(google_message_id) {
                return;
            }
            log::info!(
                target: LOG_TAG,
                "Clicked push message from background id={}",
                google_message_id
            );
            state.last_google_message_id = Some(google_message_id.to_owned());
            for (key, value) in extras.iter() {
                log::debug!(target: LOG_TAG, "push intent extra key={} value={}", key, value);
            }
            (listener, PushNotification::from_extras(extras))
        };
        listener.on_push_notification_received(Some(activity), &notification);
    }

    fn refresh_token(&self, state: &mut PushState, token: &str) -> Result<()> {
        if token.is_empty() {
            log::warn!(target: LOG_TAG, "Ignoring empty push token.");
            return Ok(());
        }
        if self.core.is_inactive() || state.push_token.as_deref() == Some(token) {
            return Ok(());
        }
        log::debug!(target: LOG_TAG, "Push token: {}", token);
        self.core
            .storage()?
            .put_string(PREFERENCE_KEY_PUSH_TOKEN, token)?;
        if let Some(channel) = self.core.channel() {
            channel.enqueue(Box::new(PushInstallationLog::new(token)), PUSH_GROUP);
        }
        state.push_token = Some(token.to_owned());
        Ok(())
    }

    fn apply_enabled_state(&self, state: &mut PushState, enabled: bool) -> Result<()> {
        if enabled && self.core.channel().is_some() {
            match state.firebase.as_ref().and_then(|firebase| firebase.token()) {
                Some(token) => self.refresh_token(state, &token)?,
                None => log::debug!(target: LOG_TAG, "Firebase token not available yet."),
            }
        } else {
            state.push_token = None;
        }
        Ok(())
    }

    // Not started counts as disabled.
    fn is_active(&self) -> bool {
        self.core.is_enabled().unwrap_or(false)
    }
}

impl Default for Push {
    fn default() -> Self {
        Self::new()
    }
}

impl ActivityLifecycleCallbacks for Push {
    fn on_activity_created(&self, activity: &Arc<Activity>, _saved_instance_state: Option<&Bundle>) {
        self.check_push_in_activity_intent(activity);
    }

    fn on_activity_started(&self, activity: &Arc<Activity>) {
        self.check_push_in_activity_intent(activity);
    }

    fn on_activity_resumed(&self, activity: &Arc<Activity>) {
        self.check_push_in_activity_intent(activity);
    }

    fn on_activity_paused(&self, _activity: &Arc<Activity>) {
        self.state.lock().activity = None;
    }
}

impl MobileCenterService for Push {
    fn is_instance_enabled(&self) -> Result<bool> {
        self.core.is_enabled()
    }

    fn set_instance_enabled(&self, enabled: bool) -> Result<()> {
        let mut state = self.state.lock();
        self.core.set_enabled(enabled)?;
        self.apply_enabled_state(&mut state, enabled)
    }

    fn service_name(&self) -> &str {
        SERVICE_NAME
    }

    fn log_factories(&self) -> HashMap<String, Arc<dyn LogFactory>> {
        let mut factories: HashMap<String, Arc<dyn LogFactory>> = HashMap::new();
        factories.insert(
            installation_log::TYPE.to_owned(),
            Arc::new(PushInstallationLogFactory),
        );
        factories
    }

    fn on_started(&self, context: &Context, _app_secret: &str, channel: Arc<dyn Channel>) -> Result<()> {
        let mut state = self.state.lock();
        self.core.on_started(context, channel)?;
        state.ui_thread = Some(context.ui_thread().clone());
        let enabled = self.core.is_enabled()?;
        self.apply_enabled_state(&mut state, enabled)?;
        if !FIREBASE_ANALYTICS_ENABLED.load(Ordering::SeqCst) {
            log::debug!(target: LOG_TAG, "Disabling firebase analytics collection by default.");
            if let Some(firebase) = &state.firebase {
                firebase.set_analytics_collection_enabled(false);
            }
        }
        Ok(())
    }
}
