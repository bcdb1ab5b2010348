/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! The contract every SDK service implements, and the behavior they share.
//!
//! A service is started once by [`crate::MobileCenter::start`], whether it is
//! enabled or not. From then on it owns a channel group (if it sends logs)
//! and an "enabled" preference. Disabling a service clears and removes its
//! group; enabling it registers the group again.

use std::{collections::HashMap, sync::Arc};

use parking_lot::Mutex;

use crate::{
    channel::Channel,
    config::GroupConfiguration,
    ingestion::LogFactory,
    platform::{Activity, Bundle, Context},
    storage::PreferencesStorage,
    Error, Result,
};

/// Activity events reported by the host app. Every event is optional.
pub trait ActivityLifecycleCallbacks {
    fn on_activity_created(&self, _activity: &Arc<Activity>, _saved_instance_state: Option<&Bundle>) {}

    fn on_activity_started(&self, _activity: &Arc<Activity>) {}

    fn on_activity_resumed(&self, _activity: &Arc<Activity>) {}

    fn on_activity_paused(&self, _activity: &Arc<Activity>) {}

    fn on_activity_stopped(&self, _activity: &Arc<Activity>) {}

    fn on_activity_save_instance_state(&self, _activity: &Arc<Activity>, _out_state: &mut Bundle) {}

    fn on_activity_destroyed(&self, _activity: &Arc<Activity>) {}
}

/// Service specification.
pub trait MobileCenterService: ActivityLifecycleCallbacks + Send + Sync {
    /// Check whether this service is enabled or not.
    fn is_instance_enabled(&self) -> Result<bool>;

    /// Enable or disable this service.
    fn set_instance_enabled(&self, enabled: bool) -> Result<()>;

    fn service_name(&self) -> &str;

    /// Preference holding the enabled state of this service.
    fn enabled_preference_key(&self) -> String {
        enabled_preference_key(self.service_name())
    }

    /// Factories for logs sent by this service, keyed by log type.
    fn log_factories(&self) -> HashMap<String, Arc<dyn LogFactory>> {
        HashMap::new()
    }

    /// Called when the service is started (disregarding if enabled or disabled).
    fn on_started(&self, context: &Context, app_secret: &str, channel: Arc<dyn Channel>) -> Result<()>;
}

pub fn enabled_preference_key(service_name: &str) -> String {
    format!("enabled_{}", service_name)
}

/// Static description of a service.
#[derive(Debug, Clone)]
pub struct ServiceDescriptor {
    pub service_name: &'static str,

    /// Target used for the service's log records.
    pub logger_tag: &'static str,

    /// Channel group of the service's logs, `None` for services sending no logs.
    pub group_name: Option<&'static str>,

    pub group_config: GroupConfiguration,
}

struct Started {
    channel: Arc<dyn Channel>,
    storage: Arc<dyn PreferencesStorage>,
}

/// State and behavior shared by all services; each service embeds one.
pub struct ServiceCore {
    descriptor: ServiceDescriptor,
    started: Mutex<Option<Started>>,
}

impl ServiceCore {
    pub fn new(descriptor: ServiceDescriptor) -> Self {
        Self {
            descriptor,
            started: Mutex::new(None),
        }
    }

    pub fn descriptor(&self) -> &ServiceDescriptor {
        &self.descriptor
    }

    pub fn enabled_preference_key(&self) -> String {
        enabled_preference_key(self.descriptor.service_name)
    }

    pub fn channel(&self) -> Option<Arc<dyn Channel>> {
        self.started.lock().as_ref().map(|s| s.channel.clone())
    }

    pub fn storage(&self) -> Result<Arc<dyn PreferencesStorage>> {
        self.started
            .lock()
            .as_ref()
            .map(|s| s.storage.clone())
            .ok_or_else(|| Error::NotStarted(self.descriptor.service_name.to_owned()))
    }

    /// Services are enabled unless disabled explicitly.
    pub fn is_enabled(&self) -> Result<bool> {
        self.storage()?
            .get_boolean(&self.enabled_preference_key(), true)
    }

    /// Returns whether the state changed.
    pub fn set_enabled(&self, enabled: bool) -> Result<bool> {
        let started = self.started.lock();
        let Started { channel, storage } = started
            .as_ref()
            .ok_or_else(|| Error::NotStarted(self.descriptor.service_name.to_owned()))?;
        let key = self.enabled_preference_key();
        let state = if enabled { "enabled" } else { "disabled" };
        if storage.get_boolean(&key, true)? == enabled {
            log::info!(
                target: self.descriptor.logger_tag,
                "{} service has already been {}.",
                self.descriptor.service_name,
                state
            );
            return Ok(false);
        }
        if let Some(group_name) = self.descriptor.group_name {
            if enabled {
                channel.add_group(group_name, &self.descriptor.group_config);
            } else {
                channel.clear(group_name);
                channel.remove_group(group_name);
            }
        }
        storage.put_boolean(&key, enabled)?;
        log::info!(
            target: self.descriptor.logger_tag,
            "{} service has been {}.",
            self.descriptor.service_name,
            state
        );
        Ok(true)
    }

    pub fn on_started(&self, context: &Context, channel: Arc<dyn Channel>) -> Result<()> {
        let mut started = self.started.lock();
        let storage = context.storage().clone();
        let enabled = storage.get_boolean(&self.enabled_preference_key(), true)?;
        if let Some(group_name) = self.descriptor.group_name {
            channel.remove_group(group_name);
            if enabled {
                channel.add_group(group_name, &self.descriptor.group_config);
            } else {
                channel.clear(group_name);
            }
        }
        *started = Some(Started { channel, storage });
        Ok(())
    }

    /// True when the service can't send logs: not started yet, or disabled.
    pub fn is_inactive(&self) -> bool {
        if self.channel().is_none() {
            log::error!(
                target: self.descriptor.logger_tag,
                "Mobile Center hasn't been started, start it with the {} service first.",
                self.descriptor.service_name
            );
            return true;
        }
        match self.is_enabled() {
            Ok(enabled) => !enabled,
            Err(e) => {
                log::error!(
                    target: self.descriptor.logger_tag,
                    "Failed to read the {} enabled state: {}",
                    self.descriptor.service_name,
                    e
                );
                true
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        storage::PreferencesDb,
        testing::{ChannelEvent, FlakyStorage, RecordingChannel},
        ui_thread::ImmediateUiThread,
    };

    fn descriptor() -> ServiceDescriptor {
        ServiceDescriptor {
            service_name: "Analytics",
            logger_tag: "MobileCenterAnalytics",
            group_name: Some("group_analytics"),
            group_config: GroupConfiguration::default(),
        }
    }

    fn context() -> Context {
        error_support::init_for_tests();
        Context::new(
            Arc::new(PreferencesDb::open_in_memory().unwrap()),
            Arc::new(ImmediateUiThread),
        )
    }

    #[test]
    fn test_not_started() {
        let core = ServiceCore::new(descriptor());
        assert!(matches!(core.is_enabled(), Err(Error::NotStarted(name)) if name == "Analytics"));
        assert!(matches!(core.set_enabled(false), Err(Error::NotStarted(_))));
        assert!(core.is_inactive());
        assert!(core.channel().is_none());
    }

    #[test]
    fn test_start_enabled_registers_group() -> Result<()> {
        let core = ServiceCore::new(descriptor());
        let channel = Arc::new(RecordingChannel::new());
        core.on_started(&context(), channel.clone())?;
        assert_eq!(
            channel.events(),
            vec![
                ChannelEvent::RemoveGroup("group_analytics".into()),
                ChannelEvent::AddGroup("group_analytics".into(), GroupConfiguration::default()),
            ]
        );
        assert!(core.is_enabled()?);
        assert!(!core.is_inactive());
        Ok(())
    }

    #[test]
    fn test_start_disabled_clears_group() -> Result<()> {
        let core = ServiceCore::new(descriptor());
        let context = context();
        context.storage().put_boolean("enabled_Analytics", false)?;
        let channel = Arc::new(RecordingChannel::new());
        core.on_started(&context, channel.clone())?;
        assert_eq!(
            channel.events(),
            vec![
                ChannelEvent::RemoveGroup("group_analytics".into()),
                ChannelEvent::Clear("group_analytics".into()),
            ]
        );
        assert!(core.is_inactive());
        Ok(())
    }

    #[test]
    fn test_toggle() -> Result<()> {
        let core = ServiceCore::new(descriptor());
        let context = context();
        let channel = Arc::new(RecordingChannel::new());
        core.on_started(&context, channel.clone())?;
        channel.reset();

        // Already enabled: nothing happens.
        assert!(!core.set_enabled(true)?);
        assert!(channel.events().is_empty());

        assert!(core.set_enabled(false)?);
        assert_eq!(
            channel.events(),
            vec![
                ChannelEvent::Clear("group_analytics".into()),
                ChannelEvent::RemoveGroup("group_analytics".into()),
            ]
        );
        assert!(!context.storage().get_boolean("enabled_Analytics", true)?);
        assert!(!core.is_enabled()?);
        channel.reset();

        assert!(core.set_enabled(true)?);
        assert_eq!(
            channel.events(),
            vec![ChannelEvent::AddGroup(
                "group_analytics".into(),
                GroupConfiguration::default()
            )]
        );
        assert!(core.is_enabled()?);
        Ok(())
    }

    #[test]
    fn test_unreadable_state_is_inactive() -> Result<()> {
        let core = ServiceCore::new(descriptor());
        let storage = Arc::new(FlakyStorage::new()?);
        let context = Context::new(storage.clone(), Arc::new(ImmediateUiThread));
        core.on_started(&context, Arc::new(RecordingChannel::new()))?;
        assert!(!core.is_inactive());

        storage.fail_reads();
        assert!(matches!(core.is_enabled(), Err(Error::StorageError(_))));
        assert!(core.is_inactive());
        Ok(())
    }

    #[test]
    fn test_service_without_group() -> Result<()> {
        let core = ServiceCore::new(ServiceDescriptor {
            group_name: None,
            ..descriptor()
        });
        let channel = Arc::new(RecordingChannel::new());
        core.on_started(&context(), channel.clone())?;
        assert!(core.set_enabled(false)?);
        assert!(channel.events().is_empty());
        Ok(())
    }
}
