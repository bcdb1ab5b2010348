/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! SDK entry point.
//!
//! The app configures Mobile Center once with its app secret and the
//! ingestion channel, then starts the services it wants. Activity events
//! reported to [`MobileCenter`] are forwarded to every started service.

use std::sync::Arc;

use error_support::HandleError;
use parking_lot::Mutex;

use crate::{
    channel::Channel,
    config::MobileCenterConfiguration,
    error::{ApiResult, Error, Result},
    ingestion::LogSerializer,
    logging::{self, LogLevel, LOG_TAG},
    platform::{Activity, Bundle, Context},
    service::{ActivityLifecycleCallbacks, MobileCenterService},
    storage::PreferencesDb,
    ui_thread::LooperThread,
};

/// Preference key of the SDK wide enabled state.
pub const KEY_ENABLED: &str = "enabled";

const UI_THREAD_NAME: &str = "mobile-center-ui";

struct Configuration {
    context: Context,
    app_secret: String,
    channel: Arc<dyn Channel>,
}

#[derive(Default)]
struct State {
    configuration: Option<Configuration>,
    services: Vec<Arc<dyn MobileCenterService>>,
}

lazy_static::lazy_static! {
    static ref INSTANCE: Mutex<Option<Arc<MobileCenter>>> = Mutex::new(None);
}

pub struct MobileCenter {
    state: Mutex<State>,
    log_serializer: Arc<LogSerializer>,
}

impl MobileCenter {
    /// Get shared instance.
    pub fn get_instance() -> Arc<Self> {
        INSTANCE
            .lock()
            .get_or_insert_with(|| Arc::new(Self::new()))
            .clone()
    }

    /// Forget the shared instance, the next [`MobileCenter::get_instance`] creates a new one.
    pub fn unset_instance() {
        INSTANCE.lock().take();
    }

    pub fn new() -> Self {
        Self {
            state: Mutex::new(State::default()),
            log_serializer: Arc::new(LogSerializer::new()),
        }
    }

    pub fn set_log_level(level: LogLevel) {
        logging::set_log_level(level)
    }

    pub fn get_log_level() -> LogLevel {
        logging::get_log_level()
    }

    /// Configures the SDK with a preferences database at
    /// `config.database_path` and a dedicated UI thread.
    pub fn configure(
        &self,
        config: &MobileCenterConfiguration,
        channel: Arc<dyn Channel>,
    ) -> ApiResult<()> {
        self.try_configure(config, channel).handle_error()
    }

    /// Configures the SDK with a context built by the host.
    pub fn configure_with_context(
        &self,
        context: Context,
        app_secret: &str,
        channel: Arc<dyn Channel>,
    ) -> ApiResult<()> {
        self.try_configure_with_context(context, app_secret, channel)
            .handle_error()
    }

    pub fn is_configured(&self) -> bool {
        self.state.lock().configuration.is_some()
    }

    /// Starts `services`. Services already started are skipped.
    pub fn start(&self, services: Vec<Arc<dyn MobileCenterService>>) -> ApiResult<()> {
        self.try_start(services).handle_error()
    }

    pub fn is_enabled(&self) -> ApiResult<bool> {
        self.try_is_enabled().handle_error()
    }

    /// Enables or disables the SDK, and every started service along with it.
    pub fn set_enabled(&self, enabled: bool) -> ApiResult<()> {
        self.try_set_enabled(enabled).handle_error()
    }

    /// Names of the started services, in start order.
    pub fn started_services(&self) -> Vec<String> {
        self.state
            .lock()
            .services
            .iter()
            .map(|s| s.service_name().to_owned())
            .collect()
    }

    /// Serializer knowing the log types of every started service.
    pub fn log_serializer(&self) -> Arc<LogSerializer> {
        self.log_serializer.clone()
    }

    fn try_configure(
        &self,
        config: &MobileCenterConfiguration,
        channel: Arc<dyn Channel>,
    ) -> Result<()> {
        validate_app_secret(&config.app_secret)?;
        if self.is_configured() {
            log::warn!(target: LOG_TAG, "Mobile Center may only be configured once.");
            return Ok(());
        }
        logging::set_log_level(config.log_level);
        let storage = Arc::new(PreferencesDb::open(&config.database_path)?);
        let ui_thread = Arc::new(LooperThread::spawn(UI_THREAD_NAME)?);
        self.try_configure_with_context(
            Context::new(storage, ui_thread),
            &config.app_secret,
            channel,
        )
    }

    fn try_configure_with_context(
        &self,
        context: Context,
        app_secret: &str,
        channel: Arc<dyn Channel>,
    ) -> Result<()> {
        validate_app_secret(app_secret)?;
        let mut state = self.state.lock();
        if state.configuration.is_some() {
            log::warn!(target: LOG_TAG, "Mobile Center may only be configured once.");
            return Ok(());
        }
        state.configuration = Some(Configuration {
            context,
            app_secret: app_secret.trim().to_owned(),
            channel,
        });
        log::info!(target: LOG_TAG, "Mobile Center SDK configured successfully.");
        Ok(())
    }

    fn try_start(&self, services: Vec<Arc<dyn MobileCenterService>>) -> Result<()> {
        let (context, app_secret, channel, services) = {
            let mut state = self.state.lock();
            let (context, app_secret, channel) = match &state.configuration {
                Some(c) => (c.context.clone(), c.app_secret.clone(), c.channel.clone()),
                None => return Err(Error::NotConfigured),
            };
            // Claim the names now, services are started without our lock held.
            let mut starting = Vec::new();
            for service in services {
                let name = service.service_name();
                if state.services.iter().any(|s| s.service_name() == name) {
                    log::warn!(
                        target: LOG_TAG,
                        "Mobile Center has already started the service named {}.",
                        name
                    );
                    continue;
                }
                state.services.push(service.clone());
                starting.push(service);
            }
            (context, app_secret, channel, starting)
        };
        let enabled = context.storage().get_boolean(KEY_ENABLED, true)?;
        for (i, service) in services.iter().enumerate() {
            if let Err(e) = self.start_service(service, &context, &app_secret, &channel, enabled) {
                let failed = &services[i..];
                self.state
                    .lock()
                    .services
                    .retain(|s| !failed.iter().any(|f| Arc::ptr_eq(s, f)));
                return Err(e);
            }
        }
        Ok(())
    }

    fn start_service(
        &self,
        service: &Arc<dyn MobileCenterService>,
        context: &Context,
        app_secret: &str,
        channel: &Arc<dyn Channel>,
        enabled: bool,
    ) -> Result<()> {
        for (log_type, factory) in service.log_factories() {
            self.log_serializer.add_log_factory(log_type, factory);
        }
        // A disabled SDK starts every service disabled.
        if !enabled {
            context
                .storage()
                .put_boolean(&service.enabled_preference_key(), false)?;
        }
        service.on_started(context, app_secret, channel.clone())?;
        log::info!(target: LOG_TAG, "{} service started.", service.service_name());
        Ok(())
    }

    fn try_is_enabled(&self) -> Result<bool> {
        self.context()?.storage().get_boolean(KEY_ENABLED, true)
    }

    fn try_set_enabled(&self, enabled: bool) -> Result<()> {
        let storage = self.context()?.storage().clone();
        for service in self.services() {
            service.set_instance_enabled(enabled)?;
        }
        storage.put_boolean(KEY_ENABLED, enabled)?;
        log::info!(
            target: LOG_TAG,
            "Mobile Center has been {}.",
            if enabled { "enabled" } else { "disabled" }
        );
        Ok(())
    }

    fn context(&self) -> Result<Context> {
        self.state
            .lock()
            .configuration
            .as_ref()
            .map(|c| c.context.clone())
            .ok_or(Error::NotConfigured)
    }

    // Callbacks run without our lock held, services may call back into us.
    fn services(&self) -> Vec<Arc<dyn MobileCenterService>> {
        self.state.lock().services.clone()
    }
}

impl Default for MobileCenter {
    fn default() -> Self {
        Self::new()
    }
}

impl ActivityLifecycleCallbacks for MobileCenter {
    fn on_activity_created(&self, activity: &Arc<Activity>, saved_instance_state: Option<&Bundle>) {
        for service in self.services() {
            service.on_activity_created(activity, saved_instance_state);
        }
    }

    fn on_activity_started(&self, activity: &Arc<Activity>) {
        for service in self.services() {
            service.on_activity_started(activity);
        }
    }

    fn on_activity_resumed(&self, activity: &Arc<Activity>) {
        for service in self.services() {
            service.on_activity_resumed(activity);
        }
    }

    fn on_activity_paused(&self, activity: &Arc<Activity>) {
        for service in self.services() {
            service.on_activity_paused(activity);
        }
    }

    fn on_activity_stopped(&self, activity: &Arc<Activity>) {
        for service in self.services() {
            service.on_activity_stopped(activity);
        }
    }

    fn on_activity_save_instance_state(&self, activity: &Arc<Activity>, out_state: &mut Bundle) {
        for service in self.services() {
            service.on_activity_save_instance_state(activity, out_state);
        }
    }

    fn on_activity_destroyed(&self, activity: &Arc<Activity>) {
        for service in self.services() {
            service.on_activity_destroyed(activity);
        }
    }
}

fn validate_app_secret(app_secret: &str) -> Result<()> {
    if app_secret.trim().is_empty() {
        return Err(Error::InvalidAppSecret);
    }
    Ok(())
}
