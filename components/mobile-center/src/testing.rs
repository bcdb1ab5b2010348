/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! Test doubles for the external collaborators of services.

use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;

use crate::{
    channel::Channel,
    config::GroupConfiguration,
    ingestion::Log,
    storage::{PreferencesDb, PreferencesStorage},
    Error, Result,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelEvent {
    /// Group and type of the enqueued log.
    Enqueue(String, &'static str),
    AddGroup(String, GroupConfiguration),
    RemoveGroup(String),
    Clear(String),
}

/// A [`Channel`] remembering every call made to it.
#[derive(Default)]
pub struct RecordingChannel {
    events: Mutex<Vec<ChannelEvent>>,
    logs: Mutex<Vec<Box<dyn Log>>>,
}

impl RecordingChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ChannelEvent> {
        self.events.lock().clone()
    }

    /// Enqueued logs of type `T`, in enqueue order.
    pub fn enqueued<T: Log + Clone + 'static>(&self) -> Vec<T> {
        self.logs
            .lock()
            .iter()
            .filter_map(|log| log.as_any().downcast_ref::<T>().cloned())
            .collect()
    }

    pub fn reset(&self) {
        self.events.lock().clear();
        self.logs.lock().clear();
    }
}

impl Channel for RecordingChannel {
    fn enqueue(&self, log: Box<dyn Log>, group_name: &str) {
        self.events
            .lock()
            .push(ChannelEvent::Enqueue(group_name.to_owned(), log.log_type()));
        self.logs.lock().push(log);
    }

    fn add_group(&self, group_name: &str, config: &GroupConfiguration) {
        self.events
            .lock()
            .push(ChannelEvent::AddGroup(group_name.to_owned(), config.clone()));
    }

    fn remove_group(&self, group_name: &str) {
        self.events
            .lock()
            .push(ChannelEvent::RemoveGroup(group_name.to_owned()));
    }

    fn clear(&self, group_name: &str) {
        self.events
            .lock()
            .push(ChannelEvent::Clear(group_name.to_owned()));
    }
}

/// In-memory preferences whose reads fail once [`FlakyStorage::fail_reads`] is called.
pub struct FlakyStorage {
    db: PreferencesDb,
    failing: AtomicBool,
}

impl FlakyStorage {
    pub fn new() -> Result<Self> {
        Ok(Self {
            db: PreferencesDb::open_in_memory()?,
            failing: AtomicBool::new(false),
        })
    }

    pub fn fail_reads(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    fn check(&self) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(Error::StorageError("preferences unavailable".into()));
        }
        Ok(())
    }
}

impl PreferencesStorage for FlakyStorage {
    fn get_string(&self, key: &str) -> Result<Option<String>> {
        self.check()?;
        self.db.get_string(key)
    }

    fn put_string(&self, key: &str, value: &str) -> Result<()> {
        self.db.put_string(key, value)
    }

    fn get_boolean(&self, key: &str, default: bool) -> Result<bool> {
        self.check()?;
        self.db.get_boolean(key, default)
    }

    fn put_boolean(&self, key: &str, value: bool) -> Result<()> {
        self.db.put_boolean(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.db.remove(key)
    }

    fn clear(&self) -> Result<()> {
        self.db.clear()
    }
}
