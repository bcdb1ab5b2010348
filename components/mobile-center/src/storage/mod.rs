/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! Handles SDK preferences storage
//!
//! Mainly exposes a trait, [`PreferencesStorage`] and a concrete type that implements the trait, [`PreferencesDb`]
//!
//! Preferences are small string values under well known keys: the enabled
//! state of each service, the last push token sent... Writes always
//! overwrite, there is no history and no expiry.

mod db;
mod schema;

pub use self::db::PreferencesDb;
use crate::Result;

pub trait PreferencesStorage: Send + Sync {
    fn get_string(&self, key: &str) -> Result<Option<String>>;

    fn put_string(&self, key: &str, value: &str) -> Result<()>;

    /// The stored boolean for `key`, or `default` when there is none.
    fn get_boolean(&self, key: &str, default: bool) -> Result<bool>;

    fn put_boolean(&self, key: &str, value: bool) -> Result<()>;

    fn remove(&self, key: &str) -> Result<()>;

    fn clear(&self) -> Result<()>;
}
