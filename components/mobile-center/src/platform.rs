/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! The slice of the host platform the SDK sees.
//!
//! The host app reports its activities (screens) and their launch intents;
//! services only ever read intent extras, so that is all that is modeled.

use std::{collections::BTreeMap, fmt::Display, sync::Arc};

use crate::{storage::PreferencesStorage, ui_thread::UiThread};

/// A value stored in a [`Bundle`].
#[derive(Debug, Clone, PartialEq)]
pub enum BundleValue {
    String(String),
    Int(i32),
    Long(i64),
    Bool(bool),
    Double(f64),
}

impl Display for BundleValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::String(v) => write!(f, "{}", v),
            Self::Int(v) => write!(f, "{}", v),
            Self::Long(v) => write!(f, "{}", v),
            Self::Bool(v) => write!(f, "{}", v),
            Self::Double(v) => write!(f, "{}", v),
        }
    }
}

impl From<&str> for BundleValue {
    fn from(v: &str) -> Self {
        Self::String(v.to_owned())
    }
}

impl From<String> for BundleValue {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<i32> for BundleValue {
    fn from(v: i32) -> Self {
        Self::Int(v)
    }
}

impl From<i64> for BundleValue {
    fn from(v: i64) -> Self {
        Self::Long(v)
    }
}

impl From<bool> for BundleValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<f64> for BundleValue {
    fn from(v: f64) -> Self {
        Self::Double(v)
    }
}

/// Key-value extras, iterated in key order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bundle {
    values: BTreeMap<String, BundleValue>,
}

impl Bundle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&mut self, key: impl Into<String>, value: impl Into<BundleValue>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<BundleValue>) -> Self {
        self.put(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&BundleValue> {
        self.values.get(key)
    }

    /// The value for `key` if it is a string, `None` for missing keys and for
    /// values of any other type.
    pub fn get_string(&self, key: &str) -> Option<&str> {
        match self.values.get(key) {
            Some(BundleValue::String(s)) => Some(s),
            _ => None,
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BundleValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>, V: Into<BundleValue>> FromIterator<(K, V)> for Bundle {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Intent {
    extras: Option<Bundle>,
}

impl Intent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_extras(extras: Bundle) -> Self {
        Self {
            extras: Some(extras),
        }
    }

    pub fn extras(&self) -> Option<&Bundle> {
        self.extras.as_ref()
    }
}

/// A screen of the host app, along with the intent that launched it.
#[derive(Debug, Clone, PartialEq)]
pub struct Activity {
    name: String,
    intent: Intent,
}

impl Activity {
    pub fn new(name: impl Into<String>, intent: Intent) -> Self {
        Self {
            name: name.into(),
            intent,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn intent(&self) -> &Intent {
        &self.intent
    }
}

/// Application context handed to services when they start.
#[derive(Clone)]
pub struct Context {
    storage: Arc<dyn PreferencesStorage>,
    ui_thread: Arc<dyn UiThread>,
}

impl Context {
    pub fn new(storage: Arc<dyn PreferencesStorage>, ui_thread: Arc<dyn UiThread>) -> Self {
        Self { storage, ui_thread }
    }

    pub fn storage(&self) -> &Arc<dyn PreferencesStorage> {
        &self.storage
    }

    pub fn ui_thread(&self) -> &Arc<dyn UiThread> {
        &self.ui_thread
    }
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context").finish_non_exhaustive()
    }
}
