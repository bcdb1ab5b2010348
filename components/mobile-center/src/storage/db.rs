/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use std::path::Path;

use parking_lot::Mutex;
use rusqlite::{named_params, Connection, OptionalExtension};

use super::{schema, PreferencesStorage};
use crate::{logging::LOG_TAG, Error, Result};

/// SQLite backed [`PreferencesStorage`].
pub struct PreferencesDb {
    db: Mutex<Connection>,
}

impl PreferencesDb {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        // By default, file open errors are SqlErrors and aren't super helpful.
        // Instead, remap to StorageError and provide the path to the file that couldn't be opened.
        let db = Connection::open(path)
            .and_then(|db| {
                db.busy_timeout(std::time::Duration::from_secs(5))?;
                Ok(db)
            })
            .map_err(|orig| {
                Error::StorageError(format!(
                    "Could not open database file {:?} - {}",
                    path.as_os_str(),
                    orig,
                ))
            })?;
        schema::init(&db)?;
        Ok(Self { db: Mutex::new(db) })
    }

    pub fn open_in_memory() -> Result<Self> {
        let db = Connection::open_in_memory()?;
        schema::init(&db)?;
        Ok(Self { db: Mutex::new(db) })
    }
}

impl PreferencesStorage for PreferencesDb {
    fn get_string(&self, key: &str) -> Result<Option<String>> {
        Ok(self
            .db
            .lock()
            .query_row(
                "SELECT value FROM preferences WHERE key = :key",
                named_params! { ":key": key },
                |row| row.get(0),
            )
            .optional()?)
    }

    fn put_string(&self, key: &str, value: &str) -> Result<()> {
        self.db.lock().execute(
            "INSERT OR REPLACE INTO preferences (key, value) VALUES (:key, :value)",
            named_params! { ":key": key, ":value": value },
        )?;
        Ok(())
    }

    fn get_boolean(&self, key: &str, default: bool) -> Result<bool> {
        Ok(match self.get_string(key)?.as_deref() {
            None => default,
            Some("true") => true,
            Some("false") => false,
            Some(other) => {
                log::warn!(
                    target: LOG_TAG,
                    "Preference {:?} holds {:?} which is not a boolean, using {}",
                    key,
                    other,
                    default
                );
                default
            }
        })
    }

    fn put_boolean(&self, key: &str, value: bool) -> Result<()> {
        self.put_string(key, if value { "true" } else { "false" })
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.db.lock().execute(
            "DELETE FROM preferences WHERE key = :key",
            named_params! { ":key": key },
        )?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.db.lock().execute("DELETE FROM preferences", [])?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn get_db() -> Result<PreferencesDb> {
        error_support::init_for_tests();
        PreferencesDb::open_in_memory()
    }

    #[test]
    fn strings() -> Result<()> {
        let db = get_db()?;
        assert_eq!(db.get_string("Push.push_token")?, None);
        db.put_string("Push.push_token", "token-1")?;
        db.put_string("Push.push_token", "token-2")?;
        assert_eq!(db.get_string("Push.push_token")?, Some("token-2".to_owned()));
        db.remove("Push.push_token")?;
        assert_eq!(db.get_string("Push.push_token")?, None);
        // Removing a missing key is fine.
        db.remove("Push.push_token")?;
        Ok(())
    }

    #[test]
    fn booleans() -> Result<()> {
        let db = get_db()?;
        assert!(db.get_boolean("enabled_Push", true)?);
        assert!(!db.get_boolean("enabled_Push", false)?);
        db.put_boolean("enabled_Push", false)?;
        assert!(!db.get_boolean("enabled_Push", true)?);
        db.put_boolean("enabled_Push", true)?;
        assert!(db.get_boolean("enabled_Push", false)?);

        db.put_string("enabled_Push", "maybe")?;
        assert!(db.get_boolean("enabled_Push", true)?);
        assert!(!db.get_boolean("enabled_Push", false)?);
        Ok(())
    }

    #[test]
    fn clear() -> Result<()> {
        let db = get_db()?;
        db.put_string("a", "1")?;
        db.put_boolean("b", true)?;
        db.clear()?;
        assert_eq!(db.get_string("a")?, None);
        assert!(!db.get_boolean("b", false)?);
        Ok(())
    }

    #[test]
    fn persists_across_opens() -> Result<()> {
        error_support::init_for_tests();
        let tempdir = tempfile::tempdir().unwrap();
        let path = tempdir.path().join("mobile_center.sqlite");
        {
            let db = PreferencesDb::open(&path)?;
            db.put_string("Push.push_token", "persisted")?;
            db.put_boolean("enabled", false)?;
        }
        let db = PreferencesDb::open(&path)?;
        assert_eq!(db.get_string("Push.push_token")?, Some("persisted".to_owned()));
        assert!(!db.get_boolean("enabled", true)?);
        Ok(())
    }

    #[test]
    fn open_error_names_path() {
        let tempdir = tempfile::tempdir().unwrap();
        let path = tempdir.path().join("missing-dir").join("prefs.sqlite");
        match PreferencesDb::open(&path) {
            Err(Error::StorageError(msg)) => assert!(msg.contains("missing-dir")),
            Err(e) => panic!("unexpected error {}", e),
            Ok(_) => panic!("opening in a missing directory should fail"),
        }
    }
}
