/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use rusqlite::Connection;

use crate::{logging::LOG_TAG, Result};

pub const VERSION: u32 = 1;

const CREATE_TABLE_PREFERENCES_SQL: &str = "
    CREATE TABLE IF NOT EXISTS preferences (
        key TEXT PRIMARY KEY NOT NULL,
        value TEXT NOT NULL
    );
";

/// Creates or upgrades the preferences schema.
pub fn init(db: &Connection) -> Result<()> {
    let tx = db.unchecked_transaction()?;
    let version: u32 = tx.pragma_query_value(None, "user_version", |row| row.get(0))?;
    match version {
        0 => {
            tx.execute_batch(CREATE_TABLE_PREFERENCES_SQL)?;
            tx.pragma_update(None, "user_version", VERSION)?;
        }
        VERSION => (),
        other => {
            log::warn!(
                target: LOG_TAG,
                "Loaded future preferences schema version {} (we only understand version {}). \
                 Optimistically continuing",
                other,
                VERSION
            )
        }
    }
    tx.commit()?;
    Ok(())
}
