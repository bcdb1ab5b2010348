/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! Log models sent through the channel and their JSON representation.
//!
//! Each service defines its own log types. A log type is identified on the
//! wire by the `"type"` field of its JSON object; services hand a
//! [`LogFactory`] per type to the [`LogSerializer`] so the channel can read
//! logs back from its persistence.

mod log;
mod serializer;

pub use self::{
    log::{Log, LogFactory, LogMetadata},
    serializer::{LogSerializer, LOGS, TYPE},
};
