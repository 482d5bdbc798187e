// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Inbound status telemetry.
//!
//! The device publishes its full state as a JSON envelope with a `cfg`
//! (configuration echo) and a `dat` (live data) section on its command-out
//! topic. This module parses that envelope into a [`StatusUpdate`] that the
//! controller feeds into [`DeviceConfiguration`](crate::config::DeviceConfiguration)
//! and [`ZoneOverrideWatcher`](crate::config::ZoneOverrideWatcher).

mod status_parser;

pub use status_parser::{StatusUpdate, parse_status};
