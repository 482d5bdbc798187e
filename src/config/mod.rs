// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The restorable configuration state model.
//!
//! The wire protocol encodes "disabled" as magic sentinel values instead of
//! boolean flags. This module keeps a local mirror of the device settings
//! that exposes a stable boolean API on top of that encoding:
//!
//! - [`ToggleValue`] - the scalar sentinel/restore pair
//! - [`ScheduledDaySlot`] / [`WeeklySchedule`] - per-weekday slots whose
//!   duration doubles as the enable toggle
//! - [`ZoneMeters`] / [`ZoneAllocation`] - the multi-zone group
//! - [`DeviceConfiguration`] - one device's composed, capability-gated state
//! - [`ZoneOverrideWatcher`] - the transient "mow one zone now" state machine

mod device_configuration;
mod override_watcher;
mod schedule;
mod toggle;
mod zones;

pub use device_configuration::{
    DeviceConfiguration, RAIN_DELAY_MAX, TIME_EXTENSION_DEFAULT, TIME_EXTENSION_DISABLED,
};
pub use override_watcher::ZoneOverrideWatcher;
pub use schedule::{DURATION_DEFAULT, DURATION_DISABLED, ScheduledDaySlot, WeeklySchedule};
pub use toggle::ToggleValue;
pub use zones::{ZoneAllocation, ZoneMeters};
