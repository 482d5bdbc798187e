// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device capability detection and gating.
//!
//! Capabilities describe which configuration fields are meaningful for a
//! particular mower. They are derived **once**, when the device's product
//! metadata and firmware version become known, and never re-derived during
//! the device's lifetime; configuration writes against an unsupported field
//! fail instead of being silently dropped.

/// Firmware version that introduced the secondary (party/double) schedule.
pub const MIN_FIRMWARE_SECONDARY_SCHEDULE: f64 = 3.06;

/// Firmware version that introduced the rain-delay start timestamp.
pub const MIN_FIRMWARE_RAIN_DELAY_START: f64 = 3.07;

/// Firmware version that introduced the one-time scheduler.
pub const MIN_FIRMWARE_ONE_TIME_SCHEDULER: f64 = 3.08;

/// Number of slots in the zone-allocation table.
pub const ZONE_ALLOCATION_SLOTS: usize = 10;

/// Capabilities of a mower.
///
/// Each flag gates a group of configuration fields. Flags are immutable
/// after construction.
///
/// # Examples
///
/// ```
/// use mowr_lib::Capabilities;
///
/// // Derived from product metadata and firmware version
/// let caps = Capabilities::from_device_info(3.08, 4, &["lock", "rain_delay"]);
/// assert!(caps.lock);
/// assert!(caps.multi_zone);
/// assert!(caps.one_time_scheduler);
///
/// // Older firmware loses the newer schedulers
/// let old = Capabilities::from_device_info(3.05, 1, &[]);
/// assert!(!old.secondary_schedule);
/// assert!(!old.one_time_scheduler);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
// Each boolean represents an independent device feature flag that cannot be
// meaningfully combined into an enum or state machine.
#[allow(clippy::struct_excessive_bools)]
pub struct Capabilities {
    /// Number of mowing zones the device is configured for (1-4).
    pub zone_count: usize,

    /// Supports locking the device.
    pub lock: bool,

    /// Supports a rain delay.
    pub rain_delay: bool,

    /// Reports the rain-delay start timestamp.
    pub rain_delay_start: bool,

    /// Supports multiple mowing zones.
    pub multi_zone: bool,

    /// Supports the one-time ("mow now") scheduler.
    pub one_time_scheduler: bool,

    /// Supports an independent secondary schedule.
    pub secondary_schedule: bool,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            zone_count: 1,
            lock: false,
            rain_delay: false,
            rain_delay_start: false,
            multi_zone: false,
            one_time_scheduler: false,
            secondary_schedule: false,
        }
    }
}

impl Capabilities {
    /// Creates capabilities for a basic single-zone mower.
    #[must_use]
    pub const fn basic() -> Self {
        Self {
            zone_count: 1,
            lock: false,
            rain_delay: false,
            rain_delay_start: false,
            multi_zone: false,
            one_time_scheduler: false,
            secondary_schedule: false,
        }
    }

    /// Creates capabilities for a current-generation four-zone mower.
    ///
    /// - Lock, rain delay, rain-delay start
    /// - Four zones
    /// - Both schedulers
    #[must_use]
    pub const fn four_zone() -> Self {
        Self {
            zone_count: 4,
            lock: true,
            rain_delay: true,
            rain_delay_start: true,
            multi_zone: true,
            one_time_scheduler: true,
            secondary_schedule: true,
        }
    }

    /// Derives capabilities from device metadata and firmware version.
    ///
    /// Feature names in `features` come from the product metadata of the
    /// cloud API (e.g. `"lock"`, `"rain_delay"`, `"multi_zone"`); the
    /// scheduler flags are gated purely by firmware-version thresholds.
    ///
    /// # Arguments
    ///
    /// * `firmware_version` - The reported firmware version (e.g. `3.08`)
    /// * `zone_count` - The configured zone count; clamped to 1-4
    /// * `features` - Feature names from the product metadata
    #[must_use]
    pub fn from_device_info(firmware_version: f64, zone_count: usize, features: &[&str]) -> Self {
        let multi_zone = features.contains(&"multi_zone") || zone_count > 1;
        Self {
            zone_count: zone_count.clamp(1, 4),
            lock: features.contains(&"lock"),
            rain_delay: features.contains(&"rain_delay"),
            rain_delay_start: features.contains(&"rain_delay")
                && firmware_version >= MIN_FIRMWARE_RAIN_DELAY_START,
            multi_zone,
            one_time_scheduler: firmware_version >= MIN_FIRMWARE_ONE_TIME_SCHEDULER,
            secondary_schedule: firmware_version >= MIN_FIRMWARE_SECONDARY_SCHEDULE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_capabilities() {
        let caps = Capabilities::default();
        assert_eq!(caps.zone_count, 1);
        assert!(!caps.lock);
        assert!(!caps.multi_zone);
        assert!(!caps.secondary_schedule);
    }

    #[test]
    fn four_zone_capabilities() {
        let caps = Capabilities::four_zone();
        assert_eq!(caps.zone_count, 4);
        assert!(caps.multi_zone);
        assert!(caps.one_time_scheduler);
    }

    #[test]
    fn firmware_thresholds_gate_schedulers() {
        let old = Capabilities::from_device_info(3.05, 4, &[]);
        assert!(!old.secondary_schedule);
        assert!(!old.one_time_scheduler);

        let mid = Capabilities::from_device_info(3.06, 4, &[]);
        assert!(mid.secondary_schedule);
        assert!(!mid.one_time_scheduler);

        let new = Capabilities::from_device_info(3.08, 4, &[]);
        assert!(new.secondary_schedule);
        assert!(new.one_time_scheduler);
    }

    #[test]
    fn rain_delay_start_requires_feature_and_firmware() {
        let no_feature = Capabilities::from_device_info(3.08, 1, &[]);
        assert!(!no_feature.rain_delay_start);

        let old_firmware = Capabilities::from_device_info(3.06, 1, &["rain_delay"]);
        assert!(old_firmware.rain_delay);
        assert!(!old_firmware.rain_delay_start);

        let both = Capabilities::from_device_info(3.07, 1, &["rain_delay"]);
        assert!(both.rain_delay_start);
    }

    #[test]
    fn zone_count_is_clamped() {
        let caps = Capabilities::from_device_info(3.0, 9, &[]);
        assert_eq!(caps.zone_count, 4);

        let none = Capabilities::from_device_info(3.0, 0, &[]);
        assert_eq!(none.zone_count, 1);
    }

    #[test]
    fn multi_zone_implied_by_zone_count() {
        let caps = Capabilities::from_device_info(3.0, 4, &[]);
        assert!(caps.multi_zone);
    }
}
