// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The local mirror of one device's configuration.
//!
//! [`DeviceConfiguration`] composes the sentinel-encoded toggles (time
//! extension, schedule slots, zone meters) with the plain allocation table
//! and the device's immutable capabilities. It is mutated from two sides:
//! inbound status payloads keep the mirror in sync with the device, and
//! outbound command intents read the wire values straight from the live
//! fields.

use crate::capabilities::Capabilities;
use crate::config::{ScheduledDaySlot, ToggleValue, WeeklySchedule, ZoneAllocation, ZoneMeters};
use crate::error::ConfigurationError;
use crate::telemetry::StatusUpdate;
use crate::types::{MowerActivity, Weekday};

/// Sentinel time-extension value meaning "mowing disabled".
pub const TIME_EXTENSION_DISABLED: i32 = -100;

/// Time extension used when enabling without history (no extension).
pub const TIME_EXTENSION_DEFAULT: i32 = 0;

/// Largest accepted rain delay, in minutes.
pub const RAIN_DELAY_MAX: u32 = 300;

/// Mutable configuration state of one mower.
///
/// Created once when the device's capabilities are known; lives as long as
/// the device does.
///
/// # Examples
///
/// ```
/// use mowr_lib::{Capabilities, DeviceConfiguration};
///
/// let mut config = DeviceConfiguration::new(Capabilities::four_zone());
///
/// config.set_time_extension(30).unwrap();
/// assert!(config.mowing_enabled());
///
/// config.set_mowing_enabled(false);
/// assert_eq!(config.time_extension(), -100);
///
/// config.set_mowing_enabled(true);
/// assert_eq!(config.time_extension(), 30);
/// ```
#[derive(Debug, Clone)]
pub struct DeviceConfiguration {
    capabilities: Capabilities,
    time_extension: ToggleValue<i32>,
    schedule: WeeklySchedule,
    secondary_schedule: Option<WeeklySchedule>,
    rain_delay: u32,
    zone_meters: ZoneMeters,
    zone_allocation: ZoneAllocation,
    activity: MowerActivity,
}

impl DeviceConfiguration {
    /// Creates a configuration mirror for a device with the given
    /// capabilities.
    #[must_use]
    pub fn new(capabilities: Capabilities) -> Self {
        let secondary_schedule = capabilities
            .secondary_schedule
            .then(WeeklySchedule::default);
        let zone_meters = ZoneMeters::new(capabilities.zone_count);
        let zone_allocation = ZoneAllocation::new(capabilities.zone_count);
        Self {
            capabilities,
            time_extension: ToggleValue::new(TIME_EXTENSION_DISABLED, TIME_EXTENSION_DEFAULT),
            schedule: WeeklySchedule::new(),
            secondary_schedule,
            rain_delay: 0,
            zone_meters,
            zone_allocation,
            activity: MowerActivity::Idle,
        }
    }

    /// Returns the device's immutable capabilities.
    #[must_use]
    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    /// Returns the activity the device last reported.
    #[must_use]
    pub const fn activity(&self) -> MowerActivity {
        self.activity
    }

    fn require(supported: bool, capability: &str) -> Result<(), ConfigurationError> {
        if supported {
            Ok(())
        } else {
            Err(ConfigurationError::CapabilityNotSupported {
                capability: capability.to_string(),
            })
        }
    }

    // ========== Time extension / global mowing enable ==========

    /// Returns the live time-extension percentage (`-100` when mowing is
    /// disabled).
    #[must_use]
    pub const fn time_extension(&self) -> i32 {
        self.time_extension.live()
    }

    /// Returns whether mowing is enabled.
    #[must_use]
    pub fn mowing_enabled(&self) -> bool {
        self.time_extension.enabled()
    }

    /// Sets the time-extension percentage.
    ///
    /// Writing the sentinel `-100` disables mowing and remembers the
    /// previous extension.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::InvalidValue` if the value is outside
    /// `-100..=100`.
    pub fn set_time_extension(&mut self, percent: i32) -> Result<(), ConfigurationError> {
        if !(TIME_EXTENSION_DISABLED..=100).contains(&percent) {
            return Err(ConfigurationError::InvalidValue {
                field: "time extension".to_string(),
                message: format!("{percent} is outside [-100, 100]"),
            });
        }
        self.time_extension.set_live(percent);
        Ok(())
    }

    /// Enables or disables mowing, restoring the previous extension on
    /// enable.
    pub fn set_mowing_enabled(&mut self, enabled: bool) {
        self.time_extension.set_enabled(enabled);
    }

    // ========== Schedules ==========

    /// Returns the primary weekly schedule.
    #[must_use]
    pub fn schedule(&self) -> &WeeklySchedule {
        &self.schedule
    }

    /// Returns the primary schedule slot for a day, mutably.
    pub fn schedule_slot_mut(&mut self, day: Weekday) -> &mut ScheduledDaySlot {
        self.schedule.day_mut(day)
    }

    /// Returns the secondary weekly schedule, if the firmware supports one.
    #[must_use]
    pub fn secondary_schedule(&self) -> Option<&WeeklySchedule> {
        self.secondary_schedule.as_ref()
    }

    /// Returns the secondary schedule slot for a day, mutably.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::CapabilityNotSupported` on firmware
    /// without a secondary schedule.
    pub fn secondary_schedule_slot_mut(
        &mut self,
        day: Weekday,
    ) -> Result<&mut ScheduledDaySlot, ConfigurationError> {
        self.secondary_schedule
            .as_mut()
            .map(|schedule| schedule.day_mut(day))
            .ok_or(ConfigurationError::CapabilityNotSupported {
                capability: "secondary schedule".to_string(),
            })
    }

    // ========== Rain delay ==========

    /// Returns the rain delay in minutes.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::CapabilityNotSupported` if the device
    /// has no rain sensor.
    pub fn rain_delay(&self) -> Result<u32, ConfigurationError> {
        Self::require(self.capabilities.rain_delay, "rain delay")?;
        Ok(self.rain_delay)
    }

    /// Sets the rain delay in minutes.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::CapabilityNotSupported` if the device
    /// has no rain sensor, or `ConfigurationError::InvalidValue` above
    /// [`RAIN_DELAY_MAX`].
    pub fn set_rain_delay(&mut self, minutes: u32) -> Result<(), ConfigurationError> {
        Self::require(self.capabilities.rain_delay, "rain delay")?;
        if minutes > RAIN_DELAY_MAX {
            return Err(ConfigurationError::InvalidValue {
                field: "rain delay".to_string(),
                message: format!("{minutes} exceeds {RAIN_DELAY_MAX}"),
            });
        }
        self.rain_delay = minutes;
        Ok(())
    }

    // ========== Zones ==========

    /// Returns the zone-meter group.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::CapabilityNotSupported` on single-zone
    /// devices.
    pub fn zone_meters(&self) -> Result<&ZoneMeters, ConfigurationError> {
        Self::require(self.capabilities.multi_zone, "multi-zone")?;
        Ok(&self.zone_meters)
    }

    /// Returns the zone-meter group, mutably.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::CapabilityNotSupported` on single-zone
    /// devices.
    pub fn zone_meters_mut(&mut self) -> Result<&mut ZoneMeters, ConfigurationError> {
        Self::require(self.capabilities.multi_zone, "multi-zone")?;
        Ok(&mut self.zone_meters)
    }

    /// Returns the allocation table.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::CapabilityNotSupported` on single-zone
    /// devices.
    pub fn zone_allocation(&self) -> Result<&ZoneAllocation, ConfigurationError> {
        Self::require(self.capabilities.multi_zone, "multi-zone")?;
        Ok(&self.zone_allocation)
    }

    /// Returns the allocation table, mutably.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::CapabilityNotSupported` on single-zone
    /// devices.
    pub fn zone_allocation_mut(&mut self) -> Result<&mut ZoneAllocation, ConfigurationError> {
        Self::require(self.capabilities.multi_zone, "multi-zone")?;
        Ok(&mut self.zone_allocation)
    }

    // ========== Inbound status ==========

    /// Applies an inbound status payload to the mirror.
    ///
    /// Live values go through the same toggle rules as local writes, so a
    /// remote disable still leaves the previous value restorable. Fields
    /// absent from the payload are left untouched; fields the device does
    /// not support are ignored rather than rejected, since the device is
    /// the authority on its own reports.
    pub fn apply_status(&mut self, update: &StatusUpdate) {
        self.activity = update.activity;

        if let Some(extension) = update.time_extension {
            self.time_extension.set_live(extension);
        }
        if let Some(delay) = update.rain_delay
            && self.capabilities.rain_delay
        {
            self.rain_delay = delay;
        }
        if let Some(ref entries) = update.schedule {
            Self::apply_schedule_entries(&mut self.schedule, entries);
        }
        if let (Some(schedule), Some(entries)) = (
            self.secondary_schedule.as_mut(),
            update.secondary_schedule.as_ref(),
        ) {
            Self::apply_schedule_entries(schedule, entries);
        }
        if let Some(ref meters) = update.zone_meters
            && self.capabilities.multi_zone
            && self.zone_meters.set_meters(meters).is_err()
        {
            tracing::warn!(
                reported = meters.len(),
                expected = self.zone_meters.zone_count(),
                "ignoring zone meters with unexpected length"
            );
        }
        if let Some(ref allocation) = update.zone_allocation
            && self.capabilities.multi_zone
        {
            self.zone_allocation.apply_wire(allocation);
        }
    }

    fn apply_schedule_entries(schedule: &mut WeeklySchedule, entries: &[(String, u32, u8)]) {
        for (index, (time, duration, edge_cut)) in entries.iter().enumerate() {
            let Some(day) = Weekday::from_index(index) else {
                break;
            };
            if let Err(e) = schedule
                .day_mut(day)
                .apply_wire_entry(time, *duration, *edge_cut)
            {
                tracing::warn!(day = %day, error = %e, "ignoring malformed schedule entry");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn four_zone_config() -> DeviceConfiguration {
        DeviceConfiguration::new(Capabilities::four_zone())
    }

    #[test]
    fn time_extension_round_trip() {
        let mut config = four_zone_config();
        config.set_time_extension(55).unwrap();
        config.set_time_extension(TIME_EXTENSION_DISABLED).unwrap();
        assert!(!config.mowing_enabled());

        config.set_mowing_enabled(true);
        assert_eq!(config.time_extension(), 55);
    }

    #[test]
    fn time_extension_range_checked() {
        let mut config = four_zone_config();
        assert!(config.set_time_extension(101).is_err());
        assert!(config.set_time_extension(-101).is_err());
        assert!(config.set_time_extension(-100).is_ok());
    }

    #[test]
    fn secondary_schedule_gated_by_capability() {
        let mut basic = DeviceConfiguration::new(Capabilities::basic());
        assert!(basic.secondary_schedule().is_none());
        assert!(matches!(
            basic.secondary_schedule_slot_mut(Weekday::Monday),
            Err(ConfigurationError::CapabilityNotSupported { .. })
        ));

        let mut full = four_zone_config();
        assert!(full.secondary_schedule_slot_mut(Weekday::Monday).is_ok());
    }

    #[test]
    fn rain_delay_gated_by_capability() {
        let mut basic = DeviceConfiguration::new(Capabilities::basic());
        assert!(basic.set_rain_delay(30).is_err());
        assert!(basic.rain_delay().is_err());

        let mut full = four_zone_config();
        full.set_rain_delay(120).unwrap();
        assert_eq!(full.rain_delay().unwrap(), 120);
        assert!(full.set_rain_delay(RAIN_DELAY_MAX + 1).is_err());
    }

    #[test]
    fn zones_gated_by_capability() {
        let mut basic = DeviceConfiguration::new(Capabilities::basic());
        assert!(basic.zone_meters_mut().is_err());
        assert!(basic.zone_allocation_mut().is_err());

        let mut full = four_zone_config();
        full.zone_meters_mut().unwrap().set_meter(1, 20).unwrap();
        assert_eq!(full.zone_meters().unwrap().meters(), &[0, 20, 0, 0]);
    }

    #[test]
    fn apply_status_updates_live_values() {
        let mut config = four_zone_config();
        let update = StatusUpdate {
            activity: MowerActivity::Mowing,
            time_extension: Some(25),
            rain_delay: Some(60),
            zone_meters: Some(vec![5, 10, 0, 0]),
            ..StatusUpdate::default()
        };
        config.apply_status(&update);

        assert_eq!(config.activity(), MowerActivity::Mowing);
        assert_eq!(config.time_extension(), 25);
        assert_eq!(config.rain_delay().unwrap(), 60);
        assert_eq!(config.zone_meters().unwrap().meters(), &[5, 10, 0, 0]);
    }

    #[test]
    fn remote_disable_keeps_restore_value() {
        let mut config = four_zone_config();
        config.set_time_extension(40).unwrap();

        let update = StatusUpdate {
            time_extension: Some(TIME_EXTENSION_DISABLED),
            ..StatusUpdate::default()
        };
        config.apply_status(&update);
        assert!(!config.mowing_enabled());

        config.set_mowing_enabled(true);
        assert_eq!(config.time_extension(), 40);
    }

    #[test]
    fn apply_status_ignores_unsupported_fields() {
        let mut config = DeviceConfiguration::new(Capabilities::basic());
        let update = StatusUpdate {
            rain_delay: Some(60),
            zone_meters: Some(vec![1, 2, 3, 4]),
            ..StatusUpdate::default()
        };
        // Must not panic or reject; unsupported fields are dropped.
        config.apply_status(&update);
        assert!(config.rain_delay().is_err());
    }

    #[test]
    fn apply_status_fills_schedule() {
        let mut config = four_zone_config();
        let entries: Vec<(String, u32, u8)> = (0..7)
            .map(|i| (format!("{i}:00"), 30 + i, u8::from(i == 0)))
            .collect();
        let update = StatusUpdate {
            schedule: Some(entries),
            ..StatusUpdate::default()
        };
        config.apply_status(&update);

        let sunday = config.schedule().day(Weekday::Sunday);
        assert_eq!(sunday.duration(), 30);
        assert!(sunday.edge_cut());
        let saturday = config.schedule().day(Weekday::Saturday);
        assert_eq!(saturday.start_hour(), 6);
        assert_eq!(saturday.duration(), 36);
    }
}
