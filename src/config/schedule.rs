// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Weekly mowing schedules.
//!
//! A schedule is seven day slots in wire order (Sunday first). Each slot
//! carries a start time, a duration, and an edge-cut flag. The duration
//! doubles as the slot's enable toggle: duration `0` means the slot is
//! disabled, and re-enabling restores the last non-zero duration.

use crate::config::ToggleValue;
use crate::error::{ConfigurationError, ProtocolError};
use crate::types::Weekday;

/// Sentinel duration meaning "slot disabled".
pub const DURATION_DISABLED: u32 = 0;

/// Duration used when enabling a slot that never had one (minutes).
pub const DURATION_DEFAULT: u32 = 15;

/// One day's slot in a weekly schedule.
///
/// # Examples
///
/// ```
/// use mowr_lib::config::ScheduledDaySlot;
///
/// let mut slot = ScheduledDaySlot::new();
/// slot.set_start(8, 30).unwrap();
/// slot.set_duration(120);
/// assert!(slot.enabled());
/// assert_eq!(slot.wire_entry(), ("8:30".to_string(), 120, 0));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledDaySlot {
    start_hour: u8,
    start_minute: u8,
    duration: ToggleValue<u32>,
    edge_cut: bool,
}

impl Default for ScheduledDaySlot {
    fn default() -> Self {
        Self::new()
    }
}

impl ScheduledDaySlot {
    /// Creates a disabled slot starting at midnight.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            start_hour: 0,
            start_minute: 0,
            duration: ToggleValue::new(DURATION_DISABLED, DURATION_DEFAULT),
            edge_cut: false,
        }
    }

    /// Returns the start hour (0-23).
    #[must_use]
    pub const fn start_hour(&self) -> u8 {
        self.start_hour
    }

    /// Returns the start minute (0-59).
    #[must_use]
    pub const fn start_minute(&self) -> u8 {
        self.start_minute
    }

    /// Returns the mowing duration in minutes (0 when disabled).
    #[must_use]
    pub const fn duration(&self) -> u32 {
        self.duration.live()
    }

    /// Returns whether edge cutting is requested for this slot.
    #[must_use]
    pub const fn edge_cut(&self) -> bool {
        self.edge_cut
    }

    /// Returns whether the slot is enabled (duration non-zero).
    #[must_use]
    pub fn enabled(&self) -> bool {
        self.duration.enabled()
    }

    /// Sets the start time.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::InvalidValue` if the hour exceeds 23 or
    /// the minute exceeds 59.
    pub fn set_start(&mut self, hour: u8, minute: u8) -> Result<(), ConfigurationError> {
        if hour > 23 {
            return Err(ConfigurationError::InvalidValue {
                field: "start hour".to_string(),
                message: format!("{hour} exceeds 23"),
            });
        }
        if minute > 59 {
            return Err(ConfigurationError::InvalidValue {
                field: "start minute".to_string(),
                message: format!("{minute} exceeds 59"),
            });
        }
        self.start_hour = hour;
        self.start_minute = minute;
        Ok(())
    }

    /// Sets the duration in minutes; `0` disables the slot and remembers
    /// the previous duration.
    pub fn set_duration(&mut self, minutes: u32) {
        self.duration.set_live(minutes);
    }

    /// Enables or disables the slot, restoring the last duration on enable.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.duration.set_enabled(enabled);
    }

    /// Sets the edge-cut flag.
    pub fn set_edge_cut(&mut self, edge_cut: bool) {
        self.edge_cut = edge_cut;
    }

    /// Returns the wire triple `("H:MM", duration, edgecut)`.
    #[must_use]
    pub fn wire_entry(&self) -> (String, u32, u8) {
        (
            format!("{}:{:02}", self.start_hour, self.start_minute),
            self.duration.live(),
            u8::from(self.edge_cut),
        )
    }

    /// Applies an inbound wire triple to this slot.
    ///
    /// The duration goes through the toggle so a remote disable still keeps
    /// the previous duration restorable locally.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError::UnexpectedFormat` if the time string is not
    /// `H:MM`.
    pub fn apply_wire_entry(
        &mut self,
        time: &str,
        duration: u32,
        edge_cut: u8,
    ) -> Result<(), ProtocolError> {
        let (hour, minute) = time.split_once(':').ok_or_else(|| {
            ProtocolError::UnexpectedFormat(format!("schedule time '{time}' is not H:MM"))
        })?;
        let hour: u8 = hour.parse().map_err(|_| {
            ProtocolError::UnexpectedFormat(format!("schedule hour '{hour}' is not a number"))
        })?;
        let minute: u8 = minute.parse().map_err(|_| {
            ProtocolError::UnexpectedFormat(format!("schedule minute '{minute}' is not a number"))
        })?;
        if hour > 23 || minute > 59 {
            return Err(ProtocolError::UnexpectedFormat(format!(
                "schedule time '{time}' out of range"
            )));
        }
        self.start_hour = hour;
        self.start_minute = minute;
        self.duration.set_live(duration);
        self.edge_cut = edge_cut != 0;
        Ok(())
    }
}

/// A full week of day slots in wire order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeeklySchedule {
    days: [ScheduledDaySlot; 7],
}

impl WeeklySchedule {
    /// Creates a schedule with all slots disabled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the slot for a day.
    #[must_use]
    pub fn day(&self, day: Weekday) -> &ScheduledDaySlot {
        &self.days[day.index()]
    }

    /// Returns the slot for a day, mutably.
    pub fn day_mut(&mut self, day: Weekday) -> &mut ScheduledDaySlot {
        &mut self.days[day.index()]
    }

    /// Returns the seven wire triples in wire order.
    #[must_use]
    pub fn wire_entries(&self) -> Vec<(String, u32, u8)> {
        self.days.iter().map(ScheduledDaySlot::wire_entry).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_slot_is_disabled() {
        let slot = ScheduledDaySlot::new();
        assert!(!slot.enabled());
        assert_eq!(slot.duration(), 0);
    }

    #[test]
    fn set_start_validates_range() {
        let mut slot = ScheduledDaySlot::new();
        assert!(slot.set_start(24, 0).is_err());
        assert!(slot.set_start(0, 60).is_err());
        assert!(slot.set_start(23, 59).is_ok());
    }

    #[test]
    fn disabling_remembers_duration() {
        let mut slot = ScheduledDaySlot::new();
        slot.set_duration(90);
        slot.set_duration(0);
        assert!(!slot.enabled());

        slot.set_enabled(true);
        assert_eq!(slot.duration(), 90);
    }

    #[test]
    fn enable_without_history_uses_default_duration() {
        let mut slot = ScheduledDaySlot::new();
        slot.set_enabled(true);
        assert_eq!(slot.duration(), DURATION_DEFAULT);
    }

    #[test]
    fn wire_entry_pads_minutes() {
        let mut slot = ScheduledDaySlot::new();
        slot.set_start(9, 5).unwrap();
        slot.set_duration(60);
        slot.set_edge_cut(true);
        assert_eq!(slot.wire_entry(), ("9:05".to_string(), 60, 1));
    }

    #[test]
    fn apply_wire_entry_round_trips() {
        let mut slot = ScheduledDaySlot::new();
        slot.apply_wire_entry("16:30", 45, 1).unwrap();
        assert_eq!(slot.start_hour(), 16);
        assert_eq!(slot.start_minute(), 30);
        assert_eq!(slot.duration(), 45);
        assert!(slot.edge_cut());
    }

    #[test]
    fn apply_wire_entry_rejects_garbage() {
        let mut slot = ScheduledDaySlot::new();
        assert!(slot.apply_wire_entry("noon", 45, 0).is_err());
        assert!(slot.apply_wire_entry("25:00", 45, 0).is_err());
        assert!(slot.apply_wire_entry("10:xx", 45, 0).is_err());
    }

    #[test]
    fn remote_disable_keeps_duration_restorable() {
        let mut slot = ScheduledDaySlot::new();
        slot.apply_wire_entry("8:00", 120, 0).unwrap();
        slot.apply_wire_entry("8:00", 0, 0).unwrap();
        assert!(!slot.enabled());

        slot.set_enabled(true);
        assert_eq!(slot.duration(), 120);
    }

    #[test]
    fn weekly_schedule_wire_order() {
        let mut schedule = WeeklySchedule::new();
        schedule.day_mut(Weekday::Sunday).set_duration(30);
        let entries = schedule.wire_entries();
        assert_eq!(entries.len(), 7);
        assert_eq!(entries[0].1, 30);
        assert_eq!(entries[1].1, 0);
    }
}
