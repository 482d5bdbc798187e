// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Outbound command payloads.
//!
//! Every write to the device travels as a small JSON object published on
//! its command-in topic. The device echoes the resulting configuration on
//! the command-out topic, which is the only acknowledgement there is.
//!
//! # Available Commands
//!
//! | Command Type | Purpose | Payload |
//! |-------------|---------|---------|
//! | [`ActionCommand`] | Start, stop, send home, lock | `{"cmd": n}` |
//! | [`RainDelayCommand`] | Set the rain delay in minutes | `{"rd": n}` |
//! | [`ScheduleCommand`] | Write the weekly schedule | `{"sc": {...}}` |
//! | [`OneTimeScheduleCommand`] | Mow once, outside the schedule | `{"sc": {"ots": {...}}}` |
//! | [`ZoneMetersCommand`] | Write the zone-meter set | `{"mz": [...]}` |
//! | [`ZoneAllocationCommand`] | Write the rotation table | `{"mzv": [...]}` |
//!
//! # Examples
//!
//! ```
//! use mowr_lib::command::{ActionCommand, Command, RainDelayCommand};
//!
//! assert_eq!(ActionCommand::Start.to_wire(), r#"{"cmd":1}"#);
//!
//! let rd = RainDelayCommand::new(120).unwrap();
//! assert_eq!(rd.to_wire(), r#"{"rd":120}"#);
//! ```

use serde_json::{Value, json};

use crate::config::{
    DeviceConfiguration, RAIN_DELAY_MAX, WeeklySchedule, ZoneAllocation, ZoneMeters,
};
use crate::error::ConfigurationError;

/// A command that can be published to a device.
pub trait Command {
    /// Returns the JSON payload of this command.
    fn payload(&self) -> Value;

    /// Returns the payload serialized for transport.
    fn to_wire(&self) -> String {
        self.payload().to_string()
    }
}

/// The topic pair of one device.
///
/// Commands go out on `<prefix>/<serial>/commandIn`; the device reports
/// state on `<prefix>/<serial>/commandOut`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandTopics {
    command_in: String,
    command_out: String,
}

impl CommandTopics {
    /// Builds the topic pair for a device serial under a topic prefix.
    #[must_use]
    pub fn new(prefix: &str, serial: &str) -> Self {
        Self {
            command_in: format!("{prefix}/{serial}/commandIn"),
            command_out: format!("{prefix}/{serial}/commandOut"),
        }
    }

    /// Topic the device listens on.
    #[must_use]
    pub fn command_in(&self) -> &str {
        &self.command_in
    }

    /// Topic the device reports on.
    #[must_use]
    pub fn command_out(&self) -> &str {
        &self.command_out
    }
}

/// Direct device actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionCommand {
    /// Start mowing.
    Start,
    /// Stop the current activity.
    Stop,
    /// Return to the charging station.
    Home,
    /// Follow the boundary wire once for zone training.
    ZoneTraining,
    /// Lock the device.
    Lock,
    /// Unlock the device.
    Unlock,
    /// Reboot the device.
    Restart,
}

impl ActionCommand {
    /// Returns the numeric action code.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Start => 1,
            Self::Stop => 2,
            Self::Home => 3,
            Self::ZoneTraining => 4,
            Self::Lock => 5,
            Self::Unlock => 6,
            Self::Restart => 7,
        }
    }
}

impl Command for ActionCommand {
    fn payload(&self) -> Value {
        json!({ "cmd": self.code() })
    }
}

/// Sets the rain delay in minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RainDelayCommand {
    minutes: u32,
}

impl RainDelayCommand {
    /// Creates a rain-delay command.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::InvalidValue` if `minutes` exceeds
    /// [`RAIN_DELAY_MAX`].
    pub fn new(minutes: u32) -> Result<Self, ConfigurationError> {
        if minutes > RAIN_DELAY_MAX {
            return Err(ConfigurationError::InvalidValue {
                field: "rain delay".to_string(),
                message: format!("{minutes} exceeds maximum of {RAIN_DELAY_MAX} minutes"),
            });
        }
        Ok(Self { minutes })
    }
}

impl Command for RainDelayCommand {
    fn payload(&self) -> Value {
        json!({ "rd": self.minutes })
    }
}

/// Writes the weekly schedule and the time extension.
///
/// The secondary day list is only included for devices that support a
/// second daily slot; [`from_configuration`](Self::from_configuration)
/// takes care of that.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleCommand {
    time_extension: i32,
    days: Vec<(String, u32, u8)>,
    secondary_days: Option<Vec<(String, u32, u8)>>,
}

impl ScheduleCommand {
    /// Builds the schedule payload from a configuration snapshot.
    #[must_use]
    pub fn from_configuration(config: &DeviceConfiguration) -> Self {
        Self {
            time_extension: config.time_extension(),
            days: config.schedule().wire_entries(),
            secondary_days: config
                .secondary_schedule()
                .map(WeeklySchedule::wire_entries),
        }
    }
}

impl Command for ScheduleCommand {
    fn payload(&self) -> Value {
        let mut sc = json!({
            "p": self.time_extension,
            "d": self.days,
        });
        if let (Some(dd), Some(obj)) = (&self.secondary_days, sc.as_object_mut()) {
            obj.insert("dd".to_string(), json!(dd));
        }
        json!({ "sc": sc })
    }
}

/// Schedules a single mowing run outside the weekly schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OneTimeScheduleCommand {
    /// Cut the edge before mowing.
    pub border_cut: bool,
    /// Work time in minutes.
    pub work_time_minutes: u32,
}

impl Command for OneTimeScheduleCommand {
    fn payload(&self) -> Value {
        json!({
            "sc": {
                "ots": {
                    "bc": u8::from(self.border_cut),
                    "wtm": self.work_time_minutes,
                }
            }
        })
    }
}

/// Writes the zone-meter set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneMetersCommand {
    meters: Vec<u32>,
}

impl ZoneMetersCommand {
    /// Builds the payload from the current meter group.
    #[must_use]
    pub fn from_meters(meters: &ZoneMeters) -> Self {
        Self {
            meters: meters.meters().to_vec(),
        }
    }
}

impl Command for ZoneMetersCommand {
    fn payload(&self) -> Value {
        json!({ "mz": self.meters })
    }
}

/// Writes the ten-slot zone rotation table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneAllocationCommand {
    slots: Vec<usize>,
}

impl ZoneAllocationCommand {
    /// Builds the payload from the current allocation table.
    #[must_use]
    pub fn from_allocation(allocation: &ZoneAllocation) -> Self {
        Self {
            slots: allocation.slots().to_vec(),
        }
    }
}

impl Command for ZoneAllocationCommand {
    fn payload(&self) -> Value {
        json!({ "mzv": self.slots })
    }
}
