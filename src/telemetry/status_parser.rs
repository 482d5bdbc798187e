// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Parser for the device's status envelope.

use serde::Deserialize;

use crate::error::ProtocolError;
use crate::types::MowerActivity;

/// Raw status envelope as published on the command-out topic.
#[derive(Debug, Default, Deserialize)]
struct StatusEnvelope {
    /// Configuration echo.
    #[serde(default)]
    cfg: Option<ConfigSection>,

    /// Live data.
    #[serde(default)]
    dat: Option<DataSection>,
}

#[derive(Debug, Default, Deserialize)]
struct ConfigSection {
    /// Schedule block.
    #[serde(default)]
    sc: Option<ScheduleSection>,

    /// Rain delay in minutes.
    #[serde(default)]
    rd: Option<u32>,

    /// Zone meters.
    #[serde(default)]
    mz: Option<Vec<u32>>,

    /// Zone-allocation table.
    #[serde(default)]
    mzv: Option<Vec<usize>>,
}

#[derive(Debug, Default, Deserialize)]
struct ScheduleSection {
    /// Time-extension percentage (-100 = mowing disabled).
    #[serde(default)]
    p: Option<i32>,

    /// Primary schedule, seven `["H:MM", duration, edgecut]` triples.
    #[serde(default)]
    d: Option<Vec<(String, u32, u8)>>,

    /// Secondary schedule, present on newer firmware.
    #[serde(default)]
    dd: Option<Vec<(String, u32, u8)>>,
}

#[derive(Debug, Deserialize)]
struct DataSection {
    /// Activity status code.
    ls: u8,

    /// Error code (0 = none).
    #[serde(default)]
    le: Option<u8>,

    /// Firmware version.
    #[serde(default)]
    fw: Option<f64>,
}

/// One parsed status update.
///
/// Fields are `None` when the payload did not carry them; the controller
/// applies only what is present.
#[derive(Debug, Clone)]
pub struct StatusUpdate {
    /// Activity the device reports.
    pub activity: MowerActivity,
    /// Error code the device reports (0 = none).
    pub error_code: u8,
    /// Reported firmware version.
    pub firmware: Option<f64>,
    /// Time-extension percentage.
    pub time_extension: Option<i32>,
    /// Rain delay in minutes.
    pub rain_delay: Option<u32>,
    /// Primary schedule wire triples.
    pub schedule: Option<Vec<(String, u32, u8)>>,
    /// Secondary schedule wire triples.
    pub secondary_schedule: Option<Vec<(String, u32, u8)>>,
    /// Zone meters.
    pub zone_meters: Option<Vec<u32>>,
    /// Zone-allocation table.
    pub zone_allocation: Option<Vec<usize>>,
}

impl Default for StatusUpdate {
    fn default() -> Self {
        Self {
            activity: MowerActivity::Idle,
            error_code: 0,
            firmware: None,
            time_extension: None,
            rain_delay: None,
            schedule: None,
            secondary_schedule: None,
            zone_meters: None,
            zone_allocation: None,
        }
    }
}

/// Parses a status payload from the command-out topic.
///
/// # Errors
///
/// Returns `ProtocolError::Json` on malformed JSON and
/// `ProtocolError::MissingField` when the live-data section is absent.
/// Errors are reported to the caller; they never tear down the session.
///
/// # Examples
///
/// ```
/// use mowr_lib::telemetry::parse_status;
/// use mowr_lib::types::MowerActivity;
///
/// let payload = r#"{"cfg":{"sc":{"p":30}},"dat":{"ls":7,"le":0}}"#;
/// let update = parse_status(payload).unwrap();
/// assert_eq!(update.activity, MowerActivity::Mowing);
/// assert_eq!(update.time_extension, Some(30));
/// ```
pub fn parse_status(payload: &str) -> Result<StatusUpdate, ProtocolError> {
    let envelope: StatusEnvelope = serde_json::from_str(payload)?;
    let dat = envelope
        .dat
        .ok_or_else(|| ProtocolError::MissingField("dat".to_string()))?;

    let mut update = StatusUpdate {
        activity: MowerActivity::from_code(dat.ls),
        error_code: dat.le.unwrap_or(0),
        firmware: dat.fw,
        ..StatusUpdate::default()
    };

    if let Some(cfg) = envelope.cfg {
        update.rain_delay = cfg.rd;
        update.zone_meters = cfg.mz;
        update.zone_allocation = cfg.mzv;
        if let Some(sc) = cfg.sc {
            update.time_extension = sc.p;
            update.schedule = sc.d;
            update.secondary_schedule = sc.dd;
        }
    }

    Ok(update)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_envelope() {
        let payload = r#"{
            "cfg": {
                "rd": 180,
                "sc": {
                    "p": 20,
                    "d": [["8:00", 120, 0], ["9:00", 0, 0], ["10:00", 60, 1],
                          ["0:00", 0, 0], ["0:00", 0, 0], ["0:00", 0, 0], ["0:00", 0, 0]]
                },
                "mz": [3, 0, 0, 0],
                "mzv": [0, 1, 0, 1, 0, 0, 0, 0, 0, 0]
            },
            "dat": { "ls": 1, "le": 0, "fw": 3.08 }
        }"#;

        let update = parse_status(payload).unwrap();
        assert_eq!(update.activity, MowerActivity::Home);
        assert_eq!(update.error_code, 0);
        assert_eq!(update.firmware, Some(3.08));
        assert_eq!(update.rain_delay, Some(180));
        assert_eq!(update.time_extension, Some(20));
        assert_eq!(update.zone_meters, Some(vec![3, 0, 0, 0]));
        assert_eq!(update.schedule.as_ref().map(Vec::len), Some(7));
        assert!(update.secondary_schedule.is_none());
    }

    #[test]
    fn parses_data_only_envelope() {
        let update = parse_status(r#"{"dat":{"ls":7}}"#).unwrap();
        assert_eq!(update.activity, MowerActivity::Mowing);
        assert!(update.time_extension.is_none());
        assert!(update.zone_meters.is_none());
    }

    #[test]
    fn missing_data_section_is_an_error() {
        let err = parse_status(r#"{"cfg":{}}"#).unwrap_err();
        assert!(matches!(err, ProtocolError::MissingField(_)));
    }

    #[test]
    fn malformed_json_is_an_error() {
        let err = parse_status("{not json").unwrap_err();
        assert!(matches!(err, ProtocolError::Json(_)));
    }

    #[test]
    fn unknown_activity_code_is_preserved() {
        let update = parse_status(r#"{"dat":{"ls":77}}"#).unwrap();
        assert_eq!(update.activity, MowerActivity::Unknown(77));
    }

    #[test]
    fn secondary_schedule_parsed_when_present() {
        let payload = r#"{
            "cfg": { "sc": { "dd": [["7:00", 30, 0], ["0:00", 0, 0], ["0:00", 0, 0],
                                    ["0:00", 0, 0], ["0:00", 0, 0], ["0:00", 0, 0], ["0:00", 0, 0]] } },
            "dat": { "ls": 0 }
        }"#;
        let update = parse_status(payload).unwrap();
        let dd = update.secondary_schedule.unwrap();
        assert_eq!(dd[0], ("7:00".to_string(), 30, 0));
    }
}
