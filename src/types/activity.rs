// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Mower activity codes.
//!
//! The device reports its current activity as a numeric status code in the
//! `dat.ls` field of every status payload. This module maps the known codes
//! to a typed enum; unknown codes are preserved rather than rejected so that
//! newer firmware does not break parsing.

use std::fmt;

/// Activity the mower currently reports.
///
/// # Examples
///
/// ```
/// use mowr_lib::types::MowerActivity;
///
/// let activity = MowerActivity::from_code(1);
/// assert_eq!(activity, MowerActivity::Home);
/// assert!(activity.is_near_home());
///
/// assert!(!MowerActivity::Mowing.is_near_home());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MowerActivity {
    /// Idle, docked without charging.
    Idle,
    /// Docked at the charging station.
    Home,
    /// Running the start sequence before leaving.
    StartSequence,
    /// Driving away from the charging station.
    LeavingHome,
    /// Following the boundary wire.
    FollowWire,
    /// Actively mowing.
    Mowing,
    /// Returning to the charging station.
    GoingHome,
    /// Searching for the assigned zone along the wire.
    SearchingZone,
    /// Paused by the user.
    Pause,
    /// Cutting the lawn edge.
    EdgeCut,
    /// A code this library does not know.
    Unknown(u8),
}

impl MowerActivity {
    /// Maps a raw status code to an activity.
    #[must_use]
    pub const fn from_code(code: u8) -> Self {
        match code {
            0 => Self::Idle,
            1 => Self::Home,
            2 => Self::StartSequence,
            3 => Self::LeavingHome,
            4 => Self::FollowWire,
            7 => Self::Mowing,
            30 => Self::GoingHome,
            32 => Self::EdgeCut,
            33 => Self::SearchingZone,
            34 => Self::Pause,
            other => Self::Unknown(other),
        }
    }

    /// Returns the raw status code.
    #[must_use]
    pub const fn code(&self) -> u8 {
        match self {
            Self::Idle => 0,
            Self::Home => 1,
            Self::StartSequence => 2,
            Self::LeavingHome => 3,
            Self::FollowWire => 4,
            Self::Mowing => 7,
            Self::GoingHome => 30,
            Self::EdgeCut => 32,
            Self::SearchingZone => 33,
            Self::Pause => 34,
            Self::Unknown(code) => *code,
        }
    }

    /// Returns whether the mower is still at or approaching the charging
    /// station.
    ///
    /// While any of these activities is reported, a pending zone override
    /// has not yet taken effect and its snapshot must not be restored.
    #[must_use]
    pub const fn is_near_home(&self) -> bool {
        matches!(
            self,
            Self::Home | Self::StartSequence | Self::LeavingHome | Self::SearchingZone
        )
    }
}

impl From<u8> for MowerActivity {
    fn from(code: u8) -> Self {
        Self::from_code(code)
    }
}

impl fmt::Display for MowerActivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Home => write!(f, "home"),
            Self::StartSequence => write!(f, "start-sequence"),
            Self::LeavingHome => write!(f, "leaving-home"),
            Self::FollowWire => write!(f, "follow-wire"),
            Self::Mowing => write!(f, "mowing"),
            Self::GoingHome => write!(f, "going-home"),
            Self::SearchingZone => write!(f, "searching-zone"),
            Self::Pause => write!(f, "pause"),
            Self::EdgeCut => write!(f, "edge-cut"),
            Self::Unknown(code) => write!(f, "unknown({code})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_codes_round_trip() {
        for code in [0, 1, 2, 3, 4, 7, 30, 32, 33, 34] {
            assert_eq!(MowerActivity::from_code(code).code(), code);
        }
    }

    #[test]
    fn unknown_code_is_preserved() {
        let activity = MowerActivity::from_code(99);
        assert_eq!(activity, MowerActivity::Unknown(99));
        assert_eq!(activity.code(), 99);
    }

    #[test]
    fn near_home_allowlist() {
        assert!(MowerActivity::Home.is_near_home());
        assert!(MowerActivity::StartSequence.is_near_home());
        assert!(MowerActivity::LeavingHome.is_near_home());
        assert!(MowerActivity::SearchingZone.is_near_home());

        assert!(!MowerActivity::Mowing.is_near_home());
        assert!(!MowerActivity::GoingHome.is_near_home());
        assert!(!MowerActivity::Idle.is_near_home());
        assert!(!MowerActivity::Unknown(99).is_near_home());
    }

    #[test]
    fn display_names() {
        assert_eq!(MowerActivity::Home.to_string(), "home");
        assert_eq!(MowerActivity::Unknown(42).to_string(), "unknown(42)");
    }
}
