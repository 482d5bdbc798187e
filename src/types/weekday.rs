// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Weekday indexing for schedule slots.
//!
//! The wire schedule is a 7-entry array starting on Sunday, matching the
//! device firmware's ordering.

use std::fmt;

/// Day of the week, in the device's wire ordering (Sunday first).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Weekday {
    /// Sunday (wire index 0).
    Sunday,
    /// Monday (wire index 1).
    Monday,
    /// Tuesday (wire index 2).
    Tuesday,
    /// Wednesday (wire index 3).
    Wednesday,
    /// Thursday (wire index 4).
    Thursday,
    /// Friday (wire index 5).
    Friday,
    /// Saturday (wire index 6).
    Saturday,
}

impl Weekday {
    /// All seven days in wire order.
    pub const ALL: [Self; 7] = [
        Self::Sunday,
        Self::Monday,
        Self::Tuesday,
        Self::Wednesday,
        Self::Thursday,
        Self::Friday,
        Self::Saturday,
    ];

    /// Returns the wire index of this day (0 = Sunday).
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Maps a wire index back to a day.
    ///
    /// Returns `None` if the index is 7 or greater.
    #[must_use]
    pub const fn from_index(index: usize) -> Option<Self> {
        if index < 7 {
            Some(Self::ALL[index])
        } else {
            None
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Sunday => "Sunday",
            Self::Monday => "Monday",
            Self::Tuesday => "Tuesday",
            Self::Wednesday => "Wednesday",
            Self::Thursday => "Thursday",
            Self::Friday => "Friday",
            Self::Saturday => "Saturday",
        };
        write!(f, "{name}")
    }
}
