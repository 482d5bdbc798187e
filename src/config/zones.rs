// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Zone meters and the zone-allocation table.
//!
//! Zone meters give each mowing zone its starting distance along the
//! boundary wire. The group has no enable flag on the wire: multi-zone
//! mowing is "disabled" exactly when every meter is zero. Disabling
//! snapshots the current non-zero set so a later enable restores it;
//! enabling with no history seeds a single-zone allocation.
//!
//! The allocation table is ten plain slots mapping the mowing rotation to
//! zone indices; it has no toggle semantics.

use crate::capabilities::ZONE_ALLOCATION_SLOTS;
use crate::error::ConfigurationError;

/// The zone-meter group of one device.
///
/// # Examples
///
/// ```
/// use mowr_lib::config::ZoneMeters;
///
/// let mut meters = ZoneMeters::new(4);
/// assert!(!meters.enabled());
///
/// // First enable seeds a single-zone allocation
/// meters.set_enabled(true);
/// assert_eq!(meters.meters(), &[1, 0, 0, 0]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneMeters {
    meters: Vec<u32>,
    snapshot: Option<Vec<u32>>,
}

impl ZoneMeters {
    /// Creates an all-zero (disabled) meter group for `zone_count` zones.
    #[must_use]
    pub fn new(zone_count: usize) -> Self {
        Self {
            meters: vec![0; zone_count],
            snapshot: None,
        }
    }

    /// Returns the number of zones.
    #[must_use]
    pub fn zone_count(&self) -> usize {
        self.meters.len()
    }

    /// Returns the current meter values.
    #[must_use]
    pub fn meters(&self) -> &[u32] {
        &self.meters
    }

    /// Returns whether multi-zone mowing is enabled (any meter non-zero).
    #[must_use]
    pub fn enabled(&self) -> bool {
        self.meters.iter().any(|&m| m != 0)
    }

    /// Sets a single zone's meter value.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::InvalidZone` if the zone index is out
    /// of range.
    pub fn set_meter(&mut self, zone: usize, value: u32) -> Result<(), ConfigurationError> {
        let zone_count = self.meters.len();
        let slot = self
            .meters
            .get_mut(zone)
            .ok_or(ConfigurationError::InvalidZone { zone, zone_count })?;
        *slot = value;
        Ok(())
    }

    /// Replaces all meter values at once.
    ///
    /// Writing an all-zero set first snapshots the current non-zero values,
    /// mirroring the sentinel rule of scalar toggles.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::InvalidValue` if the length does not
    /// match the zone count.
    pub fn set_meters(&mut self, values: &[u32]) -> Result<(), ConfigurationError> {
        if values.len() != self.meters.len() {
            return Err(ConfigurationError::InvalidValue {
                field: "zone meters".to_string(),
                message: format!(
                    "expected {} values, got {}",
                    self.meters.len(),
                    values.len()
                ),
            });
        }
        if values.iter().all(|&m| m == 0) && self.enabled() {
            self.snapshot = Some(self.meters.clone());
        }
        self.meters.copy_from_slice(values);
        Ok(())
    }

    /// Enables or disables the group.
    ///
    /// Disabling snapshots the current set and zeroes every meter. Enabling
    /// restores the last snapshot, or seeds `[1, 0, 0, ...]` when nothing
    /// was ever stored. Both directions are no-ops when already in the
    /// requested state.
    pub fn set_enabled(&mut self, enabled: bool) {
        if enabled == self.enabled() {
            return;
        }
        if enabled {
            match self.snapshot.take() {
                Some(saved) => {
                    self.meters = saved;
                    // keep the snapshot for symmetric re-use
                    self.snapshot = Some(self.meters.clone());
                }
                None => {
                    if let Some(first) = self.meters.first_mut() {
                        *first = 1;
                    }
                }
            }
        } else {
            self.snapshot = Some(self.meters.clone());
            self.meters.fill(0);
        }
    }
}

/// The fixed ten-slot zone-allocation table.
///
/// Each slot names the zone the mower works during that step of its
/// rotation. Plain integers, no toggle semantics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneAllocation {
    slots: [usize; ZONE_ALLOCATION_SLOTS],
    zone_count: usize,
}

impl ZoneAllocation {
    /// Creates an allocation pointing every slot at zone 0.
    #[must_use]
    pub const fn new(zone_count: usize) -> Self {
        Self {
            slots: [0; ZONE_ALLOCATION_SLOTS],
            zone_count,
        }
    }

    /// Returns all slots.
    #[must_use]
    pub fn slots(&self) -> &[usize; ZONE_ALLOCATION_SLOTS] {
        &self.slots
    }

    /// Assigns a zone to a rotation slot.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::InvalidZone` if the zone exceeds the
    /// device's zone count, or `ConfigurationError::InvalidValue` if the
    /// slot index is out of range.
    pub fn set_slot(&mut self, slot: usize, zone: usize) -> Result<(), ConfigurationError> {
        if zone >= self.zone_count {
            return Err(ConfigurationError::InvalidZone {
                zone,
                zone_count: self.zone_count,
            });
        }
        let entry = self
            .slots
            .get_mut(slot)
            .ok_or(ConfigurationError::InvalidValue {
                field: "allocation slot".to_string(),
                message: format!("slot {slot} exceeds {}", ZONE_ALLOCATION_SLOTS - 1),
            })?;
        *entry = zone;
        Ok(())
    }

    /// Replaces the whole table from inbound wire values, clamping unknown
    /// zones to zone 0.
    pub fn apply_wire(&mut self, values: &[usize]) {
        for (slot, &zone) in self.slots.iter_mut().zip(values.iter()) {
            *slot = if zone < self.zone_count { zone } else { 0 };
        }
    }
}
