// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Temporary single-zone override.
//!
//! A "mow one zone now" request collapses every zone meter to the target
//! zone so the mower heads straight there. The previous meter set is
//! snapshotted and restored as soon as the device's reported activity shows
//! it has actually left the charging-station area; until then every status
//! update re-checks the condition (level-triggered, not a timer).

use crate::config::DeviceConfiguration;
use crate::error::ConfigurationError;
use crate::types::MowerActivity;

/// State of the override watcher.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
enum OverrideState {
    /// No override active.
    #[default]
    Idle,
    /// Override applied; holds the meter snapshot taken before it.
    Overriding { snapshot: Vec<u32> },
}

/// Watches device status updates to revert a single-zone override.
///
/// # Examples
///
/// ```
/// use mowr_lib::config::{DeviceConfiguration, ZoneOverrideWatcher};
/// use mowr_lib::telemetry::StatusUpdate;
/// use mowr_lib::types::MowerActivity;
/// use mowr_lib::Capabilities;
///
/// let mut config = DeviceConfiguration::new(Capabilities::four_zone());
/// config.zone_meters_mut().unwrap().set_meters(&[3, 0, 0, 0]).unwrap();
/// config.apply_status(&StatusUpdate {
///     activity: MowerActivity::Home,
///     ..StatusUpdate::default()
/// });
///
/// let mut watcher = ZoneOverrideWatcher::new();
/// watcher.begin_override(&mut config, 1).unwrap();
/// assert!(watcher.is_overriding());
///
/// // Once the mower is out mowing, the snapshot comes back
/// watcher.on_status_update(&mut config, MowerActivity::Mowing);
/// assert!(!watcher.is_overriding());
/// assert_eq!(config.zone_meters().unwrap().meters(), &[3, 0, 0, 0]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ZoneOverrideWatcher {
    state: OverrideState,
}

impl ZoneOverrideWatcher {
    /// Creates an idle watcher.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether an override is currently active.
    #[must_use]
    pub fn is_overriding(&self) -> bool {
        matches!(self.state, OverrideState::Overriding { .. })
    }

    /// Starts an override that collapses every meter slot to the target
    /// zone's value.
    ///
    /// The precondition is checked against the activity the device itself
    /// last reported, not anything the caller claims.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::NotAtHome` unless the device currently
    /// reports [`MowerActivity::Home`], `ConfigurationError::InvalidZone`
    /// if the target zone is out of range, and
    /// `ConfigurationError::CapabilityNotSupported` on single-zone devices.
    pub fn begin_override(
        &mut self,
        config: &mut DeviceConfiguration,
        target_zone: usize,
    ) -> Result<(), ConfigurationError> {
        let activity = config.activity();
        if activity != MowerActivity::Home {
            return Err(ConfigurationError::NotAtHome {
                activity: activity.to_string(),
            });
        }

        let meters = config.zone_meters_mut()?;
        let snapshot = meters.meters().to_vec();
        let target_value =
            *snapshot
                .get(target_zone)
                .ok_or(ConfigurationError::InvalidZone {
                    zone: target_zone,
                    zone_count: snapshot.len(),
                })?;

        let collapsed = vec![target_value; snapshot.len()];
        meters.set_meters(&collapsed)?;

        tracing::debug!(zone = target_zone, "zone override applied");
        self.state = OverrideState::Overriding { snapshot };
        Ok(())
    }

    /// Feeds one status update into the watcher.
    ///
    /// While an override is active, the snapshot is restored on the first
    /// activity outside the near-home set; afterwards the watcher is idle
    /// and further updates are ignored.
    pub fn on_status_update(&mut self, config: &mut DeviceConfiguration, activity: MowerActivity) {
        if !self.is_overriding() || activity.is_near_home() {
            return;
        }

        let OverrideState::Overriding { snapshot } =
            std::mem::replace(&mut self.state, OverrideState::Idle)
        else {
            return;
        };

        match config.zone_meters_mut() {
            Ok(meters) => {
                if let Err(e) = meters.set_meters(&snapshot) {
                    tracing::warn!(error = %e, "failed to restore zone meters after override");
                } else {
                    tracing::debug!(activity = %activity, "zone override reverted");
                }
            }
            Err(e) => tracing::warn!(error = %e, "zone meters unavailable for restore"),
        }
    }
}
