// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Sentinel-encoded toggle values.
//!
//! The mower's wire protocol has no boolean enable flags. A feature is
//! "disabled" when its numeric field equals a reserved sentinel value
//! (e.g. `-100` for the time extension, `0` for a schedule slot's
//! duration). [`ToggleValue`] models this encoding directly: enablement is
//! always *derived* from the live value, never stored as a separate flag,
//! so the boolean API and the wire encoding cannot drift apart.
//!
//! The last non-sentinel value is remembered so a later enable restores the
//! previous setting instead of a default.

/// A numeric field whose "disabled" state is encoded as a sentinel value.
///
/// # Invariants
///
/// - The restore slot never holds the sentinel.
/// - The restore slot is only overwritten while the live value is not the
///   sentinel.
/// - `enabled()` is always `live != sentinel`.
///
/// # Examples
///
/// ```
/// use mowr_lib::config::ToggleValue;
///
/// // Time extension: -100 means "mowing disabled"
/// let mut ext = ToggleValue::new(-100, 0);
///
/// ext.set_live(40);
/// assert!(ext.enabled());
///
/// ext.set_enabled(false);
/// assert_eq!(ext.live(), -100);
///
/// // Enabling restores the last non-sentinel value
/// ext.set_enabled(true);
/// assert_eq!(ext.live(), 40);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleValue<T = i32> {
    live: T,
    sentinel: T,
    restore: Option<T>,
    default_restore: T,
}

impl<T: Copy + PartialEq> ToggleValue<T> {
    /// Creates a new toggle in the disabled state.
    ///
    /// # Arguments
    ///
    /// * `sentinel` - The reserved value meaning "disabled"
    /// * `default_restore` - The value used by the first enable when no
    ///   non-sentinel value was ever observed
    #[must_use]
    pub const fn new(sentinel: T, default_restore: T) -> Self {
        Self {
            live: sentinel,
            sentinel,
            restore: None,
            default_restore,
        }
    }

    /// Creates a new toggle with an initial live value.
    #[must_use]
    pub fn with_live(sentinel: T, default_restore: T, live: T) -> Self {
        let mut toggle = Self::new(sentinel, default_restore);
        toggle.set_live(live);
        toggle
    }

    /// Returns the current live (wire) value.
    #[must_use]
    pub const fn live(&self) -> T {
        self.live
    }

    /// Returns the sentinel value of this field.
    #[must_use]
    pub const fn sentinel(&self) -> T {
        self.sentinel
    }

    /// Returns whether the field is enabled.
    #[must_use]
    pub fn enabled(&self) -> bool {
        self.live != self.sentinel
    }

    /// Sets the live value, tracking the restore slot.
    ///
    /// Writing the sentinel first saves the current live value into the
    /// restore slot (unless it is itself the sentinel), then disables the
    /// field. Writing any other value enables the field without touching
    /// the restore slot.
    pub fn set_live(&mut self, value: T) {
        if value == self.sentinel {
            if self.live != self.sentinel {
                self.restore = Some(self.live);
            }
            self.live = self.sentinel;
        } else {
            self.live = value;
        }
    }

    /// Enables or disables the field.
    ///
    /// Enabling a disabled field restores the remembered value, falling
    /// back to the default when nothing was ever stored. Disabling an
    /// enabled field saves the live value and writes the sentinel. Both
    /// directions are no-ops when the field is already in the requested
    /// state.
    pub fn set_enabled(&mut self, enabled: bool) {
        if enabled == self.enabled() {
            return;
        }
        if enabled {
            self.live = self.restore.unwrap_or(self.default_restore);
        } else {
            self.set_live(self.sentinel);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_disabled() {
        let toggle: ToggleValue = ToggleValue::new(-100, 0);
        assert!(!toggle.enabled());
        assert_eq!(toggle.live(), -100);
    }

    #[test]
    fn set_live_enables() {
        let mut toggle = ToggleValue::new(-100, 0);
        toggle.set_live(30);
        assert!(toggle.enabled());
        assert_eq!(toggle.live(), 30);
    }

    #[test]
    fn disable_then_enable_restores_exact_value() {
        let mut toggle = ToggleValue::new(-100, 0);
        toggle.set_live(42);
        toggle.set_live(-100);
        assert!(!toggle.enabled());

        toggle.set_enabled(true);
        assert_eq!(toggle.live(), 42);
    }

    #[test]
    fn enable_without_history_uses_default() {
        let mut duration = ToggleValue::new(0u32, 15);
        duration.set_enabled(true);
        assert_eq!(duration.live(), 15);
    }

    #[test]
    fn disabling_already_disabled_is_noop() {
        let mut toggle = ToggleValue::new(-100, 0);
        toggle.set_live(10);
        toggle.set_enabled(false);
        // A second disable must not clobber the restore slot.
        toggle.set_enabled(false);
        toggle.set_live(-100);

        toggle.set_enabled(true);
        assert_eq!(toggle.live(), 10);
    }

    #[test]
    fn restore_slot_never_holds_sentinel() {
        let mut toggle = ToggleValue::new(0u32, 15);
        // Disabling while disabled stores nothing.
        toggle.set_live(0);
        toggle.set_enabled(true);
        assert_eq!(toggle.live(), 15);
    }

    #[test]
    fn enabling_enabled_field_keeps_live_value() {
        let mut toggle = ToggleValue::new(-100, 0);
        toggle.set_live(25);
        toggle.set_enabled(true);
        assert_eq!(toggle.live(), 25);
    }

    #[test]
    fn set_live_does_not_touch_restore_slot() {
        let mut toggle = ToggleValue::new(-100, 0);
        toggle.set_live(10);
        toggle.set_live(-100);
        // Live updates while enabled do not overwrite the stored 10 until
        // the next disable.
        toggle.set_enabled(true);
        toggle.set_live(77);
        toggle.set_live(-100);
        toggle.set_enabled(true);
        assert_eq!(toggle.live(), 77);
    }

    #[test]
    fn with_live_starts_enabled() {
        let toggle = ToggleValue::with_live(-100, 0, 60);
        assert!(toggle.enabled());
        assert_eq!(toggle.live(), 60);
    }
}
