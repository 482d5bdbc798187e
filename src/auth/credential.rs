// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The access credential and its expiry arithmetic.

use chrono::{DateTime, Duration, Utc};

/// Seconds subtracted from the declared lifetime before a credential is
/// considered expired, so it is refreshed before the server rejects it.
pub const EXPIRY_SAFETY_MARGIN_SECS: i64 = 120;

/// One issued access credential.
///
/// Credentials are immutable; a refresh replaces the whole value.
///
/// # Examples
///
/// ```
/// use chrono::{Duration, Utc};
/// use mowr_lib::auth::AccessCredential;
///
/// let issued = Utc::now();
/// let cred = AccessCredential::new("Bearer", "token", "refresh", 300, issued);
///
/// // 300 s lifetime minus the 120 s margin
/// assert!(cred.is_valid_at(issued + Duration::seconds(170)));
/// assert!(!cred.is_valid_at(issued + Duration::seconds(181)));
/// ```
#[derive(Debug, Clone)]
pub struct AccessCredential {
    token_type: String,
    access_token: String,
    refresh_token: String,
    expires_in: i64,
    issued_at: DateTime<Utc>,
}

impl AccessCredential {
    /// Creates a credential issued at the given instant.
    #[must_use]
    pub fn new(
        token_type: impl Into<String>,
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
        expires_in: i64,
        issued_at: DateTime<Utc>,
    ) -> Self {
        Self {
            token_type: token_type.into(),
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
            expires_in,
            issued_at,
        }
    }

    /// Returns the token type (e.g. `Bearer`).
    #[must_use]
    pub fn token_type(&self) -> &str {
        &self.token_type
    }

    /// Returns the opaque access token.
    #[must_use]
    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// Returns the refresh token.
    #[must_use]
    pub fn refresh_token(&self) -> &str {
        &self.refresh_token
    }

    /// Returns when the credential was issued.
    #[must_use]
    pub const fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }

    /// Returns the instant after which this credential must not be used.
    ///
    /// Computed as issue time plus declared lifetime minus
    /// [`EXPIRY_SAFETY_MARGIN_SECS`].
    #[must_use]
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.issued_at + Duration::seconds(self.expires_in - EXPIRY_SAFETY_MARGIN_SECS)
    }

    /// Returns whether the credential is valid at the given instant.
    #[must_use]
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at()
    }

    /// Returns whether the credential is valid right now.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.is_valid_at(Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credential(expires_in: i64) -> (AccessCredential, DateTime<Utc>) {
        let issued = Utc::now();
        (
            AccessCredential::new("Bearer", "abc.def.sig", "refresh", expires_in, issued),
            issued,
        )
    }

    #[test]
    fn valid_before_margin_boundary() {
        let (cred, issued) = credential(300);
        assert!(cred.is_valid_at(issued + Duration::seconds(170)));
    }

    #[test]
    fn invalid_after_margin_boundary() {
        let (cred, issued) = credential(300);
        assert!(!cred.is_valid_at(issued + Duration::seconds(181)));
    }

    #[test]
    fn expires_at_applies_safety_margin() {
        let (cred, issued) = credential(300);
        assert_eq!(cred.expires_at(), issued + Duration::seconds(180));
    }

    #[test]
    fn short_lifetime_is_immediately_invalid() {
        let (cred, issued) = credential(60);
        assert!(!cred.is_valid_at(issued));
    }

    #[test]
    fn accessors() {
        let (cred, _) = credential(300);
        assert_eq!(cred.token_type(), "Bearer");
        assert_eq!(cred.access_token(), "abc.def.sig");
        assert_eq!(cred.refresh_token(), "refresh");
    }
}
