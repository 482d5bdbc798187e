// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `MowR` library.
//!
//! This module provides the error hierarchy for failures across the library:
//! credential lifecycle, transport sessions, configuration writes, and
//! inbound payload parsing.

use thiserror::Error;

/// The main error type for this library.
///
/// This enum encompasses all possible errors that can occur when supervising
/// a mower's cloud session.
#[derive(Debug, Error)]
pub enum Error {
    /// Error in the access-credential lifecycle.
    #[error("auth error: {0}")]
    Auth(#[from] AuthError),

    /// Error in the pub/sub session.
    #[error("connection error: {0}")]
    Connection(#[from] ConnectionError),

    /// Invalid configuration write or state-machine precondition violation.
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// Malformed inbound payload.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),
}

/// Errors related to the access credential and its refresh exchange.
///
/// These are fatal to the session until the controller resolves them;
/// the library never retries beyond the single documented refresh retry.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No credential has ever been issued for this account.
    #[error("no access credential has been issued")]
    NoCredential,

    /// The token exchange failed after the single retry.
    #[error("token refresh failed: {message}")]
    RefreshFailed {
        /// Description of the final failure.
        message: String,
        /// The underlying transport error, if any.
        #[cfg(feature = "http")]
        #[source]
        source: Option<reqwest::Error>,
    },

    /// HTTP request to the token endpoint failed.
    #[cfg(feature = "http")]
    #[error("token request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Token exchange timed out.
    #[error("token exchange timed out after {0} ms")]
    Timeout(u64),

    /// The token endpoint returned an unparseable body.
    #[error("malformed token response: {0}")]
    MalformedResponse(String),
}

/// Errors related to the pub/sub transport session.
#[derive(Debug, Error)]
pub enum ConnectionError {
    /// A publish or subscribe was attempted while the session is down.
    #[error("session is not connected")]
    NotConnected,

    /// MQTT client operation failed.
    #[cfg(feature = "mqtt")]
    #[error("MQTT error: {0}")]
    Mqtt(#[from] rumqttc::ClientError),

    /// Session establishment failed.
    #[error("connect failed: {0}")]
    ConnectFailed(String),

    /// Session establishment did not complete in time.
    #[error("connect timed out after {0} s")]
    Timeout(u64),

    /// Invalid broker endpoint address.
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),
}

/// Errors related to configuration writes and override preconditions.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// The device does not support the written field.
    #[error("device does not support {capability}")]
    CapabilityNotSupported {
        /// The capability that is not supported.
        capability: String,
    },

    /// A zone override was requested while the mower is away from home.
    #[error("zone override requires the mower to be at home (activity: {activity})")]
    NotAtHome {
        /// The activity the device reported at the time of the request.
        activity: String,
    },

    /// A zone index is outside the device's configured zone count.
    #[error("zone {zone} is out of range for {zone_count} zones")]
    InvalidZone {
        /// The requested zone index.
        zone: usize,
        /// Number of zones the device is configured for.
        zone_count: usize,
    },

    /// A field value is outside its allowed range.
    #[error("invalid value for {field}: {message}")]
    InvalidValue {
        /// The field that was written.
        field: String,
        /// Description of the constraint violation.
        message: String,
    },
}

/// Errors related to parsing inbound device payloads.
///
/// Protocol errors are reported to the caller but never tear down the
/// session.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Expected field is missing from the payload.
    #[error("missing field in payload: {0}")]
    MissingField(String),

    /// Unexpected payload format.
    #[error("unexpected payload format: {0}")]
    UnexpectedFormat(String),
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configuration_error_display() {
        let err = ConfigurationError::CapabilityNotSupported {
            capability: "secondary schedule".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "device does not support secondary schedule"
        );
    }

    #[test]
    fn error_from_configuration_error() {
        let cfg_err = ConfigurationError::NotAtHome {
            activity: "mowing".to_string(),
        };
        let err: Error = cfg_err.into();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn invalid_zone_display() {
        let err = ConfigurationError::InvalidZone {
            zone: 5,
            zone_count: 4,
        };
        assert_eq!(err.to_string(), "zone 5 is out of range for 4 zones");
    }

    #[test]
    fn auth_error_display() {
        let err = AuthError::NoCredential;
        assert_eq!(err.to_string(), "no access credential has been issued");
    }

    #[test]
    fn connection_error_display() {
        let err = ConnectionError::Timeout(30);
        assert_eq!(err.to_string(), "connect timed out after 30 s");
    }
}
