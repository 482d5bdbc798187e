// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Transport authorization handshake.
//!
//! The broker gateway authorizes connections with a custom authorizer
//! instead of plain credentials. The signed access token is split into its
//! header/payload part and its signature part, and both are embedded as
//! query parameters of the MQTT username together with the fixed authorizer
//! name. The transformation is deterministic and stateless; it is re-run
//! from the current credential on every (re)connect.

use crate::auth::AccessCredential;
use crate::error::ConnectionError;

/// Name of the gateway's custom authorizer.
pub const CUSTOM_AUTHORIZER_NAME: &str = "com-mowr-customer";

/// Username and password fields for the transport handshake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandshakeAuth {
    /// MQTT username carrying the authorizer parameters.
    pub username: String,
    /// MQTT password (unused by the custom authorizer).
    pub password: String,
}

/// Builds the handshake fields from an access credential.
///
/// The token must be a signed JWT of the form `header.payload.signature`;
/// the signature is passed separately from the header/payload pair.
///
/// # Errors
///
/// Returns `ConnectionError::ConnectFailed` if the token does not carry a
/// signature segment.
///
/// # Examples
///
/// ```
/// use chrono::Utc;
/// use mowr_lib::auth::AccessCredential;
/// use mowr_lib::session::build_handshake;
///
/// let cred = AccessCredential::new("Bearer", "hdr.pld.sig", "r", 300, Utc::now());
/// let auth = build_handshake(&cred, "app-user").unwrap();
/// assert!(auth.username.starts_with("app-user?jwt=hdr.pld"));
/// assert!(auth.username.ends_with("signature=sig"));
/// ```
pub fn build_handshake(
    credential: &AccessCredential,
    app_username: &str,
) -> Result<HandshakeAuth, ConnectionError> {
    let token = credential.access_token();
    let (header_payload, signature) = token.rsplit_once('.').ok_or_else(|| {
        ConnectionError::ConnectFailed("access token is not a signed JWT".to_string())
    })?;
    if header_payload.is_empty() || signature.is_empty() {
        return Err(ConnectionError::ConnectFailed(
            "access token has an empty segment".to_string(),
        ));
    }

    let username = format!(
        "{app_username}?jwt={header_payload}\
         &x-amz-customauthorizer-name={CUSTOM_AUTHORIZER_NAME}\
         &x-amz-customauthorizer-signature={signature}"
    );

    Ok(HandshakeAuth {
        username,
        password: String::new(),
    })
}
