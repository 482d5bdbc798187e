// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Token endpoint client and credential refresh policy.

use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::auth::AccessCredential;
use crate::error::AuthError;

/// Ceiling on a single token exchange.
const EXCHANGE_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for the OAuth token endpoint.
#[derive(Debug, Clone)]
pub struct TokenEndpointConfig {
    /// Full URL of the token endpoint.
    pub url: String,
    /// OAuth client identifier.
    pub client_id: String,
    /// Account username for the password grant.
    pub username: String,
    /// Account password for the password grant.
    pub password: String,
}

/// Password-grant request body.
#[derive(Debug, Serialize)]
struct PasswordGrant<'a> {
    grant_type: &'static str,
    username: &'a str,
    password: &'a str,
    scope: &'static str,
    client_id: &'a str,
}

/// Refresh-grant request body.
#[derive(Debug, Serialize)]
struct RefreshGrant<'a> {
    grant_type: &'static str,
    refresh_token: &'a str,
    client_id: &'a str,
}

/// Token endpoint response body.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    token_type: String,
    access_token: String,
    refresh_token: String,
    expires_in: i64,
}

/// Owns one access credential's lifecycle.
///
/// The manager holds at most one [`AccessCredential`] and replaces it
/// wholesale on every successful exchange. After any refresh, callers must
/// re-fetch via [`credential()`](Self::credential) rather than hold on to
/// an earlier token string.
///
/// # Examples
///
/// ```no_run
/// use mowr_lib::auth::{TokenEndpointConfig, TokenManager};
///
/// # async fn example() -> mowr_lib::Result<()> {
/// let mut tokens = TokenManager::new(TokenEndpointConfig {
///     url: "https://id.example.com/oauth/token".to_string(),
///     client_id: "mowr".to_string(),
///     username: "user@example.com".to_string(),
///     password: "secret".to_string(),
/// })?;
///
/// tokens.login().await?;
/// let credential = tokens.refresh().await?;
/// let _ = credential.access_token();
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct TokenManager {
    http: reqwest::Client,
    config: TokenEndpointConfig,
    credential: Option<AccessCredential>,
}

impl TokenManager {
    /// Creates a manager with no credential issued yet.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Http` if the HTTP client cannot be created.
    pub fn new(config: TokenEndpointConfig) -> Result<Self, AuthError> {
        let http = reqwest::Client::builder()
            .timeout(EXCHANGE_TIMEOUT)
            .build()
            .map_err(AuthError::Http)?;
        Ok(Self {
            http,
            config,
            credential: None,
        })
    }

    /// Returns whether a credential exists and has not passed its expiry.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.credential.as_ref().is_some_and(AccessCredential::is_valid)
    }

    /// Returns the current credential.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::NoCredential` if no credential has ever been
    /// issued.
    pub fn credential(&self) -> Result<&AccessCredential, AuthError> {
        self.credential.as_ref().ok_or(AuthError::NoCredential)
    }

    /// Performs the initial password-grant login and installs the first
    /// credential.
    ///
    /// # Errors
    ///
    /// Returns `AuthError` if the exchange fails or the response cannot be
    /// parsed.
    pub async fn login(&mut self) -> Result<&AccessCredential, AuthError> {
        let body = PasswordGrant {
            grant_type: "password",
            username: &self.config.username,
            password: &self.config.password,
            scope: "*",
            client_id: &self.config.client_id,
        };

        tracing::debug!(url = %self.config.url, "requesting initial access credential");
        let response = self
            .http
            .post(&self.config.url)
            .json(&body)
            .send()
            .await
            .map_err(map_transport_error)?
            .error_for_status()
            .map_err(map_transport_error)?;

        let credential = parse_credential(response).await?;
        self.credential = Some(credential);
        self.credential()
    }

    /// Ensures a valid credential, refreshing if necessary.
    ///
    /// A valid credential is returned unchanged without any network call.
    /// An invalid one triggers the refresh-token grant; on failure the
    /// exchange is retried exactly once before giving up.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::NoCredential` before the first login, or
    /// `AuthError::RefreshFailed` when both exchange attempts fail.
    pub async fn refresh(&mut self) -> Result<&AccessCredential, AuthError> {
        if self.is_valid() {
            return self.credential();
        }

        let current = self.credential.as_ref().ok_or(AuthError::NoCredential)?;
        let refresh_token = current.refresh_token().to_string();
        let authorization = format!("{} {}", current.token_type(), current.access_token());

        let credential = match self.refresh_exchange(&refresh_token, &authorization).await {
            Ok(credential) => credential,
            Err(first) => {
                tracing::warn!(error = %first, "token refresh failed, retrying once");
                self.refresh_exchange(&refresh_token, &authorization)
                    .await
                    .map_err(|second| {
                        let message = second.to_string();
                        let source = match second {
                            AuthError::Http(e) => Some(e),
                            _ => None,
                        };
                        AuthError::RefreshFailed { message, source }
                    })?
            }
        };

        tracing::info!(expires_at = %credential.expires_at(), "access credential refreshed");
        self.credential = Some(credential);
        self.credential()
    }

    async fn refresh_exchange(
        &self,
        refresh_token: &str,
        authorization: &str,
    ) -> Result<AccessCredential, AuthError> {
        let body = RefreshGrant {
            grant_type: "refresh_token",
            refresh_token,
            client_id: &self.config.client_id,
        };

        let response = self
            .http
            .post(&self.config.url)
            .header(reqwest::header::AUTHORIZATION, authorization)
            .json(&body)
            .send()
            .await
            .map_err(map_transport_error)?
            .error_for_status()
            .map_err(map_transport_error)?;

        parse_credential(response).await
    }
}

/// Converts a successful response into a credential stamped with the
/// current time.
async fn parse_credential(response: reqwest::Response) -> Result<AccessCredential, AuthError> {
    let token: TokenResponse = response
        .json()
        .await
        .map_err(|e| AuthError::MalformedResponse(e.to_string()))?;
    Ok(AccessCredential::new(
        token.token_type,
        token.access_token,
        token.refresh_token,
        token.expires_in,
        Utc::now(),
    ))
}

/// Maps reqwest failures onto the auth taxonomy, surfacing timeouts
/// explicitly.
fn map_transport_error(error: reqwest::Error) -> AuthError {
    if error.is_timeout() {
        #[allow(clippy::cast_possible_truncation)]
        let ms = EXCHANGE_TIMEOUT.as_millis() as u64;
        AuthError::Timeout(ms)
    } else {
        AuthError::Http(error)
    }
}
