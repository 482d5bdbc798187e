// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Access-credential lifecycle.
//!
//! The cloud issues short-lived OAuth access tokens. [`TokenManager`] owns
//! exactly one [`AccessCredential`] at a time: it issues the first one via
//! the password grant, tracks expiry with a preemptive safety margin, and
//! replaces the credential wholesale through the refresh-token grant.
//! Callers must always re-fetch the credential after a refresh instead of
//! caching the token string across a suspend point.

mod credential;
#[cfg(feature = "http")]
mod token_manager;

pub use credential::{AccessCredential, EXPIRY_SAFETY_MARGIN_SECS};
#[cfg(feature = "http")]
pub use token_manager::{TokenEndpointConfig, TokenManager};
