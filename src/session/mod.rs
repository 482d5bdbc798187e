// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Persistent session supervision.
//!
//! One session per device owner: the handshake is derived from the current
//! access credential, the connection state machine lives in
//! [`ConnectionState`], and [`SessionSupervisor`] keeps the session alive
//! across transport flaps, replaying subscriptions and suppressing
//! transient interruptions.

mod handshake;
mod state;
#[cfg(feature = "mqtt")]
mod supervisor;

pub use handshake::{CUSTOM_AUTHORIZER_NAME, HandshakeAuth, build_handshake};
pub use state::ConnectionState;
#[cfg(feature = "mqtt")]
pub use supervisor::{
    ClosedCallback, EstablishedCallback, INTERRUPTION_GRACE, MessageHandler, SessionConfig,
    SessionSupervisor,
};
