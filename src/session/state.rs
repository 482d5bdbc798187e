// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Connection state machine and interruption classification.

use std::time::Instant;

/// State of the persistent pub/sub connection.
///
/// Transitions: `Disconnected → Connecting → Connected ⇄ Interrupted →
/// (Connected | Closing) → Disconnected`. The connection cycles through
/// `Interrupted` repeatedly without being destroyed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConnectionState {
    /// No session established.
    #[default]
    Disconnected,
    /// Session establishment in flight.
    Connecting,
    /// Session established.
    Connected,
    /// Transport reported a nonzero-code interruption; the grace timer is
    /// pending.
    Interrupted,
    /// Teardown in progress.
    Closing,
}

/// Decides whether an interruption healed itself before the grace timer
/// fired.
///
/// An interruption is resolved iff a resume event was recorded strictly
/// after the interruption and no later than `now`. Certain gateways flap
/// the transport for under a second before self-healing; a genuine outage
/// never produces a resume inside the grace window.
pub(crate) fn interruption_resolved(
    interrupted_at: Instant,
    last_resume: Option<Instant>,
    now: Instant,
) -> bool {
    last_resume.is_some_and(|resume| resume > interrupted_at && resume <= now)
}
