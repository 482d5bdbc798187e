// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Session supervision over the persistent MQTT connection.
//!
//! The supervisor owns one connection per device-owner session: it
//! establishes the session from an access credential, tracks the connection
//! state machine, replays subscriptions after every reconnect, and
//! classifies interruptions. A known gateway quirk flaps the transport for
//! under a second before self-healing; nonzero-code interruptions are
//! therefore held back for a grace period and suppressed when a resume
//! event arrives in time, so the controller only learns about genuine
//! outages.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::{Mutex, RwLock};
use rumqttc::{AsyncClient, Event, EventLoop, MqttOptions, Packet, QoS, Transport};
use tokio::sync::oneshot;

use crate::auth::AccessCredential;
use crate::error::ConnectionError;
use crate::session::handshake::build_handshake;
use crate::session::state::{ConnectionState, interruption_resolved};

/// Delay before a nonzero-code interruption is classified.
pub const INTERRUPTION_GRACE: Duration = Duration::from_secs(10);

/// Handler invoked for every message on a subscribed topic.
pub type MessageHandler = Arc<dyn Fn(&str, &[u8]) + Send + Sync>;

/// Callback invoked when the session is (re)established. The argument is
/// whether the broker resumed a previous session.
pub type EstablishedCallback = Arc<dyn Fn(bool) + Send + Sync>;

/// Callback invoked when the session is considered closed.
pub type ClosedCallback = Arc<dyn Fn() + Send + Sync>;

/// Configuration for one device-owner session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Broker endpoint host.
    pub endpoint: String,
    /// Broker port (TLS, typically 443).
    pub port: u16,
    /// MQTT client identifier.
    pub client_id: String,
    /// Application username embedded in the handshake.
    pub username: String,
    /// Keep-alive interval.
    pub keep_alive: Duration,
    /// Ceiling on session establishment.
    pub connect_timeout: Duration,
    /// Use TLS for the transport. The production gateway requires it;
    /// plain TCP exists for local brokers.
    pub tls: bool,
}

impl SessionConfig {
    /// Creates a configuration with default timings.
    #[must_use]
    pub fn new(
        endpoint: impl Into<String>,
        client_id: impl Into<String>,
        username: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            port: 443,
            client_id: client_id.into(),
            username: username.into(),
            keep_alive: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(30),
            tls: true,
        }
    }

    /// Creates a configuration with a random client identifier.
    ///
    /// The broker disconnects both parties when two clients share an
    /// identifier; use this when nothing stable is available.
    #[must_use]
    pub fn with_random_client_id(
        endpoint: impl Into<String>,
        username: impl Into<String>,
    ) -> Self {
        Self::new(endpoint, format!("mowr-{}", uuid::Uuid::new_v4()), username)
    }
}

/// Mutable connection state, serialized behind one lock.
struct Shared {
    state: ConnectionState,
    client: Option<AsyncClient>,
    subscriptions: HashMap<String, MessageHandler>,
    last_connected: Option<Instant>,
    last_interrupted: Option<Instant>,
    last_resume: Option<Instant>,
    /// Bumped on every nonzero interruption; a deferred check only fires
    /// when its epoch is still current.
    interruption_epoch: u64,
    /// Bumped on every teardown; a stale event-loop task exits when its
    /// generation no longer matches.
    session_generation: u64,
}

impl Shared {
    fn new() -> Self {
        Self {
            state: ConnectionState::Disconnected,
            client: None,
            subscriptions: HashMap::new(),
            last_connected: None,
            last_interrupted: None,
            last_resume: None,
            interruption_epoch: 0,
            session_generation: 0,
        }
    }
}

/// Supervises the persistent pub/sub connection of one device session.
///
/// Cheaply cloneable (via `Arc`); all mutating operations are internally
/// serialized.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use mowr_lib::session::{SessionConfig, SessionSupervisor};
/// # async fn example(credential: mowr_lib::auth::AccessCredential) -> mowr_lib::Result<()> {
/// let supervisor = SessionSupervisor::new(SessionConfig::new(
///     "gateway.example.com",
///     "mowr-4711",
///     "app-user",
/// ));
///
/// supervisor.on_session_closed(Arc::new(|| {
///     println!("session lost, controller should reconnect");
/// }));
///
/// let resumed = supervisor.connect(&credential).await?;
/// println!("session established (resumed: {resumed})");
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct SessionSupervisor {
    inner: Arc<SupervisorInner>,
}

struct SupervisorInner {
    config: SessionConfig,
    shared: Mutex<Shared>,
    established_callback: RwLock<Option<EstablishedCallback>>,
    closed_callback: RwLock<Option<ClosedCallback>>,
}

impl SessionSupervisor {
    /// Creates a disconnected supervisor.
    #[must_use]
    pub fn new(config: SessionConfig) -> Self {
        Self {
            inner: Arc::new(SupervisorInner {
                config,
                shared: Mutex::new(Shared::new()),
                established_callback: RwLock::new(None),
                closed_callback: RwLock::new(None),
            }),
        }
    }

    /// Sets the callback invoked on every session establishment.
    pub fn on_session_established(&self, callback: EstablishedCallback) {
        *self.inner.established_callback.write() = Some(callback);
    }

    /// Sets the callback invoked when the session is considered closed.
    pub fn on_session_closed(&self, callback: ClosedCallback) {
        *self.inner.closed_callback.write() = Some(callback);
    }

    /// Returns the current connection state.
    #[must_use]
    pub fn state(&self) -> ConnectionState {
        self.inner.shared.lock().state
    }

    /// Returns whether the session is currently connected.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.state() == ConnectionState::Connected
    }

    /// Establishes the session using the given credential.
    ///
    /// Blocks until the broker confirms the session or the connect timeout
    /// expires. Previously recorded subscriptions are replayed on success.
    /// Returns whether the broker resumed a prior session.
    ///
    /// # Errors
    ///
    /// Returns `ConnectionError` if the handshake cannot be built, the
    /// broker rejects the session, or the timeout expires.
    pub async fn connect(&self, credential: &AccessCredential) -> Result<bool, ConnectionError> {
        let auth = build_handshake(credential, &self.inner.config.username)?;

        let mut options = MqttOptions::new(
            &self.inner.config.client_id,
            &self.inner.config.endpoint,
            self.inner.config.port,
        );
        options.set_keep_alive(self.inner.config.keep_alive);
        options.set_clean_session(false);
        options.set_credentials(auth.username, auth.password);
        if self.inner.config.tls {
            options.set_transport(Transport::tls_with_default_config());
        }

        let (client, event_loop) = AsyncClient::new(options, 10);
        let (connack_tx, connack_rx) = oneshot::channel();

        let generation = {
            let mut shared = self.inner.shared.lock();
            shared.state = ConnectionState::Connecting;
            shared.session_generation += 1;
            shared.client = Some(client);
            shared.session_generation
        };

        let supervisor = self.clone();
        tokio::spawn(async move {
            run_event_loop(supervisor, event_loop, generation, connack_tx).await;
        });

        let timeout = self.inner.config.connect_timeout;
        let session_present = match tokio::time::timeout(timeout, connack_rx).await {
            Ok(Ok(session_present)) => session_present,
            Ok(Err(_)) => {
                self.abandon_connect();
                return Err(ConnectionError::ConnectFailed(
                    "event loop terminated before session establishment".to_string(),
                ));
            }
            Err(_) => {
                self.abandon_connect();
                return Err(ConnectionError::Timeout(timeout.as_secs()));
            }
        };

        {
            let mut shared = self.inner.shared.lock();
            shared.last_connected = Some(Instant::now());
        }
        tracing::info!(
            endpoint = %self.inner.config.endpoint,
            session_present,
            "session established"
        );

        self.replay_subscriptions().await;
        Ok(session_present)
    }

    fn abandon_connect(&self) {
        let mut shared = self.inner.shared.lock();
        shared.state = ConnectionState::Disconnected;
        shared.client = None;
        shared.session_generation += 1;
    }

    /// Transport-level interruption event.
    ///
    /// Code `0` is a graceful close and is reported immediately. A nonzero
    /// code on a connected session arms a one-shot deferred check after
    /// [`INTERRUPTION_GRACE`]: when a resume event was recorded inside the
    /// window, the interruption is classified as transient and suppressed;
    /// otherwise the closed callback fires exactly once. The timer is armed
    /// only on the transition into `Interrupted` — the transport retries
    /// roughly once per second during an outage, and those repeated errors
    /// must not push the pending decision out indefinitely.
    pub fn on_interrupted(&self, error_code: u16) {
        if error_code == 0 {
            {
                let mut shared = self.inner.shared.lock();
                shared.state = ConnectionState::Disconnected;
            }
            tracing::info!("session closed gracefully");
            self.notify_closed();
            return;
        }

        let (interrupted_at, epoch) = {
            let mut shared = self.inner.shared.lock();
            if shared.state != ConnectionState::Connected {
                // Either the grace timer for this outage is already
                // pending, or the session was never established / already
                // reported closed.
                return;
            }
            let now = Instant::now();
            shared.state = ConnectionState::Interrupted;
            shared.last_interrupted = Some(now);
            shared.interruption_epoch += 1;
            (now, shared.interruption_epoch)
        };
        tracing::debug!(error_code, "session interrupted, grace timer armed");

        let supervisor = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(INTERRUPTION_GRACE).await;
            supervisor.finish_interruption_check(interrupted_at, epoch);
        });
    }

    /// Runs the deferred classification for one interruption epoch.
    fn finish_interruption_check(&self, interrupted_at: Instant, epoch: u64) {
        let resolved = {
            let shared = self.inner.shared.lock();
            if shared.interruption_epoch != epoch {
                // A newer interruption owns the decision now.
                return;
            }
            interruption_resolved(interrupted_at, shared.last_resume, Instant::now())
        };

        if resolved {
            tracing::debug!("transient interruption suppressed after resume");
            return;
        }

        {
            let mut shared = self.inner.shared.lock();
            shared.state = ConnectionState::Disconnected;
        }
        tracing::warn!("interruption not resolved within grace period, session closed");
        self.notify_closed();
    }

    /// Transport-level resume event.
    ///
    /// Records the resume timestamp and returns to `Connected`. Invokes
    /// the established callback unless the session was already connected.
    pub fn on_resumed(&self, session_present: bool) {
        let was_connected = {
            let mut shared = self.inner.shared.lock();
            shared.last_resume = Some(Instant::now());
            let was_connected = shared.state == ConnectionState::Connected;
            shared.state = ConnectionState::Connected;
            was_connected
        };

        if !was_connected {
            tracing::debug!(session_present, "session resumed");
            self.notify_established(session_present);
        }
    }

    /// Subscribes to a topic.
    ///
    /// The subscription is recorded regardless of the connection state and
    /// replayed on every successful connect until explicitly removed.
    ///
    /// # Errors
    ///
    /// Returns `ConnectionError::Mqtt` if the session is connected and the
    /// transport subscribe fails; the subscription stays recorded either
    /// way.
    pub async fn subscribe(
        &self,
        topic: impl Into<String>,
        handler: MessageHandler,
    ) -> Result<(), ConnectionError> {
        let topic = topic.into();
        let client = {
            let mut shared = self.inner.shared.lock();
            shared.subscriptions.insert(topic.clone(), handler);
            (shared.state == ConnectionState::Connected)
                .then(|| shared.client.clone())
                .flatten()
        };

        if let Some(client) = client {
            tracing::debug!(topic = %topic, "subscribing");
            client.subscribe(&topic, QoS::AtLeastOnce).await?;
        } else {
            tracing::debug!(topic = %topic, "subscription recorded for replay");
        }
        Ok(())
    }

    /// Unsubscribes from a topic; a no-op if it was never subscribed.
    ///
    /// # Errors
    ///
    /// Returns `ConnectionError::Mqtt` if the transport unsubscribe fails.
    pub async fn unsubscribe(&self, topic: &str) -> Result<(), ConnectionError> {
        let client = {
            let mut shared = self.inner.shared.lock();
            if shared.subscriptions.remove(topic).is_none() {
                return Ok(());
            }
            (shared.state == ConnectionState::Connected)
                .then(|| shared.client.clone())
                .flatten()
        };

        if let Some(client) = client {
            tracing::debug!(topic = %topic, "unsubscribing");
            client.unsubscribe(topic).await?;
        }
        Ok(())
    }

    /// Publishes a payload to a topic.
    ///
    /// # Errors
    ///
    /// Returns `ConnectionError::NotConnected` unless the session is
    /// connected; there is no implicit queueing, the controller decides
    /// whether to retry.
    pub async fn publish(
        &self,
        topic: &str,
        payload: impl Into<Vec<u8>>,
    ) -> Result<(), ConnectionError> {
        let client = {
            let shared = self.inner.shared.lock();
            if shared.state != ConnectionState::Connected {
                return Err(ConnectionError::NotConnected);
            }
            shared.client.clone().ok_or(ConnectionError::NotConnected)?
        };

        tracing::debug!(topic = %topic, "publishing");
        client
            .publish(topic, QoS::AtLeastOnce, false, payload.into())
            .await?;
        Ok(())
    }

    /// Tears the session down and reconnects with a fresh credential.
    ///
    /// All recorded subscriptions survive the teardown and are replayed by
    /// the reconnect; a partial failure leaves them registered for the
    /// next attempt.
    ///
    /// # Errors
    ///
    /// Returns the error of the reconnect attempt.
    pub async fn refresh_connection(
        &self,
        credential: &AccessCredential,
    ) -> Result<bool, ConnectionError> {
        tracing::info!("refreshing session");
        self.teardown().await;
        self.connect(credential).await
    }

    /// Closes the session for good; recorded subscriptions are kept in
    /// case the controller reconnects later.
    pub async fn disconnect(&self) {
        self.teardown().await;
        tracing::info!("session torn down");
    }

    async fn teardown(&self) {
        let (client, topics) = {
            let mut shared = self.inner.shared.lock();
            shared.state = ConnectionState::Closing;
            shared.session_generation += 1;
            let topics: Vec<String> = shared.subscriptions.keys().cloned().collect();
            (shared.client.take(), topics)
        };

        if let Some(client) = client {
            for topic in topics {
                if let Err(e) = client.unsubscribe(&topic).await {
                    tracing::warn!(topic = %topic, error = %e, "unsubscribe during teardown failed");
                }
            }
            if let Err(e) = client.disconnect().await {
                tracing::warn!(error = %e, "disconnect during teardown failed");
            }
        }

        let mut shared = self.inner.shared.lock();
        shared.state = ConnectionState::Disconnected;
    }

    /// Issues a transport subscribe for every recorded topic.
    async fn replay_subscriptions(&self) {
        let (client, topics) = {
            let shared = self.inner.shared.lock();
            let topics: Vec<String> = shared.subscriptions.keys().cloned().collect();
            (shared.client.clone(), topics)
        };
        let Some(client) = client else {
            return;
        };

        for topic in topics {
            match client.subscribe(&topic, QoS::AtLeastOnce).await {
                Ok(()) => tracing::debug!(topic = %topic, "subscription replayed"),
                Err(e) => {
                    tracing::warn!(topic = %topic, error = %e, "subscription replay failed");
                }
            }
        }
    }

    /// Dispatches an inbound message to its topic handler.
    fn dispatch(&self, topic: &str, payload: &[u8]) {
        let handler = {
            let shared = self.inner.shared.lock();
            shared.subscriptions.get(topic).cloned()
        };
        if let Some(handler) = handler {
            handler(topic, payload);
        } else {
            tracing::debug!(topic = %topic, "message on topic without handler");
        }
    }

    fn generation(&self) -> u64 {
        self.inner.shared.lock().session_generation
    }

    fn notify_established(&self, session_present: bool) {
        let callback = self.inner.established_callback.read().clone();
        if let Some(callback) = callback {
            callback(session_present);
        }
    }

    fn notify_closed(&self) {
        let callback = self.inner.closed_callback.read().clone();
        if let Some(callback) = callback {
            callback();
        }
    }
}

impl std::fmt::Debug for SessionSupervisor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionSupervisor")
            .field("endpoint", &self.inner.config.endpoint)
            .field("client_id", &self.inner.config.client_id)
            .field("state", &self.state())
            .finish()
    }
}

/// Maps a transport poll error to an interruption code.
fn interruption_code(error: &rumqttc::ConnectionError) -> u16 {
    use rumqttc::ConnectionError as E;
    match error {
        E::NetworkTimeout | E::FlushTimeout => 1,
        E::Io(_) => 2,
        E::MqttState(_) => 3,
        E::ConnectionRefused(_) => 4,
        _ => 5,
    }
}

/// Drives one session generation's event loop.
///
/// The task exits silently once its generation is superseded by a
/// teardown; reconnects inside one generation are handled by the
/// transport's own retry and reported through resume events.
async fn run_event_loop(
    supervisor: SessionSupervisor,
    mut event_loop: EventLoop,
    generation: u64,
    connack_tx: oneshot::Sender<bool>,
) {
    let mut connack_tx = Some(connack_tx);

    loop {
        if supervisor.generation() != generation {
            tracing::debug!(generation, "event loop superseded, exiting");
            return;
        }

        match event_loop.poll().await {
            Ok(Event::Incoming(Packet::ConnAck(ack))) => {
                if let Some(tx) = connack_tx.take() {
                    let _ = tx.send(ack.session_present);
                }
                supervisor.on_resumed(ack.session_present);
            }
            Ok(Event::Incoming(Packet::Publish(publish))) => {
                supervisor.dispatch(&publish.topic, &publish.payload);
            }
            Ok(Event::Incoming(Packet::Disconnect)) => {
                supervisor.on_interrupted(0);
                return;
            }
            Ok(_) => {}
            Err(e) => {
                if supervisor.generation() != generation {
                    return;
                }
                tracing::warn!(error = %e, "transport error");
                supervisor.on_interrupted(interruption_code(&e));
                // The transport retries on the next poll; back off briefly.
                tokio::time::sleep(Duration::from_secs(1)).await;
            }
        }
    }
}
