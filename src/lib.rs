// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `MowR` Lib - A Rust library to supervise robotic lawn mowers through
//! their cloud session.
//!
//! The library covers the two hard parts of talking to a cloud-connected
//! mower: keeping the authorized pub/sub session alive, and modelling a
//! configuration protocol that encodes "disabled" as magic sentinel values
//! instead of boolean flags.
//!
//! # Supported Features
//!
//! - **Credential lifecycle**: password-grant login, proactive refresh with
//!   a safety margin, single-retry refresh policy
//! - **Session supervision**: custom-authorizer handshake, reconnect with
//!   subscription replay, suppression of the gateway's sub-second flaps
//! - **Configuration model**: restorable enable/disable semantics for the
//!   time extension, schedule slots, and zone meters; capability gating by
//!   firmware version
//! - **Commands and telemetry**: typed outbound payloads and inbound
//!   status parsing
//!
//! # Quick Start
//!
//! ## Login and connect
//!
//! ```no_run
//! use std::sync::Arc;
//! use mowr_lib::auth::{TokenEndpointConfig, TokenManager};
//! use mowr_lib::session::{SessionConfig, SessionSupervisor};
//!
//! #[tokio::main]
//! async fn main() -> mowr_lib::Result<()> {
//!     let mut tokens = TokenManager::new(TokenEndpointConfig {
//!         url: "https://id.example.com/oauth/token".to_string(),
//!         client_id: "mowr".to_string(),
//!         username: "user@example.com".to_string(),
//!         password: "secret".to_string(),
//!     })?;
//!     tokens.login().await?;
//!
//!     let supervisor = SessionSupervisor::new(SessionConfig::new(
//!         "gateway.example.com",
//!         "mowr-4711",
//!         "app-user",
//!     ));
//!     supervisor
//!         .subscribe(
//!             "PRM100/serial/commandOut",
//!             Arc::new(|_topic, payload| {
//!                 if let Ok(update) = mowr_lib::telemetry::parse_status(
//!                     &String::from_utf8_lossy(payload),
//!                 ) {
//!                     println!("mower is {}", update.activity);
//!                 }
//!             }),
//!         )
//!         .await?;
//!     supervisor.connect(tokens.credential()?).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Toggle semantics
//!
//! ```
//! use mowr_lib::{Capabilities, DeviceConfiguration};
//!
//! let mut config = DeviceConfiguration::new(Capabilities::four_zone());
//!
//! // Disabling saves the live value; enabling restores it exactly.
//! config.set_time_extension(40)?;
//! config.set_mowing_enabled(false);
//! assert!(!config.mowing_enabled());
//!
//! config.set_mowing_enabled(true);
//! assert_eq!(config.time_extension(), 40);
//! # Ok::<(), mowr_lib::Error>(())
//! ```
//!
//! ## Sending commands
//!
//! ```no_run
//! use mowr_lib::command::{ActionCommand, Command, CommandTopics};
//! # async fn example(supervisor: mowr_lib::session::SessionSupervisor)
//! #     -> mowr_lib::Result<()> {
//! let topics = CommandTopics::new("PRM100", "20230520001");
//! supervisor
//!     .publish(topics.command_in(), ActionCommand::Start.to_wire())
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod auth;
mod capabilities;
pub mod command;
pub mod config;
pub mod error;
pub mod session;
pub mod telemetry;
pub mod types;

pub use capabilities::{
    Capabilities, MIN_FIRMWARE_ONE_TIME_SCHEDULER, MIN_FIRMWARE_RAIN_DELAY_START,
    MIN_FIRMWARE_SECONDARY_SCHEDULE, ZONE_ALLOCATION_SLOTS,
};
pub use command::{
    ActionCommand, Command, CommandTopics, OneTimeScheduleCommand, RainDelayCommand,
    ScheduleCommand, ZoneAllocationCommand, ZoneMetersCommand,
};
pub use config::{DeviceConfiguration, WeeklySchedule, ZoneAllocation, ZoneMeters, ZoneOverrideWatcher};
pub use error::{AuthError, ConfigurationError, ConnectionError, Error, ProtocolError, Result};
pub use telemetry::{StatusUpdate, parse_status};
pub use types::{MowerActivity, Weekday};
