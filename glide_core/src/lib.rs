#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Core motion-relay logic (transport-agnostic).
//!
//! This crate turns a continuous motion signal into discrete, rate-limited
//! device commands. All device interaction goes through the
//! `glide_traits::Actuator` trait.
//!
//! ## Architecture
//!
//! - **Translation**: power-law model of the actuator's travel curve
//!   (`translator` module)
//! - **Detection**: adaptive zone-based motion-to-signal detector
//!   (`zone` module)
//! - **Queueing**: closable, coalescing command FIFO (`queue` module)
//! - **Dispatch**: one paced send loop per device (`dispatcher` module)
//! - **Generation**: procedural motion sources (`motion` module)
//!
//! Producers feed the detector (or the queue directly, for pre-computed
//! records from the network); the dispatcher is the queue's only consumer
//! and enforces the minimum inter-command spacing the firmware needs.

pub mod command;
pub mod config;
pub mod conversions;
pub mod dispatcher;
pub mod error;
pub mod mocks;
pub mod motion;
pub mod queue;
pub mod translator;
pub mod util;
pub mod zone;

pub use command::{Command, QueueEntry, commands_are_similar};
pub use config::{DeviceCfg, SignalCfg};
pub use dispatcher::{DeviceDispatcher, DisconnectEvent};
pub use error::RelayError;
pub use queue::CommandQueue;
pub use zone::{CaptureZone, MotionSignal, ZoneSignalDetector};
