#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Record transport between the motion-producing and device-controlling
//! processes: a fixed-size datagram codec and a thread-backed UDP peer.

pub mod peer;
pub mod wire;

pub use peer::UdpPeer;
pub use wire::{MoveRecord, WireError};
