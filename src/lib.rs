//! Bluetooth-serial link management for the ZUMOE2 rover.
//!
//! The rover is an ESP32 board listening on a classic Bluetooth RFCOMM
//! serial link; driving it means writing single ASCII characters to that
//! link. The interesting part of this crate is [`LinkManager`]: the platform
//! capability that performs the actual Bluetooth I/O initializes
//! asynchronously and unpredictably, so the manager treats "is the
//! capability bound yet" as a poll-able condition with bounded waits, and
//! falls back to a deterministic mock on hosts without a Bluetooth stack.

pub mod controller;
pub mod domain;
pub mod infrastructure;

pub use controller::Controller;
pub use domain::models::{AppEvent, ConnectionStatus, LinkState, LinkStatus, Peripheral};
pub use infrastructure::serial::capability::{CapabilitySource, SerialCapability};
pub use infrastructure::serial::error::{CapabilityError, LinkError};
pub use infrastructure::serial::manager::{LinkManager, LinkMode};
pub use infrastructure::serial::protocol::MotionCommand;
