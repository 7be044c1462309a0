//! Bluetooth Serial Module
//!
//! Owns the RFCOMM serial link to the rover.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                      LinkManager                        │
//! │   (connection lifecycle - public API for the crate)    │
//! └─────────────────────┬───────────────────────────────────┘
//!                       │
//!         ┌─────────────┼─────────────┐
//!         │             │             │
//!         ▼             ▼             ▼
//! ┌────────────┐  ┌──────────┐  ┌──────────┐
//! │ Capability │  │ Protocol │  │  Error   │
//! │            │  │          │  │          │
//! │ - platform │  │ - motion │  │ - link   │
//! │   surface  │  │   bytes  │  │   kinds  │
//! │ - binding  │  │          │  │          │
//! └────────────┘  └──────────┘  └──────────┘
//! ```
//!
//! ## Modules
//!
//! - [`capability`] - Platform serial surface and the shared binding slot
//! - [`protocol`] - Motion command wire format
//! - [`error`] - Error kinds surfaced to callers
//! - [`manager`] - Connection lifecycle state machine

pub mod capability;
pub mod error;
pub mod manager;
pub mod protocol;

// Re-export the manager for convenience
pub use manager::LinkManager;
