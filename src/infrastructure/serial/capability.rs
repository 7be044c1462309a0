//! Platform Bluetooth serial capability surface.
//!
//! The native binding that performs the actual Bluetooth I/O lives behind
//! [`SerialCapability`]. On a mobile or hybrid-webview host, the platform
//! integration publishes its binding into a [`CapabilitySource`] once its
//! own startup completes; until then the slot is empty, and every consumer
//! has to tolerate the absence.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use super::error::CapabilityError;
use crate::domain::models::Peripheral;

pub type SharedCapability = Arc<dyn SerialCapability>;

/// Required surface of a platform Bluetooth serial binding.
///
/// Every operation reports success or failure through its `Result`; how the
/// platform signals completion underneath (callback, future, ...) is the
/// implementation's business.
#[async_trait]
pub trait SerialCapability: Send + Sync {
    /// Whether the host radio is switched on.
    async fn is_enabled(&self) -> Result<bool, CapabilityError>;

    /// Ask the platform to switch the radio on. Not guaranteed to be
    /// honored; callers must be prepared to fall back to manual enabling.
    async fn enable(&self) -> Result<(), CapabilityError>;

    /// Devices already paired with the host.
    async fn list_paired(&self) -> Result<Vec<Peripheral>, CapabilityError>;

    /// Whether this binding can run an active discovery pass. Bindings
    /// without discovery are valid; callers skip the pass.
    fn supports_discovery(&self) -> bool {
        true
    }

    /// Active discovery of unpaired devices in range.
    async fn discover_unpaired(&self) -> Result<Vec<Peripheral>, CapabilityError>;

    /// Standard (secure) RFCOMM connect.
    async fn connect(&self, address: &str) -> Result<(), CapabilityError>;

    /// Insecure RFCOMM connect. Tried first; the rover's stack accepts it
    /// far more reliably than the secure variant.
    async fn connect_insecure(&self, address: &str) -> Result<(), CapabilityError>;

    async fn disconnect(&self) -> Result<(), CapabilityError>;

    /// Whether the platform currently holds an open serial link.
    async fn is_connected(&self) -> Result<bool, CapabilityError>;

    /// Raw write to the serial link.
    async fn write(&self, payload: &[u8]) -> Result<(), CapabilityError>;
}

/// Shared slot a platform integration publishes its capability into.
///
/// Reading is idempotent and side-effect free, so the manager can re-check
/// the slot as often as it likes instead of relying on a one-time readiness
/// event.
#[derive(Clone, Default)]
pub struct CapabilitySource {
    slot: Arc<Mutex<Option<SharedCapability>>>,
}

impl CapabilitySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `capability` visible to consumers. Called once by the platform
    /// layer when its own initialization finishes.
    pub fn publish(&self, capability: SharedCapability) {
        if let Ok(mut slot) = self.slot.lock() {
            *slot = Some(capability);
        }
    }

    pub fn get(&self) -> Option<SharedCapability> {
        match self.slot.lock() {
            Ok(slot) => slot.clone(),
            Err(_) => None,
        }
    }
}
