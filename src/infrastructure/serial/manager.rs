//! Connection lifecycle for the rover's serial link.
//!
//! The platform capability can become available well after the manager is
//! constructed, and its readiness cannot be observed synchronously. Binding
//! is therefore a poll-able condition: every operation that needs the
//! capability re-checks, and where feasible re-attempts, the binding instead
//! of assuming a prior check still holds. All waits are bounded; no loop is
//! ever left running past its attempt ceiling.

use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use super::capability::{CapabilitySource, SharedCapability};
use super::error::LinkError;
use crate::domain::models::{dedup_by_address, DeviceOrigin, LinkState, LinkStatus, Peripheral};
use crate::domain::settings::LinkSettings;

/// Address reported by the mock scan.
pub const MOCK_TARGET_ADDRESS: &str = "00:11:22:33:44:55";
/// Name reported by the mock scan.
pub const MOCK_TARGET_NAME: &str = "ZUMOE2";

/// How the manager talks to the radio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkMode {
    /// Real platform capability, bound lazily from a [`CapabilitySource`].
    Native,
    /// Canned success values for hosts without a Bluetooth stack.
    Mock,
}

/// Owns the single connection to the rover.
///
/// One instance per process, constructed once at startup and handed to
/// whatever consumes it; operations take `&mut self`, so ordering is
/// guaranteed by sequential suspension alone and no locking is needed.
pub struct LinkManager {
    mode: LinkMode,
    source: CapabilitySource,
    capability: Option<SharedCapability>,
    state: LinkState,
    config: LinkSettings,
}

impl LinkManager {
    pub fn new(mode: LinkMode, source: CapabilitySource, config: LinkSettings) -> Self {
        let state = match mode {
            // Nothing to acquire in mock mode
            LinkMode::Mock => LinkState::Ready,
            LinkMode::Native => LinkState::Acquiring,
        };
        Self {
            mode,
            source,
            capability: None,
            state,
            config,
        }
    }

    /// A manager that never touches a radio.
    pub fn mock(config: LinkSettings) -> Self {
        Self::new(LinkMode::Mock, CapabilitySource::new(), config)
    }

    pub fn mode(&self) -> LinkMode {
        self.mode
    }

    pub fn state(&self) -> LinkState {
        self.state
    }

    pub fn is_connected(&self) -> bool {
        self.state == LinkState::Connected
    }

    /// True once a capability has been bound. Pure query, no side effects.
    pub fn is_capability_available(&self) -> bool {
        self.capability.is_some()
    }

    /// Diagnostics summary.
    pub fn capability_status(&self) -> LinkStatus {
        match self.mode {
            LinkMode::Mock => LinkStatus::MockMode,
            LinkMode::Native if self.capability.is_some() => LinkStatus::Ready,
            LinkMode::Native => LinkStatus::NotReady,
        }
    }

    /// Opportunistic, idempotent bind from the shared source. Safe to call
    /// repeatedly; re-reads the same slot each time.
    pub fn try_bind(&mut self) -> bool {
        if self.mode == LinkMode::Mock {
            return true;
        }
        if self.capability.is_some() {
            return true;
        }
        match self.source.get() {
            Some(capability) => {
                info!("bluetooth serial capability bound");
                self.capability = Some(capability);
                if matches!(
                    self.state,
                    LinkState::Uninitialized | LinkState::Acquiring | LinkState::Unavailable
                ) {
                    self.state = LinkState::Ready;
                }
                true
            }
            None => false,
        }
    }

    /// Runtime permission prompts are owned by the platform capability;
    /// nothing is requested from here. Always answers true. Called before
    /// every connect attempt.
    pub async fn request_permissions(&self) -> bool {
        true
    }

    /// Whether Bluetooth can be used right now. Defined to never fail: an
    /// unbound capability or a platform error both degrade to `false`.
    ///
    /// Polls the binding with a bounded wait (`bind_attempts` polls,
    /// `bind_interval_ms` apart) before giving up.
    pub async fn is_bluetooth_enabled(&mut self) -> bool {
        if self.mode == LinkMode::Mock {
            debug!("mock: bluetooth reported enabled");
            return true;
        }

        let mut attempts = 0;
        while !self.try_bind() && attempts < self.config.bind_attempts {
            debug!(
                attempt = attempts + 1,
                "waiting for bluetooth serial capability"
            );
            sleep(Duration::from_millis(self.config.bind_interval_ms)).await;
            attempts += 1;
        }

        let Some(capability) = self.capability.clone() else {
            warn!("bluetooth serial capability never bound, reporting disabled");
            if matches!(self.state, LinkState::Uninitialized | LinkState::Acquiring) {
                self.state = LinkState::Unavailable;
            }
            return false;
        };

        match capability.is_enabled().await {
            Ok(enabled) => enabled,
            Err(err) => {
                warn!("enabled-check failed, treating as disabled: {err}");
                false
            }
        }
    }

    /// Best-effort scan: paired devices first, then a discovery pass when
    /// the capability supports one. Platform errors in either phase degrade
    /// to empty lists; the only hard failure is an unbound capability at
    /// call time.
    pub async fn scan_devices(&mut self) -> Result<Vec<Peripheral>, LinkError> {
        if self.mode == LinkMode::Mock {
            debug!("mock: returning canned scan result");
            return Ok(vec![Peripheral::new(
                Some(MOCK_TARGET_NAME.to_string()),
                MOCK_TARGET_ADDRESS,
                DeviceOrigin::Paired,
            )]);
        }

        if !self.try_bind() {
            return Err(LinkError::CapabilityUnavailable);
        }
        let Some(capability) = self.capability.clone() else {
            return Err(LinkError::CapabilityUnavailable);
        };

        let paired = match capability.list_paired().await {
            Ok(devices) => devices,
            Err(err) => {
                warn!("paired-device query failed, continuing with none: {err}");
                Vec::new()
            }
        };

        let discovered = if capability.supports_discovery() {
            match capability.discover_unpaired().await {
                Ok(devices) => devices,
                Err(err) => {
                    warn!("discovery failed, continuing with none: {err}");
                    Vec::new()
                }
            }
        } else {
            debug!("device discovery not supported by this capability");
            Vec::new()
        };

        let mut all: Vec<Peripheral> = paired
            .into_iter()
            .map(|d| d.with_origin(DeviceOrigin::Paired))
            .collect();
        all.extend(
            discovered
                .into_iter()
                .map(|d| d.with_origin(DeviceOrigin::Discovered)),
        );

        let devices = dedup_by_address(all);
        info!(count = devices.len(), "scan finished");
        Ok(devices)
    }

    /// Connect to the peripheral at `address`.
    ///
    /// If the capability is still unbound, waits once (`rebind_delay_ms`)
    /// and re-attempts the binding before failing. A stale platform-side
    /// link is torn down first, ignoring errors. The attempt itself is
    /// two-phase: insecure connect, then the standard connect on failure;
    /// the ordering is deliberate and must not change.
    pub async fn connect(&mut self, address: &str) -> Result<(), LinkError> {
        if self.mode == LinkMode::Mock {
            info!("mock: connected to {address}");
            self.state = LinkState::Connected;
            return Ok(());
        }

        self.request_permissions().await;

        if !self.try_bind() {
            debug!("capability unbound at connect time, waiting once before giving up");
            sleep(Duration::from_millis(self.config.rebind_delay_ms)).await;
            if !self.try_bind() {
                if matches!(self.state, LinkState::Uninitialized | LinkState::Acquiring) {
                    self.state = LinkState::Unavailable;
                }
                return Err(LinkError::CapabilityUnavailable);
            }
        }
        let Some(capability) = self.capability.clone() else {
            return Err(LinkError::CapabilityUnavailable);
        };

        self.state = LinkState::Connecting;

        // A platform-side link left over from a previous session would make
        // the fresh attempt fail.
        if capability.is_connected().await.unwrap_or(false) {
            info!("platform reports an existing link, disconnecting first");
            if let Err(err) = capability.disconnect().await {
                debug!("ignoring disconnect error: {err}");
            }
        }

        match capability.connect_insecure(address).await {
            Ok(()) => {
                info!("connected to {address} (insecure)");
                self.state = LinkState::Connected;
                Ok(())
            }
            Err(first) => {
                warn!("insecure connect failed ({first}), retrying with standard connect");
                match capability.connect(address).await {
                    Ok(()) => {
                        info!("connected to {address} (standard)");
                        self.state = LinkState::Connected;
                        Ok(())
                    }
                    Err(second) => {
                        error!("both connect strategies failed: {second}");
                        self.state = LinkState::Ready;
                        Err(LinkError::ConnectionFailed)
                    }
                }
            }
        }
    }

    /// Tear down the link. Unfailable from the caller's perspective: the
    /// platform outcome is logged and dropped, and the manager always ends
    /// up idle.
    pub async fn disconnect(&mut self) {
        if self.mode == LinkMode::Mock {
            info!("mock: disconnected");
            self.state = LinkState::Ready;
            return;
        }

        match self.capability.clone() {
            None => {
                if self.state == LinkState::Connected {
                    self.state = LinkState::Ready;
                }
            }
            Some(capability) => {
                self.state = LinkState::Disconnecting;
                if let Err(err) = capability.disconnect().await {
                    debug!("disconnect error ignored: {err}");
                }
                info!("disconnected");
                self.state = LinkState::Ready;
            }
        }
    }

    /// Write a raw command string to the serial link.
    pub async fn send_command(&mut self, command: &str) -> Result<(), LinkError> {
        if self.mode == LinkMode::Mock {
            debug!("mock: sending command {command:?} to {MOCK_TARGET_NAME}");
            return Ok(());
        }

        let Some(capability) = self.capability.clone() else {
            return Err(LinkError::CapabilityUnavailable);
        };
        if self.state != LinkState::Connected {
            return Err(LinkError::NotConnected);
        }

        capability.write(command.as_bytes()).await.map_err(|err| {
            error!("serial write failed: {err}");
            LinkError::WriteFailed(err)
        })
    }

    /// Ask the platform to switch the radio on. Never invoked automatically
    /// by the connect flow; automatic enabling is not guaranteed to be
    /// honored, and a refusal surfaces so the caller can point the user at
    /// the system settings instead.
    pub async fn enable_bluetooth(&mut self) -> Result<(), LinkError> {
        if self.mode == LinkMode::Mock {
            return Ok(());
        }
        if !self.try_bind() {
            return Err(LinkError::CapabilityUnavailable);
        }
        let Some(capability) = self.capability.clone() else {
            return Err(LinkError::CapabilityUnavailable);
        };
        capability.enable().await.map_err(|err| {
            warn!("platform refused to enable bluetooth: {err}");
            LinkError::EnableFailed(err)
        })
    }
}
