//! Core data model for the rover link.

use std::collections::HashSet;

/// Which source a peripheral descriptor came from during a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceOrigin {
    /// Already paired with the host.
    Paired,
    /// Found by an active discovery pass.
    Discovered,
}

/// A remote Bluetooth device. Identity is the hardware address; two
/// descriptors with equal address are the same peripheral regardless of name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Peripheral {
    pub name: Option<String>,
    pub address: String,
    pub origin: DeviceOrigin,
}

impl Peripheral {
    pub fn new(name: Option<String>, address: impl Into<String>, origin: DeviceOrigin) -> Self {
        Self {
            name,
            address: address.into(),
            origin,
        }
    }

    /// True when the advertised name contains `needle`. Unnamed devices
    /// never match.
    pub fn name_contains(&self, needle: &str) -> bool {
        self.name.as_deref().is_some_and(|n| n.contains(needle))
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("Unknown")
    }

    pub(crate) fn with_origin(mut self, origin: DeviceOrigin) -> Self {
        self.origin = origin;
        self
    }
}

/// Merge rule for scan results: drop entries without an address, keep the
/// first occurrence per address.
pub fn dedup_by_address(devices: Vec<Peripheral>) -> Vec<Peripheral> {
    let mut seen = HashSet::new();
    devices
        .into_iter()
        .filter(|d| !d.address.is_empty() && seen.insert(d.address.clone()))
        .collect()
}

/// Lifecycle of the single rover connection. At most one connection is
/// active at a time; the manager does not multiplex peripherals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LinkState {
    #[default]
    Uninitialized,
    /// Waiting for the platform capability to be published.
    Acquiring,
    /// The capability never showed up within the bind ceiling.
    Unavailable,
    /// Capability bound (or mock mode), no active connection.
    Ready,
    Connecting,
    Connected,
    Disconnecting,
}

/// Diagnostic answer to "can this manager talk to a radio right now".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkStatus {
    MockMode,
    Ready,
    NotReady,
}

#[derive(Debug, Clone)]
pub enum AppEvent {
    ConnectionStatus(ConnectionStatus),
    /// The target name matched nothing; the full candidate list is surfaced
    /// for manual selection.
    DeviceChoices(Vec<Peripheral>),
    LogMessage(StatusMessage),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    Disconnected,
    Connecting,
    Connected,
    Error,
}

/// A user-visible notice. Rendering (toast, console line, ...) is up to the
/// surface consuming the event stream.
#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub message: String,
    pub severity: MessageSeverity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageSeverity {
    Info,
    Success,
    Warning,
    Error,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dev(name: Option<&str>, address: &str, origin: DeviceOrigin) -> Peripheral {
        Peripheral::new(name.map(str::to_string), address, origin)
    }

    #[test]
    fn dedup_keeps_first_occurrence_per_address() {
        let merged = dedup_by_address(vec![
            dev(Some("ZUMOE2"), "AA:BB", DeviceOrigin::Paired),
            dev(Some("HC-05"), "CC:DD", DeviceOrigin::Paired),
            dev(None, "AA:BB", DeviceOrigin::Discovered),
        ]);

        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].address, "AA:BB");
        assert_eq!(merged[0].origin, DeviceOrigin::Paired);
        assert_eq!(merged[0].name.as_deref(), Some("ZUMOE2"));
    }

    #[test]
    fn dedup_drops_entries_without_an_address() {
        let merged = dedup_by_address(vec![
            dev(Some("ghost"), "", DeviceOrigin::Discovered),
            dev(None, "AA:BB", DeviceOrigin::Paired),
        ]);

        assert_eq!(merged.len(), 1);
        assert!(merged.iter().all(|d| !d.address.is_empty()));
    }

    #[test]
    fn unnamed_devices_never_match_a_target_name() {
        let unnamed = dev(None, "AA:BB", DeviceOrigin::Discovered);
        assert!(!unnamed.name_contains("ZUMOE2"));
        assert_eq!(unnamed.display_name(), "Unknown");

        let named = dev(Some("ZUMOE2-proto"), "CC:DD", DeviceOrigin::Paired);
        assert!(named.name_contains("ZUMOE2"));
    }
}
