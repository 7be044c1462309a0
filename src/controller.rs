//! UI-facing facade over the link manager.
//!
//! Translates user intents ("connect", "drive forward", "disconnect") into
//! manager calls and reports every outcome as an [`AppEvent`], so whatever
//! surface is listening (console shell, toast layer, ...) only has to
//! render. Failures are mapped to per-kind remediation notices.

use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tracing::warn;

use crate::domain::models::{
    AppEvent, ConnectionStatus, MessageSeverity, Peripheral, StatusMessage,
};
use crate::domain::settings::SettingsService;
use crate::infrastructure::serial::error::LinkError;
use crate::infrastructure::serial::manager::LinkManager;
use crate::infrastructure::serial::protocol::MotionCommand;

/// Outcome of matching scan results against the configured target name.
#[derive(Debug, Clone, PartialEq)]
pub enum TargetSelection {
    /// First device whose name contains the target substring.
    Preferred(Peripheral),
    /// No name matched; the full candidate list goes back to the user.
    Manual(Vec<Peripheral>),
}

/// Pick the rover out of a scan result, preferring a name match.
pub fn select_target(devices: &[Peripheral], target_name: &str) -> TargetSelection {
    match devices.iter().find(|d| d.name_contains(target_name)) {
        Some(device) => TargetSelection::Preferred(device.clone()),
        None => TargetSelection::Manual(devices.to_vec()),
    }
}

pub struct Controller {
    manager: LinkManager,
    settings: Arc<Mutex<SettingsService>>,
    events: mpsc::UnboundedSender<AppEvent>,
}

impl Controller {
    pub fn new(
        manager: LinkManager,
        settings: Arc<Mutex<SettingsService>>,
        events: mpsc::UnboundedSender<AppEvent>,
    ) -> Self {
        Self {
            manager,
            settings,
            events,
        }
    }

    /// Status queries for the hosting surface.
    pub fn manager(&self) -> &LinkManager {
        &self.manager
    }

    /// Full connect sequence: enabled-check, scan, target preference,
    /// connect. Every outcome is reported through the event channel.
    pub async fn connect_sequence(&mut self) {
        let target = self.target_name();

        self.notify(MessageSeverity::Info, "Checking Bluetooth...");
        if !self.manager.is_bluetooth_enabled().await {
            self.notify(
                MessageSeverity::Warning,
                format!(
                    "Bluetooth is not available. Enable it in the system settings, \
                     pair {target}, then try again."
                ),
            );
            return;
        }

        self.notify(MessageSeverity::Info, format!("Scanning for {target}..."));
        let devices = match self.manager.scan_devices().await {
            Ok(devices) => devices,
            Err(err) => {
                self.notify(MessageSeverity::Error, remediation(&err));
                return;
            }
        };

        if devices.is_empty() {
            self.notify(
                MessageSeverity::Warning,
                format!("No Bluetooth devices found. Pair {target} in the system settings first."),
            );
            return;
        }

        match select_target(&devices, &target) {
            TargetSelection::Preferred(device) => self.connect_to(&device).await,
            TargetSelection::Manual(candidates) => {
                self.notify(
                    MessageSeverity::Info,
                    format!("{target} not found. Choose a device manually."),
                );
                let _ = self.events.send(AppEvent::DeviceChoices(candidates));
            }
        }
    }

    /// Connect to a specific device, chosen automatically or manually.
    pub async fn connect_to(&mut self, device: &Peripheral) {
        self.set_status(ConnectionStatus::Connecting);
        match self.manager.connect(&device.address).await {
            Ok(()) => {
                self.set_status(ConnectionStatus::Connected);
                self.notify(
                    MessageSeverity::Success,
                    format!(
                        "Connected to {}. You can drive the robot now.",
                        device.display_name()
                    ),
                );
                if let Ok(mut settings) = self.settings.lock() {
                    if let Err(err) = settings.remember_address(&device.address) {
                        warn!("could not persist address: {err}");
                    }
                }
            }
            Err(err) => {
                self.set_status(ConnectionStatus::Error);
                self.notify(MessageSeverity::Error, remediation(&err));
            }
        }
    }

    pub async fn send(&mut self, command: MotionCommand) {
        match self.manager.send_command(command.as_wire()).await {
            Ok(()) => self.notify(MessageSeverity::Success, command.label()),
            Err(err) => self.notify(MessageSeverity::Error, remediation(&err)),
        }
    }

    pub async fn disconnect(&mut self) {
        self.manager.disconnect().await;
        self.set_status(ConnectionStatus::Disconnected);
        self.notify(MessageSeverity::Info, "Disconnected from the robot");
    }

    fn target_name(&self) -> String {
        self.settings
            .lock()
            .map(|s| s.get().link.target_name.clone())
            .unwrap_or_else(|_| "ZUMOE2".to_string())
    }

    fn notify(&self, severity: MessageSeverity, message: impl Into<String>) {
        let _ = self.events.send(AppEvent::LogMessage(StatusMessage {
            message: message.into(),
            severity,
        }));
    }

    fn set_status(&self, status: ConnectionStatus) {
        let _ = self.events.send(AppEvent::ConnectionStatus(status));
    }
}

/// What the user should do about a link failure.
fn remediation(err: &LinkError) -> String {
    match err {
        LinkError::CapabilityUnavailable => {
            "Bluetooth is not ready yet. Wait a moment and try again, or restart the app."
                .to_string()
        }
        LinkError::ConnectionFailed => {
            "Could not connect. Make sure the robot is powered on and paired.".to_string()
        }
        LinkError::NotConnected => "Robot not connected. Connect to it first.".to_string(),
        LinkError::WriteFailed(_) => format!("Sending the command failed: {err}"),
        LinkError::EnableFailed(_) => {
            "Could not enable Bluetooth automatically. Switch it on in the system settings."
                .to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::DeviceOrigin;
    use crate::domain::settings::LinkSettings;
    use crate::infrastructure::serial::manager::MOCK_TARGET_ADDRESS;

    fn dev(name: Option<&str>, address: &str) -> Peripheral {
        Peripheral::new(name.map(str::to_string), address, DeviceOrigin::Paired)
    }

    #[test]
    fn target_selection_prefers_a_name_match() {
        let devices = vec![
            dev(Some("HC-05"), "AA:BB"),
            dev(Some("ZUMOE2-proto"), "CC:DD"),
        ];

        match select_target(&devices, "ZUMOE2") {
            TargetSelection::Preferred(device) => assert_eq!(device.address, "CC:DD"),
            other => panic!("expected a preferred device, got {other:?}"),
        }
    }

    #[test]
    fn target_selection_surfaces_all_candidates_without_a_match() {
        let devices = vec![dev(Some("HC-05"), "AA:BB"), dev(None, "CC:DD")];

        match select_target(&devices, "ZUMOE2") {
            TargetSelection::Manual(candidates) => assert_eq!(candidates.len(), 2),
            other => panic!("expected manual selection, got {other:?}"),
        }
    }

    #[test]
    fn remediation_texts_are_distinct_per_kind() {
        let texts = [
            remediation(&LinkError::CapabilityUnavailable),
            remediation(&LinkError::ConnectionFailed),
            remediation(&LinkError::NotConnected),
        ];
        assert!(texts.iter().all(|t| !t.is_empty()));
        assert_ne!(texts[0], texts[1]);
        assert_ne!(texts[1], texts[2]);
    }

    #[tokio::test]
    async fn mock_connect_sequence_ends_connected() {
        let path = std::env::temp_dir().join("zumolink-controller-test.json");
        let _ = std::fs::remove_file(&path);
        let settings = Arc::new(Mutex::new(SettingsService::at_path(path.clone())));

        let (tx, mut rx) = mpsc::unbounded_channel();
        let manager = LinkManager::mock(LinkSettings::default());
        let mut controller = Controller::new(manager, settings.clone(), tx);

        controller.connect_sequence().await;

        assert!(controller.manager().is_connected());

        let mut statuses = Vec::new();
        while let Ok(event) = rx.try_recv() {
            if let AppEvent::ConnectionStatus(status) = event {
                statuses.push(status);
            }
        }
        assert_eq!(
            statuses,
            vec![ConnectionStatus::Connecting, ConnectionStatus::Connected]
        );

        let remembered = settings
            .lock()
            .expect("settings lock")
            .get()
            .last_connected_address
            .clone();
        assert_eq!(remembered.as_deref(), Some(MOCK_TARGET_ADDRESS));

        let _ = std::fs::remove_file(&path);
    }
}
