use std::sync::{Arc, Mutex};

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{info, warn};

use zumolink::controller::Controller;
use zumolink::domain::models::{AppEvent, MessageSeverity};
use zumolink::domain::settings::SettingsService;
use zumolink::infrastructure::logging;
use zumolink::infrastructure::serial::manager::LinkManager;
use zumolink::MotionCommand;

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Arc::new(Mutex::new(SettingsService::new()?));

    let (link_settings, log_settings) = {
        let guard = settings
            .lock()
            .map_err(|_| anyhow::anyhow!("settings lock poisoned"))?;
        (guard.get().link.clone(), guard.get().log_settings.clone())
    };
    let _log_guard = logging::init_logger(&log_settings)?;

    info!("Starting ZumoLink console");

    // No native Bluetooth serial capability exists on desktop hosts; the
    // link runs in mock mode. A mobile shell would construct a Native
    // manager and publish its binding into a CapabilitySource instead.
    let manager = LinkManager::mock(link_settings);
    let (events_tx, mut events_rx) = mpsc::unbounded_channel();
    let mut controller = Controller::new(manager, settings, events_tx);

    tokio::spawn(async move {
        while let Some(event) = events_rx.recv().await {
            match event {
                AppEvent::LogMessage(notice) => match notice.severity {
                    MessageSeverity::Error | MessageSeverity::Warning => {
                        warn!("{}", notice.message)
                    }
                    _ => info!("{}", notice.message),
                },
                AppEvent::ConnectionStatus(status) => info!("link status: {status:?}"),
                AppEvent::DeviceChoices(devices) => {
                    info!("no target match, candidates:");
                    for device in devices {
                        info!("  {} ({})", device.display_name(), device.address);
                    }
                }
            }
        }
    });

    print_help();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let input = line.trim();
        match input {
            "" => {}
            "c" | "connect" => controller.connect_sequence().await,
            "d" | "disconnect" => controller.disconnect().await,
            "s" | "status" => info!(
                "status: {:?}, connected: {}",
                controller.manager().capability_status(),
                controller.manager().is_connected()
            ),
            "h" | "help" => print_help(),
            "q" | "quit" => break,
            other => match parse_motion(other) {
                Some(command) => controller.send(command).await,
                None => warn!("unknown input {other:?}, try 'help'"),
            },
        }
    }

    controller.disconnect().await;
    Ok(())
}

fn parse_motion(input: &str) -> Option<MotionCommand> {
    let mut chars = input.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => MotionCommand::from_wire(c),
        _ => None,
    }
}

fn print_help() {
    println!("ZumoLink console");
    println!("  c | connect      run the connect sequence");
    println!("  1..5             drive: forward / right / left / back / stop");
    println!("  d | disconnect   drop the link");
    println!("  s | status       show link status");
    println!("  q | quit         exit");
}
