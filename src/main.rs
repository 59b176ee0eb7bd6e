//! BlueSS Panel terminal simulator.
//!
//! Wires the panel core to host adapters and reads keypad actions from
//! stdin, one per line.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  ConsoleDisplay  LogSoundPlayer  LogAlertDispatcher  LogSink │
//! │  ─────────────────── Port Trait Boundary ──────────────────  │
//! │  ┌────────────────────────────────────────────────────────┐  │
//! │  │  PanelService (panel thread, edge-executor)            │  │
//! │  │  Mode · Input · Lockout · ClearTimer · Arm · Alarm     │  │
//! │  └────────────────────────────────────────────────────────┘  │
//! │  stdin ──▶ PanelHandle::call                                 │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Input lines:
//!
//! | Line                                  | Action               |
//! |---------------------------------------|----------------------|
//! | `2468`, `*`, `#` …                    | keypad keys          |
//! | `clear`                               | Clear button         |
//! | `arm` `home` `cctv` `disarm`          | mode buttons         |
//! | `emergency` `silent`                  | panic buttons        |
//! | `cancel`                              | stop the countdown   |
//! | `status`                              | print a snapshot     |
//! | `quit`                                | shut down            |

use std::env;
use std::io::BufRead;
use std::sync::Arc;

use anyhow::{Context, Result};
use log::{info, warn};
use tracing_subscriber::EnvFilter;

use bluess::adapters::alert::LogAlertDispatcher;
use bluess::adapters::config_file::JsonConfigFile;
use bluess::adapters::console::ConsoleDisplay;
use bluess::adapters::log_sink::LogEventSink;
use bluess::adapters::sound::LogSoundPlayer;
use bluess::app::commands::PanelCommand;
use bluess::app::ports::{ConfigError, ConfigPort, Ports};
use bluess::app::service::PanelService;
use bluess::config::PanelConfig;
use bluess::fsm::Mode;
use bluess::runtime;

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<String>) -> Result<PanelConfig> {
    let Some(path) = path else {
        warn!("No config path given, using defaults");
        return Ok(PanelConfig::default());
    };
    match JsonConfigFile::new(&path).load() {
        Ok(config) => Ok(config),
        Err(ConfigError::NotFound) => {
            warn!("{} not found, using defaults", path);
            Ok(PanelConfig::default())
        }
        Err(e) => Err(e).with_context(|| format!("loading {path}")),
    }
}

/// Translate one input line into panel commands.
fn parse_line(line: &str) -> Option<Vec<PanelCommand>> {
    let line = line.trim();
    if line.is_empty() {
        return Some(Vec::new());
    }
    match line.to_ascii_lowercase().as_str() {
        "clear" => return Some(vec![PanelCommand::Clear]),
        "cancel" => return Some(vec![PanelCommand::CancelArm]),
        _ => {}
    }
    if let Ok(mode) = line.parse::<Mode>() {
        return Some(vec![PanelCommand::Submit(mode)]);
    }
    if line.chars().all(bluess::fsm::input::is_keypad_key) {
        return Some(line.chars().map(PanelCommand::Key).collect());
    }
    None
}

fn main() -> Result<()> {
    init_logging();

    info!("╔══════════════════════════════════════╗");
    info!("║  BlueSS Panel v{}                  ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    let config = load_config(env::args().nth(1))?;
    config.validate().context("invalid configuration")?;
    info!("Config: {:?}", config);

    let ports = Ports {
        display: Arc::new(ConsoleDisplay::new()),
        sound: Arc::new(LogSoundPlayer::new(config.sounds.clone())),
        alerts: Arc::new(LogAlertDispatcher::new(config.alerts.clone())),
        events: Arc::new(LogEventSink::new()),
    };
    let service = PanelService::new(&config, ports);
    let mut panel = runtime::spawn(service).context("starting panel thread")?;

    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = line.context("reading stdin")?;
        match line.trim() {
            "quit" | "exit" => break,
            "status" => {
                if let Some(reply) = panel.call(PanelCommand::Status) {
                    println!("{:?}", reply.status);
                }
                continue;
            }
            _ => {}
        }
        let Some(commands) = parse_line(&line) else {
            warn!("Unrecognised input {:?}", line.trim());
            continue;
        };
        for cmd in commands {
            match panel.call(cmd) {
                Some(reply) => {
                    if let Err(e) = reply.result {
                        info!("Panel: {}", e);
                    }
                }
                None => {
                    warn!("Panel thread is gone");
                    return Ok(());
                }
            }
        }
    }

    panel.shutdown();
    info!("Bye");
    Ok(())
}
