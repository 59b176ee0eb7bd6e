//! Panel modes and the transition table.
//!
//! ```text
//! ┌────────────────────┬──────────────────────────────────────────────┐
//! │ target             │ route                                        │
//! ├────────────────────┼──────────────────────────────────────────────┤
//! │ EMERGENCY / SILENT │ Panic:     immediate, no passcode gate      │
//! │ ARMED / CCTV       │ Countdown: via ArmSequencer                 │
//! │                    │ Immediate: only when leaving STARTUP        │
//! │ HOME / DISARMED    │ Immediate: stops the alarm if it runs       │
//! │ STARTUP            │ rejected:  initial value only               │
//! └────────────────────┴──────────────────────────────────────────────┘
//! ```
//!
//! The routing decision is pure; the [`PanelService`] applies it.
//!
//! [`PanelService`]: crate::app::service::PanelService

pub mod input;
pub mod lockout;

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PanelError;

// ---------------------------------------------------------------------------
// Mode
// ---------------------------------------------------------------------------

/// Operating mode of the premises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Mode {
    Startup,
    Disarmed,
    Home,
    Armed,
    Cctv,
    Emergency,
    Silent,
}

impl Mode {
    /// Every mode, in declaration order.
    pub const ALL: [Mode; 7] = [
        Mode::Startup,
        Mode::Disarmed,
        Mode::Home,
        Mode::Armed,
        Mode::Cctv,
        Mode::Emergency,
        Mode::Silent,
    ];

    /// Modes in which a wrong passcode counts toward lockout.
    pub const fn is_armed_like(self) -> bool {
        matches!(self, Self::Armed | Self::Cctv | Self::Emergency | Self::Silent)
    }

    /// Panic-button modes: entered directly, without a passcode.
    pub const fn is_panic(self) -> bool {
        matches!(self, Self::Emergency | Self::Silent)
    }

    /// Upper-case label shown on the status line.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Startup => "STARTUP",
            Self::Disarmed => "DISARMED",
            Self::Home => "HOME",
            Self::Armed => "ARMED",
            Self::Cctv => "CCTV",
            Self::Emergency => "EMERGENCY",
            Self::Silent => "SILENT",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A mode name that [`Mode::from_str`] did not recognise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMode(pub std::string::String);

impl fmt::Display for UnknownMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown mode {:?}", self.0)
    }
}

impl FromStr for Mode {
    type Err = UnknownMode;

    /// Accepts the status labels and the keypad button names
    /// (`arm`, `disarm`, …), case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "startup" => Ok(Self::Startup),
            "disarmed" | "disarm" => Ok(Self::Disarmed),
            "home" => Ok(Self::Home),
            "armed" | "arm" => Ok(Self::Armed),
            "cctv" => Ok(Self::Cctv),
            "emergency" | "panic" => Ok(Self::Emergency),
            "silent" => Ok(Self::Silent),
            _ => Err(UnknownMode(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Routing
// ---------------------------------------------------------------------------

/// How a request for a target mode is carried out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Unconditional panic transition (EMERGENCY, SILENT).
    Panic,
    /// Passcode-gated transition committed by the arm countdown.
    Countdown,
    /// Passcode-gated transition committed on the spot.
    Immediate,
}

/// Decide how `current → target` is carried out.
pub fn route(current: Mode, target: Mode) -> Result<Route, PanelError> {
    match target {
        Mode::Startup => Err(PanelError::InvalidTarget(target)),
        Mode::Emergency | Mode::Silent => Ok(Route::Panic),
        Mode::Armed | Mode::Cctv if current != Mode::Startup => Ok(Route::Countdown),
        Mode::Armed | Mode::Cctv | Mode::Home | Mode::Disarmed => Ok(Route::Immediate),
    }
}
