//! Panel configuration parameters
//!
//! Everything the panel needs to know before it starts: the passcode,
//! sound clip identifiers, alert recipients and timings.  The core never
//! parses configuration text; adapters deserialize a [`PanelConfig`] and
//! hand it over as a value.

use core::fmt;
use core::time::Duration;

use serde::{Deserialize, Serialize};

use crate::app::ports::ConfigError;
use crate::fsm::input::{MAX_CODE_LEN, is_keypad_key};

/// Core panel configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct PanelConfig {
    /// Code that authorises mode changes.
    pub passcode: String,
    /// Clip identifiers handed to the sound player.
    #[serde(default)]
    pub sounds: SoundClips,
    /// Who gets notified when the alarm fires, and how.
    #[serde(default)]
    pub alerts: AlertSettings,
    #[serde(default)]
    pub timings: PanelTimings,
}

/// Sound clip identifiers (usually file paths).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoundClips {
    pub alarm: String,
    pub error: String,
    pub beep: String,
    pub armed: String,
}

/// Alert recipients and the SMTP-style transport settings the alert
/// adapter uses.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct AlertSettings {
    #[serde(default)]
    pub recipients: Vec<String>,
    #[serde(default)]
    pub sender: String,
    #[serde(default)]
    pub smtp: SmtpSettings,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct SmtpSettings {
    pub server: String,
    pub port: u16,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Timer parameters.  All countdowns advance in whole ticks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PanelTimings {
    /// Length of one countdown tick (milliseconds).
    pub tick_ms: u32,
    /// Idle ticks before a partially entered code is blanked.
    pub clear_after_ticks: u32,
    /// Ticks between a correct arm request and the mode change.
    pub arm_countdown_ticks: u32,
    /// Pause between alarm clip repetitions (milliseconds).
    pub alarm_cycle_gap_ms: u32,
}

impl PanelTimings {
    pub fn tick(&self) -> Duration {
        Duration::from_millis(u64::from(self.tick_ms))
    }

    pub fn alarm_cycle_gap(&self) -> Duration {
        Duration::from_millis(u64::from(self.alarm_cycle_gap_ms))
    }
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            passcode: "1234".to_string(),
            sounds: SoundClips::default(),
            alerts: AlertSettings::default(),
            timings: PanelTimings::default(),
        }
    }
}

impl Default for SoundClips {
    fn default() -> Self {
        Self {
            alarm: "sounds/alarm.wav".to_string(),
            error: "sounds/error.wav".to_string(),
            beep: "sounds/beep.wav".to_string(),
            armed: "sounds/armed.wav".to_string(),
        }
    }
}

impl Default for SmtpSettings {
    fn default() -> Self {
        Self {
            server: "smtp.gmail.com".to_string(),
            port: 587, // STARTTLS
            username: String::new(),
            password: String::new(),
        }
    }
}

impl Default for PanelTimings {
    fn default() -> Self {
        Self {
            tick_ms: 1000,           // 1 Hz
            clear_after_ticks: 10,   // 10 s to finish typing
            arm_countdown_ticks: 60, // 1 min to leave the premises
            alarm_cycle_gap_ms: 250,
        }
    }
}

impl PanelConfig {
    /// Range-check every field.  Invalid values are rejected, not clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.passcode.is_empty() {
            return Err(ConfigError::ValidationFailed("passcode must not be empty"));
        }
        if self.passcode.chars().count() > MAX_CODE_LEN {
            return Err(ConfigError::ValidationFailed(
                "passcode longer than the keypad buffer",
            ));
        }
        if !self.passcode.chars().all(is_keypad_key) {
            return Err(ConfigError::ValidationFailed(
                "passcode may only contain 0-9, * and #",
            ));
        }
        if self.timings.tick_ms == 0 {
            return Err(ConfigError::ValidationFailed("tick_ms must be > 0"));
        }
        if self.timings.clear_after_ticks == 0 {
            return Err(ConfigError::ValidationFailed("clear_after_ticks must be > 0"));
        }
        if self.timings.arm_countdown_ticks == 0 {
            return Err(ConfigError::ValidationFailed(
                "arm_countdown_ticks must be > 0",
            ));
        }
        Ok(())
    }
}

// Secrets stay out of log output.

impl fmt::Debug for PanelConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PanelConfig")
            .field("passcode", &"<redacted>")
            .field("sounds", &self.sounds)
            .field("alerts", &self.alerts)
            .field("timings", &self.timings)
            .finish()
    }
}

impl fmt::Debug for AlertSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlertSettings")
            .field("recipients", &self.recipients)
            .field("sender", &self.sender)
            .field("smtp", &self.smtp)
            .finish()
    }
}

impl fmt::Debug for SmtpSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpSettings")
            .field("server", &self.server)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}
