//! Port traits, the hexagonal boundary between the panel core and the
//! outside world.
//!
//! ```text
//!   PanelService ──▶ Port trait ──▶ Adapter (display, speaker, mailer …)
//! ```
//!
//! Unlike a single-threaded control loop, the panel's timers run on their
//! own threads and call the display and sound ports directly.  Every port
//! is therefore `Send + Sync` and takes `&self`; adapters that keep state
//! guard it internally.
//!
//! Port calls are fire-and-forget.  An adapter that fails logs the failure
//! itself; nothing propagates back into the state machine.

use std::sync::Arc;

use crate::config::{PanelConfig, SoundClips};

// ───────────────────────────────────────────────────────────────
// Display port
// ───────────────────────────────────────────────────────────────

/// The keypad's text surface: one status line, one code/message line.
pub trait DisplayPort: Send + Sync {
    /// Replace the status line (e.g. `System Status:  ARMED`).
    fn set_status_text(&self, text: &str);

    /// Replace the code/message line.
    fn set_code_text(&self, text: &str);

    /// Blank both lines.
    fn clear(&self);
}

// ───────────────────────────────────────────────────────────────
// Sound port
// ───────────────────────────────────────────────────────────────

/// The named clips the panel plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundClip {
    Alarm,
    Error,
    Beep,
    Armed,
}

impl SoundClip {
    /// Configured identifier for this clip.
    pub fn resolve(self, clips: &SoundClips) -> &str {
        match self {
            Self::Alarm => &clips.alarm,
            Self::Error => &clips.error,
            Self::Beep => &clips.beep,
            Self::Armed => &clips.armed,
        }
    }
}

/// Plays a named clip.
///
/// `play` returns when one playback cycle has finished; the alarm loop
/// relies on this to pace its repetitions.
pub trait SoundPort: Send + Sync {
    fn play(&self, clip: SoundClip);
}

// ───────────────────────────────────────────────────────────────
// Alert port
// ───────────────────────────────────────────────────────────────

/// Best-effort notification of the people on the alert list.
pub trait AlertPort: Send + Sync {
    fn send_alert(&self, message: &str);
}

// ───────────────────────────────────────────────────────────────
// Event sink port
// ───────────────────────────────────────────────────────────────

/// The panel emits structured [`PanelEvent`](super::events::PanelEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: &super::events::PanelEvent);
}

// ───────────────────────────────────────────────────────────────
// Port bundle
// ───────────────────────────────────────────────────────────────

/// Every collaborator the panel talks to.  Cloning shares the adapters.
#[derive(Clone)]
pub struct Ports {
    pub display: Arc<dyn DisplayPort>,
    pub sound: Arc<dyn SoundPort>,
    pub alerts: Arc<dyn AlertPort>,
    pub events: Arc<dyn EventSink>,
}

// ───────────────────────────────────────────────────────────────
// Configuration port
// ───────────────────────────────────────────────────────────────

/// Loads and persists panel configuration.
///
/// Implementations MUST run [`PanelConfig::validate`] before handing a
/// config out or persisting it.
pub trait ConfigPort {
    /// Load configuration from the backing store.
    fn load(&self) -> Result<PanelConfig, ConfigError>;

    /// Validate and persist configuration.
    fn save(&self, config: &PanelConfig) -> Result<(), ConfigError>;
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`ConfigPort`] operations and [`PanelConfig::validate`].
#[derive(Debug)]
pub enum ConfigError {
    /// No config found in the backing store.
    NotFound,
    /// Stored config could not be deserialized.
    Corrupted,
    /// A config field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
    /// Generic I/O error from the backing store.
    IoError,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFound => write!(f, "config not found"),
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}

impl std::error::Error for ConfigError {}
