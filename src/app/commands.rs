//! Inbound commands to the panel service, and what they produce.
//!
//! These represent discrete user actions on the keypad that the
//! [`PanelService`](super::service::PanelService) interprets and acts upon.

use crate::fsm::Mode;

/// Keypad actions that adapters can send into the panel core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelCommand {
    /// A keypad key (`0-9`, `*`, `#`).
    Key(char),

    /// The Clear button.
    Clear,

    /// A mode button, checked against the keys typed so far.
    Submit(Mode),

    /// A mode request with an explicit code (bypasses the keypad buffer).
    Request { target: Mode, code: String },

    /// Stop a running arm countdown.
    CancelArm,

    /// No-op; the reply carries a status snapshot.
    Status,

    /// Stop every timer and leave the dispatch loop.
    Shutdown,
}

/// Successful result of a mode request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The mode changed on the spot.
    Transitioned { from: Mode, to: Mode },
    /// The countdown is running; the mode changes when it completes.
    ArmingStarted { target: Mode },
    /// The panel is already in the requested mode.
    AlreadyInMode(Mode),
    /// A running countdown was stopped; the mode is unchanged.
    ArmingCancelled { target: Mode },
    /// A keypad action that does not change the mode.
    Accepted,
}
