//! Text shown on the keypad display.

use crate::fsm::Mode;

pub const PROMPT: &str = "Enter Code: ";
pub const CODE_REQUIRED: &str = "You must enter a code!";
pub const INCORRECT_CODE: &str = "Incorrect Code! Try again!";
pub const ALARM_TRIGGERED: &str = "ALARM TRIGGERED!";
pub const ARMING_CANCELLED: &str = "Stopped system from arming!";

pub fn status(mode: Mode) -> String {
    format!("System Status:  {mode}")
}

pub fn incorrect_code(attempts_remaining: u8) -> String {
    format!("{INCORRECT_CODE} \n[!] {attempts_remaining} attempts remaining!! [!]")
}

pub fn already_in(mode: Mode) -> String {
    format!("System is already in {mode} mode!")
}

/// Per-tick countdown line.
pub fn arming_countdown(target: Mode, remaining: u32) -> String {
    format!("{target} in {remaining}...")
}

/// Notice shown at the 60 / 30 tick phase boundaries.
pub fn arming_notice(target: Mode, remaining: u32) -> String {
    format!("{remaining} seconds until {target}! Please leave the premises.")
}

/// Body of the alert sent to the recipient list.
pub fn alert_body(mode: Mode, timestamp: &str) -> String {
    format!(
        "BlueSS Alert! - Alarm was triggered on main console!\n\
         Alarm was triggered at {timestamp}\n\
         System was in {mode} when the alert was triggered!"
    )
}
