//! Application core: panel logic behind port traits.
//!
//! This module contains the business rules of the security panel: mode
//! requests, passcode checks, lockout escalation and timer orchestration.
//! All interaction with the display, speaker and alert transport happens
//! through **port traits** defined in [`ports`], keeping this layer fully
//! testable with mock adapters.

pub mod commands;
pub mod events;
pub mod messages;
pub mod ports;
pub mod service;
