//! BlueSS security panel library.
//!
//! Exposes the panel core, its timers and the host adapters for
//! integration testing and for the `bluess-panel` simulator.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod auth;
pub mod config;
pub mod error;
pub mod events;
pub mod fsm;
pub mod runtime;
pub mod throttle;
pub mod timers;
