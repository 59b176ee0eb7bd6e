//! Alert dispatcher that writes alerts to the log.
//!
//! Stands in for an SMTP mailer: it addresses the message to every
//! configured recipient and records the hand-off.  Delivery problems are
//! the dispatcher's own business and never reach the panel.

use log::{info, warn};

use crate::app::ports::AlertPort;
use crate::config::AlertSettings;

pub struct LogAlertDispatcher {
    settings: AlertSettings,
}

impl LogAlertDispatcher {
    pub fn new(settings: AlertSettings) -> Self {
        if settings.recipients.is_empty() {
            warn!("No alert recipients configured; alerts will only be logged");
        }
        Self { settings }
    }
}

impl AlertPort for LogAlertDispatcher {
    fn send_alert(&self, message: &str) {
        let smtp = &self.settings.smtp;
        for to in &self.settings.recipients {
            info!(
                "ALERT | {} -> {} via {}:{}",
                self.settings.sender, to, smtp.server, smtp.port
            );
        }
        for line in message.lines() {
            info!("ALERT | {}", line);
        }
    }
}
