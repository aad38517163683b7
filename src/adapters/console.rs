//! Console Notifier - Toasts on the Terminal
//!
//! Prints notifications to stdout (errors to stderr) and mirrors each
//! one as a tracing event so they also land in the structured log.

use std::io::Write;

use tracing::{info, warn};

use crate::ports::notifier::{Level, Notifier};

/// Notifier writing to the terminal.
#[derive(Debug, Default)]
pub struct ConsoleNotifier {
    /// Messages sent so far.
    sent: usize,
}

impl ConsoleNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn sent(&self) -> usize {
        self.sent
    }
}

impl Notifier for ConsoleNotifier {
    fn notify(&mut self, level: Level, message: &str) {
        self.sent += 1;
        let line = format!("[{level}] {message}");
        let written = match level {
            Level::Error | Level::Warning => writeln!(std::io::stderr(), "{line}"),
            Level::Success | Level::Info => writeln!(std::io::stdout(), "{line}"),
        };
        if let Err(e) = written {
            warn!(error = %e, "Failed to print notification");
        }

        match level {
            Level::Error | Level::Warning => warn!(%level, text = message, "Notification"),
            Level::Success | Level::Info => info!(%level, text = message, "Notification"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_every_notification() {
        let mut notifier = ConsoleNotifier::new();
        notifier.success("Trade saved successfully!");
        notifier.error("Withdrawal amount exceeds account balance!");
        notifier.notify(Level::Info, "No activity on this date");
        assert_eq!(notifier.sent(), 3);
    }
}
