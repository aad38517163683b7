//! Notifier Port - Transient User Notifications
//!
//! Short status messages shown after an operation, the way a toast
//! would be in a graphical front end.

use crate::error::JournalError;

/// Notification severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
  Success,
  Info,
  Warning,
  Error,
}

impl std::fmt::Display for Level {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Success => write!(f, "success"),
      Self::Info => write!(f, "info"),
      Self::Warning => write!(f, "warning"),
      Self::Error => write!(f, "error"),
    }
  }
}

/// Trait for notification outputs.
pub trait Notifier {
  fn notify(&mut self, level: Level, message: &str);

  fn success(&mut self, message: &str) {
    self.notify(Level::Success, message);
  }

  fn error(&mut self, message: &str) {
    self.notify(Level::Error, message);
  }

  /// Show a rejected input as an error toast. Returns `false`, without
  /// notifying, for failures that are not rejections.
  fn rejected(&mut self, error: &JournalError) -> bool {
    if !error.is_rejection() {
      return false;
    }
    self.error(&error.toast());
    true
  }
}
