use thiserror::Error;
use tracing::{error, warn};

use crate::config::StoreError;
use crate::control_panel::FormError;
use crate::messaging::MessagingError;

/// Error severity for status display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,    // informational
    Warning, // recoverable
    Error,   // operation failed
}

/// Failures at the two external edges: the configuration store and
/// cross-context messaging. The overlay core itself never fails.
#[derive(Error, Debug)]
pub enum QuickPressError {
    #[error("Configuration store error: {0}")]
    Store(#[from] StoreError),

    #[error("Messaging error: {0}")]
    Messaging(#[from] MessagingError),

    #[error("Invalid shortcut: {0}")]
    Form(#[from] FormError),

    #[error("Failed to parse page fixture: {0}")]
    Fixture(#[from] serde_json::Error),
}

impl QuickPressError {
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Store(_) => ErrorSeverity::Error,
            Self::Messaging(_) => ErrorSeverity::Error,
            Self::Form(_) => ErrorSeverity::Warning,
            Self::Fixture(_) => ErrorSeverity::Error,
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            Self::Store(e) => format!("Settings unavailable: {}", e),
            Self::Messaging(_) => "Failed to message content script.".to_string(),
            Self::Form(e) => e.to_string(),
            Self::Fixture(e) => format!("Invalid page fixture: {}", e),
        }
    }
}

pub type Result<T> = std::result::Result<T, QuickPressError>;

/// Extension trait for silent error logging with caller location tracking.
/// Use when the operation is recoverable and the user doesn't need to know.
///
/// # Examples
///
/// ```ignore
/// use quickpress::error::ResultExt;
///
/// // Keep the current gesture if the store can't be read
/// let stored = store.get(SHORTCUT_STORAGE_KEY).log_err();
/// ```
pub trait ResultExt<T> {
    /// Log error with caller location and return None. Use for recoverable failures.
    fn log_err(self) -> Option<T>;
    /// Log as warning with caller location and return None. Use for expected failures.
    fn warn_on_err(self) -> Option<T>;
}

impl<T, E: std::fmt::Debug> ResultExt<T> for std::result::Result<T, E> {
    #[track_caller]
    fn log_err(self) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(error) => {
                let caller = std::panic::Location::caller();
                error!(
                    error = ?error,
                    file = caller.file(),
                    line = caller.line(),
                    "Operation failed"
                );
                None
            }
        }
    }

    #[track_caller]
    fn warn_on_err(self) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(error) => {
                let caller = std::panic::Location::caller();
                warn!(
                    error = ?error,
                    file = caller.file(),
                    line = caller.line(),
                    "Operation had warning"
                );
                None
            }
        }
    }
}
