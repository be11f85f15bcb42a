//! Error types for the wikitext module.
//!
//! Every fallible operation in the crate returns [`Result`]. Lookups that can
//! miss (section by name/path, placeholder restore on a clean page) return
//! `Option` instead and never produce an error.
//!
//! Exported items:
//! - `WtError` - error enum covering bad arguments, removed templates and
//!    configuration loading failures.
//! - `Result<T>` - alias for `std::result::Result<T, WtError>`.

use std::error::Error;
use std::fmt;

/// The canonical result type used across the wikitext module.
pub type Result<T> = std::result::Result<T, WtError>;

/// Wikitext error.
///
/// - `Precondition` - the call was made with arguments it can never accept
///    (empty section path, empty parameter key, content without a heading).
///    Retrying with the same arguments gives the same error.
/// - `InvalidState` - the target object can no longer be used, e.g. any edit
///    on a template that was removed from the page.
/// - `Config` - site configuration could not be loaded.
/// - `Other` - catch-all carrying a message and optional boxed cause.
#[derive(Debug)]
pub enum WtError {
    Precondition {
        msg: String,
    },
    InvalidState {
        msg: String,
    },
    Config {
        msg: String,
        source: Option<Box<dyn Error + Send + Sync + 'static>>,
    },
    Other {
        msg: String,
        source: Option<Box<dyn Error + Send + Sync + 'static>>,
    },
}

impl WtError {
    /// Construct a precondition error.
    pub fn precondition<S: Into<String>>(msg: S) -> Self {
        WtError::Precondition { msg: msg.into() }
    }

    /// Construct an invalid-state error.
    pub fn invalid_state<S: Into<String>>(msg: S) -> Self {
        WtError::InvalidState { msg: msg.into() }
    }

    /// Wrap a deserialization or I/O failure raised while loading configuration.
    pub fn config_err<E: Error + Send + Sync + 'static>(msg: impl Into<String>, e: E) -> Self {
        WtError::Config {
            msg: msg.into(),
            source: Some(Box::new(e)),
        }
    }

    /// Generic helper to produce Other(...) with an optional source.
    pub fn other_with_source<E: Error + Send + Sync + 'static>(
        msg: impl Into<String>,
        source: Option<E>,
    ) -> Self {
        WtError::Other {
            msg: msg.into(),
            source: source.map(|e| Box::new(e) as Box<dyn Error + Send + Sync>),
        }
    }

    /// Returns a short description of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            WtError::Precondition { .. } => "Precondition",
            WtError::InvalidState { .. } => "InvalidState",
            WtError::Config { .. } => "Config",
            WtError::Other { .. } => "Other",
        }
    }

    /// True for errors raised because a template record was already removed.
    pub fn is_invalid_state(&self) -> bool {
        matches!(self, WtError::InvalidState { .. })
    }

    /// True for errors raised because of unusable call arguments.
    pub fn is_precondition(&self) -> bool {
        matches!(self, WtError::Precondition { .. })
    }

    fn source_opt(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            WtError::Config { source, .. } | WtError::Other { source, .. } => {
                source.as_ref().map(|b| b.as_ref() as &dyn Error)
            }
            _ => None,
        }
    }
}

impl fmt::Display for WtError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WtError::Precondition { msg } => write!(f, "Precondition violated: {}", msg),
            WtError::InvalidState { msg } => write!(f, "Invalid state: {}", msg),
            WtError::Config { msg, source } => {
                if let Some(s) = source {
                    write!(f, "Config error: {} (cause: {})", msg, s)
                } else {
                    write!(f, "Config error: {}", msg)
                }
            }
            WtError::Other { msg, source } => {
                if let Some(s) = source {
                    write!(f, "{} (cause: {})", msg, s)
                } else {
                    write!(f, "{}", msg)
                }
            }
        }
    }
}

impl Error for WtError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source_opt()
    }
}

impl From<serde_json::Error> for WtError {
    fn from(e: serde_json::Error) -> Self {
        WtError::config_err("invalid site configuration", e)
    }
}

impl From<regex::Error> for WtError {
    fn from(e: regex::Error) -> Self {
        WtError::other_with_source("failed to build anchor pattern", Some(e))
    }
}
