//! Error taxonomy for the bridge.
//!
//! Nothing here ever crosses the public boundary as a fault: [`Bridge`]
//! converts every [`BridgeError`] raised by `open`, `close` or `command` into
//! an exception event. Only [`Bridge::drain`] hands an error back, for an
//! out-of-range read.
//!
//! [`Bridge`]: crate::bridge::Bridge
//! [`Bridge::drain`]: crate::bridge::Bridge::drain

use thiserror::Error;

use crate::event::schema::EventKind;
use crate::widget::kind::WidgetKind;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, BridgeError>;

/// Everything that can go wrong inside the bridge.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BridgeError {
    /// A form (or a widget description inside it) could not be resolved.
    #[error("{0}")]
    Resolution(String),

    /// Two widgets in one form share a caller-visible name.
    #[error("element with name '{0}' is already registered in this form")]
    DuplicateName(String),

    /// A command targeted a name no open form registers.
    #[error("element with name '{0}' not found")]
    NotFound(String),

    /// The command kind exists but the target widget cannot accept it.
    #[error("command '{command}' is not supported for element '{name}' of kind '{kind}'")]
    UnsupportedForKind {
        command: EventKind,
        name: String,
        kind: WidgetKind,
    },

    /// The event kind carries no mutation at all (click, scroll, ...).
    #[error("command '{0}' cannot be sent to a form")]
    UnsupportedCommand(EventKind),

    /// An integer kind code from the host did not map to any event kind.
    #[error("unknown event kind code {0}")]
    UnknownEventKind(i32),

    /// `drain` was asked for an index past the end of the log.
    #[error("event index {index} is out of range (count is {count})")]
    IndexOutOfRange { index: usize, count: usize },

    /// The form is already open and the reopen policy forbids replacing it.
    #[error("form '{0}' is already open")]
    AlreadyOpen(String),

    /// The form's UI thread is gone (closed or crashed).
    #[error("ui thread for form '{0}' is not running")]
    Disconnected(String),

    /// Any other failure, e.g. a widget operation panicking.
    #[error("{0}")]
    Internal(String),
}

impl BridgeError {
    /// Build a resolution error from anything printable.
    pub fn resolution(message: impl Into<String>) -> Self {
        Self::Resolution(message.into())
    }

    /// Build an internal error from anything printable.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}
