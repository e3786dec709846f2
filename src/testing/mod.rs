//! Headless testing helpers: FormPilot, event log rendering.
//!
//! Use the [`FormPilot`] to act as the user of an open form. Use
//! [`log_to_string`] and friends to turn the event log into plain text for
//! compact assertions.

pub mod pilot;
pub mod snapshot;

pub use pilot::FormPilot;
pub use snapshot::{event_line, events_to_string, log_to_string};
