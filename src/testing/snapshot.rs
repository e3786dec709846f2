//! Event log rendering for readable assertions.
//!
//! One line per event, payload fields only when set:
//!
//! ```text
//! 0 click Btn1
//! 1 text-change Field1 s="hello"
//! 2 numeric-change Lots d=2.5
//! ```

use std::fmt::Write;

use crate::event::{Event, EventLog};

/// Render a single event (without index).
pub fn event_line(event: &Event) -> String {
    let mut line = event.kind.to_string();
    if !event.control_name.is_empty() {
        line.push(' ');
        line.push_str(&event.control_name);
    }
    if event.long_value != 0 {
        let _ = write!(line, " l={}", event.long_value);
    }
    if event.double_value != 0.0 {
        let _ = write!(line, " d={}", event.double_value);
    }
    if !event.string_value.is_empty() {
        let _ = write!(line, " s={:?}", event.string_value);
    }
    line
}

/// Render `events` with their indices, starting at `first`.
pub fn events_to_string(events: &[Event], first: usize) -> String {
    events
        .iter()
        .enumerate()
        .map(|(i, event)| format!("{} {}", first + i, event_line(event)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render the whole log.
pub fn log_to_string(log: &EventLog) -> String {
    events_to_string(&log.snapshot(), 0)
}
