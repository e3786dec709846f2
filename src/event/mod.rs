//! Event system: schema, the shared event log, and widget-to-event translation.

pub mod log;
pub mod schema;
pub mod translate;

pub use log::EventLog;
pub use schema::{Event, EventKind};
pub use translate::{enable_change, subscribe_node};
