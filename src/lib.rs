//! # formbridge
//!
//! A polling event bridge between an automation host and live widget forms.
//!
//! The host cannot call into a form's UI thread. Instead it opens forms by
//! name, drains an ordered log of typed events the forms produce, and sends
//! commands that the bridge applies to named controls on the owning UI
//! thread. Failures never cross the boundary as faults: they show up in the
//! same log as exception events.
//!
//! ## Core Systems
//!
//! - **[`widget`]**: Slotmap-backed headless widget tree with per-node subscriptions
//! - **[`event`]**: Event schema, the shared append-only log, widget-to-event translation
//! - **[`registry`]**: Per-form control registry built by tree discovery
//! - **[`command`]**: Command decoding and dispatch onto UI threads
//! - **[`controller`]**: Per-form controller, UI thread and the controller directory
//! - **[`resolve`]**: Pluggable form resolution (in-memory catalog, TOML manifests)
//! - **[`prompt`]**: Modal prompt hosting
//! - **[`bridge`]**: The host-facing facade
//! - **[`testing`]**: FormPilot and event log rendering for tests

// Foundation
pub mod error;
pub mod time;

// Core systems
pub mod event;
pub mod registry;
pub mod widget;

// Dispatch and lifecycle
pub mod command;
pub mod controller;
pub mod prompt;
pub mod resolve;

// Facade
pub mod bridge;
pub mod config;
pub mod logging;

// Test support
pub mod testing;

pub use bridge::Bridge;
pub use config::{BridgeConfig, ReopenPolicy};
pub use error::{BridgeError, Result};

// Proc macros (feature-gated)
#[cfg(feature = "macros")]
pub use formbridge_macros::form;
