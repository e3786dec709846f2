//! Command dispatch: host-issued mutations applied to named controls.
//!
//! [`CommandDispatcher`] broadcasts a [`Command`] to every live form. Each
//! form looks the name up in its own registry; a form without the name, or
//! whose control cannot take the command, records an exception event and
//! the broadcast moves on. Every widget access is marshaled onto the
//! owning form's UI thread and the caller waits for it.

pub mod mutation;

use std::sync::Arc;

use tracing::{debug, warn};

pub use mutation::{Mutation, PropertyWrite};

use crate::controller::{Controller, ControllerDirectory, FormKey};
use crate::error::{BridgeError, Result};
use crate::event::{Event, EventKind, EventLog};
use crate::prompt::{PromptHost, PromptSpec};
use crate::registry::RegistryEntry;

// ---------------------------------------------------------------------------
// Command
// ---------------------------------------------------------------------------

/// A host instruction aimed at a control name. Field meaning depends on
/// `kind`, mirroring [`Event`].
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    pub name: String,
    pub kind: EventKind,
    pub long_value: i64,
    pub double_value: f64,
    pub string_value: String,
}

impl Command {
    pub fn new(name: impl Into<String>, kind: EventKind) -> Self {
        Self {
            name: name.into(),
            kind,
            long_value: 0,
            double_value: 0.0,
            string_value: String::new(),
        }
    }

    /// Build from the host's untyped fields; fails on an unknown kind code.
    pub fn from_raw(
        name: &str,
        kind: i32,
        long_value: i64,
        double_value: f64,
        string_value: &str,
    ) -> Result<Self> {
        Ok(Self::new(name, EventKind::try_from(kind)?)
            .with_long(long_value)
            .with_double(double_value)
            .with_string(string_value))
    }

    pub fn with_long(mut self, value: i64) -> Self {
        self.long_value = value;
        self
    }

    pub fn with_double(mut self, value: f64) -> Self {
        self.double_value = value;
        self
    }

    pub fn with_string(mut self, value: impl Into<String>) -> Self {
        self.string_value = value.into();
        self
    }
}

// ---------------------------------------------------------------------------
// CommandDispatcher
// ---------------------------------------------------------------------------

/// Applies commands across the open forms of a [`ControllerDirectory`].
#[derive(Clone)]
pub struct CommandDispatcher {
    directory: ControllerDirectory,
    log: EventLog,
    prompt: Arc<dyn PromptHost>,
}

impl CommandDispatcher {
    pub fn new(directory: ControllerDirectory, log: EventLog, prompt: Arc<dyn PromptHost>) -> Self {
        Self {
            directory,
            log,
            prompt,
        }
    }

    /// Apply `command` to every live form. Failures never propagate; each
    /// becomes one exception event. Returns how many forms applied it.
    pub fn dispatch(&self, command: &Command) -> usize {
        let mutation = match Mutation::decode(command) {
            Ok(mutation) => mutation,
            Err(err) => {
                self.report(None, &command.name, &err);
                return 0;
            }
        };
        let mut applied = 0;
        for controller in self.directory.live() {
            match self.apply(&controller, command, &mutation) {
                Ok(()) => applied += 1,
                Err(err) => self.report(Some(controller.key()), &command.name, &err),
            }
        }
        debug!(name = %command.name, kind = %command.kind, applied, "command dispatched");
        applied
    }

    fn apply(&self, controller: &Controller, command: &Command, mutation: &Mutation) -> Result<()> {
        let entry = controller.lookup(&command.name)?;
        if !mutation.supports(entry.kind) {
            return Err(BridgeError::UnsupportedForKind {
                command: command.kind,
                name: entry.name,
                kind: entry.kind,
            });
        }
        match mutation {
            Mutation::Write(write) => {
                let write = write.clone();
                let node = entry.node;
                controller.invoke(move |tree| write.apply(tree, node))?
            }
            Mutation::SetEnabled(enabled) => controller.set_enabled(&entry, *enabled).map(drop),
            Mutation::Prompt { spec, lock } => self.prompt(controller, &entry, spec, *lock),
        }
    }

    /// Show a prompt on the form's UI thread and record the answer. With
    /// `lock` the control is disabled while the prompt is up and enabled
    /// again afterwards, whatever the outcome.
    fn prompt(
        &self,
        controller: &Controller,
        entry: &RegistryEntry,
        spec: &PromptSpec,
        lock: bool,
    ) -> Result<()> {
        if lock {
            controller.set_enabled(entry, false)?;
        }
        let host = Arc::clone(&self.prompt);
        let shown = spec.clone();
        let answer = controller.invoke(move |_| host.show(&shown));
        if lock {
            controller.set_enabled(entry, true)?;
        }
        let answer = answer?;
        self.log.push(
            Event::new(EventKind::MessageBox, &entry.name)
                .with_form(controller.key())
                .with_long(answer.code())
                .with_string(spec.title.as_str()),
        );
        Ok(())
    }

    fn report(&self, form: Option<&FormKey>, name: &str, err: &BridgeError) {
        match form {
            Some(form) => warn!(%form, control = name, error = %err, "command failed"),
            None => warn!(control = name, error = %err, "command rejected"),
        }
        self.log.push(Event::exception(form.cloned(), err.to_string()));
    }
}

impl std::fmt::Debug for CommandDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandDispatcher")
            .field("directory", &self.directory)
            .field("log", &self.log.len())
            .finish_non_exhaustive()
    }
}
