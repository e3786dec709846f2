//! The host-facing facade.
//!
//! [`Bridge`] owns the event log, the controller directory and the command
//! dispatcher, and exposes the polling API a host drives: `open`, `close`,
//! `command`, `drain_count` and `drain`. The first three never fail; every
//! problem is logged and appended to the event log as an exception event.

use std::sync::Arc;

use tracing::{info, warn};

use crate::command::{Command, CommandDispatcher};
use crate::config::{BridgeConfig, ReopenPolicy};
use crate::controller::{Controller, ControllerDirectory, FormKey};
use crate::error::{BridgeError, Result};
use crate::event::{Event, EventLog};
use crate::prompt::PromptHost;
use crate::resolve::FormResolver;

/// A running bridge between one host and any number of open forms.
pub struct Bridge {
    config: BridgeConfig,
    resolver: Arc<dyn FormResolver>,
    log: EventLog,
    directory: ControllerDirectory,
    dispatcher: CommandDispatcher,
}

impl Bridge {
    pub fn new(
        config: BridgeConfig,
        resolver: Arc<dyn FormResolver>,
        prompt: Arc<dyn PromptHost>,
    ) -> Self {
        let log = EventLog::new();
        let directory = ControllerDirectory::new();
        let dispatcher = CommandDispatcher::new(directory.clone(), log.clone(), prompt);
        Self {
            config,
            resolver,
            log,
            directory,
            dispatcher,
        }
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    /// Resolve and open a form. Returns once its UI thread is running.
    pub fn open(&self, module_path: &str, form_name: &str) {
        let key = FormKey::new(module_path, form_name);
        if let Err(err) = self.try_open(&key) {
            self.report(Some(&key), "open", &err);
        }
    }

    /// The open form, if any, stays untouched until its replacement is
    /// fully built.
    fn try_open(&self, key: &FormKey) -> Result<()> {
        let policy = self.config.reopen_policy;
        if policy == ReopenPolicy::Reject && self.directory.get(key).is_some() {
            return Err(BridgeError::AlreadyOpen(key.to_string()));
        }
        let tree = self.resolver.resolve(&key.module_path, &key.form_name)?;
        let controller =
            Controller::open(key.clone(), tree, &self.log, &self.config.thread_name(key))?;
        match policy {
            ReopenPolicy::Replace => {
                if let Some(previous) = self.directory.insert(controller) {
                    info!(form = %key, "replaced open form");
                    previous.dispose()?;
                }
            }
            ReopenPolicy::Reject => {
                // Lost a race with a concurrent open of the same form.
                if let Err(refused) = self.directory.insert_if_vacant(controller) {
                    refused.dispose()?;
                    return Err(BridgeError::AlreadyOpen(key.to_string()));
                }
            }
        }
        Ok(())
    }

    /// Close a form. Closing a form that is not open does nothing.
    pub fn close(&self, module_path: &str, form_name: &str) {
        let key = FormKey::new(module_path, form_name);
        let Some(controller) = self.directory.remove(&key) else {
            return;
        };
        if let Err(err) = controller.dispose() {
            self.report(Some(&key), "close", &err);
        }
    }

    /// The live controller for a form, if open.
    pub fn controller(&self, module_path: &str, form_name: &str) -> Option<Arc<Controller>> {
        self.directory.get(&FormKey::new(module_path, form_name))
    }

    /// Keys of every live form, in key order.
    pub fn open_forms(&self) -> Vec<FormKey> {
        self.directory
            .live()
            .iter()
            .map(|controller| controller.key().clone())
            .collect()
    }

    // -----------------------------------------------------------------------
    // Commands
    // -----------------------------------------------------------------------

    /// Apply `command` to every open form carrying the target name.
    pub fn command(&self, command: &Command) {
        self.dispatcher.dispatch(command);
    }

    /// [`command`](Self::command) from the host's untyped fields.
    pub fn command_raw(
        &self,
        name: &str,
        kind: i32,
        long_value: i64,
        double_value: f64,
        string_value: &str,
    ) {
        match Command::from_raw(name, kind, long_value, double_value, string_value) {
            Ok(command) => self.command(&command),
            Err(err) => self.report(None, "command", &err),
        }
    }

    // -----------------------------------------------------------------------
    // Event log
    // -----------------------------------------------------------------------

    /// Number of events appended so far.
    pub fn drain_count(&self) -> usize {
        self.log.len()
    }

    /// The event at `index`; fails past [`drain_count`](Self::drain_count).
    pub fn drain(&self, index: usize) -> Result<Event> {
        self.log.get(index)
    }

    pub fn event_log(&self) -> &EventLog {
        &self.log
    }

    fn report(&self, form: Option<&FormKey>, operation: &str, err: &BridgeError) {
        match form {
            Some(form) => warn!(%form, operation, error = %err, "bridge operation failed"),
            None => warn!(operation, error = %err, "bridge operation failed"),
        }
        self.log
            .push(Event::exception(form.cloned(), err.to_string()));
    }
}

impl Drop for Bridge {
    fn drop(&mut self) {
        for controller in self.directory.drain_all() {
            if let Err(err) = controller.dispose() {
                warn!(form = %controller.key(), error = %err, "form did not close cleanly");
            }
        }
    }
}

impl std::fmt::Debug for Bridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bridge")
            .field("config", &self.config)
            .field("forms", &self.directory.len())
            .field("events", &self.log.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Barrier;
    use std::thread;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::event::EventKind;
    use crate::prompt::ScriptedPrompt;
    use crate::resolve::CatalogResolver;
    use crate::widget::{Interaction, NodeData, Widget, WidgetTree};

    fn panel() -> WidgetTree {
        let mut tree = WidgetTree::new();
        let root = tree.insert(NodeData::new("Panel", Widget::form()));
        tree.insert_child(root, NodeData::new("Btn1", Widget::button()));
        tree.insert_child(root, NodeData::new("Field1", Widget::text_field()));
        tree
    }

    fn broken() -> WidgetTree {
        let mut tree = panel();
        let root = tree.root().unwrap();
        tree.insert_child(root, NodeData::new("Btn1", Widget::button()));
        tree
    }

    fn bridge(policy: ReopenPolicy) -> Bridge {
        let catalog = CatalogResolver::new()
            .with_form("orders", "Panel", panel)
            .with_form("orders", "Broken", broken);
        Bridge::new(
            BridgeConfig::new().with_reopen_policy(policy),
            Arc::new(catalog),
            Arc::new(ScriptedPrompt::default()),
        )
    }

    #[test]
    fn open_then_click() {
        let bridge = bridge(ReopenPolicy::Replace);
        bridge.open("orders", "Panel");
        let controller = bridge.controller("orders", "Panel").unwrap();
        let node = controller.lookup("Btn1").unwrap().node;
        controller
            .invoke(move |tree| tree.emit(node, &Interaction::Click))
            .unwrap();
        assert_eq!(bridge.drain_count(), 1);
        let event = bridge.drain(0).unwrap();
        assert_eq!((event.kind, event.control_name.as_str()), (EventKind::Click, "Btn1"));
        assert!(bridge.drain(1).is_err());
    }

    #[test]
    fn unknown_form_reports_resolution_failure() {
        let bridge = bridge(ReopenPolicy::Replace);
        bridge.open("orders", "Nope");
        assert_eq!(bridge.drain_count(), 1);
        let event = bridge.drain(0).unwrap();
        assert_eq!(event.kind, EventKind::Exception);
        assert_eq!(
            event.string_value,
            "form with name 'Nope' in module 'orders' not found"
        );
        assert!(bridge.open_forms().is_empty());
    }

    #[test]
    fn duplicate_names_register_nothing() {
        let bridge = bridge(ReopenPolicy::Replace);
        bridge.open("orders", "Broken");
        assert_eq!(bridge.drain_count(), 1);
        assert_eq!(bridge.drain(0).unwrap().kind, EventKind::Exception);
        assert!(bridge.controller("orders", "Broken").is_none());
    }

    #[test]
    fn close_twice_is_silent() {
        let bridge = bridge(ReopenPolicy::Replace);
        bridge.open("orders", "Panel");
        bridge.close("orders", "Panel");
        bridge.close("orders", "Panel");
        assert_eq!(bridge.drain_count(), 0);
        assert!(bridge.open_forms().is_empty());
    }

    #[test]
    fn reopen_replaces_by_default() {
        let bridge = bridge(ReopenPolicy::Replace);
        bridge.open("orders", "Panel");
        let first = bridge.controller("orders", "Panel").unwrap();
        bridge.open("orders", "Panel");
        let second = bridge.controller("orders", "Panel").unwrap();
        assert!(first.is_disposed());
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(bridge.open_forms().len(), 1);
        assert_eq!(bridge.drain_count(), 0);
    }

    #[test]
    fn reopen_rejected_keeps_first() {
        let bridge = bridge(ReopenPolicy::Reject);
        bridge.open("orders", "Panel");
        let first = bridge.controller("orders", "Panel").unwrap();
        bridge.open("orders", "Panel");
        assert!(!first.is_disposed());
        let event = bridge.drain(0).unwrap();
        assert_eq!(event.string_value, "form 'orders/Panel' is already open");
    }

    #[test]
    fn failed_reopen_keeps_working_form() {
        let opens = AtomicUsize::new(0);
        let catalog = CatalogResolver::new().with_form("orders", "Panel", move || {
            if opens.fetch_add(1, Ordering::SeqCst) == 0 {
                panel()
            } else {
                broken()
            }
        });
        let bridge = Bridge::new(
            BridgeConfig::new(),
            Arc::new(catalog),
            Arc::new(ScriptedPrompt::default()),
        );
        bridge.open("orders", "Panel");
        let first = bridge.controller("orders", "Panel").unwrap();
        bridge.open("orders", "Panel");

        assert_eq!(
            bridge.drain(0).unwrap().string_value,
            "element with name 'Btn1' is already registered in this form"
        );
        assert!(!first.is_disposed());
        let current = bridge.controller("orders", "Panel").unwrap();
        assert!(Arc::ptr_eq(&first, &current));
        assert_eq!(bridge.open_forms(), vec![FormKey::new("orders", "Panel")]);
    }

    #[test]
    fn racing_opens_under_reject_keep_one_form() {
        let bridge = Arc::new(bridge(ReopenPolicy::Reject));
        let barrier = Arc::new(Barrier::new(6));
        let handles: Vec<_> = (0..6)
            .map(|_| {
                let bridge = Arc::clone(&bridge);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    bridge.open("orders", "Panel");
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        let winner = bridge.controller("orders", "Panel").unwrap();
        assert!(!winner.is_disposed());
        assert_eq!(bridge.drain_count(), 5);
        for event in bridge.event_log().snapshot() {
            assert_eq!(event.string_value, "form 'orders/Panel' is already open");
        }
    }

    #[test]
    fn nul_in_module_path_does_not_panic() {
        let catalog = CatalogResolver::new().with_form("or\0ders", "Panel", panel);
        let bridge = Bridge::new(
            BridgeConfig::new(),
            Arc::new(catalog),
            Arc::new(ScriptedPrompt::default()),
        );
        bridge.open("or\0ders", "Panel");
        assert_eq!(bridge.drain_count(), 0);
        assert!(bridge.controller("or\0ders", "Panel").is_some());
    }

    #[test]
    fn unknown_command_code_is_reported() {
        let bridge = bridge(ReopenPolicy::Replace);
        bridge.command_raw("Btn1", 42, 0, 0.0, "");
        assert_eq!(bridge.drain(0).unwrap().string_value, "unknown event kind code 42");
    }
}
