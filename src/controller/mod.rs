//! Controller lifecycle: one UI thread and one control registry per open form.
//!
//! A [`Controller`] goes `Opening -> Open -> Disposed`. It becomes disposed
//! either when the host closes it ([`Controller::dispose`]) or when the
//! windowing side reports the form closing; the latter runs on the UI thread
//! and only flips state, leaving the directory entry for lazy reaping.

pub mod directory;
pub mod key;
pub mod ui_thread;

use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, info};

pub use directory::ControllerDirectory;
pub use key::FormKey;
pub use ui_thread::UiThread;

use crate::error::{BridgeError, Result};
use crate::event::{enable_change, EventLog};
use crate::registry::{ControlRegistry, RegistryEntry};
use crate::widget::{Interaction, InteractionKind, NodeId, WidgetTree};

// ---------------------------------------------------------------------------
// ControllerState
// ---------------------------------------------------------------------------

/// Lifecycle state of a [`Controller`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ControllerState {
    Opening = 0,
    Open = 1,
    /// Terminal; the form's widgets must not be touched again.
    Disposed = 2,
}

impl ControllerState {
    fn from_u8(raw: u8) -> Self {
        match raw {
            0 => ControllerState::Opening,
            1 => ControllerState::Open,
            _ => ControllerState::Disposed,
        }
    }
}

/// State shared between a controller and the form-closing listener on its
/// UI thread.
#[derive(Debug, Clone)]
struct Lifecycle {
    state: Arc<AtomicU8>,
    /// Set together with `Disposed`; read by the UI thread loop.
    closed: Arc<AtomicBool>,
    registry: Arc<Mutex<ControlRegistry>>,
}

impl Lifecycle {
    fn state(&self) -> ControllerState {
        ControllerState::from_u8(self.state.load(Ordering::Acquire))
    }

    fn set_open(&self) {
        let _ = self.state.compare_exchange(
            ControllerState::Opening as u8,
            ControllerState::Open as u8,
            Ordering::AcqRel,
            Ordering::Acquire,
        );
    }

    /// Returns `false` if already disposed.
    fn dispose(&self) -> bool {
        let previous = self
            .state
            .swap(ControllerState::Disposed as u8, Ordering::AcqRel);
        self.closed.store(true, Ordering::Release);
        self.registry().clear();
        previous != ControllerState::Disposed as u8
    }

    fn registry(&self) -> MutexGuard<'_, ControlRegistry> {
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

/// The runtime side of one open form.
#[derive(Debug)]
pub struct Controller {
    key: FormKey,
    lifecycle: Lifecycle,
    ui: UiThread,
    log: EventLog,
}

impl Controller {
    /// Build the registry for `tree`, wire the form-closing listener on its
    /// root, and hand the tree to a fresh UI thread named `thread_name`.
    ///
    /// Returns after the UI thread is running. A duplicate control name
    /// fails here, before any thread is started.
    pub fn open(
        key: FormKey,
        mut tree: WidgetTree,
        log: &EventLog,
        thread_name: &str,
    ) -> Result<Arc<Self>> {
        let lifecycle = Lifecycle {
            state: Arc::new(AtomicU8::new(ControllerState::Opening as u8)),
            closed: Arc::new(AtomicBool::new(false)),
            registry: Arc::new(Mutex::new(ControlRegistry::default())),
        };
        debug!(form = %key, state = ?lifecycle.state(), "building control registry");

        let registry = ControlRegistry::build(&mut tree, log, &key)?;
        let root = tree
            .root()
            .ok_or_else(|| BridgeError::internal(format!("form '{key}' lost its root")))?;
        let controls = registry.len();
        *lifecycle.registry() = registry;

        let on_closing = lifecycle.clone();
        let closing_key = key.clone();
        tree.subscribe(
            root,
            InteractionKind::FormClosing,
            Box::new(move |_: &WidgetTree, _: NodeId, _: &Interaction| {
                if on_closing.dispose() {
                    debug!(form = %closing_key, "form closing, controller disposed");
                }
            }),
        );

        let ui = UiThread::spawn(thread_name, tree, Arc::clone(&lifecycle.closed))?;
        lifecycle.set_open();
        info!(form = %key, controls, thread = thread_name, "form opened");

        Ok(Arc::new(Self {
            key,
            lifecycle,
            ui,
            log: log.clone(),
        }))
    }

    pub fn key(&self) -> &FormKey {
        &self.key
    }

    pub fn state(&self) -> ControllerState {
        self.lifecycle.state()
    }

    pub fn is_disposed(&self) -> bool {
        self.state() == ControllerState::Disposed
    }

    /// Find a registered control. Always `NotFound` once disposed.
    pub fn lookup(&self, name: &str) -> Result<RegistryEntry> {
        self.lifecycle.registry().lookup(name)
    }

    /// Registered control names in discovery order.
    pub fn control_names(&self) -> Vec<String> {
        self.lifecycle.registry().names().to_vec()
    }

    /// Run `task` on this form's UI thread and wait for it.
    pub fn invoke<R, F>(&self, task: F) -> Result<R>
    where
        R: Send + 'static,
        F: FnOnce(&mut WidgetTree) -> R + Send + 'static,
    {
        if self.is_disposed() {
            return Err(self.disconnected());
        }
        self.ui.invoke(task).map_err(|err| self.for_form(err))
    }

    /// Queue `task` on this form's UI thread without waiting.
    pub fn post<F>(&self, task: F) -> Result<()>
    where
        F: FnOnce(&mut WidgetTree) + Send + 'static,
    {
        self.ui.post(task).map_err(|err| self.for_form(err))
    }

    fn disconnected(&self) -> BridgeError {
        BridgeError::Disconnected(self.key.to_string())
    }

    /// The UI thread names itself in its errors; callers know the form.
    fn for_form(&self, err: BridgeError) -> BridgeError {
        match err {
            BridgeError::Disconnected(_) => self.disconnected(),
            other => other,
        }
    }

    /// Enable or disable a control. When the flag actually changes, an
    /// enable-change event is appended on the UI thread, since a
    /// programmatic flip raises no interaction of its own.
    pub fn set_enabled(&self, entry: &RegistryEntry, enabled: bool) -> Result<bool> {
        let node = entry.node;
        let log = self.log.clone();
        let key = self.key.clone();
        self.invoke(move |tree: &mut WidgetTree| -> Result<bool> {
            let changed = tree.set_enabled(node, enabled)?;
            if changed {
                if let Some(data) = tree.get(node) {
                    log.push(enable_change(data).with_form(&key));
                }
            }
            Ok(changed)
        })?
    }

    /// Dispose the form: clear its registry and stop its UI thread.
    /// Idempotent.
    pub fn dispose(&self) -> Result<()> {
        if self.lifecycle.dispose() {
            info!(form = %self.key, "form closed");
        }
        self.ui.shutdown()
    }
}
