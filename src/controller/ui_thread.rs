//! The dedicated thread that owns one form's widget tree.
//!
//! Every read or write of a form's widgets runs on its [`UiThread`]. Other
//! threads hand it closures through an unbounded task queue; [`invoke`]
//! blocks the caller on a oneshot until the closure has run, [`post`] does
//! not wait. There is no timeout: a wedged UI thread blocks its callers.
//!
//! [`invoke`]: UiThread::invoke
//! [`post`]: UiThread::post

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle, ThreadId};

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

use crate::error::{BridgeError, Result};
use crate::widget::WidgetTree;

/// A unit of work run against the widget tree.
pub type Task = Box<dyn FnOnce(&mut WidgetTree) + Send>;

enum Message {
    Run(Task),
    Shutdown,
}

/// Handle to a running UI thread.
pub struct UiThread {
    name: String,
    sender: mpsc::UnboundedSender<Message>,
    thread_id: ThreadId,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl UiThread {
    /// Start a thread named `name` that takes ownership of `tree`.
    ///
    /// Returns once the thread has entered its task loop. The loop ends on
    /// [`shutdown`](Self::shutdown), when every handle is dropped, or after
    /// any task that leaves `closed` set.
    ///
    /// Interior NULs are dropped from `name`; the OS cannot carry them.
    pub fn spawn(name: impl Into<String>, tree: WidgetTree, closed: Arc<AtomicBool>) -> Result<Self> {
        let name = name.into().replace('\0', "");
        let (sender, mut receiver) = mpsc::unbounded_channel::<Message>();
        let (ready_tx, ready_rx) = oneshot::channel::<()>();

        let thread_name = name.clone();
        let handle = thread::Builder::new()
            .name(name.clone())
            .spawn(move || {
                let mut tree = tree;
                debug!(thread = %thread_name, "ui thread started");
                let _ = ready_tx.send(());
                while let Some(message) = receiver.blocking_recv() {
                    match message {
                        Message::Run(task) => task(&mut tree),
                        Message::Shutdown => break,
                    }
                    if closed.load(Ordering::Acquire) {
                        break;
                    }
                }
                debug!(thread = %thread_name, "ui thread stopped");
            })
            .map_err(|e| BridgeError::internal(format!("failed to spawn thread '{name}': {e}")))?;

        let thread_id = handle.thread().id();
        ready_rx
            .blocking_recv()
            .map_err(|_| BridgeError::Disconnected(name.clone()))?;

        Ok(Self {
            name,
            sender,
            thread_id,
            handle: Mutex::new(Some(handle)),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the caller is running on this UI thread.
    pub fn is_current(&self) -> bool {
        thread::current().id() == self.thread_id
    }

    /// Run `task` on the UI thread and wait for its result.
    ///
    /// A panic inside `task` is caught and reported as
    /// [`BridgeError::Internal`]; the thread keeps serving. Calling this from
    /// the UI thread itself is an error (it would wait on itself).
    pub fn invoke<R, F>(&self, task: F) -> Result<R>
    where
        R: Send + 'static,
        F: FnOnce(&mut WidgetTree) -> R + Send + 'static,
    {
        if self.is_current() {
            return Err(BridgeError::internal(format!(
                "blocking call into '{}' from its own thread",
                self.name
            )));
        }
        let (done_tx, done_rx) = oneshot::channel();
        self.send(Box::new(move |tree: &mut WidgetTree| {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| task(tree)));
            let _ = done_tx.send(outcome);
        }))?;
        match done_rx.blocking_recv() {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(payload)) => Err(BridgeError::internal(format!(
                "task on '{}' panicked: {}",
                self.name,
                panic_message(payload.as_ref())
            ))),
            Err(_) => Err(BridgeError::Disconnected(self.name.clone())),
        }
    }

    /// Queue `task` without waiting for it.
    pub fn post<F>(&self, task: F) -> Result<()>
    where
        F: FnOnce(&mut WidgetTree) + Send + 'static,
    {
        self.send(Box::new(task))
    }

    fn send(&self, task: Task) -> Result<()> {
        self.sender
            .send(Message::Run(task))
            .map_err(|_| BridgeError::Disconnected(self.name.clone()))
    }

    /// Stop the task loop and wait for the thread to finish. Tasks already
    /// queued ahead of the stop request still run. Idempotent; never joins
    /// from the UI thread itself.
    pub fn shutdown(&self) -> Result<()> {
        let _ = self.sender.send(Message::Shutdown);
        let handle = self
            .handle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        let Some(handle) = handle else {
            return Ok(());
        };
        if self.is_current() {
            return Ok(());
        }
        handle
            .join()
            .map_err(|_| BridgeError::internal(format!("thread '{}' panicked", self.name)))
    }

    /// Whether the task loop has ended.
    pub fn is_finished(&self) -> bool {
        self.sender.is_closed()
    }
}

impl Drop for UiThread {
    fn drop(&mut self) {
        if let Err(err) = self.shutdown() {
            warn!(thread = %self.name, error = %err, "ui thread did not stop cleanly");
        }
    }
}

impl std::fmt::Debug for UiThread {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UiThread")
            .field("name", &self.name)
            .field("finished", &self.is_finished())
            .finish()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widget::{NodeData, Widget};

    fn spawn(name: &str) -> (UiThread, Arc<AtomicBool>) {
        let mut tree = WidgetTree::new();
        let root = tree.insert(NodeData::new("Panel", Widget::form()));
        tree.insert_child(root, NodeData::new("Field1", Widget::text_field()));
        let closed = Arc::new(AtomicBool::new(false));
        let ui = UiThread::spawn(name, tree, Arc::clone(&closed)).unwrap();
        (ui, closed)
    }

    #[test]
    fn invoke_runs_on_named_thread() {
        let (ui, _) = spawn("formbridge-ui-test");
        let name = ui
            .invoke(|_| thread::current().name().map(str::to_owned))
            .unwrap();
        assert_eq!(name.as_deref(), Some("formbridge-ui-test"));
        assert!(!ui.is_current());
    }

    #[test]
    fn invoke_sees_tree_state() {
        let (ui, _) = spawn("ui");
        ui.invoke(|tree| {
            let id = tree.find_by_name("Field1").unwrap();
            tree.set_text(id, "hello").unwrap();
        })
        .unwrap();
        let text = ui
            .invoke(|tree| tree.get(tree.find_by_name("Field1").unwrap()).unwrap().label().to_owned())
            .unwrap();
        assert_eq!(text, "hello");
    }

    #[test]
    fn post_runs_before_later_invoke() {
        let (ui, _) = spawn("ui");
        ui.post(|tree| {
            let id = tree.find_by_name("Field1").unwrap();
            tree.set_text(id, "posted").unwrap();
        })
        .unwrap();
        let text = ui
            .invoke(|tree| tree.get(tree.find_by_name("Field1").unwrap()).unwrap().label().to_owned())
            .unwrap();
        assert_eq!(text, "posted");
    }

    #[test]
    fn panicking_task_is_internal_and_thread_survives() {
        let (ui, _) = spawn("ui");
        let err = ui.invoke(|_| -> () { panic!("widget blew up") }).unwrap_err();
        assert!(matches!(err, BridgeError::Internal(ref m) if m.contains("widget blew up")));
        assert_eq!(ui.invoke(|tree| tree.len()).unwrap(), 2);
    }

    #[test]
    fn invoke_after_shutdown_is_disconnected() {
        let (ui, _) = spawn("ui");
        ui.shutdown().unwrap();
        ui.shutdown().unwrap();
        assert_eq!(
            ui.invoke(|tree| tree.len()),
            Err(BridgeError::Disconnected("ui".into()))
        );
    }

    #[test]
    fn nul_bytes_are_dropped_from_the_name() {
        let (ui, _) = spawn("formbridge-ui-or\0ders/Panel");
        assert_eq!(ui.name(), "formbridge-ui-orders/Panel");
        let name = ui
            .invoke(|_| thread::current().name().map(str::to_owned))
            .unwrap();
        assert_eq!(name.as_deref(), Some("formbridge-ui-orders/Panel"));
    }

    #[test]
    fn closed_flag_ends_loop_after_current_task() {
        let (ui, closed) = spawn("ui");
        let flag = Arc::clone(&closed);
        ui.invoke(move |_| flag.store(true, Ordering::Release)).unwrap();
        assert!(ui.invoke(|tree| tree.len()).is_err());
    }

    #[test]
    fn reentrant_invoke_is_rejected() {
        let (ui, _) = spawn("ui");
        let ui = Arc::new(ui);
        let inner = Arc::clone(&ui);
        let nested = ui.invoke(move |_| inner.invoke(|tree| tree.len())).unwrap();
        assert!(matches!(nested, Err(BridgeError::Internal(_))));
    }
}
