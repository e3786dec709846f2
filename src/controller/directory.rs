//! Controller directory: open forms keyed by [`FormKey`].

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::debug;

use super::key::FormKey;
use super::Controller;

/// Process-wide (but injectable) map of open forms.
///
/// Entries disposed from the windowing side stay until the next
/// [`live`](Self::live), [`get`](Self::get) or [`remove`](Self::remove)
/// reaps them. Iteration order is key order.
#[derive(Debug, Clone, Default)]
pub struct ControllerDirectory {
    entries: Arc<Mutex<BTreeMap<FormKey, Arc<Controller>>>>,
}

impl ControllerDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, BTreeMap<FormKey, Arc<Controller>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register `controller`, returning whatever was registered under the
    /// same key before.
    pub fn insert(&self, controller: Arc<Controller>) -> Option<Arc<Controller>> {
        let key = controller.key().clone();
        self.entries().insert(key, controller)
    }

    /// Register `controller` only if no live controller holds its key.
    /// Checked and inserted under one lock. On refusal `controller` is
    /// handed back to the caller.
    pub fn insert_if_vacant(&self, controller: Arc<Controller>) -> Result<(), Arc<Controller>> {
        let key = controller.key().clone();
        let reaped = {
            let mut entries = self.entries();
            if entries.get(&key).is_some_and(|live| !live.is_disposed()) {
                return Err(controller);
            }
            entries.insert(key, controller)
        };
        if let Some(reaped) = reaped {
            debug!(form = %reaped.key(), "reaped disposed controller");
        }
        Ok(())
    }

    pub fn remove(&self, key: &FormKey) -> Option<Arc<Controller>> {
        self.entries().remove(key)
    }

    /// The live controller for `key`. A disposed entry is reaped and `None`
    /// returned.
    pub fn get(&self, key: &FormKey) -> Option<Arc<Controller>> {
        let reaped = {
            let mut entries = self.entries();
            match entries.get(key) {
                Some(controller) if !controller.is_disposed() => {
                    return Some(Arc::clone(controller));
                }
                Some(_) => entries.remove(key),
                None => None,
            }
        };
        if let Some(controller) = reaped {
            debug!(form = %controller.key(), "reaped disposed controller");
        }
        None
    }

    /// Every live controller in key order, reaping disposed ones.
    pub fn live(&self) -> Vec<Arc<Controller>> {
        let mut reaped = Vec::new();
        let live = {
            let mut entries = self.entries();
            entries.retain(|_, controller| {
                if controller.is_disposed() {
                    reaped.push(Arc::clone(controller));
                    false
                } else {
                    true
                }
            });
            entries.values().cloned().collect()
        };
        // Dropped outside the lock: the last handle joins its UI thread.
        for controller in reaped {
            debug!(form = %controller.key(), "reaped disposed controller");
        }
        live
    }

    /// Number of entries, disposed or not.
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    /// Remove and return every entry.
    pub fn drain_all(&self) -> Vec<Arc<Controller>> {
        std::mem::take(&mut *self.entries()).into_values().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventLog;
    use crate::widget::{Interaction, NodeData, Widget, WidgetTree};

    fn open(form: &str) -> Arc<Controller> {
        let mut tree = WidgetTree::new();
        let root = tree.insert(NodeData::new(form, Widget::form()));
        tree.insert_child(root, NodeData::new("Btn1", Widget::button()));
        Controller::open(FormKey::new("m", form), tree, &EventLog::new(), "ui").unwrap()
    }

    #[test]
    fn insert_get_remove() {
        let dir = ControllerDirectory::new();
        assert!(dir.insert(open("A")).is_none());
        assert!(dir.get(&FormKey::new("m", "A")).is_some());
        assert!(dir.get(&FormKey::new("m", "B")).is_none());
        assert!(dir.remove(&FormKey::new("m", "A")).is_some());
        assert!(dir.is_empty());
    }

    #[test]
    fn insert_returns_previous() {
        let dir = ControllerDirectory::new();
        dir.insert(open("A"));
        let previous = dir.insert(open("A"));
        assert!(previous.is_some());
        assert_eq!(dir.len(), 1);
    }

    #[test]
    fn insert_if_vacant_refuses_live_key() {
        let dir = ControllerDirectory::new();
        let first = open("A");
        assert!(dir.insert_if_vacant(Arc::clone(&first)).is_ok());
        let refused = dir.insert_if_vacant(open("A")).unwrap_err();
        assert!(!Arc::ptr_eq(&refused, &first));
        assert!(Arc::ptr_eq(&dir.get(first.key()).unwrap(), &first));

        first.dispose().unwrap();
        let second = open("A");
        assert!(dir.insert_if_vacant(Arc::clone(&second)).is_ok());
        assert!(Arc::ptr_eq(&dir.get(second.key()).unwrap(), &second));
        assert_eq!(dir.len(), 1);
    }

    #[test]
    fn live_is_key_ordered_and_reaps_disposed() {
        let dir = ControllerDirectory::new();
        dir.insert(open("B"));
        let a = open("A");
        dir.insert(Arc::clone(&a));
        dir.insert(open("C"));

        a.invoke(|tree| {
            let root = tree.root().unwrap();
            tree.emit(root, &Interaction::FormClosing);
        })
        .unwrap();
        assert_eq!(dir.len(), 3);

        let names: Vec<_> = dir
            .live()
            .iter()
            .map(|c| c.key().form_name.clone())
            .collect();
        assert_eq!(names, vec!["B", "C"]);
        assert_eq!(dir.len(), 2);
    }

    #[test]
    fn get_reaps_disposed_entry() {
        let dir = ControllerDirectory::new();
        let a = open("A");
        dir.insert(Arc::clone(&a));
        a.dispose().unwrap();
        assert!(dir.get(a.key()).is_none());
        assert!(dir.is_empty());
    }

    #[test]
    fn drain_all_empties() {
        let dir = ControllerDirectory::new();
        dir.insert(open("A"));
        dir.insert(open("B"));
        assert_eq!(dir.drain_all().len(), 2);
        assert!(dir.is_empty());
    }
}
