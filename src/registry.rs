//! Control registry: caller-visible names to live widget handles.
//!
//! Built once per form by a depth-first walk below the form root. Numeric
//! spinners are walked as leaves, nodes with an empty name are skipped, and
//! every registered node is wired to the event translator. The set of
//! entries is frozen after the build; it only ever empties as a whole when
//! the form goes away.

use std::collections::HashMap;

use crate::controller::FormKey;
use crate::error::{BridgeError, Result};
use crate::event::{subscribe_node, EventLog};
use crate::widget::{NodeId, WidgetKind, WidgetTree};

/// One registered widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryEntry {
    pub name: String,
    pub node: NodeId,
    pub kind: WidgetKind,
}

/// Per-form name lookup table.
#[derive(Debug, Default)]
pub struct ControlRegistry {
    entries: HashMap<String, RegistryEntry>,
    /// Names in discovery order.
    order: Vec<String>,
}

impl ControlRegistry {
    /// Walk `tree` below its root, registering and wiring every named node.
    ///
    /// Fails with [`BridgeError::DuplicateName`] on the first name seen twice;
    /// the tree is then unusable (it may carry partial wiring) and should be
    /// dropped.
    pub fn build(tree: &mut WidgetTree, log: &EventLog, form: &FormKey) -> Result<Self> {
        let root = tree
            .root()
            .ok_or_else(|| BridgeError::resolution(format!("form '{form}' has no widgets")))?;
        let mut registry = Self::default();
        for node in tree.walk_registrable(root) {
            if node == root {
                continue;
            }
            let Some(data) = tree.get(node) else {
                continue;
            };
            if data.name.is_empty() {
                continue;
            }
            let entry = RegistryEntry {
                name: data.name.clone(),
                node,
                kind: data.kind(),
            };
            if registry.entries.contains_key(&entry.name) {
                return Err(BridgeError::DuplicateName(entry.name));
            }
            subscribe_node(tree, node, log, form);
            registry.order.push(entry.name.clone());
            registry.entries.insert(entry.name.clone(), entry);
        }
        Ok(registry)
    }

    /// Find a widget by name.
    pub fn lookup(&self, name: &str) -> Result<RegistryEntry> {
        self.entries
            .get(name)
            .cloned()
            .ok_or_else(|| BridgeError::NotFound(name.to_owned()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Registered names, in discovery order.
    pub fn names(&self) -> &[String] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every entry (form closed).
    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }
}
