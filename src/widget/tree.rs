//! Widget tree: arena storage, traversal, subscriptions and property writes.

use std::fmt;

use chrono::NaiveDateTime;
use slotmap::{SecondaryMap, SlotMap};

use super::interaction::{Interaction, InteractionKind, Listener};
use super::kind::{CheckState, Spinner, Widget, WidgetKind};
use super::node::{NodeData, NodeId};
use crate::error::{BridgeError, Result};

/// Empty slice constant for returning when a node has no children.
const EMPTY_CHILDREN: &[NodeId] = &[];

/// A form's widget tree, backed by a slotmap arena.
///
/// All nodes live in a single `SlotMap`. Parent/child relationships are stored
/// in secondary maps so lookup is O(1). The tree also holds the listeners
/// subscribed to each node; [`emit`](Self::emit) runs them synchronously.
///
/// Property writes that a user could also make (selection, numeric value,
/// check state, date, active tab) raise the matching change notification
/// when the value actually changes. Writes only code can make (text,
/// visibility, enabled flag, spinner limits, item list) raise none.
pub struct WidgetTree {
    nodes: SlotMap<NodeId, NodeData>,
    children: SecondaryMap<NodeId, Vec<NodeId>>,
    parent: SecondaryMap<NodeId, NodeId>,
    listeners: SecondaryMap<NodeId, Vec<(InteractionKind, Listener)>>,
    root: Option<NodeId>,
}

impl WidgetTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            children: SecondaryMap::new(),
            parent: SecondaryMap::new(),
            listeners: SecondaryMap::new(),
            root: None,
        }
    }

    /// Insert a root-level node (no parent).
    ///
    /// If no root has been set yet, this node becomes the root.
    pub fn insert(&mut self, data: NodeData) -> NodeId {
        let id = self.nodes.insert(data);
        self.children.insert(id, Vec::new());
        if self.root.is_none() {
            self.root = Some(id);
        }
        id
    }

    /// Insert a node as a child of `parent`.
    ///
    /// # Panics
    ///
    /// Panics (debug) if `parent` does not exist in the tree.
    pub fn insert_child(&mut self, parent: NodeId, data: NodeData) -> NodeId {
        debug_assert!(
            self.nodes.contains_key(parent),
            "parent node does not exist"
        );
        let id = self.nodes.insert(data);
        self.children.insert(id, Vec::new());
        self.parent.insert(id, parent);
        if let Some(siblings) = self.children.get_mut(parent) {
            siblings.push(id);
        }
        id
    }

    /// Get the parent of a node, if it has one.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.parent.get(id).copied()
    }

    /// Get the children of a node. Returns an empty slice if the node has no children
    /// or does not exist.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.children
            .get(id)
            .map(Vec::as_slice)
            .unwrap_or(EMPTY_CHILDREN)
    }

    /// Immutable access to a node's data.
    pub fn get(&self, id: NodeId) -> Option<&NodeData> {
        self.nodes.get(id)
    }

    /// Mutable access to a node's data. Writes made this way raise no
    /// notifications.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut NodeData> {
        self.nodes.get_mut(id)
    }

    /// The root node (the form itself), if set.
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Number of nodes in the tree.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree is empty.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether the tree contains a node with the given id.
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Pre-order depth-first traversal starting from `start`.
    pub fn walk_depth_first(&self, start: NodeId) -> Vec<NodeId> {
        self.walk(start, |_| true)
    }

    /// Pre-order depth-first traversal that treats numeric spinners as
    /// leaves: their internal parts are never visited.
    pub fn walk_registrable(&self, start: NodeId) -> Vec<NodeId> {
        self.walk(start, |data| data.kind() != WidgetKind::NumericSpinner)
    }

    fn walk(&self, start: NodeId, descend: impl Fn(&NodeData) -> bool) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut stack = vec![start];
        while let Some(current) = stack.pop() {
            let Some(data) = self.nodes.get(current) else {
                continue;
            };
            result.push(current);
            if !descend(data) {
                continue;
            }
            // Push children in reverse so the first child is visited first.
            for &child in self.children(current).iter().rev() {
                stack.push(child);
            }
        }
        result
    }

    /// First node (depth-first from the root) carrying `name`.
    pub fn find_by_name(&self, name: &str) -> Option<NodeId> {
        let root = self.root?;
        self.walk_depth_first(root)
            .into_iter()
            .find(|&id| self.nodes[id].name == name)
    }

    // -----------------------------------------------------------------------
    // Subscriptions
    // -----------------------------------------------------------------------

    /// Register `listener` for `kind` interactions on `id`.
    pub fn subscribe(&mut self, id: NodeId, kind: InteractionKind, listener: Listener) {
        if !self.nodes.contains_key(id) {
            return;
        }
        if let Some(list) = self.listeners.get_mut(id) {
            list.push((kind, listener));
        } else {
            self.listeners.insert(id, vec![(kind, listener)]);
        }
    }

    /// Number of listeners attached to `id`.
    pub fn listener_count(&self, id: NodeId) -> usize {
        self.listeners.get(id).map_or(0, Vec::len)
    }

    /// Deliver `interaction` to every listener subscribed to its kind on
    /// `id`, in subscription order.
    pub fn emit(&self, id: NodeId, interaction: &Interaction) {
        let Some(list) = self.listeners.get(id) else {
            return;
        };
        let kind = interaction.kind();
        for (_, listener) in list.iter().filter(|(k, _)| *k == kind) {
            listener(self, id, interaction);
        }
    }

    // -----------------------------------------------------------------------
    // Property writes
    // -----------------------------------------------------------------------

    fn node_mut(&mut self, id: NodeId) -> Result<&mut NodeData> {
        self.nodes
            .get_mut(id)
            .ok_or_else(|| BridgeError::internal("widget no longer exists"))
    }

    fn mismatch(data: &NodeData, what: &str) -> BridgeError {
        BridgeError::internal(format!(
            "widget '{}' of kind '{}' has no {what}",
            data.name,
            data.kind()
        ))
    }

    /// Replace the text property. A dropdown's selection follows the text:
    /// the matching item becomes selected, or none when nothing matches.
    pub fn set_text(&mut self, id: NodeId, text: &str) -> Result<bool> {
        let data = self.node_mut(id)?;
        if let Widget::ComboBox {
            text: slot,
            items,
            selected,
        } = &mut data.widget
        {
            if slot.as_str() == text {
                return Ok(false);
            }
            *slot = text.to_owned();
            *selected = items.iter().position(|item| item == text);
            return Ok(true);
        }
        let Some(slot) = data.widget.text_mut() else {
            return Err(Self::mismatch(data, "text"));
        };
        if slot.as_str() == text {
            return Ok(false);
        }
        *slot = text.to_owned();
        Ok(true)
    }

    /// Set a check box's tri-state value.
    pub fn set_check_state(&mut self, id: NodeId, value: CheckState) -> Result<bool> {
        let data = self.node_mut(id)?;
        let Widget::CheckBox { state, .. } = &mut data.widget else {
            return Err(Self::mismatch(data, "check state"));
        };
        if *state == value {
            return Ok(false);
        }
        *state = value;
        self.emit(id, &Interaction::CheckStateChanged);
        Ok(true)
    }

    /// Set the checked flag of a radio button or check box.
    ///
    /// Checking a radio button unchecks the radio buttons sharing its parent,
    /// each raising its own notification.
    pub fn set_checked(&mut self, id: NodeId, value: bool) -> Result<bool> {
        let data = self.node_mut(id)?;
        if data.kind() == WidgetKind::CheckBox {
            let state = if value {
                CheckState::Checked
            } else {
                CheckState::Unchecked
            };
            return self.set_check_state(id, state);
        }
        let Widget::RadioButton { checked, .. } = &mut data.widget else {
            return Err(Self::mismatch(data, "checked flag"));
        };
        if *checked == value {
            return Ok(false);
        }
        *checked = value;
        self.emit(id, &Interaction::CheckedChanged);
        if value {
            self.uncheck_sibling_radios(id);
        }
        Ok(true)
    }

    fn uncheck_sibling_radios(&mut self, id: NodeId) {
        let Some(parent) = self.parent(id) else {
            return;
        };
        let siblings: Vec<NodeId> = self
            .children(parent)
            .iter()
            .copied()
            .filter(|&s| s != id)
            .collect();
        for sibling in siblings {
            if let Some(Widget::RadioButton { checked, .. }) =
                self.nodes.get_mut(sibling).map(|d| &mut d.widget)
            {
                if *checked {
                    *checked = false;
                    self.emit(sibling, &Interaction::CheckedChanged);
                }
            }
        }
    }

    /// Select a dropdown item (`None` clears the selection). The dropdown's
    /// text follows the selected item.
    pub fn select_index(&mut self, id: NodeId, index: Option<usize>) -> Result<bool> {
        let data = self.node_mut(id)?;
        let name = data.name.clone();
        let Widget::ComboBox {
            text,
            items,
            selected,
        } = &mut data.widget
        else {
            return Err(Self::mismatch(data, "item selection"));
        };
        if *selected == index {
            return Ok(false);
        }
        if let Some(i) = index {
            let Some(item) = items.get(i) else {
                return Err(BridgeError::internal(format!(
                    "index {i} is out of range for '{name}' ({} items)",
                    items.len()
                )));
            };
            *text = item.clone();
        }
        *selected = index;
        self.emit(id, &Interaction::SelectionChanged);
        Ok(true)
    }

    /// Append an item to a dropdown's list.
    pub fn add_item(&mut self, id: NodeId, item: &str) -> Result<()> {
        let data = self.node_mut(id)?;
        let Widget::ComboBox { items, .. } = &mut data.widget else {
            return Err(Self::mismatch(data, "item list"));
        };
        items.push(item.to_owned());
        Ok(())
    }

    /// Set a spinner's value, clamped to its range.
    pub fn set_numeric_value(&mut self, id: NodeId, value: f64) -> Result<bool> {
        let data = self.node_mut(id)?;
        let Widget::NumericSpinner(spinner) = &mut data.widget else {
            return Err(Self::mismatch(data, "numeric value"));
        };
        let value = spinner.clamp(value);
        if spinner.value == value {
            return Ok(false);
        }
        spinner.value = value;
        self.emit(id, &Interaction::ValueChanged);
        Ok(true)
    }

    /// Set a spinner's displayed decimal places and arrow step.
    pub fn set_numeric_format(&mut self, id: NodeId, decimals: u32, increment: f64) -> Result<()> {
        let data = self.node_mut(id)?;
        let Widget::NumericSpinner(spinner) = &mut data.widget else {
            return Err(Self::mismatch(data, "numeric format"));
        };
        spinner.decimals = decimals;
        spinner.increment = increment;
        Ok(())
    }

    /// Set a spinner's upper bound. Lowering it below the current value
    /// pulls the value down (and raises a value notification).
    pub fn set_numeric_maximum(&mut self, id: NodeId, maximum: f64) -> Result<()> {
        self.update_range(id, |spinner| {
            spinner.maximum = maximum;
            if spinner.minimum > maximum {
                spinner.minimum = maximum;
            }
        })
    }

    /// Set a spinner's lower bound. Raising it above the current value
    /// pulls the value up (and raises a value notification).
    pub fn set_numeric_minimum(&mut self, id: NodeId, minimum: f64) -> Result<()> {
        self.update_range(id, |spinner| {
            spinner.minimum = minimum;
            if spinner.maximum < minimum {
                spinner.maximum = minimum;
            }
        })
    }

    fn update_range(
        &mut self,
        id: NodeId,
        change: impl FnOnce(&mut Spinner),
    ) -> Result<()> {
        let data = self.node_mut(id)?;
        let Widget::NumericSpinner(spinner) = &mut data.widget else {
            return Err(Self::mismatch(data, "numeric range"));
        };
        change(spinner);
        let clamped = spinner.clamp(spinner.value);
        let moved = clamped != spinner.value;
        spinner.value = clamped;
        if moved {
            self.emit(id, &Interaction::ValueChanged);
        }
        Ok(())
    }

    /// Set a date picker's value.
    pub fn set_date(&mut self, id: NodeId, value: NaiveDateTime) -> Result<bool> {
        let data = self.node_mut(id)?;
        let Widget::DatePicker { value: slot } = &mut data.widget else {
            return Err(Self::mismatch(data, "date value"));
        };
        if *slot == value {
            return Ok(false);
        }
        *slot = value;
        self.emit(id, &Interaction::ValueChanged);
        Ok(true)
    }

    /// Activate a tab by index.
    pub fn select_tab(&mut self, id: NodeId, index: usize) -> Result<bool> {
        let data = self.node_mut(id)?;
        let name = data.name.clone();
        let Widget::TabStrip { tabs, active } = &mut data.widget else {
            return Err(Self::mismatch(data, "tabs"));
        };
        if index >= tabs.len() {
            return Err(BridgeError::internal(format!(
                "tab {index} is out of range for '{name}' ({} tabs)",
                tabs.len()
            )));
        }
        if *active == index {
            return Ok(false);
        }
        *active = index;
        self.emit(id, &Interaction::TabChanged);
        Ok(true)
    }

    /// Move a scroll bar's thumb, clamped to its range. Returns the
    /// `(old, new)` positions.
    pub fn set_scroll_value(&mut self, id: NodeId, value: i32) -> Result<(i32, i32)> {
        let data = self.node_mut(id)?;
        let Widget::ScrollBar {
            value: slot,
            minimum,
            maximum,
        } = &mut data.widget
        else {
            return Err(Self::mismatch(data, "scroll position"));
        };
        let old = *slot;
        *slot = value.clamp(*minimum, *maximum);
        Ok((old, *slot))
    }

    /// Show or hide a widget.
    pub fn set_visible(&mut self, id: NodeId, visible: bool) -> Result<bool> {
        let data = self.node_mut(id)?;
        if data.visible == visible {
            return Ok(false);
        }
        data.visible = visible;
        Ok(true)
    }

    /// Enable or disable a widget.
    pub fn set_enabled(&mut self, id: NodeId, enabled: bool) -> Result<bool> {
        let data = self.node_mut(id)?;
        if data.enabled == enabled {
            return Ok(false);
        }
        data.enabled = enabled;
        Ok(true)
    }
}

impl Default for WidgetTree {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for WidgetTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WidgetTree")
            .field("nodes", &self.nodes.len())
            .field("root", &self.root)
            .field(
                "listeners",
                &self.listeners.values().map(Vec::len).sum::<usize>(),
            )
            .finish()
    }
}
