//! FormPilot: simulated user interaction with an open form.
//!
//! Each method does what the windowing side would do for a real user: it
//! changes widget state and raises the matching interaction, on the form's
//! own UI thread, then returns once that has finished. Events produced by
//! the translators are therefore in the log when the call returns.

use std::sync::Arc;

use chrono::NaiveDateTime;

use crate::bridge::Bridge;
use crate::controller::Controller;
use crate::error::{BridgeError, Result};
use crate::widget::{Interaction, Key, NodeData, NodeId, ScrollType, Widget, WidgetTree};

// ---------------------------------------------------------------------------
// FormPilot
// ---------------------------------------------------------------------------

/// Drives the controls of one open form by name.
///
/// # Examples
///
/// ```ignore
/// let pilot = FormPilot::attach(&bridge, "orders.toml", "Panel")?;
/// pilot.click("Btn1")?;
/// assert_eq!(bridge.drain_count(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct FormPilot {
    controller: Arc<Controller>,
}

impl FormPilot {
    pub fn new(controller: Arc<Controller>) -> Self {
        Self { controller }
    }

    /// Pilot the open form `(module_path, form_name)` of `bridge`.
    pub fn attach(bridge: &Bridge, module_path: &str, form_name: &str) -> Result<Self> {
        bridge
            .controller(module_path, form_name)
            .map(Self::new)
            .ok_or_else(|| {
                BridgeError::internal(format!("form '{module_path}/{form_name}' is not open"))
            })
    }

    pub fn controller(&self) -> &Arc<Controller> {
        &self.controller
    }

    fn on_node<R, F>(&self, name: &str, action: F) -> Result<R>
    where
        R: Send + 'static,
        F: FnOnce(&mut WidgetTree, NodeId) -> Result<R> + Send + 'static,
    {
        let node = self.controller.lookup(name)?.node;
        self.controller.invoke(move |tree| action(tree, node))?
    }

    // ── Pointer ──────────────────────────────────────────────────────

    /// Activate a button (or any control).
    pub fn click(&self, name: &str) -> Result<()> {
        self.on_node(name, |tree, node| {
            tree.emit(node, &Interaction::Click);
            Ok(())
        })
    }

    /// Move a scroll bar to `position` with a scroll of type `kind`.
    pub fn scroll(&self, name: &str, kind: ScrollType, position: i32) -> Result<()> {
        self.on_node(name, move |tree, node| {
            let (old, new) = tree.set_scroll_value(node, position)?;
            tree.emit(node, &Interaction::Scroll { kind, old, new });
            Ok(())
        })
    }

    /// Click a check box, cycling it to its next state.
    pub fn toggle_check(&self, name: &str) -> Result<()> {
        self.on_node(name, |tree, node| {
            let next = match tree.get(node).map(|data| &data.widget) {
                Some(Widget::CheckBox { state, .. }) => state.toggled(),
                _ => return Err(BridgeError::internal("not a check box")),
            };
            tree.set_check_state(node, next).map(drop)
        })
    }

    /// Click a radio button.
    pub fn check_radio(&self, name: &str) -> Result<()> {
        self.on_node(name, |tree, node| tree.set_checked(node, true).map(drop))
    }

    /// Pick a dropdown item.
    pub fn select(&self, name: &str, index: usize) -> Result<()> {
        self.on_node(name, move |tree, node| {
            tree.select_index(node, Some(index)).map(drop)
        })
    }

    /// Switch to another tab.
    pub fn select_tab(&self, name: &str, index: usize) -> Result<()> {
        self.on_node(name, move |tree, node| tree.select_tab(node, index).map(drop))
    }

    // ── Keyboard ─────────────────────────────────────────────────────

    /// Replace the control's text the way typing would. A dropdown reports
    /// the edit at once; a text field waits for Enter or loss of focus.
    pub fn type_text(&self, name: &str, text: &str) -> Result<()> {
        let text = text.to_owned();
        self.on_node(name, move |tree, node| {
            if tree.set_text(node, &text)? && is_combo(tree.get(node)) {
                tree.emit(node, &Interaction::TextUpdate);
            }
            Ok(())
        })
    }

    /// Press a key while the control has focus.
    pub fn press_key(&self, name: &str, key: Key) -> Result<()> {
        self.on_node(name, move |tree, node| {
            tree.emit(node, &Interaction::KeyDown(key));
            Ok(())
        })
    }

    /// Move focus away from the control.
    pub fn blur(&self, name: &str) -> Result<()> {
        self.on_node(name, |tree, node| {
            tree.emit(node, &Interaction::LostFocus);
            Ok(())
        })
    }

    // ── Values ───────────────────────────────────────────────────────

    /// Spin a numeric spinner to `value`.
    pub fn set_value(&self, name: &str, value: f64) -> Result<()> {
        self.on_node(name, move |tree, node| {
            tree.set_numeric_value(node, value).map(drop)
        })
    }

    /// Pick a date in a date picker.
    pub fn pick_date(&self, name: &str, value: NaiveDateTime) -> Result<()> {
        self.on_node(name, move |tree, node| tree.set_date(node, value).map(drop))
    }

    // ── Environment ──────────────────────────────────────────────────

    /// Flip the enabled flag from outside the bridge (e.g. a parent being
    /// disabled), raising the notification the windowing side would.
    pub fn environment_enable(&self, name: &str, enabled: bool) -> Result<()> {
        self.on_node(name, move |tree, node| {
            if tree.set_enabled(node, enabled)? {
                tree.emit(node, &Interaction::EnabledChanged);
            }
            Ok(())
        })
    }

    /// Close the form's window, as the user clicking its close box would.
    pub fn close_window(&self) -> Result<()> {
        self.controller.invoke(|tree| {
            if let Some(root) = tree.root() {
                tree.emit(root, &Interaction::FormClosing);
            }
        })
    }

    // ── Query ────────────────────────────────────────────────────────

    /// Snapshot of a control's current state.
    pub fn read(&self, name: &str) -> Result<NodeData> {
        self.on_node(name, |tree, node| {
            tree.get(node)
                .cloned()
                .ok_or_else(|| BridgeError::internal("widget no longer exists"))
        })
    }
}

fn is_combo(data: Option<&NodeData>) -> bool {
    matches!(data.map(|d| &d.widget), Some(Widget::ComboBox { .. }))
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::controller::FormKey;
    use crate::event::{EventKind, EventLog};

    fn pilot() -> (FormPilot, EventLog) {
        let mut tree = WidgetTree::new();
        let root = tree.insert(NodeData::new("Panel", Widget::form()));
        tree.insert_child(root, NodeData::new("Btn1", Widget::button()));
        tree.insert_child(root, NodeData::new("Field1", Widget::text_field()));
        tree.insert_child(
            root,
            NodeData::new("Symbol", Widget::combo_box()).with_items("EURUSD|GBPUSD"),
        );
        tree.insert_child(root, NodeData::new("Hedge", Widget::check_box()));
        tree.insert_child(root, NodeData::new("Scroll", Widget::scroll_bar()));
        let log = EventLog::new();
        let controller =
            Controller::open(FormKey::new("m", "Panel"), tree, &log, "pilot-ui").unwrap();
        (FormPilot::new(controller), log)
    }

    fn kinds(log: &EventLog) -> Vec<EventKind> {
        log.snapshot().iter().map(|e| e.kind).collect()
    }

    #[test]
    fn click_produces_click() {
        let (pilot, log) = pilot();
        pilot.click("Btn1").unwrap();
        assert_eq!(kinds(&log), vec![EventKind::Click]);
    }

    #[test]
    fn typing_commits_only_on_enter() {
        let (pilot, log) = pilot();
        pilot.type_text("Field1", "1.5").unwrap();
        assert!(log.is_empty());
        pilot.press_key("Field1", Key::Enter).unwrap();
        assert_eq!(log.get(0).unwrap().string_value, "1.5");
    }

    #[test]
    fn typing_into_combo_reports_immediately() {
        let (pilot, log) = pilot();
        pilot.type_text("Symbol", "USDJPY").unwrap();
        let event = log.get(0).unwrap();
        assert_eq!((event.kind, event.long_value), (EventKind::ComboChange, -1));
    }

    #[test]
    fn toggle_and_scroll() {
        let (pilot, log) = pilot();
        pilot.toggle_check("Hedge").unwrap();
        pilot.scroll("Scroll", ScrollType::ThumbTrack, 40).unwrap();
        pilot.scroll("Scroll", ScrollType::SmallIncrement, 41).unwrap();
        assert_eq!(kinds(&log), vec![EventKind::CheckBoxChange, EventKind::ScrollChange]);
        let scroll = log.get(1).unwrap();
        assert_eq!((scroll.long_value, scroll.double_value), (40, 41.0));
    }

    #[test]
    fn read_reflects_state() {
        let (pilot, _) = pilot();
        pilot.select("Symbol", 1).unwrap();
        assert_eq!(pilot.read("Symbol").unwrap().label(), "GBPUSD");
    }

    #[test]
    fn unknown_name_is_not_found() {
        let (pilot, _) = pilot();
        assert_eq!(
            pilot.click("Nope"),
            Err(BridgeError::NotFound("Nope".into()))
        );
    }

    #[test]
    fn close_window_disposes() {
        let (pilot, log) = pilot();
        pilot.close_window().unwrap();
        assert!(pilot.controller().is_disposed());
        assert!(log.is_empty());
    }
}
