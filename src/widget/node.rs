//! Node types: NodeId, NodeData.

use slotmap::new_key_type;

use super::kind::{Widget, WidgetKind};

new_key_type! {
    /// Handle to a live widget inside a [`WidgetTree`](super::WidgetTree). Copy, lightweight (u64).
    pub struct NodeId;
}

/// Data associated with a single widget node.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeData {
    /// Caller-visible name. Empty names are never registered.
    pub name: String,
    /// Kind-specific state.
    pub widget: Widget,
    /// Whether the widget accepts input.
    pub enabled: bool,
    /// Whether the widget is shown.
    pub visible: bool,
}

impl NodeData {
    /// Create an enabled, visible node.
    pub fn new(name: impl Into<String>, widget: Widget) -> Self {
        Self {
            name: name.into(),
            widget,
            enabled: true,
            visible: true,
        }
    }

    pub fn kind(&self) -> WidgetKind {
        self.widget.kind()
    }

    /// Set the text property (builder). Ignored for kinds without text.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        if let Some(slot) = self.widget.text_mut() {
            *slot = text.into();
        }
        self
    }

    /// Set dropdown items from a `|`-separated list (builder).
    pub fn with_items(mut self, items: &str) -> Self {
        if let Widget::ComboBox { items: slot, .. } = &mut self.widget {
            *slot = split_list(items);
        }
        self
    }

    /// Set tab names from a `|`-separated list (builder).
    pub fn with_tabs(mut self, tabs: &str) -> Self {
        if let Widget::TabStrip { tabs: slot, .. } = &mut self.widget {
            *slot = split_list(tabs);
        }
        self
    }

    /// Set whether the node is enabled (builder).
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Set whether the node is visible (builder).
    pub fn visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    /// Caption reported in event string fields.
    pub fn label(&self) -> &str {
        self.widget.label_text()
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split('|')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_defaults() {
        let data = NodeData::new("Btn1", Widget::button());
        assert_eq!(data.name, "Btn1");
        assert_eq!(data.kind(), WidgetKind::Button);
        assert!(data.enabled);
        assert!(data.visible);
        assert_eq!(data.label(), "");
    }

    #[test]
    fn builder_with_text() {
        let data = NodeData::new("Btn1", Widget::button()).with_text("Buy");
        assert_eq!(data.label(), "Buy");
    }

    #[test]
    fn with_text_ignored_for_textless_kind() {
        let data = NodeData::new("Scroll", Widget::scroll_bar()).with_text("x");
        assert_eq!(data.widget, Widget::scroll_bar());
    }

    #[test]
    fn builder_with_items() {
        let data = NodeData::new("Combo", Widget::combo_box()).with_items("EURUSD| GBPUSD |");
        match data.widget {
            Widget::ComboBox { items, selected, .. } => {
                assert_eq!(items, vec!["EURUSD", "GBPUSD"]);
                assert_eq!(selected, None);
            }
            other => panic!("unexpected widget {other:?}"),
        }
    }

    #[test]
    fn builder_with_tabs() {
        let data = NodeData::new("Tabs", Widget::tab_strip()).with_tabs("Trade|History");
        assert!(matches!(data.widget, Widget::TabStrip { ref tabs, active: 0 } if tabs.len() == 2));
    }

    #[test]
    fn builder_enabled_visible() {
        let data = NodeData::new("X", Widget::label()).enabled(false).visible(false);
        assert!(!data.enabled);
        assert!(!data.visible);
    }

    #[test]
    fn node_id_is_copy() {
        fn assert_copy<T: Copy>() {}
        assert_copy::<NodeId>();
    }
}
