//! Raw widget notifications, as a toolkit would raise them.
//!
//! An [`Interaction`] is what happened on a node; an [`InteractionKind`] is
//! the subscription key listeners register under.

use super::node::NodeId;
use super::tree::WidgetTree;

/// Subscription key for [`Interaction`]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InteractionKind {
    Click,
    LostFocus,
    KeyDown,
    Scroll,
    CheckStateChanged,
    CheckedChanged,
    SelectionChanged,
    TextUpdate,
    ValueChanged,
    TabChanged,
    EnabledChanged,
    FormClosing,
}

/// Keys the adapter distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Escape,
    Tab,
    Char(char),
}

/// Sub-type of a scroll notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollType {
    SmallDecrement,
    SmallIncrement,
    LargeDecrement,
    LargeIncrement,
    ThumbPosition,
    ThumbTrack,
    First,
    Last,
    EndScroll,
}

impl ScrollType {
    /// Arrow-button steps; the only scroll sub-types worth reporting.
    pub fn is_small_step(self) -> bool {
        matches!(self, ScrollType::SmallDecrement | ScrollType::SmallIncrement)
    }
}

/// A single raw notification from a widget.
#[derive(Debug, Clone, PartialEq)]
pub enum Interaction {
    Click,
    LostFocus,
    KeyDown(Key),
    Scroll {
        kind: ScrollType,
        old: i32,
        new: i32,
    },
    CheckStateChanged,
    CheckedChanged,
    SelectionChanged,
    TextUpdate,
    ValueChanged,
    TabChanged,
    EnabledChanged,
    FormClosing,
}

impl Interaction {
    pub fn kind(&self) -> InteractionKind {
        match self {
            Interaction::Click => InteractionKind::Click,
            Interaction::LostFocus => InteractionKind::LostFocus,
            Interaction::KeyDown(_) => InteractionKind::KeyDown,
            Interaction::Scroll { .. } => InteractionKind::Scroll,
            Interaction::CheckStateChanged => InteractionKind::CheckStateChanged,
            Interaction::CheckedChanged => InteractionKind::CheckedChanged,
            Interaction::SelectionChanged => InteractionKind::SelectionChanged,
            Interaction::TextUpdate => InteractionKind::TextUpdate,
            Interaction::ValueChanged => InteractionKind::ValueChanged,
            Interaction::TabChanged => InteractionKind::TabChanged,
            Interaction::EnabledChanged => InteractionKind::EnabledChanged,
            Interaction::FormClosing => InteractionKind::FormClosing,
        }
    }
}

/// Callback invoked on the form's UI thread when a subscribed interaction
/// occurs. Receives the tree (read-only), the node and the interaction.
pub type Listener = Box<dyn Fn(&WidgetTree, NodeId, &Interaction) + Send>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_steps() {
        assert!(ScrollType::SmallIncrement.is_small_step());
        assert!(ScrollType::SmallDecrement.is_small_step());
        assert!(!ScrollType::ThumbTrack.is_small_step());
        assert!(!ScrollType::LargeIncrement.is_small_step());
    }

    #[test]
    fn kind_ignores_payload() {
        assert_eq!(
            Interaction::KeyDown(Key::Enter).kind(),
            Interaction::KeyDown(Key::Char('x')).kind()
        );
        let scroll = Interaction::Scroll {
            kind: ScrollType::First,
            old: 1,
            new: 0,
        };
        assert_eq!(scroll.kind(), InteractionKind::Scroll);
    }
}
