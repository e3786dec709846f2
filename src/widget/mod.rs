//! Widget adapter: a headless, slotmap-backed widget tree with typed widget
//! state and per-node interaction subscriptions.

pub mod interaction;
pub mod kind;
pub mod node;
pub mod tree;

pub use interaction::{Interaction, InteractionKind, Key, Listener, ScrollType};
pub use kind::{CheckState, Spinner, Widget, WidgetKind};
pub use node::{NodeData, NodeId};
pub use tree::WidgetTree;
