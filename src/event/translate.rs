//! Event translation: raw widget interactions to normalized events.
//!
//! Each widget kind has a fixed table of [`Binding`]s: which interaction to
//! listen for and how to turn it into an [`Event`]. Every node also gets the
//! enable-change binding. A translation either produces exactly one event or
//! deliberately drops the interaction (e.g. scroll drags).

use super::log::EventLog;
use super::schema::{Event, EventKind};
use crate::controller::FormKey;
use crate::time;
use crate::widget::{
    Interaction, InteractionKind, Key, Listener, NodeData, NodeId, Widget, WidgetKind, WidgetTree,
};

/// Pure translation from a node's current state and an interaction.
pub type Translate = fn(&NodeData, &Interaction) -> Option<Event>;

/// One row of a kind's listener table.
pub type Binding = (InteractionKind, Translate);

const SCROLL_BAR: &[Binding] = &[(InteractionKind::Scroll, scroll_step)];
const BUTTON: &[Binding] = &[(InteractionKind::Click, click)];
const TEXT_FIELD: &[Binding] = &[
    (InteractionKind::LostFocus, text_committed),
    (InteractionKind::KeyDown, enter_pressed),
];
const CHECK_BOX: &[Binding] = &[(InteractionKind::CheckStateChanged, check_state)];
const RADIO_BUTTON: &[Binding] = &[(InteractionKind::CheckedChanged, radio_checked)];
const COMBO_BOX: &[Binding] = &[
    (InteractionKind::SelectionChanged, combo_selection),
    (InteractionKind::TextUpdate, combo_selection),
];
const NUMERIC_SPINNER: &[Binding] = &[(InteractionKind::ValueChanged, numeric_value)];
const DATE_PICKER: &[Binding] = &[(InteractionKind::ValueChanged, date_value)];
const TAB_STRIP: &[Binding] = &[(InteractionKind::TabChanged, active_tab)];
const ANY: Binding = (InteractionKind::EnabledChanged, enabled_flag);

/// The kind-specific bindings (not including the enable-change binding).
pub fn bindings(kind: WidgetKind) -> &'static [Binding] {
    match kind {
        WidgetKind::ScrollBar => SCROLL_BAR,
        WidgetKind::Button => BUTTON,
        WidgetKind::TextField => TEXT_FIELD,
        WidgetKind::CheckBox => CHECK_BOX,
        WidgetKind::RadioButton => RADIO_BUTTON,
        WidgetKind::ComboBox => COMBO_BOX,
        WidgetKind::NumericSpinner => NUMERIC_SPINNER,
        WidgetKind::DatePicker => DATE_PICKER,
        WidgetKind::TabStrip => TAB_STRIP,
        WidgetKind::Form | WidgetKind::Panel | WidgetKind::Label => &[],
    }
}

/// Wire every binding for `node` so its translations land in `log`, tagged
/// with `form`.
pub fn subscribe_node(tree: &mut WidgetTree, node: NodeId, log: &EventLog, form: &FormKey) {
    let Some(kind) = tree.get(node).map(NodeData::kind) else {
        return;
    };
    for &(interaction, translate) in bindings(kind).iter().chain(std::iter::once(&ANY)) {
        tree.subscribe(node, interaction, listener(log, form, translate));
    }
}

fn listener(log: &EventLog, form: &FormKey, translate: Translate) -> Listener {
    let log = log.clone();
    let form = form.clone();
    Box::new(
        move |tree: &WidgetTree, node: NodeId, interaction: &Interaction| {
            let Some(data) = tree.get(node) else {
                return;
            };
            if let Some(event) = translate(data, interaction) {
                log.push(event.with_form(&form));
            }
        },
    )
}

// ---------------------------------------------------------------------------
// Translations
// ---------------------------------------------------------------------------

fn scroll_step(data: &NodeData, interaction: &Interaction) -> Option<Event> {
    match *interaction {
        Interaction::Scroll { kind, old, new } if kind.is_small_step() => Some(
            Event::new(EventKind::ScrollChange, &data.name)
                .with_long(i64::from(old))
                .with_double(f64::from(new)),
        ),
        _ => None,
    }
}

fn click(data: &NodeData, _: &Interaction) -> Option<Event> {
    Some(Event::new(EventKind::Click, &data.name))
}

fn text_committed(data: &NodeData, _: &Interaction) -> Option<Event> {
    Some(Event::new(EventKind::TextChange, &data.name).with_string(data.label()))
}

fn enter_pressed(data: &NodeData, interaction: &Interaction) -> Option<Event> {
    match interaction {
        Interaction::KeyDown(Key::Enter) => text_committed(data, interaction),
        _ => None,
    }
}

fn check_state(data: &NodeData, _: &Interaction) -> Option<Event> {
    let Widget::CheckBox { text, state } = &data.widget else {
        return None;
    };
    Some(
        Event::new(EventKind::CheckBoxChange, &data.name)
            .with_string(text.as_str())
            .with_long(state.code()),
    )
}

fn radio_checked(data: &NodeData, _: &Interaction) -> Option<Event> {
    let Widget::RadioButton { text, checked } = &data.widget else {
        return None;
    };
    Some(
        Event::new(EventKind::RadioChange, &data.name)
            .with_string(text.as_str())
            .with_long(i64::from(*checked)),
    )
}

fn combo_selection(data: &NodeData, _: &Interaction) -> Option<Event> {
    let Widget::ComboBox { text, selected, .. } = &data.widget else {
        return None;
    };
    let index = selected.map_or(-1, |i| i64::try_from(i).unwrap_or(i64::MAX));
    Some(
        Event::new(EventKind::ComboChange, &data.name)
            .with_string(text.as_str())
            .with_long(index),
    )
}

fn numeric_value(data: &NodeData, _: &Interaction) -> Option<Event> {
    let Widget::NumericSpinner(spinner) = &data.widget else {
        return None;
    };
    Some(Event::new(EventKind::NumericChange, &data.name).with_double(spinner.value))
}

fn date_value(data: &NodeData, _: &Interaction) -> Option<Event> {
    let Widget::DatePicker { value } = &data.widget else {
        return None;
    };
    Some(Event::new(EventKind::DateChange, &data.name).with_long(time::to_epoch_seconds(*value)))
}

fn active_tab(data: &NodeData, _: &Interaction) -> Option<Event> {
    let Widget::TabStrip { tabs, active } = &data.widget else {
        return None;
    };
    Some(
        Event::new(EventKind::TabChange, &data.name)
            .with_long(i64::try_from(*active).unwrap_or(i64::MAX))
            .with_string(tabs.get(*active).cloned().unwrap_or_default()),
    )
}

fn enabled_flag(data: &NodeData, _: &Interaction) -> Option<Event> {
    Some(enable_change(data))
}

/// The enable-change event describing `data`'s current enabled flag. Also
/// used when the flag is flipped programmatically, which raises no
/// interaction of its own.
pub fn enable_change(data: &NodeData) -> Event {
    Event::new(EventKind::EnableChange, &data.name)
        .with_string(data.label())
        .with_long(i64::from(data.enabled))
}
