//! Typed mutations decoded from host commands.
//!
//! A raw command is five loosely typed fields. [`Mutation::decode`] turns it
//! into one typed value once, before any form is touched, and
//! [`Mutation::supports`] decides per widget kind whether it applies.

use chrono::NaiveDateTime;

use super::Command;
use crate::error::{BridgeError, Result};
use crate::event::EventKind;
use crate::prompt::PromptSpec;
use crate::time;
use crate::widget::{CheckState, NodeId, WidgetKind, WidgetTree};

/// A change applied directly to widget state on the UI thread.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyWrite {
    Text(String),
    CheckState(CheckState),
    Checked(bool),
    /// `None` clears the selection.
    SelectedIndex(Option<usize>),
    NumericValue(f64),
    NumericFormat { decimals: u32, increment: f64 },
    NumericMaximum(f64),
    NumericMinimum(f64),
    Date(NaiveDateTime),
    Visible(bool),
    AddItem(String),
}

impl PropertyWrite {
    /// Apply to `node`. Selection and numeric value writes are no-ops when
    /// the value is unchanged, so they never echo back as events.
    pub fn apply(&self, tree: &mut WidgetTree, node: NodeId) -> Result<()> {
        match self {
            PropertyWrite::Text(text) => tree.set_text(node, text).map(drop),
            PropertyWrite::CheckState(state) => tree.set_check_state(node, *state).map(drop),
            PropertyWrite::Checked(checked) => tree.set_checked(node, *checked).map(drop),
            PropertyWrite::SelectedIndex(index) => tree.select_index(node, *index).map(drop),
            PropertyWrite::NumericValue(value) => tree.set_numeric_value(node, *value).map(drop),
            PropertyWrite::NumericFormat {
                decimals,
                increment,
            } => tree.set_numeric_format(node, *decimals, *increment),
            PropertyWrite::NumericMaximum(max) => tree.set_numeric_maximum(node, *max),
            PropertyWrite::NumericMinimum(min) => tree.set_numeric_minimum(node, *min),
            PropertyWrite::Date(value) => tree.set_date(node, *value).map(drop),
            PropertyWrite::Visible(visible) => tree.set_visible(node, *visible).map(drop),
            PropertyWrite::AddItem(item) => tree.add_item(node, item),
        }
    }

    fn supports(&self, kind: WidgetKind) -> bool {
        use WidgetKind as K;
        match self {
            PropertyWrite::Text(_) => kind.has_text(),
            PropertyWrite::CheckState(_) => kind == K::CheckBox,
            PropertyWrite::Checked(_) => matches!(kind, K::RadioButton | K::CheckBox),
            PropertyWrite::SelectedIndex(_) | PropertyWrite::AddItem(_) => kind == K::ComboBox,
            PropertyWrite::NumericValue(_)
            | PropertyWrite::NumericFormat { .. }
            | PropertyWrite::NumericMaximum(_)
            | PropertyWrite::NumericMinimum(_) => kind == K::NumericSpinner,
            PropertyWrite::Date(_) => kind == K::DatePicker,
            PropertyWrite::Visible(_) => true,
        }
    }
}

/// Everything a host command can ask for.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    Write(PropertyWrite),
    /// Enable or disable; synthesizes an enable-change event on change.
    SetEnabled(bool),
    /// Show a modal prompt; with `lock` the target is disabled meanwhile.
    Prompt { spec: PromptSpec, lock: bool },
}

impl Mutation {
    /// Decode the payload fields of `command` according to its kind.
    pub fn decode(command: &Command) -> Result<Self> {
        let Command {
            kind,
            long_value: l,
            double_value: d,
            string_value: s,
            ..
        } = command;
        let write = match kind {
            EventKind::Exception
            | EventKind::Click
            | EventKind::ScrollChange
            | EventKind::TabChange => return Err(BridgeError::UnsupportedCommand(*kind)),
            EventKind::MessageBox => {
                return Ok(Mutation::Prompt {
                    spec: PromptSpec::parse(s),
                    lock: *l != 0,
                })
            }
            EventKind::EnableChange => return Ok(Mutation::SetEnabled(*l != 0)),
            EventKind::TextChange => PropertyWrite::Text(s.clone()),
            EventKind::CheckBoxChange => PropertyWrite::CheckState(
                CheckState::from_code(*l)
                    .ok_or_else(|| BridgeError::internal(format!("invalid check state {l}")))?,
            ),
            EventKind::RadioChange => PropertyWrite::Checked(*l != 0),
            EventKind::ComboChange => PropertyWrite::SelectedIndex(usize::try_from(*l).ok()),
            EventKind::NumericChange => PropertyWrite::NumericValue(*d),
            EventKind::NumericFormatChange => PropertyWrite::NumericFormat {
                decimals: u32::try_from((*l).clamp(0, 15)).unwrap_or(0),
                increment: *d,
            },
            EventKind::NumericMaxChange => PropertyWrite::NumericMaximum(*d),
            EventKind::NumericMinChange => PropertyWrite::NumericMinimum(*d),
            EventKind::DateChange => PropertyWrite::Date(time::from_epoch_seconds(*l)),
            EventKind::VisibilityChange => PropertyWrite::Visible(*l != 0),
            EventKind::AddItem => PropertyWrite::AddItem(s.clone()),
        };
        Ok(Mutation::Write(write))
    }

    /// Whether a widget of `kind` accepts this mutation.
    pub fn supports(&self, kind: WidgetKind) -> bool {
        match self {
            Mutation::Write(write) => write.supports(kind),
            Mutation::SetEnabled(_) | Mutation::Prompt { .. } => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::prompt::PromptIcon;
    use crate::widget::{NodeData, Widget};

    fn decode(kind: EventKind, l: i64, d: f64, s: &str) -> Result<Mutation> {
        Mutation::decode(&Command::new("X", kind).with_long(l).with_double(d).with_string(s))
    }

    #[test]
    fn non_command_kinds_are_rejected() {
        for kind in [
            EventKind::Exception,
            EventKind::Click,
            EventKind::ScrollChange,
            EventKind::TabChange,
        ] {
            assert_eq!(decode(kind, 0, 0.0, ""), Err(BridgeError::UnsupportedCommand(kind)));
        }
    }

    #[test]
    fn payload_decoding() {
        assert_eq!(
            decode(EventKind::TextChange, 0, 0.0, "hello"),
            Ok(Mutation::Write(PropertyWrite::Text("hello".into())))
        );
        assert_eq!(
            decode(EventKind::ComboChange, -1, 0.0, ""),
            Ok(Mutation::Write(PropertyWrite::SelectedIndex(None)))
        );
        assert_eq!(
            decode(EventKind::ComboChange, 2, 0.0, ""),
            Ok(Mutation::Write(PropertyWrite::SelectedIndex(Some(2))))
        );
        assert_eq!(
            decode(EventKind::NumericFormatChange, 2, 0.01, ""),
            Ok(Mutation::Write(PropertyWrite::NumericFormat {
                decimals: 2,
                increment: 0.01
            }))
        );
        assert_eq!(
            decode(EventKind::EnableChange, 0, 0.0, ""),
            Ok(Mutation::SetEnabled(false))
        );
    }

    #[test]
    fn date_is_decoded_from_epoch_seconds() {
        let expected = NaiveDate::from_ymd_opt(2001, 9, 9)
            .unwrap()
            .and_hms_opt(1, 46, 40)
            .unwrap();
        assert_eq!(
            decode(EventKind::DateChange, 1_000_000_000, 0.0, ""),
            Ok(Mutation::Write(PropertyWrite::Date(expected)))
        );
        assert_eq!(
            decode(EventKind::DateChange, -5, 0.0, ""),
            Ok(Mutation::Write(PropertyWrite::Date(time::epoch())))
        );
    }

    #[test]
    fn invalid_check_state_is_internal() {
        assert!(matches!(
            decode(EventKind::CheckBoxChange, 5, 0.0, ""),
            Err(BridgeError::Internal(_))
        ));
    }

    #[test]
    fn prompt_decoding() {
        let Ok(Mutation::Prompt { spec, lock }) =
            decode(EventKind::MessageBox, 1, 0.0, "error|Orders|Rejected")
        else {
            panic!("expected a prompt");
        };
        assert!(lock);
        assert_eq!(spec.icon, PromptIcon::Error);
    }

    #[test]
    fn support_matrix() {
        let text = Mutation::Write(PropertyWrite::Text(String::new()));
        assert!(text.supports(WidgetKind::Button));
        assert!(text.supports(WidgetKind::Form));
        assert!(!text.supports(WidgetKind::NumericSpinner));
        assert!(!text.supports(WidgetKind::ScrollBar));

        let checked = Mutation::Write(PropertyWrite::Checked(true));
        assert!(checked.supports(WidgetKind::CheckBox));
        assert!(checked.supports(WidgetKind::RadioButton));
        assert!(!checked.supports(WidgetKind::Button));

        let max = Mutation::Write(PropertyWrite::NumericMaximum(1.0));
        assert!(max.supports(WidgetKind::NumericSpinner));
        assert!(!max.supports(WidgetKind::TextField));

        assert!(Mutation::SetEnabled(true).supports(WidgetKind::Label));
        assert!(Mutation::Write(PropertyWrite::Visible(false)).supports(WidgetKind::TabStrip));
    }

    #[test]
    fn apply_writes_through() {
        let mut tree = WidgetTree::new();
        let root = tree.insert(NodeData::new("F", Widget::form()));
        let combo = tree.insert_child(root, NodeData::new("Symbol", Widget::combo_box()));
        PropertyWrite::AddItem("EURUSD".into()).apply(&mut tree, combo).unwrap();
        PropertyWrite::SelectedIndex(Some(0)).apply(&mut tree, combo).unwrap();
        assert_eq!(tree.get(combo).unwrap().label(), "EURUSD");
    }
}
