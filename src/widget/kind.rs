//! Widget kinds and their per-kind state.
//!
//! [`Widget`] is a closed sum type: each variant carries only the state that
//! kind of widget actually has. [`WidgetKind`] is its fieldless discriminant,
//! cheap to copy into registry entries and error messages.

use std::fmt;

use chrono::NaiveDateTime;
use serde::Deserialize;

use crate::time;

// ---------------------------------------------------------------------------
// WidgetKind
// ---------------------------------------------------------------------------

/// Discriminant of [`Widget`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WidgetKind {
    Form,
    Panel,
    Label,
    Button,
    TextField,
    CheckBox,
    RadioButton,
    ComboBox,
    NumericSpinner,
    DatePicker,
    TabStrip,
    ScrollBar,
}

impl WidgetKind {
    /// Kebab-case name, as used in manifests and messages.
    pub fn as_str(self) -> &'static str {
        match self {
            WidgetKind::Form => "form",
            WidgetKind::Panel => "panel",
            WidgetKind::Label => "label",
            WidgetKind::Button => "button",
            WidgetKind::TextField => "text-field",
            WidgetKind::CheckBox => "check-box",
            WidgetKind::RadioButton => "radio-button",
            WidgetKind::ComboBox => "combo-box",
            WidgetKind::NumericSpinner => "numeric-spinner",
            WidgetKind::DatePicker => "date-picker",
            WidgetKind::TabStrip => "tab-strip",
            WidgetKind::ScrollBar => "scroll-bar",
        }
    }

    /// Whether a widget of this kind exposes a text property.
    pub fn has_text(self) -> bool {
        matches!(
            self,
            WidgetKind::Form
                | WidgetKind::Panel
                | WidgetKind::Label
                | WidgetKind::Button
                | WidgetKind::TextField
                | WidgetKind::CheckBox
                | WidgetKind::RadioButton
                | WidgetKind::ComboBox
        )
    }
}

impl fmt::Display for WidgetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// CheckState
// ---------------------------------------------------------------------------

/// Tri-state value of a check box. The integer codes cross the host boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CheckState {
    #[default]
    Unchecked,
    Checked,
    Indeterminate,
}

impl CheckState {
    /// Decode a host-supplied code (0, 1 or 2).
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(CheckState::Unchecked),
            1 => Some(CheckState::Checked),
            2 => Some(CheckState::Indeterminate),
            _ => None,
        }
    }

    /// The code reported to the host.
    pub fn code(self) -> i64 {
        match self {
            CheckState::Unchecked => 0,
            CheckState::Checked => 1,
            CheckState::Indeterminate => 2,
        }
    }

    /// The state a user click moves to (two-state cycle; indeterminate clears).
    pub fn toggled(self) -> Self {
        match self {
            CheckState::Unchecked => CheckState::Checked,
            CheckState::Checked | CheckState::Indeterminate => CheckState::Unchecked,
        }
    }
}

// ---------------------------------------------------------------------------
// Spinner
// ---------------------------------------------------------------------------

/// State of a numeric spinner.
#[derive(Debug, Clone, PartialEq)]
pub struct Spinner {
    pub value: f64,
    pub minimum: f64,
    pub maximum: f64,
    /// Decimal places shown in the edit box.
    pub decimals: u32,
    /// Step applied by the up/down arrows.
    pub increment: f64,
}

impl Default for Spinner {
    fn default() -> Self {
        Self {
            value: 0.0,
            minimum: 0.0,
            maximum: 100.0,
            decimals: 0,
            increment: 1.0,
        }
    }
}

impl Spinner {
    /// Clamp `value` into `[minimum, maximum]`.
    pub fn clamp(&self, value: f64) -> f64 {
        value.max(self.minimum).min(self.maximum)
    }
}

// ---------------------------------------------------------------------------
// Widget
// ---------------------------------------------------------------------------

/// Kind-specific state of a live widget.
#[derive(Debug, Clone, PartialEq)]
pub enum Widget {
    Form { title: String },
    Panel { text: String },
    Label { text: String },
    Button { text: String },
    TextField { text: String },
    CheckBox { text: String, state: CheckState },
    RadioButton { text: String, checked: bool },
    ComboBox {
        text: String,
        items: Vec<String>,
        selected: Option<usize>,
    },
    NumericSpinner(Spinner),
    DatePicker { value: NaiveDateTime },
    TabStrip { tabs: Vec<String>, active: usize },
    ScrollBar { value: i32, minimum: i32, maximum: i32 },
}

impl Widget {
    pub fn form() -> Self {
        Widget::Form { title: String::new() }
    }

    pub fn panel() -> Self {
        Widget::Panel { text: String::new() }
    }

    pub fn label() -> Self {
        Widget::Label { text: String::new() }
    }

    pub fn button() -> Self {
        Widget::Button { text: String::new() }
    }

    pub fn text_field() -> Self {
        Widget::TextField { text: String::new() }
    }

    pub fn check_box() -> Self {
        Widget::CheckBox {
            text: String::new(),
            state: CheckState::Unchecked,
        }
    }

    pub fn radio_button() -> Self {
        Widget::RadioButton {
            text: String::new(),
            checked: false,
        }
    }

    pub fn combo_box() -> Self {
        Widget::ComboBox {
            text: String::new(),
            items: Vec::new(),
            selected: None,
        }
    }

    pub fn numeric_spinner() -> Self {
        Widget::NumericSpinner(Spinner::default())
    }

    pub fn date_picker() -> Self {
        Widget::DatePicker {
            value: time::epoch(),
        }
    }

    pub fn tab_strip() -> Self {
        Widget::TabStrip {
            tabs: Vec::new(),
            active: 0,
        }
    }

    pub fn scroll_bar() -> Self {
        Widget::ScrollBar {
            value: 0,
            minimum: 0,
            maximum: 100,
        }
    }

    /// A default-initialised widget of the given kind.
    pub fn of_kind(kind: WidgetKind) -> Self {
        match kind {
            WidgetKind::Form => Widget::form(),
            WidgetKind::Panel => Widget::panel(),
            WidgetKind::Label => Widget::label(),
            WidgetKind::Button => Widget::button(),
            WidgetKind::TextField => Widget::text_field(),
            WidgetKind::CheckBox => Widget::check_box(),
            WidgetKind::RadioButton => Widget::radio_button(),
            WidgetKind::ComboBox => Widget::combo_box(),
            WidgetKind::NumericSpinner => Widget::numeric_spinner(),
            WidgetKind::DatePicker => Widget::date_picker(),
            WidgetKind::TabStrip => Widget::tab_strip(),
            WidgetKind::ScrollBar => Widget::scroll_bar(),
        }
    }

    pub fn kind(&self) -> WidgetKind {
        match self {
            Widget::Form { .. } => WidgetKind::Form,
            Widget::Panel { .. } => WidgetKind::Panel,
            Widget::Label { .. } => WidgetKind::Label,
            Widget::Button { .. } => WidgetKind::Button,
            Widget::TextField { .. } => WidgetKind::TextField,
            Widget::CheckBox { .. } => WidgetKind::CheckBox,
            Widget::RadioButton { .. } => WidgetKind::RadioButton,
            Widget::ComboBox { .. } => WidgetKind::ComboBox,
            Widget::NumericSpinner(_) => WidgetKind::NumericSpinner,
            Widget::DatePicker { .. } => WidgetKind::DatePicker,
            Widget::TabStrip { .. } => WidgetKind::TabStrip,
            Widget::ScrollBar { .. } => WidgetKind::ScrollBar,
        }
    }

    /// The text property, for kinds that have one.
    pub fn text(&self) -> Option<&str> {
        match self {
            Widget::Form { title: text }
            | Widget::Panel { text }
            | Widget::Label { text }
            | Widget::Button { text }
            | Widget::TextField { text }
            | Widget::CheckBox { text, .. }
            | Widget::RadioButton { text, .. }
            | Widget::ComboBox { text, .. } => Some(text),
            Widget::NumericSpinner(_)
            | Widget::DatePicker { .. }
            | Widget::TabStrip { .. }
            | Widget::ScrollBar { .. } => None,
        }
    }

    pub fn text_mut(&mut self) -> Option<&mut String> {
        match self {
            Widget::Form { title: text }
            | Widget::Panel { text }
            | Widget::Label { text }
            | Widget::Button { text }
            | Widget::TextField { text }
            | Widget::CheckBox { text, .. }
            | Widget::RadioButton { text, .. }
            | Widget::ComboBox { text, .. } => Some(text),
            Widget::NumericSpinner(_)
            | Widget::DatePicker { .. }
            | Widget::TabStrip { .. }
            | Widget::ScrollBar { .. } => None,
        }
    }

    /// Caption reported in event string fields; empty for text-less kinds.
    pub fn label_text(&self) -> &str {
        self.text().unwrap_or("")
    }
}
