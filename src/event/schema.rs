//! Event schema: the closed set of event kinds and the event record.
//!
//! Kind codes are part of the host contract and must stay stable; the same
//! codes name commands travelling in the other direction.

use std::fmt;

use crate::controller::FormKey;
use crate::error::BridgeError;

// ---------------------------------------------------------------------------
// EventKind
// ---------------------------------------------------------------------------

/// What an [`Event`] (or a command) is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Exception,
    MessageBox,
    Click,
    TextChange,
    ScrollChange,
    TabChange,
    CheckBoxChange,
    EnableChange,
    RadioChange,
    ComboChange,
    NumericChange,
    NumericFormatChange,
    NumericMaxChange,
    NumericMinChange,
    DateChange,
    VisibilityChange,
    AddItem,
}

impl EventKind {
    /// Every kind, in code order.
    pub const ALL: [EventKind; 17] = [
        EventKind::Exception,
        EventKind::MessageBox,
        EventKind::Click,
        EventKind::TextChange,
        EventKind::ScrollChange,
        EventKind::TabChange,
        EventKind::CheckBoxChange,
        EventKind::EnableChange,
        EventKind::RadioChange,
        EventKind::ComboChange,
        EventKind::NumericChange,
        EventKind::NumericFormatChange,
        EventKind::NumericMaxChange,
        EventKind::NumericMinChange,
        EventKind::DateChange,
        EventKind::VisibilityChange,
        EventKind::AddItem,
    ];

    /// Integer code exchanged with the host.
    pub fn code(self) -> i32 {
        match self {
            EventKind::Exception => 0,
            EventKind::MessageBox => 1,
            EventKind::Click => 2,
            EventKind::TextChange => 3,
            EventKind::ScrollChange => 4,
            EventKind::TabChange => 5,
            EventKind::CheckBoxChange => 6,
            EventKind::EnableChange => 7,
            EventKind::RadioChange => 8,
            EventKind::ComboChange => 9,
            EventKind::NumericChange => 10,
            EventKind::NumericFormatChange => 11,
            EventKind::NumericMaxChange => 12,
            EventKind::NumericMinChange => 13,
            EventKind::DateChange => 14,
            EventKind::VisibilityChange => 15,
            EventKind::AddItem => 16,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::Exception => "exception",
            EventKind::MessageBox => "message-box",
            EventKind::Click => "click",
            EventKind::TextChange => "text-change",
            EventKind::ScrollChange => "scroll-change",
            EventKind::TabChange => "tab-change",
            EventKind::CheckBoxChange => "checkbox-change",
            EventKind::EnableChange => "enable-change",
            EventKind::RadioChange => "radio-change",
            EventKind::ComboChange => "combo-change",
            EventKind::NumericChange => "numeric-change",
            EventKind::NumericFormatChange => "numeric-format-change",
            EventKind::NumericMaxChange => "numeric-max-change",
            EventKind::NumericMinChange => "numeric-min-change",
            EventKind::DateChange => "date-change",
            EventKind::VisibilityChange => "visibility-change",
            EventKind::AddItem => "add-item",
        }
    }
}

impl TryFrom<i32> for EventKind {
    type Error = BridgeError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        usize::try_from(code)
            .ok()
            .and_then(|i| EventKind::ALL.get(i).copied())
            .ok_or(BridgeError::UnknownEventKind(code))
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Event
// ---------------------------------------------------------------------------

/// One entry of the event log. Only the fields relevant to `kind` carry
/// data; the rest stay zero or empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    /// The form the event came from, when known.
    pub form: Option<FormKey>,
    pub control_name: String,
    pub kind: EventKind,
    pub long_value: i64,
    pub double_value: f64,
    pub string_value: String,
}

impl Event {
    /// An event with every payload field zeroed.
    pub fn new(kind: EventKind, control_name: impl Into<String>) -> Self {
        Self {
            form: None,
            control_name: control_name.into(),
            kind,
            long_value: 0,
            double_value: 0.0,
            string_value: String::new(),
        }
    }

    /// A failure report carrying a human-readable message.
    pub fn exception(form: Option<FormKey>, message: impl Into<String>) -> Self {
        Self {
            form,
            ..Self::new(EventKind::Exception, "")
        }
        .with_string(message)
    }

    pub fn with_form(mut self, form: &FormKey) -> Self {
        self.form = Some(form.clone());
        self
    }

    pub fn with_long(mut self, value: i64) -> Self {
        self.long_value = value;
        self
    }

    pub fn with_double(mut self, value: f64) -> Self {
        self.double_value = value;
        self
    }

    pub fn with_string(mut self, value: impl Into<String>) -> Self {
        self.string_value = value.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_dense_and_ordered() {
        for (i, kind) in EventKind::ALL.iter().enumerate() {
            assert_eq!(kind.code(), i as i32);
            assert_eq!(EventKind::try_from(i as i32).unwrap(), *kind);
        }
    }

    #[test]
    fn host_codes_pinned() {
        assert_eq!(EventKind::Exception.code(), 0);
        assert_eq!(EventKind::Click.code(), 2);
        assert_eq!(EventKind::TextChange.code(), 3);
        assert_eq!(EventKind::AddItem.code(), 16);
    }

    #[test]
    fn unknown_codes_rejected() {
        assert_eq!(
            EventKind::try_from(17),
            Err(BridgeError::UnknownEventKind(17))
        );
        assert_eq!(
            EventKind::try_from(-1),
            Err(BridgeError::UnknownEventKind(-1))
        );
    }

    #[test]
    fn new_event_is_zeroed() {
        let e = Event::new(EventKind::Click, "Btn1");
        assert_eq!(e.control_name, "Btn1");
        assert_eq!(e.long_value, 0);
        assert_eq!(e.double_value, 0.0);
        assert!(e.string_value.is_empty());
        assert!(e.form.is_none());
    }

    #[test]
    fn exception_carries_message_and_form() {
        let key = FormKey::new("orders.toml", "Panel");
        let e = Event::exception(Some(key.clone()), "boom");
        assert_eq!(e.kind, EventKind::Exception);
        assert_eq!(e.string_value, "boom");
        assert_eq!(e.form, Some(key));
        assert!(e.control_name.is_empty());
    }

    #[test]
    fn builders_fill_payload() {
        let key = FormKey::new("m", "f");
        let e = Event::new(EventKind::ScrollChange, "Scroll")
            .with_form(&key)
            .with_long(3)
            .with_double(4.0)
            .with_string("s");
        assert_eq!((e.long_value, e.double_value, e.string_value.as_str()), (3, 4.0, "s"));
        assert_eq!(e.form.as_ref(), Some(&key));
    }
}
