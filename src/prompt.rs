//! Modal prompts shown on behalf of the host.
//!
//! The host asks for a prompt with a single pipe-delimited string:
//! `body`, `title|body` or `icon|title|body`. How the prompt is displayed
//! is up to the [`PromptHost`]; the bridge only needs the user's answer.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

// ---------------------------------------------------------------------------
// PromptIcon / PromptSpec
// ---------------------------------------------------------------------------

/// Icon hint for a prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PromptIcon {
    #[default]
    None,
    Info,
    Warning,
    Error,
    Question,
}

impl PromptIcon {
    /// Case-insensitive parse; anything unrecognized is `None`.
    pub fn parse(hint: &str) -> Self {
        match hint.trim().to_ascii_lowercase().as_str() {
            "info" | "information" => PromptIcon::Info,
            "warning" => PromptIcon::Warning,
            "error" => PromptIcon::Error,
            "question" => PromptIcon::Question,
            _ => PromptIcon::None,
        }
    }
}

/// What to show.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PromptSpec {
    pub icon: PromptIcon,
    pub title: String,
    pub body: String,
}

impl PromptSpec {
    /// Split `raw` on `|` into at most three fields. A body may itself
    /// contain `|` once the icon and title are given.
    pub fn parse(raw: &str) -> Self {
        let fields: Vec<&str> = raw.splitn(3, '|').collect();
        match fields.as_slice() {
            [icon, title, body] => Self {
                icon: PromptIcon::parse(icon),
                title: (*title).to_owned(),
                body: (*body).to_owned(),
            },
            [title, body] => Self {
                icon: PromptIcon::None,
                title: (*title).to_owned(),
                body: (*body).to_owned(),
            },
            _ => Self {
                body: raw.to_owned(),
                ..Self::default()
            },
        }
    }
}

// ---------------------------------------------------------------------------
// PromptResponse
// ---------------------------------------------------------------------------

/// The user's answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptResponse {
    Ok,
    Cancel,
    Yes,
    No,
}

impl PromptResponse {
    /// Code reported to the host in the message-box event.
    pub fn code(self) -> i64 {
        match self {
            PromptResponse::Ok => 1,
            PromptResponse::Cancel => 2,
            PromptResponse::Yes => 6,
            PromptResponse::No => 7,
        }
    }
}

impl fmt::Display for PromptResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PromptResponse::Ok => "ok",
            PromptResponse::Cancel => "cancel",
            PromptResponse::Yes => "yes",
            PromptResponse::No => "no",
        };
        f.write_str(s)
    }
}

// ---------------------------------------------------------------------------
// PromptHost
// ---------------------------------------------------------------------------

/// Displays a prompt and blocks until the user answers. Called on the UI
/// thread of the form that owns the target control.
pub trait PromptHost: Send + Sync {
    fn show(&self, spec: &PromptSpec) -> PromptResponse;
}

/// Headless host: answers every prompt with a fixed response and remembers
/// what it was asked to show.
#[derive(Debug, Clone)]
pub struct ScriptedPrompt {
    answer: PromptResponse,
    shown: Arc<Mutex<Vec<PromptSpec>>>,
}

impl ScriptedPrompt {
    pub fn answering(answer: PromptResponse) -> Self {
        Self {
            answer,
            shown: Arc::default(),
        }
    }

    /// Every prompt shown so far, oldest first.
    pub fn shown(&self) -> Vec<PromptSpec> {
        self.shown
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Default for ScriptedPrompt {
    fn default() -> Self {
        Self::answering(PromptResponse::Ok)
    }
}

impl PromptHost for ScriptedPrompt {
    fn show(&self, spec: &PromptSpec) -> PromptResponse {
        self.shown
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(spec.clone());
        self.answer
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn body_only() {
        let spec = PromptSpec::parse("Order sent");
        assert_eq!(spec.icon, PromptIcon::None);
        assert_eq!(spec.title, "");
        assert_eq!(spec.body, "Order sent");
    }

    #[test]
    fn title_and_body() {
        let spec = PromptSpec::parse("Orders|Order sent");
        assert_eq!((spec.title.as_str(), spec.body.as_str()), ("Orders", "Order sent"));
    }

    #[test]
    fn icon_title_body_keeps_extra_pipes_in_body() {
        let spec = PromptSpec::parse("WARNING|Orders|a|b");
        assert_eq!(spec.icon, PromptIcon::Warning);
        assert_eq!(spec.title, "Orders");
        assert_eq!(spec.body, "a|b");
    }

    #[test]
    fn unknown_icon_is_none() {
        assert_eq!(PromptIcon::parse("sparkles"), PromptIcon::None);
        assert_eq!(PromptIcon::parse(" Question "), PromptIcon::Question);
    }

    #[test]
    fn response_codes() {
        let codes: Vec<i64> = [
            PromptResponse::Ok,
            PromptResponse::Cancel,
            PromptResponse::Yes,
            PromptResponse::No,
        ]
        .iter()
        .map(|r| r.code())
        .collect();
        assert_eq!(codes, vec![1, 2, 6, 7]);
    }

    #[test]
    fn scripted_prompt_records() {
        let host = ScriptedPrompt::answering(PromptResponse::Yes);
        assert_eq!(host.show(&PromptSpec::parse("t|b")), PromptResponse::Yes);
        assert_eq!(host.shown().len(), 1);
        assert_eq!(host.shown()[0].title, "t");
    }
}
