//! Bridge configuration.

use std::fmt;
use std::str::FromStr;

use tracing::warn;

// ---------------------------------------------------------------------------
// ReopenPolicy
// ---------------------------------------------------------------------------

/// What `open` does when the form is already open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReopenPolicy {
    /// Dispose the open instance, then open a fresh one.
    #[default]
    Replace,
    /// Keep the open instance and report an exception event.
    Reject,
}

impl FromStr for ReopenPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "replace" => Ok(ReopenPolicy::Replace),
            "reject" => Ok(ReopenPolicy::Reject),
            other => Err(format!("unknown reopen policy '{other}'")),
        }
    }
}

impl fmt::Display for ReopenPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ReopenPolicy::Replace => "replace",
            ReopenPolicy::Reject => "reject",
        })
    }
}

// ---------------------------------------------------------------------------
// BridgeConfig
// ---------------------------------------------------------------------------

pub const ENV_THREAD_PREFIX: &str = "FORMBRIDGE_THREAD_PREFIX";
pub const ENV_REOPEN: &str = "FORMBRIDGE_REOPEN";
pub const ENV_LOG: &str = "FORMBRIDGE_LOG";

/// Configuration for a [`Bridge`](crate::bridge::Bridge).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeConfig {
    /// UI threads are named `<prefix>-<module>/<form>`.
    pub thread_name_prefix: String,
    pub reopen_policy: ReopenPolicy,
    /// `EnvFilter` directives used by [`logging::init`](crate::logging::init).
    pub log_filter: String,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            thread_name_prefix: "formbridge-ui".into(),
            reopen_policy: ReopenPolicy::Replace,
            log_filter: "info".into(),
        }
    }
}

impl BridgeConfig {
    /// Create a new default config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overlaid with `FORMBRIDGE_*` environment variables. Invalid
    /// values are logged and ignored.
    pub fn from_env() -> Self {
        Self::default().overlay(|key| std::env::var(key).ok())
    }

    /// Overlay values looked up through `var` (the environment, in
    /// [`from_env`](Self::from_env)).
    pub fn overlay(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(prefix) = var(ENV_THREAD_PREFIX).filter(|v| !v.trim().is_empty()) {
            self.thread_name_prefix = prefix;
        }
        if let Some(raw) = var(ENV_REOPEN) {
            match raw.parse() {
                Ok(policy) => self.reopen_policy = policy,
                Err(err) => warn!(variable = ENV_REOPEN, %err, "ignoring invalid value"),
            }
        }
        if let Some(filter) = var(ENV_LOG).filter(|v| !v.trim().is_empty()) {
            self.log_filter = filter;
        }
        self
    }

    /// Set the UI thread name prefix (builder).
    pub fn with_thread_name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.thread_name_prefix = prefix.into();
        self
    }

    /// Set the reopen policy (builder).
    pub fn with_reopen_policy(mut self, policy: ReopenPolicy) -> Self {
        self.reopen_policy = policy;
        self
    }

    /// Set the log filter directives (builder).
    pub fn with_log_filter(mut self, filter: impl Into<String>) -> Self {
        self.log_filter = filter.into();
        self
    }

    /// Name for the UI thread of `form`.
    pub fn thread_name(&self, form: &crate::controller::FormKey) -> String {
        format!("{}-{form}", self.thread_name_prefix)
    }
}
