//! Form identity.

use std::fmt;

/// Identifies one form: the module it is resolved from and its name inside
/// that module.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FormKey {
    pub module_path: String,
    pub form_name: String,
}

impl FormKey {
    pub fn new(module_path: impl Into<String>, form_name: impl Into<String>) -> Self {
        Self {
            module_path: module_path.into(),
            form_name: form_name.into(),
        }
    }
}

impl fmt::Display for FormKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.module_path, self.form_name)
    }
}
