//! Form resolution: turning `(module, form)` into a widget tree.
//!
//! The bridge never cares how a form is found. [`CatalogResolver`] serves
//! forms registered in code; [`ManifestResolver`] reads them from TOML
//! files, treating the module path as the file path.

pub mod catalog;
pub mod manifest;

pub use catalog::CatalogResolver;
pub use manifest::ManifestResolver;

use crate::error::{BridgeError, Result};
use crate::widget::WidgetTree;

/// Locates a form definition and builds a fresh widget tree for it.
///
/// Called once per `open`; every call must return a new, unshared tree.
pub trait FormResolver: Send + Sync {
    fn resolve(&self, module_path: &str, form_name: &str) -> Result<WidgetTree>;
}

/// The resolution failure every resolver reports for an unknown form.
pub fn not_found(module_path: &str, form_name: &str) -> BridgeError {
    BridgeError::resolution(format!(
        "form with name '{form_name}' in module '{module_path}' not found"
    ))
}
