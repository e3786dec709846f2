//! TOML form manifests.
//!
//! A manifest holds any number of `[[form]]` tables. Each form lists its
//! top-level `widgets`; a widget may nest further `children`:
//!
//! ```toml
//! [[form]]
//! name = "Panel"
//! title = "Orders"
//!
//! [[form.widgets]]
//! kind = "button"
//! name = "Btn1"
//! text = "Send"
//!
//! [[form.widgets]]
//! kind = "combo-box"
//! name = "Symbol"
//! items = ["EURUSD", "GBPUSD"]
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use super::{not_found, FormResolver};
use crate::error::{BridgeError, Result};
use crate::time;
use crate::widget::{NodeData, NodeId, Widget, WidgetKind, WidgetTree};

// ---------------------------------------------------------------------------
// Manifest schema
// ---------------------------------------------------------------------------

/// A parsed manifest file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    #[serde(default, rename = "form")]
    pub forms: Vec<FormSpec>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FormSpec {
    pub name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub widgets: Vec<WidgetSpec>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WidgetSpec {
    pub kind: WidgetKind,
    #[serde(default)]
    pub name: String,
    pub text: Option<String>,
    #[serde(default)]
    pub items: Vec<String>,
    #[serde(default)]
    pub tabs: Vec<String>,
    pub value: Option<f64>,
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
    pub decimals: Option<u32>,
    pub increment: Option<f64>,
    /// Date pickers: epoch seconds.
    pub date: Option<i64>,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default)]
    pub children: Vec<WidgetSpec>,
}

fn default_true() -> bool {
    true
}

impl Manifest {
    pub fn parse(raw: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    pub fn form(&self, name: &str) -> Option<&FormSpec> {
        self.forms.iter().find(|form| form.name == name)
    }
}

impl FormSpec {
    /// Build a fresh widget tree rooted at a form node named after the form.
    pub fn build(&self) -> WidgetTree {
        let mut tree = WidgetTree::new();
        let root = tree.insert(NodeData::new(
            self.name.as_str(),
            Widget::Form {
                title: self.title.clone(),
            },
        ));
        for widget in &self.widgets {
            widget.insert_into(&mut tree, root);
        }
        tree
    }
}

impl WidgetSpec {
    fn insert_into(&self, tree: &mut WidgetTree, parent: NodeId) {
        let node = tree.insert_child(parent, self.node_data());
        for child in &self.children {
            child.insert_into(tree, node);
        }
    }

    fn node_data(&self) -> NodeData {
        let mut widget = Widget::of_kind(self.kind);
        match &mut widget {
            Widget::ComboBox { items, .. } => items.clone_from(&self.items),
            Widget::TabStrip { tabs, .. } => tabs.clone_from(&self.tabs),
            Widget::NumericSpinner(spinner) => {
                if let Some(minimum) = self.minimum {
                    spinner.minimum = minimum;
                }
                if let Some(maximum) = self.maximum {
                    spinner.maximum = maximum.max(spinner.minimum);
                }
                if let Some(decimals) = self.decimals {
                    spinner.decimals = decimals;
                }
                if let Some(increment) = self.increment {
                    spinner.increment = increment;
                }
                spinner.value = spinner.clamp(self.value.unwrap_or(spinner.value));
            }
            Widget::DatePicker { value } => {
                if let Some(seconds) = self.date {
                    *value = time::from_epoch_seconds(seconds);
                }
            }
            Widget::ScrollBar {
                value,
                minimum,
                maximum,
            } => {
                // Saturating float-to-int casts.
                if let Some(min) = self.minimum {
                    *minimum = min as i32;
                }
                if let Some(max) = self.maximum {
                    *maximum = (max as i32).max(*minimum);
                }
                if let Some(v) = self.value {
                    *value = (v as i32).clamp(*minimum, *maximum);
                }
            }
            _ => {}
        }
        let data = NodeData::new(self.name.as_str(), widget)
            .enabled(self.enabled)
            .visible(self.visible);
        match &self.text {
            Some(text) => data.with_text(text.as_str()),
            None => data,
        }
    }
}

// ---------------------------------------------------------------------------
// ManifestResolver
// ---------------------------------------------------------------------------

/// Resolves forms from manifest files. The module path names the file,
/// relative to the base directory when one is set.
#[derive(Debug, Clone, Default)]
pub struct ManifestResolver {
    base_dir: Option<PathBuf>,
}

impl ManifestResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve relative module paths against `dir` (builder).
    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    fn manifest_path(&self, module_path: &str) -> PathBuf {
        let path = Path::new(module_path);
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }

    /// Read and parse the manifest behind `module_path`.
    pub fn load(&self, module_path: &str) -> Result<Manifest> {
        let path = self.manifest_path(module_path);
        let raw = fs::read_to_string(&path).map_err(|e| {
            BridgeError::resolution(format!(
                "cannot read form module '{}': {e}",
                path.display()
            ))
        })?;
        Manifest::parse(&raw).map_err(|e| {
            BridgeError::resolution(format!(
                "invalid form module '{}': {e}",
                path.display()
            ))
        })
    }
}

impl FormResolver for ManifestResolver {
    fn resolve(&self, module_path: &str, form_name: &str) -> Result<WidgetTree> {
        let manifest = self.load(module_path)?;
        let form = manifest
            .form(form_name)
            .ok_or_else(|| not_found(module_path, form_name))?;
        let tree = form.build();
        debug!(module = module_path, form = form_name, nodes = tree.len(), "form resolved");
        Ok(tree)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use pretty_assertions::assert_eq;

    use super::*;

    const ORDERS: &str = r#"
[[form]]
name = "Panel"
title = "Orders"

[[form.widgets]]
kind = "button"
name = "Btn1"
text = "Send"

[[form.widgets]]
kind = "panel"
name = "Group"

[[form.widgets.children]]
kind = "combo-box"
name = "Symbol"
items = ["EURUSD", "GBPUSD"]

[[form.widgets.children]]
kind = "numeric-spinner"
name = "Lots"
minimum = 0.01
maximum = 50.0
value = 100.0
decimals = 2

[[form]]
name = "Other"
"#;

    fn write_manifest(contents: &str) -> (tempfile::TempDir, String) {
        let dir = tempfile::tempdir().unwrap();
        let mut file = fs::File::create(dir.path().join("orders.toml")).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        (dir, "orders.toml".to_owned())
    }

    #[test]
    fn builds_nested_tree() {
        let manifest = Manifest::parse(ORDERS).unwrap();
        let tree = manifest.form("Panel").unwrap().build();
        let root = tree.root().unwrap();
        assert_eq!(tree.get(root).unwrap().label(), "Orders");
        let names: Vec<_> = tree
            .walk_depth_first(root)
            .into_iter()
            .map(|id| tree.get(id).unwrap().name.clone())
            .collect();
        assert_eq!(names, vec!["Panel", "Btn1", "Group", "Symbol", "Lots"]);
    }

    #[test]
    fn spinner_value_is_clamped() {
        let manifest = Manifest::parse(ORDERS).unwrap();
        let tree = manifest.form("Panel").unwrap().build();
        let lots = tree.find_by_name("Lots").unwrap();
        let Widget::NumericSpinner(spinner) = &tree.get(lots).unwrap().widget else {
            panic!("expected spinner");
        };
        assert_eq!((spinner.value, spinner.decimals), (50.0, 2));
    }

    #[test]
    fn resolves_from_base_dir() {
        let (dir, module) = write_manifest(ORDERS);
        let resolver = ManifestResolver::new().with_base_dir(dir.path());
        let tree = resolver.resolve(&module, "Other").unwrap();
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn unknown_form_is_not_found() {
        let (dir, module) = write_manifest(ORDERS);
        let resolver = ManifestResolver::new().with_base_dir(dir.path());
        assert_eq!(
            resolver.resolve(&module, "Missing").unwrap_err(),
            BridgeError::Resolution(
                "form with name 'Missing' in module 'orders.toml' not found".into()
            )
        );
    }

    #[test]
    fn missing_file_and_bad_toml_are_resolution_errors() {
        let dir = tempfile::tempdir().unwrap();
        let resolver = ManifestResolver::new().with_base_dir(dir.path());
        assert!(matches!(
            resolver.resolve("absent.toml", "Panel"),
            Err(BridgeError::Resolution(_))
        ));

        let (dir, module) = write_manifest("[[form]]\nname = 3\n");
        let resolver = ManifestResolver::new().with_base_dir(dir.path());
        let err = resolver.resolve(&module, "Panel").unwrap_err();
        assert!(err.to_string().starts_with("invalid form module"));
    }

    #[test]
    fn unknown_widget_kind_is_rejected() {
        let raw = "[[form]]\nname = \"P\"\n[[form.widgets]]\nkind = \"slider\"\n";
        assert!(Manifest::parse(raw).is_err());
    }
}
