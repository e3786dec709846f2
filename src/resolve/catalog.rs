//! In-memory form catalog.

use std::collections::HashMap;

use super::{not_found, FormResolver};
use crate::controller::FormKey;
use crate::error::Result;
use crate::widget::WidgetTree;

type Factory = Box<dyn Fn() -> WidgetTree + Send + Sync>;

/// Forms registered in code as tree factories.
#[derive(Default)]
pub struct CatalogResolver {
    factories: HashMap<FormKey, Factory>,
}

impl CatalogResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `factory` for `(module_path, form_name)`, replacing any
    /// previous registration.
    pub fn register<F>(&mut self, module_path: &str, form_name: &str, factory: F)
    where
        F: Fn() -> WidgetTree + Send + Sync + 'static,
    {
        self.factories
            .insert(FormKey::new(module_path, form_name), Box::new(factory));
    }

    /// Builder-style [`register`](Self::register).
    pub fn with_form<F>(mut self, module_path: &str, form_name: &str, factory: F) -> Self
    where
        F: Fn() -> WidgetTree + Send + Sync + 'static,
    {
        self.register(module_path, form_name, factory);
        self
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl FormResolver for CatalogResolver {
    fn resolve(&self, module_path: &str, form_name: &str) -> Result<WidgetTree> {
        self.factories
            .get(&FormKey::new(module_path, form_name))
            .map(|factory| factory())
            .ok_or_else(|| not_found(module_path, form_name))
    }
}

impl std::fmt::Debug for CatalogResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut keys: Vec<String> = self.factories.keys().map(ToString::to_string).collect();
        keys.sort();
        f.debug_struct("CatalogResolver").field("forms", &keys).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BridgeError;
    use crate::widget::{NodeData, Widget};

    fn panel() -> WidgetTree {
        let mut tree = WidgetTree::new();
        tree.insert(NodeData::new("Panel", Widget::form()));
        tree
    }

    #[test]
    fn resolves_fresh_trees() {
        let catalog = CatalogResolver::new().with_form("orders", "Panel", panel);
        let a = catalog.resolve("orders", "Panel").unwrap();
        let b = catalog.resolve("orders", "Panel").unwrap();
        assert_eq!(a.len(), 1);
        assert_eq!(b.len(), 1);
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn unknown_form_is_resolution_error() {
        let catalog = CatalogResolver::new().with_form("orders", "Panel", panel);
        assert_eq!(
            catalog.resolve("orders", "Other").unwrap_err(),
            BridgeError::Resolution(
                "form with name 'Other' in module 'orders' not found".into()
            )
        );
    }

    #[test]
    fn debug_lists_keys() {
        let catalog = CatalogResolver::new().with_form("orders", "Panel", panel);
        assert!(format!("{catalog:?}").contains("orders/Panel"));
    }
}
