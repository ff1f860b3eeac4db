use std::collections::HashMap;
use std::sync::Arc;

use crate::component::{Capability, Component};
use crate::error::WorkbenchError;

/// The in-memory, ordered, id-indexed collection of a project's components.
///
/// Insertion order is the dependency-safe order: a component's dependencies
/// are always registered before the component itself, and every phase
/// iterates in that order.
#[derive(Default)]
pub struct ComponentRegistry {
    components: Vec<Arc<dyn Component>>,
    // id -> position in `components`, for O(1) dependency resolution
    index: HashMap<String, usize>,
}

impl std::fmt::Debug for ComponentRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentRegistry")
            .field(
                "components",
                &self.components.iter().map(|c| c.id()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a component. Ids must be unique across the registry.
    pub fn register(&mut self, component: Arc<dyn Component>) -> Result<(), WorkbenchError> {
        let id = component.id().to_string();
        if self.index.contains_key(&id) {
            return Err(WorkbenchError::DuplicateComponentId(id));
        }
        self.index.insert(id, self.components.len());
        self.components.push(component);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<Arc<dyn Component>> {
        self.index.get(id).map(|&pos| self.components[pos].clone())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Component>> {
        self.components.iter()
    }

    /// Components implementing `capability`, in registry order.
    pub fn with_capability(&self, capability: Capability) -> Vec<Arc<dyn Component>> {
        self.components
            .iter()
            .filter(|c| c.has_capability(capability))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::ComponentType;
    use async_trait::async_trait;

    struct Fake {
        id: String,
        caps: &'static [Capability],
    }

    #[async_trait]
    impl Component for Fake {
        fn id(&self) -> &str {
            &self.id
        }
        fn name(&self) -> &str {
            "fake"
        }
        fn component_type(&self) -> ComponentType {
            ComponentType::IotHub
        }
        fn capabilities(&self) -> &'static [Capability] {
            self.caps
        }
        async fn check_prerequisites(&self) -> Result<bool, WorkbenchError> {
            Ok(true)
        }
        async fn load(&self) -> Result<bool, WorkbenchError> {
            Ok(true)
        }
        async fn create(&self) -> Result<bool, WorkbenchError> {
            Ok(true)
        }
    }

    fn fake(id: &str, caps: &'static [Capability]) -> Arc<dyn Component> {
        Arc::new(Fake {
            id: id.to_string(),
            caps,
        })
    }

    #[test]
    fn register_preserves_insertion_order() {
        let mut registry = ComponentRegistry::new();
        registry.register(fake("b", &[])).unwrap();
        registry.register(fake("a", &[])).unwrap();
        registry.register(fake("c", &[])).unwrap();

        let ids: Vec<&str> = registry.iter().map(|c| c.id()).collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut registry = ComponentRegistry::new();
        registry.register(fake("hub", &[])).unwrap();

        let err = registry.register(fake("hub", &[])).unwrap_err();
        assert!(matches!(err, WorkbenchError::DuplicateComponentId(id) if id == "hub"));
    }

    #[test]
    fn capability_filter_keeps_registry_order() {
        let mut registry = ComponentRegistry::new();
        registry
            .register(fake("a", &[Capability::Compilable]))
            .unwrap();
        registry
            .register(fake("b", &[Capability::Provisionable]))
            .unwrap();
        registry
            .register(fake("c", &[Capability::Compilable, Capability::Uploadable]))
            .unwrap();

        let compilable = registry.with_capability(Capability::Compilable);
        let ids: Vec<&str> = compilable.iter().map(|c| c.id()).collect();
        assert_eq!(ids, vec!["a", "c"]);

        assert!(registry.with_capability(Capability::Deployable).is_empty());
    }
}
