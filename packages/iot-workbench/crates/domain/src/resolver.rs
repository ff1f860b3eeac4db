//! Rehydrates the component registry from persisted dependency records.

use serde::{Deserialize, Serialize};

use crate::component::{ComponentType, Dependency, DependencyKind};
use crate::error::WorkbenchError;
use crate::ports::ComponentFactory;
use crate::registry::ComponentRegistry;

/// One dependency edge as persisted in the component store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyRecord {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: DependencyKind,
}

/// One component entry as persisted in the component store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentRecord {
    #[serde(rename = "type")]
    pub component_type: ComponentType,
    pub id: String,
    #[serde(default)]
    pub dependencies: Vec<DependencyRecord>,
}

impl ComponentRecord {
    pub fn new(component_type: ComponentType, id: impl Into<String>) -> Self {
        Self {
            component_type,
            id: id.into(),
            dependencies: Vec::new(),
        }
    }

    pub fn with_dependency(mut self, id: impl Into<String>, kind: DependencyKind) -> Self {
        self.dependencies.push(DependencyRecord {
            id: id.into(),
            kind,
        });
        self
    }
}

/// Builds a registry from persisted records, front to back.
///
/// Every dependency id must reference a record that appeared earlier in the
/// list; anything else is an `UnresolvedDependency` error, even if the id
/// shows up later. A pure function of the record list and factory, so
/// re-running it over an unchanged store yields an identical registry.
pub async fn resolve_components(
    records: &[ComponentRecord],
    factory: &dyn ComponentFactory,
) -> Result<ComponentRegistry, WorkbenchError> {
    let mut registry = ComponentRegistry::new();

    for record in records {
        let mut dependencies = Vec::with_capacity(record.dependencies.len());
        for dep in &record.dependencies {
            let component =
                registry
                    .get(&dep.id)
                    .ok_or_else(|| WorkbenchError::UnresolvedDependency {
                        component: record.id.clone(),
                        dependency: dep.id.clone(),
                    })?;
            dependencies.push(Dependency {
                component,
                kind: dep.kind,
            });
        }

        let component = factory.build(record, dependencies)?;
        if !component.load().await? {
            return Err(WorkbenchError::ComponentLoad(component.name().to_string()));
        }
        registry.register(component)?;
    }

    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::{Capability, Component};
    use crate::ports::ComponentFactory;
    use async_trait::async_trait;
    use std::sync::Arc;

    struct Resolved {
        id: String,
        component_type: ComponentType,
        dependencies: Vec<Dependency>,
    }

    #[async_trait]
    impl Component for Resolved {
        fn id(&self) -> &str {
            &self.id
        }
        fn name(&self) -> &str {
            &self.id
        }
        fn component_type(&self) -> ComponentType {
            self.component_type
        }
        fn capabilities(&self) -> &'static [Capability] {
            &[]
        }
        fn dependencies(&self) -> &[Dependency] {
            &self.dependencies
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

    struct RecordingFactory;

    impl ComponentFactory for RecordingFactory {
        fn build(
            &self,
            record: &ComponentRecord,
            dependencies: Vec<Dependency>,
        ) -> Result<Arc<dyn Component>, WorkbenchError> {
            Ok(Arc::new(Resolved {
                id: record.id.clone(),
                component_type: record.component_type,
                dependencies,
            }))
        }
    }

    fn sample_records() -> Vec<ComponentRecord> {
        vec![
            ComponentRecord::new(ComponentType::IotHub, "hub-1"),
            ComponentRecord::new(ComponentType::CosmosDb, "cosmos-1"),
            ComponentRecord::new(ComponentType::StreamAnalyticsJob, "asa-1")
                .with_dependency("hub-1", DependencyKind::Input)
                .with_dependency("cosmos-1", DependencyKind::Other),
        ]
    }

    #[tokio::test]
    async fn registry_matches_record_order_and_count() {
        let records = sample_records();
        let registry = resolve_components(&records, &RecordingFactory).await.unwrap();

        assert_eq!(registry.len(), records.len());
        let ids: Vec<&str> = registry.iter().map(|c| c.id()).collect();
        assert_eq!(ids, vec!["hub-1", "cosmos-1", "asa-1"]);

        let asa = registry.get("asa-1").unwrap();
        assert_eq!(asa.dependencies().len(), 2);
        assert_eq!(asa.dependencies()[0].component.id(), "hub-1");
        assert_eq!(asa.dependencies()[0].kind, DependencyKind::Input);
        assert_eq!(asa.dependencies()[1].kind, DependencyKind::Other);
    }

    #[tokio::test]
    async fn forward_references_are_rejected() {
        // "asa-1" references "cosmos-1" before it is declared; the later
        // appearance must not rescue it.
        let records = vec![
            ComponentRecord::new(ComponentType::IotHub, "hub-1"),
            ComponentRecord::new(ComponentType::StreamAnalyticsJob, "asa-1")
                .with_dependency("cosmos-1", DependencyKind::Other),
            ComponentRecord::new(ComponentType::CosmosDb, "cosmos-1"),
        ];

        let err = resolve_components(&records, &RecordingFactory)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            WorkbenchError::UnresolvedDependency { component, dependency }
                if component == "asa-1" && dependency == "cosmos-1"
        ));
    }

    #[tokio::test]
    async fn resolution_is_idempotent() {
        let records = sample_records();
        let first = resolve_components(&records, &RecordingFactory).await.unwrap();
        let second = resolve_components(&records, &RecordingFactory).await.unwrap();

        let ids = |r: &ComponentRegistry| -> Vec<(String, ComponentType)> {
            r.iter()
                .map(|c| (c.id().to_string(), c.component_type()))
                .collect()
        };
        assert_eq!(ids(&first), ids(&second));
    }

    #[test]
    fn records_round_trip_through_store_format() {
        let record = ComponentRecord::new(ComponentType::StreamAnalyticsJob, "asa-1")
            .with_dependency("hub-1", DependencyKind::Input);

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["type"], "StreamAnalyticsJob");
        assert_eq!(json["dependencies"][0]["type"], "Input");

        let back: ComponentRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }
}
