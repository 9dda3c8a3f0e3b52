//! Domain records persisted by the UDS layer.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Immutable description of an infrastructure, written once when it is declared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaticDescription {
    pub infra_id: String,
    pub name: String,
    /// Topology and any other implementation-defined fields.
    #[serde(flatten)]
    pub topology: Map<String, Value>,
}

impl StaticDescription {
    #[must_use]
    pub fn new(infra_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            infra_id: infra_id.into(),
            name: name.into(),
            topology: Map::new(),
        }
    }

    #[must_use]
    pub fn with_field(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.topology.insert(field.into(), value.into());
        self
    }
}

/// One running node instance.
///
/// `state` is derived on read and never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstanceRecord {
    pub node_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl InstanceRecord {
    #[must_use]
    pub fn new(node_id: impl Into<String>) -> Self {
        Self {
            node_id: node_id.into(),
            state: None,
            attributes: Map::new(),
        }
    }

    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Shape returned by node lookups: `state` is always present, `null` when
    /// no state provider answered.
    #[must_use]
    pub fn to_lookup_value(&self) -> Value {
        let mut object = self.attributes.clone();
        object.insert("node_id".to_owned(), Value::from(self.node_id.clone()));
        object.insert(
            "state".to_owned(),
            self.state.clone().map_or(Value::Null, Value::from),
        );
        Value::Object(object)
    }

    /// The record as persisted: without the derived `state`.
    #[must_use]
    pub fn without_state(mut self) -> Self {
        self.state = None;
        self
    }
}

/// Node type -> node id -> instance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DynamicState(BTreeMap<String, BTreeMap<String, InstanceRecord>>);

impl DynamicState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Total number of instances over all node types.
    #[must_use]
    pub fn instance_count(&self) -> usize {
        self.0.values().map(BTreeMap::len).sum()
    }

    pub fn node_types(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    #[must_use]
    pub fn instances(&self, node_type: &str) -> Option<&BTreeMap<String, InstanceRecord>> {
        self.0.get(node_type)
    }

    #[must_use]
    pub fn get(&self, node_type: &str, node_id: &str) -> Option<&InstanceRecord> {
        self.0.get(node_type)?.get(node_id)
    }

    /// Inserts or overwrites the instance keyed by its `node_id`.
    pub fn insert(
        &mut self,
        node_type: impl Into<String>,
        record: InstanceRecord,
    ) -> Option<InstanceRecord> {
        self.0
            .entry(node_type.into())
            .or_default()
            .insert(record.node_id.clone(), record)
    }

    /// Removes one instance; a node type left without instances is dropped.
    pub fn remove(&mut self, node_type: &str, node_id: &str) -> Option<InstanceRecord> {
        let instances = self.0.get_mut(node_type)?;
        let removed = instances.remove(node_id);
        if instances.is_empty() {
            self.0.remove(node_type);
        }
        removed
    }

    /// Instances of every node type, or only of `node_type` when given.
    pub fn select<'a>(
        &'a self,
        node_type: Option<&'a str>,
    ) -> impl Iterator<Item = &'a InstanceRecord> + 'a {
        self.0
            .iter()
            .filter(move |(t, _)| node_type.is_none_or(|wanted| wanted == t.as_str()))
            .flat_map(|(_, instances)| instances.values())
    }
}

/// One candidate implementation of a node type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDefinition {
    pub backend_id: String,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl NodeDefinition {
    #[must_use]
    pub fn new(backend_id: impl Into<String>) -> Self {
        Self {
            backend_id: backend_id.into(),
            attributes: Map::new(),
        }
    }

    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }
}

/// Credentials for a (backend, user) pair. Opaque to this layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthRecord(pub Value);

/// Metadata about a named backend. Opaque to this layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BackendTarget(pub Value);

/// Auxiliary service-composer data; empty when nothing was stored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceComposerRecord(pub Map<String, Value>);

impl ServiceComposerRecord {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Filter for `find_nodes`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct NodeQuery {
    /// Restrict to one infrastructure; all infrastructures when `None`.
    pub infra_id: Option<String>,
    /// Restrict to one node type.
    pub name: Option<String>,
}

impl NodeQuery {
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn in_infra(mut self, infra_id: impl Into<String>) -> Self {
        self.infra_id = Some(infra_id.into());
        self
    }

    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}
