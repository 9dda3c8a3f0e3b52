//! `UdsApi` trait definition.

use async_trait::async_trait;

use crate::error::UdsError;
use crate::models::{
    AuthRecord, BackendTarget, DynamicState, InstanceRecord, NodeDefinition, NodeQuery,
    ServiceComposerRecord, StaticDescription,
};

/// Public API of the `uds` module.
///
/// Every operation must be implemented; there are no default methods.
#[async_trait]
pub trait UdsApi: Send + Sync {
    /// Static description of an infrastructure.
    ///
    /// # Errors
    /// `NotFound` if the infrastructure was never declared.
    async fn get_static_description(&self, infra_id: &str)
    -> Result<StaticDescription, UdsError>;

    /// Name from the static description.
    ///
    /// # Errors
    /// `NotFound` if the infrastructure was never declared.
    async fn get_infrastructure_name(&self, infra_id: &str) -> Result<String, UdsError>;

    /// Dynamic state; empty if no node has been registered yet.
    ///
    /// # Errors
    /// Storage failures only.
    async fn get_dynamic_state(&self, infra_id: &str) -> Result<DynamicState, UdsError>;

    /// Stores (or overwrites) a static description under its `infra_id`.
    ///
    /// # Errors
    /// Storage failures.
    async fn add_infrastructure(&self, description: &StaticDescription) -> Result<(), UdsError>;

    /// Deletes the static description. Returns whether one existed.
    ///
    /// # Errors
    /// Storage failures.
    async fn remove_infrastructure(&self, infra_id: &str) -> Result<bool, UdsError>;

    /// Records a started node instance under `node_type`, replacing any
    /// instance with the same `node_id`.
    ///
    /// # Errors
    /// Storage failures.
    async fn register_started_node(
        &self,
        infra_id: &str,
        node_type: &str,
        instance: InstanceRecord,
    ) -> Result<(), UdsError>;

    /// Removes one node instance. Returns whether it was present.
    ///
    /// # Errors
    /// Storage failures.
    async fn remove_node(
        &self,
        infra_id: &str,
        node_type: &str,
        node_id: &str,
    ) -> Result<bool, UdsError>;

    /// Node instances matching `query`, each with its live `state` appended.
    ///
    /// # Errors
    /// Storage failures, or `Broker` if the state lookup fails.
    async fn find_nodes(&self, query: NodeQuery) -> Result<Vec<InstanceRecord>, UdsError>;

    /// Every candidate definition of `node_type`.
    ///
    /// # Errors
    /// `NotFound` if the node type has no definition record.
    async fn all_node_definitions(&self, node_type: &str)
    -> Result<Vec<NodeDefinition>, UdsError>;

    /// Picks one definition of `node_type`: the one for `preselected_backend_id`
    /// if given, a uniformly random one otherwise.
    ///
    /// # Errors
    /// `NotFound`, `NoDefinitions` or `NoMatchingDefinition`.
    async fn select_node_definition(
        &self,
        node_type: &str,
        preselected_backend_id: Option<&str>,
    ) -> Result<NodeDefinition, UdsError>;

    /// # Errors
    /// `NotFound` if no credentials are stored for the pair.
    async fn get_auth_data(&self, backend_id: &str, user_id: &str)
    -> Result<AuthRecord, UdsError>;

    /// # Errors
    /// `NotFound` if the backend is unknown.
    async fn get_backend_target(&self, backend_id: &str) -> Result<BackendTarget, UdsError>;

    /// Auxiliary data of a service composer; empty when absent.
    ///
    /// # Errors
    /// Storage failures only.
    async fn get_service_composer_data(
        &self,
        sc_id: &str,
    ) -> Result<ServiceComposerRecord, UdsError>;
}
