//! Local client implementing the `UdsApi` trait.

use std::sync::Arc;

use async_trait::async_trait;
use uds_sdk::{
    AuthRecord, BackendTarget, DynamicState, InstanceRecord, NodeDefinition, NodeQuery,
    ServiceComposerRecord, StaticDescription, UdsApi, UdsError,
};

use crate::domain::service::UdsService;

/// In-process client delegating to a shared [`UdsService`].
#[derive(Clone)]
pub struct UdsLocalClient {
    service: Arc<UdsService>,
}

impl UdsLocalClient {
    #[must_use]
    pub fn new(service: Arc<UdsService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl UdsApi for UdsLocalClient {
    async fn get_static_description(
        &self,
        infra_id: &str,
    ) -> Result<StaticDescription, UdsError> {
        self.service.get_static_description(infra_id).await
    }

    async fn get_infrastructure_name(&self, infra_id: &str) -> Result<String, UdsError> {
        self.service.get_infrastructure_name(infra_id).await
    }

    async fn get_dynamic_state(&self, infra_id: &str) -> Result<DynamicState, UdsError> {
        self.service.get_dynamic_state(infra_id).await
    }

    async fn add_infrastructure(&self, description: &StaticDescription) -> Result<(), UdsError> {
        self.service.add_infrastructure(description).await
    }

    async fn remove_infrastructure(&self, infra_id: &str) -> Result<bool, UdsError> {
        self.service.remove_infrastructure(infra_id).await
    }

    async fn register_started_node(
        &self,
        infra_id: &str,
        node_type: &str,
        instance: InstanceRecord,
    ) -> Result<(), UdsError> {
        self.service
            .register_started_node(infra_id, node_type, instance)
            .await
    }

    async fn remove_node(
        &self,
        infra_id: &str,
        node_type: &str,
        node_id: &str,
    ) -> Result<bool, UdsError> {
        self.service.remove_node(infra_id, node_type, node_id).await
    }

    async fn find_nodes(&self, query: NodeQuery) -> Result<Vec<InstanceRecord>, UdsError> {
        self.service.find_nodes(query).await
    }

    async fn all_node_definitions(
        &self,
        node_type: &str,
    ) -> Result<Vec<NodeDefinition>, UdsError> {
        self.service.all_node_definitions(node_type).await
    }

    async fn select_node_definition(
        &self,
        node_type: &str,
        preselected_backend_id: Option<&str>,
    ) -> Result<NodeDefinition, UdsError> {
        self.service
            .select_node_definition(node_type, preselected_backend_id)
            .await
    }

    async fn get_auth_data(&self, backend_id: &str, user_id: &str) -> Result<AuthRecord, UdsError> {
        self.service.get_auth_data(backend_id, user_id).await
    }

    async fn get_backend_target(&self, backend_id: &str) -> Result<BackendTarget, UdsError> {
        self.service.get_backend_target(backend_id).await
    }

    async fn get_service_composer_data(
        &self,
        sc_id: &str,
    ) -> Result<ServiceComposerRecord, UdsError> {
        self.service.get_service_composer_data(sc_id).await
    }
}
