//! Domain service for the UDS module.
//!
//! Translates infrastructure, node and backend operations into key/value
//! reads and writes. Dynamic-state updates are read-modify-write over one
//! blob per infrastructure and run under that infrastructure's lock.

use std::collections::BTreeSet;
use std::sync::Arc;

use infobroker::{BrokerError, MainBroker, QueryArgs};
use kvstore::{KeyValueStore, cut_id};
use tracing::{debug, info};
use uds_sdk::query_keys::{self, args as arg};
use uds_sdk::{
    AuthRecord, BackendTarget, DynamicState, InstanceRecord, NodeDefinition, NodeQuery,
    ServiceComposerRecord, StaticDescription, UdsError,
};

use super::keys;
use super::locks::InfraLocks;
use super::selection::{DefinitionSelector, RandomSelector, select_definition};
use crate::config::UdsConfig;

/// UDS operations over a shared [`KeyValueStore`].
pub struct UdsService {
    kv: KeyValueStore,
    broker: MainBroker,
    selector: Arc<dyn DefinitionSelector>,
    infra_locks: InfraLocks,
}

impl UdsService {
    /// Creates a service over `kv`. `broker` is used to look up live node state.
    #[must_use]
    pub fn new(kv: KeyValueStore, broker: MainBroker) -> Self {
        Self {
            kv,
            broker,
            selector: Arc::new(RandomSelector),
            infra_locks: InfraLocks::new(),
        }
    }

    /// Builds the key/value store described by `config`.
    ///
    /// # Errors
    /// `Storage` if the backend configuration is invalid.
    pub fn from_config(config: &UdsConfig, broker: MainBroker) -> Result<Self, UdsError> {
        let kv = KeyValueStore::from_config(&config.backend).map_err(UdsError::Storage)?;
        info!(protocol = kv.protocol(), "uds service configured");
        Ok(Self::new(kv, broker))
    }

    /// Replaces the policy used when no backend is preselected.
    #[must_use]
    pub fn with_selector(mut self, selector: Arc<dyn DefinitionSelector>) -> Self {
        self.selector = selector;
        self
    }

    #[must_use]
    pub fn store(&self) -> &KeyValueStore {
        &self.kv
    }

    /// # Errors
    /// `NotFound` if the infrastructure was never declared.
    #[tracing::instrument(skip(self))]
    pub async fn get_static_description(
        &self,
        infra_id: &str,
    ) -> Result<StaticDescription, UdsError> {
        Ok(self.kv.get(&keys::description(infra_id)).await?)
    }

    /// # Errors
    /// `NotFound` if the infrastructure was never declared.
    pub async fn get_infrastructure_name(&self, infra_id: &str) -> Result<String, UdsError> {
        Ok(self.get_static_description(infra_id).await?.name)
    }

    /// # Errors
    /// Storage failures.
    #[tracing::instrument(skip(self))]
    pub async fn get_dynamic_state(&self, infra_id: &str) -> Result<DynamicState, UdsError> {
        Ok(self
            .kv
            .get_or(&keys::state(infra_id), DynamicState::default())
            .await?)
    }

    /// # Errors
    /// `InvalidRecord` for an empty `infra_id`, otherwise storage failures.
    #[tracing::instrument(skip_all, fields(infra_id = %description.infra_id))]
    pub async fn add_infrastructure(&self, description: &StaticDescription) -> Result<(), UdsError> {
        if description.infra_id.is_empty() {
            return Err(UdsError::invalid_record(
                "infra::description",
                "infra_id must not be empty",
            ));
        }
        self.kv
            .set(&keys::description(&description.infra_id), description)
            .await?;
        info!(name = %description.name, "infrastructure stored");
        Ok(())
    }

    /// # Errors
    /// Storage failures.
    #[tracing::instrument(skip(self))]
    pub async fn remove_infrastructure(&self, infra_id: &str) -> Result<bool, UdsError> {
        let removed = self.kv.delete(&keys::description(infra_id)).await?;
        info!(removed, "infrastructure removed");
        Ok(removed)
    }

    /// # Errors
    /// Storage failures.
    #[tracing::instrument(skip(self, instance), fields(node_id = %instance.node_id))]
    pub async fn register_started_node(
        &self,
        infra_id: &str,
        node_type: &str,
        instance: InstanceRecord,
    ) -> Result<(), UdsError> {
        let key = keys::state(infra_id);
        self.infra_locks
            .run(infra_id, async {
                let mut state: DynamicState = self.kv.get_or(&key, DynamicState::default()).await?;
                let replaced = state.insert(node_type, instance.without_state()).is_some();
                self.kv.set(&key, &state).await?;
                info!(replaced, "node registered");
                Ok(())
            })
            .await
    }

    /// # Errors
    /// Storage failures.
    #[tracing::instrument(skip(self))]
    pub async fn remove_node(
        &self,
        infra_id: &str,
        node_type: &str,
        node_id: &str,
    ) -> Result<bool, UdsError> {
        let key = keys::state(infra_id);
        self.infra_locks
            .run(infra_id, async {
                let Some(mut state) = self.kv.try_get::<DynamicState>(&key).await? else {
                    return Ok(false);
                };
                if state.remove(node_type, node_id).is_none() {
                    return Ok(false);
                }
                self.kv.set(&key, &state).await?;
                info!("node removed");
                Ok(true)
            })
            .await
    }

    /// Node instances matching `query`, with `state` filled in from `node.state`.
    ///
    /// Without an `infra_id` every infrastructure that has a dynamic state is
    /// scanned; the order across infrastructures is the backend's.
    ///
    /// # Errors
    /// Storage failures, or `Broker` if the state provider fails.
    #[tracing::instrument(skip(self))]
    pub async fn find_nodes(&self, query: NodeQuery) -> Result<Vec<InstanceRecord>, UdsError> {
        let infra_ids = match query.infra_id {
            Some(infra_id) => vec![infra_id],
            None => {
                let mut seen = BTreeSet::new();
                self.kv
                    .enumerate(keys::STATE_SCAN_PATTERN, |k| cut_id(k).to_owned())
                    .await?
                    .into_iter()
                    .filter(|id| seen.insert(id.clone()))
                    .collect()
            }
        };

        let mut nodes = Vec::new();
        for infra_id in &infra_ids {
            let state = self.get_dynamic_state(infra_id).await?;
            nodes.extend(state.select(query.name.as_deref()).cloned());
        }
        for node in &mut nodes {
            node.state = self.node_state(node).await?;
        }
        debug!(infras = infra_ids.len(), found = nodes.len(), "nodes found");
        Ok(nodes)
    }

    async fn node_state(&self, node: &InstanceRecord) -> Result<Option<String>, UdsError> {
        let instance_data = serde_json::to_value(node)
            .map_err(|e| UdsError::invalid_record(&node.node_id, e.to_string()))?;
        let args = QueryArgs::new().with(arg::INSTANCE_DATA, instance_data);
        match self
            .broker
            .answer_as::<Option<String>>(query_keys::NODE_STATE, args)
            .await
        {
            Ok(state) => Ok(state),
            Err(BrokerError::UnknownKey { .. }) => Ok(None),
            Err(e) => Err(UdsError::Broker(e)),
        }
    }

    /// # Errors
    /// `NotFound` if the node type has no definition record.
    #[tracing::instrument(skip(self))]
    pub async fn all_node_definitions(
        &self,
        node_type: &str,
    ) -> Result<Vec<NodeDefinition>, UdsError> {
        Ok(self.kv.get(&keys::node_definition(node_type)).await?)
    }

    /// # Errors
    /// `NotFound`, `NoDefinitions` or `NoMatchingDefinition`.
    #[tracing::instrument(skip(self))]
    pub async fn select_node_definition(
        &self,
        node_type: &str,
        preselected_backend_id: Option<&str>,
    ) -> Result<NodeDefinition, UdsError> {
        let candidates = self.all_node_definitions(node_type).await?;
        let chosen = select_definition(
            node_type,
            &candidates,
            preselected_backend_id,
            self.selector.as_ref(),
        )?;
        debug!(backend_id = %chosen.backend_id, candidates = candidates.len(), "node definition selected");
        Ok(chosen)
    }

    /// # Errors
    /// `NotFound` if no credentials are stored.
    pub async fn get_auth_data(
        &self,
        backend_id: &str,
        user_id: &str,
    ) -> Result<AuthRecord, UdsError> {
        Ok(self.kv.get(&keys::auth(backend_id, user_id)).await?)
    }

    /// # Errors
    /// `NotFound` if the backend is unknown.
    pub async fn get_backend_target(&self, backend_id: &str) -> Result<BackendTarget, UdsError> {
        Ok(self.kv.get(&keys::backend(backend_id)).await?)
    }

    /// # Errors
    /// Storage failures.
    pub async fn get_service_composer_data(
        &self,
        sc_id: &str,
    ) -> Result<ServiceComposerRecord, UdsError> {
        Ok(self
            .kv
            .get_or(&keys::service_composer(sc_id), ServiceComposerRecord::default())
            .await?)
    }
}
