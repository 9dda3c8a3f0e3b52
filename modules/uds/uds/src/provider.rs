//! Query-key bindings of [`UdsService`].

use std::sync::Arc;

use infobroker::{BrokerResult, HandlerFuture, InfoProvider, ProvidesTable, QueryArgs, Registry};
use serde_json::Value;
use uds_sdk::{InstanceRecord, NodeQuery};
use uds_sdk::query_keys::{self, args as arg};

use crate::domain::service::UdsService;

pub const PROVIDER_NAME: &str = "uds";

impl InfoProvider for UdsService {
    fn provider_name(&self) -> &str {
        PROVIDER_NAME
    }

    fn provides() -> ProvidesTable<Self> {
        ProvidesTable::new()
            .provides(query_keys::NODE_DEFINITION_ALL, Self::answer_all_node_definitions)
            .provides(query_keys::NODE_DEFINITION, Self::answer_node_definition)
            .provides(query_keys::BACKENDS_AUTH_DATA, Self::answer_auth_data)
            .provides(query_keys::BACKENDS, Self::answer_backend_target)
            .provides(
                query_keys::INFRASTRUCTURE_STATIC_DESCRIPTION,
                Self::answer_static_description,
            )
            .provides(query_keys::INFRASTRUCTURE_NAME, Self::answer_infrastructure_name)
            .provides(
                query_keys::INFRASTRUCTURE_NODE_INSTANCES,
                Self::answer_node_instances,
            )
            .provides(query_keys::NODE_FIND, Self::answer_find_nodes)
            .provides(
                query_keys::SERVICE_COMPOSER_AUX_DATA,
                Self::answer_service_composer_data,
            )
    }
}

impl UdsService {
    fn answer_all_node_definitions(self: Arc<Self>, args: QueryArgs) -> HandlerFuture {
        Box::pin(async move {
            let node_type: String = args.required(arg::NODE_TYPE)?;
            Ok(serde_json::to_value(self.all_node_definitions(&node_type).await?)?)
        })
    }

    fn answer_node_definition(self: Arc<Self>, args: QueryArgs) -> HandlerFuture {
        Box::pin(async move {
            let node_type: String = args.required(arg::NODE_TYPE)?;
            let preselected: Option<String> = args.optional(arg::PRESELECTED_BACKEND_ID)?;
            let chosen = self
                .select_node_definition(&node_type, preselected.as_deref())
                .await?;
            Ok(serde_json::to_value(chosen)?)
        })
    }

    fn answer_auth_data(self: Arc<Self>, args: QueryArgs) -> HandlerFuture {
        Box::pin(async move {
            let backend_id: String = args.required(arg::BACKEND_ID)?;
            let user_id: String = args.required(arg::USER_ID)?;
            Ok(serde_json::to_value(
                self.get_auth_data(&backend_id, &user_id).await?,
            )?)
        })
    }

    fn answer_backend_target(self: Arc<Self>, args: QueryArgs) -> HandlerFuture {
        Box::pin(async move {
            let backend_id: String = args.required(arg::BACKEND_ID)?;
            Ok(serde_json::to_value(
                self.get_backend_target(&backend_id).await?,
            )?)
        })
    }

    fn answer_static_description(self: Arc<Self>, args: QueryArgs) -> HandlerFuture {
        Box::pin(async move {
            let infra_id: String = args.required(arg::INFRA_ID)?;
            Ok(serde_json::to_value(
                self.get_static_description(&infra_id).await?,
            )?)
        })
    }

    fn answer_infrastructure_name(self: Arc<Self>, args: QueryArgs) -> HandlerFuture {
        Box::pin(async move {
            let infra_id: String = args.required(arg::INFRA_ID)?;
            Ok(serde_json::Value::String(
                self.get_infrastructure_name(&infra_id).await?,
            ))
        })
    }

    fn answer_node_instances(self: Arc<Self>, args: QueryArgs) -> HandlerFuture {
        Box::pin(async move {
            let infra_id: String = args.required(arg::INFRA_ID)?;
            Ok(serde_json::to_value(
                self.get_dynamic_state(&infra_id).await?,
            )?)
        })
    }

    fn answer_find_nodes(self: Arc<Self>, args: QueryArgs) -> HandlerFuture {
        Box::pin(async move {
            let query = NodeQuery {
                infra_id: args.optional(arg::INFRA_ID)?,
                name: args.optional(arg::NAME)?,
            };
            let nodes = self.find_nodes(query).await?;
            Ok(Value::Array(
                nodes.iter().map(InstanceRecord::to_lookup_value).collect(),
            ))
        })
    }

    fn answer_service_composer_data(self: Arc<Self>, args: QueryArgs) -> HandlerFuture {
        Box::pin(async move {
            let sc_id: String = args.required(arg::SC_ID)?;
            Ok(serde_json::to_value(
                self.get_service_composer_data(&sc_id).await?,
            )?)
        })
    }
}

/// A registry holding every UDS binding.
///
/// # Errors
/// Only if the key table itself is inconsistent.
pub fn registry(service: &Arc<UdsService>) -> BrokerResult<Registry> {
    let mut builder = Registry::builder().named(PROVIDER_NAME);
    builder.with_provider(service)?;
    Ok(builder.build())
}
