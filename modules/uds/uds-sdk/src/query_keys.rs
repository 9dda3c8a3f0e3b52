//! Query keys recognised by the UDS layer.
//!
//! All but [`NODE_STATE`] are answered by UDS itself; `node.state` is answered
//! by whichever provider tracks live node status and is consumed by
//! `find_nodes`.

/// Every candidate definition of a node type.
pub const NODE_DEFINITION_ALL: &str = "node.definition.all";
/// One definition of a node type, optionally pinned to a backend.
pub const NODE_DEFINITION: &str = "node.definition";
/// Credentials of a user on a backend.
pub const BACKENDS_AUTH_DATA: &str = "backends.auth_data";
/// Metadata of a named backend.
pub const BACKENDS: &str = "backends";
pub const INFRASTRUCTURE_STATIC_DESCRIPTION: &str = "infrastructure.static_description";
pub const INFRASTRUCTURE_NAME: &str = "infrastructure.name";
/// Dynamic state of an infrastructure.
pub const INFRASTRUCTURE_NODE_INSTANCES: &str = "infrastructure.node_instances";
pub const NODE_FIND: &str = "node.find";
/// Live state of one node instance (argument `instance_data`).
pub const NODE_STATE: &str = "node.state";
pub const SERVICE_COMPOSER_AUX_DATA: &str = "service_composer.aux_data";

/// Argument names used with the keys above.
pub mod args {
    pub const INFRA_ID: &str = "infra_id";
    pub const NAME: &str = "name";
    pub const NODE_TYPE: &str = "node_type";
    pub const PRESELECTED_BACKEND_ID: &str = "preselected_backend_id";
    pub const BACKEND_ID: &str = "backend_id";
    pub const USER_ID: &str = "user_id";
    pub const SC_ID: &str = "sc_id";
    pub const INSTANCE_DATA: &str = "instance_data";
}
