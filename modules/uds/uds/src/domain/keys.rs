//! Physical key layout in the key/value store.

/// Matches the dynamic-state key of every infrastructure.
pub const STATE_SCAN_PATTERN: &str = "infra:*:state";

#[must_use]
pub fn description(infra_id: &str) -> String {
    format!("infra:{infra_id}:description")
}

#[must_use]
pub fn state(infra_id: &str) -> String {
    format!("infra:{infra_id}:state")
}

#[must_use]
pub fn auth(backend_id: &str, user_id: &str) -> String {
    format!("auth:{backend_id}:{user_id}")
}

#[must_use]
pub fn backend(backend_id: &str) -> String {
    format!("backend:{backend_id}")
}

#[must_use]
pub fn node_definition(node_type: &str) -> String {
    format!("node_def:{node_type}")
}

#[must_use]
pub fn service_composer(sc_id: &str) -> String {
    format!("service_composer:{sc_id}")
}
