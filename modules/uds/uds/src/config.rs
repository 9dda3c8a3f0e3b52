//! Configuration for the UDS module.

use kvstore::KvStoreConfig;
use serde::{Deserialize, Serialize};

/// Configuration for the UDS module.
///
/// ```yaml
/// uds:
///   backend:
///     protocol: redis
///     host: kv.internal
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct UdsConfig {
    /// Key/value store holding the records. In-memory when omitted.
    pub backend: KvStoreConfig,
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn default_config_uses_dict_backend() {
        let cfg: UdsConfig = serde_json::from_value(json!({})).unwrap();
        assert_eq!(cfg.backend.effective_protocol(), "dict");
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(serde_json::from_value::<UdsConfig>(json!({"store": {}})).is_err());
    }
}
