//! Store configuration.
//!
//! The outer [`KvStoreConfig`] only selects the backend; the remaining keys are
//! handed to that backend's constructor, which validates them into its own
//! strict config struct.

use std::fmt;

use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Protocol used when none is configured.
pub const DEFAULT_PROTOCOL: &str = "dict";

/// Backend options whose values are never serialized.
pub const SECRET_OPTIONS: &[&str] = &["password"];

const REDACTED: &str = "[REDACTED]";

/// Backend selection plus protocol-specific options.
///
/// ```yaml
/// protocol: redis
/// host: kv.internal
/// port: 6379
/// request_timeout: 500ms
/// ```
///
/// Serializing prints [`SECRET_OPTIONS`] as `[REDACTED]`.
#[derive(Clone, Default, PartialEq, Deserialize)]
pub struct KvStoreConfig {
    /// `dict` when unset.
    #[serde(default)]
    pub protocol: Option<String>,

    /// Everything else, validated by the selected backend.
    #[serde(flatten)]
    pub options: Map<String, Value>,
}

impl KvStoreConfig {
    #[must_use]
    pub fn dict() -> Self {
        Self::with_protocol(DEFAULT_PROTOCOL)
    }

    #[must_use]
    pub fn with_protocol(protocol: impl Into<String>) -> Self {
        Self {
            protocol: Some(protocol.into()),
            options: Map::new(),
        }
    }

    /// Adds a backend option.
    #[must_use]
    pub fn option(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn effective_protocol(&self) -> &str {
        self.protocol.as_deref().unwrap_or(DEFAULT_PROTOCOL)
    }

    /// Backend options as a JSON object, ready for a backend constructor.
    #[must_use]
    pub fn options_value(&self) -> Value {
        Value::Object(self.options.clone())
    }

    /// Backend options with secret values replaced, for printing.
    #[must_use]
    pub fn redacted_options(&self) -> Map<String, Value> {
        self.options
            .iter()
            .map(|(name, value)| {
                let shown = if SECRET_OPTIONS.contains(&name.as_str()) && !value.is_null() {
                    Value::from(REDACTED)
                } else {
                    value.clone()
                };
                (name.clone(), shown)
            })
            .collect()
    }
}

impl Serialize for KvStoreConfig {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        if let Some(protocol) = &self.protocol {
            map.serialize_entry("protocol", protocol)?;
        }
        for (name, value) in &self.redacted_options() {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl fmt::Debug for KvStoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KvStoreConfig")
            .field("protocol", &self.protocol)
            .field("options", &self.redacted_options())
            .finish()
    }
}

/// Opaque wrapper around a secret string value.
///
/// `Debug` and `Display` print `[REDACTED]`; serialization does too, so a
/// dumped effective config never leaks the secret. The buffer is zeroed on drop.
#[derive(Clone, Default, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SecretString(String);

impl SecretString {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Read-only access to the secret. Callers must not log or persist it.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl<'de> Deserialize<'de> for SecretString {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self)
    }
}

impl Serialize for SecretString {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(REDACTED)
    }
}

/// Serde support for `humantime` durations (`"2s"`, `"150ms"`).
pub mod humantime_duration {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer, de};

    /// # Errors
    /// Fails if the string is not a humantime duration.
    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        let raw = String::deserialize(d)?;
        humantime::parse_duration(&raw).map_err(de::Error::custom)
    }

    /// # Errors
    /// Propagates serializer failures.
    pub fn serialize<S: Serializer>(value: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(&humantime::format_duration(*value))
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn protocol_defaults_to_dict() {
        let cfg: KvStoreConfig = serde_json::from_value(json!({})).unwrap();
        assert_eq!(cfg.effective_protocol(), "dict");
        assert!(cfg.options.is_empty());
    }

    #[test]
    fn options_are_collected() {
        let cfg: KvStoreConfig =
            serde_json::from_value(json!({"protocol": "redis", "host": "kv", "port": 6380}))
                .unwrap();
        assert_eq!(cfg.effective_protocol(), "redis");
        assert_eq!(cfg.options_value(), json!({"host": "kv", "port": 6380}));
    }

    #[test]
    fn dumped_config_hides_the_password() {
        let cfg: KvStoreConfig = serde_json::from_value(
            json!({"protocol": "redis", "host": "kv", "password": "hunter2"}),
        )
        .unwrap();
        assert_eq!(
            serde_json::to_value(&cfg).unwrap(),
            json!({"protocol": "redis", "host": "kv", "password": "[REDACTED]"})
        );
        assert!(!format!("{cfg:?}").contains("hunter2"));
        assert_eq!(cfg.options_value()["password"], "hunter2");
    }

    #[test]
    fn secret_is_redacted() {
        let secret: SecretString = serde_json::from_value(json!("hunter2")).unwrap();
        assert_eq!(secret.expose(), "hunter2");
        assert_eq!(format!("{secret:?}"), "[REDACTED]");
        assert_eq!(format!("{secret}"), "[REDACTED]");
        assert_eq!(serde_json::to_value(&secret).unwrap(), json!("[REDACTED]"));
    }

    #[test]
    fn zeroize_clears_buffer() {
        let mut secret = SecretString::new("sensitive");
        secret.zeroize();
        assert!(secret.is_empty());
    }
}
