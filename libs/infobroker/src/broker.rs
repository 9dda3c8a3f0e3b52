use async_trait::async_trait;
use serde_json::Value;

use crate::args::QueryArgs;
use crate::error::BrokerResult;

/// Anything that can be asked a keyed query.
///
/// Implemented by [`Registry`](crate::Registry) (direct handler dispatch),
/// [`InfoRouter`](crate::InfoRouter) (delegation to sub-brokers) and
/// [`MainBroker`](crate::MainBroker) (late-bound forwarding).
#[async_trait]
pub trait InfoBroker: Send + Sync {
    /// Returns `true` if this broker, or anything it delegates to, answers `key`.
    fn can_answer(&self, key: &str) -> bool;

    /// Answers `key` with `args`.
    ///
    /// # Errors
    /// [`BrokerError::UnknownKey`](crate::BrokerError::UnknownKey) if nothing
    /// here answers `key`, or [`BrokerError::Handler`](crate::BrokerError::Handler)
    /// wrapping the failure of the handler that did.
    async fn answer(&self, key: &str, args: QueryArgs) -> BrokerResult<Value>;
}
