//! Rate Limiting Middleware using GCRA Algorithm
//!
//! Per-client-IP limiting for the prediction endpoint via tower_governor.
//! Uses the Generic Cell Rate Algorithm (GCRA), so no background task is
//! needed to replenish quotas.

use crate::error::ServerError;
use governor::middleware::StateInformationMiddleware;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_governor::governor::GovernorConfigBuilder;
use tower_governor::key_extractor::PeerIpKeyExtractor;

/// Governor config keyed by peer IP, reporting X-RateLimit-* headers
pub type DefaultGovernorConfig =
    tower_governor::governor::GovernorConfig<PeerIpKeyExtractor, StateInformationMiddleware>;

/// Rate limiting configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Whether the limiter is installed at all
    pub enabled: bool,
    /// Seconds between quota replenishments
    pub per_second: u64,
    /// Burst size (max requests that can be made immediately)
    pub burst_size: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            per_second: 1,
            burst_size: 20,
        }
    }
}

/// Build the governor config for `GovernorLayer`.
///
/// Requires the service to be served with
/// `into_make_service_with_connect_info::<SocketAddr>()` for IP extraction.
pub fn create_governor_config(
    config: &RateLimitConfig,
) -> Result<Arc<DefaultGovernorConfig>, ServerError> {
    GovernorConfigBuilder::default()
        .per_second(config.per_second)
        .burst_size(config.burst_size)
        .use_headers()
        .finish()
        .map(Arc::new)
        .ok_or_else(|| {
            ServerError::RateLimit(format!(
                "per_second ({}) and burst_size ({}) must both be non-zero",
                config.per_second, config.burst_size
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RateLimitConfig::default();
        assert!(config.enabled);
        assert_eq!(config.per_second, 1);
        assert_eq!(config.burst_size, 20);
    }

    #[test]
    fn test_create_governor_config() {
        let governor = create_governor_config(&RateLimitConfig::default()).unwrap();
        assert!(Arc::strong_count(&governor) > 0);
    }

    #[test]
    fn test_zero_burst_rejected() {
        let config = RateLimitConfig {
            burst_size: 0,
            ..Default::default()
        };
        assert!(matches!(
            create_governor_config(&config),
            Err(ServerError::RateLimit(_))
        ));
    }
}
