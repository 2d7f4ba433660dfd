/*!
 * Service-specific concurrency tuning.
 *
 * Each translation service gets a profile with the pool width used when the
 * configuration does not override it, and a note on how chunk failures are
 * treated by that service's backend.
 */

use crate::app_config::ServiceSelector;

/// Service-specific concurrency profile with tuned defaults
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceProfile {
    /// Maximum concurrent requests
    pub max_concurrent_requests: usize,
    /// Whether one failed chunk aborts the whole batch
    pub failures_abort_batch: bool,
}

impl ServiceProfile {
    /// Get the profile for a given service
    pub fn for_service(service: ServiceSelector) -> Self {
        match service {
            ServiceSelector::OpenAI => Self {
                // Two calls per chunk, throttled with 429s
                max_concurrent_requests: 5,
                failures_abort_batch: true,
            },
            ServiceSelector::Google => Self {
                max_concurrent_requests: 5,
                failures_abort_batch: false,
            },
        }
    }

    /// Get effective concurrent requests, respecting any user override
    pub fn effective_concurrent_requests(&self, user_override: Option<usize>) -> usize {
        user_override
            .filter(|&width| width > 0)
            .unwrap_or(self.max_concurrent_requests)
    }
}
