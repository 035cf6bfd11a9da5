//! Server dependencies for handlers (using traits for testability)
//!
//! This module provides the central dependency container used by all domains.
//! All external services use trait abstractions to enable testing.

use std::sync::Arc;
use std::time::Duration;

use crate::domains::groups::GroupStore;
use crate::kernel::{BaseAI, BaseUrlResolver};

/// Default per-candidate bound on a single model call
pub const DEFAULT_MODEL_TIMEOUT: Duration = Duration::from_secs(25);

// =============================================================================
// ServerDeps
// =============================================================================

/// Server dependencies accessible to handlers (using traits for testability)
#[derive(Clone)]
pub struct ServerDeps {
    /// AI client for menu extraction. `None` when no credential is configured;
    /// extraction then answers with a placeholder record.
    pub ai: Option<Arc<dyn BaseAI>>,
    /// Follows map-link redirects
    pub url_resolver: Arc<dyn BaseUrlResolver>,
    /// Group/order storage
    pub groups: Arc<dyn GroupStore>,
    /// Bound on each model call so one hung candidate cannot stall the chain
    pub model_timeout: Duration,
}

impl ServerDeps {
    pub fn new(
        ai: Option<Arc<dyn BaseAI>>,
        url_resolver: Arc<dyn BaseUrlResolver>,
        groups: Arc<dyn GroupStore>,
        model_timeout: Duration,
    ) -> Self {
        Self {
            ai,
            url_resolver,
            groups,
            model_timeout,
        }
    }
}
