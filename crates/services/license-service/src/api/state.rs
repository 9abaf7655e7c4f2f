//! Application state - Dependency injection container.

use std::sync::Arc;

use common::ServiceConfig;

use crate::context::RequestContext;
use crate::infra::Database;
use crate::repository::{LicenseRepository, LicenseStore};
use crate::service::{LicenseManager, LicenseService};

/// Application state shared by all handlers.
#[derive(Clone)]
pub struct AppState {
    /// License workflows
    pub licenses: Arc<dyn LicenseService>,
    /// Database handle for health checks, absent when running on a fake store
    pub database: Option<Arc<Database>>,
    /// Server settings
    pub config: ServiceConfig,
}

impl AppState {
    /// Wire the service stack on top of a live database.
    pub fn from_database(database: Arc<Database>, config: ServiceConfig) -> Self {
        let repo: Arc<dyn LicenseRepository> = Arc::new(LicenseStore::new(database.get_connection()));

        Self {
            licenses: Arc::new(LicenseManager::new(repo)),
            database: Some(database),
            config,
        }
    }

    /// Create state with a manually injected service.
    pub fn new(licenses: Arc<dyn LicenseService>, config: ServiceConfig) -> Self {
        Self {
            licenses,
            database: None,
            config,
        }
    }

    /// Fresh context bounded by the configured request timeout.
    pub fn request_context(&self) -> RequestContext {
        RequestContext::with_timeout(self.config.request_timeout())
    }
}
