//! Rolodex Core - client-side management of remote user records
//!
//! This crate implements the user-record flows following hexagonal
//! architecture:
//!
//! - **domain**: Core entities (User, UserDraft) and the error type
//! - **ports**: Trait definition for the remote service (UserService)
//! - **services**: The create and update flows
//! - **adapters**: Concrete implementations (HTTP client, test mocks)

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
pub mod services;

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;

use adapters::HttpUserService;
use config::Config;
use ports::UserService;
use services::{CreateFlow, UpdateFlow};

// Re-export commonly used types at crate root
pub use domain::result::Error;
pub use domain::{User, UserDraft};

/// Main context for Rolodex operations
///
/// The primary entry point for callers. Holds the configuration and the
/// shared service instance, and hands out flows bound to it.
pub struct RolodexContext {
    pub config: Config,
    pub service: Arc<dyn UserService>,
}

impl RolodexContext {
    /// Create a new Rolodex context from the settings in `rolodex_dir`
    pub fn new(rolodex_dir: &Path) -> Result<Self> {
        let config = Config::load(rolodex_dir)?;

        let base_url = config.base_url.clone().ok_or_else(|| {
            anyhow::anyhow!(
                "No API base URL configured. Run `rolo setup <base-url>` or set ROLODEX_BASE_URL."
            )
        })?;

        let mut service = HttpUserService::new(&base_url)?;
        if let Some(key) = &config.api_key {
            service = service.with_api_key(key);
        }

        Ok(Self {
            config,
            service: Arc::new(service),
        })
    }

    /// Create a context around an existing service (used by tests)
    pub fn with_service(config: Config, service: Arc<dyn UserService>) -> Self {
        Self { config, service }
    }

    /// A create flow bound to this context's service
    pub fn create_flow(&self) -> CreateFlow {
        CreateFlow::new(Arc::clone(&self.service))
    }

    /// An update flow bound to this context's service and the given record
    pub fn update_flow(&self, user_id: impl Into<String>) -> UpdateFlow {
        UpdateFlow::new(Arc::clone(&self.service), user_id)
    }
}
