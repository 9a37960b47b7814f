//! CITC Portal client core.
//!
//! Theme and session state, role-based route guards and a REST client for the club backend. The
//! `citc` binary drives all of it from the command line.

pub mod admin;
pub mod api;
pub mod config;
pub mod errors;
pub mod guards;
pub mod models;
pub mod routes;
pub mod session;
pub mod storage;
pub mod theme;

use std::sync::Arc;

use admin::{EventManager, TeamManager};
use api::ApiClient;
use config::Config;
use errors::AppError;
use routes::Resolution;
use session::AuthStore;
use storage::{FileStorage, Storage};
use theme::ThemeController;

/// Services shared for the lifetime of the process.
#[derive(Clone)]
pub struct Portal {
    pub config: Arc<Config>,
    pub theme: Arc<ThemeController>,
    pub auth: Arc<AuthStore>,
    pub api: ApiClient,
}

impl Portal {
    /// Open the state file named in `config` and start every service.
    pub async fn start(config: Config) -> Result<Self, AppError> {
        let storage = Arc::new(FileStorage::open(&config.state_path)?);
        Self::with_storage(config, storage).await
    }

    /// Start every service on top of `storage` and restore the persisted session.
    pub async fn with_storage(config: Config, storage: Arc<dyn Storage>) -> Result<Self, AppError> {
        let theme = Arc::new(ThemeController::new(storage.clone(), config.prefers_dark()));
        let auth = Arc::new(AuthStore::new(storage));
        let api = ApiClient::new(&config.api_url, auth.clone())?;

        auth.restore().await;

        Ok(Self {
            config: Arc::new(config),
            theme,
            auth,
            api,
        })
    }

    /// Resolve `path` against the route table for the current session.
    pub fn navigate(&self, path: &str) -> Resolution {
        routes::navigate(path, &self.auth.state())
    }

    pub fn event_manager(&self) -> EventManager {
        EventManager::new(self.api.clone())
    }

    pub fn team_manager(&self) -> TeamManager {
        TeamManager::new(self.api.clone())
    }
}
