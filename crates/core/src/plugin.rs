use async_trait::async_trait;
use std::sync::Arc;

use crate::adapters::DatabaseAdapter;
use crate::config::LedgerConfig;
use crate::error::{LedgerError, LedgerResult};
use crate::identity::{Identity, IdentityProvider};
use crate::types::{HttpMethod, LedgerRequest, LedgerResponse};

/// Plugin trait that all ledger plugins must implement.
#[async_trait]
pub trait LedgerPlugin<DB: DatabaseAdapter>: Send + Sync {
    /// Plugin name - should be unique
    fn name(&self) -> &'static str;

    /// Routes that this plugin handles
    fn routes(&self) -> Vec<LedgerRoute>;

    /// Called when the plugin is initialized
    async fn on_init(&self, ctx: &mut LedgerContext<DB>) -> LedgerResult<()> {
        let _ = ctx;
        Ok(())
    }

    /// Called for each request - return Some(response) to handle, None to pass through
    async fn on_request(
        &self,
        req: &LedgerRequest,
        ctx: &LedgerContext<DB>,
    ) -> LedgerResult<Option<LedgerResponse>>;
}

/// Route definition for plugins
#[derive(Debug, Clone)]
pub struct LedgerRoute {
    pub path: String,
    pub method: HttpMethod,
    pub operation_id: String,
}

impl LedgerRoute {
    pub fn new(
        method: HttpMethod,
        path: impl Into<String>,
        operation_id: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            method,
            operation_id: operation_id.into(),
        }
    }

    pub fn get(path: impl Into<String>, operation_id: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path, operation_id)
    }

    pub fn post(path: impl Into<String>, operation_id: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, path, operation_id)
    }
}

/// Context passed to plugin methods
pub struct LedgerContext<DB: DatabaseAdapter> {
    pub config: Arc<LedgerConfig>,
    pub database: Arc<DB>,
    pub identity: Arc<dyn IdentityProvider>,
}

impl<DB: DatabaseAdapter> LedgerContext<DB> {
    pub fn new(
        config: Arc<LedgerConfig>,
        database: Arc<DB>,
        identity: Arc<dyn IdentityProvider>,
    ) -> Self {
        Self {
            config,
            database,
            identity,
        }
    }

    /// Resolve the caller, failing with `Unauthenticated` when anonymous.
    pub async fn current_identity(&self, req: &LedgerRequest) -> LedgerResult<Identity> {
        self.identity
            .resolve(req)
            .await?
            .ok_or(LedgerError::Unauthenticated)
    }
}

impl<DB: DatabaseAdapter> Clone for LedgerContext<DB> {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            database: self.database.clone(),
            identity: self.identity.clone(),
        }
    }
}
