use std::sync::Arc;

use carbon_ledger_core::{
    DatabaseAdapter, HeaderIdentityProvider, HealthCheckResponse, HttpMethod, IdentityProvider,
    LedgerConfig, LedgerContext, LedgerError, LedgerEvent, LedgerPlugin, LedgerRequest, LedgerResponse,
    LedgerResult, LedgerRoute, OkResponse,
};

/// The ledger instance, generic over the database adapter.
pub struct CarbonLedger<DB: DatabaseAdapter> {
    config: Arc<LedgerConfig>,
    plugins: Vec<Box<dyn LedgerPlugin<DB>>>,
    database: Arc<DB>,
    context: LedgerContext<DB>,
}

/// Initial builder for configuring the ledger.
///
/// Call `.database(adapter)` to obtain a [`TypedLedgerBuilder`] that can
/// accept plugins.
pub struct LedgerBuilder {
    config: LedgerConfig,
    identity: Option<Arc<dyn IdentityProvider>>,
}

/// Typed builder returned by [`LedgerBuilder::database`].
pub struct TypedLedgerBuilder<DB: DatabaseAdapter> {
    config: LedgerConfig,
    database: Arc<DB>,
    identity: Option<Arc<dyn IdentityProvider>>,
    plugins: Vec<Box<dyn LedgerPlugin<DB>>>,
}

impl LedgerBuilder {
    pub fn new(config: LedgerConfig) -> Self {
        Self {
            config,
            identity: None,
        }
    }

    /// Set the database adapter, returning a [`TypedLedgerBuilder`].
    pub fn database<DB: DatabaseAdapter>(self, database: DB) -> TypedLedgerBuilder<DB> {
        TypedLedgerBuilder {
            config: self.config,
            database: Arc::new(database),
            identity: self.identity,
            plugins: Vec::new(),
        }
    }

    /// Set how callers are identified. Defaults to [`HeaderIdentityProvider`].
    pub fn identity_provider<P: IdentityProvider + 'static>(mut self, provider: P) -> Self {
        self.identity = Some(Arc::new(provider));
        self
    }
}

impl<DB: DatabaseAdapter> TypedLedgerBuilder<DB> {
    /// Add a plugin to the ledger.
    pub fn plugin<P: LedgerPlugin<DB> + 'static>(mut self, plugin: P) -> Self {
        self.plugins.push(Box::new(plugin));
        self
    }

    /// Set how callers are identified. Defaults to [`HeaderIdentityProvider`].
    pub fn identity_provider<P: IdentityProvider + 'static>(mut self, provider: P) -> Self {
        self.identity = Some(Arc::new(provider));
        self
    }

    /// Replace the configuration.
    pub fn config(mut self, config: LedgerConfig) -> Self {
        self.config = config;
        self
    }

    /// Build the ledger instance.
    pub async fn build(self) -> LedgerResult<CarbonLedger<DB>> {
        self.config.validate()?;

        let config = Arc::new(self.config);
        let identity = self
            .identity
            .unwrap_or_else(|| Arc::new(HeaderIdentityProvider));
        let mut context = LedgerContext::new(config.clone(), self.database.clone(), identity);

        for plugin in &self.plugins {
            plugin.on_init(&mut context).await?;
        }

        let plugin_names: Vec<&str> = self.plugins.iter().map(|p| p.name()).collect();
        config.logger.log(&LedgerEvent::Ready {
            app_name: &config.app_name,
            plugins: &plugin_names,
        });

        Ok(CarbonLedger {
            config,
            plugins: self.plugins,
            database: self.database,
            context,
        })
    }
}

impl<DB: DatabaseAdapter> CarbonLedger<DB> {
    /// Handle a ledger request.
    ///
    /// Errors from plugins and core handlers are converted into
    /// `{ "message": "..." }` responses via [`LedgerError::into_response`].
    pub async fn handle_request(&self, mut req: LedgerRequest) -> LedgerResult<LedgerResponse> {
        self.strip_base_path(&mut req);
        match self.handle_request_inner(&req).await {
            Ok(response) => Ok(response),
            Err(err) => {
                if err.status_code() >= 500 {
                    self.config.logger.log(&LedgerEvent::RequestFailed {
                        method: &req.method,
                        path: &req.path,
                        error: &err,
                    });
                }
                Ok(err.into_response())
            }
        }
    }

    async fn handle_request_inner(&self, req: &LedgerRequest) -> LedgerResult<LedgerResponse> {
        if let Some(response) = self.handle_core_request(req)? {
            return Ok(response);
        }

        for plugin in &self.plugins {
            if let Some(response) = plugin.on_request(req, &self.context).await? {
                return Ok(response);
            }
        }

        Err(LedgerError::not_found("No handler found for this request"))
    }

    /// Requests may arrive with or without the configured base path.
    fn strip_base_path(&self, req: &mut LedgerRequest) {
        let base = self.config.base_path.trim_end_matches('/');
        if base.is_empty() {
            return;
        }
        if let Some(rest) = req.path.strip_prefix(base)
            && (rest.is_empty() || rest.starts_with('/'))
        {
            req.path = if rest.is_empty() {
                "/".to_string()
            } else {
                rest.to_string()
            };
        }
    }

    fn handle_core_request(&self, req: &LedgerRequest) -> LedgerResult<Option<LedgerResponse>> {
        match (req.method(), req.path()) {
            (HttpMethod::Get, "/ok") => {
                Ok(Some(LedgerResponse::json(200, &OkResponse { ok: true })?))
            }
            (HttpMethod::Get, "/health") => Ok(Some(LedgerResponse::json(
                200,
                &HealthCheckResponse {
                    status: "ok",
                    service: self.config.app_name.clone(),
                },
            )?)),
            _ => Ok(None),
        }
    }

    /// Get the configuration.
    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Get the database adapter.
    pub fn database(&self) -> &Arc<DB> {
        &self.database
    }

    /// Get the shared plugin context.
    pub fn context(&self) -> &LedgerContext<DB> {
        &self.context
    }

    /// All routes registered by plugins.
    pub fn routes(&self) -> Vec<LedgerRoute> {
        self.plugins.iter().flat_map(|p| p.routes()).collect()
    }

    /// Get all plugins.
    pub fn plugins(&self) -> &[Box<dyn LedgerPlugin<DB>>] {
        &self.plugins
    }

    /// Get plugin by name.
    pub fn get_plugin(&self, name: &str) -> Option<&dyn LedgerPlugin<DB>> {
        self.plugins
            .iter()
            .find(|p| p.name() == name)
            .map(|p| p.as_ref())
    }

    /// List all plugin names.
    pub fn plugin_names(&self) -> Vec<&'static str> {
        self.plugins.iter().map(|p| p.name()).collect()
    }
}
