use async_trait::async_trait;

use carbon_ledger_core::adapters::DatabaseAdapter;
use carbon_ledger_core::{HttpMethod, LedgerRequest, LedgerResponse};
use carbon_ledger_core::{LedgerContext, LedgerPlugin, LedgerRoute};
use carbon_ledger_core::{LedgerResult, Role};

use super::RejectionPolicy;
use super::helpers::{ok_json as json, require_role};

pub(super) mod handlers;
pub(super) mod types;


use handlers::*;
use types::*;

// ---------------------------------------------------------------------------
// Plugin & config
// ---------------------------------------------------------------------------

/// Admin plugin: system-wide listings and registration approval.
///
/// All endpoints require a caller holding one of [`AdminConfig::admin_roles`].
pub struct AdminPlugin {
    config: AdminConfig,
}

/// Configuration for the admin plugin.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// Roles allowed to use admin endpoints (default: `admin`, `system_admin`).
    pub admin_roles: Vec<Role>,
    /// Effect of rejecting a pending employee (default: delete the user).
    pub employee_rejection: RejectionPolicy,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            admin_roles: vec![Role::Admin, Role::SystemAdmin],
            employee_rejection: RejectionPolicy::Delete,
        }
    }
}

impl AdminPlugin {
    pub fn new() -> Self {
        Self {
            config: AdminConfig::default(),
        }
    }

    pub fn with_config(config: AdminConfig) -> Self {
        Self { config }
    }

    pub fn admin_roles(mut self, roles: impl IntoIterator<Item = Role>) -> Self {
        self.config.admin_roles = roles.into_iter().collect();
        self
    }

    pub fn employee_rejection(mut self, policy: RejectionPolicy) -> Self {
        self.config.employee_rejection = policy;
        self
    }
}

impl Default for AdminPlugin {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Plugin trait implementation
// ---------------------------------------------------------------------------

#[async_trait]
impl<DB: DatabaseAdapter> LedgerPlugin<DB> for AdminPlugin {
    fn name(&self) -> &'static str {
        "admin"
    }

    fn routes(&self) -> Vec<LedgerRoute> {
        vec![
            LedgerRoute::get("/admin/overview", "admin_overview"),
            LedgerRoute::get("/admin/organizations", "admin_list_organizations"),
            LedgerRoute::get("/admin/users", "admin_list_users"),
            LedgerRoute::get("/admin/transactions", "admin_list_transactions"),
            LedgerRoute::get("/admin/trips", "admin_list_trips"),
            LedgerRoute::get("/admin/pending-employers", "admin_list_pending_employers"),
            LedgerRoute::get("/admin/pending-employees", "admin_list_pending_employees"),
            LedgerRoute::post("/admin/approve-employer", "admin_approve_employer"),
            LedgerRoute::post("/admin/approve-employee", "admin_approve_employee"),
        ]
    }

    async fn on_request(
        &self,
        req: &LedgerRequest,
        ctx: &LedgerContext<DB>,
    ) -> LedgerResult<Option<LedgerResponse>> {
        match (req.method(), req.path()) {
            (HttpMethod::Get, "/admin/overview") => {
                self.require_admin(req, ctx).await?;
                Ok(Some(json(&overview_core(ctx).await?)?))
            }
            (HttpMethod::Get, "/admin/organizations") => {
                self.require_admin(req, ctx).await?;
                let items = list_organizations_core(ctx).await?;
                Ok(Some(json(&ListResponse::from(items))?))
            }
            (HttpMethod::Get, "/admin/users") => {
                self.require_admin(req, ctx).await?;
                let items = list_users_core(ctx).await?;
                Ok(Some(json(&ListResponse::from(items))?))
            }
            (HttpMethod::Get, "/admin/transactions") => {
                self.require_admin(req, ctx).await?;
                let items = list_transactions_core(ctx).await?;
                Ok(Some(json(&ListResponse::from(items))?))
            }
            (HttpMethod::Get, "/admin/trips") => {
                self.require_admin(req, ctx).await?;
                let items = list_trips_core(ctx).await?;
                Ok(Some(json(&ListResponse::from(items))?))
            }
            (HttpMethod::Get, "/admin/pending-employers") => {
                self.require_admin(req, ctx).await?;
                let items = list_pending_employers_core(ctx).await?;
                Ok(Some(json(&ListResponse::from(items))?))
            }
            (HttpMethod::Get, "/admin/pending-employees") => {
                self.require_admin(req, ctx).await?;
                let items = list_pending_employees_core(ctx).await?;
                Ok(Some(json(&ListResponse::from(items))?))
            }
            (HttpMethod::Post, "/admin/approve-employer") => {
                Ok(Some(self.handle_approve_employer(req, ctx).await?))
            }
            (HttpMethod::Post, "/admin/approve-employee") => {
                Ok(Some(self.handle_approve_employee(req, ctx).await?))
            }
            _ => Ok(None),
        }
    }
}

// ---------------------------------------------------------------------------
// Handler implementations
// ---------------------------------------------------------------------------

impl AdminPlugin {
    async fn require_admin<DB: DatabaseAdapter>(
        &self,
        req: &LedgerRequest,
        ctx: &LedgerContext<DB>,
    ) -> LedgerResult<()> {
        require_role(req, ctx, &self.config.admin_roles).await?;
        Ok(())
    }

    async fn handle_approve_employer<DB: DatabaseAdapter>(
        &self,
        req: &LedgerRequest,
        ctx: &LedgerContext<DB>,
    ) -> LedgerResult<LedgerResponse> {
        self.require_admin(req, ctx).await?;
        let body: ApprovalRequest = match carbon_ledger_core::validate_request_body(req) {
            Ok(v) => v,
            Err(resp) => return Ok(resp),
        };
        let response = approve_employer_core(&body, ctx).await?;
        json(&response)
    }

    async fn handle_approve_employee<DB: DatabaseAdapter>(
        &self,
        req: &LedgerRequest,
        ctx: &LedgerContext<DB>,
    ) -> LedgerResult<LedgerResponse> {
        self.require_admin(req, ctx).await?;
        let body: ApprovalRequest = match carbon_ledger_core::validate_request_body(req) {
            Ok(v) => v,
            Err(resp) => return Ok(resp),
        };
        let response = approve_employee_core(&body, &self.config, ctx).await?;
        json(&response)
    }
}
