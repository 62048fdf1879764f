use async_trait::async_trait;

use carbon_ledger_core::adapters::DatabaseAdapter;
use carbon_ledger_core::{HttpMethod, LedgerRequest, LedgerResponse};
use carbon_ledger_core::{Identity, LedgerContext, LedgerPlugin, LedgerRoute};
use carbon_ledger_core::{LedgerError, LedgerResult, Role};

use super::RejectionPolicy;
use super::helpers::{ok_json, require_role};

pub(super) mod handlers;
pub(super) mod types;

#[cfg(test)]
mod tests;

use handlers::*;
use types::*;

/// Employer plugin: credit aggregation and employee management for the
/// caller's organization.
pub struct EmployerPlugin {
    config: EmployerConfig,
}

/// Configuration for the employer plugin.
#[derive(Debug, Clone)]
pub struct EmployerConfig {
    /// Effect of rejecting a pending employee (default: mark unapproved).
    pub employee_rejection: RejectionPolicy,
}

impl Default for EmployerConfig {
    fn default() -> Self {
        Self {
            employee_rejection: RejectionPolicy::MarkUnapproved,
        }
    }
}

impl EmployerPlugin {
    pub fn new() -> Self {
        Self {
            config: EmployerConfig::default(),
        }
    }

    pub fn with_config(config: EmployerConfig) -> Self {
        Self { config }
    }

    pub fn employee_rejection(mut self, policy: RejectionPolicy) -> Self {
        self.config.employee_rejection = policy;
        self
    }
}

impl Default for EmployerPlugin {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<DB: DatabaseAdapter> LedgerPlugin<DB> for EmployerPlugin {
    fn name(&self) -> &'static str {
        "employer"
    }

    fn routes(&self) -> Vec<LedgerRoute> {
        vec![
            LedgerRoute::get("/employer/organization", "employer_organization"),
            LedgerRoute::post("/employer/refresh-credits", "employer_refresh_credits"),
            LedgerRoute::get("/employer/employees", "employer_list_employees"),
            LedgerRoute::get(
                "/employer/pending-employees",
                "employer_list_pending_employees",
            ),
            LedgerRoute::post("/employer/approve-employee", "employer_approve_employee"),
            LedgerRoute::get("/employer/employee-trips", "employer_employee_trips"),
        ]
    }

    async fn on_request(
        &self,
        req: &LedgerRequest,
        ctx: &LedgerContext<DB>,
    ) -> LedgerResult<Option<LedgerResponse>> {
        let response = match (req.method(), req.path()) {
            (HttpMethod::Get, "/employer/organization") => {
                let identity = require_employer(req, ctx).await?;
                ok_json(&organization_core(&identity, ctx).await?)?
            }
            (HttpMethod::Post, "/employer/refresh-credits") => {
                let identity = require_employer(req, ctx).await?;
                ok_json(&refresh_credits_core(&identity, ctx).await?)?
            }
            (HttpMethod::Get, "/employer/employees") => {
                let identity = require_employer(req, ctx).await?;
                ok_json(&employees_core(&identity, ctx).await?)?
            }
            (HttpMethod::Get, "/employer/pending-employees") => {
                let identity = require_employer(req, ctx).await?;
                ok_json(&pending_employees_core(&identity, ctx).await?)?
            }
            (HttpMethod::Post, "/employer/approve-employee") => {
                self.handle_approve_employee(req, ctx).await?
            }
            (HttpMethod::Get, "/employer/employee-trips") => {
                let identity = require_employer(req, ctx).await?;
                let user_id = req
                    .query_param("userId")
                    .filter(|v| !v.is_empty())
                    .ok_or_else(|| LedgerError::bad_request("userId is required"))?;
                ok_json(&employee_trips_core(user_id, &identity, ctx).await?)?
            }
            _ => return Ok(None),
        };
        Ok(Some(response))
    }
}

async fn require_employer<DB: DatabaseAdapter>(
    req: &LedgerRequest,
    ctx: &LedgerContext<DB>,
) -> LedgerResult<Identity> {
    require_role(req, ctx, &[Role::Employer]).await
}

impl EmployerPlugin {
    async fn handle_approve_employee<DB: DatabaseAdapter>(
        &self,
        req: &LedgerRequest,
        ctx: &LedgerContext<DB>,
    ) -> LedgerResult<LedgerResponse> {
        let identity = require_employer(req, ctx).await?;
        let body: ApprovalRequest = match carbon_ledger_core::validate_request_body(req) {
            Ok(v) => v,
            Err(resp) => return Ok(resp),
        };
        let response = approve_employee_core(&body, &identity, &self.config, ctx).await?;
        ok_json(&response)
    }
}
