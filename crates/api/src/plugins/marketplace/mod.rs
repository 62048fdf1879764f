use async_trait::async_trait;

use carbon_ledger_core::adapters::DatabaseAdapter;
use carbon_ledger_core::{HttpMethod, LedgerRequest, LedgerResponse};
use carbon_ledger_core::{Identity, LedgerContext, LedgerPlugin, LedgerRoute};
use carbon_ledger_core::{LedgerResult, Role};

use super::helpers::{ok_json, require_role};

pub(super) mod handlers;
pub(super) mod types;


use handlers::*;
use types::*;

/// Marketplace plugin: organizations post credit sales and buy each other's.
///
/// Trading endpoints act for the calling employer's organization. Sale review
/// is reserved to [`MarketplaceConfig::reviewer_roles`].
pub struct MarketplacePlugin {
    config: MarketplaceConfig,
}

/// Configuration for the marketplace plugin.
#[derive(Debug, Clone)]
pub struct MarketplaceConfig {
    /// Roles allowed to approve or reject posted sales
    /// (default: `bank`, `admin`, `system_admin`).
    pub reviewer_roles: Vec<Role>,
}

impl Default for MarketplaceConfig {
    fn default() -> Self {
        Self {
            reviewer_roles: vec![Role::Bank, Role::Admin, Role::SystemAdmin],
        }
    }
}

impl MarketplacePlugin {
    pub fn new() -> Self {
        Self {
            config: MarketplaceConfig::default(),
        }
    }

    pub fn with_config(config: MarketplaceConfig) -> Self {
        Self { config }
    }

    pub fn reviewer_roles(mut self, roles: impl IntoIterator<Item = Role>) -> Self {
        self.config.reviewer_roles = roles.into_iter().collect();
        self
    }
}

impl Default for MarketplacePlugin {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<DB: DatabaseAdapter> LedgerPlugin<DB> for MarketplacePlugin {
    fn name(&self) -> &'static str {
        "marketplace"
    }

    fn routes(&self) -> Vec<LedgerRoute> {
        vec![
            LedgerRoute::get("/marketplace/sales", "marketplace_list_sales"),
            LedgerRoute::get("/marketplace/transactions", "marketplace_list_transactions"),
            LedgerRoute::post("/marketplace/sell", "marketplace_sell"),
            LedgerRoute::post("/marketplace/purchase", "marketplace_purchase"),
            LedgerRoute::post("/marketplace/review-sale", "marketplace_review_sale"),
        ]
    }

    async fn on_request(
        &self,
        req: &LedgerRequest,
        ctx: &LedgerContext<DB>,
    ) -> LedgerResult<Option<LedgerResponse>> {
        let response = match (req.method(), req.path()) {
            (HttpMethod::Get, "/marketplace/sales") => {
                let identity = require_trader(req, ctx).await?;
                ok_json(&list_sales_core(&identity, ctx).await?)?
            }
            (HttpMethod::Get, "/marketplace/transactions") => {
                let identity = require_trader(req, ctx).await?;
                ok_json(&list_transactions_core(&identity, ctx).await?)?
            }
            (HttpMethod::Post, "/marketplace/sell") => self.handle_sell(req, ctx).await?,
            (HttpMethod::Post, "/marketplace/purchase") => self.handle_purchase(req, ctx).await?,
            (HttpMethod::Post, "/marketplace/review-sale") => {
                self.handle_review_sale(req, ctx).await?
            }
            _ => return Ok(None),
        };
        Ok(Some(response))
    }
}

async fn require_trader<DB: DatabaseAdapter>(
    req: &LedgerRequest,
    ctx: &LedgerContext<DB>,
) -> LedgerResult<Identity> {
    require_role(req, ctx, &[Role::Employer]).await
}

impl MarketplacePlugin {
    async fn handle_sell<DB: DatabaseAdapter>(
        &self,
        req: &LedgerRequest,
        ctx: &LedgerContext<DB>,
    ) -> LedgerResult<LedgerResponse> {
        let identity = require_trader(req, ctx).await?;
        let body: SellRequest = match carbon_ledger_core::validate_request_body(req) {
            Ok(v) => v,
            Err(resp) => return Ok(resp),
        };
        ok_json(&sell_core(&body, &identity, ctx).await?)
    }

    async fn handle_purchase<DB: DatabaseAdapter>(
        &self,
        req: &LedgerRequest,
        ctx: &LedgerContext<DB>,
    ) -> LedgerResult<LedgerResponse> {
        let identity = require_trader(req, ctx).await?;
        let body: PurchaseRequest = match carbon_ledger_core::validate_request_body(req) {
            Ok(v) => v,
            Err(resp) => return Ok(resp),
        };
        ok_json(&purchase_core(&body, &identity, ctx).await?)
    }

    async fn handle_review_sale<DB: DatabaseAdapter>(
        &self,
        req: &LedgerRequest,
        ctx: &LedgerContext<DB>,
    ) -> LedgerResult<LedgerResponse> {
        require_role(req, ctx, &self.config.reviewer_roles).await?;
        let body: ReviewSaleRequest = match carbon_ledger_core::validate_request_body(req) {
            Ok(v) => v,
            Err(resp) => return Ok(resp),
        };
        ok_json(&review_sale_core(&body, ctx).await?)
    }
}
