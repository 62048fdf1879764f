//! Shared harness for workspace-level tests.
//!
//! [`TestLedger`] wraps a `CarbonLedger` over the in-memory adapter with all
//! three plugins mounted, plus seeding helpers and request builders that
//! attach gateway identity headers.

use std::sync::atomic::{AtomicU64, Ordering};

use carbon_ledger::adapters::{MemoryDatabaseAdapter, OrganizationOps, TripOps, UserOps};
use carbon_ledger::identity::{
    ORGANIZATION_ID_HEADER, USER_DOMAIN_HEADER, USER_ID_HEADER, USER_ROLE_HEADER,
};
use carbon_ledger::plugins::{AdminPlugin, EmployerPlugin, MarketplacePlugin};
use carbon_ledger::{
    CarbonLedger, CreateOrganization, CreateTrip, CreateUser, HttpMethod, Identity, LedgerBuilder,
    LedgerConfig, LedgerRequest, Organization, Role,
};
use serde_json::Value;

static ID_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Generate a unique identifier for seeded records.
pub fn unique_id(prefix: &str) -> String {
    let n = ID_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("{prefix}-{n}")
}

pub struct TestLedger {
    pub ledger: CarbonLedger<MemoryDatabaseAdapter>,
}

#[allow(dead_code)]
impl TestLedger {
    pub async fn new() -> Self {
        Self::with_config(LedgerConfig::new()).await
    }

    pub async fn with_config(config: LedgerConfig) -> Self {
        let ledger = LedgerBuilder::new(config)
            .database(MemoryDatabaseAdapter::new())
            .plugin(AdminPlugin::new())
            .plugin(EmployerPlugin::new())
            .plugin(MarketplacePlugin::new())
            .build()
            .await
            .expect("Failed to create test ledger");
        Self { ledger }
    }

    pub fn db(&self) -> &MemoryDatabaseAdapter {
        self.ledger.database()
    }

    /// Seed an approved organization with the given balances.
    pub async fn organization(&self, name: &str, credits: f64, money: f64) -> Organization {
        let id = unique_id(&name.to_lowercase());
        self.db()
            .create_organization(
                CreateOrganization::new(name, format!("{id}.test"))
                    .with_id(id)
                    .with_total_credits(credits)
                    .with_available_money(money)
                    .with_approved(true),
            )
            .await
            .expect("Failed to seed organization")
    }

    /// Seed an approved employee of `org`, returning its id.
    pub async fn employee(&self, org: &Organization, name: &str) -> String {
        let id = unique_id(&name.to_lowercase());
        self.db()
            .create_user(
                CreateUser::new(name, format!("{id}@{}", org.domain), Role::Employee)
                    .with_id(id.clone())
                    .with_domain(org.domain.clone())
                    .with_organization_id(org.id.clone())
                    .with_approved(true),
            )
            .await
            .expect("Failed to seed employee");
        id
    }

    pub async fn trip(&self, user_id: &str, credits: f64) {
        self.db()
            .create_trip(CreateTrip::new(user_id, chrono::Utc::now(), credits))
            .await
            .expect("Failed to seed trip");
    }

    pub async fn reload(&self, org: &Organization) -> Organization {
        self.db()
            .get_organization_by_id(&org.id)
            .await
            .expect("Failed to read organization")
            .expect("Organization missing")
    }

    /// Send a request and return `(status, json body)`.
    pub async fn send(&self, req: LedgerRequest) -> (u16, Value) {
        let response = self
            .ledger
            .handle_request(req)
            .await
            .expect("handle_request failed");
        let body = serde_json::from_slice(&response.body).unwrap_or(Value::Null);
        (response.status, body)
    }
}

#[allow(dead_code)]
pub fn employer(org: &Organization) -> Identity {
    Identity::new(format!("boss-{}", org.id), Role::Employer)
        .with_domain(org.domain.clone())
        .with_organization_id(org.id.clone())
}

#[allow(dead_code)]
pub fn admin() -> Identity {
    Identity::new("admin", Role::Admin)
}

fn with_identity(mut req: LedgerRequest, identity: &Identity) -> LedgerRequest {
    req = req
        .with_header(USER_ID_HEADER, identity.uid.clone())
        .with_header(USER_ROLE_HEADER, identity.role.as_str());
    if let Some(domain) = &identity.domain {
        req = req.with_header(USER_DOMAIN_HEADER, domain.clone());
    }
    if let Some(org_id) = &identity.organization_id {
        req = req.with_header(ORGANIZATION_ID_HEADER, org_id.clone());
    }
    req
}

#[allow(dead_code)]
pub fn get_as(path: &str, identity: &Identity) -> LedgerRequest {
    with_identity(LedgerRequest::new(HttpMethod::Get, path), identity)
}

#[allow(dead_code)]
pub fn post_as(path: &str, identity: &Identity, body: Value) -> LedgerRequest {
    with_identity(LedgerRequest::new(HttpMethod::Post, path), identity).with_json(&body)
}
