use std::collections::HashMap;
use std::sync::Arc;

use carbon_ledger_core::adapters::{
    MemoryDatabaseAdapter, OrganizationOps, PendingRegistrationOps, TripOps, UserOps,
};
use carbon_ledger_core::identity::{
    ORGANIZATION_ID_HEADER, USER_DOMAIN_HEADER, USER_ID_HEADER, USER_ROLE_HEADER,
};
use carbon_ledger_core::{
    CreateOrganization, CreatePendingEmployee, CreatePendingEmployer, CreateTrip, CreateUser,
    HeaderIdentityProvider, HttpMethod, Identity, LedgerConfig, LedgerContext, LedgerRequest,
    LedgerResponse, Organization, PendingEmployee, PendingEmployer, Role, Trip, User,
};

pub(crate) fn create_test_context() -> LedgerContext<MemoryDatabaseAdapter> {
    create_test_context_with_config(LedgerConfig::new())
}

pub(crate) fn create_test_context_with_config(
    config: LedgerConfig,
) -> LedgerContext<MemoryDatabaseAdapter> {
    LedgerContext::new(
        Arc::new(config),
        Arc::new(MemoryDatabaseAdapter::new()),
        Arc::new(HeaderIdentityProvider),
    )
}

pub(crate) async fn create_user(
    ctx: &LedgerContext<MemoryDatabaseAdapter>,
    create: CreateUser,
) -> User {
    ctx.database.create_user(create).await.unwrap()
}

pub(crate) async fn create_organization(
    ctx: &LedgerContext<MemoryDatabaseAdapter>,
    create: CreateOrganization,
) -> Organization {
    ctx.database.create_organization(create).await.unwrap()
}

pub(crate) async fn create_trip(
    ctx: &LedgerContext<MemoryDatabaseAdapter>,
    create: CreateTrip,
) -> Trip {
    ctx.database.create_trip(create).await.unwrap()
}

pub(crate) async fn create_pending_employer(
    ctx: &LedgerContext<MemoryDatabaseAdapter>,
    id: &str,
    organization_name: &str,
    organization_domain: &str,
) -> PendingEmployer {
    ctx.database
        .create_pending_employer(CreatePendingEmployer {
            id: Some(id.to_string()),
            full_name: format!("{id} Boss"),
            email: format!("{id}@{organization_domain}"),
            organization_name: organization_name.to_string(),
            organization_domain: organization_domain.to_string(),
        })
        .await
        .unwrap()
}

pub(crate) async fn create_pending_employee(
    ctx: &LedgerContext<MemoryDatabaseAdapter>,
    id: &str,
    domain: &str,
) -> PendingEmployee {
    ctx.database
        .create_pending_employee(CreatePendingEmployee {
            id: Some(id.to_string()),
            full_name: format!("{id} Worker"),
            email: format!("{id}@{domain}"),
            domain: domain.to_string(),
            organization_id: None,
        })
        .await
        .unwrap()
}

/// Build a request carrying gateway identity headers for `identity`.
pub(crate) fn create_request(
    method: HttpMethod,
    path: &str,
    identity: Option<&Identity>,
    body: Option<serde_json::Value>,
    query: HashMap<String, String>,
) -> LedgerRequest {
    let mut req = LedgerRequest::new(method, path);
    req.query = query;
    if let Some(identity) = identity {
        req = req
            .with_header(USER_ID_HEADER, identity.uid.clone())
            .with_header(USER_ROLE_HEADER, identity.role.as_str());
        if let Some(domain) = &identity.domain {
            req = req.with_header(USER_DOMAIN_HEADER, domain.clone());
        }
        if let Some(org_id) = &identity.organization_id {
            req = req.with_header(ORGANIZATION_ID_HEADER, org_id.clone());
        }
    }
    if let Some(body) = body {
        req = req.with_json(&body);
    }
    req
}

pub(crate) fn admin_identity() -> Identity {
    Identity::new("admin-1", Role::Admin)
}

pub(crate) fn employer_identity(org: &Organization) -> Identity {
    Identity::new(format!("boss-{}", org.id), Role::Employer)
        .with_domain(org.domain.clone())
        .with_organization_id(org.id.clone())
}

pub(crate) fn json_body(resp: &LedgerResponse) -> serde_json::Value {
    serde_json::from_slice(&resp.body).unwrap()
}
