use super::*;
use crate::plugins::test_helpers;
use async_trait::async_trait;
use carbon_ledger_core::adapters::{
    CreditTransactionOps, MemoryDatabaseAdapter, OrganizationOps, PendingRegistrationOps,
    TripOps, UserOps,
};
use carbon_ledger_core::{
    CreateOrganization, CreatePendingEmployee, CreatePendingEmployer, CreateSale, CreateTrip,
    CreateUser, CreditTransaction, HeaderIdentityProvider, LedgerConfig, Organization,
    OrganizationQuery, PendingEmployee, PendingEmployer, PendingQuery, SalePosting, Settlement,
    SettlePurchase, TransactionQuery, TransactionStatus, TransportMode, Trip, TripQuery,
    UpdateOrganization, UpdateUser, User, UserQuery,
};
use chrono::{TimeZone, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

async fn setup() -> (LedgerContext<MemoryDatabaseAdapter>, Organization, Identity) {
    let ctx = test_helpers::create_test_context();
    let org = test_helpers::create_organization(
        &ctx,
        CreateOrganization::new("Acme", "acme.com")
            .with_id("acme")
            .with_total_credits(40.0)
            .with_approved(true),
    )
    .await;
    let identity = test_helpers::employer_identity(&org);
    (ctx, org, identity)
}

async fn employee(
    ctx: &LedgerContext<MemoryDatabaseAdapter>,
    id: &str,
    domain: &str,
    approved: bool,
) {
    test_helpers::create_user(
        ctx,
        CreateUser::new(id.to_uppercase(), format!("{id}@{domain}"), Role::Employee)
            .with_id(id)
            .with_domain(domain)
            .with_approved(approved),
    )
    .await;
}

async fn trip(ctx: &LedgerContext<MemoryDatabaseAdapter>, user: &str, month: u32, credits: f64) {
    let date = Utc.with_ymd_and_hms(2024, month, 5, 8, 30, 0).unwrap();
    test_helpers::create_trip(
        ctx,
        CreateTrip::new(user, date, credits).with_mode(TransportMode::Cycling),
    )
    .await;
}

fn request(
    method: HttpMethod,
    path: &str,
    identity: &Identity,
    body: Option<serde_json::Value>,
) -> LedgerRequest {
    test_helpers::create_request(method, path, Some(identity), body, HashMap::new())
}

async fn call(
    ctx: &LedgerContext<MemoryDatabaseAdapter>,
    req: LedgerRequest,
) -> LedgerResult<serde_json::Value> {
    let resp = EmployerPlugin::new().on_request(&req, ctx).await?.unwrap();
    Ok(test_helpers::json_body(&resp))
}

// -----------------------------------------------------------------------
// Credit aggregation
// -----------------------------------------------------------------------

#[tokio::test]
async fn test_refresh_credits_sums_approved_employees() {
    let (ctx, org, identity) = setup().await;
    employee(&ctx, "ann", "acme.com", true).await;
    employee(&ctx, "bob", "acme.com", true).await;
    employee(&ctx, "cal", "acme.com", false).await;
    employee(&ctx, "dan", "other.com", true).await;
    trip(&ctx, "ann", 1, 2.5).await;
    trip(&ctx, "ann", 2, 1.5).await;
    trip(&ctx, "bob", 2, 3.0).await;
    trip(&ctx, "cal", 2, 50.0).await;
    trip(&ctx, "dan", 2, 70.0).await;

    let body = call(
        &ctx,
        request(HttpMethod::Post, "/employer/refresh-credits", &identity, None),
    )
    .await
    .unwrap();

    assert_eq!(body["totalCredits"], 7.0);
    assert_eq!(body["organization"]["carbonCredits"], 7.0);
    let employees = body["employees"].as_array().unwrap();
    assert_eq!(employees.len(), 2);
    assert_eq!(employees[0]["id"], "ann");
    assert_eq!(employees[0]["carbonCredits"], 4.0);
    assert_eq!(employees[1]["carbonCredits"], 3.0);

    let stored = ctx
        .database
        .get_organization_by_id(&org.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.carbon_credits, 7.0);
    // The trading balance is untouched.
    assert_eq!(stored.total_credits, 40.0);

    // Per-employee totals are never written back.
    let ann = ctx.database.get_user_by_id("ann").await.unwrap().unwrap();
    assert_eq!(ann.carbon_credits, 0.0);
}

#[tokio::test]
async fn test_refresh_credits_without_employees_resets_to_zero() {
    let (ctx, org, identity) = setup().await;
    ctx.database
        .update_organization(
            &org.id,
            carbon_ledger_core::UpdateOrganization {
                carbon_credits: Some(12.0),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let body = call(
        &ctx,
        request(HttpMethod::Post, "/employer/refresh-credits", &identity, None),
    )
    .await
    .unwrap();

    assert_eq!(body["totalCredits"], 0.0);
    assert!(body["employees"].as_array().unwrap().is_empty());
    let stored = ctx
        .database
        .get_organization_by_id(&org.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.carbon_credits, 0.0);
}

/// Memory adapter that counts trip queries.
#[derive(Default)]
struct TripQueryCounter {
    inner: MemoryDatabaseAdapter,
    trip_queries: AtomicUsize,
}

#[async_trait]
impl UserOps for TripQueryCounter {
    async fn create_user(&self, user: CreateUser) -> LedgerResult<User> {
        self.inner.create_user(user).await
    }
    async fn get_user_by_id(&self, id: &str) -> LedgerResult<Option<User>> {
        self.inner.get_user_by_id(id).await
    }
    async fn update_user(&self, id: &str, update: UpdateUser) -> LedgerResult<User> {
        self.inner.update_user(id, update).await
    }
    async fn delete_user(&self, id: &str) -> LedgerResult<()> {
        self.inner.delete_user(id).await
    }
    async fn list_users(&self, query: UserQuery) -> LedgerResult<Vec<User>> {
        self.inner.list_users(query).await
    }
}

#[async_trait]
impl PendingRegistrationOps for TripQueryCounter {
    async fn create_pending_employer(
        &self,
        pending: CreatePendingEmployer,
    ) -> LedgerResult<PendingEmployer> {
        self.inner.create_pending_employer(pending).await
    }
    async fn get_pending_employer(&self, id: &str) -> LedgerResult<Option<PendingEmployer>> {
        self.inner.get_pending_employer(id).await
    }
    async fn list_pending_employers(
        &self,
        query: PendingQuery,
    ) -> LedgerResult<Vec<PendingEmployer>> {
        self.inner.list_pending_employers(query).await
    }
    async fn delete_pending_employer(&self, id: &str) -> LedgerResult<()> {
        self.inner.delete_pending_employer(id).await
    }
    async fn create_pending_employee(
        &self,
        pending: CreatePendingEmployee,
    ) -> LedgerResult<PendingEmployee> {
        self.inner.create_pending_employee(pending).await
    }
    async fn get_pending_employee(&self, id: &str) -> LedgerResult<Option<PendingEmployee>> {
        self.inner.get_pending_employee(id).await
    }
    async fn list_pending_employees(
        &self,
        query: PendingQuery,
    ) -> LedgerResult<Vec<PendingEmployee>> {
        self.inner.list_pending_employees(query).await
    }
    async fn delete_pending_employee(&self, id: &str) -> LedgerResult<()> {
        self.inner.delete_pending_employee(id).await
    }
}

#[async_trait]
impl OrganizationOps for TripQueryCounter {
    async fn create_organization(&self, org: CreateOrganization) -> LedgerResult<Organization> {
        self.inner.create_organization(org).await
    }
    async fn get_organization_by_id(&self, id: &str) -> LedgerResult<Option<Organization>> {
        self.inner.get_organization_by_id(id).await
    }
    async fn list_organizations(
        &self,
        query: OrganizationQuery,
    ) -> LedgerResult<Vec<Organization>> {
        self.inner.list_organizations(query).await
    }
    async fn update_organization(
        &self,
        id: &str,
        update: UpdateOrganization,
    ) -> LedgerResult<Organization> {
        self.inner.update_organization(id, update).await
    }
    async fn delete_organization(&self, id: &str) -> LedgerResult<()> {
        self.inner.delete_organization(id).await
    }
}

#[async_trait]
impl CreditTransactionOps for TripQueryCounter {
    async fn get_transaction(&self, id: &str) -> LedgerResult<Option<CreditTransaction>> {
        self.inner.get_transaction(id).await
    }
    async fn list_transactions(
        &self,
        query: TransactionQuery,
    ) -> LedgerResult<Vec<CreditTransaction>> {
        self.inner.list_transactions(query).await
    }
    async fn review_sale(
        &self,
        id: &str,
        status: TransactionStatus,
    ) -> LedgerResult<CreditTransaction> {
        self.inner.review_sale(id, status).await
    }
    async fn post_sale(&self, sale: CreateSale) -> LedgerResult<SalePosting> {
        self.inner.post_sale(sale).await
    }
    async fn settle_purchase(&self, purchase: SettlePurchase) -> LedgerResult<Settlement> {
        self.inner.settle_purchase(purchase).await
    }
}

#[async_trait]
impl TripOps for TripQueryCounter {
    async fn create_trip(&self, trip: CreateTrip) -> LedgerResult<Trip> {
        self.inner.create_trip(trip).await
    }
    async fn get_trip_by_id(&self, id: &str) -> LedgerResult<Option<Trip>> {
        self.inner.get_trip_by_id(id).await
    }
    async fn list_trips(&self, query: TripQuery) -> LedgerResult<Vec<Trip>> {
        self.trip_queries.fetch_add(1, Ordering::SeqCst);
        self.inner.list_trips(query).await
    }
}

async fn refresh_with_counter(db: TripQueryCounter) -> (Arc<TripQueryCounter>, serde_json::Value) {
    let db = Arc::new(db);
    let ctx = LedgerContext::new(
        Arc::new(LedgerConfig::new()),
        db.clone(),
        Arc::new(HeaderIdentityProvider),
    );
    let org = db
        .get_organization_by_id("acme")
        .await
        .unwrap()
        .unwrap();
    let req = request(
        HttpMethod::Post,
        "/employer/refresh-credits",
        &test_helpers::employer_identity(&org),
        None,
    );
    let resp = EmployerPlugin::new()
        .on_request(&req, &ctx)
        .await
        .unwrap()
        .unwrap();
    (db, test_helpers::json_body(&resp))
}

async fn counter_with_org() -> TripQueryCounter {
    let db = TripQueryCounter::default();
    db.create_organization(
        CreateOrganization::new("Acme", "acme.com")
            .with_id("acme")
            .with_approved(true),
    )
    .await
    .unwrap();
    let stale = UpdateOrganization {
        carbon_credits: Some(12.0),
        ..Default::default()
    };
    db.update_organization("acme", stale).await.unwrap();
    db
}

#[tokio::test]
async fn test_refresh_credits_without_employees_skips_trip_query() {
    let db = counter_with_org().await;
    // Unapproved and foreign employees do not count.
    db.create_user(
        CreateUser::new("Cal", "cal@acme.com", Role::Employee)
            .with_id("cal")
            .with_domain("acme.com"),
    )
    .await
    .unwrap();

    let (db, body) = refresh_with_counter(db).await;
    assert_eq!(body["totalCredits"], 0.0);
    assert_eq!(body["organization"]["carbonCredits"], 0.0);
    assert_eq!(db.trip_queries.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_refresh_credits_queries_trips_once() {
    let db = counter_with_org().await;
    db.create_user(
        CreateUser::new("Ann", "ann@acme.com", Role::Employee)
            .with_id("ann")
            .with_domain("acme.com")
            .with_approved(true),
    )
    .await
    .unwrap();

    let (db, body) = refresh_with_counter(db).await;
    assert_eq!(body["totalCredits"], 0.0);
    assert_eq!(db.trip_queries.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_organization_resolved_by_domain() {
    let (ctx, _org, _) = setup().await;
    let identity = Identity::new("boss", Role::Employer).with_domain("acme.com");

    let body = call(
        &ctx,
        request(HttpMethod::Get, "/employer/organization", &identity, None),
    )
    .await
    .unwrap();
    assert_eq!(body["organization"]["id"], "acme");
}

#[tokio::test]
async fn test_employee_role_cannot_use_employer_routes() {
    let (ctx, _org, _) = setup().await;
    let identity = Identity::new("ann", Role::Employee).with_domain("acme.com");

    let err = call(
        &ctx,
        request(HttpMethod::Get, "/employer/employees", &identity, None),
    )
    .await
    .unwrap_err();
    assert_eq!(err.status_code(), 403);
}

// -----------------------------------------------------------------------
// Employee management
// -----------------------------------------------------------------------

#[tokio::test]
async fn test_pending_list_excludes_already_approved() {
    let (ctx, _org, identity) = setup().await;
    test_helpers::create_pending_employee(&ctx, "new", "acme.com").await;
    test_helpers::create_pending_employee(&ctx, "old", "acme.com").await;
    test_helpers::create_pending_employee(&ctx, "far", "other.com").await;
    employee(&ctx, "old", "acme.com", true).await;

    let body = call(
        &ctx,
        request(HttpMethod::Get, "/employer/pending-employees", &identity, None),
    )
    .await
    .unwrap();
    let pending = body["pendingEmployees"].as_array().unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0]["id"], "new");
}

#[tokio::test]
async fn test_pending_list_hides_records_by_approved_user_id_only() {
    let (ctx, _org, identity) = setup().await;
    test_helpers::create_pending_employee(&ctx, "boss", "acme.com").await;
    test_helpers::create_pending_employee(&ctx, "wait", "acme.com").await;
    test_helpers::create_pending_employee(&ctx, "twin", "acme.com").await;
    // An approved user of any role hides the record with the same id.
    test_helpers::create_user(
        &ctx,
        CreateUser::new("Boss", "boss@acme.com", Role::Employer)
            .with_id("boss")
            .with_domain("acme.com")
            .with_approved(true),
    )
    .await;
    employee(&ctx, "wait", "acme.com", false).await;
    // Same email, different id: the record stays listed.
    test_helpers::create_user(
        &ctx,
        CreateUser::new("Twin", "twin@acme.com", Role::Employee)
            .with_id("twin-2")
            .with_domain("acme.com")
            .with_approved(true),
    )
    .await;

    let body = call(
        &ctx,
        request(HttpMethod::Get, "/employer/pending-employees", &identity, None),
    )
    .await
    .unwrap();
    let mut ids: Vec<&str> = body["pendingEmployees"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_str().unwrap())
        .collect();
    ids.sort();
    assert_eq!(ids, vec!["twin", "wait"]);
}

#[tokio::test]
async fn test_approve_creates_missing_user() {
    let (ctx, org, identity) = setup().await;
    let pending = test_helpers::create_pending_employee(&ctx, "new", "acme.com").await;

    let body = call(
        &ctx,
        request(
            HttpMethod::Post,
            "/employer/approve-employee",
            &identity,
            Some(serde_json::json!({ "pendingId": "new", "approve": true })),
        ),
    )
    .await
    .unwrap();
    assert_eq!(body["approved"], true);

    let user = ctx.database.get_user_by_id("new").await.unwrap().unwrap();
    assert!(user.approved);
    assert_eq!(user.role, Role::Employee);
    assert_eq!(user.name, pending.full_name);
    assert_eq!(user.domain.as_deref(), Some("acme.com"));
    assert_eq!(user.organization_id.as_deref(), Some(org.id.as_str()));
    assert_eq!(user.created_at, pending.created_at);
    assert!(user.last_login.is_some());
    assert!(
        ctx.database
            .get_pending_employee("new")
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn test_approve_flips_existing_user() {
    let (ctx, _org, identity) = setup().await;
    employee(&ctx, "old", "acme.com", false).await;
    test_helpers::create_pending_employee(&ctx, "old", "acme.com").await;

    call(
        &ctx,
        request(
            HttpMethod::Post,
            "/employer/approve-employee",
            &identity,
            Some(serde_json::json!({ "pendingId": "old", "approve": true })),
        ),
    )
    .await
    .unwrap();

    let user = ctx.database.get_user_by_id("old").await.unwrap().unwrap();
    assert!(user.approved);
    assert!(user.last_login.is_some());
}

#[tokio::test]
async fn test_reject_marks_unapproved_by_default() {
    let (ctx, _org, identity) = setup().await;
    employee(&ctx, "old", "acme.com", true).await;
    test_helpers::create_pending_employee(&ctx, "old", "acme.com").await;

    call(
        &ctx,
        request(
            HttpMethod::Post,
            "/employer/approve-employee",
            &identity,
            Some(serde_json::json!({ "pendingId": "old", "approve": false })),
        ),
    )
    .await
    .unwrap();

    let user = ctx.database.get_user_by_id("old").await.unwrap().unwrap();
    assert!(!user.approved);
    assert!(
        ctx.database
            .get_pending_employee("old")
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn test_reject_with_delete_policy() {
    let (ctx, _org, identity) = setup().await;
    employee(&ctx, "old", "acme.com", false).await;
    test_helpers::create_pending_employee(&ctx, "old", "acme.com").await;

    let plugin = EmployerPlugin::new().employee_rejection(RejectionPolicy::Delete);
    let req = request(
        HttpMethod::Post,
        "/employer/approve-employee",
        &identity,
        Some(serde_json::json!({ "pendingId": "old", "approve": false })),
    );
    plugin.on_request(&req, &ctx).await.unwrap().unwrap();

    assert!(ctx.database.get_user_by_id("old").await.unwrap().is_none());
}

#[tokio::test]
async fn test_cannot_approve_other_domain() {
    let (ctx, _org, identity) = setup().await;
    test_helpers::create_pending_employee(&ctx, "far", "other.com").await;

    let err = call(
        &ctx,
        request(
            HttpMethod::Post,
            "/employer/approve-employee",
            &identity,
            Some(serde_json::json!({ "pendingId": "far", "approve": true })),
        ),
    )
    .await
    .unwrap_err();
    assert_eq!(err.status_code(), 403);
    assert!(ctx.database.get_user_by_id("far").await.unwrap().is_none());
    assert!(
        ctx.database
            .get_pending_employee("far")
            .await
            .unwrap()
            .is_some()
    );
}

// -----------------------------------------------------------------------
// Trip history
// -----------------------------------------------------------------------

#[tokio::test]
async fn test_employee_trips_history() {
    let (ctx, _org, identity) = setup().await;
    employee(&ctx, "ann", "acme.com", true).await;
    trip(&ctx, "ann", 1, 2.0).await;
    trip(&ctx, "ann", 3, 1.0).await;
    trip(&ctx, "ann", 3, 1.5).await;

    let mut req = request(HttpMethod::Get, "/employer/employee-trips", &identity, None);
    req.query.insert("userId".into(), "ann".into());
    let body = call(&ctx, req).await.unwrap();

    assert_eq!(body["totalCredits"], 4.5);
    assert_eq!(body["trips"].as_array().unwrap().len(), 3);
    assert_eq!(body["monthly"][0]["month"], "1/2024");
    assert_eq!(body["monthly"][1]["credits"], 2.5);
    assert_eq!(body["byTransportMode"]["cycling"], 4.5);
}

#[tokio::test]
async fn test_employee_trips_of_other_domain_not_found() {
    let (ctx, _org, identity) = setup().await;
    employee(&ctx, "dan", "other.com", true).await;

    let mut req = request(HttpMethod::Get, "/employer/employee-trips", &identity, None);
    req.query.insert("userId".into(), "dan".into());
    let err = call(&ctx, req).await.unwrap_err();
    assert_eq!(err.status_code(), 404);
}

#[tokio::test]
async fn test_employee_trips_requires_user_id() {
    let (ctx, _org, identity) = setup().await;
    let req = request(HttpMethod::Get, "/employer/employee-trips", &identity, None);
    let err = call(&ctx, req).await.unwrap_err();
    assert_eq!(err.status_code(), 400);
}
