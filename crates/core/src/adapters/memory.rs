use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use uuid::Uuid;

use crate::error::{LedgerError, LedgerResult};
use crate::query::{OrganizationQuery, PendingQuery, TransactionQuery, TripQuery, UserQuery};
use crate::types::{
    CreateOrganization, CreatePendingEmployee, CreatePendingEmployer, CreateSale, CreateTrip,
    CreateUser, CreditTransaction, Organization, PendingEmployee, PendingEmployer, SalePosting,
    Settlement, SettlePurchase, TransactionStatus, Trip, UpdateOrganization, UpdateUser, User,
};

use super::memory_traits::{MemoryRecord, MemoryUpdate};
use super::not_reviewable;
use super::traits::{
    CreditTransactionOps, OrganizationOps, PendingRegistrationOps, TripOps, UserOps,
};

type Collection<T> = Arc<Mutex<HashMap<String, T>>>;

/// In-memory database adapter for testing and development.
///
/// Collections are independent `Mutex`-guarded maps. Operations that span
/// organizations and transactions always take the `organizations` lock before
/// the `transactions` lock.
#[derive(Clone)]
pub struct MemoryDatabaseAdapter {
    users: Collection<User>,
    pending_employers: Collection<PendingEmployer>,
    pending_employees: Collection<PendingEmployee>,
    organizations: Collection<Organization>,
    transactions: Collection<CreditTransaction>,
    trips: Collection<Trip>,
}

impl MemoryDatabaseAdapter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Default for MemoryDatabaseAdapter {
    fn default() -> Self {
        Self {
            users: Arc::new(Mutex::new(HashMap::new())),
            pending_employers: Arc::new(Mutex::new(HashMap::new())),
            pending_employees: Arc::new(Mutex::new(HashMap::new())),
            organizations: Arc::new(Mutex::new(HashMap::new())),
            transactions: Arc::new(Mutex::new(HashMap::new())),
            trips: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

fn lock<T>(collection: &Mutex<HashMap<String, T>>) -> LedgerResult<MutexGuard<'_, HashMap<String, T>>> {
    collection
        .lock()
        .map_err(|_| LedgerError::internal("memory adapter lock poisoned"))
}

fn new_id(id: &Option<String>) -> String {
    id.clone().unwrap_or_else(|| Uuid::new_v4().to_string())
}

fn insert<T: MemoryRecord>(
    collection: &Mutex<HashMap<String, T>>,
    id: &Option<String>,
    create: &T::Create,
) -> LedgerResult<T> {
    let mut records = lock(collection)?;
    let id = new_id(id);
    if records.contains_key(&id) {
        return Err(LedgerError::conflict(format!("Record {} already exists", id)));
    }
    let record = T::from_create(id.clone(), create, Utc::now());
    records.insert(id, record.clone());
    Ok(record)
}

fn apply_limit<T>(mut items: Vec<T>, limit: Option<usize>) -> Vec<T> {
    if let Some(limit) = limit {
        items.truncate(limit);
    }
    items
}

#[async_trait]
impl UserOps for MemoryDatabaseAdapter {
    async fn create_user(&self, user: CreateUser) -> LedgerResult<User> {
        insert(&self.users, &user.id, &user)
    }

    async fn get_user_by_id(&self, id: &str) -> LedgerResult<Option<User>> {
        Ok(lock(&self.users)?.get(id).cloned())
    }

    async fn update_user(&self, id: &str, update: UpdateUser) -> LedgerResult<User> {
        let mut users = lock(&self.users)?;
        let user = users
            .get_mut(id)
            .ok_or_else(|| LedgerError::not_found("User not found"))?;
        user.apply_update(&update);
        Ok(user.clone())
    }

    async fn delete_user(&self, id: &str) -> LedgerResult<()> {
        lock(&self.users)?.remove(id);
        Ok(())
    }

    async fn list_users(&self, query: UserQuery) -> LedgerResult<Vec<User>> {
        let users = lock(&self.users)?;
        let mut matched: Vec<User> = users
            .values()
            .filter(|u| query.domain.is_none() || u.domain == query.domain)
            .filter(|u| query.role.is_none_or(|role| u.role == role))
            .filter(|u| query.approved.is_none_or(|approved| u.approved == approved))
            .cloned()
            .collect();

        if query.order_by_name {
            matched.sort_by(|a, b| a.name.cmp(&b.name));
        } else {
            matched.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        }
        Ok(apply_limit(matched, query.limit))
    }
}

#[async_trait]
impl PendingRegistrationOps for MemoryDatabaseAdapter {
    async fn create_pending_employer(
        &self,
        pending: CreatePendingEmployer,
    ) -> LedgerResult<PendingEmployer> {
        insert(&self.pending_employers, &pending.id, &pending)
    }

    async fn get_pending_employer(&self, id: &str) -> LedgerResult<Option<PendingEmployer>> {
        Ok(lock(&self.pending_employers)?.get(id).cloned())
    }

    async fn list_pending_employers(
        &self,
        query: PendingQuery,
    ) -> LedgerResult<Vec<PendingEmployer>> {
        let pending = lock(&self.pending_employers)?;
        let mut matched: Vec<PendingEmployer> = pending
            .values()
            .filter(|p| {
                query
                    .domain
                    .as_deref()
                    .is_none_or(|d| p.organization_domain == d)
            })
            .cloned()
            .collect();
        matched.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(matched)
    }

    async fn delete_pending_employer(&self, id: &str) -> LedgerResult<()> {
        lock(&self.pending_employers)?.remove(id);
        Ok(())
    }

    async fn create_pending_employee(
        &self,
        pending: CreatePendingEmployee,
    ) -> LedgerResult<PendingEmployee> {
        insert(&self.pending_employees, &pending.id, &pending)
    }

    async fn get_pending_employee(&self, id: &str) -> LedgerResult<Option<PendingEmployee>> {
        Ok(lock(&self.pending_employees)?.get(id).cloned())
    }

    async fn list_pending_employees(
        &self,
        query: PendingQuery,
    ) -> LedgerResult<Vec<PendingEmployee>> {
        let pending = lock(&self.pending_employees)?;
        let mut matched: Vec<PendingEmployee> = pending
            .values()
            .filter(|p| query.domain.as_deref().is_none_or(|d| p.domain == d))
            .cloned()
            .collect();
        matched.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(matched)
    }

    async fn delete_pending_employee(&self, id: &str) -> LedgerResult<()> {
        lock(&self.pending_employees)?.remove(id);
        Ok(())
    }
}

#[async_trait]
impl OrganizationOps for MemoryDatabaseAdapter {
    async fn create_organization(&self, org: CreateOrganization) -> LedgerResult<Organization> {
        insert(&self.organizations, &org.id, &org)
    }

    async fn get_organization_by_id(&self, id: &str) -> LedgerResult<Option<Organization>> {
        Ok(lock(&self.organizations)?.get(id).cloned())
    }

    async fn list_organizations(
        &self,
        query: OrganizationQuery,
    ) -> LedgerResult<Vec<Organization>> {
        let orgs = lock(&self.organizations)?;
        let mut matched: Vec<Organization> = orgs
            .values()
            .filter(|o| query.domain.as_deref().is_none_or(|d| o.domain == d))
            .filter(|o| query.approved.is_none_or(|approved| o.approved == approved))
            .cloned()
            .collect();

        if query.order_by_name {
            matched.sort_by(|a, b| a.name.cmp(&b.name));
        } else {
            matched.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        }
        Ok(matched)
    }

    async fn update_organization(
        &self,
        id: &str,
        update: UpdateOrganization,
    ) -> LedgerResult<Organization> {
        let mut orgs = lock(&self.organizations)?;
        let org = orgs
            .get_mut(id)
            .ok_or_else(|| LedgerError::not_found("Organization not found"))?;
        org.apply_update(&update);
        Ok(org.clone())
    }

    async fn delete_organization(&self, id: &str) -> LedgerResult<()> {
        lock(&self.organizations)?.remove(id);
        Ok(())
    }
}

#[async_trait]
impl CreditTransactionOps for MemoryDatabaseAdapter {
    async fn get_transaction(&self, id: &str) -> LedgerResult<Option<CreditTransaction>> {
        Ok(lock(&self.transactions)?.get(id).cloned())
    }

    async fn list_transactions(
        &self,
        query: TransactionQuery,
    ) -> LedgerResult<Vec<CreditTransaction>> {
        let transactions = lock(&self.transactions)?;
        let mut matched: Vec<CreditTransaction> = transactions
            .values()
            .filter(|t| query.matches_status(t.status))
            .filter(|t| {
                query.involving_org.as_deref().is_none_or(|org_id| {
                    t.seller_org_id == org_id || t.buyer_org_id.as_deref() == Some(org_id)
                })
            })
            .cloned()
            .collect();

        if query.newest_first {
            matched.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        } else {
            matched.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        }
        Ok(apply_limit(matched, query.limit))
    }

    async fn review_sale(
        &self,
        id: &str,
        status: TransactionStatus,
    ) -> LedgerResult<CreditTransaction> {
        let mut transactions = lock(&self.transactions)?;
        let transaction = transactions
            .get_mut(id)
            .ok_or_else(|| LedgerError::not_found("Transaction not found"))?;
        if transaction.status != TransactionStatus::Pending {
            return Err(not_reviewable(transaction.status));
        }
        transaction.status = status;
        Ok(transaction.clone())
    }

    async fn post_sale(&self, sale: CreateSale) -> LedgerResult<SalePosting> {
        let mut orgs = lock(&self.organizations)?;
        let mut transactions = lock(&self.transactions)?;

        let seller = orgs
            .get_mut(&sale.seller_org_id)
            .ok_or_else(|| LedgerError::not_found("Organization not found"))?;

        if sale.credit_amount > seller.total_credits {
            return Err(LedgerError::InsufficientCredits {
                requested: sale.credit_amount,
                available: seller.total_credits,
            });
        }

        let transaction = CreditTransaction {
            id: Uuid::new_v4().to_string(),
            seller_org_id: seller.id.clone(),
            seller_org_name: seller.name.clone(),
            buyer_org_id: None,
            buyer_org_name: None,
            credit_amount: sale.credit_amount,
            price: sale.price,
            status: TransactionStatus::Pending,
            created_at: Utc::now(),
            completed_at: None,
        };
        seller.total_credits -= sale.credit_amount;
        transactions.insert(transaction.id.clone(), transaction.clone());

        Ok(SalePosting {
            transaction,
            seller: seller.clone(),
        })
    }

    async fn settle_purchase(&self, purchase: SettlePurchase) -> LedgerResult<Settlement> {
        let mut orgs = lock(&self.organizations)?;
        let mut transactions = lock(&self.transactions)?;

        let transaction = transactions
            .get(&purchase.transaction_id)
            .ok_or_else(|| LedgerError::not_found("Transaction not found"))?;

        if !purchase.purchasable.contains(&transaction.status) {
            return Err(LedgerError::conflict(format!(
                "Transaction is {} and can no longer be purchased",
                transaction.status
            )));
        }
        if transaction.seller_org_id == purchase.buyer_org_id {
            return Err(LedgerError::bad_request(
                "You cannot purchase your own credits",
            ));
        }

        let buyer = orgs
            .get(&purchase.buyer_org_id)
            .ok_or_else(|| LedgerError::not_found("Organization not found"))?;
        let total_price = transaction.total_price();
        if buyer.available_money < total_price {
            return Err(LedgerError::InsufficientFunds {
                required: total_price,
                available: buyer.available_money,
            });
        }

        // All checks passed; nothing below can fail.
        let credit_amount = transaction.credit_amount;
        let seller_org_id = transaction.seller_org_id.clone();

        let buyer = match orgs.get_mut(&purchase.buyer_org_id) {
            Some(buyer) => {
                buyer.total_credits += credit_amount;
                buyer.available_money -= total_price;
                buyer.clone()
            }
            None => return Err(LedgerError::not_found("Organization not found")),
        };

        let seller = orgs.get_mut(&seller_org_id).map(|seller| {
            seller.total_credits = (seller.total_credits - credit_amount).max(0.0);
            seller.available_money += total_price;
            seller.clone()
        });

        let transaction = match transactions.get_mut(&purchase.transaction_id) {
            Some(transaction) => {
                transaction.status = TransactionStatus::Completed;
                transaction.buyer_org_id = Some(buyer.id.clone());
                transaction.buyer_org_name = Some(buyer.name.clone());
                transaction.completed_at = Some(Utc::now());
                transaction.clone()
            }
            None => return Err(LedgerError::not_found("Transaction not found")),
        };

        Ok(Settlement {
            transaction,
            buyer,
            seller,
            total_price,
        })
    }
}

#[async_trait]
impl TripOps for MemoryDatabaseAdapter {
    async fn create_trip(&self, trip: CreateTrip) -> LedgerResult<Trip> {
        insert(&self.trips, &trip.id, &trip)
    }

    async fn get_trip_by_id(&self, id: &str) -> LedgerResult<Option<Trip>> {
        Ok(lock(&self.trips)?.get(id).cloned())
    }

    async fn list_trips(&self, query: TripQuery) -> LedgerResult<Vec<Trip>> {
        let trips = lock(&self.trips)?;
        let mut matched: Vec<Trip> = trips
            .values()
            .filter(|t| {
                query
                    .user_ids
                    .as_ref()
                    .is_none_or(|ids| ids.contains(&t.user_id))
            })
            .cloned()
            .collect();

        if query.newest_first {
            matched.sort_by(|a, b| b.trip_date.cmp(&a.trip_date));
        } else {
            matched.sort_by(|a, b| a.trip_date.cmp(&b.trip_date));
        }
        Ok(apply_limit(matched, query.limit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Role;
    use chrono::{Duration, TimeZone};

    async fn org(db: &MemoryDatabaseAdapter, id: &str, credits: f64, money: f64) -> Organization {
        db.create_organization(
            CreateOrganization::new(id.to_uppercase(), format!("{id}.com"))
                .with_id(id)
                .with_total_credits(credits)
                .with_available_money(money)
                .with_approved(true),
        )
        .await
        .unwrap()
    }

    fn purchase(tx: &str, buyer: &str) -> SettlePurchase {
        SettlePurchase {
            transaction_id: tx.to_string(),
            buyer_org_id: buyer.to_string(),
            purchasable: TransactionStatus::purchasable(false),
        }
    }

    #[tokio::test]
    async fn test_list_users_filters_and_orders_by_name() {
        let db = MemoryDatabaseAdapter::new();
        for (name, domain, approved) in [
            ("Zed", "acme.com", true),
            ("Amy", "acme.com", true),
            ("Bob", "acme.com", false),
            ("Cat", "other.com", true),
        ] {
            db.create_user(
                CreateUser::new(name, format!("{name}@{domain}"), Role::Employee)
                    .with_domain(domain)
                    .with_approved(approved),
            )
            .await
            .unwrap();
        }

        let users = db
            .list_users(UserQuery::approved_employees("acme.com").order_by_name())
            .await
            .unwrap();
        let names: Vec<_> = users.iter().map(|u| u.name.as_str()).collect();
        assert_eq!(names, vec!["Amy", "Zed"]);
    }

    #[tokio::test]
    async fn test_create_with_existing_id_conflicts() {
        let db = MemoryDatabaseAdapter::new();
        org(&db, "acme", 0.0, 0.0).await;
        let err = db
            .create_organization(CreateOrganization::new("Again", "acme.com").with_id("acme"))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 409);
    }

    #[tokio::test]
    async fn test_list_trips_membership_and_limit() {
        let db = MemoryDatabaseAdapter::new();
        let base = Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap();
        for (i, user) in ["a", "b", "a", "c"].iter().enumerate() {
            db.create_trip(CreateTrip::new(*user, base + Duration::days(i as i64), 1.0))
                .await
                .unwrap();
        }

        let trips = db
            .list_trips(TripQuery::new().user_ids(["a", "b"]).newest_first())
            .await
            .unwrap();
        assert_eq!(trips.len(), 3);
        assert!(trips.windows(2).all(|w| w[0].trip_date >= w[1].trip_date));

        let none = db
            .list_trips(TripQuery::new().user_ids(Vec::<String>::new()))
            .await
            .unwrap();
        assert!(none.is_empty());

        let limited = db.list_trips(TripQuery::new().limit(2)).await.unwrap();
        assert_eq!(limited.len(), 2);
    }

    #[tokio::test]
    async fn test_post_sale_reserves_credits() {
        let db = MemoryDatabaseAdapter::new();
        org(&db, "seller", 100.0, 0.0).await;

        let posting = db
            .post_sale(CreateSale {
                seller_org_id: "seller".into(),
                credit_amount: 30.0,
                price: 2.0,
            })
            .await
            .unwrap();

        assert_eq!(posting.seller.total_credits, 70.0);
        assert_eq!(posting.transaction.status, TransactionStatus::Pending);
        assert_eq!(posting.transaction.seller_org_name, "SELLER");
        assert!(posting.transaction.buyer_org_id.is_none());
    }

    #[tokio::test]
    async fn test_post_sale_over_balance_writes_nothing() {
        let db = MemoryDatabaseAdapter::new();
        org(&db, "seller", 10.0, 0.0).await;

        let err = db
            .post_sale(CreateSale {
                seller_org_id: "seller".into(),
                credit_amount: 10.5,
                price: 2.0,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, LedgerError::InsufficientCredits { .. }));
        let seller = db.get_organization_by_id("seller").await.unwrap().unwrap();
        assert_eq!(seller.total_credits, 10.0);
        assert!(
            db.list_transactions(TransactionQuery::new())
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn test_settle_purchase_moves_credits_and_money() {
        let db = MemoryDatabaseAdapter::new();
        org(&db, "seller", 50.0, 10.0).await;
        org(&db, "buyer", 5.0, 500.0).await;
        let tx = db
            .post_sale(CreateSale {
                seller_org_id: "seller".into(),
                credit_amount: 20.0,
                price: 3.0,
            })
            .await
            .unwrap()
            .transaction;

        let settlement = db.settle_purchase(purchase(&tx.id, "buyer")).await.unwrap();

        assert_eq!(settlement.total_price, 60.0);
        assert_eq!(settlement.buyer.total_credits, 25.0);
        assert_eq!(settlement.buyer.available_money, 440.0);
        let seller = settlement.seller.unwrap();
        // 50 - 20 reserved at posting, then floor-clamped decrement on settlement.
        assert_eq!(seller.total_credits, 10.0);
        assert_eq!(seller.available_money, 70.0);
        assert_eq!(settlement.transaction.status, TransactionStatus::Completed);
        assert_eq!(settlement.transaction.buyer_org_name.as_deref(), Some("BUYER"));
        assert!(settlement.transaction.completed_at.is_some());
    }

    #[tokio::test]
    async fn test_settle_purchase_insufficient_funds_writes_nothing() {
        let db = MemoryDatabaseAdapter::new();
        org(&db, "seller", 50.0, 0.0).await;
        org(&db, "buyer", 0.0, 59.99).await;
        let tx = db
            .post_sale(CreateSale {
                seller_org_id: "seller".into(),
                credit_amount: 20.0,
                price: 3.0,
            })
            .await
            .unwrap()
            .transaction;

        let err = db.settle_purchase(purchase(&tx.id, "buyer")).await.unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientFunds { .. }));

        let buyer = db.get_organization_by_id("buyer").await.unwrap().unwrap();
        assert_eq!(buyer.available_money, 59.99);
        let tx = db.get_transaction(&tx.id).await.unwrap().unwrap();
        assert_eq!(tx.status, TransactionStatus::Pending);
    }

    #[tokio::test]
    async fn test_settle_purchase_with_missing_seller_still_settles_buyer() {
        let db = MemoryDatabaseAdapter::new();
        org(&db, "seller", 50.0, 0.0).await;
        org(&db, "buyer", 0.0, 100.0).await;
        let tx = db
            .post_sale(CreateSale {
                seller_org_id: "seller".into(),
                credit_amount: 10.0,
                price: 1.0,
            })
            .await
            .unwrap()
            .transaction;
        db.delete_organization("seller").await.unwrap();

        let settlement = db.settle_purchase(purchase(&tx.id, "buyer")).await.unwrap();
        assert!(settlement.seller.is_none());
        assert_eq!(settlement.buyer.total_credits, 10.0);
    }

    #[tokio::test]
    async fn test_own_sale_cannot_be_purchased() {
        let db = MemoryDatabaseAdapter::new();
        org(&db, "seller", 50.0, 1000.0).await;
        let tx = db
            .post_sale(CreateSale {
                seller_org_id: "seller".into(),
                credit_amount: 10.0,
                price: 1.0,
            })
            .await
            .unwrap()
            .transaction;

        let err = db.settle_purchase(purchase(&tx.id, "seller")).await.unwrap_err();
        assert_eq!(err.status_code(), 400);
    }

    #[tokio::test]
    async fn test_concurrent_purchases_settle_once() {
        let db = MemoryDatabaseAdapter::new();
        org(&db, "seller", 50.0, 0.0).await;
        org(&db, "buyer-a", 0.0, 1000.0).await;
        org(&db, "buyer-b", 0.0, 1000.0).await;
        let tx = db
            .post_sale(CreateSale {
                seller_org_id: "seller".into(),
                credit_amount: 10.0,
                price: 5.0,
            })
            .await
            .unwrap()
            .transaction;

        let a = {
            let db = db.clone();
            let id = tx.id.clone();
            tokio::spawn(async move { db.settle_purchase(purchase(&id, "buyer-a")).await })
        };
        let b = {
            let db = db.clone();
            let id = tx.id.clone();
            tokio::spawn(async move { db.settle_purchase(purchase(&id, "buyer-b")).await })
        };
        let results = [a.await.unwrap(), b.await.unwrap()];

        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        let conflict = results.iter().find_map(|r| r.as_ref().err()).unwrap();
        assert_eq!(conflict.status_code(), 409);

        let seller = db.get_organization_by_id("seller").await.unwrap().unwrap();
        assert_eq!(seller.available_money, 50.0);
    }

    #[tokio::test]
    async fn test_approved_only_purchasable_when_review_required() {
        let db = MemoryDatabaseAdapter::new();
        org(&db, "seller", 50.0, 0.0).await;
        org(&db, "buyer", 0.0, 1000.0).await;
        let tx = db
            .post_sale(CreateSale {
                seller_org_id: "seller".into(),
                credit_amount: 10.0,
                price: 1.0,
            })
            .await
            .unwrap()
            .transaction;

        let reviewed = SettlePurchase {
            purchasable: TransactionStatus::purchasable(true),
            ..purchase(&tx.id, "buyer")
        };
        let err = db.settle_purchase(reviewed.clone()).await.unwrap_err();
        assert_eq!(err.status_code(), 409);

        db.review_sale(&tx.id, TransactionStatus::Approved)
            .await
            .unwrap();
        assert!(db.settle_purchase(reviewed).await.is_ok());
    }

    #[tokio::test]
    async fn test_review_cannot_overwrite_settled_sale() {
        let db = MemoryDatabaseAdapter::new();
        org(&db, "seller", 50.0, 0.0).await;
        org(&db, "buyer", 0.0, 1000.0).await;
        let tx = db
            .post_sale(CreateSale {
                seller_org_id: "seller".into(),
                credit_amount: 10.0,
                price: 1.0,
            })
            .await
            .unwrap()
            .transaction;

        // A reviewer read the sale while it was pending, then a purchase
        // settled it before the review was written.
        assert_eq!(tx.status, TransactionStatus::Pending);
        db.settle_purchase(purchase(&tx.id, "buyer")).await.unwrap();

        let err = db
            .review_sale(&tx.id, TransactionStatus::Rejected)
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 409);
        let stored = db.get_transaction(&tx.id).await.unwrap().unwrap();
        assert_eq!(stored.status, TransactionStatus::Completed);

        let err = db
            .review_sale("missing", TransactionStatus::Approved)
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 404);
    }
}
