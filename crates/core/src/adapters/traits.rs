use async_trait::async_trait;

use crate::error::LedgerResult;
use crate::query::{OrganizationQuery, PendingQuery, TransactionQuery, TripQuery, UserQuery};
use crate::types::{
    CreateOrganization, CreatePendingEmployee, CreatePendingEmployer, CreateSale, CreateTrip,
    CreateUser, CreditTransaction, Organization, PendingEmployee, PendingEmployer, SalePosting,
    Settlement, SettlePurchase, TransactionStatus, Trip, UpdateOrganization, UpdateUser, User,
};

/// User persistence operations.
#[async_trait]
pub trait UserOps: Send + Sync + 'static {
    async fn create_user(&self, user: CreateUser) -> LedgerResult<User>;
    async fn get_user_by_id(&self, id: &str) -> LedgerResult<Option<User>>;
    async fn update_user(&self, id: &str, update: UpdateUser) -> LedgerResult<User>;
    async fn delete_user(&self, id: &str) -> LedgerResult<()>;
    async fn list_users(&self, query: UserQuery) -> LedgerResult<Vec<User>>;
}

/// Pending registration persistence operations.
#[async_trait]
pub trait PendingRegistrationOps: Send + Sync + 'static {
    async fn create_pending_employer(
        &self,
        pending: CreatePendingEmployer,
    ) -> LedgerResult<PendingEmployer>;
    async fn get_pending_employer(&self, id: &str) -> LedgerResult<Option<PendingEmployer>>;
    async fn list_pending_employers(&self, query: PendingQuery)
    -> LedgerResult<Vec<PendingEmployer>>;
    async fn delete_pending_employer(&self, id: &str) -> LedgerResult<()>;

    async fn create_pending_employee(
        &self,
        pending: CreatePendingEmployee,
    ) -> LedgerResult<PendingEmployee>;
    async fn get_pending_employee(&self, id: &str) -> LedgerResult<Option<PendingEmployee>>;
    async fn list_pending_employees(&self, query: PendingQuery)
    -> LedgerResult<Vec<PendingEmployee>>;
    async fn delete_pending_employee(&self, id: &str) -> LedgerResult<()>;
}

/// Organization persistence operations.
#[async_trait]
pub trait OrganizationOps: Send + Sync + 'static {
    async fn create_organization(&self, org: CreateOrganization) -> LedgerResult<Organization>;
    async fn get_organization_by_id(&self, id: &str) -> LedgerResult<Option<Organization>>;
    async fn list_organizations(&self, query: OrganizationQuery)
    -> LedgerResult<Vec<Organization>>;
    async fn update_organization(
        &self,
        id: &str,
        update: UpdateOrganization,
    ) -> LedgerResult<Organization>;
    async fn delete_organization(&self, id: &str) -> LedgerResult<()>;
}

/// Credit transaction persistence operations.
///
/// [`post_sale`](CreditTransactionOps::post_sale) and
/// [`settle_purchase`](CreditTransactionOps::settle_purchase) touch several
/// documents and must commit all of their writes or none of them.
#[async_trait]
pub trait CreditTransactionOps: Send + Sync + 'static {
    async fn get_transaction(&self, id: &str) -> LedgerResult<Option<CreditTransaction>>;
    async fn list_transactions(
        &self,
        query: TransactionQuery,
    ) -> LedgerResult<Vec<CreditTransaction>>;

    /// Move a `pending` sale to `status`.
    ///
    /// The status check and the write happen atomically. Fails with
    /// `NotFound` for an unknown id and with `Conflict` (no write) when the
    /// sale is no longer pending.
    async fn review_sale(
        &self,
        id: &str,
        status: TransactionStatus,
    ) -> LedgerResult<CreditTransaction>;

    /// Create a `pending` sale and reserve its credits from the seller's
    /// tradable balance.
    ///
    /// Fails with `InsufficientCredits` (no writes) when the amount exceeds
    /// the seller's current `total_credits`.
    async fn post_sale(&self, sale: CreateSale) -> LedgerResult<SalePosting>;

    /// Settle a sale against a buyer.
    ///
    /// Fails without writes when the transaction is missing (`NotFound`), no
    /// longer in one of `purchasable` (`Conflict`), owned by the buyer
    /// (`BadRequest`) or when the buyer cannot pay (`InsufficientFunds`).
    async fn settle_purchase(&self, purchase: SettlePurchase) -> LedgerResult<Settlement>;
}

/// Trip persistence operations. The ledger only reads trips.
#[async_trait]
pub trait TripOps: Send + Sync + 'static {
    async fn create_trip(&self, trip: CreateTrip) -> LedgerResult<Trip>;
    async fn get_trip_by_id(&self, id: &str) -> LedgerResult<Option<Trip>>;
    async fn list_trips(&self, query: TripQuery) -> LedgerResult<Vec<Trip>>;
}
