pub use super::traits::{
    CreditTransactionOps, OrganizationOps, PendingRegistrationOps, TripOps, UserOps,
};

/// Database adapter trait for persistence.
///
/// Combines all entity-specific operation traits. Any type that implements
/// all sub-traits automatically implements `DatabaseAdapter` via the blanket
/// impl.
///
/// Use the sub-traits directly when you only need a subset of operations
/// (e.g., code that only reads trips).
pub trait DatabaseAdapter:
    UserOps + PendingRegistrationOps + OrganizationOps + CreditTransactionOps + TripOps
{
}

impl<T> DatabaseAdapter for T where
    T: UserOps + PendingRegistrationOps + OrganizationOps + CreditTransactionOps + TripOps
{
}

#[cfg(feature = "sqlx-postgres")]
pub mod sqlx_adapter {
    use super::*;
    use async_trait::async_trait;
    use chrono::Utc;
    use sqlx::{PgPool, Postgres, QueryBuilder};
    use uuid::Uuid;

    use crate::adapters::not_reviewable;
    use crate::error::{DatabaseError, LedgerError, LedgerResult};
    use crate::query::{OrganizationQuery, PendingQuery, TransactionQuery, TripQuery, UserQuery};
    use crate::types::{
        CreateOrganization, CreatePendingEmployee, CreatePendingEmployer, CreateSale, CreateTrip,
        CreateUser, CreditTransaction, Organization, PendingEmployee, PendingEmployer,
        SalePosting, Settlement, SettlePurchase, TransactionStatus, Trip, UpdateOrganization,
        UpdateUser, User,
    };

    /// Tables used by [`SqlxAdapter`]. Applied by [`SqlxAdapter::migrate`].
    pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    email TEXT NOT NULL,
    role TEXT NOT NULL,
    domain TEXT,
    organization_id TEXT,
    approved BOOLEAN NOT NULL DEFAULT FALSE,
    carbon_credits DOUBLE PRECISION NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL,
    last_login TIMESTAMPTZ
);
CREATE INDEX IF NOT EXISTS users_domain_role_idx ON users (domain, role, approved);

CREATE TABLE IF NOT EXISTS pending_employers (
    id TEXT PRIMARY KEY,
    full_name TEXT NOT NULL,
    email TEXT NOT NULL,
    organization_name TEXT NOT NULL,
    organization_domain TEXT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL
);

CREATE TABLE IF NOT EXISTS pending_employees (
    id TEXT PRIMARY KEY,
    full_name TEXT NOT NULL,
    email TEXT NOT NULL,
    domain TEXT NOT NULL,
    organization_id TEXT,
    created_at TIMESTAMPTZ NOT NULL
);

CREATE TABLE IF NOT EXISTS organizations (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    domain TEXT NOT NULL,
    total_credits DOUBLE PRECISION NOT NULL DEFAULT 0,
    carbon_credits DOUBLE PRECISION NOT NULL DEFAULT 0,
    available_money DOUBLE PRECISION NOT NULL DEFAULT 0,
    approved BOOLEAN NOT NULL DEFAULT FALSE,
    created_at TIMESTAMPTZ NOT NULL
);

CREATE TABLE IF NOT EXISTS credit_transactions (
    id TEXT PRIMARY KEY,
    seller_org_id TEXT NOT NULL,
    seller_org_name TEXT NOT NULL,
    buyer_org_id TEXT,
    buyer_org_name TEXT,
    credit_amount DOUBLE PRECISION NOT NULL,
    price DOUBLE PRECISION NOT NULL,
    status TEXT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL,
    completed_at TIMESTAMPTZ
);
CREATE INDEX IF NOT EXISTS credit_transactions_status_idx ON credit_transactions (status);

CREATE TABLE IF NOT EXISTS trips (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL,
    start_latitude DOUBLE PRECISION,
    start_longitude DOUBLE PRECISION,
    end_latitude DOUBLE PRECISION,
    end_longitude DOUBLE PRECISION,
    start_address TEXT,
    end_address TEXT,
    start_time TIMESTAMPTZ,
    end_time TIMESTAMPTZ,
    trip_date TIMESTAMPTZ NOT NULL,
    distance_km DOUBLE PRECISION NOT NULL DEFAULT 0,
    transport_mode TEXT NOT NULL,
    carbon_credits DOUBLE PRECISION NOT NULL DEFAULT 0,
    is_work_from_home BOOLEAN NOT NULL DEFAULT FALSE
);
CREATE INDEX IF NOT EXISTS trips_user_idx ON trips (user_id, trip_date);
"#;

    /// PostgreSQL database adapter via SQLx.
    ///
    /// `post_sale` and `settle_purchase` run inside one database transaction
    /// and lock the affected rows with `SELECT ... FOR UPDATE`.
    #[derive(Clone)]
    pub struct SqlxAdapter {
        pool: PgPool,
    }

    impl SqlxAdapter {
        pub async fn new(database_url: &str) -> Result<Self, sqlx::Error> {
            let pool = PgPool::connect(database_url).await?;
            Ok(Self { pool })
        }

        pub async fn with_config(
            database_url: &str,
            config: PoolConfig,
        ) -> Result<Self, sqlx::Error> {
            let pool = sqlx::postgres::PgPoolOptions::new()
                .max_connections(config.max_connections)
                .min_connections(config.min_connections)
                .acquire_timeout(config.acquire_timeout)
                .idle_timeout(config.idle_timeout)
                .max_lifetime(config.max_lifetime)
                .connect(database_url)
                .await?;
            Ok(Self { pool })
        }

        pub fn from_pool(pool: PgPool) -> Self {
            Self { pool }
        }

        /// Create the ledger tables if they do not exist.
        pub async fn migrate(&self) -> Result<(), sqlx::Error> {
            sqlx::raw_sql(SCHEMA).execute(&self.pool).await?;
            Ok(())
        }

        pub async fn test_connection(&self) -> Result<(), sqlx::Error> {
            sqlx::query("SELECT 1").execute(&self.pool).await?;
            Ok(())
        }

        pub fn pool_stats(&self) -> PoolStats {
            PoolStats {
                size: self.pool.size(),
                idle: self.pool.num_idle(),
            }
        }

        pub async fn close(&self) {
            self.pool.close().await;
        }
    }

    #[derive(Debug, Clone)]
    pub struct PoolConfig {
        pub max_connections: u32,
        pub min_connections: u32,
        pub acquire_timeout: std::time::Duration,
        pub idle_timeout: Option<std::time::Duration>,
        pub max_lifetime: Option<std::time::Duration>,
    }

    impl Default for PoolConfig {
        fn default() -> Self {
            Self {
                max_connections: 10,
                min_connections: 0,
                acquire_timeout: std::time::Duration::from_secs(30),
                idle_timeout: Some(std::time::Duration::from_secs(600)),
                max_lifetime: Some(std::time::Duration::from_secs(1800)),
            }
        }
    }

    #[derive(Debug, Clone)]
    pub struct PoolStats {
        pub size: u32,
        pub idle: usize,
    }

    fn id_or_new(id: Option<String>) -> String {
        id.unwrap_or_else(|| Uuid::new_v4().to_string())
    }

    /// Begin and commit failures surface as [`DatabaseError::Transaction`].
    fn transaction_error(err: sqlx::Error) -> LedgerError {
        LedgerError::Database(DatabaseError::Transaction(err.to_string()))
    }

    fn push_limit(query: &mut QueryBuilder<'_, Postgres>, limit: Option<usize>) {
        if let Some(limit) = limit {
            query.push(" LIMIT ");
            query.push_bind(limit as i64);
        }
    }

    // -- UserOps --

    #[async_trait]
    impl UserOps for SqlxAdapter {
        async fn create_user(&self, user: CreateUser) -> LedgerResult<User> {
            let created = sqlx::query_as::<_, User>(
                r#"
                INSERT INTO users (id, name, email, role, domain, organization_id, approved, carbon_credits, created_at, last_login)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                RETURNING *
                "#,
            )
            .bind(id_or_new(user.id))
            .bind(&user.name)
            .bind(&user.email)
            .bind(user.role.as_str())
            .bind(&user.domain)
            .bind(&user.organization_id)
            .bind(user.approved)
            .bind(user.carbon_credits)
            .bind(user.created_at.unwrap_or_else(Utc::now))
            .bind(user.last_login)
            .fetch_one(&self.pool)
            .await?;
            Ok(created)
        }

        async fn get_user_by_id(&self, id: &str) -> LedgerResult<Option<User>> {
            let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
            Ok(user)
        }

        async fn update_user(&self, id: &str, update: UpdateUser) -> LedgerResult<User> {
            let mut query = QueryBuilder::<Postgres>::new("UPDATE users SET id = id");

            if let Some(name) = &update.name {
                query.push(", name = ").push_bind(name);
            }
            if let Some(email) = &update.email {
                query.push(", email = ").push_bind(email);
            }
            if let Some(role) = update.role {
                query.push(", role = ").push_bind(role.as_str());
            }
            if let Some(domain) = &update.domain {
                query.push(", domain = ").push_bind(domain);
            }
            if let Some(organization_id) = &update.organization_id {
                query.push(", organization_id = ").push_bind(organization_id);
            }
            if let Some(approved) = update.approved {
                query.push(", approved = ").push_bind(approved);
            }
            if let Some(carbon_credits) = update.carbon_credits {
                query.push(", carbon_credits = ").push_bind(carbon_credits);
            }
            if let Some(last_login) = update.last_login {
                query.push(", last_login = ").push_bind(last_login);
            }

            query.push(" WHERE id = ").push_bind(id).push(" RETURNING *");

            query
                .build_query_as::<User>()
                .fetch_optional(&self.pool)
                .await?
                .ok_or_else(|| LedgerError::not_found("User not found"))
        }

        async fn delete_user(&self, id: &str) -> LedgerResult<()> {
            sqlx::query("DELETE FROM users WHERE id = $1")
                .bind(id)
                .execute(&self.pool)
                .await?;
            Ok(())
        }

        async fn list_users(&self, q: UserQuery) -> LedgerResult<Vec<User>> {
            let mut query = QueryBuilder::<Postgres>::new("SELECT * FROM users WHERE TRUE");
            if let Some(domain) = &q.domain {
                query.push(" AND domain = ").push_bind(domain);
            }
            if let Some(role) = q.role {
                query.push(" AND role = ").push_bind(role.as_str());
            }
            if let Some(approved) = q.approved {
                query.push(" AND approved = ").push_bind(approved);
            }
            query.push(if q.order_by_name {
                " ORDER BY name ASC"
            } else {
                " ORDER BY created_at ASC"
            });
            push_limit(&mut query, q.limit);

            let users = query.build_query_as::<User>().fetch_all(&self.pool).await?;
            Ok(users)
        }
    }

    // -- PendingRegistrationOps --

    #[async_trait]
    impl PendingRegistrationOps for SqlxAdapter {
        async fn create_pending_employer(
            &self,
            pending: CreatePendingEmployer,
        ) -> LedgerResult<PendingEmployer> {
            let created = sqlx::query_as::<_, PendingEmployer>(
                r#"
                INSERT INTO pending_employers (id, full_name, email, organization_name, organization_domain, created_at)
                VALUES ($1, $2, $3, $4, $5, $6)
                RETURNING *
                "#,
            )
            .bind(id_or_new(pending.id))
            .bind(&pending.full_name)
            .bind(&pending.email)
            .bind(&pending.organization_name)
            .bind(&pending.organization_domain)
            .bind(Utc::now())
            .fetch_one(&self.pool)
            .await?;
            Ok(created)
        }

        async fn get_pending_employer(&self, id: &str) -> LedgerResult<Option<PendingEmployer>> {
            let pending = sqlx::query_as::<_, PendingEmployer>(
                "SELECT * FROM pending_employers WHERE id = $1",
            )
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
            Ok(pending)
        }

        async fn list_pending_employers(
            &self,
            q: PendingQuery,
        ) -> LedgerResult<Vec<PendingEmployer>> {
            let mut query =
                QueryBuilder::<Postgres>::new("SELECT * FROM pending_employers WHERE TRUE");
            if let Some(domain) = &q.domain {
                query.push(" AND organization_domain = ").push_bind(domain);
            }
            query.push(" ORDER BY created_at ASC");
            let pending = query
                .build_query_as::<PendingEmployer>()
                .fetch_all(&self.pool)
                .await?;
            Ok(pending)
        }

        async fn delete_pending_employer(&self, id: &str) -> LedgerResult<()> {
            sqlx::query("DELETE FROM pending_employers WHERE id = $1")
                .bind(id)
                .execute(&self.pool)
                .await?;
            Ok(())
        }

        async fn create_pending_employee(
            &self,
            pending: CreatePendingEmployee,
        ) -> LedgerResult<PendingEmployee> {
            let created = sqlx::query_as::<_, PendingEmployee>(
                r#"
                INSERT INTO pending_employees (id, full_name, email, domain, organization_id, created_at)
                VALUES ($1, $2, $3, $4, $5, $6)
                RETURNING *
                "#,
            )
            .bind(id_or_new(pending.id))
            .bind(&pending.full_name)
            .bind(&pending.email)
            .bind(&pending.domain)
            .bind(&pending.organization_id)
            .bind(Utc::now())
            .fetch_one(&self.pool)
            .await?;
            Ok(created)
        }

        async fn get_pending_employee(&self, id: &str) -> LedgerResult<Option<PendingEmployee>> {
            let pending = sqlx::query_as::<_, PendingEmployee>(
                "SELECT * FROM pending_employees WHERE id = $1",
            )
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
            Ok(pending)
        }

        async fn list_pending_employees(
            &self,
            q: PendingQuery,
        ) -> LedgerResult<Vec<PendingEmployee>> {
            let mut query =
                QueryBuilder::<Postgres>::new("SELECT * FROM pending_employees WHERE TRUE");
            if let Some(domain) = &q.domain {
                query.push(" AND domain = ").push_bind(domain);
            }
            query.push(" ORDER BY created_at ASC");
            let pending = query
                .build_query_as::<PendingEmployee>()
                .fetch_all(&self.pool)
                .await?;
            Ok(pending)
        }

        async fn delete_pending_employee(&self, id: &str) -> LedgerResult<()> {
            sqlx::query("DELETE FROM pending_employees WHERE id = $1")
                .bind(id)
                .execute(&self.pool)
                .await?;
            Ok(())
        }
    }

    // -- OrganizationOps --

    #[async_trait]
    impl OrganizationOps for SqlxAdapter {
        async fn create_organization(&self, org: CreateOrganization) -> LedgerResult<Organization> {
            let created = sqlx::query_as::<_, Organization>(
                r#"
                INSERT INTO organizations (id, name, domain, total_credits, carbon_credits, available_money, approved, created_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                RETURNING *
                "#,
            )
            .bind(id_or_new(org.id))
            .bind(&org.name)
            .bind(&org.domain)
            .bind(org.total_credits)
            .bind(org.carbon_credits)
            .bind(org.available_money)
            .bind(org.approved)
            .bind(Utc::now())
            .fetch_one(&self.pool)
            .await?;
            Ok(created)
        }

        async fn get_organization_by_id(&self, id: &str) -> LedgerResult<Option<Organization>> {
            let org = sqlx::query_as::<_, Organization>("SELECT * FROM organizations WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
            Ok(org)
        }

        async fn list_organizations(
            &self,
            q: OrganizationQuery,
        ) -> LedgerResult<Vec<Organization>> {
            let mut query = QueryBuilder::<Postgres>::new("SELECT * FROM organizations WHERE TRUE");
            if let Some(domain) = &q.domain {
                query.push(" AND domain = ").push_bind(domain);
            }
            if let Some(approved) = q.approved {
                query.push(" AND approved = ").push_bind(approved);
            }
            query.push(if q.order_by_name {
                " ORDER BY name ASC"
            } else {
                " ORDER BY created_at ASC"
            });
            let orgs = query
                .build_query_as::<Organization>()
                .fetch_all(&self.pool)
                .await?;
            Ok(orgs)
        }

        async fn update_organization(
            &self,
            id: &str,
            update: UpdateOrganization,
        ) -> LedgerResult<Organization> {
            let mut query = QueryBuilder::<Postgres>::new("UPDATE organizations SET id = id");

            if let Some(name) = &update.name {
                query.push(", name = ").push_bind(name);
            }
            if let Some(domain) = &update.domain {
                query.push(", domain = ").push_bind(domain);
            }
            if let Some(total_credits) = update.total_credits {
                query.push(", total_credits = ").push_bind(total_credits);
            }
            if let Some(carbon_credits) = update.carbon_credits {
                query.push(", carbon_credits = ").push_bind(carbon_credits);
            }
            if let Some(available_money) = update.available_money {
                query.push(", available_money = ").push_bind(available_money);
            }
            if let Some(approved) = update.approved {
                query.push(", approved = ").push_bind(approved);
            }

            query.push(" WHERE id = ").push_bind(id).push(" RETURNING *");

            query
                .build_query_as::<Organization>()
                .fetch_optional(&self.pool)
                .await?
                .ok_or_else(|| LedgerError::not_found("Organization not found"))
        }

        async fn delete_organization(&self, id: &str) -> LedgerResult<()> {
            sqlx::query("DELETE FROM organizations WHERE id = $1")
                .bind(id)
                .execute(&self.pool)
                .await?;
            Ok(())
        }
    }

    // -- CreditTransactionOps --

    #[async_trait]
    impl CreditTransactionOps for SqlxAdapter {
        async fn get_transaction(&self, id: &str) -> LedgerResult<Option<CreditTransaction>> {
            let tx = sqlx::query_as::<_, CreditTransaction>(
                "SELECT * FROM credit_transactions WHERE id = $1",
            )
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
            Ok(tx)
        }

        async fn list_transactions(
            &self,
            q: TransactionQuery,
        ) -> LedgerResult<Vec<CreditTransaction>> {
            let mut query =
                QueryBuilder::<Postgres>::new("SELECT * FROM credit_transactions WHERE TRUE");
            if !q.statuses.is_empty() {
                let statuses: Vec<&str> = q.statuses.iter().map(|s| s.as_str()).collect();
                query.push(" AND status = ANY(").push_bind(statuses).push(")");
            }
            if let Some(org_id) = &q.involving_org {
                query
                    .push(" AND (seller_org_id = ")
                    .push_bind(org_id)
                    .push(" OR buyer_org_id = ")
                    .push_bind(org_id)
                    .push(")");
            }
            query.push(if q.newest_first {
                " ORDER BY created_at DESC"
            } else {
                " ORDER BY created_at ASC"
            });
            push_limit(&mut query, q.limit);

            let txs = query
                .build_query_as::<CreditTransaction>()
                .fetch_all(&self.pool)
                .await?;
            Ok(txs)
        }

        async fn review_sale(
            &self,
            id: &str,
            status: TransactionStatus,
        ) -> LedgerResult<CreditTransaction> {
            let reviewed = sqlx::query_as::<_, CreditTransaction>(
                "UPDATE credit_transactions SET status = $2 WHERE id = $1 AND status = $3 RETURNING *",
            )
            .bind(id)
            .bind(status.as_str())
            .bind(TransactionStatus::Pending.as_str())
            .fetch_optional(&self.pool)
            .await?;
            if let Some(transaction) = reviewed {
                return Ok(transaction);
            }

            match self.get_transaction(id).await? {
                Some(current) => Err(not_reviewable(current.status)),
                None => Err(LedgerError::not_found("Transaction not found")),
            }
        }

        async fn post_sale(&self, sale: CreateSale) -> LedgerResult<SalePosting> {
            let mut tx = self.pool.begin().await.map_err(transaction_error)?;

            let seller = sqlx::query_as::<_, Organization>(
                "SELECT * FROM organizations WHERE id = $1 FOR UPDATE",
            )
            .bind(&sale.seller_org_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| LedgerError::not_found("Organization not found"))?;

            if sale.credit_amount > seller.total_credits {
                return Err(LedgerError::InsufficientCredits {
                    requested: sale.credit_amount,
                    available: seller.total_credits,
                });
            }

            let transaction = sqlx::query_as::<_, CreditTransaction>(
                r#"
                INSERT INTO credit_transactions (id, seller_org_id, seller_org_name, credit_amount, price, status, created_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                RETURNING *
                "#,
            )
            .bind(Uuid::new_v4().to_string())
            .bind(&seller.id)
            .bind(&seller.name)
            .bind(sale.credit_amount)
            .bind(sale.price)
            .bind(TransactionStatus::Pending.as_str())
            .bind(Utc::now())
            .fetch_one(&mut *tx)
            .await?;

            let seller = sqlx::query_as::<_, Organization>(
                "UPDATE organizations SET total_credits = total_credits - $2 WHERE id = $1 RETURNING *",
            )
            .bind(&seller.id)
            .bind(sale.credit_amount)
            .fetch_one(&mut *tx)
            .await?;

            tx.commit().await.map_err(transaction_error)?;
            Ok(SalePosting {
                transaction,
                seller,
            })
        }

        async fn settle_purchase(&self, purchase: SettlePurchase) -> LedgerResult<Settlement> {
            let mut tx = self.pool.begin().await.map_err(transaction_error)?;

            let transaction = sqlx::query_as::<_, CreditTransaction>(
                "SELECT * FROM credit_transactions WHERE id = $1 FOR UPDATE",
            )
            .bind(&purchase.transaction_id)
            .fetch_optional(&mut *tx)
            .await?
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

            // Lock both organizations in id order.
            let orgs = sqlx::query_as::<_, Organization>(
                "SELECT * FROM organizations WHERE id = ANY($1) ORDER BY id FOR UPDATE",
            )
            .bind(vec![
                purchase.buyer_org_id.clone(),
                transaction.seller_org_id.clone(),
            ])
            .fetch_all(&mut *tx)
            .await?;

            let buyer = orgs
                .iter()
                .find(|o| o.id == purchase.buyer_org_id)
                .ok_or_else(|| LedgerError::not_found("Organization not found"))?;
            let total_price = transaction.total_price();
            if buyer.available_money < total_price {
                return Err(LedgerError::InsufficientFunds {
                    required: total_price,
                    available: buyer.available_money,
                });
            }
            let seller_exists = orgs.iter().any(|o| o.id == transaction.seller_org_id);

            let buyer = sqlx::query_as::<_, Organization>(
                r#"
                UPDATE organizations
                SET total_credits = total_credits + $2, available_money = available_money - $3
                WHERE id = $1
                RETURNING *
                "#,
            )
            .bind(&buyer.id)
            .bind(transaction.credit_amount)
            .bind(total_price)
            .fetch_one(&mut *tx)
            .await?;

            let seller = if seller_exists {
                let seller = sqlx::query_as::<_, Organization>(
                    r#"
                    UPDATE organizations
                    SET total_credits = GREATEST(0, total_credits - $2), available_money = available_money + $3
                    WHERE id = $1
                    RETURNING *
                    "#,
                )
                .bind(&transaction.seller_org_id)
                .bind(transaction.credit_amount)
                .bind(total_price)
                .fetch_one(&mut *tx)
                .await?;
                Some(seller)
            } else {
                None
            };

            let transaction = sqlx::query_as::<_, CreditTransaction>(
                r#"
                UPDATE credit_transactions
                SET status = $2, buyer_org_id = $3, buyer_org_name = $4, completed_at = $5
                WHERE id = $1
                RETURNING *
                "#,
            )
            .bind(&transaction.id)
            .bind(TransactionStatus::Completed.as_str())
            .bind(&buyer.id)
            .bind(&buyer.name)
            .bind(Utc::now())
            .fetch_one(&mut *tx)
            .await?;

            tx.commit().await.map_err(transaction_error)?;
            Ok(Settlement {
                transaction,
                buyer,
                seller,
                total_price,
            })
        }
    }

    // -- TripOps --

    #[async_trait]
    impl TripOps for SqlxAdapter {
        async fn create_trip(&self, trip: CreateTrip) -> LedgerResult<Trip> {
            let created = sqlx::query_as::<_, Trip>(
                r#"
                INSERT INTO trips (
                    id, user_id, start_latitude, start_longitude, end_latitude, end_longitude,
                    start_address, end_address, start_time, end_time, trip_date, distance_km,
                    transport_mode, carbon_credits, is_work_from_home
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
                RETURNING *
                "#,
            )
            .bind(id_or_new(trip.id))
            .bind(&trip.user_id)
            .bind(trip.start_location.map(|p| p.latitude))
            .bind(trip.start_location.map(|p| p.longitude))
            .bind(trip.end_location.map(|p| p.latitude))
            .bind(trip.end_location.map(|p| p.longitude))
            .bind(&trip.start_address)
            .bind(&trip.end_address)
            .bind(trip.start_time)
            .bind(trip.end_time)
            .bind(trip.trip_date)
            .bind(trip.distance_km)
            .bind(trip.transport_mode.as_str())
            .bind(trip.carbon_credits)
            .bind(trip.is_work_from_home)
            .fetch_one(&self.pool)
            .await?;
            Ok(created)
        }

        async fn get_trip_by_id(&self, id: &str) -> LedgerResult<Option<Trip>> {
            let trip = sqlx::query_as::<_, Trip>("SELECT * FROM trips WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
            Ok(trip)
        }

        async fn list_trips(&self, q: TripQuery) -> LedgerResult<Vec<Trip>> {
            let mut query = QueryBuilder::<Postgres>::new("SELECT * FROM trips WHERE TRUE");
            if let Some(user_ids) = &q.user_ids {
                query.push(" AND user_id = ANY(").push_bind(user_ids.clone()).push(")");
            }
            query.push(if q.newest_first {
                " ORDER BY trip_date DESC"
            } else {
                " ORDER BY trip_date ASC"
            });
            push_limit(&mut query, q.limit);

            let trips = query.build_query_as::<Trip>().fetch_all(&self.pool).await?;
            Ok(trips)
        }
    }

}
