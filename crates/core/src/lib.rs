//! # Carbon Ledger Core
//!
//! Core abstractions for the carbon ledger: domain types, persistence
//! contract, identity contract, plugin contract, configuration and errors.

pub mod accounting;
pub mod adapters;
pub mod config;
pub mod error;
pub mod identity;
pub mod logger;
pub mod plugin;
pub mod query;
pub mod types;
pub mod types_impls;
pub mod types_org;
pub mod types_trip;

// Re-export commonly used items
pub use accounting::{
    CreditSummary, MonthlyCredits, aggregate_credits, credits_by_transport_mode, trips_by_month,
};
pub use adapters::{
    CreditTransactionOps, DatabaseAdapter, MemoryDatabaseAdapter, OrganizationOps,
    PendingRegistrationOps, TripOps, UserOps,
};
#[cfg(feature = "sqlx-postgres")]
pub use adapters::{PoolConfig, PoolStats, SqlxAdapter};
pub use config::LedgerConfig;
pub use error::{
    DatabaseError, LedgerError, LedgerResult, validate_request_body, validation_error_response,
};
pub use identity::{HeaderIdentityProvider, Identity, IdentityProvider, StaticIdentityProvider};
pub use logger::{LedgerEvent, Logger, TracingLogger};
pub use plugin::{LedgerContext, LedgerPlugin, LedgerRoute};
pub use query::{OrganizationQuery, PendingQuery, TransactionQuery, TripQuery, UserQuery};
pub use types::{
    CreateOrganization, CreatePendingEmployee, CreatePendingEmployer, CreateSale, CreateTrip,
    CreateUser, CreditTransaction, GeoPoint, HealthCheckResponse, HttpMethod, LedgerRequest,
    LedgerResponse, OkResponse, Organization, PendingEmployee, PendingEmployer, Role, SalePosting,
    Settlement, SettlePurchase, TransactionStatus, TransportMode, Trip,
    UpdateOrganization, UpdateUser, User,
};
