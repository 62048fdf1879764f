//! # Carbon Ledger
//!
//! Carbon-credit accounting and inter-organization credit trading.
//!
//! Organizations earn credits from their employees' low-carbon trips, post
//! part of their tradable balance for sale and buy each other's offers.
//! Registration approval for employers and employees completes the
//! workflow.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use carbon_ledger::{LedgerBuilder, LedgerConfig};
//! use carbon_ledger::adapters::MemoryDatabaseAdapter;
//! use carbon_ledger::plugins::{AdminPlugin, EmployerPlugin, MarketplacePlugin};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let ledger = LedgerBuilder::new(LedgerConfig::new())
//!         .database(MemoryDatabaseAdapter::new())
//!         .plugin(AdminPlugin::new())
//!         .plugin(EmployerPlugin::new())
//!         .plugin(MarketplacePlugin::new())
//!         .build()
//!         .await?;
//!
//!     assert_eq!(ledger.plugin_names(), vec!["admin", "employer", "marketplace"]);
//!     Ok(())
//! }
//! ```

// CarbonLedger lives in the root crate because it wires plugins
// (carbon-ledger-api) to the core abstractions (carbon-ledger-core).
pub mod core;
pub mod handlers;

pub use carbon_ledger_core::{
    CreateOrganization, CreatePendingEmployee, CreatePendingEmployer, CreateSale, CreateTrip,
    CreateUser, CreditSummary, CreditTransaction, DatabaseAdapter, DatabaseError, GeoPoint,
    HeaderIdentityProvider, HttpMethod, Identity, IdentityProvider, LedgerConfig, LedgerContext,
    LedgerError, LedgerEvent, LedgerPlugin, LedgerRequest, LedgerResponse, LedgerResult, LedgerRoute, Logger,
    MonthlyCredits, Organization, PendingEmployee, PendingEmployer, Role, SalePosting, Settlement,
    SettlePurchase, StaticIdentityProvider, TracingLogger, TransactionStatus, TransportMode, Trip,
    UpdateOrganization, UpdateUser, User, aggregate_credits, credits_by_transport_mode,
    trips_by_month,
};

pub use carbon_ledger_core::identity;

/// Query builders accepted by the persistence traits.
pub mod query {
    pub use carbon_ledger_core::{
        OrganizationQuery, PendingQuery, TransactionQuery, TripQuery, UserQuery,
    };
}

pub mod adapters {
    pub use carbon_ledger_core::{
        CreditTransactionOps, DatabaseAdapter, MemoryDatabaseAdapter, OrganizationOps,
        PendingRegistrationOps, TripOps, UserOps,
    };

    #[cfg(feature = "sqlx-postgres")]
    pub use carbon_ledger_core::{PoolConfig, PoolStats, SqlxAdapter};
}

pub mod plugins {
    pub use carbon_ledger_api::plugins::*;
    pub use carbon_ledger_api::*;
}

pub use core::{CarbonLedger, LedgerBuilder, TypedLedgerBuilder};

#[cfg(feature = "axum")]
pub use handlers::axum::AxumIntegration;
