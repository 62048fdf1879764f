//! # Carbon Ledger API
//!
//! Plugin implementations for the carbon ledger: administration, employer
//! accounting and the inter-organization credit marketplace.

pub mod plugins;

pub use plugins::RejectionPolicy;
pub use plugins::admin::{AdminConfig, AdminPlugin};
pub use plugins::employer::{EmployerConfig, EmployerPlugin};
pub use plugins::marketplace::{MarketplaceConfig, MarketplacePlugin};
