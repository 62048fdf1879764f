pub mod admin;
pub mod employer;
pub(crate) mod helpers;
pub mod marketplace;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use admin::{AdminConfig, AdminPlugin};
pub use employer::{EmployerConfig, EmployerPlugin};
pub use marketplace::{MarketplaceConfig, MarketplacePlugin};

use serde::{Deserialize, Serialize};

/// What happens to the user record when an employee registration is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionPolicy {
    /// Remove the user document.
    Delete,
    /// Keep the user document with `approved = false`.
    MarkUnapproved,
}
