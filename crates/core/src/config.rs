use crate::error::LedgerError;
use crate::logger::{Logger, default_logger};
use std::sync::Arc;

/// Starting balance granted to an organization when its employer is approved.
pub const DEFAULT_BOOTSTRAP_AVAILABLE_MONEY: f64 = 1000.0;

/// Upper bound on trips returned by the admin trip listing.
pub const DEFAULT_TRIP_LISTING_LIMIT: usize = 1000;

/// Main configuration for the ledger.
#[derive(Clone)]
pub struct LedgerConfig {
    /// Application name, used in the health response and logs.
    ///
    /// Defaults to `"Carbon Ledger"`.
    pub app_name: String,

    /// Base path where the ledger routes are mounted.
    ///
    /// Defaults to `"/api/ledger"`.
    pub base_path: String,

    /// `availableMoney` seeded on every organization created by an employer
    /// approval.
    pub bootstrap_available_money: f64,

    /// Maximum number of trips returned by the admin trip listing.
    pub trip_listing_limit: usize,

    /// When `true`, only sales a reviewer moved to `approved` can be listed
    /// and purchased. When `false`, `pending` sales are purchasable too.
    pub require_sale_approval: bool,

    /// Logger implementation for ledger events.
    ///
    /// Defaults to a [`TracingLogger`](crate::logger::TracingLogger).
    pub logger: Arc<dyn Logger>,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            app_name: "Carbon Ledger".to_string(),
            base_path: "/api/ledger".to_string(),
            bootstrap_available_money: DEFAULT_BOOTSTRAP_AVAILABLE_MONEY,
            trip_listing_limit: DEFAULT_TRIP_LISTING_LIMIT,
            require_sale_approval: false,
            logger: default_logger(),
        }
    }
}

impl std::fmt::Debug for LedgerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LedgerConfig")
            .field("app_name", &self.app_name)
            .field("base_path", &self.base_path)
            .field("bootstrap_available_money", &self.bootstrap_available_money)
            .field("trip_listing_limit", &self.trip_listing_limit)
            .field("require_sale_approval", &self.require_sale_approval)
            .finish_non_exhaustive()
    }
}

impl LedgerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the application name.
    pub fn app_name(mut self, name: impl Into<String>) -> Self {
        self.app_name = name.into();
        self
    }

    /// Set the base path where ledger routes are mounted.
    pub fn base_path(mut self, path: impl Into<String>) -> Self {
        self.base_path = path.into();
        self
    }

    /// Set the money granted to newly approved organizations.
    pub fn bootstrap_available_money(mut self, amount: f64) -> Self {
        self.bootstrap_available_money = amount;
        self
    }

    /// Set the admin trip listing limit.
    pub fn trip_listing_limit(mut self, limit: usize) -> Self {
        self.trip_listing_limit = limit;
        self
    }

    /// Require reviewer approval before a sale becomes purchasable.
    pub fn require_sale_approval(mut self, require: bool) -> Self {
        self.require_sale_approval = require;
        self
    }

    /// Set a custom logger implementation.
    pub fn logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn validate(&self) -> Result<(), LedgerError> {
        if !self.bootstrap_available_money.is_finite() || self.bootstrap_available_money < 0.0 {
            return Err(LedgerError::config(
                "Bootstrap available money must be a non-negative finite amount",
            ));
        }

        if self.trip_listing_limit == 0 {
            return Err(LedgerError::config(
                "Trip listing limit must be greater than zero",
            ));
        }

        if !self.base_path.starts_with('/') {
            return Err(LedgerError::config("Base path must start with '/'"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = LedgerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.bootstrap_available_money, 1000.0);
        assert_eq!(config.trip_listing_limit, 1000);
        assert!(!config.require_sale_approval);
    }

    #[test]
    fn rejects_negative_bootstrap_money() {
        let config = LedgerConfig::new().bootstrap_available_money(-1.0);
        assert!(config.validate().is_err());

        let config = LedgerConfig::new().bootstrap_available_money(f64::NAN);
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_zero_trip_limit_and_relative_base_path() {
        assert!(LedgerConfig::new().trip_listing_limit(0).validate().is_err());
        assert!(LedgerConfig::new().base_path("api").validate().is_err());
    }
}
