pub mod database;
pub mod memory;
pub mod memory_traits;
pub mod traits;

pub use database::{
    CreditTransactionOps, DatabaseAdapter, OrganizationOps, PendingRegistrationOps, TripOps,
    UserOps,
};
pub use memory::MemoryDatabaseAdapter;
pub use memory_traits::{MemoryRecord, MemoryUpdate};

#[cfg(feature = "sqlx-postgres")]
pub use database::sqlx_adapter::{PoolConfig, PoolStats, SqlxAdapter};

use crate::error::LedgerError;
use crate::types::TransactionStatus;

/// Error for reviewing a sale that has left `pending`.
pub(crate) fn not_reviewable(status: TransactionStatus) -> LedgerError {
    LedgerError::conflict(format!(
        "Transaction is {status} and can no longer be reviewed"
    ))
}
