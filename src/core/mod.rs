mod ledger;

pub use ledger::{CarbonLedger, LedgerBuilder, TypedLedgerBuilder};
