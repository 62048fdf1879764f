use serde::{Deserialize, Serialize};
use validator::Validate;

use carbon_ledger_core::{CreditTransaction, Organization};

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct SellRequest {
    #[serde(rename = "creditAmount")]
    pub credit_amount: f64,
    pub price: f64,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct PurchaseRequest {
    #[serde(rename = "transactionId")]
    #[validate(length(min = 1, message = "transactionId is required"))]
    pub transaction_id: String,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct ReviewSaleRequest {
    #[serde(rename = "transactionId")]
    #[validate(length(min = 1, message = "transactionId is required"))]
    pub transaction_id: String,
    pub approve: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct SalesResponse {
    pub sales: Vec<CreditTransaction>,
}

#[derive(Debug, Serialize)]
pub(crate) struct TransactionsResponse {
    pub transactions: Vec<CreditTransaction>,
}

#[derive(Debug, Serialize)]
pub(crate) struct SellResponse {
    pub transaction: CreditTransaction,
    /// Seller's tradable balance after the reservation.
    #[serde(rename = "remainingCredits")]
    pub remaining_credits: f64,
}

#[derive(Debug, Serialize)]
pub(crate) struct PurchaseResponse {
    pub transaction: CreditTransaction,
    pub buyer: Organization,
    #[serde(rename = "totalPrice")]
    pub total_price: f64,
}

#[derive(Debug, Serialize)]
pub(crate) struct ReviewSaleResponse {
    pub transaction: CreditTransaction,
}
