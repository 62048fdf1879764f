use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Organization entity.
///
/// `total_credits` is the tradable balance and only moves through the
/// marketplace. `carbon_credits` is derived from employee trips and is
/// overwritten on every recomputation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Organization {
    pub id: String,
    pub name: String,
    pub domain: String,
    #[serde(rename = "totalCredits")]
    pub total_credits: f64,
    #[serde(rename = "carbonCredits")]
    pub carbon_credits: f64,
    #[serde(rename = "availableMoney")]
    pub available_money: f64,
    pub approved: bool,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

/// Organization creation data
#[derive(Debug, Clone)]
pub struct CreateOrganization {
    pub id: Option<String>,
    pub name: String,
    pub domain: String,
    pub total_credits: f64,
    pub carbon_credits: f64,
    pub available_money: f64,
    pub approved: bool,
}

impl CreateOrganization {
    pub fn new(name: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            domain: domain.into(),
            total_credits: 0.0,
            carbon_credits: 0.0,
            available_money: 0.0,
            approved: false,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_total_credits(mut self, credits: f64) -> Self {
        self.total_credits = credits;
        self
    }

    pub fn with_available_money(mut self, money: f64) -> Self {
        self.available_money = money;
        self
    }

    pub fn with_approved(mut self, approved: bool) -> Self {
        self.approved = approved;
        self
    }
}

/// Organization update data (merge semantics)
#[derive(Debug, Clone, Default)]
pub struct UpdateOrganization {
    pub name: Option<String>,
    pub domain: Option<String>,
    pub total_credits: Option<f64>,
    pub carbon_credits: Option<f64>,
    pub available_money: Option<f64>,
    pub approved: Option<bool>,
}

/// Credit transaction status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    #[default]
    Pending,
    Approved,
    Completed,
    Rejected,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Completed => "completed",
            Self::Rejected => "rejected",
        }
    }

    /// Statuses a buyer may settle, given whether sales need reviewer approval.
    pub fn purchasable(require_approval: bool) -> Vec<TransactionStatus> {
        if require_approval {
            vec![Self::Approved]
        } else {
            vec![Self::Pending, Self::Approved]
        }
    }
}

impl From<String> for TransactionStatus {
    fn from(s: String) -> Self {
        match s.to_lowercase().as_str() {
            "approved" => Self::Approved,
            "completed" => Self::Completed,
            "rejected" => Self::Rejected,
            _ => Self::Pending,
        }
    }
}

impl std::fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One sale offer and its eventual settlement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditTransaction {
    pub id: String,
    #[serde(rename = "sellerOrgId")]
    pub seller_org_id: String,
    #[serde(rename = "sellerOrgName")]
    pub seller_org_name: String,
    #[serde(rename = "buyerOrgId")]
    pub buyer_org_id: Option<String>,
    #[serde(rename = "buyerOrgName")]
    pub buyer_org_name: Option<String>,
    #[serde(rename = "creditAmount")]
    pub credit_amount: f64,
    pub price: f64,
    pub status: TransactionStatus,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "completedAt")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl CreditTransaction {
    /// Amount the buyer pays: `credit_amount × price`.
    pub fn total_price(&self) -> f64 {
        self.credit_amount * self.price
    }

    pub fn is_purchasable(&self, require_approval: bool) -> bool {
        TransactionStatus::purchasable(require_approval).contains(&self.status)
    }
}

/// Input for the atomic sale-posting primitive.
#[derive(Debug, Clone)]
pub struct CreateSale {
    pub seller_org_id: String,
    pub credit_amount: f64,
    pub price: f64,
}

/// Result of posting a sale: the new transaction and the seller after the
/// reservation was applied.
#[derive(Debug, Clone, Serialize)]
pub struct SalePosting {
    pub transaction: CreditTransaction,
    pub seller: Organization,
}

/// Input for the atomic purchase-settlement primitive.
#[derive(Debug, Clone)]
pub struct SettlePurchase {
    pub transaction_id: String,
    pub buyer_org_id: String,
    /// Statuses the transaction may be in for the purchase to proceed.
    pub purchasable: Vec<TransactionStatus>,
}

/// Result of a settled purchase.
#[derive(Debug, Clone, Serialize)]
pub struct Settlement {
    pub transaction: CreditTransaction,
    pub buyer: Organization,
    /// `None` when the seller organization no longer exists.
    pub seller: Option<Organization>,
    #[serde(rename = "totalPrice")]
    pub total_price: f64,
}
