use serde::{Deserialize, Serialize};
use validator::Validate;

use carbon_ledger_core::{
    CreditTransaction, Organization, PendingEmployee, PendingEmployer, Trip, User,
};

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct ApprovalRequest {
    #[serde(rename = "pendingId")]
    #[validate(length(min = 1, message = "pendingId is required"))]
    pub pending_id: String,
    pub approve: bool,
}

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub(crate) struct OverviewResponse {
    pub organizations: Vec<Organization>,
    pub users: Vec<User>,
    pub employees: Vec<User>,
    pub employers: Vec<User>,
    pub transactions: Vec<CreditTransaction>,
    pub trips: Vec<Trip>,
    #[serde(rename = "pendingEmployers")]
    pub pending_employers: Vec<PendingEmployer>,
    #[serde(rename = "pendingEmployees")]
    pub pending_employees: Vec<PendingEmployee>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ListResponse<T: Serialize> {
    pub items: Vec<T>,
    pub total: usize,
}

impl<T: Serialize> From<Vec<T>> for ListResponse<T> {
    fn from(items: Vec<T>) -> Self {
        Self {
            total: items.len(),
            items,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ApprovalResponse {
    #[serde(rename = "pendingId")]
    pub pending_id: String,
    pub approved: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization: Option<Organization>,
}
