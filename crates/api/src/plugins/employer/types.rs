use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use validator::Validate;

use carbon_ledger_core::{MonthlyCredits, Organization, PendingEmployee, Trip, User};

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct ApprovalRequest {
    #[serde(rename = "pendingId")]
    #[validate(length(min = 1, message = "pendingId is required"))]
    pub pending_id: String,
    pub approve: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct OrganizationResponse {
    pub organization: Organization,
}

/// One row of the employer's employee table.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct EmployeeCredits {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(rename = "carbonCredits")]
    pub carbon_credits: f64,
}

#[derive(Debug, Serialize)]
pub(crate) struct RefreshCreditsResponse {
    pub organization: Organization,
    #[serde(rename = "totalCredits")]
    pub total_credits: f64,
    pub employees: Vec<EmployeeCredits>,
}

#[derive(Debug, Serialize)]
pub(crate) struct EmployeesResponse {
    pub employees: Vec<User>,
}

#[derive(Debug, Serialize)]
pub(crate) struct PendingEmployeesResponse {
    #[serde(rename = "pendingEmployees")]
    pub pending_employees: Vec<PendingEmployee>,
}

#[derive(Debug, Serialize)]
pub(crate) struct EmployeeApprovalResponse {
    #[serde(rename = "pendingId")]
    pub pending_id: String,
    pub approved: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
}

#[derive(Debug, Serialize)]
pub(crate) struct EmployeeTripsResponse {
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(rename = "totalCredits")]
    pub total_credits: f64,
    pub trips: Vec<Trip>,
    pub monthly: Vec<MonthlyCredits>,
    #[serde(rename = "byTransportMode")]
    pub by_transport_mode: BTreeMap<String, f64>,
}
