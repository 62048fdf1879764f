use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::LedgerError;

// Re-export organization, trading and trip types
pub use super::types_org::{
    CreateOrganization, CreateSale, CreditTransaction, Organization, SalePosting, Settlement,
    SettlePurchase, TransactionStatus, UpdateOrganization,
};
pub use super::types_trip::{CreateTrip, GeoPoint, TransportMode, Trip};

/// Role of a ledger user. Determines which operations the caller may run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Employee,
    Employer,
    Admin,
    SystemAdmin,
    Bank,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Employee => "employee",
            Self::Employer => "employer",
            Self::Admin => "admin",
            Self::SystemAdmin => "system_admin",
            Self::Bank => "bank",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "employee" => Ok(Self::Employee),
            "employer" => Ok(Self::Employer),
            "admin" => Ok(Self::Admin),
            "system_admin" => Ok(Self::SystemAdmin),
            "bank" => Ok(Self::Bank),
            other => Err(LedgerError::validation(format!("Unknown role: {}", other))),
        }
    }
}

/// Ledger user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub domain: Option<String>,
    #[serde(rename = "organizationId")]
    pub organization_id: Option<String>,
    pub approved: bool,
    #[serde(rename = "carbonCredits")]
    pub carbon_credits: f64,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "lastLogin")]
    pub last_login: Option<DateTime<Utc>>,
}

impl User {
    pub fn is_approved_employee_of(&self, domain: &str) -> bool {
        self.role == Role::Employee && self.approved && self.domain.as_deref() == Some(domain)
    }
}

/// User creation data
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub id: Option<String>,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub domain: Option<String>,
    pub organization_id: Option<String>,
    pub approved: bool,
    pub carbon_credits: f64,
    pub created_at: Option<DateTime<Utc>>,
    pub last_login: Option<DateTime<Utc>>,
}

impl CreateUser {
    pub fn new(name: impl Into<String>, email: impl Into<String>, role: Role) -> Self {
        Self {
            id: None,
            name: name.into(),
            email: email.into(),
            role,
            domain: None,
            organization_id: None,
            approved: false,
            carbon_credits: 0.0,
            created_at: None,
            last_login: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    pub fn with_organization_id(mut self, organization_id: impl Into<String>) -> Self {
        self.organization_id = Some(organization_id.into());
        self
    }

    pub fn with_approved(mut self, approved: bool) -> Self {
        self.approved = approved;
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    pub fn with_last_login(mut self, last_login: DateTime<Utc>) -> Self {
        self.last_login = Some(last_login);
        self
    }
}

/// User update data (merge semantics: `None` leaves the field untouched)
#[derive(Debug, Clone, Default)]
pub struct UpdateUser {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<Role>,
    pub domain: Option<String>,
    pub organization_id: Option<String>,
    pub approved: Option<bool>,
    pub carbon_credits: Option<f64>,
    pub last_login: Option<DateTime<Utc>>,
}

/// Employer sign-up awaiting administrator approval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingEmployer {
    pub id: String,
    #[serde(rename = "fullName")]
    pub full_name: String,
    pub email: String,
    #[serde(rename = "organizationName")]
    pub organization_name: String,
    #[serde(rename = "organizationDomain")]
    pub organization_domain: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

/// Employee sign-up awaiting employer or administrator approval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingEmployee {
    pub id: String,
    #[serde(rename = "fullName")]
    pub full_name: String,
    pub email: String,
    pub domain: String,
    #[serde(rename = "organizationId")]
    pub organization_id: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreatePendingEmployer {
    /// Pending records share their id with the registering user.
    pub id: Option<String>,
    pub full_name: String,
    pub email: String,
    pub organization_name: String,
    pub organization_domain: String,
}

#[derive(Debug, Clone)]
pub struct CreatePendingEmployee {
    /// Pending records share their id with the registering user.
    pub id: Option<String>,
    pub full_name: String,
    pub email: String,
    pub domain: String,
    pub organization_id: Option<String>,
}

/// HTTP method enumeration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Options,
    Head,
}

/// Framework-neutral ledger request.
#[derive(Debug, Clone)]
pub struct LedgerRequest {
    pub method: HttpMethod,
    pub path: String,
    pub headers: HashMap<String, String>,
    pub body: Option<Vec<u8>>,
    pub query: HashMap<String, String>,
}

/// Framework-neutral ledger response.
#[derive(Debug, Clone)]
pub struct LedgerResponse {
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

impl LedgerRequest {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: HashMap::new(),
            body: None,
            query: HashMap::new(),
        }
    }

    /// Construct a request from all public parts.
    pub fn from_parts(
        method: HttpMethod,
        path: String,
        headers: HashMap<String, String>,
        body: Option<Vec<u8>>,
        query: HashMap<String, String>,
    ) -> Self {
        Self {
            method,
            path,
            headers,
            body,
            query,
        }
    }

    pub fn method(&self) -> &HttpMethod {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn header(&self, name: &str) -> Option<&String> {
        self.headers.get(name)
    }

    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query.get(name).map(String::as_str)
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(name.into(), value.into());
        self
    }

    pub fn with_json(mut self, body: &serde_json::Value) -> Self {
        self.body = Some(body.to_string().into_bytes());
        self.headers
            .insert("content-type".to_string(), "application/json".to_string());
        self
    }

    pub fn body_as_json<T: for<'de> Deserialize<'de>>(&self) -> Result<T, serde_json::Error> {
        if let Some(body) = &self.body {
            serde_json::from_slice(body)
        } else {
            serde_json::from_str("{}")
        }
    }
}

impl LedgerResponse {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: Vec::new(),
        }
    }

    pub fn json<T: Serialize>(status: u16, data: &T) -> Result<Self, serde_json::Error> {
        let body = serde_json::to_vec(data)?;
        let mut headers = HashMap::new();
        headers.insert("content-type".to_string(), "application/json".to_string());

        Ok(Self {
            status,
            headers,
            body,
        })
    }

    pub fn text(status: u16, text: impl Into<String>) -> Self {
        let body = text.into().into_bytes();
        let mut headers = HashMap::new();
        headers.insert("content-type".to_string(), "text/plain".to_string());

        Self {
            status,
            headers,
            body,
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }
}

/// Generic `{ ok: bool }` response used by `/ok`.
#[derive(Debug, Serialize)]
pub struct OkResponse {
    pub ok: bool,
}

/// Health-check response for `/health`.
#[derive(Debug, Serialize)]
pub struct HealthCheckResponse {
    pub status: &'static str,
    pub service: String,
}
