//! Typed read queries for the persistence contract.
//!
//! Each query carries equality filters, an optional membership filter, a sort
//! key and an optional limit. Adapters must honour every field that is set.

use crate::types::{Role, TransactionStatus};

/// Filter for [`UserOps::list_users`](crate::adapters::UserOps::list_users).
#[derive(Debug, Clone, Default)]
pub struct UserQuery {
    pub domain: Option<String>,
    pub role: Option<Role>,
    pub approved: Option<bool>,
    /// Sort ascending by name.
    pub order_by_name: bool,
    pub limit: Option<usize>,
}

impl UserQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    pub fn role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    pub fn approved(mut self, approved: bool) -> Self {
        self.approved = Some(approved);
        self
    }

    pub fn order_by_name(mut self) -> Self {
        self.order_by_name = true;
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Approved employees of one domain.
    pub fn approved_employees(domain: impl Into<String>) -> Self {
        Self::new()
            .domain(domain)
            .role(Role::Employee)
            .approved(true)
    }
}

/// Filter for organization listings.
#[derive(Debug, Clone, Default)]
pub struct OrganizationQuery {
    pub domain: Option<String>,
    pub approved: Option<bool>,
    pub order_by_name: bool,
}

impl OrganizationQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    pub fn approved(mut self, approved: bool) -> Self {
        self.approved = Some(approved);
        self
    }

    pub fn order_by_name(mut self) -> Self {
        self.order_by_name = true;
        self
    }
}

/// Filter for pending registrations.
#[derive(Debug, Clone, Default)]
pub struct PendingQuery {
    /// Matches `domain` for employees and `organizationDomain` for employers.
    pub domain: Option<String>,
}

impl PendingQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }
}

/// Filter for credit transactions.
#[derive(Debug, Clone, Default)]
pub struct TransactionQuery {
    /// Membership filter on status; empty matches every status.
    pub statuses: Vec<TransactionStatus>,
    /// Matches transactions where the organization is seller or buyer.
    pub involving_org: Option<String>,
    /// Sort by `createdAt`, newest first. Oldest first otherwise.
    pub newest_first: bool,
    pub limit: Option<usize>,
}

impl TransactionQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(mut self, status: TransactionStatus) -> Self {
        self.statuses.push(status);
        self
    }

    pub fn statuses(mut self, statuses: impl IntoIterator<Item = TransactionStatus>) -> Self {
        self.statuses.extend(statuses);
        self
    }

    pub fn involving_org(mut self, org_id: impl Into<String>) -> Self {
        self.involving_org = Some(org_id.into());
        self
    }

    pub fn newest_first(mut self) -> Self {
        self.newest_first = true;
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn matches_status(&self, status: TransactionStatus) -> bool {
        self.statuses.is_empty() || self.statuses.contains(&status)
    }
}

/// Filter for trips.
#[derive(Debug, Clone, Default)]
pub struct TripQuery {
    /// Membership filter on `userId`. `Some(vec![])` matches nothing.
    pub user_ids: Option<Vec<String>>,
    /// Sort by `tripDate`, newest first. Oldest first otherwise.
    pub newest_first: bool,
    pub limit: Option<usize>,
}

impl TripQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user_ids(mut self, ids: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.user_ids = Some(ids.into_iter().map(Into::into).collect());
        self
    }

    pub fn newest_first(mut self) -> Self {
        self.newest_first = true;
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}
