//! Caller identity resolution.
//!
//! Session handling lives outside the ledger. An [`IdentityProvider`] turns an
//! incoming [`LedgerRequest`] into the caller's uid, role and domain, which the
//! plugins use to gate operations and scope queries.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{LedgerError, LedgerResult};
use crate::types::{LedgerRequest, Role};

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_ROLE_HEADER: &str = "x-user-role";
pub const USER_DOMAIN_HEADER: &str = "x-user-domain";
pub const ORGANIZATION_ID_HEADER: &str = "x-organization-id";

/// The authenticated caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    pub uid: String,
    pub role: Role,
    pub domain: Option<String>,
    #[serde(rename = "organizationId")]
    pub organization_id: Option<String>,
}

impl Identity {
    pub fn new(uid: impl Into<String>, role: Role) -> Self {
        Self {
            uid: uid.into(),
            role,
            domain: None,
            organization_id: None,
        }
    }

    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    pub fn with_organization_id(mut self, organization_id: impl Into<String>) -> Self {
        self.organization_id = Some(organization_id.into());
        self
    }

    /// Fail with `Forbidden` unless the caller holds one of `roles`.
    pub fn require_role(&self, roles: &[Role]) -> LedgerResult<()> {
        if roles.contains(&self.role) {
            Ok(())
        } else {
            Err(LedgerError::forbidden(format!(
                "Role {} may not perform this operation",
                self.role
            )))
        }
    }

    /// The caller's domain, required for domain-scoped operations.
    pub fn require_domain(&self) -> LedgerResult<&str> {
        self.domain
            .as_deref()
            .ok_or_else(|| LedgerError::forbidden("No domain associated with this account"))
    }
}

/// Resolves the caller of a request.
///
/// Returns `Ok(None)` when the request carries no identity at all; plugins
/// turn that into `Unauthenticated`.
#[async_trait]
pub trait IdentityProvider: Send + Sync + 'static {
    async fn resolve(&self, req: &LedgerRequest) -> LedgerResult<Option<Identity>>;
}

/// Trusts identity headers injected by an upstream gateway.
#[derive(Debug, Clone, Default)]
pub struct HeaderIdentityProvider;

#[async_trait]
impl IdentityProvider for HeaderIdentityProvider {
    async fn resolve(&self, req: &LedgerRequest) -> LedgerResult<Option<Identity>> {
        let Some(uid) = req.header(USER_ID_HEADER).filter(|v| !v.is_empty()) else {
            return Ok(None);
        };
        let role: Role = req
            .header(USER_ROLE_HEADER)
            .ok_or(LedgerError::Unauthenticated)?
            .parse()?;

        Ok(Some(Identity {
            uid: uid.clone(),
            role,
            domain: req.header(USER_DOMAIN_HEADER).cloned(),
            organization_id: req.header(ORGANIZATION_ID_HEADER).cloned(),
        }))
    }
}

/// Maps bearer tokens to fixed identities. Intended for tests and demos.
#[derive(Debug, Clone, Default)]
pub struct StaticIdentityProvider {
    tokens: HashMap<String, Identity>,
}

impl StaticIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(mut self, token: impl Into<String>, identity: Identity) -> Self {
        self.tokens.insert(token.into(), identity);
        self
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentityProvider {
    async fn resolve(&self, req: &LedgerRequest) -> LedgerResult<Option<Identity>> {
        let Some(token) = req
            .header("authorization")
            .and_then(|v| v.strip_prefix("Bearer "))
        else {
            return Ok(None);
        };
        self.tokens
            .get(token)
            .cloned()
            .map(Some)
            .ok_or(LedgerError::Unauthenticated)
    }
}
