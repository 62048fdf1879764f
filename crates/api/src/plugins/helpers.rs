//! Shared helpers for plugin implementations.

use carbon_ledger_core::adapters::DatabaseAdapter;
use carbon_ledger_core::{
    CreateUser, Identity, LedgerContext, LedgerError, LedgerRequest, LedgerResponse, LedgerResult,
    Organization, OrganizationQuery, PendingEmployee, Role, UpdateUser, User,
};

use super::RejectionPolicy;

/// Serialize `data` into a 200 JSON response.
pub(crate) fn ok_json<T: serde::Serialize>(data: &T) -> LedgerResult<LedgerResponse> {
    LedgerResponse::json(200, data).map_err(LedgerError::from)
}

/// Resolve the caller and check that they hold one of `roles`.
pub(crate) async fn require_role<DB: DatabaseAdapter>(
    req: &LedgerRequest,
    ctx: &LedgerContext<DB>,
    roles: &[Role],
) -> LedgerResult<Identity> {
    let identity = ctx.current_identity(req).await?;
    identity.require_role(roles)?;
    Ok(identity)
}

/// The organization the caller acts for.
///
/// Uses the identity's organization id when present, otherwise the approved
/// organization registered for the caller's domain. An organization id whose
/// domain differs from the caller's domain is forbidden.
pub(crate) async fn caller_organization<DB: DatabaseAdapter>(
    identity: &Identity,
    ctx: &LedgerContext<DB>,
) -> LedgerResult<Organization> {
    if let Some(org_id) = &identity.organization_id {
        let organization = ctx
            .database
            .get_organization_by_id(org_id)
            .await?
            .ok_or_else(|| LedgerError::not_found("Organization not found"))?;
        if let Some(domain) = identity.domain.as_deref()
            && domain != organization.domain
        {
            tracing::warn!(
                uid = %identity.uid,
                organization_id = %organization.id,
                "Caller domain does not match organization"
            );
            return Err(LedgerError::forbidden(
                "You can only act for your own organization",
            ));
        }
        return Ok(organization);
    }

    let domain = identity.require_domain()?;
    ctx.database
        .list_organizations(OrganizationQuery::new().domain(domain).approved(true))
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| LedgerError::not_found("Organization not found"))
}

/// Create or approve the user behind a pending employee registration.
///
/// An existing user gets `approved = true` and `lastLogin = now`; otherwise a
/// new approved employee is created from the pending record.
pub(crate) async fn approve_pending_employee<DB: DatabaseAdapter>(
    pending: &PendingEmployee,
    organization_id: Option<String>,
    ctx: &LedgerContext<DB>,
) -> LedgerResult<User> {
    let now = chrono::Utc::now();
    if ctx.database.get_user_by_id(&pending.id).await?.is_some() {
        let update = UpdateUser {
            approved: Some(true),
            last_login: Some(now),
            organization_id,
            ..Default::default()
        };
        return ctx.database.update_user(&pending.id, update).await;
    }

    let mut create = CreateUser::new(&pending.full_name, &pending.email, Role::Employee)
        .with_id(&pending.id)
        .with_domain(&pending.domain)
        .with_approved(true)
        .with_created_at(pending.created_at)
        .with_last_login(now);
    create.organization_id = organization_id.or_else(|| pending.organization_id.clone());
    ctx.database.create_user(create).await
}

/// Apply a rejection policy to the user behind a pending employee registration.
pub(crate) async fn reject_pending_employee<DB: DatabaseAdapter>(
    pending: &PendingEmployee,
    policy: RejectionPolicy,
    ctx: &LedgerContext<DB>,
) -> LedgerResult<()> {
    match policy {
        RejectionPolicy::Delete => ctx.database.delete_user(&pending.id).await,
        RejectionPolicy::MarkUnapproved => {
            if ctx.database.get_user_by_id(&pending.id).await?.is_some() {
                let update = UpdateUser {
                    approved: Some(false),
                    ..Default::default()
                };
                ctx.database.update_user(&pending.id, update).await?;
            }
            Ok(())
        }
    }
}
