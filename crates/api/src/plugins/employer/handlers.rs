use carbon_ledger_core::adapters::DatabaseAdapter;
use carbon_ledger_core::{
    CreditSummary, Identity, LedgerContext, LedgerError, LedgerResult, PendingQuery, Role,
    TripQuery, UpdateOrganization, UserQuery, aggregate_credits, credits_by_transport_mode,
    trips_by_month,
};

use crate::plugins::helpers::{
    approve_pending_employee, caller_organization, reject_pending_employee,
};

use super::EmployerConfig;
use super::types::*;

// ---------------------------------------------------------------------------
// Core functions -- framework-agnostic business logic
// ---------------------------------------------------------------------------

pub(crate) async fn organization_core<DB: DatabaseAdapter>(
    identity: &Identity,
    ctx: &LedgerContext<DB>,
) -> LedgerResult<OrganizationResponse> {
    let organization = caller_organization(identity, ctx).await?;
    Ok(OrganizationResponse { organization })
}

/// Recompute the organization's earned credits from its employees' trips.
///
/// Only `carbonCredits` is written; per-employee totals are returned, never
/// stored on user records. With no approved employees no trip query is
/// issued and the organization is reset to zero.
pub(crate) async fn refresh_credits_core<DB: DatabaseAdapter>(
    identity: &Identity,
    ctx: &LedgerContext<DB>,
) -> LedgerResult<RefreshCreditsResponse> {
    let organization = caller_organization(identity, ctx).await?;
    let employees = ctx
        .database
        .list_users(UserQuery::approved_employees(&organization.domain).order_by_name())
        .await?;

    let summary = if employees.is_empty() {
        CreditSummary::default()
    } else {
        let trips = ctx
            .database
            .list_trips(TripQuery::new().user_ids(employees.iter().map(|e| e.id.clone())))
            .await?;
        aggregate_credits(employees.iter().map(|e| e.id.as_str()), &trips)
    };

    let update = UpdateOrganization {
        carbon_credits: Some(summary.total),
        ..Default::default()
    };
    let organization = ctx
        .database
        .update_organization(&organization.id, update)
        .await?;

    tracing::info!(
        organization_id = %organization.id,
        employees = employees.len(),
        carbon_credits = summary.total,
        "Organization credits recomputed"
    );

    let employees = employees
        .into_iter()
        .map(|e| EmployeeCredits {
            carbon_credits: summary.employee_total(&e.id),
            id: e.id,
            name: e.name,
            email: e.email,
        })
        .collect();

    Ok(RefreshCreditsResponse {
        total_credits: summary.total,
        organization,
        employees,
    })
}

pub(crate) async fn employees_core<DB: DatabaseAdapter>(
    identity: &Identity,
    ctx: &LedgerContext<DB>,
) -> LedgerResult<EmployeesResponse> {
    let domain = identity.require_domain()?;
    let employees = ctx
        .database
        .list_users(UserQuery::approved_employees(domain).order_by_name())
        .await?;
    Ok(EmployeesResponse { employees })
}

/// Pending employees of the caller's domain.
///
/// A record is hidden once the user with the same id is approved, whatever
/// that user's role.
pub(crate) async fn pending_employees_core<DB: DatabaseAdapter>(
    identity: &Identity,
    ctx: &LedgerContext<DB>,
) -> LedgerResult<PendingEmployeesResponse> {
    let domain = identity.require_domain()?;
    let pending = ctx
        .database
        .list_pending_employees(PendingQuery::new().domain(domain))
        .await?;

    let mut pending_employees = Vec::with_capacity(pending.len());
    for record in pending {
        let approved = ctx
            .database
            .get_user_by_id(&record.id)
            .await?
            .is_some_and(|user| user.approved);
        if !approved {
            pending_employees.push(record);
        }
    }
    Ok(PendingEmployeesResponse { pending_employees })
}

/// Approve or reject a pending employee of the caller's domain.
pub(crate) async fn approve_employee_core<DB: DatabaseAdapter>(
    body: &ApprovalRequest,
    identity: &Identity,
    config: &EmployerConfig,
    ctx: &LedgerContext<DB>,
) -> LedgerResult<EmployeeApprovalResponse> {
    let domain = identity.require_domain()?;
    let pending = ctx
        .database
        .get_pending_employee(&body.pending_id)
        .await?
        .ok_or_else(|| LedgerError::not_found("Pending employee not found"))?;

    if pending.domain != domain {
        tracing::warn!(
            pending_id = %pending.id,
            caller_domain = %domain,
            "Employer attempted to review an employee of another domain"
        );
        return Err(LedgerError::forbidden(
            "You can only review employees of your own organization",
        ));
    }

    let user = if body.approve {
        let organization_id = match caller_organization(identity, ctx).await {
            Ok(organization) => Some(organization.id),
            Err(LedgerError::NotFound(_)) => pending.organization_id.clone(),
            Err(e) => return Err(e),
        };
        Some(approve_pending_employee(&pending, organization_id, ctx).await?)
    } else {
        reject_pending_employee(&pending, config.employee_rejection, ctx).await?;
        None
    };

    ctx.database.delete_pending_employee(&pending.id).await?;
    tracing::info!(
        pending_id = %pending.id,
        approved = body.approve,
        "Employee registration reviewed by employer"
    );

    Ok(EmployeeApprovalResponse {
        pending_id: pending.id,
        approved: body.approve,
        user,
    })
}

/// Trip history of one employee of the caller's domain.
pub(crate) async fn employee_trips_core<DB: DatabaseAdapter>(
    user_id: &str,
    identity: &Identity,
    ctx: &LedgerContext<DB>,
) -> LedgerResult<EmployeeTripsResponse> {
    let domain = identity.require_domain()?;
    let user = ctx
        .database
        .get_user_by_id(user_id)
        .await?
        .filter(|u| u.role == Role::Employee && u.domain.as_deref() == Some(domain))
        .ok_or_else(|| LedgerError::not_found("Employee not found"))?;

    let trips = ctx
        .database
        .list_trips(TripQuery::new().user_ids([user.id.as_str()]).newest_first())
        .await?;
    let total_credits: f64 = trips.iter().map(|t| t.carbon_credits).sum();

    Ok(EmployeeTripsResponse {
        user_id: user.id,
        total_credits,
        monthly: trips_by_month(&trips),
        by_transport_mode: credits_by_transport_mode(&trips),
        trips,
    })
}
