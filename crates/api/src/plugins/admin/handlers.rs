use carbon_ledger_core::adapters::DatabaseAdapter;
use carbon_ledger_core::{
    CreateOrganization, CreateUser, CreditTransaction, LedgerContext, LedgerError, LedgerResult,
    Organization, OrganizationQuery, PendingEmployee, PendingEmployer, PendingQuery, Role,
    TransactionQuery, Trip, TripQuery, UpdateUser, User, UserQuery,
};

use crate::plugins::helpers::{approve_pending_employee, reject_pending_employee};

use super::AdminConfig;
use super::types::*;

// ---------------------------------------------------------------------------
// Core functions -- framework-agnostic business logic
// ---------------------------------------------------------------------------

pub(crate) async fn list_organizations_core<DB: DatabaseAdapter>(
    ctx: &LedgerContext<DB>,
) -> LedgerResult<Vec<Organization>> {
    ctx.database
        .list_organizations(OrganizationQuery::new().order_by_name())
        .await
}

pub(crate) async fn list_users_core<DB: DatabaseAdapter>(
    ctx: &LedgerContext<DB>,
) -> LedgerResult<Vec<User>> {
    ctx.database
        .list_users(UserQuery::new().order_by_name())
        .await
}

pub(crate) async fn list_transactions_core<DB: DatabaseAdapter>(
    ctx: &LedgerContext<DB>,
) -> LedgerResult<Vec<CreditTransaction>> {
    ctx.database
        .list_transactions(TransactionQuery::new().newest_first())
        .await
}

pub(crate) async fn list_trips_core<DB: DatabaseAdapter>(
    ctx: &LedgerContext<DB>,
) -> LedgerResult<Vec<Trip>> {
    ctx.database
        .list_trips(
            TripQuery::new()
                .newest_first()
                .limit(ctx.config.trip_listing_limit),
        )
        .await
}

pub(crate) async fn list_pending_employers_core<DB: DatabaseAdapter>(
    ctx: &LedgerContext<DB>,
) -> LedgerResult<Vec<PendingEmployer>> {
    ctx.database.list_pending_employers(PendingQuery::new()).await
}

pub(crate) async fn list_pending_employees_core<DB: DatabaseAdapter>(
    ctx: &LedgerContext<DB>,
) -> LedgerResult<Vec<PendingEmployee>> {
    ctx.database.list_pending_employees(PendingQuery::new()).await
}

pub(crate) async fn overview_core<DB: DatabaseAdapter>(
    ctx: &LedgerContext<DB>,
) -> LedgerResult<OverviewResponse> {
    let users = list_users_core(ctx).await?;
    let employees = users
        .iter()
        .filter(|u| u.role == Role::Employee)
        .cloned()
        .collect();
    let employers = users
        .iter()
        .filter(|u| u.role == Role::Employer)
        .cloned()
        .collect();

    Ok(OverviewResponse {
        organizations: list_organizations_core(ctx).await?,
        users,
        employees,
        employers,
        transactions: list_transactions_core(ctx).await?,
        trips: list_trips_core(ctx).await?,
        pending_employers: list_pending_employers_core(ctx).await?,
        pending_employees: list_pending_employees_core(ctx).await?,
    })
}

/// Approve or reject a pending employer registration.
///
/// Approval upserts the user as an approved employer, creates the
/// organization seeded with the bootstrap balance and links the two.
/// Rejection deletes the user. The pending record goes either way.
pub(crate) async fn approve_employer_core<DB: DatabaseAdapter>(
    body: &ApprovalRequest,
    ctx: &LedgerContext<DB>,
) -> LedgerResult<ApprovalResponse> {
    let pending = ctx
        .database
        .get_pending_employer(&body.pending_id)
        .await?
        .ok_or_else(|| LedgerError::not_found("Pending employer not found"))?;

    let mut response = ApprovalResponse {
        pending_id: pending.id.clone(),
        approved: body.approve,
        user: None,
        organization: None,
    };

    if body.approve {
        let organization = ctx
            .database
            .create_organization(
                CreateOrganization::new(&pending.organization_name, &pending.organization_domain)
                    .with_available_money(ctx.config.bootstrap_available_money)
                    .with_approved(true),
            )
            .await?;

        let user = if ctx.database.get_user_by_id(&pending.id).await?.is_some() {
            let update = UpdateUser {
                role: Some(Role::Employer),
                approved: Some(true),
                domain: Some(pending.organization_domain.clone()),
                organization_id: Some(organization.id.clone()),
                ..Default::default()
            };
            ctx.database.update_user(&pending.id, update).await?
        } else {
            ctx.database
                .create_user(
                    CreateUser::new(&pending.full_name, &pending.email, Role::Employer)
                        .with_id(&pending.id)
                        .with_domain(&pending.organization_domain)
                        .with_organization_id(&organization.id)
                        .with_approved(true)
                        .with_created_at(pending.created_at),
                )
                .await?
        };

        tracing::info!(
            organization_id = %organization.id,
            domain = %organization.domain,
            "Employer approved and organization created"
        );
        response.user = Some(user);
        response.organization = Some(organization);
    } else {
        ctx.database.delete_user(&pending.id).await?;
        tracing::info!(pending_id = %pending.id, "Employer registration rejected");
    }

    ctx.database.delete_pending_employer(&pending.id).await?;
    Ok(response)
}

/// Approve or reject a pending employee registration from the admin view.
pub(crate) async fn approve_employee_core<DB: DatabaseAdapter>(
    body: &ApprovalRequest,
    config: &AdminConfig,
    ctx: &LedgerContext<DB>,
) -> LedgerResult<ApprovalResponse> {
    let pending = ctx
        .database
        .get_pending_employee(&body.pending_id)
        .await?
        .ok_or_else(|| LedgerError::not_found("Pending employee not found"))?;

    let user = if body.approve {
        Some(approve_pending_employee(&pending, None, ctx).await?)
    } else {
        reject_pending_employee(&pending, config.employee_rejection, ctx).await?;
        None
    };

    ctx.database.delete_pending_employee(&pending.id).await?;
    tracing::info!(
        pending_id = %pending.id,
        approved = body.approve,
        "Employee registration reviewed by admin"
    );

    Ok(ApprovalResponse {
        pending_id: pending.id,
        approved: body.approve,
        user,
        organization: None,
    })
}
