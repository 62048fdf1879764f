use carbon_ledger_core::adapters::DatabaseAdapter;
use carbon_ledger_core::{
    CreateSale, Identity, LedgerContext, LedgerError, LedgerResult, SettlePurchase,
    TransactionQuery, TransactionStatus,
};

use crate::plugins::helpers::caller_organization;

use super::types::*;

// ---------------------------------------------------------------------------
// Core functions -- framework-agnostic business logic
// ---------------------------------------------------------------------------

/// Sales other organizations may currently buy, newest first.
pub(crate) async fn list_sales_core<DB: DatabaseAdapter>(
    identity: &Identity,
    ctx: &LedgerContext<DB>,
) -> LedgerResult<SalesResponse> {
    let organization = caller_organization(identity, ctx).await?;
    let statuses = TransactionStatus::purchasable(ctx.config.require_sale_approval);
    let sales = ctx
        .database
        .list_transactions(TransactionQuery::new().statuses(statuses).newest_first())
        .await?
        .into_iter()
        .filter(|t| t.seller_org_id != organization.id)
        .collect();
    Ok(SalesResponse { sales })
}

/// Every transaction the caller's organization sold or bought.
pub(crate) async fn list_transactions_core<DB: DatabaseAdapter>(
    identity: &Identity,
    ctx: &LedgerContext<DB>,
) -> LedgerResult<TransactionsResponse> {
    let organization = caller_organization(identity, ctx).await?;
    let transactions = ctx
        .database
        .list_transactions(
            TransactionQuery::new()
                .involving_org(organization.id)
                .newest_first(),
        )
        .await?;
    Ok(TransactionsResponse { transactions })
}

fn require_positive(value: f64, field: &str) -> LedgerResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(LedgerError::validation(format!(
            "{field} must be a positive number"
        )))
    }
}

/// Post a sale and reserve its credits from the seller's balance.
pub(crate) async fn sell_core<DB: DatabaseAdapter>(
    body: &SellRequest,
    identity: &Identity,
    ctx: &LedgerContext<DB>,
) -> LedgerResult<SellResponse> {
    let organization = caller_organization(identity, ctx).await?;

    let checked = require_positive(body.credit_amount, "creditAmount")
        .and_then(|_| require_positive(body.price, "price"));
    if let Err(e) = checked {
        tracing::warn!(organization_id = %organization.id, error = %e, "Sale rejected");
        return Err(e);
    }
    if body.credit_amount > organization.total_credits {
        tracing::warn!(
            organization_id = %organization.id,
            requested = body.credit_amount,
            available = organization.total_credits,
            "Sale exceeds tradable credits"
        );
        return Err(LedgerError::InsufficientCredits {
            requested: body.credit_amount,
            available: organization.total_credits,
        });
    }

    let posting = ctx
        .database
        .post_sale(CreateSale {
            seller_org_id: organization.id,
            credit_amount: body.credit_amount,
            price: body.price,
        })
        .await?;

    tracing::info!(
        transaction_id = %posting.transaction.id,
        seller_org_id = %posting.seller.id,
        credit_amount = posting.transaction.credit_amount,
        price = posting.transaction.price,
        "Sale posted"
    );

    Ok(SellResponse {
        remaining_credits: posting.seller.total_credits,
        transaction: posting.transaction,
    })
}

/// Settle a sale against the caller's organization.
pub(crate) async fn purchase_core<DB: DatabaseAdapter>(
    body: &PurchaseRequest,
    identity: &Identity,
    ctx: &LedgerContext<DB>,
) -> LedgerResult<PurchaseResponse> {
    let buyer = caller_organization(identity, ctx).await?;
    let settlement = ctx
        .database
        .settle_purchase(SettlePurchase {
            transaction_id: body.transaction_id.clone(),
            buyer_org_id: buyer.id,
            purchasable: TransactionStatus::purchasable(ctx.config.require_sale_approval),
        })
        .await
        .inspect_err(|e| {
            tracing::warn!(transaction_id = %body.transaction_id, error = %e, "Purchase rejected");
        })?;

    if settlement.seller.is_none() {
        tracing::warn!(
            transaction_id = %settlement.transaction.id,
            seller_org_id = %settlement.transaction.seller_org_id,
            "Seller organization missing, seller leg skipped"
        );
    }
    tracing::info!(
        transaction_id = %settlement.transaction.id,
        buyer_org_id = %settlement.buyer.id,
        total_price = settlement.total_price,
        "Purchase settled"
    );

    Ok(PurchaseResponse {
        transaction: settlement.transaction,
        buyer: settlement.buyer,
        total_price: settlement.total_price,
    })
}

/// Approve or reject a pending sale.
///
/// Rejection leaves the seller's reserved credits where they are. A sale
/// that settled or was reviewed concurrently yields `Conflict`.
pub(crate) async fn review_sale_core<DB: DatabaseAdapter>(
    body: &ReviewSaleRequest,
    ctx: &LedgerContext<DB>,
) -> LedgerResult<ReviewSaleResponse> {
    let status = if body.approve {
        TransactionStatus::Approved
    } else {
        TransactionStatus::Rejected
    };
    let transaction = ctx
        .database
        .review_sale(&body.transaction_id, status)
        .await
        .inspect_err(|e| {
            tracing::warn!(transaction_id = %body.transaction_id, error = %e, "Sale review refused");
        })?;

    tracing::info!(transaction_id = %transaction.id, status = %status, "Sale reviewed");
    Ok(ReviewSaleResponse { transaction })
}
