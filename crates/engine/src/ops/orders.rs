//! Purchase flow.
//!
//! Steps of a purchase, all in one transaction:
//!
//! 1. guard the target client, resolve client, package and trainer
//! 2. price the line item, compute tax and the commission split
//! 3. insert the order and its line item (`pending_payment`)
//! 4. on completion: flip the status with a conditional update, grant
//!    credits with an atomic increment, write the commission record
//!
//! Amounts are computed server side from the stored package; nothing monetary
//! is taken from the request.

use chrono::Utc;
use sea_orm::{
    ConnectionTrait, DatabaseTransaction, PaginatorTrait, QueryFilter, prelude::*,
    sea_query::Expr,
};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    CommissionRecord, CreditBalance, EngineError, Order, OrderItem, OrderStatus, Requester,
    ResultEngine, Role, SessionStatus, StorefrontItem, TaxBreakdown, accounts,
    commission::{business_only, compute_split},
    commissions, order_items, orders, storefront, training_sessions,
    validation::PurchaseRequest,
};

use super::{
    Engine,
    access::{authorize, require_admin},
    require_account_with_role, require_client, with_tx,
};

/// Outcome of a completed purchase.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseReceipt {
    pub order: Order,
    pub commission: Option<CommissionRecord>,
    pub credits_granted: i64,
    pub new_credit_balance: CreditBalance,
    pub tax_details: TaxBreakdown,
}

/// Completed sessions that count towards the loyalty bump.
async fn prior_completed_sessions<C: ConnectionTrait>(db: &C, client_id: Uuid) -> ResultEngine<i64> {
    let count = training_sessions::Entity::find()
        .filter(training_sessions::Column::ClientId.eq(client_id.to_string()))
        .filter(training_sessions::Column::Status.eq(SessionStatus::Completed.as_str()))
        .filter(training_sessions::Column::Deducted.eq(true))
        .count(db)
        .await?;
    Ok(i64::try_from(count).unwrap_or(i64::MAX))
}

async fn load_order<C: ConnectionTrait>(db: &C, order_id: Uuid) -> ResultEngine<Order> {
    let model = orders::Entity::find_by_id(order_id.to_string())
        .one(db)
        .await?
        .ok_or_else(|| EngineError::KeyNotFound("order not exists".to_string()))?;
    let mut order = Order::try_from(model)?;
    order.items = order_items::Entity::find()
        .filter(order_items::Column::OrderId.eq(order_id.to_string()))
        .all(db)
        .await?
        .into_iter()
        .map(OrderItem::try_from)
        .collect::<ResultEngine<_>>()?;
    Ok(order)
}

/// Moves a pending order to `next`. The status filter makes concurrent
/// transitions of the same order lose with `Conflict`.
async fn transition_order(
    db_tx: &DatabaseTransaction,
    order: &mut Order,
    next: OrderStatus,
    payment_reference: Option<String>,
) -> ResultEngine<()> {
    order.status.ensure_transition(next)?;
    let now = Utc::now();

    let mut update = orders::Entity::update_many()
        .col_expr(orders::Column::Status, Expr::value(next.as_str()))
        .filter(orders::Column::Id.eq(order.id.to_string()))
        .filter(orders::Column::Status.eq(OrderStatus::PendingPayment.as_str()));
    update = match next {
        OrderStatus::Completed => update
            .col_expr(orders::Column::CompletedAt, Expr::value(now))
            .col_expr(
                orders::Column::PaymentReference,
                Expr::value(payment_reference.clone()),
            ),
        OrderStatus::Cancelled => update.col_expr(orders::Column::CancelledAt, Expr::value(now)),
        OrderStatus::PendingPayment => update,
    };
    let result = update.exec(db_tx).await?;
    if result.rows_affected != 1 {
        return Err(EngineError::Conflict(
            "order is no longer pending payment".to_string(),
        ));
    }

    order.status = next;
    match next {
        OrderStatus::Completed => {
            order.completed_at = Some(now);
            order.payment_reference = payment_reference;
        }
        OrderStatus::Cancelled => order.cancelled_at = Some(now),
        OrderStatus::PendingPayment => {}
    }
    Ok(())
}

impl Engine {
    /// Builds and stores a `pending_payment` order. No credits are granted.
    async fn checkout_in_tx(
        &self,
        db_tx: &DatabaseTransaction,
        requester: &Requester,
        request: &PurchaseRequest,
    ) -> ResultEngine<Order> {
        require_client(db_tx, request.client_id).await?;

        let item_model = storefront::Entity::find_by_id(request.storefront_item_id.to_string())
            .filter(storefront::Column::Active.eq(true))
            .one(db_tx)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("storefront item not exists".to_string()))?;
        let item = StorefrontItem::try_from(item_model)?;

        let trainer_id = match (request.trainer_id, requester.role) {
            (Some(trainer_id), Some(Role::Trainer)) if trainer_id != requester.account_id => {
                return Err(EngineError::Forbidden(
                    "trainers may only attribute sales to themselves".to_string(),
                ));
            }
            (Some(trainer_id), _) => Some(trainer_id),
            (None, Some(Role::Trainer)) => Some(requester.account_id),
            (None, _) => None,
        };
        if let Some(trainer_id) = trainer_id {
            require_account_with_role(db_tx, trainer_id, Role::Trainer, "trainer").await?;
        }

        let order_id = Uuid::new_v4();
        let line = OrderItem::for_package(order_id, &item, request.quantity)?;
        let sessions_granted = line.sessions()?;
        let gross = line.subtotal;

        let tax = self.tax_table.compute_tax(
            gross,
            request.client_state.as_deref(),
            request.absorb_tax,
        )?;
        let split = match trainer_id {
            Some(_) => {
                let prior = prior_completed_sessions(db_tx, request.client_id).await?;
                let eligible = self.loyalty_policy.is_eligible(prior, sessions_granted);
                compute_split(request.lead_source, gross, sessions_granted, eligible)?
            }
            None => business_only(gross),
        };

        let order = Order {
            id: order_id,
            client_id: request.client_id,
            trainer_id,
            status: OrderStatus::PendingPayment,
            lead_source: request.lead_source,
            jurisdiction: request
                .client_state
                .as_deref()
                .map(|s| s.trim().to_ascii_uppercase()),
            absorb_tax: request.absorb_tax,
            subtotal: gross,
            tax: tax.tax_amount,
            tax_rate_bps: tax.tax_rate_bps,
            total: tax.net_after_tax,
            tax_charged_to_client: tax.tax_charged_to_client,
            business_cut: split.business_cut,
            trainer_cut: split.trainer_cut,
            business_rate_bps: split.business_rate_bps,
            trainer_rate_bps: split.trainer_rate_bps,
            loyalty_bump: split.loyalty_bump,
            sessions_granted,
            created_by: requester.account_id,
            created_at: Utc::now(),
            completed_at: None,
            cancelled_at: None,
            payment_reference: None,
            items: vec![line],
        };

        let order_model: orders::ActiveModel = (&order).into();
        order_model.insert(db_tx).await?;
        order_items::Entity::insert_many(order.items.iter().map(order_items::ActiveModel::from))
            .exec(db_tx)
            .await?;

        Ok(order)
    }

    /// Completes a pending order: grant credits, record the commission.
    async fn complete_in_tx(
        &self,
        db_tx: &DatabaseTransaction,
        mut order: Order,
        payment_reference: Option<String>,
    ) -> ResultEngine<PurchaseReceipt> {
        transition_order(db_tx, &mut order, OrderStatus::Completed, payment_reference).await?;

        let granted = accounts::Entity::update_many()
            .col_expr(
                accounts::Column::SessionsRemaining,
                Expr::col(accounts::Column::SessionsRemaining).add(order.sessions_granted),
            )
            .col_expr(
                accounts::Column::TotalSessionsAllocated,
                Expr::col(accounts::Column::TotalSessionsAllocated).add(order.sessions_granted),
            )
            .filter(accounts::Column::Id.eq(order.client_id.to_string()))
            .exec(db_tx)
            .await?;
        if granted.rows_affected != 1 {
            return Err(EngineError::KeyNotFound("client not exists".to_string()));
        }
        let new_credit_balance = require_client(db_tx, order.client_id).await?.balance()?;

        let tax = order.tax_details();
        let commission = match order.trainer_id {
            Some(trainer_id) => {
                let split = order.split();
                let record = CommissionRecord::new(
                    order.id,
                    trainer_id,
                    order.lead_source,
                    &split,
                    &tax,
                    order.sessions_granted,
                );
                let model: commissions::ActiveModel = (&record).into();
                model.insert(db_tx).await?;
                Some(record)
            }
            None => None,
        };

        tracing::info!(
            order = %order.id,
            client = %order.client_id,
            credits = order.sessions_granted,
            balance = new_credit_balance.sessions_remaining,
            "order completed"
        );
        Ok(PurchaseReceipt {
            credits_granted: order.sessions_granted,
            new_credit_balance,
            tax_details: tax,
            commission,
            order,
        })
    }

    /// Create a `pending_payment` order for a client.
    pub async fn checkout(&self, requester: &Requester, request: &PurchaseRequest) -> ResultEngine<Order> {
        authorize(&self.database, requester, request.client_id).await?;
        with_tx!(self, |db_tx| {
            let order = self.checkout_in_tx(&db_tx, requester, request).await?;
            tracing::info!(order = %order.id, client = %order.client_id, "order created");
            Ok(order)
        })
    }

    /// Mark a pending order paid and grant its credits. Admin only.
    pub async fn complete_order(
        &self,
        requester: &Requester,
        order_id: Uuid,
        payment_reference: Option<String>,
    ) -> ResultEngine<PurchaseReceipt> {
        require_admin(requester)?;
        with_tx!(self, |db_tx| {
            let order = load_order(&db_tx, order_id).await?;
            self.complete_in_tx(&db_tx, order, payment_reference).await
        })
    }

    /// Cancel a pending order. Allowed to admins and to the buyer.
    pub async fn cancel_order(&self, requester: &Requester, order_id: Uuid) -> ResultEngine<Order> {
        with_tx!(self, |db_tx| {
            let mut order = load_order(&db_tx, order_id).await?;
            if !requester.is_admin() && requester.account_id != order.client_id {
                return Err(EngineError::Forbidden(
                    "only the buyer or an admin may cancel an order".to_string(),
                ));
            }
            transition_order(&db_tx, &mut order, OrderStatus::Cancelled, None).await?;
            tracing::info!(order = %order.id, "order cancelled");
            Ok(order)
        })
    }

    /// Checkout and completion in a single transaction.
    ///
    /// Only admins and trainers assigned to the client may grant credits.
    pub async fn purchase_and_grant(
        &self,
        requester: &Requester,
        request: &PurchaseRequest,
    ) -> ResultEngine<PurchaseReceipt> {
        self.authorize_grant(requester, request.client_id).await?;
        with_tx!(self, |db_tx| {
            let order = self.checkout_in_tx(&db_tx, requester, request).await?;
            self.complete_in_tx(&db_tx, order, None).await
        })
    }

    /// Whether `requester` may grant credits to `client_id`: an admin, or a
    /// trainer assigned to the client.
    pub async fn authorize_grant(&self, requester: &Requester, client_id: Uuid) -> ResultEngine<()> {
        if !matches!(requester.role, Some(Role::Admin | Role::Trainer)) {
            return Err(EngineError::Forbidden(
                "only admins and assigned trainers may grant credits".to_string(),
            ));
        }
        authorize(&self.database, requester, client_id).await
    }

    /// Order with its line items. Guarded on the buyer.
    pub async fn order(&self, requester: &Requester, order_id: Uuid) -> ResultEngine<Order> {
        let order = load_order(&self.database, order_id).await?;
        authorize(&self.database, requester, order.client_id).await?;
        Ok(order)
    }
}
