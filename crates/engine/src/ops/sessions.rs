use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use sea_orm::{QueryFilter, QueryOrder, prelude::*, sea_query::Expr};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    EngineError, Requester, ResultEngine, Role, SessionStatus, TrainingSession, accounts,
    training_sessions, validation::BookingRequest,
};

use super::{
    Engine,
    access::{authorize, require_admin},
    require_account_with_role, require_client, with_tx,
};

/// Result of one deduction pass.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeductionReport {
    pub clients_processed: u64,
    pub sessions_deducted: u64,
    /// Sessions completed without a credit to consume.
    pub sessions_without_credit: u64,
    /// Clients that ran out of credits during this pass.
    pub no_credits: Vec<Uuid>,
}

impl Engine {
    /// Schedule a training session for a client.
    pub async fn book_session(
        &self,
        requester: &Requester,
        client_id: Uuid,
        request: BookingRequest,
    ) -> ResultEngine<TrainingSession> {
        authorize(&self.database, requester, client_id).await?;

        let trainer_id = match requester.role {
            Some(Role::Trainer) => Some(request.trainer_id.unwrap_or(requester.account_id)),
            _ => request.trainer_id,
        };

        with_tx!(self, |db_tx| {
            require_client(&db_tx, client_id).await?;
            if let Some(trainer_id) = trainer_id {
                require_account_with_role(&db_tx, trainer_id, Role::Trainer, "trainer").await?;
            }
            let session =
                TrainingSession::scheduled(client_id, trainer_id, request.scheduled_at, request.notes);
            let model: training_sessions::ActiveModel = (&session).into();
            model.insert(&db_tx).await?;
            tracing::info!(session = %session.id, client = %client_id, "session booked");
            Ok(session)
        })
    }

    /// Consume credits for every past session that has not been deducted yet.
    ///
    /// Per client, `min(pending, sessions_remaining)` credits are taken with a
    /// single atomic decrement, oldest sessions first. Sessions beyond the
    /// available credits are completed without deduction and the client is
    /// reported in `no_credits`.
    pub async fn process_session_deductions(&self, now: DateTime<Utc>) -> ResultEngine<DeductionReport> {
        with_tx!(self, |db_tx| {
            let due = training_sessions::Entity::find()
                .filter(training_sessions::Column::Status.is_in([
                    SessionStatus::Scheduled.as_str(),
                    SessionStatus::Confirmed.as_str(),
                ]))
                .filter(training_sessions::Column::Deducted.eq(false))
                .filter(training_sessions::Column::ScheduledAt.lte(now))
                .order_by_asc(training_sessions::Column::ScheduledAt)
                .all(&db_tx)
                .await?;

            let mut by_client: BTreeMap<String, Vec<String>> = BTreeMap::new();
            for session in due {
                by_client.entry(session.client_id).or_default().push(session.id);
            }

            let mut report = DeductionReport::default();
            for (client_id, session_ids) in by_client {
                let Some(account) = accounts::Entity::find_by_id(client_id.clone())
                    .one(&db_tx)
                    .await?
                else {
                    tracing::warn!(client = %client_id, "sessions reference a missing account");
                    continue;
                };

                let pending = session_ids.len() as i64;
                let deduct = pending.min(account.sessions_remaining.max(0));
                if deduct > 0 {
                    let result = accounts::Entity::update_many()
                        .col_expr(
                            accounts::Column::SessionsRemaining,
                            Expr::col(accounts::Column::SessionsRemaining).sub(deduct),
                        )
                        .filter(accounts::Column::Id.eq(client_id.clone()))
                        .filter(accounts::Column::SessionsRemaining.gte(deduct))
                        .exec(&db_tx)
                        .await?;
                    if result.rows_affected != 1 {
                        return Err(EngineError::Conflict(format!(
                            "credit balance of {client_id} changed during deduction"
                        )));
                    }
                }

                let (paid, unpaid) = session_ids.split_at(deduct as usize);
                if !paid.is_empty() {
                    training_sessions::Entity::update_many()
                        .col_expr(
                            training_sessions::Column::Status,
                            Expr::value(SessionStatus::Completed.as_str()),
                        )
                        .col_expr(training_sessions::Column::Deducted, Expr::value(true))
                        .col_expr(training_sessions::Column::DeductedAt, Expr::value(now))
                        .filter(training_sessions::Column::Id.is_in(paid.iter().cloned()))
                        .exec(&db_tx)
                        .await?;
                }
                if !unpaid.is_empty() {
                    training_sessions::Entity::update_many()
                        .col_expr(
                            training_sessions::Column::Status,
                            Expr::value(SessionStatus::Completed.as_str()),
                        )
                        .filter(training_sessions::Column::Id.is_in(unpaid.iter().cloned()))
                        .exec(&db_tx)
                        .await?;
                    report.no_credits.push(parse_client(&client_id)?);
                }

                report.clients_processed += 1;
                report.sessions_deducted += paid.len() as u64;
                report.sessions_without_credit += unpaid.len() as u64;
            }

            if report.clients_processed > 0 {
                tracing::info!(
                    clients = report.clients_processed,
                    deducted = report.sessions_deducted,
                    without_credit = report.sessions_without_credit,
                    "session deductions processed"
                );
            }
            Ok(report)
        })
    }

    /// [`Engine::process_session_deductions`] on behalf of an admin.
    pub async fn run_session_deductions(
        &self,
        requester: &Requester,
        now: DateTime<Utc>,
    ) -> ResultEngine<DeductionReport> {
        require_admin(requester)?;
        self.process_session_deductions(now).await
    }
}

fn parse_client(id: &str) -> ResultEngine<Uuid> {
    crate::util::parse_uuid(id, "client")
}
