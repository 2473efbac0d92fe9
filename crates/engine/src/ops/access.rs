use sea_orm::{ConnectionTrait, QueryFilter, prelude::*};
use uuid::Uuid;

use crate::{
    AccessDecision, AssignmentStatus, EngineError, Requester, ResultEngine, Role, assignments,
    decide,
};

use super::Engine;

/// Single indexed lookup on (trainer, client, status).
pub(super) async fn has_active_assignment<C: ConnectionTrait>(
    db: &C,
    trainer_id: Uuid,
    client_id: Uuid,
) -> ResultEngine<bool> {
    assignments::Entity::find()
        .filter(assignments::Column::TrainerId.eq(trainer_id.to_string()))
        .filter(assignments::Column::ClientId.eq(client_id.to_string()))
        .filter(assignments::Column::Status.eq(AssignmentStatus::Active.as_str()))
        .one(db)
        .await
        .map(|model| model.is_some())
        .map_err(Into::into)
}

pub(super) async fn access_decision<C: ConnectionTrait>(
    db: &C,
    requester: &Requester,
    target: Uuid,
) -> ResultEngine<AccessDecision> {
    let has_assignment = match requester.role {
        Some(Role::Trainer) => has_active_assignment(db, requester.account_id, target).await?,
        _ => false,
    };
    Ok(decide(Some(requester), target, has_assignment))
}

/// Fails with `Unauthenticated`/`Forbidden` unless `requester` may act on `target`.
pub(super) async fn authorize<C: ConnectionTrait>(
    db: &C,
    requester: &Requester,
    target: Uuid,
) -> ResultEngine<()> {
    let decision = access_decision(db, requester, target).await?;
    if !decision.allowed {
        tracing::warn!(
            requester = %requester.account_id,
            target = %target,
            reason = ?decision.reason,
            "access denied"
        );
    }
    decision.into_result()
}

pub(super) fn require_admin(requester: &Requester) -> ResultEngine<()> {
    if requester.is_admin() {
        Ok(())
    } else {
        Err(EngineError::Forbidden("admin role required".to_string()))
    }
}

impl Engine {
    /// Whether `requester` may act on the account `target`, from the current
    /// assignment state.
    pub async fn access_decision(
        &self,
        requester: &Requester,
        target: Uuid,
    ) -> ResultEngine<AccessDecision> {
        access_decision(&self.database, requester, target).await
    }

    pub async fn authorize(&self, requester: &Requester, target: Uuid) -> ResultEngine<()> {
        authorize(&self.database, requester, target).await
    }
}
