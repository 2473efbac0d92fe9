use chrono::Utc;
use sea_orm::{QueryFilter, QueryOrder, prelude::*, sea_query::Expr};
use uuid::Uuid;

use crate::{
    Assignment, AssignmentStatus, EngineError, Requester, ResultEngine, Role, assignments,
};

use super::{Engine, access::require_admin, require_account_with_role, require_client, with_tx};

impl Engine {
    /// Link a trainer to a client. Admin only.
    ///
    /// Fails with `Conflict` when the pair already has an active assignment.
    pub async fn assign_trainer(
        &self,
        requester: &Requester,
        client_id: Uuid,
        trainer_id: Uuid,
    ) -> ResultEngine<Assignment> {
        require_admin(requester)?;
        with_tx!(self, |db_tx| {
            require_client(&db_tx, client_id).await?;
            require_account_with_role(&db_tx, trainer_id, Role::Trainer, "trainer").await?;

            let active = assignments::Entity::find()
                .filter(assignments::Column::TrainerId.eq(trainer_id.to_string()))
                .filter(assignments::Column::ClientId.eq(client_id.to_string()))
                .filter(assignments::Column::Status.eq(AssignmentStatus::Active.as_str()))
                .one(&db_tx)
                .await?;
            if active.is_some() {
                return Err(EngineError::Conflict(
                    "trainer is already assigned to this client".to_string(),
                ));
            }

            let assignment = Assignment::new(client_id, trainer_id, requester.account_id);
            let model: assignments::ActiveModel = (&assignment).into();
            model.insert(&db_tx).await?;
            tracing::info!(client = %client_id, trainer = %trainer_id, "trainer assigned");
            Ok(assignment)
        })
    }

    /// Deactivate the active assignment between a client and a trainer. Admin only.
    pub async fn unassign_trainer(
        &self,
        requester: &Requester,
        client_id: Uuid,
        trainer_id: Uuid,
    ) -> ResultEngine<()> {
        require_admin(requester)?;
        with_tx!(self, |db_tx| {
            let result = assignments::Entity::update_many()
                .col_expr(
                    assignments::Column::Status,
                    Expr::value(AssignmentStatus::Inactive.as_str()),
                )
                .col_expr(assignments::Column::UpdatedAt, Expr::value(Utc::now()))
                .filter(assignments::Column::TrainerId.eq(trainer_id.to_string()))
                .filter(assignments::Column::ClientId.eq(client_id.to_string()))
                .filter(assignments::Column::Status.eq(AssignmentStatus::Active.as_str()))
                .exec(&db_tx)
                .await?;
            if result.rows_affected == 0 {
                return Err(EngineError::KeyNotFound("assignment not exists".to_string()));
            }
            tracing::info!(client = %client_id, trainer = %trainer_id, "trainer unassigned");
            Ok(())
        })
    }

    /// Active assignments of a trainer, oldest first.
    pub async fn trainer_clients(&self, trainer_id: Uuid) -> ResultEngine<Vec<Assignment>> {
        assignments::Entity::find()
            .filter(assignments::Column::TrainerId.eq(trainer_id.to_string()))
            .filter(assignments::Column::Status.eq(AssignmentStatus::Active.as_str()))
            .order_by_asc(assignments::Column::CreatedAt)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Assignment::try_from)
            .collect()
    }
}
