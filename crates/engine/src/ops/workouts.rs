use chrono::Utc;
use sea_orm::{
    ActiveValue, Condition, ConnectionTrait, QueryFilter, QueryOrder, QuerySelect, prelude::*,
    sea_query::Expr,
};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    EngineError, Requester, ResultEngine, Workout, WorkoutListQuery, WorkoutRow, WorkoutTotals,
    util::{decode_cursor, encode_cursor},
    validation::WorkoutDraft,
    workout_log_rows, workouts,
};

use super::{Engine, access::authorize, catalog::match_exercises, require_client, with_tx};

/// Outcome of logging a workout.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutLogged {
    pub workout: Workout,
    /// Exercise names logged without a library match.
    pub unmatched_exercises: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutPage {
    pub items: Vec<Workout>,
    pub next_cursor: Option<String>,
}

async fn rows_of<C: ConnectionTrait>(db: &C, workout_id: &str) -> ResultEngine<Vec<WorkoutRow>> {
    workout_log_rows::Entity::find()
        .filter(workout_log_rows::Column::SessionId.eq(workout_id))
        .order_by_asc(workout_log_rows::Column::Position)
        .all(db)
        .await?
        .into_iter()
        .map(WorkoutRow::try_from)
        .collect()
}

/// A workout that exists and is not soft-deleted.
async fn live_workout<C: ConnectionTrait>(db: &C, workout_id: Uuid) -> ResultEngine<workouts::Model> {
    workouts::Entity::find_by_id(workout_id.to_string())
        .filter(workouts::Column::DeletedAt.is_null())
        .one(db)
        .await?
        .ok_or_else(|| EngineError::KeyNotFound("workout not exists".to_string()))
}

impl Engine {
    /// Log a workout session with all its sets.
    ///
    /// The session, every row and the aggregates are written in one
    /// transaction. Exercises missing from the library are logged without an
    /// `exercise_id` and reported back; when none matches the whole write is
    /// rolled back with `Unprocessable`.
    pub async fn log_workout(
        &self,
        requester: &Requester,
        client_id: Uuid,
        draft: WorkoutDraft,
    ) -> ResultEngine<WorkoutLogged> {
        authorize(&self.database, requester, client_id).await?;

        with_tx!(self, |db_tx| {
            require_client(&db_tx, client_id).await?;

            let matches =
                match_exercises(&db_tx, draft.exercises.iter().map(|e| e.name.as_str()).collect::<Vec<_>>()).await?;
            let mut unmatched_exercises: Vec<String> = Vec::new();
            for exercise in &draft.exercises {
                let matched = matches.get(&exercise.name).copied().flatten();
                if matched.is_none() && !unmatched_exercises.contains(&exercise.name) {
                    unmatched_exercises.push(exercise.name.clone());
                }
            }
            if unmatched_exercises.len() == matches.len() {
                return Err(EngineError::Unprocessable {
                    message: "no exercise matched the exercise library".to_string(),
                    unmatched: unmatched_exercises,
                });
            }

            let now = Utc::now();
            let mut workout = Workout {
                id: Uuid::new_v4(),
                client_id,
                logged_by: requester.account_id,
                title: draft.title,
                date: draft.date,
                duration_minutes: draft.duration_minutes,
                intensity: draft.intensity,
                notes: draft.notes,
                total_sets: 0,
                total_reps: 0,
                total_weight: crate::Weight::ZERO,
                created_at: now,
                deleted_at: None,
                rows: Vec::new(),
            };
            let model: workouts::ActiveModel = (&workout).into();
            model.insert(&db_tx).await?;

            let mut position = 0;
            let mut rows = Vec::new();
            for exercise in &draft.exercises {
                let exercise_id = matches.get(&exercise.name).copied().flatten();
                for set in &exercise.sets {
                    rows.push((
                        position,
                        WorkoutRow {
                            id: Uuid::new_v4(),
                            session_id: workout.id,
                            exercise_id,
                            exercise_name: exercise.name.clone(),
                            set_number: set.set_number,
                            reps: set.reps,
                            weight: set.weight,
                            pain_level: exercise.pain_level,
                            body_region: exercise.body_region,
                            created_at: now,
                        },
                    ));
                    position += 1;
                }
            }
            workout_log_rows::Entity::insert_many(rows.iter().map(|(position, row)| {
                let mut model = workout_log_rows::ActiveModel::from(row);
                model.position = ActiveValue::Set(*position);
                model
            }))
            .exec(&db_tx)
            .await?;

            // Aggregates come from what was stored, not from the request.
            let stored = rows_of(&db_tx, &workout.id.to_string()).await?;
            let totals = WorkoutTotals::from_rows(&stored)?;
            workouts::Entity::update_many()
                .col_expr(workouts::Column::TotalSets, Expr::value(totals.sets))
                .col_expr(workouts::Column::TotalReps, Expr::value(totals.reps))
                .col_expr(workouts::Column::TotalWeightCenti, Expr::value(totals.weight.centi()))
                .filter(workouts::Column::Id.eq(workout.id.to_string()))
                .exec(&db_tx)
                .await?;

            workout.total_sets = totals.sets;
            workout.total_reps = totals.reps;
            workout.total_weight = totals.weight;
            workout.rows = stored;

            tracing::info!(
                workout = %workout.id,
                client = %client_id,
                sets = totals.sets,
                unmatched = unmatched_exercises.len(),
                "workout logged"
            );
            Ok(WorkoutLogged {
                workout,
                unmatched_exercises,
            })
        })
    }

    /// A client's workouts, newest first, without rows.
    pub async fn workouts(
        &self,
        requester: &Requester,
        client_id: Uuid,
        query: WorkoutListQuery,
    ) -> ResultEngine<WorkoutPage> {
        authorize(&self.database, requester, client_id).await?;
        require_client(&self.database, client_id).await?;

        let limit = query.effective_limit();
        let mut select = workouts::Entity::find()
            .filter(workouts::Column::ClientId.eq(client_id.to_string()))
            .filter(workouts::Column::DeletedAt.is_null());
        if let Some(cursor) = query.cursor.as_deref() {
            let (created_at, id) = decode_cursor(cursor)?;
            select = select.filter(
                Condition::any()
                    .add(workouts::Column::CreatedAt.lt(created_at))
                    .add(
                        Condition::all()
                            .add(workouts::Column::CreatedAt.eq(created_at))
                            .add(workouts::Column::Id.lt(id)),
                    ),
            );
        }
        let mut models = select
            .order_by_desc(workouts::Column::CreatedAt)
            .order_by_desc(workouts::Column::Id)
            .limit(limit + 1)
            .all(&self.database)
            .await?;

        let next_cursor = if models.len() as u64 > limit {
            models.truncate(limit as usize);
            models
                .last()
                .map(|last| encode_cursor(last.created_at, &last.id))
        } else {
            None
        };
        let items = models
            .into_iter()
            .map(Workout::try_from)
            .collect::<ResultEngine<_>>()?;
        Ok(WorkoutPage { items, next_cursor })
    }

    /// A workout with its rows.
    pub async fn workout(&self, requester: &Requester, workout_id: Uuid) -> ResultEngine<Workout> {
        let model = live_workout(&self.database, workout_id).await?;
        let mut workout = Workout::try_from(model)?;
        authorize(&self.database, requester, workout.client_id).await?;
        workout.rows = rows_of(&self.database, &workout.id.to_string()).await?;
        Ok(workout)
    }

    /// Soft-delete a workout. Rows are kept.
    pub async fn delete_workout(&self, requester: &Requester, workout_id: Uuid) -> ResultEngine<()> {
        let model = live_workout(&self.database, workout_id).await?;
        let client_id = Workout::try_from(model)?.client_id;
        authorize(&self.database, requester, client_id).await?;

        with_tx!(self, |db_tx| {
            let result = workouts::Entity::update_many()
                .col_expr(workouts::Column::DeletedAt, Expr::value(Utc::now()))
                .filter(workouts::Column::Id.eq(workout_id.to_string()))
                .filter(workouts::Column::DeletedAt.is_null())
                .exec(&db_tx)
                .await?;
            if result.rows_affected == 0 {
                return Err(EngineError::KeyNotFound("workout not exists".to_string()));
            }
            tracing::info!(workout = %workout_id, "workout deleted");
            Ok(())
        })
    }
}
