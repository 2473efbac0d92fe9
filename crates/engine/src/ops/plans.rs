use chrono::Utc;
use sea_orm::prelude::*;
use serde::Serialize;
use uuid::Uuid;

use crate::{
    EngineError, PlanDay, PlanExercise, Requester, ResultEngine, WorkoutPlan, plan_days,
    plan_exercises, validation::PlanDraft, workout_plans,
};

use super::{Engine, access::authorize, catalog::match_exercises, require_client, with_tx};

/// Outcome of persisting a generated plan.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanSaved {
    pub plan: WorkoutPlan,
    /// Exercises dropped from the plan because the library has no match.
    pub unmatched_exercises: Vec<String>,
}

impl Engine {
    /// Persist a generated workout plan for a client.
    ///
    /// Exercises without a library match are skipped and reported. A plan in
    /// which nothing matched is rejected with `Unprocessable` and nothing is
    /// stored.
    pub async fn save_workout_plan(
        &self,
        requester: &Requester,
        client_id: Uuid,
        draft: PlanDraft,
    ) -> ResultEngine<PlanSaved> {
        authorize(&self.database, requester, client_id).await?;

        with_tx!(self, |db_tx| {
            require_client(&db_tx, client_id).await?;

            let names = draft
                .days
                .iter()
                .flat_map(|day| day.exercises.iter().map(|e| e.name.as_str()))
                .collect::<Vec<_>>();
            let matches = match_exercises(&db_tx, names).await?;

            let mut unmatched_exercises: Vec<String> = Vec::new();
            let mut plan = WorkoutPlan {
                id: Uuid::new_v4(),
                client_id,
                created_by: requester.account_id,
                title: draft.title,
                summary: draft.summary,
                duration_weeks: draft.duration_weeks,
                status: "active".to_string(),
                created_at: Utc::now(),
                days: Vec::with_capacity(draft.days.len()),
            };

            for day_draft in draft.days {
                let day_id = Uuid::new_v4();
                let mut exercises = Vec::new();
                for ex in day_draft.exercises {
                    let Some(exercise_id) = matches.get(&ex.name).copied().flatten() else {
                        // Nameless entries are dropped without a report.
                        if !ex.name.trim().is_empty() && !unmatched_exercises.contains(&ex.name) {
                            unmatched_exercises.push(ex.name);
                        }
                        continue;
                    };
                    exercises.push(PlanExercise {
                        id: Uuid::new_v4(),
                        day_id,
                        exercise_id,
                        order_in_workout: ex.order_in_workout,
                        set_scheme: ex.set_scheme,
                        rep_goal: ex.rep_goal,
                        rest_period: ex.rest_period,
                        tempo: ex.tempo,
                        intensity_guideline: ex.intensity_guideline,
                        notes: ex.notes,
                        is_optional: ex.is_optional,
                    });
                }
                plan.days.push(PlanDay {
                    id: day_id,
                    plan_id: plan.id,
                    day_number: day_draft.day_number,
                    name: day_draft.name,
                    focus: day_draft.focus,
                    day_type: day_draft.day_type,
                    opt_phase: day_draft.opt_phase,
                    estimated_duration: day_draft.estimated_duration,
                    exercises,
                });
            }

            if plan.days.iter().all(|day| day.exercises.is_empty()) {
                return Err(EngineError::Unprocessable {
                    message: "no plan exercise matched the exercise library".to_string(),
                    unmatched: unmatched_exercises,
                });
            }

            let plan_model: workout_plans::ActiveModel = (&plan).into();
            plan_model.insert(&db_tx).await?;
            plan_days::Entity::insert_many(plan.days.iter().map(plan_days::ActiveModel::from))
                .exec(&db_tx)
                .await?;
            let exercise_models: Vec<plan_exercises::ActiveModel> = plan
                .days
                .iter()
                .flat_map(|day| day.exercises.iter().map(plan_exercises::ActiveModel::from))
                .collect();
            plan_exercises::Entity::insert_many(exercise_models)
                .exec(&db_tx)
                .await?;

            tracing::info!(
                plan = %plan.id,
                client = %client_id,
                days = plan.days.len(),
                unmatched = unmatched_exercises.len(),
                "workout plan saved"
            );
            Ok(PlanSaved {
                plan,
                unmatched_exercises,
            })
        })
    }
}
