mod common;

use chrono::{Duration, Utc};
use engine::{
    EngineError, Role, Weight, WorkoutListQuery,
    validation::{ExerciseDraft, SetDraft, WorkoutDraft, parse_plan, parse_workout},
};
use serde_json::{Value, json};

use common::studio;

fn workout_body(exercises: Value) -> Value {
    json!({
        "title": "Push day",
        "date": (Utc::now() - Duration::days(1)).to_rfc3339(),
        "duration": 60,
        "intensity": 7,
        "exercises": exercises
    })
}

fn three_sets() -> Value {
    json!([
        {"setNumber": 1, "reps": 10, "weight": 100},
        {"setNumber": 2, "reps": 8, "weight": 100},
        {"setNumber": 3, "reps": 6, "weight": 100}
    ])
}

#[tokio::test]
async fn logging_computes_aggregates_from_stored_rows() {
    let studio = studio().await;
    let client = studio.account("Cleo", Role::Client).await;
    let bench = studio.exercise("Bench Press").await;
    studio.exercise("Barbell Row").await;

    let body = workout_body(json!([
        {"name": "bench press", "sets": three_sets()},
        {"name": "Barbell Row", "sets": three_sets()}
    ]));
    let draft = parse_workout(&body, Utc::now()).unwrap();
    let logged = studio
        .engine
        .log_workout(&client, client.account_id, draft)
        .await
        .unwrap();

    assert!(logged.unmatched_exercises.is_empty());
    let workout = logged.workout;
    assert_eq!(workout.total_sets, 6);
    assert_eq!(workout.total_reps, 48);
    assert_eq!(workout.total_weight, Weight::from_centi(480_000));
    assert_eq!(workout.rows.len(), 6);
    assert_eq!(workout.rows[0].exercise_id, Some(bench));
    assert_eq!(workout.rows[2].set_number, 3);

    let stored = studio.engine.workout(&client, workout.id).await.unwrap();
    assert_eq!(stored.total_reps, 48);
    assert_eq!(stored.rows, workout.rows);
}

#[tokio::test]
async fn unmatched_exercises_are_logged_and_reported() {
    let studio = studio().await;
    let client = studio.account("Cleo", Role::Client).await;
    let squat = studio.exercise("Squat").await;

    let body = workout_body(json!([
        {"name": "Back Squat", "sets": [{"reps": 5, "weight": 80}]},
        {"name": "Underwater Basket Weaving", "sets": [{"reps": 1}]}
    ]));
    let draft = parse_workout(&body, Utc::now()).unwrap();
    let logged = studio
        .engine
        .log_workout(&client, client.account_id, draft)
        .await
        .unwrap();

    assert_eq!(logged.unmatched_exercises, vec!["Underwater Basket Weaving"]);
    assert_eq!(logged.workout.rows[0].exercise_id, Some(squat));
    assert_eq!(logged.workout.rows[1].exercise_id, None);
}

#[tokio::test]
async fn workout_with_no_known_exercise_is_rejected() {
    let studio = studio().await;
    let client = studio.account("Cleo", Role::Client).await;

    let body = workout_body(json!([{"name": "Mystery lift", "sets": three_sets()}]));
    let draft = parse_workout(&body, Utc::now()).unwrap();
    let err = studio
        .engine
        .log_workout(&client, client.account_id, draft)
        .await
        .unwrap_err();
    match err {
        EngineError::Unprocessable { unmatched, .. } => assert_eq!(unmatched, vec!["Mystery lift"]),
        other => panic!("unexpected error {other:?}"),
    }

    let page = studio
        .engine
        .workouts(&client, client.account_id, WorkoutListQuery::default())
        .await
        .unwrap();
    assert!(page.items.is_empty());
}

#[tokio::test]
async fn failing_row_insert_rolls_back_the_session() {
    let studio = studio().await;
    let client = studio.account("Cleo", Role::Client).await;
    studio.exercise("Deadlift").await;

    // Bypasses the parser: the same exercise twice collides on the unique
    // (session, exercise, set) index while inserting the rows.
    let exercise = ExerciseDraft {
        name: "Deadlift".to_string(),
        pain_level: None,
        body_region: None,
        sets: vec![SetDraft {
            set_number: 1,
            reps: 5,
            weight: Weight::from_centi(14_000),
        }],
    };
    let draft = WorkoutDraft {
        title: "Pull day".to_string(),
        date: Utc::now(),
        duration_minutes: 45,
        intensity: 8,
        notes: None,
        exercises: vec![exercise.clone(), exercise],
    };
    let err = studio
        .engine
        .log_workout(&client, client.account_id, draft)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Database(_)));

    let page = studio
        .engine
        .workouts(&client, client.account_id, WorkoutListQuery::default())
        .await
        .unwrap();
    assert!(page.items.is_empty());
}

#[tokio::test]
async fn oversized_volume_rolls_back_the_session() {
    let studio = studio().await;
    let client = studio.account("Cleo", Role::Client).await;
    studio.exercise("Leg Press").await;

    // Built directly: the parser would stop this before the engine sees it.
    let draft = WorkoutDraft {
        title: "Legs".to_string(),
        date: Utc::now(),
        duration_minutes: 30,
        intensity: 6,
        notes: None,
        exercises: vec![ExerciseDraft {
            name: "Leg Press".to_string(),
            pain_level: None,
            body_region: None,
            sets: vec![SetDraft {
                set_number: 1,
                reps: 100_000_000_000_000_000,
                weight: Weight::from_centi(10_000),
            }],
        }],
    };
    let err = studio
        .engine
        .log_workout(&client, client.account_id, draft)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));

    let page = studio
        .engine
        .workouts(&client, client.account_id, WorkoutListQuery::default())
        .await
        .unwrap();
    assert!(page.items.is_empty());
}

#[tokio::test]
async fn trainer_access_follows_assignments() {
    let studio = studio().await;
    let client = studio.account("Cleo", Role::Client).await;
    let other_client = studio.account("Omar", Role::Client).await;
    let trainer = studio.assigned_trainer("Tess", &client).await;
    studio.exercise("Bench Press").await;

    let body = workout_body(json!([{"name": "Bench Press", "sets": three_sets()}]));
    let draft = parse_workout(&body, Utc::now()).unwrap();
    studio
        .engine
        .log_workout(&trainer, client.account_id, draft.clone())
        .await
        .unwrap();

    let err = studio
        .engine
        .log_workout(&trainer, other_client.account_id, draft.clone())
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));

    let err = studio
        .engine
        .log_workout(&other_client, client.account_id, draft.clone())
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));

    studio
        .engine
        .unassign_trainer(&studio.admin, client.account_id, trainer.account_id)
        .await
        .unwrap();
    let err = studio
        .engine
        .log_workout(&trainer, client.account_id, draft)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));

    let page = studio
        .engine
        .workouts(&studio.admin, other_client.account_id, WorkoutListQuery::default())
        .await
        .unwrap();
    assert!(page.items.is_empty());
}

#[tokio::test]
async fn history_pages_newest_first_and_hides_deleted() {
    let studio = studio().await;
    let client = studio.account("Cleo", Role::Client).await;
    studio.exercise("Plank").await;

    let mut ids = Vec::new();
    for _ in 0..5 {
        let body = workout_body(json!([{"name": "Plank", "sets": [{"reps": 1}]}]));
        let draft = parse_workout(&body, Utc::now()).unwrap();
        let logged = studio
            .engine
            .log_workout(&client, client.account_id, draft)
            .await
            .unwrap();
        ids.push(logged.workout.id);
    }

    let first = studio
        .engine
        .workouts(&client, client.account_id, WorkoutListQuery::default().limit(2))
        .await
        .unwrap();
    assert_eq!(first.items.len(), 2);
    assert_eq!(first.items[0].id, ids[4]);
    assert!(first.items.iter().all(|w| w.rows.is_empty()));

    let cursor = first.next_cursor.unwrap();
    let second = studio
        .engine
        .workouts(
            &client,
            client.account_id,
            WorkoutListQuery::default().limit(2).cursor(cursor),
        )
        .await
        .unwrap();
    assert_eq!(second.items.len(), 2);
    assert_eq!(second.items[0].id, ids[2]);

    studio.engine.delete_workout(&client, ids[0]).await.unwrap();
    let rest = studio
        .engine
        .workouts(
            &client,
            client.account_id,
            WorkoutListQuery::default()
                .limit(2)
                .cursor(second.next_cursor.unwrap()),
        )
        .await
        .unwrap();
    assert!(rest.items.is_empty());
    assert_eq!(rest.next_cursor, None);

    let err = studio.engine.workout(&client, ids[0]).await.unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
}

#[tokio::test]
async fn plan_keeps_matched_exercises_only() {
    let studio = studio().await;
    let client = studio.account("Cleo", Role::Client).await;
    let trainer = studio.assigned_trainer("Tess", &client).await;
    let lunge = studio.exercise("Walking Lunge").await;

    let body = json!({
        "title": "Base phase",
        "days": [
            {
                "dayNumber": 1,
                "dayType": "training",
                "optPhase": 2,
                "exercises": [
                    {"name": "walking lunge", "setScheme": "3x12"},
                    {"name": "Levitation"}
                ]
            },
            {"dayNumber": 2, "dayType": "nap", "exercises": []}
        ]
    });
    let saved = studio
        .engine
        .save_workout_plan(&trainer, client.account_id, parse_plan(&body).unwrap())
        .await
        .unwrap();

    assert_eq!(saved.unmatched_exercises, vec!["Levitation"]);
    assert_eq!(saved.plan.duration_weeks, 4);
    assert_eq!(saved.plan.days.len(), 2);
    assert_eq!(saved.plan.days[0].exercises.len(), 1);
    assert_eq!(saved.plan.days[0].exercises[0].exercise_id, lunge);
    assert_eq!(saved.plan.days[1].name, "Day 2");
}

#[tokio::test]
async fn nameless_plan_exercises_are_not_reported() {
    let studio = studio().await;
    let client = studio.account("Cleo", Role::Client).await;
    studio.exercise("Plank").await;

    let body = json!({
        "days": [{
            "dayNumber": 1,
            "exercises": [
                {"name": "Plank"},
                {"setScheme": "3x10"},
                {"name": "   "},
                {"name": "Levitation"}
            ]
        }]
    });
    let saved = studio
        .engine
        .save_workout_plan(&client, client.account_id, parse_plan(&body).unwrap())
        .await
        .unwrap();

    assert_eq!(saved.unmatched_exercises, vec!["Levitation"]);
    assert_eq!(saved.plan.days[0].exercises.len(), 1);
}

#[tokio::test]
async fn plan_without_any_match_is_rejected() {
    let studio = studio().await;
    let client = studio.account("Cleo", Role::Client).await;

    let body = json!({
        "days": [{"dayNumber": 1, "exercises": [{"name": "Levitation"}]}]
    });
    let err = studio
        .engine
        .save_workout_plan(&client, client.account_id, parse_plan(&body).unwrap())
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Unprocessable { .. }));
}
