use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use engine::{Engine, MoneyCents, NewAccount, NewExercise, NewStorefrontItem, Role, TaxTable};
use http_body_util::BodyExt;
use migration::MigratorTrait;
use sea_orm::Database;
use serde_json::{Value, json};
use server::{ServerState, router};
use tower::ServiceExt;
use uuid::Uuid;

struct Api {
    app: Router,
    engine: Arc<Engine>,
    admin_token: String,
}

impl Api {
    async fn new() -> Self {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        migration::Migrator::up(&db, None).await.unwrap();
        let engine = Engine::builder()
            .database(db)
            .tax_table(TaxTable::new().with_rate("CA", 800))
            .build()
            .await
            .unwrap();
        let engine = Arc::new(engine);
        let (_, admin_token) = engine
            .create_account(NewAccount::new("Admin", "admin@studio.test", Role::Admin))
            .await
            .unwrap();
        Self {
            app: router(ServerState {
                engine: engine.clone(),
            }),
            engine,
            admin_token,
        }
    }

    async fn account(&self, name: &str, role: Role) -> (Uuid, String) {
        let (account, token) = self
            .engine
            .create_account(NewAccount::new(
                name,
                format!("{}@studio.test", name.to_lowercase()),
                role,
            ))
            .await
            .unwrap();
        (account.id, token)
    }

    async fn send(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }
}

fn workout(intensity: i64) -> Value {
    json!({
        "title": "Push day",
        "date": "2024-05-01",
        "duration": 60,
        "intensity": intensity,
        "exercises": [
            {"name": "Bench Press", "sets": [
                {"setNumber": 1, "reps": 10, "weight": 100},
                {"setNumber": 2, "reps": 8, "weight": 100},
                {"setNumber": 3, "reps": 6, "weight": 100}
            ]},
            {"name": "Overhead Press", "sets": [
                {"setNumber": 1, "reps": 10, "weight": 100},
                {"setNumber": 2, "reps": 8, "weight": 100},
                {"setNumber": 3, "reps": 6, "weight": 100}
            ]}
        ]
    })
}

#[tokio::test]
async fn missing_or_unknown_token_is_401() {
    let api = Api::new().await;
    let (client_id, _) = api.account("Cleo", Role::Client).await;
    let uri = format!("/clients/{client_id}/credits");

    let (status, body) = api.send("GET", &uri, None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"].is_string());

    let (status, _) = api.send("GET", &uri, Some("not-a-token"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn guarded_reads_distinguish_403_and_404() {
    let api = Api::new().await;
    let (client_id, client_token) = api.account("Cleo", Role::Client).await;
    let (other_id, _) = api.account("Omar", Role::Client).await;

    let (status, body) = api
        .send("GET", &format!("/clients/{client_id}/credits"), Some(&client_token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["sessionsRemaining"], 0);

    let (status, _) = api
        .send("GET", &format!("/clients/{other_id}/credits"), Some(&client_token), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = api
        .send(
            "GET",
            &format!("/workouts/{}", Uuid::new_v4()),
            Some(&api.admin_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn purchase_and_grant_returns_the_receipt() {
    let api = Api::new().await;
    let (client_id, _) = api.account("Cleo", Role::Client).await;
    let item = api
        .engine
        .add_storefront_item(NewStorefrontItem {
            name: "Ten pack".to_string(),
            sessions: 10,
            price: MoneyCents::new(50_000),
        })
        .await
        .unwrap();

    let (status, body) = api
        .send(
            "POST",
            "/purchase-and-grant",
            Some(&api.admin_token),
            Some(json!({
                "clientId": client_id,
                "storefrontItemId": item.id,
                "leadSource": "platform",
                "clientState": "CA",
                "absorbTax": true
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["creditsGranted"], 10);
    assert_eq!(body["newCreditBalance"]["sessionsRemaining"], 10);
    assert_eq!(body["taxDetails"]["taxAmount"], 4_000);
    assert_eq!(body["taxDetails"]["netAfterTax"], 50_000);

    let (status, body) = api
        .send(
            "POST",
            "/purchase-and-grant",
            Some(&api.admin_token),
            Some(json!({
                "clientId": client_id,
                "storefrontItemId": item.id,
                "leadSource": "walk_in"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "leadSource");
}

#[tokio::test]
async fn workout_logging_over_http() {
    let api = Api::new().await;
    let (client_id, client_token) = api.account("Cleo", Role::Client).await;
    let (_, stranger_token) = api.account("Sam", Role::Trainer).await;
    for name in ["Bench Press", "Overhead Press"] {
        api.engine
            .add_exercise(NewExercise {
                name: name.to_string(),
                body_region: None,
            })
            .await
            .unwrap();
    }
    let uri = format!("/clients/{client_id}/workouts");

    let (status, body) = api.send("POST", &uri, Some(&client_token), Some(workout(7))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["workout"]["totalSets"], 6);
    assert_eq!(body["workout"]["totalReps"], 48);
    assert_eq!(body["workout"]["totalWeight"], 4800.0);

    for intensity in [0, 11] {
        let (status, body) = api
            .send("POST", &uri, Some(&client_token), Some(workout(intensity)))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["field"], "intensity");
    }

    let (status, _) = api
        .send("POST", &uri, Some(&stranger_token), Some(workout(5)))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = api.send("GET", &uri, Some(&client_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"].as_array().unwrap().len(), 1);

    let workout_id = body["items"][0]["id"].as_str().unwrap().to_string();
    let (status, _) = api
        .send("DELETE", &format!("/workouts/{workout_id}"), Some(&client_token), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = api
        .send("GET", &format!("/workouts/{workout_id}"), Some(&client_token), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn access_is_checked_before_the_body() {
    let api = Api::new().await;
    let (client_id, client_token) = api.account("Cleo", Role::Client).await;
    let (_, stranger_token) = api.account("Sam", Role::Trainer).await;
    let broken = json!({"title": "x"});

    for path in ["workouts", "workout-plans", "sessions"] {
        let uri = format!("/clients/{client_id}/{path}");
        let (status, _) = api
            .send("POST", &uri, Some(&stranger_token), Some(broken.clone()))
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{path}");
    }

    let (status, body) = api
        .send(
            "POST",
            &format!("/clients/{client_id}/workouts"),
            Some(&client_token),
            Some(broken),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["field"].is_string());

    let purchase = json!({"clientId": client_id, "leadSource": "walk_in"});
    let (status, _) = api
        .send("POST", "/purchase-and-grant", Some(&client_token), Some(purchase.clone()))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = api
        .send("POST", "/orders", Some(&stranger_token), Some(purchase))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn unmatched_workout_is_422_with_names() {
    let api = Api::new().await;
    let (client_id, client_token) = api.account("Cleo", Role::Client).await;

    let (status, body) = api
        .send(
            "POST",
            &format!("/clients/{client_id}/workouts"),
            Some(&client_token),
            Some(workout(5)),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["unmatched"], json!(["Bench Press", "Overhead Press"]));
}

#[tokio::test]
async fn admin_routes_reject_other_roles() {
    let api = Api::new().await;
    let (client_id, client_token) = api.account("Cleo", Role::Client).await;
    let (trainer_id, _) = api.account("Tess", Role::Trainer).await;

    let (status, _) = api
        .send("POST", "/admin/session-deductions", Some(&client_token), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = api
        .send("POST", "/admin/session-deductions", Some(&api.admin_token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["clientsProcessed"], 0);

    let assignment = json!({"clientId": client_id, "trainerId": trainer_id});
    let (status, _) = api
        .send("POST", "/assignments", Some(&api.admin_token), Some(assignment.clone()))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, _) = api
        .send("POST", "/assignments", Some(&api.admin_token), Some(assignment))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let uri = format!("/assignments/{client_id}/{trainer_id}");
    let (status, _) = api.send("DELETE", &uri, Some(&api.admin_token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = api.send("DELETE", &uri, Some(&api.admin_token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
