mod common;

use chrono::{Duration, Utc};
use engine::{
    EngineError, LeadSource, Role, SessionStatus,
    validation::{BookingRequest, PurchaseRequest},
};

use common::studio;

fn booking_at(offset: Duration) -> BookingRequest {
    BookingRequest {
        scheduled_at: Utc::now() + offset,
        trainer_id: None,
        notes: Some("Legs".to_string()),
    }
}

#[tokio::test]
async fn deductions_consume_credits_up_to_the_balance() {
    let studio = studio().await;
    let client = studio.account("Cleo", Role::Client).await;
    let broke = studio.account("Bea", Role::Client).await;
    let trainer = studio.assigned_trainer("Tess", &client).await;
    studio
        .engine
        .assign_trainer(&studio.admin, broke.account_id, trainer.account_id)
        .await
        .unwrap();
    let item = studio.package("Two pack", 2, 10_000).await;

    studio
        .engine
        .purchase_and_grant(
            &studio.admin,
            &PurchaseRequest {
                client_id: client.account_id,
                storefront_item_id: item,
                quantity: 1,
                trainer_id: Some(trainer.account_id),
                lead_source: LeadSource::TrainerBrought,
                client_state: None,
                absorb_tax: false,
            },
        )
        .await
        .unwrap();

    for days in [3, 2, 1] {
        let session = studio
            .engine
            .book_session(&trainer, client.account_id, booking_at(-Duration::days(days)))
            .await
            .unwrap();
        assert_eq!(session.trainer_id, Some(trainer.account_id));
        assert_eq!(session.status, SessionStatus::Scheduled);
    }
    studio
        .engine
        .book_session(&trainer, broke.account_id, booking_at(-Duration::hours(1)))
        .await
        .unwrap();
    let future = studio
        .engine
        .book_session(&trainer, client.account_id, booking_at(Duration::days(2)))
        .await
        .unwrap();
    assert!(!future.deducted);

    let report = studio
        .engine
        .run_session_deductions(&studio.admin, Utc::now())
        .await
        .unwrap();
    assert_eq!(report.clients_processed, 2);
    assert_eq!(report.sessions_deducted, 2);
    assert_eq!(report.sessions_without_credit, 2);
    assert_eq!(report.no_credits.len(), 2);
    assert!(report.no_credits.contains(&client.account_id));
    assert!(report.no_credits.contains(&broke.account_id));

    let balance = studio
        .engine
        .credits(&client, client.account_id)
        .await
        .unwrap();
    assert_eq!(balance.sessions_remaining, 0);
    assert_eq!(balance.total_sessions_allocated, 2);

    // A second pass finds nothing left to process.
    let again = studio
        .engine
        .process_session_deductions(Utc::now())
        .await
        .unwrap();
    assert_eq!(again, Default::default());
}

#[tokio::test]
async fn deductions_are_admin_only() {
    let studio = studio().await;
    let client = studio.account("Cleo", Role::Client).await;

    let err = studio
        .engine
        .run_session_deductions(&client, Utc::now())
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));
}

#[tokio::test]
async fn booking_requires_an_existing_trainer() {
    let studio = studio().await;
    let client = studio.account("Cleo", Role::Client).await;
    let other_client = studio.account("Omar", Role::Client).await;

    let mut request = booking_at(Duration::days(1));
    request.trainer_id = Some(other_client.account_id);
    let err = studio
        .engine
        .book_session(&client, client.account_id, request)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));

    let session = studio
        .engine
        .book_session(&client, client.account_id, booking_at(Duration::days(1)))
        .await
        .unwrap();
    assert_eq!(session.trainer_id, None);
}

#[tokio::test]
async fn assignments_are_unique_while_active() {
    let studio = studio().await;
    let client = studio.account("Cleo", Role::Client).await;
    let trainer = studio.assigned_trainer("Tess", &client).await;

    let err = studio
        .engine
        .assign_trainer(&studio.admin, client.account_id, trainer.account_id)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Conflict(_)));

    studio
        .engine
        .unassign_trainer(&studio.admin, client.account_id, trainer.account_id)
        .await
        .unwrap();
    let err = studio
        .engine
        .unassign_trainer(&studio.admin, client.account_id, trainer.account_id)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));

    studio
        .engine
        .assign_trainer(&studio.admin, client.account_id, trainer.account_id)
        .await
        .unwrap();
    let clients = studio.engine.trainer_clients(trainer.account_id).await.unwrap();
    assert_eq!(clients.len(), 1);
}

#[tokio::test]
async fn tokens_authenticate_their_account() {
    let studio = studio().await;
    let (account, token) = studio
        .engine
        .create_account(engine::NewAccount::new("Cleo", "cleo@studio.test", Role::Client))
        .await
        .unwrap();

    let requester = studio.engine.authenticate(&token).await.unwrap();
    assert_eq!(requester.account_id, account.id);
    assert_eq!(requester.role, Some(Role::Client));

    let rotated = studio.engine.rotate_api_token(account.id).await.unwrap();
    assert!(matches!(
        studio.engine.authenticate(&token).await,
        Err(EngineError::Unauthenticated)
    ));
    assert!(studio.engine.authenticate(&rotated).await.is_ok());
    assert!(matches!(
        studio.engine.authenticate("").await,
        Err(EngineError::Unauthenticated)
    ));

    let err = studio
        .engine
        .create_account(engine::NewAccount::new("Copy", "cleo@studio.test", Role::Client))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Conflict(_)));
}
