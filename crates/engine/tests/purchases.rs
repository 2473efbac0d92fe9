mod common;

use chrono::{Duration, Utc};
use engine::{
    EngineError, LeadSource, MoneyCents, OrderStatus, Role,
    validation::{BookingRequest, PurchaseRequest, parse_purchase},
};
use serde_json::json;
use uuid::Uuid;

use common::studio;

fn request(client: Uuid, item: Uuid, trainer: Option<Uuid>) -> PurchaseRequest {
    PurchaseRequest {
        client_id: client,
        storefront_item_id: item,
        quantity: 1,
        trainer_id: trainer,
        lead_source: LeadSource::Platform,
        client_state: Some("CA".to_string()),
        absorb_tax: true,
    }
}

#[tokio::test]
async fn platform_purchase_with_absorbed_tax_grants_credits() {
    let studio = studio().await;
    let client = studio.account("Cleo", Role::Client).await;
    let trainer = studio.assigned_trainer("Tess", &client).await;
    let item = studio.package("Ten pack", 10, 50_000).await;

    let body = json!({
        "clientId": client.account_id,
        "storefrontItemId": item,
        "trainerId": trainer.account_id,
        "leadSource": "platform",
        "clientState": "CA",
        "absorbTax": true
    });
    let purchase = parse_purchase(&body).unwrap();
    let receipt = studio
        .engine
        .purchase_and_grant(&studio.admin, &purchase)
        .await
        .unwrap();

    assert_eq!(receipt.order.status, OrderStatus::Completed);
    assert_eq!(receipt.tax_details.tax_amount, MoneyCents::new(4_000));
    assert_eq!(receipt.tax_details.net_after_tax, MoneyCents::new(50_000));
    assert!(!receipt.tax_details.tax_charged_to_client);
    assert_eq!(receipt.credits_granted, 10);
    assert_eq!(receipt.new_credit_balance.sessions_remaining, 10);
    assert_eq!(receipt.new_credit_balance.total_sessions_allocated, 10);

    let commission = receipt.commission.unwrap();
    assert_eq!(commission.trainer_cut, MoneyCents::new(22_500));
    assert_eq!(commission.business_cut, MoneyCents::new(27_500));
    assert!(!commission.is_loyalty_bump);

    let balance = studio
        .engine
        .credits(&client, client.account_id)
        .await
        .unwrap();
    assert_eq!(balance.sessions_remaining, 10);
}

#[tokio::test]
async fn tax_is_added_on_top_unless_absorbed() {
    let studio = studio().await;
    let client = studio.account("Cleo", Role::Client).await;
    let item = studio.package("Ten pack", 10, 50_000).await;

    let mut purchase = request(client.account_id, item, None);
    purchase.absorb_tax = false;
    let order = studio.engine.checkout(&client, &purchase).await.unwrap();

    assert_eq!(order.status, OrderStatus::PendingPayment);
    assert_eq!(order.tax, MoneyCents::new(4_000));
    assert_eq!(order.total, MoneyCents::new(54_000));
    assert_eq!(order.tax_details().net_after_tax, MoneyCents::new(54_000));
    assert_eq!(order.business_cut, MoneyCents::new(50_000));
    assert_eq!(order.trainer_id, None);

    // Nothing granted until the order is paid.
    let balance = studio
        .engine
        .credits(&client, client.account_id)
        .await
        .unwrap();
    assert_eq!(balance.sessions_remaining, 0);
}

#[tokio::test]
async fn completing_twice_conflicts_and_grants_once() {
    let studio = studio().await;
    let client = studio.account("Cleo", Role::Client).await;
    let item = studio.package("Five pack", 5, 25_000).await;

    let order = studio
        .engine
        .checkout(&client, &request(client.account_id, item, None))
        .await
        .unwrap();
    studio
        .engine
        .complete_order(&studio.admin, order.id, Some("pay_1".to_string()))
        .await
        .unwrap();
    let err = studio
        .engine
        .complete_order(&studio.admin, order.id, Some("pay_2".to_string()))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Conflict(_)));

    let err = studio
        .engine
        .cancel_order(&client, order.id)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Conflict(_)));

    let stored = studio.engine.order(&client, order.id).await.unwrap();
    assert_eq!(stored.status, OrderStatus::Completed);
    assert_eq!(stored.payment_reference.as_deref(), Some("pay_1"));
    let balance = studio
        .engine
        .credits(&studio.admin, client.account_id)
        .await
        .unwrap();
    assert_eq!(balance.sessions_remaining, 5);
}

#[tokio::test]
async fn cancelled_order_grants_nothing() {
    let studio = studio().await;
    let client = studio.account("Cleo", Role::Client).await;
    let item = studio.package("Five pack", 5, 25_000).await;

    let order = studio
        .engine
        .checkout(&client, &request(client.account_id, item, None))
        .await
        .unwrap();
    let cancelled = studio.engine.cancel_order(&client, order.id).await.unwrap();
    assert_eq!(cancelled.status, OrderStatus::Cancelled);

    let err = studio
        .engine
        .complete_order(&studio.admin, order.id, None)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Conflict(_)));
}

#[tokio::test]
async fn clients_cannot_grant_credits_to_themselves() {
    let studio = studio().await;
    let client = studio.account("Cleo", Role::Client).await;
    let item = studio.package("Five pack", 5, 25_000).await;

    let err = studio
        .engine
        .purchase_and_grant(&client, &request(client.account_id, item, None))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));
}

#[tokio::test]
async fn unassigned_trainer_is_forbidden_and_writes_nothing() {
    let studio = studio().await;
    let client = studio.account("Cleo", Role::Client).await;
    let stranger = studio.account("Sam", Role::Trainer).await;
    let item = studio.package("Five pack", 5, 25_000).await;

    let err = studio
        .engine
        .purchase_and_grant(
            &stranger,
            &request(client.account_id, item, Some(stranger.account_id)),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));

    let balance = studio
        .engine
        .credits(&studio.admin, client.account_id)
        .await
        .unwrap();
    assert_eq!(balance.total_sessions_allocated, 0);
}

#[tokio::test]
async fn trainer_cannot_attribute_sale_to_another_trainer() {
    let studio = studio().await;
    let client = studio.account("Cleo", Role::Client).await;
    let trainer = studio.assigned_trainer("Tess", &client).await;
    let other = studio.account("Otto", Role::Trainer).await;
    let item = studio.package("Five pack", 5, 25_000).await;

    let err = studio
        .engine
        .purchase_and_grant(
            &trainer,
            &request(client.account_id, item, Some(other.account_id)),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));

    // Without an explicit trainer the sale is attributed to the requester.
    let receipt = studio
        .engine
        .purchase_and_grant(&trainer, &request(client.account_id, item, None))
        .await
        .unwrap();
    assert_eq!(receipt.order.trainer_id, Some(trainer.account_id));
}

#[tokio::test]
async fn loyal_clients_move_five_points_to_the_trainer() {
    let studio = studio().await;
    let client = studio.account("Cleo", Role::Client).await;
    let trainer = studio.assigned_trainer("Tess", &client).await;
    let big = studio.package("Thirty pack", 30, 120_000).await;
    let ten = studio.package("Ten pack", 10, 50_000).await;

    let first = studio
        .engine
        .purchase_and_grant(&trainer, &request(client.account_id, big, None))
        .await
        .unwrap();
    assert!(!first.order.loyalty_bump);

    let past = Utc::now() - Duration::days(1);
    for _ in 0..24 {
        studio
            .engine
            .book_session(
                &trainer,
                client.account_id,
                BookingRequest {
                    scheduled_at: past,
                    trainer_id: None,
                    notes: None,
                },
            )
            .await
            .unwrap();
    }
    let report = studio
        .engine
        .process_session_deductions(Utc::now())
        .await
        .unwrap();
    assert_eq!(report.sessions_deducted, 24);

    let receipt = studio
        .engine
        .purchase_and_grant(&trainer, &request(client.account_id, ten, None))
        .await
        .unwrap();
    let commission = receipt.commission.unwrap();
    assert!(commission.is_loyalty_bump);
    assert_eq!(commission.trainer_rate_bps, 5_000);
    assert_eq!(commission.trainer_cut, MoneyCents::new(25_000));
    assert_eq!(receipt.new_credit_balance.sessions_remaining, 16);
}

#[tokio::test]
async fn unknown_package_is_not_found() {
    let studio = studio().await;
    let client = studio.account("Cleo", Role::Client).await;

    let err = studio
        .engine
        .checkout(&client, &request(client.account_id, Uuid::new_v4(), None))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
}

#[tokio::test]
async fn tax_on_top_leaves_the_commission_on_the_package_price() {
    let studio = studio().await;
    let client = studio.account("Cleo", Role::Client).await;
    let trainer = studio.assigned_trainer("Tess", &client).await;
    let item = studio.package("Ten pack", 10, 50_000).await;

    let mut purchase = request(client.account_id, item, Some(trainer.account_id));
    purchase.absorb_tax = false;
    let receipt = studio
        .engine
        .purchase_and_grant(&studio.admin, &purchase)
        .await
        .unwrap();

    assert_eq!(receipt.order.subtotal, MoneyCents::new(50_000));
    assert_eq!(receipt.order.total, MoneyCents::new(54_000));
    assert_eq!(receipt.tax_details.gross_amount, MoneyCents::new(50_000));
    assert!(receipt.tax_details.tax_charged_to_client);

    let commission = receipt.commission.unwrap();
    assert_eq!(commission.gross_amount, MoneyCents::new(50_000));
    assert_eq!(commission.net_after_tax, MoneyCents::new(54_000));
    assert_eq!(
        commission.business_cut + commission.trainer_cut,
        commission.gross_amount
    );
    assert_eq!(commission.trainer_cut, MoneyCents::new(22_500));
}

#[tokio::test]
async fn quantity_granting_too_many_sessions_is_rejected() {
    let studio = studio().await;
    let client = studio.account("Cleo", Role::Client).await;
    let item = studio.package("Penny pack", 10, 1).await;

    let mut purchase = request(client.account_id, item, None);
    purchase.quantity = i64::MAX / 2;
    let err = studio
        .engine
        .purchase_and_grant(&studio.admin, &purchase)
        .await
        .unwrap_err();
    assert_eq!(err.field_name(), Some("quantity"));

    let balance = studio
        .engine
        .credits(&studio.admin, client.account_id)
        .await
        .unwrap();
    assert_eq!(balance.sessions_remaining, 0);
    assert_eq!(balance.total_sessions_allocated, 0);
}

#[tokio::test]
async fn total_with_tax_beyond_range_is_rejected() {
    let studio = studio().await;
    let client = studio.account("Cleo", Role::Client).await;
    let item = studio.package("Gold pack", 1, i64::MAX - 100).await;

    let mut purchase = request(client.account_id, item, None);
    purchase.absorb_tax = false;
    let err = studio
        .engine
        .purchase_and_grant(&studio.admin, &purchase)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));

    let balance = studio
        .engine
        .credits(&studio.admin, client.account_id)
        .await
        .unwrap();
    assert_eq!(balance.sessions_remaining, 0);
}
