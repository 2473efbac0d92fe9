#![allow(dead_code)]

use engine::{
    Engine, MoneyCents, NewAccount, NewExercise, NewStorefrontItem, Requester, Role, TaxTable,
};
use migration::MigratorTrait;
use sea_orm::{Database, DatabaseConnection};
use uuid::Uuid;

pub struct Studio {
    pub engine: Engine,
    pub db: DatabaseConnection,
    pub admin: Requester,
}

pub async fn studio() -> Studio {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .tax_table(TaxTable::new().with_rate("CA", 800).with_rate("NY", 400))
        .build()
        .await
        .unwrap();
    let (admin, _) = engine
        .create_account(NewAccount::new("Admin", "admin@studio.test", Role::Admin))
        .await
        .unwrap();
    Studio {
        engine,
        db,
        admin: Requester::new(admin.id, Role::Admin),
    }
}

impl Studio {
    pub async fn account(&self, name: &str, role: Role) -> Requester {
        let email = format!("{}@studio.test", name.to_lowercase());
        let (account, _) = self
            .engine
            .create_account(NewAccount::new(name, email, role))
            .await
            .unwrap();
        Requester::new(account.id, role)
    }

    /// A trainer with an active assignment to `client`.
    pub async fn assigned_trainer(&self, name: &str, client: &Requester) -> Requester {
        let trainer = self.account(name, Role::Trainer).await;
        self.engine
            .assign_trainer(&self.admin, client.account_id, trainer.account_id)
            .await
            .unwrap();
        trainer
    }

    pub async fn package(&self, name: &str, sessions: i64, price_cents: i64) -> Uuid {
        self.engine
            .add_storefront_item(NewStorefrontItem {
                name: name.to_string(),
                sessions,
                price: MoneyCents::new(price_cents),
            })
            .await
            .unwrap()
            .id
    }

    pub async fn exercise(&self, name: &str) -> Uuid {
        self.engine
            .add_exercise(NewExercise {
                name: name.to_string(),
                body_region: None,
            })
            .await
            .unwrap()
            .id
    }
}
