use sea_orm::{ConnectionTrait, DatabaseConnection, prelude::*};
use uuid::Uuid;

use crate::{EngineError, LoyaltyPolicy, ResultEngine, Role, TaxTable};

mod access;
mod accounts;
mod assignments;
mod catalog;
mod orders;
mod plans;
mod sessions;
mod workouts;

pub use orders::PurchaseReceipt;
pub use plans::PlanSaved;
pub use sessions::DeductionReport;
pub use workouts::{WorkoutLogged, WorkoutPage};

/// Run a block inside a DB transaction, committing on success and rolling
/// back explicitly on error.
///
/// The body is evaluated as an `async` block, so `?` inside it ends the block
/// (not the caller) and the rollback below always runs.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = sea_orm::TransactionTrait::begin(&$self.database).await?;
        let result: $crate::ResultEngine<_> = async { $body }.await;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback_err) = $tx.rollback().await {
                    tracing::error!(error = %rollback_err, "rollback failed");
                }
                match &err {
                    $crate::EngineError::Database(db_err) => {
                        tracing::error!(error = %db_err, "transaction rolled back");
                    }
                    other => tracing::warn!(error = %other, "transaction rolled back"),
                }
                Err(err)
            }
        }
    }};
}

pub(crate) use with_tx;

#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
    loyalty_policy: LoyaltyPolicy,
    tax_table: TaxTable,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    pub fn loyalty_policy(&self) -> LoyaltyPolicy {
        self.loyalty_policy
    }

    pub fn tax_table(&self) -> &TaxTable {
        &self.tax_table
    }
}

/// Loads an account that must exist and be a client.
async fn require_client<C: ConnectionTrait>(db: &C, client_id: Uuid) -> ResultEngine<crate::accounts::Model> {
    require_account_with_role(db, client_id, Role::Client, "client").await
}

async fn require_account_with_role<C: ConnectionTrait>(
    db: &C,
    account_id: Uuid,
    role: Role,
    label: &str,
) -> ResultEngine<crate::accounts::Model> {
    crate::accounts::Entity::find_by_id(account_id.to_string())
        .filter(crate::accounts::Column::Role.eq(role.as_str()))
        .one(db)
        .await?
        .ok_or_else(|| EngineError::KeyNotFound(format!("{label} not exists")))
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
    loyalty_policy: LoyaltyPolicy,
    tax_table: TaxTable,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Thresholds of the loyalty bump. Defaults to [`LoyaltyPolicy::default`].
    pub fn loyalty_policy(mut self, policy: LoyaltyPolicy) -> EngineBuilder {
        self.loyalty_policy = policy;
        self
    }

    /// Tax rates by jurisdiction. Defaults to an empty table (no tax).
    pub fn tax_table(mut self, table: TaxTable) -> EngineBuilder {
        self.tax_table = table;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        self.database.ping().await?;
        Ok(Engine {
            database: self.database,
            loyalty_policy: self.loyalty_policy,
            tax_table: self.tax_table,
        })
    }
}
