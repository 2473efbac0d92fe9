use sea_orm::{ActiveValue, QueryFilter, QueryOrder, prelude::*, sea_query::Expr};
use uuid::Uuid;

use crate::{
    Account, CreditBalance, EngineError, NewAccount, Requester, ResultEngine, Role, accounts,
    util::hash_api_token,
};

use super::{Engine, access::authorize, require_client, with_tx};

fn generate_api_token() -> String {
    format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple())
}

fn validate_new_account(cmd: &NewAccount) -> ResultEngine<(String, String)> {
    let display_name = cmd.display_name.trim();
    if display_name.is_empty() {
        return Err(EngineError::field("displayName", "must not be empty"));
    }
    let email = cmd.email.trim().to_lowercase();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => {}
        _ => return Err(EngineError::field("email", "must be a valid email address")),
    }
    Ok((display_name.to_string(), email))
}

impl Engine {
    /// Create an account and return it with its API token.
    ///
    /// The token is returned exactly once; only its SHA-256 digest is stored.
    pub async fn create_account(&self, cmd: NewAccount) -> ResultEngine<(Account, String)> {
        let (display_name, email) = validate_new_account(&cmd)?;
        let account = Account::new(display_name, email, cmd.role);
        let token = generate_api_token();

        with_tx!(self, |db_tx| {
            let exists = accounts::Entity::find()
                .filter(accounts::Column::Email.eq(account.email.clone()))
                .one(&db_tx)
                .await?
                .is_some();
            if exists {
                return Err(EngineError::Conflict(format!(
                    "account with email '{}' already exists",
                    account.email
                )));
            }

            let mut model: accounts::ActiveModel = (&account).into();
            model.api_token_hash = ActiveValue::Set(Some(hash_api_token(&token)));
            model.insert(&db_tx).await?;
            tracing::info!(account = %account.id, role = cmd.role.as_str(), "account created");
            Ok(())
        })?;

        Ok((account, token))
    }

    /// Replace the API token of an account, invalidating the old one.
    pub async fn rotate_api_token(&self, account_id: Uuid) -> ResultEngine<String> {
        let token = generate_api_token();
        let result = accounts::Entity::update_many()
            .col_expr(
                accounts::Column::ApiTokenHash,
                Expr::value(hash_api_token(&token)),
            )
            .filter(accounts::Column::Id.eq(account_id.to_string()))
            .exec(&self.database)
            .await?;
        if result.rows_affected == 0 {
            return Err(EngineError::KeyNotFound("account not exists".to_string()));
        }
        Ok(token)
    }

    /// Resolve the requester behind a bearer token.
    pub async fn authenticate(&self, token: &str) -> ResultEngine<Requester> {
        let token = token.trim();
        if token.is_empty() {
            return Err(EngineError::Unauthenticated);
        }
        let model = accounts::Entity::find()
            .filter(accounts::Column::ApiTokenHash.eq(hash_api_token(token)))
            .one(&self.database)
            .await?
            .ok_or(EngineError::Unauthenticated)?;
        let account = Account::try_from(model)?;
        Ok(Requester {
            account_id: account.id,
            role: account.role,
        })
    }

    pub async fn account(&self, account_id: Uuid) -> ResultEngine<Account> {
        accounts::Entity::find_by_id(account_id.to_string())
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("account not exists".to_string()))
            .and_then(Account::try_from)
    }

    pub async fn account_by_email(&self, email: &str) -> ResultEngine<Account> {
        accounts::Entity::find()
            .filter(accounts::Column::Email.eq(email.trim().to_lowercase()))
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound(format!("account '{email}' not exists")))
            .and_then(Account::try_from)
    }

    /// Current credit balance of a client.
    pub async fn credits(&self, requester: &Requester, client_id: Uuid) -> ResultEngine<CreditBalance> {
        authorize(&self.database, requester, client_id).await?;
        require_client(&self.database, client_id).await?.balance()
    }

    /// Accounts with the given role, by display name.
    pub async fn accounts_with_role(&self, role: Role) -> ResultEngine<Vec<Account>> {
        accounts::Entity::find()
            .filter(accounts::Column::Role.eq(role.as_str()))
            .order_by_asc(accounts::Column::DisplayName)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Account::try_from)
            .collect()
    }
}
