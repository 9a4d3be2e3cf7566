use crate::{
    Account, EngineError, NewAccount, ResultEngine, password,
    util::normalize_handle,
};

use super::{Engine, UPGRADE_REQUIRED};

impl Engine {
    /// Register a new account with the premium flag unset.
    pub async fn register(&self, handle: &str, secret: &str) -> ResultEngine<Account> {
        let handle = normalize_handle(handle)?;
        if secret.is_empty() {
            return Err(EngineError::validation(
                "password",
                "password must not be empty",
            ));
        }
        if self.store.find_account_by_handle(&handle).await?.is_some() {
            return Err(EngineError::ExistingKey(handle));
        }

        let account = self
            .store
            .create_account(NewAccount {
                handle,
                password_hash: password::hash_secret(secret)?,
            })
            .await?;
        tracing::info!(user_id = account.id, "account registered");
        Ok(account)
    }

    /// Check a handle/secret pair. Unknown handles and wrong secrets fail the
    /// same way.
    pub async fn authenticate(&self, handle: &str, secret: &str) -> ResultEngine<Account> {
        let invalid = || EngineError::Unauthenticated("invalid credentials".to_string());

        let Some(account) = self.store.find_account_by_handle(handle.trim()).await? else {
            // Same hashing cost as a real check for unknown handles.
            password::hash_secret(secret)?;
            return Err(invalid());
        };
        if !password::verify_secret(secret, &account.password_hash) {
            return Err(invalid());
        }
        Ok(account)
    }

    /// Account behind a verified identity. A verified credential must point to
    /// a live account, so a missing one is an authentication failure.
    pub async fn account(&self, user_id: u64) -> ResultEngine<Account> {
        self.store
            .find_account_by_id(user_id)
            .await?
            .ok_or_else(|| EngineError::Unauthenticated("user not found".to_string()))
    }

    /// Entitlement gate for premium capabilities.
    ///
    /// Re-read from the store on every call; never mutates the account.
    pub async fn require_premium(&self, user_id: u64) -> ResultEngine<Account> {
        let account = self.account(user_id).await?;
        if !account.is_premium {
            tracing::debug!(user_id, "premium capability denied");
            return Err(EngineError::Forbidden(UPGRADE_REQUIRED.to_string()));
        }
        Ok(account)
    }

    /// Set or clear the premium flag on behalf of the payment provider.
    pub async fn set_premium(
        &self,
        handle: &str,
        is_premium: bool,
        payment_ref: Option<String>,
    ) -> ResultEngine<Account> {
        let handle = normalize_handle(handle)?;
        let mut account = self
            .store
            .find_account_by_handle(&handle)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("user not exists".to_string()))?;

        account.is_premium = is_premium;
        if payment_ref.is_some() {
            account.payment_ref = payment_ref;
        }
        self.store.update_account(&account).await?;
        tracing::info!(user_id = account.id, is_premium, "premium flag updated");
        Ok(account)
    }
}
