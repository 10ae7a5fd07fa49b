//! Account login and token resolution.
//!
//! Login is trivial by design: a first-seen username creates the user, a
//! re-seen username must match the stored role (case-insensitive) and,
//! when supplied, the stored age.

use std::sync::Arc;

use serde::Serialize;

use parley_core::error::{ParleyError, Result};
use parley_infrastructure::store::{SqliteStore, UserRecord};
use parley_infrastructure::token::TokenService;

/// Outcome of a successful login.
#[derive(Debug, Clone, Serialize)]
pub struct LoginOutcome {
    pub token: String,
    pub user_id: i64,
    pub username: String,
    pub role: String,
}

/// Username/role login and bearer-token resolution.
pub struct AccountService {
    store: Arc<SqliteStore>,
    tokens: TokenService,
}

impl AccountService {
    pub fn new(store: Arc<SqliteStore>, tokens: TokenService) -> Self {
        Self { store, tokens }
    }

    /// Logs a user in, creating the account on first sight.
    ///
    /// # Errors
    ///
    /// Returns a `Validation` error when the username exists with a
    /// mismatched role or age; no new user is created in that case.
    pub async fn login(
        &self,
        username: &str,
        role: &str,
        age: Option<i64>,
    ) -> Result<LoginOutcome> {
        let username = username.trim();
        let role = role.trim().to_lowercase();
        if username.is_empty() {
            return Err(ParleyError::validation("username must not be empty"));
        }

        let user = match self.store.find_user_by_username(username).await? {
            Some(existing) => {
                let role_mismatch = !existing.role.eq_ignore_ascii_case(&role);
                let age_mismatch = age.is_some() && existing.age != age;
                if role_mismatch || age_mismatch {
                    return Err(ParleyError::validation(
                        "Username exists but role/age mismatch",
                    ));
                }
                existing
            }
            None => self.store.create_user(username, &role, age).await?,
        };

        let token = self.tokens.issue(&user.username)?;
        tracing::info!(user_id = user.id, username = %user.username, "user logged in");
        Ok(LoginOutcome {
            token,
            user_id: user.id,
            username: user.username,
            role: user.role,
        })
    }

    /// Resolves a bearer token to its user.
    ///
    /// # Errors
    ///
    /// Returns an `Auth` error for invalid/expired tokens or tokens whose
    /// subject no longer exists.
    pub async fn current_user(&self, token: &str) -> Result<UserRecord> {
        let username = self.tokens.verify(token)?;
        self.store
            .find_user_by_username(&username)
            .await?
            .ok_or_else(|| ParleyError::auth("Could not validate credentials"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn service() -> AccountService {
        let store = Arc::new(SqliteStore::in_memory().await.unwrap());
        AccountService::new(store, TokenService::new("test-secret", 60))
    }

    #[tokio::test]
    async fn test_first_login_creates_user() {
        let service = service().await;
        let outcome = service.login("alice", "PM", Some(31)).await.unwrap();
        assert_eq!(outcome.username, "alice");
        assert_eq!(outcome.role, "pm");

        let user = service.current_user(&outcome.token).await.unwrap();
        assert_eq!(user.id, outcome.user_id);
    }

    #[tokio::test]
    async fn test_relogin_with_same_role_succeeds() {
        let service = service().await;
        service.login("alice", "pm", None).await.unwrap();
        let outcome = service.login(" alice ", "PM", None).await.unwrap();
        assert_eq!(outcome.username, "alice");
    }

    #[tokio::test]
    async fn test_role_mismatch_rejected_without_creating_user() {
        let service = service().await;
        let first = service.login("alice", "pm", None).await.unwrap();

        let err = service.login("alice", "owner", None).await.unwrap_err();
        assert!(matches!(err, ParleyError::Validation(_)));

        // Same single user remains.
        let again = service.login("alice", "pm", None).await.unwrap();
        assert_eq!(again.user_id, first.user_id);
    }

    #[tokio::test]
    async fn test_age_mismatch_rejected() {
        let service = service().await;
        service.login("alice", "pm", Some(31)).await.unwrap();
        let err = service.login("alice", "pm", Some(32)).await.unwrap_err();
        assert!(matches!(err, ParleyError::Validation(_)));
    }

    #[tokio::test]
    async fn test_age_omitted_on_relogin_is_accepted() {
        let service = service().await;
        service.login("alice", "pm", Some(31)).await.unwrap();
        assert!(service.login("alice", "pm", None).await.is_ok());
    }

    #[tokio::test]
    async fn test_bad_token_rejected() {
        let service = service().await;
        assert!(service.current_user("garbage").await.unwrap_err().is_auth());
    }
}
