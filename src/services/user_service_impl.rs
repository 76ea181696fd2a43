//! `SeaORM` implementation of the `UserService` trait.

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use crate::config::SecurityConfig;
use crate::db::Store;
use crate::domain::{AuthToken, ObjectId, TokenList, User, normalize_email};
use crate::services::credentials::{
    TokenSigner, hash_password_blocking, verify_password_blocking,
};
use crate::services::user_service::{Session, UserError, UserService};

pub struct SeaOrmUserService {
    store: Store,
    signer: TokenSigner,
    security: SecurityConfig,
    /// Hash checked when no account matches, so a miss costs as much as a
    /// wrong password. Built on first use with the configured parameters.
    decoy_hash: OnceCell<String>,
}

impl SeaOrmUserService {
    #[must_use]
    pub fn new(store: Store, security: SecurityConfig) -> Self {
        let signer = TokenSigner::new(&security.token_secret);
        Self {
            store,
            signer,
            security,
            decoy_hash: OnceCell::new(),
        }
    }

    async fn reject_unknown_login(&self, password: &str) -> UserError {
        let decoy = self
            .decoy_hash
            .get_or_try_init(|| {
                hash_password_blocking("decoy-password".to_string(), self.security.clone())
            })
            .await;

        match decoy {
            Ok(hash) => {
                let _ = verify_password_blocking(password.to_string(), hash.clone()).await;
                UserError::InvalidCredentials
            }
            Err(e) => e.into(),
        }
    }
}

#[async_trait]
impl UserService for SeaOrmUserService {
    async fn register(&self, email: &str, password: &str) -> Result<Session, UserError> {
        let email = normalize_email(email).ok_or_else(|| {
            UserError::Validation(format!("{} is not a valid email", email.trim()))
        })?;

        let min_len = self.security.min_password_length;
        if password.chars().count() < min_len {
            return Err(UserError::Validation(format!(
                "Password must be at least {min_len} characters"
            )));
        }

        if self.store.email_exists(&email).await? {
            return Err(UserError::Conflict(format!("{email} is already registered")));
        }

        let password_hash =
            hash_password_blocking(password.to_string(), self.security.clone()).await?;

        let id = ObjectId::new();
        let mut tokens = TokenList::default();
        let issued = tokens.issue(self.signer.issue(&id)?).clone();

        // The unique index still catches a registration racing ours.
        if !self
            .store
            .create_user(&id, &email, &password_hash, &issued)
            .await?
        {
            return Err(UserError::Conflict(format!("{email} is already registered")));
        }

        Ok(Session {
            user: User { id, email, tokens },
            token: issued.token,
        })
    }

    async fn login(&self, email: &str, password: &str) -> Result<Session, UserError> {
        let Some(email) = normalize_email(email) else {
            return Err(self.reject_unknown_login(password).await);
        };

        let Some((mut user, password_hash)) =
            self.store.get_user_by_email_with_password(&email).await?
        else {
            debug!("Login for unknown email");
            return Err(self.reject_unknown_login(password).await);
        };

        if !verify_password_blocking(password.to_string(), password_hash).await {
            warn!(user_id = %user.id, "Login with wrong password");
            return Err(UserError::InvalidCredentials);
        }

        let issued = user.tokens.issue(self.signer.issue(&user.id)?).clone();
        self.store.add_user_token(&user.id, &issued).await?;

        info!(user_id = %user.id, sessions = user.tokens.session_count(), "User logged in");

        Ok(Session {
            user,
            token: issued.token,
        })
    }

    async fn authenticate(&self, token: &str) -> Result<User, UserError> {
        let user_id = self.signer.verify(token)?;

        let user = self
            .store
            .get_user(&user_id)
            .await?
            .ok_or(UserError::InvalidToken)?;

        if !user.tokens.has_auth_token(token) {
            debug!(user_id = %user.id, "Token is signed but revoked");
            return Err(UserError::InvalidToken);
        }

        Ok(user)
    }

    async fn logout(&self, user: &User, token: &str) -> Result<(), UserError> {
        let removed = self
            .store
            .remove_user_token(&user.id, &AuthToken::auth(token))
            .await?;

        if removed {
            info!(user_id = %user.id, "User logged out");
        } else {
            debug!(user_id = %user.id, "Logout for a token that was not listed");
        }

        Ok(())
    }

    async fn count(&self) -> Result<u64, UserError> {
        Ok(self.store.count_users().await?)
    }
}
