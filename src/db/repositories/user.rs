use anyhow::{Context, Result};
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Set, SqlErr, TransactionTrait,
};
use tracing::{debug, info};

use crate::domain::{AuthToken, ObjectId, TokenList, User};
use crate::entities::{prelude::*, user_tokens, users};

pub struct UserRepository {
    conn: DatabaseConnection,
}

impl UserRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    async fn load_tokens(&self, user_id: &str) -> Result<TokenList> {
        let rows = UserTokens::find()
            .filter(user_tokens::Column::UserId.eq(user_id))
            .order_by_asc(user_tokens::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to load user tokens")?;

        Ok(TokenList::new(
            rows.into_iter()
                .map(|row| AuthToken {
                    access: row.access,
                    token: row.token,
                })
                .collect(),
        ))
    }

    async fn hydrate(&self, model: users::Model) -> Result<User> {
        let tokens = self.load_tokens(&model.id).await?;
        let id = ObjectId::parse(&model.id).context("Stored user has a malformed id")?;

        Ok(User {
            id,
            email: model.email,
            tokens,
        })
    }

    /// Inserts a user together with its first session token in one
    /// transaction. Returns `false` if the email is already taken.
    pub async fn create_with_token(
        &self,
        id: &ObjectId,
        email: &str,
        password_hash: &str,
        token: &AuthToken,
    ) -> Result<bool> {
        let now = chrono::Utc::now().to_rfc3339();
        let txn = self.conn.begin().await?;

        let user = users::ActiveModel {
            id: Set(id.to_string()),
            email: Set(email.to_string()),
            password_hash: Set(password_hash.to_string()),
            created_at: Set(now.clone()),
            updated_at: Set(now.clone()),
        };

        if let Err(e) = Users::insert(user).exec_without_returning(&txn).await {
            txn.rollback().await?;
            if is_unique_violation(&e) {
                return Ok(false);
            }
            return Err(e).context("Failed to insert user");
        }

        let token_row = user_tokens::ActiveModel {
            user_id: Set(id.to_string()),
            access: Set(token.access.clone()),
            token: Set(token.token.clone()),
            created_at: Set(now),
            ..Default::default()
        };
        UserTokens::insert(token_row)
            .exec(&txn)
            .await
            .context("Failed to insert initial token")?;

        txn.commit().await?;

        info!(user_id = %id, "Registered user");
        Ok(true)
    }

    pub async fn email_exists(&self, email: &str) -> Result<bool> {
        let count = Users::find()
            .filter(users::Column::Email.eq(email))
            .count(&self.conn)
            .await
            .context("Failed to check email")?;

        Ok(count > 0)
    }

    pub async fn get_by_id(&self, id: &ObjectId) -> Result<Option<User>> {
        let model = Users::find_by_id(id.to_string())
            .one(&self.conn)
            .await
            .context("Failed to query user by id")?;

        match model {
            Some(model) => self.hydrate(model).await.map(Some),
            None => Ok(None),
        }
    }

    /// Get user by email along with the stored password hash (for login)
    pub async fn get_by_email_with_password(&self, email: &str) -> Result<Option<(User, String)>> {
        let model = Users::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.conn)
            .await
            .context("Failed to query user by email")?;

        let Some(model) = model else {
            return Ok(None);
        };

        let password_hash = model.password_hash.clone();
        let user = self.hydrate(model).await?;
        Ok(Some((user, password_hash)))
    }

    /// Appends a token to the user's list. A single INSERT, so concurrent
    /// logins never overwrite each other's tokens.
    pub async fn add_token(&self, user_id: &ObjectId, token: &AuthToken) -> Result<()> {
        let row = user_tokens::ActiveModel {
            user_id: Set(user_id.to_string()),
            access: Set(token.access.clone()),
            token: Set(token.token.clone()),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        };

        UserTokens::insert(row)
            .exec(&self.conn)
            .await
            .context("Failed to add token")?;

        debug!(user_id = %user_id, "Issued session token");
        Ok(())
    }

    /// Removes the oldest row holding exactly this token. Returns whether a
    /// row was removed.
    pub async fn remove_token(&self, user_id: &ObjectId, token: &AuthToken) -> Result<bool> {
        let row = UserTokens::find()
            .filter(user_tokens::Column::UserId.eq(user_id.to_string()))
            .filter(user_tokens::Column::Access.eq(token.access.as_str()))
            .filter(user_tokens::Column::Token.eq(token.token.as_str()))
            .order_by_asc(user_tokens::Column::Id)
            .one(&self.conn)
            .await
            .context("Failed to look up token")?;

        let Some(row) = row else {
            return Ok(false);
        };

        let result = UserTokens::delete_by_id(row.id)
            .exec(&self.conn)
            .await
            .context("Failed to remove token")?;

        Ok(result.rows_affected > 0)
    }

    pub async fn count(&self) -> Result<u64> {
        Users::find()
            .count(&self.conn)
            .await
            .context("Failed to count users")
    }
}

fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}
