use anyhow::Context as _;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, SqlErr, TransactionTrait, sea_query::Expr,
};
use uuid::Uuid;

use rydroo_auth_schema::{otps, refresh_tokens, users};
use rydroo_domain::email::Email;
use rydroo_domain::id::UserId;

use crate::domain::repository::{OtpRepository, SessionRepository, UserRepository};
use crate::domain::types::{Otp, RefreshSession, User};
use crate::error::AuthServiceError;

// ── User repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
}

impl UserRepository for DbUserRepository {
    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, AuthServiceError> {
        let model = users::Entity::find()
            .filter(users::Column::Email.eq(email.as_str()))
            .one(&self.db)
            .await
            .context("find user by email")?;
        model.map(user_from_model).transpose()
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, AuthServiceError> {
        let model = users::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .context("find user by id")?;
        model.map(user_from_model).transpose()
    }

    async fn create(&self, user: &User) -> Result<(), AuthServiceError> {
        users::ActiveModel {
            id: Set(user.id.0),
            first_name: Set(user.first_name.clone()),
            last_name: Set(user.last_name.clone()),
            email: Set(user.email.as_str().to_owned()),
            password_hash: Set(user.password_hash.clone()),
            is_verified: Set(user.is_verified),
            role: Set(i16::from(user.role)),
            created_at: Set(user.created_at),
            updated_at: Set(user.updated_at),
        }
        .insert(&self.db)
        .await
        .map_err(map_user_insert_err)?;
        Ok(())
    }

    async fn mark_verified(
        &self,
        email: &Email,
        now: DateTime<Utc>,
    ) -> Result<bool, AuthServiceError> {
        let result = users::Entity::update_many()
            .col_expr(users::Column::IsVerified, Expr::value(true))
            .col_expr(users::Column::UpdatedAt, Expr::value(now))
            .filter(users::Column::Email.eq(email.as_str()))
            .exec(&self.db)
            .await
            .context("mark user verified")?;
        Ok(result.rows_affected > 0)
    }
}

/// A racing signup for the same email hits the unique index.
fn map_user_insert_err(err: DbErr) -> AuthServiceError {
    if let Some(SqlErr::UniqueConstraintViolation(_)) = err.sql_err() {
        return AuthServiceError::UserAlreadyExists;
    }
    AuthServiceError::Internal(anyhow::Error::new(err).context("create user"))
}

fn user_from_model(model: users::Model) -> Result<User, AuthServiceError> {
    let email = Email::parse(&model.email).context("stored user email is blank")?;
    let role = u8::try_from(model.role).context("stored user role out of range")?;
    Ok(User {
        id: UserId(model.id),
        first_name: model.first_name,
        last_name: model.last_name,
        email,
        password_hash: model.password_hash,
        is_verified: model.is_verified,
        role,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

// ── OTP repository ───────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbOtpRepository {
    pub db: DatabaseConnection,
}

impl OtpRepository for DbOtpRepository {
    async fn replace(&self, otp: &Otp) -> Result<(), AuthServiceError> {
        self.db
            .transaction::<_, (), DbErr>(|txn| {
                let otp = otp.clone();
                Box::pin(async move {
                    otps::Entity::delete_many()
                        .filter(otps::Column::Email.eq(otp.email.as_str()))
                        .exec(txn)
                        .await?;
                    otps::ActiveModel {
                        id: Set(otp.id),
                        email: Set(otp.email.as_str().to_owned()),
                        code: Set(otp.code.clone()),
                        expires_at: Set(otp.expires_at),
                        created_at: Set(otp.created_at),
                    }
                    .insert(txn)
                    .await?;
                    Ok(())
                })
            })
            .await
            .context("replace otp")?;
        Ok(())
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<Otp>, AuthServiceError> {
        let model = otps::Entity::find()
            .filter(otps::Column::Email.eq(email.as_str()))
            .order_by_desc(otps::Column::CreatedAt)
            .one(&self.db)
            .await
            .context("find otp by email")?;
        Ok(model.map(|m| Otp {
            id: m.id,
            email: email.clone(),
            code: m.code,
            expires_at: m.expires_at,
            created_at: m.created_at,
        }))
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<bool, AuthServiceError> {
        let result = otps::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete otp")?;
        Ok(result.rows_affected > 0)
    }
}

// ── Session repository ───────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbSessionRepository {
    pub db: DatabaseConnection,
}

impl SessionRepository for DbSessionRepository {
    async fn store(&self, session: &RefreshSession) -> Result<(), AuthServiceError> {
        self.db
            .transaction::<_, (), DbErr>(|txn| {
                let session = session.clone();
                Box::pin(async move {
                    refresh_tokens::Entity::delete_many()
                        .filter(refresh_tokens::Column::UserId.eq(session.user_id.0))
                        .filter(refresh_tokens::Column::ExpiresAt.lte(session.created_at))
                        .exec(txn)
                        .await?;
                    refresh_tokens::ActiveModel {
                        id: Set(session.id),
                        user_id: Set(session.user_id.0),
                        expires_at: Set(session.expires_at),
                        created_at: Set(session.created_at),
                    }
                    .insert(txn)
                    .await?;
                    Ok(())
                })
            })
            .await
            .context("store refresh session")?;
        Ok(())
    }

    async fn revoke(&self, id: Uuid, user_id: UserId) -> Result<bool, AuthServiceError> {
        let result = refresh_tokens::Entity::delete_many()
            .filter(refresh_tokens::Column::Id.eq(id))
            .filter(refresh_tokens::Column::UserId.eq(user_id.0))
            .exec(&self.db)
            .await
            .context("revoke refresh session")?;
        Ok(result.rows_affected > 0)
    }
}
