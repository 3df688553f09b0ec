//! User accounts, addresses and statistics.

use crate::pool::StoreOptions;
use crate::support::{map_db_error, timed, unique_violation};
use async_trait::async_trait;
use bookstore_core::{StoreError, check_text};
use bookstore_core::store::UserStore;
use bookstore_core::user::{
    NewUser, ProfileUpdate, SIGNUP_POINTS, UserAddress, UserCredentials, UserProfile, UserStats,
    validate_email, validate_username,
};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

const PROFILE_COLUMNS: &str = "id, username, email, phone, nickname, bio, avatar_url, gender, \
                               birth_date, points, created_at, updated_at";

/// `PostgreSQL`-backed user store.
#[derive(Clone)]
pub struct PostgresUserStore {
    pool: PgPool,
    options: StoreOptions,
}

impl PostgresUserStore {
    /// Create a store with default options.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self::with_options(pool, StoreOptions::default())
    }

    /// Create a store with explicit options.
    #[must_use]
    pub const fn with_options(pool: PgPool, options: StoreOptions) -> Self {
        Self { pool, options }
    }

    async fn credentials_where(
        &self,
        predicate: &'static str,
        bind: CredentialKey<'_>,
    ) -> Result<Option<UserCredentials>, StoreError> {
        let sql = format!("SELECT id, username, password_hash FROM users WHERE {predicate}");
        let query = match bind {
            CredentialKey::Username(username) => sqlx::query(&sql).bind(username),
            CredentialKey::Id(id) => sqlx::query(&sql).bind(id),
        };

        let row = query
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

        row.map(|row| {
            Ok(UserCredentials {
                id: row.try_get("id")?,
                username: row.try_get("username")?,
                password_hash: row.try_get("password_hash")?,
            })
        })
        .transpose()
        .map_err(map_db_error)
    }
}

enum CredentialKey<'a> {
    Username(&'a str),
    Id(i64),
}

/// Map unique violations on `users` to a message naming the taken field.
fn map_user_error(err: sqlx::Error) -> StoreError {
    match unique_violation(&err).as_deref() {
        Some("users_username_key") => StoreError::conflict("username already exists"),
        Some("users_email_key") => StoreError::conflict("email already exists"),
        _ => map_db_error(err),
    }
}

fn profile_from_row(row: &PgRow) -> Result<UserProfile, sqlx::Error> {
    Ok(UserProfile {
        id: row.try_get("id")?,
        username: row.try_get("username")?,
        email: row.try_get("email")?,
        phone: row.try_get("phone")?,
        nickname: row.try_get("nickname")?,
        bio: row.try_get("bio")?,
        avatar_url: row.try_get("avatar_url")?,
        gender: row.try_get("gender")?,
        birth_date: row.try_get("birth_date")?,
        points: row.try_get("points")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn required_profile(user_id: i64, row: Option<PgRow>) -> Result<UserProfile, StoreError> {
    let row = row.ok_or_else(|| StoreError::not_found("User", user_id))?;
    profile_from_row(&row).map_err(map_db_error)
}

#[async_trait]
impl UserStore for PostgresUserStore {
    async fn create_user(&self, user: &NewUser) -> Result<UserProfile, StoreError> {
        validate_username(&user.username)?;
        if let Some(email) = &user.email {
            validate_email(email)?;
        }

        let profile = timed("create_user", self.options.operation_timeout, async {
            let row = sqlx::query(&format!(
                r"
                INSERT INTO users (username, password_hash, email, points, created_at)
                VALUES ($1, $2, $3, $4, NOW())
                RETURNING {PROFILE_COLUMNS}
                "
            ))
            .bind(user.username.trim())
            .bind(&user.password_hash)
            .bind(user.email.as_deref().map(str::trim))
            .bind(SIGNUP_POINTS)
            .fetch_one(&self.pool)
            .await
            .map_err(map_user_error)?;

            profile_from_row(&row).map_err(map_db_error)
        })
        .await?;

        tracing::info!(user_id = profile.id, username = %profile.username, "User registered");
        metrics::counter!("bookstore_users_registered_total").increment(1);

        Ok(profile)
    }

    async fn find_credentials(&self, username: &str) -> Result<Option<UserCredentials>, StoreError> {
        check_text("username", username)?;
        timed(
            "find_credentials",
            self.options.operation_timeout,
            self.credentials_where("username = $1", CredentialKey::Username(username.trim())),
        )
        .await
    }

    async fn find_credentials_by_id(&self, user_id: i64) -> Result<Option<UserCredentials>, StoreError> {
        timed(
            "find_credentials_by_id",
            self.options.operation_timeout,
            self.credentials_where("id = $1", CredentialKey::Id(user_id)),
        )
        .await
    }

    async fn get_profile(&self, user_id: i64) -> Result<Option<UserProfile>, StoreError> {
        timed("get_profile", self.options.operation_timeout, async {
            let row = sqlx::query(&format!("SELECT {PROFILE_COLUMNS} FROM users WHERE id = $1"))
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await
                .map_err(map_db_error)?;

            row.as_ref()
                .map(profile_from_row)
                .transpose()
                .map_err(map_db_error)
        })
        .await
    }

    async fn update_profile(&self, user_id: i64, update: &ProfileUpdate) -> Result<UserProfile, StoreError> {
        update.validate()?;

        let profile = timed("update_profile", self.options.operation_timeout, async {
            let row = sqlx::query(&format!(
                r"
                UPDATE users
                SET username = COALESCE($1, username),
                    email = COALESCE($2, email),
                    nickname = COALESCE($3, nickname),
                    phone = COALESCE($4, phone),
                    bio = COALESCE($5, bio),
                    updated_at = NOW()
                WHERE id = $6
                RETURNING {PROFILE_COLUMNS}
                "
            ))
            .bind(update.username.as_deref().map(str::trim))
            .bind(update.email.as_deref().map(str::trim))
            .bind(update.nickname.as_deref())
            .bind(update.phone.as_deref())
            .bind(update.bio.as_deref())
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_user_error)?;

            required_profile(user_id, row)
        })
        .await?;

        tracing::info!(user_id, "Profile updated");
        Ok(profile)
    }

    async fn update_password(&self, user_id: i64, password_hash: &str) -> Result<(), StoreError> {
        timed("update_password", self.options.operation_timeout, async {
            let result = sqlx::query(
                "UPDATE users SET password_hash = $1, updated_at = NOW() WHERE id = $2",
            )
            .bind(password_hash)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

            if result.rows_affected() == 0 {
                return Err(StoreError::not_found("User", user_id));
            }
            Ok(())
        })
        .await?;

        tracing::info!(user_id, "Password changed");
        Ok(())
    }

    async fn update_avatar(&self, user_id: i64, avatar_url: &str) -> Result<UserProfile, StoreError> {
        check_text("avatar_url", avatar_url)?;
        timed("update_avatar", self.options.operation_timeout, async {
            let row = sqlx::query(&format!(
                r"
                UPDATE users SET avatar_url = $1, updated_at = NOW()
                WHERE id = $2
                RETURNING {PROFILE_COLUMNS}
                "
            ))
            .bind(avatar_url)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

            required_profile(user_id, row)
        })
        .await
    }

    async fn list_addresses(&self, user_id: i64) -> Result<Vec<UserAddress>, StoreError> {
        timed("list_addresses", self.options.operation_timeout, async {
            let rows = sqlx::query(
                r"
                SELECT * FROM user_addresses
                WHERE user_id = $1
                ORDER BY is_default DESC, id ASC
                ",
            )
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

            rows.iter()
                .map(|row| {
                    Ok(UserAddress {
                        id: row.try_get("id")?,
                        user_id: row.try_get("user_id")?,
                        recipient_name: row.try_get("recipient_name")?,
                        recipient_phone: row.try_get("recipient_phone")?,
                        province: row.try_get("province")?,
                        city: row.try_get("city")?,
                        district: row.try_get("district")?,
                        detail_address: row.try_get("detail_address")?,
                        is_default: row.try_get("is_default")?,
                    })
                })
                .collect::<Result<_, sqlx::Error>>()
                .map_err(map_db_error)
        })
        .await
    }

    async fn user_stats(&self, user_id: i64) -> Result<UserStats, StoreError> {
        timed("user_stats", self.options.operation_timeout, async {
            let row = sqlx::query(
                r"
                SELECT
                    (SELECT COUNT(*) FROM orders WHERE user_id = $1) AS order_total,
                    (SELECT COUNT(*) FROM favorites WHERE user_id = $1) AS favorite_total,
                    (SELECT COALESCE(SUM(final_amount), 0) FROM orders WHERE user_id = $1) AS spend_total
                ",
            )
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)?;

            Ok(UserStats {
                order_total: row.try_get("order_total").map_err(map_db_error)?,
                favorite_total: row.try_get("favorite_total").map_err(map_db_error)?,
                spend_total: row.try_get("spend_total").map_err(map_db_error)?,
            })
        })
        .await
    }
}
