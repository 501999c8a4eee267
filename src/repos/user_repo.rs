/*
 * Responsibility
 * - 認証時に必要な users の最小情報 (id / role / パスワード変更日時) の取得
 * - users の作成・更新・削除は別サービスの責務 (ここでは読み取りのみ)
 */
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::policy::Role;
use crate::repos::error::RepoError;

#[derive(Debug, FromRow)]
struct AuthUserRecord {
    #[sqlx(rename = "userId")]
    id: Uuid,
    role: String,
    #[sqlx(rename = "passwordChangedAt")]
    password_changed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct AuthUserRow {
    pub id: Uuid,
    pub role: Role,
    pub password_changed_at: Option<DateTime<Utc>>,
}

impl AuthUserRow {
    /// true if the password changed after a token issued at `iat` (unix seconds).
    pub fn changed_password_after(&self, iat: i64) -> bool {
        self.password_changed_at
            .is_some_and(|changed| changed.timestamp() > iat)
    }
}

impl TryFrom<AuthUserRecord> for AuthUserRow {
    type Error = RepoError;

    fn try_from(r: AuthUserRecord) -> Result<Self, Self::Error> {
        let role = r.role.parse().map_err(|_| RepoError::Corrupt("role"))?;
        Ok(Self {
            id: r.id,
            role,
            password_changed_at: r.password_changed_at,
        })
    }
}

/// Inactive users are treated as missing.
pub async fn find_active(db: &PgPool, user_id: Uuid) -> Result<Option<AuthUserRow>, RepoError> {
    let record = sqlx::query_as::<_, AuthUserRecord>(
        r#"
        SELECT "userId", role, "passwordChangedAt"
        FROM users
        WHERE "userId" = $1 AND active = true
        "#,
    )
    .bind(user_id)
    .fetch_optional(db)
    .await?;

    record.map(AuthUserRow::try_from).transpose()
}
