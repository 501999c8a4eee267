/*
 * Responsibility
 * - Handler / guard から見える「認証済みユーザー」の型
 * - access middleware が解決して request extensions に格納し、以降は引数として明示的に渡す
 *
 * Notes
 * - JWT の検証や DB からのロール取得は middleware/services 側の責務
 * - id の比較は必ず UserId (UUID 値) 同士で行う (文字列表現の揺れに依存しない)
 */
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::policy::Role;

/// Canonical user identity.
///
/// Every textual form a UUID can arrive in (hyphenated, simple, braced,
/// `urn:uuid:`, any letter case) parses to the same value, so a JWT `sub`
/// and a database `uuid` column compare equal whenever they name the same user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    pub fn new(id: Uuid) -> Self {
        Self(id)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl From<Uuid> for UserId {
    fn from(id: Uuid) -> Self {
        Self::new(id)
    }
}

impl FromStr for UserId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0.hyphenated(), f)
    }
}

/// 認証済みのリクエストに付与されるユーザー
///
/// - `role` は DB 上の現在値 (token の claim ではない)
/// - リクエスト中は不変
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: UserId,
    pub role: Role,
}

impl CurrentUser {
    pub fn new(id: UserId, role: Role) -> Self {
        Self { id, role }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_id_ignores_textual_representation() {
        let hyphenated: UserId = "6f1c2f0e-8d4b-4c8e-9a57-3b1f0c2d4e5a".parse().unwrap();
        let upper: UserId = "6F1C2F0E-8D4B-4C8E-9A57-3B1F0C2D4E5A".parse().unwrap();
        let simple: UserId = "6f1c2f0e8d4b4c8e9a573b1f0c2d4e5a".parse().unwrap();
        let urn: UserId = "urn:uuid:6f1c2f0e-8d4b-4c8e-9a57-3b1f0c2d4e5a".parse().unwrap();

        assert_eq!(hyphenated, upper);
        assert_eq!(hyphenated, simple);
        assert_eq!(hyphenated, urn);
        assert_eq!(hyphenated.to_string(), "6f1c2f0e-8d4b-4c8e-9a57-3b1f0c2d4e5a");
    }

    #[test]
    fn user_id_rejects_non_uuid() {
        assert!("not-a-user".parse::<UserId>().is_err());
        assert!("".parse::<UserId>().is_err());
    }
}
