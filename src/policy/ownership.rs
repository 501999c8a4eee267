/*
 * Responsibility
 * - 単一リソース取得時の BOLA チェック (admin か owner のみ許可)
 * - 存在チェック (404) → 所有者チェック (403) の順序を固定する
 */
use crate::api::v1::extractors::{CurrentUser, UserId};

use super::{AccessDecision, AccessError};

/// リソースの所有者 id を公開する
pub trait Owned {
    const RESOURCE: &'static str;

    fn owner_id(&self) -> UserId;
}

pub fn check_ownership<R: Owned>(resource: Option<&R>, current_user: &CurrentUser) -> AccessDecision {
    // Existence first: a missing resource never reports an ownership failure.
    let Some(resource) = resource else {
        return AccessDecision::Deny(AccessError::NotFound(R::RESOURCE));
    };

    let is_admin = current_user.is_admin();
    let is_owner = resource.owner_id() == current_user.id;

    if is_admin || is_owner {
        AccessDecision::Allow
    } else {
        AccessDecision::Deny(AccessError::Forbidden(format!(
            "You must own this {} or hold the admin role to view it",
            R::RESOURCE
        )))
    }
}
