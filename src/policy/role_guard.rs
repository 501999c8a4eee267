/*
 * Responsibility
 * - ルート登録時に決めた許可ロール集合で CurrentUser を判定する
 * - 認証 (401) はここでは扱わない。CurrentUser は解決済みである前提
 */
use std::collections::BTreeSet;

use crate::api::v1::extractors::CurrentUser;

use super::{AccessDecision, AccessError, Role};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleGuard {
    allowed: BTreeSet<Role>,
}

impl RoleGuard {
    /// `allowed` must not be empty; an empty guard would deny every caller.
    pub fn new(allowed: impl IntoIterator<Item = Role>) -> Self {
        let allowed: BTreeSet<Role> = allowed.into_iter().collect();
        debug_assert!(!allowed.is_empty(), "RoleGuard needs at least one role");
        Self { allowed }
    }

    pub fn allowed(&self) -> impl Iterator<Item = Role> + '_ {
        self.allowed.iter().copied()
    }

    pub fn evaluate(&self, current_user: &CurrentUser) -> AccessDecision {
        if self.allowed.contains(&current_user.role) {
            return AccessDecision::Allow;
        }

        AccessDecision::Deny(AccessError::Forbidden(format!(
            "You do not have permission to perform this action. Allowed roles: {}",
            self.allowed_list()
        )))
    }

    fn allowed_list(&self) -> String {
        self.allowed
            .iter()
            .map(Role::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use proptest::sample::{select, subsequence};
    use uuid::Uuid;

    use super::*;
    use crate::api::v1::extractors::UserId;

    fn user_with(role: Role) -> CurrentUser {
        CurrentUser::new(UserId::new(Uuid::new_v4()), role)
    }

    #[test]
    fn staff_guard_message_names_allowed_roles() {
        let guard = RoleGuard::new([Role::LeadGuide, Role::Admin]);

        let AccessDecision::Deny(AccessError::Forbidden(message)) =
            guard.evaluate(&user_with(Role::Guide))
        else {
            panic!("guide must be rejected");
        };

        assert_eq!(
            message,
            "You do not have permission to perform this action. Allowed roles: admin, lead-guide"
        );
    }

    #[test]
    fn denial_is_classified_forbidden() {
        let guard = RoleGuard::new([Role::Admin]);

        let AccessDecision::Deny(err) = guard.evaluate(&user_with(Role::User)) else {
            panic!("user must be rejected");
        };
        assert_eq!(err.status_code(), axum::http::StatusCode::FORBIDDEN);
    }

    proptest! {
        #[test]
        fn allows_every_member_role(
            allowed in subsequence(Role::ALL.to_vec(), 1..=Role::ALL.len()),
            pick in any::<prop::sample::Index>(),
        ) {
            let role = *pick.get(&allowed);
            let guard = RoleGuard::new(allowed.clone());

            prop_assert_eq!(guard.evaluate(&user_with(role)), AccessDecision::Allow);
        }

        #[test]
        fn denies_non_member_roles_and_lists_allowed(
            allowed in subsequence(Role::ALL.to_vec(), 1..Role::ALL.len()),
            role in select(Role::ALL.to_vec()),
        ) {
            prop_assume!(!allowed.contains(&role));
            let guard = RoleGuard::new(allowed.clone());

            match guard.evaluate(&user_with(role)) {
                AccessDecision::Deny(AccessError::Forbidden(message)) => {
                    for permitted in &allowed {
                        prop_assert!(message.contains(permitted.as_str()));
                    }
                }
                other => prop_assert!(false, "expected forbidden, got {:?}", other),
            }
        }

        #[test]
        fn evaluation_is_repeatable(
            allowed in subsequence(Role::ALL.to_vec(), 1..=Role::ALL.len()),
            role in select(Role::ALL.to_vec()),
        ) {
            let guard = RoleGuard::new(allowed);
            let user = user_with(role);

            prop_assert_eq!(guard.evaluate(&user), guard.evaluate(&user));
        }
    }
}
