/*
 * Responsibility
 * - 認可判定 (role guard / ownership / 一覧の範囲)
 * - ここの関数はすべて純粋関数: 入力は CurrentUser と対象リソースのみ、副作用なし
 * - HTTP への変換は middleware / handler / error 側で行う
 */
mod decision;
mod ownership;
mod role;
mod role_guard;
mod scope;

pub use decision::{AccessDecision, AccessError};
pub use ownership::{Owned, check_ownership};
pub use role::Role;
pub use role_guard::RoleGuard;
pub use scope::BookingScope;

/// Roles allowed to manage every booking.
pub const BOOKING_STAFF: [Role; 2] = [Role::Admin, Role::LeadGuide];
