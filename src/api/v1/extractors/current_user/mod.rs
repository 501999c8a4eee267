/*!
 * Current user extractor
 *
 * Responsibility:
 * - 認証済みユーザー（CurrentUser）を handler / guard に明示的に渡す
 * - HTTP / axum 依存は core に閉じ込め、型定義は types に分離する
 *
 * Public API:
 * - CurrentUser, UserId
 * - CurrentUserExtractor
 */

mod core;
mod types;

pub use core::CurrentUserExtractor;
pub use types::{CurrentUser, UserId};
