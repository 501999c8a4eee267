/*
 * Responsibility
 * - handler が受け取る型付き入力 (認証済みユーザー / 公開 ID)
 */
pub mod current_user;
pub mod public_id;

pub use current_user::{CurrentUser, CurrentUserExtractor, UserId};
