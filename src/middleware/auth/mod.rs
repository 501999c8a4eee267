/*
 * Responsibility
 * - access: token 検証 → CurrentUser を extensions に格納 (401)
 * - restrict: 許可ロール以外を拒否 (403)
 * 適用順は必ず access → restrict
 */
pub mod access;
pub mod restrict;
