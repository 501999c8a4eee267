/*
 * Responsibility
 * - middleware の公開インターフェース
 * - auth: 認証 (access) と ロール制限 (restrict)
 * - http: transport レベルの横断的関心事
 */
pub mod auth;
pub mod http;
