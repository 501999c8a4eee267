/**
 * Responsibility
 * - repo が上位に伝える意味の定義
 */
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("db error")]
    Db(#[from] sqlx::Error),
    // A stored value could not be mapped onto a domain type (e.g. unknown role).
    #[error("corrupt column: {0}")]
    Corrupt(&'static str),
    #[error("referenced row does not exist")]
    MissingReference,
}

impl RepoError {
    pub fn from_sqlx(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(dbe) = &e
            && dbe.is_foreign_key_violation()
        {
            return RepoError::MissingReference;
        }
        RepoError::Db(e)
    }
}
