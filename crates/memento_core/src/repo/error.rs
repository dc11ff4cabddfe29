use crate::db::DbError;
use crate::model::block::BlockId;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error shared by every collection.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    /// Store transport or transaction failure. Never retried here.
    #[error("{0}")]
    Db(#[from] DbError),
    #[error("repository requires schema version {expected_version}, got {actual_version}")]
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    #[error("repository requires table `{0}`")]
    MissingRequiredTable(&'static str),
    #[error("repository requires column `{column}` in table `{table}`")]
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    /// Persisted data cannot be converted to a valid model value.
    #[error("invalid persisted data: {0}")]
    InvalidData(String),
    #[error("necessity block not found: {0}")]
    BlockNotFound(BlockId),
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl RepoError {
    /// Whether the failure came from the store itself rather than from data.
    pub fn is_store_failure(&self) -> bool {
        matches!(self, Self::Db(_))
    }
}
