//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts for pins, photos and
//!   preferences.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Write paths validate coordinates before SQL mutations.
//! - Read paths reject undecodable persisted rows instead of masking them.

use crate::db::DbError;
use crate::model::coordinate::CoordinateError;
use thiserror::Error;
use uuid::Uuid;

pub mod photo_repo;
pub mod pin_repo;
pub mod preference_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error shared by pin, photo and preference storage.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error(transparent)]
    Validation(#[from] CoordinateError),
    #[error(transparent)]
    Db(#[from] DbError),
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: Uuid },
    #[error("invalid persisted data: {0}")]
    InvalidData(String),
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

pub(crate) fn parse_uuid(value: &str, column: &str) -> RepoResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid value `{value}` in {column}")))
}
