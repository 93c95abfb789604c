//! Error type for `regmaps-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] regmaps_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),
}

/// Collapse into the domain error so the API layer can map statuses without
/// knowing the backend. Unclassified backend faults become
/// [`regmaps_core::Error::Storage`].
impl From<Error> for regmaps_core::Error {
  fn from(e: Error) -> Self {
    match e {
      Error::Core(core) => core,
      other => regmaps_core::Error::Storage(other.to_string()),
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
