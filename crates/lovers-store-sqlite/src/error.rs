//! Error type for `lovers-store-sqlite`.

use lovers_core::{Entity, Error as CoreError};
use rusqlite::{ErrorCode, ffi};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] CoreError),

  #[error("database error: {0}")]
  Database(tokio_rusqlite::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("configuration error: {0}")]
  Config(#[from] config::ConfigError),
}

impl Error {
  /// The domain error, if this is one.
  pub fn core(&self) -> Option<&CoreError> {
    match self {
      Self::Core(e) => Some(e),
      _ => None,
    }
  }
}

/// Domain errors raised inside a connection closure travel through
/// `tokio_rusqlite` boxed in `Other`; unbox them here.
impl From<tokio_rusqlite::Error> for Error {
  fn from(err: tokio_rusqlite::Error) -> Self {
    match err {
      tokio_rusqlite::Error::Other(boxed) => match boxed.downcast::<CoreError>() {
        Ok(core) => Self::Core(*core),
        Err(other) => Self::Database(tokio_rusqlite::Error::Other(other)),
      },
      other => Self::Database(other),
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

// ─── Errors inside a connection closure ──────────────────────────────────────

/// Error type for synchronous work on the connection thread.
#[derive(Debug)]
pub(crate) enum TxError {
  Sql(rusqlite::Error),
  Core(CoreError),
}

impl From<rusqlite::Error> for TxError {
  fn from(err: rusqlite::Error) -> Self { Self::Sql(err) }
}

impl From<CoreError> for TxError {
  fn from(err: CoreError) -> Self { Self::Core(err) }
}

impl From<TxError> for tokio_rusqlite::Error {
  fn from(err: TxError) -> Self {
    match err {
      TxError::Sql(e) => e.into(),
      TxError::Core(e) => tokio_rusqlite::Error::Other(Box::new(e)),
    }
  }
}

// ─── Constraint translation ──────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Violation {
  Unique,
  ForeignKey,
}

fn violation(err: &rusqlite::Error) -> Option<Violation> {
  match err {
    rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::ConstraintViolation => {
      match e.extended_code {
        ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY => {
          Some(Violation::Unique)
        }
        ffi::SQLITE_CONSTRAINT_FOREIGNKEY => Some(Violation::ForeignKey),
        _ => None,
      }
    }
    _ => None,
  }
}

/// Map a failed write: foreign-key failures become
/// [`CoreError::ReferentialIntegrity`], uniqueness failures become whatever
/// `unique` builds, everything else stays a database error.
pub(crate) fn constraint(
  err: rusqlite::Error,
  what: &str,
  unique: impl FnOnce() -> CoreError,
) -> TxError {
  match violation(&err) {
    Some(Violation::Unique) => TxError::Core(unique()),
    Some(Violation::ForeignKey) => {
      TxError::Core(CoreError::ReferentialIntegrity(format!("{what}: {err}")))
    }
    None => TxError::Sql(err),
  }
}

/// Like [`constraint`] for writes that have no uniqueness rule of their own.
pub(crate) fn foreign_key(err: rusqlite::Error, what: &str) -> TxError {
  constraint(err, what, || {
    CoreError::ReferentialIntegrity(format!("{what}: unexpected uniqueness conflict"))
  })
}

/// Lock contention, or a lost race for a primary key.
pub(crate) fn is_retryable(err: &rusqlite::Error) -> bool {
  match err {
    rusqlite::Error::SqliteFailure(e, _) => {
      matches!(e.code, ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked)
        || e.extended_code == ffi::SQLITE_CONSTRAINT_PRIMARYKEY
    }
    _ => false,
  }
}

pub(crate) fn not_found(entity: Entity, id: i64) -> TxError {
  TxError::Core(CoreError::NotFound(entity, id))
}
