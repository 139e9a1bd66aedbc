//! Error types for `mamute-core`.
//!
//! Uniqueness violations are part of the domain contract (student numbers
//! and account usernames are unique), so stores report them as these
//! variants rather than as backend-specific constraint errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("student number {0} is already taken")]
  StudentNumberTaken(i64),

  #[error("account username {0:?} is already taken")]
  UsernameTaken(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
