use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    /// The entity named here has no live row for the requested key.
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Storage error: {0}")]
    Storage(String),
    /// An UPDATE matched zero rows. Postgres counts matched rows, so this
    /// covers both an unknown key and a soft-deleted one.
    #[error("Update affected no rows")]
    UpdateNoop,
}
