use thiserror::Error;

/// Outcome taxonomy of every connection operation.
///
/// `NotFound` deliberately covers both "no such user" and "nothing for you to
/// act on here", so callers cannot discover relationships they are not part of.
#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("target not found")]
    NotFound,

    #[error("cannot target yourself")]
    InvalidTarget,

    #[error("action not allowed in the current connection state")]
    InvalidState,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl ConnectionError {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            ConnectionError::NotFound => "not_found",
            ConnectionError::InvalidTarget => "invalid_target",
            ConnectionError::InvalidState => "invalid_state",
            ConnectionError::Database(_) => "db_error",
        }
    }
}

pub type ConnectionResult<T> = std::result::Result<T, ConnectionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        assert_eq!(ConnectionError::NotFound.code(), "not_found");
        assert_eq!(ConnectionError::InvalidTarget.code(), "invalid_target");
        assert_eq!(ConnectionError::InvalidState.code(), "invalid_state");
        assert_eq!(ConnectionError::Database(sqlx::Error::RowNotFound).code(), "db_error");
    }
}
