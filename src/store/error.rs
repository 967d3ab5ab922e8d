use thiserror::Error;

/// Failure of the persistence collaborator.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The database layer failed; the full context chain is kept.
    #[error("{0:#}")]
    Database(#[from] anyhow::Error),

    #[error("store is closed")]
    Closed,

    #[error("{0}")]
    Unavailable(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn database_error_keeps_context_chain() {
        let err: anyhow::Result<()> = Err(anyhow::anyhow!("disk I/O error"));
        let err = StoreError::from(err.context("failed to insert measurement").unwrap_err());
        assert_eq!(err.to_string(), "failed to insert measurement: disk I/O error");
    }
}
