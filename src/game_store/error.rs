use thiserror::Error;

/// Errors surfaced by learner query execution. Both variants are client
/// errors (HTTP 400) at the server boundary.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    /// The submitted query text was empty. The engine is never called.
    #[error("No query provided")]
    EmptyQuery,

    /// The engine rejected the statement. The message is the engine's
    /// own error text, surfaced verbatim.
    #[error("{0}")]
    Engine(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_query_message_matches_wire_contract() {
        assert_eq!(QueryError::EmptyQuery.to_string(), "No query provided");
    }

    #[test]
    fn engine_error_carries_message_verbatim() {
        let err = QueryError::Engine("near \"NOT\": syntax error".to_string());
        assert_eq!(err.to_string(), "near \"NOT\": syntax error");
    }
}
