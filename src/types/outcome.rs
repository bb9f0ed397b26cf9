use crate::types::ResultSet;

/// What a successful `query` produced.
#[derive(Debug)]
pub enum QueryOutcome {
    /// Row-producing statement (SELECT, SHOW, RETURNING, ...).
    Rows(ResultSet),
    /// Any other statement.
    Success,
}

impl QueryOutcome {
    pub fn into_result_set(self) -> Option<ResultSet> {
        match self {
            QueryOutcome::Rows(rs) => Some(rs),
            QueryOutcome::Success => None,
        }
    }

    pub fn has_rows(&self) -> bool {
        matches!(self, QueryOutcome::Rows(_))
    }
}

/// Result of a transaction-control call.
///
/// Transaction misuse is reported here instead of through
/// [`DbalError`](crate::DbalError) so callers can check it cheaply.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxOutcome {
    Success,
    Failed(TxFailure),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxFailure {
    /// The driver has no open connection.
    NotConnected,
    /// `begin_transaction` while a transaction is open; nesting is not supported.
    AlreadyActive,
    /// `commit`/`rollback` without an open transaction.
    NotActive,
    /// The server rejected the command; see `error_info()`.
    Backend,
}

impl TxOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, TxOutcome::Success)
    }
}
