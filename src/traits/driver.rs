use std::path::Path;

use async_trait::async_trait;

use crate::clauses::QueryParams;
use crate::error::{ErrorInfo, Result};
use crate::types::{QueryOutcome, ResultSet, TxOutcome, ValueMap};

/// Operations every database driver exposes.
///
/// A driver owns one connection and runs one statement at a time; every
/// statement-issuing method takes `&mut self`. SQL templates may use the
/// `<HOST>`, `<USER>`, `<DATABASE>` and `<PREFIX>` placeholders and, when
/// `vars` are passed, `{name}` variables.
#[async_trait]
pub trait DatabaseDriver: Send {
    /// Connects to the database server.
    ///
    /// # Errors
    /// `DbalError::ConnectionFailed` if the server rejects the address or credentials.
    async fn connect(&mut self) -> Result<()>;

    /// Closes the connection. An open transaction is abandoned.
    async fn disconnect(&mut self);

    fn is_connected(&self) -> bool;

    /// Runs one statement and returns its rows, if it produced any.
    ///
    /// # Errors
    /// `DbalError::QueryFailed` with the server's diagnostics.
    async fn query(&mut self, sql: &str, vars: Option<&ValueMap>) -> Result<QueryOutcome>;

    /// Runs one statement and returns the number of affected rows.
    async fn exec(&mut self, sql: &str, vars: Option<&ValueMap>) -> Result<u64>;

    /// Runs `SELECT <columns> FROM <prefix><table>` with the given clauses.
    async fn select(
        &mut self,
        table: &str,
        columns: &str,
        params: &QueryParams,
    ) -> Result<ResultSet>;

    /// Inserts one row into `<prefix><table>`; returns the affected-row count.
    async fn insert(&mut self, table: &str, data: &ValueMap) -> Result<u64>;

    /// Updates `<prefix><table>`; returns the affected-row count.
    async fn update(&mut self, table: &str, data: &ValueMap, params: &QueryParams)
        -> Result<u64>;

    /// Runs statements in order, stopping at the first failure.
    /// Earlier statements are not undone unless a transaction is open.
    async fn batch(&mut self, statements: &[&str]) -> Result<()>;

    /// Runs every statement of a SQL dump file as [`batch`](Self::batch) would.
    async fn import(&mut self, path: &Path) -> Result<()>;

    /// Id generated by the most recent INSERT, or 0 if the last statement
    /// was not an insert or generated nothing.
    fn insert_id(&self) -> u64;

    async fn begin_transaction(&mut self) -> TxOutcome;

    async fn commit(&mut self) -> TxOutcome;

    async fn rollback(&mut self) -> TxOutcome;

    fn in_transaction(&self) -> bool;

    /// Quotes a string as a literal for the current charset.
    fn quote(&self, value: &str) -> String;

    /// Native error code of the most recent statement, if it failed.
    fn error(&self) -> Option<&str>;

    /// SQLSTATE, native code and message of the most recent statement.
    fn error_info(&self) -> &ErrorInfo;

    /// Number of statements sent to the server so far.
    fn query_count(&self) -> u64;

    fn prefix(&self) -> &str;

    fn set_prefix(&mut self, prefix: &str);

    fn charset(&self) -> &str;

    async fn set_charset(&mut self, charset: &str) -> Result<()>;
}
