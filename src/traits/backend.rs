use async_trait::async_trait;

use crate::config::ConnectionParams;
use crate::error::Result;
use crate::sql::Dialect;
use crate::types::RawOutcome;

/// Engine-specific primitives that [`Driver`](crate::Driver) builds on.
///
/// Backends are responsible for:
/// - Opening and closing the connection
/// - Executing one already-final SQL statement
/// - Reporting failures as `DbalError::QueryFailed` with native diagnostics
/// - Escaping literals for the active charset
///
/// Query counting, interpolation, transaction bookkeeping and statement
/// building live in the driver, not here.
#[async_trait]
pub trait Backend: Send {
    /// SQL text rules of this engine.
    fn dialect(&self) -> Dialect;

    /// Opens the connection and applies `params.charset`.
    async fn connect(&mut self, params: &ConnectionParams) -> Result<()>;

    /// Closes the connection. A no-op when already closed.
    async fn disconnect(&mut self);

    fn is_connected(&self) -> bool;

    /// Executes one statement.
    async fn execute(&mut self, sql: &str) -> Result<RawOutcome>;

    /// Id generated by `sql`, the INSERT that just succeeded, or 0 when it
    /// generated none.
    async fn last_insert_id(&mut self, sql: &str) -> u64;

    async fn begin(&mut self) -> Result<()>;

    async fn commit(&mut self) -> Result<()>;

    async fn rollback(&mut self) -> Result<()>;

    /// Switches the connection charset.
    async fn set_charset(&mut self, charset: &str) -> Result<()>;

    /// Quotes a literal for the connection's charset.
    fn quote(&self, value: &str, _charset: &str) -> String {
        self.dialect().quote_literal(value)
    }
}
