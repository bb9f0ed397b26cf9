use std::path::Path;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::builders::{build_insert, build_select, build_update, Clauses};
use crate::clauses::QueryParams;
use crate::config::ConnectionParams;
use crate::error::{DbalError, ErrorInfo, Result};
use crate::sql::{encode, interpolate, is_insert, split_statements, Dialect};
use crate::traits::{Backend, DatabaseDriver};
use crate::types::{
    QueryOutcome, RawOutcome, ResultSet, SqlValue, TxFailure, TxOutcome, ValueMap,
};

/// Database driver: one connection plus the state shared by every backend.
///
/// Statements pass through interpolation and encoding here before the
/// backend sees them. `query_count` counts every statement handed to the
/// backend, whether it succeeded or failed; statements rejected before that
/// (encoding errors, no connection) are not counted.
///
/// # Example
/// ```ignore
/// let params = ConnectionParams::new("localhost", "cms", "secret", "site").with_prefix("fc_");
/// let mut db = PostgresDriver::open(params, TokioPostgresBackend::new()).await?;
///
/// let mut users = db
///     .select("users", "id, name", &QueryParams::new().where_("id = {id}").var("id", 1))
///     .await?;
/// while let Some(row) = users.fetch_assoc()? {
///     println!("{:?}", row);
/// }
/// ```
pub struct Driver<B: Backend> {
    params: ConnectionParams,
    backend: B,
    query_count: u64,
    in_transaction: bool,
    last_error: ErrorInfo,
    last_insert_id: u64,
}

impl<B: Backend> Driver<B> {
    /// Creates a disconnected driver. Call [`connect`](DatabaseDriver::connect)
    /// before use, or use [`open`](Self::open).
    pub fn new(params: ConnectionParams, backend: B) -> Self {
        Self {
            params,
            backend,
            query_count: 0,
            in_transaction: false,
            last_error: ErrorInfo::success(),
            last_insert_id: 0,
        }
    }

    /// Validates the parameters, builds the driver and connects.
    /// Only a connected driver is ever returned.
    ///
    /// # Errors
    /// `DbalError::ConfigError` for invalid parameters,
    /// `DbalError::ConnectionFailed` if the connection cannot be opened.
    pub async fn open(params: ConnectionParams, backend: B) -> Result<Self> {
        params.validate()?;
        let mut driver = Self::new(params, backend);
        driver.connect().await?;
        Ok(driver)
    }

    pub fn params(&self) -> &ConnectionParams {
        &self.params
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn dialect(&self) -> Dialect {
        self.backend.dialect()
    }

    /// Encodes a value as a literal for this connection.
    pub fn encode(&self, value: &SqlValue) -> Result<String> {
        encode(value, self.dialect())
    }

    /// Replaces connection placeholders and `{name}` variables in `template`.
    pub fn interpolate(&self, template: &str, vars: Option<&ValueMap>) -> Result<String> {
        interpolate(template, &self.params, vars, self.dialect())
    }

    fn table_name(&self, table: &str) -> String {
        format!("{}{}", self.params.prefix, table)
    }

    fn clauses(&self, params: &QueryParams) -> Result<Clauses> {
        let vars = Some(&params.vars);
        let fragment = |text: &Option<String>| -> Result<Option<String>> {
            text.as_deref()
                .map(|t| self.interpolate(t, vars))
                .transpose()
        };
        Ok(Clauses {
            where_: fragment(&params.where_)?,
            limit: fragment(&params.limit)?,
            order: fragment(&params.order)?,
            group: fragment(&params.group)?,
        })
    }

    /// Sends one final statement to the backend and does the bookkeeping.
    async fn run(&mut self, sql: &str) -> Result<RawOutcome> {
        if !self.backend.is_connected() {
            return Err(DbalError::NotConnected);
        }

        self.query_count += 1;
        debug!("query #{}: {}", self.query_count, sql);

        match self.backend.execute(sql).await {
            Ok(outcome) => {
                self.last_error = ErrorInfo::success();
                self.last_insert_id = if is_insert(sql) {
                    self.backend.last_insert_id(sql).await
                } else {
                    0
                };
                Ok(outcome)
            }
            Err(err) => {
                warn!("query #{} failed: {}", self.query_count, err);
                if let Some(info) = err.error_info() {
                    self.last_error = info.clone();
                }
                self.last_insert_id = 0;
                Err(err)
            }
        }
    }

    async fn run_all(&mut self, statements: Vec<String>) -> Result<()> {
        let mut done = 0usize;
        for statement in statements {
            let sql = self.interpolate(&statement, None)?;
            self.run(&sql).await?;
            done += 1;
        }
        info!("batch of {} statement(s) completed", done);
        Ok(())
    }

    fn record_tx_error(&mut self, err: &DbalError) {
        warn!("transaction command failed: {}", err);
        if let Some(info) = err.error_info() {
            self.last_error = info.clone();
        }
    }
}

#[async_trait]
impl<B: Backend> DatabaseDriver for Driver<B> {
    async fn connect(&mut self) -> Result<()> {
        if self.backend.is_connected() {
            return Ok(());
        }
        match self.backend.connect(&self.params).await {
            Ok(()) => {
                info!(
                    "connected to {}@{}/{}",
                    self.params.user, self.params.host, self.params.database
                );
                Ok(())
            }
            Err(err) => {
                warn!("connection to {} failed: {}", self.params.host, err);
                Err(match err {
                    DbalError::ConnectionFailed(msg) => DbalError::ConnectionFailed(msg),
                    other => DbalError::ConnectionFailed(other.to_string()),
                })
            }
        }
    }

    async fn disconnect(&mut self) {
        if !self.backend.is_connected() {
            return;
        }
        if self.in_transaction {
            warn!("disconnecting with an open transaction; it will not be committed");
            self.in_transaction = false;
        }
        self.backend.disconnect().await;
        info!("disconnected from {}", self.params.host);
    }

    fn is_connected(&self) -> bool {
        self.backend.is_connected()
    }

    async fn query(&mut self, sql: &str, vars: Option<&ValueMap>) -> Result<QueryOutcome> {
        let sql = self.interpolate(sql, vars)?;
        Ok(match self.run(&sql).await? {
            RawOutcome::Rows(raw) => QueryOutcome::Rows(ResultSet::from_raw(raw)),
            RawOutcome::Affected(_) => QueryOutcome::Success,
        })
    }

    async fn exec(&mut self, sql: &str, vars: Option<&ValueMap>) -> Result<u64> {
        let sql = self.interpolate(sql, vars)?;
        Ok(match self.run(&sql).await? {
            RawOutcome::Affected(n) => n,
            RawOutcome::Rows(raw) => raw.rows.len() as u64,
        })
    }

    async fn select(
        &mut self,
        table: &str,
        columns: &str,
        params: &QueryParams,
    ) -> Result<ResultSet> {
        let clauses = self.clauses(params)?;
        let columns = self.interpolate(columns, Some(&params.vars))?;
        let sql = build_select(self.dialect(), &self.table_name(table), &columns, &clauses);
        Ok(match self.run(&sql).await? {
            RawOutcome::Rows(raw) => ResultSet::from_raw(raw),
            RawOutcome::Affected(_) => ResultSet::empty(),
        })
    }

    async fn insert(&mut self, table: &str, data: &ValueMap) -> Result<u64> {
        let sql = build_insert(self.dialect(), &self.table_name(table), data)?;
        Ok(match self.run(&sql).await? {
            RawOutcome::Affected(n) => n,
            RawOutcome::Rows(raw) => raw.rows.len() as u64,
        })
    }

    async fn update(
        &mut self,
        table: &str,
        data: &ValueMap,
        params: &QueryParams,
    ) -> Result<u64> {
        let clauses = self.clauses(params)?;
        let sql = build_update(self.dialect(), &self.table_name(table), data, &clauses)?;
        Ok(match self.run(&sql).await? {
            RawOutcome::Affected(n) => n,
            RawOutcome::Rows(raw) => raw.rows.len() as u64,
        })
    }

    async fn batch(&mut self, statements: &[&str]) -> Result<()> {
        let owned: Vec<String> = statements.iter().map(|s| s.to_string()).collect();
        self.run_all(owned).await
    }

    async fn import(&mut self, path: &Path) -> Result<()> {
        let script = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| DbalError::Import {
                path: path.to_path_buf(),
                source,
            })?;
        let statements = split_statements(&script, self.dialect());
        info!(
            "importing {} statement(s) from {}",
            statements.len(),
            path.display()
        );
        self.run_all(statements).await
    }

    fn insert_id(&self) -> u64 {
        self.last_insert_id
    }

    async fn begin_transaction(&mut self) -> TxOutcome {
        if !self.backend.is_connected() {
            return TxOutcome::Failed(TxFailure::NotConnected);
        }
        if self.in_transaction {
            warn!("begin_transaction called inside an open transaction");
            return TxOutcome::Failed(TxFailure::AlreadyActive);
        }
        match self.backend.begin().await {
            Ok(()) => {
                debug!("transaction started");
                self.in_transaction = true;
                TxOutcome::Success
            }
            Err(err) => {
                self.record_tx_error(&err);
                TxOutcome::Failed(TxFailure::Backend)
            }
        }
    }

    async fn commit(&mut self) -> TxOutcome {
        if !self.in_transaction {
            return TxOutcome::Failed(TxFailure::NotActive);
        }
        match self.backend.commit().await {
            Ok(()) => {
                debug!("transaction committed");
                self.in_transaction = false;
                TxOutcome::Success
            }
            Err(err) => {
                self.record_tx_error(&err);
                TxOutcome::Failed(TxFailure::Backend)
            }
        }
    }

    async fn rollback(&mut self) -> TxOutcome {
        if !self.in_transaction {
            return TxOutcome::Failed(TxFailure::NotActive);
        }
        match self.backend.rollback().await {
            Ok(()) => {
                debug!("transaction rolled back");
                self.in_transaction = false;
                TxOutcome::Success
            }
            Err(err) => {
                self.record_tx_error(&err);
                TxOutcome::Failed(TxFailure::Backend)
            }
        }
    }

    fn in_transaction(&self) -> bool {
        self.in_transaction
    }

    fn quote(&self, value: &str) -> String {
        self.backend.quote(value, &self.params.charset)
    }

    fn error(&self) -> Option<&str> {
        if self.last_error.is_success() {
            None
        } else {
            Some(self.last_error.code.as_str())
        }
    }

    fn error_info(&self) -> &ErrorInfo {
        &self.last_error
    }

    fn query_count(&self) -> u64 {
        self.query_count
    }

    fn prefix(&self) -> &str {
        &self.params.prefix
    }

    fn set_prefix(&mut self, prefix: &str) {
        self.params.prefix = prefix.to_string();
    }

    fn charset(&self) -> &str {
        &self.params.charset
    }

    async fn set_charset(&mut self, charset: &str) -> Result<()> {
        if self.backend.is_connected() {
            self.backend.set_charset(charset).await?;
        }
        self.params.charset = charset.to_string();
        Ok(())
    }
}
