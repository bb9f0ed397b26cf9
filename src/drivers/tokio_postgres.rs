use async_trait::async_trait;
use tokio_postgres::{Client, Config, NoTls, SimpleQueryMessage};
use tracing::{error, warn};

use crate::config::ConnectionParams;
use crate::driver::Driver;
use crate::error::{DbalError, ErrorInfo, Result};
use crate::sql::{insert_target, Dialect};
use crate::traits::Backend;
use crate::types::{RawOutcome, RawQueryResult};

/// Driver over a PostgreSQL connection.
pub type PostgresDriver = Driver<TokioPostgresBackend>;

/// PostgreSQL backend using tokio-postgres.
///
/// Statements run over the simple-query protocol, so every value comes back
/// as text. The wire protocol is always UTF-8; other charsets are refused.
/// Sessions run with `standard_conforming_strings` on.
#[derive(Default)]
pub struct TokioPostgresBackend {
    client: Option<Client>,
    in_transaction: bool,
}

impl TokioPostgresBackend {
    pub fn new() -> Self {
        Self::default()
    }

    async fn simple(&self, sql: &str) -> Result<Vec<SimpleQueryMessage>> {
        let client = self.client.as_ref().ok_or(DbalError::NotConnected)?;
        client.simple_query(sql).await.map_err(query_error)
    }

    async fn command(&mut self, sql: &str) -> Result<()> {
        let client = self.client.as_ref().ok_or(DbalError::NotConnected)?;
        client.batch_execute(sql).await.map_err(query_error)
    }
}

impl Driver<TokioPostgresBackend> {
    /// Connect to a PostgreSQL database.
    ///
    /// # Example
    /// ```ignore
    /// let params = ConnectionParams::new("localhost", "cms", "secret", "site");
    /// let mut db = PostgresDriver::connect_postgres(params).await?;
    /// ```
    pub async fn connect_postgres(params: ConnectionParams) -> Result<Self> {
        Self::open(params, TokioPostgresBackend::new()).await
    }
}

/// Whether `charset` names UTF-8 under any of its usual spellings.
fn is_utf8(charset: &str) -> bool {
    let normalized: String = charset
        .chars()
        .filter(|c| *c != '-' && *c != '_')
        .collect::<String>()
        .to_ascii_lowercase();
    matches!(normalized.as_str(), "utf8" | "utf8mb4" | "unicode")
}

/// Maps a tokio-postgres error to SQLSTATE / code / message.
fn query_error(err: tokio_postgres::Error) -> DbalError {
    let info = match err.as_db_error() {
        Some(db) => {
            let state = db.code().code();
            ErrorInfo::new(state, state, db.message())
        }
        None if err.is_closed() => ErrorInfo::new("08006", "", err.to_string()),
        None => ErrorInfo::new("HY000", "", err.to_string()),
    };
    DbalError::QueryFailed(info)
}

/// Collects the messages of one simple query into a raw outcome.
fn collect_outcome(messages: Vec<SimpleQueryMessage>) -> RawOutcome {
    let mut columns: Option<Vec<String>> = None;
    let mut rows: Vec<Vec<Option<String>>> = Vec::new();
    let mut affected = 0;

    for message in messages {
        match message {
            SimpleQueryMessage::RowDescription(cols) => {
                columns = Some(cols.iter().map(|c| c.name().to_string()).collect());
            }
            SimpleQueryMessage::Row(row) => {
                if columns.is_none() {
                    columns = Some(row.columns().iter().map(|c| c.name().to_string()).collect());
                }
                rows.push((0..row.len()).map(|i| row.get(i).map(str::to_string)).collect());
            }
            SimpleQueryMessage::CommandComplete(n) => affected = n,
            _ => {}
        }
    }

    match columns {
        Some(columns) => RawOutcome::Rows(RawQueryResult::new(columns, rows)),
        None => RawOutcome::Affected(affected),
    }
}

/// Reads the current value of the sequence behind `table`'s serial or
/// identity column. Yields no row when the table has none.
fn sequence_value_query(table: &str) -> String {
    let table = Dialect::Postgres.quote_literal(table);
    format!(
        "SELECT currval(s.seq::regclass) FROM (\
         SELECT pg_get_serial_sequence({t}, a.attname) AS seq \
         FROM pg_attribute a \
         WHERE a.attrelid = {t}::regclass AND a.attnum > 0 AND NOT a.attisdropped \
         ORDER BY a.attnum) s \
         WHERE s.seq IS NOT NULL LIMIT 1",
        t = table
    )
}

fn first_value(messages: &[SimpleQueryMessage]) -> Option<u64> {
    messages.iter().find_map(|m| match m {
        SimpleQueryMessage::Row(row) => row.get(0).and_then(|v| v.parse().ok()),
        _ => None,
    })
}

#[async_trait]
impl Backend for TokioPostgresBackend {
    fn dialect(&self) -> Dialect {
        Dialect::Postgres
    }

    async fn connect(&mut self, params: &ConnectionParams) -> Result<()> {
        if !is_utf8(&params.charset) {
            return Err(DbalError::UnsupportedCharset(params.charset.clone()));
        }

        let mut config = Config::new();
        config
            .host(&params.host)
            .user(&params.user)
            .password(&params.password)
            .dbname(&params.database);
        if let Some(port) = params.port {
            config.port(port);
        }

        let (client, connection) = config
            .connect(NoTls)
            .await
            .map_err(|e| DbalError::ConnectionFailed(e.to_string()))?;

        // Spawn the connection handler
        tokio::spawn(async move {
            if let Err(e) = connection.await {
                error!("PostgreSQL connection error: {}", e);
            }
        });

        // Literals are quoted by doubling single quotes only
        client
            .batch_execute("SET standard_conforming_strings = on")
            .await
            .map_err(|e| DbalError::ConnectionFailed(e.to_string()))?;

        self.client = Some(client);
        self.in_transaction = false;
        Ok(())
    }

    async fn disconnect(&mut self) {
        // Dropping the client ends the connection task
        self.client = None;
        self.in_transaction = false;
    }

    fn is_connected(&self) -> bool {
        self.client.as_ref().is_some_and(|c| !c.is_closed())
    }

    async fn execute(&mut self, sql: &str) -> Result<RawOutcome> {
        let messages = self.simple(sql).await?;
        Ok(collect_outcome(messages))
    }

    /// Reads the sequence owned by the inserted table, so a table without a
    /// generated key reports 0. Inside a transaction the lookup runs under a
    /// savepoint, since a failed lookup would otherwise abort the caller's
    /// transaction.
    async fn last_insert_id(&mut self, sql: &str) -> u64 {
        let Some(table) = insert_target(sql) else {
            return 0;
        };
        let lookup = sequence_value_query(table);

        if !self.in_transaction {
            return match self.simple(&lookup).await {
                Ok(messages) => first_value(&messages).unwrap_or(0),
                Err(_) => 0,
            };
        }

        if self.command("SAVEPOINT dbal_insert_id").await.is_err() {
            return 0;
        }
        let id = match self.simple(&lookup).await {
            Ok(messages) => first_value(&messages),
            Err(_) => None,
        };
        let cleanup = if id.is_some() {
            "RELEASE SAVEPOINT dbal_insert_id"
        } else {
            "ROLLBACK TO SAVEPOINT dbal_insert_id; RELEASE SAVEPOINT dbal_insert_id"
        };
        if let Err(e) = self.command(cleanup).await {
            warn!("could not release insert id savepoint: {}", e);
        }
        id.unwrap_or(0)
    }

    async fn begin(&mut self) -> Result<()> {
        self.command("BEGIN").await?;
        self.in_transaction = true;
        Ok(())
    }

    async fn commit(&mut self) -> Result<()> {
        self.command("COMMIT").await?;
        self.in_transaction = false;
        Ok(())
    }

    async fn rollback(&mut self) -> Result<()> {
        self.command("ROLLBACK").await?;
        self.in_transaction = false;
        Ok(())
    }

    async fn set_charset(&mut self, charset: &str) -> Result<()> {
        if is_utf8(charset) {
            Ok(())
        } else {
            Err(DbalError::UnsupportedCharset(charset.to_string()))
        }
    }
}
