//! dbal - A database abstraction layer with a backend-agnostic driver contract
//!
//! A [`Driver`] wraps one connection. Statements are SQL templates whose
//! `<HOST>`, `<USER>`, `<DATABASE>` and `<PREFIX>` placeholders and
//! `{name}` variables are filled in before they reach the backend.
//!
//! # Example
//! ```ignore
//! use dbal::{ConnectionParams, DatabaseDriver, PostgresDriver, QueryParams, ValueMap};
//!
//! // Connect to database
//! let params = ConnectionParams::new("localhost", "cms", "secret", "site").with_prefix("fc_");
//! let mut db = PostgresDriver::connect_postgres(params).await?;
//!
//! // Insert a row into fc_users
//! db.insert("users", &ValueMap::new().with("name", "John")).await?;
//! let id = db.insert_id();
//!
//! // Read it back
//! let mut result = db
//!     .select("users", "id, name", &QueryParams::new().where_("id = {id}").var("id", id as i64))
//!     .await?;
//! let row = result.fetch_assoc()?;
//! ```

pub mod builders;
pub mod clauses;
pub mod config;
pub mod drivers;
pub mod error;
pub mod sql;
pub mod traits;
pub mod types;

mod driver;

// Re-export main types for convenient access
pub use clauses::QueryParams;
pub use config::ConnectionParams;
pub use driver::Driver;
pub use drivers::{PostgresDriver, TokioPostgresBackend};
pub use error::{DbalError, ErrorInfo, Result};
pub use sql::Dialect;
pub use traits::{Backend, DatabaseDriver};
pub use types::{
    FetchMode, FetchedRow, QueryOutcome, ResultSet, Row, SqlValue, TxFailure, TxOutcome,
    ValueMap,
};
