mod tokio_postgres;

pub use self::in_memory_test::{
    InMemoryTestBackend, InMemoryTestResponseBuilder, RecordedQuery, TestResponse,
};
pub use self::tokio_postgres::{PostgresDriver, TokioPostgresBackend};
