use std::io::Write;
use std::path::Path;

use dbal::drivers::{InMemoryTestBackend, InMemoryTestResponseBuilder, TestResponse};
use dbal::error::{DbalError, ErrorInfo};
use dbal::{
    ConnectionParams, DatabaseDriver, Dialect, Driver, FetchMode, QueryOutcome, QueryParams,
    SqlValue, TxFailure, TxOutcome, ValueMap,
};

fn params() -> ConnectionParams {
    ConnectionParams::new("localhost", "cms", "secret", "site").with_prefix("fc_")
}

async fn open(backend: &InMemoryTestBackend) -> Driver<InMemoryTestBackend> {
    Driver::open(params(), backend.clone()).await.unwrap()
}

fn user_rows(ids: &[&str]) -> TestResponse {
    let mut builder = InMemoryTestResponseBuilder::new().columns(&["id", "name"]);
    for &id in ids {
        builder = builder.row(&[id, "Alice"]);
    }
    builder.build().into()
}

fn syntax_error() -> ErrorInfo {
    ErrorInfo::new("42000", "1064", "You have an error in your SQL syntax")
}

#[tokio::test]
async fn test_open_returns_connected_driver() {
    let backend = InMemoryTestBackend::new();
    let db = open(&backend).await;

    assert!(db.is_connected());
    assert_eq!(db.query_count(), 0);
    assert!(!db.in_transaction());
    assert_eq!(db.prefix(), "fc_");
    assert_eq!(db.charset(), "utf8");
    assert_eq!(backend.charset().as_deref(), Some("utf8"));
}

#[tokio::test]
async fn test_open_fails_when_connection_refused() {
    let backend = InMemoryTestBackend::new().refusing_connections();
    let err = Driver::open(params(), backend).await.err().unwrap();
    assert!(matches!(err, DbalError::ConnectionFailed(msg) if msg.contains("localhost")));
}

#[tokio::test]
async fn test_open_rejects_invalid_params() {
    let params = ConnectionParams::new("localhost", "", "secret", "site");
    let err = Driver::open(params, InMemoryTestBackend::new()).await.err().unwrap();
    assert!(matches!(err, DbalError::ConfigError(_)));
}

#[tokio::test]
async fn test_two_phase_construction() {
    let backend = InMemoryTestBackend::new();
    let mut db = Driver::new(params(), backend.clone());
    assert!(!db.is_connected());
    assert!(matches!(
        db.query("SELECT 1", None).await,
        Err(DbalError::NotConnected)
    ));

    db.connect().await.unwrap();
    db.query("SELECT 1", None).await.unwrap();
    assert_eq!(db.query_count(), 1);
}

#[tokio::test]
async fn test_query_interpolates_template() {
    let backend = InMemoryTestBackend::new().with_response(user_rows(&["5"]));
    let mut db = open(&backend).await;

    let vars = ValueMap::new().with("id", 5);
    let outcome = db
        .query("SELECT * FROM <PREFIX>users WHERE id={id}", Some(&vars))
        .await
        .unwrap();

    backend.assert_last_query("SELECT * FROM fc_users WHERE id=5");
    let mut result = outcome.into_result_set().unwrap();
    assert_eq!(result.num_rows().unwrap(), 1);
    assert_eq!(result.num_fields().unwrap(), 2);
    let row = result.fetch_assoc().unwrap().unwrap();
    assert_eq!(row["id"], Some("5".to_string()));
    assert_eq!(result.fetch_assoc().unwrap(), None);
}

#[tokio::test]
async fn test_query_without_vars_keeps_variable_placeholders() {
    let backend = InMemoryTestBackend::new();
    let mut db = open(&backend).await;

    let outcome = db.query("DELETE FROM <PREFIX>log WHERE id={id}", None).await.unwrap();

    assert!(matches!(outcome, QueryOutcome::Success));
    backend.assert_last_query("DELETE FROM fc_log WHERE id={id}");
}

#[tokio::test]
async fn test_query_count_includes_failed_statements() {
    let backend = InMemoryTestBackend::new().with_responses(vec![
        TestResponse::Affected(1),
        TestResponse::Error(syntax_error()),
        TestResponse::Affected(0),
    ]);
    let mut db = open(&backend).await;

    db.exec("UPDATE t SET a = 1", None).await.unwrap();
    assert_eq!(db.query_count(), 1);
    assert_eq!(db.error(), None);

    let err = db.exec("UPDATE t SET", None).await.unwrap_err();
    assert_eq!(err.error_info(), Some(&syntax_error()));
    assert_eq!(db.query_count(), 2);
    assert_eq!(db.error(), Some("1064"));
    assert_eq!(db.error_info().sqlstate, "42000");

    db.exec("UPDATE t SET a = 2", None).await.unwrap();
    assert_eq!(db.query_count(), 3);
    assert_eq!(db.error(), None);
    assert!(db.error_info().is_success());
}

#[tokio::test]
async fn test_successful_queries_are_counted() {
    let backend = InMemoryTestBackend::new();
    let mut db = open(&backend).await;

    for _ in 0..4 {
        db.query("SELECT 1", None).await.unwrap();
    }
    assert_eq!(db.query_count(), 4);
    backend.assert_query_count(4);
}

#[tokio::test]
async fn test_unencodable_variable_never_reaches_backend() {
    let backend = InMemoryTestBackend::new();
    let mut db = open(&backend).await;

    let vars = ValueMap::new().with("id", SqlValue::Null);
    let err = db.query("SELECT * FROM t WHERE id={id}", Some(&vars)).await.unwrap_err();

    assert!(matches!(err, DbalError::UnencodableValue(t) if t == "null"));
    assert_eq!(db.query_count(), 0);
    backend.assert_query_count(0);
}

#[tokio::test]
async fn test_select_one_matching_row() {
    let backend = InMemoryTestBackend::new().with_response(user_rows(&["1"]));
    let mut db = open(&backend).await;

    let params = QueryParams::new().where_("id = {id}").var("id", 1).limit("1");
    let mut result = db.select("users", "*", &params).await.unwrap();

    backend.assert_last_query("SELECT * FROM `fc_users` WHERE id = 1 LIMIT 1");
    assert_eq!(result.num_rows().unwrap(), 1);
    assert_eq!(
        result.fetch_row().unwrap(),
        Some(vec![Some("1".to_string()), Some("Alice".to_string())])
    );
    assert_eq!(result.fetch_row().unwrap(), None);
}

#[tokio::test]
async fn test_select_no_matching_row() {
    let backend = InMemoryTestBackend::new().with_response(user_rows(&[]));
    let mut db = open(&backend).await;

    let params = QueryParams::new().where_("id = {id}").var("id", 999).limit(1);
    let mut result = db.select("users", "*", &params).await.unwrap();

    assert_eq!(result.num_rows().unwrap(), 0);
    assert_eq!(result.fetch_row().unwrap(), None);
}

#[tokio::test]
async fn test_select_with_order_and_group() {
    let backend = InMemoryTestBackend::new();
    let mut db = open(&backend).await;

    let params = QueryParams::new()
        .where_("status = {status}")
        .var("status", "published")
        .group("author")
        .order("author ASC");
    db.select("pages", "author, COUNT(*) AS n", &params).await.unwrap();

    backend.assert_last_query(
        "SELECT author, COUNT(*) AS n FROM `fc_pages` WHERE status = 'published' \
         GROUP BY author ORDER BY author ASC",
    );
}

#[tokio::test]
async fn test_insert_id_after_insert_and_select() {
    let backend = InMemoryTestBackend::new().with_responses(vec![
        TestResponse::Affected(1),
        user_rows(&["1"]),
    ]);
    let mut db = open(&backend).await;

    let data = ValueMap::new().with("name", "Alice").with("active", true);
    let affected = db.insert("users", &data).await.unwrap();

    assert_eq!(affected, 1);
    backend.assert_last_query("INSERT INTO `fc_users` (`name`, `active`) VALUES ('Alice', 1)");
    assert_eq!(db.insert_id(), 1);

    db.select("users", "*", &QueryParams::new()).await.unwrap();
    assert_eq!(db.insert_id(), 0);
}

#[tokio::test]
async fn test_insert_id_is_zero_before_any_insert() {
    let backend = InMemoryTestBackend::new();
    let mut db = open(&backend).await;

    db.query("SELECT 1", None).await.unwrap();
    assert_eq!(db.insert_id(), 0);
}

#[tokio::test]
async fn test_update() {
    let backend = InMemoryTestBackend::new().with_response(TestResponse::Affected(2));
    let mut db = open(&backend).await;

    let data = ValueMap::new().with("title", "It's new");
    let params = QueryParams::new().where_("parent = {parent}").var("parent", 4).limit(2);
    let affected = db.update("pages", &data, &params).await.unwrap();

    assert_eq!(affected, 2);
    backend.assert_last_query(
        "UPDATE `fc_pages` SET `title` = 'It\\'s new' WHERE parent = 4 LIMIT 2",
    );
}

#[tokio::test]
async fn test_update_on_postgres_dialect() {
    let backend = InMemoryTestBackend::new()
        .with_dialect(Dialect::Postgres)
        .with_response(TestResponse::Affected(1));
    let mut db = open(&backend).await;

    let data = ValueMap::new().with("title", "It's new");
    let params = QueryParams::new().where_("id = {id}").var("id", 9).limit(1);
    db.update("pages", &data, &params).await.unwrap();

    backend.assert_last_query(
        "UPDATE \"fc_pages\" SET \"title\" = 'It''s new' WHERE ctid IN \
         (SELECT ctid FROM \"fc_pages\" WHERE id = 9 LIMIT 1)",
    );
}

#[tokio::test]
async fn test_update_with_order_and_limit_on_mysql() {
    let backend = InMemoryTestBackend::new().with_response(TestResponse::Affected(1));
    let mut db = open(&backend).await;

    let params = QueryParams::new()
        .where_("parent = {parent}")
        .var("parent", 4)
        .order("position DESC")
        .limit(1);
    db.update("pages", &ValueMap::new().with("hidden", true), &params)
        .await
        .unwrap();

    backend.assert_last_query(
        "UPDATE `fc_pages` SET `hidden` = 1 WHERE parent = 4 ORDER BY position DESC LIMIT 1",
    );
}

#[tokio::test]
async fn test_update_with_order_only_on_postgres_dialect() {
    let backend = InMemoryTestBackend::new()
        .with_dialect(Dialect::Postgres)
        .with_response(TestResponse::Affected(3));
    let mut db = open(&backend).await;

    let params = QueryParams::new().where_("id > 0").order("id");
    let affected = db
        .update("pages", &ValueMap::new().with("hidden", true), &params)
        .await
        .unwrap();

    assert_eq!(affected, 3);
    backend.assert_last_query("UPDATE \"fc_pages\" SET \"hidden\" = TRUE WHERE id > 0");
}

#[tokio::test]
async fn test_insert_id_after_replace() {
    let backend = InMemoryTestBackend::new().with_response(TestResponse::Affected(1));
    let mut db = open(&backend).await;

    db.exec(
        "REPLACE INTO <PREFIX>settings (name, value) VALUES ({name}, {value})",
        Some(&ValueMap::new().with("name", "theme").with("value", "dark")),
    )
    .await
    .unwrap();

    backend.assert_last_query(
        "REPLACE INTO fc_settings (name, value) VALUES ('theme', 'dark')",
    );
    assert_eq!(db.insert_id(), 1);
}

#[tokio::test]
async fn test_transaction_commit() {
    let backend = InMemoryTestBackend::new();
    let mut db = open(&backend).await;

    assert_eq!(db.begin_transaction().await, TxOutcome::Success);
    assert!(db.in_transaction());
    db.exec("DELETE FROM <PREFIX>sessions", None).await.unwrap();
    assert_eq!(db.commit().await, TxOutcome::Success);
    assert!(!db.in_transaction());

    assert_eq!(backend.tx_commands(), vec!["BEGIN", "COMMIT"]);
    // transaction verbs are not counted as statements
    assert_eq!(db.query_count(), 1);
}

#[tokio::test]
async fn test_transaction_rollback() {
    let backend = InMemoryTestBackend::new();
    let mut db = open(&backend).await;

    assert!(db.begin_transaction().await.is_success());
    assert_eq!(db.rollback().await, TxOutcome::Success);
    assert!(!db.in_transaction());
    assert_eq!(backend.tx_commands(), vec!["BEGIN", "ROLLBACK"]);
}

#[tokio::test]
async fn test_commit_and_rollback_without_transaction_fail() {
    let backend = InMemoryTestBackend::new();
    let mut db = open(&backend).await;

    assert_eq!(db.rollback().await, TxOutcome::Failed(TxFailure::NotActive));
    assert_eq!(db.commit().await, TxOutcome::Failed(TxFailure::NotActive));
    assert!(!db.in_transaction());
    assert!(backend.tx_commands().is_empty());
}

#[tokio::test]
async fn test_nested_transaction_is_rejected() {
    let backend = InMemoryTestBackend::new();
    let mut db = open(&backend).await;

    assert!(db.begin_transaction().await.is_success());
    assert_eq!(
        db.begin_transaction().await,
        TxOutcome::Failed(TxFailure::AlreadyActive)
    );
    assert!(db.in_transaction());
    assert_eq!(backend.tx_commands(), vec!["BEGIN"]);
}

#[tokio::test]
async fn test_backend_rejecting_commit_keeps_transaction_open() {
    let backend = InMemoryTestBackend::new();
    let mut db = open(&backend).await;

    assert!(db.begin_transaction().await.is_success());
    backend.fail_next_transaction_command(ErrorInfo::new("40001", "1213", "Deadlock found"));

    assert_eq!(db.commit().await, TxOutcome::Failed(TxFailure::Backend));
    assert!(db.in_transaction());
    assert_eq!(db.error(), Some("1213"));

    assert_eq!(db.rollback().await, TxOutcome::Success);
    assert!(!db.in_transaction());
}

#[tokio::test]
async fn test_batch_stops_at_first_failure() {
    let backend = InMemoryTestBackend::new().with_responses(vec![
        TestResponse::Affected(0),
        TestResponse::Error(syntax_error()),
        TestResponse::Affected(0),
    ]);
    let mut db = open(&backend).await;

    let err = db
        .batch(&[
            "CREATE TABLE <PREFIX>a (id INT)",
            "CREATE TABLE oops",
            "CREATE TABLE <PREFIX>c (id INT)",
        ])
        .await
        .unwrap_err();

    assert!(matches!(err, DbalError::QueryFailed(_)));
    let recorded: Vec<String> = backend.recorded_queries().into_iter().map(|q| q.sql).collect();
    assert_eq!(recorded, vec!["CREATE TABLE fc_a (id INT)", "CREATE TABLE oops"]);
    assert_eq!(db.query_count(), 2);
}

#[tokio::test]
async fn test_import_dump_file() {
    let backend = InMemoryTestBackend::new();
    let mut db = open(&backend).await;

    let mut dump = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        dump,
        "-- site schema\n\
         CREATE TABLE <PREFIX>pages (id INT, body TEXT);\n\
         INSERT INTO <PREFIX>pages VALUES (1, 'a; b');\n"
    )
    .unwrap();

    db.import(dump.path()).await.unwrap();

    let recorded: Vec<String> = backend.recorded_queries().into_iter().map(|q| q.sql).collect();
    assert_eq!(
        recorded,
        vec![
            "-- site schema\nCREATE TABLE fc_pages (id INT, body TEXT)",
            "INSERT INTO fc_pages VALUES (1, 'a; b')",
        ]
    );
    assert_eq!(db.query_count(), 2);
}

#[tokio::test]
async fn test_import_missing_file() {
    let backend = InMemoryTestBackend::new();
    let mut db = open(&backend).await;

    let err = db.import(Path::new("/nonexistent/dump.sql")).await.unwrap_err();
    assert!(matches!(err, DbalError::Import { .. }));
    assert_eq!(db.query_count(), 0);
}

#[tokio::test]
async fn test_disconnect() {
    let backend = InMemoryTestBackend::new();
    let mut db = open(&backend).await;
    assert!(db.begin_transaction().await.is_success());

    db.disconnect().await;

    assert!(!db.is_connected());
    assert!(!db.in_transaction());
    assert!(matches!(
        db.exec("SELECT 1", None).await,
        Err(DbalError::NotConnected)
    ));
    assert_eq!(
        db.begin_transaction().await,
        TxOutcome::Failed(TxFailure::NotConnected)
    );
    assert_eq!(db.query_count(), 0);
}

#[tokio::test]
async fn test_prefix_and_charset_are_mutable() {
    let backend = InMemoryTestBackend::new();
    let mut db = open(&backend).await;

    db.set_prefix("cms_");
    assert_eq!(db.prefix(), "cms_");
    db.select("users", "id", &QueryParams::new()).await.unwrap();
    backend.assert_last_query("SELECT id FROM `cms_users`");

    db.set_charset("latin1").await.unwrap();
    assert_eq!(db.charset(), "latin1");
    assert_eq!(backend.charset().as_deref(), Some("latin1"));
}

#[tokio::test]
async fn test_quote() {
    let backend = InMemoryTestBackend::new();
    let db = open(&backend).await;
    assert_eq!(db.quote("it's"), "'it\\'s'");

    let pg = InMemoryTestBackend::new().with_dialect(Dialect::Postgres);
    let db = open(&pg).await;
    assert_eq!(db.quote("it's"), "'it''s'");
}

#[tokio::test]
async fn test_result_set_after_free() {
    let backend = InMemoryTestBackend::new().with_response(user_rows(&["1", "2"]));
    let mut db = open(&backend).await;

    let mut result = db.select("users", "*", &QueryParams::new()).await.unwrap();
    let all = result.fetch_all(FetchMode::Assoc).unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(result.fetch_row().unwrap(), None);

    result.free();
    assert!(matches!(result.fetch_row(), Err(DbalError::ResultFreed)));
}

#[tokio::test]
async fn test_driver_behind_trait_object() {
    let backend = InMemoryTestBackend::new().with_response(TestResponse::Affected(3));
    let mut db: Box<dyn DatabaseDriver> = Box::new(open(&backend).await);

    let affected = db
        .exec("UPDATE <PREFIX>users SET active = {flag}", Some(&ValueMap::new().with("flag", false)))
        .await
        .unwrap();

    assert_eq!(affected, 3);
    backend.assert_last_query("UPDATE fc_users SET active = 0");
}
