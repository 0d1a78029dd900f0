//! Tests for prepared statement execution against a scripted session

mod common;

use std::time::Duration;

use common::{connect, rows};
use quarry_client::{
    Concurrency, Error, ParameterDescriptor, Response, ResultSetType, SqlType, StatementType, Value,
};

const INSERT: &str = "INSERT INTO orders (id, note) VALUES (?, ?)";
const SELECT: &str = "SELECT id, note FROM orders WHERE id > ?";

mod binding_tests {
    use super::*;

    #[tokio::test]
    async fn test_bound_values_reach_the_engine() {
        let (conn, session) = connect("quarry:mem:test");
        session.describe(
            INSERT,
            StatementType::Dml,
            vec![
                ParameterDescriptor::input(SqlType::BigInt),
                ParameterDescriptor::input(SqlType::VarChar),
            ],
        );
        session.respond(INSERT, Response::update_count(1));

        let mut stmt = conn.prepare_statement(INSERT).await.unwrap();
        assert_eq!(stmt.parameter_count(), 2);
        assert_eq!(stmt.statement_type(), StatementType::Dml);

        stmt.set_int(1, 10).unwrap();
        stmt.set_string(2, "first").unwrap();
        assert_eq!(stmt.execute_update().await.unwrap(), 1);

        let request = session.last_request().unwrap();
        assert_eq!(request.statement_id, Some(stmt.statement_id()));
        assert_eq!(
            request.parameters,
            vec![Value::Integer(10), Value::String("first".to_string())]
        );
    }

    #[tokio::test]
    async fn test_null_binding() {
        let (conn, session) = connect("quarry:mem:test");
        session.describe(
            INSERT,
            StatementType::Dml,
            vec![
                ParameterDescriptor::input(SqlType::BigInt),
                ParameterDescriptor::input(SqlType::VarChar),
            ],
        );

        let mut stmt = conn.prepare_statement(INSERT).await.unwrap();
        stmt.set_long(1, 1).unwrap();
        stmt.set_null(2, SqlType::VarChar).unwrap();
        stmt.execute_update().await.unwrap();

        let request = session.last_request().unwrap();
        assert_eq!(request.parameters[1], Value::Null);
    }

    #[tokio::test]
    async fn test_unset_parameter_fails() {
        let (conn, session) = connect("quarry:mem:test");
        session.describe(
            INSERT,
            StatementType::Dml,
            vec![
                ParameterDescriptor::input(SqlType::BigInt),
                ParameterDescriptor::input(SqlType::VarChar),
            ],
        );

        let mut stmt = conn.prepare_statement(INSERT).await.unwrap();
        stmt.set_int(1, 1).unwrap();
        assert!(matches!(stmt.execute_update().await, Err(Error::ParameterNotSet(2))));

        stmt.set_string(2, "x").unwrap();
        stmt.clear_parameters().unwrap();
        assert!(matches!(stmt.execute().await, Err(Error::ParameterNotSet(1))));
        assert!(session.executed_sql().is_empty());
    }

    #[tokio::test]
    async fn test_unconvertible_value_is_rejected() {
        let (conn, session) = connect("quarry:mem:test");
        session.describe(
            SELECT,
            StatementType::Query,
            vec![ParameterDescriptor::input(SqlType::Integer)],
        );

        let mut stmt = conn.prepare_statement(SELECT).await.unwrap();
        assert!(stmt.set_string(1, "not a number").is_err());
        assert!(matches!(stmt.set_int(2, 1), Err(Error::InvalidParameterIndex { index: 2, count: 1 })));
    }
}

mod execution_tests {
    use super::*;

    #[tokio::test]
    async fn test_execute_query_returns_rows() {
        let (conn, session) = connect("quarry:mem:test");
        session.describe(
            SELECT,
            StatementType::Query,
            vec![ParameterDescriptor::input(SqlType::Integer)],
        );
        session.respond(
            SELECT,
            Response::rows(rows(
                &[("ID", SqlType::Integer), ("NOTE", SqlType::VarChar)],
                vec![
                    vec![Value::Integer(1), Value::from("a")],
                    vec![Value::Integer(2), Value::Null],
                ],
            )),
        );

        let mut stmt = conn.prepare_statement(SELECT).await.unwrap();
        stmt.set_int(1, 0).unwrap();
        let mut rs = stmt.execute_query().await.unwrap();

        assert!(rs.next().unwrap());
        assert_eq!(rs.get_int("id").unwrap(), 1);
        assert_eq!(rs.get_string("NOTE").unwrap().as_deref(), Some("a"));
        assert!(rs.next().unwrap());
        assert_eq!(rs.get_string(2).unwrap(), None);
        assert!(rs.was_null().unwrap());
        assert!(!rs.next().unwrap());
    }

    #[tokio::test]
    async fn test_execute_query_on_update_fails() {
        let (conn, session) = connect("quarry:mem:test");
        session.describe("DELETE FROM orders", StatementType::Dml, Vec::new());
        session.respond("DELETE FROM orders", Response::update_count(3));

        let mut stmt = conn.prepare_statement("DELETE FROM orders").await.unwrap();
        assert!(matches!(stmt.execute_query().await, Err(Error::NoResultSet)));
        assert_eq!(stmt.update_count().unwrap(), Some(3));
    }

    #[tokio::test]
    async fn test_execute_update_on_query_fails() {
        let (conn, session) = connect("quarry:mem:test");
        session.describe("SELECT 1 FROM orders", StatementType::Query, Vec::new());

        let mut stmt = conn.prepare_statement("SELECT 1 FROM orders").await.unwrap();
        assert!(matches!(stmt.execute_update().await, Err(Error::UnexpectedResultSet)));
    }

    #[tokio::test]
    async fn test_multiple_results_in_order() {
        let (conn, session) = connect("quarry:mem:test");
        session.describe("CALL BATCH_JOB()", StatementType::Call, Vec::new());
        let mut response = Response::update_count(2);
        response.results.push_rows(rows(&[("X", SqlType::Integer)], vec![vec![Value::Integer(9)]]));
        session.respond("CALL BATCH_JOB()", response);

        let mut stmt = conn.prepare_statement("CALL BATCH_JOB()").await.unwrap();
        assert!(!stmt.execute().await.unwrap());
        assert_eq!(stmt.update_count().unwrap(), Some(2));

        assert!(stmt.more_results().unwrap());
        let mut rs = stmt.result_set().unwrap().unwrap();
        assert!(rs.next().unwrap());
        assert_eq!(rs.get_long(1).unwrap(), 9);

        assert!(!stmt.more_results().unwrap());
        assert_eq!(stmt.update_count().unwrap(), None);
    }

    #[tokio::test]
    async fn test_options_are_sent_with_the_request() {
        let (conn, session) = connect("quarry:mem:test;fetch_size=50");
        session.describe("SELECT * FROM orders", StatementType::Query, Vec::new());

        let mut stmt = conn.prepare_statement("SELECT * FROM orders").await.unwrap();
        assert_eq!(stmt.fetch_size(), 50);
        stmt.set_max_rows(10).unwrap();
        stmt.set_query_timeout(Some(Duration::from_secs(3))).unwrap();
        stmt.set_result_set_type(ResultSetType::ScrollSensitive, Concurrency::Updatable)
            .unwrap();
        assert_eq!(stmt.result_set_type(), ResultSetType::ScrollInsensitive);

        let rs = stmt.execute_query().await.unwrap();
        assert_eq!(rs.result_set_type(), ResultSetType::ScrollInsensitive);
        assert_eq!(rs.concurrency(), Concurrency::ReadOnly);

        let request = session.last_request().unwrap();
        assert_eq!(request.max_rows, 10);
        assert_eq!(request.fetch_size, 50);
        assert_eq!(request.query_timeout, Some(Duration::from_secs(3)));
        assert_eq!(request.result_set_type, ResultSetType::ScrollInsensitive);
        assert_eq!(request.concurrency, Concurrency::ReadOnly);
    }

    #[tokio::test]
    async fn test_escape_processing_before_prepare() {
        let (conn, session) = connect("quarry:mem:test");
        let mut stmt = conn
            .prepare_statement("SELECT * FROM orders WHERE d = {d '2024-01-31'}")
            .await
            .unwrap();

        assert_eq!(stmt.native_sql(), "SELECT * FROM orders WHERE d = DATE '2024-01-31'");
        assert_eq!(session.prepared_sql(), vec![stmt.native_sql().to_string()]);
        assert_eq!(stmt.statement_type(), StatementType::Query);
        stmt.close().await.unwrap();
    }
}

mod lifecycle_tests {
    use super::*;

    #[tokio::test]
    async fn test_closed_statement_rejects_use() {
        let (conn, session) = connect("quarry:mem:test");
        session.describe(SELECT, StatementType::Query, vec![ParameterDescriptor::input(SqlType::Integer)]);

        let mut stmt = conn.prepare_statement(SELECT).await.unwrap();
        stmt.close().await.unwrap();
        assert!(stmt.is_closed());
        assert!(matches!(stmt.set_int(1, 1), Err(Error::StatementClosed)));
        assert!(matches!(stmt.execute().await, Err(Error::StatementClosed)));
        assert_eq!(session.closed_statements(), vec![stmt.statement_id()]);
    }

    #[tokio::test]
    async fn test_statement_fails_after_connection_close() {
        let (conn, session) = connect("quarry:mem:test");
        session.describe(SELECT, StatementType::Query, vec![ParameterDescriptor::input(SqlType::Integer)]);

        let mut stmt = conn.prepare_statement(SELECT).await.unwrap();
        stmt.set_int(1, 1).unwrap();
        conn.close().await.unwrap();

        assert!(matches!(stmt.execute_query().await, Err(Error::ConnectionClosed)));
        stmt.close().await.unwrap();
        assert!(session.closed_statements().is_empty());
    }
}
