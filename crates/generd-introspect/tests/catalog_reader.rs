use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use generd_core::{ConstraintKind, Engine, Error, RelationshipType, Result};
use generd_introspect::dialect::{OracleDialect, PostgresDialect};
use generd_introspect::{
    CatalogDialect, CatalogProvider, CatalogQuery, CatalogRow, CatalogSession, introspect,
};

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Connect,
    Query(CatalogQuery),
    Close,
}

/// Provider that replays canned responses and records every call.
struct ScriptedProvider {
    engine: Engine,
    responses: VecDeque<Result<Vec<CatalogRow>>>,
    calls: Arc<Mutex<Vec<Call>>>,
}

impl ScriptedProvider {
    fn new(engine: Engine, responses: Vec<Result<Vec<CatalogRow>>>) -> (Self, Arc<Mutex<Vec<Call>>>) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let provider = Self {
            engine,
            responses: responses.into(),
            calls: Arc::clone(&calls),
        };
        (provider, calls)
    }

    fn record(&self, call: Call) {
        self.calls.lock().expect("call log").push(call);
    }
}

#[async_trait]
impl CatalogProvider for ScriptedProvider {
    fn engine(&self) -> Engine {
        self.engine
    }

    async fn connect(&mut self) -> Result<()> {
        self.record(Call::Connect);
        Ok(())
    }

    async fn query(&mut self, query: &CatalogQuery) -> Result<Vec<CatalogRow>> {
        self.record(Call::Query(query.clone()));
        self.responses
            .pop_front()
            .unwrap_or_else(|| Err(Error::Db("no scripted response left".to_string())))
    }

    async fn close(&mut self) -> Result<()> {
        self.record(Call::Close);
        Ok(())
    }
}

fn tables() -> Vec<String> {
    vec!["users".to_string(), "orders".to_string()]
}

fn users_and_orders_responses() -> Vec<Result<Vec<CatalogRow>>> {
    vec![
        Ok(vec![
            CatalogRow::from_pairs([
                ("table_name", "users"),
                ("column_name", "id"),
                ("data_type", "integer"),
            ]),
            CatalogRow::from_pairs([
                ("table_name", "orders"),
                ("column_name", "user_id"),
                ("data_type", "integer"),
            ]),
        ]),
        Ok(vec![CatalogRow::from_pairs([
            ("table_name", "users"),
            ("column_name", "id"),
        ])]),
        Ok(Vec::new()),
        Ok(vec![CatalogRow::from_pairs([
            ("source_table", "orders"),
            ("source_column", "user_id"),
            ("target_table", "users"),
            ("target_column", "id"),
        ])]),
    ]
}

#[tokio::test]
async fn issues_catalog_queries_in_fixed_order() -> anyhow::Result<()> {
    let (provider, calls) = ScriptedProvider::new(Engine::Postgres, users_and_orders_responses());

    introspect(Box::new(provider), "public", &tables()).await?;

    let dialect = PostgresDialect;
    let expected = vec![
        Call::Connect,
        Call::Query(dialect.columns_query("public", &tables())),
        Call::Query(dialect.constraints_query("public", &tables(), ConstraintKind::PrimaryKey)),
        Call::Query(dialect.constraints_query("public", &tables(), ConstraintKind::Unique)),
        Call::Query(dialect.foreign_keys_query("public", &tables())),
        Call::Close,
    ];
    assert_eq!(*calls.lock().expect("call log"), expected);
    Ok(())
}

#[tokio::test]
async fn synthesizes_users_and_orders() -> anyhow::Result<()> {
    let (provider, _) = ScriptedProvider::new(Engine::Postgres, users_and_orders_responses());

    let metadata = introspect(Box::new(provider), "public", &tables()).await?;

    assert_eq!(metadata.len(), 2);
    assert_eq!(metadata[0].table_name, "users");
    assert_eq!(metadata[0].primary_key, vec!["id"]);
    assert_eq!(metadata[0].columns[0].data_type, "int");
    assert!(metadata[0].foreign_keys.is_empty());

    let orders = &metadata[1];
    assert!(orders.primary_key.is_empty());
    assert_eq!(orders.foreign_keys.len(), 1);
    assert_eq!(orders.foreign_keys[0].target_table, "users");
    assert_eq!(
        orders.foreign_keys[0].relationship_type,
        RelationshipType::OneToMany
    );
    Ok(())
}

#[tokio::test]
async fn query_failure_aborts_and_still_closes() {
    let responses = vec![
        Ok(Vec::new()),
        Err(Error::Db("permission denied for table pg_constraint".to_string())),
    ];
    let (provider, calls) = ScriptedProvider::new(Engine::Postgres, responses);

    let err = introspect(Box::new(provider), "public", &tables())
        .await
        .expect_err("failed query must abort the run");

    assert!(matches!(&err, Error::Db(message) if message.contains("permission denied")));
    let calls = calls.lock().expect("call log");
    let queries = calls.iter().filter(|call| matches!(call, Call::Query(_))).count();
    assert_eq!(queries, 2);
    assert_eq!(calls.last(), Some(&Call::Close));
}

#[tokio::test]
async fn missing_row_field_is_a_database_error() {
    let responses = vec![Ok(vec![CatalogRow::from_pairs([("table_name", "users")])])];
    let (provider, _) = ScriptedProvider::new(Engine::Postgres, responses);

    let err = introspect(Box::new(provider), "public", &tables())
        .await
        .expect_err("incomplete row must fail");
    assert!(matches!(err, Error::Db(message) if message.contains("column_name")));
}

#[tokio::test]
async fn reads_upper_case_labels_and_lists() -> anyhow::Result<()> {
    let responses = vec![
        Ok(vec![
            CatalogRow::from_pairs([("SCHEMA_NAME", "APP")]),
            CatalogRow::from_pairs([("SCHEMA_NAME", "HR")]),
        ]),
        Ok(vec![
            CatalogRow::from_pairs([("TABLE_NAME", "DEPARTMENTS")]),
            CatalogRow::from_pairs([("TABLE_NAME", "EMPLOYEES")]),
        ]),
    ];
    let (provider, calls) = ScriptedProvider::new(Engine::Oracle, responses);

    let mut session = CatalogSession::connect(Box::new(provider)).await?;
    let mut reader = session.reader();
    let schemas = reader.fetch_schemas().await?;
    let tables = reader.fetch_tables("HR").await?;
    session.finish(Ok(())).await?;

    assert_eq!(schemas, vec!["APP", "HR"]);
    assert_eq!(tables, vec!["DEPARTMENTS", "EMPLOYEES"]);
    assert_eq!(
        calls.lock().expect("call log")[2],
        Call::Query(OracleDialect.tables_query("HR"))
    );
    Ok(())
}

#[tokio::test]
async fn unique_and_primary_maps_stay_separate() -> anyhow::Result<()> {
    let responses = vec![
        Ok(vec![CatalogRow::from_pairs([
            ("table_name", "users"),
            ("column_name", "id"),
        ])]),
        Ok(vec![CatalogRow::from_pairs([
            ("table_name", "users"),
            ("column_name", "email"),
        ])]),
    ];
    let (provider, _) = ScriptedProvider::new(Engine::Postgres, responses);

    let mut session = CatalogSession::connect(Box::new(provider)).await?;
    let mut reader = session.reader();
    let primary = reader
        .fetch_constraints_metadata("public", &tables(), ConstraintKind::PrimaryKey)
        .await?;
    let unique = reader
        .fetch_constraints_metadata("public", &tables(), ConstraintKind::Unique)
        .await?;
    session.finish(Ok(())).await?;

    assert_eq!(primary.columns("users"), ["id"]);
    assert_eq!(unique.columns("users"), ["email"]);
    Ok(())
}
