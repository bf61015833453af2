use std::path::PathBuf;

use anyhow::{Context, anyhow};
use generd_core::{ConnectionTarget, Engine, RelationshipType, TableDescriptor};
use generd_introspect::{CatalogSession, introspect_target};
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::{Connection, SqliteConnection};
use uuid::Uuid;

const FIXTURE: &[&str] = &[
    "CREATE TABLE users (
        id INTEGER PRIMARY KEY,
        email VARCHAR(255) NOT NULL UNIQUE,
        created_at TIMESTAMP
    )",
    "CREATE TABLE profiles (
        user_id INTEGER PRIMARY KEY REFERENCES users(id),
        bio TEXT
    )",
    "CREATE TABLE courses (
        id INTEGER PRIMARY KEY,
        title TEXT NOT NULL
    )",
    "CREATE TABLE enrollments (
        student_id INTEGER NOT NULL REFERENCES users(id),
        course_id INTEGER NOT NULL REFERENCES courses,
        PRIMARY KEY (student_id, course_id)
    )",
    "CREATE TABLE orders (
        id INTEGER PRIMARY KEY,
        user_id INTEGER REFERENCES users(id),
        total NUMERIC(10, 2)
    )",
    "CREATE VIEW active_users AS SELECT id, email FROM users",
];

/// Temporary database file removed on drop.
struct Fixture {
    path: PathBuf,
}

impl Fixture {
    async fn create() -> anyhow::Result<Self> {
        let path = std::env::temp_dir().join(format!("generd-{}.db", Uuid::new_v4()));
        let options = SqliteConnectOptions::new()
            .filename(&path)
            .create_if_missing(true);
        let mut conn = SqliteConnection::connect_with(&options)
            .await
            .context("create sqlite fixture")?;
        for statement in FIXTURE {
            sqlx::query(statement)
                .execute(&mut conn)
                .await
                .with_context(|| format!("apply fixture statement: {statement}"))?;
        }
        conn.close().await.context("close fixture connection")?;
        Ok(Self { path })
    }

    fn target(&self) -> anyhow::Result<ConnectionTarget> {
        let url = format!("sqlite://{}", self.path.display());
        Ok(ConnectionTarget::from_url(&url, Some(Engine::Sqlite))?)
    }
}

impl Drop for Fixture {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

fn find<'a>(metadata: &'a [TableDescriptor], name: &str) -> anyhow::Result<&'a TableDescriptor> {
    metadata
        .iter()
        .find(|table| table.table_name == name)
        .ok_or_else(|| anyhow!("{name} missing from metadata"))
}

#[tokio::test]
async fn lists_main_schema_and_base_tables() -> anyhow::Result<()> {
    let fixture = Fixture::create().await?;
    let target = fixture.target()?;

    let mut session = CatalogSession::open(&target).await?;
    let mut reader = session.reader();
    let schemas = reader.fetch_schemas().await;
    let tables = reader.fetch_tables("main").await;
    session.finish(Ok(())).await?;

    assert_eq!(schemas?, vec!["main"]);
    assert_eq!(
        tables?,
        vec!["courses", "enrollments", "orders", "profiles", "users"]
    );
    Ok(())
}

#[tokio::test]
async fn introspects_selected_tables() -> anyhow::Result<()> {
    let fixture = Fixture::create().await?;
    let target = fixture.target()?;
    let selected: Vec<String> = ["users", "orders", "enrollments", "profiles"]
        .into_iter()
        .map(String::from)
        .collect();

    let metadata = introspect_target(&target, "main", &selected).await?;

    let names: Vec<&str> = metadata.iter().map(|t| t.table_name.as_str()).collect();
    assert_eq!(names, vec!["users", "orders", "enrollments", "profiles"]);

    let users = find(&metadata, "users")?;
    assert_eq!(users.primary_key, vec!["id"]);
    let columns: Vec<(&str, &str)> = users
        .columns
        .iter()
        .map(|c| (c.column_name.as_str(), c.data_type.as_str()))
        .collect();
    assert_eq!(
        columns,
        vec![
            ("id", "int"),
            ("email", "varchar(255)"),
            ("created_at", "timestamp")
        ]
    );
    assert!(users.foreign_keys.is_empty());
    assert_eq!(users.relationship_type, None);

    let orders = find(&metadata, "orders")?;
    assert_eq!(orders.foreign_keys.len(), 1);
    assert_eq!(orders.foreign_keys[0].source_column, "user_id");
    assert_eq!(orders.foreign_keys[0].target_table, "users");
    assert_eq!(orders.foreign_keys[0].target_column, "id");
    assert_eq!(
        orders.foreign_keys[0].relationship_type,
        RelationshipType::OneToMany
    );

    let profiles = find(&metadata, "profiles")?;
    assert_eq!(
        profiles.foreign_keys[0].relationship_type,
        RelationshipType::OneToOne
    );

    Ok(())
}

#[tokio::test]
async fn detects_join_table_with_implicit_target_column() -> anyhow::Result<()> {
    let fixture = Fixture::create().await?;
    let target = fixture.target()?;
    let selected = vec!["enrollments".to_string()];

    let metadata = introspect_target(&target, "main", &selected).await?;
    let enrollments = find(&metadata, "enrollments")?;

    assert_eq!(enrollments.primary_key, vec!["student_id", "course_id"]);
    assert_eq!(
        enrollments.relationship_type,
        Some(RelationshipType::ManyToMany)
    );

    let mut edges: Vec<(&str, &str, &str)> = enrollments
        .foreign_keys
        .iter()
        .map(|fk| {
            (
                fk.source_column.as_str(),
                fk.target_table.as_str(),
                fk.target_column.as_str(),
            )
        })
        .collect();
    edges.sort();
    assert_eq!(
        edges,
        vec![("course_id", "courses", "id"), ("student_id", "users", "id")]
    );
    assert!(
        enrollments
            .foreign_keys
            .iter()
            .all(|fk| fk.relationship_type == RelationshipType::OneToOne)
    );
    Ok(())
}

#[tokio::test]
async fn reports_unique_constraint_columns() -> anyhow::Result<()> {
    let fixture = Fixture::create().await?;
    let target = fixture.target()?;

    let mut session = CatalogSession::open(&target).await?;
    let selected = vec!["users".to_string()];
    let unique = session
        .reader()
        .fetch_constraints_metadata("main", &selected, generd_core::ConstraintKind::Unique)
        .await;
    session.finish(Ok(())).await?;

    assert_eq!(unique?.columns("users"), ["email"]);
    Ok(())
}

#[tokio::test]
async fn missing_database_file_is_a_database_error() -> anyhow::Result<()> {
    let path = std::env::temp_dir().join(format!("generd-missing-{}.db", Uuid::new_v4()));
    let target = ConnectionTarget::from_url(
        &format!("sqlite://{}", path.display()),
        Some(Engine::Sqlite),
    )?;

    let err = introspect_target(&target, "main", &["users".to_string()])
        .await
        .expect_err("missing file must not be created");
    assert!(matches!(err, generd_core::Error::Db(_)));
    assert!(!path.exists());
    Ok(())
}
