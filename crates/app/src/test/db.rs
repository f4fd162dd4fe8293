//! Per-test PostgreSQL databases inside one shared container.

use std::env;

use once_cell::sync::Lazy;
use sqlx::{Connection, PgConnection, PgPool};
use testcontainers::{ContainerAsync, ImageExt, runners::AsyncRunner};
use testcontainers_modules::postgres::Postgres as PostgresImage;
use tokio::sync::{OnceCell, mpsc};
use uuid::Uuid;

use crate::database;

const USER: &str = "storefront_test";
const PASSWORD: &str = "storefront_test_password";
const ADMIN_DATABASE: &str = "postgres";

/// Docker hosts that are not reachable on localhost set `TESTCONTAINERS_HOST_OVERRIDE`.
static HOST: Lazy<String> = Lazy::new(|| {
    env::var("TESTCONTAINERS_HOST_OVERRIDE").unwrap_or_else(|_| "localhost".to_string())
});

static SERVER: OnceCell<SharedServer> = OnceCell::const_new();

static DROPPER: OnceCell<mpsc::UnboundedSender<String>> = OnceCell::const_new();

struct SharedServer {
    _container: ContainerAsync<PostgresImage>,
    port: u16,
}

impl SharedServer {
    async fn start() -> Self {
        let container = PostgresImage::default()
            .with_user(USER)
            .with_password(PASSWORD)
            .with_db_name(USER)
            .with_env_var("POSTGRES_INITDB_ARGS", "--auth-host=trust")
            .start()
            .await
            .expect("postgres container should start");

        let port = container
            .get_host_port_ipv4(5432)
            .await
            .expect("postgres port should be mapped");

        Self {
            _container: container,
            port,
        }
    }

    fn url(&self, database: &str) -> String {
        format!(
            "postgresql://{USER}:{PASSWORD}@{host}:{port}/{database}",
            host = *HOST,
            port = self.port
        )
    }

    async fn admin_connection(&self) -> Result<PgConnection, sqlx::Error> {
        PgConnection::connect(&self.url(ADMIN_DATABASE)).await
    }
}

/// Names are interpolated into DDL, so only plain lowercase identifiers pass.
fn is_safe_identifier(name: &str) -> bool {
    (1..=63).contains(&name.len())
        && name.starts_with(|c: char| c.is_ascii_lowercase())
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

fn unique_database_name() -> String {
    format!("storefront_{}", Uuid::now_v7().simple())
}

async fn drop_database(name: &str) -> Result<(), sqlx::Error> {
    let Some(server) = SERVER.get() else {
        return Ok(());
    };

    if !is_safe_identifier(name) {
        return Ok(());
    }

    let mut conn = server.admin_connection().await?;

    sqlx::query(&format!("DROP DATABASE IF EXISTS \"{name}\""))
        .execute(&mut conn)
        .await?;

    conn.close().await
}

async fn spawn_dropper() -> mpsc::UnboundedSender<String> {
    let (sender, mut receiver) = mpsc::unbounded_channel::<String>();

    tokio::spawn(async move {
        while let Some(name) = receiver.recv().await {
            if let Err(error) = drop_database(&name).await {
                eprintln!("could not drop test database {name}: {error}");
            }
        }
    });

    sender
}

/// A freshly migrated database owned by one test.
///
/// Services commit for real; isolation comes from every test getting its own
/// database. The database is dropped in the background once the value goes away.
#[derive(Debug)]
pub struct TestDb {
    pool: PgPool,
    name: String,
}

impl TestDb {
    pub async fn new() -> Self {
        DROPPER.get_or_init(spawn_dropper).await;

        let server = SERVER.get_or_init(SharedServer::start).await;
        let name = unique_database_name();

        let mut admin = server
            .admin_connection()
            .await
            .expect("admin database should accept connections");

        sqlx::query(&format!("CREATE DATABASE \"{name}\""))
            .execute(&mut admin)
            .await
            .expect("test database should be created");

        admin.close().await.expect("admin connection should close");

        let pool = PgPool::connect(&server.url(&name))
            .await
            .expect("test database should accept connections");

        database::migrate(&pool)
            .await
            .expect("migrations should apply to a fresh database");

        Self { pool, name }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

impl Drop for TestDb {
    fn drop(&mut self) {
        if let Some(sender) = DROPPER.get() {
            let _queued = sender.send(self.name.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_names_are_safe_identifiers() {
        let name = unique_database_name();

        assert!(is_safe_identifier(&name), "{name} should be accepted");
        assert_ne!(name, unique_database_name());
    }

    #[test]
    fn unsafe_identifiers_are_rejected() {
        for name in [
            "",
            "1storefront",
            "Storefront",
            "store-front",
            "store\"; DROP DATABASE postgres; --",
            &"a".repeat(64),
        ] {
            assert!(!is_safe_identifier(name), "{name:?} should be rejected");
        }
    }

    #[tokio::test]
    async fn migrations_seed_order_statuses() {
        let test_db = TestDb::new().await;

        let keys: Vec<String> =
            sqlx::query_scalar("SELECT key FROM order_statuses ORDER BY sort_order")
                .fetch_all(test_db.pool())
                .await
                .expect("order statuses should be readable");

        assert_eq!(
            keys,
            ["pending", "paid", "separation", "shipped", "delivered"]
        );
    }

    #[tokio::test]
    async fn each_test_database_is_isolated() {
        let first = TestDb::new().await;
        let second = TestDb::new().await;

        sqlx::query("CREATE TABLE scratch (id INTEGER)")
            .execute(first.pool())
            .await
            .expect("scratch table should be created");

        let missing = sqlx::query("SELECT COUNT(*) FROM scratch")
            .fetch_one(second.pool())
            .await;

        assert!(missing.is_err(), "second database must not see the table");
    }
}
