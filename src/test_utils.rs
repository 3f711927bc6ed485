//! Test utilities with lazy testcontainers support
//!
//! Containers are started on first use and shared by every test in the
//! binary. Tests using them are `#[ignore]`d and need a Docker daemon:
//! `cargo test -- --ignored`.

pub mod containers {
    use redis::aio::ConnectionManager;
    use sqlx::PgPool;
    use testcontainers::{runners::AsyncRunner, ContainerAsync, ImageExt};
    use testcontainers_modules::{postgres::Postgres, redis::Redis};
    use tokio::sync::OnceCell;

    use crate::db;

    static POSTGRES: OnceCell<(ContainerAsync<Postgres>, String)> = OnceCell::const_new();
    static REDIS: OnceCell<(ContainerAsync<Redis>, String)> = OnceCell::const_new();

    /// Get PostgreSQL connection URL, starting the container on first use
    pub async fn postgres_url() -> String {
        let (_, url) = POSTGRES
            .get_or_init(|| async {
                // NULLS NOT DISTINCT needs PostgreSQL 15+
                let container = Postgres::default()
                    .with_user("grader")
                    .with_password("grader_test")
                    .with_db_name("grader_test")
                    .with_tag("16-alpine")
                    .start()
                    .await
                    .expect("Failed to start PostgreSQL container");

                let host = container.get_host().await.unwrap();
                let port = container.get_host_port_ipv4(5432).await.unwrap();
                let url = format!("postgres://grader:grader_test@{}:{}/grader_test", host, port);

                (container, url)
            })
            .await;

        url.clone()
    }

    /// Get Redis connection URL, starting the container on first use
    pub async fn redis_url() -> String {
        let (_, url) = REDIS
            .get_or_init(|| async {
                let container = Redis::default()
                    .start()
                    .await
                    .expect("Failed to start Redis container");

                let host = container.get_host().await.unwrap();
                let port = container.get_host_port_ipv4(6379).await.unwrap();
                let url = format!("redis://{}:{}", host, port);

                (container, url)
            })
            .await;

        url.clone()
    }

    /// Migrated pool on the shared container
    pub async fn pg_pool() -> PgPool {
        let pool = PgPool::connect(&postgres_url().await)
            .await
            .expect("Failed to connect to test database");

        db::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        pool
    }

    /// Fresh connection to the shared Redis container
    pub async fn redis_connection() -> ConnectionManager {
        let client = redis::Client::open(redis_url().await).expect("Invalid Redis URL");

        ConnectionManager::new(client)
            .await
            .expect("Failed to connect to test Redis")
    }
}

pub mod fixtures {
    use chrono::{Duration, Utc};
    use sqlx::PgPool;
    use uuid::Uuid;

    /// Insert a question and return its id
    pub async fn insert_question(pool: &PgPool, marks: i32) -> Uuid {
        sqlx::query_scalar(
            r#"
            INSERT INTO questions (title, expected_output, marks)
            VALUES ('Sum', '3', $1)
            RETURNING id
            "#,
        )
        .bind(marks)
        .fetch_one(pool)
        .await
        .expect("Failed to insert question")
    }

    /// Insert a contest running now and return its id
    pub async fn insert_contest(pool: &PgPool) -> Uuid {
        let now = Utc::now();

        sqlx::query_scalar(
            r#"
            INSERT INTO contests (title, start_time, end_time)
            VALUES ('Weekly', $1, $2)
            RETURNING id
            "#,
        )
        .bind(now - Duration::hours(1))
        .bind(now + Duration::hours(1))
        .fetch_one(pool)
        .await
        .expect("Failed to insert contest")
    }
}
