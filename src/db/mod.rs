use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

pub async fn create_pool(database_url: &str) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await?;
    Ok(pool)
}

/// Run the migrations embedded from ./migrations/
pub async fn run_migrations(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

fn database_error(e: &anyhow::Error) -> Option<&dyn sqlx::error::DatabaseError> {
    e.downcast_ref::<sqlx::Error>()?.as_database_error()
}

/// True if the error came from a UNIQUE constraint (e.g. a concurrent insert
/// of the same email or breed).
pub fn is_unique_violation(e: &anyhow::Error) -> bool {
    database_error(e).is_some_and(|db| db.is_unique_violation())
}

pub fn is_foreign_key_violation(e: &anyhow::Error) -> bool {
    database_error(e).is_some_and(|db| db.is_foreign_key_violation())
}
