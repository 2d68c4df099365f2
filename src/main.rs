use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use kotiki_api::{config::Config, db, routes, services::metrics, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let pool = db::create_pool(&config.database_url).await?;
    db::run_migrations(&pool).await?;
    info!("Database connected and migrations applied");

    tokio::fs::create_dir_all(&config.upload_dir).await?;
    metrics::start(pool.clone());

    let addr = format!("{}:{}", config.host, config.port);
    info!(
        "Access tokens valid for {} hour(s), images stored in {}",
        config.token_ttl_hours, config.upload_dir
    );

    let state = AppState::new(pool, config)?;
    let app = routes::build_router(state);

    info!("kotiki API listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
