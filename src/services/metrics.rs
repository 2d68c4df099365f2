use lazy_static::lazy_static;
use prometheus::{register_counter, register_counter_vec, register_gauge, Counter, CounterVec, Gauge};
use sqlx::PgPool;
use tracing::{info, warn};

lazy_static! {
    // ── Event counters ──────────────────────────────────────────────────────
    pub static ref SIGNUPS_COUNTER: Counter = register_counter!(
        "api_signups_total",
        "Successful user registrations"
    ).unwrap();

    pub static ref LOGINS_COUNTER: CounterVec = register_counter_vec!(
        "api_logins_total",
        "Login attempts by status",
        &["status"]
    ).unwrap();

    pub static ref AUTH_REJECTIONS_COUNTER: CounterVec = register_counter_vec!(
        "api_auth_rejections_total",
        "Requests refused by the auth gate, by reason",
        &["reason"]
    ).unwrap();

    // ── Catalog gauges (refreshed by the collector) ─────────────────────────
    pub static ref USERS_GAUGE: Gauge = register_gauge!(
        "kotiki_users_total",
        "Registered users"
    ).unwrap();

    pub static ref CATS_GAUGE: Gauge = register_gauge!(
        "kotiki_cats_total",
        "Cats in the catalog"
    ).unwrap();

    pub static ref FAVORITES_GAUGE: Gauge = register_gauge!(
        "kotiki_favorites_total",
        "Favorite entries across all users"
    ).unwrap();
}

/// Spawn the background metrics collector (refreshes every 5 minutes).
pub fn start(pool: PgPool) {
    tokio::spawn(async move {
        loop {
            if let Err(e) = collect(&pool).await {
                warn!("Metrics: collection failed: {}", e);
            }
            tokio::time::sleep(tokio::time::Duration::from_secs(300)).await;
        }
    });
}

async fn collect(pool: &PgPool) -> anyhow::Result<()> {
    let (users, cats, favorites): (i64, i64, i64) = sqlx::query_as(
        "SELECT
            (SELECT COUNT(*) FROM users)::BIGINT,
            (SELECT COUNT(*) FROM cats)::BIGINT,
            (SELECT COUNT(*) FROM favorites)::BIGINT",
    )
    .fetch_one(pool)
    .await?;

    USERS_GAUGE.set(users as f64);
    CATS_GAUGE.set(cats as f64);
    FAVORITES_GAUGE.set(favorites as f64);

    info!("Metrics: {} users, {} cats, {} favorites", users, cats, favorites);
    Ok(())
}
