use std::sync::Arc;

use feedback_api::{
    app,
    config::{AppConfig, StoreBackend},
    state::AppState,
    store::PgSubmissionStore,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    app::init_tracing("feedback_api=debug,axum=info,tower_http=info");

    let config = Arc::new(AppConfig::from_env()?);

    // Postgres: one pool, migrated before it starts serving
    let app_state = match &config.store {
        StoreBackend::Postgres(db) => {
            let pg = PgSubmissionStore::connect_lazy(db)?;
            if let Err(e) = sqlx::migrate!("./migrations").run(pg.pool()).await {
                tracing::warn!(error = %e, "migration failed; continuing");
            }
            tracing::info!(backend = "postgres", tier = %db.tier, "submission store ready");
            AppState::with_primary(config.clone(), Arc::new(pg))
        }
        _ => AppState::from_config(config.clone())?,
    };

    let router = app::build_app(app_state);
    app::serve(router).await
}
