use std::sync::Arc;

use color_eyre::eyre::{eyre, Result};
use secrecy::{ExposeSecret, Secret};
use tokio::sync::RwLock;

use salon_rota::{
    app_state::AppState,
    get_postgres_pool,
    services::{
        data_stores::{
            PostgresServiceStore, PostgresShiftStore, PostgresWorkerStore,
        },
        SystemClock,
    },
    utils::{
        constants::{prod, DATABASE_URL, JWT_SECRET},
        tracing::init_tracing,
    },
    Application,
};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing()?;

    let pool = get_postgres_pool(&DATABASE_URL).await?;
    sqlx::migrate!().run(&pool).await?;

    let shift_store = Arc::new(RwLock::new(PostgresShiftStore::new(pool.clone())));
    let worker_store = Arc::new(RwLock::new(PostgresWorkerStore::new(pool.clone())));
    let service_store = Arc::new(RwLock::new(PostgresServiceStore::new(pool)));

    let app_state = AppState::new(
        shift_store,
        worker_store,
        service_store,
        Arc::new(SystemClock),
        Secret::new(JWT_SECRET.expose_secret().to_owned()),
    );

    let app = Application::build(app_state, prod::APP_ADDRESS)
        .await
        .map_err(|e| eyre!("failed to build app: {e}"))?;

    app.run().await?;
    Ok(())
}
