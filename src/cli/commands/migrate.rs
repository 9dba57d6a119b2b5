use anyhow::Context;

use crate::config::AppConfig;
use crate::database::PgCatalogStore;

pub async fn handle(config: AppConfig) -> anyhow::Result<()> {
    let store = PgCatalogStore::connect(&config.database)
        .await
        .context("failed to connect to database")?;
    store.migrate().await.context("failed to apply migrations")?;
    store.close().await;
    println!("Migrations applied");
    Ok(())
}
