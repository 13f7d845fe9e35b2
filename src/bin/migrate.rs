use arreglio_admin::{config::AppConfig, db::connect_and_migrate, storage::Storage};

/// Applies pending migrations and checks the store answers.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;
    let url = config
        .database_url
        .ok_or_else(|| anyhow::anyhow!("DATABASE_URL is not set"))?;
    let storage = Storage::postgres(connect_and_migrate(&url).await?);
    storage.ping().await?;
    println!("Migrations applied");
    Ok(())
}
