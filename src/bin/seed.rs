use arreglio_admin::{
    config::AppConfig,
    db::connect_and_migrate,
    seed,
    services::auth_service::ensure_admin_account,
    state::{AppState, persist_team},
    storage::{Storage, keys},
    stores::TeamStore,
};

/// Resets `teamMembers` and `orders` to the demo data and makes sure the admin account exists.
/// Pass `--pending` to also park an order under `newOrder`.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;
    let url = config
        .database_url
        .clone()
        .ok_or_else(|| anyhow::anyhow!("DATABASE_URL is not set"))?;

    let storage = Storage::postgres(connect_and_migrate(&url).await?);

    let team = TeamStore::new(seed::team_members(), seed::orders());
    persist_team(&storage, &team).await?;
    let cleared = storage.remove_item(keys::NEW_ORDER).await?;

    if std::env::args().any(|arg| arg == "--pending") {
        let mut pending = team
            .orders()
            .last()
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("seed data has no orders"))?;
        pending.id = team.next_order_id();
        pending.assigned_to = None;
        storage.save_json(keys::NEW_ORDER, &pending).await?;
        println!("Parked order {} for the board", pending.id);
    }

    let state = AppState::load(config, storage).await?;
    ensure_admin_account(&state).await?;

    println!(
        "Seed completed: {} members, {} orders{}",
        team.members().len(),
        team.orders().len(),
        if cleared { ", stale pending order removed" } else { "" }
    );
    Ok(())
}
