use anyhow::Context;
use recipe_catalog::{ingest, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter =
        std::env::var("RUST_LOG").unwrap_or_else(|_| "recipe_catalog=info".to_string());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "US_recipes.json".to_string());

    let state = AppState::init().await?;
    sqlx::migrate!("./migrations")
        .run(&state.db)
        .await
        .context("run migrations")?;

    let raw = std::fs::read_to_string(&path)
        .with_context(|| format!("read dataset from {path}"))?;
    let recipes = ingest::parse_recipes(&ingest::clean_raw_json(&raw))?;
    tracing::info!(count = recipes.len(), "parsed dataset");

    let inserted = ingest::insert_recipes(&state.db, &recipes).await?;
    tracing::info!(inserted, "bulk insert complete");

    Ok(())
}
