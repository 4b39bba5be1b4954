use anyhow::{Context, Result};
use std::sync::Arc;

use survey_admin::config::Settings;
use survey_admin::logging;
use survey_admin::seed;
use survey_admin::services::{
    Clock, IdGenerator, JsonFileStore, MemoryStore, Repository, Store, SystemClock,
    UuidIdGenerator,
};

fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let settings = Settings::from_env()?;

    // Initialize logging
    logging::init_logging(&settings);

    tracing::info!(
        env = ?settings.env,
        log_format = ?settings.log_format,
        store = ?settings.store_path,
        seed_demo = settings.seed_demo,
        "Starting survey admin report"
    );

    let store: Arc<dyn Store> = match &settings.store_path {
        Some(path) => Arc::new(
            JsonFileStore::open(path)
                .with_context(|| format!("Failed to open store at {}", path.display()))?,
        ),
        None => Arc::new(MemoryStore::new()),
    };
    let repo = Repository::new(store);

    let ids: Arc<dyn IdGenerator> = Arc::new(UuidIdGenerator);
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    if settings.seed_demo {
        let defaults = seed::demo_snapshot(ids.clone(), clock.clone())
            .context("Demo data failed validation")?;
        repo.seed_defaults(&defaults)
            .context("Failed to seed demo data")?;
    }

    let model = repo
        .load(ids, clock)
        .context("Failed to load survey data")?;

    let dashboard = model.dashboard();
    tracing::info!(
        in_progress = dashboard.statuses.in_progress.len(),
        needs_grading = dashboard.statuses.needs_grading.len(),
        total_score = dashboard.total_score,
        "Dashboard computed"
    );

    println!("{}", serde_json::to_string_pretty(&dashboard)?);

    Ok(())
}
