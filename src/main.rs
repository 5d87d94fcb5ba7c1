use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use tokio::sync::{RwLock, broadcast};

use nutriboard::domain::FoodCategory;
use nutriboard::energy::TdeeFormula;
use nutriboard::foods::{FoodDatabase, load_food_database};
use nutriboard::server::{self, AppState, BoardData, ReloadSignal};
use nutriboard::telegram;
use nutriboard::watcher::{WatcherConfig, watch_file};

/// Meal-planning board backend: nutrition targets and daily meal plans.
#[derive(Parser, Debug)]
#[command(name = "nutriboard")]
#[command(about = "Nutrition target calculation and meal planning for the board UI")]
#[command(version)]
struct Args {
    /// Port number for the web server.
    #[arg(
        long,
        value_name = "PORT",
        env = "NUTRIBOARD_PORT",
        default_value = "8080"
    )]
    port: u16,

    /// Path to a JSON food database. The compiled-in database is used when
    /// absent; when present, the file is watched and hot-reloaded.
    #[arg(long, value_name = "FILE", env = "NUTRIBOARD_FOODS")]
    foods: Option<PathBuf>,

    /// TDEE formula: "detailed" (BMR + NEAT + TEF + steps + exercise) or
    /// "activity-multiplier" (legacy).
    #[arg(
        long,
        value_name = "FORMULA",
        env = "NUTRIBOARD_FORMULA",
        default_value = "detailed"
    )]
    formula: TdeeFormula,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    let args = Args::parse();

    // Load the food database (file if given, compiled-in otherwise)
    let (foods, foods_path) = match &args.foods {
        Some(path) => {
            let canonical = path
                .canonicalize()
                .with_context(|| format!("Failed to resolve path: {}", path.display()))?;
            let db = load_food_database(&canonical)
                .with_context(|| format!("Failed to load food database from {}", canonical.display()))?;
            println!("Food database: {}", canonical.display());
            (db, Some(canonical))
        }
        None => {
            println!("Food database: compiled-in defaults");
            (FoodDatabase::default(), None)
        }
    };
    print_food_summary(&foods);

    println!();
    println!("TDEE formula: {:?}", args.formula);

    // Create broadcast channel for board notifications
    let (reload_tx, _) = broadcast::channel::<ReloadSignal>(16);

    let state = Arc::new(AppState {
        data: RwLock::new(BoardData {
            foods,
            last_reload: Utc::now(),
        }),
        foods_path: foods_path.clone(),
        formula: args.formula,
        reload_tx,
    });

    let static_dir = find_static_dir()?;
    println!();
    println!("Static files: {}", static_dir.display());

    // Watch the food database file for live reload
    if let Some(path) = foods_path {
        let watcher_state = state.clone();
        tokio::spawn(async move {
            let config = WatcherConfig::default();
            let retry_config = config.clone();

            if let Err(e) = watch_file(&path, config, move || {
                let state = watcher_state.clone();
                let config = retry_config.clone();
                tokio::spawn(async move {
                    reload_with_retry(&state, &config).await;
                });
            })
            .await
            {
                log::error!("Food database watcher error: {e}");
            }
        });
        println!("Live reload enabled - watching for food database changes");
    }

    // Start the Telegram assessment bot when a token is configured
    if std::env::var("TELOXIDE_TOKEN").is_ok() {
        println!("Telegram assessment bot enabled");
        tokio::spawn(telegram::start_bot(state.clone()));
    }

    println!();
    server::run_server(state, args.port, static_dir).await?;

    Ok(())
}

/// Prints a per-category item summary.
fn print_food_summary(foods: &FoodDatabase) {
    println!();
    println!("=== Food Database ===");
    println!();
    println!("Total items: {}", foods.total_count());
    for category in FoodCategory::all() {
        println!("{:12} {:3} items", category.key(), foods.category(*category).len());
    }
}

/// Reloads the food database with retry for transient failures (editors
/// often truncate-then-write, so the first read can catch a half file).
async fn reload_with_retry(state: &AppState, config: &WatcherConfig) {
    let Some(path) = &state.foods_path else {
        return;
    };

    let mut last_error = None;

    for attempt in 0..config.retry_attempts {
        match load_food_database(path) {
            Ok(foods) => {
                let mut data = state.data.write().await;
                data.foods = foods;
                data.last_reload = Utc::now();
                drop(data);

                log::info!("Food database reloaded");
                let _ = state.reload_tx.send(ReloadSignal::Reloaded);
                return;
            }
            Err(e) => {
                log::warn!("Reload attempt {} failed: {e}", attempt + 1);
                last_error = Some(e);
                tokio::time::sleep(config.retry_delay).await;
            }
        }
    }

    // All retries failed; keep serving the previous database.
    if let Some(e) = last_error {
        log::error!(
            "Failed to reload food database after {} attempts: {e}",
            config.retry_attempts
        );
        let _ = state
            .reload_tx
            .send(ReloadSignal::Failed("Failed to reload food database".into()));
    }
}

/// Finds the static directory for serving the board frontend.
fn find_static_dir() -> Result<PathBuf> {
    // Try relative to current working directory
    let cwd_static = PathBuf::from("static");
    if cwd_static.is_dir() {
        return Ok(cwd_static);
    }

    // Try relative to executable
    if let Ok(exe_path) = std::env::current_exe()
        && let Some(exe_dir) = exe_path.parent()
    {
        let exe_static = exe_dir.join("static");
        if exe_static.is_dir() {
            return Ok(exe_static);
        }
    }

    // Default to cwd/static
    Ok(cwd_static)
}
