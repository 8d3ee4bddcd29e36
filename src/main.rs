//! relist — automated backpack.tf classifieds repricer.
//!
//! Entry point. Loads configuration, initialises structured logging,
//! opens the local database, and runs the poll→reprice→sync loop with
//! graceful shutdown.

use anyhow::Result;
use chrono::Utc;
use std::time::Duration;
use tracing::{error, info};

use relist::backpack::BackpackClient;
use relist::config::AppConfig;
use relist::engine::{Repricer, Syncer, TrackedItem};
use relist::storage::Database;
use relist::types::CycleReport;

const BANNER: &str = r#"
           _ _     _
  _ __ ___| (_)___| |_
 | '__/ _ \ | / __| __|
 | | |  __/ | \__ \ |_
 |_|  \___|_|_|___/\__|

  backpack.tf classifieds repricer
  v0.1.0
"#;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    let cfg = AppConfig::load("config.toml")?;

    init_logging();

    println!("{BANNER}");
    info!(
        agent = %cfg.agent.name,
        interval_mins = cfg.agent.refresh_interval_mins,
        tracked_items = cfg.tracked_items.len(),
        dry_run = cfg.agent.dry_run,
        "relist starting up"
    );

    // -- Storage ---------------------------------------------------------

    let db = Database::connect(&cfg.storage.database_url).await?;
    let pruned = db.prune_untracked(&cfg.tracked_items).await?;
    if pruned > 0 {
        info!(pruned, "Deactivated listings for untracked items");
    }

    // -- backpack.tf client ----------------------------------------------

    let api_key = AppConfig::resolve_env(&cfg.backpack.api_key_env)?;
    let client = BackpackClient::new(api_key)?;

    // -- Engine ------------------------------------------------------------

    let items: Vec<TrackedItem> = cfg
        .tracked_items
        .iter()
        .map(|name| TrackedItem {
            name: name.clone(),
            cost_floor_scrap: cfg.pricing.cost_floor_scrap(name),
        })
        .collect();

    let repricer = Repricer::new(db.clone(), cfg.pricing.trim_fraction, items);
    let syncer = Syncer::new(db.clone(), cfg.agent.dry_run);

    // -- Main loop ---------------------------------------------------------

    let interval = Duration::from_secs(cfg.agent.refresh_interval_mins * 60);
    let mut ticker = tokio::time::interval(interval);
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    info!(
        interval_mins = cfg.agent.refresh_interval_mins,
        "Entering main loop. Press Ctrl+C to stop."
    );

    let mut cycle: u64 = 0;
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                cycle += 1;
                match run_cycle(&repricer, &syncer, &client, cycle).await {
                    Ok(report) => log_cycle_report(&report),
                    Err(e) => error!(cycle, error = %e, "Cycle failed — continuing to next"),
                }
            }
            _ = &mut shutdown => {
                info!("Shutdown signal received.");
                break;
            }
        }
    }

    info!(cycles = cycle, "relist shut down cleanly.");
    Ok(())
}

/// Run a single reprice→sync cycle.
async fn run_cycle(
    repricer: &Repricer,
    syncer: &Syncer,
    client: &BackpackClient,
    cycle: u64,
) -> Result<CycleReport> {
    info!(cycle, "Starting cycle");

    let refresh = repricer.refresh_all(client).await?;
    let sync = syncer.sync_all(client).await?;

    Ok(CycleReport {
        cycle_number: cycle,
        timestamp: Utc::now(),
        key_rate: refresh.key_rate,
        items_priced: refresh.items_priced,
        items_skipped: refresh.items_skipped,
        listings_published: sync.published,
        listings_failed: sync.failed,
    })
}

/// Log a human-readable cycle summary.
fn log_cycle_report(report: &CycleReport) {
    info!(
        cycle = report.cycle_number,
        key_rate = %report.key_rate,
        priced = report.items_priced,
        skipped = report.items_skipped,
        published = report.listings_published,
        failed = report.listings_failed,
        "Cycle complete"
    );
}

/// Initialise the `tracing` subscriber.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("relist=info"));

    let json_logging = std::env::var("RELIST_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_thread_ids(true)
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .init();
    }
}
