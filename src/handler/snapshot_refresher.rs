//! Background snapshot refresh task.
//!
//! Recomputes the global analytics snapshot and the snapshots of a
//! bounded set of DAOs on a fixed interval, overwriting cache entries
//! wholesale. DAOs outside the swept set still get fresh metrics on
//! direct request through the cold path.

use std::time::Duration;

use futures::stream::{self, StreamExt};
use tokio::time::interval;
use tracing::{debug, error, info, warn};

use crate::{
    aggregator::AnalyticsEngine,
    configuration::{AppState, State},
    error::Error,
};

/// Concurrency cap for per-DAO refreshes within one sweep.
const MAX_CONCURRENT_REFRESHES: usize = 4;

/// Runs indefinitely. A failed sweep is logged and the next tick tries
/// again; the task itself only ends with the process.
pub async fn snapshot_refresh_task(
    app_state: AppState<State>,
) -> Result<(), Error> {
    info!("Starting snapshot refresh background task");

    let mut tick =
        interval(Duration::from_secs(app_state.config.refresh_interval_seconds));

    // The first tick fires immediately and seeds the cache at startup.
    loop {
        tick.tick().await;

        if let Err(e) = refresh_snapshots(&app_state).await {
            error!("Error in snapshot refresh cycle: {}", e);
        }
    }
}

async fn refresh_snapshots(app_state: &AppState<State>) -> Result<(), Error> {
    let engine = AnalyticsEngine::new(app_state);

    // Global snapshot first; a failure here is degraded, not fatal to the
    // sweep.
    if let Err(e) = engine.refresh_snapshot(None).await {
        warn!("Failed to refresh global snapshot: {}", e);
    }

    let daos = app_state
        .database
        .daos
        .list_first(app_state.config.active_dao_sweep_limit)
        .await?;

    if daos.is_empty() {
        debug!("No DAOs to sweep");
        return Ok(());
    }

    debug!(
        "Refreshing {} DAO snapshots (max {} concurrent)",
        daos.len(),
        MAX_CONCURRENT_REFRESHES
    );

    let results: Vec<(String, Result<(), Error>)> = stream::iter(daos)
        .map(|dao| {
            let app_state = app_state.clone();
            async move {
                let engine = AnalyticsEngine::new(&app_state);
                let result = engine.refresh_snapshot(Some(&dao.id)).await;
                (dao.id, result)
            }
        })
        .buffer_unordered(MAX_CONCURRENT_REFRESHES)
        .collect()
        .await;

    for (dao_id, result) in results {
        match result {
            Ok(()) => debug!("Refreshed snapshot for dao {}", dao_id),
            Err(e) => {
                warn!("Failed to refresh snapshot for dao {}: {}", dao_id, e)
            },
        }
    }

    Ok(())
}
