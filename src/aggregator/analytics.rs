//! Snapshot composition, historical reconstruction and activity tracking.
//!
//! The engine has two operational states per cache key: cold (no snapshot
//! yet, computed synchronously on first request) and warm (served from the
//! snapshot cache until the next sweep overwrites it).

use std::cmp::Ordering;

use chrono::{Duration, Utc};
use futures::stream::{self, StreamExt};
use tracing::warn;

use crate::{
    cache::cached_fetch,
    configuration::State,
    error::Error,
    helpers::{bucket_windows, percent, snapshot_cache_key, Period},
    model::{
        ActivityEvent, AnalyticsMetrics, DaoPerformance, HistoricalPoint,
        IndustryBenchmarks, PerformanceBenchmarks, PlatformQuartiles,
    },
};

/// How many DAOs the top-performers ranking considers.
pub const TOP_DAO_LIMIT: i64 = 5;

/// How many DAOs feed the platform quartiles.
const BENCHMARK_DAO_LIMIT: i64 = 100;

/// Concurrency cap for per-DAO fan-out, keeping sweep load off the pool.
const MAX_CONCURRENT_DAO_METRICS: usize = 4;

// Industry reference values reported alongside platform quartiles.
const INDUSTRY_GOVERNANCE_PARTICIPATION: f64 = 65.0;
const INDUSTRY_PROPOSAL_SUCCESS_RATE: f64 = 72.0;
const INDUSTRY_TREASURY_GROWTH: f64 = 15.0;

/// Executed share of all proposals, in percent; zero for no proposals.
pub fn success_rate(executed: i64, total: i64) -> f64 {
    percent(executed, total)
}

/// `(top, median, bottom)` picks from a list already sorted best-first.
pub fn select_quartiles(
    sorted: &[AnalyticsMetrics],
) -> Option<(AnalyticsMetrics, AnalyticsMetrics, AnalyticsMetrics)> {
    let top = sorted.first()?.clone();
    let median = sorted[sorted.len() / 2].clone();
    let bottom = sorted.last()?.clone();
    Some((top, median, bottom))
}

pub struct AnalyticsEngine<'a> {
    state: &'a State,
}

impl<'a> AnalyticsEngine<'a> {
    pub fn new(state: &'a State) -> Self {
        Self { state }
    }

    /// Full point-in-time composition across all aggregation domains.
    /// Queries fan out concurrently and the call fails as a whole if any
    /// leg fails; degrade decisions belong to the callers that want them.
    pub async fn real_time_metrics(
        &self,
        dao_id: Option<&str>,
    ) -> Result<AnalyticsMetrics, Error> {
        let db = &self.state.database;
        let window_start = Utc::now()
            - Duration::days(i64::from(
                self.state.config.engagement_window_days,
            ));

        let (
            total_daos,
            total_proposals,
            executed_proposals,
            total_votes,
            total_users,
            total_tasks,
            total_transaction_volume,
            votes_in_window,
        ) = tokio::try_join!(
            async {
                match dao_id {
                    Some(dao_id) => {
                        Ok(if db.daos.exists(dao_id).await? { 1 } else { 0 })
                    },
                    None => db.daos.count_all().await,
                }
            },
            db.proposal.count_all(dao_id),
            db.proposal.count_executed(dao_id),
            db.vote.count_all(dao_id),
            db.users.count_all(),
            db.task.count_all(dao_id),
            db.transaction.sum_volume(dao_id),
            db.vote.count_since(dao_id, window_start),
        )?;

        let top_performing_daos =
            self.top_performing_daos(TOP_DAO_LIMIT).await?;

        Ok(AnalyticsMetrics {
            total_daos,
            total_proposals,
            total_votes,
            total_users,
            total_tasks,
            total_transaction_volume,
            avg_proposal_success_rate: success_rate(
                executed_proposals,
                total_proposals,
            ),
            avg_user_engagement: percent(votes_in_window, total_users),
            top_performing_daos,
        })
    }

    /// Serves the cached snapshot, computing it synchronously on a cold
    /// miss. The background sweep keeps the hot keys warm.
    pub async fn snapshot(
        &self,
        dao_id: Option<&str>,
    ) -> Result<AnalyticsMetrics, Error> {
        let key = snapshot_cache_key(dao_id);
        cached_fetch(&self.state.api_cache.snapshots, &key, || async {
            self.real_time_metrics(dao_id).await
        })
        .await
    }

    /// Recomputes one snapshot and overwrites its cache entry wholesale.
    pub async fn refresh_snapshot(
        &self,
        dao_id: Option<&str>,
    ) -> Result<(), Error> {
        let metrics = self.real_time_metrics(dao_id).await?;
        self.state
            .api_cache
            .snapshots
            .insert(snapshot_cache_key(dao_id), metrics)
            .await;
        Ok(())
    }

    async fn top_performing_daos(
        &self,
        limit: i64,
    ) -> Result<Vec<DaoPerformance>, Error> {
        let db = &self.state.database;
        let daos = db.daos.list_first(limit).await?;

        let results: Vec<Result<DaoPerformance, Error>> = stream::iter(daos)
            .map(|dao| async move {
                let (proposal_count, executed, treasury_value) = tokio::try_join!(
                    db.proposal.count_all(Some(&dao.id)),
                    db.proposal.count_executed(Some(&dao.id)),
                    db.vault.sum_balance(&dao.id),
                )?;

                Ok(DaoPerformance {
                    id: dao.id,
                    name: dao.name,
                    member_count: dao.member_count,
                    proposal_count,
                    success_rate: success_rate(executed, proposal_count),
                    treasury_value,
                })
            })
            .buffer_unordered(MAX_CONCURRENT_DAO_METRICS)
            .collect()
            .await;

        let mut performances = Vec::with_capacity(results.len());
        for result in results {
            performances.push(result?);
        }

        performances.sort_by(|a, b| {
            b.success_rate
                .partial_cmp(&a.success_rate)
                .unwrap_or(Ordering::Equal)
        });

        Ok(performances)
    }

    /// Reconstructs a time series by running one point-in-time aggregation
    /// per bucket. O(buckets) round trips; acceptable at this data size,
    /// and the output contract is what a pre-aggregated rollup would have
    /// to match.
    pub async fn historical_data(
        &self,
        period: Period,
        dao_id: Option<&str>,
    ) -> Result<Vec<HistoricalPoint>, Error> {
        let db = &self.state.database;
        let windows = bucket_windows(period, Utc::now());
        let mut points = Vec::with_capacity(windows.len());

        for (start, end) in windows {
            let (
                dao_count,
                user_count,
                proposal_count,
                transaction_volume,
                executed_in_bucket,
            ) = tokio::try_join!(
                async {
                    match dao_id {
                        Some(_) => Ok(1),
                        None => db.daos.count_created_before(end).await,
                    }
                },
                db.users.count_created_before(end),
                db.proposal.count_between(dao_id, start, end),
                db.transaction.sum_volume_between(dao_id, start, end),
                db.proposal.count_executed_between(dao_id, start, end),
            )?;

            points.push(HistoricalPoint {
                timestamp: end,
                dao_count,
                user_count,
                proposal_count,
                transaction_volume,
                avg_success_rate: success_rate(
                    executed_in_bucket,
                    proposal_count,
                ),
            });
        }

        Ok(points)
    }

    pub async fn performance_benchmarks(
        &self,
    ) -> Result<PerformanceBenchmarks, Error> {
        let db = &self.state.database;
        let daos = db.daos.list_first(BENCHMARK_DAO_LIMIT).await?;

        let results: Vec<Result<AnalyticsMetrics, Error>> = stream::iter(daos)
            .map(|dao| async move {
                self.real_time_metrics(Some(&dao.id)).await
            })
            .buffer_unordered(MAX_CONCURRENT_DAO_METRICS)
            .collect()
            .await;

        let mut all_dao_metrics = Vec::with_capacity(results.len());
        for result in results {
            all_dao_metrics.push(result?);
        }

        all_dao_metrics.sort_by(|a, b| {
            b.avg_user_engagement
                .partial_cmp(&a.avg_user_engagement)
                .unwrap_or(Ordering::Equal)
        });

        let (top_quartile, median, bottom_quartile) =
            match select_quartiles(&all_dao_metrics) {
                Some(quartiles) => quartiles,
                None => {
                    let global = self.real_time_metrics(None).await?;
                    (global.clone(), global.clone(), global)
                },
            };

        Ok(PerformanceBenchmarks {
            industry: IndustryBenchmarks {
                avg_governance_participation:
                    INDUSTRY_GOVERNANCE_PARTICIPATION,
                avg_proposal_success_rate: INDUSTRY_PROPOSAL_SUCCESS_RATE,
                avg_treasury_growth: INDUSTRY_TREASURY_GROWTH,
            },
            platform: PlatformQuartiles {
                top_quartile,
                median,
                bottom_quartile,
            },
        })
    }

    /// Records the event in the in-process buffer and attempts the durable
    /// append. A failed append is logged and swallowed: under a sustained
    /// storage outage the durable history under-counts, while the recent
    /// feed stays responsive.
    pub async fn track_activity(&self, event: ActivityEvent) {
        self.state.activity_log.record(event.clone());

        if let Err(e) = self.state.database.activity.insert(&event).await {
            warn!(
                "durable activity append failed for user {} in dao {}: {}",
                event.user_id, event.dao_id, e
            );
        }
    }

    pub fn recent_activity(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Vec<ActivityEvent> {
        self.state.activity_log.recent(user_id, limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bigdecimal::BigDecimal;

    fn metrics(engagement: f64) -> AnalyticsMetrics {
        AnalyticsMetrics {
            total_daos: 1,
            total_proposals: 0,
            total_votes: 0,
            total_users: 0,
            total_tasks: 0,
            total_transaction_volume: BigDecimal::from(0),
            avg_proposal_success_rate: 0.0,
            avg_user_engagement: engagement,
            top_performing_daos: vec![],
        }
    }

    #[test]
    fn success_rate_is_zero_without_proposals() {
        assert_eq!(success_rate(0, 0), 0.0);
    }

    #[test]
    fn success_rate_is_a_percentage() {
        assert_eq!(success_rate(3, 4), 75.0);
        assert_eq!(success_rate(4, 4), 100.0);
    }

    #[test]
    fn quartiles_of_empty_list_are_none() {
        assert!(select_quartiles(&[]).is_none());
    }

    #[test]
    fn quartiles_pick_first_middle_last() {
        let sorted: Vec<AnalyticsMetrics> =
            [90.0, 70.0, 50.0, 30.0, 10.0].map(metrics).into();
        let (top, median, bottom) = select_quartiles(&sorted).unwrap();
        assert_eq!(top.avg_user_engagement, 90.0);
        assert_eq!(median.avg_user_engagement, 50.0);
        assert_eq!(bottom.avg_user_engagement, 10.0);
    }

    #[test]
    fn quartiles_of_single_entry_repeat_it() {
        let sorted = vec![metrics(40.0)];
        let (top, median, bottom) = select_quartiles(&sorted).unwrap();
        assert_eq!(top.avg_user_engagement, 40.0);
        assert_eq!(median.avg_user_engagement, 40.0);
        assert_eq!(bottom.avg_user_engagement, 40.0);
    }
}
