//! Analytics API endpoints: snapshots, historical series, benchmarks and
//! CSV export.

use actix_web::{get, web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};

use crate::{
    aggregator::AnalyticsEngine,
    cache::cached_fetch,
    cache_keys,
    configuration::{AppState, State},
    csv_response::to_csv_response,
    error::Error,
    helpers::{historical_cache_key, Period},
    model::{AnalyticsMetrics, PerformanceBenchmarks},
};

const DEFAULT_EXPORT_TYPE: &str = "metrics";
const DEFAULT_PERIOD: &str = "month";

#[derive(Debug, Deserialize)]
pub struct MetricsQuery {
    #[serde(rename = "daoId")]
    dao_id: Option<String>,
}

#[get("/analytics/metrics")]
pub async fn metrics(
    state: web::Data<AppState<State>>,
    query: web::Query<MetricsQuery>,
) -> Result<impl Responder, Error> {
    let engine = AnalyticsEngine::new(&state);
    let data = engine.snapshot(query.dao_id.as_deref()).await?;

    Ok(web::Json(data))
}

#[derive(Debug, Deserialize)]
pub struct HistoricalQuery {
    period: Option<String>,
    #[serde(rename = "daoId")]
    dao_id: Option<String>,
}

#[get("/analytics/historical")]
pub async fn historical(
    state: web::Data<AppState<State>>,
    query: web::Query<HistoricalQuery>,
) -> Result<impl Responder, Error> {
    let period: Period =
        query.period.as_deref().unwrap_or(DEFAULT_PERIOD).parse()?;
    let dao_id = query.dao_id.as_deref();
    let cache_key = historical_cache_key(period, dao_id);

    let data = cached_fetch(&state.api_cache.historical, &cache_key, || async {
        AnalyticsEngine::new(&state).historical_data(period, dao_id).await
    })
    .await?;

    Ok(web::Json(data))
}

#[get("/analytics/benchmarks")]
pub async fn benchmarks(
    state: web::Data<AppState<State>>,
) -> Result<impl Responder, Error> {
    let data = cached_fetch(
        &state.api_cache.benchmarks,
        cache_keys::BENCHMARKS,
        || async { AnalyticsEngine::new(&state).performance_benchmarks().await },
    )
    .await?;

    Ok(web::Json(data))
}

#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    #[serde(rename = "type")]
    export_type: Option<String>,
    period: Option<String>,
    #[serde(rename = "daoId")]
    dao_id: Option<String>,
}

#[get("/analytics/export")]
pub async fn export(
    state: web::Data<AppState<State>>,
    query: web::Query<ExportQuery>,
) -> Result<HttpResponse, Error> {
    let engine = AnalyticsEngine::new(&state);
    let dao_id = query.dao_id.as_deref();
    let scope = dao_id.unwrap_or("all");
    let export_type =
        query.export_type.as_deref().unwrap_or(DEFAULT_EXPORT_TYPE);

    match export_type {
        "metrics" => {
            let snapshot = engine.snapshot(dao_id).await?;
            let rows = vec![MetricsCsvRow::from(&snapshot)];
            to_csv_response(&rows, &format!("metrics-{}.csv", scope))
        },
        "historical" => {
            let period: Period =
                query.period.as_deref().unwrap_or(DEFAULT_PERIOD).parse()?;
            let data = engine.historical_data(period, dao_id).await?;
            to_csv_response(
                &data,
                &format!("historical-{}-{}.csv", period, scope),
            )
        },
        "benchmarks" => {
            let bench = engine.performance_benchmarks().await?;
            let rows = benchmark_rows(&bench);
            to_csv_response(&rows, "benchmarks.csv")
        },
        other => Err(Error::InvalidOption {
            option: format!(
                "export type '{}'. Valid options: metrics, historical, benchmarks",
                other
            ),
        }),
    }
}

/// Flat projection of a snapshot for CSV; the per-DAO ranking list has its
/// own shape and is left out of the single-row export.
#[derive(Debug, Serialize)]
struct MetricsCsvRow {
    total_daos: i64,
    total_proposals: i64,
    total_votes: i64,
    total_users: i64,
    total_tasks: i64,
    total_transaction_volume: String,
    avg_proposal_success_rate: f64,
    avg_user_engagement: f64,
}

impl From<&AnalyticsMetrics> for MetricsCsvRow {
    fn from(m: &AnalyticsMetrics) -> Self {
        Self {
            total_daos: m.total_daos,
            total_proposals: m.total_proposals,
            total_votes: m.total_votes,
            total_users: m.total_users,
            total_tasks: m.total_tasks,
            total_transaction_volume: m
                .total_transaction_volume
                .to_string(),
            avg_proposal_success_rate: m.avg_proposal_success_rate,
            avg_user_engagement: m.avg_user_engagement,
        }
    }
}

#[derive(Debug, Serialize)]
struct BenchmarkCsvRow {
    segment: String,
    governance_participation: f64,
    proposal_success_rate: f64,
    treasury_metric: String,
}

fn benchmark_rows(b: &PerformanceBenchmarks) -> Vec<BenchmarkCsvRow> {
    let platform_row = |segment: &str, m: &AnalyticsMetrics| {
        BenchmarkCsvRow {
            segment: segment.to_string(),
            governance_participation: m.avg_user_engagement,
            proposal_success_rate: m.avg_proposal_success_rate,
            treasury_metric: m.total_transaction_volume.to_string(),
        }
    };

    vec![
        BenchmarkCsvRow {
            segment: "Industry".to_string(),
            governance_participation: b
                .industry
                .avg_governance_participation,
            proposal_success_rate: b
                .industry
                .avg_proposal_success_rate,
            treasury_metric: b.industry.avg_treasury_growth.to_string(),
        },
        platform_row("Platform Top", &b.platform.top_quartile),
        platform_row("Platform Median", &b.platform.median),
        platform_row("Platform Bottom", &b.platform.bottom_quartile),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{IndustryBenchmarks, PlatformQuartiles};
    use bigdecimal::BigDecimal;

    fn metrics() -> AnalyticsMetrics {
        AnalyticsMetrics {
            total_daos: 2,
            total_proposals: 10,
            total_votes: 40,
            total_users: 25,
            total_tasks: 6,
            total_transaction_volume: BigDecimal::from(1500),
            avg_proposal_success_rate: 60.0,
            avg_user_engagement: 32.0,
            top_performing_daos: vec![],
        }
    }

    #[test]
    fn metrics_row_drops_the_ranking_list_only() {
        let row = MetricsCsvRow::from(&metrics());
        assert_eq!(row.total_daos, 2);
        assert_eq!(row.total_transaction_volume, "1500");
        assert_eq!(row.avg_proposal_success_rate, 60.0);
    }

    #[test]
    fn benchmark_export_has_four_segments() {
        let bench = PerformanceBenchmarks {
            industry: IndustryBenchmarks {
                avg_governance_participation: 65.0,
                avg_proposal_success_rate: 72.0,
                avg_treasury_growth: 15.0,
            },
            platform: PlatformQuartiles {
                top_quartile: metrics(),
                median: metrics(),
                bottom_quartile: metrics(),
            },
        };

        let rows = benchmark_rows(&bench);
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].segment, "Industry");
        assert_eq!(rows[0].governance_participation, 65.0);
        assert_eq!(rows[1].segment, "Platform Top");
        assert_eq!(rows[1].governance_participation, 32.0);
    }
}
