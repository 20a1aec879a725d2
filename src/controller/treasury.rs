//! Treasury API endpoints. Balance and metrics are dashboard reads and
//! degrade on storage failure instead of erroring.

use actix_web::{get, web, Responder};
use serde::Deserialize;

use crate::{
    aggregator::treasury::{degrade_balance, degrade_metrics},
    aggregator::TreasuryAggregator,
    configuration::{AppState, State},
    error::Error,
};

const DEFAULT_TRANSACTION_PAGE_LIMIT: i64 = 20;

#[derive(Debug, Deserialize)]
pub struct DaoQuery {
    #[serde(rename = "daoId")]
    dao_id: String,
}

#[get("/treasury/balance")]
pub async fn balance(
    state: web::Data<AppState<State>>,
    query: web::Query<DaoQuery>,
) -> Result<impl Responder, Error> {
    let aggregator = TreasuryAggregator::new(&state);
    let reading = degrade_balance(
        aggregator.balance(&query.dao_id).await,
        &query.dao_id,
        &state.config.native_currency,
    );

    Ok(web::Json(reading))
}

#[derive(Debug, Deserialize)]
pub struct TransactionsQuery {
    #[serde(rename = "daoId")]
    dao_id: String,
    limit: Option<i64>,
}

#[get("/treasury/transactions")]
pub async fn transactions(
    state: web::Data<AppState<State>>,
    query: web::Query<TransactionsQuery>,
) -> Result<impl Responder, Error> {
    let aggregator = TreasuryAggregator::new(&state);
    let page = aggregator
        .transactions(
            &query.dao_id,
            query.limit.unwrap_or(DEFAULT_TRANSACTION_PAGE_LIMIT),
        )
        .await?;

    Ok(web::Json(page))
}

#[get("/treasury/metrics")]
pub async fn metrics(
    state: web::Data<AppState<State>>,
    query: web::Query<DaoQuery>,
) -> Result<impl Responder, Error> {
    let aggregator = TreasuryAggregator::new(&state);
    let reading =
        degrade_metrics(aggregator.metrics(&query.dao_id).await, &query.dao_id);

    Ok(web::Json(reading))
}
