//! Governance API endpoints. Lookups by id fail fast with 404; there is
//! no degrade path here.

use actix_web::{get, web, Responder};
use serde::Deserialize;

use crate::{
    aggregator::governance::DEFAULT_PROPOSAL_PAGE_LIMIT,
    aggregator::GovernanceAggregator,
    configuration::{AppState, State},
    error::Error,
    model::ProposalStatus,
};

#[derive(Debug, Deserialize)]
pub struct ProposalsQuery {
    #[serde(rename = "daoId")]
    dao_id: String,
    status: Option<String>,
    limit: Option<i64>,
    offset: Option<i64>,
}

#[get("/governance/proposals")]
pub async fn proposals(
    state: web::Data<AppState<State>>,
    query: web::Query<ProposalsQuery>,
) -> Result<impl Responder, Error> {
    let status: Option<ProposalStatus> = match query.status.as_deref() {
        Some(raw) => Some(raw.parse()?),
        None => None,
    };

    let aggregator = GovernanceAggregator::new(&state);
    let page = aggregator
        .proposals(
            &query.dao_id,
            status,
            query.limit.unwrap_or(DEFAULT_PROPOSAL_PAGE_LIMIT),
            query.offset.unwrap_or(0),
        )
        .await?;

    Ok(web::Json(page))
}

#[get("/governance/proposals/{proposal_id}")]
pub async fn proposal_by_id(
    state: web::Data<AppState<State>>,
    path: web::Path<String>,
) -> Result<impl Responder, Error> {
    let proposal_id = path.into_inner();
    let aggregator = GovernanceAggregator::new(&state);
    let detail = aggregator.proposal_by_id(&proposal_id).await?;

    Ok(web::Json(detail))
}

#[derive(Debug, Deserialize)]
pub struct VotingPowerQuery {
    #[serde(rename = "userId")]
    user_id: String,
    #[serde(rename = "daoId")]
    dao_id: String,
}

#[get("/governance/voting-power")]
pub async fn voting_power(
    state: web::Data<AppState<State>>,
    query: web::Query<VotingPowerQuery>,
) -> Result<impl Responder, Error> {
    let aggregator = GovernanceAggregator::new(&state);
    let power = aggregator
        .voting_power(&query.user_id, &query.dao_id)
        .await?;

    Ok(web::Json(power))
}
