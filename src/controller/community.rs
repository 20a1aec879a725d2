//! Community API endpoints. Engagement is a dashboard read and degrades
//! on storage failure; member stats fail fast for non-members.

use actix_web::{get, web, Responder};
use serde::{Deserialize, Serialize};

use crate::{
    aggregator::community::degrade_engagement,
    aggregator::CommunityAggregator,
    cache::cached_fetch,
    configuration::{AppState, State},
    error::Error,
    helpers::engagement_cache_key,
};

#[derive(Debug, Deserialize)]
pub struct DaoQuery {
    #[serde(rename = "daoId")]
    dao_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberCountResponse {
    pub member_count: i64,
}

#[get("/community/member-count")]
pub async fn member_count(
    state: web::Data<AppState<State>>,
    query: web::Query<DaoQuery>,
) -> Result<impl Responder, Error> {
    let aggregator = CommunityAggregator::new(&state);
    let member_count = aggregator.member_count(&query.dao_id).await?;

    Ok(web::Json(MemberCountResponse { member_count }))
}

#[derive(Debug, Deserialize)]
pub struct MemberStatsQuery {
    #[serde(rename = "userId")]
    user_id: String,
    #[serde(rename = "daoId")]
    dao_id: String,
}

#[get("/community/member-stats")]
pub async fn member_stats(
    state: web::Data<AppState<State>>,
    query: web::Query<MemberStatsQuery>,
) -> Result<impl Responder, Error> {
    let aggregator = CommunityAggregator::new(&state);
    let stats = aggregator
        .member_stats(&query.user_id, &query.dao_id)
        .await?;

    Ok(web::Json(stats))
}

#[get("/community/engagement")]
pub async fn engagement(
    state: web::Data<AppState<State>>,
    query: web::Query<DaoQuery>,
) -> Result<impl Responder, Error> {
    let cache_key = engagement_cache_key(&query.dao_id);

    let result =
        cached_fetch(&state.api_cache.engagement, &cache_key, || async {
            CommunityAggregator::new(&state)
                .engagement(&query.dao_id)
                .await
        })
        .await;

    Ok(web::Json(degrade_engagement(result, &query.dao_id)))
}
