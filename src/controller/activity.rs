//! Activity ingestion and the recent-activity feed.

use actix_web::{get, post, web, Responder};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::{
    aggregator::AnalyticsEngine,
    configuration::{AppState, State},
    error::Error,
    model::{ActivityEvent, ActivityType},
};

const DEFAULT_RECENT_LIMIT: usize = 20;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackActivityRequest {
    pub user_id: String,
    pub dao_id: String,
    pub activity_type: String,
    pub created_at: Option<DateTime<Utc>>,
}

#[post("/activity")]
pub async fn track(
    state: web::Data<AppState<State>>,
    request: web::Json<TrackActivityRequest>,
) -> Result<impl Responder, Error> {
    let request = request.into_inner();
    let activity_type: ActivityType = request.activity_type.parse()?;

    let event = ActivityEvent {
        id: 0,
        user_id: request.user_id,
        dao_id: request.dao_id,
        activity_type: activity_type.to_string(),
        created_at: request.created_at.unwrap_or_else(Utc::now),
    };

    let engine = AnalyticsEngine::new(&state);
    engine.track_activity(event.clone()).await;

    Ok(web::Json(event))
}

#[derive(Debug, Deserialize)]
pub struct RecentActivityQuery {
    #[serde(rename = "userId")]
    user_id: String,
    limit: Option<usize>,
}

#[get("/activity/recent")]
pub async fn recent(
    state: web::Data<AppState<State>>,
    query: web::Query<RecentActivityQuery>,
) -> Result<impl Responder, Error> {
    let engine = AnalyticsEngine::new(&state);
    let events = engine.recent_activity(
        &query.user_id,
        query.limit.unwrap_or(DEFAULT_RECENT_LIMIT),
    );

    Ok(web::Json(events))
}
