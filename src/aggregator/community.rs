//! Community aggregation: member counts, per-member stats and DAO-wide
//! engagement and retention over consecutive activity windows.

use std::collections::HashSet;

use chrono::Utc;
use tracing::warn;

use crate::{
    configuration::State,
    error::Error,
    helpers::{engagement_windows, ratio},
    model::{EngagementMetrics, MemberStats, Reading},
};

/// Share of members with any activity in the current window.
pub fn active_rate(active_members: i64, total_members: i64) -> f64 {
    ratio(active_members, total_members)
}

/// Share of the prior window's active users who stayed active in the
/// current window. When the prior window is empty there is nothing to
/// retain, so the configured default is reported instead of 0 or 1.
pub fn retention_rate(
    current: &HashSet<String>,
    prior: &HashSet<String>,
    default_rate: f64,
) -> f64 {
    if prior.is_empty() {
        return default_rate;
    }
    let retained = prior.intersection(current).count();
    retained as f64 / prior.len() as f64
}

/// Engagement is currently a direct proxy for the active rate. Kept as a
/// named policy so a richer formula lands in exactly one place.
pub fn engagement_score_policy(active_rate: f64) -> f64 {
    active_rate
}

pub struct CommunityAggregator<'a> {
    state: &'a State,
}

impl<'a> CommunityAggregator<'a> {
    pub fn new(state: &'a State) -> Self {
        Self { state }
    }

    pub async fn member_count(&self, dao_id: &str) -> Result<i64, Error> {
        self.state.database.membership.count_approved(dao_id).await
    }

    /// Fail-fast lookup: a member with zero activity is a valid result,
    /// but a user with no membership row at all is not a member.
    pub async fn member_stats(
        &self,
        user_id: &str,
        dao_id: &str,
    ) -> Result<MemberStats, Error> {
        let db = &self.state.database;

        let membership = db.membership.get(user_id, dao_id).await?.ok_or(
            Error::MembershipNotFound {
                user_id: user_id.to_owned(),
                dao_id: dao_id.to_owned(),
            },
        )?;

        let (contribution_score, proposals_submitted, votes_participated) =
            tokio::try_join!(
                db.activity.count_contributions(user_id, dao_id),
                db.proposal.count_by_proposer(user_id, dao_id),
                db.vote.count_by_user(user_id, dao_id),
            )?;

        Ok(MemberStats {
            user_id: user_id.to_owned(),
            dao_id: dao_id.to_owned(),
            contribution_score,
            proposals_submitted,
            votes_participated,
            joined_at: membership.joined_at,
        })
    }

    pub async fn engagement(
        &self,
        dao_id: &str,
    ) -> Result<EngagementMetrics, Error> {
        let config = &self.state.config;
        let db = &self.state.database;
        let now = Utc::now();
        let (current_start, prior_start) =
            engagement_windows(now, config.engagement_window_days);

        let (total_members, current_users, prior_users) = tokio::try_join!(
            db.membership.count_approved(dao_id),
            db.activity.distinct_active_users(dao_id, current_start, now),
            db.activity
                .distinct_active_users(dao_id, prior_start, current_start),
        )?;

        let current: HashSet<String> = current_users.into_iter().collect();
        let prior: HashSet<String> = prior_users.into_iter().collect();

        let active_rate = active_rate(current.len() as i64, total_members);
        let retention_rate =
            retention_rate(&current, &prior, config.retention_default);

        Ok(EngagementMetrics {
            engagement_score: engagement_score_policy(active_rate),
            active_rate,
            retention_rate,
        })
    }
}

/// Degrade policy for the engagement dashboard read: zero rates, flagged
/// as degraded so they cannot be mistaken for a silent community.
pub fn degrade_engagement(
    result: Result<EngagementMetrics, Error>,
    dao_id: &str,
) -> Reading<EngagementMetrics> {
    match result {
        Ok(metrics) => Reading::fresh(metrics),
        Err(e) => {
            warn!("engagement metrics degraded for dao {}: {}", dao_id, e);
            Reading::fallback(EngagementMetrics {
                engagement_score: 0.0,
                active_rate: 0.0,
                retention_rate: 0.0,
            })
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(ids: &[&str]) -> HashSet<String> {
        ids.iter().map(|id| id.to_string()).collect()
    }

    #[test]
    fn ten_member_scenario() {
        // 10 members, 3 active now, 2 of the 3 also active in the prior
        // window.
        let current = set(&["a", "b", "c"]);
        let prior = set(&["a", "b", "f"]);

        let active = active_rate(current.len() as i64, 10);
        assert!((active - 0.3).abs() < f64::EPSILON);

        let retention = retention_rate(&current, &prior, 0.85);
        assert!((retention - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn retention_defaults_iff_prior_window_is_empty() {
        let current = set(&["a"]);

        let empty_prior = retention_rate(&current, &HashSet::new(), 0.85);
        assert!((empty_prior - 0.85).abs() < f64::EPSILON);

        // A non-empty prior window with no overlap is a real zero, not the
        // default.
        let prior = set(&["z"]);
        let no_overlap = retention_rate(&current, &prior, 0.85);
        assert_eq!(no_overlap, 0.0);
    }

    #[test]
    fn retention_is_bounded() {
        let current = set(&["a", "b", "c"]);
        let prior = set(&["a", "b", "c"]);
        assert_eq!(retention_rate(&current, &prior, 0.85), 1.0);
    }

    #[test]
    fn active_rate_of_empty_dao_is_zero() {
        assert_eq!(active_rate(0, 0), 0.0);
    }

    #[test]
    fn engagement_score_tracks_active_rate() {
        assert_eq!(engagement_score_policy(0.3), 0.3);
        assert_eq!(engagement_score_policy(0.0), 0.0);
    }

    #[test]
    fn degraded_engagement_is_flagged() {
        let reading = degrade_engagement(
            Err(Error::TaskError("pool down".to_string())),
            "dao-1",
        );
        assert!(reading.degraded);
        assert_eq!(reading.value.active_rate, 0.0);

        let healthy = degrade_engagement(
            Ok(EngagementMetrics {
                engagement_score: 0.3,
                active_rate: 0.3,
                retention_rate: 0.9,
            }),
            "dao-1",
        );
        assert!(!healthy.degraded);
    }
}
