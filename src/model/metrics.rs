//! Derived metric value objects.
//!
//! None of these are persisted. Snapshots are recomputed whole on every
//! refresh; a snapshot is never partially updated.

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::models::Proposal;

/// A metric reading that may have been substituted by its documented
/// fallback after a storage failure. `degraded` lets dashboards render an
/// inline "metric unavailable" indicator instead of a zero that is
/// indistinguishable from a real zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reading<T> {
    #[serde(flatten)]
    pub value: T,
    pub degraded: bool,
}

impl<T> Reading<T> {
    pub fn fresh(value: T) -> Self {
        Reading {
            value,
            degraded: false,
        }
    }

    pub fn fallback(value: T) -> Self {
        Reading {
            value,
            degraded: true,
        }
    }
}

// =============================================================================
// TREASURY
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreasuryBalance {
    pub balance: BigDecimal,
    pub currency: String,
    pub vault_count: i64,
    pub last_updated: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionPage {
    pub transactions: Vec<super::models::TransactionRecord>,
    pub total: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreasuryMetrics {
    pub current_balance: BigDecimal,
    pub total_inflow: BigDecimal,
    pub total_outflow: BigDecimal,
    pub net_change: BigDecimal,
    pub burn_rate: BigDecimal,
    /// Months of balance left at the current burn rate. When the burn rate
    /// is zero this carries the unbounded-runway sentinel, never a division
    /// artifact.
    pub runway: BigDecimal,
}

// =============================================================================
// GOVERNANCE
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalPage {
    pub proposals: Vec<Proposal>,
    pub total: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalTally {
    pub votes_for: i64,
    pub votes_against: i64,
    pub votes_abstain: i64,
    pub total_votes: i64,
}

impl ProposalTally {
    /// Folds `(vote_type, count)` rows into a tally. Unknown vote types are
    /// counted into the total so the conservation property
    /// `for + against + abstain == total` only holds for well-formed data;
    /// rows written by the voting subsystem are always one of the three.
    pub fn from_rows(rows: &[(String, i64)]) -> Self {
        let mut tally = ProposalTally::default();
        for (vote_type, count) in rows {
            match vote_type.as_str() {
                "for" => tally.votes_for += count,
                "against" => tally.votes_against += count,
                "abstain" => tally.votes_abstain += count,
                _ => {},
            }
            tally.total_votes += count;
        }
        tally
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalDetail {
    #[serde(flatten)]
    pub proposal: Proposal,
    #[serde(flatten)]
    pub tally: ProposalTally,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VotingPower {
    /// Earned power: contribution count times the configured weight.
    pub power: i64,
    /// Net delegated power: incoming minus outgoing delegations.
    pub delegated: i64,
    pub total: i64,
}

// =============================================================================
// COMMUNITY
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberStats {
    pub user_id: String,
    pub dao_id: String,
    pub contribution_score: i64,
    pub proposals_submitted: i64,
    pub votes_participated: i64,
    pub joined_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngagementMetrics {
    pub engagement_score: f64,
    pub active_rate: f64,
    pub retention_rate: f64,
}

// =============================================================================
// ANALYTICS
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DaoPerformance {
    pub id: String,
    pub name: String,
    pub member_count: i64,
    pub proposal_count: i64,
    pub success_rate: f64,
    pub treasury_value: BigDecimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsMetrics {
    pub total_daos: i64,
    pub total_proposals: i64,
    pub total_votes: i64,
    pub total_users: i64,
    pub total_tasks: i64,
    pub total_transaction_volume: BigDecimal,
    pub avg_proposal_success_rate: f64,
    pub avg_user_engagement: f64,
    pub top_performing_daos: Vec<DaoPerformance>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalPoint {
    pub timestamp: DateTime<Utc>,
    /// Cumulative: DAOs created on or before this point.
    pub dao_count: i64,
    /// Cumulative: users created on or before this point.
    pub user_count: i64,
    /// Per-bucket delta: proposals created within this bucket only.
    pub proposal_count: i64,
    /// Per-bucket delta: transaction volume within this bucket only.
    pub transaction_volume: BigDecimal,
    pub avg_success_rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndustryBenchmarks {
    pub avg_governance_participation: f64,
    pub avg_proposal_success_rate: f64,
    pub avg_treasury_growth: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformQuartiles {
    pub top_quartile: AnalyticsMetrics,
    pub median: AnalyticsMetrics,
    pub bottom_quartile: AnalyticsMetrics,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceBenchmarks {
    pub industry: IndustryBenchmarks,
    pub platform: PlatformQuartiles,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tally_conserves_votes() {
        let rows = vec![
            ("for".to_string(), 5),
            ("against".to_string(), 2),
            ("abstain".to_string(), 1),
        ];
        let tally = ProposalTally::from_rows(&rows);
        assert_eq!(tally.votes_for, 5);
        assert_eq!(tally.votes_against, 2);
        assert_eq!(tally.votes_abstain, 1);
        assert_eq!(tally.total_votes, 8);
        assert_eq!(
            tally.votes_for + tally.votes_against + tally.votes_abstain,
            tally.total_votes
        );
    }

    #[test]
    fn tally_of_no_votes_is_zero() {
        let tally = ProposalTally::from_rows(&[]);
        assert_eq!(tally, ProposalTally::default());
    }

    #[test]
    fn degraded_flag_serializes_alongside_flattened_value() {
        let reading = Reading::fallback(EngagementMetrics {
            engagement_score: 0.0,
            active_rate: 0.0,
            retention_rate: 0.0,
        });
        let json = serde_json::to_value(&reading).unwrap();
        assert_eq!(json["degraded"], serde_json::json!(true));
        assert!(json.get("activeRate").is_some());
    }
}
