//! Database entity structs, organized by domain sections.

use std::{fmt, str::FromStr};

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::Error;

// =============================================================================
// ACTIVITY DOMAIN
// =============================================================================

/// One append-only activity log record. The sole signal for whether a
/// member counts as active within an engagement window.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEvent {
    #[serde(default)]
    pub id: i64,
    pub user_id: String,
    pub dao_id: String,
    pub activity_type: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityType {
    Contribution,
    Vote,
    Proposal,
    Other,
}

impl FromStr for ActivityType {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "contribution" => Ok(ActivityType::Contribution),
            "vote" => Ok(ActivityType::Vote),
            "proposal" => Ok(ActivityType::Proposal),
            "other" => Ok(ActivityType::Other),
            _ => Err(Error::InvalidOption {
                option: format!(
                    "activity type '{}'. Valid options: contribution, vote, proposal, other",
                    value
                ),
            }),
        }
    }
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            ActivityType::Contribution => "contribution",
            ActivityType::Vote => "vote",
            ActivityType::Proposal => "proposal",
            ActivityType::Other => "other",
        };
        write!(f, "{}", value)
    }
}

// =============================================================================
// GOVERNANCE DOMAIN
// =============================================================================

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Proposal {
    pub id: String,
    pub dao_id: String,
    pub proposer_id: String,
    pub title: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProposalStatus {
    Pending,
    Active,
    Executed,
    Rejected,
    Expired,
}

impl FromStr for ProposalStatus {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(ProposalStatus::Pending),
            "active" => Ok(ProposalStatus::Active),
            "executed" => Ok(ProposalStatus::Executed),
            "rejected" => Ok(ProposalStatus::Rejected),
            "expired" => Ok(ProposalStatus::Expired),
            _ => Err(Error::InvalidOption {
                option: format!(
                    "proposal status '{}'. Valid options: pending, active, executed, rejected, expired",
                    value
                ),
            }),
        }
    }
}

impl fmt::Display for ProposalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            ProposalStatus::Pending => "pending",
            ProposalStatus::Active => "active",
            ProposalStatus::Executed => "executed",
            ProposalStatus::Rejected => "rejected",
            ProposalStatus::Expired => "expired",
        };
        write!(f, "{}", value)
    }
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vote {
    pub id: String,
    pub proposal_id: String,
    pub dao_id: String,
    pub user_id: String,
    pub vote_type: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteType {
    For,
    Against,
    Abstain,
}

impl FromStr for VoteType {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "for" => Ok(VoteType::For),
            "against" => Ok(VoteType::Against),
            "abstain" => Ok(VoteType::Abstain),
            _ => Err(Error::InvalidOption {
                option: format!(
                    "vote type '{}'. Valid options: for, against, abstain",
                    value
                ),
            }),
        }
    }
}

impl fmt::Display for VoteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            VoteType::For => "for",
            VoteType::Against => "against",
            VoteType::Abstain => "abstain",
        };
        write!(f, "{}", value)
    }
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteDelegation {
    pub id: i64,
    pub delegator_id: String,
    pub delegate_id: String,
    pub dao_id: String,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// TREASURY DOMAIN
// =============================================================================

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vault {
    pub id: String,
    pub dao_id: String,
    pub currency: String,
    pub balance: BigDecimal,
    pub updated_at: DateTime<Utc>,
}

/// Treasury ledger row. `tx_type` tags each record as inflow
/// (deposit, contribution) or outflow (withdrawal, disbursement).
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    pub id: String,
    pub dao_id: String,
    pub tx_type: String,
    pub amount: BigDecimal,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// COMMUNITY DOMAIN
// =============================================================================

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Membership {
    pub id: i64,
    pub user_id: String,
    pub dao_id: String,
    pub status: String,
    pub joined_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dao {
    pub id: String,
    pub name: String,
    pub creator_id: String,
    pub member_count: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BountyTask {
    pub id: String,
    pub dao_id: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn activity_type_round_trips() {
        for raw in ["contribution", "vote", "proposal", "other"] {
            let parsed: ActivityType = raw.parse().unwrap();
            assert_eq!(parsed.to_string(), raw);
        }
        assert!("swim".parse::<ActivityType>().is_err());
    }

    #[test]
    fn proposal_status_rejects_unknown() {
        assert!("executed".parse::<ProposalStatus>().is_ok());
        assert!("done".parse::<ProposalStatus>().is_err());
    }

    #[test]
    fn vote_type_round_trips() {
        for raw in ["for", "against", "abstain"] {
            let parsed: VoteType = raw.parse().unwrap();
            assert_eq!(parsed.to_string(), raw);
        }
    }
}
