//! Governance aggregation: proposal listings, vote tallies and voting
//! power derived from contribution history and the delegation graph.

use crate::{
    configuration::State,
    error::Error,
    model::{
        ProposalDetail, ProposalPage, ProposalStatus, ProposalTally,
        VotingPower,
    },
};

/// Earned voting power granted per recorded contribution. Policy constant,
/// kept at parity with delegation units so one delegation moves exactly
/// one unit of power.
pub const VOTE_WEIGHT_PER_CONTRIBUTION: i64 = 1;

pub const DEFAULT_PROPOSAL_PAGE_LIMIT: i64 = 50;

/// `power` from contributions, `delegated` as the net of incoming and
/// outgoing delegation rows. Multiple simultaneous delegations from one
/// delegator sum; no single-delegate cardinality is assumed.
pub fn voting_power_from_counts(
    contributions: i64,
    incoming_delegations: i64,
    outgoing_delegations: i64,
) -> VotingPower {
    let power = contributions * VOTE_WEIGHT_PER_CONTRIBUTION;
    let delegated = incoming_delegations - outgoing_delegations;
    VotingPower {
        power,
        delegated,
        total: power + delegated,
    }
}

pub struct GovernanceAggregator<'a> {
    state: &'a State,
}

impl<'a> GovernanceAggregator<'a> {
    pub fn new(state: &'a State) -> Self {
        Self { state }
    }

    pub async fn proposals(
        &self,
        dao_id: &str,
        status: Option<ProposalStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<ProposalPage, Error> {
        let db = &self.state.database;
        let status = status.map(|s| s.to_string());
        let status = status.as_deref();

        let (proposals, total) = tokio::try_join!(
            db.proposal.list(dao_id, status, limit, offset),
            db.proposal.count(dao_id, status),
        )?;

        Ok(ProposalPage { proposals, total })
    }

    /// Fail-fast lookup: a missing proposal id is a caller bug or stale
    /// reference, never a metrics gap, so it surfaces as a typed error.
    pub async fn proposal_by_id(
        &self,
        proposal_id: &str,
    ) -> Result<ProposalDetail, Error> {
        let db = &self.state.database;

        let proposal = db
            .proposal
            .get_by_id(proposal_id)
            .await?
            .ok_or_else(|| Error::ProposalNotFound(proposal_id.to_owned()))?;

        let rows = db.vote.tally_rows(proposal_id).await?;
        let tally = ProposalTally::from_rows(&rows);

        Ok(ProposalDetail { proposal, tally })
    }

    pub async fn voting_power(
        &self,
        user_id: &str,
        dao_id: &str,
    ) -> Result<VotingPower, Error> {
        let db = &self.state.database;

        let (contributions, incoming, outgoing) = tokio::try_join!(
            db.activity.count_contributions(user_id, dao_id),
            db.delegation.count_incoming(user_id, dao_id),
            db.delegation.count_outgoing(user_id, dao_id),
        )?;

        Ok(voting_power_from_counts(contributions, incoming, outgoing))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_activity_user_has_all_zeros() {
        let power = voting_power_from_counts(0, 0, 0);
        assert_eq!(
            power,
            VotingPower {
                power: 0,
                delegated: 0,
                total: 0
            }
        );
    }

    #[test]
    fn one_incoming_delegation_moves_total_by_exactly_one() {
        let before = voting_power_from_counts(4, 2, 1);
        let with_extra = voting_power_from_counts(4, 3, 1);
        assert_eq!(with_extra.total, before.total + 1);

        let restored = voting_power_from_counts(4, 2, 1);
        assert_eq!(restored, before);
    }

    #[test]
    fn outgoing_delegations_subtract() {
        let power = voting_power_from_counts(5, 0, 2);
        assert_eq!(power.power, 5);
        assert_eq!(power.delegated, -2);
        assert_eq!(power.total, 3);
    }

    #[test]
    fn multiple_delegations_from_one_delegator_sum() {
        // Cardinality is not enforced upstream; three incoming rows are
        // three units of delegated power regardless of their delegators.
        let power = voting_power_from_counts(0, 3, 0);
        assert_eq!(power.delegated, 3);
        assert_eq!(power.total, 3);
    }
}
