//! Deferred-acceptance driver.
//!
//! # Algorithm
//!
//! 1. Start with every roster empty and no member holding an offer
//! 2. Each round, every committee in creation order that still has open
//!    spots proposes to its best candidate that has neither rejected it nor
//!    is already held by it
//! 3. A member accepts its first offer, and afterwards trades up whenever a
//!    committee it lists earlier makes an offer; the committee it leaves
//!    loses the roster spot and can never approach it again
//! 4. Stop when every committee is full, every member is held, or a whole
//!    round makes no proposal
//!
//! Each proposal permanently moves one committee past one candidate, so the
//! number of proposals is bounded by the total size of the score tables.
//!
//! # Reference
//!
//! Gale, D. & Shapley, L. S. (1962). "College Admissions and the Stability
//! of Marriage", *American Mathematical Monthly* 69(1), 9-15.

use tracing::info;

use super::config::MatchConfig;
use super::state::{MatchEvent, MatchState, Termination};
use crate::error::MatchError;
use crate::instance::{CommitteeId, Instance, MemberId};

/// Result of a completed run.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MatchResult {
    /// Why the run stopped.
    pub termination: Termination,
    /// Rounds played.
    pub rounds: usize,
    /// Proposals made, accepted or not.
    pub proposals: usize,
    /// Held committee per member, indexed by [`MemberId`].
    pub held: Vec<Option<CommitteeId>>,
    /// Final roster per committee, indexed by [`CommitteeId`], in
    /// acceptance order.
    pub rosters: Vec<Vec<MemberId>>,
    /// Per-proposal log; empty unless [`MatchConfig::record_events`] is set.
    pub events: Vec<MatchEvent>,
}

impl MatchResult {
    pub fn roster(&self, committee: CommitteeId) -> &[MemberId] {
        &self.rosters[committee.0]
    }

    /// The committee `member` ended up on, if any.
    pub fn assignment_of(&self, member: MemberId) -> Option<CommitteeId> {
        self.held[member.0]
    }

    /// Members holding no offer, in id order.
    pub fn unmatched_members(&self) -> Vec<MemberId> {
        self.held
            .iter()
            .enumerate()
            .filter(|(_, h)| h.is_none())
            .map(|(i, _)| MemberId(i))
            .collect()
    }

    /// Committees whose roster is below capacity, in id order.
    pub fn under_capacity_committees(&self, instance: &Instance) -> Vec<CommitteeId> {
        instance
            .committee_ids()
            .filter(|&c| self.rosters[c.0].len() < instance.committee(c).capacity)
            .collect()
    }
}

impl TryFrom<MatchState<'_>> for MatchResult {
    type Error = MatchError;

    /// Snapshots a terminal state. Fails with [`MatchError::Unfinished`] if
    /// the state can still make progress.
    fn try_from(state: MatchState<'_>) -> Result<Self, Self::Error> {
        let (held, rosters, events, rounds, proposals, termination) = state.into_parts();
        let termination = termination.ok_or(MatchError::Unfinished { rounds })?;
        Ok(Self {
            termination,
            rounds,
            proposals,
            held,
            rosters,
            events,
        })
    }
}

/// Runs the deferred-acceptance loop to a terminal state.
pub struct MatchRunner;

impl MatchRunner {
    /// Matches members to committees.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_matching::deferred::{MatchConfig, MatchRunner, Termination};
    /// use u_matching::instance::{InstanceBuilder, Rank};
    ///
    /// let mut b = InstanceBuilder::new();
    /// let social = b.add_committee("Social", 1).unwrap();
    /// let ana = b.add_member("ana").unwrap();
    /// b.prefer(ana, social).unwrap();
    /// b.score(social, ana, Rank::Ranked(1)).unwrap();
    /// let instance = b.build();
    ///
    /// let result = MatchRunner::run(&instance, &MatchConfig::default()).unwrap();
    /// assert_eq!(result.termination, Termination::AllSatisfied);
    /// assert_eq!(result.roster(social), &[ana]);
    /// ```
    pub fn run(instance: &Instance, config: &MatchConfig) -> Result<MatchResult, MatchError> {
        let mut state = MatchState::new(instance, *config);
        while state.termination().is_none() {
            state.step_round()?;
        }

        let result = MatchResult::try_from(state)?;
        info!(
            termination = %result.termination,
            rounds = result.rounds,
            proposals = result.proposals,
            unmatched = result.unmatched_members().len(),
            "matching finished"
        );
        Ok(result)
    }
}
