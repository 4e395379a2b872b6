//! Mutable match state and the proposal protocol.

use std::collections::BTreeSet;
use std::fmt;

use tracing::{debug, trace};

use super::config::MatchConfig;
use crate::error::MatchError;
use crate::instance::{CommitteeId, Instance, MemberId};

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Termination {
    /// Every committee filled its capacity.
    AllSatisfied,
    /// Every member holds an offer.
    AllSettled,
    /// A full round changed nothing while committees still had open spots
    /// and members were still unmatched.
    Stalled,
}

impl Termination {
    /// `false` only for [`Termination::Stalled`].
    pub fn is_complete(self) -> bool {
        !matches!(self, Termination::Stalled)
    }
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Termination::AllSatisfied => "all committees satisfied",
            Termination::AllSettled => "all members settled",
            Termination::Stalled => "stalled",
        })
    }
}

/// What a member did with an offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OfferOutcome {
    /// Accepted while holding nothing.
    Accepted,
    /// Accepted, dropping the previously held committee.
    Displaced { previous: CommitteeId },
    /// Turned down.
    Rejected,
}

impl OfferOutcome {
    pub fn is_accepted(self) -> bool {
        !matches!(self, OfferOutcome::Rejected)
    }
}

/// One proposal, recorded when
/// [`MatchConfig::record_events`] is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MatchEvent {
    /// 1-based round in which the proposal was made.
    pub round: usize,
    pub committee: CommitteeId,
    pub member: MemberId,
    pub outcome: OfferOutcome,
}

/// All mutable state of a run over one [`Instance`].
///
/// Holds both sides of the member/committee relation (`held_offer` on the
/// member side, `roster` on the committee side) and updates them together
/// inside a single proposal step.
///
/// Rounds can be driven one at a time with [`step_round`](Self::step_round),
/// or to completion with [`MatchRunner`](super::MatchRunner).
#[derive(Debug, Clone)]
pub struct MatchState<'a> {
    instance: &'a Instance,
    config: MatchConfig,
    held: Vec<Option<CommitteeId>>,
    rejected: Vec<BTreeSet<CommitteeId>>,
    rosters: Vec<Vec<MemberId>>,
    // Next candidate index to examine, per committee.
    cursors: Vec<usize>,
    rounds: usize,
    proposals: usize,
    events: Vec<MatchEvent>,
    termination: Option<Termination>,
}

impl<'a> MatchState<'a> {
    /// Creates the initial state: nobody holds an offer, every roster is
    /// empty.
    pub fn new(instance: &'a Instance, config: MatchConfig) -> Self {
        Self {
            instance,
            config,
            held: vec![None; instance.member_count()],
            rejected: vec![BTreeSet::new(); instance.member_count()],
            rosters: instance
                .committees()
                .iter()
                .map(|c| Vec::with_capacity(c.capacity))
                .collect(),
            cursors: vec![0; instance.committee_count()],
            rounds: 0,
            proposals: 0,
            events: Vec::new(),
            termination: None,
        }
    }

    pub fn instance(&self) -> &'a Instance {
        self.instance
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// The committee currently holding `member`, if any.
    pub fn held_offer(&self, member: MemberId) -> Option<CommitteeId> {
        self.held[member.0]
    }

    /// Members provisionally accepted by `committee`, in acceptance order.
    pub fn roster(&self, committee: CommitteeId) -> &[MemberId] {
        &self.rosters[committee.0]
    }

    /// Whether `member` has turned down, or dropped, `committee`.
    pub fn is_rejected(&self, member: MemberId, committee: CommitteeId) -> bool {
        self.rejected[member.0].contains(&committee)
    }

    /// Committees `member` has turned down or dropped.
    pub fn rejected_by(&self, member: MemberId) -> impl Iterator<Item = CommitteeId> + '_ {
        self.rejected[member.0].iter().copied()
    }

    pub fn is_satisfied(&self, committee: CommitteeId) -> bool {
        self.rosters[committee.0].len() == self.instance.committee(committee).capacity
    }

    pub fn all_satisfied(&self) -> bool {
        self.instance.committee_ids().all(|c| self.is_satisfied(c))
    }

    pub fn all_settled(&self) -> bool {
        self.held.iter().all(Option::is_some)
    }

    /// Number of rounds played so far.
    pub fn rounds(&self) -> usize {
        self.rounds
    }

    /// Number of proposals made so far.
    pub fn proposals(&self) -> usize {
        self.proposals
    }

    pub fn events(&self) -> &[MatchEvent] {
        &self.events
    }

    /// `Some` once the run has reached a terminal state.
    pub fn termination(&self) -> Option<Termination> {
        self.termination
    }

    /// Plays one round: every committee, in creation order, gets one chance
    /// to propose.
    ///
    /// Returns whether anything changed. Once the state is terminal this is
    /// a no-op returning `Ok(false)`.
    pub fn step_round(&mut self) -> Result<bool, MatchError> {
        if self.termination.is_some() {
            return Ok(false);
        }
        if let Some(done) = self.success_condition() {
            self.termination = Some(done);
            return Ok(false);
        }

        self.rounds += 1;
        let mut changed = false;
        for committee in self.instance.committee_ids() {
            trace!(
                committee = %self.instance.committee(committee).name,
                round = self.rounds,
                "committee about to make an offer"
            );
            changed = self.propose_to_next(committee)? || changed;
        }

        if !changed {
            self.termination = Some(Termination::Stalled);
        } else if let Some(done) = self.success_condition() {
            self.termination = Some(done);
        }
        Ok(changed)
    }

    fn success_condition(&self) -> Option<Termination> {
        if self.all_satisfied() {
            Some(Termination::AllSatisfied)
        } else if self.all_settled() {
            Some(Termination::AllSettled)
        } else {
            None
        }
    }

    /// Lets `committee` propose to its best remaining candidate.
    ///
    /// Returns `true` if a proposal was made, whether or not it was
    /// accepted. Returns `false` when the committee is satisfied or has no
    /// eligible candidate left.
    pub fn propose_to_next(&mut self, committee: CommitteeId) -> Result<bool, MatchError> {
        if self.is_satisfied(committee) {
            return Ok(false);
        }
        let instance = self.instance;
        let candidates = &instance.committee(committee).ranked_members;

        // A skipped candidate has either rejected this committee or is held
        // by it; a held member that later leaves records the committee as
        // rejected. Neither condition ever clears, so the scan never needs to
        // look behind the cursor.
        let mut cursor = self.cursors[committee.0];
        while let Some(&(key, member)) = candidates.get(cursor) {
            cursor += 1;
            if self.rejected[member.0].contains(&committee)
                || self.held[member.0] == Some(committee)
            {
                continue;
            }
            self.cursors[committee.0] = cursor;

            trace!(
                committee = %instance.committee(committee).name,
                member = %instance.member(member).name,
                %key,
                "proposing"
            );
            let outcome = self.receive_offer(member, committee)?;
            if outcome.is_accepted() {
                self.rosters[committee.0].push(member);
            }
            debug_assert!(
                self.rosters[committee.0].len() <= instance.committee(committee).capacity
            );

            self.proposals += 1;
            if self.config.record_events {
                self.events.push(MatchEvent {
                    round: self.rounds,
                    committee,
                    member,
                    outcome,
                });
            }
            return Ok(true);
        }
        self.cursors[committee.0] = cursor;
        Ok(false)
    }

    /// Delivers an offer from `committee` to `member`.
    ///
    /// On acceptance the member's previously held committee, if any, is
    /// released and recorded as rejected; the caller adds the member to
    /// `committee`'s roster.
    fn receive_offer(
        &mut self,
        member: MemberId,
        committee: CommitteeId,
    ) -> Result<OfferOutcome, MatchError> {
        let instance = self.instance;
        let record = instance.member(member);
        match self.held[member.0] {
            None => {
                if self.config.accept_any_first_offer || record.ranks(committee) {
                    self.held[member.0] = Some(committee);
                    Ok(OfferOutcome::Accepted)
                } else {
                    self.rejected[member.0].insert(committee);
                    Ok(OfferOutcome::Rejected)
                }
            }
            Some(previous) => {
                if self.prefers(member, committee, previous)? {
                    debug!(
                        member = %record.name,
                        from = %instance.committee(previous).name,
                        to = %instance.committee(committee).name,
                        "member trades up"
                    );
                    self.release_member(previous, member);
                    self.rejected[member.0].insert(previous);
                    self.held[member.0] = Some(committee);
                    Ok(OfferOutcome::Displaced { previous })
                } else {
                    self.rejected[member.0].insert(committee);
                    Ok(OfferOutcome::Rejected)
                }
            }
        }
    }

    /// Whether `member` ranks `offered` above `held`: whichever of the two
    /// appears first in its preference list wins.
    fn prefers(
        &self,
        member: MemberId,
        offered: CommitteeId,
        held: CommitteeId,
    ) -> Result<bool, MatchError> {
        let record = self.instance.member(member);
        record
            .preferred_committees
            .iter()
            .find(|&&c| c == offered || c == held)
            .map(|&c| c == offered)
            .ok_or_else(|| MatchError::IncomparableOffers {
                member: record.name.clone(),
                held: self.instance.committee(held).name.clone(),
                offered: self.instance.committee(offered).name.clone(),
            })
    }

    /// Removes `member` from `committee`'s roster, keeping the order of the
    /// remaining members.
    fn release_member(&mut self, committee: CommitteeId, member: MemberId) {
        let roster = &mut self.rosters[committee.0];
        if let Some(pos) = roster.iter().position(|&m| m == member) {
            roster.remove(pos);
        }
    }

    pub(crate) fn into_parts(
        self,
    ) -> (
        Vec<Option<CommitteeId>>,
        Vec<Vec<MemberId>>,
        Vec<MatchEvent>,
        usize,
        usize,
        Option<Termination>,
    ) {
        (
            self.held,
            self.rosters,
            self.events,
            self.rounds,
            self.proposals,
            self.termination,
        )
    }
}
