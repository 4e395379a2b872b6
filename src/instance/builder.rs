//! Instance construction.

use std::collections::HashMap;

use super::table::{ScoreConflict, ScoreTable};
use super::types::{Committee, CommitteeId, CommitteeSpec, Member, MemberId, Rank, RankKey};
use crate::error::MatchError;

/// A frozen matching instance: every committee with its ordered candidates
/// and every member with its ordered preferences.
///
/// The instance is immutable; all match state lives in
/// [`MatchState`](crate::deferred::MatchState).
#[derive(Debug, Clone)]
pub struct Instance {
    committees: Vec<Committee>,
    members: Vec<Member>,
    committee_index: HashMap<String, CommitteeId>,
    member_index: HashMap<String, MemberId>,
}

impl Instance {
    pub fn committees(&self) -> &[Committee] {
        &self.committees
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    /// # Panics
    ///
    /// Panics if `id` does not belong to this instance.
    pub fn committee(&self, id: CommitteeId) -> &Committee {
        &self.committees[id.0]
    }

    /// # Panics
    ///
    /// Panics if `id` does not belong to this instance.
    pub fn member(&self, id: MemberId) -> &Member {
        &self.members[id.0]
    }

    pub fn committee_count(&self) -> usize {
        self.committees.len()
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    /// Committee ids in creation (proposal) order.
    pub fn committee_ids(&self) -> impl Iterator<Item = CommitteeId> {
        (0..self.committees.len()).map(CommitteeId)
    }

    pub fn member_ids(&self) -> impl Iterator<Item = MemberId> {
        (0..self.members.len()).map(MemberId)
    }

    pub fn committee_id(&self, name: &str) -> Option<CommitteeId> {
        self.committee_index.get(name).copied()
    }

    pub fn member_id(&self, name: &str) -> Option<MemberId> {
        self.member_index.get(name).copied()
    }

    /// Total number of score-table entries across all committees.
    ///
    /// This bounds the number of proposals any run can make.
    pub fn candidate_entries(&self) -> usize {
        self.committees.iter().map(|c| c.ranked_members.len()).sum()
    }
}

/// Incremental builder for an [`Instance`].
///
/// # Examples
///
/// ```
/// use u_matching::instance::{InstanceBuilder, Rank};
///
/// let mut builder = InstanceBuilder::new();
/// let web = builder.add_committee("Website", 1).unwrap();
/// let ana = builder.add_member("ana").unwrap();
/// builder.prefer(ana, web).unwrap();
/// builder.score(web, ana, Rank::Ranked(1)).unwrap();
///
/// let instance = builder.build();
/// assert_eq!(instance.committee_count(), 1);
/// assert_eq!(instance.committee(web).ranked_members.len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct InstanceBuilder {
    committees: Vec<(CommitteeSpec, ScoreTable)>,
    members: Vec<Member>,
    committee_index: HashMap<String, CommitteeId>,
    member_index: HashMap<String, MemberId>,
}

impl InstanceBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder pre-populated with `specs`, in order.
    pub fn with_committees(specs: &[CommitteeSpec]) -> Result<Self, MatchError> {
        let mut builder = Self::new();
        for spec in specs {
            builder.add_committee(spec.name.clone(), spec.capacity)?;
        }
        Ok(builder)
    }

    pub fn add_committee(
        &mut self,
        name: impl Into<String>,
        capacity: usize,
    ) -> Result<CommitteeId, MatchError> {
        let name = name.into();
        if self.committee_index.contains_key(&name) {
            return Err(MatchError::DuplicateCommittee(name));
        }
        let id = CommitteeId(self.committees.len());
        self.committee_index.insert(name.clone(), id);
        self.committees
            .push((CommitteeSpec { name, capacity }, ScoreTable::new()));
        Ok(id)
    }

    pub fn add_member(&mut self, name: impl Into<String>) -> Result<MemberId, MatchError> {
        let name = name.into();
        if self.member_index.contains_key(&name) {
            return Err(MatchError::DuplicateMember(name));
        }
        let id = MemberId(self.members.len());
        self.member_index.insert(name.clone(), id);
        self.members.push(Member {
            name,
            preferred_committees: Vec::new(),
        });
        Ok(id)
    }

    pub fn committee_id(&self, name: &str) -> Option<CommitteeId> {
        self.committee_index.get(name).copied()
    }

    pub fn member_id(&self, name: &str) -> Option<MemberId> {
        self.member_index.get(name).copied()
    }

    /// Committee specs registered so far, in creation order.
    pub fn committee_specs(&self) -> impl Iterator<Item = (CommitteeId, &CommitteeSpec)> {
        self.committees
            .iter()
            .enumerate()
            .map(|(i, (spec, _))| (CommitteeId(i), spec))
    }

    /// Appends `committee` to the end of `member`'s preference list.
    pub fn prefer(&mut self, member: MemberId, committee: CommitteeId) -> Result<(), MatchError> {
        self.check_committee(committee)?;
        let m = self
            .members
            .get_mut(member.0)
            .ok_or(MatchError::UnknownId {
                kind: "member",
                index: member.0,
            })?;
        m.preferred_committees.push(committee);
        Ok(())
    }

    /// Scores `member` at `rank` in `committee`'s table, after every member
    /// already holding that rank.
    pub fn score(
        &mut self,
        committee: CommitteeId,
        member: MemberId,
        rank: Rank,
    ) -> Result<RankKey, MatchError> {
        self.place(committee, member, |table| table.insert(member, rank))
    }

    /// Scores `member` at an explicit key. Fails if the key is taken.
    pub fn score_at(
        &mut self,
        committee: CommitteeId,
        member: MemberId,
        key: RankKey,
    ) -> Result<RankKey, MatchError> {
        self.place(committee, member, |table| table.insert_at(member, key))
    }

    fn place<F>(&mut self, committee: CommitteeId, member: MemberId, f: F) -> Result<RankKey, MatchError>
    where
        F: FnOnce(&mut ScoreTable) -> Result<RankKey, ScoreConflict>,
    {
        self.check_committee(committee)?;
        self.check_member(member)?;
        let (spec, table) = &mut self.committees[committee.0];
        f(table).map_err(|conflict| match conflict {
            ScoreConflict::Occupied { key, existing } => MatchError::DuplicateScore {
                committee: spec.name.clone(),
                key,
                existing: self.members[existing.0].name.clone(),
                member: self.members[member.0].name.clone(),
            },
            ScoreConflict::AlreadyScored => MatchError::DuplicateCandidate {
                committee: spec.name.clone(),
                member: self.members[member.0].name.clone(),
            },
        })
    }

    fn check_committee(&self, id: CommitteeId) -> Result<(), MatchError> {
        if id.0 < self.committees.len() {
            Ok(())
        } else {
            Err(MatchError::UnknownId {
                kind: "committee",
                index: id.0,
            })
        }
    }

    fn check_member(&self, id: MemberId) -> Result<(), MatchError> {
        if id.0 < self.members.len() {
            Ok(())
        } else {
            Err(MatchError::UnknownId {
                kind: "member",
                index: id.0,
            })
        }
    }

    /// Freezes every score table and returns the finished instance.
    pub fn build(self) -> Instance {
        let committees = self
            .committees
            .into_iter()
            .map(|(spec, table)| Committee {
                name: spec.name,
                capacity: spec.capacity,
                ranked_members: table.freeze(),
            })
            .collect();
        Instance {
            committees,
            members: self.members,
            committee_index: self.committee_index,
            member_index: self.member_index,
        }
    }
}
