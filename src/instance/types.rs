//! Entity records shared by the builder, the engine and the reporter.

use std::fmt;

/// Index of a committee inside an [`Instance`](super::Instance).
///
/// Ids are dense and assigned in creation order, which is also the order in
/// which committees propose within a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CommitteeId(pub usize);

/// Index of a member inside an [`Instance`](super::Instance).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MemberId(pub usize);

/// A committee's whole-number preference for a member.
///
/// `Unranked` orders after every `Ranked` value, so unranked candidates are
/// only approached once every ranked candidate has been exhausted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Rank {
    /// Lower is more preferred.
    Ranked(u32),
    /// No stated preference.
    Unranked,
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rank::Ranked(r) => write!(f, "{r}"),
            Rank::Unranked => f.write_str("unranked"),
        }
    }
}

/// Position of a member in a committee's score table.
///
/// Members sharing a [`Rank`] are ordered by `arrival`: the number of
/// members that were already in the same rank bucket when this one was
/// inserted. Ordering is lexicographic on `(rank, arrival)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RankKey {
    pub rank: Rank,
    pub arrival: u32,
}

impl RankKey {
    pub fn new(rank: Rank, arrival: u32) -> Self {
        Self { rank, arrival }
    }
}

impl fmt::Display for RankKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.arrival == 0 {
            write!(f, "{}", self.rank)
        } else {
            write!(f, "{}+{}", self.rank, self.arrival)
        }
    }
}

/// Static definition of a committee: its name and the number of spots it
/// fills.
///
/// # Examples
///
/// ```
/// use u_matching::instance::CommitteeSpec;
///
/// let roster = CommitteeSpec::default_roster();
/// assert_eq!(roster.len(), 6);
/// assert_eq!(roster[0].name, "Website");
/// assert_eq!(roster[0].capacity, 8);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CommitteeSpec {
    pub name: String,
    pub capacity: usize,
}

impl CommitteeSpec {
    pub fn new(name: impl Into<String>, capacity: usize) -> Self {
        Self {
            name: name.into(),
            capacity,
        }
    }

    /// The six standing committees, in proposal order.
    pub fn default_roster() -> Vec<CommitteeSpec> {
        vec![
            CommitteeSpec::new("Website", 8),
            CommitteeSpec::new("Social", 2),
            CommitteeSpec::new("Treasurer", 2),
            CommitteeSpec::new("Industrial Relations", 9),
            CommitteeSpec::new("Public Relations", 9),
            CommitteeSpec::new("Curriculum", 9),
        ]
    }
}

/// A member and its ranked committee preferences.
#[derive(Debug, Clone)]
pub struct Member {
    pub name: String,
    /// Most preferred first. Committees not listed are never preferred over
    /// a listed one.
    pub preferred_committees: Vec<CommitteeId>,
}

impl Member {
    /// Position of `committee` in this member's preferences, if listed.
    pub fn position_of(&self, committee: CommitteeId) -> Option<usize> {
        self.preferred_committees.iter().position(|&c| c == committee)
    }

    /// Returns `true` if `committee` appears in the preference list.
    pub fn ranks(&self, committee: CommitteeId) -> bool {
        self.position_of(committee).is_some()
    }
}

/// A committee with its frozen candidate order.
#[derive(Debug, Clone)]
pub struct Committee {
    pub name: String,
    pub capacity: usize,
    /// Candidates in ascending key order (best first).
    pub ranked_members: Vec<(RankKey, MemberId)>,
}

impl Committee {
    /// The key under which `member` is scored, if it is a candidate.
    pub fn key_of(&self, member: MemberId) -> Option<RankKey> {
        self.ranked_members
            .iter()
            .find(|&&(_, m)| m == member)
            .map(|&(k, _)| k)
    }
}
