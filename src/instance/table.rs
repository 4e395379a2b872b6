//! Per-committee score tables.

use std::collections::{BTreeMap, HashSet};

use super::types::{MemberId, Rank, RankKey};

/// Why a member could not be placed in a [`ScoreTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreConflict {
    /// The key is already held by another member.
    Occupied { key: RankKey, existing: MemberId },
    /// The member already has an entry in this table.
    AlreadyScored,
}

/// A committee's mapping from [`RankKey`] to member, built incrementally
/// and then frozen into ascending order.
///
/// Members inserted with the same [`Rank`] are kept apart by their arrival
/// index, so ties never collide and iteration order within a tie is the
/// insertion order.
///
/// # Examples
///
/// ```
/// use u_matching::instance::{MemberId, Rank, RankKey, ScoreTable};
///
/// let mut table = ScoreTable::new();
/// table.insert(MemberId(0), Rank::Ranked(1)).unwrap();
/// table.insert(MemberId(1), Rank::Ranked(1)).unwrap();
/// let order = table.freeze();
/// assert_eq!(order[0], (RankKey::new(Rank::Ranked(1), 0), MemberId(0)));
/// assert_eq!(order[1], (RankKey::new(Rank::Ranked(1), 1), MemberId(1)));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScoreTable {
    entries: BTreeMap<RankKey, MemberId>,
    members: HashSet<MemberId>,
}

impl ScoreTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of scored members.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of members already occupying the `rank` bucket.
    pub fn bucket_len(&self, rank: Rank) -> usize {
        self.entries
            .range(RankKey::new(rank, 0)..=RankKey::new(rank, u32::MAX))
            .count()
    }

    /// Places `member` at `rank`, behind every member already in that bucket.
    ///
    /// Returns the key the member was stored under.
    pub fn insert(&mut self, member: MemberId, rank: Rank) -> Result<RankKey, ScoreConflict> {
        let arrival = u32::try_from(self.bucket_len(rank)).unwrap_or(u32::MAX);
        self.insert_at(member, RankKey::new(rank, arrival))
    }

    /// Places `member` at an explicit key.
    pub fn insert_at(&mut self, member: MemberId, key: RankKey) -> Result<RankKey, ScoreConflict> {
        if self.members.contains(&member) {
            return Err(ScoreConflict::AlreadyScored);
        }
        if let Some(&existing) = self.entries.get(&key) {
            return Err(ScoreConflict::Occupied { key, existing });
        }
        self.entries.insert(key, member);
        self.members.insert(member);
        Ok(key)
    }

    /// Consumes the table and returns its entries best-first.
    pub fn freeze(self) -> Vec<(RankKey, MemberId)> {
        self.entries.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ties_get_increasing_arrival() {
        let mut table = ScoreTable::new();
        let k0 = table.insert(MemberId(7), Rank::Ranked(2)).unwrap();
        let k1 = table.insert(MemberId(3), Rank::Ranked(2)).unwrap();
        let k2 = table.insert(MemberId(5), Rank::Ranked(2)).unwrap();
        assert_eq!(k0.arrival, 0);
        assert_eq!(k1.arrival, 1);
        assert_eq!(k2.arrival, 2);
        assert_eq!(table.bucket_len(Rank::Ranked(2)), 3);
        assert_eq!(table.bucket_len(Rank::Ranked(1)), 0);
    }

    #[test]
    fn test_many_ties_stay_ordered() {
        // More than nine ties in one bucket must still order by arrival.
        let mut table = ScoreTable::new();
        for i in 0..25 {
            table.insert(MemberId(i), Rank::Ranked(1)).unwrap();
        }
        let order: Vec<usize> = table.freeze().into_iter().map(|(_, m)| m.0).collect();
        assert_eq!(order, (0..25).collect::<Vec<_>>());
    }

    #[test]
    fn test_freeze_is_ascending_with_unranked_last() {
        let mut table = ScoreTable::new();
        table.insert(MemberId(0), Rank::Unranked).unwrap();
        table.insert(MemberId(1), Rank::Ranked(3)).unwrap();
        table.insert(MemberId(2), Rank::Unranked).unwrap();
        table.insert(MemberId(3), Rank::Ranked(1)).unwrap();
        let order: Vec<usize> = table.freeze().into_iter().map(|(_, m)| m.0).collect();
        assert_eq!(order, vec![3, 1, 0, 2]);
    }

    #[test]
    fn test_explicit_key_collision_is_reported() {
        let mut table = ScoreTable::new();
        table
            .insert_at(MemberId(0), RankKey::new(Rank::Ranked(4), 1))
            .unwrap();
        // bucket holds one entry, so the next arrival index is 1: occupied
        let err = table.insert(MemberId(1), Rank::Ranked(4)).unwrap_err();
        assert_eq!(
            err,
            ScoreConflict::Occupied {
                key: RankKey::new(Rank::Ranked(4), 1),
                existing: MemberId(0),
            }
        );
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_member_scored_twice_is_rejected() {
        let mut table = ScoreTable::new();
        table.insert(MemberId(0), Rank::Ranked(1)).unwrap();
        assert_eq!(
            table.insert(MemberId(0), Rank::Ranked(2)),
            Err(ScoreConflict::AlreadyScored)
        );
        assert_eq!(table.len(), 1);
    }
}
