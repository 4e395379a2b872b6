//! Reproducible synthetic instances for property tests and benchmarks.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use super::builder::{Instance, InstanceBuilder};
use super::types::{CommitteeId, Rank};
use crate::error::MatchError;

/// Shape of a generated instance.
///
/// # Examples
///
/// ```
/// use u_matching::instance::random::{generate, RandomInstanceConfig};
///
/// let config = RandomInstanceConfig::default()
///     .with_committees(4)
///     .with_members(30)
///     .with_capacity_range(1, 5);
/// let instance = generate(&config, 7).unwrap();
/// assert_eq!(instance.committee_count(), 4);
/// assert_eq!(instance.member_count(), 30);
/// ```
#[derive(Debug, Clone)]
pub struct RandomInstanceConfig {
    /// Number of committees.
    pub committees: usize,
    /// Number of members.
    pub members: usize,
    /// Smallest committee capacity (inclusive).
    pub min_capacity: usize,
    /// Largest committee capacity (inclusive).
    pub max_capacity: usize,
    /// Longest member preference list. Each member lists between zero and
    /// this many committees.
    pub max_preferences: usize,
    /// Probability that a committee gives a member a whole-number rank.
    pub ranked_probability: f64,
    /// Probability that an unranked member still appears in the committee's
    /// table (at the unranked level).
    pub unranked_probability: f64,
    /// Ranks are drawn from `0..rank_levels`; small values force ties.
    pub rank_levels: u32,
}

impl Default for RandomInstanceConfig {
    fn default() -> Self {
        Self {
            committees: 6,
            members: 50,
            min_capacity: 1,
            max_capacity: 9,
            max_preferences: 6,
            ranked_probability: 0.6,
            unranked_probability: 0.0,
            rank_levels: 5,
        }
    }
}

impl RandomInstanceConfig {
    pub fn with_committees(mut self, n: usize) -> Self {
        self.committees = n;
        self
    }

    pub fn with_members(mut self, n: usize) -> Self {
        self.members = n;
        self
    }

    pub fn with_capacity_range(mut self, min: usize, max: usize) -> Self {
        self.min_capacity = min;
        self.max_capacity = max;
        self
    }

    pub fn with_max_preferences(mut self, n: usize) -> Self {
        self.max_preferences = n;
        self
    }

    pub fn with_ranked_probability(mut self, p: f64) -> Self {
        self.ranked_probability = p;
        self
    }

    pub fn with_unranked_probability(mut self, p: f64) -> Self {
        self.unranked_probability = p;
        self
    }

    pub fn with_rank_levels(mut self, n: u32) -> Self {
        self.rank_levels = n;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.min_capacity > self.max_capacity {
            return Err(format!(
                "min_capacity {} exceeds max_capacity {}",
                self.min_capacity, self.max_capacity
            ));
        }
        if !(0.0..=1.0).contains(&self.ranked_probability) {
            return Err(format!(
                "ranked_probability must be in [0, 1], got {}",
                self.ranked_probability
            ));
        }
        if !(0.0..=1.0).contains(&self.unranked_probability) {
            return Err(format!(
                "unranked_probability must be in [0, 1], got {}",
                self.unranked_probability
            ));
        }
        if self.rank_levels == 0 {
            return Err("rank_levels must be at least 1".into());
        }
        Ok(())
    }
}

/// Generates an instance from `config`, fully determined by `seed`.
pub fn generate(config: &RandomInstanceConfig, seed: u64) -> Result<Instance, MatchError> {
    config.validate().map_err(MatchError::InvalidConfig)?;
    let mut rng = StdRng::seed_from_u64(seed);
    let mut builder = InstanceBuilder::new();

    let mut committee_ids = Vec::with_capacity(config.committees);
    for i in 0..config.committees {
        let capacity = rng.random_range(config.min_capacity..=config.max_capacity);
        committee_ids.push(builder.add_committee(format!("committee-{i}"), capacity)?);
    }

    let mut member_ids = Vec::with_capacity(config.members);
    for i in 0..config.members {
        let member = builder.add_member(format!("member-{i}"))?;
        let mut order: Vec<CommitteeId> = committee_ids.clone();
        order.shuffle(&mut rng);
        let len = rng.random_range(0..=config.max_preferences.min(order.len()));
        for &committee in &order[..len] {
            builder.prefer(member, committee)?;
        }
        member_ids.push(member);
    }

    // Members are scored in id order, so arrival within a tie is id order.
    for &committee in &committee_ids {
        for &member in &member_ids {
            if rng.random_bool(config.ranked_probability) {
                let rank = rng.random_range(0..config.rank_levels);
                builder.score(committee, member, Rank::Ranked(rank))?;
            } else if rng.random_bool(config.unranked_probability) {
                builder.score(committee, member, Rank::Unranked)?;
            }
        }
    }

    Ok(builder.build())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_instance() {
        let config = RandomInstanceConfig::default();
        let a = generate(&config, 11).unwrap();
        let b = generate(&config, 11).unwrap();
        for (ca, cb) in a.committees().iter().zip(b.committees()) {
            assert_eq!(ca.capacity, cb.capacity);
            assert_eq!(ca.ranked_members, cb.ranked_members);
        }
        for (ma, mb) in a.members().iter().zip(b.members()) {
            assert_eq!(ma.preferred_committees, mb.preferred_committees);
        }
    }

    #[test]
    fn test_capacities_within_range() {
        let config = RandomInstanceConfig::default()
            .with_committees(20)
            .with_capacity_range(2, 4);
        let instance = generate(&config, 3).unwrap();
        assert!(instance
            .committees()
            .iter()
            .all(|c| (2..=4).contains(&c.capacity)));
    }

    #[test]
    fn test_preference_lists_bounded_and_distinct() {
        let config = RandomInstanceConfig::default().with_max_preferences(3);
        let instance = generate(&config, 5).unwrap();
        for m in instance.members() {
            assert!(m.preferred_committees.len() <= 3);
            let mut seen = m.preferred_committees.clone();
            seen.sort();
            seen.dedup();
            assert_eq!(seen.len(), m.preferred_committees.len());
        }
    }

    #[test]
    fn test_full_density_scores_everyone() {
        let config = RandomInstanceConfig::default()
            .with_members(12)
            .with_ranked_probability(1.0);
        let instance = generate(&config, 9).unwrap();
        for c in instance.committees() {
            assert_eq!(c.ranked_members.len(), 12);
        }
    }

    #[test]
    fn test_validate_rejects_bad_ranges() {
        assert!(RandomInstanceConfig::default()
            .with_capacity_range(5, 2)
            .validate()
            .is_err());
        assert!(RandomInstanceConfig::default()
            .with_ranked_probability(1.5)
            .validate()
            .is_err());
        assert!(RandomInstanceConfig::default()
            .with_rank_levels(0)
            .validate()
            .is_err());
        assert!(matches!(
            generate(&RandomInstanceConfig::default().with_rank_levels(0), 1),
            Err(MatchError::InvalidConfig(_))
        ));
    }
}
