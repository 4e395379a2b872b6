//! Stability check for a finished matching.

use super::config::MatchConfig;
use super::runner::MatchResult;
use crate::instance::{CommitteeId, Instance, MemberId};

/// A member/committee pair that would both rather be matched to each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockingPair {
    pub member: MemberId,
    pub committee: CommitteeId,
    /// The rostered member `committee` ranks below `member`.
    pub displaces: MemberId,
}

/// Whether `member`, currently holding `held`, would take an offer from
/// `committee`.
fn would_accept(
    instance: &Instance,
    config: &MatchConfig,
    member: MemberId,
    committee: CommitteeId,
    held: Option<CommitteeId>,
) -> bool {
    let record = instance.member(member);
    match held {
        None => config.accept_any_first_offer || record.ranks(committee),
        Some(h) if h == committee => false,
        Some(h) => match (record.position_of(committee), record.position_of(h)) {
            (Some(offered), Some(current)) => offered < current,
            (Some(_), None) => true,
            _ => false,
        },
    }
}

/// Finds every blocking pair of `result`.
///
/// `(m, c)` blocks when `m` would accept `c` over what it holds, and `c`
/// ranks `m` strictly above some member on its final roster. A stable
/// matching has none.
pub fn blocking_pairs(
    instance: &Instance,
    result: &MatchResult,
    config: &MatchConfig,
) -> Vec<BlockingPair> {
    let mut pairs = Vec::new();
    for committee in instance.committee_ids() {
        let record = instance.committee(committee);
        let roster = result.roster(committee);

        // Worst rostered member by key; candidates ahead of it could displace it.
        let worst = roster
            .iter()
            .filter_map(|&m| record.key_of(m).map(|k| (k, m)))
            .max();
        let Some((worst_key, worst_member)) = worst else {
            continue;
        };

        for &(key, member) in &record.ranked_members {
            if key >= worst_key {
                break;
            }
            if roster.contains(&member) {
                continue;
            }
            if would_accept(instance, config, member, committee, result.assignment_of(member)) {
                pairs.push(BlockingPair {
                    member,
                    committee,
                    displaces: worst_member,
                });
            }
        }
    }
    pairs
}

/// `true` if `result` has no blocking pair.
pub fn is_stable(instance: &Instance, result: &MatchResult, config: &MatchConfig) -> bool {
    blocking_pairs(instance, result, config).is_empty()
}
