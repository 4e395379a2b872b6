//! Property tests over random instances.

use proptest::prelude::*;

use super::stability::{blocking_pairs, is_stable};
use super::{MatchConfig, MatchRunner, MatchState, OfferOutcome};
use crate::error::MatchError;
use crate::instance::random::{generate, RandomInstanceConfig};
use crate::instance::{CommitteeId, Instance, InstanceBuilder, MemberId, Rank};

fn instance_config() -> impl Strategy<Value = (RandomInstanceConfig, u64)> {
    (
        1usize..8,
        0usize..40,
        0usize..4,
        1usize..6,
        0usize..7,
        1u32..6,
        0.0f64..=1.0,
        0.0f64..=1.0,
        any::<u64>(),
    )
        .prop_map(
            |(committees, members, min_cap, cap_span, prefs, levels, ranked, unranked, seed)| {
                let config = RandomInstanceConfig::default()
                    .with_committees(committees)
                    .with_members(members)
                    .with_capacity_range(min_cap, min_cap + cap_span)
                    .with_max_preferences(prefs)
                    .with_rank_levels(levels)
                    .with_ranked_probability(ranked)
                    .with_unranked_probability(unranked);
                (config, seed)
            },
        )
}

fn ranked_only() -> MatchConfig {
    MatchConfig::default()
        .with_accept_any_first_offer(false)
        .with_record_events(true)
}

/// Both sides of the held/roster relation agree and no roster overflows.
fn assert_consistent(instance: &Instance, state: &MatchState<'_>) {
    for c in instance.committee_ids() {
        let roster = state.roster(c);
        assert!(roster.len() <= instance.committee(c).capacity);
        for &m in roster {
            assert_eq!(state.held_offer(m), Some(c));
        }
    }
    for m in instance.member_ids() {
        if let Some(c) = state.held_offer(m) {
            assert!(state.roster(c).contains(&m));
            assert!(!state.is_rejected(m, c));
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(96))]

    #[test]
    fn prop_capacity_and_consistency_hold_every_round((config, seed) in instance_config()) {
        let instance = generate(&config, seed).unwrap();
        let mut state = MatchState::new(&instance, ranked_only());
        assert_consistent(&instance, &state);
        while state.termination().is_none() {
            state.step_round().unwrap();
            assert_consistent(&instance, &state);
        }
    }

    #[test]
    fn prop_rejected_committee_never_proposes_again((config, seed) in instance_config()) {
        let instance = generate(&config, seed).unwrap();
        let result = MatchRunner::run(&instance, &ranked_only()).unwrap();

        let mut closed: std::collections::HashSet<(CommitteeId, MemberId)> = Default::default();
        for event in &result.events {
            prop_assert!(
                !closed.contains(&(event.committee, event.member)),
                "{:?} proposed again after being rejected", event
            );
            match event.outcome {
                OfferOutcome::Rejected => {
                    closed.insert((event.committee, event.member));
                }
                OfferOutcome::Displaced { previous } => {
                    closed.insert((previous, event.member));
                }
                OfferOutcome::Accepted => {}
            }
        }
        for m in instance.member_ids() {
            if let Some(c) = result.assignment_of(m) {
                prop_assert!(!closed.contains(&(c, m)));
            }
        }
    }

    #[test]
    fn prop_ranked_only_result_is_stable((config, seed) in instance_config()) {
        let instance = generate(&config, seed).unwrap();
        let run = ranked_only();
        let result = MatchRunner::run(&instance, &run).unwrap();
        let pairs = blocking_pairs(&instance, &result, &run);
        prop_assert!(pairs.is_empty(), "blocking pairs: {:?}", pairs);
        prop_assert!(result.proposals <= instance.candidate_entries());
    }

    #[test]
    fn prop_accept_any_is_stable_or_reports_incomparable((config, seed) in instance_config()) {
        let instance = generate(&config, seed).unwrap();
        let run = MatchConfig::default();
        match MatchRunner::run(&instance, &run) {
            Ok(result) => prop_assert!(is_stable(&instance, &result, &run)),
            Err(MatchError::IncomparableOffers { .. }) => {}
            Err(other) => prop_assert!(false, "unexpected error: {other}"),
        }
    }

    #[test]
    fn prop_terminal_state_is_idempotent((config, seed) in instance_config()) {
        let instance = generate(&config, seed).unwrap();
        let mut state = MatchState::new(&instance, ranked_only());
        while state.termination().is_none() {
            state.step_round().unwrap();
        }
        let before: Vec<Vec<MemberId>> =
            instance.committee_ids().map(|c| state.roster(c).to_vec()).collect();
        let proposals = state.proposals();
        prop_assert!(!state.step_round().unwrap());
        let after: Vec<Vec<MemberId>> =
            instance.committee_ids().map(|c| state.roster(c).to_vec()).collect();
        prop_assert_eq!(before, after);
        prop_assert_eq!(state.proposals(), proposals);
    }
}

/// Members list the committees in rotated orders while every committee ranks
/// the members identically, so each round all open committees collide on the
/// same member and all but one get turned down.
#[test]
fn test_cyclic_preferences_terminate_stably() {
    let n = 12;
    let mut b = InstanceBuilder::new();
    let committees: Vec<CommitteeId> = (0..n)
        .map(|i| b.add_committee(format!("c{i}"), 1).unwrap())
        .collect();
    let members: Vec<MemberId> = (0..n)
        .map(|i| b.add_member(format!("m{i}")).unwrap())
        .collect();
    for i in 0..n {
        for k in 0..n {
            b.prefer(members[i], committees[(i + k + 1) % n]).unwrap();
        }
    }
    for &c in &committees {
        for (k, &m) in members.iter().enumerate() {
            let rank = u32::try_from(k).unwrap();
            b.score(c, m, Rank::Ranked(rank)).unwrap();
        }
    }
    let instance = b.build();

    let config = MatchConfig::default();
    let result = MatchRunner::run(&instance, &config).unwrap();
    assert!(result.termination.is_complete());
    assert!(result.unmatched_members().is_empty());
    assert!(result.proposals <= instance.candidate_entries());
    assert!(result.rounds >= n);
    assert!(is_stable(&instance, &result, &config));
}
