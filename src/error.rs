//! Error types for instance construction and matching.

use thiserror::Error;

use crate::instance::RankKey;

/// Errors raised while building an [`Instance`](crate::instance::Instance)
/// or while running the matching engine.
///
/// Every variant is fatal for the run that produced it. A stalled run is
/// *not* an error; see [`Termination::Stalled`](crate::deferred::Termination).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MatchError {
    /// Two committees were declared with the same name.
    #[error("duplicate committee name: {0}")]
    DuplicateCommittee(String),

    /// Two members were declared with the same name.
    #[error("duplicate member name: {0}")]
    DuplicateMember(String),

    /// An id that does not belong to the instance under construction.
    #[error("unknown {kind} id {index}")]
    UnknownId {
        /// `"committee"` or `"member"`.
        kind: &'static str,
        /// The offending index.
        index: usize,
    },

    /// Two different members would occupy the same score in one committee's
    /// table.
    #[error("committee {committee}: score {key} is already held by {existing}, cannot place {member}")]
    DuplicateScore {
        committee: String,
        key: RankKey,
        existing: String,
        member: String,
    },

    /// The same member was scored twice by one committee.
    #[error("committee {committee} already scores member {member}")]
    DuplicateCandidate { committee: String, member: String },

    /// A member was asked to choose between two committees it never ranked.
    #[error("member {member} cannot compare {held} and {offered}: neither appears in its preferences")]
    IncomparableOffers {
        member: String,
        held: String,
        offered: String,
    },

    /// A match state was converted into a result before reaching a
    /// terminal condition.
    #[error("matching has not finished after {rounds} rounds")]
    Unfinished { rounds: usize },

    /// A configuration failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
