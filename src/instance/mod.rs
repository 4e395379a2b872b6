//! Matching instances: committees, members and score tables.
//!
//! An [`Instance`] is an arena. Committees and members are addressed by the
//! dense index newtypes [`CommitteeId`] and [`MemberId`], resolved once at
//! build time, so the engine never looks anything up by name.
//!
//! Committee score tables use a composite [`RankKey`] of a whole-number
//! [`Rank`] and an arrival index. Members sharing a rank are ordered by the
//! order in which they were scored, which makes ties strict and
//! deterministic without any floating-point nudging.

mod builder;
pub mod random;
mod table;
mod types;

pub use builder::{Instance, InstanceBuilder};
pub use table::{ScoreConflict, ScoreTable};
pub use types::{Committee, CommitteeId, CommitteeSpec, Member, MemberId, Rank, RankKey};
