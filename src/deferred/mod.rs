//! Deferred acceptance (Gale–Shapley), many-to-one.
//!
//! Committees propose, members hold at most one offer and trade up when a
//! committee they list earlier comes along. Committees have capacities, so a
//! committee keeps proposing until its roster is full or it has run out of
//! candidates.
//!
//! Ties in a committee's ranking are resolved before matching starts by the
//! arrival order recorded in each [`RankKey`](crate::instance::RankKey).
//!
//! # References
//!
//! - Gale, D. & Shapley, L. S. (1962). "College Admissions and the Stability
//!   of Marriage", *American Mathematical Monthly* 69(1), 9-15.
//! - Roth, A. E. (1984). "The Evolution of the Labor Market for Medical
//!   Interns and Residents", *Journal of Political Economy* 92(6), 991-1016.

mod config;
#[cfg(test)]
mod proptests;
mod runner;
pub mod stability;
mod state;

pub use config::MatchConfig;
pub use runner::{MatchResult, MatchRunner};
pub use state::{MatchEvent, MatchState, OfferOutcome, Termination};
