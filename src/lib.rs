//! Stable many-to-one matching of members to capacity-bounded committees.
//!
//! Provides a deferred-acceptance (Gale–Shapley) engine generalized to
//! committees with more than one seat:
//!
//! - **Instances**: an arena of committees and members with ranked
//!   preferences on both sides. Committee rankings may tie; ties are broken
//!   by arrival order through a composite rank key.
//! - **Deferred acceptance**: committees propose round by round, members
//!   hold their best offer so far and trade up, and the run stops when every
//!   committee is full, every member is held, or no committee can move.
//! - **Stability check**: finds blocking pairs in a finished matching.
//! - **Loader / report**: reads CSV preference sheets and renders rosters.
//!
//! # Example
//!
//! ```
//! use u_matching::deferred::{MatchConfig, MatchRunner};
//! use u_matching::instance::{InstanceBuilder, Rank};
//! use u_matching::report::Assignment;
//!
//! let mut b = InstanceBuilder::new();
//! let x = b.add_committee("X", 1).unwrap();
//! let y = b.add_committee("Y", 1).unwrap();
//! let m1 = b.add_member("m1").unwrap();
//! let m2 = b.add_member("m2").unwrap();
//! b.prefer(m1, x).unwrap();
//! b.prefer(m1, y).unwrap();
//! b.prefer(m2, y).unwrap();
//! b.prefer(m2, x).unwrap();
//! for c in [x, y] {
//!     b.score(c, m1, Rank::Ranked(1)).unwrap();
//!     b.score(c, m2, Rank::Ranked(2)).unwrap();
//! }
//! let instance = b.build();
//!
//! let result = MatchRunner::run(&instance, &MatchConfig::default()).unwrap();
//! let report = Assignment::new(&instance, &result);
//! assert_eq!(report.committee_of("m1"), Some("X"));
//! assert_eq!(report.committee_of("m2"), Some("Y"));
//! ```

pub mod deferred;
mod error;
pub mod instance;
pub mod loader;
pub mod report;

pub use error::MatchError;
