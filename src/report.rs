//! Name-level view of a finished run, for printing or serialization.

use std::fmt;

use crate::deferred::{MatchResult, Termination};
use crate::instance::{Instance, MemberId};

/// One committee's final roster.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CommitteeReport {
    pub name: String,
    pub capacity: usize,
    /// Member names in roster order.
    pub members: Vec<String>,
}

impl CommitteeReport {
    pub fn is_full(&self) -> bool {
        self.members.len() == self.capacity
    }
}

/// The outcome of a run, resolved to names.
///
/// The `Display` impl prints each committee as a heading, a rule and one
/// member per line. Stalled runs are followed by the committees left short
/// and the members left out.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Assignment {
    pub termination: Termination,
    pub rounds: usize,
    pub proposals: usize,
    /// Committees in creation order.
    pub committees: Vec<CommitteeReport>,
    pub unmatched: Vec<String>,
    pub under_capacity: Vec<String>,
}

impl Assignment {
    pub fn new(instance: &Instance, result: &MatchResult) -> Self {
        let member_name = |m: &MemberId| instance.member(*m).name.clone();
        let committees = instance
            .committee_ids()
            .map(|c| {
                let record = instance.committee(c);
                CommitteeReport {
                    name: record.name.clone(),
                    capacity: record.capacity,
                    members: result.roster(c).iter().map(member_name).collect(),
                }
            })
            .collect();

        Self {
            termination: result.termination,
            rounds: result.rounds,
            proposals: result.proposals,
            committees,
            unmatched: result.unmatched_members().iter().map(member_name).collect(),
            under_capacity: result
                .under_capacity_committees(instance)
                .into_iter()
                .map(|c| instance.committee(c).name.clone())
                .collect(),
        }
    }

    pub fn committee(&self, name: &str) -> Option<&CommitteeReport> {
        self.committees.iter().find(|c| c.name == name)
    }

    /// The committee `member` was placed on, if any.
    pub fn committee_of(&self, member: &str) -> Option<&str> {
        self.committees
            .iter()
            .find(|c| c.members.iter().any(|m| m == member))
            .map(|c| c.name.as_str())
    }
}

const RULE: &str = "----------------";

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for committee in &self.committees {
            writeln!(f, "{}", committee.name)?;
            writeln!(f, "{RULE}")?;
            for member in &committee.members {
                writeln!(f, "{member}")?;
            }
            writeln!(f)?;
        }

        if self.termination == Termination::Stalled {
            writeln!(f, "Stalled after {} rounds.", self.rounds)?;
            if !self.under_capacity.is_empty() {
                writeln!(f, "Under capacity: {}", self.under_capacity.join(", "))?;
            }
            if !self.unmatched.is_empty() {
                writeln!(f, "Unmatched: {}", self.unmatched.join(", "))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deferred::{MatchConfig, MatchRunner};
    use crate::instance::{InstanceBuilder, Rank};

    fn stalled_instance() -> Instance {
        let mut b = InstanceBuilder::new();
        let web = b.add_committee("Website", 2).unwrap();
        let soc = b.add_committee("Social", 1).unwrap();
        let ana = b.add_member("ana").unwrap();
        let ben = b.add_member("ben").unwrap();
        let cai = b.add_member("cai").unwrap();
        b.prefer(ana, web).unwrap();
        b.prefer(ben, soc).unwrap();
        b.prefer(cai, soc).unwrap();
        b.score(web, ana, Rank::Ranked(1)).unwrap();
        b.score(soc, ben, Rank::Ranked(1)).unwrap();
        b.score(soc, cai, Rank::Ranked(2)).unwrap();
        b.build()
    }

    #[test]
    fn test_assignment_resolves_names() {
        let instance = stalled_instance();
        let config = MatchConfig::default().with_accept_any_first_offer(false);
        let result = MatchRunner::run(&instance, &config).unwrap();
        let report = Assignment::new(&instance, &result);

        assert_eq!(report.committee("Website").unwrap().members, vec!["ana"]);
        assert!(report.committee("Social").unwrap().is_full());
        assert_eq!(report.committee_of("ben"), Some("Social"));
        assert_eq!(report.committee_of("cai"), None);
        assert_eq!(report.unmatched, vec!["cai"]);
        assert_eq!(report.under_capacity, vec!["Website"]);
    }

    #[test]
    fn test_display_layout_for_stalled_run() {
        let instance = stalled_instance();
        let config = MatchConfig::default().with_accept_any_first_offer(false);
        let result = MatchRunner::run(&instance, &config).unwrap();
        let text = Assignment::new(&instance, &result).to_string();

        let expected = "\
Website
----------------
ana

Social
----------------
ben

Stalled after 2 rounds.
Under capacity: Website
Unmatched: cai
";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_display_omits_notice_when_complete() {
        let mut b = InstanceBuilder::new();
        let c = b.add_committee("Treasurer", 1).unwrap();
        let ana = b.add_member("ana").unwrap();
        b.prefer(ana, c).unwrap();
        b.score(c, ana, Rank::Ranked(1)).unwrap();
        let instance = b.build();

        let result = MatchRunner::run(&instance, &MatchConfig::default()).unwrap();
        let text = Assignment::new(&instance, &result).to_string();
        assert_eq!(text, "Treasurer\n----------------\nana\n\n");
    }
}
