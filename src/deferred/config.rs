//! Matching configuration.

/// Configuration for a deferred-acceptance run.
///
/// # Examples
///
/// ```
/// use u_matching::deferred::MatchConfig;
///
/// let config = MatchConfig::default()
///     .with_accept_any_first_offer(false)
///     .with_record_events(true);
/// assert!(!config.accept_any_first_offer);
/// assert!(config.record_events);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MatchConfig {
    /// Whether a member with no held offer accepts an offer from a committee
    /// it did not list.
    ///
    /// When `true`, any first offer is accepted, so a member with a short or
    /// empty preference list can end up on an unlisted committee. A second
    /// unlisted offer to such a member cannot be compared and aborts the run
    /// with [`MatchError::IncomparableOffers`](crate::MatchError).
    ///
    /// When `false`, offers from unlisted committees are always rejected.
    pub accept_any_first_offer: bool,

    /// Record one [`MatchEvent`](super::MatchEvent) per proposal.
    pub record_events: bool,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            accept_any_first_offer: true,
            record_events: false,
        }
    }
}

impl MatchConfig {
    /// Sets the first-offer policy.
    pub fn with_accept_any_first_offer(mut self, accept: bool) -> Self {
        self.accept_any_first_offer = accept;
        self
    }

    /// Enables or disables the per-proposal event log.
    pub fn with_record_events(mut self, record: bool) -> Self {
        self.record_events = record;
        self
    }
}
