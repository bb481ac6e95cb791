/// Rolling-window rule used to predict application denials.
///
/// Notes:
/// - `window_days` approximates 24 months with a fixed 730 days; drop-off
///   dates use calendar months instead. The two models disagree near month
///   and leap-year boundaries and are kept as-is.
/// - Business cards only count when the issuer contains one of
///   `business_counting_issuers` (case-insensitive substring).
#[derive(Debug, Clone, Copy)]
pub struct FiveTwentyFourPolicy {
    pub window_days: i64,
    pub window_months: i32,
    pub limit: usize,
    pub business_counting_issuers: &'static [&'static str],
}

impl FiveTwentyFourPolicy {
    pub fn business_card_counts(self, issuer: &str) -> bool {
        let issuer_lower = issuer.to_lowercase();
        self.business_counting_issuers
            .iter()
            .any(|needle| issuer_lower.contains(needle))
    }

    pub fn slots_remaining(self, count: usize) -> usize {
        self.limit.saturating_sub(count)
    }
}

pub const FIVE_TWENTY_FOUR_POLICY: FiveTwentyFourPolicy = FiveTwentyFourPolicy {
    window_days: 730,
    window_months: 24,
    limit: 5,
    business_counting_issuers: &["capital one", "discover", "td bank"],
};
