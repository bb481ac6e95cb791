use chrono::{Duration, NaiveDate};

use crate::benefits::date::{days_between, first_of_month_after};
use crate::eligibility::policy::FiveTwentyFourPolicy;
use crate::models::Card;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EligibilityStatus {
    Under,
    At,
    Over,
}

impl EligibilityStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Under => "under",
            Self::At => "at",
            Self::Over => "over",
        }
    }

    fn for_count(count: usize, limit: usize) -> Self {
        if count < limit {
            Self::Under
        } else if count == limit {
            Self::At
        } else {
            Self::Over
        }
    }
}

#[derive(Debug, Clone)]
pub struct EligibilityWindow {
    pub count: usize,
    pub status: EligibilityStatus,
    /// Oldest first.
    pub cards_counted: Vec<Card>,
    pub next_drop_off: Option<NaiveDate>,
    pub days_until_drop: Option<i64>,
    pub slots_remaining: usize,
    pub eligible_again_on: Option<NaiveDate>,
}

#[derive(Debug, Clone)]
pub struct DropOffEntry {
    pub card: Card,
    pub drop_off_date: NaiveDate,
    pub days_until: i64,
}

pub fn calculate_five_twenty_four_status(
    cards: &[Card],
    today: NaiveDate,
    policy: FiveTwentyFourPolicy,
) -> EligibilityWindow {
    let mut cards_counted = cards
        .iter()
        .filter(|card| counts_toward_window(card, today, policy))
        .cloned()
        .collect::<Vec<Card>>();
    cards_counted.sort_by_key(|card| card.opened_date);

    let count = cards_counted.len();
    let status = EligibilityStatus::for_count(count, policy.limit);

    let mut next_drop_off = None;
    let mut days_until_drop = None;
    if let Some(opened) = cards_counted.first().and_then(|card| card.opened_date) {
        let drop_off = drop_off_date(opened, policy);
        let days = days_between(today, drop_off);
        // Stale window at a day boundary: report nothing rather than a negative countdown.
        if days >= 0 {
            next_drop_off = Some(drop_off);
            days_until_drop = Some(days);
        }
    }

    let eligible_again_on = if count >= policy.limit {
        let mut drop_offs = cards_counted
            .iter()
            .filter_map(|card| card.opened_date)
            .map(|opened| drop_off_date(opened, policy))
            .collect::<Vec<NaiveDate>>();
        drop_offs.sort();
        drop_offs.get(count - policy.limit).copied()
    } else {
        None
    };

    EligibilityWindow {
        count,
        status,
        cards_counted,
        next_drop_off,
        days_until_drop,
        slots_remaining: policy.slots_remaining(count),
        eligible_again_on,
    }
}

/// Every counted card with its drop-off date, earliest drop-off first.
pub fn get_five_twenty_four_timeline(
    cards: &[Card],
    today: NaiveDate,
    policy: FiveTwentyFourPolicy,
) -> Vec<DropOffEntry> {
    let mut timeline = cards
        .iter()
        .filter(|card| counts_toward_window(card, today, policy))
        .filter_map(|card| {
            let opened = card.opened_date?;
            let drop_off = drop_off_date(opened, policy);
            Some(DropOffEntry {
                card: card.clone(),
                drop_off_date: drop_off,
                days_until: days_between(today, drop_off),
            })
        })
        .collect::<Vec<DropOffEntry>>();

    timeline.sort_by_key(|entry| entry.drop_off_date);
    timeline
}

/// First day of the month after the window closes; the opening day of month
/// is discarded.
pub fn drop_off_date(opened: NaiveDate, policy: FiveTwentyFourPolicy) -> NaiveDate {
    first_of_month_after(opened, policy.window_months)
}

pub fn counts_toward_window(card: &Card, today: NaiveDate, policy: FiveTwentyFourPolicy) -> bool {
    let Some(opened) = card.opened_date else {
        return false;
    };
    let window_start = today - Duration::days(policy.window_days);
    if opened <= window_start {
        return false;
    }
    if card.is_business && !policy.business_card_counts(&card.issuer) {
        return false;
    }
    true
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, NaiveDate};

    use super::{
        EligibilityStatus, calculate_five_twenty_four_status, counts_toward_window, drop_off_date,
        get_five_twenty_four_timeline,
    };
    use crate::eligibility::policy::FIVE_TWENTY_FOUR_POLICY;
    use crate::models::Card;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 16).unwrap_or_default()
    }

    fn personal(id: &str, days_ago: i64) -> Card {
        Card::new(id, &format!("Card {id}"), "Chase").opened(today() - Duration::days(days_ago))
    }

    #[test]
    fn window_edge_excludes_day_730_and_includes_day_729() {
        let policy = FIVE_TWENTY_FOUR_POLICY;
        assert!(!counts_toward_window(&personal("a", 730), today(), policy));
        assert!(counts_toward_window(&personal("b", 729), today(), policy));
    }

    #[test]
    fn business_carve_out_depends_on_issuer() {
        let opened = today() - Duration::days(60);
        let spark = Card::new("1", "Spark Cash", "Capital One Spark").opened(opened).business();
        let ink = Card::new("2", "Ink Preferred", "Chase Ink").opened(opened).business();
        let window =
            calculate_five_twenty_four_status(&[spark, ink], today(), FIVE_TWENTY_FOUR_POLICY);
        assert_eq!(window.count, 1);
        assert_eq!(window.cards_counted[0].id, "1");
    }

    #[test]
    fn status_thresholds_at_four_five_six() {
        let cards = (1..=6)
            .map(|index| personal(&index.to_string(), index * 50))
            .collect::<Vec<Card>>();
        let expectations = [
            (4, EligibilityStatus::Under),
            (5, EligibilityStatus::At),
            (6, EligibilityStatus::Over),
        ];
        for (size, expected) in expectations {
            let window =
                calculate_five_twenty_four_status(&cards[..size], today(), FIVE_TWENTY_FOUR_POLICY);
            assert_eq!(window.count, size);
            assert_eq!(window.status, expected);
        }
    }

    #[test]
    fn cards_without_open_date_are_ignored() {
        let undated = Card::new("x", "Mystery", "Citi");
        let window = calculate_five_twenty_four_status(
            &[undated, personal("1", 10)],
            today(),
            FIVE_TWENTY_FOUR_POLICY,
        );
        assert_eq!(window.count, 1);
    }

    #[test]
    fn empty_portfolio_has_no_drop_off() {
        let window = calculate_five_twenty_four_status(&[], today(), FIVE_TWENTY_FOUR_POLICY);
        assert_eq!(window.count, 0);
        assert_eq!(window.status, EligibilityStatus::Under);
        assert!(window.next_drop_off.is_none());
        assert!(window.days_until_drop.is_none());
        assert_eq!(window.slots_remaining, 5);
    }

    #[test]
    fn next_drop_off_is_first_of_month_after_oldest_card() {
        let cards = (1..=5)
            .map(|index| personal(&index.to_string(), index * 100))
            .collect::<Vec<Card>>();
        let window = calculate_five_twenty_four_status(&cards, today(), FIVE_TWENTY_FOUR_POLICY);
        assert_eq!(window.count, 5);
        assert_eq!(window.status, EligibilityStatus::At);
        assert_eq!(window.cards_counted[0].id, "5");
        assert_eq!(window.next_drop_off, NaiveDate::from_ymd_opt(2027, 7, 1));
        assert_eq!(window.days_until_drop, Some(258));
        assert_eq!(window.eligible_again_on, NaiveDate::from_ymd_opt(2027, 7, 1));
        assert_eq!(window.slots_remaining, 0);
    }

    #[test]
    fn drop_off_discards_day_of_month() {
        let policy = FIVE_TWENTY_FOUR_POLICY;
        let jan_31 = NaiveDate::from_ymd_opt(2025, 1, 31).unwrap_or_default();
        let dec_15 = NaiveDate::from_ymd_opt(2025, 12, 15).unwrap_or_default();
        assert_eq!(Some(drop_off_date(jan_31, policy)), NaiveDate::from_ymd_opt(2027, 2, 1));
        assert_eq!(Some(drop_off_date(dec_15, policy)), NaiveDate::from_ymd_opt(2028, 1, 1));
    }

    #[test]
    fn eligible_again_when_enough_cards_drop() {
        let cards = (1..=6)
            .map(|index| personal(&index.to_string(), index * 100))
            .collect::<Vec<Card>>();
        let window = calculate_five_twenty_four_status(&cards, today(), FIVE_TWENTY_FOUR_POLICY);
        assert_eq!(window.status, EligibilityStatus::Over);
        let timeline = get_five_twenty_four_timeline(&cards, today(), FIVE_TWENTY_FOUR_POLICY);
        assert_eq!(window.eligible_again_on, Some(timeline[1].drop_off_date));
    }

    #[test]
    fn timeline_orders_by_drop_off() {
        let cards = vec![personal("newest", 90), personal("oldest", 600), personal("middle", 365)];
        let timeline = get_five_twenty_four_timeline(&cards, today(), FIVE_TWENTY_FOUR_POLICY);
        let order = timeline
            .iter()
            .map(|entry| entry.card.id.as_str())
            .collect::<Vec<&str>>();
        assert_eq!(order, vec!["oldest", "middle", "newest"]);
        assert!(timeline.iter().all(|entry| entry.drop_off_date.format("%d").to_string() == "01"));
    }
}
