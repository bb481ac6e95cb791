use chrono::NaiveDate;

use crate::ClientResult;
use crate::benefits::date::format_iso_date;
use crate::commands::common::{PortfolioRunOptions, card_summary, portfolio_source};
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::{
    CountedCard, FiveTwentyFourStatusData, FiveTwentyFourTimelineData, PortfolioSource,
};
use crate::eligibility::five_twenty_four::{
    DropOffEntry, calculate_five_twenty_four_status, get_five_twenty_four_timeline,
};
use crate::eligibility::policy::FIVE_TWENTY_FOUR_POLICY;
use crate::models::Card;
use crate::portfolio::load_portfolio;

pub fn status(options: PortfolioRunOptions<'_>) -> ClientResult<SuccessEnvelope> {
    let portfolio = load_portfolio(&options.path, options.stdin_override)?;
    let data = status_data(&portfolio.cards, options.today, portfolio_source(&portfolio));
    success("five24 status", data)
}

pub fn timeline(options: PortfolioRunOptions<'_>) -> ClientResult<SuccessEnvelope> {
    let portfolio = load_portfolio(&options.path, options.stdin_override)?;
    let entries = get_five_twenty_four_timeline(&portfolio.cards, options.today, FIVE_TWENTY_FOUR_POLICY)
        .iter()
        .map(counted_card)
        .collect::<Vec<CountedCard>>();

    let data = FiveTwentyFourTimelineData {
        today: format_iso_date(&options.today),
        count: entries.len(),
        limit: FIVE_TWENTY_FOUR_POLICY.limit,
        entries,
        source: portfolio_source(&portfolio),
    };
    success("five24 timeline", data)
}

pub(crate) fn status_data(
    cards: &[Card],
    today: NaiveDate,
    source: PortfolioSource,
) -> FiveTwentyFourStatusData {
    let policy = FIVE_TWENTY_FOUR_POLICY;
    let window = calculate_five_twenty_four_status(cards, today, policy);
    let timeline = get_five_twenty_four_timeline(cards, today, policy);

    // Counted cards keep the window's chronological order.
    let cards_counted = window
        .cards_counted
        .iter()
        .filter_map(|card| {
            timeline
                .iter()
                .find(|entry| entry.card.id == card.id)
                .map(counted_card)
        })
        .collect::<Vec<CountedCard>>();

    FiveTwentyFourStatusData {
        today: format_iso_date(&today),
        count: window.count,
        limit: policy.limit,
        status: window.status.as_str().to_string(),
        slots_remaining: window.slots_remaining,
        next_drop_off: window.next_drop_off.as_ref().map(format_iso_date),
        days_until_drop: window.days_until_drop,
        eligible_again_on: window.eligible_again_on.as_ref().map(format_iso_date),
        cards_counted,
        excluded_count: cards.len().saturating_sub(window.count),
        source,
    }
}

fn counted_card(entry: &DropOffEntry) -> CountedCard {
    CountedCard {
        card: card_summary(&entry.card),
        drop_off_date: format_iso_date(&entry.drop_off_date),
        days_until_drop: entry.days_until,
    }
}
