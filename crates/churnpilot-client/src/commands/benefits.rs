use chrono::NaiveDate;

use crate::benefits::date::{days_between, format_iso_date};
use crate::benefits::deadlines::{
    DeadlinePolicy, calculate_annual_fee_date, days_until_annual_fee, sub_deadline, sub_status,
};
use crate::benefits::period::annual_credit_value;
use crate::benefits::usage::{CreditState, credit_states, is_card_snoozed};
use crate::commands::common::{PortfolioRunOptions, card_summary, load_context, portfolio_source};
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::{
    BenefitsData, BenefitsSummary, CardBenefitsView, CreditStateView, SignupBonusView,
};
use crate::models::Card;
use crate::portfolio::load_portfolio;
use crate::{ClientError, ClientResult};

#[derive(Debug, Clone)]
pub struct BenefitsRunOptions<'a> {
    pub portfolio: PortfolioRunOptions<'a>,
    /// Restricts the report to one card id.
    pub card_id: Option<String>,
}

pub fn run(options: BenefitsRunOptions<'_>) -> ClientResult<SuccessEnvelope> {
    let BenefitsRunOptions { portfolio: shared, card_id } = options;
    let context = load_context(shared.home_override)?;
    let portfolio = load_portfolio(&shared.path, shared.stdin_override)?;
    let policy = context.preferences.deadline_policy();

    let selected = match card_id.as_deref() {
        Some(id) => {
            let Some(card) = portfolio.cards.iter().find(|card| card.id == id) else {
                return Err(ClientError::card_not_found(id));
            };
            vec![card]
        }
        None => portfolio.cards.iter().collect::<Vec<&Card>>(),
    };

    let cards = selected
        .iter()
        .map(|card| card_benefits(card, shared.today, policy))
        .collect::<Vec<CardBenefitsView>>();

    let summary = BenefitsSummary {
        card_count: cards.len(),
        credit_count: cards.iter().map(|card| card.credits.len()).sum(),
        pending_reminders: cards.iter().map(|card| card.pending_reminders).sum(),
        cards_with_pending_reminders: cards
            .iter()
            .filter(|card| card.pending_reminders > 0)
            .count(),
        total_annual_credit_value: cards.iter().map(|card| card.annual_credit_value).sum(),
        total_annual_fees: selected
            .iter()
            .fold(0_i64, |total, card| total.saturating_add(card.annual_fee.max(0))),
    };

    let data = BenefitsData {
        today: format_iso_date(&shared.today),
        summary,
        cards,
        source: portfolio_source(&portfolio),
    };
    success("benefits", data)
}

pub(crate) fn card_benefits(card: &Card, today: NaiveDate, policy: DeadlinePolicy) -> CardBenefitsView {
    let credits = credit_states(card, today)
        .into_iter()
        .map(credit_view)
        .collect::<Vec<CreditStateView>>();
    let pending_reminders = credits.iter().filter(|credit| credit.needs_reminder).count();

    let signup_bonus = card.signup_bonus.as_ref().map(|bonus| {
        let deadline = sub_deadline(card);
        SignupBonusView {
            status: sub_status(card, today, policy).as_str().to_string(),
            points_or_cash: bonus.points_or_cash.clone(),
            spend_requirement: bonus.spend_requirement,
            deadline: deadline.as_ref().map(format_iso_date),
            days_left: deadline.map(|date| days_between(today, date)),
        }
    });

    let annual_fee_date = card
        .annual_fee_date
        .or_else(|| card.opened_date.map(calculate_annual_fee_date));

    CardBenefitsView {
        card: card_summary(card),
        annual_fee: card.annual_fee,
        annual_fee_date: annual_fee_date.as_ref().map(format_iso_date),
        days_until_annual_fee: days_until_annual_fee(card, today),
        annual_credit_value: annual_credit_value(&card.credits),
        benefits_snoozed_until: card.benefits_reminder_snoozed_until.as_ref().map(format_iso_date),
        card_snoozed: is_card_snoozed(card, today),
        pending_reminders,
        signup_bonus,
        credits,
    }
}

fn credit_view(state: CreditState) -> CreditStateView {
    CreditStateView {
        name: state.name,
        amount: state.amount,
        frequency: state.frequency.as_str().to_string(),
        period: state.period,
        period_label: state.period_label.to_string(),
        days_left_in_period: state.days_left_in_period,
        used: state.used,
        reminder_snoozed: state.reminder_snoozed,
        needs_reminder: state.needs_reminder,
        annual_value: state.annual_value,
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::{BenefitsRunOptions, card_benefits, run};
    use crate::benefits::deadlines::DEFAULT_DEADLINE_POLICY;
    use crate::benefits::period::Frequency;
    use crate::benefits::usage::{mark_credit_used, snooze_all_reminders};
    use crate::commands::common::PortfolioRunOptions;
    use crate::models::{Card, Credit};

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
    }

    fn platinum() -> Card {
        Card::new("plat", "Platinum Card", "American Express")
            .opened(date(2026, 3, 10))
            .with_credits(vec![
                Credit::new("Uber Cash", 15.0, Frequency::Monthly),
                Credit::new("Saks Credit", 50.0, Frequency::SemiAnnual),
            ])
    }

    #[test]
    fn view_counts_pending_reminders_and_fee_countdown() {
        let mut card = platinum();
        card.credit_usage =
            mark_credit_used("Uber Cash", Frequency::Monthly, &card.credit_usage, date(2026, 10, 2));
        let view = card_benefits(&card, date(2026, 10, 16), DEFAULT_DEADLINE_POLICY);
        assert_eq!(view.pending_reminders, 1);
        assert_eq!(view.credits[0].period, "2026-10");
        assert!(view.credits[0].used);
        assert_eq!(view.credits[1].period, "2026-H2");
        assert_eq!(view.annual_fee_date.as_deref(), Some("2027-03-10"));
        assert_eq!(view.days_until_annual_fee, Some(145));
        assert!((view.annual_credit_value - 280.0).abs() < f64::EPSILON);
        assert!(view.signup_bonus.is_none());
    }

    #[test]
    fn card_snooze_hides_every_reminder() {
        let card = snooze_all_reminders(&platinum(), 30, date(2026, 10, 16));
        let view = card_benefits(&card, date(2026, 10, 20), DEFAULT_DEADLINE_POLICY);
        assert!(view.card_snoozed);
        assert_eq!(view.pending_reminders, 0);
        assert_eq!(view.benefits_snoozed_until.as_deref(), Some("2026-11-15"));
    }

    #[test]
    fn unknown_card_filter_is_card_not_found() {
        let temp = tempfile::tempdir();
        assert!(temp.is_ok());
        if let Ok(temp) = temp {
            let result = run(BenefitsRunOptions {
                portfolio: PortfolioRunOptions {
                    home_override: Some(temp.path()),
                    stdin_override: Some(r#"[{"id": "gold", "name": "Gold Card"}]"#.to_string()),
                    ..PortfolioRunOptions::new("-", date(2026, 10, 16))
                },
                card_id: Some("green".to_string()),
            });
            assert!(result.is_err());
            if let Err(error) = result {
                assert_eq!(error.code, "card_not_found");
            }
        }
    }
}
