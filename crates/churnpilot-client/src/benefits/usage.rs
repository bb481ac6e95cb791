use chrono::{Duration, NaiveDate};

use crate::benefits::period::{
    Frequency, annualized_value, current_period, days_left_in_period, period_display_name,
};
use crate::models::{Card, Credit, CreditUsageMap};

/// Derived view of one credit for the current period.
#[derive(Debug, Clone, PartialEq)]
pub struct CreditState {
    pub name: String,
    pub amount: f64,
    pub frequency: Frequency,
    pub period: String,
    pub period_label: &'static str,
    pub days_left_in_period: i64,
    pub used: bool,
    pub reminder_snoozed: bool,
    pub needs_reminder: bool,
    pub annual_value: f64,
}

/// True only when the stored period matches the current one; usage from an
/// earlier period is stale and reads as unused.
pub fn is_credit_used_this_period(
    name: &str,
    frequency: Frequency,
    usage: &CreditUsageMap,
    today: NaiveDate,
) -> bool {
    let Some(entry) = usage.get(name) else {
        return false;
    };
    entry.last_used_period.as_deref() == Some(current_period(frequency, today).as_str())
}

pub fn mark_credit_used(
    name: &str,
    frequency: Frequency,
    usage: &CreditUsageMap,
    today: NaiveDate,
) -> CreditUsageMap {
    let mut updated = usage.clone();
    updated.entry(name.to_string()).or_default().last_used_period =
        Some(current_period(frequency, today));
    updated
}

pub fn mark_credit_unused(name: &str, usage: &CreditUsageMap) -> CreditUsageMap {
    let mut updated = usage.clone();
    if let Some(entry) = updated.get_mut(name) {
        entry.last_used_period = None;
    }
    updated
}

/// Inclusive: a snooze ending today still hides the reminder today.
pub fn is_reminder_snoozed(snoozed_until: Option<NaiveDate>, today: NaiveDate) -> bool {
    snoozed_until.is_some_and(|until| until >= today)
}

/// Counts every credit not used in its current period, regardless of amount.
pub fn unused_credits_count(credits: &[Credit], usage: &CreditUsageMap, today: NaiveDate) -> usize {
    credits
        .iter()
        .filter(|credit| !is_credit_used_this_period(&credit.name, credit.frequency, usage, today))
        .count()
}

pub fn snooze_credit_reminder(name: &str, until: NaiveDate, usage: &CreditUsageMap) -> CreditUsageMap {
    let mut updated = usage.clone();
    updated.entry(name.to_string()).or_default().reminder_snoozed_until = Some(until);
    updated
}

pub fn unsnooze_credit_reminder(name: &str, usage: &CreditUsageMap) -> CreditUsageMap {
    let mut updated = usage.clone();
    if let Some(entry) = updated.get_mut(name) {
        entry.reminder_snoozed_until = None;
    }
    updated
}

/// Card-level snooze; overrides every per-credit reminder while active.
/// Lengths past the calendar range snooze until `NaiveDate::MAX`.
pub fn snooze_all_reminders(card: &Card, days: i64, today: NaiveDate) -> Card {
    let until = Duration::try_days(days)
        .and_then(|span| today.checked_add_signed(span))
        .unwrap_or(if days < 0 { NaiveDate::MIN } else { NaiveDate::MAX });
    let mut updated = card.clone();
    updated.benefits_reminder_snoozed_until = Some(until);
    updated
}

pub fn unsnooze_all_reminders(card: &Card) -> Card {
    let mut updated = card.clone();
    updated.benefits_reminder_snoozed_until = None;
    updated
}

pub fn is_card_snoozed(card: &Card, today: NaiveDate) -> bool {
    is_reminder_snoozed(card.benefits_reminder_snoozed_until, today)
}

pub fn credit_states(card: &Card, today: NaiveDate) -> Vec<CreditState> {
    let card_snoozed = is_card_snoozed(card, today);
    card.credits
        .iter()
        .map(|credit| {
            let used = is_credit_used_this_period(
                &credit.name,
                credit.frequency,
                &card.credit_usage,
                today,
            );
            let reminder_snoozed = is_reminder_snoozed(
                card.credit_usage
                    .get(&credit.name)
                    .and_then(|entry| entry.reminder_snoozed_until),
                today,
            );
            CreditState {
                name: credit.name.clone(),
                amount: credit.amount,
                frequency: credit.frequency,
                period: current_period(credit.frequency, today),
                period_label: period_display_name(credit.frequency),
                days_left_in_period: days_left_in_period(credit.frequency, today),
                used,
                reminder_snoozed,
                needs_reminder: !used && !reminder_snoozed && !card_snoozed,
                annual_value: annualized_value(credit),
            }
        })
        .collect()
}

/// Credits that should surface a reminder today; always 0 under a card-level snooze.
pub fn pending_reminder_count(card: &Card, today: NaiveDate) -> usize {
    credit_states(card, today)
        .iter()
        .filter(|state| state.needs_reminder)
        .count()
}
