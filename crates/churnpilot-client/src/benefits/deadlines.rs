use chrono::{Duration, NaiveDate};

use crate::benefits::date::{add_months_clamped, days_between};
use crate::models::Card;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubStatus {
    None,
    Achieved,
    Expired,
    Critical,
    Warning,
    Active,
}

impl SubStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Achieved => "achieved",
            Self::Expired => "expired",
            Self::Critical => "critical",
            Self::Warning => "warning",
            Self::Active => "active",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DeadlinePolicy {
    pub sub_warning_days: i64,
    pub sub_critical_days: i64,
}

pub const DEFAULT_DEADLINE_POLICY: DeadlinePolicy = DeadlinePolicy {
    sub_warning_days: 30,
    sub_critical_days: 14,
};

/// Explicit bonus deadline, else opened date plus the spend window. A window
/// past chrono's date range yields no deadline.
pub fn sub_deadline(card: &Card) -> Option<NaiveDate> {
    let bonus = card.signup_bonus.as_ref()?;
    if let Some(deadline) = bonus.deadline {
        return Some(deadline);
    }
    if bonus.time_period_days <= 0 {
        return None;
    }
    let window = Duration::try_days(bonus.time_period_days)?;
    card.opened_date?.checked_add_signed(window)
}

pub fn sub_status(card: &Card, today: NaiveDate, policy: DeadlinePolicy) -> SubStatus {
    if card.signup_bonus.is_none() {
        return SubStatus::None;
    }
    if card.sub_achieved {
        return SubStatus::Achieved;
    }
    let Some(deadline) = sub_deadline(card) else {
        return SubStatus::Active;
    };

    let days_left = days_between(today, deadline);
    if days_left < 0 {
        SubStatus::Expired
    } else if days_left <= policy.sub_critical_days {
        SubStatus::Critical
    } else if days_left <= policy.sub_warning_days {
        SubStatus::Warning
    } else {
        SubStatus::Active
    }
}

/// Fee posts one year after opening; a Feb 29 opening clamps to Feb 28.
pub fn calculate_annual_fee_date(opened_date: NaiveDate) -> NaiveDate {
    add_months_clamped(opened_date, 12)
}

pub fn days_until_annual_fee(card: &Card, today: NaiveDate) -> Option<i64> {
    let fee_date = card
        .annual_fee_date
        .or_else(|| card.opened_date.map(calculate_annual_fee_date))?;
    Some(days_between(today, fee_date))
}
