use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::benefits::date::{days_between, first_of_month, last_of_month};
use crate::models::Credit;

/// How often a credit resets.
///
/// Parsing is tolerant: casing, hyphens, underscores and spaces are ignored and
/// anything unrecognized resolves to [`Frequency::Annual`]. A credit record
/// that omits the field entirely defaults to monthly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Frequency {
    #[default]
    Monthly,
    Quarterly,
    SemiAnnual,
    Annual,
}

impl Frequency {
    pub fn parse(raw: &str) -> Self {
        let compact = raw
            .chars()
            .filter(|character| !matches!(character, '-' | '_' | ' ' | '\t'))
            .collect::<String>()
            .to_ascii_lowercase();

        match compact.as_str() {
            "monthly" | "month" | "permonth" => Self::Monthly,
            "quarterly" | "quarter" | "perquarter" => Self::Quarterly,
            "semiannual" | "semiannually" | "biannual" | "biannually" | "halfyearly"
            | "halfyear" => Self::SemiAnnual,
            _ => Self::Annual,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Monthly => "monthly",
            Self::Quarterly => "quarterly",
            Self::SemiAnnual => "semi-annual",
            Self::Annual => "annual",
        }
    }

    pub const fn periods_per_year(self) -> u32 {
        match self {
            Self::Monthly => 12,
            Self::Quarterly => 4,
            Self::SemiAnnual => 2,
            Self::Annual => 1,
        }
    }

    const fn months_per_period(self) -> u32 {
        12 / self.periods_per_year()
    }
}

impl From<String> for Frequency {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<Frequency> for String {
    fn from(value: Frequency) -> Self {
        value.as_str().to_string()
    }
}

/// Period id for the bucket containing `reference_date`:
/// `YYYY-MM`, `YYYY-Q{1..4}`, `YYYY-H{1|2}` or `YYYY`.
pub fn current_period(frequency: Frequency, reference_date: NaiveDate) -> String {
    let year = reference_date.year();
    let month = reference_date.month();
    match frequency {
        Frequency::Monthly => format!("{year}-{month:02}"),
        Frequency::Quarterly => format!("{year}-Q{}", (month - 1) / 3 + 1),
        Frequency::SemiAnnual => {
            let half = if month <= 6 { 1 } else { 2 };
            format!("{year}-H{half}")
        }
        Frequency::Annual => format!("{year}"),
    }
}

/// Caption for the current period, e.g. "this quarter".
pub const fn period_display_name(frequency: Frequency) -> &'static str {
    match frequency {
        Frequency::Monthly => "this month",
        Frequency::Quarterly => "this quarter",
        Frequency::SemiAnnual => "this half",
        Frequency::Annual => "this year",
    }
}

/// Inclusive first and last day of the period containing `reference_date`.
pub fn period_bounds(frequency: Frequency, reference_date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let span = frequency.months_per_period();
    let start_month = ((reference_date.month() - 1) / span) * span + 1;
    let end_month = start_month + span - 1;
    let year = reference_date.year();

    let start = first_of_month(year, start_month).unwrap_or(reference_date);
    let end = last_of_month(year, end_month).unwrap_or(reference_date);
    (start, end)
}

/// Days remaining after `today` in the current period; 0 on its last day.
pub fn days_left_in_period(frequency: Frequency, today: NaiveDate) -> i64 {
    let (_, end) = period_bounds(frequency, today);
    days_between(today, end)
}

pub fn annualized_value(credit: &Credit) -> f64 {
    credit.amount * f64::from(credit.frequency.periods_per_year())
}

pub fn annual_credit_value(credits: &[Credit]) -> f64 {
    credits.iter().map(annualized_value).sum()
}
