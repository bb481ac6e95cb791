use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::benefits::period::Frequency;

/// A recurring statement credit or perk attached to a card or template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Credit {
    pub name: String,
    pub amount: f64,
    #[serde(default)]
    pub frequency: Frequency,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Credit {
    pub fn new(name: &str, amount: f64, frequency: Frequency) -> Self {
        Self {
            name: name.to_string(),
            amount,
            frequency,
            notes: None,
        }
    }

    pub fn with_notes(mut self, notes: &str) -> Self {
        self.notes = Some(notes.to_string());
        self
    }
}

/// Usage state for one credit, keyed by credit name in [`Card::credit_usage`].
///
/// An absent entry means the credit was never used. `last_used_period` holds a
/// period id such as `2026-01`, `2026-Q1`, `2026-H1` or `2026`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditUsage {
    #[serde(default)]
    pub last_used_period: Option<String>,
    #[serde(default)]
    pub reminder_snoozed_until: Option<NaiveDate>,
}

/// Credit usage keyed by the credit's current name. Renaming a credit orphans
/// its entry; stale keys are ignored by every reader.
pub type CreditUsageMap = BTreeMap<String, CreditUsage>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignupBonus {
    pub points_or_cash: String,
    pub spend_requirement: f64,
    pub time_period_days: i64,
    #[serde(default)]
    pub deadline: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(default)]
    pub issuer: String,
    #[serde(default)]
    pub annual_fee: i64,
    #[serde(default)]
    pub annual_fee_date: Option<NaiveDate>,
    #[serde(default)]
    pub opened_date: Option<NaiveDate>,
    #[serde(default)]
    pub is_business: bool,
    #[serde(default)]
    pub signup_bonus: Option<SignupBonus>,
    #[serde(default)]
    pub sub_achieved: bool,
    #[serde(default)]
    pub credits: Vec<Credit>,
    #[serde(default)]
    pub credit_usage: CreditUsageMap,
    #[serde(default)]
    pub benefits_reminder_snoozed_until: Option<NaiveDate>,
    #[serde(default)]
    pub template_id: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Card {
    pub fn new(id: &str, name: &str, issuer: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            nickname: None,
            issuer: issuer.to_string(),
            annual_fee: 0,
            annual_fee_date: None,
            opened_date: None,
            is_business: false,
            signup_bonus: None,
            sub_achieved: false,
            credits: Vec::new(),
            credit_usage: CreditUsageMap::new(),
            benefits_reminder_snoozed_until: None,
            template_id: None,
            notes: None,
        }
    }

    pub fn opened(mut self, opened_date: NaiveDate) -> Self {
        self.opened_date = Some(opened_date);
        self
    }

    pub fn business(mut self) -> Self {
        self.is_business = true;
        self
    }

    pub fn with_credits(mut self, credits: Vec<Credit>) -> Self {
        self.credits = credits;
        self
    }
}

/// Raw extraction output before a [`Card`] exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardData {
    pub name: String,
    #[serde(default)]
    pub issuer: String,
    #[serde(default)]
    pub annual_fee: i64,
    #[serde(default)]
    pub signup_bonus: Option<SignupBonus>,
    #[serde(default)]
    pub credits: Vec<Credit>,
}

/// Static catalog entry for a known card product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardTemplate {
    pub id: String,
    pub name: String,
    pub issuer: String,
    pub annual_fee: i64,
    #[serde(default)]
    pub credits: Vec<Credit>,
}

#[cfg(test)]
mod tests {
    use super::{Card, Credit};
    use crate::benefits::period::Frequency;

    #[test]
    fn card_json_accepts_minimal_record_and_loose_frequency() {
        let parsed = serde_json::from_str::<Card>(
            r#"{
                "name": "Platinum Card",
                "issuer": "American Express",
                "opened_date": "2025-03-14",
                "credits": [{"name": "Uber Cash", "amount": 15, "frequency": "Semi-Annually"}]
            }"#,
        );
        assert!(parsed.is_ok());
        if let Ok(card) = parsed {
            assert!(card.id.is_empty());
            assert!(!card.is_business);
            assert_eq!(card.credits[0].frequency, Frequency::SemiAnnual);
            assert!(card.credit_usage.is_empty());
        }
    }

    #[test]
    fn credit_serializes_canonical_frequency() {
        let credit = Credit::new("Dining Credit", 10.0, Frequency::Monthly);
        let value = serde_json::to_value(&credit);
        assert!(value.is_ok());
        if let Ok(json) = value {
            assert_eq!(json["frequency"], "monthly");
            assert!(json.get("notes").is_none());
        }
    }
}
