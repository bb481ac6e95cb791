use std::collections::{BTreeMap, BTreeSet};

use ulid::Ulid;

use crate::benefits::date::parse_iso_date;
use crate::contracts::types::PortfolioIssue;
use crate::models::Card;
use crate::portfolio::parse::{ParsedRow, RawCard};
use crate::{ClientError, ClientResult};

/// Turns parsed rows into cards, collecting every issue before failing.
/// Cards without an id get a generated `card_<ULID>` id.
pub(crate) fn validate_rows(parsed_rows: Vec<ParsedRow>) -> ClientResult<Vec<Card>> {
    let mut cards = Vec::with_capacity(parsed_rows.len());
    let mut issues = Vec::new();
    let mut seen_ids = BTreeSet::new();

    for parsed in parsed_rows {
        let mut row_issues = Vec::new();
        let card = match parsed.raw {
            RawCard::Json(value) => card_from_json(parsed.row, value, &mut row_issues),
            RawCard::Csv(fields) => card_from_csv(parsed.row, &fields, &mut row_issues),
        };

        let Some(mut card) = card else {
            issues.extend(row_issues);
            continue;
        };

        if card.name.trim().is_empty() {
            row_issues.push(issue(parsed.row, "name", "required", "name must be present and non-empty."));
        }

        card.id = card.id.trim().to_string();
        if card.id.is_empty() {
            card.id = format!("card_{}", Ulid::new());
        } else if !seen_ids.insert(card.id.clone()) {
            row_issues.push(issue(
                parsed.row,
                "id",
                "duplicate_id",
                &format!("id `{}` appears more than once.", card.id),
            ));
        }

        if row_issues.is_empty() {
            cards.push(card);
        } else {
            issues.extend(row_issues);
        }
    }

    if !issues.is_empty() {
        return Err(ClientError::portfolio_validation_failed(issues));
    }
    Ok(cards)
}

fn card_from_json(row: i64, value: serde_json::Value, issues: &mut Vec<PortfolioIssue>) -> Option<Card> {
    match serde_json::from_value::<Card>(value) {
        Ok(card) => Some(card),
        Err(error) => {
            issues.push(issue(row, "record", "invalid_record", &error.to_string()));
            None
        }
    }
}

fn card_from_csv(
    row: i64,
    fields: &BTreeMap<String, String>,
    issues: &mut Vec<PortfolioIssue>,
) -> Option<Card> {
    let field = |name: &str| {
        fields
            .get(name)
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
    };

    let issuer = field("issuer");
    if issuer.is_none() {
        issues.push(issue(row, "issuer", "required", "issuer must be present and non-empty."));
    }

    let mut card = Card::new(
        field("id").unwrap_or_default(),
        field("name").unwrap_or_default(),
        issuer.unwrap_or_default(),
    );
    card.nickname = field("nickname").map(str::to_string);

    if let Some(raw_date) = field("opened_date") {
        match parse_iso_date(raw_date) {
            Some(date) => card.opened_date = Some(date),
            None => issues.push(issue(
                row,
                "opened_date",
                "invalid_date",
                "opened_date must use YYYY-MM-DD format with a real calendar date.",
            )),
        }
    }

    if let Some(raw_flag) = field("is_business") {
        match parse_flag(raw_flag) {
            Some(flag) => card.is_business = flag,
            None => issues.push(issue(
                row,
                "is_business",
                "invalid_bool",
                "is_business must be true/false, yes/no or 1/0.",
            )),
        }
    }

    if let Some(raw_fee) = field("annual_fee") {
        match parse_fee(raw_fee) {
            Some(fee) => card.annual_fee = fee,
            None => issues.push(issue(
                row,
                "annual_fee",
                "invalid_number",
                "annual_fee must be a whole dollar amount.",
            )),
        }
    }

    Some(card)
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "true" | "yes" | "y" | "1" => Some(true),
        "false" | "no" | "n" | "0" => Some(false),
        _ => None,
    }
}

fn parse_fee(value: &str) -> Option<i64> {
    let cleaned = value.trim_start_matches('$').replace(',', "");
    let amount = cleaned.parse::<f64>().ok()?;
    if !amount.is_finite() || amount < 0.0 {
        return None;
    }
    Some(amount.round() as i64)
}

fn issue(row: i64, field: &str, code: &str, description: &str) -> PortfolioIssue {
    PortfolioIssue {
        row,
        field: field.to_string(),
        code: code.to_string(),
        description: description.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use serde_json::json;

    use super::validate_rows;
    use crate::portfolio::parse::{ParsedRow, RawCard};

    fn csv_row(row: i64, pairs: &[(&str, &str)]) -> ParsedRow {
        ParsedRow {
            row,
            raw: RawCard::Csv(
                pairs
                    .iter()
                    .map(|(key, value)| (key.to_string(), value.to_string()))
                    .collect::<BTreeMap<String, String>>(),
            ),
        }
    }

    #[test]
    fn csv_row_becomes_card_with_generated_id() {
        let rows = vec![csv_row(
            1,
            &[
                ("name", "Ink Business Preferred"),
                ("issuer", "Chase"),
                ("opened_date", "2025-06-01"),
                ("is_business", "Yes"),
                ("annual_fee", "$95"),
            ],
        )];
        let validated = validate_rows(rows);
        assert!(validated.is_ok());
        if let Ok(cards) = validated {
            assert_eq!(cards.len(), 1);
            assert!(cards[0].id.starts_with("card_"));
            assert!(cards[0].is_business);
            assert_eq!(cards[0].annual_fee, 95);
            assert!(cards[0].opened_date.is_some());
        }
    }

    #[test]
    fn all_issues_are_reported_together() {
        let rows = vec![
            csv_row(1, &[("name", "Gold"), ("issuer", ""), ("opened_date", "2025-02-30")]),
            csv_row(2, &[("name", "Green"), ("issuer", "Amex"), ("is_business", "maybe")]),
        ];
        let validated = validate_rows(rows);
        assert!(validated.is_err());
        if let Err(error) = validated {
            assert_eq!(error.code, "portfolio_validation_failed");
            let issues = error
                .data
                .as_ref()
                .and_then(|data| data["issues"].as_array().cloned())
                .unwrap_or_default();
            assert_eq!(issues.len(), 3);
            assert!(error.message.contains("2 cards"));
        }
    }

    #[test]
    fn json_rows_use_card_schema_and_reject_duplicate_ids() {
        let rows = vec![
            ParsedRow {
                row: 1,
                raw: RawCard::Json(json!({"id": "a", "name": "Gold", "issuer": "Amex"})),
            },
            ParsedRow {
                row: 2,
                raw: RawCard::Json(json!({"id": "a", "name": "Green", "issuer": "Amex"})),
            },
        ];
        let validated = validate_rows(rows);
        assert!(validated.is_err());
        if let Err(error) = validated {
            assert!(error.message.contains("1 cards"));
        }
    }

    #[test]
    fn json_row_with_bad_date_is_an_invalid_record() {
        let rows = vec![ParsedRow {
            row: 1,
            raw: RawCard::Json(json!({"name": "Gold", "opened_date": "01/05/2025"})),
        }];
        let validated = validate_rows(rows);
        assert!(validated.is_err());
        if let Err(error) = validated {
            let code = error
                .data
                .as_ref()
                .and_then(|data| data["issues"][0]["code"].as_str().map(str::to_string));
            assert_eq!(code.as_deref(), Some("invalid_record"));
        }
    }
}
