use std::collections::{BTreeMap, HashMap};

use serde_json::Value;

use crate::portfolio::{
    PortfolioFormat, invalid_input_error, optional_portfolio_field_names,
    required_portfolio_field_names,
};
use crate::{ClientError, ClientResult};

#[derive(Debug, Clone)]
pub(crate) enum RawCard {
    Json(Value),
    Csv(BTreeMap<String, String>),
}

#[derive(Debug, Clone)]
pub(crate) struct ParsedRow {
    pub(crate) row: i64,
    pub(crate) raw: RawCard,
}

pub(crate) fn parse_source(content: &str) -> ClientResult<(PortfolioFormat, Vec<ParsedRow>)> {
    let trimmed = content.trim_start_matches('\u{feff}').trim();
    if trimmed.is_empty() {
        return Err(invalid_input_error("Portfolio source is empty."));
    }

    if trimmed.starts_with('[') {
        return Ok((PortfolioFormat::Json, parse_json_array(trimmed)?));
    }

    if serde_json::from_str::<Value>(trimmed).is_ok() {
        return Err(ClientError::invalid_portfolio_format(
            "JSON input must be a top-level array of card objects.",
            "json_non_array",
        ));
    }

    if looks_like_csv(trimmed) {
        return Ok((PortfolioFormat::Csv, parse_csv(trimmed)?));
    }

    Err(ClientError::invalid_portfolio_format(
        "Unsupported portfolio format. Provide a JSON array or CSV with headers.",
        "unknown",
    ))
}

fn parse_json_array(content: &str) -> ClientResult<Vec<ParsedRow>> {
    let parsed = serde_json::from_str::<Value>(content)
        .map_err(|_| invalid_input_error("Invalid JSON input. Provide a valid JSON array."))?;

    let Some(items) = parsed.as_array() else {
        return Err(invalid_input_error(
            "JSON input must be a top-level array of card objects.",
        ));
    };

    let mut rows = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        if !item.is_object() {
            return Err(invalid_input_error(
                "JSON array entries must all be objects with card fields.",
            ));
        }
        rows.push(ParsedRow {
            row: (index as i64) + 1,
            raw: RawCard::Json(item.clone()),
        });
    }

    Ok(rows)
}

fn parse_csv(content: &str) -> ClientResult<Vec<ParsedRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers = reader
        .headers()
        .map_err(|_| invalid_input_error("CSV header row is missing or unreadable."))?
        .iter()
        .map(|value| value.trim().to_lowercase())
        .collect::<Vec<String>>();

    if !headers_are_valid(&headers) {
        return Err(ClientError::portfolio_schema_mismatch(
            owned(required_portfolio_field_names()),
            owned(optional_portfolio_field_names()),
            headers,
        ));
    }

    let index_by_name = headers
        .iter()
        .enumerate()
        .map(|(index, name)| (name.clone(), index))
        .collect::<HashMap<String, usize>>();

    let mut rows = Vec::new();
    for (row_index, result_row) in reader.records().enumerate() {
        let record =
            result_row.map_err(|_| invalid_input_error("CSV rows are malformed or not UTF-8."))?;
        let fields = index_by_name
            .iter()
            .filter_map(|(name, index)| {
                let value = record.get(*index)?;
                Some((name.clone(), value.to_string()))
            })
            .collect::<BTreeMap<String, String>>();

        rows.push(ParsedRow {
            row: (row_index as i64) + 1,
            raw: RawCard::Csv(fields),
        });
    }

    Ok(rows)
}

fn looks_like_csv(content: &str) -> bool {
    let Some(first_line) = content.lines().find(|line| !line.trim().is_empty()) else {
        return false;
    };
    first_line.contains(',')
}

fn headers_are_valid(actual_headers: &[String]) -> bool {
    let required_fields = required_portfolio_field_names();
    let optional_fields = optional_portfolio_field_names();

    if !required_fields
        .iter()
        .all(|required| actual_headers.iter().any(|value| value == required))
    {
        return false;
    }

    actual_headers.iter().all(|header| {
        required_fields.contains(&header.as_str()) || optional_fields.contains(&header.as_str())
    })
}

fn owned(values: Vec<&'static str>) -> Vec<String> {
    values.into_iter().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::{RawCard, parse_source};
    use crate::portfolio::PortfolioFormat;

    #[test]
    fn json_array_rows_are_numbered_from_one() {
        let parsed = parse_source(r#"[{"name": "Gold"}, {"name": "Green"}]"#);
        assert!(parsed.is_ok());
        if let Ok((format, rows)) = parsed {
            assert_eq!(format, PortfolioFormat::Json);
            assert_eq!(rows.len(), 2);
            assert_eq!(rows[1].row, 2);
        }
    }

    #[test]
    fn json_object_is_rejected_with_format_hint() {
        let parsed = parse_source(r#"{"name": "Gold"}"#);
        assert!(parsed.is_err());
        if let Err(error) = parsed {
            assert_eq!(error.code, "portfolio_invalid_format");
            assert_eq!(
                error.data.as_ref().and_then(|data| data["received_format"].as_str()),
                Some("json_non_array")
            );
        }
    }

    #[test]
    fn csv_headers_are_case_insensitive_and_trimmed() {
        let parsed = parse_source("Name, Issuer ,opened_date\nGold,Amex,2025-01-05\n");
        assert!(parsed.is_ok());
        if let Ok((format, rows)) = parsed {
            assert_eq!(format, PortfolioFormat::Csv);
            assert_eq!(rows.len(), 1);
            if let RawCard::Csv(fields) = &rows[0].raw {
                assert_eq!(fields.get("issuer").map(String::as_str), Some("Amex"));
                assert_eq!(fields.get("opened_date").map(String::as_str), Some("2025-01-05"));
            }
        }
    }

    #[test]
    fn csv_with_unknown_header_is_a_schema_mismatch() {
        let parsed = parse_source("name,issuer,color\nGold,Amex,gold\n");
        assert!(parsed.is_err());
        if let Err(error) = parsed {
            assert_eq!(error.code, "portfolio_invalid_format");
            assert!(error.message.contains("CSV headers"));
        }
    }

    #[test]
    fn plain_text_is_unsupported() {
        let parsed = parse_source("just some notes");
        assert!(parsed.is_err());
    }
}
