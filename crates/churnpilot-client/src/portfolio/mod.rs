//! Portfolio loading: a JSON array of card records or a CSV with a header
//! row, read from a file or stdin.

pub mod input;
pub(crate) mod parse;
pub(crate) mod validate;

use crate::models::Card;
use crate::portfolio::input::{SourceKind, resolve_source};
use crate::{ClientError, ClientResult};

const REQUIRED_PORTFOLIO_FIELDS: [(&str, &str); 2] = [("name", "string"), ("issuer", "string")];

const OPTIONAL_PORTFOLIO_FIELDS: [(&str, &str); 5] = [
    ("opened_date", "date"),
    ("is_business", "bool"),
    ("annual_fee", "integer"),
    ("nickname", "string"),
    ("id", "string"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortfolioFormat {
    Json,
    Csv,
}

impl PortfolioFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoadedPortfolio {
    pub cards: Vec<Card>,
    pub format: PortfolioFormat,
    pub source_kind: SourceKind,
    pub source_ref: Option<String>,
}

pub fn load_portfolio(path: &str, stdin_override: Option<String>) -> ClientResult<LoadedPortfolio> {
    let source = resolve_source(path, stdin_override)?;
    let (format, rows) = parse::parse_source(&source.content)?;
    let cards = validate::validate_rows(rows)?;
    log::debug!(
        "loaded {} cards from {} ({})",
        cards.len(),
        source.source_ref.as_deref().unwrap_or("stdin"),
        format.as_str()
    );

    Ok(LoadedPortfolio {
        cards,
        format,
        source_kind: source.source_kind,
        source_ref: source.source_ref,
    })
}

pub(crate) fn required_portfolio_field_names() -> Vec<&'static str> {
    REQUIRED_PORTFOLIO_FIELDS
        .iter()
        .map(|(name, _)| *name)
        .collect()
}

pub(crate) fn optional_portfolio_field_names() -> Vec<&'static str> {
    OPTIONAL_PORTFOLIO_FIELDS
        .iter()
        .map(|(name, _)| *name)
        .collect()
}

pub(crate) fn invalid_input_error(message: &str) -> ClientError {
    ClientError::invalid_argument_with_recovery(
        message,
        vec![
            "Provide a JSON array of cards or a CSV with `name,issuer` headers.".to_string(),
            format!("Run `{}` for usage.", crate::error::PORTFOLIO_HELP_COMMAND),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::{PortfolioFormat, load_portfolio};

    #[test]
    fn stdin_json_portfolio_loads_cards() {
        let loaded = load_portfolio(
            "-",
            Some(r#"[{"id": "gold", "name": "Gold Card", "issuer": "American Express"}]"#.to_string()),
        );
        assert!(loaded.is_ok());
        if let Ok(portfolio) = loaded {
            assert_eq!(portfolio.format, PortfolioFormat::Json);
            assert_eq!(portfolio.cards.len(), 1);
            assert_eq!(portfolio.cards[0].id, "gold");
        }
    }

    #[test]
    fn empty_array_is_a_valid_empty_portfolio() {
        let loaded = load_portfolio("-", Some("[]".to_string()));
        assert!(loaded.is_ok());
        if let Ok(portfolio) = loaded {
            assert!(portfolio.cards.is_empty());
        }
    }
}
