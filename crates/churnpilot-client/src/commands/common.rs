use std::path::Path;

use chrono::NaiveDate;

use crate::ClientResult;
use crate::benefits::date::format_iso_date;
use crate::contracts::types::{CardSummary, PortfolioSource};
use crate::library::catalog::CardLibrary;
use crate::library::normalize::card_label;
use crate::models::Card;
use crate::portfolio::LoadedPortfolio;
use crate::preferences::{Preferences, load_library, load_preferences, resolve_home};

/// Options shared by every command that reads a portfolio.
#[derive(Debug, Clone)]
pub struct PortfolioRunOptions<'a> {
    pub path: String,
    pub today: NaiveDate,
    pub home_override: Option<&'a Path>,
    pub stdin_override: Option<String>,
}

impl PortfolioRunOptions<'_> {
    pub fn new(path: &str, today: NaiveDate) -> Self {
        Self {
            path: path.to_string(),
            today,
            home_override: None,
            stdin_override: None,
        }
    }
}

pub(crate) struct CommandContext {
    pub(crate) preferences: Preferences,
    pub(crate) library: CardLibrary,
}

pub(crate) fn load_context(home_override: Option<&Path>) -> ClientResult<CommandContext> {
    let home = resolve_home(home_override)?;
    Ok(CommandContext {
        preferences: load_preferences(&home)?,
        library: load_library(&home)?,
    })
}

pub(crate) fn card_summary(card: &Card) -> CardSummary {
    CardSummary {
        id: card.id.clone(),
        name: card.name.clone(),
        label: card_label(card),
        issuer: card.issuer.clone(),
        opened_date: card.opened_date.as_ref().map(format_iso_date),
        is_business: card.is_business,
    }
}

pub(crate) fn portfolio_source(portfolio: &LoadedPortfolio) -> PortfolioSource {
    PortfolioSource {
        kind: portfolio.source_kind.as_str().to_string(),
        path: portfolio.source_ref.clone(),
        format: portfolio.format.as_str().to_string(),
        card_count: portfolio.cards.len(),
    }
}
