use std::path::Path;

use crate::benefits::period::annual_credit_value;
use crate::commands::common::{PortfolioRunOptions, load_context, portfolio_source};
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::{
    CreditView, EnrichmentCounts, EnrichmentEntryView, EnrichmentFailureView, LibraryEnrichData,
    LibraryListData, LibraryMatchData, TemplateView,
};
use crate::library::enrich::{EnrichmentOutcome, batch_enrich_cards};
use crate::library::matcher::match_to_library_with_confidence;
use crate::library::normalize::{Issuer, get_display_name, normalize_issuer};
use crate::models::CardTemplate;
use crate::portfolio::load_portfolio;
use crate::{ClientError, ClientResult};

#[derive(Debug, Default)]
pub struct LibraryListOptions<'a> {
    pub issuer: Option<String>,
    pub home_override: Option<&'a Path>,
}

#[derive(Debug, Default)]
pub struct LibraryShowOptions<'a> {
    pub template_id: String,
    pub home_override: Option<&'a Path>,
}

#[derive(Debug, Default)]
pub struct LibraryMatchOptions<'a> {
    pub name: String,
    pub issuer: Option<String>,
    pub home_override: Option<&'a Path>,
}

pub fn list(options: LibraryListOptions<'_>) -> ClientResult<SuccessEnvelope> {
    let context = load_context(options.home_override)?;
    let issuer_filter = options.issuer.as_deref().map(normalize_issuer);
    if issuer_filter == Some(Issuer::Other) {
        return Err(ClientError::invalid_argument_for_command(
            "`--issuer` did not match a known issuer.",
            Some("library list"),
        ));
    }

    let templates = context
        .library
        .all()
        .filter(|template| {
            issuer_filter.is_none_or(|issuer| normalize_issuer(&template.issuer) == issuer)
        })
        .map(template_view)
        .collect::<Vec<TemplateView>>();

    let data = LibraryListData {
        count: templates.len(),
        templates,
    };
    success("library list", data)
}

pub fn show(options: LibraryShowOptions<'_>) -> ClientResult<SuccessEnvelope> {
    let context = load_context(options.home_override)?;
    let Some(template) = context.library.get(options.template_id.trim()) else {
        return Err(ClientError::template_not_found(options.template_id.trim()));
    };
    success("library show", template_view(template))
}

pub fn match_card(options: LibraryMatchOptions<'_>) -> ClientResult<SuccessEnvelope> {
    if options.name.trim().is_empty() {
        return Err(ClientError::invalid_argument_for_command(
            "Card name must not be empty.",
            Some("library match"),
        ));
    }

    let context = load_context(options.home_override)?;
    let threshold = context.preferences.enrichment_min_confidence;
    let issuer = options.issuer.clone().unwrap_or_default();
    let result = match_to_library_with_confidence(&context.library, &options.name, &issuer);
    let normalized_issuer = match normalize_issuer(&issuer) {
        Issuer::Other => normalize_issuer(&options.name),
        resolved => resolved,
    };

    let data = LibraryMatchData {
        display_name: get_display_name(&options.name, normalized_issuer.as_str()),
        name: options.name,
        issuer: options.issuer,
        normalized_issuer: normalized_issuer.as_str().to_string(),
        template_id: result.template_id.clone(),
        confidence: result.confidence,
        runner_up_confidence: result.runner_up_confidence,
        matched_name: result.matched_name.clone(),
        matched_issuer: result.matched_issuer.clone(),
        threshold,
        ambiguous: result.is_ambiguous(threshold),
        decision: result.decision(threshold).as_str().to_string(),
    };
    success("library match", data)
}

/// Read-only: enriched cards are returned, never written back to the source.
/// With auto-enrichment disabled the report still shows matches but the cards
/// come back unchanged and would-be enrichments read `match_only`.
pub fn enrich(options: PortfolioRunOptions<'_>) -> ClientResult<SuccessEnvelope> {
    let context = load_context(options.home_override)?;
    let portfolio = load_portfolio(&options.path, options.stdin_override)?;
    let threshold = context.preferences.enrichment_min_confidence;
    let auto_enrich_enabled = context.preferences.auto_enrich_enabled;

    let batch = batch_enrich_cards(&portfolio.cards, &context.library, threshold);
    if !batch.failures.is_empty() {
        log::warn!(
            "{} of {} cards could not be enriched",
            batch.failures.len(),
            portfolio.cards.len()
        );
    }

    let counts = EnrichmentCounts {
        cards: portfolio.cards.len(),
        matched: batch.matched,
        enriched: if auto_enrich_enabled { batch.enriched } else { 0 },
        skipped: batch.skipped,
        ambiguous: batch.ambiguous,
        failed: batch.failures.len(),
    };

    let entries = batch
        .entries
        .iter()
        .map(|entry| EnrichmentEntryView {
            card_id: entry.card_id.clone(),
            card_name: entry.card_name.clone(),
            outcome: entry_outcome(entry.outcome, auto_enrich_enabled).to_string(),
            template_id: entry.template_id.clone(),
            confidence: entry.confidence,
            credits_added: if auto_enrich_enabled { entry.credits_added } else { 0 },
        })
        .collect::<Vec<EnrichmentEntryView>>();

    let failures = batch
        .failures
        .iter()
        .map(|failure| EnrichmentFailureView {
            card_id: failure.card_id.clone(),
            card_name: failure.card_name.clone(),
            code: failure.code.clone(),
            message: failure.message.clone(),
        })
        .collect::<Vec<EnrichmentFailureView>>();

    let source = portfolio_source(&portfolio);
    let cards = if auto_enrich_enabled {
        batch.cards
    } else {
        portfolio.cards
    };

    let data = LibraryEnrichData {
        auto_enrich_enabled,
        threshold,
        counts,
        entries,
        failures,
        cards,
        source,
    };
    success("library enrich", data)
}

fn entry_outcome(outcome: EnrichmentOutcome, auto_enrich_enabled: bool) -> &'static str {
    match outcome {
        EnrichmentOutcome::Enriched if !auto_enrich_enabled => "match_only",
        other => other.as_str(),
    }
}

fn template_view(template: &CardTemplate) -> TemplateView {
    TemplateView {
        id: template.id.clone(),
        name: template.name.clone(),
        display_name: get_display_name(&template.name, &template.issuer),
        issuer: template.issuer.clone(),
        annual_fee: Some(template.annual_fee).filter(|fee| *fee >= 0),
        annual_credit_value: annual_credit_value(&template.credits),
        credits: template
            .credits
            .iter()
            .map(|credit| CreditView {
                name: credit.name.clone(),
                amount: credit.amount,
                frequency: credit.frequency.as_str().to_string(),
                notes: credit.notes.clone(),
            })
            .collect(),
    }
}
