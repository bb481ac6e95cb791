use std::collections::BTreeSet;

use chrono::NaiveDate;
use ulid::Ulid;

use crate::benefits::deadlines::calculate_annual_fee_date;
use crate::library::catalog::CardLibrary;
use crate::library::matcher::{MatchDecision, MatchResult, match_to_library_with_confidence};
use crate::library::normalize::{Issuer, normalize_issuer};
use crate::models::{Card, CardData, CardTemplate, Credit};

pub const ENRICHMENT_FAILED_CODE: &str = "enrichment_failed";
pub const TEMPLATE_NOT_FOUND_CODE: &str = "template_not_found";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnrichmentOutcome {
    Enriched,
    AlreadyEnriched,
    Ambiguous,
    NoMatch,
    Failed,
}

impl EnrichmentOutcome {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Enriched => "enriched",
            Self::AlreadyEnriched => "already_enriched",
            Self::Ambiguous => "ambiguous",
            Self::NoMatch => "no_match",
            Self::Failed => "failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnrichmentEntry {
    pub card_id: String,
    pub card_name: String,
    pub outcome: EnrichmentOutcome,
    pub template_id: Option<String>,
    pub confidence: f64,
    pub credits_added: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichmentFailure {
    pub card_id: String,
    pub card_name: String,
    pub code: String,
    pub message: String,
}

/// Summary of one batch pass. `cards` holds every input card in order, enriched
/// where a match was applied and untouched otherwise.
#[derive(Debug, Clone, Default)]
pub struct BatchEnrichmentResult {
    pub cards: Vec<Card>,
    pub matched: usize,
    pub enriched: usize,
    pub skipped: usize,
    pub ambiguous: usize,
    pub failures: Vec<EnrichmentFailure>,
    pub entries: Vec<EnrichmentEntry>,
}

/// Appends template credits whose names (case-insensitive) are missing from
/// `existing`. Existing credits are never modified or removed.
pub fn merge_template_credits(existing: &[Credit], template_credits: &[Credit]) -> (Vec<Credit>, usize) {
    let mut known_names = existing
        .iter()
        .map(|credit| credit.name.to_lowercase())
        .collect::<BTreeSet<String>>();
    let mut merged = existing.to_vec();
    let mut added = 0usize;

    for credit in template_credits {
        if known_names.insert(credit.name.to_lowercase()) {
            merged.push(credit.clone());
            added += 1;
        }
    }

    (merged, added)
}

pub fn enrich_card_data(data: &CardData, template: &CardTemplate) -> CardData {
    let (credits, added) = merge_template_credits(&data.credits, &template.credits);
    log_additions(&data.name, added);
    CardData {
        credits,
        ..data.clone()
    }
}

/// Merges template credits and records the template on the card.
pub fn enrich_existing_card(card: &Card, template: &CardTemplate) -> Card {
    let (credits, added) = merge_template_credits(&card.credits, &template.credits);
    log_additions(&card.name, added);
    Card {
        credits,
        template_id: Some(template.id.clone()),
        ..card.clone()
    }
}

/// True when the match clears `min_confidence` and points at a template the
/// card is not already enriched from.
pub fn should_enrich_card(card: &Card, result: &MatchResult, min_confidence: f64) -> bool {
    let Some(template_id) = result.template_id.as_deref() else {
        return false;
    };
    if result.confidence < min_confidence {
        return false;
    }
    card.template_id.as_deref() != Some(template_id)
}

/// Builds a new card from extraction output. The template is applied only
/// when the match is unambiguous at `min_confidence`.
pub fn card_from_data(
    data: &CardData,
    library: &CardLibrary,
    min_confidence: f64,
    opened_date: Option<NaiveDate>,
) -> Card {
    let issuer = match normalize_issuer(&data.issuer) {
        Issuer::Other => normalize_issuer(&data.name),
        resolved => resolved,
    };
    let result = match_to_library_with_confidence(library, &data.name, issuer.as_str());

    let mut enriched = data.clone();
    let mut template_id = None;
    if result.decision(min_confidence) == MatchDecision::AutoApply
        && let Some(template) = result.template_id.as_deref().and_then(|id| library.get(id))
    {
        enriched = enrich_card_data(data, template);
        template_id = Some(template.id.clone());
    }

    Card {
        id: format!("card_{}", Ulid::new()),
        issuer: issuer.as_str().to_string(),
        annual_fee: enriched.annual_fee,
        annual_fee_date: opened_date.map(calculate_annual_fee_date),
        opened_date,
        signup_bonus: enriched.signup_bonus,
        credits: enriched.credits,
        template_id,
        ..Card::new("", &enriched.name, "")
    }
}

/// Matches and enriches every card independently; a failing card is recorded
/// and left unchanged without stopping the batch.
pub fn batch_enrich_cards(
    cards: &[Card],
    library: &CardLibrary,
    min_confidence: f64,
) -> BatchEnrichmentResult {
    let mut batch = BatchEnrichmentResult::default();

    for card in cards {
        match enrich_one(card, library, min_confidence) {
            Ok((updated, entry)) => {
                if entry.template_id.is_some() {
                    batch.matched += 1;
                }
                match entry.outcome {
                    EnrichmentOutcome::Enriched => batch.enriched += 1,
                    EnrichmentOutcome::Ambiguous => batch.ambiguous += 1,
                    EnrichmentOutcome::AlreadyEnriched | EnrichmentOutcome::NoMatch => {
                        batch.skipped += 1
                    }
                    EnrichmentOutcome::Failed => {}
                }
                batch.cards.push(updated);
                batch.entries.push(entry);
            }
            Err(failure) => {
                log::warn!(
                    "enrichment failed for {} ({}): {}",
                    failure.card_name,
                    failure.card_id,
                    failure.message
                );
                batch.entries.push(EnrichmentEntry {
                    card_id: failure.card_id.clone(),
                    card_name: failure.card_name.clone(),
                    outcome: EnrichmentOutcome::Failed,
                    template_id: None,
                    confidence: 0.0,
                    credits_added: 0,
                });
                batch.cards.push(card.clone());
                batch.failures.push(failure);
            }
        }
    }

    batch
}

fn enrich_one(
    card: &Card,
    library: &CardLibrary,
    min_confidence: f64,
) -> Result<(Card, EnrichmentEntry), EnrichmentFailure> {
    if card.name.trim().is_empty() {
        return Err(failure(card, ENRICHMENT_FAILED_CODE, "Card has no name to match."));
    }

    let result = match_to_library_with_confidence(library, &card.name, &card.issuer);
    let mut entry = EnrichmentEntry {
        card_id: card.id.clone(),
        card_name: card.name.clone(),
        outcome: EnrichmentOutcome::NoMatch,
        template_id: result.template_id.clone(),
        confidence: result.confidence,
        credits_added: 0,
    };

    let Some(template_id) = result.template_id.as_deref() else {
        return Ok((card.clone(), entry));
    };
    if result.is_ambiguous(min_confidence) {
        entry.outcome = EnrichmentOutcome::Ambiguous;
        return Ok((card.clone(), entry));
    }
    if !should_enrich_card(card, &result, min_confidence) {
        entry.outcome = EnrichmentOutcome::AlreadyEnriched;
        return Ok((card.clone(), entry));
    }

    let Some(template) = library.get(template_id) else {
        return Err(failure(
            card,
            TEMPLATE_NOT_FOUND_CODE,
            &format!("Template `{template_id}` is not in the library."),
        ));
    };

    let updated = enrich_existing_card(card, template);
    entry.outcome = EnrichmentOutcome::Enriched;
    entry.credits_added = updated.credits.len().saturating_sub(card.credits.len());
    Ok((updated, entry))
}

fn failure(card: &Card, code: &str, message: &str) -> EnrichmentFailure {
    EnrichmentFailure {
        card_id: card.id.clone(),
        card_name: card.name.clone(),
        code: code.to_string(),
        message: message.to_string(),
    }
}

fn log_additions(card_name: &str, added: usize) {
    if added > 0 {
        log::info!("{card_name}: added {added} credits from library");
    }
}
