use std::collections::BTreeSet;

use crate::library::catalog::CardLibrary;
use crate::library::normalize::{Issuer, normalize_issuer, normalize_words, simplify_card_name};
use crate::models::CardTemplate;

const EXACT_CONFIDENCE: f64 = 1.0;
const SUBSTRING_CONFIDENCE: f64 = 0.9;
const MIN_CANDIDATE_CONFIDENCE: f64 = 0.3;
const RUNNER_UP_MARGIN: f64 = 0.05;

#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    pub template_id: Option<String>,
    pub confidence: f64,
    pub matched_name: Option<String>,
    pub matched_issuer: Option<String>,
    pub runner_up_confidence: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchDecision {
    AutoApply,
    Confirm,
    NoMatch,
}

impl MatchDecision {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AutoApply => "auto_apply",
            Self::Confirm => "confirm",
            Self::NoMatch => "no_match",
        }
    }
}

impl MatchResult {
    pub fn no_match() -> Self {
        Self {
            template_id: None,
            confidence: 0.0,
            matched_name: None,
            matched_issuer: None,
            runner_up_confidence: None,
        }
    }

    /// A candidate exists but is either under `threshold` or nearly tied
    /// with the runner-up.
    pub fn is_ambiguous(&self, threshold: f64) -> bool {
        if self.template_id.is_none() {
            return false;
        }
        if self.confidence < threshold {
            return true;
        }
        self.confidence < EXACT_CONFIDENCE
            && self
                .runner_up_confidence
                .is_some_and(|runner_up| self.confidence - runner_up <= RUNNER_UP_MARGIN)
    }

    pub fn decision(&self, threshold: f64) -> MatchDecision {
        if self.template_id.is_none() {
            MatchDecision::NoMatch
        } else if self.is_ambiguous(threshold) {
            MatchDecision::Confirm
        } else {
            MatchDecision::AutoApply
        }
    }
}

/// Deterministic lookup: exact simplified-name equality first, then the first
/// template (by id) whose simplified name contains or is contained in `name`.
pub fn match_to_library_template(library: &CardLibrary, name: &str, issuer: &str) -> Option<String> {
    let target_issuer = resolve_issuer(name, issuer);
    let key = name_key(name, target_issuer.as_str())?;

    let candidates = candidates_for(library, target_issuer)
        .filter_map(|template| Some((template, template_key(template)?)))
        .collect::<Vec<(&CardTemplate, String)>>();

    if let Some((template, _)) = candidates.iter().find(|(_, candidate)| *candidate == key) {
        return Some(template.id.clone());
    }

    candidates
        .iter()
        .find(|(_, candidate)| contains_either(candidate, &key))
        .map(|(template, _)| template.id.clone())
}

/// Scores every same-issuer template and keeps the best and runner-up scores.
/// The auto-apply threshold belongs to the caller (see [`MatchResult::decision`]).
pub fn match_to_library_with_confidence(library: &CardLibrary, name: &str, issuer: &str) -> MatchResult {
    let target_issuer = resolve_issuer(name, issuer);
    let Some(key) = name_key(name, target_issuer.as_str()) else {
        return MatchResult::no_match();
    };

    let mut best: Option<(&CardTemplate, f64)> = None;
    let mut runner_up: Option<f64> = None;
    for template in candidates_for(library, target_issuer) {
        let Some(candidate) = template_key(template) else {
            continue;
        };
        let score = score_names(&key, &candidate);
        match best {
            Some((_, best_score)) if score <= best_score => {
                if runner_up.is_none_or(|current| score > current) {
                    runner_up = Some(score);
                }
            }
            Some((_, best_score)) => {
                runner_up = Some(best_score);
                best = Some((template, score));
            }
            None => best = Some((template, score)),
        }
    }

    let result = match best {
        Some((template, score)) if score >= MIN_CANDIDATE_CONFIDENCE => MatchResult {
            template_id: Some(template.id.clone()),
            confidence: score,
            matched_name: Some(template.name.clone()),
            matched_issuer: Some(template.issuer.clone()),
            runner_up_confidence: runner_up,
        },
        _ => MatchResult::no_match(),
    };

    log::debug!(
        "matched {:?} ({}) to {:?} with confidence {:.2}",
        name,
        target_issuer.as_str(),
        result.template_id,
        result.confidence
    );
    result
}

/// Card names often bleed into the issuer field, so an unrecognized issuer
/// falls back to the card name.
fn resolve_issuer(name: &str, issuer: &str) -> Issuer {
    match normalize_issuer(issuer) {
        Issuer::Other => normalize_issuer(name),
        resolved => resolved,
    }
}

fn candidates_for(library: &CardLibrary, issuer: Issuer) -> impl Iterator<Item = &CardTemplate> {
    library
        .all()
        .filter(move |template| issuer != Issuer::Other && normalize_issuer(&template.issuer) == issuer)
}

fn name_key(name: &str, issuer: &str) -> Option<String> {
    normalize_words(&simplify_card_name(name, issuer))
}

fn template_key(template: &CardTemplate) -> Option<String> {
    name_key(&template.name, &template.issuer)
}

fn contains_either(left: &str, right: &str) -> bool {
    let padded_left = format!(" {left} ");
    let padded_right = format!(" {right} ");
    padded_left.contains(&padded_right) || padded_right.contains(&padded_left)
}

fn score_names(key: &str, candidate: &str) -> f64 {
    if key == candidate {
        return EXACT_CONFIDENCE;
    }
    let similarity = token_overlap(key, candidate).max(edit_ratio(key, candidate));
    if contains_either(key, candidate) {
        return similarity.max(SUBSTRING_CONFIDENCE);
    }
    similarity.clamp(0.0, 1.0)
}

/// Dice coefficient over word sets.
fn token_overlap(left: &str, right: &str) -> f64 {
    let left_tokens = left.split(' ').collect::<BTreeSet<&str>>();
    let right_tokens = right.split(' ').collect::<BTreeSet<&str>>();
    let total = left_tokens.len() + right_tokens.len();
    if total == 0 {
        return 0.0;
    }
    let shared = left_tokens.intersection(&right_tokens).count();
    (2 * shared) as f64 / total as f64
}

fn edit_ratio(left: &str, right: &str) -> f64 {
    let longest = left.chars().count().max(right.chars().count());
    if longest == 0 {
        return 0.0;
    }
    1.0 - levenshtein_distance(left, right) as f64 / longest as f64
}

fn levenshtein_distance(left: &str, right: &str) -> usize {
    if left == right {
        return 0;
    }
    let right_chars = right.chars().collect::<Vec<char>>();
    if left.is_empty() {
        return right_chars.len();
    }
    if right_chars.is_empty() {
        return left.chars().count();
    }

    let mut previous = (0..=right_chars.len()).collect::<Vec<usize>>();
    for (left_index, left_char) in left.chars().enumerate() {
        let mut current = Vec::with_capacity(right_chars.len() + 1);
        current.push(left_index + 1);
        for (right_index, right_char) in right_chars.iter().enumerate() {
            let insertion = current[right_index] + 1;
            let deletion = previous[right_index + 1] + 1;
            let substitution = previous[right_index] + usize::from(left_char != *right_char);
            current.push(insertion.min(deletion).min(substitution));
        }
        previous = current;
    }

    previous[right_chars.len()]
}
