use serde::Serialize;

use crate::models::Card;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PortfolioIssue {
    pub row: i64,
    pub field: String,
    pub code: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PortfolioSource {
    pub kind: String,
    pub path: Option<String>,
    pub format: String,
    pub card_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct CardSummary {
    pub id: String,
    pub name: String,
    pub label: String,
    pub issuer: String,
    pub opened_date: Option<String>,
    pub is_business: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct CountedCard {
    pub card: CardSummary,
    pub drop_off_date: String,
    pub days_until_drop: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct FiveTwentyFourStatusData {
    pub today: String,
    pub count: usize,
    pub limit: usize,
    pub status: String,
    pub slots_remaining: usize,
    pub next_drop_off: Option<String>,
    pub days_until_drop: Option<i64>,
    pub eligible_again_on: Option<String>,
    pub cards_counted: Vec<CountedCard>,
    pub excluded_count: usize,
    pub source: PortfolioSource,
}

#[derive(Debug, Clone, Serialize)]
pub struct FiveTwentyFourTimelineData {
    pub today: String,
    pub count: usize,
    pub limit: usize,
    pub entries: Vec<CountedCard>,
    pub source: PortfolioSource,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreditStateView {
    pub name: String,
    pub amount: f64,
    pub frequency: String,
    pub period: String,
    pub period_label: String,
    pub days_left_in_period: i64,
    pub used: bool,
    pub reminder_snoozed: bool,
    pub needs_reminder: bool,
    pub annual_value: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SignupBonusView {
    pub status: String,
    pub points_or_cash: String,
    pub spend_requirement: f64,
    pub deadline: Option<String>,
    pub days_left: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CardBenefitsView {
    pub card: CardSummary,
    pub annual_fee: i64,
    pub annual_fee_date: Option<String>,
    pub days_until_annual_fee: Option<i64>,
    pub annual_credit_value: f64,
    pub benefits_snoozed_until: Option<String>,
    pub card_snoozed: bool,
    pub pending_reminders: usize,
    pub signup_bonus: Option<SignupBonusView>,
    pub credits: Vec<CreditStateView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BenefitsSummary {
    pub card_count: usize,
    pub credit_count: usize,
    pub pending_reminders: usize,
    pub cards_with_pending_reminders: usize,
    pub total_annual_credit_value: f64,
    pub total_annual_fees: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct BenefitsData {
    pub today: String,
    pub summary: BenefitsSummary,
    pub cards: Vec<CardBenefitsView>,
    pub source: PortfolioSource,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreditView {
    pub name: String,
    pub amount: f64,
    pub frequency: String,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TemplateView {
    pub id: String,
    pub name: String,
    pub display_name: String,
    pub issuer: String,
    /// `None` when the catalog has no verified fee.
    pub annual_fee: Option<i64>,
    pub annual_credit_value: f64,
    pub credits: Vec<CreditView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LibraryListData {
    pub count: usize,
    pub templates: Vec<TemplateView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LibraryMatchData {
    pub name: String,
    pub issuer: Option<String>,
    pub normalized_issuer: String,
    pub display_name: String,
    pub template_id: Option<String>,
    pub confidence: f64,
    pub runner_up_confidence: Option<f64>,
    pub matched_name: Option<String>,
    pub matched_issuer: Option<String>,
    pub threshold: f64,
    pub ambiguous: bool,
    pub decision: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct EnrichmentEntryView {
    pub card_id: String,
    pub card_name: String,
    pub outcome: String,
    pub template_id: Option<String>,
    pub confidence: f64,
    pub credits_added: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct EnrichmentFailureView {
    pub card_id: String,
    pub card_name: String,
    pub code: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct EnrichmentCounts {
    pub cards: usize,
    pub matched: usize,
    pub enriched: usize,
    pub skipped: usize,
    pub ambiguous: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct LibraryEnrichData {
    pub auto_enrich_enabled: bool,
    pub threshold: f64,
    pub counts: EnrichmentCounts,
    pub entries: Vec<EnrichmentEntryView>,
    pub failures: Vec<EnrichmentFailureView>,
    pub cards: Vec<Card>,
    pub source: PortfolioSource,
}
