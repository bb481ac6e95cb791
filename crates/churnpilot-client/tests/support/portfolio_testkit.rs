use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use churnpilot_client::SuccessEnvelope;
use churnpilot_client::commands::benefits::{self, BenefitsRunOptions};
use churnpilot_client::commands::common::PortfolioRunOptions;
use churnpilot_client::commands::{eligibility, library};
use serde_json::{Value, json};
use tempfile::{Builder, TempDir};

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

pub fn temp_home(prefix: &str) -> std::io::Result<(TempDir, PathBuf)> {
    let dir = Builder::new().prefix(prefix).tempdir()?;
    let home = dir.path().join("churnpilot-home");
    fs::create_dir_all(&home)?;
    Ok((dir, home))
}

pub fn write_home_file(home: &Path, name: &str, body: &Value) {
    let written = fs::write(home.join(name), body.to_string());
    assert!(written.is_ok());
}

/// Personal card record opened on `opened` (YYYY-MM-DD).
pub fn card(id: &str, name: &str, issuer: &str, opened: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "issuer": issuer,
        "opened_date": opened,
    })
}

pub fn business_card(id: &str, name: &str, issuer: &str, opened: &str) -> Value {
    let mut record = card(id, name, issuer, opened);
    record["is_business"] = Value::Bool(true);
    record
}

pub fn portfolio_options<'a>(
    home: &'a Path,
    cards: &[Value],
    today: NaiveDate,
) -> PortfolioRunOptions<'a> {
    PortfolioRunOptions {
        home_override: Some(home),
        stdin_override: Some(Value::Array(cards.to_vec()).to_string()),
        ..PortfolioRunOptions::new("-", today)
    }
}

fn data_of(result: churnpilot_client::ClientResult<SuccessEnvelope>) -> Value {
    assert!(result.is_ok(), "command failed: {result:?}");
    result.map(|envelope| envelope.data).unwrap_or(Value::Null)
}

pub fn status_payload(home: &Path, cards: &[Value], today: NaiveDate) -> Value {
    data_of(eligibility::status(portfolio_options(home, cards, today)))
}

pub fn timeline_payload(home: &Path, cards: &[Value], today: NaiveDate) -> Value {
    data_of(eligibility::timeline(portfolio_options(home, cards, today)))
}

pub fn benefits_payload(home: &Path, cards: &[Value], today: NaiveDate) -> Value {
    data_of(benefits::run(BenefitsRunOptions {
        portfolio: portfolio_options(home, cards, today),
        card_id: None,
    }))
}

pub fn enrich_payload(home: &Path, cards: &[Value], today: NaiveDate) -> Value {
    data_of(library::enrich(portfolio_options(home, cards, today)))
}
