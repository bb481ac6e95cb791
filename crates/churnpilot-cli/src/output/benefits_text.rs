use std::io;

use serde_json::Value;

use super::format::{
    Align, Column, days_field, key_value_rows, money_field, render_table_or_blocks,
    terminal_width, text_field,
};

const CREDIT_COLUMNS: [Column<'static>; 5] = [
    Column {
        name: "Credit",
        align: Align::Left,
    },
    Column {
        name: "Amount",
        align: Align::Right,
    },
    Column {
        name: "Period",
        align: Align::Left,
    },
    Column {
        name: "Resets",
        align: Align::Left,
    },
    Column {
        name: "State",
        align: Align::Left,
    },
];

pub fn render_benefits(data: &Value) -> io::Result<String> {
    let summary = data
        .get("summary")
        .ok_or_else(|| io::Error::other("benefits output requires summary"))?;
    let cards = data
        .get("cards")
        .and_then(Value::as_array)
        .ok_or_else(|| io::Error::other("benefits output requires cards"))?;

    let mut lines = vec![
        format!("Benefits as of {}:", text_field(data, "today")),
        String::new(),
        "Summary:".to_string(),
    ];
    lines.extend(key_value_rows(
        &[
            ("Cards:", text_field(summary, "card_count")),
            ("Credits tracked:", text_field(summary, "credit_count")),
            (
                "Unused this period:",
                format!(
                    "{} across {} cards",
                    text_field(summary, "pending_reminders"),
                    text_field(summary, "cards_with_pending_reminders")
                ),
            ),
            (
                "Annual credit value:",
                money_field(summary, "total_annual_credit_value"),
            ),
            ("Annual fees:", money_field(summary, "total_annual_fees")),
        ],
        2,
    ));

    if cards.is_empty() {
        lines.push(String::new());
        lines.push("No cards in this portfolio.".to_string());
        return Ok(lines.join("\n"));
    }

    for card in cards {
        lines.push(String::new());
        lines.extend(render_card(card));
    }
    Ok(lines.join("\n"))
}

fn render_card(card: &Value) -> Vec<String> {
    let summary = card.get("card").cloned().unwrap_or(Value::Null);
    let mut lines = vec![format!(
        "{} [{}]",
        text_field(&summary, "label"),
        text_field(&summary, "id")
    )];

    let mut facts = Vec::new();
    if let Some(date) = card.get("annual_fee_date").and_then(Value::as_str) {
        facts.push((
            "Annual fee:",
            format!(
                "{} due {date} ({})",
                money_field(card, "annual_fee"),
                days_field(card, "days_until_annual_fee")
            ),
        ));
    }
    if let Some(bonus) = card.get("signup_bonus").filter(|bonus| !bonus.is_null()) {
        facts.push(("Sign-up bonus:", signup_bonus_summary(bonus)));
    }
    if card.get("card_snoozed").and_then(Value::as_bool) == Some(true) {
        facts.push((
            "Reminders:",
            format!("snoozed until {}", text_field(card, "benefits_snoozed_until")),
        ));
    }
    lines.extend(key_value_rows(&facts, 2));

    let credits = card
        .get("credits")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();
    if credits.is_empty() {
        lines.push("  No credits tracked.".to_string());
        return lines;
    }

    let rows = credits
        .iter()
        .map(|credit| {
            vec![
                text_field(credit, "name"),
                money_field(credit, "amount"),
                text_field(credit, "period"),
                days_field(credit, "days_left_in_period"),
                credit_state(credit).to_string(),
            ]
        })
        .collect::<Vec<Vec<String>>>();
    lines.extend(render_table_or_blocks(
        &CREDIT_COLUMNS,
        &rows,
        terminal_width(),
        "Credit",
    ));
    lines
}

fn credit_state(credit: &Value) -> &'static str {
    let flag = |key: &str| credit.get(key).and_then(Value::as_bool) == Some(true);
    if flag("used") {
        "used"
    } else if flag("needs_reminder") {
        "unused"
    } else {
        "snoozed"
    }
}

fn signup_bonus_summary(bonus: &Value) -> String {
    let status = text_field(bonus, "status");
    let reward = text_field(bonus, "points_or_cash");
    match bonus.get("deadline").and_then(Value::as_str) {
        Some(deadline) if status != "achieved" => format!(
            "{reward}, spend {} by {deadline} ({}, {status})",
            money_field(bonus, "spend_requirement"),
            days_field(bonus, "days_left")
        ),
        _ => format!("{reward} ({status})"),
    }
}
