use std::io;

use serde_json::Value;

use super::format::{
    Align, Column, key_value_rows, money_field, render_table_or_blocks, terminal_width,
    text_field,
};

const TEMPLATE_COLUMNS: [Column<'static>; 5] = [
    Column {
        name: "Template",
        align: Align::Left,
    },
    Column {
        name: "Card",
        align: Align::Left,
    },
    Column {
        name: "Issuer",
        align: Align::Left,
    },
    Column {
        name: "Fee",
        align: Align::Right,
    },
    Column {
        name: "Credits/yr",
        align: Align::Right,
    },
];

const ENTRY_COLUMNS: [Column<'static>; 5] = [
    Column {
        name: "Card",
        align: Align::Left,
    },
    Column {
        name: "Outcome",
        align: Align::Left,
    },
    Column {
        name: "Template",
        align: Align::Left,
    },
    Column {
        name: "Confidence",
        align: Align::Right,
    },
    Column {
        name: "Added",
        align: Align::Right,
    },
];

pub fn render_list(data: &Value) -> io::Result<String> {
    let templates = data
        .get("templates")
        .and_then(Value::as_array)
        .ok_or_else(|| io::Error::other("library list output requires templates"))?;

    if templates.is_empty() {
        return Ok("No card templates match.".to_string());
    }

    let rows = templates
        .iter()
        .map(|template| {
            vec![
                text_field(template, "id"),
                text_field(template, "display_name"),
                text_field(template, "issuer"),
                money_field(template, "annual_fee"),
                money_field(template, "annual_credit_value"),
            ]
        })
        .collect::<Vec<Vec<String>>>();

    let mut lines = vec![format!("Card library ({} templates):", templates.len())];
    lines.push(String::new());
    lines.extend(render_table_or_blocks(
        &TEMPLATE_COLUMNS,
        &rows,
        terminal_width(),
        "Template",
    ));
    lines.push(String::new());
    lines.push("Run `churnpilot library show <template_id>` for credit details.".to_string());
    Ok(lines.join("\n"))
}

pub fn render_show(data: &Value) -> io::Result<String> {
    let credits = data
        .get("credits")
        .and_then(Value::as_array)
        .ok_or_else(|| io::Error::other("library show output requires credits"))?;

    let fee = match data.get("annual_fee") {
        Some(Value::Null) | None => "unverified".to_string(),
        Some(_) => money_field(data, "annual_fee"),
    };
    let mut lines = vec![format!("{}:", text_field(data, "name")), String::new()];
    lines.extend(key_value_rows(
        &[
            ("Template:", text_field(data, "id")),
            ("Issuer:", text_field(data, "issuer")),
            ("Annual fee:", fee),
            (
                "Credit value/yr:",
                money_field(data, "annual_credit_value"),
            ),
        ],
        2,
    ));

    lines.push(String::new());
    if credits.is_empty() {
        lines.push("No credits on this card.".to_string());
        return Ok(lines.join("\n"));
    }

    lines.push("Credits:".to_string());
    for credit in credits {
        let mut line = format!(
            "  - {}: {} {}",
            text_field(credit, "name"),
            money_field(credit, "amount"),
            text_field(credit, "frequency")
        );
        if let Some(notes) = credit.get("notes").and_then(Value::as_str) {
            line.push_str(&format!(" ({notes})"));
        }
        lines.push(line);
    }
    Ok(lines.join("\n"))
}

pub fn render_match(data: &Value) -> io::Result<String> {
    let decision = data
        .get("decision")
        .and_then(Value::as_str)
        .ok_or_else(|| io::Error::other("library match output requires decision"))?;

    let mut lines = vec![format!(
        "Library match for \"{}\" ({}):",
        text_field(data, "name"),
        text_field(data, "normalized_issuer")
    )];
    lines.push(String::new());

    let mut entries = vec![
        ("Display name:", text_field(data, "display_name")),
        ("Template:", text_field(data, "template_id")),
        ("Matched card:", text_field(data, "matched_name")),
        ("Confidence:", confidence_field(data, "confidence")),
    ];
    if data.get("runner_up_confidence").is_some_and(|value| !value.is_null()) {
        entries.push(("Runner-up:", confidence_field(data, "runner_up_confidence")));
    }
    entries.push(("Threshold:", confidence_field(data, "threshold")));
    lines.extend(key_value_rows(&entries, 2));

    lines.push(String::new());
    lines.push(
        match decision {
            "auto_apply" => "Decision: confident match, credits can be applied automatically.",
            "confirm" => "Decision: possible match, confirm before applying.",
            _ => "Decision: no template matches this card.",
        }
        .to_string(),
    );
    Ok(lines.join("\n"))
}

pub fn render_enrich(data: &Value) -> io::Result<String> {
    let counts = data
        .get("counts")
        .ok_or_else(|| io::Error::other("library enrich output requires counts"))?;
    let entries = data
        .get("entries")
        .and_then(Value::as_array)
        .ok_or_else(|| io::Error::other("library enrich output requires entries"))?;
    let failures = data
        .get("failures")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    let mut lines = vec!["Library enrichment:".to_string(), String::new()];
    if data.get("auto_enrich_enabled").and_then(Value::as_bool) == Some(false) {
        lines.push("Auto-enrichment is off; showing matches only.".to_string());
        lines.push(String::new());
    }
    lines.push("Summary:".to_string());
    lines.extend(key_value_rows(
        &[
            ("Cards read:", text_field(counts, "cards")),
            ("Matched:", text_field(counts, "matched")),
            ("Enriched:", text_field(counts, "enriched")),
            ("Already enriched:", text_field(counts, "skipped")),
            ("Need confirmation:", text_field(counts, "ambiguous")),
            ("Failed:", text_field(counts, "failed")),
        ],
        2,
    ));

    if !entries.is_empty() {
        let rows = entries
            .iter()
            .map(|entry| {
                vec![
                    text_field(entry, "card_name"),
                    text_field(entry, "outcome"),
                    text_field(entry, "template_id"),
                    confidence_field(entry, "confidence"),
                    text_field(entry, "credits_added"),
                ]
            })
            .collect::<Vec<Vec<String>>>();
        lines.push(String::new());
        lines.push("Cards:".to_string());
        lines.extend(render_table_or_blocks(
            &ENTRY_COLUMNS,
            &rows,
            terminal_width(),
            "Card",
        ));
    }

    if !failures.is_empty() {
        lines.push(String::new());
        lines.push("Failures:".to_string());
        lines.extend(failures.iter().map(|failure| {
            format!(
                "  - {} [{}]: {} ({})",
                text_field(failure, "card_name"),
                text_field(failure, "card_id"),
                text_field(failure, "message"),
                text_field(failure, "code")
            )
        }));
    }

    lines.push(String::new());
    lines.push("Run with `--json` to get the enriched cards.".to_string());
    Ok(lines.join("\n"))
}

fn confidence_field(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_f64)
        .map(|confidence| format!("{:.0}%", confidence * 100.0))
        .unwrap_or_else(|| "-".to_string())
}
