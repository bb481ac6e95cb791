use std::io;

use serde_json::Value;

use super::format::{
    Align, Column, days_field, key_value_rows, render_table_or_blocks, terminal_width, text_field,
};

const COUNTED_COLUMNS: [Column<'static>; 4] = [
    Column {
        name: "Card",
        align: Align::Left,
    },
    Column {
        name: "Opened",
        align: Align::Left,
    },
    Column {
        name: "Drops off",
        align: Align::Left,
    },
    Column {
        name: "In",
        align: Align::Right,
    },
];

pub fn render_status(data: &Value) -> io::Result<String> {
    let counted = data
        .get("cards_counted")
        .and_then(Value::as_array)
        .ok_or_else(|| io::Error::other("five24 status output requires cards_counted"))?;

    let status = text_field(data, "status");
    let mut lines = vec![
        format!("5/24 status as of {}:", text_field(data, "today")),
        String::new(),
    ];
    lines.extend(key_value_rows(
        &[
            (
                "Cards counted:",
                format!("{} of {}", text_field(data, "count"), text_field(data, "limit")),
            ),
            ("Status:", headline(&status).to_string()),
            ("Slots remaining:", text_field(data, "slots_remaining")),
            ("Next drop-off:", drop_off_summary(data)),
            ("Eligible again:", text_field(data, "eligible_again_on")),
            ("Not counted:", text_field(data, "excluded_count")),
        ],
        2,
    ));

    if counted.is_empty() {
        lines.push(String::new());
        lines.push("No personal cards opened in the last 24 months.".to_string());
        return Ok(lines.join("\n"));
    }

    lines.push(String::new());
    lines.push("Counted cards (oldest first):".to_string());
    lines.extend(counted_table(counted));
    Ok(lines.join("\n"))
}

pub fn render_timeline(data: &Value) -> io::Result<String> {
    let entries = data
        .get("entries")
        .and_then(Value::as_array)
        .ok_or_else(|| io::Error::other("five24 timeline output requires entries"))?;

    let mut lines = vec![format!(
        "5/24 drop-off timeline as of {} ({} of {} counted):",
        text_field(data, "today"),
        text_field(data, "count"),
        text_field(data, "limit")
    )];

    if entries.is_empty() {
        lines.push(String::new());
        lines.push("Nothing to drop off: no personal cards in the window.".to_string());
        return Ok(lines.join("\n"));
    }

    lines.push(String::new());
    lines.extend(counted_table(entries));
    Ok(lines.join("\n"))
}

fn headline(status: &str) -> &'static str {
    match status {
        "under" => "under 5/24, new Chase cards are possible",
        "at" => "at 5/24, wait for a drop-off before applying with Chase",
        "over" => "over 5/24, wait for drop-offs before applying with Chase",
        _ => "unknown",
    }
}

fn drop_off_summary(data: &Value) -> String {
    match data.get("next_drop_off").and_then(Value::as_str) {
        Some(date) => format!("{date} ({})", days_field(data, "days_until_drop")),
        None => "-".to_string(),
    }
}

fn counted_table(entries: &[Value]) -> Vec<String> {
    let rows = entries
        .iter()
        .map(|entry| {
            let card = entry.get("card").cloned().unwrap_or(Value::Null);
            vec![
                text_field(&card, "label"),
                text_field(&card, "opened_date"),
                text_field(entry, "drop_off_date"),
                days_field(entry, "days_until_drop"),
            ]
        })
        .collect::<Vec<Vec<String>>>();
    render_table_or_blocks(&COUNTED_COLUMNS, &rows, terminal_width(), "Card")
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{render_status, render_timeline};

    fn counted(label: &str, opened: &str, drop_off: &str, days: i64) -> serde_json::Value {
        json!({
            "card": {"id": label, "name": label, "label": label, "issuer": "Chase", "opened_date": opened, "is_business": false},
            "drop_off_date": drop_off,
            "days_until_drop": days,
        })
    }

    #[test]
    fn status_lists_counted_cards_and_next_drop() {
        let data = json!({
            "today": "2026-10-16",
            "count": 5,
            "limit": 5,
            "status": "at",
            "slots_remaining": 0,
            "next_drop_off": "2027-07-01",
            "days_until_drop": 258,
            "eligible_again_on": "2027-07-01",
            "excluded_count": 1,
            "cards_counted": [counted("Freedom Flex", "2025-06-01", "2027-07-01", 258)],
        });

        let rendered = render_status(&data);
        assert!(rendered.is_ok());
        if let Ok(text) = rendered {
            assert!(text.starts_with("5/24 status as of 2026-10-16:"));
            assert!(text.contains("5 of 5"));
            assert!(text.contains("at 5/24"));
            assert!(text.contains("2027-07-01 (in 258 days)"));
            assert!(text.contains("Counted cards (oldest first):"));
            assert!(text.contains("Freedom Flex"));
        }
    }

    #[test]
    fn empty_status_says_so() {
        let data = json!({
            "today": "2026-10-16",
            "count": 0,
            "limit": 5,
            "status": "under",
            "slots_remaining": 5,
            "next_drop_off": null,
            "days_until_drop": null,
            "eligible_again_on": null,
            "excluded_count": 2,
            "cards_counted": [],
        });

        let rendered = render_status(&data);
        assert!(rendered.is_ok());
        if let Ok(text) = rendered {
            assert!(text.contains("No personal cards opened in the last 24 months."));
        }
    }

    #[test]
    fn timeline_requires_entries() {
        let rendered = render_timeline(&json!({"today": "2026-10-16"}));
        assert!(rendered.is_err());
    }
}
