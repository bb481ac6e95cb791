mod support;

use churnpilot_client::CardData;
use churnpilot_client::CardLibrary;
use churnpilot_client::commands::library::{self, LibraryMatchOptions};
use churnpilot_client::library::enrich::card_from_data;
use serde_json::json;
use support::portfolio_testkit::{card, date, enrich_payload, temp_home, write_home_file};

fn platinum_catalog() -> serde_json::Value {
    json!([{
        "id": "amex_platinum",
        "name": "Platinum Card",
        "issuer": "American Express",
        "annual_fee": 895,
        "credits": [
            {"name": "Uber Cash", "amount": 15, "frequency": "monthly"},
            {"name": "Saks Credit", "amount": 50, "frequency": "semi-annual"}
        ]
    }])
}

#[test]
fn enrichment_never_overwrites_an_existing_credit() {
    let home = temp_home("churnpilot-enrich-merge");
    assert!(home.is_ok());
    if let Ok((_dir, home)) = home {
        write_home_file(&home, "templates.json", &platinum_catalog());
        let mut platinum = card("plat", "Platinum Card", "American Express", "2026-03-10");
        platinum["credits"] = json!([{"name": "uber cash", "amount": 5, "frequency": "monthly"}]);

        let payload = enrich_payload(&home, &[platinum], date(2026, 10, 16));
        assert_eq!(payload["counts"]["enriched"], 1);
        assert_eq!(payload["entries"][0]["outcome"], "enriched");
        assert_eq!(payload["entries"][0]["credits_added"], 1);

        let credits = &payload["cards"][0]["credits"];
        assert_eq!(credits.as_array().map(Vec::len), Some(2));
        assert_eq!(credits[0]["name"], "uber cash");
        assert_eq!(credits[0]["amount"], 5.0);
        assert_eq!(credits[1]["name"], "Saks Credit");
        assert_eq!(payload["cards"][0]["template_id"], "amex_platinum");
    }
}

#[test]
fn batch_reports_each_outcome_without_stopping() {
    let home = temp_home("churnpilot-enrich-batch");
    assert!(home.is_ok());
    if let Ok((_dir, home)) = home {
        let mut enriched_before = card("csr", "Chase Sapphire Reserve", "Chase", "2025-05-01");
        enriched_before["template_id"] = json!("chase_sapphire_reserve");
        let cards = [
            enriched_before,
            card("sapphire", "Sapphire", "Chase", "2025-06-01"),
            card("mystery", "Mystery Rewards", "Credit Union of Nowhere", "2025-07-01"),
            card("vx", "Venture X", "Capital One", "2025-08-01"),
        ];

        let payload = enrich_payload(&home, &cards, date(2026, 10, 16));
        let counts = &payload["counts"];
        assert_eq!(counts["cards"], 4);
        assert_eq!(counts["enriched"], 1);
        assert_eq!(counts["ambiguous"], 1);
        assert_eq!(counts["skipped"], 2);
        assert_eq!(counts["failed"], 0);

        let outcomes = payload["entries"]
            .as_array()
            .map(|entries| {
                entries
                    .iter()
                    .filter_map(|entry| entry["outcome"].as_str().map(str::to_string))
                    .collect::<Vec<String>>()
            })
            .unwrap_or_default();
        assert_eq!(
            outcomes,
            vec![
                "already_enriched".to_string(),
                "ambiguous".to_string(),
                "no_match".to_string(),
                "enriched".to_string(),
            ]
        );
        assert_eq!(payload["cards"][3]["credits"].as_array().map(Vec::len), Some(2));
        assert_eq!(payload["cards"][1]["credits"].as_array().map(Vec::len), Some(0));
    }
}

#[test]
fn raising_the_threshold_turns_auto_apply_into_confirm() {
    let home = temp_home("churnpilot-enrich-threshold");
    assert!(home.is_ok());
    if let Ok((_dir, home)) = home {
        let lenient = library::match_card(LibraryMatchOptions {
            name: "Venture X".to_string(),
            issuer: Some("Capital One".to_string()),
            home_override: Some(&home),
        });
        assert!(lenient.is_ok());
        if let Ok(envelope) = lenient {
            assert_eq!(envelope.data["template_id"], "capital_one_venture_x");
            assert_eq!(envelope.data["decision"], "auto_apply");
        }

        write_home_file(&home, "preferences.json", &json!({"enrichment_min_confidence": 0.95}));
        let strict = library::match_card(LibraryMatchOptions {
            name: "Venture X".to_string(),
            issuer: Some("Capital One".to_string()),
            home_override: Some(&home),
        });
        assert!(strict.is_ok());
        if let Ok(envelope) = strict {
            assert_eq!(envelope.data["threshold"], 0.95);
            assert_eq!(envelope.data["decision"], "confirm");
        }
    }
}

#[test]
fn card_from_extraction_output_resolves_issuer_and_template() {
    let library = CardLibrary::builtin();
    let data = CardData {
        name: "Chase Sapphire Reserve".to_string(),
        issuer: String::new(),
        annual_fee: 795,
        signup_bonus: None,
        credits: Vec::new(),
    };

    let created = card_from_data(&data, &library, 0.7, Some(date(2024, 2, 29)));
    assert!(created.id.starts_with("card_"));
    assert_eq!(created.issuer, "Chase");
    assert_eq!(created.template_id.as_deref(), Some("chase_sapphire_reserve"));
    assert_eq!(created.credits.len(), 2);
    assert_eq!(created.annual_fee_date, Some(date(2025, 2, 28)));
}
