use std::collections::BTreeMap;

use crate::benefits::period::Frequency;
use crate::models::{CardTemplate, Credit};

/// Immutable template catalog keyed by template id.
///
/// Built once and passed by reference into matching and enrichment so tests
/// can substitute a smaller fixture catalog.
#[derive(Debug, Clone, Default)]
pub struct CardLibrary {
    templates: BTreeMap<String, CardTemplate>,
}

impl CardLibrary {
    pub fn from_templates(templates: Vec<CardTemplate>) -> Self {
        Self {
            templates: templates
                .into_iter()
                .map(|template| (template.id.clone(), template))
                .collect(),
        }
    }

    pub fn get(&self, template_id: &str) -> Option<&CardTemplate> {
        self.templates.get(template_id)
    }

    /// All templates ordered by id.
    pub fn all(&self) -> impl Iterator<Item = &CardTemplate> {
        self.templates.values()
    }

    /// `(id, "Name (Issuer)")` pairs for pickers.
    pub fn choices(&self) -> Vec<(String, String)> {
        self.all()
            .map(|template| {
                (
                    template.id.clone(),
                    format!("{} ({})", template.name, template.issuer),
                )
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn builtin() -> Self {
        Self::from_templates(builtin_templates())
    }
}

fn template(id: &str, name: &str, issuer: &str, annual_fee: i64, credits: Vec<Credit>) -> CardTemplate {
    CardTemplate {
        id: id.to_string(),
        name: name.to_string(),
        issuer: issuer.to_string(),
        annual_fee,
        credits,
    }
}

// An annual fee of -1 marks a product whose fee has not been verified yet.
fn builtin_templates() -> Vec<CardTemplate> {
    vec![
        template("amex_platinum", "Platinum Card", "American Express", -1, Vec::new()),
        template(
            "amex_gold",
            "The American Express® Gold Card",
            "American Express",
            -1,
            Vec::new(),
        ),
        template(
            "amex_green",
            "American Express Green Card",
            "American Express",
            -1,
            Vec::new(),
        ),
        template(
            "amex_blue_cash_preferred",
            "Blue Cash Preferred Card from American Express",
            "American Express",
            -1,
            Vec::new(),
        ),
        template(
            "chase_sapphire_preferred",
            "Chase Sapphire Preferred Credit Card",
            "Chase",
            95,
            vec![
                Credit::new("Chase Travel Hotel Credit", 50.0, Frequency::Annual).with_notes(
                    "Statement credits for hotel stays purchased through Chase Travel",
                ),
            ],
        ),
        template(
            "chase_sapphire_reserve",
            "Chase Sapphire Reserve",
            "Chase",
            795,
            vec![
                Credit::new("Annual Travel Credit", 300.0, Frequency::Annual).with_notes(
                    "Statement credits for travel purchases each account anniversary year",
                ),
                Credit::new("The Edit Credit", 500.0, Frequency::Annual).with_notes(
                    "Up to $250 from January through June and again from July through December for prepaid bookings with The Edit. Two-night minimum.",
                ),
            ],
        ),
        template(
            "chase_freedom_unlimited",
            "Chase Freedom Unlimited Credit Card",
            "Chase",
            0,
            Vec::new(),
        ),
        template(
            "chase_freedom_flex",
            "Chase Freedom Flex Credit Card",
            "Chase",
            0,
            Vec::new(),
        ),
        template(
            "chase_ink_preferred",
            "Ink Business Preferred Credit Card",
            "Chase",
            95,
            Vec::new(),
        ),
        template(
            "capital_one_venture_x",
            "Venture X Rewards Card",
            "Capital One",
            -1,
            vec![
                Credit::new("Capital One Travel Credit", 300.0, Frequency::Annual)
                    .with_notes("Only usable on Capital One travel portal"),
                Credit::new("Global Entry/TSA PreCheck Credit", 120.0, Frequency::Annual)
                    .with_notes("Statement credit, one per account every four years"),
            ],
        ),
        template(
            "capital_one_venture",
            "Capital One Venture Rewards Credit Card",
            "Capital One",
            -1,
            Vec::new(),
        ),
        template(
            "capital_one_savor_one",
            "SavorOne Rewards Credit Card",
            "Capital One",
            -1,
            Vec::new(),
        ),
        template(
            "citi_premier",
            "Citi Strata Premier Card",
            "Citi",
            95,
            vec![
                Credit::new("Annual Hotel Benefit", 100.0, Frequency::Annual).with_notes(
                    "Once per calendar year, $100 off a single hotel stay of $500 or more booked through cititravel.com",
                ),
            ],
        ),
        template("citi_custom_cash", "Citi Custom Cash Card", "Citi", 0, Vec::new()),
        template("citi_double_cash", "Citi Double Cash Card", "Citi", 0, Vec::new()),
        template(
            "us_bank_altitude_reserve",
            "U.S. Bank Cash+® Visa Signature® Card",
            "US Bank",
            0,
            Vec::new(),
        ),
        template(
            "wells_fargo_autograph",
            "Wells Fargo Autograph Card",
            "Wells Fargo",
            0,
            Vec::new(),
        ),
        template("bilt_mastercard", "Bilt Blue Card", "Bilt", 0, Vec::new()),
    ]
}

#[cfg(test)]
mod tests {
    use super::CardLibrary;

    #[test]
    fn builtin_catalog_is_keyed_and_ordered_by_id() {
        let library = CardLibrary::builtin();
        assert_eq!(library.len(), 18);
        let ids = library.all().map(|template| template.id.as_str()).collect::<Vec<&str>>();
        let mut sorted = ids.clone();
        sorted.sort_unstable();
        assert_eq!(ids, sorted);
        assert!(library.get("chase_sapphire_reserve").is_some());
        assert!(library.get("unknown").is_none());
    }

    #[test]
    fn choices_use_template_fields() {
        let library = CardLibrary::builtin();
        assert_eq!(library.choices().len(), library.len());
        assert!(
            library
                .choices()
                .contains(&("citi_premier".to_string(), "Citi Strata Premier Card (Citi)".to_string()))
        );
    }
}
