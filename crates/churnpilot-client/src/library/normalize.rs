use crate::models::Card;

/// Canonical issuer vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Issuer {
    AmericanExpress,
    Chase,
    Citi,
    CapitalOne,
    Discover,
    BankOfAmerica,
    WellsFargo,
    UsBank,
    Barclays,
    Bilt,
    Other,
}

impl Issuer {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AmericanExpress => "American Express",
            Self::Chase => "Chase",
            Self::Citi => "Citi",
            Self::CapitalOne => "Capital One",
            Self::Discover => "Discover",
            Self::BankOfAmerica => "Bank of America",
            Self::WellsFargo => "Wells Fargo",
            Self::UsBank => "US Bank",
            Self::Barclays => "Barclays",
            Self::Bilt => "Bilt",
            Self::Other => "Other",
        }
    }

    /// Normalized phrases that name the issuer itself.
    const fn name_phrases(self) -> &'static [&'static str] {
        match self {
            Self::AmericanExpress => &["american express", "amex"],
            Self::Chase => &["chase", "jpmorgan chase"],
            Self::Citi => &["citi", "citibank"],
            Self::CapitalOne => &["capital one", "capitalone", "cap one", "cap1"],
            Self::Discover => &["discover"],
            Self::BankOfAmerica => &["bank of america", "bofa", "boa"],
            Self::WellsFargo => &["wells fargo", "wellsfargo"],
            Self::UsBank => &["us bank", "u s bank", "usbank"],
            Self::Barclays => &["barclays", "barclaycard"],
            Self::Bilt => &["bilt"],
            Self::Other => &[],
        }
    }

    /// Product names that identify the issuer when the issuer is not spelled out.
    const fn product_phrases(self) -> &'static [&'static str] {
        match self {
            Self::AmericanExpress => &["blue cash", "blue business", "delta skymiles", "hilton honors"],
            Self::Chase => &["sapphire", "freedom", "ink business", "ink cash", "ink preferred"],
            Self::Citi => &["strata", "double cash", "custom cash", "aadvantage"],
            Self::CapitalOne => &["venture", "savorone", "savor", "quicksilver", "spark"],
            Self::Discover => &["discover it"],
            Self::BankOfAmerica => &["customized cash", "travel rewards", "premium rewards"],
            Self::WellsFargo => &["autograph", "active cash"],
            Self::UsBank => &["altitude", "cash+"],
            Self::Barclays => &["aviator"],
            Self::Bilt => &[],
            Self::Other => &[],
        }
    }
}

/// Issuer-name checks run in this order, then product checks in the same
/// order. Multi-issuer strings such as "Bilt Mastercard issued by Wells Fargo"
/// resolve to the earlier entry.
const ISSUER_PRIORITY: [Issuer; 10] = [
    Issuer::Bilt,
    Issuer::AmericanExpress,
    Issuer::CapitalOne,
    Issuer::BankOfAmerica,
    Issuer::WellsFargo,
    Issuer::UsBank,
    Issuer::Barclays,
    Issuer::Discover,
    Issuer::Citi,
    Issuer::Chase,
];

/// Maps a free-text issuer or full card name to the canonical vocabulary.
pub fn normalize_issuer(raw: &str) -> Issuer {
    let Some(text) = normalize_words(raw) else {
        return Issuer::Other;
    };

    for issuer in ISSUER_PRIORITY {
        if issuer
            .name_phrases()
            .iter()
            .any(|phrase| contains_phrase(&text, phrase))
        {
            return issuer;
        }
    }

    for issuer in ISSUER_PRIORITY {
        if issuer
            .product_phrases()
            .iter()
            .any(|phrase| contains_phrase(&text, &normalize_words(phrase).unwrap_or_default()))
        {
            return issuer;
        }
    }

    Issuer::Other
}

const BOILERPLATE_PHRASES: [&str; 4] = [
    "from american express",
    "credit card",
    "visa signature",
    "world elite mastercard",
];
const TRADEMARK_GLYPHS: [char; 4] = ['®', '™', '℠', '©'];

/// Strips issuer names, trademark glyphs and boilerplate ("Credit Card",
/// "from American Express", a trailing "Card") for compact display.
pub fn simplify_card_name(name: &str, issuer: &str) -> String {
    let mut working = name
        .chars()
        .filter(|character| !TRADEMARK_GLYPHS.contains(character))
        .collect::<String>();

    for phrase in BOILERPLATE_PHRASES {
        working = remove_phrase(&working, phrase);
    }

    let canonical = normalize_issuer(issuer);
    let mut issuer_spellings = vec![issuer.trim().to_string(), canonical.as_str().to_string()];
    issuer_spellings.extend(canonical.name_phrases().iter().map(|phrase| phrase.to_string()));
    if canonical == Issuer::UsBank {
        issuer_spellings.push("u.s. bank".to_string());
    }
    issuer_spellings.sort_by_key(|spelling| std::cmp::Reverse(spelling.len()));
    for spelling in issuer_spellings.iter().filter(|spelling| !spelling.is_empty()) {
        working = remove_phrase(&working, spelling);
    }

    let mut words = working.split_whitespace().collect::<Vec<&str>>();
    if words.first().is_some_and(|word| word.eq_ignore_ascii_case("the")) {
        words.remove(0);
    }
    if words.len() > 1 && words.last().is_some_and(|word| word.eq_ignore_ascii_case("card")) {
        words.pop();
    }

    let simplified = words.join(" ");
    if simplified.is_empty() {
        return name.trim().to_string();
    }
    simplified
}

pub fn get_display_name(name: &str, issuer: &str) -> String {
    simplify_card_name(name, issuer)
}

/// Display label that puts a user nickname first when present.
pub fn card_label(card: &Card) -> String {
    let display_name = get_display_name(&card.name, &card.issuer);
    match card.nickname.as_deref().map(str::trim) {
        Some(nickname) if !nickname.is_empty() => format!("{nickname} ({display_name})"),
        _ => display_name,
    }
}

/// Lowercase alphanumeric words separated by single spaces; `+` is kept so
/// product names like "Cash+" survive.
pub fn normalize_words(value: &str) -> Option<String> {
    let mut output = String::new();
    let mut previous_space = false;
    for character in value.trim().chars() {
        if character.is_alphanumeric() || character == '+' {
            output.extend(character.to_lowercase());
            previous_space = false;
        } else if !previous_space {
            output.push(' ');
            previous_space = true;
        }
    }

    let normalized = output.trim().to_string();
    if normalized.is_empty() {
        return None;
    }
    Some(normalized)
}

fn contains_phrase(text: &str, phrase: &str) -> bool {
    if phrase.is_empty() {
        return false;
    }
    format!(" {text} ").contains(&format!(" {phrase} "))
}

/// Case-insensitive removal of whole-word occurrences of `phrase`.
fn remove_phrase(value: &str, phrase: &str) -> String {
    let lower_value = value.to_ascii_lowercase();
    let lower_phrase = phrase.to_ascii_lowercase();
    if lower_phrase.is_empty() {
        return value.to_string();
    }

    let mut output = String::with_capacity(value.len());
    let mut cursor = 0usize;
    while let Some(offset) = lower_value[cursor..].find(&lower_phrase) {
        let start = cursor + offset;
        let end = start + lower_phrase.len();
        let boundary_before = value[..start]
            .chars()
            .next_back()
            .is_none_or(|character| !character.is_alphanumeric());
        let boundary_after = value[end..]
            .chars()
            .next()
            .is_none_or(|character| !character.is_alphanumeric());

        if boundary_before && boundary_after {
            output.push_str(&value[cursor..start]);
            output.push(' ');
        } else {
            output.push_str(&value[cursor..end]);
        }
        cursor = end;
    }
    output.push_str(&value[cursor..]);
    output
}

#[cfg(test)]
mod tests {
    use super::{Issuer, card_label, get_display_name, normalize_issuer, simplify_card_name};
    use crate::models::Card;

    #[test]
    fn issuer_names_resolve_case_insensitively() {
        assert_eq!(normalize_issuer("Chase Sapphire Preferred Credit Card"), Issuer::Chase);
        assert_eq!(normalize_issuer("AMEX"), Issuer::AmericanExpress);
        assert_eq!(normalize_issuer("u.s. bank"), Issuer::UsBank);
        assert_eq!(normalize_issuer("Capital One Spark Cash"), Issuer::CapitalOne);
        assert_eq!(normalize_issuer("Bank of America Customized Cash"), Issuer::BankOfAmerica);
        assert_eq!(normalize_issuer(""), Issuer::Other);
        assert_eq!(normalize_issuer("Some Credit Union"), Issuer::Other);
    }

    #[test]
    fn product_names_resolve_without_issuer() {
        assert_eq!(normalize_issuer("Sapphire Reserve"), Issuer::Chase);
        assert_eq!(normalize_issuer("Venture X"), Issuer::CapitalOne);
        assert_eq!(normalize_issuer("Autograph"), Issuer::WellsFargo);
        assert_eq!(normalize_issuer("Strata Premier"), Issuer::Citi);
    }

    #[test]
    fn priority_prevents_substring_shadowing() {
        assert_eq!(normalize_issuer("Bilt Mastercard issued by Wells Fargo"), Issuer::Bilt);
        assert_eq!(normalize_issuer("Purchase Rewards Card"), Issuer::Other);
        assert_eq!(normalize_issuer("Capital One Quicksilver"), Issuer::CapitalOne);
        assert_eq!(normalize_issuer("Citi AAdvantage Platinum Select"), Issuer::Citi);
    }

    #[test]
    fn simplify_strips_issuer_and_boilerplate() {
        assert_eq!(
            simplify_card_name("The American Express® Gold Card", "American Express"),
            "Gold"
        );
        assert_eq!(
            simplify_card_name("Blue Cash Preferred Card from American Express", "American Express"),
            "Blue Cash Preferred"
        );
        assert_eq!(
            simplify_card_name("Chase Sapphire Preferred Credit Card", "Chase"),
            "Sapphire Preferred"
        );
        assert_eq!(
            simplify_card_name("U.S. Bank Cash+® Visa Signature® Card", "US Bank"),
            "Cash+"
        );
        assert_eq!(simplify_card_name("E2E Test Card", "Chase"), "E2E Test");
    }

    #[test]
    fn simplify_keeps_name_when_nothing_would_remain() {
        assert_eq!(simplify_card_name("Chase", "Chase"), "Chase");
        assert_eq!(get_display_name("Citi Card", "Citi"), "Card");
    }

    #[test]
    fn label_prefers_nickname() {
        let mut card = Card::new("1", "Chase Freedom Flex Credit Card", "Chase");
        assert_eq!(card_label(&card), "Freedom Flex");
        card.nickname = Some("Groceries".to_string());
        assert_eq!(card_label(&card), "Groceries (Freedom Flex)");
    }
}
