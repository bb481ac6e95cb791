use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::benefits::deadlines::DeadlinePolicy;
use crate::benefits::usage::snooze_all_reminders;
use crate::library::catalog::CardLibrary;
use crate::models::{Card, CardTemplate};
use crate::{ClientError, ClientResult};

pub const HOME_ENV_VAR: &str = "CHURNPILOT_HOME";

/// User preferences read from `preferences.json`. Every field is optional in
/// the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub auto_enrich_enabled: bool,
    pub enrichment_min_confidence: f64,
    pub snooze_days: i64,
    pub sub_warning_days: i64,
    pub sub_critical_days: i64,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            auto_enrich_enabled: true,
            enrichment_min_confidence: 0.7,
            snooze_days: 30,
            sub_warning_days: 30,
            sub_critical_days: 14,
        }
    }
}

impl Preferences {
    pub fn deadline_policy(&self) -> DeadlinePolicy {
        DeadlinePolicy {
            sub_warning_days: self.sub_warning_days,
            sub_critical_days: self.sub_critical_days,
        }
    }

    /// Dismisses every reminder on `card` for the configured `snooze_days`.
    pub fn dismiss_card_reminders(&self, card: &Card, today: NaiveDate) -> Card {
        snooze_all_reminders(card, self.snooze_days, today)
    }

    fn check(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.enrichment_min_confidence) {
            return Err(format!(
                "enrichment_min_confidence must be between 0 and 1, got {}.",
                self.enrichment_min_confidence
            ));
        }
        if self.snooze_days <= 0 {
            return Err("snooze_days must be greater than zero.".to_string());
        }
        if self.sub_critical_days < 0 || self.sub_warning_days < self.sub_critical_days {
            return Err(
                "sub_warning_days must be at least sub_critical_days, and both non-negative."
                    .to_string(),
            );
        }
        Ok(())
    }
}

pub fn resolve_home(home_override: Option<&Path>) -> ClientResult<PathBuf> {
    let candidate = match home_override {
        Some(path) => path.to_path_buf(),
        None => {
            if let Some(override_path) = std::env::var_os(HOME_ENV_VAR) {
                PathBuf::from(override_path)
            } else if let Some(home_path) = home::home_dir() {
                home_path.join(".churnpilot")
            } else {
                return Err(ClientError::home_unresolved());
            }
        }
    };

    absolutize(&candidate)
}

pub fn preferences_path(home: &Path) -> PathBuf {
    home.join("preferences.json")
}

pub fn templates_path(home: &Path) -> PathBuf {
    home.join("templates.json")
}

/// Missing file means defaults; a present but unusable file is an error.
pub fn load_preferences(home: &Path) -> ClientResult<Preferences> {
    let path = preferences_path(home);
    let Some(body) = read_optional(&path)? else {
        return Ok(Preferences::default());
    };

    let preferences = serde_json::from_str::<Preferences>(&body).map_err(|error| {
        log::warn!("unreadable preferences at {}: {error}", path.display());
        ClientError::preferences_invalid(&path, &error.to_string())
    })?;
    preferences.check().map_err(|detail| {
        log::warn!("rejected preferences at {}: {detail}", path.display());
        ClientError::preferences_invalid(&path, &detail)
    })?;

    Ok(preferences)
}

/// `templates.json` replaces the built-in catalog when present.
pub fn load_library(home: &Path) -> ClientResult<CardLibrary> {
    let path = templates_path(home);
    let Some(body) = read_optional(&path)? else {
        return Ok(CardLibrary::builtin());
    };

    let templates = serde_json::from_str::<Vec<CardTemplate>>(&body)
        .map_err(|error| ClientError::templates_invalid(&path, &error.to_string()))?;
    log::debug!("loaded {} templates from {}", templates.len(), path.display());
    Ok(CardLibrary::from_templates(templates))
}

fn read_optional(path: &Path) -> ClientResult<Option<String>> {
    match fs::read_to_string(path) {
        Ok(body) => Ok(Some(body)),
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(error) => Err(ClientError::preferences_invalid(path, &error.to_string())),
    }
}

fn absolutize(path: &Path) -> ClientResult<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }

    std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .map_err(|_| ClientError::home_unresolved())
}
