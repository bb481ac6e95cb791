use std::path::Path;

use serde_json::{Value, json};
use thiserror::Error;

use crate::contracts::types::PortfolioIssue;

pub(crate) const PORTFOLIO_HELP_COMMAND: &str = "churnpilot five24 status --help";

#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ClientError {
    pub code: String,
    pub message: String,
    pub recovery_steps: Vec<String>,
    pub data: Option<Value>,
}

impl ClientError {
    pub fn new(code: &str, message: &str, recovery_steps: Vec<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.to_string(),
            recovery_steps,
            data: None,
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn invalid_argument(message: &str) -> Self {
        Self::invalid_argument_for_command(message, None)
    }

    pub fn invalid_argument_for_command(message: &str, command: Option<&str>) -> Self {
        let help_hint = match command {
            Some(cmd) => format!("Run `churnpilot {cmd} --help` for usage."),
            None => "Run `churnpilot --help` for usage.".to_string(),
        };
        let error = Self::new("invalid_argument", message, vec![help_hint]);
        if let Some(cmd) = command {
            return error.with_data(json!({
                "command_hint": cmd,
            }));
        }
        error
    }

    pub fn invalid_argument_with_recovery(message: &str, recovery_steps: Vec<String>) -> Self {
        Self::new("invalid_argument", message, recovery_steps)
    }

    pub fn invalid_portfolio_format(message: &str, received_format: &str) -> Self {
        Self::new(
            "portfolio_invalid_format",
            message,
            vec![
                "Provide a JSON array of card objects or a CSV file with a header row.".to_string(),
                format!("Run `{PORTFOLIO_HELP_COMMAND}` to review the portfolio fields."),
            ],
        )
        .with_data(json!({
            "received_format": received_format,
            "supported_formats": ["json_array", "csv"],
        }))
    }

    pub fn portfolio_schema_mismatch(
        required_headers: Vec<String>,
        optional_headers: Vec<String>,
        actual_headers: Vec<String>,
    ) -> Self {
        Self::new(
            "portfolio_invalid_format",
            "CSV headers do not satisfy the portfolio schema.",
            vec![
                "Include all required headers; optional headers may be omitted.".to_string(),
                "Do not include unknown headers.".to_string(),
            ],
        )
        .with_data(json!({
            "required_headers": required_headers,
            "optional_headers": optional_headers,
            "actual_headers": actual_headers,
        }))
    }

    pub fn portfolio_validation_failed(issues: Vec<PortfolioIssue>) -> Self {
        let row_count = issues
            .iter()
            .map(|issue| issue.row)
            .collect::<std::collections::BTreeSet<i64>>()
            .len();
        Self::new(
            "portfolio_validation_failed",
            &format!("Portfolio failed validation: {row_count} cards need fixes."),
            vec![
                "Fix the listed issues in your portfolio file.".to_string(),
                "Dates must use YYYY-MM-DD format.".to_string(),
            ],
        )
        .with_data(json!({
            "issues": issues,
        }))
    }

    pub fn preferences_invalid(path: &Path, detail: &str) -> Self {
        let location = path.display().to_string();
        Self::new(
            "preferences_invalid",
            &format!("Preferences at `{location}` could not be used: {detail}"),
            vec![
                format!("Fix or remove `{location}` to fall back to defaults."),
                "`enrichment_min_confidence` must be between 0 and 1.".to_string(),
            ],
        )
    }

    pub fn templates_invalid(path: &Path, detail: &str) -> Self {
        let location = path.display().to_string();
        Self::new(
            "preferences_invalid",
            &format!("Template catalog at `{location}` could not be read: {detail}"),
            vec![format!(
                "Fix or remove `{location}` to use the built-in template catalog."
            )],
        )
    }

    pub fn home_unresolved() -> Self {
        Self::new(
            "preferences_invalid",
            "Could not resolve a home directory for preferences.",
            vec!["Set `CHURNPILOT_HOME` to a readable directory.".to_string()],
        )
    }

    pub fn template_not_found(template_id: &str) -> Self {
        Self::new(
            "template_not_found",
            &format!("Template `{template_id}` is not in the card library."),
            vec!["Run `churnpilot library list` to see available templates.".to_string()],
        )
        .with_data(json!({
            "template_id": template_id,
        }))
    }

    pub fn card_not_found(card_id: &str) -> Self {
        Self::new(
            "card_not_found",
            &format!("Card `{card_id}` was not found in the portfolio."),
            vec!["Check the card id in your portfolio file.".to_string()],
        )
    }

    pub fn internal_serialization(message: &str) -> Self {
        Self::new("internal_serialization_error", message, Vec::new())
    }
}

pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::ClientError;
    use crate::contracts::types::PortfolioIssue;

    #[test]
    fn command_hint_is_attached_to_invalid_argument() {
        let error = ClientError::invalid_argument_for_command("bad date", Some("five24 status"));
        assert_eq!(error.code, "invalid_argument");
        assert_eq!(
            error.recovery_steps,
            vec!["Run `churnpilot five24 status --help` for usage.".to_string()]
        );
        assert!(error.data.is_some());
    }

    #[test]
    fn validation_failure_counts_distinct_rows() {
        let issue = |row: i64, field: &str| PortfolioIssue {
            row,
            field: field.to_string(),
            code: "invalid_date".to_string(),
            description: "bad".to_string(),
        };
        let error = ClientError::portfolio_validation_failed(vec![
            issue(1, "opened_date"),
            issue(1, "name"),
            issue(3, "name"),
        ]);
        assert_eq!(error.code, "portfolio_validation_failed");
        assert!(error.message.contains("2 cards"));
    }
}
