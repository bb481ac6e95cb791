mod benefits_text;
mod eligibility_text;
mod error_text;
mod format;
mod json;
mod library_text;
mod mode;

use std::io;

use churnpilot_client::{ClientError, SuccessEnvelope};

use crate::stdout_io::write_stdout;

pub use mode::{OutputMode, mode_for_command};

pub fn print_success(success: &SuccessEnvelope, mode: OutputMode) -> io::Result<()> {
    let body = match mode {
        OutputMode::Text => render_text_success(success)?,
        OutputMode::Json => json::render_success_json(success)?,
    };
    write_stdout(&body, true)
}

pub fn print_failure(error: &ClientError, mode: OutputMode) -> io::Result<()> {
    let body = match mode {
        OutputMode::Json => json::render_error_json(error)?,
        OutputMode::Text => error_text::render_error(error),
    };
    write_stdout(&body, true)
}

fn render_text_success(success: &SuccessEnvelope) -> io::Result<String> {
    match success.command.as_str() {
        "five24 status" => eligibility_text::render_status(&success.data),
        "five24 timeline" => eligibility_text::render_timeline(&success.data),
        "benefits" => benefits_text::render_benefits(&success.data),
        "library list" => library_text::render_list(&success.data),
        "library show" => library_text::render_show(&success.data),
        "library match" => library_text::render_match(&success.data),
        "library enrich" => library_text::render_enrich(&success.data),
        _ => Err(io::Error::other(format!(
            "unsupported text output command `{}`",
            success.command
        ))),
    }
}
