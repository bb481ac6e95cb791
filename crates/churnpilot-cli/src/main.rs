mod cli;
mod dispatch;
mod output;
mod stdout_io;

use std::process::ExitCode;

use churnpilot_client::ClientError;
use clap::{Parser, error::ErrorKind};
use stdout_io::write_stdout;

const ROOT_HELP: &str = "ChurnPilot - credit card benefit and eligibility tracker

Usage:
  churnpilot <command>

Start here:
  churnpilot five24 status <path>
  churnpilot benefits <path>
  churnpilot library list
";

const TOP_LEVEL_HELP: &str = "ChurnPilot - credit card benefit and eligibility tracker

USAGE: churnpilot <command>

Check Chase 5/24:
  churnpilot five24 status <path>                         Count personal cards opened in the last 24 months
  churnpilot five24 timeline <path>                       See when each card drops off

Track card benefits:
  churnpilot benefits <path>                              Credits used this period, fee and bonus deadlines
  churnpilot benefits <path> --card <id>                  Same, for one card

Card library:
  churnpilot library list [--issuer <issuer>]             Browse card templates
  churnpilot library show <template_id>                   Show one template and its credits
  churnpilot library match <name> [--issuer <issuer>]     Find the template for a card name
  churnpilot library enrich <path>                        Fill in missing credits from matched templates

<path> is a JSON or CSV portfolio file, or `-` for stdin.
Portfolio commands accept `--today YYYY-MM-DD`; every command accepts `--json`.
Run `churnpilot five24 status --help` for the portfolio format.
Set RUST_LOG=info to see what enrichment changed.
";

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .target(env_logger::Target::Stderr)
        .init();

    match run() {
        Ok(code) => code,
        Err(code) => code,
    }
}

fn run() -> Result<ExitCode, ExitCode> {
    let raw_args = std::env::args().collect::<Vec<String>>();
    if raw_args.len() == 1 {
        if write_stdout(ROOT_HELP, false).is_err() {
            return Err(ExitCode::from(2));
        }
        return Ok(ExitCode::SUCCESS);
    }

    let cli = match cli::Cli::try_parse() {
        Ok(value) => value,
        Err(err) => return handle_parse_error(&err, &raw_args),
    };
    let mode = output::mode_for_command(&cli.command);

    match dispatch::dispatch(&cli) {
        Ok(success) => {
            if output::print_success(&success, mode).is_err() {
                return Err(ExitCode::from(2));
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(error) => {
            if output::print_failure(&error, mode).is_err() {
                return Err(ExitCode::from(2));
            }
            Err(exit_code_for_error(&error))
        }
    }
}

fn handle_parse_error(err: &clap::Error, raw_args: &[String]) -> Result<ExitCode, ExitCode> {
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
            let text = if is_top_level_help_request(raw_args) {
                TOP_LEVEL_HELP.to_string()
            } else {
                err.to_string()
            };
            if write_stdout(&text, false).is_err() {
                return Err(ExitCode::from(2));
            }
            Ok(ExitCode::SUCCESS)
        }
        ErrorKind::DisplayVersion => {
            if write_stdout(&err.to_string(), false).is_err() {
                return Err(ExitCode::from(2));
            }
            Ok(ExitCode::SUCCESS)
        }
        kind => {
            let command_hint = if matches!(
                kind,
                ErrorKind::MissingRequiredArgument
                    | ErrorKind::InvalidValue
                    | ErrorKind::ValueValidation
                    | ErrorKind::WrongNumberOfValues
                    | ErrorKind::UnknownArgument
                    | ErrorKind::InvalidSubcommand
            ) {
                command_path_from_args(raw_args)
            } else {
                None
            };
            let clean_message = strip_clap_boilerplate(&err.to_string());
            let parse_error =
                ClientError::invalid_argument_for_command(&clean_message, command_hint.as_deref());
            let mode = infer_requested_output_mode(raw_args);
            if output::print_failure(&parse_error, mode).is_err() {
                return Err(ExitCode::from(2));
            }
            Err(ExitCode::from(1))
        }
    }
}

fn is_top_level_help_request(raw_args: &[String]) -> bool {
    raw_args.len() == 2 && matches!(raw_args[1].as_str(), "--help" | "-h")
}

/// Drops clap's trailing usage line and "For more information" hint so the
/// "What to do next" block carries the guidance.
fn strip_clap_boilerplate(message: &str) -> String {
    let trimmed = if let Some(pos) = message.find("\n\nUsage:") {
        &message[..pos]
    } else if let Some(pos) = message.find("\nFor more information") {
        &message[..pos]
    } else {
        message
    };
    trimmed.trim_start_matches("error: ").trim_end().to_string()
}

/// Builds the subcommand path ("five24 status", "library match") from the raw
/// args for help hints.
fn command_path_from_args(raw_args: &[String]) -> Option<String> {
    let non_flags: Vec<&str> = raw_args
        .iter()
        .skip(1)
        .filter(|value| !value.starts_with('-'))
        .map(String::as_str)
        .collect();

    let hint = match non_flags.as_slice() {
        ["five24", "status", ..] => Some("five24 status"),
        ["five24", "timeline", ..] => Some("five24 timeline"),
        ["five24", ..] => Some("five24"),
        ["benefits", ..] => Some("benefits"),
        ["library", "list", ..] => Some("library list"),
        ["library", "show", ..] => Some("library show"),
        ["library", "match", ..] => Some("library match"),
        ["library", "enrich", ..] => Some("library enrich"),
        ["library", ..] => Some("library"),
        _ => None,
    };
    hint.map(str::to_string)
}

fn exit_code_for_error(error: &ClientError) -> ExitCode {
    if is_internal_error(error) {
        ExitCode::from(2)
    } else {
        ExitCode::from(1)
    }
}

fn infer_requested_output_mode(raw_args: &[String]) -> output::OutputMode {
    if raw_args.iter().skip(1).any(|value| value == "--json") {
        return output::OutputMode::Json;
    }
    output::OutputMode::Text
}

fn is_internal_error(error: &ClientError) -> bool {
    error.code.starts_with("internal_")
}
