use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

pub fn parse_iso_date(value: &str) -> Result<NaiveDate, String> {
    let bytes = value.as_bytes();
    let shaped = bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && [0usize, 1, 2, 3, 5, 6, 8, 9]
            .iter()
            .all(|index| bytes[*index].is_ascii_digit());
    if !shaped {
        return Err("date must use YYYY-MM-DD format".to_string());
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| "date must use valid calendar values".to_string())
}

/// Extended help shown after `churnpilot five24 status --help` and the other
/// portfolio commands.
pub const PORTFOLIO_AFTER_HELP: &str = "\
Portfolio input:
  <path> is a local JSON or CSV file. Use `-` to read stdin.
  Example: cat cards.json | churnpilot five24 status -

  JSON: one top-level array of card objects
  [
    {
      \"id\": \"csp\",
      \"name\": \"Chase Sapphire Preferred\",
      \"issuer\": \"Chase\",
      \"opened_date\": \"2025-06-01\",
      \"annual_fee\": 95,
      \"credits\": [{\"name\": \"Hotel Credit\", \"amount\": 50, \"frequency\": \"annual\"}]
    }
  ]

  CSV: one header row; `name` and `issuer` are required,
  `opened_date`, `is_business`, `annual_fee`, `nickname`, `id` are optional.
  name,issuer,opened_date,is_business
  Ink Business Preferred,Chase,2025-02-10,true

  Cards without an `id` get a generated one for this run.
  Dates use `YYYY-MM-DD`. `--today` pins the evaluation date.
";

#[derive(Debug, Parser)]
#[command(
    name = "churnpilot",
    version,
    about = "credit card benefit and eligibility tracker",
    disable_help_subcommand = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Chase 5/24 eligibility
    #[command(name = "five24", arg_required_else_help = true)]
    Five24 {
        #[command(subcommand)]
        command: Five24Command,
    },
    /// Show credit usage, reminders, sign-up bonus and annual fee state per card
    #[command(after_help = PORTFOLIO_AFTER_HELP)]
    Benefits {
        #[command(flatten)]
        portfolio: PortfolioArgs,
        /// Only report on the card with this id
        #[arg(long = "card", value_name = "ID")]
        card_id: Option<String>,
    },
    /// Browse the card template library and enrich portfolios from it
    #[command(arg_required_else_help = true)]
    Library {
        #[command(subcommand)]
        command: LibraryCommand,
    },
}

#[derive(Debug, Subcommand)]
pub enum Five24Command {
    /// Count personal cards opened in the last 24 months
    #[command(after_help = PORTFOLIO_AFTER_HELP)]
    Status {
        #[command(flatten)]
        portfolio: PortfolioArgs,
    },
    /// List when each counted card drops out of the window
    #[command(after_help = PORTFOLIO_AFTER_HELP)]
    Timeline {
        #[command(flatten)]
        portfolio: PortfolioArgs,
    },
}

#[derive(Debug, Subcommand)]
pub enum LibraryCommand {
    /// List card templates
    List {
        /// Only list templates from this issuer
        #[arg(long)]
        issuer: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Show one card template
    Show {
        template_id: String,
        #[arg(long)]
        json: bool,
    },
    /// Match a card name against the library
    Match {
        name: String,
        #[arg(long)]
        issuer: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Fill in missing credits from matched templates (read-only)
    #[command(after_help = PORTFOLIO_AFTER_HELP)]
    Enrich {
        #[command(flatten)]
        portfolio: PortfolioArgs,
    },
}

#[derive(Debug, Args)]
pub struct PortfolioArgs {
    /// Portfolio file (JSON or CSV), or `-` for stdin
    #[arg(value_name = "PATH")]
    pub path: String,
    /// Evaluate as of this date (YYYY-MM-DD); defaults to the local date
    #[arg(long, value_parser = parse_iso_date)]
    pub today: Option<NaiveDate>,
    #[arg(long)]
    pub json: bool,
}

#[cfg(test)]
pub fn parse_from<I, T>(itr: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(itr)
}
