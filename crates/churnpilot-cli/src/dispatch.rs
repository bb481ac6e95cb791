use chrono::{Local, NaiveDate};
use churnpilot_client::commands;
use churnpilot_client::commands::benefits::BenefitsRunOptions;
use churnpilot_client::commands::common::PortfolioRunOptions;
use churnpilot_client::commands::library::{
    LibraryListOptions, LibraryMatchOptions, LibraryShowOptions,
};
use churnpilot_client::{ClientResult, SuccessEnvelope};

use crate::cli::{Cli, Commands, Five24Command, LibraryCommand, PortfolioArgs};

pub fn dispatch(cli: &Cli) -> ClientResult<SuccessEnvelope> {
    match &cli.command {
        Commands::Five24 { command } => match command {
            Five24Command::Status { portfolio } => {
                commands::eligibility::status(portfolio_options(portfolio))
            }
            Five24Command::Timeline { portfolio } => {
                commands::eligibility::timeline(portfolio_options(portfolio))
            }
        },
        Commands::Benefits { portfolio, card_id } => commands::benefits::run(BenefitsRunOptions {
            portfolio: portfolio_options(portfolio),
            card_id: card_id.clone(),
        }),
        Commands::Library { command } => match command {
            LibraryCommand::List { issuer, .. } => commands::library::list(LibraryListOptions {
                issuer: issuer.clone(),
                home_override: None,
            }),
            LibraryCommand::Show { template_id, .. } => {
                commands::library::show(LibraryShowOptions {
                    template_id: template_id.clone(),
                    home_override: None,
                })
            }
            LibraryCommand::Match { name, issuer, .. } => {
                commands::library::match_card(LibraryMatchOptions {
                    name: name.clone(),
                    issuer: issuer.clone(),
                    home_override: None,
                })
            }
            LibraryCommand::Enrich { portfolio } => {
                commands::library::enrich(portfolio_options(portfolio))
            }
        },
    }
}

fn portfolio_options(args: &PortfolioArgs) -> PortfolioRunOptions<'static> {
    let today = args.today.unwrap_or_else(local_today);
    log::debug!("reading portfolio {} as of {today}", args.path);
    PortfolioRunOptions::new(&args.path, today)
}

fn local_today() -> NaiveDate {
    Local::now().date_naive()
}
