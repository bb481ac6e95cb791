use crate::cli::{Commands, Five24Command, LibraryCommand};

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum OutputMode {
    Text,
    Json,
}

impl OutputMode {
    fn from_flag(json: bool) -> Self {
        if json { Self::Json } else { Self::Text }
    }
}

pub fn mode_for_command(command: &Commands) -> OutputMode {
    let json = match command {
        Commands::Five24 { command } => match command {
            Five24Command::Status { portfolio } | Five24Command::Timeline { portfolio } => {
                portfolio.json
            }
        },
        Commands::Benefits { portfolio, .. } => portfolio.json,
        Commands::Library { command } => match command {
            LibraryCommand::List { json, .. }
            | LibraryCommand::Show { json, .. }
            | LibraryCommand::Match { json, .. } => *json,
            LibraryCommand::Enrich { portfolio } => portfolio.json,
        },
    };
    OutputMode::from_flag(json)
}
