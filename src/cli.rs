use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "markaz")]
#[command(author, version, about = "Telegram registration bot for an education center", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Run the bot with long polling (default)
    Run,

    /// Create or upgrade the database schema and exit
    Migrate,

    /// Print committed registrations, newest first
    Registrations {
        /// Maximum number of registrations to print
        #[arg(short, long, default_value_t = 20)]
        limit: usize,

        /// Print as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Print the region and district directory
    Regions,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_subcommand_means_run() {
        let cli = Cli::try_parse_from(["markaz"]).unwrap();
        assert_eq!(cli.command, None);
    }

    #[test]
    fn test_registrations_args() {
        let cli = Cli::try_parse_from(["markaz", "registrations", "--limit", "5", "--json"]).unwrap();
        assert_eq!(cli.command, Some(Commands::Registrations { limit: 5, json: true }));

        let cli = Cli::try_parse_from(["markaz", "registrations"]).unwrap();
        assert_eq!(cli.command, Some(Commands::Registrations { limit: 20, json: false }));
    }

    #[test]
    fn test_unknown_subcommand_rejected() {
        assert!(Cli::try_parse_from(["markaz", "download"]).is_err());
    }
}
