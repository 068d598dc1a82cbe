use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::catalog::Category;
use crate::gate::session::GUEST_NAME;

/// Biblio Burkina digital library
///
/// Browse and search the national catalog, read works in a metered
/// free tier, and unlock unlimited reading with Premium.
#[derive(Parser, Debug)]
#[command(name = "biblio")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file (defaults to the per-user config)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// YAML catalog to use instead of the configured or built-in one
    #[arg(long, global = true)]
    pub catalog: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List works in the catalog
    Catalog {
        /// Only show one subject pole
        #[arg(long, value_enum)]
        category: Option<Category>,
    },
    /// Search by title, author or category
    Search {
        query: String,

        /// Expand the query with the generative-text service first
        #[arg(long)]
        smart: bool,
    },
    /// Show a work with a generated summary
    Show { id: String },
    /// Open a work in the reader
    Read {
        id: String,

        /// Reader display name
        #[arg(long, default_value = GUEST_NAME)]
        name: String,

        /// Start as a premium reader
        #[arg(long)]
        premium: bool,

        /// Seconds of free reading already used today
        #[arg(long, default_value_t = 0)]
        used: u64,
    },
    /// Show subscription plans
    Premium,
    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Write a default configuration file
    Init {
        /// Output path (defaults to the per-user config)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Print the effective configuration
    Show,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn parses_read_with_flags() {
        let args = Args::try_parse_from(["biblio", "read", "2", "--used", "1799", "--premium"]).unwrap();
        match args.command {
            Commands::Read { id, used, premium, name } => {
                assert_eq!(id, "2");
                assert_eq!(used, 1799);
                assert!(premium);
                assert_eq!(name, GUEST_NAME);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn parses_category_slug() {
        let args = Args::try_parse_from(["biblio", "catalog", "--category", "agriculture"]).unwrap();
        assert!(matches!(
            args.command,
            Commands::Catalog {
                category: Some(Category::Agriculture)
            }
        ));
    }

    #[test]
    fn global_flags_after_subcommand() {
        let args = Args::try_parse_from(["biblio", "search", "sahel", "--smart", "-v"]).unwrap();
        assert!(args.verbose);
        assert!(matches!(args.command, Commands::Search { smart: true, .. }));
    }
}
