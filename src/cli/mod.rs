//! CLI module - Command-line interface for The Good Corner
//!
//! This module provides a structured CLI using clap for argument parsing.

mod commands;

use clap::{Parser, Subcommand};

/// The Good Corner - classified ads backend
#[derive(Parser)]
#[command(name = "goodcorner")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP API server
    #[command(alias = "daemon")]
    Serve,

    /// Search ads by title or description (goes through the search cache)
    #[command(alias = "s")]
    Search {
        /// Search query; omit to match every ad
        query: Vec<String>,
    },

    /// List the most recent ads
    #[command(alias = "ls", alias = "l")]
    List {
        /// Only ads of this category
        #[arg(long)]
        category: Option<i32>,
    },

    /// Write a default config.toml in the current directory
    Init,
}

pub use commands::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_search_words() {
        let cli = Cli::try_parse_from(["goodcorner", "search", "red", "bike"]).unwrap();
        match cli.command {
            Some(Commands::Search { query }) => assert_eq!(query.join(" "), "red bike"),
            _ => panic!("expected search command"),
        }
    }

    #[test]
    fn parses_list_category() {
        let cli = Cli::try_parse_from(["goodcorner", "ls", "--category", "3"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::List { category: Some(3) })
        ));
    }
}
