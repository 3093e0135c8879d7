//! CLI commands implementation.
//!
//! This module contains the CLI parser and dispatches to command-specific modules.

mod documents;
mod extract_cmd;
mod helpers;
mod init;
mod serve;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::{load_settings_with_options, LoadOptions};
use crate::listing::{SortField, SortOrder, YearFilter};

#[derive(Parser)]
#[command(name = "vanban")]
#[command(about = "Official document register: upload, browse and manage documents")]
#[command(version)]
pub struct Cli {
    /// Data directory or database file (overrides config file).
    #[arg(long, short = 'd', global = true, env = "VANBAN_DATA")]
    data: Option<PathBuf>,

    /// Config file path (overrides auto-discovery)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

fn parse_year(s: &str) -> Result<YearFilter, String> {
    YearFilter::parse(s).ok_or_else(|| format!("expected a year or 'unknown', got '{}'", s))
}

fn parse_date(s: &str) -> Result<chrono::NaiveDate, String> {
    chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| format!("expected YYYY-MM-DD, got '{}'", s))
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the data directory and database
    Init,

    /// Start web server to browse and upload documents
    Serve {
        /// Address to bind to: PORT, HOST, or HOST:PORT (default from config, else 127.0.0.1:3000)
        bind: Option<String>,
    },

    /// Guess type, number and name from filenames
    Extract {
        /// Filenames (need not exist)
        #[arg(required = true)]
        files: Vec<String>,
        /// Print one JSON object per line
        #[arg(long)]
        json: bool,
    },

    /// List documents in the register
    #[command(alias = "ls")]
    List {
        /// Search number, type and name (case-insensitive)
        #[arg(short, long)]
        q: Option<String>,
        /// Only this type label
        #[arg(short = 't', long = "type")]
        doc_type: Option<String>,
        /// Issue year, or 'unknown' for undated documents
        #[arg(short, long, value_parser = parse_year)]
        year: Option<YearFilter>,
        /// Issued on or after (YYYY-MM-DD)
        #[arg(long, value_parser = parse_date)]
        from: Option<chrono::NaiveDate>,
        /// Issued on or before (YYYY-MM-DD)
        #[arg(long, value_parser = parse_date)]
        to: Option<chrono::NaiveDate>,
        /// Sort column
        #[arg(short, long, value_enum, default_value = "created-at")]
        sort: SortField,
        /// Sort direction
        #[arg(short, long, value_enum, default_value = "desc")]
        order: SortOrder,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Add a file to the register. Metadata not given is guessed from the filename.
    Add {
        /// File to upload
        file: PathBuf,
        /// Document number
        #[arg(short, long)]
        number: Option<String>,
        /// Type label
        #[arg(short = 't', long = "type")]
        doc_type: Option<String>,
        /// Display name
        #[arg(long)]
        name: Option<String>,
        /// Issue date (YYYY-MM-DD)
        #[arg(short, long)]
        issued_date: Option<String>,
    },

    /// Delete documents and their stored files
    #[command(alias = "rm")]
    Delete {
        /// Document IDs
        #[arg(required = true)]
        ids: Vec<i64>,
    },
}

/// Run the CLI.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let options = LoadOptions {
        config_path: cli.config,
        data: cli.data,
    };
    let (settings, _config) = load_settings_with_options(options).await;

    match cli.command {
        Commands::Init => init::cmd_init(&settings).await,
        Commands::Serve { bind } => {
            let bind = bind.unwrap_or_else(|| settings.bind.clone());
            serve::cmd_serve(&settings, &bind).await
        }
        Commands::Extract { files, json } => extract_cmd::cmd_extract(&files, json),
        Commands::List {
            q,
            doc_type,
            year,
            from,
            to,
            sort,
            order,
            json,
        } => {
            let query = crate::listing::ListQuery {
                q,
                doc_type,
                year,
                date_from: from,
                date_to: to,
                sort: crate::listing::Sort::new(sort, order),
            };
            documents::cmd_list(&settings, &query, json).await
        }
        Commands::Add {
            file,
            number,
            doc_type,
            name,
            issued_date,
        } => {
            let overrides = crate::models::UploadRequest {
                number,
                doc_type,
                name,
                issued_date,
            };
            documents::cmd_add(&settings, &file, overrides).await
        }
        Commands::Delete { ids } => documents::cmd_delete(&settings, &ids).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_list_flags() {
        let cli = Cli::parse_from([
            "vanban", "list", "--year", "unknown", "--sort", "issued-date", "--order", "asc",
        ]);
        match cli.command {
            Commands::List {
                year, sort, order, ..
            } => {
                assert_eq!(year, Some(YearFilter::Unknown));
                assert_eq!(sort, SortField::IssuedDate);
                assert_eq!(order, SortOrder::Asc);
            }
            _ => panic!("expected list"),
        }
    }

    #[test]
    fn test_parse_rejects_bad_year() {
        assert!(Cli::try_parse_from(["vanban", "list", "--year", "soon"]).is_err());
    }

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["vanban", "delete", "3", "4", "--data", "/tmp/v", "-v"]);
        assert!(cli.verbose);
        assert_eq!(cli.data, Some(PathBuf::from("/tmp/v")));
        match cli.command {
            Commands::Delete { ids } => assert_eq!(ids, vec![3, 4]),
            _ => panic!("expected delete"),
        }
    }
}
