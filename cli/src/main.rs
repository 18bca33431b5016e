mod bootstrap;
mod chart;
mod interactive;
mod mirror;
mod search;

use std::env;
use std::path::PathBuf;
use std::process::exit;

use anyhow::Result;
use clap::{Parser, Subcommand};
use dotenvy::dotenv;

use latin_library_backend::{logger, AppPaths};
use latin_library_backend::collections::{all_collections, find_collection, CollectionConfig};

#[derive(Parser, Debug)]
#[command(author, version, about = "Latin Library CLI", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Optional path to the data directory.
    /// If not provided, the LATIN_LIBRARY_DIR environment variable will be used.
    #[arg(long, global = true, value_name = "DIRECTORY_PATH", env = "LATIN_LIBRARY_DIR")]
    data_dir: Option<PathBuf>,

    /// Directory holding the mirrored pages, defaults to mirror/ in the data directory.
    #[arg(long, global = true, value_name = "DIRECTORY_PATH", env = "LATIN_LIBRARY_MIRROR_DIR")]
    mirror_dir: Option<PathBuf>,

    /// SQLite database file, defaults to latin_library.sqlite3 in the data directory.
    #[arg(long, global = true, value_name = "FILE_PATH", env = "LATIN_LIBRARY_DB")]
    db: Option<PathBuf>,

    /// Log level: silent, error, warn, info or debug. Overrides LOG_LEVEL.
    #[arg(long, global = true, value_name = "LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Download collection index and book pages into the mirror directory
    Fetch {
        /// Only fetch this collection (cassiodorus, statius, verg, silius)
        #[arg(long, value_name = "SLUG")]
        collection: Option<String>,
    },

    /// Compare the mirrored book pages with the expected book counts
    Verify,

    /// Parse the mirror and rebuild the database and its search index
    Bootstrap {
        /// Write the records of the collections that parsed even if some failed
        #[arg(long, default_value_t = false)]
        allow_partial: bool,
    },

    /// Parse the mirror and write the records as JSON lines
    Export {
        /// Output file, stdout if not given
        #[arg(long, value_name = "FILE_PATH")]
        output: Option<PathBuf>,
    },

    /// Search passages for a term
    #[command(arg_required_else_help = true)]
    Search {
        term: String,

        /// Translate the term from English to Latin first
        #[arg(long, default_value_t = false)]
        english: bool,
    },

    /// Chart how often a term is used in each book
    #[command(arg_required_else_help = true)]
    Chart {
        term: String,

        /// Translate the term from English to Latin first
        #[arg(long, default_value_t = false)]
        english: bool,
    },

    /// Menu driven search and charts
    Interactive,
}

fn selected_collections(slug: Option<&str>) -> Result<Vec<CollectionConfig>> {
    match slug {
        Some(s) => match find_collection(s) {
            Some(config) => Ok(vec![config]),
            None => anyhow::bail!("Unknown collection: {}", s),
        },
        None => Ok(all_collections()),
    }
}

fn main() {
    // Attempt to load .env file. This might define LATIN_LIBRARY_DIR if it's not
    // already in the environment. Clap will pick it up via `env = "LATIN_LIBRARY_DIR"`.
    if dotenv().is_err() {
        println!("Info: No .env file found or failed to load.");
    }

    let cli = Cli::parse();

    // The logger resolves its log.txt location from the environment.
    if let Some(dir) = &cli.data_dir {
        unsafe { env::set_var("LATIN_LIBRARY_DIR", dir); }
    }

    if let Some(level) = &cli.log_level {
        if !logger::set_log_level_str(level) {
            eprintln!("Unknown log level: {}", level);
            exit(1);
        }
    }

    let paths = match AppPaths::resolve(cli.data_dir, cli.mirror_dir, cli.db) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Failed to get data directory: {}", e);
            eprintln!("Use the --data-dir option or set the LATIN_LIBRARY_DIR environment variable.");
            exit(1);
        }
    };

    let command_result = match cli.command {
        Commands::Fetch { collection } => {
            selected_collections(collection.as_deref())
                .and_then(|configs| mirror::fetch(&paths.mirror_dir, &configs))
        }

        Commands::Verify => mirror::verify(&paths.mirror_dir),

        Commands::Bootstrap { allow_partial } => bootstrap::bootstrap(&paths, allow_partial),

        Commands::Export { output } => bootstrap::export(&paths, output.as_deref()),

        Commands::Search { term, english } => search::run_search(&paths, &term, english),

        Commands::Chart { term, english } => chart::run_chart(&paths, &term, english),

        Commands::Interactive => interactive::run(&paths),
    };

    if let Err(e) = command_result {
        eprintln!("Error executing command: {:#}", e);
        exit(1);
    }
}
