//! Command-line front end: resolve the store, set up logging, run one lookup
//! and print the result to stdout.
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use citavi_bib::db::resolve_store_path;
use citavi_bib::{
    build_bibliography, list_all_citekeys, list_all_entries, try_get_formatted_bib,
    try_get_short_title, try_get_title,
};

/// Read bibliography data from a reference manager database
#[derive(Parser)]
#[command(name = "citavi-bib", version)]
struct Cli {
    /// Path to the reference store (SQLite database)
    #[arg(short, long, env = "CITAVI_BIB_STORE", global = true)]
    store: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every citation key in the store
    Keys,

    /// List every reference with its authors and year
    Entries {
        /// Print a JSON object keyed by citation key
        #[arg(long)]
        json: bool,
    },

    /// Show title, short title and bibliography line of one reference
    Show {
        /// Citation key, with or without a leading '@'
        citekey: String,
    },

    /// Build the bibliography for the citations in a document
    Bib {
        /// Document to scan (use '-' for stdin)
        input: PathBuf,

        /// Print a JSON object keyed by citation key
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let Some(store) = cli.store.as_deref() else {
        bail!("no store given: pass --store or set CITAVI_BIB_STORE");
    };
    let store = resolve_store_path(store);

    match cli.command {
        Commands::Keys => {
            for citekey in list_all_citekeys(&store) {
                println!("{citekey}");
            }
        }
        Commands::Entries { json } => {
            let entries = list_all_entries(&store);
            if json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else {
                for (citekey, entry) in &entries {
                    let year = entry.year.map(|year| year.to_string()).unwrap_or_default();
                    println!("{citekey}\t{}\t{year}\t{}", entry.authors, entry.title);
                }
            }
        }
        Commands::Show { citekey } => show(&store, &citekey)?,
        Commands::Bib { input, json } => {
            let text = read_input(&input)?;
            let bibliography = build_bibliography(&text, &store);
            if json {
                println!("{}", serde_json::to_string_pretty(&bibliography)?);
            } else {
                for (citekey, bib) in &bibliography {
                    println!("{citekey}\t{bib}");
                }
            }
        }
    }

    Ok(())
}

/// `show` is the one command that fails loudly: asking for a single key that
/// does not exist is a user error, not a degraded document run.
fn show(store: &Path, citekey: &str) -> Result<()> {
    let title = try_get_title(store, citekey)?;
    let short_title = try_get_short_title(store, citekey)?;
    let bib = try_get_formatted_bib(store, citekey)?;

    println!("title:       {title}");
    println!("short title: {short_title}");
    println!("bib:         {bib}");
    Ok(())
}

fn read_input(input: &Path) -> Result<String> {
    if input == Path::new("-") {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("failed to read document from stdin")?;
        Ok(text)
    } else {
        fs::read_to_string(input)
            .with_context(|| format!("failed to read document {}", input.display()))
    }
}

fn init_tracing(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        (false, _) => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("citavi_bib={level}")),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}
