//! Command-line interface for bookshop.
//!
//! Provides commands for adding books, listing and searching the catalog
//! file, running the sample flow, and showing the resolved configuration.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use crate::config::{self, FILE_ENV};
use crate::domain::Book;
use crate::library::{Catalog, LoadOutcome};

/// bookshop - Book catalog with delimited file persistence
#[derive(Parser, Debug)]
#[command(name = "bookshop")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Catalog file (overrides .bookshop/config.yaml)
    #[arg(short, long, global = true, env = FILE_ENV)]
    pub file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Append a book to the catalog file
    Add {
        /// Author name
        #[arg(short, long)]
        author: String,

        /// Book title
        #[arg(short, long)]
        title: String,

        /// Price
        #[arg(short, long)]
        price: f64,
    },

    /// Show every book in the catalog file
    List {
        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Show books with exactly this title
    Find {
        /// Title to match (case-sensitive)
        title: String,

        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Print only the number of matches
        #[arg(short, long)]
        count: bool,
    },

    /// Add two sample books, show matches and save them
    Demo,

    /// Show resolved configuration (debug)
    Config,
}

/// How books are written to stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One description line per book
    Text,

    /// JSON array
    Json,
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        let cfg = config::resolve(self.file)?;
        let stdout = io::stdout();
        let mut out = stdout.lock();

        match self.command {
            Commands::Add {
                author,
                title,
                price,
            } => add_book(&cfg.file, Book::new(author, title, price), &mut out),
            Commands::List { format } => list_books(&cfg.file, format, &mut out),
            Commands::Find {
                title,
                format,
                count,
            } => find_books(&cfg.file, &title, format, count, &mut out),
            Commands::Demo => run_demo(&cfg.file, &mut out),
            Commands::Config => show_config(&cfg, &mut out),
        }
    }
}

/// Append a single book to the catalog file
fn add_book<W: Write>(file: &Path, book: Book, out: &mut W) -> Result<()> {
    let catalog: Catalog = std::iter::once(book).collect();
    let report = catalog.save_to_file(file)?;

    writeln!(out, "{}", report)?;
    Ok(())
}

/// Load the catalog file and report the outcome.
///
/// With `quiet` set, `out` carries only command output: a missing file is
/// reported on stderr and a successful load is not reported.
fn load_catalog<W: Write>(file: &Path, out: &mut W, quiet: bool) -> Result<Catalog> {
    let mut catalog = Catalog::new();
    let outcome = catalog
        .read_from_file(file)
        .with_context(|| format!("Failed to load catalog: {}", file.display()))?;

    match (&outcome, quiet) {
        (_, false) => writeln!(out, "{}", outcome)?,
        (LoadOutcome::Unavailable { .. }, true) => eprintln!("{}", outcome),
        (LoadOutcome::Loaded { .. }, true) => {}
    }

    Ok(catalog)
}

fn list_books<W: Write>(file: &Path, format: OutputFormat, out: &mut W) -> Result<()> {
    let catalog = load_catalog(file, out, format == OutputFormat::Json)?;

    match format {
        OutputFormat::Text => {
            if catalog.is_empty() {
                writeln!(out, "No books found")?;
                return Ok(());
            }
            catalog.write_books(out)?;
        }
        OutputFormat::Json => write_json(catalog.iter().collect(), out)?,
    }

    Ok(())
}

fn find_books<W: Write>(
    file: &Path,
    title: &str,
    format: OutputFormat,
    count: bool,
    out: &mut W,
) -> Result<()> {
    let catalog = load_catalog(file, out, count || format == OutputFormat::Json)?;

    if count {
        writeln!(out, "{}", catalog.find_by_title(title).count())?;
        return Ok(());
    }

    match format {
        OutputFormat::Text => {
            for book in catalog.find_by_title(title) {
                writeln!(out, "{}", book)?;
            }
        }
        OutputFormat::Json => write_json(catalog.find_by_title(title).collect(), out)?,
    }

    Ok(())
}

fn write_json<W: Write>(books: Vec<&Book>, out: &mut W) -> Result<()> {
    let json = serde_json::to_string_pretty(&books).context("Failed to serialize books")?;
    writeln!(out, "{}", json)?;
    Ok(())
}

/// Sample flow: two identical books, print matches, save
fn run_demo<W: Write>(file: &Path, out: &mut W) -> Result<()> {
    let mut catalog = Catalog::new();
    catalog.add(Book::new("Adam Mickiewicz", "Pan Tadeusz", 46.99));
    catalog.add(Book::new("Adam Mickiewicz", "Pan Tadeusz", 46.99));

    for book in catalog.find_by_title("Pan Tadeusz") {
        writeln!(out, "{}", book)?;
    }

    let report = catalog.save_to_file(file)?;
    writeln!(out, "{}", report)?;

    Ok(())
}

fn show_config<W: Write>(cfg: &config::ResolvedConfig, out: &mut W) -> Result<()> {
    writeln!(out, "bookshop configuration")?;
    writeln!(out)?;
    writeln!(
        out,
        "Config file:  {}",
        cfg.config_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(none - using defaults)".to_string())
    )?;
    writeln!(out, "Catalog file: {}", cfg.file.display())?;
    writeln!(out, "Source:       {}", cfg.source)?;

    Ok(())
}
