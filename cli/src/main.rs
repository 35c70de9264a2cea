//! qrg CLI - bulk data entry documentation lookup

use std::path::PathBuf;
use std::process::Command;

use clap::Parser;
use colored::Colorize;

use qrg::{render, Card, Config};

#[derive(Parser)]
#[command(name = "qrg")]
#[command(version)]
#[command(about = "Look up bulk data entry documentation from the Quick Reference Guide", long_about = None)]
struct Cli {
    /// Bulk data entry name (case-insensitive)
    #[arg(value_name = "ENTRY")]
    entry: String,

    /// Open the guide PDF at the entry's page instead of printing
    #[arg(short = 'p', long = "pdf")]
    open_pdf: bool,

    /// Re-extract from the guide even when a cached record exists
    #[arg(long)]
    refresh: bool,

    /// Path to the Quick Reference Guide PDF
    #[arg(long, value_name = "FILE")]
    doc: Option<PathBuf>,

    /// Path to the DataTypes XML listing valid entry names
    #[arg(long, value_name = "FILE")]
    datatypes: Option<PathBuf>,

    /// Directory for cached JSON records
    #[arg(long, value_name = "DIR")]
    cache_dir: Option<PathBuf>,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = Config::new().with_refresh(cli.refresh);
    if let Some(doc) = cli.doc {
        config = config.with_pdf_path(doc);
    }
    if let Some(datatypes) = cli.datatypes {
        config = config.with_datatypes_path(datatypes);
    }
    if let Some(cache_dir) = cli.cache_dir {
        config = config.with_cache_dir(cache_dir);
    }

    log::debug!(
        "guide: {}, catalog: {}, cache: {}",
        config.pdf_path.display(),
        config.datatypes_path.display(),
        config.cache_dir.display()
    );

    let card = qrg::lookup(&cli.entry, &config)?;

    if cli.open_pdf {
        return open_viewer(&card, &config);
    }

    let text = render(&card, &config.base_url);
    if text.is_empty() {
        eprintln!(
            "{}",
            format!("No documentation extracted for {}.", card.name).yellow()
        );
    } else {
        println!("{}", text);
    }

    Ok(())
}

/// Open the guide PDF at the entry's page in the configured viewer.
fn open_viewer(card: &Card, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    if card.source_page == 0 {
        return Err(format!(
            "no source page recorded for {}; run with --refresh to re-extract",
            card.name
        )
        .into());
    }

    let path = config.pdf_path.canonicalize()?;
    Command::new(&config.viewer)
        .arg(format!("file://{}#page={}", path.display(), card.source_page))
        .spawn()?;

    println!(
        "{} {} at page {}",
        "Opening".green(),
        path.display(),
        card.source_page
    );
    Ok(())
}
