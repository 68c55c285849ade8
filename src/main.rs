//! CLI entry point for the navigation indexer.
//!
//! Provides commands for building an index from a C++ tree and running
//! navigation queries against a persisted store.

use anyhow::{Context, Result, anyhow};
use clap::{
    Parser, Subcommand,
    builder::styling::{AnsiColor, Effects, Styles},
};
use navix::{Indexer, Project, Ref, RefKind, Settings};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Instant;
use tracing::error;
use tracing_subscriber::EnvFilter;

fn clap_cargo_style() -> Styles {
    Styles::styled()
        .header(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .usage(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::Green.on_default())
}

/// C++ source navigation indexer
#[derive(Parser)]
#[command(
    name = "navix",
    version = env!("CARGO_PKG_VERSION"),
    about = "Index C++ code and query references, definitions, and symbols",
    styles = clap_cargo_style()
)]
struct Cli {
    /// Path to custom settings.toml file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Emit machine-readable JSON instead of plain text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build or rebuild the index from a source tree
    Index {
        /// Root directory to index
        #[arg(default_value = ".")]
        path: PathBuf,
        /// Where to write the store file (defaults to settings)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List every indexed symbol name
    Symbols,
    /// List every indexed file path
    Paths,
    /// Show all references to a symbol
    Refs {
        /// Symbol name
        name: String,
        /// Restrict to one reference kind (Call, Read, Write, Modify,
        /// AddressTaken, Definition, Use)
        #[arg(short, long)]
        kind: Option<RefKind>,
    },
    /// Show the unique definition site of a symbol, if it has one
    Def {
        /// Symbol name
        name: String,
    },
    /// Show all references inside a line range of a file
    FileRefs {
        /// Indexed file path, exactly as stored
        file: String,
        /// First line (1-based, inclusive)
        #[arg(default_value = "1")]
        first_line: u32,
        /// Last line (inclusive; defaults to end of file)
        #[arg(default_value = "4294967295")]
        last_line: u32,
    },
    /// Display active settings
    Config,
}

#[derive(Serialize)]
struct RefOutput<'a> {
    file: &'a str,
    line: u32,
    start_col: u32,
    end_col: u32,
    symbol: &'a str,
    kind: &'a str,
}

impl<'a> RefOutput<'a> {
    fn new(project: &'a Project, r: &Ref) -> Self {
        Self {
            file: project.file_name(r.file).unwrap_or("<unknown>"),
            line: r.line,
            start_col: r.start_col,
            end_col: r.end_col,
            symbol: project.symbol_name(r.symbol).unwrap_or("<unknown>"),
            kind: r.kind.as_str(),
        }
    }
}

fn load_settings(config: Option<&PathBuf>) -> Result<Settings> {
    let result = match config {
        Some(path) => Settings::load_from(path),
        None => Settings::load(),
    };
    result.context("failed to load settings")
}

fn open_project(settings: &Settings) -> Result<Project> {
    let path = settings.store_path();
    Project::open(&path).with_context(|| format!("cannot open index at '{}'", path.display()))
}

fn print_refs(project: &Project, refs: &[Ref], json: bool) {
    if json {
        let out: Vec<RefOutput> = refs.iter().map(|r| RefOutput::new(project, r)).collect();
        match serde_json::to_string_pretty(&out) {
            Ok(s) => println!("{s}"),
            Err(e) => error!(error = %e, "failed to serialize output"),
        }
        return;
    }
    for r in refs {
        let out = RefOutput::new(project, r);
        println!(
            "{}:{}:{}-{} {} {}",
            out.file, out.line, out.start_col, out.end_col, out.kind, out.symbol
        );
    }
}

fn run(cli: Cli) -> Result<()> {
    let settings = load_settings(cli.config.as_ref())?;

    match cli.command {
        Commands::Index { path, output } => {
            let start = Instant::now();
            let mut indexer = Indexer::new(Arc::new(settings.clone()))?;
            indexer.index_directory(&path)?;
            let stats = indexer.stats();
            let store = indexer.into_store();
            let store_path = output.unwrap_or_else(|| settings.store_path());
            store
                .save(&store_path)
                .with_context(|| format!("cannot write '{}'", store_path.display()))?;
            println!(
                "Indexed {} files ({} failed), {} references in {:.2}s -> {}",
                stats.files_indexed,
                stats.files_failed,
                stats.refs_recorded,
                start.elapsed().as_secs_f64(),
                store_path.display()
            );
        }
        Commands::Symbols => {
            let project = open_project(&settings)?;
            let symbols = project.query_all_symbols();
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&symbols)?);
            } else {
                for name in symbols {
                    println!("{name}");
                }
            }
        }
        Commands::Paths => {
            let project = open_project(&settings)?;
            let paths = project.query_all_paths();
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&paths)?);
            } else {
                for path in paths {
                    println!("{path}");
                }
            }
        }
        Commands::Refs { name, kind } => {
            let project = open_project(&settings)?;
            let refs = match kind {
                Some(kind) => project.query_references_of_symbol_with_kind(&name, kind),
                None => project.query_references_of_symbol(&name),
            };
            print_refs(&project, &refs, cli.json);
        }
        Commands::Def { name } => {
            let project = open_project(&settings)?;
            match project.find_single_definition_of_symbol(&name) {
                Some(def) => print_refs(&project, &[def], cli.json),
                None => return Err(anyhow!("no unique definition for '{name}'")),
            }
        }
        Commands::FileRefs {
            file,
            first_line,
            last_line,
        } => {
            let project = open_project(&settings)?;
            let file_id = project
                .file_id(&file)
                .ok_or_else(|| anyhow!("file '{file}' is not in the index"))?;
            let refs = project.query_file_refs(file_id, first_line, last_line);
            print_refs(&project, &refs, cli.json);
        }
        Commands::Config => {
            println!("{}", serde_json::to_string_pretty(&settings)?);
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
