use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use clip::{ParseOutcome, ParserSchema, Value};
use indexmap::IndexMap;
use serde::Serialize;
use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
    process::ExitCode,
};
use tracing_subscriber::{EnvFilter, fmt};

/// Exit status for command lines that do not satisfy the declarations.
const EXIT_INVALID: u8 = 2;

#[derive(Parser)]
#[command(name = "clip")]
#[command(version, about = "Parse command lines against declared options", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse arguments against a JSON declaration document
    Parse(ParseArgs),

    /// Print the usage text of a JSON declaration document
    Usage(UsageArgs),

    /// Map dash-prefixed arguments to values without any declarations
    Hash(HashArgs),
}

#[derive(Parser)]
struct ParseArgs {
    /// Path to the declaration document
    #[arg(short, long, value_name = "FILE")]
    schema: PathBuf,

    /// Parse one shell-quoted line instead of the trailing arguments
    #[arg(
        short,
        long,
        value_name = "LINE",
        conflicts_with = "args",
        allow_hyphen_values = true
    )]
    line: Option<String>,

    /// Arguments to parse, given after `--`
    #[arg(last = true, value_name = "ARGS")]
    args: Vec<String>,
}

#[derive(Parser)]
struct UsageArgs {
    /// Path to the declaration document
    #[arg(short, long, value_name = "FILE")]
    schema: PathBuf,
}

#[derive(Parser)]
struct HashArgs {
    /// Parse one shell-quoted line instead of the trailing arguments
    #[arg(
        short,
        long,
        value_name = "LINE",
        conflicts_with = "args",
        allow_hyphen_values = true
    )]
    line: Option<String>,

    /// Arguments to map, given after `--`
    #[arg(last = true, value_name = "ARGS")]
    args: Vec<String>,
}

/// What a successful `parse` prints.
#[derive(Serialize)]
struct Report<'a> {
    values: &'a IndexMap<String, Value>,
    remainder: &'a [String],
}

fn main() -> Result<ExitCode> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Parse(args) => parse_command(args),
        Commands::Usage(args) => usage_command(args),
        Commands::Hash(args) => hash_command(args),
    }
}

fn parse_command(args: ParseArgs) -> Result<ExitCode> {
    let mut parser = load_parser(&args.schema)?;
    let outcome = match args.line {
        Some(line) => parser.parse(line.as_str()),
        None => parser.parse(args.args),
    };

    match outcome {
        ParseOutcome::Help(text) => {
            print!("{text}");
            Ok(ExitCode::SUCCESS)
        }
        ParseOutcome::Parsed if parser.is_valid() => {
            print_json(&Report {
                values: parser.values(),
                remainder: parser.remainder(),
            })?;
            Ok(ExitCode::SUCCESS)
        }
        ParseOutcome::Parsed => {
            tracing::debug!(errors = parser.errors().len(), "arguments rejected");
            eprint!("{parser}");
            Ok(ExitCode::from(EXIT_INVALID))
        }
    }
}

fn usage_command(args: UsageArgs) -> Result<ExitCode> {
    let parser = load_parser(&args.schema)?;
    print!("{}", parser.help());
    Ok(ExitCode::SUCCESS)
}

fn hash_command(args: HashArgs) -> Result<ExitCode> {
    let map = match args.line {
        Some(line) => clip::hash::to_map(line.as_str()),
        None => clip::hash::to_map(args.args),
    };
    print_json(&map)?;
    Ok(ExitCode::SUCCESS)
}

fn load_parser(path: &Path) -> Result<clip::Parser> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let parser = ParserSchema::from_json(&text)
        .and_then(|schema| schema.build())
        .with_context(|| format!("failed to load declarations from {}", path.display()))?;
    tracing::debug!(
        path = %path.display(),
        options = parser.specs().len(),
        "loaded declarations"
    );
    Ok(parser)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value).context("failed to write JSON")?;
    writeln!(stdout)?;
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
