// PersonID CLI - group rows of a CSV that refer to the same person

mod exit_codes;

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{ArgAction, Parser, ValueEnum};

use exit_codes::{
    group_exit_code, EXIT_CONFIG, EXIT_ERROR, EXIT_IO, EXIT_PARSE, EXIT_SUCCESS, EXIT_USAGE,
};
use personid_engine::grouper::annotate;
use personid_engine::{GroupConfig, GroupError, Grouper, MatchingType, Summary, Table};

#[derive(Parser)]
#[command(name = "personid")]
#[command(about = "Group CSV rows that may represent the same person")]
#[command(version)]
#[command(after_help = "\
Matching types:
  email           - Match records with the same email address
  phone           - Match records with the same phone number
  email_or_phone  - Match records with the same email OR phone

Examples:
  personid people.csv email
  personid people.csv email_or_phone -o grouped.csv
  personid people.tsv phone --format json
  personid people.csv --config personid.toml --summary")]
struct Cli {
    /// Input CSV/TSV file (first record is the header)
    input: PathBuf,

    /// Matching type: email, phone, or email_or_phone
    #[arg(env = "PERSONID_MATCHING")]
    matching_type: Option<String>,

    /// TOML config (default matching type, id column, column patterns)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Input delimiter (sniffed when omitted)
    #[arg(long, short = 'd')]
    delimiter: Option<char>,

    /// Output format
    #[arg(long, short = 'f', value_enum, default_value_t = Format::Csv)]
    format: Format,

    /// Output file (omit for stdout)
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,

    /// Print a one-line group summary to stderr
    #[arg(long)]
    summary: bool,

    /// Raise log verbosity (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(long, short = 'v', action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Csv,
    Tsv,
    Json,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn args(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self { code: EXIT_IO, message: msg.into(), hint: None }
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        Self { code: EXIT_PARSE, message: msg.into(), hint: None }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self { code: EXIT_CONFIG, message: msg.into(), hint: None }
    }

    pub fn general(msg: impl Into<String>) -> Self {
        Self { code: EXIT_ERROR, message: msg.into(), hint: None }
    }

    /// Create error from an engine error with the matching exit code.
    pub fn group(err: GroupError) -> Self {
        let code = group_exit_code(&err);
        let hint = match &err {
            GroupError::InvalidInput(_) => Some(matching_types_hint()),
            _ => None,
        };
        Self { code, message: err.to_string(), hint }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

fn matching_types_hint() -> String {
    let names: Vec<&str> = MatchingType::ALL.iter().map(|t| t.as_str()).collect();
    format!("matching type must be one of: {}", names.join(", "))
}

// ============================================================================
// run
// ============================================================================

fn run(cli: Cli) -> Result<(), CliError> {
    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => GroupConfig::default(),
    };

    if !cli.input.exists() {
        return Err(CliError::group(GroupError::FileNotFound(cli.input.clone())));
    }

    let matching_type = cli
        .matching_type
        .clone()
        .or_else(|| config.matching.map(|t| t.to_string()))
        .ok_or_else(|| {
            CliError::args("no matching type given").with_hint(matching_types_hint())
        })?;

    let grouper =
        Grouper::with_config(&cli.input, &matching_type, config).map_err(CliError::group)?;
    log::info!("grouping {} by {}", grouper.input().display(), grouper.matching());

    let table = read_input(grouper.input(), cli.delimiter)?;
    log::debug!("read {} column(s), {} row(s)", table.headers.len(), table.rows.len());

    let (output, summary) = if table.is_empty() {
        (Vec::new(), None)
    } else {
        let grouping = grouper.group(&table);
        let summary = grouping.summary();
        log::info!("{} row(s) in {} group(s)", summary.rows, summary.groups);
        (annotate(&grouper.config().id_column, &table, &grouping), Some(summary))
    };

    let bytes = match cli.format {
        Format::Csv => personid_io::write_csv(&output, b','),
        Format::Tsv => personid_io::write_csv(&output, b'\t'),
        Format::Json => personid_io::write_json(&output),
    }
    .map_err(CliError::general)?;

    match &cli.output {
        Some(path) => {
            std::fs::write(path, &bytes)
                .map_err(|e| CliError::io(format!("cannot write {}: {e}", path.display())))?;
            log::info!("wrote {}", path.display());
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            handle
                .write_all(&bytes)
                .and_then(|_| handle.flush())
                .map_err(|e| CliError::io(e.to_string()))?;
        }
    }

    if cli.summary {
        print_summary(summary.unwrap_or_default(), cli.format)?;
    }

    Ok(())
}

/// One line on stderr; a JSON object when the output format is JSON.
fn print_summary(summary: Summary, format: Format) -> Result<(), CliError> {
    match format {
        Format::Json => {
            let text =
                serde_json::to_string(&summary).map_err(|e| CliError::general(e.to_string()))?;
            eprintln!("{}", text);
        }
        Format::Csv | Format::Tsv if summary.rows == 0 => eprintln!("0 rows, 0 groups"),
        Format::Csv | Format::Tsv => eprintln!(
            "{} rows, {} groups ({} singletons, largest {})",
            summary.rows, summary.groups, summary.singletons, summary.largest_group
        ),
    }
    Ok(())
}

fn load_config(path: &Path) -> Result<GroupConfig, CliError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| CliError::io(format!("cannot read config {}: {e}", path.display())))?;
    GroupConfig::from_toml(&text).map_err(|e| CliError::config(e.to_string()))
}

fn read_input(path: &Path, delimiter: Option<char>) -> Result<Table, CliError> {
    let delimiter = match delimiter {
        Some(c) if c.is_ascii() => Some(c as u8),
        Some(c) => {
            return Err(CliError::args(format!(
                "delimiter must be a single ASCII character, got {c:?}"
            )))
        }
        None => None,
    };

    let content = personid_io::csv::read_file_as_utf8(path).map_err(CliError::io)?;
    let delimiter = delimiter.unwrap_or_else(|| {
        let sniffed = personid_io::csv::sniff_delimiter(&content);
        log::debug!("{}: sniffed delimiter {:?}", path.display(), sniffed as char);
        sniffed
    });
    personid_io::csv::parse_table(&content, delimiter).map_err(CliError::parse)
}
