use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use glob::glob;
use log::info;
use petdata_core::{DataSet, DecoderConfig, FormatProfile, Report, decode_file, make_report};
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("PETDATA_BUILD_COMMIT"),
    " ",
    env!("PETDATA_BUILD_DATE"),
    ")"
);

#[derive(Parser, Debug)]
#[command(name = "petdata")]
#[command(version, long_version = LONG_VERSION)]
#[command(
    about = "Decoder for PET/CT scanner data files (raw, list-mode, Michelogram, calibration).",
    long_about = None,
    after_help = "Examples:\n  petdata decode scan.dat --config petdata.toml -o scan.json\n  petdata decode scan.dat --config petdata.toml --profile big-trimmed --stdout\n  petdata summary scan.dat --config petdata.toml"
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Decode a data file and write a versioned JSON report.
    Decode {
        /// Path to a data file (a glob must match exactly one file)
        input: PathBuf,

        /// TOML file with the type codes and interface-position prefix
        #[arg(short, long)]
        config: PathBuf,

        /// Byte order and string policy: <big|little>-<raw|trimmed>
        #[arg(short, long, default_value = "little-raw")]
        profile: FormatProfile,

        /// Output report path (JSON)
        #[arg(short = 'o', long, required_unless_present = "stdout")]
        report: Option<PathBuf>,

        /// Write JSON report to stdout
        #[arg(long, conflicts_with = "report")]
        stdout: bool,

        /// Pretty-print JSON output
        #[arg(long, conflicts_with = "compact")]
        pretty: bool,

        /// Compact JSON output (default)
        #[arg(long)]
        compact: bool,

        /// Suppress non-error output
        #[arg(long)]
        quiet: bool,
    },
    /// Print a short human-readable description of a data file.
    Summary {
        /// Path to a data file (a glob must match exactly one file)
        input: PathBuf,

        /// TOML file with the type codes and interface-position prefix
        #[arg(short, long)]
        config: PathBuf,

        /// Byte order and string policy: <big|little>-<raw|trimmed>
        #[arg(short, long, default_value = "little-raw")]
        profile: FormatProfile,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let result = match cli.command {
        Commands::Decode {
            input,
            config,
            profile,
            report,
            stdout,
            pretty,
            compact,
            quiet,
        } => cmd_decode(
            input, config, profile, report, stdout, pretty, compact, quiet,
        ),
        Commands::Summary {
            input,
            config,
            profile,
        } => cmd_summary(input, config, profile),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err.message);
            if let Some(hint) = err.hint {
                eprintln!("hint: {}", hint);
            }
            ExitCode::from(2)
        }
    }
}

#[derive(Debug)]
struct CliError {
    message: String,
    hint: Option<String>,
}

impl CliError {
    fn new(message: impl Into<String>, hint: Option<String>) -> Self {
        Self {
            message: message.into(),
            hint,
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        CliError::new(format!("{err:#}"), None)
    }
}

#[allow(clippy::too_many_arguments)]
fn cmd_decode(
    input: PathBuf,
    config: PathBuf,
    profile: FormatProfile,
    report: Option<PathBuf>,
    stdout: bool,
    pretty: bool,
    compact: bool,
    quiet: bool,
) -> Result<(), CliError> {
    let resolved_input = resolve_input_path(&input)?;
    validate_input_file(&resolved_input)?;
    let input_abs = fs::canonicalize(&resolved_input)
        .with_context(|| format!("Failed to resolve input path: {}", resolved_input.display()))?;
    let report = if stdout {
        None
    } else {
        Some(report.ok_or_else(|| {
            CliError::new(
                "missing output path",
                Some("use -o/--report or --stdout".to_string()),
            )
        })?)
    };

    if let Some(report_path) = report.as_ref() {
        ensure_distinct_output(report_path, &input_abs)?;
    }

    let dataset = load_dataset(&resolved_input, &config, profile)?;
    let meta = fs::metadata(&resolved_input)
        .with_context(|| format!("Failed to read input file: {}", resolved_input.display()))?;

    let mut rep = make_report(
        &resolved_input.display().to_string(),
        meta.len(),
        profile,
        dataset,
    );
    if let Ok(now) = OffsetDateTime::now_utc().format(&Rfc3339) {
        rep.generated_at = now;
    }
    let json = serialize_report(&rep, pretty, compact)?;

    let Some(report) = report else {
        print!("{}", json);
        return Ok(());
    };

    if let Some(parent) = report.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create output directory: {}", parent.display())
            })?;
        }
    }

    fs::write(&report, json)
        .with_context(|| format!("Failed to write report: {}", report.display()))?;

    if !quiet {
        eprintln!("OK: report written -> {}", report.display());
    }
    Ok(())
}

fn cmd_summary(input: PathBuf, config: PathBuf, profile: FormatProfile) -> Result<(), CliError> {
    let resolved_input = resolve_input_path(&input)?;
    validate_input_file(&resolved_input)?;
    let dataset = load_dataset(&resolved_input, &config, profile)?;
    print!("{}", render_summary(&resolved_input, profile, &dataset));
    Ok(())
}

fn load_dataset(input: &Path, config: &Path, profile: FormatProfile) -> Result<DataSet, CliError> {
    let decoder_config = DecoderConfig::load(config).map_err(|err| {
        CliError::new(
            format!("failed to load config {}: {}", config.display(), err),
            Some("expected ip_prefix and a [type_codes] table".to_string()),
        )
    })?;
    info!("decoding {} as {}", input.display(), profile);

    let dataset = decode_file(input, profile, &decoder_config).map_err(|err| {
        CliError::new(
            format!("failed to decode {}: {}", input.display(), err),
            Some("check --profile (little-raw or big-trimmed)".to_string()),
        )
    })?;
    info!(
        "decoded {} with {} records",
        dataset.kind,
        dataset.payload.len()
    );
    Ok(dataset)
}

fn render_summary(input: &Path, profile: FormatProfile, dataset: &DataSet) -> String {
    let summary = dataset.summary();
    let yes_no = |present: bool| if present { "present" } else { "absent" };

    let mut out = String::new();
    out.push_str(&format!("File: {}\n", input.display()));
    out.push_str(&format!("Profile: {}\n", profile));
    out.push_str(&format!(
        "Kind: {} (type code {})\n",
        summary.kind, summary.data_type
    ));
    out.push_str(&format!("Software version: {}\n", summary.software_version));
    out.push_str(&format!(
        "Device: {} (serial {})\n",
        summary.device, summary.serial
    ));
    out.push_str(&format!(
        "Acquisition info: {}\n",
        yes_no(summary.has_acquisition_info)
    ));
    out.push_str(&format!("Image info: {}\n", yes_no(summary.has_image_info)));
    out.push_str(&format!("Declared data length: {}\n", summary.data_length));
    out.push_str(&format!("Records: {}\n", summary.records));
    out
}

fn ensure_distinct_output(report_path: &Path, input_abs: &Path) -> Result<(), CliError> {
    let parent = match report_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    // A directory that does not exist yet cannot hold the input file.
    if !parent.exists() {
        return Ok(());
    }
    let report_dir = fs::canonicalize(parent)
        .with_context(|| format!("Failed to resolve output path: {}", report_path.display()))?;
    let report_target = report_dir.join(
        report_path
            .file_name()
            .ok_or_else(|| anyhow::anyhow!("Invalid report path"))?,
    );
    if report_target == input_abs {
        return Err(CliError::new(
            format!(
                "report path must differ from input: {}",
                report_path.display()
            ),
            Some("choose a different output path".to_string()),
        ));
    }
    Ok(())
}

fn serialize_report(rep: &Report, pretty: bool, compact: bool) -> Result<String, CliError> {
    if pretty && compact {
        return Err(CliError::new(
            "cannot use --pretty and --compact together",
            Some("choose one output format".to_string()),
        ));
    }
    if pretty {
        serde_json::to_string_pretty(rep)
            .context("JSON serialization failed")
            .map_err(Into::into)
    } else {
        serde_json::to_string(rep)
            .context("JSON serialization failed")
            .map_err(Into::into)
    }
}

fn validate_input_file(input: &Path) -> Result<(), CliError> {
    if !input.exists() {
        return Err(CliError::new(
            format!("input file not found: {}", input.display()),
            Some("pass the path of a scanner data file".to_string()),
        ));
    }
    if !input.is_file() {
        return Err(CliError::new(
            format!("input is not a file: {}", input.display()),
            Some("pass the path of a scanner data file".to_string()),
        ));
    }
    Ok(())
}

fn resolve_input_path(input: &Path) -> Result<PathBuf, CliError> {
    let pattern = input.to_string_lossy();
    if !is_glob_pattern(&pattern) {
        return Ok(input.to_path_buf());
    }

    let mut matches = Vec::new();
    let paths = glob(&pattern).map_err(|err| {
        CliError::new(
            format!("invalid input pattern '{}'", pattern),
            Some(format!("pattern error: {}", err.msg)),
        )
    })?;
    for entry in paths {
        let path = entry.map_err(|err| {
            CliError::new(
                format!("invalid input pattern '{}'", pattern),
                Some(format!("pattern error: {}", err)),
            )
        })?;
        if path.is_file() {
            matches.push(path);
        }
    }

    if matches.is_empty() {
        return Err(CliError::new(
            format!("no files match pattern '{}'", pattern),
            Some("check the path or quote the pattern".to_string()),
        ));
    }
    if matches.len() > 1 {
        let hint = "pass a single data file, or run once per file".to_string();
        let mut message = format!(
            "multiple files match pattern '{}' ({} matches)",
            pattern,
            matches.len()
        );
        let listed = matches
            .iter()
            .take(3)
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>();
        message.push_str("; matches: ");
        message.push_str(&listed.join(", "));
        if matches.len() > 3 {
            message.push_str(", ...");
        }
        return Err(CliError::new(message, Some(hint)));
    }

    Ok(matches.remove(0))
}

fn is_glob_pattern(input: &str) -> bool {
    input.contains('*') || input.contains('?') || input.contains('[')
}
