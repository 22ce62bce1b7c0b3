use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use colored::Colorize;
use sanity_core::logging::init_tracing;
use sanity_core::{CheckerConfig, OutputFormat, SanityError};
use sanity_rules::{RecordDocument, RuleEngine};
use tracing::info;

mod output;

use output::{print_json_report, print_rule_list, print_text_report, RulesSource};

/// Exit status when `--strict` is set and violations were found.
const EXIT_VIOLATIONS: u8 = 1;
/// Exit status for malformed input or an unloadable rule configuration.
const EXIT_FATAL: u8 = 2;

#[derive(Parser)]
#[command(name = "sanity-check")]
#[command(version, about = "Check paper annotation records against conditional consistency rules", long_about = None)]
struct Cli {
    /// Annotation record: a flat record, one exported paper entry, or a whole export.json
    #[arg(required_unless_present = "list_rules", conflicts_with = "list_rules")]
    record: Option<PathBuf>,
    /// Rule configuration (JSON/YAML file or directory); defaults to the built-in rules
    rules: Option<PathBuf>,
    /// Only check the paper with this key in an export bundle
    #[arg(long)]
    paper: Option<String>,
    /// Report format
    #[arg(long, value_enum)]
    format: Option<FormatArg>,
    /// Exit with status 1 when any violation is found
    #[arg(long)]
    strict: bool,
    /// Print the active rules (built-in, SANITY_RULES, or the given configuration) and exit
    #[arg(long, value_name = "RULES", num_args = 0..=1)]
    list_rules: Option<Option<PathBuf>>,
    /// Tracing level (overridden by RUST_LOG)
    #[arg(long)]
    log_level: Option<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    Text,
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Text => OutputFormat::Text,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if !atty::is(atty::Stream::Stdout) {
        colored::control::set_override(false);
    }

    match run(cli) {
        Ok(status) => status,
        Err(err) => {
            eprintln!("{} {}", "error:".red().bold(), err);
            ExitCode::from(EXIT_FATAL)
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode, SanityError> {
    let config = CheckerConfig::from_env()?;
    let log_level = cli.log_level.as_deref().unwrap_or(config.log_level.as_str());
    init_tracing(Some(log_level))?;

    let listed_rules = cli.list_rules.clone().flatten();
    let rules_path = listed_rules
        .or(cli.rules.clone())
        .or(config.rules_path.clone());
    let engine = RuleEngine::from_optional_path(rules_path.as_deref())?;
    let source = RulesSource::from_path(rules_path.as_deref());

    if cli.list_rules.is_some() {
        print_rule_list(&engine, &source);
        return Ok(ExitCode::SUCCESS);
    }

    let Some(record_path) = cli.record else {
        return Err(SanityError::malformed_record(
            "<none>",
            "no annotation record given",
        ));
    };
    let source_name = record_path.display().to_string();

    let mut document = RecordDocument::from_path(&record_path)?;
    if let Some(key) = cli.paper.as_deref() {
        document = document.select_paper(key, &source_name)?;
    }

    let report = engine.validate_document(&document);
    info!(
        record = %source_name,
        violations = report.violation_count(),
        "validation finished"
    );

    let format = cli.format.map(OutputFormat::from).unwrap_or(config.output_format);
    match format {
        OutputFormat::Text => print_text_report(&report),
        OutputFormat::Json => print_json_report(&report, &source_name, &source)?,
    }

    let strict = cli.strict || config.strict;
    if strict && !report.is_clean() {
        Ok(ExitCode::from(EXIT_VIOLATIONS))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
