use super::Host;
use super::config::Config;
use crate::Result;
use crate::activity::{ActivityError, ActivityReport, Analyzer, Client, RepoSpec, start_of_day};
use crate::reports::{generate_console, generate_json};
use camino::{Utf8Path, Utf8PathBuf};
use chrono::{DateTime, Local, NaiveDate, Utc};
use clap::{Args, ValueEnum};
use ohno::IntoAppError;
use std::fs;
use std::io::Write;

const LOG_TARGET: &str = "   analyze";

/// Exit code for bad command-line input or configuration
pub const EXIT_USAGE: i32 = 2;

/// Exit code for runtime failures, including a failure of any single report
pub const EXIT_FAILURE: i32 = -1;

/// Color mode configuration for output
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Always use colors
    Always,

    /// Never use colors
    Never,

    /// Use colors if the output is a terminal, otherwise don't use colors
    Auto,
}

/// Log level for diagnostic output
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// No logging output
    None,

    /// Only error messages
    Error,

    /// Warning and error messages
    Warn,

    /// Info, warning, and error messages
    Info,

    /// Debug, info, warning, and error messages
    Debug,

    /// Trace, debug, info, warning, and error messages
    Trace,
}

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Web URL of the repository to analyze, e.g. <https://github.com/owner/repo>
    #[arg(value_name = "URL")]
    pub url: String,

    /// First day of the window (inclusive); defaults to the repository creation date
    #[arg(short = 'f', long, value_name = "YYYY-MM-DD")]
    pub from: Option<NaiveDate>,

    /// Day at which the window ends (exclusive); defaults to today
    #[arg(short = 't', long, value_name = "YYYY-MM-DD")]
    pub to: Option<NaiveDate>,

    /// Branch whose commits and pull requests are analyzed
    #[arg(short = 'b', long, value_name = "NAME", default_value = "master")]
    pub branch: String,

    /// Number of authors listed in the commit report
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
    pub top: Option<u32>,

    /// Access token sent with every request
    #[arg(long, value_name = "TOKEN", env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Root of the hosting service's REST API
    #[arg(long, value_name = "URL", env = "REPO_PULSE_API_URL")]
    pub api_url: Option<String>,

    /// Path to configuration file (default is `pulse.toml`)
    #[arg(long, short = 'c', value_name = "PATH")]
    pub config: Option<Utf8PathBuf>,

    /// Control when to use colored output
    #[arg(long, value_name = "WHEN", default_value = "auto")]
    pub color: ColorMode,

    /// Output the reports to a JSON file
    #[arg(long, value_name = "PATH", help_heading = "Report Output")]
    pub json: Option<Utf8PathBuf>,

    /// Show progress information (same as `--log-level info`)
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Set the logging level for diagnostic output
    #[arg(long, value_name = "LEVEL", default_value = "none")]
    pub log_level: LogLevel,
}

impl AnalyzeArgs {
    const fn effective_log_level(&self) -> LogLevel {
        match self.log_level {
            LogLevel::None if self.verbose => LogLevel::Info,
            level => level,
        }
    }
}

/// Why a run ended early, classified by exit code.
#[derive(Debug)]
enum Failure {
    Usage(String),
    Runtime(String),
}

impl Failure {
    fn usage(e: &ohno::AppError) -> Self {
        Self::Usage(format!("{e:#}"))
    }

    fn runtime(e: &ohno::AppError) -> Self {
        Self::Runtime(format!("{e:#}"))
    }
}

impl From<ActivityError> for Failure {
    fn from(e: ActivityError) -> Self {
        match e {
            ActivityError::Usage(msg) => Self::Usage(msg),
            ActivityError::QuotaExhausted { reset_at: Some(at) } => Self::Runtime(format!(
                "{e}; the quota resets at {}",
                at.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S %:z")
            )),
            e => Self::Runtime(e.to_string()),
        }
    }
}

/// Analyze one repository and print its reports.
///
/// Problems are reported through `host`: a usage or configuration error exits with
/// [`EXIT_USAGE`]; a runtime error, or any report that failed, exits with [`EXIT_FAILURE`].
pub async fn process_analyze<H: Host>(host: &mut H, args: &AnalyzeArgs) -> Result<()> {
    init_logging(args.effective_log_level());

    let code = match analyze(host, args, Utc::now()).await {
        Ok(report) if report.has_failures() => EXIT_FAILURE,
        Ok(_) => return Ok(()),
        Err(Failure::Usage(msg)) => {
            let _ = writeln!(host.error(), "error: {msg}");
            EXIT_USAGE
        }
        Err(Failure::Runtime(msg)) => {
            let _ = writeln!(host.error(), "error: {msg}");
            EXIT_FAILURE
        }
    };

    host.exit(code);
    Ok(())
}

async fn analyze<H: Host>(host: &mut H, args: &AnalyzeArgs, now: DateTime<Utc>) -> core::result::Result<ActivityReport, Failure> {
    let config = Config::load(Utf8Path::new("."), args.config.as_ref()).map_err(|e| Failure::usage(&e))?;
    let repo = RepoSpec::parse(&args.url)?;

    let api_url = args.api_url.as_deref().unwrap_or(&config.api_url);
    let token = args.token.as_deref().filter(|t| !t.is_empty());
    let client = Client::new(token, api_url, config.request_timeout()).map_err(|e| Failure::usage(&e))?;

    let from = args.from.map(start_of_day);
    let to = start_of_day(args.to.unwrap_or_else(|| now.date_naive()));
    log::debug!(target: LOG_TARGET, "Using API at {}", client.base_url());

    let analyzer = Analyzer::new(&client, &repo, config.analysis_settings(args.top));
    let report = analyzer.run(from, to, &args.branch, now).await?;

    write_reports(host, args, &report).map_err(|e| Failure::runtime(&e))?;
    Ok(report)
}

fn write_reports<H: Host>(host: &mut H, args: &AnalyzeArgs, report: &ActivityReport) -> Result<()> {
    let use_colors = match args.color {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => {
            use std::io::{IsTerminal, stdout};
            stdout().is_terminal()
        }
    };

    let mut console_output = String::new();
    generate_console(report, use_colors, &mut console_output)?;
    let _ = write!(host.output(), "{console_output}");

    if let Some(filename) = &args.json {
        let mut json_output = String::new();
        generate_json(report, &mut json_output)?;
        fs::write(filename, json_output).into_app_err_with(|| format!("writing JSON report to '{filename}'"))?;
        log::info!(target: LOG_TARGET, "Wrote JSON report to {filename}");
    }

    Ok(())
}

/// Initialize logger based on log level
fn init_logging(log_level: LogLevel) {
    let rust_log = std::env::var("RUST_LOG").ok();
    let Some(filter) = log_filter(log_level, rust_log.as_deref()) else {
        return;
    };

    // a logger may already be installed when running more than once in a process
    let _ = env_logger::Builder::new()
        .parse_filters(&filter)
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(matches!(log_level, LogLevel::Debug | LogLevel::Trace))
        .try_init();
}

/// The filter to install, or `None` when logging stays off.
///
/// A non-empty `RUST_LOG` wins over the command-line level, including the default `none`.
fn log_filter(log_level: LogLevel, rust_log: Option<&str>) -> Option<String> {
    if let Some(filter) = rust_log.filter(|f| !f.trim().is_empty()) {
        return Some(filter.to_string());
    }

    let level = match log_level {
        LogLevel::None => return None,
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
        LogLevel::Trace => "trace",
    };
    Some(level.to_string())
}
