//! Command-line parsing and dispatch for repo-pulse

use super::{AnalyzeArgs, process_analyze};
use crate::{Host, Result};
use clap::Parser;
use clap::builder::Styles;
use clap::builder::styling::{AnsiColor, Effects};
use std::io::Write;

const CLAP_STYLES: Styles = Styles::styled()
    .header(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

#[derive(Parser, Debug)]
#[command(name = "repo-pulse", author, version, long_about = None)]
#[command(about = "Report commit, pull request, and issue activity of a hosted repository")]
#[command(styles = CLAP_STYLES)]
struct Cli {
    #[command(flatten)]
    analyze: AnalyzeArgs,
}

/// Parse command-line arguments and run the analysis
///
/// Help and version requests are written to the host's output and exit with 0; malformed
/// arguments are written to its error stream and exit with 2. Neither touches the network.
///
/// # Arguments
///
/// * `args` - An iterator of command-line arguments (typically from `std::env::args()`)
pub async fn run<I, T, H>(host: &mut H, args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
    H: Host,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(e) => {
            if e.use_stderr() {
                let _ = write!(host.error(), "{e}");
            } else {
                let _ = write!(host.output(), "{e}");
            }
            host.exit(e.exit_code());
            return Ok(());
        }
    };

    process_analyze(host, &cli.analyze).await
}
