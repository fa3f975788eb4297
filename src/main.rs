use anyhow::Result;
use clap::Parser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use sankey::cli::{handle_report_command, ReportArgs};

#[derive(Parser)]
#[command(
    name = "sankey",
    version,
    about = "Make a Sankey diagram out of exported transaction data",
    long_about = "Aggregates an exported transaction CSV by category and prints \
                  a Sankey diagram description showing how income flows into \
                  spending categories, savings, and taxes."
)]
struct Cli {
    #[command(flatten)]
    report: ReportArgs,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "sankey=warn",
        1 => "sankey=debug",
        _ => "sankey=trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let stdout = std::io::stdout();
    let stderr = std::io::stderr();
    handle_report_command(&cli.report, &mut stdout.lock(), &mut stderr.lock())?;

    Ok(())
}
