mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use commands::analyze::{AnalyzeArgs, DemoArgs, PlanArgs};

/// True cost of fixed-fee installment plans
#[derive(Parser)]
#[command(
    name = "feeplan",
    version,
    about = "True cost of fixed-fee installment plans",
    long_about = "Converts fixed-fee installment plans into an equivalent APR, compares \
                  them with repaying the same purchase at a reference APR, and finds the \
                  month after which paying off the balance is cheaper than staying on the plan."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "text", global = true)]
    output: OutputFormat,

    /// Shorthand for --output markdown
    #[arg(short, long, global = true)]
    markdown: bool,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze every plan in a JSON or YAML config (or piped stdin)
    Analyze(AnalyzeArgs),
    /// Analyze a single plan given on the command line
    Plan(PlanArgs),
    /// Analyze the built-in example plans
    Demo(DemoArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Markdown,
    Json,
    Table,
    Csv,
    Minimal,
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let format = if cli.markdown {
        OutputFormat::Markdown
    } else {
        cli.output
    };

    let result = match cli.command {
        Commands::Analyze(args) => commands::analyze::run_analyze(args),
        Commands::Plan(args) => commands::analyze::run_plan(args),
        Commands::Demo(args) => commands::analyze::run_demo(args),
        Commands::Version => {
            println!("feeplan {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(run) => {
            tracing::debug!(plans = run.reports.len(), ?format, "rendering analysis");
            output::format_output(format, &run);
            for failure in &run.failures {
                eprintln!("{}: {}", "error".red().bold(), failure.error);
            }
            process::exit(if run.failures.is_empty() { 0 } else { 1 });
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
