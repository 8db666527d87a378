#![forbid(unsafe_code)]

mod cmd;
mod output;

use clap::{CommandFactory, Parser, Subcommand};
use meshstat_core::config::{self, EffectiveConfig};
use meshstat_core::error::ErrorCode;
use meshstat_core::timing;
use output::{CliError, OutputMode};
use std::env;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "meshstat: clustering and centralization metrics for undirected graphs",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit stage timing report to stderr.
    #[arg(long, global = true)]
    timing: bool,

    /// Output format.
    #[arg(long, value_enum, global = true)]
    format: Option<OutputMode>,

    /// Shorthand for `--format json`.
    #[arg(long, global = true, hide = true)]
    json: bool,

    /// Project config file (defaults to ./meshstat.toml when present).
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Treat the first line of the edge list as data instead of a header.
    #[arg(long, global = true)]
    no_header: bool,

    /// Only log errors.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// The explicitly requested output mode, if any flag set one.
    fn format_flag(&self) -> Option<&'static str> {
        match (self.format, self.json) {
            (Some(mode), _) => Some(mode.as_str()),
            (None, true) => Some(OutputMode::Json.as_str()),
            (None, false) => None,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Metrics",
        about = "Report graph-wide clustering and centralization",
        long_about = "Load an edge list and report node count, edge count, average clustering, \
                      the top-N clustering coefficients and Freeman degree centralization.",
        after_help = "EXAMPLES:\n    # Analyze an edge list\n    meshstat analyze edges.csv\n\n    # Show the 3 most clustered nodes\n    meshstat analyze edges.csv --top 3\n\n    # Emit machine-readable output\n    meshstat analyze edges.csv --format json"
    )]
    Analyze(cmd::analyze::AnalyzeArgs),

    #[command(
        next_help_heading = "Metrics",
        about = "Show one node's clustering coefficient",
        long_about = "Load an edge list and print the local clustering coefficient of a single node.",
        after_help = "EXAMPLES:\n    # Coefficient of node A\n    meshstat coefficient edges.csv A\n\n    # Emit machine-readable output\n    meshstat coefficient edges.csv A --json"
    )]
    Coefficient(cmd::coefficient::CoefficientArgs),

    #[command(
        next_help_heading = "Metrics",
        about = "Show structural statistics",
        long_about = "Load an edge list and print counts, density, components and degree summary.",
        after_help = "EXAMPLES:\n    # Structural summary\n    meshstat stats edges.csv\n\n    # Emit machine-readable output\n    meshstat stats edges.csv --format json"
    )]
    Stats(cmd::stats::StatsArgs),

    #[command(
        next_help_heading = "Maintenance",
        about = "Generate shell completion scripts",
        long_about = "Generate shell completion scripts for supported shells.",
        after_help = "EXAMPLES:\n    # Generate bash completions\n    meshstat completions bash\n\n    # Generate zsh completions\n    meshstat completions zsh"
    )]
    Completions(cmd::completions::CompletionsArgs),
}

fn init_tracing(quiet: bool, verbose: bool) {
    let filter = EnvFilter::try_from_env("MESHSTAT_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if quiet {
            "error"
        } else if verbose || env::var("DEBUG").is_ok() {
            "meshstat=debug,info"
        } else {
            "meshstat=info,warn"
        })
    });

    let format = env::var("MESHSTAT_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

/// Resolve config files, rendering failures as `E1002` before bailing.
fn load_config(cli: &Cli, project_root: &std::path::Path) -> anyhow::Result<EffectiveConfig> {
    config::resolve_config(cli.config.as_deref(), project_root, cli.format_flag()).or_else(|err| {
        let mode = cli
            .format_flag()
            .and_then(OutputMode::from_name)
            .unwrap_or(OutputMode::Text);
        output::render_error(
            mode,
            &CliError::with_code(ErrorCode::ConfigParseError, format!("{err:#}")),
        )?;
        Err(err)
    })
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.quiet, cli.verbose);

    let timing_enabled = cli.timing || timing::timing_enabled_from_env();
    timing::set_timing_enabled(timing_enabled);
    timing::clear_timings();

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    let command_result = if let Commands::Completions(ref args) = cli.command {
        timing::timed("cmd.completions", || {
            let mut command = Cli::command();
            cmd::completions::run_completions(args.shell, &mut command)
        })
    } else {
        let project_root = env::current_dir()?;
        let effective = load_config(&cli, &project_root)?;
        let ctx = cmd::CommandContext::new(&effective, cli.no_header);

        match cli.command {
            Commands::Analyze(ref args) => {
                timing::timed("cmd.analyze", || cmd::analyze::run_analyze(args, &ctx))
            }
            Commands::Coefficient(ref args) => timing::timed("cmd.coefficient", || {
                cmd::coefficient::run_coefficient(args, &ctx)
            }),
            Commands::Stats(ref args) => {
                timing::timed("cmd.stats", || cmd::stats::run_stats(args, &ctx))
            }
            Commands::Completions(_) => Ok(()),
        }
    };

    if timing_enabled {
        let report = timing::collect_report();
        if report.is_empty() {
            eprintln!("timing report: no samples recorded");
        } else {
            eprintln!("timing report:");
            eprintln!("{}", report.display_table());
            eprintln!("timing report (json):");
            eprintln!("{}", serde_json::to_string_pretty(&report.to_json())?);
        }
    }

    command_result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timing_flag_parses_before_subcommand() {
        let cli = Cli::parse_from(["meshstat", "--timing", "stats", "g.csv"]);
        assert!(cli.timing);
        assert!(matches!(cli.command, Commands::Stats(_)));
    }

    #[test]
    fn timing_flag_parses_after_subcommand() {
        let cli = Cli::parse_from(["meshstat", "analyze", "g.csv", "--timing"]);
        assert!(cli.timing);
    }

    #[test]
    fn format_flag_sets_output_mode() {
        let cli = Cli::parse_from(["meshstat", "--format", "text", "analyze", "g.csv"]);
        assert_eq!(cli.format, Some(OutputMode::Text));
        assert_eq!(cli.format_flag(), Some("text"));
    }

    #[test]
    fn json_flag_after_subcommand() {
        let cli = Cli::parse_from(["meshstat", "stats", "g.csv", "--json"]);
        assert!(cli.json);
        assert_eq!(cli.format_flag(), Some("json"));
    }

    #[test]
    fn format_wins_over_json() {
        let cli = Cli::parse_from(["meshstat", "--json", "--format", "pretty", "stats", "g.csv"]);
        assert_eq!(cli.format_flag(), Some("pretty"));
    }

    #[test]
    fn no_output_flag_defers_to_config() {
        let cli = Cli::parse_from(["meshstat", "stats", "g.csv"]);
        assert!(cli.format_flag().is_none());
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        let result = Cli::try_parse_from(["meshstat", "-q", "-v", "stats", "g.csv"]);
        assert!(result.is_err());
    }

    #[test]
    fn analyze_top_parses() {
        let cli = Cli::parse_from(["meshstat", "analyze", "g.csv", "--top", "3"]);
        match cli.command {
            Commands::Analyze(args) => {
                assert_eq!(args.top, Some(3));
                assert_eq!(args.path, PathBuf::from("g.csv"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn coefficient_requires_node() {
        assert!(Cli::try_parse_from(["meshstat", "coefficient", "g.csv"]).is_err());
        let cli = Cli::parse_from(["meshstat", "coefficient", "g.csv", "A"]);
        assert!(matches!(cli.command, Commands::Coefficient(_)));
    }

    #[test]
    fn no_header_and_config_are_global() {
        let cli = Cli::parse_from([
            "meshstat",
            "analyze",
            "g.csv",
            "--no-header",
            "--config",
            "alt.toml",
        ]);
        assert!(cli.no_header);
        assert_eq!(cli.config, Some(PathBuf::from("alt.toml")));
    }

    #[test]
    fn completions_subcommand_parses() {
        let cli = Cli::parse_from(["meshstat", "completions", "bash"]);
        assert!(matches!(cli.command, Commands::Completions(_)));
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }
}
