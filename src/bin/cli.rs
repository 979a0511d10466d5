use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use attrcheck::checks::{list_operators, Severity};
use attrcheck::config::Config;
use attrcheck::output::OutputFormat;
use attrcheck::CheckOptions;

#[derive(Parser)]
#[command(
    name = "attrcheck",
    about = "Evaluate attribute policies against a resource graph",
    version,
    author
)]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run checks against a resource graph JSON file
    Check {
        /// Path to the resource graph
        graph: PathBuf,

        /// Check file or directory (repeatable)
        #[arg(long = "checks", short = 'k')]
        checks: Vec<PathBuf>,

        /// Config file path
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,

        /// Output format (console, json)
        #[arg(long, short = 'f', default_value = "console")]
        format: String,

        /// Minimum severity to fail (info, low, medium, high, critical)
        #[arg(long)]
        fail_on: Option<String>,

        /// Write output to file instead of stdout
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// List all supported operators
    ListOperators {
        /// Output format (table, json)
        #[arg(long, short = 'f', default_value = "table")]
        format: String,
    },

    /// Generate a starter .attrcheck.toml config file
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "attrcheck=debug" } else { "attrcheck=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Check {
            graph,
            checks,
            config,
            format,
            fail_on,
            output,
        } => cmd_check(graph, checks, config, format, fail_on, output),
        Commands::ListOperators { format } => cmd_list_operators(format),
        Commands::Init { force } => cmd_init(force),
    };

    match result {
        Ok(exit_code) => process::exit(exit_code),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(e.exit_code());
        }
    }
}

fn cmd_check(
    graph: PathBuf,
    checks: Vec<PathBuf>,
    config: Option<PathBuf>,
    format_str: String,
    fail_on_str: Option<String>,
    output_path: Option<PathBuf>,
) -> Result<i32, attrcheck::error::CheckError> {
    let format = OutputFormat::from_str_lenient(&format_str).unwrap_or_else(|| {
        eprintln!("Warning: unknown format '{}', using console", format_str);
        OutputFormat::Console
    });

    let fail_on = fail_on_str.and_then(|s| {
        let sev = Severity::from_str_lenient(&s);
        if sev.is_none() {
            eprintln!("Warning: unknown severity '{}', using config default", s);
        }
        sev
    });

    let options = CheckOptions {
        config_path: config,
        check_paths: checks,
        fail_on_override: fail_on,
    };

    let report = attrcheck::check(&graph, &options)?;
    let rendered = attrcheck::render_report(&report, format)?;

    match output_path {
        Some(out) => std::fs::write(&out, &rendered)?,
        None => print!("{}", rendered),
    }

    // Exit code: 0 = pass, 1 = failed checks above threshold
    Ok(if report.verdict.pass { 0 } else { 1 })
}

fn cmd_list_operators(format_str: String) -> Result<i32, attrcheck::error::CheckError> {
    let operators = list_operators();

    match format_str.as_str() {
        "json" => {
            let json = serde_json::to_string_pretty(&operators)?;
            println!("{}", json);
        }
        _ => {
            println!(
                "{:<30} {:<24} {:<12} VALUE",
                "OPERATOR", "NEGATES", "AGGREGATION"
            );
            println!("{}", "-".repeat(74));
            for op in &operators {
                println!(
                    "{:<30} {:<24} {:<12} {}",
                    op.name,
                    op.negates.unwrap_or("-"),
                    op.aggregation.to_string(),
                    if op.takes_value { "yes" } else { "no" },
                );
            }
        }
    }

    Ok(0)
}

fn cmd_init(force: bool) -> Result<i32, attrcheck::error::CheckError> {
    let path = PathBuf::from(".attrcheck.toml");

    if path.exists() && !force {
        eprintln!(".attrcheck.toml already exists. Use --force to overwrite.");
        return Ok(1);
    }

    std::fs::write(&path, Config::starter_toml())?;
    println!("Created .attrcheck.toml");

    Ok(0)
}
