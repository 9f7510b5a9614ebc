//! nusweep CLI — find NuGet package references no source file ever uses.

mod metadata;
mod msbuild;
mod report;
mod workspace;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;
use clap::{Parser, Subcommand};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use nusweep_core::analyzer::PackageUsageAnalyzer;
use nusweep_core::cancel::CancelToken;
use nusweep_core::providers::MetadataProvider;

use crate::metadata::HeuristicMetadata;
use crate::workspace::FsSource;

#[derive(Parser)]
#[command(
    name = "nusweep",
    about = "nusweep - Detect NuGet package references that no source file uses"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyse a solution, project, or directory and report unused references
    Analyze {
        /// Path to a .sln file, a project file, or a directory
        path: PathBuf,

        /// Additional glob patterns to exclude from scanning
        #[arg(long)]
        exclude: Vec<String>,

        /// Emit the report as JSON on stdout
        #[arg(long)]
        json: bool,

        /// List used references as well as unused ones
        #[arg(long)]
        verbose: bool,

        /// Suppress all output except errors
        #[arg(long)]
        quiet: bool,
    },
    /// Show the namespaces assumed for a package id
    Namespaces {
        /// Package id, e.g. Newtonsoft.Json
        package: String,

        /// Package version to resolve for
        #[arg(long, default_value = "")]
        version: String,

        /// Target framework moniker to resolve for
        #[arg(long, default_value = "net8.0")]
        framework: String,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let outcome = match cli.command {
        Commands::Analyze {
            path,
            exclude,
            json,
            verbose,
            quiet,
        } => run_analyze(&path, &exclude, json, verbose, quiet),
        Commands::Namespaces {
            package,
            version,
            framework,
        } => run_namespaces(&package, &version, &framework),
    };

    match outcome {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("{} {err:#}", style("error:").red().bold());
            std::process::exit(2);
        }
    }
}

fn run_analyze(
    path: &PathBuf,
    exclude: &[String],
    json: bool,
    verbose: bool,
    quiet: bool,
) -> Result<i32> {
    let input = path.canonicalize().unwrap_or_else(|_| path.clone());

    let mut metadata = HeuristicMetadata::new();
    let mut solution = workspace::load_solution(&input, exclude, &mut metadata)?;

    let source = FsSource;
    let analyzer = PackageUsageAnalyzer::new(&source, &metadata);

    let validation = analyzer.validate_inputs(Some(&solution));
    if !validation.is_valid() {
        for error in &validation.errors {
            eprintln!("{} {error}", style("invalid:").red().bold());
        }
        return Ok(2);
    }

    let spinner = (!quiet && !json).then(|| {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::with_template("{spinner:.blue} {msg}")
                .unwrap()
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        pb.set_message(format!(
            "Analysing {} project(s)...",
            solution.projects.len()
        ));
        pb.enable_steady_tick(std::time::Duration::from_millis(80));
        pb
    });

    let start = Instant::now();
    let cancel = CancelToken::new();
    let result = analyzer.analyze_package_usage(&mut solution, &cancel);
    if let Some(pb) = &spinner {
        pb.finish_and_clear();
    }
    result?;

    let report = report::build_report(&solution, &metadata);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if !quiet {
        report::print_report(&report, verbose);
        let duration = start.elapsed();
        println!(
            "  {:<14} {:.1}ms",
            "Duration:",
            duration.as_secs_f64() * 1000.0
        );
    }

    Ok(if report.totals.unused > 0 { 1 } else { 0 })
}

fn run_namespaces(package: &str, version: &str, framework: &str) -> Result<i32> {
    let metadata = HeuristicMetadata::new();
    let namespaces = metadata.package_namespaces(package, version, framework);
    if namespaces.is_empty() {
        eprintln!("no namespaces known for '{package}'");
        return Ok(1);
    }
    for namespace in namespaces {
        println!("{namespace}");
    }
    Ok(0)
}
