use anyhow::{Result, anyhow};
use clap::{Parser, Subcommand};
use colored::Colorize;
use env_logger::Env;
use goprune_vendor::Config;
use log::{debug, info};
use std::io::{BufWriter, Write};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "goprune")]
#[command(version)]
#[command(about = "Keep only the vendored Go packages a project actually uses", long_about = None)]
struct Cli {
    /// Print debug logs
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Remove unused packages and files from the vendor directory
    Vendor(Config),
    /// List the vendored packages the project needs, without deleting anything
    List(Config),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(level)).init();
    debug!("Parsed CLI arguments: {:?}", cli.command);

    // stdio is blocked by LineWriter, use a BufWriter to reduce syscalls.
    // See https://github.com/rust-lang/rust/issues/60673
    let mut stdout = BufWriter::new(std::io::stdout());

    let start = Instant::now();
    let num_threads = rayon::current_num_threads();

    let (result, json) = match cli.command {
        Commands::Vendor(cfg) => {
            info!("Pruning vendor directory (using {} threads)", num_threads);
            let json = cfg.json;
            let result = goprune_vendor::run_vendor_prune(cfg)?;
            if json {
                goprune_vendor::print_json(&mut stdout, &result)?;
            } else {
                goprune_vendor::print_report(&mut stdout, &result)?;
            }
            (result, json)
        }
        Commands::List(cfg) => {
            info!("Listing vendored imports (using {} threads)", num_threads);
            let json = cfg.json;
            let result = goprune_vendor::run_list_closure(cfg)?;
            if json {
                goprune_vendor::print_json(&mut stdout, &result)?;
            } else {
                goprune_vendor::print_closure(&mut stdout, &result)?;
            }
            (result, json)
        }
    };

    if !json {
        writeln!(
            stdout,
            "\n{} Finished in {}ms on {} packages (using {} threads).",
            "●".bright_blue(),
            start.elapsed().as_millis().to_string().cyan(),
            (result.packages.len() + result.imports.len()).to_string().cyan(),
            num_threads.to_string().cyan()
        )?;
    }
    stdout.flush()?;

    // Non-zero exit when anything could not be removed
    if result.has_errors() {
        return Err(anyhow!(
            "Pruning '{}' finished with {} errors",
            result.project_dir.display(),
            result.errors.len()
        ));
    }
    Ok(())
}
