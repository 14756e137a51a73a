//! kicad-lib-tables: generate KiCad `sym-lib-table` and `fp-lib-table`
//!
//! Meant to be run from inside the library submodule of a KiCad project. The
//! tables are written to the submodule's parent, the project root.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{debug, info, Level};
use tracing_subscriber::EnvFilter;

use kicad_lib_tables::config;
use kicad_lib_tables::kicad::{GeneratedTables, LibraryRoots};

/// Generate KiCad sym-lib-table and fp-lib-table (run from the lib submodule dir).
///
/// Scans `<lib-dir>/symbols` for `*.kicad_sym` files and
/// `<lib-dir>/footprints` for `*.pretty` directories, and writes both tables
/// to the parent of `<lib-dir>`.
#[derive(Parser, Debug)]
#[command(name = "kicad-lib-tables")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Library submodule directory (default: the directory holding this executable)
    #[arg(long, value_name = "DIR")]
    lib_dir: Option<PathBuf>,

    /// Output path for symbol table, relative to the project root (default: "sym-lib-table")
    #[arg(long, value_name = "FILE")]
    sym_out: Option<String>,

    /// Output path for footprint table, relative to the project root (default: "fp-lib-table")
    #[arg(long, value_name = "FILE")]
    fp_out: Option<String>,

    /// Do not write files; print what would be written to stderr
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// Path to configuration file
    #[arg(short, long, value_name = "CONFIG_FILE")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Decrease logging verbosity (only show errors)
    #[arg(short, long)]
    quiet: bool,
}

/// Determines the log level from CLI arguments.
#[allow(clippy::match_same_arms)] // Explicit "warn" arm for clarity
fn get_log_level(verbose: u8, quiet: bool, config_level: &str) -> Level {
    if quiet {
        return Level::ERROR;
    }

    match verbose {
        0 => match config_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::WARN,
        },
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Initialises the tracing subscriber for logging.
fn init_tracing(level: Level) {
    let filter = EnvFilter::from_default_env().add_directive(level.into());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Entry point for kicad-lib-tables.
fn main() -> ExitCode {
    let args = Args::parse();

    // Load configuration, then let the command line override table names
    let mut cfg = match config::load_config(args.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            return ExitCode::FAILURE;
        }
    };
    if let Some(name) = args.sym_out {
        cfg.sym_table = name;
    }
    if let Some(name) = args.fp_out {
        cfg.fp_table = name;
    }
    if let Err(e) = cfg.validate() {
        eprintln!("Configuration error: {e}");
        return ExitCode::FAILURE;
    }

    init_tracing(get_log_level(args.verbose, args.quiet, &cfg.logging.level));

    match cfg.source.as_deref() {
        Some(path) => info!(path = %path.display(), "Loaded configuration"),
        None => info!("No configuration file, using built-in defaults"),
    }

    let roots = match args.lib_dir.as_deref() {
        Some(dir) => LibraryRoots::resolve(dir),
        None => LibraryRoots::from_current_exe(),
    };
    let roots = match roots {
        Ok(roots) => roots,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    info!(
        project_root = %roots.project_root().display(),
        lib_dir = %roots.submodule_root().display(),
        "Generating library tables"
    );

    let tables = match GeneratedTables::generate(&roots, &cfg.layout()) {
        Ok(tables) => tables,
        Err(e) => {
            debug!(error = ?e, "Library table generation failed");
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    if args.dry_run {
        debug!("Dry run, nothing will be written");
        if let Err(e) = tables.preview(&mut std::io::stderr().lock()) {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
        return ExitCode::SUCCESS;
    }

    match tables.write() {
        Ok(written) => {
            for path in written {
                println!("✔ Generated {}", path.display());
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
