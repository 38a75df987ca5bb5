mod cli;
mod compare;
mod fingerprint;
mod ignore;
mod report;
mod scan;
mod snapshot;
mod store;

use cli::Cli;
use ignore::IgnoreSet;
use snapshot::Snapshot;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Environment override for the database directory, used by tests and by
/// setups that keep the database outside the platform data dir.
const DB_DIR_ENV: &str = "BUNDLECHECK_DB_DIR";

struct BundlecheckExitCode;

impl BundlecheckExitCode {
    /// Exit code for fatal errors (I/O errors, malformed snapshots, bad
    /// patterns). Discrepancies found by a comparison are data, not
    /// failure: a mismatch exits 0 just like a perfect match.
    fn any_error() -> ExitCode {
        ExitCode::from(255)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            BundlecheckExitCode::any_error()
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let db_dir = database_dir();
    let compare_requested = cli.compare || cli.store.is_none();

    let live = live_snapshot(&cli)?;

    if let Some(store_path) = &cli.store {
        let target = resolve_against(&db_dir, store_path);
        info!("storing snapshot to {}", target.display());
        store::save_snapshot(&live, &target)?;
    }

    if compare_requested {
        info!("loading database");
        let database = store::load_database(&cli.db, &db_dir)?;

        info!("comparing...");
        let reports = compare::compare_all(&live, &database)?;
        report::print_reports(&reports, cli.verbose > 0);
    }

    Ok(())
}

/// Produces the live side of the comparison, either by scanning a tree or
/// by loading a previously stored snapshot. Exactly one of `--scan` and
/// `--load` is present; clap enforces that before this runs.
fn live_snapshot(cli: &Cli) -> anyhow::Result<Snapshot> {
    if let Some(root) = &cli.scan {
        info!(
            "scanning files in {}... (this may take a while)",
            root.display()
        );
        let ignores = IgnoreSet::new(&cli.ignore)?;
        let mut snapshot = scan::scan_tree(root, &ignores)?;
        snapshot.description = cli.description.clone();
        Ok(snapshot)
    } else if let Some(file) = &cli.load {
        info!("loading snapshot from {}", file.display());
        Ok(store::load_snapshot(file)?)
    } else {
        anyhow::bail!("either --scan or --load is required");
    }
}

/// Directory that relative `--db` and `--store` paths resolve against.
fn database_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os(DB_DIR_ENV) {
        return PathBuf::from(dir);
    }

    directories::ProjectDirs::from("", "", "bundlecheck")
        .map(|dirs| dirs.data_dir().join("db"))
        .unwrap_or_else(|| PathBuf::from("db"))
}

fn resolve_against(db_dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        db_dir.join(path)
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
