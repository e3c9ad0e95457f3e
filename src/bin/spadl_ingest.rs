use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};

use spadl_actions::config::{self, SpadlConfig};
use spadl_actions::{pipeline, store};

fn main() -> Result<()> {
    config::load_dotenv();
    config::init_tracing();

    let files = parse_file_args();
    if files.is_empty() {
        return Err(anyhow!("usage: spadl_ingest [--db <path>] <match.json>..."));
    }
    let cfg = SpadlConfig::from_env()?;
    let db_path = config::parse_db_path_arg()
        .or_else(config::default_db_path)
        .context("unable to resolve sqlite path")?;

    let mut conn = store::open_db(&db_path)?;
    let summary = pipeline::ingest_files(&mut conn, &files, &cfg.qualifier_codes)?;

    println!("Ingest complete");
    println!("DB: {}", db_path.display());
    println!(
        "Files: {} ingested, {} skipped, {} corrupt, {} failed (of {})",
        summary.files_ingested,
        summary.files_skipped,
        summary.files_corrupt,
        summary.files_failed,
        summary.files_total
    );
    if !summary.errors.is_empty() {
        println!("Errors: {}", summary.errors.len());
        for err in summary.errors.iter().take(8) {
            println!(" - {err}");
        }
    }
    Ok(())
}

fn parse_file_args() -> Vec<PathBuf> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let mut out = Vec::new();
    let mut skip_next = false;
    for arg in args {
        if skip_next {
            skip_next = false;
            continue;
        }
        if arg == "--db" {
            skip_next = true;
            continue;
        }
        if arg.starts_with("--db=") || arg.trim().is_empty() {
            continue;
        }
        out.push(PathBuf::from(arg));
    }
    out
}
