use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::Connection;
use tracing::{info, warn};

use crate::config::SpadlConfig;
use crate::convert::convert_games;
use crate::extract::{ExtractError, extract_match_json};
use crate::qualifiers::QualifierCodes;
use crate::store;

#[derive(Debug, Clone, Default)]
pub struct IngestSummary {
    pub files_total: usize,
    pub files_skipped: usize,
    pub files_ingested: usize,
    pub files_corrupt: usize,
    // Unreadable or unstorable; left unrecorded so the next run retries them.
    pub files_failed: usize,
    pub errors: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ConvertSummary {
    pub games_total: usize,
    pub games_converted: usize,
    pub actions_written: usize,
    pub errors: Vec<String>,
}

/// Loads match files into the store. Files already recorded are skipped; a
/// file whose contents fail extraction is recorded as corrupt and never
/// retried. Read and storage failures are reported but not recorded.
pub fn ingest_files(
    conn: &mut Connection,
    paths: &[PathBuf],
    codes: &QualifierCodes,
) -> Result<IngestSummary> {
    let seen = store::seen_files(conn)?;
    let mut pending: Vec<&PathBuf> = Vec::new();
    for path in paths {
        if !seen.contains(&file_key(path)) && !pending.contains(&path) {
            pending.push(path);
        }
    }

    let mut summary = IngestSummary {
        files_total: paths.len(),
        files_skipped: paths.len() - pending.len(),
        ..IngestSummary::default()
    };
    let run_id = store::start_run(conn, "ingest", &Utc::now().to_rfc3339(), pending.len())?;

    for path in pending {
        let key = file_key(path);
        match ingest_file(conn, path, codes) {
            Ok(events) => {
                store::record_file(conn, &key, false)?;
                summary.files_ingested += 1;
                info!(file = %key, events, "ingested match file");
            }
            Err(err) if err.downcast_ref::<ExtractError>().is_some() => {
                store::record_file(conn, &key, true)?;
                summary.files_corrupt += 1;
                warn!(file = %key, error = %format!("{err:#}"), "corrupt match file");
                summary.errors.push(format!("{key}: {err:#}"));
            }
            Err(err) => {
                summary.files_failed += 1;
                warn!(file = %key, error = %format!("{err:#}"), "match file not ingested");
                summary.errors.push(format!("{key}: {err:#}"));
            }
        }
    }

    store::finish_run(
        conn,
        run_id,
        &Utc::now().to_rfc3339(),
        summary.files_ingested,
        &summary.errors,
    )?;
    Ok(summary)
}

fn ingest_file(conn: &mut Connection, path: &Path, codes: &QualifierCodes) -> Result<usize> {
    let raw = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let data = extract_match_json(&raw, codes)?;
    store::store_match(conn, &data, codes)?;
    Ok(data.events.len())
}

fn file_key(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// Converts every stored game and replaces its action rows.
pub fn convert_all_games(
    conn: &mut Connection,
    cfg: &SpadlConfig,
    threads: usize,
) -> Result<ConvertSummary> {
    let games = store::load_games(conn)?;
    let mut summary = ConvertSummary {
        games_total: games.len(),
        ..ConvertSummary::default()
    };
    let run_id = store::start_run(conn, "convert", &Utc::now().to_rfc3339(), games.len())?;

    let mut inputs = Vec::with_capacity(games.len());
    for game in games {
        match store::load_events(conn, game.game_id, &cfg.qualifier_codes) {
            Ok(events) => inputs.push((game, events)),
            Err(err) => summary
                .errors
                .push(format!("game {}: {err:#}", game.game_id)),
        }
    }

    for (game, actions) in convert_games(&inputs, cfg, threads) {
        match store::store_actions(conn, game.game_id, &actions) {
            Ok(()) => {
                summary.games_converted += 1;
                summary.actions_written += actions.len();
            }
            Err(err) => summary
                .errors
                .push(format!("game {}: {err:#}", game.game_id)),
        }
    }

    store::finish_run(
        conn,
        run_id,
        &Utc::now().to_rfc3339(),
        summary.games_converted,
        &summary.errors,
    )?;
    info!(
        games = summary.games_converted,
        actions = summary.actions_written,
        "converted games"
    );
    Ok(summary)
}
