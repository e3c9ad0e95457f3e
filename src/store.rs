use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use rusqlite::{Connection, Transaction, params};

use crate::event::{Game, RawEvent, event_types};
use crate::extract::MatchData;
use crate::qualifiers::{QualifierCodes, QualifierSet};
use crate::spadl::{
    Action, ActionResult, ActionType, BodyPart, SCHEMA_VERSION, action_type_table,
    body_part_table, result_table,
};

pub fn open_db(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).ok();
    }
    let conn =
        Connection::open(path).with_context(|| format!("open sqlite db {}", path.display()))?;
    init_schema(&conn)?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        PRAGMA journal_mode = WAL;
        CREATE TABLE IF NOT EXISTS games (
            game_id INTEGER PRIMARY KEY,
            home_team_id INTEGER NOT NULL,
            away_team_id INTEGER NOT NULL
        );
        CREATE TABLE IF NOT EXISTS teams (
            team_id INTEGER PRIMARY KEY,
            team_name TEXT NOT NULL
        );
        CREATE TABLE IF NOT EXISTS players (
            player_id INTEGER PRIMARY KEY,
            first_name TEXT NULL,
            last_name TEXT NULL,
            full_name TEXT NULL
        );
        CREATE TABLE IF NOT EXISTS teamgames (
            game_id INTEGER NOT NULL,
            team_id INTEGER NOT NULL,
            side TEXT NULL,
            score TEXT NULL,
            PRIMARY KEY (game_id, team_id)
        );
        CREATE TABLE IF NOT EXISTS playergames (
            game_id INTEGER NOT NULL,
            team_id INTEGER NOT NULL,
            player_id INTEGER NOT NULL,
            shirt_number INTEGER NOT NULL,
            position TEXT NOT NULL,
            PRIMARY KEY (game_id, team_id, player_id)
        );
        CREATE TABLE IF NOT EXISTS files (
            file_url TEXT PRIMARY KEY,
            corrupt INTEGER NOT NULL
        );
        CREATE TABLE IF NOT EXISTS eventtypes (
            type_id INTEGER PRIMARY KEY,
            type_name TEXT NOT NULL
        );
        CREATE TABLE IF NOT EXISTS events (
            game_id INTEGER NOT NULL,
            seq INTEGER NOT NULL,
            event_id INTEGER NOT NULL,
            type_id INTEGER NOT NULL,
            type_name TEXT NOT NULL,
            period_id INTEGER NOT NULL,
            minute INTEGER NOT NULL,
            second INTEGER NOT NULL,
            team_id INTEGER NOT NULL,
            player_id INTEGER NOT NULL,
            outcome INTEGER NOT NULL,
            start_x REAL NOT NULL,
            start_y REAL NOT NULL,
            end_x REAL NOT NULL,
            end_y REAL NOT NULL,
            qualifiers TEXT NOT NULL,
            PRIMARY KEY (game_id, seq)
        );
        CREATE TABLE IF NOT EXISTS actiontypes (
            type_id INTEGER PRIMARY KEY,
            type_name TEXT NOT NULL
        );
        CREATE TABLE IF NOT EXISTS results (
            result_id INTEGER PRIMARY KEY,
            result_name TEXT NOT NULL
        );
        CREATE TABLE IF NOT EXISTS bodyparts (
            bodypart_id INTEGER PRIMARY KEY,
            bodypart_name TEXT NOT NULL
        );
        CREATE TABLE IF NOT EXISTS actions (
            game_id INTEGER NOT NULL,
            action_id INTEGER NOT NULL,
            period_id INTEGER NOT NULL,
            time_seconds REAL NOT NULL,
            team_id INTEGER NOT NULL,
            player_id INTEGER NOT NULL,
            start_x REAL NOT NULL,
            start_y REAL NOT NULL,
            end_x REAL NOT NULL,
            end_y REAL NOT NULL,
            result_id INTEGER NOT NULL,
            bodypart_id INTEGER NOT NULL,
            type_id INTEGER NOT NULL,
            PRIMARY KEY (game_id, action_id)
        );
        CREATE INDEX IF NOT EXISTS idx_actions_type ON actions(type_id);

        CREATE TABLE IF NOT EXISTS ingest_runs (
            run_id INTEGER PRIMARY KEY AUTOINCREMENT,
            kind TEXT NOT NULL,
            started_at TEXT NOT NULL,
            finished_at TEXT NULL,
            items_total INTEGER NOT NULL,
            items_succeeded INTEGER NOT NULL,
            errors_json TEXT NOT NULL
        );
        "#,
    )
    .context("create sqlite schema")?;
    conn.execute_batch(&format!("PRAGMA user_version = {SCHEMA_VERSION};"))
        .context("set schema version")?;
    write_lookup_tables(conn)
}

// Rewritten from the closed enums each time so stored ids always resolve.
fn write_lookup_tables(conn: &Connection) -> Result<()> {
    for (id, name) in event_types() {
        conn.execute(
            "INSERT OR REPLACE INTO eventtypes(type_id, type_name) VALUES (?1, ?2)",
            params![*id as i64, name],
        )
        .context("write eventtypes")?;
    }
    for (id, name) in action_type_table() {
        conn.execute(
            "INSERT OR REPLACE INTO actiontypes(type_id, type_name) VALUES (?1, ?2)",
            params![id as i64, name],
        )
        .context("write actiontypes")?;
    }
    for (id, name) in result_table() {
        conn.execute(
            "INSERT OR REPLACE INTO results(result_id, result_name) VALUES (?1, ?2)",
            params![id as i64, name],
        )
        .context("write results")?;
    }
    for (id, name) in body_part_table() {
        conn.execute(
            "INSERT OR REPLACE INTO bodyparts(bodypart_id, bodypart_name) VALUES (?1, ?2)",
            params![id as i64, name],
        )
        .context("write bodyparts")?;
    }
    Ok(())
}

pub fn seen_files(conn: &Connection) -> Result<HashSet<String>> {
    let mut stmt = conn
        .prepare("SELECT file_url FROM files")
        .context("prepare seen files query")?;
    let rows = stmt
        .query_map([], |row| row.get::<_, String>(0))
        .context("query seen files")?;
    let mut out = HashSet::new();
    for row in rows {
        out.insert(row.context("decode file row")?);
    }
    Ok(out)
}

pub fn record_file(conn: &Connection, file_url: &str, corrupt: bool) -> Result<()> {
    conn.execute(
        "INSERT INTO files(file_url, corrupt) VALUES (?1, ?2)
         ON CONFLICT(file_url) DO UPDATE SET corrupt = excluded.corrupt",
        params![file_url, bool_to_i64(corrupt)],
    )
    .context("record file")?;
    Ok(())
}

/// Stores one extracted match. Entity rows are upserted; the game's events
/// are replaced.
pub fn store_match(conn: &mut Connection, data: &MatchData, codes: &QualifierCodes) -> Result<()> {
    let tx = conn.transaction().context("begin match transaction")?;
    upsert_game(&tx, &data.game)?;
    for team in &data.teams {
        tx.execute(
            "INSERT INTO teams(team_id, team_name) VALUES (?1, ?2)
             ON CONFLICT(team_id) DO UPDATE SET team_name = excluded.team_name",
            params![team.team_id as i64, team.team_name],
        )
        .context("upsert team")?;
    }
    for p in &data.players {
        tx.execute(
            "INSERT INTO players(player_id, first_name, last_name, full_name) VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(player_id) DO UPDATE SET
                first_name = excluded.first_name,
                last_name = excluded.last_name,
                full_name = excluded.full_name",
            params![p.player_id as i64, p.first_name, p.last_name, p.full_name],
        )
        .context("upsert player")?;
    }
    for tg in &data.team_games {
        tx.execute(
            "INSERT INTO teamgames(game_id, team_id, side, score) VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(game_id, team_id) DO UPDATE SET
                side = excluded.side,
                score = excluded.score",
            params![tg.game_id as i64, tg.team_id as i64, tg.side, tg.score],
        )
        .context("upsert teamgame")?;
    }
    for pg in &data.player_games {
        tx.execute(
            "INSERT INTO playergames(game_id, team_id, player_id, shirt_number, position)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(game_id, team_id, player_id) DO UPDATE SET
                shirt_number = excluded.shirt_number,
                position = excluded.position",
            params![
                pg.game_id as i64,
                pg.team_id as i64,
                pg.player_id as i64,
                pg.shirt_number as i64,
                pg.position
            ],
        )
        .context("upsert playergame")?;
    }
    replace_events(&tx, data.game.game_id, &data.events, codes)?;
    tx.commit().context("commit match transaction")?;
    Ok(())
}

fn upsert_game(tx: &Transaction<'_>, game: &Game) -> Result<()> {
    tx.execute(
        "INSERT INTO games(game_id, home_team_id, away_team_id) VALUES (?1, ?2, ?3)
         ON CONFLICT(game_id) DO UPDATE SET
            home_team_id = excluded.home_team_id,
            away_team_id = excluded.away_team_id",
        params![
            game.game_id as i64,
            game.home_team_id as i64,
            game.away_team_id as i64
        ],
    )
    .context("upsert game")?;
    Ok(())
}

fn replace_events(
    tx: &Transaction<'_>,
    game_id: u64,
    events: &[RawEvent],
    codes: &QualifierCodes,
) -> Result<()> {
    tx.execute("DELETE FROM events WHERE game_id = ?1", params![game_id as i64])
        .context("clear game events")?;
    let mut stmt = tx
        .prepare(
            r#"
            INSERT INTO events (
                game_id, seq, event_id, type_id, type_name, period_id, minute, second,
                team_id, player_id, outcome, start_x, start_y, end_x, end_y, qualifiers
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)
            "#,
        )
        .context("prepare insert event")?;
    for (seq, e) in events.iter().enumerate() {
        let qualifiers = serde_json::to_string(&e.qualifiers.to_raw(codes))
            .context("serialize qualifiers")?;
        stmt.execute(params![
            e.game_id as i64,
            seq as i64,
            e.event_id as i64,
            e.type_id as i64,
            e.type_name,
            e.period_id as i64,
            e.minute as i64,
            e.second as i64,
            e.team_id as i64,
            e.player_id as i64,
            bool_to_i64(e.outcome),
            e.start_x,
            e.start_y,
            e.end_x,
            e.end_y,
            qualifiers,
        ])
        .context("insert event")?;
    }
    Ok(())
}

pub fn load_games(conn: &Connection) -> Result<Vec<Game>> {
    let mut stmt = conn
        .prepare("SELECT game_id, home_team_id, away_team_id FROM games ORDER BY game_id ASC")
        .context("prepare load games query")?;
    let rows = stmt
        .query_map([], |row| {
            Ok(Game {
                game_id: row.get::<_, u64>(0)?,
                home_team_id: row.get::<_, u32>(1)?,
                away_team_id: row.get::<_, u32>(2)?,
            })
        })
        .context("query load games")?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row.context("decode game row")?);
    }
    Ok(out)
}

/// Events of one game in their original file order.
pub fn load_events(
    conn: &Connection,
    game_id: u64,
    codes: &QualifierCodes,
) -> Result<Vec<RawEvent>> {
    let mut stmt = conn
        .prepare(
            r#"
            SELECT
                game_id, event_id, type_id, type_name, period_id, minute, second,
                team_id, player_id, outcome, start_x, start_y, end_x, end_y, qualifiers
            FROM events
            WHERE game_id = ?1
            ORDER BY seq ASC
            "#,
        )
        .context("prepare load events query")?;
    let rows = stmt
        .query_map(params![game_id as i64], |row| {
            Ok((
                RawEvent {
                    game_id: row.get::<_, u64>(0)?,
                    event_id: row.get::<_, u64>(1)?,
                    type_id: row.get::<_, u32>(2)?,
                    type_name: row.get(3)?,
                    period_id: row.get::<_, u32>(4)?,
                    minute: row.get::<_, u32>(5)?,
                    second: row.get::<_, u32>(6)?,
                    team_id: row.get::<_, u32>(7)?,
                    player_id: row.get::<_, u32>(8)?,
                    outcome: row.get::<_, i64>(9)? != 0,
                    start_x: row.get(10)?,
                    start_y: row.get(11)?,
                    end_x: row.get(12)?,
                    end_y: row.get(13)?,
                    qualifiers: QualifierSet::new(),
                },
                row.get::<_, String>(14)?,
            ))
        })
        .context("query load events")?;

    let mut out = Vec::new();
    for row in rows {
        let (mut event, raw_qualifiers) = row.context("decode event row")?;
        let pairs: BTreeMap<u32, Option<String>> =
            serde_json::from_str(&raw_qualifiers).context("decode event qualifiers")?;
        event.qualifiers = QualifierSet::from_raw(pairs, codes);
        out.push(event);
    }
    Ok(out)
}

pub fn store_actions(conn: &mut Connection, game_id: u64, actions: &[Action]) -> Result<()> {
    let tx = conn.transaction().context("begin actions transaction")?;
    tx.execute("DELETE FROM actions WHERE game_id = ?1", params![game_id as i64])
        .context("clear game actions")?;
    {
        let mut stmt = tx
            .prepare(
                r#"
                INSERT INTO actions (
                    game_id, action_id, period_id, time_seconds, team_id, player_id,
                    start_x, start_y, end_x, end_y, result_id, bodypart_id, type_id
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
                "#,
            )
            .context("prepare insert action")?;
        for a in actions {
            stmt.execute(params![
                a.game_id as i64,
                a.action_id as i64,
                a.period_id as i64,
                a.time_seconds,
                a.team_id as i64,
                a.player_id as i64,
                a.start_x,
                a.start_y,
                a.end_x,
                a.end_y,
                a.result.id() as i64,
                a.body_part.id() as i64,
                a.action_type.id() as i64,
            ])
            .context("insert action")?;
        }
    }
    tx.commit().context("commit actions transaction")?;
    Ok(())
}

pub fn load_actions(conn: &Connection, game_id: u64) -> Result<Vec<Action>> {
    let mut stmt = conn
        .prepare(
            r#"
            SELECT
                game_id, action_id, period_id, time_seconds, team_id, player_id,
                start_x, start_y, end_x, end_y, result_id, bodypart_id, type_id
            FROM actions
            WHERE game_id = ?1
            ORDER BY action_id ASC
            "#,
        )
        .context("prepare load actions query")?;
    let rows = stmt
        .query_map(params![game_id as i64], |row| {
            Ok((
                row.get::<_, u64>(0)?,
                row.get::<_, u32>(1)?,
                row.get::<_, u32>(2)?,
                row.get::<_, f64>(3)?,
                row.get::<_, u32>(4)?,
                row.get::<_, u32>(5)?,
                [
                    row.get::<_, f64>(6)?,
                    row.get::<_, f64>(7)?,
                    row.get::<_, f64>(8)?,
                    row.get::<_, f64>(9)?,
                ],
                [
                    row.get::<_, u8>(10)?,
                    row.get::<_, u8>(11)?,
                    row.get::<_, u8>(12)?,
                ],
            ))
        })
        .context("query load actions")?;

    let mut out = Vec::new();
    for row in rows {
        let (game_id, action_id, period_id, time_seconds, team_id, player_id, xy, ids) =
            row.context("decode action row")?;
        let [result_id, bodypart_id, type_id] = ids;
        out.push(Action {
            game_id,
            period_id,
            time_seconds,
            team_id,
            player_id,
            start_x: xy[0],
            start_y: xy[1],
            end_x: xy[2],
            end_y: xy[3],
            result: ActionResult::from_id(result_id)
                .ok_or_else(|| anyhow!("unknown result id {result_id}"))?,
            body_part: BodyPart::from_id(bodypart_id)
                .ok_or_else(|| anyhow!("unknown bodypart id {bodypart_id}"))?,
            action_type: ActionType::from_id(type_id)
                .ok_or_else(|| anyhow!("unknown action type id {type_id}"))?,
            action_id,
        });
    }
    Ok(out)
}

pub fn start_run(
    conn: &Connection,
    kind: &str,
    started_at: &str,
    items_total: usize,
) -> Result<i64> {
    conn.execute(
        "INSERT INTO ingest_runs(kind, started_at, finished_at, items_total, items_succeeded, errors_json)
         VALUES (?1, ?2, NULL, ?3, 0, '[]')",
        params![kind, started_at, items_total as i64],
    )
    .context("insert ingest run")?;
    Ok(conn.last_insert_rowid())
}

pub fn finish_run(
    conn: &Connection,
    run_id: i64,
    finished_at: &str,
    items_succeeded: usize,
    errors: &[String],
) -> Result<()> {
    let errors_json = serde_json::to_string(errors).unwrap_or_else(|_| "[]".to_string());
    conn.execute(
        "UPDATE ingest_runs
         SET finished_at = ?1, items_succeeded = ?2, errors_json = ?3
         WHERE run_id = ?4",
        params![finished_at, items_succeeded as i64, errors_json, run_id],
    )
    .context("update ingest run")?;
    Ok(())
}

fn bool_to_i64(v: bool) -> i64 {
    if v { 1 } else { 0 }
}
