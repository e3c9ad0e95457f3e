//! Decoding of the provider's per-match JSON document.

use serde_json::Value;
use thiserror::Error;

use crate::coords::resolve_end;
use crate::event::{Game, RawEvent, event_type_name};
use crate::qualifiers::{QualifierCodes, QualifierSet};

#[derive(Debug, Error, PartialEq)]
pub enum ExtractError {
    #[error("missing required field `{field}` in {scope}")]
    MissingRequiredField { field: &'static str, scope: String },

    #[error("invalid value for `{field}` in {scope}: {value}")]
    InvalidField {
        field: &'static str,
        scope: String,
        value: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Team {
    pub team_id: u32,
    pub team_name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub player_id: u32,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub full_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TeamGame {
    pub game_id: u64,
    pub team_id: u32,
    pub side: Option<String>,
    // Raw provider JSON; its shape varies between feeds.
    pub score: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerGame {
    pub game_id: u64,
    pub team_id: u32,
    pub player_id: u32,
    pub shirt_number: u32,
    pub position: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatchData {
    pub game: Game,
    pub teams: Vec<Team>,
    pub players: Vec<Player>,
    pub team_games: Vec<TeamGame>,
    pub player_games: Vec<PlayerGame>,
    pub events: Vec<RawEvent>,
}

type ExtractResult<T> = Result<T, ExtractError>;

pub fn extract_match_json(raw: &str, codes: &QualifierCodes) -> ExtractResult<MatchData> {
    let root: Value = serde_json::from_str(raw).map_err(|err| ExtractError::InvalidField {
        field: "document",
        scope: "match file".to_string(),
        value: err.to_string(),
    })?;
    extract_match(&root, codes)
}

pub fn extract_match(root: &Value, codes: &QualifierCodes) -> ExtractResult<MatchData> {
    let game = extract_game(root)?;
    Ok(MatchData {
        game,
        teams: extract_teams(root)?,
        players: extract_players(root)?,
        team_games: extract_team_games(root, game.game_id)?,
        player_games: extract_player_games(root, game.game_id)?,
        events: extract_events(root, game.game_id, codes)?,
    })
}

pub fn extract_game(root: &Value) -> ExtractResult<Game> {
    let home = required(root, "home", "match")?;
    let away = required(root, "away", "match")?;
    Ok(Game {
        game_id: required_u64(root, "matchId", "match")?,
        home_team_id: required_u32(home, "teamId", "home team")?,
        away_team_id: required_u32(away, "teamId", "away team")?,
    })
}

fn sides(root: &Value) -> ExtractResult<[&Value; 2]> {
    Ok([
        required(root, "home", "match")?,
        required(root, "away", "match")?,
    ])
}

pub fn extract_teams(root: &Value) -> ExtractResult<Vec<Team>> {
    let mut out = Vec::with_capacity(2);
    for side in sides(root)? {
        if side.get("teamId").is_none() {
            continue;
        }
        out.push(Team {
            team_id: required_u32(side, "teamId", "team")?,
            team_name: side
                .get("name")
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string(),
        });
    }
    Ok(out)
}

pub fn extract_players(root: &Value) -> ExtractResult<Vec<Player>> {
    let mut out = Vec::new();
    for side in sides(root)? {
        for p in side_players(side)? {
            let name = p.get("name").and_then(|v| v.as_str()).unwrap_or_default();
            let first_name = name.split_whitespace().next().map(str::to_string);
            let last_name = name.split_whitespace().last().map(str::to_string);
            out.push(Player {
                player_id: required_u32(p, "playerId", "player")?,
                first_name,
                last_name,
                full_name: (!name.is_empty()).then(|| name.to_string()),
            });
        }
    }
    Ok(out)
}

pub fn extract_team_games(root: &Value, game_id: u64) -> ExtractResult<Vec<TeamGame>> {
    let mut out = Vec::with_capacity(2);
    for side in sides(root)? {
        out.push(TeamGame {
            game_id,
            team_id: required_u32(side, "teamId", "team")?,
            side: side.get("field").and_then(as_string_any),
            score: side
                .get("scores")
                .filter(|v| !v.is_null())
                .map(|v| v.to_string()),
        });
    }
    Ok(out)
}

pub fn extract_player_games(root: &Value, game_id: u64) -> ExtractResult<Vec<PlayerGame>> {
    let mut out = Vec::new();
    for side in sides(root)? {
        let team_id = required_u32(side, "teamId", "team")?;
        for p in side_players(side)? {
            out.push(PlayerGame {
                game_id,
                team_id,
                player_id: required_u32(p, "playerId", "player")?,
                shirt_number: required_u32(p, "shirtNo", "player")?,
                position: required_string(p, "position", "player")?,
            });
        }
    }
    Ok(out)
}

pub fn extract_events(
    root: &Value,
    game_id: u64,
    codes: &QualifierCodes,
) -> ExtractResult<Vec<RawEvent>> {
    let elements = required(root, "events", "match")?
        .as_array()
        .ok_or_else(|| invalid("events", "match", root.get("events")))?;

    let mut out = Vec::with_capacity(elements.len());
    for (idx, element) in elements.iter().enumerate() {
        let scope = format!("event #{idx}");
        let type_id = required_u32(required(element, "type", &scope)?, "value", &scope)?;
        let qualifiers = QualifierSet::from_raw(extract_qualifiers(element, &scope)?, codes);
        let start_x = optional_f64(element, "x", &scope)?.unwrap_or(0.0);
        let start_y = optional_f64(element, "y", &scope)?.unwrap_or(0.0);
        let (end_x, end_y) = resolve_end(&qualifiers, start_x, start_y);

        out.push(RawEvent {
            game_id,
            event_id: optional_u64(element, "eventId", &scope)?.unwrap_or(0),
            type_id,
            type_name: event_type_name(type_id).unwrap_or_default().to_string(),
            period_id: required_u32(required(element, "period", &scope)?, "value", &scope)?,
            minute: required_u32(element, "minute", &scope)?,
            second: optional_u64(element, "second", &scope)?
                .map(|v| narrow(v, "second", &scope))
                .transpose()?
                .unwrap_or(0),
            team_id: required_u32(element, "teamId", &scope)?,
            player_id: optional_u64(element, "playerId", &scope)?
                .map(|v| narrow(v, "playerId", &scope))
                .transpose()?
                .unwrap_or(0),
            outcome: required_outcome(required(element, "outcomeType", &scope)?, &scope)?,
            start_x,
            start_y,
            end_x,
            end_y,
            qualifiers,
        });
    }
    Ok(out)
}

fn extract_qualifiers(element: &Value, scope: &str) -> ExtractResult<Vec<(u32, Option<String>)>> {
    let Some(list) = element.get("qualifiers").and_then(|v| v.as_array()) else {
        return Ok(Vec::new());
    };
    let mut out = Vec::with_capacity(list.len());
    for q in list {
        let code = required_u32(required(q, "type", scope)?, "value", scope)?;
        let value = q.get("value").filter(|v| !v.is_null()).and_then(as_string_any);
        out.push((code, value));
    }
    Ok(out)
}

fn side_players(side: &Value) -> ExtractResult<&[Value]> {
    match side.get("players") {
        None | Some(Value::Null) => Ok(&[]),
        Some(Value::Array(list)) => Ok(list.as_slice()),
        Some(other) => Err(invalid("players", "team", Some(other))),
    }
}

fn required<'a>(v: &'a Value, field: &'static str, scope: &str) -> ExtractResult<&'a Value> {
    match v.get(field) {
        Some(value) if !value.is_null() => Ok(value),
        _ => Err(ExtractError::MissingRequiredField {
            field,
            scope: scope.to_string(),
        }),
    }
}

fn required_u64(v: &Value, field: &'static str, scope: &str) -> ExtractResult<u64> {
    let raw = required(v, field, scope)?;
    as_u64_any(raw).ok_or_else(|| invalid(field, scope, Some(raw)))
}

fn required_u32(v: &Value, field: &'static str, scope: &str) -> ExtractResult<u32> {
    narrow(required_u64(v, field, scope)?, field, scope)
}

fn required_string(v: &Value, field: &'static str, scope: &str) -> ExtractResult<String> {
    let raw = required(v, field, scope)?;
    as_string_any(raw).ok_or_else(|| invalid(field, scope, Some(raw)))
}

fn optional_u64(v: &Value, field: &'static str, scope: &str) -> ExtractResult<Option<u64>> {
    match v.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(raw) => as_u64_any(raw)
            .map(Some)
            .ok_or_else(|| invalid(field, scope, Some(raw))),
    }
}

fn optional_f64(v: &Value, field: &'static str, scope: &str) -> ExtractResult<Option<f64>> {
    match v.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(raw) => as_f64_any(raw)
            .map(Some)
            .ok_or_else(|| invalid(field, scope, Some(raw))),
    }
}

fn required_outcome(outcome_type: &Value, scope: &str) -> ExtractResult<bool> {
    let raw = required(outcome_type, "value", scope)?;
    match raw {
        Value::Bool(b) => Ok(*b),
        other => as_u64_any(other)
            .map(|n| n != 0)
            .ok_or_else(|| invalid("outcomeType.value", scope, Some(other))),
    }
}

fn narrow(n: u64, field: &'static str, scope: &str) -> ExtractResult<u32> {
    u32::try_from(n).map_err(|_| ExtractError::InvalidField {
        field,
        scope: scope.to_string(),
        value: n.to_string(),
    })
}

fn invalid(field: &'static str, scope: &str, value: Option<&Value>) -> ExtractError {
    ExtractError::InvalidField {
        field,
        scope: scope.to_string(),
        value: value.map(|v| v.to_string()).unwrap_or_default(),
    }
}

fn as_u64_any(v: &Value) -> Option<u64> {
    if let Some(n) = v.as_u64() {
        return Some(n);
    }
    v.as_str()?.trim().parse::<u64>().ok()
}

fn as_f64_any(v: &Value) -> Option<f64> {
    if let Some(n) = v.as_f64() {
        return Some(n);
    }
    v.as_str()?.trim().parse::<f64>().ok()
}

fn as_string_any(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn missing_period_is_reported() {
        let root = json!({
            "matchId": 1,
            "home": {"teamId": 10},
            "away": {"teamId": 20},
            "events": [{"type": {"value": 1}, "minute": 0, "teamId": 10, "outcomeType": {"value": 1}}]
        });
        let err = extract_match(&root, &QualifierCodes::default()).unwrap_err();
        assert_eq!(
            err,
            ExtractError::MissingRequiredField {
                field: "period",
                scope: "event #0".to_string()
            }
        );
    }

    #[test]
    fn string_ids_and_defaults() {
        let root = json!({
            "matchId": "77",
            "home": {"teamId": "10", "name": "Home"},
            "away": {"teamId": 20, "name": "Away"},
            "events": [{
                "type": {"value": 1}, "period": {"value": 1}, "minute": 3,
                "teamId": 10, "outcomeType": {"value": 0}, "x": 40.0,
                "qualifiers": [{"type": {"value": 140}, "value": "60.0"}, {"type": {"value": 2}}]
            }]
        });
        let data = extract_match(&root, &QualifierCodes::default()).unwrap();
        assert_eq!(data.game.game_id, 77);
        let e = &data.events[0];
        assert_eq!(e.type_name, "pass");
        assert_eq!((e.second, e.player_id, e.event_id), (0, 0, 0));
        assert!(!e.outcome);
        assert_eq!((e.start_x, e.start_y), (40.0, 0.0));
        assert_eq!((e.end_x, e.end_y), (60.0, 0.0));
    }

    #[test]
    fn player_names_split_on_whitespace() {
        let root = json!({
            "matchId": 1,
            "home": {"teamId": 10, "players": [{"playerId": 5, "name": "Ada  Mae Lovelace", "shirtNo": 9}]},
            "away": {"teamId": 20, "players": [{"playerId": 6, "name": "", "shirtNo": 1}]}
        });
        let players = extract_players(&root).unwrap();
        assert_eq!(players[0].first_name.as_deref(), Some("Ada"));
        assert_eq!(players[0].last_name.as_deref(), Some("Lovelace"));
        assert_eq!(players[0].full_name.as_deref(), Some("Ada  Mae Lovelace"));
        assert_eq!(players[1].first_name, None);
        assert_eq!(players[1].full_name, None);
    }

    #[test]
    fn player_game_needs_a_position() {
        let root = json!({
            "home": {"teamId": 10, "players": [{"playerId": 5, "name": "A B", "shirtNo": 9}]},
            "away": {"teamId": 20, "players": []}
        });
        assert_eq!(
            extract_player_games(&root, 1).unwrap_err(),
            ExtractError::MissingRequiredField {
                field: "position",
                scope: "player".to_string()
            }
        );
    }
}
