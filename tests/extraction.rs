use std::fs;
use std::path::PathBuf;

use spadl_actions::extract::{ExtractError, extract_match_json};
use spadl_actions::{
    ActionResult, ActionType, BodyPart, Qualifier, QualifierCodes, SpadlConfig, convert_game,
};

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

fn close(actual: (f64, f64), expected: (f64, f64)) -> bool {
    (actual.0 - expected.0).abs() < 1e-9 && (actual.1 - expected.1).abs() < 1e-9
}

#[test]
fn extracts_match_entities() {
    let raw = read_fixture("match_small.json");
    let data = extract_match_json(&raw, &QualifierCodes::default()).expect("fixture should parse");

    assert_eq!(data.game.game_id, 9001);
    assert_eq!(data.game.home_team_id, 100);
    assert_eq!(data.game.away_team_id, 200);
    assert_eq!(data.teams.len(), 2);
    assert_eq!(data.teams[1].team_name, "Northbank");
    assert_eq!(data.players.len(), 4);
    assert_eq!(data.players[1].first_name.as_deref(), Some("Ines"));
    assert_eq!(data.players[1].last_name.as_deref(), Some("Doyle"));
    assert_eq!(data.players[3].first_name.as_deref(), Some("Pedro"));
    assert_eq!(data.players[3].last_name.as_deref(), Some("Pedro"));
    assert_eq!(data.player_games[2].shirt_number, 5);
    assert_eq!(data.team_games[0].side.as_deref(), Some("home"));
    assert!(data.team_games[1].score.as_deref().is_some_and(|s| s.contains("fulltime")));
    assert_eq!(data.events.len(), 8);
}

#[test]
fn events_resolve_names_and_end_locations() {
    let raw = read_fixture("match_small.json");
    let data = extract_match_json(&raw, &QualifierCodes::default()).expect("fixture should parse");
    let events = &data.events;

    assert_eq!(events[0].type_name, "start");
    assert_eq!(events[0].player_id, 0);
    assert_eq!((events[0].start_x, events[0].start_y), (0.0, 0.0));

    assert_eq!(events[1].type_name, "pass");
    assert_eq!((events[1].end_x, events[1].end_y), (60.0, 50.0));
    assert_eq!(events[1].qualifiers.unknown_codes().collect::<Vec<_>>(), vec![212]);

    assert!(events[2].qualifiers.contains(Qualifier::Cross));

    // Goal-mouth qualifier: x pinned to the goal line, y from the value.
    assert_eq!(events[5].type_name, "goal");
    assert_eq!((events[5].end_x, events[5].end_y), (100.0, 48.0));

    assert!(!events[7].outcome);
    assert_eq!(events[7].period_id, 2);
}

#[test]
fn missing_period_rejects_the_file() {
    let raw = read_fixture("match_missing_period.json");
    let err = extract_match_json(&raw, &QualifierCodes::default()).unwrap_err();
    assert!(matches!(
        err,
        ExtractError::MissingRequiredField { field: "period", .. }
    ));
}

#[test]
fn invalid_json_is_an_invalid_document() {
    let err = extract_match_json("{not json", &QualifierCodes::default()).unwrap_err();
    assert!(matches!(err, ExtractError::InvalidField { field: "document", .. }));
}

#[test]
fn fixture_converts_end_to_end() {
    let raw = read_fixture("match_small.json");
    let cfg = SpadlConfig::default();
    let data = extract_match_json(&raw, &cfg.qualifier_codes).expect("fixture should parse");
    let actions = convert_game(&data.game, &data.events, &cfg);

    let types: Vec<ActionType> = actions.iter().map(|a| a.action_type).collect();
    assert_eq!(
        types,
        vec![
            ActionType::Pass,
            ActionType::Dribble,
            ActionType::Cross,
            ActionType::Clearance,
            ActionType::ThrowIn,
            ActionType::Shot,
            ActionType::Pass,
        ]
    );
    let ids: Vec<u32> = actions.iter().map(|a| a.action_id).collect();
    assert_eq!(ids, (0..7).collect::<Vec<u32>>());

    let dribble = &actions[1];
    assert_eq!(dribble.time_seconds, 3.5);
    assert_eq!(dribble.player_id, 1002);
    assert!(close(dribble.start(), (60.0, 50.0)));
    assert!(close(dribble.end(), (65.0, 50.0)));

    // Away clearance: start mirrored, end borrowed from the home throw-in.
    let clearance = &actions[3];
    assert_eq!(clearance.body_part, BodyPart::Head);
    assert!(close(clearance.start(), (88.0, 30.0)));
    assert!(close(clearance.end(), (50.0, 50.0)));

    // Own goal: flipped by the own-goal pass, then mirrored again as away.
    let own_goal = &actions[5];
    assert_eq!(own_goal.result, ActionResult::Owngoal);
    assert!(close(own_goal.start(), (5.0, 50.0)));
    assert!(close(own_goal.end(), (100.0, 48.0)));

    let last = &actions[6];
    assert_eq!(last.period_id, 2);
    assert_eq!(last.time_seconds, 2700.0);
    assert_eq!(last.result, ActionResult::Fail);
    assert_eq!(last.body_part, BodyPart::Head);
}
