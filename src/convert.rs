use rayon::prelude::*;
use tracing::debug;

use crate::classify::{body_part, classify};
use crate::config::SpadlConfig;
use crate::coords::rescale;
use crate::event::{Game, RawEvent};
use crate::repair;
use crate::spadl::{Action, ActionType};

/// Classifies and rescales one event. The action id is provisional.
pub fn event_to_action(event: &RawEvent, cfg: &SpadlConfig) -> Action {
    let (action_type, result) = classify(&event.type_name, event.outcome, &event.qualifiers);
    Action {
        game_id: event.game_id,
        period_id: event.period_id,
        time_seconds: event.time_seconds(),
        team_id: event.team_id,
        player_id: event.player_id,
        start_x: rescale(event.start_x, cfg.field_length),
        start_y: rescale(event.start_y, cfg.field_width),
        end_x: rescale(event.end_x, cfg.field_length),
        end_y: rescale(event.end_y, cfg.field_width),
        result,
        body_part: body_part(&event.qualifiers),
        action_type,
        action_id: 0,
    }
}

/// Converts one game's events into its final action stream.
///
/// Events are ordered by (period, minute, second) with input order breaking
/// ties, non-actions are dropped, the repair passes run in fixed order and
/// the result carries dense 0-based action ids.
pub fn convert_to_actions(
    events: &[RawEvent],
    home_team_id: u32,
    cfg: &SpadlConfig,
) -> Vec<Action> {
    let mut ordered: Vec<&RawEvent> = events.iter().collect();
    ordered.sort_by_key(|e| (e.period_id, e.minute, e.second));

    let mut actions: Vec<Action> = ordered
        .into_iter()
        .map(|e| event_to_action(e, cfg))
        .filter(|a| a.action_type != ActionType::NonAction)
        .collect();
    let dropped = events.len() - actions.len();
    actions.sort_by(|a, b| {
        a.period_id
            .cmp(&b.period_id)
            .then(a.time_seconds.total_cmp(&b.time_seconds))
    });

    let actions = repair::fix_owngoal_coordinates(actions, cfg);
    let actions = repair::fix_direction_of_play(actions, home_team_id, cfg);
    let actions = repair::fix_clearances(actions);
    let actions = repair::renumber(actions);
    let before_dribbles = actions.len();
    let actions = repair::add_dribbles(actions, cfg);

    debug!(
        game_id = events.first().map(|e| e.game_id),
        events = events.len(),
        dropped,
        dribbles = actions.len() - before_dribbles,
        actions = actions.len(),
        "converted game"
    );
    actions
}

pub fn convert_game(game: &Game, events: &[RawEvent], cfg: &SpadlConfig) -> Vec<Action> {
    convert_to_actions(events, game.home_team_id, cfg)
}

/// Converts independent games in parallel. Output order follows input order.
pub fn convert_games(
    games: &[(Game, Vec<RawEvent>)],
    cfg: &SpadlConfig,
    threads: usize,
) -> Vec<(Game, Vec<Action>)> {
    let run = || {
        games
            .par_iter()
            .map(|(game, events)| (*game, convert_game(game, events, cfg)))
            .collect::<Vec<_>>()
    };
    match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
        Ok(pool) => pool.install(run),
        Err(_) => run(),
    }
}
