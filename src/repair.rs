//! Whole-game repair passes. Each pass takes the time-ordered action list of
//! one game and returns the repaired list; they run in the order
//! own goals, direction of play, clearances, dribbles.

use crate::config::SpadlConfig;
use crate::coords::mirror;
use crate::spadl::{Action, ActionResult, ActionType, BodyPart};

/// Own-goal shots are reported towards the wrong goal; flip their end point.
pub fn fix_owngoal_coordinates(mut actions: Vec<Action>, cfg: &SpadlConfig) -> Vec<Action> {
    for a in actions
        .iter_mut()
        .filter(|a| a.result == ActionResult::Owngoal && a.action_type == ActionType::Shot)
    {
        a.end_x = mirror(a.end_x, cfg.field_length);
        a.end_y = mirror(a.end_y, cfg.field_width);
    }
    actions
}

/// Mirrors every non-home action so both teams attack the same way.
pub fn fix_direction_of_play(
    mut actions: Vec<Action>,
    home_team_id: u32,
    cfg: &SpadlConfig,
) -> Vec<Action> {
    for a in actions.iter_mut().filter(|a| a.team_id != home_team_id) {
        a.start_x = mirror(a.start_x, cfg.field_length);
        a.end_x = mirror(a.end_x, cfg.field_length);
        a.start_y = mirror(a.start_y, cfg.field_width);
        a.end_y = mirror(a.end_y, cfg.field_width);
    }
    actions
}

/// A clearance ends where the next action starts. The last action of a game
/// has no successor and ends at its own start.
pub fn fix_clearances(mut actions: Vec<Action>) -> Vec<Action> {
    let next_starts: Vec<(f64, f64)> = actions
        .iter()
        .enumerate()
        .map(|(idx, a)| actions.get(idx + 1).unwrap_or(a).start())
        .collect();
    for (a, (x, y)) in actions.iter_mut().zip(next_starts) {
        if a.action_type == ActionType::Clearance {
            a.end_x = x;
            a.end_y = y;
        }
    }
    actions
}

/// Inserts the carry implied between two consecutive actions of the same team
/// and renumbers the sequence.
pub fn add_dribbles(actions: Vec<Action>, cfg: &SpadlConfig) -> Vec<Action> {
    let dribbles: Vec<(usize, Action)> = actions
        .windows(2)
        .enumerate()
        .filter_map(|(idx, pair)| implied_dribble(&pair[0], &pair[1], cfg).map(|d| (idx, d)))
        .collect();
    if dribbles.is_empty() {
        return renumber(actions);
    }

    // A dribble sorts right behind the action it follows: (period, index, 1).
    let mut keyed: Vec<((u32, usize, u8), Action)> = actions
        .into_iter()
        .enumerate()
        .map(|(idx, a)| ((a.period_id, idx, 0), a))
        .collect();
    keyed.extend(
        dribbles
            .into_iter()
            .map(|(idx, d)| ((d.period_id, idx, 1), d)),
    );
    keyed.sort_by_key(|(key, _)| *key);

    renumber(keyed.into_iter().map(|(_, a)| a).collect())
}

pub fn implied_dribble(current: &Action, next: &Action, cfg: &SpadlConfig) -> Option<Action> {
    if current.team_id != next.team_id || current.period_id != next.period_id {
        return None;
    }
    if next.time_seconds - current.time_seconds >= cfg.max_dribble_duration {
        return None;
    }
    let dx = current.end_x - next.start_x;
    let dy = current.end_y - next.start_y;
    let dist2 = dx * dx + dy * dy;
    if dist2 < cfg.min_dribble_length.powi(2) || dist2 > cfg.max_dribble_length.powi(2) {
        return None;
    }

    Some(Action {
        game_id: next.game_id,
        period_id: next.period_id,
        time_seconds: (current.time_seconds + next.time_seconds) / 2.0,
        team_id: next.team_id,
        player_id: next.player_id,
        start_x: current.end_x,
        start_y: current.end_y,
        end_x: next.start_x,
        end_y: next.start_y,
        result: ActionResult::Success,
        body_part: BodyPart::Foot,
        action_type: ActionType::Dribble,
        action_id: current.action_id,
    })
}

/// Assigns dense 0-based action ids in sequence order.
pub fn renumber(mut actions: Vec<Action>) -> Vec<Action> {
    for (idx, a) in actions.iter_mut().enumerate() {
        a.action_id = idx as u32;
    }
    actions
}
