use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::qualifiers::QualifierSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Game {
    pub game_id: u64,
    pub home_team_id: u32,
    pub away_team_id: u32,
}

/// One decoded provider event. Coordinates are provider percentages (0-100).
#[derive(Debug, Clone, PartialEq)]
pub struct RawEvent {
    pub game_id: u64,
    pub event_id: u64,
    pub type_id: u32,
    pub type_name: String,
    pub period_id: u32,
    pub minute: u32,
    pub second: u32,
    pub team_id: u32,
    pub player_id: u32,
    pub outcome: bool,
    pub start_x: f64,
    pub start_y: f64,
    pub end_x: f64,
    pub end_y: f64,
    pub qualifiers: QualifierSet,
}

impl RawEvent {
    pub fn time_seconds(&self) -> f64 {
        f64::from(60 * self.minute + self.second)
    }
}

const EVENT_TYPES: &[(u32, &str)] = &[
    (1, "pass"),
    (2, "offside pass"),
    (3, "take on"),
    (4, "foul"),
    (5, "out"),
    (6, "corner awarded"),
    (7, "tackle"),
    (8, "interception"),
    (9, "turnover"),
    (10, "save"),
    (11, "claim"),
    (12, "clearance"),
    (13, "miss"),
    (14, "post"),
    (15, "attempt saved"),
    (16, "goal"),
    (17, "card"),
    (18, "player off"),
    (19, "player on"),
    (20, "player retired"),
    (21, "player returns"),
    (22, "player becomes goalkeeper"),
    (23, "goalkeeper becomes player"),
    (24, "condition change"),
    (25, "official change"),
    (26, "unknown26"),
    (27, "start delay"),
    (28, "end delay"),
    (29, "unknown29"),
    (30, "end"),
    (31, "unknown31"),
    (32, "start"),
    (33, "unknown33"),
    (34, "team set up"),
    (35, "player changed position"),
    (36, "player changed jersey number"),
    (37, "collection end"),
    (38, "temp_goal"),
    (39, "temp_attempt"),
    (40, "formation change"),
    (41, "punch"),
    (42, "good skill"),
    (43, "deleted event"),
    (44, "aerial"),
    (45, "challenge"),
    (46, "unknown46"),
    (47, "rescinded card"),
    // Provider ships 48 under the same label as 46.
    (48, "unknown46"),
    (49, "ball recovery"),
    (50, "dispossessed"),
    (51, "error"),
    (52, "keeper pick-up"),
    (53, "cross not claimed"),
    (54, "smother"),
    (55, "offside provoked"),
    (56, "shield ball opp"),
    (57, "foul throw in"),
    (58, "penalty faced"),
    (59, "keeper sweeper"),
    (60, "chance missed"),
    (61, "ball touch"),
    (62, "unknown62"),
    (63, "temp_save"),
    (64, "resume"),
    (65, "contentious referee decision"),
    (66, "possession data"),
    (67, "50/50"),
    (68, "referee drop ball"),
    (69, "failed to block"),
    (70, "injury time announcement"),
    (71, "coach setup"),
    (72, "caught offside"),
    (73, "other ball contact"),
    (74, "blocked pass"),
    (75, "delayed start"),
    (76, "early end"),
    (77, "player off pitch"),
];

static EVENT_TYPE_INDEX: Lazy<HashMap<u32, &'static str>> =
    Lazy::new(|| EVENT_TYPES.iter().copied().collect());

pub fn event_types() -> &'static [(u32, &'static str)] {
    EVENT_TYPES
}

pub fn event_type_name(type_id: u32) -> Option<&'static str> {
    EVENT_TYPE_INDEX.get(&type_id).copied()
}
