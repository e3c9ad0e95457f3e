use std::fmt;
use std::str::FromStr;

use anyhow::anyhow;
use serde::{Deserialize, Serialize};

/// Version of the persisted (id, name) tables below. Bump when appending.
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    Pass,
    Cross,
    ThrowIn,
    FreekickCrossed,
    FreekickShort,
    CornerCrossed,
    CornerShort,
    TakeOn,
    Foul,
    Tackle,
    Interception,
    Shot,
    ShotPenalty,
    ShotFreekick,
    KeeperSave,
    KeeperClaim,
    KeeperPunch,
    KeeperPickUp,
    Clearance,
    BadTouch,
    NonAction,
    Dribble,
    Goalkick,
    BallRecovery,
}

impl ActionType {
    // Persisted ids. Append only.
    pub const ALL: [ActionType; 24] = [
        ActionType::Pass,
        ActionType::Cross,
        ActionType::ThrowIn,
        ActionType::FreekickCrossed,
        ActionType::FreekickShort,
        ActionType::CornerCrossed,
        ActionType::CornerShort,
        ActionType::TakeOn,
        ActionType::Foul,
        ActionType::Tackle,
        ActionType::Interception,
        ActionType::Shot,
        ActionType::ShotPenalty,
        ActionType::ShotFreekick,
        ActionType::KeeperSave,
        ActionType::KeeperClaim,
        ActionType::KeeperPunch,
        ActionType::KeeperPickUp,
        ActionType::Clearance,
        ActionType::BadTouch,
        ActionType::NonAction,
        ActionType::Dribble,
        ActionType::Goalkick,
        ActionType::BallRecovery,
    ];

    pub fn id(self) -> u8 {
        match self {
            ActionType::Pass => 0,
            ActionType::Cross => 1,
            ActionType::ThrowIn => 2,
            ActionType::FreekickCrossed => 3,
            ActionType::FreekickShort => 4,
            ActionType::CornerCrossed => 5,
            ActionType::CornerShort => 6,
            ActionType::TakeOn => 7,
            ActionType::Foul => 8,
            ActionType::Tackle => 9,
            ActionType::Interception => 10,
            ActionType::Shot => 11,
            ActionType::ShotPenalty => 12,
            ActionType::ShotFreekick => 13,
            ActionType::KeeperSave => 14,
            ActionType::KeeperClaim => 15,
            ActionType::KeeperPunch => 16,
            ActionType::KeeperPickUp => 17,
            ActionType::Clearance => 18,
            ActionType::BadTouch => 19,
            ActionType::NonAction => 20,
            ActionType::Dribble => 21,
            ActionType::Goalkick => 22,
            ActionType::BallRecovery => 23,
        }
    }

    pub fn from_id(id: u8) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.id() == id)
    }

    pub fn name(self) -> &'static str {
        match self {
            ActionType::Pass => "pass",
            ActionType::Cross => "cross",
            ActionType::ThrowIn => "throw_in",
            ActionType::FreekickCrossed => "freekick_crossed",
            ActionType::FreekickShort => "freekick_short",
            ActionType::CornerCrossed => "corner_crossed",
            ActionType::CornerShort => "corner_short",
            ActionType::TakeOn => "take_on",
            ActionType::Foul => "foul",
            ActionType::Tackle => "tackle",
            ActionType::Interception => "interception",
            ActionType::Shot => "shot",
            ActionType::ShotPenalty => "shot_penalty",
            ActionType::ShotFreekick => "shot_freekick",
            ActionType::KeeperSave => "keeper_save",
            ActionType::KeeperClaim => "keeper_claim",
            ActionType::KeeperPunch => "keeper_punch",
            ActionType::KeeperPickUp => "keeper_pick_up",
            ActionType::Clearance => "clearance",
            ActionType::BadTouch => "bad_touch",
            ActionType::NonAction => "non_action",
            ActionType::Dribble => "dribble",
            ActionType::Goalkick => "goalkick",
            ActionType::BallRecovery => "ball_recovery",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionResult {
    Fail,
    Success,
    Offside,
    Owngoal,
    YellowCard,
    RedCard,
}

impl ActionResult {
    pub const ALL: [ActionResult; 6] = [
        ActionResult::Fail,
        ActionResult::Success,
        ActionResult::Offside,
        ActionResult::Owngoal,
        ActionResult::YellowCard,
        ActionResult::RedCard,
    ];

    pub fn id(self) -> u8 {
        match self {
            ActionResult::Fail => 0,
            ActionResult::Success => 1,
            ActionResult::Offside => 2,
            ActionResult::Owngoal => 3,
            ActionResult::YellowCard => 4,
            ActionResult::RedCard => 5,
        }
    }

    pub fn from_id(id: u8) -> Option<Self> {
        Self::ALL.iter().copied().find(|r| r.id() == id)
    }

    pub fn name(self) -> &'static str {
        match self {
            ActionResult::Fail => "fail",
            ActionResult::Success => "success",
            ActionResult::Offside => "offside",
            ActionResult::Owngoal => "owngoal",
            ActionResult::YellowCard => "yellow_card",
            ActionResult::RedCard => "red_card",
        }
    }

    pub fn from_outcome(outcome: bool) -> Self {
        if outcome {
            ActionResult::Success
        } else {
            ActionResult::Fail
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyPart {
    Foot,
    Head,
    Other,
}

impl BodyPart {
    pub const ALL: [BodyPart; 3] = [BodyPart::Foot, BodyPart::Head, BodyPart::Other];

    pub fn id(self) -> u8 {
        match self {
            BodyPart::Foot => 0,
            BodyPart::Head => 1,
            BodyPart::Other => 2,
        }
    }

    pub fn from_id(id: u8) -> Option<Self> {
        Self::ALL.iter().copied().find(|b| b.id() == id)
    }

    pub fn name(self) -> &'static str {
        match self {
            BodyPart::Foot => "foot",
            BodyPart::Head => "head",
            BodyPart::Other => "other",
        }
    }
}

macro_rules! name_impls {
    ($ty:ident, $label:literal) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }

        impl FromStr for $ty {
            type Err = anyhow::Error;

            fn from_str(raw: &str) -> anyhow::Result<Self> {
                let needle = raw.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.name().eq_ignore_ascii_case(needle))
                    .ok_or_else(|| anyhow!("unknown {} name: {raw}", $label))
            }
        }
    };
}

name_impls!(ActionType, "action type");
name_impls!(ActionResult, "result");
name_impls!(BodyPart, "body part");

/// (id, name) rows for the persisted lookup tables.
pub fn action_type_table() -> Vec<(u8, &'static str)> {
    ActionType::ALL.iter().map(|t| (t.id(), t.name())).collect()
}

pub fn result_table() -> Vec<(u8, &'static str)> {
    ActionResult::ALL.iter().map(|r| (r.id(), r.name())).collect()
}

pub fn body_part_table() -> Vec<(u8, &'static str)> {
    BodyPart::ALL.iter().map(|b| (b.id(), b.name())).collect()
}

/// One on-ball action in absolute pitch units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    pub game_id: u64,
    pub period_id: u32,
    pub time_seconds: f64,
    pub team_id: u32,
    pub player_id: u32,
    pub start_x: f64,
    pub start_y: f64,
    pub end_x: f64,
    pub end_y: f64,
    pub result: ActionResult,
    pub body_part: BodyPart,
    pub action_type: ActionType,
    pub action_id: u32,
}

impl Action {
    pub fn start(&self) -> (f64, f64) {
        (self.start_x, self.start_y)
    }

    pub fn end(&self) -> (f64, f64) {
        (self.end_x, self.end_y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_positional_and_dense() {
        for (idx, t) in ActionType::ALL.iter().enumerate() {
            assert_eq!(t.id() as usize, idx);
            assert_eq!(ActionType::from_id(t.id()), Some(*t));
        }
        for (idx, r) in ActionResult::ALL.iter().enumerate() {
            assert_eq!(r.id() as usize, idx);
        }
        for (idx, b) in BodyPart::ALL.iter().enumerate() {
            assert_eq!(b.id() as usize, idx);
        }
        assert_eq!(ActionType::from_id(24), None);
    }

    #[test]
    fn persisted_ids_never_move() {
        assert_eq!(ActionType::NonAction.id(), 20);
        assert_eq!(ActionType::Dribble.id(), 21);
        assert_eq!(ActionType::BallRecovery.id(), 23);
        assert_eq!(ActionResult::Owngoal.id(), 3);
        assert_eq!(BodyPart::Other.id(), 2);
    }

    #[test]
    fn names_parse_back() {
        assert_eq!("keeper_pick_up".parse::<ActionType>().ok(), Some(ActionType::KeeperPickUp));
        assert_eq!(" Yellow_Card ".parse::<ActionResult>().ok(), Some(ActionResult::YellowCard));
        assert!("elbow".parse::<BodyPart>().is_err());
        assert_eq!(ActionType::ShotFreekick.to_string(), "shot_freekick");
    }

    #[test]
    fn serde_uses_table_names() {
        let json = serde_json::to_string(&ActionType::FreekickCrossed).unwrap();
        assert_eq!(json, "\"freekick_crossed\"");
    }
}
