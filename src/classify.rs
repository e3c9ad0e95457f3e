use crate::qualifiers::{Qualifier, QualifierSet};
use crate::spadl::{ActionResult, ActionType, BodyPart};

/// Maps a provider event to its action type and result. Total: unknown type
/// names come back as `non_action` / `fail`.
pub fn classify(type_name: &str, outcome: bool, q: &QualifierSet) -> (ActionType, ActionResult) {
    (action_type(type_name, outcome, q), action_result(type_name, outcome, q))
}

pub fn action_type(type_name: &str, outcome: bool, q: &QualifierSet) -> ActionType {
    match type_name {
        "pass" | "offside pass" => pass_type(q),
        "take on" => ActionType::TakeOn,
        "foul" if !outcome => ActionType::Foul,
        "tackle" => ActionType::Tackle,
        "interception" | "blocked pass" => ActionType::Interception,
        "attempt saved" | "miss" | "post" | "goal" => {
            if q.contains(Qualifier::Penalty) {
                ActionType::ShotPenalty
            } else if q.contains(Qualifier::DirectFreekick) {
                ActionType::ShotFreekick
            } else {
                ActionType::Shot
            }
        }
        "save" => ActionType::KeeperSave,
        "claim" => ActionType::KeeperClaim,
        "punch" => ActionType::KeeperPunch,
        "keeper pick-up" => ActionType::KeeperPickUp,
        "clearance" => ActionType::Clearance,
        "ball touch" if !outcome => ActionType::BadTouch,
        "ball recovery" => ActionType::BallRecovery,
        _ => ActionType::NonAction,
    }
}

// Throw-in beats every set-piece flag; freekick beats corner.
fn pass_type(q: &QualifierSet) -> ActionType {
    let cross = q.contains(Qualifier::Cross);
    let freekick = q.contains(Qualifier::Freekick);
    let corner = q.contains(Qualifier::Corner);

    if q.contains(Qualifier::ThrowIn) {
        ActionType::ThrowIn
    } else if freekick && cross {
        ActionType::FreekickCrossed
    } else if freekick {
        ActionType::FreekickShort
    } else if corner && cross {
        ActionType::CornerCrossed
    } else if corner {
        ActionType::CornerShort
    } else if cross {
        ActionType::Cross
    } else {
        ActionType::Pass
    }
}

pub fn action_result(type_name: &str, outcome: bool, q: &QualifierSet) -> ActionResult {
    match type_name {
        "offside pass" => ActionResult::Offside,
        "attempt saved" | "miss" | "post" => ActionResult::Fail,
        "goal" if q.contains(Qualifier::OwnGoal) => ActionResult::Owngoal,
        "goal" => ActionResult::Success,
        _ => ActionResult::from_outcome(outcome),
    }
}

pub fn body_part(q: &QualifierSet) -> BodyPart {
    if q.contains(Qualifier::Head) {
        BodyPart::Head
    } else if q.contains(Qualifier::OtherBodyPart) {
        BodyPart::Other
    } else {
        BodyPart::Foot
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quals(list: &[Qualifier]) -> QualifierSet {
        list.iter().fold(QualifierSet::new(), |set, q| set.with(*q, None))
    }

    #[test]
    fn pass_precedence() {
        use Qualifier::*;
        let cases = [
            (vec![ThrowIn, Freekick, Corner, Cross], ActionType::ThrowIn),
            (vec![Freekick, Cross, Corner], ActionType::FreekickCrossed),
            (vec![Freekick, Corner], ActionType::FreekickShort),
            (vec![Corner, Cross], ActionType::CornerCrossed),
            (vec![Corner], ActionType::CornerShort),
            (vec![Cross], ActionType::Cross),
            (vec![], ActionType::Pass),
        ];
        for (qs, expected) in cases {
            assert_eq!(action_type("pass", true, &quals(&qs)), expected, "{qs:?}");
            assert_eq!(action_type("offside pass", false, &quals(&qs)), expected);
        }
    }

    #[test]
    fn shots_prefer_penalty_over_freekick() {
        use Qualifier::*;
        assert_eq!(
            action_type("goal", true, &quals(&[Penalty, DirectFreekick])),
            ActionType::ShotPenalty
        );
        assert_eq!(
            action_type("miss", false, &quals(&[DirectFreekick])),
            ActionType::ShotFreekick
        );
        assert_eq!(action_type("post", false, &quals(&[])), ActionType::Shot);
    }

    #[test]
    fn outcome_gated_types() {
        let none = QualifierSet::new();
        assert_eq!(action_type("foul", false, &none), ActionType::Foul);
        assert_eq!(action_type("foul", true, &none), ActionType::NonAction);
        assert_eq!(action_type("ball touch", false, &none), ActionType::BadTouch);
        assert_eq!(action_type("ball touch", true, &none), ActionType::NonAction);
    }

    #[test]
    fn results() {
        let none = QualifierSet::new();
        let og = quals(&[Qualifier::OwnGoal]);
        assert_eq!(action_result("offside pass", true, &none), ActionResult::Offside);
        assert_eq!(action_result("attempt saved", true, &none), ActionResult::Fail);
        assert_eq!(action_result("goal", true, &og), ActionResult::Owngoal);
        assert_eq!(action_result("goal", false, &none), ActionResult::Success);
        assert_eq!(action_result("foul", true, &none), ActionResult::Success);
        assert_eq!(action_result("tackle", false, &none), ActionResult::Fail);
        assert_eq!(action_result("card", true, &none), ActionResult::Success);
    }

    #[test]
    fn head_beats_other() {
        use Qualifier::*;
        assert_eq!(body_part(&quals(&[Head, OtherBodyPart])), BodyPart::Head);
        assert_eq!(body_part(&quals(&[OtherBodyPart])), BodyPart::Other);
        assert_eq!(body_part(&quals(&[Cross])), BodyPart::Foot);
    }

    #[test]
    fn unknown_names_are_non_actions() {
        let (t, r) = classify("formation change", false, &QualifierSet::new());
        assert_eq!(t, ActionType::NonAction);
        assert_eq!(r, ActionResult::Fail);
        assert_eq!(classify("", true, &QualifierSet::new()).0, ActionType::NonAction);
    }
}
