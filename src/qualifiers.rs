use std::collections::BTreeMap;

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Qualifier meanings the classifier and normalizer act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Qualifier {
    Cross,
    Freekick,
    Corner,
    ThrowIn,
    Penalty,
    DirectFreekick,
    OwnGoal,
    Head,
    OtherBodyPart,
    PassEndX,
    PassEndY,
    BlockedEndX,
    BlockedEndY,
    GoalMouthY,
}

impl Qualifier {
    pub const ALL: [Qualifier; 14] = [
        Qualifier::Cross,
        Qualifier::Freekick,
        Qualifier::Corner,
        Qualifier::ThrowIn,
        Qualifier::Penalty,
        Qualifier::DirectFreekick,
        Qualifier::OwnGoal,
        Qualifier::Head,
        Qualifier::OtherBodyPart,
        Qualifier::PassEndX,
        Qualifier::PassEndY,
        Qualifier::BlockedEndX,
        Qualifier::BlockedEndY,
        Qualifier::GoalMouthY,
    ];
}

/// Provider codes for each [`Qualifier`]. Missing keys in an override file
/// keep the defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualifierCodes {
    pub cross: u32,
    pub freekick: u32,
    pub corner: u32,
    pub throw_in: u32,
    pub penalty: u32,
    pub direct_freekick: u32,
    pub own_goal: u32,
    pub head: u32,
    pub other_body_part: u32,
    pub pass_end_x: u32,
    pub pass_end_y: u32,
    pub blocked_end_x: u32,
    pub blocked_end_y: u32,
    pub goal_mouth_y: u32,
}

impl Default for QualifierCodes {
    fn default() -> Self {
        Self {
            cross: 2,
            freekick: 5,
            corner: 6,
            throw_in: 107,
            penalty: 9,
            direct_freekick: 26,
            own_goal: 28,
            head: 15,
            other_body_part: 21,
            pass_end_x: 140,
            pass_end_y: 141,
            blocked_end_x: 146,
            blocked_end_y: 147,
            goal_mouth_y: 102,
        }
    }
}

impl QualifierCodes {
    pub fn code(&self, qualifier: Qualifier) -> u32 {
        match qualifier {
            Qualifier::Cross => self.cross,
            Qualifier::Freekick => self.freekick,
            Qualifier::Corner => self.corner,
            Qualifier::ThrowIn => self.throw_in,
            Qualifier::Penalty => self.penalty,
            Qualifier::DirectFreekick => self.direct_freekick,
            Qualifier::OwnGoal => self.own_goal,
            Qualifier::Head => self.head,
            Qualifier::OtherBodyPart => self.other_body_part,
            Qualifier::PassEndX => self.pass_end_x,
            Qualifier::PassEndY => self.pass_end_y,
            Qualifier::BlockedEndX => self.blocked_end_x,
            Qualifier::BlockedEndY => self.blocked_end_y,
            Qualifier::GoalMouthY => self.goal_mouth_y,
        }
    }

    pub fn meaning(&self, code: u32) -> Option<Qualifier> {
        Qualifier::ALL.iter().copied().find(|q| self.code(*q) == code)
    }

    /// Rejects a table that maps two meanings to one provider code.
    pub fn validate(&self) -> Result<()> {
        let mut seen: BTreeMap<u32, Qualifier> = BTreeMap::new();
        for qualifier in Qualifier::ALL {
            let code = self.code(qualifier);
            if let Some(prev) = seen.insert(code, qualifier) {
                bail!("qualifier code {code} is assigned to both {prev:?} and {qualifier:?}");
            }
        }
        Ok(())
    }
}

/// Qualifiers attached to one provider event.
///
/// Logic only ever reads `known`. Codes without a meaning are kept in
/// `unknown` so the provider pairs can be written back out unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QualifierSet {
    known: BTreeMap<Qualifier, Option<String>>,
    unknown: BTreeMap<u32, Option<String>>,
}

impl QualifierSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_raw<I>(pairs: I, codes: &QualifierCodes) -> Self
    where
        I: IntoIterator<Item = (u32, Option<String>)>,
    {
        let mut set = Self::new();
        for (code, value) in pairs {
            match codes.meaning(code) {
                Some(q) => {
                    set.known.insert(q, value);
                }
                None => {
                    set.unknown.insert(code, value);
                }
            }
        }
        set
    }

    pub fn to_raw(&self, codes: &QualifierCodes) -> BTreeMap<u32, Option<String>> {
        let mut out = self.unknown.clone();
        for (q, value) in &self.known {
            out.insert(codes.code(*q), value.clone());
        }
        out
    }

    pub fn with(mut self, qualifier: Qualifier, value: Option<&str>) -> Self {
        self.insert(qualifier, value.map(str::to_string));
        self
    }

    pub fn insert(&mut self, qualifier: Qualifier, value: Option<String>) {
        self.known.insert(qualifier, value);
    }

    pub fn contains(&self, qualifier: Qualifier) -> bool {
        self.known.contains_key(&qualifier)
    }

    pub fn value(&self, qualifier: Qualifier) -> Option<&str> {
        self.known.get(&qualifier)?.as_deref()
    }

    /// Numeric value of a present qualifier. A missing or non-numeric value
    /// reads as absent.
    pub fn number(&self, qualifier: Qualifier) -> Option<f64> {
        let raw = self.known.get(&qualifier)?;
        let parsed = raw.as_deref().and_then(|v| v.trim().parse::<f64>().ok());
        if parsed.is_none() {
            trace!(?qualifier, value = ?raw, "qualifier value is not numeric");
        }
        parsed
    }

    pub fn unknown_codes(&self) -> impl Iterator<Item = u32> + '_ {
        self.unknown.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.known.len() + self.unknown.len()
    }

    pub fn is_empty(&self) -> bool {
        self.known.is_empty() && self.unknown.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_pairs_split_into_known_and_unknown() {
        let codes = QualifierCodes::default();
        let set = QualifierSet::from_raw(
            vec![(2, None), (140, Some("55.1".to_string())), (212, Some("12".to_string()))],
            &codes,
        );
        assert!(set.contains(Qualifier::Cross));
        assert_eq!(set.number(Qualifier::PassEndX), Some(55.1));
        assert_eq!(set.unknown_codes().collect::<Vec<_>>(), vec![212]);
        assert_eq!(set.len(), 3);

        let back = set.to_raw(&codes);
        assert_eq!(back.len(), 3);
        assert_eq!(back.get(&212), Some(&Some("12".to_string())));
        assert_eq!(back.get(&2), Some(&None));
    }

    #[test]
    fn non_numeric_value_reads_as_absent() {
        let set = QualifierSet::new()
            .with(Qualifier::PassEndX, Some("left"))
            .with(Qualifier::PassEndY, None);
        assert!(set.contains(Qualifier::PassEndX));
        assert_eq!(set.number(Qualifier::PassEndX), None);
        assert_eq!(set.number(Qualifier::PassEndY), None);
    }

    #[test]
    fn overridden_codes_change_meaning() {
        let codes: QualifierCodes = serde_json::from_str(r#"{"cross": 3}"#).unwrap();
        assert_eq!(codes.cross, 3);
        assert_eq!(codes.corner, 6);
        let set = QualifierSet::from_raw(vec![(2, None), (3, None)], &codes);
        assert!(set.contains(Qualifier::Cross));
        assert_eq!(set.unknown_codes().collect::<Vec<_>>(), vec![2]);
    }

    #[test]
    fn default_codes_are_unambiguous() {
        assert!(QualifierCodes::default().validate().is_ok());
    }

    #[test]
    fn shared_code_is_rejected() {
        let codes: QualifierCodes = serde_json::from_str(r#"{"goal_mouth_y": 2}"#).unwrap();
        let err = codes.validate().unwrap_err().to_string();
        assert!(err.contains("Cross"), "{err}");
        assert!(err.contains("GoalMouthY"), "{err}");
    }
}
