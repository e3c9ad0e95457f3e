use crate::qualifiers::{Qualifier, QualifierSet};

/// Provider coordinates are percentages of the pitch.
pub const PROVIDER_SCALE: f64 = 100.0;

/// End x in provider units. A ball that left over the goal line ends at 100.
pub fn end_x(q: &QualifierSet) -> Option<f64> {
    q.number(Qualifier::PassEndX)
        .or_else(|| q.number(Qualifier::BlockedEndX))
        .or_else(|| q.contains(Qualifier::GoalMouthY).then_some(PROVIDER_SCALE))
}

/// End y in provider units. Unlike x, the goal-mouth rule reads the
/// qualifier's own value.
pub fn end_y(q: &QualifierSet) -> Option<f64> {
    q.number(Qualifier::PassEndY)
        .or_else(|| q.number(Qualifier::BlockedEndY))
        .or_else(|| q.number(Qualifier::GoalMouthY))
}

/// End location in provider units, falling back to the start per axis.
pub fn resolve_end(q: &QualifierSet, start_x: f64, start_y: f64) -> (f64, f64) {
    (end_x(q).unwrap_or(start_x), end_y(q).unwrap_or(start_y))
}

pub fn rescale(value: f64, extent: f64) -> f64 {
    value / PROVIDER_SCALE * extent
}

pub fn mirror(value: f64, extent: f64) -> f64 {
    extent - value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pass_end_wins_over_blocked() {
        let q = QualifierSet::new()
            .with(Qualifier::PassEndX, Some("80.5"))
            .with(Qualifier::BlockedEndX, Some("10"))
            .with(Qualifier::PassEndY, Some("20"))
            .with(Qualifier::BlockedEndY, Some("30"));
        assert_eq!(resolve_end(&q, 1.0, 2.0), (80.5, 20.0));
    }

    #[test]
    fn goal_mouth_is_asymmetric() {
        let q = QualifierSet::new().with(Qualifier::GoalMouthY, Some("47.3"));
        assert_eq!(end_x(&q), Some(100.0));
        assert_eq!(end_y(&q), Some(47.3));

        let bare = QualifierSet::new().with(Qualifier::GoalMouthY, None);
        assert_eq!(end_x(&bare), Some(100.0));
        assert_eq!(end_y(&bare), None);
    }

    #[test]
    fn unparseable_values_fall_through() {
        let q = QualifierSet::new()
            .with(Qualifier::PassEndX, Some("n/a"))
            .with(Qualifier::BlockedEndX, Some("33"))
            .with(Qualifier::PassEndY, Some(""));
        assert_eq!(resolve_end(&q, 5.0, 6.0), (33.0, 6.0));
    }

    #[test]
    fn missing_end_defaults_to_start() {
        assert_eq!(resolve_end(&QualifierSet::new(), 12.0, 88.0), (12.0, 88.0));
    }

    #[test]
    fn rescale_is_per_axis() {
        assert_eq!(rescale(50.0, 105.0), 52.5);
        assert_eq!(rescale(50.0, 68.0), 34.0);
        assert_eq!(mirror(30.0, 105.0), 75.0);
    }
}
