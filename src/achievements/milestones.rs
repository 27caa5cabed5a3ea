//! Milestone thresholds and streak tiers.

/// Applied-job counts that earn a badge, ascending.
pub const JOB_MILESTONES: &[u32] = &[
    10, 25, 50, 75, 100, 125, 250, 500, 750, 1000, 1250, 1500, 1750, 2000, 2250, 2500, 2750, 3000,
    3250, 3500, 3750, 4000, 4250, 4500, 5000, 10000,
];

/// Interview counts that earn a badge, ascending.
pub const INTERVIEW_MILESTONES: &[u32] = &[
    1, 5, 10, 20, 25, 30, 50, 75, 100, 125, 150, 175, 200, 250, 300, 350, 400, 450, 500, 600, 700,
    800, 900, 1000, 1250, 1500, 2000, 2500, 3000, 4000, 5000, 10000,
];

/// A weeks-in-a-row badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreakTier {
    pub weeks: u32,
    pub name: &'static str,
    pub description: &'static str,
}

/// Streak tiers, longest first. The two- and four-week tiers share a name
/// and therefore a catalogue entry.
pub const STREAK_TIERS: &[StreakTier] = &[
    StreakTier {
        weeks: 12,
        name: "Persistent",
        description: "Target met for 3 months in a row",
    },
    StreakTier {
        weeks: 8,
        name: "Consistent",
        description: "Target met for 2 months in a row",
    },
    StreakTier {
        weeks: 4,
        name: "Steady",
        description: "Target met for 1 month in a row",
    },
    StreakTier {
        weeks: 2,
        name: "Steady",
        description: "Target met for 2 weeks in a row",
    },
    StreakTier {
        weeks: 1,
        name: "Committed",
        description: "Target met for 1 week in a row",
    },
];

/// The highest tier a streak of `weeks` qualifies for.
pub fn streak_tier(weeks: i32) -> Option<&'static StreakTier> {
    STREAK_TIERS
        .iter()
        .find(|tier| i64::from(weeks) >= i64::from(tier.weeks))
}

pub fn is_milestone(thresholds: &[u32], count: u32) -> bool {
    thresholds.binary_search(&count).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholds_are_strictly_ascending() {
        for table in [JOB_MILESTONES, INTERVIEW_MILESTONES] {
            assert!(table.windows(2).all(|pair| pair[0] < pair[1]));
        }
        assert!(STREAK_TIERS.windows(2).all(|pair| pair[0].weeks > pair[1].weeks));
    }

    #[test]
    fn streak_tier_picks_the_highest_reached() {
        assert_eq!(streak_tier(0), None);
        assert_eq!(streak_tier(1).map(|t| t.name), Some("Committed"));
        assert_eq!(streak_tier(3).map(|t| t.weeks), Some(2));
        assert_eq!(streak_tier(5).map(|t| t.description), Some("Target met for 1 month in a row"));
        assert_eq!(streak_tier(40).map(|t| t.name), Some("Persistent"));
    }

    #[test]
    fn milestone_membership() {
        assert!(is_milestone(JOB_MILESTONES, 10));
        assert!(!is_milestone(JOB_MILESTONES, 11));
        assert!(is_milestone(INTERVIEW_MILESTONES, 1));
    }
}
