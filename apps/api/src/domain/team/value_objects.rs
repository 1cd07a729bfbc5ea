use serde::{Deserialize, Serialize};

/// Maturity tier of a team
///
/// # Level Transitions
/// ```text
/// Junior -> Senior -> Expert
/// ```
///
/// Levels are ordered (`Junior < Senior < Expert`) and promotion only ever
/// moves one step forward. `Expert` is terminal.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "team_level", rename_all = "lowercase")]
pub enum Level {
    /// Newly formed team
    Junior,
    /// Team with proven delivery
    Senior,
    /// Top tier, no further promotion
    Expert,
}

impl Level {
    /// All levels in promotion order
    pub const ALL: [Level; 3] = [Level::Junior, Level::Senior, Level::Expert];

    /// Returns the level a team is promoted to, if any
    ///
    /// # Example
    /// ```
    /// use academia_api::domain::team::value_objects::Level;
    ///
    /// assert_eq!(Level::Junior.next(), Some(Level::Senior));
    /// assert_eq!(Level::Expert.next(), None);
    /// ```
    pub fn next(&self) -> Option<Level> {
        match self {
            Level::Junior => Some(Level::Senior),
            Level::Senior => Some(Level::Expert),
            Level::Expert => None,
        }
    }

    /// Checks if a promotion from current level to next level is valid
    ///
    /// # Valid Transitions
    /// - Junior -> Senior
    /// - Senior -> Expert
    pub fn can_transition_to(&self, next: Level) -> bool {
        use Level::*;
        matches!((self, next), (Junior, Senior) | (Senior, Expert))
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Level::Junior => write!(f, "junior"),
            Level::Senior => write!(f, "senior"),
            Level::Expert => write!(f, "expert"),
        }
    }
}

impl std::str::FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "junior" => Ok(Level::Junior),
            "senior" => Ok(Level::Senior),
            "expert" => Ok(Level::Expert),
            other => Err(format!("Unknown level: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_transition_junior_to_senior() {
        assert!(Level::Junior.can_transition_to(Level::Senior));
    }

    #[test]
    fn valid_transition_senior_to_expert() {
        assert!(Level::Senior.can_transition_to(Level::Expert));
    }

    #[test]
    fn invalid_transition_skips_a_level() {
        assert!(!Level::Junior.can_transition_to(Level::Expert));
    }

    #[test]
    fn transitions_are_never_reversed() {
        assert!(!Level::Senior.can_transition_to(Level::Junior));
        assert!(!Level::Expert.can_transition_to(Level::Senior));
        assert!(!Level::Expert.can_transition_to(Level::Junior));
    }

    #[test]
    fn expert_is_terminal() {
        assert_eq!(Level::Expert.next(), None);
        for level in Level::ALL {
            assert!(!Level::Expert.can_transition_to(level));
        }
    }

    #[test]
    fn next_agrees_with_transition_table() {
        for level in Level::ALL {
            if let Some(next) = level.next() {
                assert!(level.can_transition_to(next));
            }
        }
    }

    #[test]
    fn levels_are_ordered() {
        assert!(Level::Junior < Level::Senior);
        assert!(Level::Senior < Level::Expert);
    }

    #[test]
    fn level_display_and_parse() {
        for level in Level::ALL {
            assert_eq!(level.to_string().parse::<Level>(), Ok(level));
        }
        assert_eq!("SENIOR".parse::<Level>(), Ok(Level::Senior));
        assert!("master".parse::<Level>().is_err());
    }
}
