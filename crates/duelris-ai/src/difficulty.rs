use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Strength of the AI player.
///
/// `Hard` thinks faster and also scores the queued next block.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::FromStr,
    derive_more::IsVariant,
)]
#[serde(rename_all = "kebab-case")]
pub enum Difficulty {
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    /// Delay between two commands issued by the AI.
    #[must_use]
    pub const fn think_delay(self) -> Duration {
        match self {
            Self::Normal => Duration::from_millis(500),
            Self::Hard => Duration::from_millis(200),
        }
    }

    /// Whether placements are also scored by the best follow-up of the next block.
    #[must_use]
    pub const fn uses_lookahead(self) -> bool {
        matches!(self, Self::Hard)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_think_delays() {
        assert_eq!(Difficulty::Normal.think_delay(), Duration::from_millis(500));
        assert_eq!(Difficulty::Hard.think_delay(), Duration::from_millis(200));
        assert!(Difficulty::Hard.uses_lookahead());
        assert!(!Difficulty::Normal.uses_lookahead());
    }

    #[test]
    fn test_parse_and_serde() {
        assert_eq!("hard".parse::<Difficulty>().unwrap(), Difficulty::Hard);
        assert_eq!(
            serde_json::from_str::<Difficulty>("\"normal\"").unwrap(),
            Difficulty::Normal
        );
    }
}
