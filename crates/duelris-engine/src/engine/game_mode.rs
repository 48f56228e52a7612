use serde::{Deserialize, Serialize};

/// Match rule set shared by both engines of a battle.
///
/// Parses case-insensitively from the variant name, e.g. `"timelimit"`.
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
pub enum GameMode {
    /// Two humans, no items, no clock.
    #[default]
    Normal,
    /// Two humans; blocks periodically carry an item cell.
    Item,
    /// Two humans racing a countdown.
    TimeLimit,
    /// Player 1 is human, player 2 is driven by the AI.
    PlayerVsAi,
    /// Both players are driven by the AI.
    AiVsAi,
}

impl GameMode {
    pub const ALL: [Self; 5] = [
        Self::Normal,
        Self::Item,
        Self::TimeLimit,
        Self::PlayerVsAi,
        Self::AiVsAi,
    ];

    #[must_use]
    pub fn has_items(self) -> bool {
        self.is_item()
    }

    #[must_use]
    pub fn has_countdown(self) -> bool {
        self.is_time_limit()
    }

    /// Number of AI-driven players, counted from player 2 downward.
    #[must_use]
    pub fn ai_players(self) -> usize {
        match self {
            Self::Normal | Self::Item | Self::TimeLimit => 0,
            Self::PlayerVsAi => 1,
            Self::AiVsAi => 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("timelimit".parse::<GameMode>().unwrap(), GameMode::TimeLimit);
        assert_eq!("AiVsAi".parse::<GameMode>().unwrap(), GameMode::AiVsAi);
        assert!("battle".parse::<GameMode>().is_err());
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&GameMode::PlayerVsAi).unwrap();
        assert_eq!(json, "\"player-vs-ai\"");
        let mode: GameMode = serde_json::from_str("\"time-limit\"").unwrap();
        assert_eq!(mode, GameMode::TimeLimit);
    }

    #[test]
    fn test_mode_features() {
        assert!(GameMode::Item.has_items());
        assert!(!GameMode::Normal.has_items());
        assert!(GameMode::TimeLimit.has_countdown());
        assert_eq!(
            GameMode::ALL.map(GameMode::ai_players),
            [0, 0, 0, 1, 2]
        );
    }
}
