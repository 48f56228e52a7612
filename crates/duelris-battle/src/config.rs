use std::time::Duration;

use duelris_ai::{Difficulty, HeuristicWeights};
use duelris_engine::{BlockSeed, DEFAULT_ITEM_EFFECT, GameMode};
use serde::{Deserialize, Serialize};

/// Everything a battle needs, resolved once before it starts.
///
/// Missing fields take their defaults when deserialized, so a config file
/// only has to name what it changes:
///
/// ```
/// use duelris_battle::BattleConfig;
/// use duelris_engine::GameMode;
///
/// let config: BattleConfig = serde_json::from_str(r#"{ "mode": "time-limit" }"#).unwrap();
/// assert_eq!(config.mode, GameMode::TimeLimit);
/// assert_eq!(config.time_limit_secs, 300);
/// config.validate().unwrap();
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BattleConfig {
    pub mode: GameMode,
    /// Strength of the AI player in [`GameMode::PlayerVsAi`].
    pub difficulty: Difficulty,
    /// Shared block sequence seed; random when absent.
    pub seed: Option<BlockSeed>,
    #[serde(with = "serde_millis", rename = "gravity_interval_ms")]
    pub gravity_interval: Duration,
    /// Starting value of the countdown in [`GameMode::TimeLimit`].
    pub time_limit_secs: u32,
    #[serde(with = "serde_millis", rename = "item_effect_ms")]
    pub item_effect: Duration,
    /// Placement weights shared by every AI seat.
    pub ai_weights: HeuristicWeights,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            mode: GameMode::default(),
            difficulty: Difficulty::default(),
            seed: None,
            gravity_interval: Duration::from_secs(1),
            time_limit_secs: 300,
            item_effect: DEFAULT_ITEM_EFFECT,
            ai_weights: HeuristicWeights::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("gravity interval must be positive")]
    ZeroGravityInterval,
    #[display("time limit must be at least one second")]
    ZeroTimeLimit,
    #[display("item effect duration must be positive")]
    ZeroItemEffect,
}

impl BattleConfig {
    #[must_use]
    pub fn new(mode: GameMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.gravity_interval.is_zero() {
            return Err(ConfigError::ZeroGravityInterval);
        }
        if self.mode.has_countdown() && self.time_limit_secs == 0 {
            return Err(ConfigError::ZeroTimeLimit);
        }
        if self.mode.has_items() && self.item_effect.is_zero() {
            return Err(ConfigError::ZeroItemEffect);
        }
        Ok(())
    }
}

mod serde_millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let millis = u64::try_from(value.as_millis()).unwrap_or(u64::MAX);
        serializer.serialize_u64(millis)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}
