use serde::{Deserialize, Serialize};

/// One of the two seats of a battle.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
#[serde(rename_all = "kebab-case")]
pub enum PlayerId {
    #[display("player 1")]
    One,
    #[display("player 2")]
    Two,
}

impl PlayerId {
    pub const ALL: [Self; 2] = [Self::One, Self::Two];

    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::One => 0,
            Self::Two => 1,
        }
    }

    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::One => Self::Two,
            Self::Two => Self::One,
        }
    }
}

/// Why a battle ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::IsVariant)]
#[serde(rename_all = "kebab-case")]
pub enum EndReason {
    /// The countdown reached zero.
    TimeUp,
    /// The given player's block could not spawn or was buried by garbage.
    GameOver(PlayerId),
}

/// Final result of a battle.
///
/// The winner is the player with the strictly higher score; equal scores go
/// to player 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchOutcome {
    pub winner: PlayerId,
    pub scores: [usize; 2],
    pub reason: EndReason,
}

impl MatchOutcome {
    #[must_use]
    pub fn decide(scores: [usize; 2], reason: EndReason) -> Self {
        let winner = if scores[1] > scores[0] {
            PlayerId::Two
        } else {
            PlayerId::One
        };
        Self {
            winner,
            scores,
            reason,
        }
    }
}
