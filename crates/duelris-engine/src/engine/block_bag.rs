use std::{collections::VecDeque, fmt, str::FromStr};

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
    seq::SliceRandom,
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::core::BlockKind;

/// Deterministic 7-bag block generator.
///
/// Every run of seven draws aligned to a bag boundary contains each kind
/// exactly once. The same RNG also picks item cells, so a seed fixes the
/// whole sequence of blocks an engine will see.
///
/// # Example
///
/// ```
/// use duelris_engine::{BlockBag, BlockSeed};
///
/// let seed: BlockSeed = "0123456789abcdef0123456789abcdef".parse().unwrap();
/// let mut a = BlockBag::with_seed(seed);
/// let mut b = BlockBag::with_seed(seed);
/// assert_eq!(a.pop_next(), b.pop_next());
/// ```
#[derive(Debug, Clone)]
pub struct BlockBag {
    rng: Pcg32,
    bag: VecDeque<BlockKind>,
}

/// 128-bit seed for [`BlockBag`], serialized as a 32-character hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockSeed([u8; 16]);

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid hex seed {input:?}: {reason}")]
pub struct SeedParseError {
    input: String,
    reason: String,
}

impl BlockSeed {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for BlockSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", u128::from_be_bytes(self.0))
    }
}

impl FromStr for BlockSeed {
    type Err = SeedParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let error = |reason: String| SeedParseError {
            input: s.to_owned(),
            reason,
        };
        if s.len() != 32 {
            return Err(error(format!("expected 32 characters, got {}", s.len())));
        }
        let num = u128::from_str_radix(s, 16).map_err(|e| error(e.to_string()))?;
        Ok(Self(num.to_be_bytes()))
    }
}

impl Serialize for BlockSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for BlockSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        hex_str.parse().map_err(serde::de::Error::custom)
    }
}

impl Distribution<BlockSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> BlockSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        BlockSeed(seed)
    }
}

impl Default for BlockBag {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockBag {
    /// Creates a bag with a random seed.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(rand::rng().random())
    }

    #[must_use]
    pub fn with_seed(seed: BlockSeed) -> Self {
        let mut this = Self {
            rng: Pcg32::from_seed(seed.0),
            bag: VecDeque::with_capacity(BlockKind::LEN * 2),
        };
        this.fill_bag();
        this
    }

    /// Keeps at least one full bag queued so the next kind is always known.
    fn fill_bag(&mut self) {
        while self.bag.len() <= BlockKind::LEN {
            let mut new_bag = BlockKind::ALL;
            new_bag.shuffle(&mut self.rng);
            self.bag.extend(new_bag);
        }
    }

    /// Draws the next kind.
    ///
    /// # Panics
    ///
    /// Never in practice; the bag is refilled before every draw.
    pub fn pop_next(&mut self) -> BlockKind {
        self.fill_bag();
        self.bag
            .pop_front()
            .expect("block bag should never be empty")
    }

    /// Upcoming kinds in draw order.
    pub fn next_kinds(&self) -> impl Iterator<Item = BlockKind> + '_ {
        self.bag.iter().copied()
    }

    /// Picks which of a block's four cells becomes the item cell.
    pub fn pick_item_cell(&mut self) -> u8 {
        self.rng.random_range(0..4)
    }
}
