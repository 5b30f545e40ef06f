use std::{fmt, str::FromStr};

use arrayvec::ArrayVec;
use rand::{
    Rng,
    distr::{Distribution, StandardUniform},
};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{
    SpawnConfigError,
    core::{PieceId, PieceInstance, ShapeKind},
};

/// Largest number of pieces a single offer may contain.
pub const MAX_OFFER_SIZE: usize = 3;

/// Seed for a deterministic session.
///
/// A 128-bit value that initializes the session's random number generator. The same
/// seed and configuration reproduce the same noise cells and the same offers, which
/// makes sessions replayable and tests deterministic.
///
/// Serialized as 32 lowercase hex digits.
///
/// # Example
///
/// ```
/// use blockfit_engine::SessionSeed;
/// use rand::Rng as _;
///
/// let seed: SessionSeed = rand::rng().random();
/// let parsed: SessionSeed = seed.to_string().parse().unwrap();
/// assert_eq!(seed, parsed);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionSeed([u8; 16]);

impl SessionSeed {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub const fn from_u128(value: u128) -> Self {
        Self(value.to_be_bytes())
    }

    #[must_use]
    pub const fn to_bytes(self) -> [u8; 16] {
        self.0
    }
}

impl fmt::Display for SessionSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", u128::from_be_bytes(self.0))
    }
}

/// Error returned when parsing a [`SessionSeed`] from text.
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("invalid seed {input:?}: expected 32 hex digits")]
pub struct ParseSeedError {
    input: String,
}

impl FromStr for SessionSeed {
    type Err = ParseSeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let error = || ParseSeedError {
            input: s.to_owned(),
        };
        if s.len() != 32 {
            return Err(error());
        }
        let num = u128::from_str_radix(s, 16).map_err(|_| error())?;
        Ok(Self::from_u128(num))
    }
}

impl Serialize for SessionSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SessionSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        hex_str.parse().map_err(serde::de::Error::custom)
    }
}

/// Allows generating random seeds with `rng.random()`.
impl Distribution<SessionSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> SessionSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        SessionSeed(seed)
    }
}

/// Piece generation policy.
///
/// Each offered piece draws one uniform value `x` in `[0, 1)`:
///
/// - `x < bomb_chance`: a single-cell bomb
/// - `x < bomb_chance + star_chance`: a single-cell star
/// - otherwise: a normal piece drawn uniformly from the catalog
///
/// Setting both chances to zero gives the classic, special-free game.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SpawnConfig {
    pub bomb_chance: f64,
    pub star_chance: f64,
    /// Number of pieces offered each time the dock empties.
    pub offer_size: usize,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            bomb_chance: 0.10,
            star_chance: 0.10,
            offer_size: 1,
        }
    }
}

impl SpawnConfig {
    /// Configuration without bombs or stars.
    pub const CLASSIC: Self = Self {
        bomb_chance: 0.0,
        star_chance: 0.0,
        offer_size: 1,
    };

    pub fn validate(&self) -> Result<(), SpawnConfigError> {
        let in_range = |p: f64| (0.0..=1.0).contains(&p);
        if !in_range(self.bomb_chance) || !in_range(self.star_chance) {
            return Err(SpawnConfigError::ChanceOutOfRange);
        }
        if self.bomb_chance + self.star_chance > 1.0 {
            return Err(SpawnConfigError::ChancesExceedOne);
        }
        if !(1..=MAX_OFFER_SIZE).contains(&self.offer_size) {
            return Err(SpawnConfigError::InvalidOfferSize {
                offer_size: self.offer_size,
            });
        }
        Ok(())
    }

    /// Draws a single piece according to this policy.
    pub fn spawn_piece<R>(&self, id: PieceId, rng: &mut R) -> PieceInstance
    where
        R: Rng + ?Sized,
    {
        let x: f64 = rng.random();
        if x < self.bomb_chance {
            PieceInstance::bomb(id)
        } else if x < self.bomb_chance + self.star_chance {
            PieceInstance::star(id)
        } else {
            PieceInstance::normal(id, rng.random::<ShapeKind>())
        }
    }
}

/// The pieces currently offered to the player.
///
/// Pieces are consumed individually; a new offer is spawned only once every offered
/// piece has been placed. Piece ids increase monotonically over the dock's lifetime.
#[derive(Debug, Clone)]
pub struct Dock {
    config: SpawnConfig,
    pieces: ArrayVec<PieceInstance, MAX_OFFER_SIZE>,
    next_id: u32,
}

impl Dock {
    /// Creates an empty dock.
    #[must_use]
    pub fn new(config: SpawnConfig) -> Self {
        Self {
            config,
            pieces: ArrayVec::new(),
            next_id: 0,
        }
    }

    #[must_use]
    pub const fn config(&self) -> &SpawnConfig {
        &self.config
    }

    /// The offered pieces, in offer order.
    #[must_use]
    pub fn pieces(&self) -> &[PieceInstance] {
        &self.pieces
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: PieceId) -> Option<&PieceInstance> {
        self.pieces.iter().find(|piece| piece.id() == id)
    }

    /// Removes and returns the piece with the given id.
    pub fn take(&mut self, id: PieceId) -> Option<PieceInstance> {
        let index = self.pieces.iter().position(|piece| piece.id() == id)?;
        Some(self.pieces.remove(index))
    }

    /// Creates a dock already offering `pieces`.
    #[cfg(test)]
    pub(crate) fn with_pieces(config: SpawnConfig, pieces: &[PieceInstance]) -> Self {
        let next_id = pieces.iter().map(|piece| piece.id().0 + 1).max().unwrap_or(0);
        Self {
            config,
            pieces: pieces.iter().copied().collect(),
            next_id,
        }
    }

    /// Fills the dock with a new offer and returns it.
    ///
    /// Any pieces still offered are discarded first.
    pub fn spawn_offer<R>(&mut self, rng: &mut R) -> &[PieceInstance]
    where
        R: Rng + ?Sized,
    {
        self.pieces.clear();
        for _ in 0..self.config.offer_size.min(MAX_OFFER_SIZE) {
            let id = PieceId(self.next_id);
            self.next_id += 1;
            self.pieces.push(self.config.spawn_piece(id, rng));
        }
        &self.pieces
    }
}
