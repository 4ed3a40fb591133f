use thiserror::Error;

use crate::simulation::{Card, GamePhase};

/// Everything the core can report to its caller. Busts, pushes and naturals are
/// ordinary round outcomes and never show up here.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BlackjackError {
    /// Drawing past the last card.
    #[error("deck exhausted after {dealt} cards")]
    DeckExhausted { dealt: usize },
    #[error("card rank must be between 1 and 13, got {0}")]
    InvalidRank(u8),
    #[error("stake must be positive, got {0}")]
    InvalidStake(u32),
    #[error("number of rounds must be positive, got {0}")]
    InvalidRoundCount(u64),
    #[error("number of decks must be positive, got {0}")]
    InvalidDeckCount(u8),
    #[error("win probability must lie in [0, 1], got {0}")]
    InvalidProbability(f64),
    #[error("card {0} is not available in the deck")]
    CardUnavailable(Card),
    #[error("{operation} is only allowed in {expected:?} phase, current phase is {actual:?}")]
    WrongPhase {
        operation: &'static str,
        expected: GamePhase,
        actual: GamePhase,
    },
}

pub type Result<T> = std::result::Result<T, BlackjackError>;
