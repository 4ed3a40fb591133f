mod error;
pub mod simulation;
pub mod statistics;

pub use error::{BlackjackError, Result};
use serde_enum_str::{Deserialize_enum_str, Serialize_enum_str};

/// The number of 52-card sets in a freshly built deck.
pub const DEFAULT_NUMBER_OF_DECKS: u8 = 4;
/// Size of the simulation used to estimate the gambler's long-run win probability.
pub const DEFAULT_REFERENCE_ROUNDS: u64 = 10000;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rule {
    pub number_of_decks: u8,
}

impl Default for Rule {
    fn default() -> Self {
        Rule {
            number_of_decks: DEFAULT_NUMBER_OF_DECKS,
        }
    }
}

/// How the gambler's side of a round is driven.
#[derive(Debug, Clone, Copy, PartialEq, Serialize_enum_str, Deserialize_enum_str)]
pub enum PlayMode {
    /// The gambler follows the built-in draw policy until the round resolves.
    Auto,
    /// The round pauses after the dealer has drawn and waits for hit/stand calls.
    Interactive,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decision {
    Hit,
    Stand,
}
