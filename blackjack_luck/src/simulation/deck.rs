use crate::{BlackjackError, Result};

use super::{Card, Suit};

use strum::IntoEnumIterator;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Several 52-card sets shuffled together and dealt from the front.
///
/// The deck owns its random number generator, so two decks built from the same
/// seed deal the same cards in the same order.
#[derive(Debug, Clone)]
pub struct Deck {
    number_of_decks: u8,
    cards: Vec<Card>,
    current_index: usize,
    rng: StdRng,
}

impl Deck {
    /// Creates a new deck with ordered cards: suit by suit, ace to king, one
    /// 52-card set after another.
    pub fn new(number_of_decks: u8, rng: StdRng) -> Result<Deck> {
        if number_of_decks == 0 {
            return Err(BlackjackError::InvalidDeckCount(number_of_decks));
        }
        let mut cards = Vec::with_capacity(number_of_decks as usize * 52);
        for _ in 0..number_of_decks {
            for suit in Suit::iter() {
                for rank in 1..=13 {
                    cards.push(Card { rank, suit });
                }
            }
        }
        Ok(Deck {
            number_of_decks,
            cards,
            current_index: 0,
            rng,
        })
    }

    /// Creates a shuffled deck whose order is fully determined by `seed`.
    pub fn with_seed(number_of_decks: u8, seed: u64) -> Result<Deck> {
        let mut deck = Deck::new(number_of_decks, StdRng::seed_from_u64(seed))?;
        deck.shuffle();
        Ok(deck)
    }

    /// Creates a shuffled deck seeded from the operating system.
    pub fn from_entropy(number_of_decks: u8) -> Result<Deck> {
        let mut deck = Deck::new(number_of_decks, StdRng::from_entropy())?;
        deck.shuffle();
        Ok(deck)
    }

    /// Returns the dealt cards back into the deck and shuffles.
    pub fn shuffle(&mut self) {
        self.cards.shuffle(&mut self.rng);
        self.current_index = 0;
    }

    /// Returns the dealt cards back into the deck, and shuffles. This method makes
    /// sure the given cards will be dealt first, in the given order.
    pub fn shuffle_with_firsts(&mut self, firsts: &[Card]) -> Result<()> {
        let mut counts = [self.number_of_decks; 52];
        for card in firsts {
            if counts[card.index()] == 0 {
                return Err(BlackjackError::CardUnavailable(*card));
            }
            counts[card.index()] -= 1;
        }

        let mut idx = 0;
        for card in firsts {
            self.cards[idx] = *card;
            idx += 1;
        }
        for suit in Suit::iter() {
            for rank in 1..=13 {
                let card = Card { rank, suit };
                for _ in 0..counts[card.index()] {
                    self.cards[idx] = card;
                    idx += 1;
                }
            }
        }

        self.cards[firsts.len()..].shuffle(&mut self.rng);
        self.current_index = 0;
        Ok(())
    }

    /// Deals the next card. Fails once every card has been dealt; the deck is
    /// never silently reshuffled.
    pub fn deal_card(&mut self) -> Result<Card> {
        match self.cards.get(self.current_index) {
            Some(card) => {
                self.current_index += 1;
                Ok(*card)
            }
            None => Err(BlackjackError::DeckExhausted {
                dealt: self.current_index,
            }),
        }
    }

    pub fn remaining(&self) -> usize {
        self.cards.len() - self.current_index
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    pub fn number_of_decks(&self) -> u8 {
        self.number_of_decks
    }
}
