use crate::Decision;

use super::{Card, BLACKJACK};

/// The dealer keeps drawing below this total.
pub const DEALER_STANDS_AT: u8 = 17;

/// Lowest and highest running total at which a newly drawn ace is counted as 11.
const ACE_HEADROOM: std::ops::RangeInclusive<u8> = 4..=10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Dealer,
    Gambler,
}

impl Role {
    /// The draw policy of this role. The dealer ignores the up-card; the
    /// gambler plays a basic-strategy approximation keyed on it.
    pub fn decide(self, hand: &Hand, dealer_up_card: Card) -> Decision {
        let stand_at = match self {
            Role::Dealer => DEALER_STANDS_AT,
            Role::Gambler => gambler_stands_at(dealer_up_card),
        };
        if hand.current_point() < stand_at {
            Decision::Hit
        } else {
            Decision::Stand
        }
    }
}

/// Against a 2 to 6 the dealer is likely to bust, so the gambler stops early.
pub fn gambler_stands_at(dealer_up_card: Card) -> u8 {
    if (2..=6).contains(&dealer_up_card.rank()) {
        12
    } else {
        17
    }
}

/// Running total of a hand together with the number of aces currently counted
/// as 11.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Score {
    pub total: u8,
    pub soft_aces: u8,
}

impl Score {
    /// Scores the first two cards (or fewer). A single ace among them is
    /// promoted to 11. A pair of aces is always 12, one soft and one hard.
    pub fn from_first_two(cards: &[Card]) -> Score {
        let first_two = &cards[..cards.len().min(2)];
        let aces = first_two.iter().filter(|card| card.is_ace()).count();
        let sum: u8 = first_two.iter().map(Card::point_value).sum();
        match aces {
            0 => Score {
                total: sum,
                soft_aces: 0,
            },
            1 => Score {
                total: sum + 10,
                soft_aces: 1,
            },
            _ => Score {
                total: 12,
                soft_aces: 1,
            },
        }
    }

    /// Folds one more card into the total. An ace is promoted to 11 only while
    /// the total sits in 4..=10. Otherwise the card adds its point value and a
    /// soft ace is demoted if that busts the hand.
    pub fn add_card(self, card: Card) -> Score {
        let Score {
            mut total,
            mut soft_aces,
        } = self;
        if ACE_HEADROOM.contains(&total) && card.is_ace() {
            total += 11;
            soft_aces += 1;
        } else {
            total += card.point_value();
            if total > BLACKJACK && soft_aces > 0 {
                total -= 10;
                soft_aces -= 1;
            }
        }
        Score { total, soft_aces }
    }
}

/// The cards of one side of the table. Cards are only ever appended during a
/// round, and the order they arrived in is the order they are scored in.
#[derive(Debug, Clone)]
pub struct Hand {
    role: Role,
    cards: Vec<Card>,
    stake: u32,
}

impl Hand {
    pub fn dealer() -> Hand {
        Hand {
            role: Role::Dealer,
            cards: Vec::with_capacity(4),
            stake: 0,
        }
    }

    pub fn gambler(stake: u32) -> Hand {
        Hand {
            role: Role::Gambler,
            cards: Vec::with_capacity(4),
            stake,
        }
    }

    pub fn receive_card(&mut self, card: Card) {
        self.cards.push(card);
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// The cards ordered by rank, for display only.
    pub fn sorted_cards(&self) -> Vec<Card> {
        let mut cards = self.cards.clone();
        cards.sort_by_key(|card| card.rank());
        cards
    }

    pub fn number_of_cards(&self) -> usize {
        self.cards.len()
    }

    pub fn first_two_point(&self) -> u8 {
        Score::from_first_two(&self.cards).total
    }

    pub fn score(&self) -> Score {
        let first_two = Score::from_first_two(&self.cards);
        self.cards
            .iter()
            .skip(2)
            .fold(first_two, |score, card| score.add_card(*card))
    }

    pub fn current_point(&self) -> u8 {
        self.score().total
    }

    pub fn is_bust(&self) -> bool {
        self.current_point() > BLACKJACK
    }

    pub fn is_natural(&self) -> bool {
        self.cards.len() == 2 && self.current_point() == BLACKJACK
    }

    pub fn role(&self) -> Role {
        self.role
    }

    /// Always 0 for the dealer.
    pub fn stake(&self) -> u32 {
        self.stake
    }
}
