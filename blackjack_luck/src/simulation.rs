pub mod deck;
pub mod hand;

use crate::{BlackjackError, Decision, PlayMode, Result};
use blackjack_luck_macros::allowed_phase;
use strum_macros::EnumIter;

use self::{
    deck::Deck,
    hand::{Hand, Role},
};

static RANK_TO_BLACKJACK_VALUE: [u8; 13] = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 10, 10, 10];
static RANK_TO_SYMBOL: [&str; 13] = [
    "A", "2", "3", "4", "5", "6", "7", "8", "9", "10", "J", "Q", "K",
];

/// Both hands are compared against this when deciding busts and naturals.
pub const BLACKJACK: u8 = 21;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum Suit {
    Diamond = 0,
    Heart,
    Spade,
    Club,
}

impl Suit {
    pub fn symbol(&self) -> char {
        match self {
            Suit::Diamond => '♦',
            Suit::Heart => '♥',
            Suit::Spade => '♠',
            Suit::Club => '♣',
        }
    }
}

/// Represents a card in the real world with a suit and a rank. Rank 1 is the
/// ace, 11 to 13 are J, Q and K. A `Card` always holds a valid rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Card {
    rank: u8,
    suit: Suit,
}

impl Card {
    pub fn new(rank: u8, suit: Suit) -> Result<Card> {
        if !(1..=13).contains(&rank) {
            return Err(BlackjackError::InvalidRank(rank));
        }
        Ok(Card { rank, suit })
    }

    pub fn rank(&self) -> u8 {
        self.rank
    }

    pub fn suit(&self) -> Suit {
        self.suit
    }

    /// Face cards count 10 and the ace counts 1. Whether an ace is worth 11
    /// is decided by the hand, not by the card.
    pub fn point_value(&self) -> u8 {
        RANK_TO_BLACKJACK_VALUE[(self.rank - 1) as usize]
    }

    pub fn is_ace(&self) -> bool {
        self.rank == 1
    }

    /// Position of this card inside one ordered 52-card set.
    pub(crate) fn index(&self) -> usize {
        self.suit as usize * 13 + self.rank as usize - 1
    }
}

impl TryFrom<(u8, Suit)> for Card {
    type Error = BlackjackError;

    fn try_from((rank, suit): (u8, Suit)) -> Result<Self> {
        Card::new(rank, suit)
    }
}

impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}{}",
            self.suit.symbol(),
            RANK_TO_SYMBOL[(self.rank - 1) as usize]
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    Dealing,
    DealerDraws,
    GamblerDraws,
    Resolved,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundOutcome {
    DealerWin,
    GamblerWin,
    Push,
}

/// The result of a round as the gambler sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Win,
    Lose,
    Push,
}

impl From<RoundOutcome> for Verdict {
    fn from(outcome: RoundOutcome) -> Self {
        match outcome {
            RoundOutcome::GamblerWin => Verdict::Win,
            RoundOutcome::DealerWin => Verdict::Lose,
            RoundOutcome::Push => Verdict::Push,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settlement {
    pub verdict: Verdict,
    /// What the gambler's bankroll changes by. A natural pays even money.
    pub stake_delta: i64,
}

/// A snapshot of both hands handed to the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundView {
    pub dealer_cards: Vec<Card>,
    pub gambler_cards: Vec<Card>,
    pub dealer_score: u8,
    pub gambler_score: u8,
    pub stake: u32,
}

/// Decides the winner of a finished round. Busts are checked gambler first, so
/// a gambler bust loses even when the dealer busts too.
pub fn determine_outcome(dealer: &Hand, gambler: &Hand) -> RoundOutcome {
    let dealer_score = dealer.current_point();
    let gambler_score = gambler.current_point();

    if gambler_score > BLACKJACK {
        RoundOutcome::DealerWin
    } else if dealer_score > BLACKJACK {
        RoundOutcome::GamblerWin
    } else if gambler_score == BLACKJACK && dealer_score == BLACKJACK {
        if dealer.number_of_cards() == 2 && gambler.number_of_cards() > 2 {
            RoundOutcome::DealerWin
        } else if gambler.number_of_cards() == 2 && dealer.number_of_cards() > 2 {
            RoundOutcome::GamblerWin
        } else {
            RoundOutcome::Push
        }
    } else if dealer_score > gambler_score {
        RoundOutcome::DealerWin
    } else if dealer_score == gambler_score {
        RoundOutcome::Push
    } else {
        RoundOutcome::GamblerWin
    }
}

/// Settles a finished round for the given stake.
pub fn resolve(dealer: &Hand, gambler: &Hand, stake: u32) -> Result<Settlement> {
    if stake == 0 {
        return Err(BlackjackError::InvalidStake(stake));
    }
    let verdict: Verdict = determine_outcome(dealer, gambler).into();
    let stake_delta = match verdict {
        Verdict::Win => stake as i64,
        Verdict::Lose => -(stake as i64),
        Verdict::Push => 0,
    };
    Ok(Settlement {
        verdict,
        stake_delta,
    })
}

/// Starts a round on the given deck and plays it as far as the mode allows.
/// `Auto` returns a resolved session, `Interactive` returns one paused in
/// `GamblerDraws` that the caller keeps and drives with hit/stand.
pub fn play_round(mode: PlayMode, stake: u32, deck: Deck) -> Result<GameSession> {
    let mut session = GameSession::new(deck, stake)?;
    session.deal_initial_cards()?;
    session.dealer_plays()?;
    if mode == PlayMode::Auto {
        session.gambler_plays_automatically()?;
    }
    Ok(session)
}

/// One dealer, one gambler and the deck they share for a single round.
///
/// The session is a plain value: an interactive front end stores it between
/// user events and calls back into it, and the deck cursor and both hands
/// resume exactly where they were left.
#[derive(Debug, Clone)]
pub struct GameSession {
    current_game_phase: GamePhase,
    deck: Deck,
    dealer_hand: Hand,
    gambler_hand: Hand,
}

impl GameSession {
    /// Creates a session in `Dealing` phase. The deck is used as given, so a
    /// caller that wants a fresh order must shuffle it first.
    pub fn new(deck: Deck, stake: u32) -> Result<Self> {
        if stake == 0 {
            return Err(BlackjackError::InvalidStake(stake));
        }
        Ok(GameSession {
            current_game_phase: GamePhase::Dealing,
            deck,
            dealer_hand: Hand::dealer(),
            gambler_hand: Hand::gambler(stake),
        })
    }

    /// Can be called at Dealing phase.
    /// Deals two cards each, alternating gambler then dealer.
    #[allowed_phase(Dealing)]
    pub fn deal_initial_cards(&mut self) -> Result<()> {
        for _ in 0..2 {
            let card = self.deck.deal_card()?;
            self.gambler_hand.receive_card(card);
            let card = self.deck.deal_card()?;
            self.dealer_hand.receive_card(card);
        }
        log::debug!(
            "dealt gambler [{}] dealer [{}]",
            format_cards(self.gambler_hand.cards()),
            format_cards(self.dealer_hand.cards())
        );
        self.current_game_phase = GamePhase::DealerDraws;
        Ok(())
    }

    /// Can be called at DealerDraws phase.
    /// The dealer draws by the dealer policy. Returns the final dealer score.
    #[allowed_phase(DealerDraws)]
    pub fn dealer_plays(&mut self) -> Result<u8> {
        let up_card = self.dealer_up_card();
        while Role::Dealer.decide(&self.dealer_hand, up_card) == Decision::Hit {
            let card = self.deck.deal_card()?;
            self.dealer_hand.receive_card(card);
        }
        let score = self.dealer_hand.current_point();
        log::debug!("dealer stands at {}", score);
        self.current_game_phase = GamePhase::GamblerDraws;
        Ok(score)
    }

    /// Can be called at GamblerDraws phase.
    /// The gambler takes one card. A bust resolves the round. Returns the
    /// gambler's score after the card.
    #[allowed_phase(GamblerDraws)]
    pub fn gambler_hit(&mut self) -> Result<u8> {
        let card = self.deck.deal_card()?;
        self.gambler_hand.receive_card(card);
        let score = self.gambler_hand.current_point();
        log::debug!("gambler hits {} for {}", card, score);
        if self.gambler_hand.is_bust() {
            self.finish_round();
        }
        Ok(score)
    }

    /// Can be called at GamblerDraws phase.
    /// Returns the gambler's final score.
    #[allowed_phase(GamblerDraws)]
    pub fn gambler_stand(&mut self) -> Result<u8> {
        self.finish_round();
        Ok(self.gambler_hand.current_point())
    }

    /// Can be called at GamblerDraws phase.
    /// The gambler draws by the up-card driven policy until it says stand.
    #[allowed_phase(GamblerDraws)]
    pub fn gambler_plays_automatically(&mut self) -> Result<u8> {
        let up_card = self.dealer_up_card();
        while Role::Gambler.decide(&self.gambler_hand, up_card) == Decision::Hit {
            let card = self.deck.deal_card()?;
            self.gambler_hand.receive_card(card);
        }
        self.finish_round();
        Ok(self.gambler_hand.current_point())
    }

    /// Can be called at Resolved phase.
    #[allowed_phase(Resolved)]
    pub fn settle(&self) -> Result<Settlement> {
        resolve(
            &self.dealer_hand,
            &self.gambler_hand,
            self.gambler_hand.stake(),
        )
    }

    /// The winner, once the round is resolved.
    pub fn outcome(&self) -> Option<RoundOutcome> {
        match self.current_game_phase {
            GamePhase::Resolved => Some(determine_outcome(&self.dealer_hand, &self.gambler_hand)),
            _ => None,
        }
    }

    pub fn view(&self) -> RoundView {
        RoundView {
            dealer_cards: self.dealer_hand.cards().to_vec(),
            gambler_cards: self.gambler_hand.cards().to_vec(),
            dealer_score: self.dealer_hand.current_point(),
            gambler_score: self.gambler_hand.current_point(),
            stake: self.gambler_hand.stake(),
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.current_game_phase
    }

    pub fn dealer_hand(&self) -> &Hand {
        &self.dealer_hand
    }

    pub fn gambler_hand(&self) -> &Hand {
        &self.gambler_hand
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    /// Gives the deck back for the next round. A resolved session has already
    /// reshuffled it.
    pub fn into_deck(self) -> Deck {
        self.deck
    }

    /// The dealer's first card, the only one the gambler is allowed to see.
    /// Only meaningful once the initial cards are dealt.
    fn dealer_up_card(&self) -> Card {
        self.dealer_hand.cards()[0]
    }

    fn finish_round(&mut self) {
        self.current_game_phase = GamePhase::Resolved;
        self.deck.shuffle();
        log::debug!(
            "round resolved dealer {} gambler {}",
            self.dealer_hand.current_point(),
            self.gambler_hand.current_point()
        );
    }
}

pub fn format_cards(cards: &[Card]) -> String {
    cards
        .iter()
        .map(|card| card.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stacked_deck(firsts: &[Card]) -> Deck {
        let mut deck = Deck::with_seed(1, 7).unwrap();
        deck.shuffle_with_firsts(firsts).unwrap();
        deck
    }

    fn hand_of(role: Role, cards: &[Card]) -> Hand {
        let mut hand = match role {
            Role::Dealer => Hand::dealer(),
            Role::Gambler => Hand::gambler(10),
        };
        for card in cards {
            hand.receive_card(*card);
        }
        hand
    }

    fn c(rank: u8, suit: Suit) -> Card {
        Card::new(rank, suit).unwrap()
    }

    #[test]
    fn ranks_outside_ace_to_king_are_rejected() {
        assert_eq!(
            Card::new(0, Suit::Spade),
            Err(BlackjackError::InvalidRank(0))
        );
        assert_eq!(
            Card::new(14, Suit::Spade),
            Err(BlackjackError::InvalidRank(14))
        );
        assert_eq!(
            Card::try_from((13, Suit::Club)),
            Ok(c(13, Suit::Club))
        );
        assert!(Card::try_from((200, Suit::Club)).is_err());
        assert_eq!(c(12, Suit::Heart).rank(), 12);
        assert_eq!(c(12, Suit::Heart).suit(), Suit::Heart);
    }

    #[test]
    fn point_values_cap_at_ten() {
        assert_eq!(c(1, Suit::Heart).point_value(), 1);
        assert_eq!(c(7, Suit::Heart).point_value(), 7);
        assert_eq!(c(10, Suit::Heart).point_value(), 10);
        assert_eq!(c(11, Suit::Heart).point_value(), 10);
        assert_eq!(c(13, Suit::Heart).point_value(), 10);
    }

    #[test]
    fn cards_display_with_suit_symbol() {
        assert_eq!(c(1, Suit::Heart).to_string(), "♥A");
        assert_eq!(c(10, Suit::Club).to_string(), "♣10");
        assert_eq!(c(13, Suit::Diamond).to_string(), "♦K");
    }

    #[test]
    fn naturals_on_both_sides_push() {
        let dealer = hand_of(Role::Dealer, &[c(1, Suit::Spade), c(13, Suit::Heart)]);
        let gambler = hand_of(Role::Gambler, &[c(1, Suit::Club), c(13, Suit::Club)]);
        assert_eq!(determine_outcome(&dealer, &gambler), RoundOutcome::Push);
    }

    #[test]
    fn dealer_natural_beats_drawn_twenty_one() {
        let dealer = hand_of(Role::Dealer, &[c(1, Suit::Spade), c(13, Suit::Heart)]);
        let gambler = hand_of(
            Role::Gambler,
            &[c(5, Suit::Club), c(6, Suit::Club), c(10, Suit::Club)],
        );
        assert_eq!(gambler.current_point(), 21);
        assert_eq!(determine_outcome(&dealer, &gambler), RoundOutcome::DealerWin);
    }

    #[test]
    fn gambler_natural_beats_drawn_twenty_one() {
        let dealer = hand_of(
            Role::Dealer,
            &[c(9, Suit::Spade), c(2, Suit::Heart), c(10, Suit::Heart)],
        );
        let gambler = hand_of(Role::Gambler, &[c(1, Suit::Club), c(12, Suit::Club)]);
        assert_eq!(determine_outcome(&dealer, &gambler), RoundOutcome::GamblerWin);
    }

    #[test]
    fn drawn_twenty_ones_push() {
        let dealer = hand_of(
            Role::Dealer,
            &[c(9, Suit::Spade), c(2, Suit::Heart), c(10, Suit::Heart)],
        );
        let gambler = hand_of(
            Role::Gambler,
            &[c(7, Suit::Club), c(7, Suit::Heart), c(7, Suit::Diamond)],
        );
        assert_eq!(determine_outcome(&dealer, &gambler), RoundOutcome::Push);
    }

    #[test]
    fn gambler_bust_loses_even_if_dealer_busts() {
        let dealer = hand_of(
            Role::Dealer,
            &[c(10, Suit::Spade), c(6, Suit::Heart), c(9, Suit::Heart)],
        );
        let gambler = hand_of(
            Role::Gambler,
            &[c(10, Suit::Club), c(2, Suit::Heart), c(12, Suit::Diamond)],
        );
        assert_eq!(determine_outcome(&dealer, &gambler), RoundOutcome::DealerWin);
    }

    #[test]
    fn dealer_bust_pays_gambler() {
        let dealer = hand_of(
            Role::Dealer,
            &[c(10, Suit::Spade), c(6, Suit::Heart), c(9, Suit::Heart)],
        );
        let gambler = hand_of(Role::Gambler, &[c(10, Suit::Club), c(2, Suit::Heart)]);
        assert_eq!(determine_outcome(&dealer, &gambler), RoundOutcome::GamblerWin);
    }

    #[test]
    fn equal_totals_push_and_higher_total_wins() {
        let dealer = hand_of(Role::Dealer, &[c(10, Suit::Spade), c(8, Suit::Heart)]);
        let gambler = hand_of(Role::Gambler, &[c(9, Suit::Club), c(9, Suit::Heart)]);
        assert_eq!(determine_outcome(&dealer, &gambler), RoundOutcome::Push);

        let gambler = hand_of(Role::Gambler, &[c(10, Suit::Club), c(9, Suit::Heart)]);
        assert_eq!(determine_outcome(&dealer, &gambler), RoundOutcome::GamblerWin);

        let gambler = hand_of(Role::Gambler, &[c(10, Suit::Club), c(7, Suit::Heart)]);
        assert_eq!(determine_outcome(&dealer, &gambler), RoundOutcome::DealerWin);
    }

    #[test]
    fn resolve_moves_stake() {
        let dealer = hand_of(Role::Dealer, &[c(10, Suit::Spade), c(8, Suit::Heart)]);
        let gambler = hand_of(Role::Gambler, &[c(10, Suit::Club), c(9, Suit::Heart)]);
        let settlement = resolve(&dealer, &gambler, 25).unwrap();
        assert_eq!(settlement.verdict, Verdict::Win);
        assert_eq!(settlement.stake_delta, 25);

        let settlement = resolve(&gambler, &dealer, 25).unwrap();
        assert_eq!(settlement.verdict, Verdict::Lose);
        assert_eq!(settlement.stake_delta, -25);
    }

    #[test]
    fn resolve_rejects_zero_stake() {
        let dealer = hand_of(Role::Dealer, &[c(10, Suit::Spade), c(8, Suit::Heart)]);
        let gambler = hand_of(Role::Gambler, &[c(10, Suit::Club), c(9, Suit::Heart)]);
        assert_eq!(
            resolve(&dealer, &gambler, 0),
            Err(BlackjackError::InvalidStake(0))
        );
    }

    #[test]
    fn session_rejects_zero_stake() {
        let deck = Deck::with_seed(1, 1).unwrap();
        assert!(matches!(
            GameSession::new(deck, 0),
            Err(BlackjackError::InvalidStake(0))
        ));
    }

    #[test]
    fn dealer_twenty_one_beats_gambler_twenty() {
        // Deal order is gambler, dealer, gambler, dealer, then dealer draws.
        let deck = stacked_deck(&[
            c(1, Suit::Heart),
            c(13, Suit::Diamond),
            c(9, Suit::Club),
            c(6, Suit::Spade),
            c(5, Suit::Club),
        ]);
        let session = play_round(PlayMode::Auto, 10, deck).unwrap();
        let view = session.view();
        assert_eq!(
            view.dealer_cards,
            vec![c(13, Suit::Diamond), c(6, Suit::Spade), c(5, Suit::Club)]
        );
        assert_eq!(view.gambler_cards, vec![c(1, Suit::Heart), c(9, Suit::Club)]);
        assert_eq!(view.dealer_score, 21);
        assert_eq!(view.gambler_score, 20);
        assert_eq!(session.outcome(), Some(RoundOutcome::DealerWin));
        assert_eq!(
            session.settle().unwrap(),
            Settlement {
                verdict: Verdict::Lose,
                stake_delta: -10
            }
        );
    }

    #[test]
    fn gambler_stands_at_twelve_against_small_up_card() {
        let deck = stacked_deck(&[
            c(10, Suit::Heart),
            c(5, Suit::Diamond),
            c(2, Suit::Club),
            c(10, Suit::Spade),
            c(3, Suit::Club),
            c(9, Suit::Club),
        ]);
        let session = play_round(PlayMode::Auto, 10, deck).unwrap();
        // Dealer 15 draws a 3 to 18. Gambler has 12 against an up-card of 5 and stands.
        assert_eq!(session.dealer_hand().current_point(), 18);
        assert_eq!(session.gambler_hand().number_of_cards(), 2);
        assert_eq!(session.outcome(), Some(RoundOutcome::DealerWin));
    }

    #[test]
    fn gambler_draws_to_seventeen_against_large_up_card() {
        let deck = stacked_deck(&[
            c(10, Suit::Heart),
            c(9, Suit::Diamond),
            c(2, Suit::Club),
            c(9, Suit::Spade),
            c(3, Suit::Club),
            c(4, Suit::Club),
        ]);
        let session = play_round(PlayMode::Auto, 10, deck).unwrap();
        // Dealer stands on 18. Gambler 12 draws 3 then 4 to reach 19.
        assert_eq!(session.dealer_hand().number_of_cards(), 2);
        assert_eq!(session.gambler_hand().current_point(), 19);
        assert_eq!(session.outcome(), Some(RoundOutcome::GamblerWin));
    }

    #[test]
    fn interactive_round_pauses_for_the_gambler() {
        let deck = stacked_deck(&[
            c(10, Suit::Heart),
            c(10, Suit::Diamond),
            c(4, Suit::Club),
            c(8, Suit::Spade),
            c(5, Suit::Club),
            c(9, Suit::Club),
        ]);
        let mut session = play_round(PlayMode::Interactive, 10, deck).unwrap();
        assert_eq!(session.phase(), GamePhase::GamblerDraws);
        assert_eq!(session.outcome(), None);
        assert_eq!(session.deck().remaining(), 52 - 4);

        let stored = session.clone();
        assert_eq!(session.gambler_hit().unwrap(), 19);
        assert_eq!(session.phase(), GamePhase::GamblerDraws);
        assert_eq!(session.gambler_stand().unwrap(), 19);
        assert_eq!(session.phase(), GamePhase::Resolved);
        assert_eq!(session.outcome(), Some(RoundOutcome::GamblerWin));

        // The stored copy resumes from the same cursor.
        let mut resumed = stored;
        assert_eq!(resumed.gambler_hit().unwrap(), 19);
    }

    #[test]
    fn interactive_bust_resolves_the_round() {
        let deck = stacked_deck(&[
            c(10, Suit::Heart),
            c(10, Suit::Diamond),
            c(6, Suit::Club),
            c(8, Suit::Spade),
            c(12, Suit::Club),
        ]);
        let mut session = play_round(PlayMode::Interactive, 10, deck).unwrap();
        assert_eq!(session.gambler_hit().unwrap(), 26);
        assert_eq!(session.phase(), GamePhase::Resolved);
        assert_eq!(session.outcome(), Some(RoundOutcome::DealerWin));
        assert!(matches!(
            session.gambler_hit(),
            Err(BlackjackError::WrongPhase {
                operation: "gambler_hit",
                expected: GamePhase::GamblerDraws,
                actual: GamePhase::Resolved,
            })
        ));
    }

    #[test]
    fn calls_out_of_order_are_rejected() {
        let deck = Deck::with_seed(1, 3).unwrap();
        let mut session = GameSession::new(deck, 10).unwrap();
        assert!(session.dealer_plays().is_err());
        assert!(session.gambler_stand().is_err());
        assert!(session.settle().is_err());
        session.deal_initial_cards().unwrap();
        assert!(session.deal_initial_cards().is_err());
        assert_eq!(session.phase(), GamePhase::DealerDraws);
    }

    #[test]
    fn resolved_session_hands_back_a_full_deck() {
        let deck = Deck::with_seed(2, 11).unwrap();
        let session = play_round(PlayMode::Auto, 10, deck).unwrap();
        let deck = session.into_deck();
        assert_eq!(deck.remaining(), 104);
    }
}
