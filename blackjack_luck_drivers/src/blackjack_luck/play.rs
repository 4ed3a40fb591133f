use blackjack_luck::simulation::{
    deck::Deck, format_cards, play_round, GamePhase, GameSession, Settlement, Verdict,
};
use blackjack_luck::{Decision, PlayMode, Rule};
use blackjack_luck_drivers::{Advice, CheatSheet};
use dialoguer::{Confirm, Select};

const HIT_OR_STAND: [&str; 2] = ["Hit (One More Card)", "Stand (Show Result)"];

fn new_deck(rule: &Rule, seed: Option<u64>) -> blackjack_luck::Result<Deck> {
    match seed {
        Some(seed) => Deck::with_seed(rule.number_of_decks, seed),
        None => Deck::from_entropy(rule.number_of_decks),
    }
}

fn result_message(settlement: &Settlement) -> (&'static str, String) {
    let amount = settlement.stake_delta.abs();
    match settlement.verdict {
        Verdict::Win => ("Nice game, you win!", format!("You win ${}", amount)),
        Verdict::Lose => ("Sorry, dealer wins.", format!("You lose ${}", amount)),
        Verdict::Push => (
            "Equal game, play again.",
            String::from("No money win or lose."),
        ),
    }
}

fn print_result(session: &GameSession) -> anyhow::Result<Settlement> {
    let view = session.view();
    let settlement = session.settle()?;
    let (message, money) = result_message(&settlement);
    println!(
        "Dealer's cards: {}. Dealer's final number: {}",
        format_cards(&session.dealer_hand().sorted_cards()),
        view.dealer_score
    );
    println!(
        "Your cards: {}. Your final number: {}",
        format_cards(&session.gambler_hand().sorted_cards()),
        view.gambler_score
    );
    println!("=====Final Result=====");
    println!("{}", message);
    println!("{}", money);
    Ok(settlement)
}

pub fn play_automatically(rule: &Rule, stake: u32, seed: Option<u64>) -> anyhow::Result<()> {
    let deck = new_deck(rule, seed)?;
    let session = play_round(PlayMode::Auto, stake, deck)?;
    print_result(&session)?;
    Ok(())
}

pub fn play_interactively(
    rule: &Rule,
    stake: u32,
    bankroll: i64,
    seed: Option<u64>,
    sheet: &CheatSheet,
) -> anyhow::Result<()> {
    let mut bankroll = bankroll;
    let mut deck = new_deck(rule, seed)?;

    loop {
        if bankroll < stake as i64 {
            println!("Your bankroll of ${} cannot cover a ${} bet.", bankroll, stake);
            return Ok(());
        }
        println!("Bankroll: ${}. Bet: ${}.", bankroll, stake);

        let mut session = play_round(PlayMode::Interactive, stake, deck)?;
        let up_card = session.dealer_hand().cards()[0];
        println!("Dealer's first card: {}", up_card);

        while session.phase() == GamePhase::GamblerDraws {
            let score = session.gambler_hand().current_point();
            println!(
                "Your cards: {}. Your total number: {}",
                format_cards(session.gambler_hand().cards()),
                score
            );
            let advice = sheet.advise(score, up_card);
            if let Some(advice) = advice {
                println!("Cheat-sheet says: {}", advice_name(advice));
            }
            let default = match advice.map(|a| a.as_decision()) {
                Some(Decision::Stand) => 1,
                _ => 0,
            };
            let choice = Select::new()
                .with_prompt("Hit or stand?")
                .items(&HIT_OR_STAND)
                .default(default)
                .interact()?;
            if choice == 0 {
                let score = session.gambler_hit()?;
                if score > 21 {
                    println!(
                        "Your cards: {}. Your total number: {}",
                        format_cards(session.gambler_hand().cards()),
                        score
                    );
                    println!("You bust!");
                }
            } else {
                session.gambler_stand()?;
            }
        }

        let settlement = print_result(&session)?;
        bankroll += settlement.stake_delta;
        log::debug!("bankroll now {}", bankroll);

        let again = Confirm::new()
            .with_prompt("Play another round?")
            .default(true)
            .interact()?;
        if !again {
            println!("You leave the table with ${}.", bankroll);
            return Ok(());
        }
        deck = session.into_deck();
    }
}

fn advice_name(advice: Advice) -> &'static str {
    match advice {
        Advice::Stand => "Stand",
        Advice::Hit => "Hit",
        Advice::Double => "Double Down (played as Hit)",
    }
}
