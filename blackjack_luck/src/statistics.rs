pub mod luck;

use serde::Serialize;

use crate::{
    simulation::{deck::Deck, play_round, GamePhase, RoundOutcome},
    BlackjackError, PlayMode, Result, Rule,
};

pub use luck::{binomial_pmf, luck_percentile, LuckAssessment};

/// Every simulated round is played for this stake. Only the outcome is kept.
const SIMULATION_STAKE: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationConfig {
    pub rounds: u64,
    /// Base seed. Round `i` is dealt from a deck seeded with `seed + i`. When
    /// absent a random base seed is drawn and recorded in the report.
    pub seed: Option<u64>,
    /// 0 means one thread per available core.
    pub number_of_threads: usize,
}

impl SimulationConfig {
    pub fn new(rounds: u64) -> Self {
        SimulationConfig {
            rounds,
            seed: None,
            number_of_threads: 1,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_threads(mut self, number_of_threads: usize) -> Self {
        self.number_of_threads = number_of_threads;
        self
    }
}

/// What happened in one simulated round. Exactly one flag is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SimulationRecord {
    pub round_index: u64,
    pub gambler_won: bool,
    pub dealer_won: bool,
    pub drew: bool,
}

impl SimulationRecord {
    fn new(round_index: u64, outcome: RoundOutcome) -> Self {
        SimulationRecord {
            round_index,
            gambler_won: outcome == RoundOutcome::GamblerWin,
            dealer_won: outcome == RoundOutcome::DealerWin,
            drew: outcome == RoundOutcome::Push,
        }
    }
}

/// Running totals after `round_index` rounds and the rates they imply.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CumulativeRates {
    pub round_index: u64,
    pub gambler_wins: u64,
    pub dealer_wins: u64,
    pub pushes: u64,
    pub gambler_rate: f64,
    pub dealer_rate: f64,
    pub push_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationReport {
    pub base_seed: u64,
    pub records: Vec<SimulationRecord>,
    pub cumulative: Vec<CumulativeRates>,
}

impl SimulationReport {
    /// Folds outcomes, in round order, into per-round records and cumulative rates.
    pub fn from_outcomes(base_seed: u64, outcomes: &[RoundOutcome]) -> Self {
        let mut records = Vec::with_capacity(outcomes.len());
        let mut cumulative = Vec::with_capacity(outcomes.len());
        let (mut gambler_wins, mut dealer_wins, mut pushes) = (0u64, 0u64, 0u64);

        for (i, outcome) in outcomes.iter().enumerate() {
            let round_index = i as u64 + 1;
            let record = SimulationRecord::new(round_index, *outcome);
            gambler_wins += record.gambler_won as u64;
            dealer_wins += record.dealer_won as u64;
            pushes += record.drew as u64;

            let rounds = round_index as f64;
            cumulative.push(CumulativeRates {
                round_index,
                gambler_wins,
                dealer_wins,
                pushes,
                gambler_rate: gambler_wins as f64 / rounds,
                dealer_rate: dealer_wins as f64 / rounds,
                push_rate: pushes as f64 / rounds,
            });
            records.push(record);
        }

        SimulationReport {
            base_seed,
            records,
            cumulative,
        }
    }

    pub fn rounds(&self) -> u64 {
        self.records.len() as u64
    }

    pub fn final_rates(&self) -> Option<&CumulativeRates> {
        self.cumulative.last()
    }

    pub fn gambler_wins(&self) -> u64 {
        self.final_rates().map_or(0, |rates| rates.gambler_wins)
    }
}

/// Plays one automatic round on a fresh deck and reports who won.
pub fn simulate_round(rule: &Rule, seed: u64) -> Result<RoundOutcome> {
    let deck = Deck::with_seed(rule.number_of_decks, seed)?;
    let session = play_round(PlayMode::Auto, SIMULATION_STAKE, deck)?;
    // An automatic round always ends resolved.
    session.outcome().ok_or_else(|| BlackjackError::WrongPhase {
        operation: "simulate_round",
        expected: GamePhase::Resolved,
        actual: session.phase(),
    })
}

/// Plays `config.rounds` independent rounds and folds them into cumulative
/// rates. Rounds may run on several threads; the result only depends on the
/// base seed.
pub fn run_simulation(rule: &Rule, config: &SimulationConfig) -> Result<SimulationReport> {
    if config.rounds == 0 {
        return Err(BlackjackError::InvalidRoundCount(config.rounds));
    }
    let base_seed = config.seed.unwrap_or_else(rand::random);
    let number_of_threads = resolve_number_of_threads(config.number_of_threads)
        .min(config.rounds as usize)
        .max(1);
    log::info!(
        "simulating {} rounds on {} threads with base seed {}",
        config.rounds,
        number_of_threads,
        base_seed
    );

    let outcomes = if number_of_threads == 1 {
        simulate_rounds(rule, base_seed, 0, config.rounds)?
    } else {
        simulate_rounds_in_parallel(rule, base_seed, config.rounds, number_of_threads)?
    };

    let report = SimulationReport::from_outcomes(base_seed, &outcomes);
    if let Some(rates) = report.final_rates() {
        log::info!(
            "gambler {:.4} dealer {:.4} push {:.4}",
            rates.gambler_rate,
            rates.dealer_rate,
            rates.push_rate
        );
    }
    Ok(report)
}

/// Runs the reference simulation and returns the gambler's long-run win rate.
pub fn estimate_win_probability(rule: &Rule, config: &SimulationConfig) -> Result<f64> {
    let report = run_simulation(rule, config)?;
    Ok(report.final_rates().map_or(0.0, |rates| rates.gambler_rate))
}

fn simulate_rounds(rule: &Rule, base_seed: u64, start: u64, end: u64) -> Result<Vec<RoundOutcome>> {
    (start..end)
        .map(|i| simulate_round(rule, base_seed.wrapping_add(i)))
        .collect()
}

/// Splits the rounds into contiguous chunks, one per thread, and joins them
/// back in order so round indices are preserved.
fn simulate_rounds_in_parallel(
    rule: &Rule,
    base_seed: u64,
    rounds: u64,
    number_of_threads: usize,
) -> Result<Vec<RoundOutcome>> {
    let chunk = rounds.div_ceil(number_of_threads as u64);
    let rule = *rule;
    let chunks: Vec<Result<Vec<RoundOutcome>>> = std::thread::scope(|scope| {
        let threads: Vec<_> = (0..number_of_threads as u64)
            .map(|t| {
                let start = (t * chunk).min(rounds);
                let end = ((t + 1) * chunk).min(rounds);
                scope.spawn(move || simulate_rounds(&rule, base_seed, start, end))
            })
            .collect();
        threads
            .into_iter()
            .map(|thread| {
                thread
                    .join()
                    .unwrap_or_else(|panic| std::panic::resume_unwind(panic))
            })
            .collect()
    });

    let mut outcomes = Vec::with_capacity(rounds as usize);
    for chunk in chunks {
        outcomes.extend(chunk?);
    }
    Ok(outcomes)
}

fn resolve_number_of_threads(number_of_threads: usize) -> usize {
    if number_of_threads == 0 {
        let parallelism = std::thread::available_parallelism();
        match parallelism {
            Ok(n) => n.get(),
            Err(_) => 1,
        }
    } else {
        number_of_threads
    }
}
