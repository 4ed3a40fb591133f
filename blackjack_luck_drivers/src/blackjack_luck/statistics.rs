use std::{fs, path::Path};

use anyhow::Context;
use blackjack_luck::statistics::{
    estimate_win_probability, run_simulation, CumulativeRates, LuckAssessment, SimulationConfig,
    SimulationReport,
};
use blackjack_luck::Rule;
use blackjack_luck_drivers::Config;

fn simulation_config(config: &Config, rounds: u64, seed: Option<u64>) -> SimulationConfig {
    SimulationConfig {
        rounds,
        seed: seed.or(config.simulator.seed),
        number_of_threads: config.simulator.number_of_threads,
    }
}

fn print_rates(rates: &CumulativeRates) {
    println!(
        "Player winning rate: {:.1}%   Dealer winning rate: {:.1}%   Draw rate: {:.1}%",
        rates.gambler_rate * 100.0,
        rates.dealer_rate * 100.0,
        rates.push_rate * 100.0
    );
}

/// Prints how the cumulative rates evolve and optionally dumps the whole report.
pub fn simulate(
    rule: &Rule,
    config: &Config,
    rounds: u64,
    seed: Option<u64>,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let report = run_simulation(rule, &simulation_config(config, rounds, seed))?;

    println!("{:>8} {:>10} {:>10} {:>10}", "Round", "Player", "Dealer", "Equal");
    let step = (rounds / 20).max(1);
    for rates in report
        .cumulative
        .iter()
        .filter(|rates| rates.round_index % step == 0 || rates.round_index == rounds)
    {
        println!(
            "{:>8} {:>10.4} {:>10.4} {:>10.4}",
            rates.round_index, rates.gambler_rate, rates.dealer_rate, rates.push_rate
        );
    }
    if let Some(rates) = report.final_rates() {
        print_rates(rates);
    }
    println!("Base seed: {}", report.base_seed);

    if let Some(path) = output {
        let content = serde_yaml::to_string(&report)?;
        fs::write(path, content)
            .with_context(|| format!("cannot write report to {}", path.display()))?;
        log::info!("report written to {}", path.display());
    }
    Ok(())
}

/// The reference run starts right after the session's last round seed, so the
/// two never share a round and both follow from the session's base seed.
fn reference_config(config: &Config, session: &SimulationReport) -> SimulationConfig {
    let seed = session.base_seed.wrapping_add(session.rounds());
    simulation_config(config, config.simulator.reference_rounds, Some(seed))
}

/// Plays a short session and assesses it against the long-run win rate of a
/// separate reference simulation.
fn assess_luck(
    rule: &Rule,
    config: &Config,
    rounds: u64,
    seed: Option<u64>,
) -> anyhow::Result<(SimulationReport, LuckAssessment)> {
    let report = run_simulation(rule, &simulation_config(config, rounds, seed))?;
    let reference = reference_config(config, &report);
    log::info!(
        "reference run of {} rounds with base seed {:?}",
        reference.rounds,
        reference.seed
    );
    let win_probability = estimate_win_probability(rule, &reference)?;
    let assessment = LuckAssessment::from_report(&report, win_probability)?;
    Ok((report, assessment))
}

/// Plays a short session, then ranks its win count against the long-run win
/// rate of a reference simulation.
pub fn show_luck(
    rule: &Rule,
    config: &Config,
    rounds: u64,
    seed: Option<u64>,
) -> anyhow::Result<()> {
    let (report, assessment) = assess_luck(rule, config, rounds, seed)?;

    println!("Statistics Board");
    if let Some(rates) = report.final_rates() {
        print_rates(rates);
    }
    println!(
        "You won {} of {} rounds. Long-run winning rate from {} rounds: {:.4}",
        assessment.observed_wins,
        assessment.rounds,
        config.simulator.reference_rounds,
        assessment.win_probability
    );
    println!(
        "Your Luck Today: Beating {:.2}% of the players",
        assessment.players_beaten_percent()
    );
    Ok(())
}
