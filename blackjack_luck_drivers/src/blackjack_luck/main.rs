mod play;
mod statistics;

use std::path::{Path, PathBuf};

use anyhow::Context;
use blackjack_luck::{PlayMode, Rule};
use blackjack_luck_drivers::{parse_config_from_file, CheatSheet, Config};
use clap::{Parser, Subcommand};

const DEFAULT_CONFIG_PATH: &str = "~/.blackjack_luck.yml";
const DEFAULT_CHEATSHEET_PATH: &str = "cheetsheet.txt";

#[derive(Debug, Parser)]
#[command(author, about, long_about = None)]
struct CommandLineArgs {
    /// The path of the config file
    #[arg(short, long, default_value_t = String::from(DEFAULT_CONFIG_PATH))]
    config: String,

    /// Without a command, one round is played in the configured player mode
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Play one round where the gambler follows the built-in policy
    Play {
        #[arg(short, long)]
        stake: Option<u32>,
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Play rounds yourself, choosing hit or stand
    Interactive {
        #[arg(short, long)]
        stake: Option<u32>,
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Simulate many rounds and report cumulative win rates
    Simulate {
        #[arg(short, long)]
        rounds: u64,
        #[arg(long)]
        seed: Option<u64>,
        /// Write the full report to this YAML file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// See how lucky a short session is against the long-run win rate
    Luck {
        /// Rounds in the session, usually 50, 75 or 100
        #[arg(short, long, default_value_t = 50)]
        rounds: u64,
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Print the simple strategy cheat-sheet
    Cheatsheet {
        #[arg(short, long, default_value = DEFAULT_CHEATSHEET_PATH)]
        file: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = CommandLineArgs::parse();
    let config = load_config(&args.config)?;
    let rule: Rule = config.rule.clone().try_into()?;
    let command = match args.command {
        Some(command) => command,
        None => match config.player.play_mode().context("invalid player mode")? {
            PlayMode::Auto => Command::Play {
                stake: None,
                seed: None,
            },
            PlayMode::Interactive => Command::Interactive {
                stake: None,
                seed: None,
            },
        },
    };

    match command {
        Command::Play { stake, seed } => {
            let stake = stake.unwrap_or(config.player.stake);
            play::play_automatically(&rule, stake, seed.or(config.simulator.seed))
        }
        Command::Interactive { stake, seed } => {
            let sheet = CheatSheet::load_or_builtin(Path::new(DEFAULT_CHEATSHEET_PATH))?;
            let stake = stake.unwrap_or(config.player.stake);
            play::play_interactively(
                &rule,
                stake,
                config.player.bankroll,
                seed.or(config.simulator.seed),
                &sheet,
            )
        }
        Command::Simulate {
            rounds,
            seed,
            output,
        } => statistics::simulate(&rule, &config, rounds, seed, output.as_deref()),
        Command::Luck { rounds, seed } => statistics::show_luck(&rule, &config, rounds, seed),
        Command::Cheatsheet { file } => {
            let sheet = CheatSheet::load_or_builtin(&file)?;
            print!("{}", sheet);
            println!("Note: S = Stand, H = Hit, D = Double Down (played as Hit)");
            Ok(())
        }
    }
}

/// The default path may be absent, in which case the built-in defaults are
/// used. An explicitly given path must exist.
fn load_config(path: &str) -> anyhow::Result<Config> {
    if path != DEFAULT_CONFIG_PATH {
        return parse_config_from_file(path);
    }
    let home_dir = home::home_dir().context("Cannot find home directory")?;
    let config_file_path = home_dir.join(".blackjack_luck.yml");
    if !config_file_path.exists() {
        log::warn!(
            "{} not found, using default configuration",
            config_file_path.display()
        );
        return Ok(Config::default());
    }
    if config_file_path.is_dir() {
        anyhow::bail!("{} should be a file rather than a directory", config_file_path.display());
    }
    parse_config_from_file(&config_file_path)
}
