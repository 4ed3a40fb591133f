mod cheatsheet;

pub use cheatsheet::{Advice, CheatSheet};

use anyhow::Context;
use blackjack_luck::{PlayMode, Rule, DEFAULT_NUMBER_OF_DECKS, DEFAULT_REFERENCE_ROUNDS};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub rule: ConfigRule,
    pub simulator: ConfigSimulator,
    pub player: ConfigPlayer,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigRule {
    pub number_of_decks: u8,
}

impl Default for ConfigRule {
    fn default() -> Self {
        ConfigRule {
            number_of_decks: DEFAULT_NUMBER_OF_DECKS,
        }
    }
}

impl TryInto<Rule> for ConfigRule {
    type Error = anyhow::Error;

    fn try_into(self) -> Result<Rule, Self::Error> {
        if self.number_of_decks == 0 {
            anyhow::bail!("number_of_decks must be at least 1");
        }
        Ok(Rule {
            number_of_decks: self.number_of_decks,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigSimulator {
    /// 0 uses every available core.
    pub number_of_threads: usize,
    /// Rounds in the simulation that estimates the gambler's win probability.
    pub reference_rounds: u64,
    pub seed: Option<u64>,
}

impl Default for ConfigSimulator {
    fn default() -> Self {
        ConfigSimulator {
            number_of_threads: 0,
            reference_rounds: DEFAULT_REFERENCE_ROUNDS,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigPlayer {
    pub bankroll: i64,
    pub stake: u32,
    pub mode: String,
}

impl Default for ConfigPlayer {
    fn default() -> Self {
        ConfigPlayer {
            bankroll: 500,
            stake: 10,
            mode: PlayMode::Auto.to_string(),
        }
    }
}

impl ConfigPlayer {
    pub fn play_mode(&self) -> Result<PlayMode, serde::de::value::Error> {
        self.mode.parse()
    }
}

/// Reads the content of a given config file and parses it to a Config.
pub fn parse_config_from_file(filename: impl AsRef<Path>) -> anyhow::Result<Config> {
    let filename = filename.as_ref();
    let file_content = fs::read_to_string(filename)
        .with_context(|| format!("cannot read config file {}", filename.display()))?;
    parse_config(&file_content)
        .with_context(|| format!("cannot parse config file {}", filename.display()))
}

pub fn parse_config(content: &str) -> anyhow::Result<Config> {
    Ok(serde_yaml::from_str(content)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn can_convert_rule() {
        let config_rule = ConfigRule { number_of_decks: 6 };
        let converted_rule: Rule = config_rule.try_into().unwrap();
        assert_eq!(converted_rule.number_of_decks, 6);
    }

    #[test]
    fn should_return_error_when_converting_rule() {
        let config_rule = ConfigRule { number_of_decks: 0 };
        let convert_result: Result<Rule, anyhow::Error> = config_rule.try_into();
        assert!(convert_result.is_err());
    }

    #[test]
    fn parses_full_config() {
        let config = parse_config(
            r#"
rule:
  number_of_decks: 2
simulator:
  number_of_threads: 4
  reference_rounds: 5000
  seed: 17
player:
  bankroll: 1000
  stake: 25
  mode: Interactive
"#,
        )
        .unwrap();
        assert_eq!(config.rule.number_of_decks, 2);
        assert_eq!(config.simulator.number_of_threads, 4);
        assert_eq!(config.simulator.reference_rounds, 5000);
        assert_eq!(config.simulator.seed, Some(17));
        assert_eq!(config.player.bankroll, 1000);
        assert_eq!(config.player.stake, 25);
        assert_eq!(config.player.play_mode().unwrap(), PlayMode::Interactive);
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let config = parse_config("player:\n  stake: 20\n").unwrap();
        assert_eq!(config.rule, ConfigRule::default());
        assert_eq!(config.simulator.reference_rounds, 10000);
        assert_eq!(config.simulator.seed, None);
        assert_eq!(config.player.stake, 20);
        assert_eq!(config.player.bankroll, 500);
        assert_eq!(config.player.play_mode().unwrap(), PlayMode::Auto);
    }

    #[test]
    fn unknown_mode_is_an_error() {
        let config = parse_config("player:\n  mode: Manual\n").unwrap();
        assert!(config.player.play_mode().is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(parse_config_from_file("/nonexistent/blackjack_luck.yml").is_err());
    }
}
