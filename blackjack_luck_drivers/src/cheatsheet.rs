use anyhow::{bail, Context};
use blackjack_luck::{simulation::Card, Decision};
use std::{fmt, fs, io, path::Path};

/// Upcard labels in row order, followed by the advice for totals 17 down to 8.
const FALLBACK: [(&str, &str); 10] = [
    ("2", "SSSSSHDDHH"),
    ("3", "SSSSSHDDDH"),
    ("4", "SSSSSSDDDH"),
    ("5", "SSSSSSDDDH"),
    ("6", "SSSSSSDDDH"),
    ("7", "SHHHHHDDHH"),
    ("8", "SHHHHHDDHH"),
    ("9", "SHHHHHDDHH"),
    ("10", "SHHHHHDHHH"),
    ("A", "SHHHHHDHHH"),
];
const FALLBACK_TOTALS: [u8; 10] = [17, 16, 15, 14, 13, 12, 11, 10, 9, 8];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advice {
    Stand,
    Hit,
    /// Doubling down is not played; it is taken as a hit.
    Double,
}

impl Advice {
    fn from_code(code: &str) -> Option<Advice> {
        match code.trim() {
            "S" => Some(Advice::Stand),
            "H" => Some(Advice::Hit),
            "D" => Some(Advice::Double),
            _ => None,
        }
    }

    pub fn code(&self) -> char {
        match self {
            Advice::Stand => 'S',
            Advice::Hit => 'H',
            Advice::Double => 'D',
        }
    }

    pub fn as_decision(&self) -> Decision {
        match self {
            Advice::Stand => Decision::Stand,
            Advice::Hit | Advice::Double => Decision::Hit,
        }
    }
}

/// A simple strategy table: what to do for a hard total against the dealer's
/// up-card.
#[derive(Debug, Clone, PartialEq)]
pub struct CheatSheet {
    /// Column headers, highest total first.
    totals: Vec<u8>,
    rows: Vec<(String, Vec<Advice>)>,
}

impl CheatSheet {
    /// The table that ships with the program.
    pub fn builtin() -> Self {
        let rows = FALLBACK
            .iter()
            .map(|(upcard, codes)| {
                let advice = codes
                    .chars()
                    .filter_map(|code| Advice::from_code(&code.to_string()))
                    .collect();
                (upcard.to_string(), advice)
            })
            .collect();
        CheatSheet {
            totals: FALLBACK_TOTALS.to_vec(),
            rows,
        }
    }

    /// Reads a comma separated table. The first line is a title and is skipped,
    /// the second holds the column headers, then one row per up-card.
    pub fn parse(content: &str) -> anyhow::Result<Self> {
        let mut lines = content.lines().skip(1).filter(|line| !line.trim().is_empty());
        let header = lines.next().context("cheat-sheet has no header row")?;
        let totals = header
            .split(',')
            .skip(1)
            .map(|total| {
                total
                    .trim()
                    .parse::<u8>()
                    .with_context(|| format!("invalid total {:?} in header", total))
            })
            .collect::<anyhow::Result<Vec<u8>>>()?;

        let mut rows = Vec::new();
        for line in lines.take(10) {
            let mut cells = line.split(',');
            let upcard = cells.next().unwrap_or_default().trim().to_string();
            let advice = cells
                .map(|cell| {
                    Advice::from_code(cell)
                        .with_context(|| format!("invalid advice {:?} for up-card {}", cell, upcard))
                })
                .collect::<anyhow::Result<Vec<Advice>>>()?;
            if advice.len() != totals.len() {
                bail!(
                    "up-card {} has {} entries, expected {}",
                    upcard,
                    advice.len(),
                    totals.len()
                );
            }
            rows.push((upcard, advice));
        }
        if rows.is_empty() {
            bail!("cheat-sheet has no rows");
        }
        Ok(CheatSheet { totals, rows })
    }

    /// Reads the table from `path`, falling back to the built-in one when the
    /// file does not exist.
    pub fn load_or_builtin(path: &Path) -> anyhow::Result<Self> {
        match fs::read_to_string(path) {
            Ok(content) => Self::parse(&content)
                .with_context(|| format!("cannot parse cheat-sheet {}", path.display())),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                log::warn!(
                    "cheat-sheet {} not found, using the built-in table",
                    path.display()
                );
                Ok(Self::builtin())
            }
            Err(err) => {
                Err(err).with_context(|| format!("cannot read cheat-sheet {}", path.display()))
            }
        }
    }

    /// The advice for a total against an up-card. Totals above the first
    /// column or below the last are clamped to them. Busted totals have none.
    pub fn advise(&self, player_total: u8, dealer_up_card: Card) -> Option<Advice> {
        if player_total > 21 {
            return None;
        }
        let label = upcard_label(dealer_up_card);
        let (_, advice) = self.rows.iter().find(|(upcard, _)| *upcard == label)?;
        let highest = *self.totals.iter().max()?;
        let lowest = *self.totals.iter().min()?;
        let total = player_total.clamp(lowest, highest);
        let column = self.totals.iter().position(|t| *t == total)?;
        advice.get(column).copied()
    }
}

fn upcard_label(card: Card) -> String {
    match card.rank() {
        1 => String::from("A"),
        10..=13 => String::from("10"),
        rank => rank.to_string(),
    }
}

impl fmt::Display for CheatSheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<14}", "Dealer Upcard")?;
        for total in &self.totals {
            write!(f, "{:>4}", total)?;
        }
        writeln!(f)?;
        for (upcard, advice) in &self.rows {
            write!(f, "{:<14}", upcard)?;
            for a in advice {
                write!(f, "{:>4}", a.code())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
