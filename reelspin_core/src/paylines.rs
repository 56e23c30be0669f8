use crate::paytable::Paytable;
use crate::reels::ReelSet;
use crate::symbols::Symbol;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

pub const TOP: usize = 0;
pub const MIDDLE: usize = 1;
pub const BOTTOM: usize = 2;

/// A (reel, row) cell that contributed to a payout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub reel: usize,
    pub row: usize,
}

impl Position {
    pub fn new(reel: usize, row: usize) -> Self {
        Self { reel, row }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    pub winnings: u32,
    pub positions: BTreeSet<Position>,
}

impl Evaluation {
    pub fn outcome(&self) -> Outcome {
        if self.winnings > 0 {
            Outcome::Win {
                amount: self.winnings,
            }
        } else {
            Outcome::NoWin
        }
    }
}

/// Result of a settled spin, as shown to the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outcome {
    Win { amount: u32 },
    NoWin,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Win { amount } => write!(f, "You won {} credits!", amount),
            Outcome::NoWin => write!(f, "Better luck next time!"),
        }
    }
}

/// Rows played for a line count: one line is the middle row, two add the top row,
/// three play every row.
pub fn active_rows(lines: u8) -> &'static [usize] {
    match lines {
        0 | 1 => &[MIDDLE],
        2 => &[TOP, MIDDLE],
        _ => &[TOP, MIDDLE, BOTTOM],
    }
}

pub fn evaluate(reels: &ReelSet, lines: u8, bet: u8) -> Evaluation {
    evaluate_with(&Paytable::default(), reels, lines, bet)
}

pub fn evaluate_with(paytable: &Paytable, reels: &ReelSet, lines: u8, bet: u8) -> Evaluation {
    let mut eval = Evaluation::default();
    for &row in active_rows(lines) {
        let line = reels.row(row);
        let mut counts: BTreeMap<Symbol, u8> = BTreeMap::new();
        for sym in line {
            *counts.entry(sym).or_insert(0) += 1;
        }
        for (sym, count) in counts {
            let Some(pay) = paytable.payout(count, bet) else {
                continue;
            };
            eval.winnings += pay;
            eval.positions.extend(
                line.iter()
                    .enumerate()
                    .filter(|(_, s)| **s == sym)
                    .map(|(reel, _)| Position::new(reel, row)),
            );
        }
    }
    eval
}

#[cfg(test)]
mod tests {
    use super::*;
    use Symbol::*;

    fn distinct_row() -> [Symbol; 5] {
        [Triangle, Diamond, Star, Circle, Clover]
    }

    #[test]
    fn three_cherries_on_middle() {
        let reels = ReelSet::from_rows(
            distinct_row(),
            [Cherry, Cherry, Cherry, Star, Gem],
            distinct_row(),
        );
        let eval = evaluate(&reels, 1, 2);
        assert_eq!(eval.winnings, 60);
        let expected: BTreeSet<Position> = [(0, 1), (1, 1), (2, 1)]
            .into_iter()
            .map(|(r, row)| Position::new(r, row))
            .collect();
        assert_eq!(eval.positions, expected);
        assert_eq!(eval.outcome().to_string(), "You won 60 credits!");
    }

    #[test]
    fn distinct_middle_row_pays_nothing() {
        let reels = ReelSet::from_rows(distinct_row(), distinct_row(), distinct_row());
        let eval = evaluate(&reels, 3, 5);
        assert_eq!(eval.winnings, 0);
        assert!(eval.positions.is_empty());
        assert_eq!(eval.outcome(), Outcome::NoWin);
        assert_eq!(eval.outcome().to_string(), "Better luck next time!");
    }

    #[test]
    fn single_line_ignores_top_and_bottom() {
        let reels = ReelSet::from_rows([Bell; 5], distinct_row(), [Gem; 5]);
        assert_eq!(evaluate(&reels, 1, 1).winnings, 0);
        // two lines add the top row only
        let two = evaluate(&reels, 2, 1);
        assert_eq!(two.winnings, 50);
        assert!(two.positions.iter().all(|p| p.row == TOP));
        let three = evaluate(&reels, 3, 1);
        assert_eq!(three.winnings, 100);
        assert_eq!(three.positions.len(), 10);
    }

    #[test]
    fn two_symbols_cannot_both_qualify_on_five_reels() {
        // 3 + 3 > 5, so at most one symbol can pay per row; a four-count still pays by count.
        let reels = ReelSet::from_rows(
            distinct_row(),
            [Lemon, Lemon, Apple, Lemon, Lemon],
            distinct_row(),
        );
        let eval = evaluate(&reels, 1, 3);
        assert_eq!(eval.winnings, 10 * 4 * 3);
        assert_eq!(eval.positions.len(), 4);
        assert!(!eval.positions.contains(&Position::new(2, MIDDLE)));
    }

    #[test]
    fn several_rows_pay_independently() {
        let reels = ReelSet::from_rows(
            [Star, Star, Star, Bell, Bell],
            [Gem, Gem, Gem, Gem, Gem],
            [Bell, Apple, Bell, Apple, Bell],
        );
        let eval = evaluate(&reels, 3, 1);
        assert_eq!(eval.winnings, 30 + 50 + 30);
        assert_eq!(eval.positions.len(), 3 + 5 + 3);
    }

    #[test]
    fn evaluation_is_deterministic() {
        let reels = ReelSet::from_rows([Star; 5], [Cherry; 5], [Lemon; 5]);
        assert_eq!(evaluate(&reels, 3, 4), evaluate(&reels, 3, 4));
    }

    #[test]
    fn custom_paytable_changes_payout() {
        let reels = ReelSet::from_rows(distinct_row(), [Grapes; 5], distinct_row());
        let table = Paytable {
            line_multiplier: 2,
            min_count: 5,
        };
        assert_eq!(evaluate_with(&table, &reels, 1, 1).winnings, 10);
    }
}
