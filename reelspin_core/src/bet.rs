use serde::{Deserialize, Serialize};

pub const MIN_BET: u8 = 1;
pub const MAX_BET: u8 = 5;
pub const MIN_LINES: u8 = 1;
pub const MAX_LINES: u8 = 3;

/// Stake per line and number of paylines. Both always stay inside their ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BetConfig {
    bet: u8,
    lines: u8,
}

impl Default for BetConfig {
    fn default() -> Self {
        Self {
            bet: MIN_BET,
            lines: MIN_LINES,
        }
    }
}

fn step(value: u8, delta: i8, min: u8, max: u8) -> u8 {
    (value as i16 + delta as i16).clamp(min as i16, max as i16) as u8
}

impl BetConfig {
    pub fn new(bet: u8, lines: u8) -> Self {
        Self {
            bet: bet.clamp(MIN_BET, MAX_BET),
            lines: lines.clamp(MIN_LINES, MAX_LINES),
        }
    }

    pub fn bet(&self) -> u8 {
        self.bet
    }

    pub fn lines(&self) -> u8 {
        self.lines
    }

    /// Credits charged for one spin.
    pub fn cost(&self) -> i64 {
        self.bet as i64 * self.lines as i64
    }

    pub fn adjust_bet(&mut self, delta: i8) -> u8 {
        self.bet = step(self.bet, delta, MIN_BET, MAX_BET);
        self.bet
    }

    pub fn adjust_lines(&mut self, delta: i8) -> u8 {
        self.lines = step(self.lines, delta, MIN_LINES, MAX_LINES);
        self.lines
    }

    /// Largest stake the player can cover, trying full max first, then all lines with a
    /// reduced bet, then two lines, then a single line.
    pub fn max_for(credits: i64) -> Self {
        let (max_bet, max_lines) = (MAX_BET as i64, MAX_LINES as i64);
        let (bet, lines) = if credits >= max_bet * max_lines {
            (max_bet, max_lines)
        } else if credits > max_bet * (max_lines - 1) {
            (credits / max_lines, max_lines)
        } else if credits > max_bet {
            (credits / 2, max_lines - 1)
        } else {
            (credits, MIN_LINES as i64)
        };
        Self::new(
            bet.clamp(MIN_BET as i64, MAX_BET as i64) as u8,
            lines as u8,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adjustments_clamp() {
        let mut cfg = BetConfig::default();
        assert_eq!(cfg.adjust_bet(-1), 1);
        for _ in 0..10 {
            cfg.adjust_bet(1);
        }
        assert_eq!(cfg.bet(), 5);
        assert_eq!(cfg.adjust_lines(1), 2);
        assert_eq!(cfg.adjust_lines(1), 3);
        assert_eq!(cfg.adjust_lines(1), 3);
        assert_eq!(cfg.adjust_lines(-1), 2);
        assert_eq!(cfg.cost(), 10);
    }

    #[test]
    fn max_bet_ladder() {
        let cases = [
            (100, (5, 3)),
            (15, (5, 3)),
            (14, (4, 3)),
            (11, (3, 3)),
            (10, (5, 2)),
            (7, (3, 2)),
            (6, (3, 2)),
            (5, (5, 1)),
            (2, (2, 1)),
            (1, (1, 1)),
        ];
        for (credits, (bet, lines)) in cases {
            let cfg = BetConfig::max_for(credits);
            assert_eq!((cfg.bet(), cfg.lines()), (bet, lines), "credits={credits}");
            assert!(cfg.cost() <= credits);
        }
    }

    #[test]
    fn max_bet_never_drops_below_minimum() {
        let cfg = BetConfig::max_for(0);
        assert_eq!((cfg.bet(), cfg.lines()), (1, 1));
    }
}
