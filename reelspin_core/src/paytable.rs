use serde::{Deserialize, Serialize};

/// Payout rule for a single payline: every symbol appearing at least `min_count` times
/// on the row pays `line_multiplier * count * bet`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paytable {
    pub line_multiplier: u32,
    pub min_count: u8,
}

impl Paytable {
    pub fn payout(&self, count: u8, bet: u8) -> Option<u32> {
        (count >= self.min_count).then(|| self.line_multiplier * count as u32 * bet as u32)
    }
}

impl Default for Paytable {
    fn default() -> Self {
        Self {
            line_multiplier: 10,
            min_count: 3,
        }
    }
}
