use crate::engine::SessionStats;
use crate::paylines::Position;
use crate::reels::{ReelSet, NUM_REELS, VISIBLE_ROWS};
use crate::scheduler::{Phase, VisibleWindow};
use crate::symbols::Symbol;
use serde::{Deserialize, Serialize};

/// Read-only snapshot of the machine for a renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineView {
    pub reels: ReelSet,
    pub windows: [VisibleWindow; NUM_REELS],
    /// Symbols under each window, top to bottom.
    pub visible: [[Symbol; VISIBLE_ROWS]; NUM_REELS],
    pub spinning: [bool; NUM_REELS],
    pub phase: Phase,
    pub credits: i64,
    pub bet: u8,
    pub lines: u8,
    pub game_over: bool,
    pub winning_positions: Vec<Position>,
    pub message: Option<String>,
    pub stats: SessionStats,
}

impl MachineView {
    /// Whether the symbol shown in `slot` of `reel` should be highlighted. Highlights match
    /// on the strip index under the slot, so they line up once the reel is at rest.
    pub fn is_highlighted(&self, reel: usize, slot: usize) -> bool {
        let Some(&row) = self.windows.get(reel).and_then(|w| w.get(slot)) else {
            return false;
        };
        self.winning_positions
            .iter()
            .any(|p| p.reel == reel && p.row == row)
    }

    pub fn is_spinning(&self) -> bool {
        self.spinning.iter().any(|s| *s)
    }
}
