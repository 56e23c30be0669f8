use reelspin_core::paylines::MIDDLE;
use reelspin_core::{
    GameError, MachineEvent, Outcome, ReelSource, SlotMachine, MAX_BET, MAX_LINES,
};
use std::fmt;
use std::path::PathBuf;
use tracing::info;

pub struct SimulateOptions {
    pub spins: u64,
    pub bet: u8,
    pub lines: u8,
    pub max_bet: bool,
    pub csv: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub spins: u64,
    pub wagered: i64,
    pub won: i64,
    pub credits: i64,
    pub game_over: bool,
}

impl Summary {
    pub fn return_ratio(&self) -> f64 {
        if self.wagered == 0 {
            0.0
        } else {
            self.won as f64 / self.wagered as f64
        }
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "spins={} wagered={} won={} return={:.4} credits={}{}",
            self.spins,
            self.wagered,
            self.won,
            self.return_ratio(),
            self.credits,
            if self.game_over { " (game over)" } else { "" }
        )
    }
}

/// Play up to `opts.spins` spins on the virtual clock. Stops early once the stake can no
/// longer be covered.
pub fn run<S: ReelSource>(
    machine: &mut SlotMachine<S>,
    opts: &SimulateOptions,
) -> anyhow::Result<Summary> {
    if opts.max_bet {
        machine.set_max_bet()?;
    } else {
        machine.adjust_bet(opts.bet.min(MAX_BET) as i8 - machine.bet() as i8)?;
        machine.adjust_lines(opts.lines.min(MAX_LINES) as i8 - machine.lines() as i8)?;
    }

    let mut wtr = match &opts.csv {
        Some(path) => {
            let mut wtr = csv::Writer::from_path(path)?;
            wtr.write_record([
                "spin",
                "bet",
                "lines",
                "cost",
                "winnings",
                "credits",
                "middle_row",
            ])?;
            Some(wtr)
        }
        None => None,
    };

    for n in 1..=opts.spins {
        let ticket = match machine.spin() {
            Ok(ticket) => ticket,
            Err(e @ (GameError::GameOver | GameError::InsufficientCredits { .. })) => {
                info!(spin = n, reason = %e, "simulation stopped early");
                break;
            }
            Err(e) => return Err(e.into()),
        };
        let winnings = machine
            .run_to_completion()
            .into_iter()
            .find_map(|e| match e {
                MachineEvent::Settled {
                    outcome: Outcome::Win { amount },
                } => Some(amount),
                _ => None,
            })
            .unwrap_or(0);

        if let Some(wtr) = wtr.as_mut() {
            let middle: Vec<String> = machine
                .reels()
                .row(MIDDLE)
                .iter()
                .map(|s| s.to_string())
                .collect();
            wtr.write_record(&[
                n.to_string(),
                machine.bet().to_string(),
                machine.lines().to_string(),
                ticket.cost.to_string(),
                winnings.to_string(),
                machine.credits().to_string(),
                middle.join(" "),
            ])?;
        }
    }

    if let Some(mut wtr) = wtr {
        wtr.flush()?;
    }

    let stats = machine.stats();
    let summary = Summary {
        spins: stats.spins,
        wagered: stats.wagered,
        won: stats.won,
        credits: machine.credits(),
        game_over: machine.is_game_over(),
    };
    info!(spins = summary.spins, ratio = summary.return_ratio(), "simulation finished");
    Ok(summary)
}
