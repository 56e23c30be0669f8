//! Terminal front end. Reads one command per line and redraws the reels while they spin.

use reelspin_core::{
    active_rows, GameError, MachineEvent, MachineView, ReelSource, SlotMachine, NUM_REELS,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::{interval, Instant, MissedTickBehavior};
use tracing::debug;

const CLEAR: &str = "\x1b[2J\x1b[H";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Spin,
    Bet(i8),
    Lines(i8),
    MaxBet,
    Restart,
    Help,
    Quit,
}

impl Command {
    pub fn parse(input: &str) -> Option<Self> {
        let cmd = match input.trim().to_ascii_lowercase().as_str() {
            "" | "s" | "spin" => Command::Spin,
            "bet+" | "+" => Command::Bet(1),
            "bet-" | "-" => Command::Bet(-1),
            "lines+" | "l+" => Command::Lines(1),
            "lines-" | "l-" => Command::Lines(-1),
            "max" | "maxbet" => Command::MaxBet,
            "restart" | "r" => Command::Restart,
            "help" | "h" | "?" => Command::Help,
            "quit" | "q" | "exit" => Command::Quit,
            _ => return None,
        };
        Some(cmd)
    }
}

const HELP: &str = "commands: spin (or enter), bet+ bet- lines+ lines- max restart help quit";

/// Draw the reels as three rows. Active paylines get arrows once the reels are still,
/// winning cells are bracketed.
pub fn render(view: &MachineView) -> String {
    let mut out = String::new();
    let paylines = active_rows(view.lines);
    let show_lines = !view.is_spinning();
    for slot in 0..3 {
        let arrow = if show_lines && paylines.contains(&slot) {
            ">"
        } else {
            " "
        };
        out.push_str(arrow);
        for reel in 0..NUM_REELS {
            let sym = view.visible[reel][slot];
            if view.is_highlighted(reel, slot) {
                out.push_str(&format!("[{}]", sym));
            } else {
                out.push_str(&format!(" {} ", sym));
            }
        }
        out.push_str(if arrow == ">" { "<\n" } else { "\n" });
    }
    out.push_str(&format!(
        "credits: {}  bet: {}  lines: {}\n",
        view.credits, view.bet, view.lines
    ));
    if let Some(message) = &view.message {
        out.push_str(message);
        out.push('\n');
    }
    if view.game_over {
        out.push_str("Game Over! You have run out of credits. Type `restart`.\n");
    }
    out
}

fn redraw(view: &MachineView) {
    print!("{}{}", CLEAR, render(view));
}

fn refusal(err: &GameError) -> String {
    match err {
        GameError::InsufficientCredits { .. } => "Not enough credits!".to_string(),
        other => other.to_string(),
    }
}

/// Drive the reel clock from real time until the spin settles.
async fn animate<S: ReelSource>(machine: &mut SlotMachine<S>) {
    let mut ticker = interval(machine.config().tick);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut last = Instant::now();
    while machine.is_spinning() {
        ticker.tick().await;
        let now = Instant::now();
        let events = machine.advance(now - last);
        last = now;
        if events.is_empty() {
            continue;
        }
        redraw(&machine.view());
        for event in events {
            match event {
                MachineEvent::Settled { outcome } => debug!(%outcome, "spin settled"),
                MachineEvent::GameOver => debug!("game over"),
                _ => {}
            }
        }
    }
}

pub async fn run<S: ReelSource>(machine: &mut SlotMachine<S>) -> anyhow::Result<()> {
    let mut input = BufReader::new(tokio::io::stdin()).lines();
    redraw(&machine.view());
    println!("{}", HELP);

    while let Some(line) = input.next_line().await? {
        let Some(cmd) = Command::parse(&line) else {
            println!("unknown command `{}`. {}", line.trim(), HELP);
            continue;
        };
        let result = match cmd {
            Command::Spin => match machine.spin() {
                Ok(_) => {
                    animate(machine).await;
                    Ok(())
                }
                Err(e) => Err(e),
            },
            Command::Bet(delta) => machine.adjust_bet(delta).map(|_| ()),
            Command::Lines(delta) => machine.adjust_lines(delta).map(|_| ()),
            Command::MaxBet => machine.set_max_bet().map(|_| ()),
            Command::Restart => {
                machine.restart();
                Ok(())
            }
            Command::Help => {
                println!("{}", HELP);
                continue;
            }
            Command::Quit => break,
        };
        redraw(&machine.view());
        if let Err(e) = result {
            println!("{}", refusal(&e));
        }
    }
    Ok(())
}
