use crate::{
    bet::BetConfig,
    config::GameConfig,
    error::{GameError, GameResult},
    paylines::{evaluate_with, Evaluation, Outcome, Position},
    reels::{RandomReels, ReelSet, ReelSource, NUM_REELS},
    scheduler::{Phase, SchedulerEvent, SpinScheduler, VisibleWindow},
    view::MachineView,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Handed back when a spin is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpinTicket {
    pub generation: u64,
    pub cost: i64,
}

/// Text the front end shows under the reels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Message {
    Result(Outcome),
    InsufficientCredits,
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Message::Result(outcome) => write!(f, "{}", outcome),
            Message::InsufficientCredits => write!(f, "Not enough credits!"),
        }
    }
}

/// State transitions the front end may want to animate or play a sound for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MachineEvent {
    ReelScrolled { reel: usize },
    ReelStopped { reel: usize },
    Settled { outcome: Outcome },
    GameOver,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    pub spins: u64,
    pub wagered: i64,
    pub won: i64,
}

/// Everything needed to evaluate a spin, captured when it starts.
#[derive(Debug, Clone, Copy)]
struct PendingSpin {
    generation: u64,
    reels: ReelSet,
    bet: BetConfig,
}

pub struct SlotMachine<S: ReelSource = RandomReels> {
    config: GameConfig,
    source: S,
    credits: i64,
    bet: BetConfig,
    game_over: bool,
    reels: ReelSet,
    scheduler: SpinScheduler,
    winning: BTreeSet<Position>,
    message: Option<Message>,
    pending: Option<PendingSpin>,
    stats: SessionStats,
}

impl SlotMachine<RandomReels> {
    pub fn seeded(config: GameConfig, seed: u64) -> Self {
        Self::new(config, RandomReels::seeded(seed))
    }

    pub fn from_entropy(config: GameConfig) -> Self {
        Self::new(config, RandomReels::from_entropy())
    }
}

impl<S: ReelSource> SlotMachine<S> {
    pub fn new(config: GameConfig, mut source: S) -> Self {
        let reels = source.next_reel_set();
        Self {
            credits: config.starting_credits,
            scheduler: SpinScheduler::from_config(&config),
            config,
            source,
            bet: BetConfig::default(),
            game_over: false,
            reels,
            winning: BTreeSet::new(),
            message: None,
            pending: None,
            stats: SessionStats::default(),
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn credits(&self) -> i64 {
        self.credits
    }

    pub fn bet(&self) -> u8 {
        self.bet.bet()
    }

    pub fn lines(&self) -> u8 {
        self.bet.lines()
    }

    pub fn bet_config(&self) -> BetConfig {
        self.bet
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn is_spinning(&self) -> bool {
        self.scheduler.is_spinning()
    }

    pub fn phase(&self) -> Phase {
        self.scheduler.phase()
    }

    pub fn reels(&self) -> &ReelSet {
        &self.reels
    }

    pub fn windows(&self) -> &[VisibleWindow; NUM_REELS] {
        self.scheduler.windows()
    }

    pub fn spinning(&self) -> &[bool; NUM_REELS] {
        self.scheduler.spinning()
    }

    pub fn winning_positions(&self) -> &BTreeSet<Position> {
        &self.winning
    }

    pub fn message(&self) -> Option<Message> {
        self.message
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    /// Current reading of the reel clock.
    pub fn now(&self) -> Duration {
        self.scheduler.now()
    }

    fn ensure_idle(&self) -> GameResult<()> {
        if self.scheduler.is_spinning() {
            return Err(GameError::Spinning);
        }
        if self.game_over {
            return Err(GameError::GameOver);
        }
        Ok(())
    }

    pub fn adjust_bet(&mut self, delta: i8) -> GameResult<u8> {
        self.ensure_idle()?;
        Ok(self.bet.adjust_bet(delta))
    }

    pub fn adjust_lines(&mut self, delta: i8) -> GameResult<u8> {
        self.ensure_idle()?;
        Ok(self.bet.adjust_lines(delta))
    }

    pub fn set_max_bet(&mut self) -> GameResult<BetConfig> {
        self.ensure_idle()?;
        self.bet = BetConfig::max_for(self.credits);
        Ok(self.bet)
    }

    /// Charge the stake, draw new reels and set them spinning. Reels stop as the clock is
    /// advanced; the result is applied when the last one stops.
    pub fn spin(&mut self) -> GameResult<SpinTicket> {
        self.ensure_idle()?;
        let cost = self.bet.cost();
        if self.credits < cost {
            self.message = Some(Message::InsufficientCredits);
            return Err(GameError::InsufficientCredits {
                required: cost,
                available: self.credits,
            });
        }

        self.credits -= cost;
        self.stats.spins += 1;
        self.stats.wagered += cost;
        self.reels = self.source.next_reel_set();
        self.winning.clear();
        self.message = None;

        let generation = self.scheduler.start();
        self.pending = Some(PendingSpin {
            generation,
            reels: self.reels,
            bet: self.bet,
        });
        debug!(
            generation,
            bet = self.bet.bet(),
            lines = self.bet.lines(),
            credits = self.credits,
            "spin started"
        );
        Ok(SpinTicket { generation, cost })
    }

    /// Move the reel clock forward by `elapsed`.
    pub fn advance(&mut self, elapsed: Duration) -> Vec<MachineEvent> {
        let mut events = Vec::new();
        for event in self.scheduler.advance(elapsed) {
            match event {
                SchedulerEvent::Scrolled { reel } => {
                    events.push(MachineEvent::ReelScrolled { reel })
                }
                SchedulerEvent::Stopped { reel } => events.push(MachineEvent::ReelStopped { reel }),
                SchedulerEvent::Settled { generation } => self.settle(generation, &mut events),
            }
        }
        events
    }

    /// Stop a reel ahead of its scheduled time.
    pub fn stop_reel(&mut self, reel: usize) -> Vec<MachineEvent> {
        let mut events = Vec::new();
        if !self.scheduler.spinning().get(reel).copied().unwrap_or(false) {
            return events;
        }
        let settled = self.scheduler.stop_reel(reel);
        events.push(MachineEvent::ReelStopped { reel });
        if let Some(generation) = settled {
            self.settle(generation, &mut events);
        }
        events
    }

    /// Advance until the current spin has settled. Returns immediately when idle.
    pub fn run_to_completion(&mut self) -> Vec<MachineEvent> {
        let mut events = Vec::new();
        while self.scheduler.is_spinning() {
            events.extend(self.advance(self.config.tick));
        }
        events
    }

    fn settle(&mut self, generation: u64, events: &mut Vec<MachineEvent>) {
        let pending = match self.pending.take() {
            Some(p) if p.generation == generation => p,
            other => {
                warn!(generation, "settle for a spin that is no longer current");
                self.pending = other;
                return;
            }
        };
        let eval = evaluate_with(
            &self.config.paytable,
            &pending.reels,
            pending.bet.lines(),
            pending.bet.bet(),
        );
        let outcome = self.apply_result(&eval);
        events.push(MachineEvent::Settled { outcome });
        if self.game_over {
            events.push(MachineEvent::GameOver);
        }
    }

    /// Pay out an evaluation and flag game over once credits are exhausted.
    pub fn apply_result(&mut self, eval: &Evaluation) -> Outcome {
        self.credits += eval.winnings as i64;
        self.stats.won += eval.winnings as i64;
        self.winning = eval.positions.clone();
        let outcome = eval.outcome();
        self.message = Some(Message::Result(outcome));
        debug!(winnings = eval.winnings, credits = self.credits, "spin settled");
        if self.credits <= 0 {
            self.game_over = true;
            info!(spins = self.stats.spins, "out of credits, game over");
        }
        outcome
    }

    /// Back to a fresh game: default stake, full credits, new reels and no pending timers.
    pub fn restart(&mut self) {
        self.scheduler.reset();
        self.credits = self.config.starting_credits;
        self.bet = BetConfig::default();
        self.game_over = false;
        self.reels = self.source.next_reel_set();
        self.winning.clear();
        self.message = None;
        self.pending = None;
        self.stats = SessionStats::default();
        info!(credits = self.credits, "game restarted");
    }

    pub fn view(&self) -> MachineView {
        let windows = *self.scheduler.windows();
        MachineView {
            visible: std::array::from_fn(|r| windows[r].map(|i| self.reels[r][i])),
            reels: self.reels,
            windows,
            spinning: *self.scheduler.spinning(),
            phase: self.scheduler.phase(),
            credits: self.credits,
            bet: self.bet.bet(),
            lines: self.bet.lines(),
            game_over: self.game_over,
            winning_positions: self.winning.iter().copied().collect(),
            message: self.message.map(|m| m.to_string()),
            stats: self.stats,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reels::ScriptedReels;
    use crate::symbols::Symbol::*;

    fn cherries() -> ReelSet {
        ReelSet::from_rows(
            [Triangle, Diamond, Star, Circle, Clover],
            [Cherry, Cherry, Cherry, Star, Gem],
            [Lemon, Apple, Bell, Grapes, Pineapple],
        )
    }

    fn blank() -> ReelSet {
        let row = [Triangle, Diamond, Star, Circle, Clover];
        ReelSet::from_rows(row, row, row)
    }

    fn machine(script: ScriptedReels) -> SlotMachine<ScriptedReels> {
        SlotMachine::new(GameConfig::default(), script)
    }

    #[test]
    fn cost_is_charged_before_any_reel_stops() {
        let mut m = machine(ScriptedReels::new(blank()));
        m.adjust_bet(2).unwrap();
        m.adjust_lines(1).unwrap();
        let ticket = m.spin().unwrap();
        assert_eq!(ticket.cost, 6);
        assert_eq!(m.credits(), 94);
        assert!(m.spinning().iter().all(|s| *s));
    }

    #[test]
    fn winning_spin_pays_on_last_stop() {
        let mut m = machine(ScriptedReels::new(blank()).then(cherries()));
        m.adjust_bet(1).unwrap();
        m.spin().unwrap();
        assert_eq!(m.credits(), 98);

        let early = m.advance(Duration::from_millis(1500));
        assert!(!early
            .iter()
            .any(|e| matches!(e, MachineEvent::Settled { .. })));
        assert_eq!(m.credits(), 98);

        let events = m.advance(Duration::from_millis(100));
        assert_eq!(
            events.last(),
            Some(&MachineEvent::Settled {
                outcome: Outcome::Win { amount: 60 }
            })
        );
        assert_eq!(m.credits(), 158);
        let expected: BTreeSet<Position> =
            [0, 1, 2].into_iter().map(|r| Position::new(r, 1)).collect();
        assert_eq!(m.winning_positions(), &expected);
        assert_eq!(
            m.message().map(|msg| msg.to_string()),
            Some("You won 60 credits!".to_string())
        );
    }

    #[test]
    fn losing_spin_reports_no_win() {
        let mut m = machine(ScriptedReels::new(blank()));
        m.spin().unwrap();
        m.run_to_completion();
        assert_eq!(m.credits(), 99);
        assert!(m.winning_positions().is_empty());
        assert_eq!(m.message(), Some(Message::Result(Outcome::NoWin)));
    }

    #[test]
    fn controls_locked_while_spinning() {
        let mut m = machine(ScriptedReels::new(blank()));
        m.spin().unwrap();
        assert_eq!(m.adjust_bet(1), Err(GameError::Spinning));
        assert_eq!(m.adjust_lines(1), Err(GameError::Spinning));
        assert_eq!(m.set_max_bet(), Err(GameError::Spinning));
        assert_eq!(m.spin(), Err(GameError::Spinning));
        assert_eq!(m.credits(), 99);
    }

    #[test]
    fn insufficient_credits_leaves_state_alone() {
        let config = GameConfig {
            starting_credits: 4,
            ..GameConfig::default()
        };
        let mut m = SlotMachine::new(config, ScriptedReels::new(blank()));
        m.adjust_bet(4).unwrap();
        let reels = *m.reels();
        let err = m.spin().unwrap_err();
        assert_eq!(
            err,
            GameError::InsufficientCredits {
                required: 5,
                available: 4
            }
        );
        assert_eq!(m.credits(), 4);
        assert_eq!(m.reels(), &reels);
        assert!(!m.is_spinning());
        assert_eq!(m.message(), Some(Message::InsufficientCredits));
        assert_eq!(m.stats().spins, 0);
    }

    #[test]
    fn spending_the_last_credit_ends_the_game() {
        let config = GameConfig {
            starting_credits: 1,
            ..GameConfig::default()
        };
        let mut m = SlotMachine::new(config, ScriptedReels::new(blank()));
        m.spin().unwrap();
        assert!(!m.is_game_over());
        let events = m.run_to_completion();
        assert_eq!(events.last(), Some(&MachineEvent::GameOver));
        assert!(m.is_game_over());

        assert_eq!(m.spin(), Err(GameError::GameOver));
        assert_eq!(m.adjust_bet(1), Err(GameError::GameOver));
        assert_eq!(m.adjust_lines(1), Err(GameError::GameOver));
        assert_eq!(m.set_max_bet(), Err(GameError::GameOver));
    }

    #[test]
    fn apply_result_flags_game_over_at_zero() {
        let mut m = machine(ScriptedReels::new(blank()));
        m.apply_result(&Evaluation {
            winnings: 0,
            positions: BTreeSet::new(),
        });
        assert!(!m.is_game_over());
        m.credits = 0;
        m.apply_result(&Evaluation::default());
        assert!(m.is_game_over());
    }

    #[test]
    fn restart_resets_everything() {
        let first = blank();
        let mut m = machine(ScriptedReels::new(first).then(cherries()).then(blank()));
        m.set_max_bet().unwrap();
        m.spin().unwrap();
        m.advance(Duration::from_millis(500));
        m.restart();

        assert_eq!(m.credits(), 100);
        assert_eq!((m.bet(), m.lines()), (1, 1));
        assert!(!m.is_game_over());
        assert!(!m.is_spinning());
        assert!(m.winning_positions().is_empty());
        assert_eq!(m.message(), None);
        assert_eq!(m.reels(), &blank());

        // the abandoned spin's timers never fire
        assert!(m.advance(Duration::from_secs(10)).is_empty());
        assert_eq!(m.credits(), 100);
    }

    #[test]
    fn early_stops_settle_once() {
        let mut m = machine(ScriptedReels::new(blank()).then(cherries()));
        m.spin().unwrap();
        let mut settled = 0;
        for reel in [3, 1, 4, 2, 0, 0] {
            settled += m
                .stop_reel(reel)
                .iter()
                .filter(|e| matches!(e, MachineEvent::Settled { .. }))
                .count();
        }
        assert_eq!(settled, 1);
        assert_eq!(m.credits(), 99 + 30);
        assert!(m.advance(Duration::from_secs(5)).is_empty());
    }

    #[test]
    fn max_bet_uses_credits() {
        let mut m = machine(ScriptedReels::new(blank()));
        assert_eq!(m.set_max_bet().unwrap(), BetConfig::new(5, 3));
        m.credits = 10;
        assert_eq!(m.set_max_bet().unwrap(), BetConfig::new(5, 2));
        m.credits = 2;
        assert_eq!(m.set_max_bet().unwrap(), BetConfig::new(2, 1));
    }
}
