pub mod bet;
pub mod config;
pub mod engine;
pub mod error;
pub mod paylines;
pub mod paytable;
pub mod reels;
pub mod scheduler;
pub mod symbols;
pub mod timer;
pub mod view;

pub use crate::bet::{BetConfig, MAX_BET, MAX_LINES};
pub use crate::config::GameConfig;
pub use crate::engine::{MachineEvent, Message, SessionStats, SlotMachine, SpinTicket};
pub use crate::error::{ConfigError, GameError, GameResult};
pub use crate::paylines::{active_rows, evaluate, evaluate_with, Evaluation, Outcome, Position};
pub use crate::paytable::Paytable;
pub use crate::reels::{
    generate_reel, generate_reel_set, RandomReels, Reel, ReelSet, ReelSource, ScriptedReels,
    NUM_REELS, REEL_LENGTH,
};
pub use crate::scheduler::{Phase, SchedulerEvent, SpinScheduler, VisibleWindow, RESTING_WINDOW};
pub use crate::symbols::Symbol;
pub use crate::view::MachineView;
