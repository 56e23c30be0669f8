use crate::error::ConfigError;
use crate::paytable::Paytable;
use crate::reels::NUM_REELS;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_STARTING_CREDITS: i64 = 100;
pub const DEFAULT_TICK: Duration = Duration::from_millis(100);
pub const DEFAULT_STOP_STAGGER_TICKS: u32 = 4;
pub const MAX_TICK: Duration = Duration::from_secs(60);
pub const MAX_STOP_STAGGER_TICKS: u32 = 1_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Credits granted on start and on every restart.
    pub starting_credits: i64,
    /// Scroll interval of a spinning reel.
    #[serde(rename = "tick_ms", with = "millis")]
    pub tick: Duration,
    /// Reel `r` stops `r * stop_stagger_ticks` ticks after the spin starts.
    pub stop_stagger_ticks: u32,
    pub paytable: Paytable,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            starting_credits: DEFAULT_STARTING_CREDITS,
            tick: DEFAULT_TICK,
            stop_stagger_ticks: DEFAULT_STOP_STAGGER_TICKS,
            paytable: Paytable::default(),
        }
    }
}

impl GameConfig {
    pub fn from_json(s: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.starting_credits <= 0 {
            return Err(ConfigError::Invalid(format!(
                "starting_credits must be positive, got {}",
                self.starting_credits
            )));
        }
        if self.tick.is_zero() || self.tick > MAX_TICK {
            return Err(ConfigError::Invalid(format!(
                "tick_ms must be between 1 and {}, got {}",
                MAX_TICK.as_millis(),
                self.tick.as_millis()
            )));
        }
        if self.stop_stagger_ticks == 0 || self.stop_stagger_ticks > MAX_STOP_STAGGER_TICKS {
            return Err(ConfigError::Invalid(format!(
                "stop_stagger_ticks must be between 1 and {}, got {}",
                MAX_STOP_STAGGER_TICKS, self.stop_stagger_ticks
            )));
        }
        if self.stop_delay(NUM_REELS - 1).is_none() {
            return Err(ConfigError::Invalid("last reel stop delay overflows".into()));
        }
        if self.paytable.min_count == 0 {
            return Err(ConfigError::Invalid(
                "paytable.min_count must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Delay between spin start and the stop of reel `reel`, `None` on overflow.
    pub fn stop_delay(&self, reel: usize) -> Option<Duration> {
        stop_delay(self.tick, self.stop_stagger_ticks, reel)
    }
}

/// Reel `reel` stops `reel * stop_stagger_ticks` ticks after the spin starts.
pub fn stop_delay(tick: Duration, stop_stagger_ticks: u32, reel: usize) -> Option<Duration> {
    let ticks = stop_stagger_ticks.checked_mul(u32::try_from(reel).ok()?)?;
    tick.checked_mul(ticks)
}

mod millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}
