//! Level time and effect timers
//!
//! Level time (`max_time`, `time_left`, `time_used`) is kept in milliseconds;
//! effect timers count down in seconds. Every countdown clamps at zero.

use serde::{Deserialize, Serialize};

/// Timers that ran out during one effect advance
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Expired {
    pub speed_boost: bool,
    pub time_freeze: bool,
    pub combo: bool,
    pub hint: bool,
}

/// All per-level clocks
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Timers {
    /// Nominal level budget (ms)
    pub max_time: f32,
    /// Remaining budget (ms); only counts down in timed mode
    pub time_left: f32,
    /// Time spent in the level (ms)
    pub time_used: f32,
    /// Seconds of speed boost remaining
    pub speed_boost: f32,
    /// Seconds of time freeze remaining
    pub time_freeze: f32,
    /// Seconds left to chain another pickup into the combo
    pub combo_window: f32,
    /// Seconds the hint path stays visible
    pub hint: f32,
    /// Seconds of trap immunity remaining
    pub trap_cooldown: f32,
}

impl Timers {
    pub fn new(max_time_ms: f32) -> Self {
        Self {
            max_time: max_time_ms,
            time_left: max_time_ms,
            ..Default::default()
        }
    }

    /// Countdown paused by a time-freeze pickup
    pub fn is_frozen(&self) -> bool {
        self.time_freeze > 0.0
    }

    /// Accumulate used time and, in timed mode, run the level countdown.
    ///
    /// Returns true when the timed budget is exhausted; `time_left` then
    /// reads exactly zero.
    pub fn advance_level_time(&mut self, dt: f32, timed: bool) -> bool {
        let dt_ms = dt * 1000.0;
        self.time_used += dt_ms;
        if !timed {
            return false;
        }
        if !self.is_frozen() {
            self.time_left -= dt_ms;
        }
        if self.time_left <= 0.0 {
            self.time_left = 0.0;
            return true;
        }
        false
    }

    /// Run the effect countdowns, reporting which ones just hit zero
    pub fn advance_effects(&mut self, dt: f32) -> Expired {
        let expired = Expired {
            speed_boost: countdown(&mut self.speed_boost, dt),
            time_freeze: countdown(&mut self.time_freeze, dt),
            combo: countdown(&mut self.combo_window, dt),
            hint: countdown(&mut self.hint, dt),
        };
        countdown(&mut self.trap_cooldown, dt);
        expired
    }

    /// Fraction of the budget still unspent, in `[0, 1]`
    pub fn remaining_fraction(&self, timed: bool) -> f32 {
        if self.max_time <= 0.0 {
            return 0.0;
        }
        let remaining = if timed {
            self.time_left
        } else {
            self.max_time - self.time_used
        };
        (remaining / self.max_time).clamp(0.0, 1.0)
    }
}

/// Decrement toward zero; true only on the tick it reaches zero
fn countdown(timer: &mut f32, dt: f32) -> bool {
    if *timer <= 0.0 {
        return false;
    }
    *timer = (*timer - dt).max(0.0);
    *timer == 0.0
}
