//! Game state and core simulation types
//!
//! `GameState` owns the active level plus the progress and timers for it.
//! Levels are rebuilt wholesale on every stage start, never patched.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::clock::Timers;
use super::fog::fog_radius;
use super::layout::ItemKind;
use super::level::Level;
use super::player::Player;
use super::score::LevelResult;
use crate::consts::COMBO_STEP;

/// Rule set chosen on the start screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GameMode {
    /// No countdown; the time budget only feeds the completion bonus
    #[default]
    Normal,
    /// Visibility limited to a radius around the player
    Fog,
    /// The level budget counts down and running out ends the run
    Timed,
}

impl GameMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Normal => "normal",
            GameMode::Fog => "fog",
            GameMode::Timed => "timed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "normal" => Some(GameMode::Normal),
            "fog" => Some(GameMode::Fog),
            "timed" | "timer" => Some(GameMode::Timed),
            _ => None,
        }
    }
}

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Level built, waiting on the start screen
    Ready,
    /// Active gameplay
    Playing,
    /// Game is paused
    Paused,
    /// Exit reached; waiting for "next level"
    LevelComplete,
    /// Timed budget ran out
    GameOver,
}

/// Semantic notifications for feedback collaborators (audio, haptics)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    PickupKey,
    PickupBonus,
    SpeedBoost,
    TimeFreeze,
    /// Combo chain reached this length (2 or more)
    ComboReached(u32),
    TrapTriggered,
    ExitUnlocked,
    HintShown,
    LevelComplete,
    GameOver,
    /// A best stage and/or best score was beaten
    NewRecord { stage: bool, score: bool },
}

/// Per-level tallies
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Progress {
    pub keys_collected: u32,
    pub keys_total: u32,
    pub bonus_collected: u32,
    pub bonus_total: u32,
    /// Pickups chained inside the combo window
    pub combo: u32,
    pub combo_multiplier: f32,
    pub max_combo: u32,
    /// Latches true once every key is collected
    pub exit_unlocked: bool,
}

impl Progress {
    pub fn new(keys_total: u32, bonus_total: u32) -> Self {
        Self {
            keys_collected: 0,
            keys_total,
            bonus_collected: 0,
            bonus_total,
            combo: 0,
            combo_multiplier: 1.0,
            max_combo: 0,
            exit_unlocked: keys_total == 0,
        }
    }

    /// Chain one more pickup into the combo
    pub fn bump_combo(&mut self) {
        self.combo += 1;
        self.combo_multiplier = 1.0 + self.combo as f32 * COMBO_STEP;
        self.max_combo = self.max_combo.max(self.combo);
    }

    pub fn reset_combo(&mut self) {
        self.combo = 0;
        self.combo_multiplier = 1.0;
    }
}

/// Complete game state for one run
#[derive(Debug, Clone)]
pub struct GameState {
    pub mode: GameMode,
    pub phase: GamePhase,
    /// 1-based stage number
    pub stage: u32,
    /// Running total across completed stages plus in-level pickup points
    pub score: u64,
    pub level: Level,
    pub player: Player,
    pub progress: Progress,
    pub timers: Timers,
    /// Solver path shown while the hint timer runs
    pub hint_path: Vec<Vec2>,
    /// Breakdown of the last completed level
    pub last_result: Option<LevelResult>,
    rng: Pcg32,
}

impl GameState {
    /// New run seeded from OS entropy
    pub fn new(mode: GameMode) -> Self {
        Self::with_rng(mode, Pcg32::from_os_rng())
    }

    /// New run with a fixed seed
    pub fn with_seed(mode: GameMode, seed: u64) -> Self {
        Self::with_rng(mode, Pcg32::seed_from_u64(seed))
    }

    fn with_rng(mode: GameMode, mut rng: Pcg32) -> Self {
        let level = Level::generate(1, mode, &mut rng);
        Self::assemble(mode, 1, level, rng)
    }

    /// Play a hand-built level (custom layouts, tests)
    pub fn from_level(mode: GameMode, stage: u32, level: Level) -> Self {
        Self::assemble(mode, stage.max(1), level, Pcg32::seed_from_u64(u64::from(stage)))
    }

    fn assemble(mode: GameMode, stage: u32, level: Level, rng: Pcg32) -> Self {
        let mut state = Self {
            mode,
            phase: GamePhase::Ready,
            stage,
            score: 0,
            player: Player::new(level.start_pos()),
            progress: Progress::new(0, 0),
            timers: Timers::new(level.params.time_budget),
            hint_path: Vec::new(),
            last_result: None,
            level,
            rng,
        };
        state.reset_level_state();
        state
    }

    /// Build a fresh level for `stage` and reset all per-level state
    pub fn init_level(&mut self, stage: u32) {
        self.stage = stage.max(1);
        self.level = Level::generate(self.stage, self.mode, &mut self.rng);
        self.reset_level_state();
        log::info!(
            "Stage {} ({}): {}x{} maze, {} keys, {} traps, budget {}s",
            self.stage,
            self.mode.as_str(),
            self.level.maze.width(),
            self.level.maze.height(),
            self.progress.keys_total,
            self.level.traps.len(),
            self.timers.max_time / 1000.0
        );
    }

    fn reset_level_state(&mut self) {
        self.progress = Progress::new(
            self.level.count(ItemKind::Key),
            self.level.count(ItemKind::Bonus),
        );
        self.timers = Timers::new(self.level.params.time_budget);
        self.player = Player::new(self.level.start_pos());
        self.hint_path.clear();
        self.last_result = None;
        if self.mode == GameMode::Fog {
            let radius = self.fog_radius();
            self.level.fog.reveal(self.player.pos, radius);
        }
    }

    /// Begin a new run from stage 1
    pub fn start(&mut self) {
        self.score = 0;
        self.init_level(1);
        self.phase = GamePhase::Playing;
    }

    /// Begin the current level as built (keeps stage and score)
    pub fn begin(&mut self) {
        if self.phase == GamePhase::Ready {
            self.phase = GamePhase::Playing;
        }
    }

    /// Advance to the next stage; only valid after completing one
    pub fn next_level(&mut self) -> bool {
        if self.phase != GamePhase::LevelComplete {
            return false;
        }
        self.init_level(self.stage + 1);
        self.phase = GamePhase::Playing;
        true
    }

    /// Abandon the run and go back to the start screen
    pub fn to_menu(&mut self) {
        self.score = 0;
        self.init_level(1);
        self.phase = GamePhase::Ready;
    }

    /// Change rule set; only from the start screen (items depend on mode)
    pub fn set_mode(&mut self, mode: GameMode) -> bool {
        if self.phase != GamePhase::Ready {
            return false;
        }
        if self.mode != mode {
            self.mode = mode;
            self.init_level(self.stage);
        }
        true
    }

    pub fn is_timed(&self) -> bool {
        self.mode == GameMode::Timed
    }

    /// Current fog radius (baseline for the stage, grown by collected keys)
    pub fn fog_radius(&self) -> f32 {
        fog_radius(self.level.params.fog_baseline, self.progress.keys_collected)
    }

    pub fn exit_pos(&self) -> Vec2 {
        self.level.exit_pos()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_ready_at_start() {
        let state = GameState::with_seed(GameMode::Normal, 1);
        assert_eq!(state.phase, GamePhase::Ready);
        assert_eq!(state.stage, 1);
        assert_eq!(state.player.pos, Vec2::new(1.5, 1.5));
        assert_eq!(state.progress.keys_total, 3);
        assert!(!state.progress.exit_unlocked);
        assert_eq!(state.timers.time_left, state.timers.max_time);
    }

    #[test]
    fn test_lifecycle_transitions() {
        let mut state = GameState::with_seed(GameMode::Timed, 2);
        assert!(!state.next_level());
        state.start();
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(!state.set_mode(GameMode::Fog));

        state.phase = GamePhase::LevelComplete;
        state.score = 500;
        assert!(state.next_level());
        assert_eq!(state.stage, 2);
        assert_eq!(state.score, 500);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.level.maze.width(), 25);

        state.to_menu();
        assert_eq!(state.phase, GamePhase::Ready);
        assert_eq!(state.stage, 1);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_set_mode_rebuilds_level() {
        let mut state = GameState::with_seed(GameMode::Normal, 3);
        assert!(state.set_mode(GameMode::Fog));
        assert_eq!(state.mode, GameMode::Fog);
        // Fog mode reveals the area around the start immediately.
        assert!(state.level.fog.is_explored(1, 1));
    }

    #[test]
    fn test_combo_math() {
        let mut progress = Progress::new(3, 3);
        for n in 1..=4 {
            progress.bump_combo();
            assert!((progress.combo_multiplier - (1.0 + n as f32 * 0.25)).abs() < 1e-6);
        }
        assert_eq!(progress.max_combo, 4);
        progress.reset_combo();
        assert_eq!(progress.combo, 0);
        assert_eq!(progress.combo_multiplier, 1.0);
        assert_eq!(progress.max_combo, 4);
    }

    #[test]
    fn test_mode_strings() {
        for mode in [GameMode::Normal, GameMode::Fog, GameMode::Timed] {
            assert_eq!(GameMode::from_str(mode.as_str()), Some(mode));
        }
        assert_eq!(GameMode::from_str("TIMER"), Some(GameMode::Timed));
        assert_eq!(GameMode::from_str("arcade"), None);
    }
}
