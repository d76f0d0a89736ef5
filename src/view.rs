//! Read-only projections of the game for renderers and HUDs

use std::collections::VecDeque;

use glam::Vec2;
use serde::Serialize;

use crate::records::BestRecords;
use crate::settings::Settings;
use crate::sim::{GameMode, GamePhase, GameState, Item, Maze, Trap, VisibilityTracker};

/// Numbers and flags shown around the maze
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hud {
    pub stage: u32,
    pub score: u64,
    /// Whole seconds: remaining in timed mode, elapsed otherwise
    pub time_display: u32,
    pub combo: u32,
    pub combo_multiplier: f32,
    pub keys_collected: u32,
    pub keys_total: u32,
    pub bonus_collected: u32,
    pub bonus_total: u32,
    pub speed_boost_active: bool,
    pub time_freeze_active: bool,
    pub exit_unlocked: bool,
    pub phase: GamePhase,
    pub mode: GameMode,
    pub best_stage: u32,
    pub best_score: u64,
    pub show_minimap: bool,
    pub sound_enabled: bool,
}

impl Hud {
    pub fn new(state: &GameState, settings: &Settings, records: &BestRecords) -> Self {
        let progress = &state.progress;
        Self {
            stage: state.stage,
            score: state.score,
            time_display: time_display(state),
            combo: progress.combo,
            combo_multiplier: progress.combo_multiplier,
            keys_collected: progress.keys_collected,
            keys_total: progress.keys_total,
            bonus_collected: progress.bonus_collected,
            bonus_total: progress.bonus_total,
            speed_boost_active: state.timers.speed_boost > 0.0,
            time_freeze_active: state.timers.is_frozen(),
            exit_unlocked: progress.exit_unlocked,
            phase: state.phase,
            mode: state.mode,
            best_stage: records.best_stage,
            best_score: records.best_score,
            show_minimap: settings.show_minimap,
            sound_enabled: settings.sound_enabled,
        }
    }
}

/// Seconds shown on the clock
pub fn time_display(state: &GameState) -> u32 {
    let timers = &state.timers;
    let secs = if state.is_timed() {
        (timers.time_left / 1000.0).ceil()
    } else {
        (timers.time_used / 1000.0).floor()
    };
    secs.max(0.0) as u32
}

/// Everything a renderer needs for one frame, borrowed from the game
#[derive(Debug)]
pub struct FrameView<'a> {
    pub maze: &'a Maze,
    pub player_pos: Vec2,
    pub trail: &'a VecDeque<Vec2>,
    pub items: &'a [Item],
    pub traps: &'a [Trap],
    pub exit_cell: (i32, i32),
    pub exit_unlocked: bool,
    /// Empty unless a hint is showing
    pub hint_path: &'a [Vec2],
    /// `Some` only in fog mode
    pub fog: Option<FogView<'a>>,
    pub hud: Hud,
}

#[derive(Debug, Clone, Copy)]
pub struct FogView<'a> {
    pub radius: f32,
    pub explored: &'a VisibilityTracker,
}

impl<'a> FrameView<'a> {
    pub fn new(state: &'a GameState, settings: &Settings, records: &BestRecords) -> Self {
        let fog = (state.mode == GameMode::Fog).then(|| FogView {
            radius: state.fog_radius(),
            explored: &state.level.fog,
        });
        Self {
            maze: &state.level.maze,
            player_pos: state.player.pos,
            trail: &state.player.trail,
            items: &state.level.items,
            traps: &state.level.traps,
            exit_cell: state.level.maze.exit(),
            exit_unlocked: state.progress.exit_unlocked,
            hint_path: &state.hint_path,
            fog,
            hud: Hud::new(state, settings, records),
        }
    }
}
