//! Per-stage parameters and level construction

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::fog::VisibilityTracker;
use super::layout::{Item, ItemKind, Quota, Trap, place_entities};
use super::maze::Maze;
use super::state::GameMode;
use crate::cell_center;

/// Largest maze side length
pub const MAX_MAZE_SIZE: usize = 51;

/// Difficulty knobs derived from the stage number
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelParams {
    pub stage: u32,
    pub maze_size: usize,
    pub loop_fraction: f32,
    /// Level budget (ms)
    pub time_budget: f32,
    /// Fog radius before any keys are collected
    pub fog_baseline: f32,
}

impl LevelParams {
    pub fn for_stage(stage: u32) -> Self {
        let stage = stage.max(1);
        let maze_size = (21 + (stage as usize - 1) * 4).min(MAX_MAZE_SIZE) | 1;
        let loop_fraction = (0.08 + stage as f32 * 0.015).min(0.20);
        let pressure = (0.85 - stage as f32 * 0.04).max(0.45);
        let cells = (maze_size * maze_size) as f32;
        let time_budget = (cells.sqrt() * 6.5 * pressure).floor() * 1000.0;
        let fog_baseline = (5.0 - (stage - 1) as f32 * 0.25).max(3.0);
        Self {
            stage,
            maze_size,
            loop_fraction,
            time_budget,
            fog_baseline,
        }
    }
}

/// Everything rebuilt on each level start: the maze and what's in it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Level {
    pub params: LevelParams,
    pub maze: Maze,
    pub items: Vec<Item>,
    pub traps: Vec<Trap>,
    #[serde(skip)]
    pub fog: VisibilityTracker,
}

impl Level {
    /// Generate a fresh level for a stage
    pub fn generate<R: Rng + ?Sized>(stage: u32, mode: GameMode, rng: &mut R) -> Self {
        let params = LevelParams::for_stage(stage);
        let maze = Maze::generate(params.maze_size, params.maze_size, params.loop_fraction, rng);
        let (items, traps) = place_entities(&maze, Quota::for_stage(params.stage, mode), rng);
        Self::new(params, maze, items, traps)
    }

    /// Assemble a level from parts (custom layouts, tests)
    pub fn new(params: LevelParams, maze: Maze, items: Vec<Item>, traps: Vec<Trap>) -> Self {
        let fog = VisibilityTracker::new(maze.width(), maze.height());
        Self {
            params,
            maze,
            items,
            traps,
            fog,
        }
    }

    pub fn start_pos(&self) -> Vec2 {
        let (x, y) = self.maze.start();
        cell_center(x, y)
    }

    pub fn exit_pos(&self) -> Vec2 {
        let (x, y) = self.maze.exit();
        cell_center(x, y)
    }

    pub fn count(&self, kind: ItemKind) -> u32 {
        self.items.iter().filter(|i| i.kind == kind).count() as u32
    }
}
