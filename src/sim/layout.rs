//! Item and trap placement
//!
//! Candidates are the maze's open cells minus a clearance zone around the
//! start and exit. The pool is shuffled and consumed in order: keys, bonus
//! gems, power-ups, then traps. Once the pool runs dry, placement falls back
//! to any open cell except the start (overlaps are allowed).

use glam::Vec2;
use rand::Rng;
use rand::seq::{IndexedRandom, SliceRandom};
use serde::{Deserialize, Serialize};

use super::maze::Maze;
use super::state::GameMode;
use crate::cell_center;

/// Nothing spawns this close to the start cell, or closer
pub const START_CLEARANCE: f32 = 2.0;
/// Nothing spawns this close to the exit cell, or closer
pub const EXIT_CLEARANCE: f32 = 1.5;

/// Collectible types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    /// Required to unlock the exit
    Key,
    /// Optional points
    Bonus,
    /// Doubles movement speed for a few seconds
    SpeedBoost,
    /// Pauses the timed-mode countdown for a few seconds
    TimeFreezer,
}

/// A collectible; kept after pickup so renderers and tallies can see it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub pos: Vec2,
    pub kind: ItemKind,
    pub collected: bool,
}

impl Item {
    pub fn new(kind: ItemKind, pos: Vec2) -> Self {
        Self {
            pos,
            kind,
            collected: false,
        }
    }
}

/// A trap that sends the player back to the start
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trap {
    pub pos: Vec2,
    pub live: bool,
}

impl Trap {
    pub fn new(pos: Vec2) -> Self {
        Self { pos, live: true }
    }
}

/// How many of each entity a stage gets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quota {
    pub keys: usize,
    pub bonus: usize,
    pub speed_boosts: usize,
    pub time_freezers: usize,
    pub traps: usize,
}

impl Quota {
    pub fn for_stage(stage: u32, mode: GameMode) -> Self {
        let collectibles = (3 + stage as usize / 2).min(6);
        let traps = if stage >= 2 {
            (2 + stage.saturating_sub(2) as usize).min(8)
        } else {
            0
        };
        Self {
            keys: collectibles,
            bonus: collectibles,
            speed_boosts: usize::from(stage >= 4),
            time_freezers: usize::from(stage >= 7 && mode == GameMode::Timed),
            traps,
        }
    }
}

/// Open cells eligible for placement, row-major
pub fn candidate_cells(maze: &Maze) -> Vec<(i32, i32)> {
    let (sx, sy) = maze.start();
    let (ex, ey) = maze.exit();
    let start = Vec2::new(sx as f32, sy as f32);
    let exit = Vec2::new(ex as f32, ey as f32);
    maze.open_cells()
        .filter(|&(x, y)| {
            let cell = Vec2::new(x as f32, y as f32);
            cell.distance(start) > START_CLEARANCE && cell.distance(exit) > EXIT_CLEARANCE
        })
        .collect()
}

/// Scatter the stage's quota over the maze
pub fn place_entities<R: Rng + ?Sized>(
    maze: &Maze,
    quota: Quota,
    rng: &mut R,
) -> (Vec<Item>, Vec<Trap>) {
    let mut pool = candidate_cells(maze);
    pool.shuffle(rng);
    let start = maze.start();
    let fallback: Vec<(i32, i32)> = maze.open_cells().filter(|&cell| cell != start).collect();
    let mut cells = pool.into_iter();

    let mut next_cell = |rng: &mut R| cells.next().or_else(|| fallback.choose(rng).copied());

    let plan = [
        (ItemKind::Key, quota.keys),
        (ItemKind::Bonus, quota.bonus),
        (ItemKind::SpeedBoost, quota.speed_boosts),
        (ItemKind::TimeFreezer, quota.time_freezers),
    ];
    let mut items = Vec::with_capacity(plan.iter().map(|(_, n)| n).sum());
    for (kind, count) in plan {
        for _ in 0..count {
            let (x, y) = next_cell(&mut *rng).unwrap_or(start);
            items.push(Item::new(kind, cell_center(x, y)));
        }
    }

    // Traps never land on the start cell; with nowhere else to go they are dropped.
    let traps = (0..quota.traps)
        .filter_map(|_| next_cell(&mut *rng))
        .map(|(x, y)| Trap::new(cell_center(x, y)))
        .collect();
    (items, traps)
}
