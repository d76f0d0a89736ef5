//! Maze Runner - a real-time maze game core
//!
//! Core modules:
//! - `sim`: Simulation (maze generation/solving, movement, pickups, timers, scoring)
//! - `game`: Session layer wiring the simulation to settings, records and feedback
//! - `view`: Read-only projections for rendering and HUD collaborators
//! - `feedback`: Semantic event notifications (audio/haptics live outside the core)
//! - `persistence`: Key-value store abstraction
//! - `records` / `settings`: Best stage and score, player preferences
//! - `platform`: Native file storage and browser bindings

pub mod feedback;
pub mod game;
pub mod persistence;
pub mod platform;
pub mod records;
pub mod settings;
pub mod sim;
pub mod view;

pub use game::Game;
pub use records::BestRecords;
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Largest frame delta fed to the simulation (seconds); longer stalls are clamped
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Start cell (top-left interior corner)
    pub const START_CELL: (i32, i32) = (1, 1);

    /// Player collision half-width (cells)
    pub const PLAYER_RADIUS: f32 = 0.3;
    /// Base movement speed (cells per second)
    pub const PLAYER_BASE_SPEED: f32 = 4.0;
    /// Trail points kept for rendering
    pub const TRAIL_LENGTH: usize = 30;
    /// Minimum displacement before a new trail point is recorded
    pub const TRAIL_EPSILON: f32 = 0.05;

    /// Interaction radii (cells, measured center to center)
    pub const PICKUP_RADIUS: f32 = 0.5;
    pub const TRAP_RADIUS: f32 = 0.45;
    pub const EXIT_RADIUS: f32 = 0.6;

    /// Combo window (seconds) and multiplier step per chained pickup
    pub const COMBO_WINDOW: f32 = 2.0;
    pub const COMBO_STEP: f32 = 0.25;
    /// Max combo at which the level-complete combo bonus kicks in
    pub const COMBO_BONUS_THRESHOLD: u32 = 3;

    /// Power-ups
    pub const SPEED_BOOST_DURATION: f32 = 5.0;
    pub const SPEED_BOOST_MULTIPLIER: f32 = 2.0;
    pub const TIME_FREEZE_DURATION: f32 = 5.0;

    /// Traps
    pub const TRAP_COOLDOWN: f32 = 1.5;
    pub const TRAP_PENALTY_MS: f32 = 3000.0;

    /// Hint path display time (seconds)
    pub const HINT_DURATION: f32 = 3.0;

    /// Fog radius growth per collected key
    pub const FOG_RADIUS_PER_KEY: f32 = 0.3;

    /// Scoring
    pub const KEY_POINTS: u64 = 100;
    pub const BONUS_POINTS: u64 = 50;
    pub const COMBO_BONUS_POINTS: u64 = 50;
}

/// Center of a grid cell in world (cell-unit) coordinates
#[inline]
pub fn cell_center(x: i32, y: i32) -> Vec2 {
    Vec2::new(x as f32 + 0.5, y as f32 + 0.5)
}

/// Grid cell containing a world position
#[inline]
pub fn cell_of(pos: Vec2) -> (i32, i32) {
    (pos.x.floor() as i32, pos.y.floor() as i32)
}
