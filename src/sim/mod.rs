//! Simulation module
//!
//! All gameplay logic lives here:
//! - Real elapsed `dt` per tick, clamped against stalls
//! - One RNG per run (entropy-seeded; fixed seeds for tests)
//! - No rendering, audio or storage dependencies

pub mod clock;
pub mod fog;
pub mod layout;
pub mod level;
pub mod maze;
pub mod player;
pub mod score;
pub mod state;
pub mod tick;

pub use clock::Timers;
pub use fog::VisibilityTracker;
pub use layout::{Item, ItemKind, Quota, Trap};
pub use level::{Level, LevelParams};
pub use maze::Maze;
pub use player::Player;
pub use score::LevelResult;
pub use state::{GameEvent, GameMode, GamePhase, GameState, Progress};
pub use tick::{TickInput, step, tick};
