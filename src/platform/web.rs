//! Browser bindings
//!
//! The JS side owns the canvas, input and audio. It drives `WebGame::frame`
//! from `requestAnimationFrame` and pulls JSON snapshots to draw.

use glam::Vec2;
use serde::Serialize;
use wasm_bindgen::prelude::*;
use web_sys::Storage;

use crate::feedback::LogFeedback;
use crate::game::Game;
use crate::persistence::{KeyValueStore, MemoryStore, StoreError};
use crate::sim::{GameMode, Item, TickInput, Trap};

/// `window.localStorage`
pub struct LocalStorageStore {
    storage: Storage,
}

impl LocalStorageStore {
    pub fn open() -> Result<Self, StoreError> {
        let storage = web_sys::window()
            .ok_or_else(|| StoreError::Unavailable("no window".into()))?
            .local_storage()
            .map_err(js_error)?
            .ok_or_else(|| StoreError::Unavailable("localStorage disabled".into()))?;
        Ok(Self { storage })
    }
}

impl KeyValueStore for LocalStorageStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.storage.get_item(key).map_err(js_error)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.storage.set_item(key, value).map_err(js_error)
    }
}

fn js_error(e: JsValue) -> StoreError {
    StoreError::Unavailable(format!("{e:?}"))
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| {
        log::warn!("Snapshot encoding failed: {e}");
        "null".to_string()
    })
}

/// Dynamic part of the board
#[derive(Serialize)]
struct Entities<'a> {
    player: Vec2,
    trail: Vec<Vec2>,
    items: &'a [Item],
    traps: &'a [Trap],
    exit: (i32, i32),
    exit_unlocked: bool,
    hint_path: &'a [Vec2],
    fog_radius: Option<f32>,
    explored: Option<Vec<(i32, i32)>>,
}

#[wasm_bindgen(start)]
pub fn wasm_main() {
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::warn_1(&format!("logger init failed: {e}").into());
    }
    log::info!("Maze Runner core loaded");
}

#[wasm_bindgen]
pub struct WebGame {
    game: Game,
}

#[wasm_bindgen]
impl WebGame {
    #[wasm_bindgen(constructor)]
    pub fn new() -> WebGame {
        let store: Box<dyn KeyValueStore> = match LocalStorageStore::open() {
            Ok(store) => Box::new(store),
            Err(e) => {
                log::warn!("{e}; records will not persist");
                Box::new(MemoryStore::new())
            }
        };
        WebGame {
            game: Game::new(store, Box::new(LogFeedback::new())),
        }
    }

    pub fn start(&mut self) {
        self.game.start_game();
    }

    /// Advance one frame; returns the emitted events as a JSON array
    pub fn frame(&mut self, dt: f32, dx: f32, dy: f32, hint: bool, pause: bool) -> String {
        let input = TickInput {
            movement: Vec2::new(dx, dy),
            hint,
            pause,
        };
        to_json(&self.game.frame(dt, &input))
    }

    pub fn next_level(&mut self) -> bool {
        self.game.next_level()
    }

    pub fn restart(&mut self) -> bool {
        self.game.restart()
    }

    pub fn toggle_minimap(&mut self) -> bool {
        self.game.toggle_minimap()
    }

    pub fn toggle_sound(&mut self) -> bool {
        self.game.toggle_sound()
    }

    /// "normal", "fog" or "timed"; ignored outside the start screen
    pub fn set_mode(&mut self, mode: &str) -> bool {
        match GameMode::from_str(mode) {
            Some(mode) => self.game.set_mode(mode),
            None => {
                log::warn!("Unknown mode {mode:?}");
                false
            }
        }
    }

    pub fn hud_json(&self) -> String {
        to_json(&self.game.hud())
    }

    /// Walls only change on level start; fetch once per level
    pub fn maze_json(&self) -> String {
        to_json(&self.game.state().level.maze)
    }

    pub fn entities_json(&self) -> String {
        let view = self.game.view();
        to_json(&Entities {
            player: view.player_pos,
            trail: view.trail.iter().copied().collect(),
            items: view.items,
            traps: view.traps,
            exit: view.exit_cell,
            exit_unlocked: view.exit_unlocked,
            hint_path: view.hint_path,
            fog_radius: view.fog.map(|fog| fog.radius),
            explored: view.fog.map(|fog| fog.explored.explored_cells().collect()),
        })
    }

    /// Score breakdown of the last completed level, or `null`
    pub fn result_json(&self) -> String {
        to_json(&self.game.last_result())
    }
}

impl Default for WebGame {
    fn default() -> Self {
        Self::new()
    }
}
