//! Maze Runner native entry point
//!
//! Runs a headless autopilot: every stage is played by walking the solver's
//! path through each key and then to the exit. Records persist to a JSON
//! file, so repeated runs show the best-record handling.
//!
//! Usage: `maze-runner [stages] [normal|fog|timed]`
//! Store path: `MAZE_RUNNER_STORE` (default `maze_runner_save.json`)

#[cfg(not(target_arch = "wasm32"))]
mod autopilot {
    use glam::Vec2;

    use maze_runner::Game;
    use maze_runner::consts::PLAYER_BASE_SPEED;
    use maze_runner::feedback::LogFeedback;
    use maze_runner::persistence::{KeyValueStore, MemoryStore};
    use maze_runner::platform::FileStore;
    use maze_runner::sim::{GameEvent, GameMode, GamePhase, GameState, ItemKind, Maze, TickInput};

    const FRAME_DT: f32 = 1.0 / 60.0;
    /// Give up on a stage after this many frames (10 minutes of play)
    const FRAME_BUDGET: u32 = 60 * 600;
    /// Close enough to a path point to move on
    const ARRIVE_EPSILON: f32 = 0.02;

    pub fn run() {
        let mut args = std::env::args().skip(1);
        let stages: u32 = args.next().and_then(|s| s.parse().ok()).unwrap_or(3);
        let mode = args.next().and_then(|s| GameMode::from_str(&s));

        let path = std::env::var("MAZE_RUNNER_STORE").unwrap_or_else(|_| "maze_runner_save.json".into());
        let store: Box<dyn KeyValueStore> = match FileStore::open(&path) {
            Ok(store) => {
                log::info!("Records stored in {}", store.path().display());
                Box::new(store)
            }
            Err(e) => {
                log::warn!("Cannot open {path}: {e}; records will not persist");
                Box::new(MemoryStore::new())
            }
        };

        let mut game = Game::new(store, Box::new(LogFeedback::new()));
        if let Some(mode) = mode {
            game.set_mode(mode);
        }
        log::info!(
            "Autopilot: {} stages, {} mode, best stage {} / score {}",
            stages,
            game.settings().mode.as_str(),
            game.records().best_stage,
            game.records().best_score
        );

        game.start_game();
        let cleared = play_stages(&mut game, stages);
        log::info!(
            "Cleared {cleared} of {stages} stages, finished on stage {} with score {}",
            game.state().stage,
            game.state().score
        );
    }

    /// Play up to `stages` levels, stopping at the first failure.
    ///
    /// Returns how many were completed. The game is left on the last level
    /// played, never advanced past it.
    pub fn play_stages(game: &mut Game, stages: u32) -> u32 {
        let mut cleared = 0;
        while cleared < stages {
            if !play_stage(game) {
                break;
            }
            cleared += 1;
            if let Some(result) = game.last_result() {
                log::info!(
                    "Stage {}: {} stars, {:.1}s, +{} (time {}, keys {}, bonus {}, combo {}){}",
                    result.stage,
                    result.stars,
                    result.time_used / 1000.0,
                    result.total,
                    result.time_bonus,
                    result.key_score,
                    result.bonus_score,
                    result.combo_bonus,
                    if result.new_best { " NEW BEST" } else { "" }
                );
            }
            if cleared < stages {
                game.next_level();
            }
        }
        cleared
    }

    /// Returns true if the stage was completed
    fn play_stage(game: &mut Game) -> bool {
        let mut frames = 0;
        while game.phase() == GamePhase::Playing {
            let Some(target) = next_target(game.state()) else {
                return false;
            };
            let route = route_to(game.state(), target);
            if route.is_empty() {
                log::warn!("Stage {}: no route to {target}", game.state().stage);
                return false;
            }

            'route: for point in route {
                while game.state().player.pos.distance(point) > ARRIVE_EPSILON {
                    if frames >= FRAME_BUDGET {
                        log::warn!("Stage {}: out of frames", game.state().stage);
                        return false;
                    }
                    frames += 1;
                    let input = TickInput {
                        movement: intent_towards(game.state(), point),
                        ..Default::default()
                    };
                    let events = game.frame(FRAME_DT, &input);
                    if events.contains(&GameEvent::TrapTriggered) || game.phase() != GamePhase::Playing {
                        break 'route;
                    }
                }
            }
        }
        game.phase() == GamePhase::LevelComplete
    }

    /// Nearest uncollected key, then the exit
    fn next_target(state: &GameState) -> Option<Vec2> {
        let pos = state.player.pos;
        let key = state
            .level
            .items
            .iter()
            .filter(|item| item.kind == ItemKind::Key && !item.collected)
            .map(|item| item.pos)
            .min_by(|a, b| a.distance_squared(pos).total_cmp(&b.distance_squared(pos)));
        key.or_else(|| state.progress.exit_unlocked.then(|| state.exit_pos()))
    }

    /// Solver path that treats trap cells as walls when it can
    fn route_to(state: &GameState, target: Vec2) -> Vec<Vec2> {
        let maze = &state.level.maze;
        let avoiding = without_traps(state).solve_path(state.player.pos, target);
        if avoiding.is_empty() {
            maze.solve_path(state.player.pos, target)
        } else {
            avoiding
        }
    }

    fn without_traps(state: &GameState) -> Maze {
        let maze = &state.level.maze;
        let traps: Vec<(i32, i32)> = state
            .level
            .traps
            .iter()
            .map(|trap| maze_runner::cell_of(trap.pos))
            .collect();
        let rows: Vec<String> = (0..maze.height() as i32)
            .map(|y| {
                (0..maze.width() as i32)
                    .map(|x| {
                        if maze.is_wall(x, y) || traps.contains(&(x, y)) {
                            '#'
                        } else {
                            '.'
                        }
                    })
                    .collect()
            })
            .collect();
        let refs: Vec<&str> = rows.iter().map(String::as_str).collect();
        Maze::from_rows(&refs)
    }

    /// Intent that lands exactly on `point` when it is less than a frame away
    fn intent_towards(state: &GameState, point: Vec2) -> Vec2 {
        let delta = point - state.player.pos;
        let reach = PLAYER_BASE_SPEED * state.player.speed_multiplier * FRAME_DT;
        (delta / reach).clamp_length_max(1.0)
    }

}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Maze Runner (native) starting...");
    autopilot::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The browser entry point is `platform::web::wasm_main`
}
