//! Per-frame simulation step
//!
//! Order within a tick:
//!   1. Level clock (timed mode may end the run here)
//!   2. Effect timers (speed, freeze, combo, hint, trap immunity)
//!   3. Hint request (its countdown starts next tick)
//!   4. Movement + fog reveal
//!   5. Item pickups
//!   6. Traps
//!   7. Exit check

use glam::Vec2;

use super::layout::ItemKind;
use super::score;
use super::state::{GameEvent, GameMode, GamePhase, GameState};
use crate::consts::*;

/// Input for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Movement intent; components in [-1, 1], diagonals get normalized
    pub movement: Vec2,
    /// Show the path to the exit
    pub hint: bool,
    /// Pause toggle
    pub pause: bool,
}

/// Advance the game state by `dt` seconds (clamped to [`MAX_FRAME_DT`])
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) -> Vec<GameEvent> {
    let mut events = Vec::new();

    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                state.phase = GamePhase::Paused;
                return events;
            }
            GamePhase::Paused => state.phase = GamePhase::Playing,
            _ => {}
        }
    }

    if state.phase != GamePhase::Playing {
        return events;
    }

    let dt = if dt.is_finite() {
        dt.clamp(0.0, MAX_FRAME_DT)
    } else {
        0.0
    };

    // 1. Level clock
    if state.timers.advance_level_time(dt, state.is_timed()) {
        state.phase = GamePhase::GameOver;
        log::info!("Stage {}: time up, final score {}", state.stage, state.score);
        events.push(GameEvent::GameOver);
        return events;
    }

    // 2. Effect timers
    let expired = state.timers.advance_effects(dt);
    if expired.speed_boost {
        state.player.speed_multiplier = 1.0;
    }
    if expired.combo {
        state.progress.reset_combo();
    }
    if expired.hint {
        state.hint_path.clear();
    }

    // 3. Hint
    if input.hint {
        request_hint(state, &mut events);
    }

    // 4. Movement
    state.player.step(&state.level.maze, input.movement, dt);
    if state.mode == GameMode::Fog {
        let radius = state.fog_radius();
        state.level.fog.reveal(state.player.pos, radius);
    }

    // 5-7
    resolve_pickups(state, &mut events);
    resolve_traps(state, &mut events);
    resolve_exit(state, &mut events);

    events
}

/// Pure form of [`tick`]: returns the next state instead of mutating
pub fn step(state: &GameState, input: &TickInput, dt: f32) -> (GameState, Vec<GameEvent>) {
    let mut next = state.clone();
    let events = tick(&mut next, input, dt);
    (next, events)
}

/// Solve from the player to the exit and show it for a while.
///
/// An empty solve (already there, or disconnected) shows nothing.
fn request_hint(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let path = state.level.maze.solve_path(state.player.pos, state.exit_pos());
    if path.is_empty() {
        return;
    }
    state.hint_path = path;
    state.timers.hint = HINT_DURATION;
    events.push(GameEvent::HintShown);
}

fn resolve_pickups(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let pos = state.player.pos;
    let picked: Vec<ItemKind> = state
        .level
        .items
        .iter_mut()
        .filter(|item| !item.collected && item.pos.distance(pos) < PICKUP_RADIUS)
        .map(|item| {
            item.collected = true;
            item.kind
        })
        .collect();

    for kind in picked {
        apply_pickup(state, kind, events);
    }
}

fn apply_pickup(state: &mut GameState, kind: ItemKind, events: &mut Vec<GameEvent>) {
    let progress = &mut state.progress;
    progress.bump_combo();
    state.timers.combo_window = COMBO_WINDOW;
    let multiplier = progress.combo_multiplier;

    match kind {
        ItemKind::Key => {
            state.score += (KEY_POINTS as f32 * multiplier).floor() as u64;
            progress.keys_collected += 1;
            events.push(GameEvent::PickupKey);
        }
        ItemKind::Bonus => {
            state.score += (BONUS_POINTS as f32 * multiplier).floor() as u64;
            progress.bonus_collected += 1;
            events.push(GameEvent::PickupBonus);
        }
        ItemKind::SpeedBoost => {
            state.player.speed_multiplier = SPEED_BOOST_MULTIPLIER;
            state.timers.speed_boost = SPEED_BOOST_DURATION;
            events.push(GameEvent::SpeedBoost);
        }
        ItemKind::TimeFreezer => {
            state.timers.time_freeze = TIME_FREEZE_DURATION;
            events.push(GameEvent::TimeFreeze);
        }
    }

    if progress.combo >= 2 {
        events.push(GameEvent::ComboReached(progress.combo));
    }

    if !progress.exit_unlocked && progress.keys_collected >= progress.keys_total {
        progress.exit_unlocked = true;
        events.push(GameEvent::ExitUnlocked);
    }
}

/// First live trap in range fires; the rest wait for the next tick
fn resolve_traps(state: &mut GameState, events: &mut Vec<GameEvent>) {
    if state.timers.trap_cooldown > 0.0 {
        return;
    }
    let pos = state.player.pos;
    let hit = state
        .level
        .traps
        .iter()
        .any(|trap| trap.live && trap.pos.distance(pos) < TRAP_RADIUS);
    if !hit {
        return;
    }

    state.player.reset_to(state.level.start_pos());
    state.timers.trap_cooldown = TRAP_COOLDOWN;
    if state.is_timed() {
        // May dip below zero; the clock clamps it next tick.
        state.timers.time_left -= TRAP_PENALTY_MS;
    }
    log::debug!("Trap triggered at {:?}", pos);
    events.push(GameEvent::TrapTriggered);
}

fn resolve_exit(state: &mut GameState, events: &mut Vec<GameEvent>) {
    if !state.progress.exit_unlocked || state.player.pos.distance(state.exit_pos()) >= EXIT_RADIUS {
        return;
    }

    let result = score::evaluate(state.stage, state.is_timed(), &state.progress, &state.timers);
    state.score += result.total;
    log::info!(
        "Stage {} complete: +{} ({} stars), total {}",
        state.stage,
        result.total,
        result.stars,
        state.score
    );
    state.last_result = Some(result);
    state.phase = GamePhase::LevelComplete;
    events.push(GameEvent::LevelComplete);
}
