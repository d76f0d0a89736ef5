//! Player movement and wall collision
//!
//! The player is an axis-aligned square of half-width `radius`. Movement is
//! resolved one axis at a time against the maze, which gives wall sliding.

use std::collections::VecDeque;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::maze::Maze;
use crate::consts::*;

/// The player's avatar
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub radius: f32,
    /// 1.0 normally, boosted by speed pickups
    pub speed_multiplier: f32,
    /// Recent positions for rendering (oldest first)
    #[serde(skip)]
    pub trail: VecDeque<Vec2>,
}

impl Player {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            radius: PLAYER_RADIUS,
            speed_multiplier: 1.0,
            trail: VecDeque::with_capacity(TRAIL_LENGTH + 1),
        }
    }

    /// Teleport (trap, level start) and drop the trail
    pub fn reset_to(&mut self, pos: Vec2) {
        self.pos = pos;
        self.clear_trail();
    }

    pub fn clear_trail(&mut self) {
        self.trail.clear();
    }

    /// Would the bounding square centered at `pos` touch a wall cell?
    pub fn collides_at(&self, maze: &Maze, pos: Vec2) -> bool {
        let r = self.radius;
        [(-r, -r), (r, -r), (-r, r), (r, r)]
            .iter()
            .any(|&(ox, oy)| maze.is_wall((pos.x + ox).floor() as i32, (pos.y + oy).floor() as i32))
    }

    /// Move by `intent` for `dt` seconds, X then Y, each axis committed only if clear.
    ///
    /// Returns the displacement actually applied.
    pub fn step(&mut self, maze: &Maze, intent: Vec2, dt: f32) -> Vec2 {
        let dir = movement_direction(intent);
        if dir == Vec2::ZERO || dt <= 0.0 {
            return Vec2::ZERO;
        }
        let delta = dir * PLAYER_BASE_SPEED * self.speed_multiplier * dt;
        let before = self.pos;

        let try_x = Vec2::new(self.pos.x + delta.x, self.pos.y);
        if delta.x != 0.0 && !self.collides_at(maze, try_x) {
            self.pos = try_x;
        }
        let try_y = Vec2::new(self.pos.x, self.pos.y + delta.y);
        if delta.y != 0.0 && !self.collides_at(maze, try_y) {
            self.pos = try_y;
        }

        self.record_trail();
        self.pos - before
    }

    /// Append the current position if it moved far enough from the last point
    fn record_trail(&mut self) {
        let moved = match self.trail.back() {
            Some(last) => last.distance(self.pos) > TRAIL_EPSILON,
            None => true,
        };
        if moved {
            self.trail.push_back(self.pos);
            while self.trail.len() > TRAIL_LENGTH {
                self.trail.pop_front();
            }
        }
    }
}

/// Clamp raw intent to at most unit length (diagonals divided by their length)
pub fn movement_direction(intent: Vec2) -> Vec2 {
    if !intent.is_finite() {
        return Vec2::ZERO;
    }
    let len = intent.length();
    if len > 1.0 { intent / len } else { intent }
}
