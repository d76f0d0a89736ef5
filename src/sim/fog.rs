//! Fog-of-war exploration tracking

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::cell_center;
use crate::consts::FOG_RADIUS_PER_KEY;

/// Cells the player has seen at least once this level
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VisibilityTracker {
    width: usize,
    height: usize,
    explored: Vec<bool>,
    count: usize,
}

impl VisibilityTracker {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            explored: vec![false; width * height],
            count: 0,
        }
    }

    /// Mark every cell whose center lies within `radius` of `pos`
    pub fn reveal(&mut self, pos: Vec2, radius: f32) {
        if radius <= 0.0 || !pos.is_finite() {
            return;
        }
        let r2 = radius * radius;
        let min_x = (pos.x - radius).floor().max(0.0) as usize;
        let min_y = (pos.y - radius).floor().max(0.0) as usize;
        let max_x = ((pos.x + radius).ceil().max(0.0) as usize).min(self.width);
        let max_y = ((pos.y + radius).ceil().max(0.0) as usize).min(self.height);

        for y in min_y..max_y {
            for x in min_x..max_x {
                let idx = y * self.width + x;
                if !self.explored[idx] && cell_center(x as i32, y as i32).distance_squared(pos) <= r2 {
                    self.explored[idx] = true;
                    self.count += 1;
                }
            }
        }
    }

    pub fn is_explored(&self, x: i32, y: i32) -> bool {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return false;
        }
        self.explored[y as usize * self.width + x as usize]
    }

    /// Number of explored cells
    pub fn explored_count(&self) -> usize {
        self.count
    }

    /// Explored cells, row-major
    pub fn explored_cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.explored
            .iter()
            .enumerate()
            .filter(|(_, seen)| **seen)
            .map(move |(i, _)| ((i % self.width) as i32, (i / self.width) as i32))
    }
}

/// Fog radius for a stage baseline after `keys` keys have been collected
pub fn fog_radius(baseline: f32, keys: u32) -> f32 {
    baseline + keys as f32 * FOG_RADIUS_PER_KEY
}
