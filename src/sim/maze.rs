//! Maze generation and solving
//!
//! Mazes are carved on the odd-coordinate lattice with an iterative
//! depth-first search (explicit stack, no recursion), then a fraction of the
//! walls separating two open cells are knocked out to create loops.

use std::collections::VecDeque;

use glam::Vec2;
use rand::Rng;
use rand::seq::{IndexedRandom, SliceRandom};
use serde::{Deserialize, Serialize};

use crate::consts::START_CELL;
use crate::{cell_center, cell_of};

/// Smallest maze side length (border + one corridor + border, rounded to odd)
pub const MIN_MAZE_SIZE: usize = 5;

/// Carving steps: (two-cell jump, intermediate wall offset), N/E/S/W
const CARVE_DIRS: [((i32, i32), (i32, i32)); 4] = [
    ((0, -2), (0, -1)),
    ((2, 0), (1, 0)),
    ((0, 2), (0, 1)),
    ((-2, 0), (-1, 0)),
];

/// Single-step neighbors for solving, N/E/S/W
const STEP_DIRS: [(i32, i32); 4] = [(0, -1), (1, 0), (0, 1), (-1, 0)];

/// An immutable-after-generation grid of walls and open cells
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Maze {
    width: usize,
    height: usize,
    /// Row-major, `true` = wall
    walls: Vec<bool>,
}

impl Maze {
    /// Generate a solvable maze with loops.
    ///
    /// Dimensions are rounded up to odd values of at least [`MIN_MAZE_SIZE`].
    /// `loop_fraction` is clamped to `[0, 1)`.
    pub fn generate<R: Rng + ?Sized>(
        width: usize,
        height: usize,
        loop_fraction: f32,
        rng: &mut R,
    ) -> Self {
        let mut maze = Self::perfect(width, height, rng);
        let opened = maze.inject_loops(loop_fraction, rng);
        log::debug!(
            "Generated {}x{} maze: {} open cells, {} loop walls removed",
            maze.width,
            maze.height,
            maze.open_cells().count(),
            opened
        );
        maze
    }

    /// Carve a perfect maze (a spanning tree over the odd lattice, no cycles)
    pub fn perfect<R: Rng + ?Sized>(width: usize, height: usize, rng: &mut R) -> Self {
        let width = odd_at_least(width);
        let height = odd_at_least(height);
        let mut maze = Self {
            width,
            height,
            walls: vec![true; width * height],
        };
        maze.carve(rng);
        maze
    }

    /// Build a maze from text rows (`#` = wall, anything else = open).
    ///
    /// Short rows are padded with wall; the outer border is not enforced, but
    /// out-of-range queries still read as wall.
    pub fn from_rows(rows: &[&str]) -> Self {
        let height = rows.len();
        let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0);
        let mut walls = vec![true; width * height];
        for (y, row) in rows.iter().enumerate() {
            for (x, ch) in row.chars().enumerate() {
                walls[y * width + x] = ch == '#';
            }
        }
        Self {
            width,
            height,
            walls,
        }
    }

    fn carve<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let mut visited = vec![false; self.walls.len()];
        let (sx, sy) = START_CELL;
        let start = self.index(sx, sy);
        visited[start] = true;
        self.walls[start] = false;

        let mut stack: Vec<(i32, i32)> = Vec::with_capacity(self.width * self.height / 4);
        stack.push(START_CELL);
        let mut candidates = Vec::with_capacity(4);

        while let Some(&(cx, cy)) = stack.last() {
            candidates.clear();
            for &((jx, jy), (wx, wy)) in &CARVE_DIRS {
                let (nx, ny) = (cx + jx, cy + jy);
                if self.in_carve_bounds(nx, ny) && !visited[self.index(nx, ny)] {
                    candidates.push(((nx, ny), (cx + wx, cy + wy)));
                }
            }

            match candidates.choose(rng) {
                Some(&((nx, ny), (mx, my))) => {
                    let mid = self.index(mx, my);
                    let next = self.index(nx, ny);
                    self.walls[mid] = false;
                    self.walls[next] = false;
                    visited[next] = true;
                    stack.push((nx, ny));
                }
                None => {
                    stack.pop();
                }
            }
        }

        // Odd dimensions put the exit on the lattice, so it is always carved.
        let (ex, ey) = self.exit();
        let exit = self.index(ex, ey);
        self.walls[exit] = false;
    }

    /// Walls strictly inside the border that separate two opposite open cells
    pub fn breakable_walls(&self) -> Vec<(i32, i32)> {
        let mut breakable = Vec::new();
        for y in 1..self.height as i32 - 1 {
            for x in 1..self.width as i32 - 1 {
                if !self.is_wall(x, y) {
                    continue;
                }
                let horizontal = !self.is_wall(x - 1, y) && !self.is_wall(x + 1, y);
                let vertical = !horizontal && !self.is_wall(x, y - 1) && !self.is_wall(x, y + 1);
                if horizontal || vertical {
                    breakable.push((x, y));
                }
            }
        }
        breakable
    }

    /// Open `floor(breakable * fraction)` randomly chosen breakable walls.
    ///
    /// Only ever removes walls. Returns how many were opened.
    pub fn inject_loops<R: Rng + ?Sized>(&mut self, loop_fraction: f32, rng: &mut R) -> usize {
        let fraction = if loop_fraction.is_finite() {
            loop_fraction.clamp(0.0, 0.999)
        } else {
            0.0
        };
        let mut breakable = self.breakable_walls();
        breakable.shuffle(rng);
        let count = (breakable.len() as f32 * fraction).floor() as usize;
        for &(x, y) in breakable.iter().take(count) {
            let idx = self.index(x, y);
            self.walls[idx] = false;
        }
        count
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Wall query; anything outside the grid is solid
    #[inline]
    pub fn is_wall(&self, x: i32, y: i32) -> bool {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return true;
        }
        self.walls[self.index(x, y)]
    }

    pub fn start(&self) -> (i32, i32) {
        START_CELL
    }

    /// Goal cell (bottom-right interior corner)
    pub fn exit(&self) -> (i32, i32) {
        (self.width as i32 - 2, self.height as i32 - 2)
    }

    /// All non-wall interior cells, row-major
    pub fn open_cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        let (w, h) = (self.width as i32, self.height as i32);
        (1..h - 1)
            .flat_map(move |y| (1..w - 1).map(move |x| (x, y)))
            .filter(move |&(x, y)| !self.is_wall(x, y))
    }

    /// Shortest path between two world positions (breadth-first, 4-directional).
    ///
    /// Returns cell centers from the first step after `from` up to and
    /// including the goal. Empty when already there, when either end is inside
    /// a wall, or when the goal is unreachable.
    pub fn solve_path(&self, from: Vec2, to: Vec2) -> Vec<Vec2> {
        let (sx, sy) = cell_of(from);
        let (gx, gy) = cell_of(to);
        if self.is_wall(sx, sy) || self.is_wall(gx, gy) || (sx, sy) == (gx, gy) {
            return Vec::new();
        }

        let start = self.index(sx, sy);
        let goal = self.index(gx, gy);
        let mut came_from: Vec<Option<usize>> = vec![None; self.walls.len()];
        let mut seen = vec![false; self.walls.len()];
        let mut queue = VecDeque::new();
        seen[start] = true;
        queue.push_back((sx, sy));

        while let Some((cx, cy)) = queue.pop_front() {
            let current = self.index(cx, cy);
            if current == goal {
                break;
            }
            for &(dx, dy) in &STEP_DIRS {
                let (nx, ny) = (cx + dx, cy + dy);
                if self.is_wall(nx, ny) {
                    continue;
                }
                let next = self.index(nx, ny);
                if !seen[next] {
                    seen[next] = true;
                    came_from[next] = Some(current);
                    queue.push_back((nx, ny));
                }
            }
        }

        if !seen[goal] {
            return Vec::new();
        }

        let mut path = Vec::new();
        let mut cursor = goal;
        while cursor != start {
            let x = (cursor % self.width) as i32;
            let y = (cursor / self.width) as i32;
            path.push(cell_center(x, y));
            match came_from[cursor] {
                Some(prev) => cursor = prev,
                None => return Vec::new(),
            }
        }
        path.reverse();
        path
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> usize {
        y as usize * self.width + x as usize
    }

    #[inline]
    fn in_carve_bounds(&self, x: i32, y: i32) -> bool {
        x > 0 && y > 0 && x < self.width as i32 - 1 && y < self.height as i32 - 1
    }
}

fn odd_at_least(n: usize) -> usize {
    n.max(MIN_MAZE_SIZE) | 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    /// Reference BFS distances from a cell (None = unreachable)
    fn distances(maze: &Maze, from: (i32, i32)) -> Vec<Option<usize>> {
        let mut dist = vec![None; maze.width * maze.height];
        let mut queue = VecDeque::new();
        dist[maze.index(from.0, from.1)] = Some(0);
        queue.push_back(from);
        while let Some((x, y)) = queue.pop_front() {
            let d = dist[maze.index(x, y)].unwrap_or(0);
            for (dx, dy) in STEP_DIRS {
                let (nx, ny) = (x + dx, y + dy);
                if !maze.is_wall(nx, ny) && dist[maze.index(nx, ny)].is_none() {
                    dist[maze.index(nx, ny)] = Some(d + 1);
                    queue.push_back((nx, ny));
                }
            }
        }
        dist
    }

    fn border_is_solid(maze: &Maze) -> bool {
        let (w, h) = (maze.width as i32, maze.height as i32);
        (0..w).all(|x| maze.is_wall(x, 0) && maze.is_wall(x, h - 1))
            && (0..h).all(|y| maze.is_wall(0, y) && maze.is_wall(w - 1, y))
    }

    fn all_open_reachable(maze: &Maze) -> bool {
        let dist = distances(maze, START_CELL);
        maze.open_cells().all(|(x, y)| dist[maze.index(x, y)].is_some())
    }

    #[test]
    fn test_dimensions_forced_odd() {
        let mut rng = Pcg32::seed_from_u64(1);
        let maze = Maze::generate(20, 4, 0.1, &mut rng);
        assert_eq!(maze.width(), 21);
        assert_eq!(maze.height(), 5);
    }

    #[test]
    fn test_start_and_exit_open() {
        let mut rng = Pcg32::seed_from_u64(7);
        let maze = Maze::generate(21, 21, 0.1, &mut rng);
        assert!(!maze.is_wall(1, 1));
        assert_eq!(maze.exit(), (19, 19));
        assert!(!maze.is_wall(19, 19));
    }

    #[test]
    fn test_out_of_range_is_wall() {
        let mut rng = Pcg32::seed_from_u64(3);
        let maze = Maze::generate(9, 9, 0.0, &mut rng);
        assert!(maze.is_wall(-1, 1));
        assert!(maze.is_wall(1, -1));
        assert!(maze.is_wall(9, 1));
        assert!(maze.is_wall(1, 9));
        assert!(maze.is_wall(i32::MAX, i32::MIN));
    }

    #[test]
    fn test_perfect_maze_is_a_tree() {
        let mut rng = Pcg32::seed_from_u64(42);
        let maze = Maze::perfect(31, 25, &mut rng);
        let open: Vec<_> = maze.open_cells().collect();
        // Count right/down adjacencies between open cells: a tree has V-1 edges.
        let edges = open
            .iter()
            .map(|&(x, y)| {
                usize::from(!maze.is_wall(x + 1, y)) + usize::from(!maze.is_wall(x, y + 1))
            })
            .sum::<usize>();
        assert_eq!(edges, open.len() - 1);
        // Every odd lattice cell is visited exactly once.
        let lattice = ((31 - 1) / 2) * ((25 - 1) / 2);
        let lattice_open = open.iter().filter(|(x, y)| x % 2 == 1 && y % 2 == 1).count();
        assert_eq!(lattice_open, lattice);
    }

    #[test]
    fn test_breakable_walls_separate_open_pairs() {
        let mut rng = Pcg32::seed_from_u64(9);
        let maze = Maze::perfect(21, 21, &mut rng);
        let breakable = maze.breakable_walls();
        assert!(!breakable.is_empty());
        for (x, y) in breakable {
            assert!(maze.is_wall(x, y));
            let horizontal = !maze.is_wall(x - 1, y) && !maze.is_wall(x + 1, y);
            let vertical = !maze.is_wall(x, y - 1) && !maze.is_wall(x, y + 1);
            assert!(horizontal || vertical);
        }
    }

    #[test]
    fn test_open_cells_row_major() {
        let maze = Maze::from_rows(&["#####", "#..##", "#.#.#", "#####"]);
        let cells: Vec<_> = maze.open_cells().collect();
        assert_eq!(cells, vec![(1, 1), (2, 1), (1, 2), (3, 2)]);
    }

    #[test]
    fn test_solve_path_simple_corridor() {
        let maze = Maze::from_rows(&["#######", "#.....#", "#######"]);
        let path = maze.solve_path(Vec2::new(1.5, 1.5), Vec2::new(5.2, 1.9));
        assert_eq!(path.len(), 4);
        assert_eq!(path.first().copied(), Some(Vec2::new(2.5, 1.5)));
        assert_eq!(path.last().copied(), Some(Vec2::new(5.5, 1.5)));
    }

    #[test]
    fn test_solve_path_unreachable_is_empty() {
        let maze = Maze::from_rows(&["#######", "#..#..#", "#######"]);
        assert!(maze.solve_path(Vec2::new(1.5, 1.5), Vec2::new(5.5, 1.5)).is_empty());
    }

    #[test]
    fn test_solve_path_same_cell_or_wall_is_empty() {
        let maze = Maze::from_rows(&["#####", "#...#", "#####"]);
        assert!(maze.solve_path(Vec2::new(1.2, 1.2), Vec2::new(1.8, 1.7)).is_empty());
        assert!(maze.solve_path(Vec2::new(0.5, 0.5), Vec2::new(3.5, 1.5)).is_empty());
    }

    #[test]
    fn test_solve_path_steps_are_adjacent() {
        let mut rng = Pcg32::seed_from_u64(11);
        let maze = Maze::generate(25, 25, 0.15, &mut rng);
        let start = cell_center(1, 1);
        let path = maze.solve_path(start, cell_center(23, 23));
        assert!(!path.is_empty());
        let mut prev = start;
        for p in &path {
            assert!((p.distance(prev) - 1.0).abs() < 1e-5);
            let (x, y) = cell_of(*p);
            assert!(!maze.is_wall(x, y));
            prev = *p;
        }
    }

    proptest! {
        #[test]
        fn prop_generated_mazes_connected(
            half_w in 2usize..16,
            half_h in 2usize..16,
            fraction in 0.0f32..0.99,
            seed in any::<u64>(),
        ) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let perfect = Maze::perfect(half_w * 2 + 1, half_h * 2 + 1, &mut rng);
            prop_assert!(border_is_solid(&perfect));
            prop_assert!(all_open_reachable(&perfect));

            let mut looped = perfect.clone();
            let breakable = looped.breakable_walls().len();
            let opened = looped.inject_loops(fraction, &mut rng);
            prop_assert!(opened <= (breakable as f32 * fraction).floor() as usize);
            prop_assert!(border_is_solid(&looped));
            prop_assert!(all_open_reachable(&looped));

            // Loop injection never closes anything that was open.
            let mut removed = 0;
            for y in 0..looped.height as i32 {
                for x in 0..looped.width as i32 {
                    if !perfect.is_wall(x, y) {
                        prop_assert!(!looped.is_wall(x, y));
                    } else if !looped.is_wall(x, y) {
                        removed += 1;
                    }
                }
            }
            prop_assert_eq!(removed, opened);
        }

        #[test]
        fn prop_solve_path_is_shortest(
            half in 2usize..14,
            fraction in 0.0f32..0.5,
            seed in any::<u64>(),
            pick in any::<prop::sample::Index>(),
        ) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let maze = Maze::generate(half * 2 + 1, half * 2 + 1, fraction, &mut rng);
            let open: Vec<_> = maze.open_cells().collect();
            let goal = open[pick.index(open.len())];
            let dist = distances(&maze, START_CELL);
            let expected = dist[maze.index(goal.0, goal.1)];
            let path = maze.solve_path(cell_center(1, 1), cell_center(goal.0, goal.1));
            prop_assert_eq!(Some(path.len()), expected);
        }
    }
}
