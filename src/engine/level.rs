// Procedural platform level → walk mesh geometry.
//
// The level is a 3D grid of cells (x, y, level). Each used cell is either a
// flat square or a slope joining two levels. Every cell corner maps to a
// shared lattice vertex, so neighbouring platforms stitch into one connected
// walk mesh without any welding pass.
//
// Layout is grown breadth-first from a start cell with random turns and
// random elevation changes, then dead ends get buttons and bridges.
// All randomness comes from the caller's generator (seed it for replays).

use std::collections::VecDeque;

use glam::{IVec2, IVec3, Vec3};
use log::{debug, info};
use rand::seq::SliceRandom;
use rand::Rng;

use super::mesh::TriMesh;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Number of cells along X.
pub const MAP_WIDTH: u32 = 20;
/// Number of cells along Y.
pub const MAP_HEIGHT: u32 = 20;
/// Number of stacked levels.
pub const MAP_LEVELS: u32 = 10;
/// World height (Z) between consecutive levels.
pub const LEVEL_HEIGHT: f32 = 0.5;
/// Dead ends turned into button platforms.
pub const BUTTON_COUNT: usize = 5;

// ============================================================================
// CONFIG
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelConfig {
    pub width: u32,
    pub height: u32,
    pub levels: u32,
    pub level_height: f32,
    /// Cell the flood starts from: (x, y, level).
    pub start: IVec3,
    pub buttons: usize,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            width: MAP_WIDTH,
            height: MAP_HEIGHT,
            levels: MAP_LEVELS,
            level_height: LEVEL_HEIGHT,
            start: IVec3::new(MAP_WIDTH as i32 / 2, MAP_HEIGHT as i32 / 2, 2),
            buttons: BUTTON_COUNT,
        }
    }
}

// ============================================================================
// TYPES
// ============================================================================

/// Grid direction on the XY plane. Z is up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// +Y
    Up,
    /// −Y
    Down,
    /// −X
    Left,
    /// +X
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::Up, Direction::Down, Direction::Left, Direction::Right];

    pub fn offset(self) -> IVec2 {
        match self {
            Direction::Up => IVec2::Y,
            Direction::Down => IVec2::NEG_Y,
            Direction::Left => IVec2::NEG_X,
            Direction::Right => IVec2::X,
        }
    }

    pub fn reverse(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// True if the cell corner at (dx, dy) ∈ {0,1}² lies on this side of the cell.
    fn owns_corner(self, dx: i32, dy: i32) -> bool {
        match self {
            Direction::Up => dy == 1,
            Direction::Down => dy == 0,
            Direction::Left => dx == 0,
            Direction::Right => dx == 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellKind {
    #[default]
    Empty,
    Flat,
    Slope,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformShape {
    Flat,
    /// Rises one level toward the given direction.
    Slope(Direction),
}

/// One placed platform, for whoever draws the level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Platform {
    /// (x, y, level) of the platform's lower level.
    pub cell: IVec3,
    pub shape: PlatformShape,
    /// World-space centre of the walkable surface.
    pub center: Vec3,
}

/// Generator output.
#[derive(Debug, Clone)]
pub struct Level {
    pub mesh: TriMesh,
    pub platforms: Vec<Platform>,
    /// World positions of button platforms (surface centres).
    pub buttons: Vec<Vec3>,
    /// Surface centre of the start cell.
    pub spawn: Vec3,
}

// ============================================================================
// GRID
// ============================================================================

/// Dense (x, y, level) grid. Out-of-range lookups return `None`.
struct Grid<T> {
    cells: Vec<T>,
    size: IVec3,
}

impl<T: Copy + Default> Grid<T> {
    fn new(config: &LevelConfig) -> Self {
        let size = IVec3::new(config.width as i32, config.height as i32, config.levels as i32);
        Self {
            cells: vec![T::default(); (size.x * size.y * size.z) as usize],
            size,
        }
    }

    fn index(&self, p: IVec3) -> Option<usize> {
        let inside = p.cmpge(IVec3::ZERO).all() && p.cmplt(self.size).all();
        inside.then(|| ((p.z * self.size.y + p.y) * self.size.x + p.x) as usize)
    }

    fn get(&self, p: IVec3) -> Option<T> {
        self.index(p).map(|i| self.cells[i])
    }

    fn set(&mut self, p: IVec3, value: T) {
        if let Some(i) = self.index(p) {
            self.cells[i] = value;
        }
    }
}

// ============================================================================
// GENERATOR
// ============================================================================

struct Generator<'r, R: Rng> {
    config: LevelConfig,
    occupied: Grid<bool>,
    kinds: Grid<CellKind>,
    mesh: TriMesh,
    platforms: Vec<Platform>,
    rng: &'r mut R,
}

impl<'r, R: Rng> Generator<'r, R> {
    fn new(config: LevelConfig, rng: &'r mut R) -> Self {
        // Full vertex lattice for every level; unused vertices are harmless.
        let mut mesh = TriMesh::new();
        for level in 0..config.levels {
            for j in 0..=config.height {
                for i in 0..=config.width {
                    mesh.add_vertex(Vec3::new(i as f32, j as f32, level as f32 * config.level_height));
                }
            }
        }
        Self {
            occupied: Grid::new(&config),
            kinds: Grid::new(&config),
            config,
            mesh,
            platforms: Vec::new(),
            rng,
        }
    }

    /// Lattice vertex at cell corner (x, y) on the given level.
    fn lattice(&self, x: i32, y: i32, level: i32) -> u32 {
        let row = self.config.width as i32 + 1;
        let layer = row * (self.config.height as i32 + 1);
        (level * layer + y * row + x) as u32
    }

    /// Emit the cell's two triangles. `lift(dx, dy)` raises a corner one level.
    fn add_cell_triangles(&mut self, cell: IVec3, lift: impl Fn(i32, i32) -> bool) {
        let corner = |dx: i32, dy: i32| {
            let level = cell.z + i32::from(lift(dx, dy));
            self.lattice(cell.x + dx, cell.y + dy, level)
        };
        let (a, b, c, d) = (corner(0, 0), corner(1, 0), corner(0, 1), corner(1, 1));
        self.mesh.add_triangle(a, b, c);
        self.mesh.add_triangle(b, d, c);
    }

    fn surface_center(&self, cell: IVec3, rise: f32) -> Vec3 {
        Vec3::new(
            cell.x as f32 + 0.5,
            cell.y as f32 + 0.5,
            (cell.z as f32 + rise) * self.config.level_height,
        )
    }

    fn add_square(&mut self, cell: IVec3) -> Vec3 {
        self.add_cell_triangles(cell, |_, _| false);
        self.kinds.set(cell, CellKind::Flat);
        let center = self.surface_center(cell, 0.0);
        self.platforms.push(Platform { cell, shape: PlatformShape::Flat, center });
        debug!("level: flat square at {cell}");
        center
    }

    /// Slope occupying `cell`, rising from `cell.z` to `cell.z + 1` toward `dir`.
    fn add_slope(&mut self, cell: IVec3, dir: Direction) {
        self.add_cell_triangles(cell, |dx, dy| dir.owns_corner(dx, dy));
        self.kinds.set(cell, CellKind::Slope);
        self.kinds.set(cell + IVec3::Z, CellKind::Slope);
        let center = self.surface_center(cell, 0.5);
        self.platforms.push(Platform { cell, shape: PlatformShape::Slope(dir), center });
        debug!("level: slope at {cell} rising {dir:?}");
    }

    fn is_wall(&self, p: IVec3) -> bool {
        self.occupied.get(p).unwrap_or(true)
    }

    fn is_free(&self, p: IVec3) -> bool {
        !self.occupied.get(p).unwrap_or(false)
    }

    /// Occupy a cell and the cells directly above and below it.
    fn mark_column(&mut self, p: IVec3) {
        self.occupied.set(p, true);
        self.occupied.set(p - IVec3::Z, true);
        self.occupied.set(p + IVec3::Z, true);
    }

    /// Can the path step from `p` one cell toward `dir` on `p`'s level?
    /// The target must be open, and so must the two cells beside it and the
    /// three cells beyond it, so corridors never touch sideways.
    fn is_free_move(&self, p: IVec3, dir: Direction) -> bool {
        let fwd = dir.offset().extend(0);
        let side = IVec3::new(fwd.y, fwd.x, 0);
        let target = p + fwd;
        if self.is_wall(target) {
            return false;
        }
        let ahead = target + fwd;
        [target + side, target - side, ahead, ahead + side, ahead - side]
            .into_iter()
            .all(|q| self.is_free(q))
    }

    /// Breadth-first corridor growth from `start`. Returns dead-end cells.
    fn grow(&mut self, start: IVec3) -> Vec<IVec3> {
        let mut dead_ends = Vec::new();
        if self.is_wall(start) {
            return dead_ends;
        }
        self.mark_column(start);

        let mut queue = VecDeque::from([start]);
        while let Some(p) = queue.pop_front() {
            let mut dirs = Direction::ALL;
            dirs.shuffle(&mut *self.rng);

            let mut paths = 0;
            for dir in dirs {
                if !self.is_free_move(p, dir) {
                    continue;
                }
                paths += 1;
                let fwd = dir.offset().extend(0);
                let next = p + fwd;

                let mut elevations = [-1, 0, 0, 1];
                elevations.shuffle(&mut *self.rng);
                for choice in elevations {
                    if choice == 0 {
                        self.mark_column(next);
                        queue.push_back(next);
                        break;
                    }
                    let new_z = p.z + choice;
                    if new_z < 0 || new_z >= self.config.levels as i32 {
                        continue;
                    }
                    let raised = IVec3::new(p.x, p.y, new_z);
                    let next_raised = IVec3::new(next.x, next.y, new_z);
                    if !(self.is_free_move(raised, dir) && self.is_free_move(next_raised, dir)) {
                        continue;
                    }

                    if choice < 0 {
                        self.add_slope(next_raised, dir.reverse());
                    } else {
                        self.add_slope(next, dir);
                    }
                    for z in [p.z, new_z, p.z - choice, new_z + choice] {
                        self.occupied.set(IVec3::new(next.x, next.y, z), true);
                    }

                    let landing = next_raised + fwd;
                    self.mark_column(landing);
                    queue.push_back(landing);
                    break;
                }
            }

            if paths == 0 {
                dead_ends.push(p);
            } else {
                self.add_square(p);
            }
        }
        dead_ends
    }

    /// Try to link a dead end to an existing flat platform two cells away.
    fn bridge(&mut self, end: IVec3) {
        let dir = Direction::ALL[self.rng.gen_range(0..Direction::ALL.len())];
        let fwd = dir.offset().extend(0);
        let target = end + fwd;
        let far = target + fwd;

        let in_map = far.x >= 0 && far.y >= 0
            && far.x < self.config.width as i32
            && far.y < self.config.height as i32;
        if !in_map || !self.is_free(target) {
            return;
        }

        for z in [end.z, end.z - 1, end.z + 1] {
            if z < 0 || z >= self.config.levels as i32 {
                continue;
            }
            let at = IVec3::new(target.x, target.y, z);
            let far_at = IVec3::new(far.x, far.y, z);
            if !self.is_free(at) || self.kinds.get(far_at) != Some(CellKind::Flat) {
                continue;
            }

            self.mark_column(target);
            if z == end.z {
                self.add_square(at);
            } else if z < end.z {
                self.add_slope(at, dir.reverse());
                self.occupied.set(at - IVec3::Z, true);
            } else {
                self.add_slope(target, dir);
                self.occupied.set(at + IVec3::Z, true);
            }
            debug!("level: bridged dead end {end} toward {dir:?}");
            return;
        }
    }
}

// ============================================================================
// PUBLIC API
// ============================================================================

/// Generate a platform level.
///
/// The start cell always becomes a platform, so the mesh is never empty.
pub fn generate<R: Rng>(config: &LevelConfig, rng: &mut R) -> Level {
    let mut generator = Generator::new(*config, rng);
    let mut dead_ends = generator.grow(config.start);

    dead_ends.shuffle(&mut *generator.rng);
    let button_count = config.buttons.min(dead_ends.len());
    let mut buttons = Vec::with_capacity(button_count);
    for cell in dead_ends.drain(..button_count) {
        buttons.push(generator.add_square(cell));
    }
    for &cell in &dead_ends {
        generator.add_square(cell);
    }
    for &cell in &dead_ends {
        generator.bridge(cell);
    }

    let spawn = generator.surface_center(config.start, 0.0);
    info!(
        "level: {} platforms, {} triangles, {} buttons",
        generator.platforms.len(),
        generator.mesh.triangle_count(),
        buttons.len()
    );

    Level {
        mesh: generator.mesh,
        platforms: generator.platforms,
        buttons,
        spawn,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::walkmesh::{WalkConfig, WalkMesh};
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn level(seed: u64) -> Level {
        generate(&LevelConfig::default(), &mut StdRng::seed_from_u64(seed))
    }

    #[test]
    fn same_seed_same_level() {
        let a = level(42);
        let b = level(42);
        assert_eq!(a.mesh.triangles, b.mesh.triangles);
        assert_eq!(a.buttons, b.buttons);
    }

    #[test]
    fn lattice_covers_every_level() {
        let config = LevelConfig::default();
        let lvl = level(1);
        let expected = (config.width + 1) * (config.height + 1) * config.levels;
        assert_eq!(lvl.mesh.vertex_count(), expected as usize);
        assert!(lvl.mesh.validate().is_ok());
    }

    #[test]
    fn two_triangles_per_platform() {
        for seed in 0..8 {
            let lvl = level(seed);
            assert!(!lvl.platforms.is_empty());
            assert_eq!(lvl.mesh.triangle_count(), lvl.platforms.len() * 2);
        }
    }

    #[test]
    fn buttons_sit_on_flat_platforms() {
        for seed in 0..8 {
            let lvl = level(seed);
            assert!(lvl.buttons.len() <= BUTTON_COUNT);
            for button in &lvl.buttons {
                assert!(lvl
                    .platforms
                    .iter()
                    .any(|p| p.shape == PlatformShape::Flat && p.center == *button));
            }
        }
    }

    #[test]
    fn spawn_lies_on_the_walk_mesh() {
        let lvl = level(3);
        let mesh = WalkMesh::from_tri_mesh(lvl.mesh, WalkConfig::default()).unwrap();
        let wp = mesh.start(lvl.spawn).unwrap();
        assert_relative_eq!(mesh.world_point(&wp).distance(lvl.spawn), 0.0, epsilon = 1e-5);
    }

    #[test]
    fn random_walk_on_generated_level_stays_valid() {
        let lvl = level(11);
        let mesh = WalkMesh::from_tri_mesh(lvl.mesh, WalkConfig::default()).unwrap();
        let mut wp = mesh.start(lvl.spawn).unwrap();
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..400 {
            let step = Vec3::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0), 0.0) * 0.05;
            mesh.walk(&mut wp, step);
            assert_relative_eq!(wp.weights.element_sum(), 1.0, epsilon = 1e-4);
            assert!(mesh.world_point(&wp).is_finite());
        }
    }

    #[test]
    fn slope_lifts_corners_on_its_side() {
        let config = LevelConfig::default();
        let mut rng = StdRng::seed_from_u64(0);
        let mut generator = Generator::new(config, &mut rng);
        generator.add_slope(IVec3::new(3, 4, 1), Direction::Up);

        let heights: Vec<f32> = generator.mesh.triangles[0]
            .to_array()
            .iter()
            .map(|&i| generator.mesh.positions[i as usize].z)
            .collect();
        // Triangle (a, b, c): a and b on the low row, c on the lifted row.
        assert_eq!(heights, vec![0.5, 0.5, 1.0]);
        assert_eq!(generator.kinds.get(IVec3::new(3, 4, 1)), Some(CellKind::Slope));
        assert_eq!(generator.kinds.get(IVec3::new(3, 4, 2)), Some(CellKind::Slope));
    }

    #[test]
    fn moves_off_the_map_are_blocked() {
        let config = LevelConfig::default();
        let mut rng = StdRng::seed_from_u64(0);
        let generator = Generator::new(config, &mut rng);
        assert!(!generator.is_free_move(IVec3::new(0, 5, 0), Direction::Left));
        assert!(generator.is_free_move(IVec3::new(5, 5, 0), Direction::Left));
    }

    #[test]
    fn occupied_neighbours_block_moves() {
        let config = LevelConfig::default();
        let mut rng = StdRng::seed_from_u64(0);
        let mut generator = Generator::new(config, &mut rng);
        // Cell beside the target of a +X move from (5,5).
        generator.occupied.set(IVec3::new(6, 6, 0), true);
        assert!(!generator.is_free_move(IVec3::new(5, 5, 0), Direction::Right));
        assert!(generator.is_free_move(IVec3::new(5, 5, 0), Direction::Left));
    }

    #[test]
    fn direction_reverse_round_trips() {
        for dir in Direction::ALL {
            assert_eq!(dir.reverse().reverse(), dir);
            assert_eq!(dir.offset() + dir.reverse().offset(), IVec2::ZERO);
        }
    }
}
