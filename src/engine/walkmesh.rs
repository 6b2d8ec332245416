// Walk-on-mesh navigation.
//
// An agent's position is a WalkPoint: a triangle plus barycentric weights.
// Each frame the caller supplies a world-space displacement; walk() consumes
// it along the surface, hopping across shared edges into neighbouring
// triangles and sliding along open boundary edges.
//
//   TriMesh ──► WalkMesh::new() ──► start(p) ──► walk(&mut wp, step) ──► world_point(&wp)
//                  (EdgeMap)        (closest)     (per frame)             (camera / render)

use glam::{UVec3, Vec3};
use log::{debug, warn};

use super::adjacency::{DuplicateEdgePolicy, EdgeMap};
use super::barycentric;
use super::error::{Result, WalkMeshError};
use super::mesh::{validate_indices, TriMesh};

// ============================================================================
// CONSTANTS
// ============================================================================

/// Fraction of the boundary triangle's median (edge midpoint → opposite
/// corner) added to a slide step. Keeps the slid point off the open edge
/// so float drift does not re-trigger the same crossing.
pub const DEFAULT_SLIDE_BIAS: f32 = 1e-6;

/// Safety valve: edge transitions allowed per walk() call, per triangle.
pub const DEFAULT_CROSSINGS_PER_TRIANGLE: usize = 3;

// ============================================================================
// CONFIG
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WalkConfig {
    pub duplicate_edges: DuplicateEdgePolicy,
    /// See `DEFAULT_SLIDE_BIAS`. Relative to triangle size, not absolute.
    pub slide_bias: f32,
    /// Transition cap per call = crossings_per_triangle × triangle count.
    pub crossings_per_triangle: usize,
}

impl Default for WalkConfig {
    fn default() -> Self {
        Self {
            duplicate_edges: DuplicateEdgePolicy::Overwrite,
            slide_bias: DEFAULT_SLIDE_BIAS,
            crossings_per_triangle: DEFAULT_CROSSINGS_PER_TRIANGLE,
        }
    }
}

// ============================================================================
// WALK POINT
// ============================================================================

/// Position on the walk mesh surface.
///
/// `weights[i]` belongs to vertex `triangle[i]`. For a seeded point the
/// weights lie in [0,1] and sum to 1. Weight 0 puts the point on the edge
/// opposite that vertex; weight 1 puts it on the vertex.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WalkPoint {
    pub triangle: UVec3,
    pub weights: Vec3,
}

impl WalkPoint {
    pub fn new(triangle: UVec3, weights: Vec3) -> Self {
        Self { triangle, weights }
    }

    /// False for the unseeded sentinel produced by `Default`.
    pub fn is_valid(&self) -> bool {
        self.weights.is_finite() && self.triangle != UVec3::MAX
    }
}

impl Default for WalkPoint {
    /// Sentinel for an agent that has not been placed on a mesh yet.
    fn default() -> Self {
        Self {
            triangle: UVec3::MAX,
            weights: Vec3::NAN,
        }
    }
}

// ============================================================================
// EDGE CROSSING
// ============================================================================

/// Where a single in-triangle step leaves its triangle.
#[derive(Debug, Clone, Copy)]
struct Crossing {
    /// Fraction of the step consumed before reaching the edge, in [0,1).
    t: f32,
    /// Crossed edge as positions (0..3) into the current triangle, in
    /// winding order so that (triangle[a], triangle[b]) is an owned edge.
    edge: (usize, usize),
    /// Position of the vertex not on the crossed edge.
    corner: usize,
}

/// Earliest point in [0,1) at which `weights + t·delta` leaves [0,1]³.
///
/// A weight dropping below zero exits through the opposite edge. A weight
/// rising above one means the path runs through that vertex; the exit edge
/// is the one whose far vertex's weight falls more slowly (the faster-falling
/// vertex becomes the opposite corner).
fn earliest_crossing(weights: Vec3, delta: Vec3) -> Option<Crossing> {
    let target = weights + delta;
    let mut best: Option<Crossing> = None;
    let mut best_t = 1.0f32;

    for i in 0..3 {
        let next = (i + 1) % 3;
        let prev = (i + 2) % 3;

        if target[i] < 0.0 {
            let t = (weights[i] / delta[i]).abs();
            if t < best_t {
                best_t = t;
                best = Some(Crossing { t, edge: (next, prev), corner: i });
            }
        } else if target[i] > 1.0 {
            let t = ((1.0 - weights[i]) / delta[i]).abs();
            if t < best_t {
                best_t = t;
                let crossing = if delta[next] > delta[prev] {
                    Crossing { t, edge: (i, next), corner: prev }
                } else {
                    Crossing { t, edge: (prev, i), corner: next }
                };
                best = Some(crossing);
            }
        }
    }
    best
}

// ============================================================================
// WALK MESH
// ============================================================================

/// Static walkable surface. Build once, then share read-only between agents.
#[derive(Debug, Clone)]
pub struct WalkMesh {
    pub vertices: Vec<Vec3>,
    pub triangles: Vec<UVec3>,
    next_vertex: EdgeMap,
    config: WalkConfig,
}

impl WalkMesh {
    /// Build with the default `WalkConfig`.
    pub fn new(vertices: Vec<Vec3>, triangles: Vec<UVec3>) -> Result<Self> {
        Self::with_config(vertices, triangles, WalkConfig::default())
    }

    pub fn with_config(vertices: Vec<Vec3>, triangles: Vec<UVec3>, config: WalkConfig) -> Result<Self> {
        validate_indices(&vertices, &triangles)?;
        let next_vertex = EdgeMap::build(&triangles, config.duplicate_edges)?;
        debug!(
            "walk mesh: {} vertices, {} triangles, {} open edges",
            vertices.len(),
            triangles.len(),
            next_vertex.boundary_edges().count()
        );
        Ok(Self { vertices, triangles, next_vertex, config })
    }

    pub fn from_tri_mesh(mesh: TriMesh, config: WalkConfig) -> Result<Self> {
        Self::with_config(mesh.positions, mesh.triangles, config)
    }

    pub fn edges(&self) -> &EdgeMap { &self.next_vertex }
    pub fn config(&self) -> &WalkConfig { &self.config }

    #[inline]
    fn corners(&self, tri: UVec3) -> [Vec3; 3] {
        [
            self.vertices[tri.x as usize],
            self.vertices[tri.y as usize],
            self.vertices[tri.z as usize],
        ]
    }

    /// WalkPoint on the surface closest to `world_point`.
    ///
    /// Linear scan over all triangles; meant for seeding, not per frame.
    /// Ties keep the first triangle in storage order.
    pub fn start(&self, world_point: Vec3) -> Result<WalkPoint> {
        let mut closest: Option<(f32, WalkPoint)> = None;
        for &tri in &self.triangles {
            let corners = self.corners(tri);
            let weights = barycentric::closest(&corners, world_point);
            let dist_sq = barycentric::interpolate(&corners, weights).distance_squared(world_point);
            if closest.is_none_or(|(best, _)| dist_sq < best) {
                closest = Some((dist_sq, WalkPoint::new(tri, weights)));
            }
        }
        closest.map(|(_, wp)| wp).ok_or(WalkMeshError::EmptyMesh)
    }

    /// World-space position of a WalkPoint.
    ///
    /// `wp` must be seeded (`is_valid()`); the unseeded sentinel indexes
    /// past the vertex list.
    #[inline]
    pub fn world_point(&self, wp: &WalkPoint) -> Vec3 {
        barycentric::interpolate(&self.corners(wp.triangle), wp.weights)
    }

    /// Unit normal of the WalkPoint's triangle, following its winding.
    /// Same precondition as `world_point`.
    pub fn world_normal(&self, wp: &WalkPoint) -> Vec3 {
        let [a, b, c] = self.corners(wp.triangle);
        (b - a).cross(c - a).normalize_or_zero()
    }

    /// Move `wp` by `step` along the surface.
    ///
    /// Each iteration projects the remaining step into the current triangle.
    /// If it leaves through a shared edge the point hops to the neighbour and
    /// the leftover step is re-projected there (rotating it onto the new
    /// plane). If it leaves through an open edge the leftover is replaced by
    /// its component along that edge, once per call; after any transition a
    /// further open edge simply stops the point.
    ///
    /// An unseeded point is left untouched.
    pub fn walk(&self, wp: &mut WalkPoint, step: Vec3) {
        if !wp.is_valid() {
            warn!("walk: ignoring unseeded walk point");
            return;
        }
        let max_transitions = (self.config.crossings_per_triangle * self.triangles.len()).max(1);
        let mut step = step;
        let mut on_edge = false;

        for _ in 0..max_transitions {
            let corners = self.corners(wp.triangle);
            let target = barycentric::project(&corners, barycentric::interpolate(&corners, wp.weights) + step);
            let delta = target - wp.weights;

            let Some(crossing) = earliest_crossing(wp.weights, delta) else {
                wp.weights = target;
                return;
            };

            wp.weights += delta * crossing.t;
            let remaining = step * (1.0 - crossing.t);
            let edge_a = wp.triangle[crossing.edge.0];
            let edge_b = wp.triangle[crossing.edge.1];

            match self.next_vertex.opposite(edge_b, edge_a) {
                Some(third) => {
                    // Neighbour owns (edge_b, edge_a); point sits on that edge.
                    let along = wp.weights[crossing.edge.1];
                    debug!(
                        "walk: crossed ({edge_a}, {edge_b}) at t={:.4} into ({edge_b}, {edge_a}, {third})",
                        crossing.t
                    );
                    wp.triangle = UVec3::new(edge_b, edge_a, third);
                    wp.weights = Vec3::new(along, 1.0 - along, 0.0);
                    step = remaining;
                    on_edge = true;
                }
                None if !on_edge => {
                    let a = self.vertices[edge_a as usize];
                    let b = self.vertices[edge_b as usize];
                    let edge = a - b;
                    let median = self.vertices[wp.triangle[crossing.corner] as usize] - (a + b) * 0.5;
                    debug!("walk: sliding along open edge ({edge_a}, {edge_b})");
                    step = edge * (remaining.dot(edge) / edge.dot(edge)) + median * self.config.slide_bias;
                    on_edge = true;
                }
                None => return,
            }
        }

        warn!(
            "walk: gave up after {} edge transitions (triangle {:?})",
            max_transitions, wp.triangle
        );
    }
}
