// 🎯 Centric Layout Engine - Queried account in the middle, counterparties around it

use crate::graph::NetworkGraph;
use serde::{Deserialize, Serialize};
use std::f64::consts::{PI, TAU};

// ============================================================================
// GEOMETRY
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }

    pub fn midpoint(self, other: Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    /// Three quarters of the way from `self` to `other`: `(3 * other + self) / 4`
    pub fn three_quarters_to(self, other: Point) -> Point {
        Point::new((other.x * 3.0 + self.x) / 4.0, (other.y * 3.0 + self.y) / 4.0)
    }

    fn length(self) -> f64 {
        self.x.hypot(self.y)
    }
}

/// Final coordinate of one account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodePosition {
    pub node_id: String,
    pub x: f64,
    pub y: f64,
}

impl NodePosition {
    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

// ============================================================================
// RINGS
// ============================================================================

/// Ring 0 is the queried account, ring 1 every other account in the universe.
#[derive(Debug, Clone, PartialEq)]
pub struct Rings {
    pub center: String,
    pub outer: Vec<String>,
}

impl Rings {
    pub fn new(universe: &[String], queried: &str) -> Self {
        Rings {
            center: queried.to_string(),
            outer: universe
                .iter()
                .filter(|id| id.as_str() != queried)
                .cloned()
                .collect(),
        }
    }

    pub fn counterpart_count(&self) -> usize {
        self.outer.len()
    }

    /// No counterparties: nothing to lay out
    pub fn is_isolated(&self) -> bool {
        self.outer.is_empty()
    }

    pub fn shells(&self) -> Vec<Vec<String>> {
        vec![vec![self.center.clone()], self.outer.clone()]
    }
}

// ============================================================================
// LAYOUT ENGINES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutKind {
    Shell,
    Spring,
}

impl LayoutKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LayoutKind::Shell => "shell",
            LayoutKind::Spring => "spring",
        }
    }
}

/// Places every node of a graph in the plane.
///
/// Returned points are indexed like `NetworkGraph::nodes`.
pub trait LayoutEngine {
    fn kind(&self) -> LayoutKind;

    fn place(&self, graph: &NetworkGraph, rings: &Rings) -> Vec<Point>;
}

/// Concentric shells, innermost first.
#[derive(Debug, Clone)]
pub struct ShellLayout {
    pub scale: f64,
}

impl Default for ShellLayout {
    fn default() -> Self {
        ShellLayout { scale: 1.0 }
    }
}

impl LayoutEngine for ShellLayout {
    fn kind(&self) -> LayoutKind {
        LayoutKind::Shell
    }

    fn place(&self, graph: &NetworkGraph, rings: &Rings) -> Vec<Point> {
        let mut points = vec![Point::ORIGIN; graph.node_count()];
        let shells = rings.shells();

        let shell_count = shells.len() as f64;
        let radius_bump = self.scale / shell_count;
        let rotate = PI / shell_count;

        // a lone innermost node sits on the center
        let mut radius = if shells[0].len() == 1 { 0.0 } else { radius_bump };
        let mut first_theta = rotate;

        for shell in &shells {
            let n = shell.len() as f64;
            for (i, id) in shell.iter().enumerate() {
                let Some(index) = graph.node_index(id) else {
                    continue;
                };
                let theta = TAU * i as f64 / n + first_theta;
                points[index] = Point::new(radius * theta.cos(), radius * theta.sin());
            }
            radius += radius_bump;
            first_theta += rotate;
        }

        points
    }
}

/// Force-directed (Fruchterman-Reingold) placement.
///
/// Starts from positions hashed from the account ids, so the same graph
/// always lands in the same place.
#[derive(Debug, Clone)]
pub struct SpringLayout {
    pub iterations: usize,
    pub threshold: f64,
    pub scale: f64,
}

impl Default for SpringLayout {
    fn default() -> Self {
        SpringLayout {
            iterations: 50,
            threshold: 1e-4,
            scale: 1.0,
        }
    }
}

impl LayoutEngine for SpringLayout {
    fn kind(&self) -> LayoutKind {
        LayoutKind::Spring
    }

    fn place(&self, graph: &NetworkGraph, _rings: &Rings) -> Vec<Point> {
        let n = graph.node_count();
        if n == 0 {
            return Vec::new();
        }
        if n == 1 {
            return vec![Point::ORIGIN];
        }

        let mut adjacency = vec![vec![0.0_f64; n]; n];
        for (source, target) in graph.edge_pairs() {
            if source == target {
                continue;
            }
            adjacency[source][target] += 1.0;
            adjacency[target][source] += 1.0;
        }

        let mut positions = graph
            .nodes
            .iter()
            .map(|node| {
                let (x, y) = stable_pair(&node.id);
                Point::new(x, y)
            })
            .collect::<Vec<_>>();

        let k = 1.0 / (n as f64).sqrt();
        let mut temperature = initial_temperature(&positions);
        let cooling = temperature / (self.iterations as f64 + 1.0);

        for _ in 0..self.iterations {
            let mut disp = vec![Point::ORIGIN; n];

            for i in 0..n {
                for j in 0..n {
                    if i == j {
                        continue;
                    }
                    let dx = positions[i].x - positions[j].x;
                    let dy = positions[i].y - positions[j].y;
                    let distance = dx.hypot(dy).max(0.01);
                    let force = k * k / (distance * distance) - adjacency[i][j] * distance / k;
                    disp[i].x += dx * force;
                    disp[i].y += dy * force;
                }
            }

            let mut moved = 0.0;
            for i in 0..n {
                let length = disp[i].length().max(0.01);
                let step = Point::new(
                    disp[i].x * temperature / length,
                    disp[i].y * temperature / length,
                );
                positions[i].x += step.x;
                positions[i].y += step.y;
                moved += step.length();
            }

            temperature -= cooling;
            if moved / (n as f64) < self.threshold {
                break;
            }
        }

        rescale(&mut positions, self.scale);
        positions
    }
}

fn initial_temperature(positions: &[Point]) -> f64 {
    let (mut min_x, mut max_x) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut min_y, mut max_y) = (f64::INFINITY, f64::NEG_INFINITY);
    for p in positions {
        min_x = min_x.min(p.x);
        max_x = max_x.max(p.x);
        min_y = min_y.min(p.y);
        max_y = max_y.max(p.y);
    }

    let span = (max_x - min_x).max(max_y - min_y);
    if span > 0.0 {
        span * 0.1
    } else {
        0.1
    }
}

/// Center on the mean and scale so the largest |coordinate| equals `scale`.
fn rescale(positions: &mut [Point], scale: f64) {
    let n = positions.len() as f64;
    let mean_x = positions.iter().map(|p| p.x).sum::<f64>() / n;
    let mean_y = positions.iter().map(|p| p.y).sum::<f64>() / n;

    let mut limit = 0.0_f64;
    for p in positions.iter_mut() {
        p.x -= mean_x;
        p.y -= mean_y;
        limit = limit.max(p.x.abs()).max(p.y.abs());
    }

    if limit > 0.0 {
        for p in positions.iter_mut() {
            p.x *= scale / limit;
            p.y *= scale / limit;
        }
    }
}

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// 64-bit FNV-1a; fixed across toolchains, unlike `DefaultHasher`
fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(FNV_OFFSET, |hash, &byte| {
        (hash ^ u64::from(byte)).wrapping_mul(FNV_PRIME)
    })
}

/// Deterministic pseudo-random point in `[0, 1) x [0, 1)`
fn stable_pair(id: &str) -> (f64, f64) {
    let hash = fnv1a(id.as_bytes());

    let x = (hash & 0xffff_ffff) as f64 / (u32::MAX as f64 + 1.0);
    let y = ((hash >> 32) & 0xffff_ffff) as f64 / (u32::MAX as f64 + 1.0);
    (x, y)
}

// ============================================================================
// CENTRIC LAYOUT
// ============================================================================

/// Positions for every node, plus which engine produced them
#[derive(Debug, Clone)]
pub struct Layout {
    pub kind: LayoutKind,
    pub points: Vec<Point>,
}

impl Layout {
    pub fn point(&self, index: usize) -> Point {
        self.points.get(index).copied().unwrap_or(Point::ORIGIN)
    }

    pub fn node_positions(&self, graph: &NetworkGraph) -> Vec<NodePosition> {
        graph
            .nodes
            .iter()
            .enumerate()
            .map(|(index, node)| {
                let p = self.point(index);
                NodePosition {
                    node_id: node.id.clone(),
                    x: p.x,
                    y: p.y,
                }
            })
            .collect()
    }
}

/// Shells for more than one counterparty, spring otherwise.
///
/// Exactly one counterparty still goes to the spring engine; the threshold
/// is `> 1`, not `>= 1`.
pub fn select_engine(counterparts: usize) -> Box<dyn LayoutEngine> {
    if counterparts > 1 {
        Box::new(ShellLayout::default())
    } else {
        Box::new(SpringLayout::default())
    }
}

pub fn centric_layout(graph: &NetworkGraph, rings: &Rings) -> Layout {
    let engine = select_engine(rings.counterpart_count());
    log::debug!(
        "laying out {} nodes around {} with {} engine",
        graph.node_count(),
        rings.center,
        engine.kind().as_str()
    );

    Layout {
        kind: engine.kind(),
        points: engine.place(graph, rings),
    }
}
