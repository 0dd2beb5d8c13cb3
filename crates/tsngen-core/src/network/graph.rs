//! Switch-level graph construction. Every strategy produces an undirected graph with exactly
//! `nr_switches` nodes; the randomized strategies resample with a strictly larger connectivity
//! parameter until the result is connected, which bounds the retry loops by construction.

use derivative::Derivative;
use itertools::Itertools;
use petgraph::algo::connected_components;
use petgraph::graph::{NodeIndex, UnGraph};
use rand::prelude::*;

use crate::spec::SpecError;

/// Added to the connection radius of [`GraphKind::RandomGeometric`] after a disconnected
/// sample.
const RADIUS_STEP: f64 = 0.1;

/// Added to the edge probability of [`GraphKind::Binomial`] after a disconnected sample.
const PROBABILITY_STEP: f64 = 0.1;

pub(crate) type SwitchGraph = UnGraph<(), ()>;

/// The switch-graph construction strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Derivative, serde::Serialize, serde::Deserialize)]
#[derivative(Default)]
#[serde(rename_all = "snake_case")]
pub enum GraphKind {
    /// Every switch connects to exactly two neighbors in a closed loop.
    #[derivative(Default)]
    #[serde(alias = "ring")]
    Cycle,
    /// An open chain.
    Path,
    /// The smallest rectangular grid holding all switches, excess cells removed from the tail,
    /// 4-neighbor adjacency.
    Mesh,
    /// Switches placed uniformly in the unit square, connected within a radius.
    RandomGeometric,
    /// Erdős–Rényi `G(n, p)`.
    Binomial,
    /// Chung-Lu graph with a uniform expected degree.
    ExpectedDegree,
}

impl GraphKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            GraphKind::Cycle => "cycle",
            GraphKind::Path => "path",
            GraphKind::Mesh => "mesh",
            GraphKind::RandomGeometric => "random_geometric",
            GraphKind::Binomial => "binomial",
            GraphKind::ExpectedDegree => "expected_degree",
        }
    }
}

impl std::str::FromStr for GraphKind {
    type Err = SpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cycle" | "ring" => Ok(GraphKind::Cycle),
            "path" => Ok(GraphKind::Path),
            "mesh" => Ok(GraphKind::Mesh),
            "random_geometric" => Ok(GraphKind::RandomGeometric),
            "binomial" => Ok(GraphKind::Binomial),
            "expected_degree" => Ok(GraphKind::ExpectedDegree),
            _ => Err(SpecError::UnknownGraphKind(s.to_owned())),
        }
    }
}

/// Builds the switch-level graph.
///
/// PRECONDITIONS: `nr_switches > 0` (checked by [`Spec::validate`](crate::Spec)).
pub(crate) fn build(kind: GraphKind, nr_switches: usize, rng: &mut impl Rng) -> SwitchGraph {
    match kind {
        GraphKind::Cycle => cycle_graph(nr_switches),
        GraphKind::Path => path_graph(nr_switches),
        GraphKind::Mesh => mesh_graph(nr_switches),
        GraphKind::RandomGeometric => random_geometric_graph(nr_switches, rng),
        GraphKind::Binomial => binomial_graph(nr_switches, rng),
        GraphKind::ExpectedDegree => expected_degree_graph(nr_switches, rng),
    }
}

pub(crate) fn is_connected(g: &SwitchGraph) -> bool {
    connected_components(g) <= 1
}

fn empty_graph(nr_nodes: usize) -> SwitchGraph {
    let mut g = SwitchGraph::with_capacity(nr_nodes, nr_nodes);
    for _ in 0..nr_nodes {
        g.add_node(());
    }
    g
}

fn path_graph(n: usize) -> SwitchGraph {
    let mut g = empty_graph(n);
    for i in 1..n {
        g.add_edge(NodeIndex::new(i - 1), NodeIndex::new(i), ());
    }
    g
}

fn cycle_graph(n: usize) -> SwitchGraph {
    let mut g = path_graph(n);
    // Closing the loop on fewer than three nodes would duplicate the chain's only edge.
    if n >= 3 {
        g.add_edge(NodeIndex::new(n - 1), NodeIndex::new(0), ());
    }
    g
}

fn mesh_graph(n: usize) -> SwitchGraph {
    let width = (n as f64).sqrt().ceil() as usize;
    let height = (n + width - 1) / width;
    let mut g = empty_graph(n);
    // Cells past `n` are dropped from the tail of the grid, so a cell's node index is its
    // row-major position.
    for row in 0..height {
        for col in 0..width {
            let cell = row * width + col;
            if cell >= n {
                break;
            }
            if col + 1 < width && cell + 1 < n {
                g.add_edge(NodeIndex::new(cell), NodeIndex::new(cell + 1), ());
            }
            if cell + width < n {
                g.add_edge(NodeIndex::new(cell), NodeIndex::new(cell + width), ());
            }
        }
    }
    g
}

fn random_geometric_graph(n: usize, rng: &mut impl Rng) -> SwitchGraph {
    let mut radius = (2.0 * (n as f64).ln() / n as f64).sqrt();
    loop {
        let positions = (0..n)
            .map(|_| (rng.gen::<f64>(), rng.gen::<f64>()))
            .collect::<Vec<_>>();
        let mut g = empty_graph(n);
        for (i, j) in (0..n).tuple_combinations() {
            let dx = positions[i].0 - positions[j].0;
            let dy = positions[i].1 - positions[j].1;
            if dx.hypot(dy) <= radius {
                g.add_edge(NodeIndex::new(i), NodeIndex::new(j), ());
            }
        }
        if is_connected(&g) {
            return g;
        }
        radius += RADIUS_STEP;
    }
}

fn binomial_graph(n: usize, rng: &mut impl Rng) -> SwitchGraph {
    let mut p = 2.0 * (n as f64).ln() / n as f64;
    loop {
        let mut g = empty_graph(n);
        for (i, j) in (0..n).tuple_combinations() {
            if rng.gen_bool(p.clamp(0.0, 1.0)) {
                g.add_edge(NodeIndex::new(i), NodeIndex::new(j), ());
            }
        }
        if is_connected(&g) {
            return g;
        }
        p += PROBABILITY_STEP;
    }
}

fn expected_degree_graph(n: usize, rng: &mut impl Rng) -> SwitchGraph {
    // Chung-Lu with a uniform weight per switch. Sampling only the pairs `i < j` keeps the
    // graph simple (no self-loops or parallel edges to strip afterwards).
    let mut weight = (n as f64).log2().ceil();
    loop {
        let total = weight * n as f64;
        let mut g = empty_graph(n);
        if total > 0.0 {
            for (i, j) in (0..n).tuple_combinations() {
                let p = (weight * weight / total).min(1.0);
                if rng.gen_bool(p) {
                    g.add_edge(NodeIndex::new(i), NodeIndex::new(j), ());
                }
            }
        }
        if is_connected(&g) {
            return g;
        }
        weight += 1.0;
    }
}
