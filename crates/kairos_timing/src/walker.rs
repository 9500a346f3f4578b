//! Graph walkers: traversal schedules over the levelized graph.
//!
//! A walker decides *when* each node and edge is visited; the visitor it
//! drives decides *what* happens there. Both walkers run the same five
//! schedules (reset, arrival pre-traversal over the timing boundary,
//! forward levelized arrival traversal, required pre-traversal over capture
//! endpoints, backward levelized required traversal) plus the per-edge
//! slack sweep, and record per-pass wall-clock profiling.
//!
//! [`SerialWalker`] visits each level's nodes in ascending ID order and
//! updates the visitor in place. [`ParallelWalker`] fans each level out
//! across a rayon pool: arrival at a node reads only tags at lower levels
//! and required reads only higher levels, so the nodes of one level are
//! independent and the level boundary is the only synchronization point.
//! Each parallel visit computes its update against a shared read view and
//! the results are committed at the barrier, in node order, so both walkers
//! produce bit-identical tag tables.

use crate::analysis::GraphVisitor;
use crate::constraints::TimingConstraints;
use crate::delay::DelayCalculator;
use kairos_graph::{EdgeId, NodeId, NodeType, TimingGraph};
use rayon::prelude::*;
use std::collections::{BTreeMap, BTreeSet};
use std::time::Instant;

/// Profiling key for the reset pass.
pub const PROFILE_RESET: &str = "reset_sec";
/// Profiling key for the arrival pre-traversal.
pub const PROFILE_ARRIVAL_PRE: &str = "arrival_pre_traversal_sec";
/// Profiling key for the forward arrival traversal.
pub const PROFILE_ARRIVAL: &str = "arrival_traversal_sec";
/// Profiling key for the required pre-traversal.
pub const PROFILE_REQUIRED_PRE: &str = "required_pre_traversal_sec";
/// Profiling key for the backward required traversal.
pub const PROFILE_REQUIRED: &str = "required_traversal_sec";
/// Profiling key for the slack sweep.
pub const PROFILE_SLACK: &str = "update_slack_sec";

/// A traversal schedule over the levelized timing graph.
pub trait GraphWalker: Default {
    /// Visits every node and edge once to drop stale tags.
    fn do_reset<V: GraphVisitor>(&mut self, graph: &TimingGraph, visitor: &mut V);

    /// Visits the timing boundary: level-0 nodes, clock sources, and
    /// input-constrained nodes.
    fn do_arrival_pre_traversal<V: GraphVisitor>(
        &mut self,
        graph: &TimingGraph,
        constraints: &TimingConstraints,
        visitor: &mut V,
    );

    /// Visits levels 1..=L in order, each node once.
    fn do_arrival_traversal<V: GraphVisitor, D: DelayCalculator>(
        &mut self,
        graph: &TimingGraph,
        constraints: &TimingConstraints,
        delay_calc: &D,
        visitor: &mut V,
    );

    /// Visits capture endpoints (SINK nodes).
    fn do_required_pre_traversal<V: GraphVisitor>(
        &mut self,
        graph: &TimingGraph,
        constraints: &TimingConstraints,
        visitor: &mut V,
    );

    /// Visits levels L-1..=0 in reverse order, each node once.
    fn do_required_traversal<V: GraphVisitor, D: DelayCalculator>(
        &mut self,
        graph: &TimingGraph,
        constraints: &TimingConstraints,
        delay_calc: &D,
        visitor: &mut V,
    );

    /// Visits every edge once to fold slacks.
    fn do_update_slack<V: GraphVisitor, D: DelayCalculator>(
        &mut self,
        graph: &TimingGraph,
        delay_calc: &D,
        visitor: &mut V,
    );

    /// Returns the wall-clock seconds of a completed pass, keyed by the
    /// `PROFILE_*` constants.
    fn get_profiling_data(&self, key: &str) -> Option<f64>;
}

/// The nodes the arrival pre-traversal must seed: everything at level 0,
/// plus any clock source or input-constrained node the constraints name.
fn arrival_pre_nodes(graph: &TimingGraph, constraints: &TimingConstraints) -> BTreeSet<NodeId> {
    let mut nodes = BTreeSet::new();
    if graph.num_levels() > 0 {
        nodes.extend(graph.level_nodes(kairos_graph::LevelId::from_raw(0)).iter().copied());
    }
    for domain in constraints.clock_domains() {
        if let Some(node) = constraints.clock_domain_source_node(domain) {
            nodes.insert(node);
        }
    }
    for io in constraints.input_constraints() {
        nodes.insert(io.node);
    }
    nodes
}

/// A single-threaded walker processing each level's nodes in ID order.
#[derive(Debug, Default)]
pub struct SerialWalker {
    profile: BTreeMap<String, f64>,
}

impl SerialWalker {
    /// Creates a serial walker.
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&mut self, key: &str, start: Instant) {
        self.profile.insert(key.to_string(), start.elapsed().as_secs_f64());
    }
}

impl GraphWalker for SerialWalker {
    fn do_reset<V: GraphVisitor>(&mut self, graph: &TimingGraph, visitor: &mut V) {
        let start = Instant::now();
        for node in graph.nodes() {
            visitor.do_reset_node(node);
        }
        for edge in graph.edges() {
            visitor.do_reset_edge(edge);
        }
        self.record(PROFILE_RESET, start);
    }

    fn do_arrival_pre_traversal<V: GraphVisitor>(
        &mut self,
        graph: &TimingGraph,
        constraints: &TimingConstraints,
        visitor: &mut V,
    ) {
        let start = Instant::now();
        for node in arrival_pre_nodes(graph, constraints) {
            visitor.do_arrival_pre_traverse_node(graph, constraints, node);
        }
        self.record(PROFILE_ARRIVAL_PRE, start);
    }

    fn do_arrival_traversal<V: GraphVisitor, D: DelayCalculator>(
        &mut self,
        graph: &TimingGraph,
        constraints: &TimingConstraints,
        delay_calc: &D,
        visitor: &mut V,
    ) {
        let start = Instant::now();
        for level in graph.levels().skip(1) {
            for &node in graph.level_nodes(level) {
                visitor.do_arrival_traverse_node(graph, constraints, delay_calc, node);
            }
        }
        self.record(PROFILE_ARRIVAL, start);
    }

    fn do_required_pre_traversal<V: GraphVisitor>(
        &mut self,
        graph: &TimingGraph,
        constraints: &TimingConstraints,
        visitor: &mut V,
    ) {
        let start = Instant::now();
        for node in graph.nodes() {
            if graph.node_type(node) == NodeType::Sink {
                visitor.do_required_pre_traverse_node(graph, constraints, node);
            }
        }
        self.record(PROFILE_REQUIRED_PRE, start);
    }

    fn do_required_traversal<V: GraphVisitor, D: DelayCalculator>(
        &mut self,
        graph: &TimingGraph,
        constraints: &TimingConstraints,
        delay_calc: &D,
        visitor: &mut V,
    ) {
        let start = Instant::now();
        for level in graph.levels().rev().skip(1) {
            for &node in graph.level_nodes(level) {
                visitor.do_required_traverse_node(graph, constraints, delay_calc, node);
            }
        }
        self.record(PROFILE_REQUIRED, start);
    }

    fn do_update_slack<V: GraphVisitor, D: DelayCalculator>(
        &mut self,
        graph: &TimingGraph,
        delay_calc: &D,
        visitor: &mut V,
    ) {
        let start = Instant::now();
        for edge in graph.edges() {
            visitor.do_slack_traverse_edge(graph, delay_calc, edge);
        }
        self.record(PROFILE_SLACK, start);
    }

    fn get_profiling_data(&self, key: &str) -> Option<f64> {
        self.profile.get(key).copied()
    }
}

/// A data-parallel walker processing the nodes within each level
/// concurrently and joining at level boundaries.
#[derive(Debug, Default)]
pub struct ParallelWalker {
    profile: BTreeMap<String, f64>,
}

impl ParallelWalker {
    /// Creates a parallel walker.
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&mut self, key: &str, start: Instant) {
        self.profile.insert(key.to_string(), start.elapsed().as_secs_f64());
    }
}

impl GraphWalker for ParallelWalker {
    fn do_reset<V: GraphVisitor>(&mut self, graph: &TimingGraph, visitor: &mut V) {
        let start = Instant::now();
        for node in graph.nodes() {
            visitor.do_reset_node(node);
        }
        for edge in graph.edges() {
            visitor.do_reset_edge(edge);
        }
        self.record(PROFILE_RESET, start);
    }

    fn do_arrival_pre_traversal<V: GraphVisitor>(
        &mut self,
        graph: &TimingGraph,
        constraints: &TimingConstraints,
        visitor: &mut V,
    ) {
        // The boundary is a few I/O and clock nodes; not worth fanning out.
        let start = Instant::now();
        for node in arrival_pre_nodes(graph, constraints) {
            visitor.do_arrival_pre_traverse_node(graph, constraints, node);
        }
        self.record(PROFILE_ARRIVAL_PRE, start);
    }

    fn do_arrival_traversal<V: GraphVisitor, D: DelayCalculator>(
        &mut self,
        graph: &TimingGraph,
        constraints: &TimingConstraints,
        delay_calc: &D,
        visitor: &mut V,
    ) {
        let start = Instant::now();
        log::debug!(
            "parallel arrival traversal over {} levels",
            graph.num_levels().saturating_sub(1)
        );
        for level in graph.levels().skip(1) {
            let shared: &V = visitor;
            let updates: Vec<(NodeId, V::NodeUpdate)> = graph
                .level_nodes(level)
                .par_iter()
                .map(|&node| {
                    (
                        node,
                        shared.compute_arrival_node(graph, constraints, delay_calc, node),
                    )
                })
                .collect();
            for (node, update) in updates {
                visitor.commit_node_update(node, update);
            }
        }
        self.record(PROFILE_ARRIVAL, start);
    }

    fn do_required_pre_traversal<V: GraphVisitor>(
        &mut self,
        graph: &TimingGraph,
        constraints: &TimingConstraints,
        visitor: &mut V,
    ) {
        let start = Instant::now();
        for node in graph.nodes() {
            if graph.node_type(node) == NodeType::Sink {
                visitor.do_required_pre_traverse_node(graph, constraints, node);
            }
        }
        self.record(PROFILE_REQUIRED_PRE, start);
    }

    fn do_required_traversal<V: GraphVisitor, D: DelayCalculator>(
        &mut self,
        graph: &TimingGraph,
        constraints: &TimingConstraints,
        delay_calc: &D,
        visitor: &mut V,
    ) {
        let start = Instant::now();
        for level in graph.levels().rev().skip(1) {
            let shared: &V = visitor;
            let updates: Vec<(NodeId, V::NodeUpdate)> = graph
                .level_nodes(level)
                .par_iter()
                .map(|&node| {
                    (
                        node,
                        shared.compute_required_node(graph, constraints, delay_calc, node),
                    )
                })
                .collect();
            for (node, update) in updates {
                visitor.commit_node_update(node, update);
            }
        }
        self.record(PROFILE_REQUIRED, start);
    }

    fn do_update_slack<V: GraphVisitor, D: DelayCalculator>(
        &mut self,
        graph: &TimingGraph,
        delay_calc: &D,
        visitor: &mut V,
    ) {
        let start = Instant::now();
        let edges: Vec<EdgeId> = graph.edges().collect();
        let shared: &V = visitor;
        let updates: Vec<(EdgeId, V::EdgeUpdate)> = edges
            .par_iter()
            .map(|&edge| (edge, shared.compute_slack_edge(graph, delay_calc, edge)))
            .collect();
        for (edge, update) in updates {
            visitor.commit_edge_update(edge, update);
        }
        self.record(PROFILE_SLACK, start);
    }

    fn get_profiling_data(&self, key: &str) -> Option<f64> {
        self.profile.get(key).copied()
    }
}
