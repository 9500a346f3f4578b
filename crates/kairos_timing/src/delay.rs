//! Edge delay calculation.
//!
//! The analysis passes are generic over a [`DelayCalculator`], which maps
//! each edge to its slow-corner and fast-corner propagation delays and, for
//! capture edges (CPIN→SINK), the library setup and hold check times.
//! [`FixedDelayCalculator`] is the standard implementation: plain per-edge
//! tables filled in by the graph producer.

use crate::time::Time;
use kairos_graph::{EdgeId, EntityId, TimingGraph};
use serde::{Deserialize, Serialize};

/// Supplies per-edge delays to the analysis passes.
///
/// `setup_time`/`hold_time` are meaningful only for
/// [`PrimitiveClockCapture`](kairos_graph::EdgeType::PrimitiveClockCapture)
/// edges and must be zero elsewhere.
pub trait DelayCalculator: Sync {
    /// Slow-corner (maximum) propagation delay of an edge.
    fn max_edge_delay(&self, graph: &TimingGraph, edge: EdgeId) -> Time;

    /// Fast-corner (minimum) propagation delay of an edge.
    fn min_edge_delay(&self, graph: &TimingGraph, edge: EdgeId) -> Time;

    /// Setup check time of a capture edge.
    fn setup_time(&self, graph: &TimingGraph, edge: EdgeId) -> Time;

    /// Hold check time of a capture edge.
    fn hold_time(&self, graph: &TimingGraph, edge: EdgeId) -> Time;
}

/// A delay calculator backed by fixed per-edge tables.
///
/// All delays default to zero; the graph producer fills in the edges it
/// knows about.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixedDelayCalculator {
    max_delays: Vec<Time>,
    min_delays: Vec<Time>,
    setup_times: Vec<Time>,
    hold_times: Vec<Time>,
}

impl FixedDelayCalculator {
    /// Creates zero-delay tables for a graph with `num_edges` edges.
    pub fn new(num_edges: usize) -> Self {
        Self {
            max_delays: vec![Time::ZERO; num_edges],
            min_delays: vec![Time::ZERO; num_edges],
            setup_times: vec![Time::ZERO; num_edges],
            hold_times: vec![Time::ZERO; num_edges],
        }
    }

    /// Sets the min/max propagation delay of an edge.
    pub fn set_edge_delay(&mut self, edge: EdgeId, min: Time, max: Time) {
        self.min_delays[edge.index()] = min;
        self.max_delays[edge.index()] = max;
    }

    /// Sets the setup check time of a capture edge.
    pub fn set_setup_time(&mut self, edge: EdgeId, setup: Time) {
        self.setup_times[edge.index()] = setup;
    }

    /// Sets the hold check time of a capture edge.
    pub fn set_hold_time(&mut self, edge: EdgeId, hold: Time) {
        self.hold_times[edge.index()] = hold;
    }
}

impl DelayCalculator for FixedDelayCalculator {
    fn max_edge_delay(&self, _graph: &TimingGraph, edge: EdgeId) -> Time {
        self.max_delays[edge.index()]
    }

    fn min_edge_delay(&self, _graph: &TimingGraph, edge: EdgeId) -> Time {
        self.min_delays[edge.index()]
    }

    fn setup_time(&self, _graph: &TimingGraph, edge: EdgeId) -> Time {
        self.setup_times[edge.index()]
    }

    fn hold_time(&self, _graph: &TimingGraph, edge: EdgeId) -> Time {
        self.hold_times[edge.index()]
    }
}
