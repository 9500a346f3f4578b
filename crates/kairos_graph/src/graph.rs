//! The levelized timing graph.
//!
//! A [`TimingGraph`] is a directed acyclic graph of timing nodes and edges.
//! Nodes are the points where signal transitions are observed: register and
//! I/O endpoints ([`NodeType::Source`], [`NodeType::Sink`]), intermediate data
//! pins ([`NodeType::Ipin`], [`NodeType::Opin`]) and sequential clock pins
//! ([`NodeType::Cpin`]). Edges carry the structural role of each connection:
//! combinational propagation, clock launch (clock pin to register output),
//! clock capture (clock pin to register input) or net routing.
//!
//! Before analysis the graph must be [levelized](TimingGraph::levelize):
//! level 0 holds every node with no enabled incoming edge, and level `k`
//! holds the nodes whose deepest enabled predecessor sits at level `k - 1`.
//! The level partition is the scheduling unit for the graph walkers: all
//! nodes within one level are independent of each other.

use crate::ids::{EdgeId, EntityId, LevelId, NodeId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The functional type of a timing graph node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeType {
    /// A point where timing paths begin: a register output (Q pin), a primary
    /// input, or a clock source.
    Source,
    /// A point where timing paths end: a register input (D pin) or a primary
    /// output.
    Sink,
    /// An input pin of a combinational primitive.
    Ipin,
    /// An output pin of a combinational primitive.
    Opin,
    /// The clock pin of a sequential primitive.
    Cpin,
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NodeType::Source => "SOURCE",
            NodeType::Sink => "SINK",
            NodeType::Ipin => "IPIN",
            NodeType::Opin => "OPIN",
            NodeType::Cpin => "CPIN",
        };
        write!(f, "{s}")
    }
}

/// The structural role of a timing graph edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeType {
    /// Combinational propagation through a primitive (input pin to output pin).
    PrimitiveCombinational,
    /// Clock-to-output launch at a sequential primitive (clock pin to SOURCE).
    PrimitiveClockLaunch,
    /// Capture at a sequential primitive (clock pin to SINK); carries the
    /// setup/hold check times.
    PrimitiveClockCapture,
    /// Routed net connectivity between primitives.
    Net,
}

impl fmt::Display for EdgeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EdgeType::PrimitiveCombinational => "PRIMITIVE_COMBINATIONAL",
            EdgeType::PrimitiveClockLaunch => "PRIMITIVE_CLOCK_LAUNCH",
            EdgeType::PrimitiveClockCapture => "PRIMITIVE_CLOCK_CAPTURE",
            EdgeType::Net => "NET",
        };
        write!(f, "{s}")
    }
}

/// Errors raised while finalizing a timing graph.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// The enabled edges of the graph contain a cycle, so no level
    /// assignment exists.
    #[error("timing graph contains a cycle among enabled edges")]
    Cyclic,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Node {
    node_type: NodeType,
    in_edges: Vec<EdgeId>,
    out_edges: Vec<EdgeId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Edge {
    edge_type: EdgeType,
    src: NodeId,
    sink: NodeId,
    disabled: bool,
}

/// A levelized timing DAG.
///
/// Built with [`add_node`](Self::add_node) / [`add_edge`](Self::add_edge),
/// then finalized with [`levelize`](Self::levelize). Any structural mutation
/// (adding nodes or edges, toggling an edge's disabled flag) invalidates the
/// levelization and it must be recomputed before analysis.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimingGraph {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    levels: Vec<Vec<NodeId>>,
    node_levels: Vec<LevelId>,
    levelized: bool,
}

impl TimingGraph {
    /// Creates an empty timing graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node of the given type and returns its ID.
    pub fn add_node(&mut self, node_type: NodeType) -> NodeId {
        let id = NodeId::from_index(self.nodes.len());
        self.nodes.push(Node {
            node_type,
            in_edges: Vec::new(),
            out_edges: Vec::new(),
        });
        self.levelized = false;
        id
    }

    /// Adds a directed edge from `src` to `sink` and returns its ID.
    pub fn add_edge(&mut self, edge_type: EdgeType, src: NodeId, sink: NodeId) -> EdgeId {
        let id = EdgeId::from_index(self.edges.len());
        self.edges.push(Edge {
            edge_type,
            src,
            sink,
            disabled: false,
        });
        self.nodes[src.index()].out_edges.push(id);
        self.nodes[sink.index()].in_edges.push(id);
        self.levelized = false;
        id
    }

    /// Enables or disables an edge. Disabled edges are invisible to
    /// levelization and to all tag propagation.
    pub fn set_edge_disabled(&mut self, edge: EdgeId, disabled: bool) {
        self.edges[edge.index()].disabled = disabled;
        self.levelized = false;
    }

    /// Returns the number of nodes in the graph.
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the number of edges in the graph.
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// Iterates over all node IDs in ascending order.
    pub fn nodes(&self) -> impl ExactSizeIterator<Item = NodeId> {
        (0..self.nodes.len()).map(NodeId::from_index)
    }

    /// Iterates over all edge IDs in ascending order.
    pub fn edges(&self) -> impl ExactSizeIterator<Item = EdgeId> {
        (0..self.edges.len()).map(EdgeId::from_index)
    }

    /// Returns the type of a node.
    pub fn node_type(&self, node: NodeId) -> NodeType {
        self.nodes[node.index()].node_type
    }

    /// Returns the edges arriving at `node`, in insertion order.
    pub fn node_in_edges(&self, node: NodeId) -> &[EdgeId] {
        &self.nodes[node.index()].in_edges
    }

    /// Returns the edges leaving `node`, in insertion order.
    pub fn node_out_edges(&self, node: NodeId) -> &[EdgeId] {
        &self.nodes[node.index()].out_edges
    }

    /// Returns the source node of an edge.
    pub fn edge_src_node(&self, edge: EdgeId) -> NodeId {
        self.edges[edge.index()].src
    }

    /// Returns the sink node of an edge.
    pub fn edge_sink_node(&self, edge: EdgeId) -> NodeId {
        self.edges[edge.index()].sink
    }

    /// Returns whether an edge is disabled.
    pub fn edge_disabled(&self, edge: EdgeId) -> bool {
        self.edges[edge.index()].disabled
    }

    /// Returns the structural type of an edge.
    pub fn edge_type(&self, edge: EdgeId) -> EdgeType {
        self.edges[edge.index()].edge_type
    }

    /// Returns whether the graph has a current level assignment.
    pub fn is_levelized(&self) -> bool {
        self.levelized
    }

    /// Returns the number of levels. Zero before levelization.
    pub fn num_levels(&self) -> usize {
        self.levels.len()
    }

    /// Iterates over all level IDs in ascending (forward traversal) order.
    pub fn levels(&self) -> impl DoubleEndedIterator<Item = LevelId> + ExactSizeIterator {
        (0..self.levels.len()).map(LevelId::from_index)
    }

    /// Returns the nodes assigned to a level, in ascending NodeId order.
    pub fn level_nodes(&self, level: LevelId) -> &[NodeId] {
        &self.levels[level.index()]
    }

    /// Returns the level of a node.
    ///
    /// # Panics
    ///
    /// Panics if the graph has not been levelized.
    pub fn node_level(&self, node: NodeId) -> LevelId {
        assert!(self.levelized, "timing graph has not been levelized");
        self.node_levels[node.index()]
    }

    /// Computes the longest-path level assignment over enabled edges.
    ///
    /// Level 0 contains every node with no enabled incoming edge; level `k`
    /// contains the nodes whose deepest enabled predecessor is at level
    /// `k - 1`. Fails with [`GraphError::Cyclic`] if the enabled edges form
    /// a cycle.
    pub fn levelize(&mut self) -> Result<(), GraphError> {
        let n = self.nodes.len();
        let mut in_degree = vec![0usize; n];
        for edge in &self.edges {
            if !edge.disabled {
                in_degree[edge.sink.index()] += 1;
            }
        }

        let mut level_of = vec![0u32; n];
        let mut worklist: Vec<NodeId> = (0..n)
            .filter(|&i| in_degree[i] == 0)
            .map(NodeId::from_index)
            .collect();

        let mut visited = 0usize;
        while let Some(node) = worklist.pop() {
            visited += 1;
            for &edge_id in &self.nodes[node.index()].out_edges {
                let edge = &self.edges[edge_id.index()];
                if edge.disabled {
                    continue;
                }
                let sink = edge.sink.index();
                level_of[sink] = level_of[sink].max(level_of[node.index()] + 1);
                in_degree[sink] -= 1;
                if in_degree[sink] == 0 {
                    worklist.push(edge.sink);
                }
            }
        }

        if visited != n {
            return Err(GraphError::Cyclic);
        }

        let num_levels = level_of.iter().map(|&l| l as usize + 1).max().unwrap_or(0);
        self.levels = vec![Vec::new(); num_levels];
        for (i, &level) in level_of.iter().enumerate() {
            // Ascending index order keeps each level's node list sorted.
            self.levels[level as usize].push(NodeId::from_index(i));
        }
        self.node_levels = level_of
            .iter()
            .map(|&l| LevelId::from_raw(l))
            .collect();
        self.levelized = true;
        Ok(())
    }
}
