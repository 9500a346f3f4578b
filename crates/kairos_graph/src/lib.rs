//! Timing graph representation for the Kairos static timing analyzer.
//!
//! This crate provides the structural half of the analyzer: strongly typed
//! entity IDs, the node/edge model of a synchronous circuit's timing paths,
//! and longest-path levelization. The analysis half lives in `kairos_timing`,
//! which consumes this crate's read contract (`node_in_edges`,
//! `edge_src_node`, `level_nodes`, ...) during its levelized traversals.
//!
//! # Usage
//!
//! ```
//! use kairos_graph::{EdgeType, NodeType, TimingGraph};
//!
//! let mut graph = TimingGraph::new();
//! let clk = graph.add_node(NodeType::Source);
//! let cpin = graph.add_node(NodeType::Cpin);
//! let q = graph.add_node(NodeType::Source);
//! graph.add_edge(EdgeType::Net, clk, cpin);
//! graph.add_edge(EdgeType::PrimitiveClockLaunch, cpin, q);
//! graph.levelize().unwrap();
//! assert_eq!(graph.num_levels(), 3);
//! ```

#![warn(missing_docs)]

pub mod graph;
pub mod ids;

pub use graph::{EdgeType, GraphError, NodeType, TimingGraph};
pub use ids::{EdgeId, EntityId, LevelId, NodeId};
