//! Static timing analysis engine for the Kairos toolchain.
//!
//! Given a levelized [`TimingGraph`], a [`TimingConstraints`] store and a
//! [`DelayCalculator`], the engine computes at every node the latest
//! (setup) and earliest (hold) times a transition can arrive, the times it
//! is required to arrive by, and per-edge slacks, all tagged by the clock
//! domain pair that launches and captures the path, so multi-clock designs
//! analyze correctly in one pass.
//!
//! # Usage
//!
//! ```
//! use kairos_graph::{EdgeType, NodeType, TimingGraph};
//! use kairos_timing::{
//!     FixedDelayCalculator, FullSetupTimingAnalyzer, SetupTimingAnalyzer, Time,
//!     TimingConstraints,
//! };
//!
//! // A constrained input driving a primary output through one net.
//! let mut graph = TimingGraph::new();
//! let din = graph.add_node(NodeType::Source);
//! let dout = graph.add_node(NodeType::Sink);
//! let net = graph.add_edge(EdgeType::Net, din, dout);
//! graph.levelize().unwrap();
//!
//! let mut constraints = TimingConstraints::new();
//! let clk = constraints.create_clock_domain("clk").unwrap();
//! constraints.set_input_constraint(din, clk, Time::new(0.4)).unwrap();
//! constraints.set_output_constraint(dout, clk, Time::new(0.0)).unwrap();
//! constraints.set_setup_constraint(clk, clk, Time::new(1.0)).unwrap();
//!
//! let mut delays = FixedDelayCalculator::new(graph.num_edges());
//! delays.set_edge_delay(net, Time::new(0.3), Time::new(0.3));
//!
//! let mut analyzer = FullSetupTimingAnalyzer::new(&graph, &constraints, &delays).unwrap();
//! analyzer.update_timing();
//! let slack = analyzer.setup_slacks(net).unwrap()[0].time();
//! assert!((slack.value() - 0.3).abs() < 1e-6);
//! ```
//!
//! # Architecture
//!
//! - [`time`] — scalar times with NaN-as-invalid semantics
//! - [`constraints`] — clock domains, I/O offsets, setup/hold targets
//! - [`delay`] — the delay calculator contract and fixed tables
//! - [`tags`] — per-node/per-edge tag tables with min/max folding
//! - [`analysis`] — the setup/hold visitors that encode the path equations
//! - [`walker`] — serial and level-parallel traversal schedules
//! - [`analyzer`] — the `update_timing()` facades
//! - [`validate`] — one-shot graph/constraint validation
//! - [`echo`] — plain-text result dumps for golden-file testing

#![warn(missing_docs)]

pub mod analysis;
pub mod analyzer;
pub mod constraints;
pub mod delay;
pub mod echo;
pub mod error;
pub mod tags;
pub mod time;
pub mod validate;
pub mod walker;

pub use analysis::{
    AnalysisOps, CommonAnalysis, GraphVisitor, HoldAnalysis, HoldOps, SetupAnalysis,
    SetupHoldAnalysis, SetupOps,
};
pub use analyzer::{
    FullHoldTimingAnalyzer, FullSetupHoldTimingAnalyzer, FullSetupTimingAnalyzer,
    HoldTimingAnalyzer, SetupTimingAnalyzer,
};
pub use constraints::{DomainId, IoConstraint, PairConstraint, TimingConstraints};
pub use delay::{DelayCalculator, FixedDelayCalculator};
pub use error::TimingError;
pub use tags::{find_tag, TagKind, TagList, TagSource, TimingTag, TimingTags};
pub use time::Time;
pub use validate::validate_timing_graph_constraints;
pub use walker::{GraphWalker, ParallelWalker, SerialWalker};

pub use kairos_graph::{EdgeId, EdgeType, LevelId, NodeId, NodeType, TimingGraph};
