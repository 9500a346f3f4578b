//! One-shot structural validation of a graph/constraint pair.
//!
//! Runs once at analyzer construction. Everything checked here is a caller
//! bug, not an analysis outcome: levels inconsistent with edges, clock edges
//! wired between the wrong node types, sinks no arrival can reach, or clock
//! domains bound to non-SOURCE nodes.

use crate::constraints::TimingConstraints;
use crate::error::TimingError;
use kairos_graph::{EdgeType, EntityId, NodeType, TimingGraph};

/// Validates a graph/constraint pair before analysis.
pub fn validate_timing_graph_constraints(
    graph: &TimingGraph,
    constraints: &TimingConstraints,
) -> Result<(), TimingError> {
    if !graph.is_levelized() {
        return Err(TimingError::InvalidGraph(
            "graph has not been levelized".into(),
        ));
    }

    for edge in graph.edges() {
        let src = graph.edge_src_node(edge);
        let sink = graph.edge_sink_node(edge);

        if !graph.edge_disabled(edge) && graph.node_level(src) >= graph.node_level(sink) {
            return Err(TimingError::InvalidGraph(format!(
                "edge {edge} does not ascend levels (node {src} level {} -> node {sink} level {})",
                graph.node_level(src),
                graph.node_level(sink),
            )));
        }

        match graph.edge_type(edge) {
            EdgeType::PrimitiveClockLaunch => {
                if graph.node_type(src) != NodeType::Cpin
                    || graph.node_type(sink) != NodeType::Source
                {
                    return Err(TimingError::InvalidGraph(format!(
                        "clock launch edge {edge} must connect CPIN to SOURCE, found {} to {}",
                        graph.node_type(src),
                        graph.node_type(sink),
                    )));
                }
            }
            EdgeType::PrimitiveClockCapture => {
                if graph.node_type(src) != NodeType::Cpin || graph.node_type(sink) != NodeType::Sink
                {
                    return Err(TimingError::InvalidGraph(format!(
                        "clock capture edge {edge} must connect CPIN to SINK, found {} to {}",
                        graph.node_type(src),
                        graph.node_type(sink),
                    )));
                }
            }
            EdgeType::PrimitiveCombinational | EdgeType::Net => {}
        }
    }

    for node in graph.nodes() {
        if graph.node_type(node) == NodeType::Sink && graph.node_in_edges(node).is_empty() {
            return Err(TimingError::InvalidGraph(format!(
                "sink node {node} has no in-edges, no arrival can reach it"
            )));
        }
    }

    for domain in constraints.clock_domains() {
        if let Some(source) = constraints.clock_domain_source_node(domain) {
            if source.index() >= graph.num_nodes() {
                return Err(TimingError::InvalidConstraints(format!(
                    "clock domain {domain} references nonexistent node {source}"
                )));
            }
            if graph.node_type(source) != NodeType::Source {
                return Err(TimingError::InvalidConstraints(format!(
                    "clock domain {domain} source node {source} has type {}, expected SOURCE",
                    graph.node_type(source),
                )));
            }
        }
    }

    for io in constraints
        .input_constraints()
        .iter()
        .chain(constraints.output_constraints())
    {
        if io.node.index() >= graph.num_nodes() {
            return Err(TimingError::InvalidConstraints(format!(
                "I/O constraint references nonexistent node {}",
                io.node
            )));
        }
    }

    Ok(())
}
