//! Plain-text echo output for golden-file testing.
//!
//! The echo format is a line-oriented dump of the three inputs/outputs of an
//! analysis: the `timing_graph:` section (nodes with sorted edge lists, then
//! edges), the `timing_constraints:` section (clocks, clock sources,
//! constant generators, I/O constraints, setup/hold targets), and the
//! `analysis_result:` section (every valid tag and slack per analysis and
//! kind). Missing domains print as `-1`; invalid (NaN) times are omitted.
//! All iteration is in ascending ID order, so output is a pure function of
//! the inputs and byte-stable across repeated runs.

use crate::analyzer::{HoldTimingAnalyzer, SetupTimingAnalyzer};
use crate::constraints::{DomainId, TimingConstraints};
use crate::error::TimingError;
use crate::tags::{TagKind, TimingTag};
use kairos_graph::{EdgeId, NodeId, TimingGraph};
use std::io::Write;

fn domain_index(domain: Option<DomainId>) -> i32 {
    domain.map_or(-1, |d| d.index() as i32)
}

/// Writes the `timing_graph:` section.
pub fn write_timing_graph<W: Write>(w: &mut W, graph: &TimingGraph) -> Result<(), TimingError> {
    writeln!(w, "timing_graph:")?;

    for node in graph.nodes() {
        writeln!(w, " node: {node}")?;
        writeln!(w, "  type: {}", graph.node_type(node))?;

        write!(w, "  in_edges: ")?;
        let mut in_edges = graph.node_in_edges(node).to_vec();
        in_edges.sort_unstable();
        for edge in in_edges {
            write!(w, "{edge} ")?;
        }
        writeln!(w)?;

        write!(w, "  out_edges: ")?;
        let mut out_edges = graph.node_out_edges(node).to_vec();
        out_edges.sort_unstable();
        for edge in out_edges {
            write!(w, "{edge} ")?;
        }
        writeln!(w)?;
    }

    for edge in graph.edges() {
        writeln!(w, " edge: {edge}")?;
        writeln!(w, "  src_node: {}", graph.edge_src_node(edge))?;
        writeln!(w, "  sink_node: {}", graph.edge_sink_node(edge))?;
        writeln!(w, "  disabled: {}", graph.edge_disabled(edge))?;
    }
    writeln!(w)?;
    Ok(())
}

/// Writes the `timing_constraints:` section.
pub fn write_timing_constraints<W: Write>(
    w: &mut W,
    constraints: &TimingConstraints,
) -> Result<(), TimingError> {
    writeln!(w, "timing_constraints:")?;

    for domain in constraints.clock_domains() {
        writeln!(
            w,
            " type: CLOCK domain: {domain} name: \"{}\"",
            constraints.clock_domain_name(domain)
        )?;
    }

    for domain in constraints.clock_domains() {
        if let Some(source) = constraints.clock_domain_source_node(domain) {
            writeln!(w, " type: CLOCK_SOURCE node: {source} domain: {domain}")?;
        }
    }

    for &node in constraints.constant_generators() {
        writeln!(w, " type: CONSTANT_GENERATOR node: {node}")?;
    }

    for io in constraints.input_constraints() {
        if io.constraint.valid() {
            writeln!(
                w,
                " type: INPUT_CONSTRAINT node: {} domain: {} constraint: {}",
                io.node, io.domain, io.constraint
            )?;
        }
    }

    for io in constraints.output_constraints() {
        if io.constraint.valid() {
            writeln!(
                w,
                " type: OUTPUT_CONSTRAINT node: {} domain: {} constraint: {}",
                io.node, io.domain, io.constraint
            )?;
        }
    }

    for pair in constraints.setup_constraints() {
        if pair.constraint.valid() {
            writeln!(
                w,
                " type: SETUP_CONSTRAINT launch_domain: {} capture_domain: {} constraint: {}",
                pair.launch, pair.capture, pair.constraint
            )?;
        }
    }

    for pair in constraints.hold_constraints() {
        if pair.constraint.valid() {
            writeln!(
                w,
                " type: HOLD_CONSTRAINT launch_domain: {} capture_domain: {} constraint: {}",
                pair.launch, pair.capture, pair.constraint
            )?;
        }
    }
    writeln!(w)?;
    Ok(())
}

fn write_tag_row<W: Write>(
    w: &mut W,
    label: &str,
    entity: &str,
    id: u32,
    tag: &TimingTag,
    value_label: &str,
) -> Result<(), TimingError> {
    if !tag.time().valid() {
        return Ok(());
    }
    writeln!(
        w,
        " type: {label} {entity}: {id} launch_domain: {} capture_domain: {} {value_label}: {}",
        domain_index(tag.launch_domain()),
        domain_index(tag.capture_domain()),
        tag.time()
    )?;
    Ok(())
}

fn write_node_tag_section<W: Write>(
    w: &mut W,
    graph: &TimingGraph,
    label: &str,
    kind: TagKind,
    tags_of: &impl Fn(NodeId) -> Result<Vec<TimingTag>, TimingError>,
) -> Result<(), TimingError> {
    for node in graph.nodes() {
        for tag in tags_of(node)? {
            if tag.kind() == kind {
                write_tag_row(w, label, "node", node.as_raw(), &tag, "time")?;
            }
        }
    }
    Ok(())
}

fn write_slack_section<W: Write>(
    w: &mut W,
    graph: &TimingGraph,
    label: &str,
    slacks_of: &impl Fn(EdgeId) -> Result<Vec<TimingTag>, TimingError>,
) -> Result<(), TimingError> {
    for edge in graph.edges() {
        for tag in slacks_of(edge)? {
            write_tag_row(w, label, "edge", edge.as_raw(), &tag, "slack")?;
        }
    }
    Ok(())
}

fn write_setup_body<W: Write, A: SetupTimingAnalyzer>(
    w: &mut W,
    graph: &TimingGraph,
    analyzer: &A,
) -> Result<(), TimingError> {
    let tags_of = |node: NodeId| -> Result<Vec<TimingTag>, TimingError> {
        Ok(analyzer.setup_tags(node)?.to_vec())
    };
    let slacks_of = |edge: EdgeId| -> Result<Vec<TimingTag>, TimingError> {
        Ok(analyzer.setup_slacks(edge)?.to_vec())
    };
    write_node_tag_section(w, graph, "SETUP_DATA_ARRIVAL", TagKind::DataArrival, &tags_of)?;
    write_node_tag_section(w, graph, "SETUP_DATA_REQUIRED", TagKind::DataRequired, &tags_of)?;
    write_node_tag_section(w, graph, "SETUP_LAUNCH_CLOCK", TagKind::ClockLaunch, &tags_of)?;
    write_node_tag_section(w, graph, "SETUP_CAPTURE_CLOCK", TagKind::ClockCapture, &tags_of)?;
    write_slack_section(w, graph, "SETUP_SLACK", &slacks_of)?;
    Ok(())
}

fn write_hold_body<W: Write, A: HoldTimingAnalyzer>(
    w: &mut W,
    graph: &TimingGraph,
    analyzer: &A,
) -> Result<(), TimingError> {
    let tags_of = |node: NodeId| -> Result<Vec<TimingTag>, TimingError> {
        Ok(analyzer.hold_tags(node)?.to_vec())
    };
    let slacks_of = |edge: EdgeId| -> Result<Vec<TimingTag>, TimingError> {
        Ok(analyzer.hold_slacks(edge)?.to_vec())
    };
    write_node_tag_section(w, graph, "HOLD_DATA_ARRIVAL", TagKind::DataArrival, &tags_of)?;
    write_node_tag_section(w, graph, "HOLD_DATA_REQUIRED", TagKind::DataRequired, &tags_of)?;
    write_node_tag_section(w, graph, "HOLD_LAUNCH_CLOCK", TagKind::ClockLaunch, &tags_of)?;
    write_node_tag_section(w, graph, "HOLD_CAPTURE_CLOCK", TagKind::ClockCapture, &tags_of)?;
    write_slack_section(w, graph, "HOLD_SLACK", &slacks_of)?;
    Ok(())
}

/// Writes the `analysis_result:` section of a setup-only analyzer.
pub fn write_setup_analysis_result<W: Write, A: SetupTimingAnalyzer>(
    w: &mut W,
    graph: &TimingGraph,
    analyzer: &A,
) -> Result<(), TimingError> {
    writeln!(w, "analysis_result:")?;
    write_setup_body(w, graph, analyzer)?;
    writeln!(w)?;
    Ok(())
}

/// Writes the `analysis_result:` section of a hold-only analyzer.
pub fn write_hold_analysis_result<W: Write, A: HoldTimingAnalyzer>(
    w: &mut W,
    graph: &TimingGraph,
    analyzer: &A,
) -> Result<(), TimingError> {
    writeln!(w, "analysis_result:")?;
    write_hold_body(w, graph, analyzer)?;
    writeln!(w)?;
    Ok(())
}

/// Writes the `analysis_result:` section of a combined analyzer: setup
/// sections first, then hold.
pub fn write_analysis_result<W, A>(
    w: &mut W,
    graph: &TimingGraph,
    analyzer: &A,
) -> Result<(), TimingError>
where
    W: Write,
    A: SetupTimingAnalyzer + HoldTimingAnalyzer,
{
    writeln!(w, "analysis_result:")?;
    write_setup_body(w, graph, analyzer)?;
    write_hold_body(w, graph, analyzer)?;
    writeln!(w)?;
    Ok(())
}

/// Writes a complete echo file: graph, constraints, then analysis results.
pub fn write_echo<W, A>(
    w: &mut W,
    graph: &TimingGraph,
    constraints: &TimingConstraints,
    analyzer: &A,
) -> Result<(), TimingError>
where
    W: Write,
    A: SetupTimingAnalyzer + HoldTimingAnalyzer,
{
    write_timing_graph(w, graph)?;
    write_timing_constraints(w, constraints)?;
    write_analysis_result(w, graph, analyzer)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::FullSetupHoldTimingAnalyzer;
    use crate::delay::FixedDelayCalculator;
    use crate::time::Time;
    use kairos_graph::{EdgeType, NodeType};

    fn echo_fixture() -> (TimingGraph, TimingConstraints, FixedDelayCalculator) {
        let mut graph = TimingGraph::new();
        let input = graph.add_node(NodeType::Source);
        let out = graph.add_node(NodeType::Sink);
        let e = graph.add_edge(EdgeType::Net, input, out);
        graph.levelize().unwrap();

        let mut tc = TimingConstraints::new();
        let clk = tc.create_clock_domain("clk").unwrap();
        tc.set_input_constraint(input, clk, Time::new(0.5)).unwrap();
        tc.set_output_constraint(out, clk, Time::ZERO).unwrap();
        tc.set_setup_constraint(clk, clk, Time::new(2.0)).unwrap();
        tc.set_hold_constraint(clk, clk, Time::ZERO).unwrap();

        let mut dc = FixedDelayCalculator::new(graph.num_edges());
        dc.set_edge_delay(e, Time::new(0.25), Time::new(0.25));
        (graph, tc, dc)
    }

    #[test]
    fn graph_section_format() {
        let (graph, _tc, _dc) = echo_fixture();
        let mut out = Vec::new();
        write_timing_graph(&mut out, &graph).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("timing_graph:\n"));
        assert!(text.contains(" node: 0\n  type: SOURCE\n"));
        assert!(text.contains(" node: 1\n  type: SINK\n"));
        assert!(text.contains(" edge: 0\n  src_node: 0\n  sink_node: 1\n  disabled: false\n"));
    }

    #[test]
    fn constraints_section_format() {
        let (_graph, tc, _dc) = echo_fixture();
        let mut out = Vec::new();
        write_timing_constraints(&mut out, &tc).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains(" type: CLOCK domain: 0 name: \"clk\"\n"));
        assert!(text.contains(" type: INPUT_CONSTRAINT node: 0 domain: 0 constraint: 0.5\n"));
        assert!(text.contains(" type: OUTPUT_CONSTRAINT node: 1 domain: 0 constraint: 0\n"));
        assert!(text
            .contains(" type: SETUP_CONSTRAINT launch_domain: 0 capture_domain: 0 constraint: 2\n"));
        assert!(text
            .contains(" type: HOLD_CONSTRAINT launch_domain: 0 capture_domain: 0 constraint: 0\n"));
        // No source node bound: no CLOCK_SOURCE row.
        assert!(!text.contains("CLOCK_SOURCE"));
    }

    #[test]
    fn constraint_rows_ascend_regardless_of_insertion_order() {
        use kairos_graph::NodeId;

        let mut tc = TimingConstraints::new();
        let a = tc.create_clock_domain("a").unwrap();
        let b = tc.create_clock_domain("b").unwrap();
        let lo = NodeId::from_raw(2);
        let hi = NodeId::from_raw(7);
        tc.set_input_constraint(hi, a, Time::new(0.1)).unwrap();
        tc.set_input_constraint(lo, b, Time::new(0.2)).unwrap();
        tc.set_input_constraint(lo, a, Time::new(0.3)).unwrap();
        tc.set_output_constraint(hi, a, Time::new(0.4)).unwrap();
        tc.set_output_constraint(lo, a, Time::new(0.6)).unwrap();
        tc.set_setup_constraint(b, a, Time::new(1.0)).unwrap();
        tc.set_setup_constraint(a, a, Time::new(2.0)).unwrap();
        tc.set_hold_constraint(b, b, Time::new(0.5)).unwrap();
        tc.set_hold_constraint(a, b, Time::new(0.25)).unwrap();

        let mut out = Vec::new();
        write_timing_constraints(&mut out, &tc).unwrap();
        let text = String::from_utf8(out).unwrap();

        fn rows<'a>(text: &'a str, label: &str) -> Vec<&'a str> {
            let needle = format!("type: {label} ");
            text.lines().filter(|l| l.contains(&needle)).collect()
        }
        assert_eq!(
            rows(&text, "INPUT_CONSTRAINT"),
            vec![
                " type: INPUT_CONSTRAINT node: 2 domain: 0 constraint: 0.3",
                " type: INPUT_CONSTRAINT node: 2 domain: 1 constraint: 0.2",
                " type: INPUT_CONSTRAINT node: 7 domain: 0 constraint: 0.1",
            ]
        );
        assert_eq!(
            rows(&text, "OUTPUT_CONSTRAINT"),
            vec![
                " type: OUTPUT_CONSTRAINT node: 2 domain: 0 constraint: 0.6",
                " type: OUTPUT_CONSTRAINT node: 7 domain: 0 constraint: 0.4",
            ]
        );
        assert_eq!(
            rows(&text, "SETUP_CONSTRAINT"),
            vec![
                " type: SETUP_CONSTRAINT launch_domain: 0 capture_domain: 0 constraint: 2",
                " type: SETUP_CONSTRAINT launch_domain: 1 capture_domain: 0 constraint: 1",
            ]
        );
        assert_eq!(
            rows(&text, "HOLD_CONSTRAINT"),
            vec![
                " type: HOLD_CONSTRAINT launch_domain: 0 capture_domain: 1 constraint: 0.25",
                " type: HOLD_CONSTRAINT launch_domain: 1 capture_domain: 1 constraint: 0.5",
            ]
        );
    }

    #[test]
    fn analysis_section_lists_tags() {
        let (graph, tc, dc) = echo_fixture();
        let mut analyzer = FullSetupHoldTimingAnalyzer::new(&graph, &tc, &dc).unwrap();
        analyzer.update_timing();

        let mut out = Vec::new();
        write_analysis_result(&mut out, &graph, &analyzer).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains(
            " type: SETUP_DATA_ARRIVAL node: 1 launch_domain: 0 capture_domain: -1 time: 0.75\n"
        ));
        assert!(text.contains(
            " type: SETUP_DATA_REQUIRED node: 1 launch_domain: 0 capture_domain: 0 time: 2\n"
        ));
        assert!(text
            .contains(" type: SETUP_SLACK edge: 0 launch_domain: 0 capture_domain: 0 slack: 1.25\n"));
        assert!(text
            .contains(" type: HOLD_SLACK edge: 0 launch_domain: 0 capture_domain: 0 slack: 0.75\n"));
    }

    #[test]
    fn echo_is_byte_stable_across_reruns() {
        let (graph, tc, dc) = echo_fixture();
        let mut analyzer = FullSetupHoldTimingAnalyzer::new(&graph, &tc, &dc).unwrap();

        analyzer.update_timing();
        let mut first = Vec::new();
        write_echo(&mut first, &graph, &tc, &analyzer).unwrap();

        analyzer.update_timing();
        let mut second = Vec::new();
        write_echo(&mut second, &graph, &tc, &analyzer).unwrap();

        assert_eq!(first, second);
    }
}
