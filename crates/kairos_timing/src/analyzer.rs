//! Analyzer facades: the public entry points of the engine.
//!
//! A full analyzer owns its visitor and walker, borrows the graph,
//! constraints and delay calculator immutably for its lifetime, and
//! re-analyzes the whole graph on every [`update_timing`] call with the
//! canonical pass sequence:
//!
//! ```text
//! reset -> arrival_pre -> arrival -> required_pre -> required -> slack
//! ```
//!
//! Construction runs the graph/constraint validator once; queries before the
//! first completed `update_timing()` fail with
//! [`TimingError::NotAnalyzed`].
//!
//! [`update_timing`]: FullSetupTimingAnalyzer::update_timing

use crate::analysis::{HoldAnalysis, SetupAnalysis, SetupHoldAnalysis};
use crate::constraints::TimingConstraints;
use crate::delay::DelayCalculator;
use crate::error::TimingError;
use crate::tags::{TagKind, TimingTag};
use crate::validate::validate_timing_graph_constraints;
use crate::walker::{GraphWalker, SerialWalker};
use kairos_graph::{EdgeId, NodeId, TimingGraph};

/// Query surface of an analyzer that has run a setup (max-path) analysis.
pub trait SetupTimingAnalyzer {
    /// Returns all setup tags at a node.
    fn setup_tags(&self, node: NodeId) -> Result<&[TimingTag], TimingError>;

    /// Returns the setup slacks of an edge.
    fn setup_slacks(&self, edge: EdgeId) -> Result<&[TimingTag], TimingError>;
}

/// Query surface of an analyzer that has run a hold (min-path) analysis.
pub trait HoldTimingAnalyzer {
    /// Returns all hold tags at a node.
    fn hold_tags(&self, node: NodeId) -> Result<&[TimingTag], TimingError>;

    /// Returns the hold slacks of an edge.
    fn hold_slacks(&self, edge: EdgeId) -> Result<&[TimingTag], TimingError>;
}

macro_rules! five_pass_update {
    ($self:ident) => {{
        log::debug!(
            "updating timing: {} nodes, {} edges, {} levels",
            $self.graph.num_nodes(),
            $self.graph.num_edges(),
            $self.graph.num_levels(),
        );
        $self.walker.do_reset($self.graph, &mut $self.visitor);
        $self
            .walker
            .do_arrival_pre_traversal($self.graph, $self.constraints, &mut $self.visitor);
        $self.walker.do_arrival_traversal(
            $self.graph,
            $self.constraints,
            $self.delay_calc,
            &mut $self.visitor,
        );
        $self
            .walker
            .do_required_pre_traversal($self.graph, $self.constraints, &mut $self.visitor);
        $self.walker.do_required_traversal(
            $self.graph,
            $self.constraints,
            $self.delay_calc,
            &mut $self.visitor,
        );
        $self
            .walker
            .do_update_slack($self.graph, $self.delay_calc, &mut $self.visitor);
        $self.analyzed = true;
    }};
}

fn ensure_analyzed(analyzed: bool) -> Result<(), TimingError> {
    if analyzed {
        Ok(())
    } else {
        Err(TimingError::NotAnalyzed)
    }
}

/// A full (non-incremental) setup analyzer.
pub struct FullSetupTimingAnalyzer<'a, D, W = SerialWalker> {
    graph: &'a TimingGraph,
    constraints: &'a TimingConstraints,
    delay_calc: &'a D,
    visitor: SetupAnalysis,
    walker: W,
    analyzed: bool,
}

impl<'a, D: DelayCalculator> FullSetupTimingAnalyzer<'a, D, SerialWalker> {
    /// Creates a serial setup analyzer, validating the graph/constraint pair.
    pub fn new(
        graph: &'a TimingGraph,
        constraints: &'a TimingConstraints,
        delay_calc: &'a D,
    ) -> Result<Self, TimingError> {
        Self::with_walker(graph, constraints, delay_calc, SerialWalker::new())
    }
}

impl<'a, D: DelayCalculator, W: GraphWalker> FullSetupTimingAnalyzer<'a, D, W> {
    /// Creates a setup analyzer driven by the given walker.
    pub fn with_walker(
        graph: &'a TimingGraph,
        constraints: &'a TimingConstraints,
        delay_calc: &'a D,
        walker: W,
    ) -> Result<Self, TimingError> {
        validate_timing_graph_constraints(graph, constraints)?;
        Ok(Self {
            graph,
            constraints,
            delay_calc,
            visitor: SetupAnalysis::new(graph.num_nodes(), graph.num_edges()),
            walker,
            analyzed: false,
        })
    }

    /// Re-analyzes the whole graph.
    pub fn update_timing(&mut self) {
        five_pass_update!(self);
    }

    /// Iterates over the setup tags of one kind at a node.
    pub fn setup_kind_tags(
        &self,
        node: NodeId,
        kind: TagKind,
    ) -> Result<impl Iterator<Item = &TimingTag>, TimingError> {
        ensure_analyzed(self.analyzed)?;
        Ok(self.visitor.kind_tags(node, kind))
    }

    /// Returns the wall-clock seconds of a completed walker pass.
    pub fn get_profiling_data(&self, key: &str) -> Option<f64> {
        self.walker.get_profiling_data(key)
    }
}

impl<D: DelayCalculator, W: GraphWalker> SetupTimingAnalyzer
    for FullSetupTimingAnalyzer<'_, D, W>
{
    fn setup_tags(&self, node: NodeId) -> Result<&[TimingTag], TimingError> {
        ensure_analyzed(self.analyzed)?;
        Ok(self.visitor.tags(node))
    }

    fn setup_slacks(&self, edge: EdgeId) -> Result<&[TimingTag], TimingError> {
        ensure_analyzed(self.analyzed)?;
        Ok(self.visitor.slacks(edge))
    }
}

/// A full (non-incremental) hold analyzer.
pub struct FullHoldTimingAnalyzer<'a, D, W = SerialWalker> {
    graph: &'a TimingGraph,
    constraints: &'a TimingConstraints,
    delay_calc: &'a D,
    visitor: HoldAnalysis,
    walker: W,
    analyzed: bool,
}

impl<'a, D: DelayCalculator> FullHoldTimingAnalyzer<'a, D, SerialWalker> {
    /// Creates a serial hold analyzer, validating the graph/constraint pair.
    pub fn new(
        graph: &'a TimingGraph,
        constraints: &'a TimingConstraints,
        delay_calc: &'a D,
    ) -> Result<Self, TimingError> {
        Self::with_walker(graph, constraints, delay_calc, SerialWalker::new())
    }
}

impl<'a, D: DelayCalculator, W: GraphWalker> FullHoldTimingAnalyzer<'a, D, W> {
    /// Creates a hold analyzer driven by the given walker.
    pub fn with_walker(
        graph: &'a TimingGraph,
        constraints: &'a TimingConstraints,
        delay_calc: &'a D,
        walker: W,
    ) -> Result<Self, TimingError> {
        validate_timing_graph_constraints(graph, constraints)?;
        Ok(Self {
            graph,
            constraints,
            delay_calc,
            visitor: HoldAnalysis::new(graph.num_nodes(), graph.num_edges()),
            walker,
            analyzed: false,
        })
    }

    /// Re-analyzes the whole graph.
    pub fn update_timing(&mut self) {
        five_pass_update!(self);
    }

    /// Iterates over the hold tags of one kind at a node.
    pub fn hold_kind_tags(
        &self,
        node: NodeId,
        kind: TagKind,
    ) -> Result<impl Iterator<Item = &TimingTag>, TimingError> {
        ensure_analyzed(self.analyzed)?;
        Ok(self.visitor.kind_tags(node, kind))
    }

    /// Returns the wall-clock seconds of a completed walker pass.
    pub fn get_profiling_data(&self, key: &str) -> Option<f64> {
        self.walker.get_profiling_data(key)
    }
}

impl<D: DelayCalculator, W: GraphWalker> HoldTimingAnalyzer for FullHoldTimingAnalyzer<'_, D, W> {
    fn hold_tags(&self, node: NodeId) -> Result<&[TimingTag], TimingError> {
        ensure_analyzed(self.analyzed)?;
        Ok(self.visitor.tags(node))
    }

    fn hold_slacks(&self, edge: EdgeId) -> Result<&[TimingTag], TimingError> {
        ensure_analyzed(self.analyzed)?;
        Ok(self.visitor.slacks(edge))
    }
}

/// A full (non-incremental) combined setup/hold analyzer.
///
/// Runs both analyses in a single traversal of each node neighbourhood,
/// which is cheaper than two separate analyzers on large graphs.
pub struct FullSetupHoldTimingAnalyzer<'a, D, W = SerialWalker> {
    graph: &'a TimingGraph,
    constraints: &'a TimingConstraints,
    delay_calc: &'a D,
    visitor: SetupHoldAnalysis,
    walker: W,
    analyzed: bool,
}

impl<'a, D: DelayCalculator> FullSetupHoldTimingAnalyzer<'a, D, SerialWalker> {
    /// Creates a serial combined analyzer, validating the graph/constraint
    /// pair.
    pub fn new(
        graph: &'a TimingGraph,
        constraints: &'a TimingConstraints,
        delay_calc: &'a D,
    ) -> Result<Self, TimingError> {
        Self::with_walker(graph, constraints, delay_calc, SerialWalker::new())
    }
}

impl<'a, D: DelayCalculator, W: GraphWalker> FullSetupHoldTimingAnalyzer<'a, D, W> {
    /// Creates a combined analyzer driven by the given walker.
    pub fn with_walker(
        graph: &'a TimingGraph,
        constraints: &'a TimingConstraints,
        delay_calc: &'a D,
        walker: W,
    ) -> Result<Self, TimingError> {
        validate_timing_graph_constraints(graph, constraints)?;
        Ok(Self {
            graph,
            constraints,
            delay_calc,
            visitor: SetupHoldAnalysis::new(graph.num_nodes(), graph.num_edges()),
            walker,
            analyzed: false,
        })
    }

    /// Re-analyzes the whole graph.
    pub fn update_timing(&mut self) {
        five_pass_update!(self);
    }

    /// Iterates over the setup tags of one kind at a node.
    pub fn setup_kind_tags(
        &self,
        node: NodeId,
        kind: TagKind,
    ) -> Result<impl Iterator<Item = &TimingTag>, TimingError> {
        ensure_analyzed(self.analyzed)?;
        Ok(self.visitor.setup_kind_tags(node, kind))
    }

    /// Iterates over the hold tags of one kind at a node.
    pub fn hold_kind_tags(
        &self,
        node: NodeId,
        kind: TagKind,
    ) -> Result<impl Iterator<Item = &TimingTag>, TimingError> {
        ensure_analyzed(self.analyzed)?;
        Ok(self.visitor.hold_kind_tags(node, kind))
    }

    /// Returns the wall-clock seconds of a completed walker pass.
    pub fn get_profiling_data(&self, key: &str) -> Option<f64> {
        self.walker.get_profiling_data(key)
    }
}

impl<D: DelayCalculator, W: GraphWalker> SetupTimingAnalyzer
    for FullSetupHoldTimingAnalyzer<'_, D, W>
{
    fn setup_tags(&self, node: NodeId) -> Result<&[TimingTag], TimingError> {
        ensure_analyzed(self.analyzed)?;
        Ok(self.visitor.setup_tags(node))
    }

    fn setup_slacks(&self, edge: EdgeId) -> Result<&[TimingTag], TimingError> {
        ensure_analyzed(self.analyzed)?;
        Ok(self.visitor.setup_slacks(edge))
    }
}

impl<D: DelayCalculator, W: GraphWalker> HoldTimingAnalyzer
    for FullSetupHoldTimingAnalyzer<'_, D, W>
{
    fn hold_tags(&self, node: NodeId) -> Result<&[TimingTag], TimingError> {
        ensure_analyzed(self.analyzed)?;
        Ok(self.visitor.hold_tags(node))
    }

    fn hold_slacks(&self, edge: EdgeId) -> Result<&[TimingTag], TimingError> {
        ensure_analyzed(self.analyzed)?;
        Ok(self.visitor.hold_slacks(edge))
    }
}
