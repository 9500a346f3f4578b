//! Setup and hold analysis visitors.
//!
//! A *visitor* encodes the analysis semantics the walkers schedule: how tags
//! are seeded at the timing boundary, how they fold forward along edges, how
//! requirements form at capture endpoints and fold backward, and how per-edge
//! slacks are produced.
//!
//! Setup (max-path) and hold (min-path) analysis are mirror images: every
//! maximum fold becomes a minimum, the slow delay corner becomes the fast
//! one, the setup check time becomes a negated hold check time, subtracted
//! clock uncertainty becomes added uncertainty, and `required - arrival`
//! slack becomes `arrival - required`. [`CommonAnalysis`] implements the
//! shared walk once, parameterized over an [`AnalysisOps`] strategy
//! ([`SetupOps`] / [`HoldOps`]) that supplies the direction of each of those
//! choices. [`SetupHoldAnalysis`] runs both in one traversal, which amortizes
//! the memory traffic over node neighbourhoods while the tag tables are hot.

use crate::constraints::{DomainId, TimingConstraints};
use crate::delay::DelayCalculator;
use crate::tags::{TagKind, TagList, TagSource, TimingTag, TimingTags};
use crate::time::Time;
use kairos_graph::{EdgeId, EdgeType, NodeId, NodeType, TimingGraph};
use std::marker::PhantomData;

/// Per-node analysis semantics consumed by a
/// [`GraphWalker`](crate::walker::GraphWalker).
///
/// The traversal hooks come in two forms. The `do_*` methods update the
/// visitor in place and are what the serial walker calls, one node or edge
/// at a time. The `compute_*`/`commit_*` pairs split each update into a pure
/// computation against a shared read view and a write-back, which is what
/// lets the parallel walker evaluate a whole level concurrently and then
/// commit the results at the level barrier. Both forms fold in the same
/// per-node edge order, so they produce identical tag tables.
pub trait GraphVisitor: Sync {
    /// The result of one node's arrival or required update.
    type NodeUpdate: Send;
    /// The result of one edge's slack update.
    type EdgeUpdate: Send;

    /// Drops all tags at a node.
    fn do_reset_node(&mut self, node: NodeId);

    /// Drops all slacks at an edge.
    fn do_reset_edge(&mut self, edge: EdgeId);

    /// Seeds boundary tags (clock launches/captures, constrained inputs) at
    /// a source-like node.
    fn do_arrival_pre_traverse_node(
        &mut self,
        graph: &TimingGraph,
        constraints: &TimingConstraints,
        node: NodeId,
    );

    /// Seeds required times at a capture endpoint.
    fn do_required_pre_traverse_node(
        &mut self,
        graph: &TimingGraph,
        constraints: &TimingConstraints,
        node: NodeId,
    );

    /// Computes a node's arrival update from its in-edges.
    fn compute_arrival_node<D: DelayCalculator>(
        &self,
        graph: &TimingGraph,
        constraints: &TimingConstraints,
        delay_calc: &D,
        node: NodeId,
    ) -> Self::NodeUpdate;

    /// Computes a node's required update from its out-edges.
    fn compute_required_node<D: DelayCalculator>(
        &self,
        graph: &TimingGraph,
        constraints: &TimingConstraints,
        delay_calc: &D,
        node: NodeId,
    ) -> Self::NodeUpdate;

    /// Computes an edge's slack update from its endpoints' tags.
    fn compute_slack_edge<D: DelayCalculator>(
        &self,
        graph: &TimingGraph,
        delay_calc: &D,
        edge: EdgeId,
    ) -> Self::EdgeUpdate;

    /// Writes back a node update.
    fn commit_node_update(&mut self, node: NodeId, update: Self::NodeUpdate);

    /// Writes back an edge update.
    fn commit_edge_update(&mut self, edge: EdgeId, update: Self::EdgeUpdate);

    /// In-place arrival update for one node.
    fn do_arrival_traverse_node<D: DelayCalculator>(
        &mut self,
        graph: &TimingGraph,
        constraints: &TimingConstraints,
        delay_calc: &D,
        node: NodeId,
    ) {
        let update = self.compute_arrival_node(graph, constraints, delay_calc, node);
        self.commit_node_update(node, update);
    }

    /// In-place required update for one node.
    fn do_required_traverse_node<D: DelayCalculator>(
        &mut self,
        graph: &TimingGraph,
        constraints: &TimingConstraints,
        delay_calc: &D,
        node: NodeId,
    ) {
        let update = self.compute_required_node(graph, constraints, delay_calc, node);
        self.commit_node_update(node, update);
    }

    /// In-place slack update for one edge.
    fn do_slack_traverse_edge<D: DelayCalculator>(
        &mut self,
        graph: &TimingGraph,
        delay_calc: &D,
        edge: EdgeId,
    ) {
        let update = self.compute_slack_edge(graph, delay_calc, edge);
        self.commit_edge_update(edge, update);
    }
}

/// The handful of direction choices that distinguish a max-path (setup)
/// analysis from a min-path (hold) analysis.
pub trait AnalysisOps: Send + Sync + 'static {
    /// Delay corner used along data and clock-network edges.
    fn edge_delay<D: DelayCalculator>(delay_calc: &D, graph: &TimingGraph, edge: EdgeId) -> Time;

    /// Effective delay crossing a capture edge into a sink, with the library
    /// check time folded in: `max - setup` for setup, `min + hold` for hold.
    fn capture_edge_delay<D: DelayCalculator>(
        delay_calc: &D,
        graph: &TimingGraph,
        edge: EdgeId,
    ) -> Time;

    /// Launch-to-capture separation target for a domain pair with clock
    /// uncertainty folded in, or invalid if the pair carries no target for
    /// this analysis.
    fn pair_constraint(constraints: &TimingConstraints, launch: DomainId, capture: DomainId)
        -> Time;

    /// Applies an output-port offset to the separation target.
    fn apply_output_offset(target: Time, offset: Time) -> Time;

    /// Folds an arrival-style tag (`max_arr` for setup, `min_arr` for hold).
    fn fold_arrival(list: &mut TagList, new_time: Time, base: &TimingTag);

    /// Folds a required-style tag (`min_req` for setup, `max_req` for hold).
    fn fold_required(list: &mut TagList, new_time: Time, base: &TimingTag);

    /// Slack of one arrival/required pairing; positive when the check is met.
    fn slack(arrival: Time, required: Time) -> Time;
}

/// Max-path (setup) direction choices.
pub struct SetupOps;

impl AnalysisOps for SetupOps {
    fn edge_delay<D: DelayCalculator>(delay_calc: &D, graph: &TimingGraph, edge: EdgeId) -> Time {
        delay_calc.max_edge_delay(graph, edge)
    }

    fn capture_edge_delay<D: DelayCalculator>(
        delay_calc: &D,
        graph: &TimingGraph,
        edge: EdgeId,
    ) -> Time {
        delay_calc.max_edge_delay(graph, edge) - delay_calc.setup_time(graph, edge)
    }

    fn pair_constraint(
        constraints: &TimingConstraints,
        launch: DomainId,
        capture: DomainId,
    ) -> Time {
        let target = constraints.setup_constraint(launch, capture);
        if !target.valid() {
            return Time::INVALID;
        }
        target - constraints.setup_clock_uncertainty(launch, capture).valid_or_zero()
    }

    fn apply_output_offset(target: Time, offset: Time) -> Time {
        target - offset
    }

    fn fold_arrival(list: &mut TagList, new_time: Time, base: &TimingTag) {
        list.max_arr(new_time, base);
    }

    fn fold_required(list: &mut TagList, new_time: Time, base: &TimingTag) {
        list.min_req(new_time, base);
    }

    fn slack(arrival: Time, required: Time) -> Time {
        required - arrival
    }
}

/// Min-path (hold) direction choices.
pub struct HoldOps;

impl AnalysisOps for HoldOps {
    fn edge_delay<D: DelayCalculator>(delay_calc: &D, graph: &TimingGraph, edge: EdgeId) -> Time {
        delay_calc.min_edge_delay(graph, edge)
    }

    fn capture_edge_delay<D: DelayCalculator>(
        delay_calc: &D,
        graph: &TimingGraph,
        edge: EdgeId,
    ) -> Time {
        delay_calc.min_edge_delay(graph, edge) + delay_calc.hold_time(graph, edge)
    }

    fn pair_constraint(
        constraints: &TimingConstraints,
        launch: DomainId,
        capture: DomainId,
    ) -> Time {
        let target = constraints.hold_constraint(launch, capture);
        if !target.valid() {
            return Time::INVALID;
        }
        target + constraints.hold_clock_uncertainty(launch, capture).valid_or_zero()
    }

    fn apply_output_offset(target: Time, offset: Time) -> Time {
        // An external hold requirement extends how long data must stay
        // stable after the capture edge.
        target + offset
    }

    fn fold_arrival(list: &mut TagList, new_time: Time, base: &TimingTag) {
        list.min_arr(new_time, base);
    }

    fn fold_required(list: &mut TagList, new_time: Time, base: &TimingTag) {
        list.max_req(new_time, base);
    }

    fn slack(arrival: Time, required: Time) -> Time {
        arrival - required
    }
}

/// Seeds boundary tags at a source-like node.
fn arrival_pre_visit<O: AnalysisOps>(
    constraints: &TimingConstraints,
    node: NodeId,
    list: &mut TagList,
) {
    if let Some(domain) = constraints.node_clock_domain(node) {
        let latency = constraints.source_latency(domain).valid_or_zero();
        list.add_tag(TimingTag::new(
            TagKind::ClockLaunch,
            latency,
            Some(domain),
            None,
            node,
        ));
        list.add_tag(TimingTag::new(
            TagKind::ClockCapture,
            latency,
            None,
            Some(domain),
            node,
        ));
    }

    if constraints.node_is_constant_generator(node) {
        // Constants drive no timing paths.
        return;
    }

    for (domain, offset) in constraints.node_input_constraints(node) {
        let time = constraints.source_latency(domain).valid_or_zero() + offset;
        let base = TimingTag::new(TagKind::DataArrival, time, Some(domain), None, node);
        O::fold_arrival(list, time, &base);
    }
}

/// Folds a node's arrival tags from its enabled in-edges.
fn arrival_visit<O: AnalysisOps, D: DelayCalculator>(
    graph: &TimingGraph,
    delay_calc: &D,
    node: NodeId,
    list: &mut TagList,
    upstream: &impl TagSource<NodeId>,
) {
    for &edge in graph.node_in_edges(node) {
        if graph.edge_disabled(edge) {
            continue;
        }
        let src = graph.edge_src_node(edge);
        match graph.edge_type(edge) {
            EdgeType::PrimitiveClockLaunch => {
                // The launch clock becomes a data arrival at the register
                // output; the domain rides along as the launch domain.
                let delay = O::edge_delay(delay_calc, graph, edge);
                for tag in upstream.tags(src) {
                    if tag.kind() != TagKind::ClockLaunch {
                        continue;
                    }
                    let base = TimingTag::new(
                        TagKind::DataArrival,
                        Time::INVALID,
                        tag.launch_domain(),
                        None,
                        tag.origin_node(),
                    );
                    O::fold_arrival(list, tag.time() + delay, &base);
                }
            }
            EdgeType::PrimitiveClockCapture => {
                let delay = O::capture_edge_delay(delay_calc, graph, edge);
                for tag in upstream.tags(src) {
                    if tag.kind() != TagKind::ClockCapture {
                        continue;
                    }
                    O::fold_arrival(list, tag.time() + delay, tag);
                }
            }
            EdgeType::PrimitiveCombinational | EdgeType::Net => {
                let delay = O::edge_delay(delay_calc, graph, edge);
                for tag in upstream.tags(src) {
                    match tag.kind() {
                        TagKind::DataArrival | TagKind::ClockLaunch | TagKind::ClockCapture => {
                            O::fold_arrival(list, tag.time() + delay, tag);
                        }
                        TagKind::DataRequired | TagKind::Slack => {}
                    }
                }
            }
        }
    }
}

/// Seeds required times at a capture endpoint.
fn required_pre_visit<O: AnalysisOps>(
    graph: &TimingGraph,
    constraints: &TimingConstraints,
    node: NodeId,
    list: &mut TagList,
) {
    if graph.node_type(node) != NodeType::Sink {
        return;
    }

    let launches: Vec<_> = list
        .kind_iter(TagKind::DataArrival)
        .filter_map(|t| t.launch_domain())
        .collect();

    for launch in launches {
        for capture in constraints.clock_domains() {
            if !constraints.should_analyze(launch, capture) {
                continue;
            }
            let mut target = O::pair_constraint(constraints, launch, capture);
            if !target.valid() {
                continue;
            }
            let offset = constraints.output_constraint(node, capture);
            if offset.valid() {
                target = O::apply_output_offset(target, offset);
            }

            let capture_time = match list.find(TagKind::ClockCapture, None, Some(capture)) {
                Some(tag) => tag.time(),
                None => {
                    // No propagated capture clock. A node constrained as an
                    // output against this domain (a primary output, or any
                    // endpoint of a virtual clock) captures at the domain's
                    // source latency instead.
                    if !offset.valid() {
                        continue;
                    }
                    let latency = constraints.source_latency(capture).valid_or_zero();
                    list.add_tag(TimingTag::new(
                        TagKind::ClockCapture,
                        latency,
                        None,
                        Some(capture),
                        node,
                    ));
                    latency
                }
            };

            let base = TimingTag::new(
                TagKind::DataRequired,
                Time::INVALID,
                Some(launch),
                Some(capture),
                node,
            );
            O::fold_required(list, capture_time + target, &base);
        }
    }
}

/// Folds a node's required tags backward from its enabled out-edges.
///
/// Requirements only exist where data actually arrives: a downstream
/// required tag folds in only if this node has a data arrival of the same
/// launch domain.
fn required_visit<O: AnalysisOps, D: DelayCalculator>(
    graph: &TimingGraph,
    delay_calc: &D,
    node: NodeId,
    list: &mut TagList,
    downstream: &impl TagSource<NodeId>,
) {
    for &edge in graph.node_out_edges(node) {
        if graph.edge_disabled(edge) {
            continue;
        }
        match graph.edge_type(edge) {
            EdgeType::PrimitiveClockLaunch | EdgeType::PrimitiveClockCapture => continue,
            EdgeType::PrimitiveCombinational | EdgeType::Net => {}
        }
        let delay = O::edge_delay(delay_calc, graph, edge);
        let sink = graph.edge_sink_node(edge);
        for tag in downstream.tags(sink) {
            if tag.kind() != TagKind::DataRequired {
                continue;
            }
            if list
                .find(TagKind::DataArrival, tag.launch_domain(), None)
                .is_none()
            {
                continue;
            }
            O::fold_required(list, tag.time() - delay, tag);
        }
    }
}

/// Folds an edge's slack tags from its endpoints' arrival/required pairs.
fn slack_visit<O: AnalysisOps, D: DelayCalculator>(
    graph: &TimingGraph,
    delay_calc: &D,
    edge: EdgeId,
    list: &mut TagList,
    node_tags: &impl TagSource<NodeId>,
) {
    if graph.edge_disabled(edge) {
        return;
    }
    let src = graph.edge_src_node(edge);
    let sink = graph.edge_sink_node(edge);
    let sink_tags = node_tags.tags(sink);

    match graph.edge_type(edge) {
        EdgeType::PrimitiveClockCapture => {
            // The capture edge reports the endpoint slack: the sink's own
            // arrival against its own requirement. The check time is already
            // folded into the requirement via the capture clock.
            for req in sink_tags.iter().filter(|t| t.kind() == TagKind::DataRequired) {
                let Some(arr) = crate::tags::find_tag(
                    sink_tags,
                    TagKind::DataArrival,
                    req.launch_domain(),
                    None,
                ) else {
                    continue;
                };
                let slack = O::slack(arr.time(), req.time());
                let base = TimingTag::new(
                    TagKind::Slack,
                    Time::INVALID,
                    req.launch_domain(),
                    req.capture_domain(),
                    src,
                );
                list.min_arr(slack, &base);
            }
        }
        _ => {
            let delay = O::edge_delay(delay_calc, graph, edge);
            let src_tags = node_tags.tags(src);
            for req in sink_tags.iter().filter(|t| t.kind() == TagKind::DataRequired) {
                let Some(arr) = crate::tags::find_tag(
                    src_tags,
                    TagKind::DataArrival,
                    req.launch_domain(),
                    None,
                ) else {
                    continue;
                };
                let slack = O::slack(arr.time() + delay, req.time());
                let base = TimingTag::new(
                    TagKind::Slack,
                    Time::INVALID,
                    req.launch_domain(),
                    req.capture_domain(),
                    src,
                );
                list.min_arr(slack, &base);
            }
        }
    }
}

/// The shared analysis core: one direction strategy, one node tag store, one
/// edge slack store.
pub struct CommonAnalysis<O: AnalysisOps> {
    node_tags: TimingTags<NodeId>,
    edge_slacks: TimingTags<EdgeId>,
    _ops: PhantomData<O>,
}

/// Max-path analysis: latest arrivals, earliest requirements, setup slack.
pub type SetupAnalysis = CommonAnalysis<SetupOps>;

/// Min-path analysis: earliest arrivals, latest requirements, hold slack.
pub type HoldAnalysis = CommonAnalysis<HoldOps>;

impl<O: AnalysisOps> CommonAnalysis<O> {
    /// Creates an analysis with tag tables preallocated for `num_nodes`
    /// nodes and `num_edges` edges.
    pub fn new(num_nodes: usize, num_edges: usize) -> Self {
        Self {
            node_tags: TimingTags::new(num_nodes),
            edge_slacks: TimingTags::new(num_edges),
            _ops: PhantomData,
        }
    }

    /// Returns all tags at a node.
    pub fn tags(&self, node: NodeId) -> &[TimingTag] {
        self.node_tags.tags(node)
    }

    /// Iterates over the tags of one kind at a node.
    pub fn kind_tags(&self, node: NodeId, kind: TagKind) -> impl Iterator<Item = &TimingTag> {
        self.node_tags.kind_tags(node, kind)
    }

    /// Returns the slack tags of an edge.
    pub fn slacks(&self, edge: EdgeId) -> &[TimingTag] {
        self.edge_slacks.tags(edge)
    }
}

impl<O: AnalysisOps> GraphVisitor for CommonAnalysis<O> {
    type NodeUpdate = TagList;
    type EdgeUpdate = TagList;

    fn do_reset_node(&mut self, node: NodeId) {
        self.node_tags.list_mut(node).clear();
    }

    fn do_reset_edge(&mut self, edge: EdgeId) {
        self.edge_slacks.list_mut(edge).clear();
    }

    fn do_arrival_pre_traverse_node(
        &mut self,
        _graph: &TimingGraph,
        constraints: &TimingConstraints,
        node: NodeId,
    ) {
        arrival_pre_visit::<O>(constraints, node, self.node_tags.list_mut(node));
    }

    fn do_required_pre_traverse_node(
        &mut self,
        graph: &TimingGraph,
        constraints: &TimingConstraints,
        node: NodeId,
    ) {
        required_pre_visit::<O>(graph, constraints, node, self.node_tags.list_mut(node));
    }

    fn compute_arrival_node<D: DelayCalculator>(
        &self,
        graph: &TimingGraph,
        _constraints: &TimingConstraints,
        delay_calc: &D,
        node: NodeId,
    ) -> TagList {
        let mut list = self.node_tags.list(node).clone();
        arrival_visit::<O, D>(graph, delay_calc, node, &mut list, &self.node_tags);
        list
    }

    fn compute_required_node<D: DelayCalculator>(
        &self,
        graph: &TimingGraph,
        _constraints: &TimingConstraints,
        delay_calc: &D,
        node: NodeId,
    ) -> TagList {
        let mut list = self.node_tags.list(node).clone();
        required_visit::<O, D>(graph, delay_calc, node, &mut list, &self.node_tags);
        list
    }

    fn compute_slack_edge<D: DelayCalculator>(
        &self,
        graph: &TimingGraph,
        delay_calc: &D,
        edge: EdgeId,
    ) -> TagList {
        let mut list = self.edge_slacks.list(edge).clone();
        slack_visit::<O, D>(graph, delay_calc, edge, &mut list, &self.node_tags);
        list
    }

    fn commit_node_update(&mut self, node: NodeId, update: TagList) {
        *self.node_tags.list_mut(node) = update;
    }

    fn commit_edge_update(&mut self, edge: EdgeId, update: TagList) {
        *self.edge_slacks.list_mut(edge) = update;
    }

    fn do_arrival_traverse_node<D: DelayCalculator>(
        &mut self,
        graph: &TimingGraph,
        _constraints: &TimingConstraints,
        delay_calc: &D,
        node: NodeId,
    ) {
        let (view, list) = self.node_tags.split_entity_mut(node);
        arrival_visit::<O, D>(graph, delay_calc, node, list, &view);
    }

    fn do_required_traverse_node<D: DelayCalculator>(
        &mut self,
        graph: &TimingGraph,
        _constraints: &TimingConstraints,
        delay_calc: &D,
        node: NodeId,
    ) {
        let (view, list) = self.node_tags.split_entity_mut(node);
        required_visit::<O, D>(graph, delay_calc, node, list, &view);
    }

    fn do_slack_traverse_edge<D: DelayCalculator>(
        &mut self,
        graph: &TimingGraph,
        delay_calc: &D,
        edge: EdgeId,
    ) {
        let list = self.edge_slacks.list_mut(edge);
        slack_visit::<O, D>(graph, delay_calc, edge, list, &self.node_tags);
    }
}

/// Combined setup and hold analysis in a single traversal.
///
/// Every hook delegates to the setup visitor and then the hold visitor, so
/// one pass over a node's neighbourhood serves both analyses while its tag
/// tables are in cache.
pub struct SetupHoldAnalysis {
    setup: SetupAnalysis,
    hold: HoldAnalysis,
}

impl SetupHoldAnalysis {
    /// Creates a combined analysis with tables preallocated for `num_nodes`
    /// nodes and `num_edges` edges.
    pub fn new(num_nodes: usize, num_edges: usize) -> Self {
        Self {
            setup: SetupAnalysis::new(num_nodes, num_edges),
            hold: HoldAnalysis::new(num_nodes, num_edges),
        }
    }

    /// Returns all setup tags at a node.
    pub fn setup_tags(&self, node: NodeId) -> &[TimingTag] {
        self.setup.tags(node)
    }

    /// Iterates over the setup tags of one kind at a node.
    pub fn setup_kind_tags(&self, node: NodeId, kind: TagKind) -> impl Iterator<Item = &TimingTag> {
        self.setup.kind_tags(node, kind)
    }

    /// Returns the setup slacks of an edge.
    pub fn setup_slacks(&self, edge: EdgeId) -> &[TimingTag] {
        self.setup.slacks(edge)
    }

    /// Returns all hold tags at a node.
    pub fn hold_tags(&self, node: NodeId) -> &[TimingTag] {
        self.hold.tags(node)
    }

    /// Iterates over the hold tags of one kind at a node.
    pub fn hold_kind_tags(&self, node: NodeId, kind: TagKind) -> impl Iterator<Item = &TimingTag> {
        self.hold.kind_tags(node, kind)
    }

    /// Returns the hold slacks of an edge.
    pub fn hold_slacks(&self, edge: EdgeId) -> &[TimingTag] {
        self.hold.slacks(edge)
    }
}

impl GraphVisitor for SetupHoldAnalysis {
    type NodeUpdate = (TagList, TagList);
    type EdgeUpdate = (TagList, TagList);

    fn do_reset_node(&mut self, node: NodeId) {
        self.setup.do_reset_node(node);
        self.hold.do_reset_node(node);
    }

    fn do_reset_edge(&mut self, edge: EdgeId) {
        self.setup.do_reset_edge(edge);
        self.hold.do_reset_edge(edge);
    }

    fn do_arrival_pre_traverse_node(
        &mut self,
        graph: &TimingGraph,
        constraints: &TimingConstraints,
        node: NodeId,
    ) {
        self.setup.do_arrival_pre_traverse_node(graph, constraints, node);
        self.hold.do_arrival_pre_traverse_node(graph, constraints, node);
    }

    fn do_required_pre_traverse_node(
        &mut self,
        graph: &TimingGraph,
        constraints: &TimingConstraints,
        node: NodeId,
    ) {
        self.setup.do_required_pre_traverse_node(graph, constraints, node);
        self.hold.do_required_pre_traverse_node(graph, constraints, node);
    }

    fn compute_arrival_node<D: DelayCalculator>(
        &self,
        graph: &TimingGraph,
        constraints: &TimingConstraints,
        delay_calc: &D,
        node: NodeId,
    ) -> Self::NodeUpdate {
        (
            self.setup.compute_arrival_node(graph, constraints, delay_calc, node),
            self.hold.compute_arrival_node(graph, constraints, delay_calc, node),
        )
    }

    fn compute_required_node<D: DelayCalculator>(
        &self,
        graph: &TimingGraph,
        constraints: &TimingConstraints,
        delay_calc: &D,
        node: NodeId,
    ) -> Self::NodeUpdate {
        (
            self.setup.compute_required_node(graph, constraints, delay_calc, node),
            self.hold.compute_required_node(graph, constraints, delay_calc, node),
        )
    }

    fn compute_slack_edge<D: DelayCalculator>(
        &self,
        graph: &TimingGraph,
        delay_calc: &D,
        edge: EdgeId,
    ) -> Self::EdgeUpdate {
        (
            self.setup.compute_slack_edge(graph, delay_calc, edge),
            self.hold.compute_slack_edge(graph, delay_calc, edge),
        )
    }

    fn commit_node_update(&mut self, node: NodeId, update: Self::NodeUpdate) {
        self.setup.commit_node_update(node, update.0);
        self.hold.commit_node_update(node, update.1);
    }

    fn commit_edge_update(&mut self, edge: EdgeId, update: Self::EdgeUpdate) {
        self.setup.commit_edge_update(edge, update.0);
        self.hold.commit_edge_update(edge, update.1);
    }

    fn do_arrival_traverse_node<D: DelayCalculator>(
        &mut self,
        graph: &TimingGraph,
        constraints: &TimingConstraints,
        delay_calc: &D,
        node: NodeId,
    ) {
        self.setup.do_arrival_traverse_node(graph, constraints, delay_calc, node);
        self.hold.do_arrival_traverse_node(graph, constraints, delay_calc, node);
    }

    fn do_required_traverse_node<D: DelayCalculator>(
        &mut self,
        graph: &TimingGraph,
        constraints: &TimingConstraints,
        delay_calc: &D,
        node: NodeId,
    ) {
        self.setup.do_required_traverse_node(graph, constraints, delay_calc, node);
        self.hold.do_required_traverse_node(graph, constraints, delay_calc, node);
    }

    fn do_slack_traverse_edge<D: DelayCalculator>(
        &mut self,
        graph: &TimingGraph,
        delay_calc: &D,
        edge: EdgeId,
    ) {
        self.setup.do_slack_traverse_edge(graph, delay_calc, edge);
        self.hold.do_slack_traverse_edge(graph, delay_calc, edge);
    }
}
