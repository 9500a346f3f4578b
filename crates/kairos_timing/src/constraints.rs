//! Timing constraint storage and lookup.
//!
//! [`TimingConstraints`] is the read-only store the analysis passes consult:
//! clock domains with an optional source node (a domain without one is a
//! *virtual clock* used to constrain primary I/O), per-domain source latency,
//! per-node input/output offsets, per-domain-pair setup/hold targets and
//! clock uncertainties, and the set of constant-generator nodes.
//!
//! Every query is a pure lookup. Quantities that were never specified come
//! back as [`Time::INVALID`] (or `None` for structural lookups); the analysis
//! treats an unspecified setup/hold target as "pair not analyzed" and an
//! unspecified latency/uncertainty as zero.
//!
//! Constraint tables are kept sorted by their key (node/domain for I/O
//! offsets, launch/capture for domain pairs) on every insert, so lookups
//! binary-search and iteration is in ascending ID order regardless of the
//! order constraints were installed in. The echo writer depends on that.

use crate::error::TimingError;
use crate::time::Time;
use kairos_graph::NodeId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Compact identifier for a clock domain. At most
/// [`MAX_DOMAINS`](Self::MAX_DOMAINS) domains can exist.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct DomainId(u8);

impl DomainId {
    /// The maximum number of clock domains a constraint set can hold.
    pub const MAX_DOMAINS: usize = 255;

    /// Creates a domain ID from a raw `u8` index.
    pub fn from_raw(index: u8) -> Self {
        Self(index)
    }

    /// Returns the raw `u8` index.
    pub fn as_raw(self) -> u8 {
        self.0
    }

    /// Returns the ID as a `usize` index.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for DomainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A clock domain: a name, an optional source node, and an optional source
/// latency (clock network insertion delay up to the source).
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ClockDomain {
    name: String,
    source_node: Option<NodeId>,
    source_latency: Option<Time>,
}

/// An input or output offset binding a boundary node to a clock domain.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct IoConstraint {
    /// The constrained boundary node.
    pub node: NodeId,
    /// The domain the offset is measured against.
    pub domain: DomainId,
    /// The offset value.
    pub constraint: Time,
}

/// A per-domain-pair quantity: a setup/hold target or a clock uncertainty.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PairConstraint {
    /// The launching domain.
    pub launch: DomainId,
    /// The capturing domain.
    pub capture: DomainId,
    /// The constraint value.
    pub constraint: Time,
}

/// The full constraint set for one analysis run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimingConstraints {
    domains: Vec<ClockDomain>,
    input_constraints: Vec<IoConstraint>,
    output_constraints: Vec<IoConstraint>,
    setup_constraints: Vec<PairConstraint>,
    hold_constraints: Vec<PairConstraint>,
    setup_uncertainties: Vec<PairConstraint>,
    hold_uncertainties: Vec<PairConstraint>,
    constant_generators: Vec<NodeId>,
}

impl TimingConstraints {
    /// Creates an empty constraint set.
    pub fn new() -> Self {
        Self::default()
    }

    fn check_domain(&self, domain: DomainId) -> Result<(), TimingError> {
        if domain.index() < self.domains.len() {
            Ok(())
        } else {
            Err(TimingError::InvalidConstraints(format!(
                "unknown clock domain {domain}"
            )))
        }
    }

    /// Creates a new clock domain and returns its ID.
    ///
    /// Fails with [`TimingError::DomainOverflow`] once
    /// [`DomainId::MAX_DOMAINS`] domains exist.
    pub fn create_clock_domain(&mut self, name: impl Into<String>) -> Result<DomainId, TimingError> {
        if self.domains.len() >= DomainId::MAX_DOMAINS {
            return Err(TimingError::DomainOverflow);
        }
        let id = DomainId::from_raw(self.domains.len() as u8);
        self.domains.push(ClockDomain {
            name: name.into(),
            source_node: None,
            source_latency: None,
        });
        Ok(id)
    }

    /// Binds a domain to the graph node whose transitions define it.
    pub fn set_clock_domain_source(
        &mut self,
        domain: DomainId,
        node: NodeId,
    ) -> Result<(), TimingError> {
        self.check_domain(domain)?;
        self.domains[domain.index()].source_node = Some(node);
        Ok(())
    }

    /// Sets the source latency (clock insertion delay) of a domain.
    pub fn set_source_latency(&mut self, domain: DomainId, latency: Time) -> Result<(), TimingError> {
        self.check_domain(domain)?;
        self.domains[domain.index()].source_latency = Some(latency);
        Ok(())
    }

    /// Sets the input offset of `node` relative to `domain`, replacing any
    /// previous offset for the same pair.
    pub fn set_input_constraint(
        &mut self,
        node: NodeId,
        domain: DomainId,
        constraint: Time,
    ) -> Result<(), TimingError> {
        self.check_domain(domain)?;
        Self::upsert_io(&mut self.input_constraints, node, domain, constraint);
        Ok(())
    }

    /// Sets the output offset of `node` relative to `domain`, replacing any
    /// previous offset for the same pair.
    pub fn set_output_constraint(
        &mut self,
        node: NodeId,
        domain: DomainId,
        constraint: Time,
    ) -> Result<(), TimingError> {
        self.check_domain(domain)?;
        Self::upsert_io(&mut self.output_constraints, node, domain, constraint);
        Ok(())
    }

    fn upsert_io(table: &mut Vec<IoConstraint>, node: NodeId, domain: DomainId, constraint: Time) {
        match table.binary_search_by_key(&(node, domain), |c| (c.node, c.domain)) {
            Ok(i) => table[i].constraint = constraint,
            Err(i) => table.insert(
                i,
                IoConstraint {
                    node,
                    domain,
                    constraint,
                },
            ),
        }
    }

    /// Sets the setup target between a launch and capture domain.
    ///
    /// A second target for the same pair is
    /// [`TimingError::InvalidConstraints`].
    pub fn set_setup_constraint(
        &mut self,
        launch: DomainId,
        capture: DomainId,
        constraint: Time,
    ) -> Result<(), TimingError> {
        self.check_domain(launch)?;
        self.check_domain(capture)?;
        match self
            .setup_constraints
            .binary_search_by_key(&(launch, capture), |c| (c.launch, c.capture))
        {
            Ok(_) => Err(TimingError::InvalidConstraints(format!(
                "duplicate setup constraint for domain pair ({launch}, {capture})"
            ))),
            Err(i) => {
                self.setup_constraints.insert(
                    i,
                    PairConstraint {
                        launch,
                        capture,
                        constraint,
                    },
                );
                Ok(())
            }
        }
    }

    /// Sets the hold target between a launch and capture domain.
    ///
    /// A second target for the same pair is
    /// [`TimingError::InvalidConstraints`].
    pub fn set_hold_constraint(
        &mut self,
        launch: DomainId,
        capture: DomainId,
        constraint: Time,
    ) -> Result<(), TimingError> {
        self.check_domain(launch)?;
        self.check_domain(capture)?;
        match self
            .hold_constraints
            .binary_search_by_key(&(launch, capture), |c| (c.launch, c.capture))
        {
            Ok(_) => Err(TimingError::InvalidConstraints(format!(
                "duplicate hold constraint for domain pair ({launch}, {capture})"
            ))),
            Err(i) => {
                self.hold_constraints.insert(
                    i,
                    PairConstraint {
                        launch,
                        capture,
                        constraint,
                    },
                );
                Ok(())
            }
        }
    }

    /// Sets the setup clock uncertainty between two domains, replacing any
    /// previous value.
    pub fn set_setup_clock_uncertainty(
        &mut self,
        launch: DomainId,
        capture: DomainId,
        uncertainty: Time,
    ) -> Result<(), TimingError> {
        self.check_domain(launch)?;
        self.check_domain(capture)?;
        Self::upsert_pair(&mut self.setup_uncertainties, launch, capture, uncertainty);
        Ok(())
    }

    /// Sets the hold clock uncertainty between two domains, replacing any
    /// previous value.
    pub fn set_hold_clock_uncertainty(
        &mut self,
        launch: DomainId,
        capture: DomainId,
        uncertainty: Time,
    ) -> Result<(), TimingError> {
        self.check_domain(launch)?;
        self.check_domain(capture)?;
        Self::upsert_pair(&mut self.hold_uncertainties, launch, capture, uncertainty);
        Ok(())
    }

    fn upsert_pair(
        table: &mut Vec<PairConstraint>,
        launch: DomainId,
        capture: DomainId,
        constraint: Time,
    ) {
        match table.binary_search_by_key(&(launch, capture), |c| (c.launch, c.capture)) {
            Ok(i) => table[i].constraint = constraint,
            Err(i) => table.insert(
                i,
                PairConstraint {
                    launch,
                    capture,
                    constraint,
                },
            ),
        }
    }

    /// Marks a node as a constant generator. Constant generators launch no
    /// timing paths.
    pub fn add_constant_generator(&mut self, node: NodeId) {
        if !self.constant_generators.contains(&node) {
            self.constant_generators.push(node);
            self.constant_generators.sort_unstable();
        }
    }

    /// Returns the number of clock domains.
    pub fn num_clock_domains(&self) -> usize {
        self.domains.len()
    }

    /// Iterates over all domain IDs in creation order.
    pub fn clock_domains(&self) -> impl ExactSizeIterator<Item = DomainId> {
        (0..self.domains.len()).map(|i| DomainId::from_raw(i as u8))
    }

    /// Returns the name of a domain.
    pub fn clock_domain_name(&self, domain: DomainId) -> &str {
        &self.domains[domain.index()].name
    }

    /// Returns the source node of a domain, or `None` for a virtual clock.
    pub fn clock_domain_source_node(&self, domain: DomainId) -> Option<NodeId> {
        self.domains[domain.index()].source_node
    }

    /// Returns whether a domain has no source node in the graph.
    pub fn is_virtual_clock(&self, domain: DomainId) -> bool {
        self.domains[domain.index()].source_node.is_none()
    }

    /// Returns the domain whose source node is `node`, if any.
    pub fn node_clock_domain(&self, node: NodeId) -> Option<DomainId> {
        self.domains
            .iter()
            .position(|d| d.source_node == Some(node))
            .map(|i| DomainId::from_raw(i as u8))
    }

    /// Returns whether `node` is the source of some clock domain.
    pub fn node_is_clock_source(&self, node: NodeId) -> bool {
        self.node_clock_domain(node).is_some()
    }

    /// Returns whether `node` is a constant generator.
    pub fn node_is_constant_generator(&self, node: NodeId) -> bool {
        self.constant_generators.binary_search(&node).is_ok()
    }

    /// Returns the source latency of a domain, invalid if unspecified.
    pub fn source_latency(&self, domain: DomainId) -> Time {
        self.domains[domain.index()]
            .source_latency
            .unwrap_or(Time::INVALID)
    }

    /// Returns the input offset of `node` against `domain`, invalid if
    /// unspecified.
    pub fn input_constraint(&self, node: NodeId, domain: DomainId) -> Time {
        Self::io_lookup(&self.input_constraints, node, domain)
    }

    /// Returns the output offset of `node` against `domain`, invalid if
    /// unspecified.
    pub fn output_constraint(&self, node: NodeId, domain: DomainId) -> Time {
        Self::io_lookup(&self.output_constraints, node, domain)
    }

    fn io_lookup(table: &[IoConstraint], node: NodeId, domain: DomainId) -> Time {
        table
            .binary_search_by_key(&(node, domain), |c| (c.node, c.domain))
            .map_or(Time::INVALID, |i| table[i].constraint)
    }

    /// Iterates over the input offsets of one node.
    pub fn node_input_constraints(
        &self,
        node: NodeId,
    ) -> impl Iterator<Item = (DomainId, Time)> + '_ {
        self.input_constraints
            .iter()
            .filter(move |c| c.node == node)
            .map(|c| (c.domain, c.constraint))
    }

    /// Iterates over the output offsets of one node.
    pub fn node_output_constraints(
        &self,
        node: NodeId,
    ) -> impl Iterator<Item = (DomainId, Time)> + '_ {
        self.output_constraints
            .iter()
            .filter(move |c| c.node == node)
            .map(|c| (c.domain, c.constraint))
    }

    /// Returns all input offsets, in ascending (node, domain) order.
    pub fn input_constraints(&self) -> &[IoConstraint] {
        &self.input_constraints
    }

    /// Returns all output offsets, in ascending (node, domain) order.
    pub fn output_constraints(&self) -> &[IoConstraint] {
        &self.output_constraints
    }

    /// Returns all setup targets, in ascending (launch, capture) order.
    pub fn setup_constraints(&self) -> &[PairConstraint] {
        &self.setup_constraints
    }

    /// Returns all hold targets, in ascending (launch, capture) order.
    pub fn hold_constraints(&self) -> &[PairConstraint] {
        &self.hold_constraints
    }

    /// Returns all constant generator nodes in ascending order.
    pub fn constant_generators(&self) -> &[NodeId] {
        &self.constant_generators
    }

    /// Returns the setup target for a domain pair, invalid if unspecified.
    pub fn setup_constraint(&self, launch: DomainId, capture: DomainId) -> Time {
        Self::pair_lookup(&self.setup_constraints, launch, capture)
    }

    /// Returns the hold target for a domain pair, invalid if unspecified.
    pub fn hold_constraint(&self, launch: DomainId, capture: DomainId) -> Time {
        Self::pair_lookup(&self.hold_constraints, launch, capture)
    }

    /// Returns the setup clock uncertainty for a domain pair, invalid if
    /// unspecified.
    pub fn setup_clock_uncertainty(&self, launch: DomainId, capture: DomainId) -> Time {
        Self::pair_lookup(&self.setup_uncertainties, launch, capture)
    }

    /// Returns the hold clock uncertainty for a domain pair, invalid if
    /// unspecified.
    pub fn hold_clock_uncertainty(&self, launch: DomainId, capture: DomainId) -> Time {
        Self::pair_lookup(&self.hold_uncertainties, launch, capture)
    }

    fn pair_lookup(table: &[PairConstraint], launch: DomainId, capture: DomainId) -> Time {
        table
            .binary_search_by_key(&(launch, capture), |c| (c.launch, c.capture))
            .map_or(Time::INVALID, |i| table[i].constraint)
    }

    /// Returns whether transfers from `launch` to `capture` carry any
    /// setup or hold target.
    pub fn should_analyze(&self, launch: DomainId, capture: DomainId) -> bool {
        self.setup_constraint(launch, capture).valid()
            || self.hold_constraint(launch, capture).valid()
    }
}
