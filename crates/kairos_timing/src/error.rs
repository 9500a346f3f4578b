//! Error types for timing analysis.

use crate::constraints::DomainId;

/// Errors surfaced during analyzer construction, constraint installation,
/// result queries, or echo output.
///
/// All analysis errors are structural: there is no internal retry. NaN times
/// are not errors but sentinels meaning "no tag / no constraint applicable"
/// and propagate silently through the arithmetic.
#[derive(Debug, thiserror::Error)]
pub enum TimingError {
    /// The timing graph is structurally unsound: unlevelized, levels
    /// inconsistent with edges, clock edges between the wrong node types,
    /// or a sink no arrival can ever reach.
    #[error("invalid timing graph: {0}")]
    InvalidGraph(String),

    /// The constraint set is inconsistent with itself or with the graph.
    #[error("invalid timing constraints: {0}")]
    InvalidConstraints(String),

    /// A result was queried before the first completed `update_timing()`.
    #[error("timing results queried before analysis was run")]
    NotAnalyzed,

    /// More clock domains were requested than a [`DomainId`] can represent.
    #[error("too many clock domains (at most {} supported)", DomainId::MAX_DOMAINS)]
    DomainOverflow,

    /// An I/O error while writing echo output.
    #[error("echo output failed: {0}")]
    Io(#[from] std::io::Error),
}
