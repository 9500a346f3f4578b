//! Timing tag storage and min/max folding.
//!
//! A [`TimingTag`] records one propagated time at a node (or one slack at an
//! edge), identified by `(kind, launch domain, capture domain)`. Arrival
//! tags carry the launch domain, required tags carry both, clock tags carry
//! whichever side of the sequential they model, and slack tags carry the
//! matched pair. The `origin` node is a traceback pointer only; it never
//! participates in identity.
//!
//! Tag tables hold at most one tag per identity: a writer whose key already
//! exists *folds* (min/max) into the incumbent instead of appending. An
//! invalid incumbent time always loses, which the folding methods get for
//! free from [`Time`]'s partial comparisons.
//!
//! A typical node carries only a handful of tags, so each per-entity table
//! is a short linearly probed vector rather than a hash map, and the
//! per-graph store ([`TimingTags`]) is one preallocated list per entity.

use crate::constraints::DomainId;
use crate::time::Time;
use kairos_graph::{EntityId, NodeId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;

/// What a tag's time means.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TagKind {
    /// Data arrival time, tagged with the launching domain.
    DataArrival,
    /// Data required time, tagged with the launch/capture domain pair.
    DataRequired,
    /// Launch clock arrival propagating through the clock network.
    ClockLaunch,
    /// Capture clock arrival propagating through the clock network.
    ClockCapture,
    /// Per-edge slack for a launch/capture domain pair.
    Slack,
}

impl fmt::Display for TagKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TagKind::DataArrival => "DATA_ARRIVAL",
            TagKind::DataRequired => "DATA_REQUIRED",
            TagKind::ClockLaunch => "CLOCK_LAUNCH",
            TagKind::ClockCapture => "CLOCK_CAPTURE",
            TagKind::Slack => "SLACK",
        };
        write!(f, "{s}")
    }
}

/// One tagged time at a node or edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimingTag {
    time: Time,
    launch: Option<DomainId>,
    capture: Option<DomainId>,
    origin: NodeId,
    kind: TagKind,
}

impl TimingTag {
    /// Creates a tag.
    pub fn new(
        kind: TagKind,
        time: Time,
        launch: Option<DomainId>,
        capture: Option<DomainId>,
        origin: NodeId,
    ) -> Self {
        Self {
            time,
            launch,
            capture,
            origin,
            kind,
        }
    }

    /// The tagged time.
    pub fn time(&self) -> Time {
        self.time
    }

    /// The launching clock domain, if any.
    pub fn launch_domain(&self) -> Option<DomainId> {
        self.launch
    }

    /// The capturing clock domain, if any.
    pub fn capture_domain(&self) -> Option<DomainId> {
        self.capture
    }

    /// The node this tag's value was traced from: the boundary node that
    /// seeded an arrival, or the capture endpoint that seeded a requirement.
    pub fn origin_node(&self) -> NodeId {
        self.origin
    }

    /// The tag kind.
    pub fn kind(&self) -> TagKind {
        self.kind
    }

    fn matches(&self, kind: TagKind, launch: Option<DomainId>, capture: Option<DomainId>) -> bool {
        self.kind == kind && self.launch == launch && self.capture == capture
    }
}

/// Finds the tag with the given identity in a tag slice.
pub fn find_tag(
    tags: &[TimingTag],
    kind: TagKind,
    launch: Option<DomainId>,
    capture: Option<DomainId>,
) -> Option<&TimingTag> {
    tags.iter().find(|t| t.matches(kind, launch, capture))
}

/// The tag table of a single node or edge.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TagList {
    tags: Vec<TimingTag>,
}

impl TagList {
    /// Creates an empty tag list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the tags as a slice.
    pub fn as_slice(&self) -> &[TimingTag] {
        &self.tags
    }

    /// Returns the number of tags.
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// Returns whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Drops all tags.
    pub fn clear(&mut self) {
        self.tags.clear();
    }

    /// Iterates over all tags.
    pub fn iter(&self) -> impl Iterator<Item = &TimingTag> {
        self.tags.iter()
    }

    /// Iterates over the tags of one kind.
    pub fn kind_iter(&self, kind: TagKind) -> impl Iterator<Item = &TimingTag> {
        self.tags.iter().filter(move |t| t.kind() == kind)
    }

    /// Finds the tag with the given identity.
    pub fn find(
        &self,
        kind: TagKind,
        launch: Option<DomainId>,
        capture: Option<DomainId>,
    ) -> Option<&TimingTag> {
        find_tag(&self.tags, kind, launch, capture)
    }

    fn position(
        &self,
        kind: TagKind,
        launch: Option<DomainId>,
        capture: Option<DomainId>,
    ) -> Option<usize> {
        self.tags.iter().position(|t| t.matches(kind, launch, capture))
    }

    /// Inserts a tag whose identity is not yet present.
    pub fn add_tag(&mut self, tag: TimingTag) {
        debug_assert!(
            self.position(tag.kind(), tag.launch_domain(), tag.capture_domain())
                .is_none(),
            "tag identity already present"
        );
        self.tags.push(tag);
    }

    /// Folds an arrival-style time, keeping the maximum.
    ///
    /// `base` supplies the identity and origin. If no tag matches, one is
    /// inserted with `new_time` and `base`'s origin; otherwise the incumbent
    /// is replaced (time and origin) iff `new_time` is larger or the
    /// incumbent is invalid.
    pub fn max_arr(&mut self, new_time: Time, base: &TimingTag) {
        match self.position(base.kind(), base.launch_domain(), base.capture_domain()) {
            None => self.tags.push(TimingTag::new(
                base.kind(),
                new_time,
                base.launch_domain(),
                base.capture_domain(),
                base.origin_node(),
            )),
            Some(i) => {
                let tag = &mut self.tags[i];
                if !tag.time.valid() || new_time > tag.time {
                    tag.time = new_time;
                    tag.origin = base.origin_node();
                }
            }
        }
    }

    /// Folds an arrival-style time, keeping the minimum.
    pub fn min_arr(&mut self, new_time: Time, base: &TimingTag) {
        match self.position(base.kind(), base.launch_domain(), base.capture_domain()) {
            None => self.tags.push(TimingTag::new(
                base.kind(),
                new_time,
                base.launch_domain(),
                base.capture_domain(),
                base.origin_node(),
            )),
            Some(i) => {
                let tag = &mut self.tags[i];
                if !tag.time.valid() || new_time < tag.time {
                    tag.time = new_time;
                    tag.origin = base.origin_node();
                }
            }
        }
    }

    /// Folds a required-style time, keeping the minimum.
    ///
    /// Unlike the arrival folds, an improving required time replaces the
    /// incumbent's time only: the origin stays whatever first created the
    /// tag.
    pub fn min_req(&mut self, new_time: Time, base: &TimingTag) {
        match self.position(base.kind(), base.launch_domain(), base.capture_domain()) {
            None => self.tags.push(TimingTag::new(
                base.kind(),
                new_time,
                base.launch_domain(),
                base.capture_domain(),
                base.origin_node(),
            )),
            Some(i) => {
                let tag = &mut self.tags[i];
                if !tag.time.valid() || new_time < tag.time {
                    tag.time = new_time;
                }
            }
        }
    }

    /// Folds a required-style time, keeping the maximum.
    pub fn max_req(&mut self, new_time: Time, base: &TimingTag) {
        match self.position(base.kind(), base.launch_domain(), base.capture_domain()) {
            None => self.tags.push(TimingTag::new(
                base.kind(),
                new_time,
                base.launch_domain(),
                base.capture_domain(),
                base.origin_node(),
            )),
            Some(i) => {
                let tag = &mut self.tags[i];
                if !tag.time.valid() || new_time > tag.time {
                    tag.time = new_time;
                }
            }
        }
    }
}

/// Read access to tag lists during a traversal, keyed by entity ID.
///
/// Implemented both by the full store and by the restricted view a walker
/// hands to an in-place node update.
pub trait TagSource<K: EntityId> {
    /// Returns the tags of one entity.
    fn tags(&self, key: K) -> &[TimingTag];
}

/// Per-entity tag storage for a whole graph, preallocated to entity count.
///
/// `K` is the entity the store is keyed by: [`NodeId`] for node tag tables,
/// [`EdgeId`](kairos_graph::EdgeId) for per-edge slack tables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingTags<K: EntityId> {
    lists: Vec<TagList>,
    #[serde(skip)]
    _key: PhantomData<K>,
}

impl<K: EntityId> TimingTags<K> {
    /// Creates a store with one empty tag list per entity.
    pub fn new(num_entities: usize) -> Self {
        Self {
            lists: vec![TagList::new(); num_entities],
            _key: PhantomData,
        }
    }

    /// Returns the number of entities.
    pub fn len(&self) -> usize {
        self.lists.len()
    }

    /// Returns whether the store has no entities.
    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }

    /// Returns one entity's tag list.
    pub fn list(&self, key: K) -> &TagList {
        &self.lists[key.index()]
    }

    /// Returns one entity's tag list mutably.
    pub fn list_mut(&mut self, key: K) -> &mut TagList {
        &mut self.lists[key.index()]
    }

    /// Iterates over the tags of one entity restricted to a kind.
    pub fn kind_tags(&self, key: K, kind: TagKind) -> impl Iterator<Item = &TimingTag> {
        self.lists[key.index()].kind_iter(kind)
    }

    /// Splits the store into a mutable handle on one entity's list and a
    /// read view of every other entity's list.
    ///
    /// This is the aliasing seam the serial traversals are built on: a node
    /// update writes its own table while reading its neighbours'.
    pub fn split_entity_mut(&mut self, key: K) -> (TagView<'_, K>, &mut TagList) {
        let pivot = key.index();
        let (before, rest) = self.lists.split_at_mut(pivot);
        let (mid, after) = rest.split_at_mut(1);
        (
            TagView {
                before,
                after,
                pivot,
                _key: PhantomData,
            },
            &mut mid[0],
        )
    }
}

impl<K: EntityId> TagSource<K> for TimingTags<K> {
    fn tags(&self, key: K) -> &[TimingTag] {
        self.lists[key.index()].as_slice()
    }
}

/// The read side of [`TimingTags::split_entity_mut`]: every entity's tags
/// except the one under update.
pub struct TagView<'a, K: EntityId> {
    before: &'a [TagList],
    after: &'a [TagList],
    pivot: usize,
    _key: PhantomData<K>,
}

impl<K: EntityId> TagSource<K> for TagView<'_, K> {
    fn tags(&self, key: K) -> &[TimingTag] {
        let i = key.index();
        if i < self.pivot {
            self.before[i].as_slice()
        } else if i > self.pivot {
            self.after[i - self.pivot - 1].as_slice()
        } else {
            panic!("tag view cannot read the entity under update");
        }
    }
}
