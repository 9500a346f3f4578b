//! Opaque ID newtypes for timing graph entities.
//!
//! [`NodeId`], [`EdgeId`] and [`LevelId`] are thin `u32` wrappers used as arena
//! indices into the timing graph. They are `Copy`, `Ord`, `Hash`, and
//! `Serialize`/`Deserialize`. The [`EntityId`] trait lets index-keyed stores
//! (tag tables, delay tables) be generic over which entity they are keyed by.

use serde::{Deserialize, Serialize};

/// An identifier that doubles as an index into an entity-keyed store.
pub trait EntityId: Copy {
    /// Creates an ID from a `usize` index.
    fn from_index(index: usize) -> Self;

    /// Returns the ID as a `usize` index.
    fn index(self) -> usize;
}

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize,
        )]
        pub struct $name(u32);

        impl $name {
            /// Creates an ID from a raw `u32` index.
            pub fn from_raw(index: u32) -> Self {
                Self(index)
            }

            /// Returns the raw `u32` index.
            pub fn as_raw(self) -> u32 {
                self.0
            }
        }

        impl EntityId for $name {
            fn from_index(index: usize) -> Self {
                Self(index as u32)
            }

            fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

define_id!(
    /// Opaque, copyable ID for a node in the timing graph.
    NodeId
);

define_id!(
    /// Opaque, copyable ID for an edge in the timing graph.
    EdgeId
);

define_id!(
    /// Opaque, copyable ID for a topological level of the timing graph.
    LevelId
);
