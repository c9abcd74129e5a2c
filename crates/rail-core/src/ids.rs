//! Strongly typed, zero-cost identifier wrappers.
//!
//! Tracks, switches and platforms live in flat arenas inside the network, so
//! every cross-reference in the graph (reverse pairing, switch patterns,
//! platform attachment) is one of these ids rather than a pointer.  The inner
//! integer is `pub` for direct indexing; prefer `.index()` for clarity.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Sentinel meaning "no valid ID".
            pub const INVALID: $name = $name(<$inner>::MAX);

            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }

            /// `false` for the `INVALID` sentinel.
            #[inline(always)]
            pub fn is_valid(self) -> bool {
                self != Self::INVALID
            }
        }

        impl Default for $name {
            /// Returns the `INVALID` sentinel so uninitialized IDs are visibly invalid.
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl From<$name> for usize {
            #[inline(always)]
            fn from(id: $name) -> usize {
                id.0 as usize
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

typed_id! {
    /// Index of a directed half-track in the network arena.
    pub struct TrackId(u32);
}

typed_id! {
    /// Index of a switch (junction point) in the network arena.
    pub struct SwitchId(u32);
}

typed_id! {
    /// Index of a platform (stopping point) in the network arena.
    pub struct PlatformId(u32);
}

typed_id! {
    /// Index of a station in the timetable's station list.
    pub struct StationId(u32);
}

typed_id! {
    /// Index of a logical train in the timetable.
    pub struct TrainId(u32);
}

typed_id! {
    /// Index of an operation (one vehicle's duty) in the timetable.
    pub struct OperationId(u32);
}

typed_id! {
    /// Identifier of a live train placed in a running simulation.
    pub struct PlacedTrainId(u32);
}
