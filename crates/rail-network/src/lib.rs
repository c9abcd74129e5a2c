//! `rail-network` — the directed track/switch graph.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                     |
//! |-------------|--------------------------------------------------------------|
//! | [`track`]   | `Track` (directed half-track), `Platform`                    |
//! | [`switch`]  | `Switch`, `SwitchPattern`, `BranchCommand`                   |
//! | [`network`] | `TrackNetwork`: queries, `resolve_next`, `validate`          |
//! | [`builder`] | `TrackNetworkBuilder`: paired track creation and threading   |
//! | [`routing`] | Distance-to-platform and route-toward queries over the graph |
//! | [`spatial`] | R-tree of switch points for endpoint snapping                |
//! | [`error`]   | `NetworkError`, `NetworkResult<T>`                           |
//!
//! # Graph shape
//!
//! Every physical rail is two half-tracks, one per direction, stored side by
//! side in a flat arena and linked through `Track::reverse`.  Every track end
//! meets a `Switch`; the switch lists the directed transitions
//! (`from` → `to`) it allows.  A switch with no pattern for an incoming track
//! is a dead end, one pattern is a plain joint, two or more is a branch that
//! needs a [`BranchCommand`].
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on public data types.      |

pub mod builder;
pub mod error;
pub mod network;
pub mod routing;
pub mod spatial;
pub mod switch;
pub mod track;

#[cfg(test)]
mod tests;

pub use builder::TrackNetworkBuilder;
pub use error::{NetworkError, NetworkResult};
pub use network::TrackNetwork;
pub use switch::{BranchCommand, Switch, SwitchPattern};
pub use track::{Platform, Track};
