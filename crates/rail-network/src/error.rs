//! Network-subsystem error type.

use thiserror::Error;

use rail_core::{PlatformId, Point, SwitchId, TrackId};
use rail_search::SearchError;

/// Errors produced by `rail-network`.
#[derive(Debug, Error)]
pub enum NetworkError {
    /// Dead end without a configured reversal.
    #[error("no outgoing track from {track} at {switch}")]
    NoOutgoingTrack { track: TrackId, switch: SwitchId },

    /// A junction with three or more legs and no pattern tagged for the
    /// commanded direction.
    #[error("{candidates}-way branch at {switch} from {track} cannot be classified by geometry")]
    AmbiguousBranch { track: TrackId, switch: SwitchId, candidates: usize },

    #[error("track endpoints coincide at {0}")]
    DegenerateTrack(Point),

    #[error("pattern {from} -> {to} does not share a switch point")]
    PatternNotConnected { from: TrackId, to: TrackId },

    #[error("reverse pairing of {0} is broken")]
    PairingBroken(TrackId),

    #[error("track {0} not found in network")]
    TrackNotFound(TrackId),

    #[error("platform {0} not found in network")]
    PlatformNotFound(PlatformId),

    #[error("search failed: {0}")]
    Search(#[from] SearchError),
}

pub type NetworkResult<T> = Result<T, NetworkError>;
