//! Placed trains and the states they move through.

use rail_core::{OperationId, PlacedTrainId, PlatformId, Point, SimTime, SwitchId, TrackId, TrainId};
use rail_network::NetworkError;

/// Whether a train is between stations or standing at one.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StationStatus {
    Running,
    Arrived,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OperatingStatus {
    /// Following its timetable.
    InService,
    /// Placed by hand; never stops.
    OutOfService,
    /// Finished its last train and stands still.
    Parking,
}

/// How a train picks its way through branches.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RoutingMode {
    /// Straight at every branch.
    Free,
    /// Branch commands from the timetable.
    Scheduled,
}

/// Why a train could not advance this tick.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MovementFault {
    NoOutgoingTrack { track: TrackId, switch: SwitchId },
    AmbiguousBranch { track: TrackId, switch: SwitchId, candidates: usize },
    /// More track changes in one tick than the network has tracks.
    RoutingLoop { track: TrackId },
    /// Any other network failure, e.g. a search error.
    Network(String),
}

impl From<NetworkError> for MovementFault {
    fn from(err: NetworkError) -> Self {
        match err {
            NetworkError::NoOutgoingTrack { track, switch } => MovementFault::NoOutgoingTrack { track, switch },
            NetworkError::AmbiguousBranch { track, switch, candidates } => {
                MovementFault::AmbiguousBranch { track, switch, candidates }
            }
            other => MovementFault::Network(other.to_string()),
        }
    }
}

impl std::fmt::Display for MovementFault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MovementFault::NoOutgoingTrack { track, switch } => {
                write!(f, "no outgoing track from {track} at {switch}")
            }
            MovementFault::AmbiguousBranch { track, switch, candidates } => {
                write!(f, "{candidates}-way branch at {switch} from {track} has no usable command")
            }
            MovementFault::RoutingLoop { track } => write!(f, "routing loop entered from {track}"),
            MovementFault::Network(msg) => f.write_str(msg),
        }
    }
}

/// A train instance on the network.
///
/// One placed train runs every train of its operation in turn; `train` and
/// `op_position` change on reassignment while `id` stays the same.
#[derive(Clone, Debug, PartialEq)]
pub struct PlacedTrain {
    pub id:               PlacedTrainId,
    /// `None` for trains placed by hand.
    pub operation:        Option<OperationId>,
    pub train:            Option<TrainId>,
    /// Index of `train` within the operation.
    pub op_position:      usize,
    pub name:             String,
    pub color:            String,

    pub track:            TrackId,
    pub position:         Point,
    /// Layout units per tick.
    pub speed:            f64,

    pub station_status:   StationStatus,
    pub operating_status: OperatingStatus,
    /// Platform the train last departed from, until it leaves that track.
    pub just_departed:    Option<PlatformId>,
    /// First `dia_times` entry not yet served.
    pub next_dia:         usize,
    pub routing:          RoutingMode,

    pub fault:            Option<MovementFault>,
    /// Met a branch the timetable says nothing about.
    pub degraded:         bool,
}

impl PlacedTrain {
    /// `true` if the train will try to move on its next update.
    #[inline]
    pub fn is_moving(&self) -> bool {
        self.station_status == StationStatus::Running
            && self.operating_status != OperatingStatus::Parking
            && self.speed > 0.0
    }
}

/// Timetable and network problems seen while running.  Never fatal.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Diagnostic {
    /// `train` reached a genuine branch at `switch` without a command.
    MissingTimetableEntry { train: TrainId, switch: SwitchId, at: SimTime },
    /// `placed` stopped advancing.
    Fault { placed: PlacedTrainId, fault: MovementFault, at: SimTime },
}
