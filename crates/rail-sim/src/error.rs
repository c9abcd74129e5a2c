use thiserror::Error;

use rail_core::{TrackId, TrainId};
use rail_network::NetworkError;
use rail_timetable::TimetableError;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error("track {0} does not exist in the network")]
    UnknownTrack(TrackId),

    #[error("{train} starts on unknown track {track}")]
    BadStartTrack { train: TrainId, track: TrackId },

    #[error("timetable error: {0}")]
    Timetable(#[from] TimetableError),

    #[error("network error: {0}")]
    Network(#[from] NetworkError),
}

pub type SimResult<T> = Result<T, SimError>;
