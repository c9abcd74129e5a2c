use thiserror::Error;

use rail_core::{OperationId, StationId, TrainId};

#[derive(Debug, Error)]
pub enum TimetableError {
    #[error("timetable parse error: {0}")]
    Parse(String),

    #[error("train {0} not found in timetable")]
    UnknownTrain(TrainId),

    #[error("station {0} not found in timetable")]
    UnknownStation(StationId),

    #[error("operation {0} has no trains")]
    EmptyOperation(OperationId),

    #[error("{what} at position {position} has id {id}")]
    IdMismatch {
        what:     &'static str,
        position: usize,
        id:       u32,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type TimetableResult<T> = Result<T, TimetableError>;
