//! Plain data row types written by output backends.

/// Where one placed train stood at a snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainPositionRow {
    pub time_secs:  i64,
    pub placed_id:  u32,
    /// Timetable train being run; `u32::MAX` for hand-placed trains.
    pub train_id:   u32,
    pub x:          f64,
    pub y:          f64,
    pub name:       String,
    pub color:      String,
}

/// Summary statistics for one simulation tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickSummaryRow {
    pub tick:          u64,
    pub time_secs:     i64,
    pub moving_trains: u64,
}
