//! Integration tests for rail-output.

use tempfile::TempDir;

use crate::row::{TickSummaryRow, TrainPositionRow};

fn tmp() -> TempDir {
    tempfile::tempdir().expect("create temp dir")
}

fn position_row(placed_id: u32, time_secs: i64) -> TrainPositionRow {
    TrainPositionRow {
        time_secs,
        placed_id,
        train_id: placed_id,
        x:        placed_id as f64 * 10.0,
        y:        0.5,
        name:     format!("T{placed_id}"),
        color:    "#00ff00".into(),
    }
}

fn read_records(path: &std::path::Path) -> Vec<csv::StringRecord> {
    let mut rdr = csv::Reader::from_path(path).unwrap();
    rdr.records().map(|r| r.unwrap()).collect()
}

// ── CsvWriter ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod csv_tests {
    use super::*;
    use crate::csv::{CsvWriter, POSITIONS_FILE, SUMMARIES_FILE};
    use crate::writer::OutputWriter;

    #[test]
    fn csv_files_created() {
        let dir = tmp();
        let _w = CsvWriter::new(dir.path()).unwrap();
        assert!(dir.path().join(POSITIONS_FILE).exists());
        assert!(dir.path().join(SUMMARIES_FILE).exists());
    }

    #[test]
    fn creates_missing_directory() {
        let dir = tmp();
        let nested = dir.path().join("a").join("b");
        let _w = CsvWriter::new(&nested).unwrap();
        assert!(nested.join(POSITIONS_FILE).exists());
    }

    #[test]
    fn csv_headers_correct() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join(POSITIONS_FILE)).unwrap();
        let headers: Vec<_> = rdr.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(headers, ["time", "placed_id", "train_id", "x", "y", "name", "color"]);

        let mut rdr2 = csv::Reader::from_path(dir.path().join(SUMMARIES_FILE)).unwrap();
        let headers2: Vec<_> = rdr2.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(headers2, ["tick", "time", "moving_trains"]);
    }

    #[test]
    fn position_rows_written() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_positions(&[position_row(0, 5), position_row(1, 5)]).unwrap();
        w.finish().unwrap();

        let rows = read_records(&dir.path().join(POSITIONS_FILE));
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][0], "5");
        assert_eq!(&rows[1][1], "1");
        assert_eq!(&rows[1][3], "10.000");
        assert_eq!(&rows[1][4], "0.500");
        assert_eq!(&rows[1][5], "T1");
        assert_eq!(&rows[1][6], "#00ff00");
    }

    #[test]
    fn tick_summary_written() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_tick_summary(&TickSummaryRow { tick: 3, time_secs: 21_603, moving_trains: 2 }).unwrap();
        w.finish().unwrap();

        let rows = read_records(&dir.path().join(SUMMARIES_FILE));
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][0], "3");
        assert_eq!(&rows[0][1], "21603");
        assert_eq!(&rows[0][2], "2");
    }

    #[test]
    fn finish_is_idempotent() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        w.finish().unwrap();
    }
}

// ── SimOutputObserver ─────────────────────────────────────────────────────────

#[cfg(test)]
mod observer_tests {
    use rail_core::{OperationId, Point, SimConfig, SimTime, StationId, TrainId};
    use rail_network::TrackNetworkBuilder;
    use rail_sim::{SimBuilder, SimObserver, TrainPosition};
    use rail_timetable::{DiaTime, Operation, Station, Timetable, Train};

    use super::*;
    use crate::csv::{CsvWriter, POSITIONS_FILE, SUMMARIES_FILE};
    use crate::writer::OutputWriter;
    use crate::{OutputError, OutputResult, SimOutputObserver};

    /// Collects rows in memory.
    #[derive(Default)]
    struct MemWriter {
        positions: Vec<TrainPositionRow>,
        summaries: Vec<TickSummaryRow>,
        finished:  usize,
    }

    impl OutputWriter for MemWriter {
        fn write_positions(&mut self, rows: &[TrainPositionRow]) -> OutputResult<()> {
            self.positions.extend_from_slice(rows);
            Ok(())
        }
        fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()> {
            self.summaries.push(*row);
            Ok(())
        }
        fn finish(&mut self) -> OutputResult<()> {
            self.finished += 1;
            Ok(())
        }
    }

    /// Fails every summary write.
    struct BrokenWriter;

    impl OutputWriter for BrokenWriter {
        fn write_positions(&mut self, _rows: &[TrainPositionRow]) -> OutputResult<()> {
            Ok(())
        }
        fn write_tick_summary(&mut self, _row: &TickSummaryRow) -> OutputResult<()> {
            Err(OutputError::Io(std::io::Error::other("disk full")))
        }
        fn finish(&mut self) -> OutputResult<()> {
            Ok(())
        }
    }

    fn config() -> SimConfig {
        SimConfig {
            start_time:     SimTime(100),
            end_time:       SimTime(120),
            time_step_secs: 5,
            ..SimConfig::default()
        }
    }

    #[test]
    fn tick_numbers_follow_time_step() {
        let mut obs = SimOutputObserver::new(MemWriter::default(), &config());
        obs.on_tick_end(SimTime(100), 0);
        obs.on_tick_end(SimTime(115), 2);
        let w = obs.into_writer();
        assert_eq!(w.summaries[0].tick, 0);
        assert_eq!(w.summaries[1].tick, 3);
        assert_eq!(w.summaries[1].moving_trains, 2);
    }

    #[test]
    fn hand_placed_trains_get_invalid_train_id() {
        let mut obs = SimOutputObserver::new(MemWriter::default(), &config());
        let positions = vec![TrainPosition {
            train_id:     rail_core::PlacedTrainId(4),
            train:        None,
            position:     Point::new(1.0, 2.0),
            display_name: "loco".into(),
            color:        "#808080".into(),
        }];
        obs.on_snapshot(SimTime(100), &positions);
        obs.on_snapshot(SimTime(105), &[]);
        let w = obs.into_writer();
        assert_eq!(w.positions.len(), 1);
        assert_eq!(w.positions[0].placed_id, 4);
        assert_eq!(w.positions[0].train_id, TrainId::INVALID.0);
    }

    #[test]
    fn first_error_is_kept() {
        let mut obs = SimOutputObserver::new(BrokenWriter, &config());
        obs.on_tick_end(SimTime(100), 0);
        obs.on_tick_end(SimTime(105), 0);
        assert!(matches!(obs.take_error(), Some(OutputError::Io(_))));
        assert!(obs.take_error().is_none());
    }

    #[test]
    fn full_run_writes_csv() {
        let mut nb = TrackNetworkBuilder::new();
        let p = nb.add_platform(StationId(0), "A1");
        let (start, _) = nb.add_track(Point::new(0.0, 0.0), Point::new(100.0, 0.0)).unwrap();
        nb.add_platform_track(Point::new(100.0, 0.0), Point::new(200.0, 0.0), p).unwrap();

        let mut tt = Timetable::new();
        tt.stations = vec![Station { id: StationId(0), name: "A".into(), distance: 0.0, platforms: vec![p] }];
        tt.trains = vec![Train::new(TrainId(0), "R1", start).with_dia_times(vec![DiaTime::stop(
            StationId(0),
            p,
            Some(SimTime(100)),
            None,
        )])];
        tt.operations = vec![Operation::new(OperationId(0), vec![TrainId(0)]).with_window(SimTime(0), SimTime(500))];

        let cfg = SimConfig { end_time: SimTime(19), output_interval_ticks: 10, ..SimConfig::default() };
        let mut sim = SimBuilder::new(cfg.clone(), nb.build()).timetable(tt).build().unwrap();

        let dir = tmp();
        let mut obs = SimOutputObserver::new(CsvWriter::new(dir.path()).unwrap(), &cfg);
        sim.run(&mut obs);
        assert!(obs.take_error().is_none());

        let summaries = read_records(&dir.path().join(SUMMARIES_FILE));
        assert_eq!(summaries.len(), 20);
        let positions = read_records(&dir.path().join(POSITIONS_FILE));
        // Snapshots at ticks 0 and 10, one train each.
        assert_eq!(positions.len(), 2);
        assert_eq!(&positions[0][5], "R1");
        assert_eq!(&positions[1][0], "10");
        assert_eq!(&positions[1][3], "110.000");
    }
}
