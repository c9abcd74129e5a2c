//! line: a four-station demo for the rust_rail simulator.
//!
//! A local train runs A → D and back as one operation; an express leaves A
//! four minutes behind it, passes the local at B on the loop platform and is
//! withdrawn after D.  The express timetable only gives A and D, so B and C
//! are filled in by the normalizer, which also moves the express off the
//! platform the local occupies.
//!
//! Usage: `line [-v] [config.json]`
//!
//! Writes `output/line/train_positions.csv`, `output/line/tick_summaries.csv`
//! and `output/line/timeline.json`.

mod network;

use std::fs::File;
use std::io::{BufWriter, Cursor};
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use flexi_logger::{FlexiLoggerError, LogSpecBuilder, Logger, LoggerHandle};
use log::LevelFilter;

use rail_core::{OperationId, SimConfig, SimTime, SpeedMode, TrainId};
use rail_network::BranchCommand;
use rail_output::{CsvWriter, OutputWriter, SimOutputObserver};
use rail_sim::{SimBuilder, SimObserver, TimelineRecorder, TrainPosition};
use rail_timetable::{Operation, Station, Timetable, Train, load_dia_times_reader, normalize};

use network::{STATION_A, STATION_B, STATION_C, STATION_D, build_line};

// ── Constants ─────────────────────────────────────────────────────────────────

const OUTPUT_DIR: &str = "output/line";
const TRAIN_COUNT: usize = 3;

// ── Timetable CSV ─────────────────────────────────────────────────────────────

// Platforms: 0 = A1, 1 = B1, 2 = B2, 3 = C1, 4 = D1.
// Train 0 = local eastbound, 1 = local westbound, 2 = express.
const DIA_CSV: &str = "\
train_id,station_id,platform_id,arrival,departure,passing
0,0,0,,06:00,
0,1,1,06:03,06:06,
0,2,3,06:10,06:11,
0,3,4,06:14,,
1,3,4,,06:20,
1,2,3,06:23,06:24,
1,1,1,06:28,06:29,
1,0,0,06:33,,
2,0,0,,06:04,
2,3,4,06:10,06:11,
";

// ── Logging ───────────────────────────────────────────────────────────────────

fn start_logger(verbose: bool) -> Result<LoggerHandle, FlexiLoggerError> {
    let level = if verbose { LevelFilter::Debug } else { LevelFilter::Info };
    let mut spec = LogSpecBuilder::new();
    let _ = spec
        .default(LevelFilter::Warn)
        .module("rail_network", level)
        .module("rail_timetable", level)
        .module("rail_sim", level)
        .module("rail_output", level);
    Logger::with(spec.finalize()).log_to_stderr().start()
}

// ── Observer: CSV output plus in-memory timeline ──────────────────────────────

struct RunObserver<W: OutputWriter> {
    output:        SimOutputObserver<W>,
    timeline:      TimelineRecorder,
    position_rows: usize,
    summary_rows:  usize,
}

impl<W: OutputWriter> SimObserver for RunObserver<W> {
    fn on_tick_end(&mut self, now: SimTime, moving: usize) {
        self.summary_rows += 1;
        self.output.on_tick_end(now, moving);
    }

    fn on_snapshot(&mut self, now: SimTime, positions: &[TrainPosition]) {
        self.position_rows += positions.len();
        self.output.on_snapshot(now, positions);
        self.timeline.on_snapshot(now, positions);
    }

    fn on_sim_end(&mut self, final_time: SimTime) {
        self.output.on_sim_end(final_time);
    }
}

// ── Inputs ────────────────────────────────────────────────────────────────────

fn default_config() -> SimConfig {
    SimConfig {
        start_time:            SimTime::from_hms(6, 0, 0),
        end_time:              SimTime::from_hms(6, 40, 0),
        time_step_secs:        1,
        output_interval_ticks: 10,
        speed_mode:            SpeedMode::Schedule,
        default_speed:         5.0,
        min_speed:             0.5,
        max_speed:             20.0,
        arrival_margin_secs:   10,
    }
}

fn load_config(path: Option<&str>) -> Result<SimConfig> {
    match path {
        None => Ok(default_config()),
        Some(p) => {
            let text = std::fs::read_to_string(p).with_context(|| format!("reading {p}"))?;
            serde_json::from_str(&text).with_context(|| format!("parsing {p}"))
        }
    }
}

fn build_timetable(line: &network::Line) -> Result<Timetable> {
    let mut dia = load_dia_times_reader(Cursor::new(DIA_CSV), TRAIN_COUNT)?.into_iter();
    let mut next_dia = || dia.next().unwrap_or_default();

    let mut tt = Timetable::new();
    tt.stations = vec![
        Station { id: STATION_A, name: "Abbey".into(),    distance: 100.0,  platforms: vec![line.a1] },
        Station { id: STATION_B, name: "Bridge".into(),   distance: 400.0,  platforms: vec![line.b1, line.b2] },
        Station { id: STATION_C, name: "Cross".into(),    distance: 800.0,  platforms: vec![line.c1] },
        Station { id: STATION_D, name: "Dockside".into(), distance: 1000.0, platforms: vec![line.d1] },
    ];
    tt.trains = vec![
        Train::new(TrainId(0), "L1 east", line.a_east).with_color("#1f77b4").with_dia_times(next_dia()),
        Train::new(TrainId(1), "L1 west", line.d_west).with_color("#1f77b4").with_dia_times(next_dia()),
        Train::new(TrainId(2), "X1", line.a_east).with_color("#d62728").with_dia_times(next_dia()),
    ];
    tt.operations = vec![
        Operation::new(OperationId(0), vec![TrainId(0), TrainId(1)]),
        Operation::new(OperationId(1), vec![TrainId(2)]),
    ];

    tt.set_branch_command(TrainId(0), line.b_west_switch, BranchCommand::Straight);
    tt.set_branch_command(TrainId(1), line.b_east_switch, BranchCommand::Straight);
    tt.set_branch_command(TrainId(2), line.b_west_switch, BranchCommand::Branch);

    tt.validate()?;
    Ok(tt)
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let verbose = args.iter().any(|a| a == "-v" || a == "--verbose");
    let config_path = args.iter().find(|a| !a.starts_with('-')).map(String::as_str);
    let _logger = start_logger(verbose)?;

    println!("=== line: rust_rail demo ===");

    // 1. Network.
    let line = build_line()?;
    println!(
        "Network: {} half-tracks, {} switches, {} platforms",
        line.network.track_count(),
        line.network.switch_count(),
        line.network.platforms.len(),
    );

    // 2. Timetable, normalized.
    let raw = build_timetable(&line)?;
    let (timetable, report) = normalize(raw);
    println!("Normalizer: {} issues", report.issues.len());
    for issue in &report.issues {
        println!("  {issue:?}");
    }

    // 3. Sim.
    let config = load_config(config_path)?;
    println!(
        "Config: {} to {}, {} s/tick, {} ticks",
        config.start_time,
        config.end_time,
        config.time_step_secs,
        config.total_ticks(),
    );
    let mut sim = SimBuilder::new(config.clone(), line.network)
        .timetable(timetable)
        .build()?;

    // 4. Output.
    let dir = Path::new(OUTPUT_DIR);
    let writer = CsvWriter::new(dir)?;
    let step = config.time_step_secs as u64 * config.output_interval_ticks.max(1);
    let mut obs = RunObserver {
        output:        SimOutputObserver::new(writer, &config),
        timeline:      TimelineRecorder::new(step),
        position_rows: 0,
        summary_rows:  0,
    };

    // 5. Run.
    let t0 = Instant::now();
    sim.run(&mut obs);
    let elapsed = t0.elapsed();

    if let Some(e) = obs.output.take_error() {
        eprintln!("output error: {e}");
    }

    let timeline = obs.timeline.into_timeline();
    let file = File::create(dir.join("timeline.json"))?;
    serde_json::to_writer_pretty(BufWriter::new(file), &timeline)?;

    // 6. Summary.
    println!();
    println!("Simulation complete in {:.3} s", elapsed.as_secs_f64());
    println!("  train_positions.csv : {} rows", obs.position_rows);
    println!("  tick_summaries.csv  : {} rows", obs.summary_rows);
    println!("  timeline.json       : {} records ({} to {})", timeline.records.len(), timeline.min_time, timeline.max_time);
    println!();

    if !sim.diagnostics().is_empty() {
        println!("Diagnostics:");
        for d in sim.diagnostics() {
            println!("  {d:?}");
        }
        println!();
    }

    println!("{:<6} {:<10} {:<12} {:<10} {:<20}", "Id", "Train", "Status", "Track", "Position");
    println!("{}", "-".repeat(60));
    for t in sim.placed_trains() {
        println!(
            "{:<6} {:<10} {:<12} {:<10} {:<20}",
            t.id.0,
            t.name,
            format!("{:?}", t.operating_status),
            t.track.0,
            t.position.to_string(),
        );
    }

    Ok(())
}
