//! The demo line.
//!
//! ```text
//!                        B2 (loop)
//!                    ┌──────────────┐
//!   A1 ─────────── ──┴── B1 ────────┴── ─────── C1 ─────── D1 ⟲
//!   0      200   300        500      700       900       1100
//! ```
//!
//! Every platform track stops in both directions.  D has a turnaround.

use anyhow::{Context, Result};

use rail_core::{PlatformId, Point, StationId, SwitchId, TrackId};
use rail_network::{TrackNetwork, TrackNetworkBuilder};

pub const STATION_A: StationId = StationId(0);
pub const STATION_B: StationId = StationId(1);
pub const STATION_C: StationId = StationId(2);
pub const STATION_D: StationId = StationId(3);

pub struct Line {
    pub network:  TrackNetwork,
    /// Eastbound start at A.
    pub a_east:   TrackId,
    /// Westbound start at D.
    pub d_west:   TrackId,
    pub a1:       PlatformId,
    pub b1:       PlatformId,
    pub b2:       PlatformId,
    pub c1:       PlatformId,
    pub d1:       PlatformId,
    /// Where the loop leaves the main line, eastbound.
    pub b_west_switch: SwitchId,
    /// Where the loop leaves the main line, westbound.
    pub b_east_switch: SwitchId,
}

fn p(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

pub fn build_line() -> Result<Line> {
    let mut b = TrackNetworkBuilder::new();

    let a1 = b.add_platform(STATION_A, "A1");
    let b1 = b.add_platform(STATION_B, "B1");
    let b2 = b.add_platform(STATION_B, "B2");
    let c1 = b.add_platform(STATION_C, "C1");
    let d1 = b.add_platform(STATION_D, "D1");

    let (a_east, _) = b.add_platform_track(p(0.0, 0.0), p(200.0, 0.0), a1)?;
    b.add_track(p(200.0, 0.0), p(300.0, 0.0))?;

    // Main line through B, then the passing loop.
    b.add_platform_track(p(300.0, 0.0), p(500.0, 0.0), b1)?;
    b.add_track(p(300.0, 0.0), p(350.0, 40.0))?;
    b.add_platform_track(p(350.0, 40.0), p(450.0, 40.0), b2)?;
    b.add_track(p(450.0, 40.0), p(500.0, 0.0))?;

    b.add_track(p(500.0, 0.0), p(700.0, 0.0))?;
    b.add_platform_track(p(700.0, 0.0), p(900.0, 0.0), c1)?;
    let (d_east, d_west) = b.add_platform_track(p(900.0, 0.0), p(1100.0, 0.0), d1)?;
    b.add_reversal(d_east)?;

    let network = b.build();
    network.validate()?;

    let b_west_switch = network
        .switch_at(p(300.0, 0.0), 1e-6)
        .context("no switch at the west end of B")?;
    let b_east_switch = network
        .switch_at(p(500.0, 0.0), 1e-6)
        .context("no switch at the east end of B")?;

    Ok(Line { network, a_east, d_west, a1, b1, b2, c1, d1, b_west_switch, b_east_switch })
}
