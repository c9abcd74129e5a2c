//! One-shot timetable normalization.
//!
//! Two passes, in order:
//!
//! 1. [`interpolate`] fills in every station a train runs through without a
//!    timetable entry, so that station occupancy is known everywhere.
//! 2. [`resolve_conflicts`] moves the later train of each overlapping pair to
//!    a free platform of the same station.
//!
//! Neither pass fails.  Anything that cannot be fixed is recorded in the
//! [`NormalizeReport`] and left as it was.

use log::{debug, info};
use rustc_hash::FxHashMap;

use rail_core::{PlatformId, SimTime, StationId, TrainId};

use crate::{DiaTime, Station, Timetable, Train};

// ── Report ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TimetableIssue {
    /// `train`'s visit to `station` moved from platform `from` to `to`.
    PlatformReassigned {
        train:   TrainId,
        station: StationId,
        from:    PlatformId,
        to:      PlatformId,
    },
    /// `first` and `second` both occupy `platform` around `at` and no other
    /// platform of `station` is free.
    UnresolvableConflict {
        station:  StationId,
        platform: PlatformId,
        first:    TrainId,
        second:   TrainId,
        at:       SimTime,
    },
    /// Stations between `from` and `to` could not be filled in for `train`.
    UninterpolableGap {
        train: TrainId,
        from:  StationId,
        to:    StationId,
    },
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NormalizeReport {
    pub issues: Vec<TimetableIssue>,
}

impl NormalizeReport {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn reassignments(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| matches!(i, TimetableIssue::PlatformReassigned { .. }))
            .count()
    }

    pub fn unresolved(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| matches!(i, TimetableIssue::UnresolvableConflict { .. }))
            .count()
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

/// Interpolate every train, then resolve platform conflicts.
pub fn normalize(mut timetable: Timetable) -> (Timetable, NormalizeReport) {
    let mut report = NormalizeReport::default();

    for i in 0..timetable.trains.len() {
        let (dense, gaps) = interpolate(&timetable.trains[i], &timetable.stations);
        timetable.trains[i].dia_times = dense;
        report.issues.extend(gaps);
    }

    resolve_conflicts(&mut timetable.trains, &timetable.stations, &mut report);

    info!(
        "normalized {} trains: {} platform reassignments, {} unresolved conflicts, {} issues total",
        timetable.trains.len(),
        report.reassignments(),
        report.unresolved(),
        report.issues.len(),
    );
    (timetable, report)
}

// ── Interpolation ─────────────────────────────────────────────────────────────

/// Return `train`'s schedule with an entry for every station it passes.
///
/// `stations` is in line order.  Between two consecutive entries whose
/// stations are not neighbours, each skipped station gets a passing entry
/// timed in proportion to line distance.  Existing entries are copied
/// unchanged, so a dense schedule comes back as it went in.
pub fn interpolate(train: &Train, stations: &[Station]) -> (Vec<DiaTime>, Vec<TimetableIssue>) {
    let order: FxHashMap<StationId, usize> =
        stations.iter().enumerate().map(|(i, s)| (s.id, i)).collect();

    let mut out = Vec::with_capacity(train.dia_times.len());
    let mut issues = Vec::new();

    for (k, cur) in train.dia_times.iter().enumerate() {
        out.push(cur.clone());
        let Some(next) = train.dia_times.get(k + 1) else { break };

        let gap = TimetableIssue::UninterpolableGap {
            train: train.id,
            from:  cur.station,
            to:    next.station,
        };
        let (Some(&ia), Some(&ib)) = (order.get(&cur.station), order.get(&next.station)) else {
            issues.push(gap);
            continue;
        };
        if ia.abs_diff(ib) <= 1 {
            continue;
        }
        let (Some(ta), Some(tb)) = (cur.leaving_time(), next.reaching_time()) else {
            issues.push(gap);
            continue;
        };

        let da = stations[ia].distance;
        let db = stations[ib].distance;
        let skipped: Vec<usize> = if ia < ib {
            (ia + 1..ib).collect()
        } else {
            (ib + 1..ia).rev().collect()
        };
        let span = ia.abs_diff(ib) as f64;

        for (n, &s) in skipped.iter().enumerate() {
            let station = &stations[s];
            let Some(&platform) = station.platforms.first() else {
                debug!("{} has no platform; not interpolated for {}", station.id, train.id);
                continue;
            };
            // Stations at equal kilometrage fall back to even spacing.
            let frac = if (db - da).abs() > f64::EPSILON {
                (station.distance - da) / (db - da)
            } else {
                (n + 1) as f64 / span
            };
            let secs = ((tb - ta) as f64 * frac.clamp(0.0, 1.0)).round() as i64;
            let mut entry = DiaTime::passing(station.id, platform, ta + secs);
            entry.interpolated = true;
            out.push(entry);
        }
    }

    (out, issues)
}

// ── Conflict resolution ───────────────────────────────────────────────────────

/// Move the later train of every platform clash to a free platform of the
/// same station, or report the clash.
///
/// Each pair `(i, j)` with `i < j` is visited once, and only train `j`'s
/// entry is ever moved.
pub fn resolve_conflicts(trains: &mut [Train], stations: &[Station], report: &mut NormalizeReport) {
    let by_id: FxHashMap<StationId, &Station> = stations.iter().map(|s| (s.id, s)).collect();

    for i in 0..trains.len() {
        for j in i + 1..trains.len() {
            for a in 0..trains[i].dia_times.len() {
                for b in 0..trains[j].dia_times.len() {
                    let first = &trains[i].dia_times[a];
                    let second = &trains[j].dia_times[b];
                    if first.station != second.station || first.platform != second.platform {
                        continue;
                    }
                    let (Some(ia), Some(ib)) = (first.interval(), second.interval()) else {
                        continue;
                    };
                    if !overlaps(ia, ib) {
                        continue;
                    }

                    let station = second.station;
                    let platform = second.platform;
                    let free = by_id
                        .get(&station)
                        .and_then(|s| free_platform(trains, j, s, platform, ib));

                    match free {
                        Some(to) => {
                            debug!("{} at {station}: {platform} -> {to}", trains[j].id);
                            trains[j].dia_times[b].platform = to;
                            report.issues.push(TimetableIssue::PlatformReassigned {
                                train: trains[j].id,
                                station,
                                from: platform,
                                to,
                            });
                        }
                        None => report.issues.push(TimetableIssue::UnresolvableConflict {
                            station,
                            platform,
                            first: trains[i].id,
                            second: trains[j].id,
                            at: ib.0.max(ia.0),
                        }),
                    }
                }
            }
        }
    }
}

#[inline]
fn overlaps(a: (SimTime, SimTime), b: (SimTime, SimTime)) -> bool {
    a.0 <= b.1 && b.0 <= a.1
}

/// First platform of `station` other than `current` that no train except
/// `moving` occupies during `interval`.
fn free_platform(
    trains:   &[Train],
    moving:   usize,
    station:  &Station,
    current:  PlatformId,
    interval: (SimTime, SimTime),
) -> Option<PlatformId> {
    station.platforms.iter().copied().filter(|&p| p != current).find(|&p| {
        trains.iter().enumerate().all(|(k, t)| {
            k == moving
                || t.dia_times.iter().all(|d| {
                    d.station != station.id
                        || d.platform != p
                        || d.interval().is_none_or(|iv| !overlaps(iv, interval))
                })
        })
    })
}
