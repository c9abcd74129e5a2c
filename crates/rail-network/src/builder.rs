//! Incremental network construction.
//!
//! Editing and import collaborators build networks through this type; the
//! simulator only ever sees the frozen [`TrackNetwork`].
//!
//! # Threading rule
//!
//! Adding a rail always adds both half-tracks.  At each end the pair is
//! threaded into the switch found there (or a new one):
//!
//! - every existing track arriving at the point may continue onto the new
//!   outgoing half-track;
//! - the new incoming half-track may continue onto every existing track
//!   leaving the point;
//!
//! as long as the turn between the two is less than 90°.  Joining an existing
//! junction therefore appends patterns and never replaces them, and plain
//! reversals are never generated; use [`TrackNetworkBuilder::add_reversal`]
//! for a terminus turnaround.

use log::debug;

use rail_core::{PlatformId, Point, StationId, SwitchId, TrackId};

use crate::spatial::SwitchIndex;
use crate::{BranchCommand, NetworkError, NetworkResult, Platform, Switch, SwitchPattern, Track, TrackNetwork};

/// Default distance within which a new endpoint joins an existing switch.
pub const DEFAULT_SNAP_TOLERANCE: f64 = 1e-3;

/// Dot products at or below this count as a turn of 90° or more.
const MIN_TURN_DOT: f64 = 1e-9;

/// Construct a [`TrackNetwork`] incrementally, then call [`build`](Self::build).
///
/// # Example
///
/// ```
/// use rail_core::Point;
/// use rail_network::TrackNetworkBuilder;
///
/// let mut b = TrackNetworkBuilder::new();
/// let (a, _) = b.add_track(Point::new(0.0, 0.0), Point::new(100.0, 100.0)).unwrap();
/// let (c, _) = b.add_track(Point::new(100.0, 100.0), Point::new(200.0, 100.0)).unwrap();
/// let net = b.build();
/// assert_eq!(net.track_count(), 4);
/// assert_eq!(net.resolve_next(a, None).unwrap(), c);
/// ```
pub struct TrackNetworkBuilder {
    tracks:         Vec<Track>,
    switches:       Vec<Switch>,
    platforms:      Vec<Platform>,
    switch_idx:     SwitchIndex,
    snap_tolerance: f64,
}

impl TrackNetworkBuilder {
    pub fn new() -> Self {
        Self {
            tracks:         Vec::new(),
            switches:       Vec::new(),
            platforms:      Vec::new(),
            switch_idx:     SwitchIndex::new(),
            snap_tolerance: DEFAULT_SNAP_TOLERANCE,
        }
    }

    /// Endpoints closer than `tolerance` to an existing switch join it.
    pub fn with_snap_tolerance(mut self, tolerance: f64) -> Self {
        self.snap_tolerance = tolerance;
        self
    }

    pub fn track_count(&self) -> usize { self.tracks.len() }
    pub fn switch_count(&self) -> usize { self.switches.len() }

    /// Look up a track added earlier.
    pub fn track(&self, id: TrackId) -> NetworkResult<&Track> {
        self.tracks.get(id.index()).ok_or(NetworkError::TrackNotFound(id))
    }

    // ── Platforms ─────────────────────────────────────────────────────────

    /// Register a platform of `station` and return its id.
    pub fn add_platform(&mut self, station: StationId, name: impl Into<String>) -> PlatformId {
        let id = PlatformId(self.platforms.len() as u32);
        self.platforms.push(Platform { id, station, name: name.into() });
        id
    }

    /// Make `track` a stopping point of `platform`.  Only this direction is
    /// affected; attach the reverse track too for stops in both directions.
    pub fn attach_platform(&mut self, track: TrackId, platform: PlatformId) -> NetworkResult<()> {
        if platform.index() >= self.platforms.len() {
            return Err(NetworkError::PlatformNotFound(platform));
        }
        let t = self
            .tracks
            .get_mut(track.index())
            .ok_or(NetworkError::TrackNotFound(track))?;
        t.platform = Some(platform);
        Ok(())
    }

    // ── Tracks ────────────────────────────────────────────────────────────

    /// Add a rail from `begin` to `end`, returning `(forward, reverse)`.
    ///
    /// Endpoints within the snap tolerance of an existing switch are moved
    /// onto it.
    ///
    /// # Errors
    ///
    /// [`NetworkError::DegenerateTrack`] if both ends land on the same point.
    pub fn add_track(&mut self, begin: Point, end: Point) -> NetworkResult<(TrackId, TrackId)> {
        if begin.approx_eq(end, self.snap_tolerance) {
            return Err(NetworkError::DegenerateTrack(begin));
        }
        let sb = self.switch_at_or_new(begin);
        let se = self.switch_at_or_new(end);
        if sb == se {
            return Err(NetworkError::DegenerateTrack(begin));
        }
        let begin = self.switches[sb.index()].point;
        let end = self.switches[se.index()].point;

        let fwd = TrackId(self.tracks.len() as u32);
        let rev = TrackId(fwd.0 + 1);
        self.tracks.push(Track {
            id:          fwd,
            begin,
            end,
            reverse:     rev,
            next_switch: se,
            prev_switch: sb,
            platform:    None,
        });
        self.tracks.push(Track {
            id:          rev,
            begin:       end,
            end:         begin,
            reverse:     fwd,
            next_switch: sb,
            prev_switch: se,
            platform:    None,
        });

        self.thread(se, fwd, rev);
        self.thread(sb, rev, fwd);

        debug!("added {fwd}/{rev} from {begin} to {end}");
        Ok((fwd, rev))
    }

    /// Convenience: add a rail whose both directions stop at `platform`.
    pub fn add_platform_track(
        &mut self,
        begin:    Point,
        end:      Point,
        platform: PlatformId,
    ) -> NetworkResult<(TrackId, TrackId)> {
        let (fwd, rev) = self.add_track(begin, end)?;
        self.attach_platform(fwd, platform)?;
        self.attach_platform(rev, platform)?;
        Ok((fwd, rev))
    }

    /// Allow trains running off `track.end` to turn back onto its reverse.
    pub fn add_reversal(&mut self, track: TrackId) -> NetworkResult<()> {
        let reverse = self.track(track)?.reverse;
        self.add_pattern(track, reverse, None)
    }

    /// Add (or re-tag) the transition `from → to`.
    ///
    /// # Errors
    ///
    /// [`NetworkError::PatternNotConnected`] if `from` does not end where
    /// `to` begins.
    pub fn add_pattern(&mut self, from: TrackId, to: TrackId, tag: Option<BranchCommand>) -> NetworkResult<()> {
        let switch = self.track(from)?.next_switch;
        if self.track(to)?.prev_switch != switch {
            return Err(NetworkError::PatternNotConnected { from, to });
        }
        let patterns = &mut self.switches[switch.index()].patterns;
        match patterns.iter_mut().find(|p| p.from == from && p.to == to) {
            Some(existing) => existing.tag = tag.or(existing.tag),
            None => patterns.push(SwitchPattern { from, to, tag }),
        }
        Ok(())
    }

    /// Consume the builder and produce a [`TrackNetwork`].
    pub fn build(self) -> TrackNetwork {
        TrackNetwork {
            tracks:     self.tracks,
            switches:   self.switches,
            platforms:  self.platforms,
            switch_idx: self.switch_idx,
        }
    }

    // ── Private helpers ───────────────────────────────────────────────────

    fn switch_at_or_new(&mut self, point: Point) -> SwitchId {
        if let Some(id) = self.switch_idx.within(point, self.snap_tolerance) {
            return id;
        }
        let id = SwitchId(self.switches.len() as u32);
        self.switches.push(Switch { id, point, patterns: Vec::new() });
        self.switch_idx.insert(point, id);
        id
    }

    /// Thread a new half-track pair into `switch`.  `incoming` ends at the
    /// switch, `outgoing` begins there.
    fn thread(&mut self, switch: SwitchId, incoming: TrackId, outgoing: TrackId) {
        let in_dir = self.tracks[incoming.index()].direction();
        let out_dir = self.tracks[outgoing.index()].direction();

        let mut added = Vec::new();
        for t in &self.tracks {
            if t.id == incoming || t.id == outgoing {
                continue;
            }
            if t.next_switch == switch && t.direction().dot(out_dir) > MIN_TURN_DOT {
                added.push(SwitchPattern { from: t.id, to: outgoing, tag: None });
            }
            if t.prev_switch == switch && in_dir.dot(t.direction()) > MIN_TURN_DOT {
                added.push(SwitchPattern { from: incoming, to: t.id, tag: None });
            }
        }
        self.switches[switch.index()].patterns.extend(added);
    }
}

impl Default for TrackNetworkBuilder {
    fn default() -> Self {
        Self::new()
    }
}
