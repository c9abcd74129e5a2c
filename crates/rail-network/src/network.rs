//! The frozen track network and its traversal rules.

use rail_core::{PlatformId, Point, SwitchId, TrackId};

use crate::spatial::SwitchIndex;
use crate::{BranchCommand, NetworkError, NetworkResult, Platform, Switch, SwitchPattern, Track};

/// Minimum dot product for two legs to count as the same direction when
/// comparing candidates.
const COLLINEAR_EPS: f64 = 1e-9;

/// Tolerance for endpoint equality in [`TrackNetwork::validate`].
const POINT_EPS: f64 = 1e-6;

// ── TrackNetwork ──────────────────────────────────────────────────────────────

/// Directed track graph in flat arenas.
///
/// All arenas are indexed by their id type (`tracks[TrackId]`, ...).  The
/// network is read-only once built; a simulation borrows it for its whole
/// run.  Do not construct directly; use
/// [`TrackNetworkBuilder`](crate::TrackNetworkBuilder).
#[derive(Debug, Clone)]
pub struct TrackNetwork {
    pub tracks:    Vec<Track>,
    pub switches:  Vec<Switch>,
    pub platforms: Vec<Platform>,
    pub(crate) switch_idx: SwitchIndex,
}

impl TrackNetwork {
    /// A network with no tracks.  Any placement against it fails.
    pub fn empty() -> Self {
        crate::TrackNetworkBuilder::new().build()
    }

    // ── Dimensions ────────────────────────────────────────────────────────

    pub fn track_count(&self) -> usize {
        self.tracks.len()
    }

    pub fn switch_count(&self) -> usize {
        self.switches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    // ── Element access ────────────────────────────────────────────────────

    /// Direct indexed access.  Panics on an id from another network.
    #[inline]
    pub fn track(&self, id: TrackId) -> &Track {
        &self.tracks[id.index()]
    }

    #[inline]
    pub fn switch(&self, id: SwitchId) -> &Switch {
        &self.switches[id.index()]
    }

    /// Checked access for ids coming from outside the network.
    pub fn try_track(&self, id: TrackId) -> NetworkResult<&Track> {
        self.tracks.get(id.index()).ok_or(NetworkError::TrackNotFound(id))
    }

    pub fn platform(&self, id: PlatformId) -> NetworkResult<&Platform> {
        self.platforms.get(id.index()).ok_or(NetworkError::PlatformNotFound(id))
    }

    #[inline]
    pub fn reverse(&self, id: TrackId) -> TrackId {
        self.track(id).reverse
    }

    /// Every half-track carrying `platform`.
    pub fn tracks_with_platform(&self, platform: PlatformId) -> Vec<TrackId> {
        self.tracks
            .iter()
            .filter(|t| t.platform == Some(platform))
            .map(|t| t.id)
            .collect()
    }

    // ── Connectivity ──────────────────────────────────────────────────────

    /// Patterns leaving `track` through its next switch.
    pub fn outgoing(&self, track: TrackId) -> impl Iterator<Item = &SwitchPattern> + '_ {
        self.switch(self.track(track).next_switch).patterns_from(track)
    }

    /// Every track directly reachable from `track`, in pattern order.
    pub fn successors(&self, track: TrackId) -> Vec<TrackId> {
        self.outgoing(track).map(|p| p.to).collect()
    }

    /// `true` if leaving `track` needs a branch decision.
    pub fn is_branch(&self, track: TrackId) -> bool {
        self.outgoing(track).nth(1).is_some()
    }

    // ── Next-track resolution ─────────────────────────────────────────────

    /// The track a train on `track` enters when it runs off `track.end`.
    ///
    /// - no pattern → [`NetworkError::NoOutgoingTrack`];
    /// - one pattern → its `to`, `command` ignored;
    /// - several → a pattern tagged with the command wins.  Otherwise legs
    ///   tagged for the other command drop out: a single untagged leg is
    ///   taken, two untagged legs are told apart by geometry (Straight = the
    ///   leg deviating least from `track`'s direction), anything else is
    ///   [`NetworkError::AmbiguousBranch`].
    ///
    /// `None` for `command` means Straight.
    pub fn resolve_next(&self, track: TrackId, command: Option<BranchCommand>) -> NetworkResult<TrackId> {
        let switch = self.track(track).next_switch;
        let candidates: Vec<&SwitchPattern> = self.outgoing(track).collect();

        match candidates.as_slice() {
            [] => Err(NetworkError::NoOutgoingTrack { track, switch }),
            [only] => Ok(only.to),
            many => {
                let command = command.unwrap_or_default();
                if let Some(tagged) = many.iter().find(|p| p.tag == Some(command)) {
                    return Ok(tagged.to);
                }
                // Legs tagged for the other command are never taken.
                let open: Vec<TrackId> = many.iter().filter(|p| p.tag.is_none()).map(|p| p.to).collect();
                match open.as_slice() {
                    [only] => Ok(*only),
                    [a, b] => {
                        let (straight, branch) = self.split_legs(track, *a, *b);
                        Ok(match command {
                            BranchCommand::Straight => straight,
                            BranchCommand::Branch   => branch,
                        })
                    }
                    _ => Err(NetworkError::AmbiguousBranch {
                        track,
                        switch,
                        candidates: many.len(),
                    }),
                }
            }
        }
    }

    /// Order two candidate legs as `(straight, branch)` relative to `track`.
    /// Ties keep pattern order.
    fn split_legs(&self, track: TrackId, a: TrackId, b: TrackId) -> (TrackId, TrackId) {
        let dir = self.track(track).direction();
        let dot_a = dir.dot(self.track(a).direction());
        let dot_b = dir.dot(self.track(b).direction());
        if dot_b > dot_a + COLLINEAR_EPS { (b, a) } else { (a, b) }
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// The switch nearest to `point`; `None` only for an empty network.
    pub fn nearest_switch(&self, point: Point) -> Option<SwitchId> {
        self.switch_idx.nearest(point)
    }

    /// The switch at `point`, within `tolerance`.
    pub fn switch_at(&self, point: Point, tolerance: f64) -> Option<SwitchId> {
        self.switch_idx.within(point, tolerance)
    }

    // ── Invariants ────────────────────────────────────────────────────────

    /// Check the pairing invariant and switch-pattern closure.
    ///
    /// - `t.reverse.reverse == t`, with swapped endpoints and switches;
    /// - every pattern `(from, to)` at switch `s` has
    ///   `from.end == to.begin == s.point` and the matching switch ids.
    pub fn validate(&self) -> NetworkResult<()> {
        for t in &self.tracks {
            let r = self.try_track(t.reverse)?;
            let paired = r.reverse == t.id
                && r.id != t.id
                && r.begin.approx_eq(t.end, POINT_EPS)
                && r.end.approx_eq(t.begin, POINT_EPS)
                && r.next_switch == t.prev_switch
                && r.prev_switch == t.next_switch;
            if !paired {
                return Err(NetworkError::PairingBroken(t.id));
            }
        }

        for s in &self.switches {
            for p in &s.patterns {
                let from = self.try_track(p.from)?;
                let to = self.try_track(p.to)?;
                let connected = from.next_switch == s.id
                    && to.prev_switch == s.id
                    && from.end.approx_eq(s.point, POINT_EPS)
                    && to.begin.approx_eq(s.point, POINT_EPS);
                if !connected {
                    return Err(NetworkError::PatternNotConnected { from: p.from, to: p.to });
                }
            }
        }
        Ok(())
    }
}
