//! Graph searches over the track network.
//!
//! Both queries run [`rail_search::dijkstra`] over half-tracks.  The cost of
//! the hop `a → b` is the full length of `a`, so the distance the search
//! reports for a track is the length run *before* entering it.

use rail_core::{PlatformId, Point, TrackId};
use rail_search::{SearchGraph, dijkstra};

use crate::{NetworkResult, TrackNetwork};

/// Slack when deciding whether a stop point lies ahead of a position.
const AHEAD_EPS: f64 = 1e-9;

/// Half-tracks as search nodes; successors follow the switch patterns.
struct TrackGraph<'a> {
    network: &'a TrackNetwork,
}

impl SearchGraph for TrackGraph<'_> {
    type Node = TrackId;
    type Key = TrackId;

    fn identify(&self, node: &TrackId) -> TrackId {
        *node
    }

    fn neighbors(&self, node: &TrackId) -> Vec<TrackId> {
        self.network.successors(*node)
    }

    fn weight(&self, from: &TrackId, _to: &TrackId) -> f64 {
        self.network.track(*from).length()
    }
}

impl TrackNetwork {
    /// Distance along the rails from `position` on `track` to the stop point
    /// of `platform`.
    ///
    /// A stop point ahead on the current track counts directly; otherwise the
    /// nearest track carrying `platform` is searched for.  `Ok(None)` means
    /// the platform cannot be reached from here.
    pub fn distance_to_platform(
        &self,
        track:    TrackId,
        position: Point,
        platform: PlatformId,
    ) -> NetworkResult<Option<f64>> {
        let current = self.try_track(track)?;
        let offset = current.offset_of(position);

        if current.platform == Some(platform) && offset <= current.stop_offset() + AHEAD_EPS {
            return Ok(Some((current.stop_offset() - offset).max(0.0)));
        }

        let graph = TrackGraph { network: self };
        let outcome = dijkstra(&graph, track, |&t| t != track && self.track(t).platform == Some(platform))?;

        Ok(outcome.goal.map(|goal| {
            // goal.distance includes the whole of `track`; only the part
            // ahead of `position` is still to run.
            goal.distance - offset + self.track(goal.node).stop_offset()
        }))
    }

    /// First track to enter after `track` on the shortest way to any track
    /// carrying `platform`, or `None` if it cannot be reached.
    pub fn route_toward(&self, track: TrackId, platform: PlatformId) -> NetworkResult<Option<TrackId>> {
        self.try_track(track)?;
        let graph = TrackGraph { network: self };
        let outcome = dijkstra(&graph, track, |&t| t != track && self.track(t).platform == Some(platform))?;
        Ok(outcome.goal.and_then(|goal| goal.path.get(1).copied()))
    }

    /// Shortest distance from the start of `from` to the start of every
    /// reachable track.
    pub fn distances_from(&self, from: TrackId) -> NetworkResult<Vec<(TrackId, f64)>> {
        self.try_track(from)?;
        let graph = TrackGraph { network: self };
        let outcome = dijkstra(&graph, from, |_| false)?;
        let mut out: Vec<(TrackId, f64)> = outcome
            .reached
            .into_values()
            .map(|r| (r.node, r.distance))
            .collect();
        out.sort_unstable_by_key(|&(t, _)| t);
        Ok(out)
    }
}
