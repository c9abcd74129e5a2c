//! Unit tests for rail-network.
//!
//! All tests use hand-drawn layouts so distances are easy to check by eye.

#[cfg(test)]
mod helpers {
    use rail_core::{PlatformId, Point, StationId, TrackId};

    use crate::{TrackNetwork, TrackNetworkBuilder};

    pub fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    /// Straight line of three 100-unit rails along y = 0:
    ///
    /// ```text
    /// (0,0) ── t0 ── (100,0) ── t1 ── (200,0) ── t2 ── (300,0)
    /// ```
    ///
    /// `t2` (both directions) carries platform 0.
    pub fn line() -> (TrackNetwork, [TrackId; 3], PlatformId) {
        let mut b = TrackNetworkBuilder::new();
        let plat = b.add_platform(StationId(0), "1");
        let (t0, _) = b.add_track(p(0.0, 0.0), p(100.0, 0.0)).unwrap();
        let (t1, _) = b.add_track(p(100.0, 0.0), p(200.0, 0.0)).unwrap();
        let (t2, _) = b.add_platform_track(p(200.0, 0.0), p(300.0, 0.0), plat).unwrap();
        (b.build(), [t0, t1, t2], plat)
    }

    /// Y junction at (100,0): stem from the west, a straight leg east and a
    /// diverging leg north-east.
    ///
    /// ```text
    ///                      / branch ── (200,50)
    /// (0,0) ── stem ── (100,0)
    ///                      \ straight ── (200,0)
    /// ```
    pub struct Junction {
        pub net:      TrackNetwork,
        pub stem:     TrackId,
        pub straight: TrackId,
        pub branch:   TrackId,
        pub platform: PlatformId,
    }

    pub fn junction() -> Junction {
        let mut b = TrackNetworkBuilder::new();
        let platform = b.add_platform(StationId(1), "north");
        let (stem, _) = b.add_track(p(0.0, 0.0), p(100.0, 0.0)).unwrap();
        let (straight, _) = b.add_track(p(100.0, 0.0), p(200.0, 0.0)).unwrap();
        let (branch, _) = b.add_platform_track(p(100.0, 0.0), p(200.0, 50.0), platform).unwrap();
        Junction { net: b.build(), stem, straight, branch, platform }
    }
}

// ── Construction & invariants ─────────────────────────────────────────────────

#[cfg(test)]
mod builder {
    use super::helpers::{junction, line, p};
    use crate::{NetworkError, TrackNetworkBuilder};

    #[test]
    fn add_track_creates_reverse_pair() {
        let mut b = TrackNetworkBuilder::new();
        let (fwd, rev) = b.add_track(p(0.0, 0.0), p(100.0, 100.0)).unwrap();
        let net = b.build();

        assert_eq!(net.track_count(), 2);
        assert_eq!(net.switch_count(), 2);
        let f = net.track(fwd);
        let r = net.track(rev);
        assert_eq!(f.reverse, rev);
        assert_eq!(r.reverse, fwd);
        assert_eq!(r.begin, f.end);
        assert_eq!(r.end, f.begin);
        assert_eq!(r.next_switch, f.prev_switch);
    }

    #[test]
    fn pairing_invariant_holds_everywhere() {
        let j = junction();
        for t in &j.net.tracks {
            let r = j.net.track(t.reverse);
            assert_eq!(j.net.track(r.reverse).id, t.id);
            assert_eq!(r.begin, t.end);
            assert_eq!(r.end, t.begin);
        }
        j.net.validate().unwrap();
    }

    #[test]
    fn switch_pattern_closure() {
        let (net, _, _) = line();
        for s in &net.switches {
            for pat in &s.patterns {
                assert_eq!(net.track(pat.from).end, net.track(pat.to).begin);
                assert_eq!(net.track(pat.from).end, s.point);
            }
        }
        net.validate().unwrap();
    }

    #[test]
    fn joining_existing_switch_appends_pattern() {
        let j = junction();
        let at = j.net.track(j.stem).next_switch;
        let from_stem: Vec<_> = j.net.switch(at).patterns_from(j.stem).map(|x| x.to).collect();
        assert_eq!(from_stem, vec![j.straight, j.branch]);
    }

    #[test]
    fn no_sharp_turns_between_legs() {
        let j = junction();
        // Coming back along the straight leg the only way on is the stem.
        let back = j.net.reverse(j.straight);
        assert_eq!(j.net.successors(back), vec![j.net.reverse(j.stem)]);
    }

    #[test]
    fn degenerate_track_rejected() {
        let mut b = TrackNetworkBuilder::new();
        let err = b.add_track(p(5.0, 5.0), p(5.0, 5.0)).unwrap_err();
        assert!(matches!(err, NetworkError::DegenerateTrack(_)));
    }

    #[test]
    fn endpoints_snap_to_nearby_switch() {
        let mut b = TrackNetworkBuilder::new().with_snap_tolerance(0.5);
        let (a, _) = b.add_track(p(0.0, 0.0), p(100.0, 0.0)).unwrap();
        let (c, _) = b.add_track(p(100.2, 0.0), p(200.0, 0.0)).unwrap();
        let net = b.build();
        assert_eq!(net.switch_count(), 3);
        assert_eq!(net.track(c).begin, p(100.0, 0.0));
        assert_eq!(net.resolve_next(a, None).unwrap(), c);
    }

    #[test]
    fn unconnected_pattern_rejected() {
        let mut b = TrackNetworkBuilder::new();
        let (a, _) = b.add_track(p(0.0, 0.0), p(100.0, 0.0)).unwrap();
        let (c, _) = b.add_track(p(300.0, 0.0), p(400.0, 0.0)).unwrap();
        let err = b.add_pattern(a, c, None).unwrap_err();
        assert!(matches!(err, NetworkError::PatternNotConnected { .. }));
    }

    #[test]
    fn unknown_platform_rejected() {
        let mut b = TrackNetworkBuilder::new();
        let (a, _) = b.add_track(p(0.0, 0.0), p(100.0, 0.0)).unwrap();
        let err = b.attach_platform(a, rail_core::PlatformId(9)).unwrap_err();
        assert!(matches!(err, NetworkError::PlatformNotFound(_)));
    }

    #[test]
    fn tracks_with_platform_lists_both_directions() {
        let (net, [_, _, t2], plat) = line();
        let carrying = net.tracks_with_platform(plat);
        assert_eq!(carrying, vec![t2, net.reverse(t2)]);
        assert_eq!(net.platform(plat).unwrap().name, "1");
    }
}

// ── Next-track resolution ─────────────────────────────────────────────────────

#[cfg(test)]
mod resolve {
    use super::helpers::{junction, line, p};
    use crate::{BranchCommand, NetworkError, TrackNetworkBuilder};

    #[test]
    fn pass_through_ignores_command() {
        let (net, [t0, t1, _], _) = line();
        assert!(!net.is_branch(t0));
        assert_eq!(net.resolve_next(t0, None).unwrap(), t1);
        assert_eq!(net.resolve_next(t0, Some(BranchCommand::Branch)).unwrap(), t1);
    }

    #[test]
    fn dead_end_is_no_outgoing_track() {
        let (net, [_, _, t2], _) = line();
        let err = net.resolve_next(t2, None).unwrap_err();
        assert!(matches!(err, NetworkError::NoOutgoingTrack { track, .. } if track == t2));
    }

    #[test]
    fn reversal_turns_train_back() {
        let mut b = TrackNetworkBuilder::new();
        let (a, ra) = b.add_track(p(0.0, 0.0), p(100.0, 0.0)).unwrap();
        b.add_reversal(a).unwrap();
        let net = b.build();
        assert_eq!(net.resolve_next(a, None).unwrap(), ra);
        net.validate().unwrap();
    }

    #[test]
    fn branch_geometry_picks_collinear_leg_as_straight() {
        let j = junction();
        assert!(j.net.is_branch(j.stem));
        assert_eq!(j.net.resolve_next(j.stem, Some(BranchCommand::Straight)).unwrap(), j.straight);
        assert_eq!(j.net.resolve_next(j.stem, Some(BranchCommand::Branch)).unwrap(), j.branch);
    }

    #[test]
    fn unspecified_command_defaults_to_straight() {
        let j = junction();
        assert_eq!(j.net.resolve_next(j.stem, None).unwrap(), j.straight);
    }

    #[test]
    fn geometry_independent_of_pattern_order() {
        // Diverging leg added first this time.
        let mut b = TrackNetworkBuilder::new();
        let (stem, _) = b.add_track(p(0.0, 0.0), p(100.0, 0.0)).unwrap();
        let (branch, _) = b.add_track(p(100.0, 0.0), p(200.0, -60.0)).unwrap();
        let (straight, _) = b.add_track(p(100.0, 0.0), p(200.0, 0.0)).unwrap();
        let net = b.build();
        assert_eq!(net.resolve_next(stem, None).unwrap(), straight);
        assert_eq!(net.resolve_next(stem, Some(BranchCommand::Branch)).unwrap(), branch);
    }

    #[test]
    fn tag_for_other_command_excludes_leg() {
        // The collinear leg is tagged Branch, so Straight must take the
        // diverging one despite the geometry.
        let mut b = TrackNetworkBuilder::new();
        let (stem, _) = b.add_track(p(0.0, 0.0), p(100.0, 0.0)).unwrap();
        let (collinear, _) = b.add_track(p(100.0, 0.0), p(200.0, 0.0)).unwrap();
        let (diverging, _) = b.add_track(p(100.0, 0.0), p(200.0, 50.0)).unwrap();
        b.add_pattern(stem, collinear, Some(BranchCommand::Branch)).unwrap();
        let net = b.build();

        assert_eq!(net.resolve_next(stem, Some(BranchCommand::Straight)).unwrap(), diverging);
        assert_eq!(net.resolve_next(stem, None).unwrap(), diverging);
        assert_eq!(net.resolve_next(stem, Some(BranchCommand::Branch)).unwrap(), collinear);
    }

    #[test]
    fn both_legs_tagged_for_other_command_is_ambiguous() {
        let mut b = TrackNetworkBuilder::new();
        let (stem, _) = b.add_track(p(0.0, 0.0), p(100.0, 0.0)).unwrap();
        let (east, _) = b.add_track(p(100.0, 0.0), p(200.0, 0.0)).unwrap();
        let (north, _) = b.add_track(p(100.0, 0.0), p(200.0, 50.0)).unwrap();
        b.add_pattern(stem, east, Some(BranchCommand::Branch)).unwrap();
        b.add_pattern(stem, north, Some(BranchCommand::Branch)).unwrap();
        let net = b.build();

        let err = net.resolve_next(stem, Some(BranchCommand::Straight));
        assert!(matches!(err, Err(NetworkError::AmbiguousBranch { candidates: 2, .. })));
    }

    #[test]
    fn three_way_junction_needs_tags() {
        let mut b = TrackNetworkBuilder::new();
        let (stem, _) = b.add_track(p(0.0, 0.0), p(100.0, 0.0)).unwrap();
        let (mid, _) = b.add_track(p(100.0, 0.0), p(200.0, 0.0)).unwrap();
        let (left, _) = b.add_track(p(100.0, 0.0), p(200.0, 50.0)).unwrap();
        let (_right, _) = b.add_track(p(100.0, 0.0), p(200.0, -50.0)).unwrap();

        let untagged = {
            let mut b2 = TrackNetworkBuilder::new();
            let (s, _) = b2.add_track(p(0.0, 0.0), p(100.0, 0.0)).unwrap();
            b2.add_track(p(100.0, 0.0), p(200.0, 0.0)).unwrap();
            b2.add_track(p(100.0, 0.0), p(200.0, 50.0)).unwrap();
            b2.add_track(p(100.0, 0.0), p(200.0, -50.0)).unwrap();
            b2.build().resolve_next(s, None)
        };
        assert!(matches!(untagged, Err(NetworkError::AmbiguousBranch { candidates: 3, .. })));

        b.add_pattern(stem, mid, Some(BranchCommand::Straight)).unwrap();
        b.add_pattern(stem, left, Some(BranchCommand::Branch)).unwrap();
        let net = b.build();
        assert_eq!(net.resolve_next(stem, None).unwrap(), mid);
        assert_eq!(net.resolve_next(stem, Some(BranchCommand::Branch)).unwrap(), left);
    }
}

// ── Searches over the network ─────────────────────────────────────────────────

#[cfg(test)]
mod routing {
    use super::helpers::{junction, line, p};

    #[test]
    fn distance_across_tracks_to_stop_point() {
        let (net, [t0, _, _], plat) = line();
        // 100 (t0) + 100 (t1) + 50 (half of t2).
        let d = net.distance_to_platform(t0, p(0.0, 0.0), plat).unwrap();
        assert_eq!(d, Some(250.0));
        let d = net.distance_to_platform(t0, p(40.0, 0.0), plat).unwrap();
        assert_eq!(d, Some(210.0));
    }

    #[test]
    fn stop_point_ahead_on_same_track() {
        let (net, [_, _, t2], plat) = line();
        let d = net.distance_to_platform(t2, p(220.0, 0.0), plat).unwrap();
        assert_eq!(d, Some(30.0));
    }

    #[test]
    fn stop_point_behind_with_no_way_round_is_none() {
        let (net, [_, _, t2], plat) = line();
        let d = net.distance_to_platform(t2, p(290.0, 0.0), plat).unwrap();
        assert_eq!(d, None);
    }

    #[test]
    fn route_toward_picks_leg_leading_to_platform() {
        let j = junction();
        assert_eq!(j.net.route_toward(j.stem, j.platform).unwrap(), Some(j.branch));
        assert_eq!(j.net.route_toward(j.straight, j.platform).unwrap(), None);
    }

    #[test]
    fn distances_from_covers_reachable_tracks() {
        let (net, [t0, t1, t2], _) = line();
        let d = net.distances_from(t0).unwrap();
        assert_eq!(d, vec![(t0, 0.0), (t1, 100.0), (t2, 200.0)]);
    }

    #[test]
    fn nearest_switch_lookup() {
        let j = junction();
        let s = j.net.nearest_switch(p(99.0, 1.0)).unwrap();
        assert_eq!(s, j.net.track(j.stem).next_switch);
        assert!(j.net.switch_at(p(150.0, 0.0), 1.0).is_none());
    }
}
