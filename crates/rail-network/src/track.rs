//! Directed half-tracks and the platforms attached to them.

use rail_core::{PlatformId, Point, StationId, SwitchId, TrackId};

/// One direction of a physical rail segment.
///
/// Always exists together with its `reverse`, which has swapped endpoints
/// and swapped switches.  Fields are `pub` for direct access on the movement
/// hot path; construct tracks only through
/// [`TrackNetworkBuilder`](crate::TrackNetworkBuilder).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Track {
    pub id:          TrackId,
    pub begin:       Point,
    pub end:         Point,
    /// The same rail traversed the other way.
    pub reverse:     TrackId,
    /// Switch met when leaving through `end`.
    pub next_switch: SwitchId,
    /// Switch met when leaving through `begin` (the reverse track's
    /// `next_switch`).
    pub prev_switch: SwitchId,
    /// Present exactly when this segment is a station stopping point.
    pub platform:    Option<PlatformId>,
}

impl Track {
    #[inline]
    pub fn length(&self) -> f64 {
        self.begin.distance(self.end)
    }

    /// Unit vector from `begin` to `end`.
    #[inline]
    pub fn direction(&self) -> Point {
        (self.end - self.begin).normalized()
    }

    /// Where a train stopping at this track's platform halts: the midpoint.
    #[inline]
    pub fn stop_point(&self) -> Point {
        self.begin.lerp(self.end, 0.5)
    }

    /// Distance from `begin` to the stop point.
    #[inline]
    pub fn stop_offset(&self) -> f64 {
        self.length() * 0.5
    }

    /// Distance of `p` from `begin`, measured along the track direction.
    ///
    /// Points off the segment are projected onto its line; the result is not
    /// clamped, so values below 0 or above `length()` mean "outside".
    #[inline]
    pub fn offset_of(&self, p: Point) -> f64 {
        (p - self.begin).dot(self.direction())
    }

    /// Point `offset` units from `begin` along the track.
    #[inline]
    pub fn point_at(&self, offset: f64) -> Point {
        self.begin + self.direction() * offset
    }
}

/// A stopping place belonging to a station.
///
/// A platform can be attached to both half-tracks of one rail so trains stop
/// there in either direction.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Platform {
    pub id:      PlatformId,
    pub station: StationId,
    pub name:    String,
}
