//! Junctions and the transitions they allow.

use rail_core::{Point, SwitchId, TrackId};

/// Which way a train should take at a genuine branch.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BranchCommand {
    /// Continue on the collinear leg.
    #[default]
    Straight,
    /// Take the diverging leg.
    Branch,
}

impl BranchCommand {
    pub fn as_str(self) -> &'static str {
        match self {
            BranchCommand::Straight => "straight",
            BranchCommand::Branch   => "branch",
        }
    }
}

impl std::fmt::Display for BranchCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One allowed directed transition through a switch.
///
/// `tag` pre-classifies the pattern for junctions whose legs geometry cannot
/// sort out (three or more outgoing legs).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SwitchPattern {
    pub from: TrackId,
    pub to:   TrackId,
    pub tag:  Option<BranchCommand>,
}

/// A junction at a physical point.
///
/// Invariant: for every pattern, `from.end == to.begin == point`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Switch {
    pub id:       SwitchId,
    pub point:    Point,
    pub patterns: Vec<SwitchPattern>,
}

impl Switch {
    /// Patterns leaving through this switch from `track`.
    pub fn patterns_from(&self, track: TrackId) -> impl Iterator<Item = &SwitchPattern> + '_ {
        self.patterns.iter().filter(move |p| p.from == track)
    }

    pub fn has_pattern(&self, from: TrackId, to: TrackId) -> bool {
        self.patterns.iter().any(|p| p.from == from && p.to == to)
    }
}
