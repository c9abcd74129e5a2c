//! Read-only lookup maps consulted by the engine every tick.

use rustc_hash::FxHashMap;

use rail_core::{PlatformId, SwitchId, TrainId};
use rail_network::BranchCommand;

use crate::Timetable;

/// Lookups built once from a normalized [`Timetable`].
///
/// A train may stop at the same platform more than once, so stops are kept
/// as ascending lists of `dia_times` indices.
#[derive(Debug, Default, Clone)]
pub struct TimetableIndex {
    branch: FxHashMap<(TrainId, SwitchId), BranchCommand>,
    stops:  FxHashMap<(TrainId, PlatformId), Vec<usize>>,
}

impl TimetableIndex {
    pub fn build(timetable: &Timetable) -> Self {
        let mut branch = FxHashMap::default();
        for e in &timetable.branch_commands {
            branch.insert((e.train, e.switch), e.command);
        }

        let mut stops: FxHashMap<(TrainId, PlatformId), Vec<usize>> = FxHashMap::default();
        for train in &timetable.trains {
            for (i, d) in train.dia_times.iter().enumerate() {
                if !d.is_passing {
                    stops.entry((train.id, d.platform)).or_default().push(i);
                }
            }
        }

        Self { branch, stops }
    }

    /// Branch command for `train` at `switch`, if the timetable gives one.
    #[inline]
    pub fn branch_command(&self, train: TrainId, switch: SwitchId) -> Option<BranchCommand> {
        self.branch.get(&(train, switch)).copied()
    }

    /// The `dia_times` index of the first stop of `train` at `platform`
    /// whose index is `from` or later.
    pub fn stop_at(&self, train: TrainId, platform: PlatformId, from: usize) -> Option<usize> {
        self.stops
            .get(&(train, platform))
            .and_then(|v| v.iter().copied().find(|&i| i >= from))
    }

    pub fn branch_command_count(&self) -> usize {
        self.branch.len()
    }
}
