use std::time::Duration;

use crate::selection::domain::selection_policy::SelectionOutcome;
use crate::selection::domain::selection_region::SelectionRegion;
use crate::shared::bounding_box::Candidate;

/// Automatic selection: a face whose centre stays inside the selection
/// region for `lock_duration` becomes the target.
///
/// When several faces are in the region at once, the last one in detector
/// order wins and the outcome is flagged as ambiguous.
#[derive(Debug, Clone)]
pub struct AutoDwellLock {
    lock_duration: Duration,
}

impl AutoDwellLock {
    pub fn new(lock_duration: Duration) -> Self {
        Self { lock_duration }
    }

    pub fn lock_duration(&self) -> Duration {
        self.lock_duration
    }

    /// `elapsed_in_region` is how long the session has been dwelling, or
    /// `None` if dwelling has not started.
    pub fn select(
        &self,
        candidates: &[Candidate],
        region: &SelectionRegion,
        elapsed_in_region: Option<Duration>,
    ) -> SelectionOutcome {
        let mut in_region = candidates
            .iter()
            .filter(|c| region.holds_center_of(&c.bbox));
        let Some(first) = in_region.next() else {
            return SelectionOutcome::NotInRegion;
        };
        let (candidate, extra) = in_region.fold((first, 0usize), |(_, n), c| (c, n + 1));

        SelectionOutcome::InRegion {
            candidate: *candidate,
            dwell_complete: elapsed_in_region.is_some_and(|e| e >= self.lock_duration),
            ambiguous: extra > 0,
        }
    }
}
