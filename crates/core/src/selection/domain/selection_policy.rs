use std::time::Duration;

use crate::selection::domain::auto_dwell_lock::AutoDwellLock;
use crate::selection::domain::manual_select::ManualSelect;
use crate::selection::domain::selection_region::SelectionRegion;
use crate::shared::bounding_box::{Candidate, Point};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SelectionOutcome {
    /// Commit to this candidate now, skipping the dwell.
    Selected(Candidate),
    /// A candidate is dwelling inside the selection region.
    InRegion {
        candidate: Candidate,
        dwell_complete: bool,
        ambiguous: bool,
    },
    NotInRegion,
    NoSelection,
}

/// How a session picks its target; fixed when the session is built.
#[derive(Debug)]
pub enum SelectionPolicy {
    Manual(ManualSelect),
    AutoDwell(AutoDwellLock),
}

impl SelectionPolicy {
    pub fn manual() -> Self {
        Self::Manual(ManualSelect::new())
    }

    pub fn auto_dwell(lock_duration: Duration) -> Self {
        Self::AutoDwell(AutoDwellLock::new(lock_duration))
    }

    pub fn select(
        &mut self,
        candidates: &[Candidate],
        region: &SelectionRegion,
        elapsed_in_region: Option<Duration>,
    ) -> SelectionOutcome {
        match self {
            Self::Manual(policy) => policy.select(candidates),
            Self::AutoDwell(policy) => policy.select(candidates, region, elapsed_in_region),
        }
    }

    /// Forwards a user click. Returns `false` when the policy ignores clicks.
    pub fn click(&mut self, point: Point) -> bool {
        match self {
            Self::Manual(policy) => {
                policy.click(point);
                true
            }
            Self::AutoDwell(_) => false,
        }
    }

    /// Drops any pending user input.
    pub fn clear(&mut self) {
        if let Self::Manual(policy) = self {
            policy.clear();
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Manual(_) => "manual",
            Self::AutoDwell(_) => "auto-dwell",
        }
    }
}
