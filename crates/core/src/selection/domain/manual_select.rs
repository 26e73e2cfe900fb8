use crate::selection::domain::selection_policy::SelectionOutcome;
use crate::shared::bounding_box::{Candidate, Point};

/// Point-and-click selection: the candidate under the user's click is
/// committed immediately, without any dwell.
#[derive(Debug, Default)]
pub struct ManualSelect {
    pending_click: Option<Point>,
}

impl ManualSelect {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a click for the next `select` call. A newer click replaces
    /// one that has not been consumed yet.
    pub fn click(&mut self, point: Point) {
        self.pending_click = Some(point);
    }

    pub fn clear(&mut self) {
        self.pending_click = None;
    }

    pub fn has_pending_click(&self) -> bool {
        self.pending_click.is_some()
    }

    /// Consumes the pending click. The first candidate whose box strictly
    /// contains it wins; a click on empty space is discarded.
    pub fn select(&mut self, candidates: &[Candidate]) -> SelectionOutcome {
        let Some(point) = self.pending_click.take() else {
            return SelectionOutcome::NoSelection;
        };
        candidates
            .iter()
            .find(|c| c.bbox.strictly_contains(point))
            .map_or(SelectionOutcome::NoSelection, |c| SelectionOutcome::Selected(*c))
    }
}
