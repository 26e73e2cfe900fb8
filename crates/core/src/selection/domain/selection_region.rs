use crate::shared::bounding_box::{BoundingBox, Point};

/// Fixed zone a face must dwell in before automatic locking.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SelectionRegion(BoundingBox);

impl SelectionRegion {
    pub fn new(bbox: BoundingBox) -> Self {
        Self(bbox)
    }

    pub fn centered(frame_w: u32, frame_h: u32, width: i32, height: i32) -> Self {
        Self(BoundingBox::centered(frame_w, frame_h, width, height))
    }

    pub fn bbox(&self) -> BoundingBox {
        self.0
    }

    /// Whether the centre of `bbox` lies strictly inside the region.
    pub fn holds_center_of(&self, bbox: &BoundingBox) -> bool {
        self.contains(bbox.center())
    }

    pub fn contains(&self, p: Point) -> bool {
        self.0.strictly_contains(p)
    }
}
