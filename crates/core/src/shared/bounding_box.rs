use serde::{Deserialize, Serialize};

/// A pixel position inside a frame, e.g. a user click.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned box in pixel coordinates: top-left corner plus size.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl BoundingBox {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Box of the given size centred in a `frame_w` x `frame_h` frame.
    pub fn centered(frame_w: u32, frame_h: u32, width: i32, height: i32) -> Self {
        let x = (frame_w as i32 - width) / 2;
        let y = (frame_h as i32 - height) / 2;
        Self::new(x, y, width, height)
    }

    pub fn is_valid(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    /// Integer centre, rounding toward the top-left.
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2, self.y + self.height / 2)
    }

    /// True when `p` lies strictly inside the box; points on an edge are outside.
    pub fn strictly_contains(&self, p: Point) -> bool {
        self.x < p.x && p.x < self.right() && self.y < p.y && p.y < self.bottom()
    }

    pub fn iou(&self, other: &BoundingBox) -> f64 {
        let ix1 = self.x.max(other.x);
        let iy1 = self.y.max(other.y);
        let ix2 = self.right().min(other.right());
        let iy2 = self.bottom().min(other.bottom());

        let inter = (ix2 - ix1).max(0) as f64 * (iy2 - iy1).max(0) as f64;
        if inter == 0.0 {
            return 0.0;
        }

        let area_a = self.width as f64 * self.height as f64;
        let area_b = other.width as f64 * other.height as f64;
        inter / (area_a + area_b - inter)
    }
}

/// A detected face: box plus detector confidence in [0, 1].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    #[serde(flatten)]
    pub bbox: BoundingBox,
    pub confidence: f64,
}

impl Candidate {
    pub fn new(bbox: BoundingBox, confidence: f64) -> Self {
        Self { bbox, confidence }
    }

    /// Keeps candidates with `confidence >= threshold` and a non-empty box,
    /// preserving detector order.
    pub fn filter_confident(candidates: &[Candidate], threshold: f64) -> Vec<Candidate> {
        candidates
            .iter()
            .filter(|c| c.confidence >= threshold && c.bbox.is_valid())
            .copied()
            .collect()
    }
}
