use std::fmt;

use crate::command::domain::channel::Command;
use crate::shared::bounding_box::BoundingBox;
use crate::shared::constants::ZONE_COUNT;

/// Horizontal fifth of the frame that holds the tracked face.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Zone {
    FarLeft,
    Left,
    Center,
    Right,
    FarRight,
}

impl Zone {
    pub const ALL: [Zone; 5] = [
        Zone::FarLeft,
        Zone::Left,
        Zone::Center,
        Zone::Right,
        Zone::FarRight,
    ];

    pub fn command(&self) -> Command {
        match self {
            Zone::FarLeft => Command::FarLeft,
            Zone::Left => Command::Left,
            Zone::Center => Command::Center,
            Zone::Right => Command::Right,
            Zone::FarRight => Command::FarRight,
        }
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Zone::FarLeft => "FAR LEFT",
            Zone::Left => "LEFT",
            Zone::Center => "CENTER",
            Zone::Right => "RIGHT",
            Zone::FarRight => "FAR RIGHT",
        };
        f.write_str(label)
    }
}

/// Zone containing horizontal position `cx` in a frame `frame_width` wide.
///
/// Section `k` is the half-open interval `[k*W/5, (k+1)*W/5)`. Positions
/// left of the frame map to the first zone and positions at or past the
/// right edge to the last.
pub fn zone_for_x(cx: i32, frame_width: u32) -> Zone {
    let w = i64::from(frame_width.max(1));
    let cx = i64::from(cx).clamp(0, w - 1);
    let index = (cx * i64::from(ZONE_COUNT) / w) as usize;
    Zone::ALL[index.min(Zone::ALL.len() - 1)]
}

/// Zone of the horizontal centre of `bbox`.
pub fn zone_for_box(bbox: &BoundingBox, frame_width: u32) -> Zone {
    zone_for_x(bbox.center().x, frame_width)
}
