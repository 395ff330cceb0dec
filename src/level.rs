use std::num::NonZero;

use crate::location::{Coord, Dimension};

// Devices with a short side at or under this many units get tighter caps to
// keep tiles usable for touch input.
const SMALL_DEVICE_SHORT_SIDE: f64 = 420.0;
// Reject grids skinnier than 1:2.4 or wider than 2.4:1.
const MAX_GRID_RATIO: f64 = 2.4;

/// Viewport extent in uniform units (CSS pixels in the browser).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    /// Horizontal extent.
    pub width: f64,
    /// Vertical extent.
    pub height: f64,
}

impl Viewport {
    /// Width over height, guarding against degenerate heights.
    pub fn ratio(&self) -> f64 {
        self.width / self.height.max(1.0)
    }

    fn is_small_device(&self) -> bool {
        self.width.min(self.height) <= SMALL_DEVICE_SHORT_SIDE
    }
}

/// Aspect-ratio classification of a viewport. The thresholds leave a
/// hysteresis band around 1:1 so near-square viewports do not flap between
/// orientations on small resizes.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum AspectBucket {
    /// `width / height >= 1.15`.
    Landscape,
    /// `width / height <= 0.85`.
    Portrait,
    /// Anything between.
    Square,
}

impl AspectBucket {
    /// Classify a viewport into its bucket.
    pub fn classify(viewport: Viewport) -> Self {
        let ratio = viewport.ratio();
        if ratio >= 1.15 {
            Self::Landscape
        } else if ratio <= 0.85 {
            Self::Portrait
        } else {
            Self::Square
        }
    }

    /// Dimension caps for this bucket on the given viewport. Small devices
    /// get a shorter long side and a tighter short side.
    pub fn caps(&self, viewport: Viewport) -> Caps {
        let (long_max, short_max) = if viewport.is_small_device() {
            (10, 7)
        } else {
            (14, 10)
        };

        match self {
            Self::Landscape => Caps {
                min_rows: 4,
                max_rows: short_max,
                min_cols: 4,
                max_cols: long_max,
            },
            Self::Portrait => Caps {
                min_rows: 4,
                max_rows: long_max,
                min_cols: 4,
                max_cols: short_max,
            },
            Self::Square => Caps {
                min_rows: 4,
                max_rows: 12,
                min_cols: 4,
                max_cols: 12,
            },
        }
    }
}

/// Inclusive row/column bounds for a particular aspect bucket and device class.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Caps {
    /// Fewest rows allowed.
    pub min_rows: Coord,
    /// Most rows allowed.
    pub max_rows: Coord,
    /// Fewest columns allowed.
    pub min_cols: Coord,
    /// Most columns allowed.
    pub max_cols: Coord,
}

/// Interior board dimensions chosen for a level.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct GridSize {
    /// Interior row count.
    pub rows: Dimension,
    /// Interior column count.
    pub cols: Dimension,
}

impl GridSize {
    fn of(rows: Coord, cols: Coord) -> Self {
        // caps keep both dimensions at 4 or more
        Self {
            rows: NonZero::new(rows).unwrap(),
            cols: NonZero::new(cols).unwrap(),
        }
    }

    /// The dimension pair in `(rows, cols)` order.
    pub fn dims(&self) -> (Dimension, Dimension) {
        (self.rows, self.cols)
    }
}

// shrink by `long - 2 * short` but never below the floor; no-op when the
// overshoot is already negative
fn trim_long_side(long: Coord, short: Coord, floor: Coord) -> Coord {
    let overshoot = long as isize - 2 * short as isize;
    let reduce = overshoot.min(long as isize - floor as isize).max(0) as Coord;
    long - reduce
}

/// Choose interior board dimensions for a level on a viewport.
///
/// The target area grows quadratically, `(4 + (level - 1))²`, preserving the
/// 4×4 start. An ideal row count is derived from the viewport aspect ratio,
/// both dimensions are clamped to the bucket caps, and orientation bias is
/// enforced where the caps allow (portrait boards taller than wide, landscape
/// boards wider than tall). A final sane-ratio clamp trims the longer side of
/// grids beyond 2.4:1.
///
/// This is a best-effort geometric fit: it never fails, always returns
/// in-cap dimensions, and is deterministic in its inputs.
pub fn size_for_level(level: u32, viewport: Viewport) -> GridSize {
    let bucket = AspectBucket::classify(viewport);
    let caps = bucket.caps(viewport);
    let ratio = viewport.ratio();

    let steps = level.saturating_sub(1) as usize;
    let target_area = (4 + steps) * (4 + steps);

    // ideal rows approximating the target area under the current aspect ratio
    let ideal_rows = (target_area as f64 / ratio).sqrt();
    let mut rows = (ideal_rows.round() as Coord).clamp(caps.min_rows, caps.max_rows);
    let mut cols = target_area.div_ceil(rows).clamp(caps.min_cols, caps.max_cols);

    // orientation bias, first pass
    if bucket == AspectBucket::Portrait && rows <= cols {
        rows = rows.max((cols + 1).min(caps.max_rows)).min(caps.max_rows);
        cols = target_area.div_ceil(rows.max(1)).clamp(caps.min_cols, caps.max_cols);
    } else if bucket == AspectBucket::Landscape && cols <= rows {
        cols = cols.max((rows + 1).min(caps.max_cols)).min(caps.max_cols);
        rows = target_area.div_ceil(cols.max(1)).clamp(caps.min_rows, caps.max_rows);
    }

    // if still under the target area because of caps, regrow the other dimension
    if rows * cols < target_area {
        if rows < caps.max_rows {
            rows = target_area.div_ceil(cols.max(1)).min(caps.max_rows);
        }
        cols = target_area.div_ceil(rows.max(1)).clamp(caps.min_cols, caps.max_cols);
    }

    // sane-ratio clamp
    let grid_ratio = cols as f64 / rows as f64;
    if grid_ratio > MAX_GRID_RATIO && cols > caps.min_cols {
        cols = trim_long_side(cols, rows, caps.min_cols);
    } else if grid_ratio < 1.0 / MAX_GRID_RATIO && rows > caps.min_rows {
        rows = trim_long_side(rows, cols, caps.min_rows);
    }

    // final orientation guarantee, best-effort within caps
    if bucket == AspectBucket::Portrait && rows <= cols {
        if rows < caps.max_rows {
            rows = (cols + 1).min(caps.max_rows);
        } else if cols > caps.min_cols {
            cols = (rows - 1).max(caps.min_cols);
        }
    } else if bucket == AspectBucket::Landscape && cols <= rows {
        if cols < caps.max_cols {
            cols = (rows + 1).min(caps.max_cols);
        } else if rows > caps.min_rows {
            rows = (cols - 1).max(caps.min_rows);
        }
    }

    GridSize::of(rows, cols)
}
