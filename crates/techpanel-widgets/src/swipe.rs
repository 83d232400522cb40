//! Horizontal swipe recognition from pointer press/release pairs.
//!
//! A gesture is the pointer going down at one point and up at another. It
//! counts as a horizontal swipe when it travelled at least `threshold` units
//! sideways, drifted at most `restraint` units vertically and took no longer
//! than `allowed_time`. Vertical swipes are recognized the same way with the
//! axes swapped. Everything else is not a swipe.

use std::time::{Duration, Instant};

/// Recognition thresholds, in pointer units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwipeConfig {
    /// Minimum travel along the main axis.
    pub threshold: i32,
    /// Maximum drift along the other axis.
    pub restraint: i32,
    /// Longest press-to-release time that still counts.
    pub allowed_time: Duration,
}

impl Default for SwipeConfig {
    fn default() -> Self {
        Self {
            threshold: 100,
            restraint: 100,
            allowed_time: Duration::from_millis(300),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Swipe {
    Left,
    Right,
    Up,
    Down,
}

impl Swipe {
    pub fn is_horizontal(self) -> bool {
        matches!(self, Swipe::Left | Swipe::Right)
    }
}

/// A position in pointer units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Size of one terminal cell in pointer units. Terminals report pointer
/// positions in cells; scaling them keeps thresholds in pixel-like units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellScale {
    pub width: i32,
    pub height: i32,
}

impl Default for CellScale {
    fn default() -> Self {
        Self { width: 8, height: 16 }
    }
}

impl CellScale {
    /// Scaled position of a cell. Never negative, so distances between two
    /// points cannot overflow.
    pub fn point(&self, column: u16, row: u16) -> Point {
        Point::new(
            i32::from(column).saturating_mul(self.width.max(1)),
            i32::from(row).saturating_mul(self.height.max(1)),
        )
    }
}

/// Classify a finished gesture.
///
/// Horizontal is checked first, then vertical. Both bounds are inclusive:
/// travel of exactly `threshold` counts and elapsed time of exactly
/// `allowed_time` counts.
pub fn classify(config: &SwipeConfig, dist_x: i32, dist_y: i32, elapsed: Duration) -> Option<Swipe> {
    if elapsed > config.allowed_time {
        return None;
    }
    if dist_x.abs() >= config.threshold && dist_y.abs() <= config.restraint {
        return Some(if dist_x < 0 { Swipe::Left } else { Swipe::Right });
    }
    if dist_y.abs() >= config.threshold && dist_x.abs() <= config.restraint {
        return Some(if dist_y < 0 { Swipe::Up } else { Swipe::Down });
    }
    None
}

/// What a released pointer amounted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GestureEnd {
    pub dist_x: i32,
    pub dist_y: i32,
    pub elapsed: Duration,
    pub swipe: Option<Swipe>,
}

impl GestureEnd {
    /// A press and release close enough together to be a plain click.
    pub fn is_tap(&self, slop: i32) -> bool {
        self.swipe.is_none() && self.dist_x.abs() <= slop && self.dist_y.abs() <= slop
    }
}

/// Remembers where and when the pointer went down.
#[derive(Debug, Default)]
pub struct SwipeTracker {
    config: SwipeConfig,
    start: Option<(Point, Instant)>,
}

impl SwipeTracker {
    pub fn new(config: SwipeConfig) -> Self {
        Self { config, start: None }
    }

    pub fn config(&self) -> &SwipeConfig {
        &self.config
    }

    pub fn is_tracking(&self) -> bool {
        self.start.is_some()
    }

    /// A new press replaces any unfinished gesture.
    pub fn touch_start(&mut self, at: Point, now: Instant) {
        self.start = Some((at, now));
    }

    /// Finish the gesture. `None` when there was no matching press.
    pub fn touch_end(&mut self, at: Point, now: Instant) -> Option<GestureEnd> {
        let (start, started_at) = self.start.take()?;
        let dist_x = at.x - start.x;
        let dist_y = at.y - start.y;
        let elapsed = now.saturating_duration_since(started_at);
        let swipe = classify(&self.config, dist_x, dist_y, elapsed);
        if let Some(direction) = swipe {
            tracing::debug!(?direction, dist_x, dist_y, ?elapsed, "swipe recognized");
        }
        Some(GestureEnd {
            dist_x,
            dist_y,
            elapsed,
            swipe,
        })
    }

    pub fn cancel(&mut self) {
        self.start = None;
    }
}
