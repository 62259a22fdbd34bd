//! Streaming terrain polyline
//!
//! The ground is a short window of height-field samples that slides along
//! with the camera: new samples are appended ahead, old ones evicted behind,
//! so memory stays bounded however far the vehicle travels.

use std::collections::VecDeque;

use glam::Vec2;

use super::height::HeightField;
use crate::settings::{TerrainSettings, ViewportSettings};

/// Ground queries the vehicle needs to resolve contact
pub trait GroundQuery {
    /// Ground elevation below `x`
    fn ground_height(&self, x: f32) -> f32;
    /// Surface angle at `x` (radians, `atan2(dy, dx)`)
    fn slope_angle(&self, x: f32) -> f32;
}

/// Perfectly flat ground at a fixed elevation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlatGround {
    pub height: f32,
}

impl GroundQuery for FlatGround {
    fn ground_height(&self, _x: f32) -> f32 {
        self.height
    }

    fn slope_angle(&self, _x: f32) -> f32 {
        0.0
    }
}

/// Farthest the window follows from the origin; f32 spacing there is still
/// only a few samples wide
pub const MAX_TERRAIN_X: f32 = 1.0e9;

/// Bounded, ordered window of terrain samples
#[derive(Debug, Clone)]
pub struct TerrainStream {
    field: HeightField,
    segment_width: f32,
    initial_first: i64,
    initial_last: i64,
    lookahead: f32,
    trailing: f32,
    fallback_height: f32,
    /// Samples ordered by strictly increasing x
    points: VecDeque<Vec2>,
    /// Grid index of the sample after the current tail
    next_index: i64,
}

impl TerrainStream {
    /// Create and seed a stream over the configured initial span
    pub fn new(terrain: &TerrainSettings, viewport: &ViewportSettings) -> Self {
        let mut stream = Self {
            field: terrain.height_field,
            segment_width: terrain.segment_width,
            initial_first: terrain.initial_first,
            initial_last: terrain.initial_last,
            lookahead: viewport.width + terrain.lookahead_margin,
            trailing: terrain.trailing_margin,
            fallback_height: terrain.fallback_height,
            points: VecDeque::new(),
            next_index: terrain.initial_first,
        };
        stream.initialize();
        stream
    }

    /// Discard the window and resample the initial span
    pub fn initialize(&mut self) {
        self.seed_from(self.initial_first, self.initial_last);
    }

    fn seed_from(&mut self, first: i64, last: i64) {
        self.points.clear();
        self.next_index = first;
        // Interpolation needs at least one segment
        let last = last.max(first.saturating_add(2));
        while self.next_index < last || self.points.len() < 2 {
            self.push_next();
        }
    }

    /// World x of grid sample `index`, exact in f64 before rounding to f32
    fn grid_x(&self, index: i64) -> f32 {
        (index as f64 * self.segment_width as f64) as f32
    }

    fn push_next(&mut self) {
        let x = self.grid_x(self.next_index);
        self.next_index = self.next_index.saturating_add(1);
        // Far from the origin neighbouring indices can round to the same f32
        if x <= self.last_x() {
            return;
        }
        self.points.push_back(Vec2::new(x, self.field.height(x)));
    }

    /// Slide the window to follow `reference_x` (the camera's left edge)
    ///
    /// The window stops following past `±MAX_TERRAIN_X`; ground further out
    /// reads the fallback height.
    pub fn advance(&mut self, reference_x: f32) {
        let reference_x = reference_x.clamp(-MAX_TERRAIN_X, MAX_TERRAIN_X);
        let tail_target = reference_x + self.lookahead;
        let head_limit = reference_x - self.trailing;

        // Whole window behind the new head: reseed instead of walking the gap
        if self.last_x() < head_limit {
            let width = self.segment_width as f64;
            let first = (head_limit as f64 / width).floor() as i64;
            let last = ((tail_target as f64 / width).ceil() as i64).saturating_add(1);
            log::debug!(
                "Terrain window reseeded at x={:.0} ({} samples)",
                self.grid_x(first),
                last.saturating_sub(first)
            );
            self.seed_from(first, last);
            return;
        }

        while self.last_x() < tail_target {
            self.push_next();
        }

        while self.points.len() > 2 && self.points[0].x < head_limit {
            self.points.pop_front();
        }
    }

    fn last_x(&self) -> f32 {
        self.points.back().map_or(f32::NEG_INFINITY, |p| p.x)
    }

    /// Index of the segment `[i, i + 1]` bracketing `x`, if covered
    fn segment_at(&self, x: f32) -> Option<usize> {
        let first = self.points.front()?;
        let last = self.points.back()?;
        if self.points.len() < 2 || !(first.x <= x && x <= last.x) {
            return None;
        }
        // First sample at or beyond x; a hit exactly on a sample uses the segment ending there
        let upper = self.points.partition_point(|p| p.x < x);
        Some(upper.saturating_sub(1))
    }

    /// Read-only ordered samples (for rendering)
    pub fn points(&self) -> &VecDeque<Vec2> {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Horizontal extent currently materialized
    pub fn span(&self) -> (f32, f32) {
        match (self.points.front(), self.points.back()) {
            (Some(first), Some(last)) => (first.x, last.x),
            _ => (0.0, 0.0),
        }
    }

    pub fn height_field(&self) -> &HeightField {
        &self.field
    }

    pub fn segment_width(&self) -> f32 {
        self.segment_width
    }
}

impl GroundQuery for TerrainStream {
    /// Linear interpolation on the bracketing segment; fallback outside the window
    fn ground_height(&self, x: f32) -> f32 {
        let Some(i) = self.segment_at(x) else {
            return self.fallback_height;
        };
        let (a, b) = (self.points[i], self.points[i + 1]);
        let t = (x - a.x) / (b.x - a.x);
        a.y + (b.y - a.y) * t
    }

    fn slope_angle(&self, x: f32) -> f32 {
        let Some(i) = self.segment_at(x) else {
            return 0.0;
        };
        let d = self.points[i + 1] - self.points[i];
        d.y.atan2(d.x)
    }
}
