//! Geometric utility functions for distance calculations and spatial operations.

use geo::algorithm::Distance;
use geo::{Coord, Euclidean, Line, Point};

/// 2D vector used for positions and velocities.
pub type Vec2 = Coord<f32>;

/// Builds a vector from components.
#[inline]
pub fn vec2(x: f32, y: f32) -> Vec2 {
    Coord { x, y }
}

/// Squared Euclidean distance.
#[inline]
pub fn distance_squared(a: Vec2, b: Vec2) -> f32 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    dx * dx + dy * dy
}

/// Euclidean distance between two points.
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    Euclidean.distance(Point::from(a), Point::from(b))
}

/// Vector length.
#[inline]
pub fn length(v: Vec2) -> f32 {
    v.x.hypot(v.y)
}

/// Unit vector in the direction of `v`, or zero for a zero vector.
#[inline]
pub fn normalize(v: Vec2) -> Vec2 {
    let len = length(v);
    if len > f32::EPSILON {
        v / len
    } else {
        vec2(0.0, 0.0)
    }
}

/// Scales `v` down so its length does not exceed `max`.
#[inline]
pub fn clamp_length(v: Vec2, max: f32) -> Vec2 {
    let len = length(v);
    if len > max && len > f32::EPSILON {
        v * (max / len)
    } else {
        v
    }
}

/// Calculates the minimum distance between a line segment and a circle center.
///
/// # Arguments
///
/// * `line_start` - Starting point of the line segment
/// * `line_end` - Ending point of the line segment
/// * `circle_center` - Center point of the circle
///
/// # Returns
///
/// The minimum Euclidean distance from the circle center to the line segment.
pub fn line_circle_distance(line_start: Vec2, line_end: Vec2, circle_center: Vec2) -> f32 {
    let p = Point::from(circle_center);
    let line = Line::new(line_start, line_end);
    Euclidean.distance(&p, &line)
}

/// Keeps a position inside `[0, width] × [0, height]`, reflecting the
/// velocity component that pushed it outside.
///
/// # Arguments
///
/// * `pos` - Position to clamp
/// * `vel` - Velocity to reflect
/// * `width` - Width of the world
/// * `height` - Height of the world
pub fn confine_mut(pos: &mut Vec2, vel: &mut Vec2, width: f32, height: f32) {
    if pos.x < 0.0 {
        pos.x = 0.0;
        vel.x = vel.x.abs();
    } else if pos.x > width {
        pos.x = width;
        vel.x = -vel.x.abs();
    }
    if pos.y < 0.0 {
        pos.y = 0.0;
        vel.y = vel.y.abs();
    } else if pos.y > height {
        pos.y = height;
        vel.y = -vel.y.abs();
    }
}
