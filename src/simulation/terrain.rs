//! Static terrain features: water sources and obstacles.

use serde::{Deserialize, Serialize};

use super::geometric_utils::{Vec2, distance_squared, line_circle_distance};
use super::locatable::Locatable;

/// Circular body of water; agents inside it drink.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaterSource {
    /// Sequential identifier.
    pub id: u64,
    /// Centre position.
    pub pos: Vec2,
    /// Radius of the drinkable area.
    pub radius: f32,
}

impl WaterSource {
    /// Whether `point` lies inside the water.
    #[inline]
    pub fn contains(&self, point: Vec2) -> bool {
        distance_squared(self.pos, point) <= self.radius * self.radius
    }
}

impl Locatable for WaterSource {
    fn pos(&self) -> Vec2 {
        self.pos
    }
}

/// Circular rock agents cannot pass through.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    /// Sequential identifier.
    pub id: u64,
    /// Centre position.
    pub pos: Vec2,
    /// Radius of the blocked area.
    pub radius: f32,
}

impl Obstacle {
    /// Whether a body of `body_radius` moving from `from` to `to` hits this
    /// obstacle. Moves that lead away from the centre are never blocked, so a
    /// body spawned overlapping the rock can leave.
    #[inline]
    pub fn blocks(&self, from: Vec2, to: Vec2, body_radius: f32) -> bool {
        distance_squared(to, self.pos) < distance_squared(from, self.pos)
            && line_circle_distance(from, to, self.pos) < self.radius + body_radius
    }
}

impl Locatable for Obstacle {
    fn pos(&self) -> Vec2 {
        self.pos
    }
}
