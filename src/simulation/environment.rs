//! Environmental generators: food clusters, temperature and regions.
//!
//! The temperature and region grids are optional and only generated when the
//! matching feature flag is set. Their effects are exposed as pure functions
//! of a position so systems never cache derived values.

use std::f32::consts::TAU;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::geometric_utils::{Vec2, vec2};
use super::params::{EnvironmentParams, Params};
use super::random::gaussian;

/// Centres around which food grows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodClusters {
    /// Cluster centres.
    pub centers: Vec<Vec2>,
    /// Standard deviation of placement around a centre.
    pub spread: f32,
}

impl FoodClusters {
    /// Places `count` centres uniformly inside the world.
    pub fn generate<R: Rng + ?Sized>(params: &Params, rng: &mut R) -> Self {
        let centers = (0..params.world.food_cluster_count)
            .map(|_| random_point(params.world.width, params.world.height, rng))
            .collect();
        Self {
            centers,
            spread: params.world.food_cluster_spread,
        }
    }

    /// Draws a food position and the cluster it belongs to.
    ///
    /// Returns `None` when there are no clusters.
    pub fn sample<R: Rng + ?Sized>(&self, width: f32, height: f32, rng: &mut R) -> Option<(Vec2, usize)> {
        if self.centers.is_empty() {
            return None;
        }
        let cluster = rng.random_range(0..self.centers.len());
        let center = self.centers[cluster];
        let pos = vec2(
            (center.x + gaussian(rng, self.spread)).clamp(0.0, width),
            (center.y + gaussian(rng, self.spread)).clamp(0.0, height),
        );
        Some((pos, cluster))
    }
}

/// Coarse temperature field: a north-south gradient plus per-cell noise.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemperatureGrid {
    cell_size: f32,
    cols: usize,
    rows: usize,
    values: Vec<f32>,
}

impl TemperatureGrid {
    /// Generates the field.
    pub fn generate<R: Rng + ?Sized>(params: &Params, rng: &mut R) -> Self {
        let env = &params.environment;
        let cell_size = env.temperature_cell_size;
        let cols = ((params.world.width / cell_size).ceil() as usize).max(1);
        let rows = ((params.world.height / cell_size).ceil() as usize).max(1);
        let mut values = Vec::with_capacity(cols * rows);
        for row in 0..rows {
            let latitude = (row as f32 + 0.5) / rows as f32;
            for _ in 0..cols {
                values.push(
                    env.base_temperature
                        + env.temperature_gradient * latitude
                        + gaussian(rng, env.temperature_noise),
                );
            }
        }
        Self {
            cell_size,
            cols,
            rows,
            values,
        }
    }

    /// Temperature at a position (clamped to the grid).
    pub fn at(&self, pos: Vec2) -> f32 {
        let (col, row) = grid_cell(pos, self.cell_size, self.cols, self.rows);
        self.values[row * self.cols + col]
    }
}

/// Terrain region of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Region {
    /// No modifiers.
    Plains,
    /// Slows movement.
    Forest,
    /// Slows movement slightly and increases thirst.
    Desert,
}

/// Region map with one region per cell.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionGrid {
    cell_size: f32,
    cols: usize,
    rows: usize,
    cells: Vec<Region>,
}

impl RegionGrid {
    /// Generates the map: 60% plains, 25% forest, 15% desert.
    pub fn generate<R: Rng + ?Sized>(params: &Params, rng: &mut R) -> Self {
        let cell_size = params.environment.region_cell_size;
        let cols = ((params.world.width / cell_size).ceil() as usize).max(1);
        let rows = ((params.world.height / cell_size).ceil() as usize).max(1);
        let cells = (0..cols * rows)
            .map(|_| match rng.random::<f32>() {
                r if r < 0.60 => Region::Plains,
                r if r < 0.85 => Region::Forest,
                _ => Region::Desert,
            })
            .collect();
        Self {
            cell_size,
            cols,
            rows,
            cells,
        }
    }

    /// Region at a position (clamped to the grid).
    pub fn at(&self, pos: Vec2) -> Region {
        let (col, row) = grid_cell(pos, self.cell_size, self.cols, self.rows);
        self.cells[row * self.cols + col]
    }
}

/// All environmental state owned by the world.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Environment {
    /// Food growth centres.
    pub food_clusters: FoodClusters,
    /// Optional temperature field.
    pub temperature: Option<TemperatureGrid>,
    /// Optional region map.
    pub regions: Option<RegionGrid>,
}

impl Environment {
    /// Generates the environment according to the feature flags.
    pub fn generate<R: Rng + ?Sized>(params: &Params, rng: &mut R) -> Self {
        let food_clusters = FoodClusters::generate(params, rng);
        let temperature = params
            .features
            .temperature
            .then(|| TemperatureGrid::generate(params, rng));
        let regions = params
            .features
            .regions
            .then(|| RegionGrid::generate(params, rng));
        Self {
            food_clusters,
            temperature,
            regions,
        }
    }

    /// Speed multiplier of the region at `pos`.
    pub fn speed_factor(&self, env: &EnvironmentParams, pos: Vec2) -> f32 {
        match self.regions.as_ref().map(|r| r.at(pos)) {
            Some(Region::Forest) => env.forest_speed,
            Some(Region::Desert) => env.desert_speed,
            Some(Region::Plains) | None => 1.0,
        }
    }

    /// Hydration drain multiplier of the region at `pos`.
    pub fn thirst_factor(&self, env: &EnvironmentParams, pos: Vec2) -> f32 {
        match self.regions.as_ref().map(|r| r.at(pos)) {
            Some(Region::Desert) => env.desert_thirst_factor,
            _ => 1.0,
        }
    }

    /// Metabolic drain multiplier from the temperature at `pos`.
    pub fn temperature_factor(&self, env: &EnvironmentParams, pos: Vec2) -> f32 {
        self.temperature.as_ref().map_or(1.0, |grid| {
            1.0 + env.temperature_drain_factor * (grid.at(pos) - env.comfort_temperature).abs()
        })
    }
}

/// Uniform random point inside the world.
pub fn random_point<R: Rng + ?Sized>(width: f32, height: f32, rng: &mut R) -> Vec2 {
    vec2(rng.random::<f32>() * width, rng.random::<f32>() * height)
}

/// Uniform random point in the disc of `radius` around `center`.
pub fn random_point_near<R: Rng + ?Sized>(center: Vec2, radius: f32, rng: &mut R) -> Vec2 {
    let angle = rng.random::<f32>() * TAU;
    let r = radius * rng.random::<f32>().sqrt();
    vec2(center.x + r * angle.cos(), center.y + r * angle.sin())
}

fn grid_cell(pos: Vec2, cell_size: f32, cols: usize, rows: usize) -> (usize, usize) {
    let axis = |coord: f32, count: usize| {
        if coord.is_nan() || coord <= 0.0 {
            0
        } else {
            ((coord / cell_size) as usize).min(count - 1)
        }
    };
    (axis(pos.x, cols), axis(pos.y, rows))
}
