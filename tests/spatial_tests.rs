#![allow(missing_docs)]
#![allow(clippy::float_cmp)]

use evosphere::simulation::food::Food;
use evosphere::simulation::geometric_utils::{Vec2, distance_squared, vec2};
use evosphere::simulation::locatable::Locatable;
use evosphere::simulation::params::Params;
use evosphere::simulation::random;
use evosphere::simulation::spatial::SpatialGrid;
use evosphere::simulation::terrain::{Obstacle, WaterSource};
use rand::Rng;

fn create_test_params() -> Params {
    let mut params = Params::default();
    params.world.width = 400.0;
    params.world.height = 300.0;
    params.world.cell_size = 25.0;
    params
}

fn random_food(count: usize, params: &Params, seed: u64) -> Vec<Food> {
    let mut rng = random::seeded(seed);
    (0..count)
        .map(|i| {
            let pos = vec2(
                rng.random_range(0.0..params.world.width),
                rng.random_range(0.0..params.world.height),
            );
            Food::new(i as u64, pos, 1.0, 0)
        })
        .collect()
}

fn brute_force(items: &[Food], center: Vec2, radius: f32) -> Vec<usize> {
    items
        .iter()
        .enumerate()
        .filter(|(_, f)| f.is_active() && distance_squared(center, f.pos) <= radius * radius)
        .map(|(i, _)| i)
        .collect()
}

#[test]
fn test_query_radius_matches_brute_force() {
    let params = create_test_params();
    let items = random_food(500, &params, 1);
    let mut grid = SpatialGrid::new(
        params.world.width,
        params.world.height,
        params.world.cell_size,
    );
    grid.rebuild(&items);
    assert_eq!(grid.len(), 500);

    let mut rng = random::seeded(2);
    for _ in 0..50 {
        let center = vec2(
            rng.random_range(0.0..params.world.width),
            rng.random_range(0.0..params.world.height),
        );
        let radius = rng.random_range(0.0..120.0);

        let mut found: Vec<usize> = grid
            .query_radius(center, radius)
            .into_iter()
            .map(|(d2, index)| {
                assert_eq!(d2, distance_squared(center, items[index].pos));
                index
            })
            .collect();
        found.sort_unstable();
        assert_eq!(found, brute_force(&items, center, radius));
    }
}

#[test]
fn test_query_nearest_matches_brute_force() {
    let params = create_test_params();
    let items = random_food(200, &params, 3);
    let mut grid = SpatialGrid::new(
        params.world.width,
        params.world.height,
        params.world.cell_size,
    );
    grid.rebuild(&items);

    let mut rng = random::seeded(4);
    for _ in 0..50 {
        let center = vec2(
            rng.random_range(0.0..params.world.width),
            rng.random_range(0.0..params.world.height),
        );
        let expected = items
            .iter()
            .enumerate()
            .map(|(i, f)| (distance_squared(center, f.pos), i))
            .min_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)))
            .map(|(_, i)| i);

        let nearest = grid.query_nearest(center, |_| true).map(|(_, i)| i);
        assert_eq!(nearest, expected);
    }
}

#[test]
fn test_query_nearest_respects_predicate() {
    let params = create_test_params();
    let items = random_food(100, &params, 5);
    let mut grid = SpatialGrid::new(
        params.world.width,
        params.world.height,
        params.world.cell_size,
    );
    grid.rebuild(&items);

    let center = vec2(200.0, 150.0);
    let expected = items
        .iter()
        .enumerate()
        .filter(|(i, _)| i % 2 == 1)
        .map(|(i, f)| (distance_squared(center, f.pos), i))
        .min_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, i)| i);

    let nearest = grid.query_nearest(center, |i| i % 2 == 1).map(|(_, i)| i);
    assert_eq!(nearest, expected);
    assert_eq!(grid.query_nearest(center, |_| false), None);
}

#[test]
fn test_query_nearest_within_limits_radius() {
    let mut grid = SpatialGrid::new(100.0, 100.0, 10.0);
    grid.insert(0, vec2(10.0, 10.0));
    grid.insert(1, vec2(60.0, 60.0));

    let center = vec2(50.0, 50.0);
    assert_eq!(grid.query_nearest_within(center, 5.0, |_| true), None);
    assert_eq!(
        grid.query_nearest_within(center, 20.0, |_| true),
        Some((200.0, 1))
    );
}

#[test]
fn test_equal_distances_resolve_to_lowest_index() {
    let mut grid = SpatialGrid::new(100.0, 100.0, 10.0);
    grid.insert(3, vec2(40.0, 50.0));
    grid.insert(1, vec2(60.0, 50.0));
    grid.insert(2, vec2(50.0, 40.0));

    let nearest = grid.query_nearest(vec2(50.0, 50.0), |_| true);
    assert_eq!(nearest, Some((100.0, 1)));
}

#[test]
fn test_consumed_food_is_not_indexed() {
    let params = create_test_params();
    let mut items = random_food(50, &params, 6);
    for item in items.iter_mut().step_by(3) {
        item.consume();
    }
    let mut grid = SpatialGrid::new(
        params.world.width,
        params.world.height,
        params.world.cell_size,
    );
    grid.rebuild(&items);

    assert_eq!(grid.len(), 50 - 17);
    let everywhere = grid.query_radius(vec2(200.0, 150.0), 1000.0);
    assert!(everywhere.iter().all(|&(_, i)| !items[i].is_consumed()));
}

#[test]
fn test_out_of_bounds_positions_are_clamped_to_edge_cells() {
    let mut grid = SpatialGrid::new(100.0, 100.0, 10.0);
    grid.insert(0, vec2(-5.0, 50.0));
    grid.insert(1, vec2(105.0, 50.0));

    assert_eq!(grid.dimensions(), (10, 10));
    let left = grid.query_radius(vec2(0.0, 50.0), 6.0);
    assert_eq!(left, vec![(25.0, 0)]);
    let right = grid.query_radius(vec2(100.0, 50.0), 6.0);
    assert_eq!(right, vec![(25.0, 1)]);
}

#[test]
fn test_clear_empties_grid() {
    let mut grid = SpatialGrid::new(100.0, 100.0, 10.0);
    grid.insert(0, vec2(10.0, 10.0));
    assert!(!grid.is_empty());
    grid.clear();
    assert!(grid.is_empty());
    assert!(grid.query_radius(vec2(10.0, 10.0), 50.0).is_empty());
}

#[test]
fn test_water_source_contains() {
    let water = WaterSource {
        id: 0,
        pos: vec2(50.0, 50.0),
        radius: 10.0,
    };
    assert!(water.contains(vec2(55.0, 55.0)));
    assert!(water.contains(vec2(60.0, 50.0)));
    assert!(!water.contains(vec2(61.0, 50.0)));
    assert_eq!(water.pos(), vec2(50.0, 50.0));
}

#[test]
fn test_obstacle_blocks_only_approaching_moves() {
    let rock = Obstacle {
        id: 0,
        pos: vec2(50.0, 50.0),
        radius: 10.0,
    };

    // Straight through the rock.
    assert!(rock.blocks(vec2(30.0, 50.0), vec2(45.0, 50.0), 2.0));
    // Passing well clear of it.
    assert!(!rock.blocks(vec2(30.0, 20.0), vec2(70.0, 20.0), 2.0));
    // Leaving from inside.
    assert!(!rock.blocks(vec2(52.0, 50.0), vec2(58.0, 50.0), 2.0));
}
