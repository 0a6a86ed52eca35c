//! Sensing, thinking and steering, in parallel across agents.
//!
//! Each agent writes only itself. Other agents are seen through the position
//! snapshot taken on entry, and randomness comes from a per-agent stream keyed
//! by `(seed, agent id, tick)`, so the outcome does not depend on the thread
//! count.

use rayon::prelude::*;

use super::super::agent::Agent;
use super::super::brain::{Output, think_with_memory};
use super::super::error::{BrainError, SimError};
use super::super::geometric_utils::{Vec2, clamp_length, confine_mut, length, normalize, vec2};
use super::super::random::substream;
use super::super::sensing::SenseContext;
use super::super::views;
use super::super::world::World;

pub(super) fn run(world: &mut World, dt: f32) -> Result<(), SimError> {
    let positions: Vec<Vec2> = world.agents.iter().map(|a| a.pos).collect();
    let ctx = SenseContext {
        params: &world.params,
        environment: &world.environment,
        grids: &world.grids,
        agent_positions: &positions,
        food: &world.food,
        water: &world.water,
        obstacles: &world.obstacles,
    };
    let perception = &world.perception;
    let seed = world.params.seed;
    let tick = world.tick_count;

    world
        .agents
        .par_iter_mut()
        .enumerate()
        .try_for_each(|(index, agent)| -> Result<(), BrainError> {
            if !agent.is_alive() {
                return Ok(());
            }
            let mut rng = substream(seed, agent.id, tick);
            let inputs = perception.perceive(agent, index, &ctx);
            let thought = think_with_memory(&mut agent.brain, &mut agent.memory, &inputs, &mut rng)?;
            agent.last_inputs = inputs;
            agent.last_outputs = thought.outputs;
            steer(agent, &ctx, dt);
            Ok(())
        })?;

    // Later phases query the agent grid with post-movement positions.
    world.grids.agents.rebuild(&world.agents);
    Ok(())
}

/// Blends velocity towards the brain's desired velocity and moves the agent.
///
/// A move whose path hits an obstacle is cancelled and the agent stops.
fn steer(agent: &mut Agent, ctx: &SenseContext<'_>, dt: f32) {
    let params = ctx.params;
    let top_speed = views::effective_max_speed(agent, params, ctx.environment);
    let desired = if agent.is_resting() {
        vec2(0.0, 0.0)
    } else {
        let direction = normalize(vec2(
            agent.output(Output::SteerX),
            agent.output(Output::SteerY),
        ));
        direction * (top_speed * agent.effort())
    };
    let blend = (params.movement.steering_rate * dt).clamp(0.0, 1.0);
    agent.vel = clamp_length(agent.vel + (desired - agent.vel) * blend, top_speed);

    let target = agent.pos + agent.vel * dt;
    let radius = views::body_radius(&agent.phenotype, params);
    let reach = length(agent.vel) * dt + params.world.obstacle_radius_max + radius;
    let from = agent.pos;
    let mut blocked = false;
    ctx.grids.obstacles.for_each_within(from, reach, |_, k| {
        if ctx.obstacles.get(k).is_some_and(|rock| rock.blocks(from, target, radius)) {
            blocked = true;
        }
    });

    if blocked {
        agent.vel = vec2(0.0, 0.0);
    } else {
        agent.pos = target;
    }
    confine_mut(
        &mut agent.pos,
        &mut agent.vel,
        params.world.width,
        params.world.height,
    );
}
