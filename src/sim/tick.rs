//! Fixed timestep simulation tick
//!
//! Core game step that advances simulation deterministically.

use log::{debug, info};

use super::spawn::spawn_enemy;
use super::state::{BoundaryPolicy, Entity, GameState};
use crate::input::InputState;
use crate::tuning;

/// Move the player horizontally from held input, then enforce the boundary
pub fn steer_player(
    player: &mut Entity,
    input: &InputState,
    screen_width: f32,
    boundary: BoundaryPolicy,
) {
    if input.left {
        player.position.x -= player.speed;
    }
    if input.right {
        player.position.x += player.speed;
    }
    player.position.x = boundary.apply(player.position.x, player.size.x, screen_width);
}

/// Advance the game state by one fixed timestep of `dt_ms`
pub fn tick(state: &mut GameState, input: &InputState, dt_ms: f64) {
    state.time_ticks += 1;

    let screen = state.world.screen_size();

    // Player movement
    steer_player(&mut state.player, input, screen.x, state.boundary);

    // Spawn timer
    if state.spawn.advance(dt_ms) {
        match spawn_enemy(&mut state.world, &mut state.rng) {
            Some(id) => {
                state.stats.spawned += 1;
                debug!("spawned enemy in slot {}", id.index());
            }
            None => {
                state.stats.spawns_dropped += 1;
                debug!("entity store full, spawn dropped");
            }
        }
    }

    // Fall, collide, despawn
    let GameState {
        world,
        player,
        spawn,
        stats,
        ..
    } = state;
    player.overlapping = false;

    for (_, entity) in world.entities.iter_active_mut() {
        entity.position.y += entity.speed;

        if !entity.enemy {
            continue;
        }

        if entity.overlaps(player) {
            player.overlapping = true;
            entity.active = false;
            stats.collisions += 1;
            debug!("enemy hit player at {}", entity.position);
        }

        if entity.position.y > screen.y && entity.active {
            entity.active = false;
            stats.despawned_offscreen += 1;
        }
    }

    // Difficulty
    world.elapsed_ms += dt_ms;

    let cooldown = tuning::spawn_cooldown_ms(world.elapsed_ms);
    if cooldown != spawn.cooldown_ms {
        info!(
            "difficulty level {} after {:.1}s: spawn every {} ms",
            tuning::difficulty_level(world.elapsed_ms),
            world.elapsed_ms / 1000.0,
            cooldown
        );
        spawn.cooldown_ms = cooldown;
    }
}
