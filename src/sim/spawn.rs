//! Enemy spawning

use glam::Vec2;
use rand::Rng;

use super::state::{Entity, EntityId, World};
use crate::consts::ENEMY_SIZE;

/// Activate one falling enemy in the first free slot
///
/// The enemy starts just above the top edge at a random whole-unit column in
/// `[0, screen_width - ENEMY_SIZE)`. When the store is full nothing happens and
/// the request is not retried.
pub fn spawn_enemy(world: &mut World, rng: &mut impl Rng) -> Option<EntityId> {
    world.entities.first_free()?;

    let span = (world.screen_size().x - ENEMY_SIZE).max(0.0) as u32;
    let x = if span > 0 { rng.random_range(0..span) } else { 0 };

    world
        .entities
        .spawn(Entity::enemy(Vec2::new(x as f32, -ENEMY_SIZE)))
}
