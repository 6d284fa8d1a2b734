//! Game state and core simulation types

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::aabb_overlap;
use super::spawn::spawn_enemy;
use crate::consts::*;

/// How the player is kept inside the play field horizontally
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoundaryPolicy {
    /// Stop at the edges
    #[default]
    Clamp,
    /// Leaving one edge re-enters flush against the opposite edge
    Wrap,
}

impl BoundaryPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            BoundaryPolicy::Clamp => "clamp",
            BoundaryPolicy::Wrap => "wrap",
        }
    }

    /// Constrain a left edge `x` for a box of `width` inside `[0, screen_width]`
    pub fn apply(&self, x: f32, width: f32, screen_width: f32) -> f32 {
        let max_x = (screen_width - width).max(0.0);
        match self {
            BoundaryPolicy::Clamp => x.clamp(0.0, max_x),
            BoundaryPolicy::Wrap => {
                if x < 0.0 {
                    max_x
                } else if x > max_x {
                    0.0
                } else {
                    x
                }
            }
        }
    }
}

/// A square entity: the player or a falling enemy
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Entity {
    /// Inactive slots are free for reuse
    pub active: bool,
    /// Set while an enemy touched the player this tick (player only)
    pub overlapping: bool,
    pub size: Vec2,
    /// Top-left corner
    pub position: Vec2,
    /// Reserved, not read by the simulation
    pub velocity: Vec2,
    /// Units per tick
    pub speed: f32,
    pub enemy: bool,
}

impl Entity {
    /// The player square, horizontally centered near the bottom of the screen
    pub fn player(screen_size: Vec2) -> Self {
        Self {
            active: true,
            size: Vec2::splat(PLAYER_SIZE),
            position: Vec2::new(
                screen_size.x / 2.0,
                screen_size.y - screen_size.y / 10.0,
            ),
            speed: PLAYER_SPEED,
            ..Default::default()
        }
    }

    /// An active falling enemy with its top-left corner at `position`
    pub fn enemy(position: Vec2) -> Self {
        Self {
            active: true,
            size: Vec2::splat(ENEMY_SIZE),
            position,
            speed: ENEMY_SPEED,
            enemy: true,
            ..Default::default()
        }
    }

    pub fn overlaps(&self, other: &Entity) -> bool {
        aabb_overlap(self.position, self.size, other.position, other.size)
    }
}

/// Handle to a slot in the [`EntityStore`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityId(usize);

impl EntityId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Fixed-capacity arena of entity slots
///
/// Slots are never added or removed; an entity exists while its slot is active.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityStore {
    slots: Vec<Entity>,
}

impl Default for EntityStore {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityStore {
    /// A store of [`MAX_ENTITIES`] inactive slots
    pub fn new() -> Self {
        Self::with_capacity(MAX_ENTITIES)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: vec![Entity::default(); capacity],
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.slots.get(id.0)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.slots.get_mut(id.0)
    }

    /// Lowest-index inactive slot
    pub fn first_free(&self) -> Option<EntityId> {
        self.slots.iter().position(|e| !e.active).map(EntityId)
    }

    /// Place `entity` into the first free slot and mark it active
    ///
    /// Returns `None` and leaves the store untouched when every slot is taken.
    pub fn spawn(&mut self, entity: Entity) -> Option<EntityId> {
        let id = self.first_free()?;
        self.slots[id.0] = Entity {
            active: true,
            ..entity
        };
        Some(id)
    }

    /// Tombstone a slot; it can be reused immediately
    pub fn despawn(&mut self, id: EntityId) {
        if let Some(entity) = self.slots.get_mut(id.0) {
            entity.active = false;
        }
    }

    /// All slots in index order, active or not
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &Entity)> {
        self.slots.iter().enumerate().map(|(i, e)| (EntityId(i), e))
    }

    pub fn iter_active(&self) -> impl Iterator<Item = (EntityId, &Entity)> {
        self.iter().filter(|(_, e)| e.active)
    }

    pub fn iter_active_mut(&mut self) -> impl Iterator<Item = (EntityId, &mut Entity)> {
        self.slots
            .iter_mut()
            .enumerate()
            .filter(|(_, e)| e.active)
            .map(|(i, e)| (EntityId(i), e))
    }

    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|e| e.active).count()
    }
}

/// The play field and everything living in it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct World {
    /// Simulated time since the run started (drives difficulty)
    pub elapsed_ms: f64,
    screen_size: Vec2,
    pub entities: EntityStore,
}

impl World {
    pub fn new(screen_size: Vec2) -> Self {
        Self {
            elapsed_ms: 0.0,
            screen_size,
            entities: EntityStore::new(),
        }
    }

    pub fn screen_size(&self) -> Vec2 {
        self.screen_size
    }
}

/// Countdown to the next automatic enemy spawn
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnTimer {
    /// Interval between spawns (shrinks with difficulty)
    pub cooldown_ms: f64,
    /// Time left before the next spawn
    pub remaining_ms: f64,
}

impl Default for SpawnTimer {
    fn default() -> Self {
        Self::new(INITIAL_SPAWN_COOLDOWN_MS)
    }
}

impl SpawnTimer {
    pub fn new(cooldown_ms: f64) -> Self {
        Self {
            cooldown_ms,
            remaining_ms: cooldown_ms,
        }
    }

    /// Count down by `dt_ms`; returns true when a spawn is due
    ///
    /// On expiry the current cooldown is added to the remaining time, so any
    /// overshoot carries over into the next interval.
    pub fn advance(&mut self, dt_ms: f64) -> bool {
        self.remaining_ms -= dt_ms;
        if self.remaining_ms <= 0.0 {
            self.remaining_ms += self.cooldown_ms;
            true
        } else {
            false
        }
    }
}

/// Run counters, for logging only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SimStats {
    pub spawned: u64,
    /// Spawn requests dropped because the store was full
    pub spawns_dropped: u64,
    pub collisions: u64,
    pub despawned_offscreen: u64,
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub world: World,
    /// The player lives outside the entity store and is never tombstoned
    pub player: Entity,
    pub spawn: SpawnTimer,
    pub boundary: BoundaryPolicy,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub stats: SimStats,
}

impl GameState {
    /// Create a new run and spawn the first enemy right away
    pub fn new(screen_size: Vec2, boundary: BoundaryPolicy, seed: u64) -> Self {
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            world: World::new(screen_size),
            player: Entity::player(screen_size),
            spawn: SpawnTimer::default(),
            boundary,
            time_ticks: 0,
            stats: SimStats::default(),
        };

        if spawn_enemy(&mut state.world, &mut state.rng).is_some() {
            state.stats.spawned += 1;
        }

        state
    }

    /// Active enemies in slot order
    pub fn enemies(&self) -> impl Iterator<Item = &Entity> {
        self.world
            .entities
            .iter_active()
            .map(|(_, e)| e)
            .filter(|e| e.enemy)
    }
}
