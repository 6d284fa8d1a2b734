//! Fixed-timestep simulation module
//!
//! All gameplay logic lives here:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by slot index)
//! - No rendering or platform dependencies

pub mod collision;
pub mod spawn;
pub mod state;
pub mod tick;
pub mod timestep;

pub use collision::aabb_overlap;
pub use spawn::spawn_enemy;
pub use state::{
    BoundaryPolicy, Entity, EntityId, EntityStore, GameState, SimStats, SpawnTimer, World,
};
pub use tick::{steer_player, tick};
pub use timestep::FixedTimestep;
