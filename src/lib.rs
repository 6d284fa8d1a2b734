//! Square Dodge - a falling-blocks dodging arcade game
//!
//! Core modules:
//! - `sim`: Fixed-timestep simulation (entities, spawning, collisions)
//! - `tuning`: Difficulty ramp (elapsed time to spawn cooldown)
//! - `input`: Directional key state sampled from platform events
//! - `renderer`: Drawing primitives and the terminal backend
//! - `platform`: Event source and clock abstractions
//! - `game`: Frame loop tying input, simulation and rendering together
//! - `settings`: JSON settings loaded at startup

pub mod game;
pub mod input;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use game::Game;
pub use input::InputState;
pub use settings::{Settings, SettingsError, SettingsSource};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep in milliseconds (50 Hz)
    pub const TICK_MS: f64 = 20.0;
    /// Cap on accumulated frame time to prevent spiral of death after a stall
    pub const MAX_FRAME_DEBT_MS: f64 = 500.0;

    /// Entity store capacity
    pub const MAX_ENTITIES: usize = 100;

    /// Default play field dimensions
    pub const SCREEN_WIDTH: f32 = 480.0;
    pub const SCREEN_HEIGHT: f32 = 800.0;

    /// Player square
    pub const PLAYER_SIZE: f32 = 50.0;
    /// Player horizontal speed (units per tick)
    pub const PLAYER_SPEED: f32 = 5.0;

    /// Enemy square
    pub const ENEMY_SIZE: f32 = 50.0;
    /// Enemy fall speed (units per tick)
    pub const ENEMY_SPEED: f32 = 3.0;

    /// Spawn cooldown before the difficulty ramp kicks in
    pub const INITIAL_SPAWN_COOLDOWN_MS: f64 = 3000.0;
}
