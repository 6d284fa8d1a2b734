//! Rendering module
//!
//! The simulation is drawn through the small [`Renderer`] trait (clear, pick a
//! color, fill a rectangle, present). [`Canvas`] rasterizes those calls into a
//! pixel grid and [`TerminalRenderer`] shows that grid in a terminal.

pub mod canvas;
pub mod terminal;

use std::io;

use glam::Vec2;

use crate::sim::GameState;

pub use canvas::Canvas;
pub use terminal::TerminalRenderer;

/// 8-bit RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
}

/// Colors for game elements
pub mod colors {
    use super::Color;

    pub const BACKGROUND: Color = Color::rgb(0, 0, 0);
    pub const PLAYER: Color = Color::rgb(255, 0, 0);
    /// Player color on a tick where an enemy hit it
    pub const PLAYER_HIT: Color = Color::rgb(255, 255, 255);
    pub const ENEMY: Color = Color::rgb(0, 0, 255);
}

/// Drawing backend
pub trait Renderer {
    /// Fill the whole target with `color`
    fn clear(&mut self, color: Color);
    fn set_draw_color(&mut self, color: Color);
    /// Fill a world-space rectangle (top-left position, size) with the draw color
    fn fill_rect(&mut self, position: Vec2, size: Vec2);
    /// Show everything drawn since the last clear
    fn present(&mut self) -> io::Result<()>;
}

/// Draw one frame of the current state
///
/// Reads the state only; the player is drawn first, then every active enemy.
pub fn draw_frame<R: Renderer + ?Sized>(renderer: &mut R, state: &GameState) -> io::Result<()> {
    renderer.clear(colors::BACKGROUND);

    let player = &state.player;
    renderer.set_draw_color(if player.overlapping {
        colors::PLAYER_HIT
    } else {
        colors::PLAYER
    });
    renderer.fill_rect(player.position, player.size);

    renderer.set_draw_color(colors::ENEMY);
    for enemy in state.enemies() {
        renderer.fill_rect(enemy.position, enemy.size);
    }

    renderer.present()
}
