//! Software rasterizer
//!
//! Maps world units onto a pixel grid with a uniform scale, centering the
//! play field and leaving the rest of the grid as letterbox.

use std::io;

use glam::Vec2;

use super::{Color, Renderer, colors};

#[derive(Debug, Clone, PartialEq)]
pub struct Canvas {
    world_size: Vec2,
    width: u16,
    height: u16,
    /// Pixels per world unit
    scale: f32,
    /// Pixel position of the world origin
    offset: Vec2,
    pixels: Vec<Color>,
    draw_color: Color,
    frames_presented: u64,
}

impl Canvas {
    pub fn new(world_size: Vec2, width: u16, height: u16) -> Self {
        let mut canvas = Self {
            world_size,
            width: 0,
            height: 0,
            scale: 0.0,
            offset: Vec2::ZERO,
            pixels: Vec::new(),
            draw_color: colors::BACKGROUND,
            frames_presented: 0,
        };
        canvas.resize(width, height);
        canvas
    }

    /// Change the pixel grid size and refit the world into it
    ///
    /// Keeps the allocation when the size is unchanged.
    pub fn resize(&mut self, width: u16, height: u16) {
        if self.width == width && self.height == height && !self.pixels.is_empty() {
            return;
        }
        self.width = width;
        self.height = height;
        self.pixels
            .resize(width as usize * height as usize, colors::BACKGROUND);

        let (w, h) = (width as f32, height as f32);
        self.scale = if self.world_size.x > 0.0 && self.world_size.y > 0.0 {
            (w / self.world_size.x).min(h / self.world_size.y)
        } else {
            0.0
        };
        self.offset = (Vec2::new(w, h) - self.world_size * self.scale) / 2.0;
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }

    pub fn pixel(&self, x: u16, y: u16) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[y as usize * self.width as usize + x as usize])
    }

    /// World position to (fractional) pixel position
    pub fn world_to_pixel(&self, point: Vec2) -> Vec2 {
        self.offset + point * self.scale
    }
}

impl Renderer for Canvas {
    fn clear(&mut self, color: Color) {
        self.pixels.fill(color);
    }

    fn set_draw_color(&mut self, color: Color) {
        self.draw_color = color;
    }

    fn fill_rect(&mut self, position: Vec2, size: Vec2) {
        // Clip to the play field so nothing spills into the letterbox
        let field_min = self.world_to_pixel(Vec2::ZERO);
        let field_max = self.world_to_pixel(self.world_size);
        let min = self.world_to_pixel(position).max(field_min);
        let max = self.world_to_pixel(position + size).min(field_max);
        if max.x <= min.x || max.y <= min.y {
            return;
        }

        let x0 = min.x.floor().max(0.0) as usize;
        let y0 = min.y.floor().max(0.0) as usize;
        let x1 = (max.x.ceil() as usize).min(self.width as usize);
        let y1 = (max.y.ceil() as usize).min(self.height as usize);

        let stride = self.width as usize;
        for y in y0..y1 {
            self.pixels[y * stride + x0..y * stride + x1].fill(self.draw_color);
        }
    }

    fn present(&mut self) -> io::Result<()> {
        self.frames_presented += 1;
        Ok(())
    }
}
