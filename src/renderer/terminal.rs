//! TerminalRenderer: shows a [`Canvas`] in a real terminal.
//!
//! Each terminal cell carries two vertically stacked pixels using the upper
//! half block glyph (foreground = top pixel, background = bottom pixel). Only
//! runs of cells that changed since the previous frame are rewritten.

use std::io::{self, Write};

use crossterm::{
    QueueableCommand, cursor,
    style::{Attribute, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor},
    terminal,
};
use glam::Vec2;

use super::{Canvas, Color, Renderer};

const UPPER_HALF_BLOCK: char = '\u{2580}';

/// Terminal window title while the game runs
pub const TITLE: &str = "Square Dodge";

/// One terminal cell: two stacked pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cell {
    pub top: Color,
    pub bottom: Color,
}

/// 2D grid of cells
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CellGrid {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl CellGrid {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::default(); width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn get(&self, x: u16, y: u16) -> Option<Cell> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.cells[y as usize * self.width as usize + x as usize])
    }

    /// Pack pairs of canvas pixel rows into cells, reusing the allocation
    pub fn pack(&mut self, canvas: &Canvas) {
        self.width = canvas.width();
        self.height = canvas.height().div_ceil(2);
        self.cells
            .resize(self.width as usize * self.height as usize, Cell::default());

        for y in 0..self.height {
            for x in 0..self.width {
                let top = canvas.pixel(x, y * 2).unwrap_or_default();
                let bottom = canvas.pixel(x, y * 2 + 1).unwrap_or(top);
                self.cells[y as usize * self.width as usize + x as usize] = Cell { top, bottom };
            }
        }
    }
}

pub struct TerminalRenderer {
    stdout: io::Stdout,
    canvas: Canvas,
    next: CellGrid,
    last: Option<CellGrid>,
}

impl TerminalRenderer {
    pub fn new(world_size: Vec2) -> Self {
        Self {
            stdout: io::stdout(),
            canvas: Canvas::new(world_size, 0, 0),
            next: CellGrid::default(),
            last: None,
        }
    }

    pub fn enter(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        self.stdout.queue(terminal::EnterAlternateScreen)?;
        self.stdout.queue(terminal::SetTitle(TITLE))?;
        self.stdout.queue(cursor::Hide)?;
        self.stdout.queue(terminal::DisableLineWrap)?;
        self.stdout.flush()?;
        Ok(())
    }

    /// Undo [`TerminalRenderer::enter`]; safe after a partial enter
    pub fn exit(&mut self) -> io::Result<()> {
        self.last = None;
        restore_terminal()
    }

    /// Follow terminal resizes; a size change forces a full redraw
    fn sync_size(&mut self) {
        let (cols, rows) = terminal::size().unwrap_or((80, 24));
        let height = rows.saturating_mul(2);
        if cols != self.canvas.width() || height != self.canvas.height() {
            self.canvas.resize(cols, height);
            self.last = None;
        }
    }

    fn flush_changes(&mut self) -> io::Result<()> {
        let full = self.last.is_none();
        if full {
            self.stdout
                .queue(terminal::Clear(terminal::ClearType::All))?;
        }

        let blank = CellGrid::default();
        let prev = self.last.as_ref().unwrap_or(&blank);
        let mut current: Option<Cell> = None;

        for_each_changed_run(prev, &self.next, |x, y, len| {
            self.stdout.queue(cursor::MoveTo(x, y))?;
            for dx in 0..len {
                let cell = self.next.get(x + dx, y).unwrap_or_default();
                if current != Some(cell) {
                    self.stdout.queue(SetForegroundColor(to_term_color(cell.top)))?;
                    self.stdout
                        .queue(SetBackgroundColor(to_term_color(cell.bottom)))?;
                    current = Some(cell);
                }
                self.stdout.queue(Print(glyph(cell)))?;
            }
            Ok(())
        })?;

        self.stdout.queue(ResetColor)?;
        self.stdout.flush()?;

        // Swap so the next frame can diff without cloning
        let prev = self.last.take().unwrap_or_default();
        self.last = Some(std::mem::replace(&mut self.next, prev));
        Ok(())
    }
}

impl Renderer for TerminalRenderer {
    fn clear(&mut self, color: Color) {
        self.sync_size();
        self.canvas.clear(color);
    }

    fn set_draw_color(&mut self, color: Color) {
        self.canvas.set_draw_color(color);
    }

    fn fill_rect(&mut self, position: Vec2, size: Vec2) {
        self.canvas.fill_rect(position, size);
    }

    fn present(&mut self) -> io::Result<()> {
        self.next.pack(&self.canvas);
        self.flush_changes()?;
        self.canvas.present()
    }
}

/// Leave the alternate screen and raw mode
///
/// Needs no renderer, so a panic hook can call it too.
pub fn restore_terminal() -> io::Result<()> {
    let mut stdout = io::stdout();
    stdout.queue(ResetColor)?;
    stdout.queue(SetAttribute(Attribute::Reset))?;
    stdout.queue(terminal::EnableLineWrap)?;
    stdout.queue(cursor::Show)?;
    stdout.queue(terminal::LeaveAlternateScreen)?;
    stdout.flush()?;
    terminal::disable_raw_mode()
}

fn glyph(cell: Cell) -> char {
    if cell.top == cell.bottom {
        ' '
    } else {
        UPPER_HALF_BLOCK
    }
}

fn to_term_color(color: Color) -> crossterm::style::Color {
    crossterm::style::Color::Rgb {
        r: color.r,
        g: color.g,
        b: color.b,
    }
}

/// Call `f(x, y, len)` for every horizontal run of cells that differ
fn for_each_changed_run(
    prev: &CellGrid,
    next: &CellGrid,
    mut f: impl FnMut(u16, u16, u16) -> io::Result<()>,
) -> io::Result<()> {
    if prev.width() != next.width() || prev.height() != next.height() {
        for y in 0..next.height() {
            if next.width() > 0 {
                f(0, y, next.width())?;
            }
        }
        return Ok(());
    }

    for y in 0..next.height() {
        let mut x = 0;
        while x < next.width() {
            if prev.get(x, y) == next.get(x, y) {
                x += 1;
                continue;
            }
            let start = x;
            x += 1;
            while x < next.width() && prev.get(x, y) != next.get(x, y) {
                x += 1;
            }
            f(start, y, x - start)?;
        }
    }

    Ok(())
}
