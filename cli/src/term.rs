//! Terminal presentation and input: the raw-mode session, a cell-grid
//! drawing surface for the engine, and held-key tracking for turn intent.
//!
//! The surface maps world pixels onto terminal cells — one character
//! advance is one column, and a row stands for twice as many pixels as a
//! column to account for the cell aspect. Cells are double-buffered and
//! only the cells that changed since the last frame are written out, so a
//! quiet world costs nothing to present.

#[cfg(test)]
#[path = "term_test.rs"]
mod term_test;

use std::collections::HashMap;
use std::io::{self, BufWriter, Stdout, Write};
use std::time::{Duration, Instant};

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use crossterm::style::{Color as TermColor, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{execute, queue};
use snail::camera::Transform;
use snail::motion::Turn;
use snail::render::Surface;
use wire::Color;

/// Pixels a terminal column stands for. One character advance = one column.
const CELL_W: f64 = 12.0;
/// Pixels a terminal row stands for.
const CELL_H: f64 = 24.0;

/// After this long without a press or repeat, a key on a terminal that
/// never reports releases counts as released.
const HOLD_TIMEOUT: Duration = Duration::from_millis(220);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Cell {
    ch: char,
    fg: TermColor,
}

const BLANK: Cell = Cell { ch: ' ', fg: TermColor::Reset };

/// Sentinel that differs from every drawable cell, forcing a full repaint.
const INVALID: Cell = Cell { ch: '\0', fg: TermColor::Reset };

/// Cell-grid implementation of the engine's drawing surface.
pub struct TermSurface {
    cols: u16,
    rows: u16,
    front: Vec<Cell>,
    back: Vec<Cell>,
    transform: Transform,
}

impl TermSurface {
    #[must_use]
    pub fn new(cols: u16, rows: u16) -> Self {
        let len = usize::from(cols) * usize::from(rows);
        Self {
            cols,
            rows,
            front: vec![BLANK; len],
            back: vec![INVALID; len],
            transform: Transform::IDENTITY,
        }
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        let len = usize::from(cols) * usize::from(rows);
        self.cols = cols;
        self.rows = rows;
        self.front = vec![BLANK; len];
        self.back = vec![INVALID; len];
    }

    #[allow(clippy::cast_sign_loss)]
    fn set_cell(&mut self, col: i32, row: i32, cell: Cell) {
        if col < 0 || row < 0 || col >= i32::from(self.cols) || row >= i32::from(self.rows) {
            return;
        }
        let at = row as usize * usize::from(self.cols) + col as usize;
        self.front[at] = cell;
    }

    /// Put a character at a pixel position under no transform.
    #[allow(clippy::cast_possible_truncation)]
    fn plot(&mut self, x: f64, y: f64, ch: char, fg: TermColor) {
        let col = (x / CELL_W).round();
        let row = (y / CELL_H).round();
        if !col.is_finite() || !row.is_finite() {
            return;
        }
        self.set_cell(col as i32, row as i32, Cell { ch, fg });
    }

    /// Write the changed cells out and make this frame the baseline.
    pub fn present(&mut self, out: &mut impl Write) -> io::Result<()> {
        let mut fg = TermColor::Reset;
        queue!(out, SetForegroundColor(fg))?;
        for row in 0..self.rows {
            for col in 0..self.cols {
                let at = usize::from(row) * usize::from(self.cols) + usize::from(col);
                let cell = self.front[at];
                if cell == self.back[at] {
                    continue;
                }
                if cell.fg != fg {
                    queue!(out, SetForegroundColor(cell.fg))?;
                    fg = cell.fg;
                }
                queue!(out, MoveTo(col, row), Print(cell.ch))?;
            }
        }
        out.flush()?;
        self.back.copy_from_slice(&self.front);
        Ok(())
    }
}

impl Surface for TermSurface {
    fn size(&self) -> (f64, f64) {
        (f64::from(self.cols) * CELL_W, f64::from(self.rows) * CELL_H)
    }

    fn char_width(&self, _ch: char) -> f64 {
        CELL_W
    }

    fn begin_frame(&mut self) {
        self.front.fill(BLANK);
        self.transform = Transform::IDENTITY;
    }

    fn set_transform(&mut self, t: Transform) {
        self.transform = t;
    }

    fn outline_char(&mut self, _ch: char) {
        // A character grid has no outline pass.
    }

    fn fill_char(&mut self, ch: char, color: Color) {
        let (x, y) = self.transform.apply(0.0, 0.0);
        self.plot(x, y, ch, term_color(color));
    }

    fn line(&mut self, from: (f64, f64), to: (f64, f64)) {
        let (x0, y0) = self.transform.apply(from.0, from.1);
        let (x1, y1) = self.transform.apply(to.0, to.1);
        let steps = ((x1 - x0).abs() / CELL_W).max((y1 - y0).abs() / CELL_H).ceil().max(1.0);
        let mut i = 0.0;
        while i <= steps {
            let t = i / steps;
            self.plot(x0 + (x1 - x0) * t, y0 + (y1 - y0) * t, '·', TermColor::DarkGrey);
            i += 1.0;
        }
    }

    fn snail(&mut self, color: Color) {
        let (x, y) = self.transform.apply(0.0, 0.0);
        self.plot(x, y, '@', term_color(color));
    }
}

fn term_color(color: Color) -> TermColor {
    let (r, g, b) = color.channels();
    TermColor::Rgb { r, g, b }
}

/// Raw-mode alternate-screen session. Restores the terminal on drop.
pub struct Term {
    out: BufWriter<Stdout>,
    pub surface: TermSurface,
}

impl Term {
    /// Enter raw mode and the alternate screen.
    ///
    /// # Errors
    ///
    /// Returns the underlying terminal error when setup fails.
    pub fn new() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let mut out = BufWriter::new(io::stdout());
        execute!(out, EnterAlternateScreen, Hide, Clear(ClearType::All))?;
        let (cols, rows) = terminal::size().unwrap_or((80, 24));
        Ok(Self { out, surface: TermSurface::new(cols, rows) })
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.surface.resize(cols, rows);
    }

    /// Flush the surface's changed cells to the terminal.
    ///
    /// # Errors
    ///
    /// Returns the underlying write error.
    pub fn present(&mut self) -> io::Result<()> {
        let Self { out, surface } = self;
        surface.present(out)
    }
}

impl Drop for Term {
    fn drop(&mut self) {
        let _ = execute!(self.out, ResetColor, Show, LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

/// Held-key tracking for sustained turn intent.
///
/// Terminals that report key releases clear entries promptly; the rest
/// fall back to a repeat timeout — holding a key keeps delivering press
/// and repeat events, so an entry that stops refreshing means the key
/// came up.
pub struct KeyTracker {
    last_active: HashMap<KeyCode, Instant>,
}

impl KeyTracker {
    #[must_use]
    pub fn new() -> Self {
        Self { last_active: HashMap::new() }
    }

    /// Feed one terminal key event.
    pub fn note(&mut self, event: &KeyEvent) {
        if event.kind == KeyEventKind::Release {
            self.last_active.remove(&event.code);
        } else {
            self.last_active.insert(event.code, Instant::now());
        }
    }

    /// Drop keys that stopped repeating. Call once per tick.
    pub fn expire(&mut self) {
        let now = Instant::now();
        self.last_active.retain(|_, t| now.duration_since(*t) < HOLD_TIMEOUT);
    }

    fn held(&self, code: KeyCode) -> bool {
        self.last_active.contains_key(&code)
    }

    /// Current turn intent from the held arrow keys.
    #[must_use]
    pub fn turn(&self) -> Turn {
        match (self.held(KeyCode::Left), self.held(KeyCode::Right)) {
            (true, false) => Turn::Left,
            (false, true) => Turn::Right,
            _ => Turn::None,
        }
    }
}

impl Default for KeyTracker {
    fn default() -> Self {
        Self::new()
    }
}
