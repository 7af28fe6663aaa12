//! Board geometry in a fixed 100x100 logical space.
//!
//! Everything is derived from `(grid_size, padding)`; the ordering of
//! [`BoardLayout::lines`] and [`BoardLayout::boxes`] is the index contract with
//! the bot and must not change.

/// Side of the logical coordinate space (SVG viewBox).
pub const VIEW_SIZE: f64 = 100.0;

/// Default margin between the viewBox edge and the outer dots.
pub const DEFAULT_PADDING: f64 = 10.0;

/// Number of claimable lines on an `n`x`n` dot grid.
pub fn line_count(grid_size: usize) -> usize {
    grid_size * grid_size.saturating_sub(1) * 2
}

/// Number of boxes on an `n`x`n` dot grid.
pub fn box_count(grid_size: usize) -> usize {
    let cells = grid_size.saturating_sub(1);
    cells * cells
}

/// [`line_count`] for an untrusted grid size; `None` on overflow.
pub fn checked_line_count(grid_size: usize) -> Option<usize> {
    grid_size
        .checked_mul(grid_size.saturating_sub(1))?
        .checked_mul(2)
}

/// [`box_count`] for an untrusted grid size; `None` on overflow.
pub fn checked_box_count(grid_size: usize) -> Option<usize> {
    let cells = grid_size.saturating_sub(1);
    cells.checked_mul(cells)
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineSegment {
    pub index: usize,
    pub orientation: Orientation,
    pub from: Point,
    pub to: Point,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoxCell {
    pub index: usize,
    pub origin: Point,
    pub size: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoardLayout {
    grid_size: usize,
    padding: f64,
    step: f64,
}

impl BoardLayout {
    /// `grid_size` must be at least 2; `GameState` guarantees this.
    pub fn new(grid_size: usize, padding: f64) -> Self {
        let spans = grid_size.saturating_sub(1).max(1) as f64;
        Self {
            grid_size,
            padding,
            step: (VIEW_SIZE - 2.0 * padding) / spans,
        }
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    /// Position of the dot at `(row, col)`.
    pub fn dot(&self, row: usize, col: usize) -> Point {
        Point {
            x: self.padding + col as f64 * self.step,
            y: self.padding + row as f64 * self.step,
        }
    }

    pub fn dots(&self) -> impl Iterator<Item = Point> + '_ {
        let n = self.grid_size;
        (0..n).flat_map(move |r| (0..n).map(move |c| self.dot(r, c)))
    }

    /// All lines in wire order: horizontals row by row, then verticals.
    pub fn lines(&self) -> Vec<LineSegment> {
        let n = self.grid_size;
        let mut out = Vec::with_capacity(line_count(n));
        for r in 0..n {
            for c in 0..n.saturating_sub(1) {
                out.push(LineSegment {
                    index: out.len(),
                    orientation: Orientation::Horizontal,
                    from: self.dot(r, c),
                    to: self.dot(r, c + 1),
                });
            }
        }
        for r in 0..n.saturating_sub(1) {
            for c in 0..n {
                out.push(LineSegment {
                    index: out.len(),
                    orientation: Orientation::Vertical,
                    from: self.dot(r, c),
                    to: self.dot(r + 1, c),
                });
            }
        }
        out
    }

    /// Box cells, row-major.
    pub fn boxes(&self) -> Vec<BoxCell> {
        let cells = self.grid_size.saturating_sub(1);
        (0..cells * cells)
            .map(|i| BoxCell {
                index: i,
                origin: self.dot(i / cells, i % cells),
                size: self.step,
            })
            .collect()
    }
}
