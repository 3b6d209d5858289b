//! Boundary classification and neighbor-offset selection.
//!
//! A 3x3 neighborhood centered on a border pixel pokes outside the image.
//! Rather than padding or clamping, the engine drops the offsets that leave
//! the image, which gives three neighborhood sizes:
//!
//! ```text
//!  corner (4)     edge (6)       interior (9)
//!  X o            o X o          o o o
//!  o o            o o o          o X o
//!                                o o o
//! ```
//!
//! Both the class and the offset set are pure functions of
//! `(row, col, width, height)`; every filter in [`crate::convolve`] goes
//! through [`Neighborhood::at`].

/// Which border a non-corner boundary pixel sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Top,
    Bottom,
    Left,
    Right,
}

/// Which corner a pixel occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// Position class of a pixel relative to the image border.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionClass {
    /// Not on any border row or column
    Interior,
    /// On exactly one border row or column
    Edge(Side),
    /// On a border row and a border column
    Corner(Corner),
}

impl PositionClass {
    /// Classify `(row, col)` in a `width x height` image.
    ///
    /// In images one pixel thin a pixel can sit on two opposite borders at
    /// once; the top/left border wins for naming, while
    /// [`Neighborhood::at`] still drops every offset that leaves the image.
    pub fn classify(row: usize, col: usize, width: usize, height: usize) -> Self {
        debug_assert!(row < height && col < width);
        let top = row == 0;
        let bottom = row + 1 >= height;
        let left = col == 0;
        let right = col + 1 >= width;

        let vertical = if top {
            Some(Side::Top)
        } else if bottom {
            Some(Side::Bottom)
        } else {
            None
        };
        let horizontal = if left {
            Some(Side::Left)
        } else if right {
            Some(Side::Right)
        } else {
            None
        };

        match (vertical, horizontal) {
            (None, None) => PositionClass::Interior,
            (Some(side), None) | (None, Some(side)) => PositionClass::Edge(side),
            (Some(v), Some(h)) => PositionClass::Corner(match (v, h) {
                (Side::Top, Side::Left) => Corner::TopLeft,
                (Side::Top, _) => Corner::TopRight,
                (_, Side::Left) => Corner::BottomLeft,
                _ => Corner::BottomRight,
            }),
        }
    }
}

/// Inclusive offset range along one axis, a subset of `-1..=1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Span {
    lo: isize,
    hi: isize,
}

impl Span {
    const FULL: Span = Span { lo: -1, hi: 1 };

    /// Trim the side(s) of `-1..=1` that leave `0..len` at `pos`.
    fn clipped(pos: usize, len: usize) -> Self {
        Span {
            lo: if pos == 0 { 0 } else { -1 },
            hi: if pos + 1 >= len { 0 } else { 1 },
        }
    }

    fn len(self) -> usize {
        (self.hi - self.lo + 1) as usize
    }
}

/// The in-bounds 3x3 offsets around one pixel.
///
/// Offsets are yielded in row-major order `(dr, dc)` with each component in
/// `-1..=1`, matching the layout of [`Kernel3`](super::Kernel3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Neighborhood {
    row: usize,
    col: usize,
    class: PositionClass,
    rows: Span,
    cols: Span,
}

impl Neighborhood {
    /// Select the valid offsets for `(row, col)` in a `width x height` image.
    pub fn at(row: usize, col: usize, width: usize, height: usize) -> Self {
        let class = PositionClass::classify(row, col, width, height);
        let (rows, cols) = match class {
            PositionClass::Interior => (Span::FULL, Span::FULL),
            // Edges and corners keep only the half-spans that stay inside.
            // Computing both axes from the position also covers images
            // narrower than 2 pixels, where one pixel touches opposite sides.
            PositionClass::Edge(_) | PositionClass::Corner(_) => (
                Span::clipped(row, height),
                Span::clipped(col, width),
            ),
        };
        Self {
            row,
            col,
            class,
            rows,
            cols,
        }
    }

    #[inline]
    pub fn class(&self) -> PositionClass {
        self.class
    }

    /// Number of in-bounds neighbors, the center included.
    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len() * self.cols.len()
    }

    /// Always false: the center pixel is part of every neighborhood.
    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// In-bounds offsets `(dr, dc)` in row-major order.
    pub fn offsets(&self) -> impl Iterator<Item = (isize, isize)> {
        let cols = self.cols;
        (self.rows.lo..=self.rows.hi).flat_map(move |dr| (cols.lo..=cols.hi).map(move |dc| (dr, dc)))
    }

    /// In-bounds neighbor coordinates `(row, col)` with the matching offset.
    pub fn coords(&self) -> impl Iterator<Item = ((isize, isize), (usize, usize))> {
        let (row, col) = (self.row, self.col);
        self.offsets().map(move |(dr, dc)| {
            (
                (dr, dc),
                (
                    row.wrapping_add_signed(dr),
                    col.wrapping_add_signed(dc),
                ),
            )
        })
    }
}
