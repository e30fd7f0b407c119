use crate::geometry::geo_traits::CollidesWith;
use crate::geometry::primitives::{Point, Rect};

/// Upper bound on the number of cells along either axis of a [`HitGrid`].
const MAX_CELLS_PER_AXIS: usize = 64;

/// Uniform grid over a bounding rectangle, mapping every cell to the entries whose rectangle touches it.
/// Used to resolve a point to the few entries that could contain it without scanning all of them.
#[derive(Clone, Debug)]
pub struct HitGrid {
    bbox: Rect,
    n_cols: usize,
    n_rows: usize,
    cells: Vec<Vec<usize>>,
}

impl HitGrid {
    /// Builds a grid over `bbox` holding the given `(key, rect)` entries.
    /// The resolution grows with the number of entries.
    pub fn new(bbox: Rect, entries: impl IntoIterator<Item = (usize, Rect)>) -> Self {
        let entries: Vec<(usize, Rect)> = entries.into_iter().collect();
        let side = ((entries.len() as f32).sqrt().ceil() as usize).clamp(1, MAX_CELLS_PER_AXIS);
        let mut grid = HitGrid {
            bbox,
            n_cols: side,
            n_rows: side,
            cells: vec![vec![]; side * side],
        };
        for (key, rect) in entries {
            if !bbox.collides_with(&rect) {
                continue;
            }
            let (c_min, r_min) = grid.cell_coords(rect.x_min, rect.y_min);
            let (c_max, r_max) = grid.cell_coords(rect.x_max, rect.y_max);
            for r in r_min..=r_max {
                for c in c_min..=c_max {
                    grid.cells[r * grid.n_cols + c].push(key);
                }
            }
        }
        grid
    }

    /// Grid that holds nothing and never returns candidates.
    pub fn empty() -> Self {
        HitGrid {
            bbox: Rect::from_corner(0.0, 0.0, 0.0, 0.0),
            n_cols: 0,
            n_rows: 0,
            cells: vec![],
        }
    }

    /// Keys of all entries whose rectangle might contain `point`, in insertion order.
    pub fn candidates(&self, point: Point) -> &[usize] {
        if self.cells.is_empty() || !point.is_finite() || !self.bbox.collides_with(&point) {
            return &[];
        }
        let (c, r) = self.cell_coords(point.x(), point.y());
        &self.cells[r * self.n_cols + c]
    }

    fn cell_coords(&self, x: f32, y: f32) -> (usize, usize) {
        let to_cell = |v: f32, min: f32, extent: f32, n: usize| -> usize {
            let rel = (v - min) / extent * n as f32;
            (rel.floor().max(0.0) as usize).min(n - 1)
        };
        (
            to_cell(x, self.bbox.x_min, self.bbox.width(), self.n_cols),
            to_cell(y, self.bbox.y_min, self.bbox.height(), self.n_rows),
        )
    }
}
