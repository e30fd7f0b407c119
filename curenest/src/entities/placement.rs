use crate::entities::Level;
use crate::geometry::primitives::Rect;

/// Position, footprint and orientation of a single tool within a batch.
#[derive(Clone, Debug, PartialEq)]
pub struct ToolPlacement {
    pub tool_id: u64,
    /// The work order the tool is loaded for
    pub work_order_id: u64,
    pub part_number: Option<String>,
    pub level: Level,
    /// Lower-left corner of the footprint
    pub x: f32,
    pub y: f32,
    /// Canonical (unrotated) dimensions of the tool
    pub width: f32,
    pub height: f32,
    /// If true, the tool is turned a quarter and its effective footprint swaps `width` and `height`
    pub rotated: bool,
    /// Vacuum lines occupied by the tool
    pub valve_count: u32,
    pub weight: Option<f32>,
}

impl ToolPlacement {
    /// Width and height of the footprint the tool actually occupies.
    pub fn effective_dimensions(&self) -> (f32, f32) {
        match self.rotated {
            false => (self.width, self.height),
            true => (self.height, self.width),
        }
    }

    /// The region of the plane occupied by the tool, rotation applied.
    pub fn footprint(&self) -> Rect {
        let (w, h) = self.effective_dimensions();
        Rect::from_corner(self.x, self.y, w, h)
    }

    pub fn area(&self) -> f64 {
        self.width as f64 * self.height as f64
    }
}
