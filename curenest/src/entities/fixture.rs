use crate::geometry::primitives::Rect;

/// A support stand ("cavalletto") placed on the base plane, bearing the load of elevated tools.
/// It always sits at the boundary between level 0 and level 1.
#[derive(Clone, Debug, PartialEq)]
pub struct SupportFixture {
    pub id: u64,
    /// Boundary as reported by the producer, 0 and 1 both denote the same boundary
    pub level: Option<u8>,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Tool the fixture was positioned for, purely informational
    pub tool_id: Option<u64>,
}

impl SupportFixture {
    pub fn footprint(&self) -> Rect {
        Rect::from_corner(self.x, self.y, self.width, self.height)
    }
}
