use crate::entities::Level;
use crate::geometry::primitives::Rect;

/// The usable curing surface of an autoclave, together with its physical limits.
#[derive(Clone, Debug, PartialEq)]
pub struct Autoclave {
    pub id: Option<u64>,
    pub name: Option<String>,
    /// Extent of the plane along the x-axis
    pub length: f32,
    /// Extent of the plane along the y-axis
    pub width: f32,
    pub max_temperature: Option<f32>,
    pub max_pressure: Option<f32>,
    pub max_load_weight: Option<f32>,
    /// If false, only [`Level::Base`] can hold tools
    pub uses_secondary_plane: bool,
    /// Number of vacuum valve connections available
    pub vacuum_lines: Option<u32>,
}

impl Autoclave {
    /// The plane as a rectangle with its lower-left corner in the origin.
    /// [`None`] if the dimensions do not describe a proper plane.
    pub fn plane(&self) -> Option<Rect> {
        let plane = Rect::from_corner(0.0, 0.0, self.length, self.width);
        plane.is_proper().then_some(plane)
    }

    pub fn is_level_available(&self, level: Level) -> bool {
        match level {
            Level::Base => true,
            Level::Elevated => self.uses_secondary_plane,
        }
    }

    /// Number of planes that can hold tools.
    pub fn n_levels(&self) -> usize {
        Level::ALL
            .iter()
            .filter(|l| self.is_level_available(**l))
            .count()
    }

    /// Surface of a single plane
    pub fn plane_area(&self) -> f64 {
        self.length as f64 * self.width as f64
    }

    /// Surface of all usable planes combined
    pub fn total_area(&self) -> f64 {
        self.plane_area() * self.n_levels() as f64
    }
}
