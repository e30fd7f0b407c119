use crate::entities::{Autoclave, BatchStatus, Level, SupportFixture, ToolPlacement};

/// Result of packing tools onto one or two planes of an autoclave.
/// Immutable once delivered: consumers only ever read it.
#[derive(Clone, Debug, PartialEq)]
pub struct NestingBatch {
    pub batch_id: String,
    pub autoclave: Autoclave,
    pub placements: Vec<ToolPlacement>,
    pub fixtures: Vec<SupportFixture>,
    /// Summary metrics as reported by the producer of the batch
    pub metrics: BatchMetrics,
    pub status: BatchStatus,
}

/// Summary metrics of a [`NestingBatch`].
/// Must be consistent with the placements, see [`BatchMetrics::compute`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BatchMetrics {
    pub utilized_area: f64,
    pub total_area: f64,
    pub utilized_valve_count: u32,
    pub total_valve_count: u32,
}

impl BatchMetrics {
    /// Derives the metrics from the autoclave and placements.
    /// The total valve count is 0 when the autoclave does not report its vacuum lines.
    pub fn compute(autoclave: &Autoclave, placements: &[ToolPlacement]) -> Self {
        BatchMetrics {
            utilized_area: placements.iter().map(|p| p.area()).sum(),
            total_area: autoclave.total_area(),
            utilized_valve_count: placements.iter().map(|p| p.valve_count).sum(),
            total_valve_count: autoclave.vacuum_lines.unwrap_or(0),
        }
    }
}

impl NestingBatch {
    pub fn placements_on(&self, level: Level) -> impl Iterator<Item = (usize, &ToolPlacement)> {
        self.placements
            .iter()
            .enumerate()
            .filter(move |(_, p)| p.level == level)
    }

    /// Combined weight of all tools, [`None`] as soon as one of them has no known weight.
    pub fn total_weight(&self) -> Option<f32> {
        self.placements.iter().map(|p| p.weight).sum()
    }
}
