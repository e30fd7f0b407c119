use crate::entities::BatchStatus;
use serde::{Deserialize, Serialize};

/// External representation of a [`NestingBatch`](crate::entities::NestingBatch), as produced by the optimizer.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ExtNestingBatch {
    pub batch_id: String,
    pub autoclave: ExtAutoclave,
    /// The tools and where they were placed
    #[serde(default)]
    pub positioned_tools: Vec<ExtPositionedTool>,
    /// The support fixtures ("cavalletti") carrying the elevated plane
    #[serde(default)]
    pub cavalletti: Vec<ExtCavalletto>,
    pub utilized_area: f64,
    pub total_area: f64,
    pub utilized_valve_count: u32,
    pub total_valve_count: u32,
    pub status: BatchStatus,
}

/// External representation of an [`Autoclave`](crate::entities::Autoclave).
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ExtAutoclave {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub length: f32,
    pub width: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_temperature: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_pressure: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_load_weight: Option<f32>,
    #[serde(default)]
    pub uses_secondary_plane: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vacuum_lines: Option<u32>,
}

/// External representation of a [`ToolPlacement`](crate::entities::ToolPlacement).
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ExtPositionedTool {
    pub tool_id: u64,
    /// Id of the work order ("ordine di lavoro") the tool is loaded for
    pub odl_id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub part_number: Option<String>,
    /// 0 for the base plane, 1 for the elevated plane
    #[serde(default)]
    pub level: u8,
    pub x: f32,
    pub y: f32,
    /// Canonical width of the tool, before rotation
    pub width: f32,
    /// Canonical height of the tool, before rotation
    pub height: f32,
    #[serde(default)]
    pub rotated: bool,
    #[serde(default)]
    pub valve_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f32>,
}

/// External representation of a [`SupportFixture`](crate::entities::SupportFixture).
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ExtCavalletto {
    pub id: u64,
    /// Boundary the fixture sits at, either 0 or 1 (both denote the boundary between the two planes)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<u8>,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_id: Option<u64>,
}
