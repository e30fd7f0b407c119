use anyhow::{Context, Result, bail, ensure};
use curenest::entities::{BatchMetrics, BatchStatus, Level, NestingBatch, ToolPlacement};
use curenest::io::ext_repr::ExtAutoclave;
use curenest::io::import::import_autoclave;
use itertools::Itertools;
use log::{debug, warn};
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Request to nest a set of tools into an autoclave
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct NestingRequest {
    /// Job id chosen by the client, a random one is assigned if absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,
    pub autoclave: ExtAutoclave,
    pub tools: Vec<ToolRequirement>,
    /// Minimum gap between two tools
    #[serde(default)]
    pub spacing: f32,
    #[serde(default = "default_allow_rotation")]
    pub allow_rotation: bool,
}

fn default_allow_rotation() -> bool {
    true
}

/// A tool that has to be placed
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ToolRequirement {
    pub tool_id: u64,
    /// Work order the tool belongs to
    pub odl_id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub part_number: Option<String>,
    pub width: f32,
    pub height: f32,
    #[serde(default)]
    pub valve_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f32>,
}

impl NestingRequest {
    /// Rejects requests no optimizer can work with.
    pub fn validate(&self) -> Result<()> {
        if let Some(job_id) = &self.job_id {
            ensure!(!job_id.trim().is_empty(), "job id must not be blank");
        }
        let autoclave = import_autoclave(&self.autoclave).context("invalid autoclave")?;
        ensure!(
            autoclave.plane().is_some(),
            "autoclave plane must have a positive length and width, got {} x {}",
            autoclave.length,
            autoclave.width
        );
        ensure!(!self.tools.is_empty(), "no tools to nest");
        ensure!(
            self.spacing.is_finite() && self.spacing >= 0.0,
            "spacing must be finite and non-negative, got {}",
            self.spacing
        );

        let mut seen = HashSet::new();
        for tool in &self.tools {
            ensure!(
                seen.insert(tool.tool_id),
                "tool {} is requested more than once",
                tool.tool_id
            );
            ensure!(
                tool.width.is_finite() && tool.height.is_finite() && tool.width > 0.0 && tool.height > 0.0,
                "tool {} has invalid dimensions {} x {}",
                tool.tool_id,
                tool.width,
                tool.height
            );
        }
        Ok(())
    }
}

/// Produces a batch from a nesting request.
/// Implementations are synchronous and may block for a long time.
pub trait Optimizer: Send + Sync {
    fn nest(&self, batch_id: &str, request: &NestingRequest) -> Result<NestingBatch>;
}

/// Places tools on the base plane in shelves, tallest first.
///
/// Every tool is (optionally) rotated to lie flat, then tools are appended left to right to the current shelf.
/// When a tool does not fit the remaining length, a new shelf is opened above the tallest tool of the previous one.
/// Tools that fit in no shelf are left out of the batch.
#[derive(Clone, Copy, Debug, Default)]
pub struct ShelfOptimizer;

impl Optimizer for ShelfOptimizer {
    fn nest(&self, batch_id: &str, request: &NestingRequest) -> Result<NestingBatch> {
        request.validate()?;
        let autoclave = import_autoclave(&request.autoclave)?;
        let spacing = request.spacing;

        let oriented = request
            .tools
            .iter()
            .map(|t| {
                let rotated = request.allow_rotation && t.height > t.width;
                (t, rotated)
            })
            .sorted_by_key(|(t, rotated)| {
                let eff_height = if *rotated { t.width } else { t.height };
                (std::cmp::Reverse(OrderedFloat(eff_height)), t.tool_id)
            })
            .collect_vec();

        let mut placements = vec![];
        let mut unplaced = vec![];
        let (mut shelf_x, mut shelf_y, mut shelf_height) = (0.0_f32, 0.0_f32, 0.0_f32);

        for (tool, rotated) in oriented {
            let (eff_width, eff_height) = match rotated {
                true => (tool.height, tool.width),
                false => (tool.width, tool.height),
            };
            if shelf_x > 0.0 && shelf_x + eff_width > autoclave.length {
                //open a new shelf
                shelf_y += shelf_height + spacing;
                shelf_x = 0.0;
                shelf_height = 0.0;
            }
            if shelf_x + eff_width > autoclave.length || shelf_y + eff_height > autoclave.width {
                unplaced.push(tool.tool_id);
                continue;
            }

            placements.push(ToolPlacement {
                tool_id: tool.tool_id,
                work_order_id: tool.odl_id,
                part_number: tool.part_number.clone(),
                level: Level::Base,
                x: shelf_x,
                y: shelf_y,
                width: tool.width,
                height: tool.height,
                rotated,
                valve_count: tool.valve_count,
                weight: tool.weight,
            });
            shelf_x += eff_width + spacing;
            shelf_height = shelf_height.max(eff_height);
        }

        if placements.is_empty() {
            bail!(
                "none of the {} tools fit in autoclave of {} x {}",
                request.tools.len(),
                autoclave.length,
                autoclave.width
            );
        }
        if !unplaced.is_empty() {
            warn!(
                "[SHELF] batch {batch_id}: {} tool(s) did not fit: {:?}",
                unplaced.len(),
                unplaced
            );
        }

        let metrics = BatchMetrics::compute(&autoclave, &placements);
        debug!(
            "[SHELF] batch {batch_id}: placed {}/{} tools, utilized area {:.1}/{:.1}",
            placements.len(),
            request.tools.len(),
            metrics.utilized_area,
            metrics.total_area
        );

        Ok(NestingBatch {
            batch_id: batch_id.to_string(),
            autoclave,
            placements,
            fixtures: vec![],
            metrics,
            status: BatchStatus::Draft,
        })
    }
}
