use crate::entities::{
    Autoclave, BatchMetrics, Level, NestingBatch, SupportFixture, ToolPlacement,
};
use crate::io::ext_repr::{ExtAutoclave, ExtCavalletto, ExtNestingBatch, ExtPositionedTool};
use anyhow::{Context, Result, ensure};
use log::debug;

/// Converts the external representation of a batch into the internal one.
///
/// Rejects payloads that are malformed rather than merely invalid: non-finite numbers and unknown levels.
/// Geometric and bookkeeping invariants are left to [`validate`](crate::validation::validate).
pub fn import_batch(ext_batch: &ExtNestingBatch) -> Result<NestingBatch> {
    let autoclave = import_autoclave(&ext_batch.autoclave).context("invalid autoclave")?;

    let placements = ext_batch
        .positioned_tools
        .iter()
        .enumerate()
        .map(|(i, t)| import_placement(t).with_context(|| format!("invalid positioned tool #{i}")))
        .collect::<Result<Vec<ToolPlacement>>>()?;

    let fixtures = ext_batch
        .cavalletti
        .iter()
        .enumerate()
        .map(|(i, c)| import_fixture(c).with_context(|| format!("invalid cavalletto #{i}")))
        .collect::<Result<Vec<SupportFixture>>>()?;

    ensure!(
        ext_batch.utilized_area.is_finite() && ext_batch.total_area.is_finite(),
        "non-finite area metrics: utilized {}, total {}",
        ext_batch.utilized_area,
        ext_batch.total_area
    );

    debug!(
        "[IMPORT] batch {}: {} tools, {} cavalletti",
        ext_batch.batch_id,
        placements.len(),
        fixtures.len()
    );

    Ok(NestingBatch {
        batch_id: ext_batch.batch_id.clone(),
        autoclave,
        placements,
        fixtures,
        metrics: BatchMetrics {
            utilized_area: ext_batch.utilized_area,
            total_area: ext_batch.total_area,
            utilized_valve_count: ext_batch.utilized_valve_count,
            total_valve_count: ext_batch.total_valve_count,
        },
        status: ext_batch.status,
    })
}

pub fn import_autoclave(ext_autoclave: &ExtAutoclave) -> Result<Autoclave> {
    let limits = [
        ext_autoclave.max_temperature,
        ext_autoclave.max_pressure,
        ext_autoclave.max_load_weight,
    ];
    ensure!(
        ext_autoclave.length.is_finite() && ext_autoclave.width.is_finite(),
        "non-finite dimensions: length {}, width {}",
        ext_autoclave.length,
        ext_autoclave.width
    );
    ensure!(
        limits.iter().flatten().all(|l| l.is_finite()),
        "non-finite physical limit"
    );

    Ok(Autoclave {
        id: ext_autoclave.id,
        name: ext_autoclave.name.clone(),
        length: ext_autoclave.length,
        width: ext_autoclave.width,
        max_temperature: ext_autoclave.max_temperature,
        max_pressure: ext_autoclave.max_pressure,
        max_load_weight: ext_autoclave.max_load_weight,
        uses_secondary_plane: ext_autoclave.uses_secondary_plane,
        vacuum_lines: ext_autoclave.vacuum_lines,
    })
}

pub fn import_placement(ext_tool: &ExtPositionedTool) -> Result<ToolPlacement> {
    let level = Level::try_from(ext_tool.level)?;
    ensure_finite(&[ext_tool.x, ext_tool.y, ext_tool.width, ext_tool.height])
        .with_context(|| format!("tool {}", ext_tool.tool_id))?;
    if let Some(weight) = ext_tool.weight {
        ensure!(weight.is_finite(), "tool {}: non-finite weight", ext_tool.tool_id);
    }

    Ok(ToolPlacement {
        tool_id: ext_tool.tool_id,
        work_order_id: ext_tool.odl_id,
        part_number: ext_tool.part_number.clone(),
        level,
        x: ext_tool.x,
        y: ext_tool.y,
        width: ext_tool.width,
        height: ext_tool.height,
        rotated: ext_tool.rotated,
        valve_count: ext_tool.valve_count,
        weight: ext_tool.weight,
    })
}

pub fn import_fixture(ext_cavalletto: &ExtCavalletto) -> Result<SupportFixture> {
    if let Some(level) = ext_cavalletto.level {
        ensure!(
            level <= 1,
            "cavalletto {}: level {level} is not the boundary between plane 0 and 1",
            ext_cavalletto.id
        );
    }
    ensure_finite(&[
        ext_cavalletto.x,
        ext_cavalletto.y,
        ext_cavalletto.width,
        ext_cavalletto.height,
    ])
    .with_context(|| format!("cavalletto {}", ext_cavalletto.id))?;

    Ok(SupportFixture {
        id: ext_cavalletto.id,
        level: ext_cavalletto.level,
        x: ext_cavalletto.x,
        y: ext_cavalletto.y,
        width: ext_cavalletto.width,
        height: ext_cavalletto.height,
        tool_id: ext_cavalletto.tool_id,
    })
}

fn ensure_finite(values: &[f32]) -> Result<()> {
    ensure!(
        values.iter().all(|v| v.is_finite()),
        "non-finite coordinates or dimensions: {values:?}"
    );
    Ok(())
}
