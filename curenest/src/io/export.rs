use crate::entities::{Autoclave, NestingBatch, SupportFixture, ToolPlacement};
use crate::io::ext_repr::{ExtAutoclave, ExtCavalletto, ExtNestingBatch, ExtPositionedTool};

/// Exports a batch to its external representation.
pub fn export_batch(batch: &NestingBatch) -> ExtNestingBatch {
    ExtNestingBatch {
        batch_id: batch.batch_id.clone(),
        autoclave: export_autoclave(&batch.autoclave),
        positioned_tools: batch.placements.iter().map(export_placement).collect(),
        cavalletti: batch.fixtures.iter().map(export_fixture).collect(),
        utilized_area: batch.metrics.utilized_area,
        total_area: batch.metrics.total_area,
        utilized_valve_count: batch.metrics.utilized_valve_count,
        total_valve_count: batch.metrics.total_valve_count,
        status: batch.status,
    }
}

pub fn export_autoclave(autoclave: &Autoclave) -> ExtAutoclave {
    ExtAutoclave {
        id: autoclave.id,
        name: autoclave.name.clone(),
        length: autoclave.length,
        width: autoclave.width,
        max_temperature: autoclave.max_temperature,
        max_pressure: autoclave.max_pressure,
        max_load_weight: autoclave.max_load_weight,
        uses_secondary_plane: autoclave.uses_secondary_plane,
        vacuum_lines: autoclave.vacuum_lines,
    }
}

pub fn export_placement(placement: &ToolPlacement) -> ExtPositionedTool {
    ExtPositionedTool {
        tool_id: placement.tool_id,
        odl_id: placement.work_order_id,
        part_number: placement.part_number.clone(),
        level: placement.level.into(),
        x: placement.x,
        y: placement.y,
        width: placement.width,
        height: placement.height,
        rotated: placement.rotated,
        valve_count: placement.valve_count,
        weight: placement.weight,
    }
}

pub fn export_fixture(fixture: &SupportFixture) -> ExtCavalletto {
    ExtCavalletto {
        id: fixture.id,
        level: fixture.level,
        x: fixture.x,
        y: fixture.y,
        width: fixture.width,
        height: fixture.height,
        tool_id: fixture.tool_id,
    }
}
