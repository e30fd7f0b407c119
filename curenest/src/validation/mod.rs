mod support;
mod violation;

#[doc(inline)]
pub use support::{SupportAssessment, assess_support};
#[doc(inline)]
pub use violation::{FixtureRef, Metric, PlacementRef, Rule, Violation};

use crate::entities::{BatchMetrics, Level, NestingBatch};
use crate::geometry::geo_traits::OverlapsWith;
use crate::geometry::primitives::Rect;
use float_cmp::approx_eq;
use itertools::Itertools;
use log::debug;
use ordered_float::OrderedFloat;
use std::collections::{HashMap, HashSet};

/// Relative tolerance when comparing reported area metrics with computed ones.
pub const AREA_REL_TOLERANCE: f64 = 1e-4;

/// Outcome of [`validate`]
#[derive(Clone, Debug, PartialEq)]
pub enum ValidationResult {
    Valid,
    /// All violations found, in the order they were checked
    Invalid(Vec<Violation>),
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }

    pub fn violations(&self) -> &[Violation] {
        match self {
            ValidationResult::Valid => &[],
            ValidationResult::Invalid(v) => v,
        }
    }
}

/// Checks every invariant of `batch` and reports all violations together.
///
/// The checks run in a fixed order and none of them short-circuits the others:
/// 1. plane and bounds: plane dimensions, degenerate footprints, duplicate ids, level availability, bounds
/// 2. overlap of placements on the same level
/// 3. support coverage of elevated placements
/// 4. summary metrics and load weight
pub fn validate(batch: &NestingBatch) -> ValidationResult {
    let mut violations = vec![];

    let rejected_fixtures = check_bounds(batch, &mut violations);
    check_overlap(batch, &mut violations);
    check_support(batch, &rejected_fixtures, &mut violations);
    check_metrics(batch, &mut violations);

    debug!(
        "[VAL] batch {}: {} placements, {} fixtures, {} violations",
        batch.batch_id,
        batch.placements.len(),
        batch.fixtures.len(),
        violations.len()
    );

    match violations.is_empty() {
        true => ValidationResult::Valid,
        false => ValidationResult::Invalid(violations),
    }
}

fn placement_ref(batch: &NestingBatch, index: usize) -> PlacementRef {
    PlacementRef {
        index,
        tool_id: batch.placements[index].tool_id,
    }
}

fn fixture_ref(batch: &NestingBatch, index: usize) -> FixtureRef {
    FixtureRef {
        index,
        fixture_id: batch.fixtures[index].id,
    }
}

/// Returns the indices of the fixtures that were reported, these cannot carry any load.
fn check_bounds(batch: &NestingBatch, violations: &mut Vec<Violation>) -> HashSet<usize> {
    let autoclave = &batch.autoclave;
    let plane = autoclave.plane();
    if plane.is_none() {
        violations.push(Violation::InvalidPlane {
            length: autoclave.length,
            width: autoclave.width,
        });
    }

    let mut first_seen: HashMap<u64, usize> = HashMap::new();
    for (i, p) in batch.placements.iter().enumerate() {
        let placement = placement_ref(batch, i);
        if let Some(&first_index) = first_seen.get(&p.tool_id) {
            violations.push(Violation::DuplicateToolId {
                placement,
                first_index,
            });
        } else {
            first_seen.insert(p.tool_id, i);
        }
        if !autoclave.is_level_available(p.level) {
            violations.push(Violation::LevelUnavailable { placement });
        }
        let footprint = p.footprint();
        if !footprint.is_proper() {
            violations.push(Violation::DegeneratePlacement { placement });
        } else if let Some(plane) = plane
            && !plane.almost_contains(&footprint)
        {
            violations.push(Violation::PlacementOutOfBounds { placement });
        }
    }

    let mut rejected = HashSet::new();
    let mut first_seen: HashMap<u64, usize> = HashMap::new();
    for (i, f) in batch.fixtures.iter().enumerate() {
        let fixture = fixture_ref(batch, i);
        if let Some(&first_index) = first_seen.get(&f.id) {
            violations.push(Violation::DuplicateFixtureId {
                fixture,
                first_index,
            });
            rejected.insert(i);
        } else {
            first_seen.insert(f.id, i);
        }
        let footprint = f.footprint();
        if !footprint.is_proper() {
            violations.push(Violation::DegenerateFixture { fixture });
            rejected.insert(i);
        } else if let Some(plane) = plane
            && !plane.almost_contains(&footprint)
        {
            violations.push(Violation::FixtureOutOfBounds { fixture });
            rejected.insert(i);
        }
    }
    rejected
}

/// Sweep over the placements of each level, sorted by their left edge.
fn check_overlap(batch: &NestingBatch, violations: &mut Vec<Violation>) {
    for level in Level::ALL {
        let sorted: Vec<(usize, Rect)> = batch
            .placements_on(level)
            .map(|(i, p)| (i, p.footprint()))
            .filter(|(_, fp)| fp.is_proper())
            .sorted_by_key(|(i, fp)| (OrderedFloat(fp.x_min), *i))
            .collect();

        let mut pairs = vec![];
        for (a, (i, fp_i)) in sorted.iter().enumerate() {
            for (j, fp_j) in sorted[a + 1..].iter() {
                if fp_j.x_min >= fp_i.x_max {
                    break;
                }
                if fp_i.overlaps_with(fp_j) {
                    pairs.push((usize::min(*i, *j), usize::max(*i, *j)));
                }
            }
        }
        pairs.sort_unstable();

        violations.extend(pairs.into_iter().map(|(i, j)| Violation::Overlap {
            level,
            first: placement_ref(batch, i),
            second: placement_ref(batch, j),
        }));
    }
}

/// Only fixtures that passed the bounds check count as contact regions.
fn check_support(
    batch: &NestingBatch,
    rejected_fixtures: &HashSet<usize>,
    violations: &mut Vec<Violation>,
) {
    let fixture_footprints = batch
        .fixtures
        .iter()
        .enumerate()
        .filter(|(i, _)| !rejected_fixtures.contains(i))
        .map(|(_, f)| f.footprint())
        .collect_vec();

    for (i, p) in batch.placements_on(Level::Elevated) {
        let footprint = p.footprint();
        if !footprint.is_proper() {
            continue;
        }
        let assessment = assess_support(footprint, fixture_footprints.iter().copied());
        if !assessment.is_stable() {
            violations.push(Violation::Unsupported {
                placement: placement_ref(batch, i),
                contact_regions: assessment.contact_regions.len(),
            });
        }
    }
}

fn check_metrics(batch: &NestingBatch, violations: &mut Vec<Violation>) {
    let reported = &batch.metrics;
    let computed = BatchMetrics::compute(&batch.autoclave, &batch.placements);

    let area_checks = [
        (Metric::UtilizedArea, reported.utilized_area, computed.utilized_area),
        (Metric::TotalArea, reported.total_area, computed.total_area),
    ];
    for (metric, reported, computed) in area_checks {
        let tolerance = AREA_REL_TOLERANCE * computed.abs().max(1.0);
        if !approx_eq!(f64, reported, computed, epsilon = tolerance) {
            violations.push(Violation::MetricMismatch {
                metric,
                reported,
                computed,
            });
        }
    }

    if reported.utilized_valve_count != computed.utilized_valve_count {
        violations.push(Violation::MetricMismatch {
            metric: Metric::UtilizedValveCount,
            reported: reported.utilized_valve_count as f64,
            computed: computed.utilized_valve_count as f64,
        });
    }
    if let Some(vacuum_lines) = batch.autoclave.vacuum_lines
        && reported.total_valve_count != vacuum_lines
    {
        violations.push(Violation::MetricMismatch {
            metric: Metric::TotalValveCount,
            reported: reported.total_valve_count as f64,
            computed: vacuum_lines as f64,
        });
    }

    if let (Some(limit), Some(total_weight)) = (batch.autoclave.max_load_weight, batch.total_weight())
        && total_weight > limit
    {
        violations.push(Violation::LoadExceeded {
            total_weight,
            limit,
        });
    }
}
