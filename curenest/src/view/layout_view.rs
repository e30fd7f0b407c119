use crate::entities::{Level, NestingBatch, SupportFixture, ToolPlacement};
use crate::geometry::geo_traits::CollidesWith;
use crate::geometry::primitives::Point;
use crate::io::ext_repr::ExtNestingBatch;
use crate::io::import::import_batch;
use crate::validation::{ValidationResult, Violation, validate};
use crate::view::HitGrid;
use anyhow::Result;
use log::{debug, warn};
use std::sync::Arc;

/// Interactive state derived from a delivered [`NestingBatch`].
///
/// The batch is validated before anything is derived from it. Placements and fixtures named by a
/// geometric violation are withheld from rendering and hit-testing, the rest of the batch stays usable.
/// The batch itself is never modified: visibility and selection live in the view.
#[derive(Clone, Debug)]
pub struct LayoutView {
    batch: Arc<NestingBatch>,
    validation: ValidationResult,
    /// Per placement (by index), whether it can be rendered
    placement_renderable: Vec<bool>,
    /// Per fixture (by index), whether it can be rendered
    fixture_renderable: Vec<bool>,
    /// Spatial index over the footprints of all renderable placements
    hit_grid: HitGrid,
    /// Visibility toggle per level, indexed by [`Level::index`]
    visible_levels: [bool; 2],
    /// Index of the selected placement
    selected: Option<usize>,
}

impl LayoutView {
    pub fn new(batch: Arc<NestingBatch>) -> Self {
        let mut view = LayoutView {
            batch: batch.clone(),
            validation: ValidationResult::Valid,
            placement_renderable: vec![],
            fixture_renderable: vec![],
            hit_grid: HitGrid::empty(),
            visible_levels: [true; 2],
            selected: None,
        };
        view.rebuild(batch);
        view
    }

    /// Imports the external representation of a batch and builds a view on it.
    /// Fails only for malformed payloads, invalid batches still result in a (partial) view.
    pub fn from_ext(ext_batch: &ExtNestingBatch) -> Result<Self> {
        let batch = import_batch(ext_batch)?;
        Ok(LayoutView::new(Arc::new(batch)))
    }

    /// Switches the view to another batch.
    /// Validation and hit-test index are only rebuilt if `batch` is a different allocation than the current one.
    /// Returns true if the view was rebuilt, which also clears the selection. Level visibility is kept.
    pub fn replace_batch(&mut self, batch: Arc<NestingBatch>) -> bool {
        if Arc::ptr_eq(&self.batch, &batch) {
            return false;
        }
        self.rebuild(batch);
        true
    }

    fn rebuild(&mut self, batch: Arc<NestingBatch>) {
        let validation = validate(&batch);
        let violations = validation.violations();

        let plane_valid = batch.autoclave.plane().is_some();
        let mut placement_renderable = vec![plane_valid; batch.placements.len()];
        let mut fixture_renderable = vec![plane_valid; batch.fixtures.len()];
        for v in violations {
            v.placements()
                .iter()
                .for_each(|p| placement_renderable[p.index] = false);
            v.fixtures()
                .iter()
                .for_each(|f| fixture_renderable[f.index] = false);
        }

        let hit_grid = match batch.autoclave.plane() {
            Some(plane) => HitGrid::new(
                plane,
                batch
                    .placements
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| placement_renderable[*i])
                    .map(|(i, p)| (i, p.footprint())),
            ),
            None => HitGrid::empty(),
        };

        let n_renderable = placement_renderable.iter().filter(|r| **r).count();
        match validation.is_valid() {
            true => debug!(
                "[VIEW] batch {} valid, {} placements",
                batch.batch_id, n_renderable
            ),
            false => warn!(
                "[VIEW] batch {} has {} violation(s), rendering {}/{} placements",
                batch.batch_id,
                violations.len(),
                n_renderable,
                batch.placements.len()
            ),
        }

        self.batch = batch;
        self.validation = validation;
        self.placement_renderable = placement_renderable;
        self.fixture_renderable = fixture_renderable;
        self.hit_grid = hit_grid;
        self.selected = None;
    }

    pub fn batch(&self) -> &Arc<NestingBatch> {
        &self.batch
    }

    pub fn validation(&self) -> &ValidationResult {
        &self.validation
    }

    /// Violations to surface to the operator
    pub fn violations(&self) -> &[Violation] {
        self.validation.violations()
    }

    pub fn is_renderable(&self, placement_index: usize) -> bool {
        self.placement_renderable
            .get(placement_index)
            .copied()
            .unwrap_or(false)
    }

    /// Renderable placements on `level`, regardless of the level's visibility.
    pub fn renderable_placements(&self, level: Level) -> impl Iterator<Item = &ToolPlacement> {
        self.batch
            .placements_on(level)
            .filter(|(i, _)| self.placement_renderable[*i])
            .map(|(_, p)| p)
    }

    /// Renderable placements on `level`, or nothing if the level is hidden.
    pub fn visible_placements(&self, level: Level) -> impl Iterator<Item = &ToolPlacement> {
        let visible = self.is_level_visible(level);
        self.renderable_placements(level)
            .filter(move |_| visible)
    }

    /// Placements withheld from rendering because a violation names them.
    pub fn rejected_placements(&self) -> impl Iterator<Item = &ToolPlacement> {
        self.batch
            .placements
            .iter()
            .zip(self.placement_renderable.iter())
            .filter(|(_, r)| !**r)
            .map(|(p, _)| p)
    }

    pub fn renderable_fixtures(&self) -> impl Iterator<Item = &SupportFixture> {
        self.batch
            .fixtures
            .iter()
            .zip(self.fixture_renderable.iter())
            .filter(|(_, r)| **r)
            .map(|(f, _)| f)
    }

    pub fn is_level_visible(&self, level: Level) -> bool {
        self.visible_levels[level.index()]
    }

    /// Shows or hides `level`. Hiding the level of the selected placement clears the selection.
    pub fn set_level_visible(&mut self, level: Level, visible: bool) {
        self.visible_levels[level.index()] = visible;
        if !visible && self.selected().is_some_and(|p| p.level == level) {
            self.selected = None;
        }
    }

    /// Flips the visibility of `level` and returns the new visibility.
    pub fn toggle_level(&mut self, level: Level) -> bool {
        let visible = !self.is_level_visible(level);
        self.set_level_visible(level, visible);
        visible
    }

    /// The topmost visible, renderable placement whose effective footprint contains `point` (boundary included).
    pub fn hit_test(&self, point: Point) -> Option<&ToolPlacement> {
        self.hit_test_index(point).map(|i| &self.batch.placements[i])
    }

    fn hit_test_index(&self, point: Point) -> Option<usize> {
        self.hit_grid
            .candidates(point)
            .iter()
            .copied()
            .filter(|i| {
                let p = &self.batch.placements[*i];
                self.is_level_visible(p.level) && p.footprint().collides_with(&point)
            })
            .min_by_key(|i| (std::cmp::Reverse(self.batch.placements[*i].level), *i))
    }

    /// Selects the renderable placement of tool `tool_id` on a visible level.
    /// Returns false, leaving the selection untouched, if there is no such placement.
    pub fn select(&mut self, tool_id: u64) -> bool {
        let found = self
            .batch
            .placements
            .iter()
            .enumerate()
            .find(|(i, p)| {
                p.tool_id == tool_id
                    && self.placement_renderable[*i]
                    && self.is_level_visible(p.level)
            })
            .map(|(i, _)| i);
        match found {
            Some(i) => {
                self.selected = Some(i);
                true
            }
            None => false,
        }
    }

    /// Selects the placement under `point`, or clears the selection if there is none.
    /// Returns the newly selected placement.
    pub fn select_at(&mut self, point: Point) -> Option<&ToolPlacement> {
        self.selected = self.hit_test_index(point);
        self.selected()
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn selected(&self) -> Option<&ToolPlacement> {
        self.selected.map(|i| &self.batch.placements[i])
    }
}
