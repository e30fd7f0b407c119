use crate::entities::Level;
use std::fmt::Display;

/// Reference to a placement within a batch: its position in the placement list and its tool id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PlacementRef {
    pub index: usize,
    pub tool_id: u64,
}

/// Reference to a support fixture within a batch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FixtureRef {
    pub index: usize,
    pub fixture_id: u64,
}

/// Summary metric of a batch that can disagree with its placements
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Metric {
    UtilizedArea,
    TotalArea,
    UtilizedValveCount,
    TotalValveCount,
}

/// The rule broken by a [`Violation`], without the details
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Rule {
    InvalidPlane,
    DegenerateFootprint,
    DuplicateId,
    LevelUnavailable,
    OutOfBounds,
    Overlap,
    Unsupported,
    MetricMismatch,
    LoadExceeded,
}

/// A single broken invariant of a [`NestingBatch`](crate::entities::NestingBatch).
#[derive(Clone, Debug, PartialEq)]
pub enum Violation {
    /// The autoclave plane has a non-positive (or non-finite) length or width
    InvalidPlane { length: f32, width: f32 },
    /// A placement with a non-positive (or non-finite) dimension or position
    DegeneratePlacement { placement: PlacementRef },
    /// A fixture with a non-positive (or non-finite) dimension or position
    DegenerateFixture { fixture: FixtureRef },
    /// Tool id already used by an earlier placement
    DuplicateToolId {
        placement: PlacementRef,
        first_index: usize,
    },
    /// Fixture id already used by an earlier fixture
    DuplicateFixtureId {
        fixture: FixtureRef,
        first_index: usize,
    },
    /// Placement on the elevated plane of an autoclave that does not use one
    LevelUnavailable { placement: PlacementRef },
    /// Footprint of a placement not fully within the plane
    PlacementOutOfBounds { placement: PlacementRef },
    /// Footprint of a fixture not fully within the plane
    FixtureOutOfBounds { fixture: FixtureRef },
    /// Two placements on the same level share a region of positive area
    Overlap {
        level: Level,
        first: PlacementRef,
        second: PlacementRef,
    },
    /// Elevated placement that does not rest on at least two separate, opposing contact regions
    Unsupported {
        placement: PlacementRef,
        contact_regions: usize,
    },
    /// A summary metric of the batch differs from the one derived from its contents
    MetricMismatch {
        metric: Metric,
        reported: f64,
        computed: f64,
    },
    /// Combined weight of the tools exceeds the load limit of the autoclave
    LoadExceeded { total_weight: f32, limit: f32 },
}

impl Violation {
    pub fn rule(&self) -> Rule {
        match self {
            Violation::InvalidPlane { .. } => Rule::InvalidPlane,
            Violation::DegeneratePlacement { .. } | Violation::DegenerateFixture { .. } => {
                Rule::DegenerateFootprint
            }
            Violation::DuplicateToolId { .. } | Violation::DuplicateFixtureId { .. } => {
                Rule::DuplicateId
            }
            Violation::LevelUnavailable { .. } => Rule::LevelUnavailable,
            Violation::PlacementOutOfBounds { .. } | Violation::FixtureOutOfBounds { .. } => {
                Rule::OutOfBounds
            }
            Violation::Overlap { .. } => Rule::Overlap,
            Violation::Unsupported { .. } => Rule::Unsupported,
            Violation::MetricMismatch { .. } => Rule::MetricMismatch,
            Violation::LoadExceeded { .. } => Rule::LoadExceeded,
        }
    }

    /// All placements named by this violation
    pub fn placements(&self) -> Vec<PlacementRef> {
        match self {
            Violation::DegeneratePlacement { placement }
            | Violation::DuplicateToolId { placement, .. }
            | Violation::LevelUnavailable { placement }
            | Violation::PlacementOutOfBounds { placement }
            | Violation::Unsupported { placement, .. } => vec![*placement],
            Violation::Overlap { first, second, .. } => vec![*first, *second],
            _ => vec![],
        }
    }

    /// All fixtures named by this violation
    pub fn fixtures(&self) -> Vec<FixtureRef> {
        match self {
            Violation::DegenerateFixture { fixture }
            | Violation::DuplicateFixtureId { fixture, .. }
            | Violation::FixtureOutOfBounds { fixture } => vec![*fixture],
            _ => vec![],
        }
    }

    pub fn names_tool(&self, tool_id: u64) -> bool {
        self.placements().iter().any(|p| p.tool_id == tool_id)
    }

    pub fn names_fixture(&self, fixture_id: u64) -> bool {
        self.fixtures().iter().any(|f| f.fixture_id == fixture_id)
    }
}

impl Display for PlacementRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "tool {} (#{})", self.tool_id, self.index)
    }
}

impl Display for FixtureRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "fixture {} (#{})", self.fixture_id, self.index)
    }
}

impl Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Violation::InvalidPlane { length, width } => {
                write!(f, "invalid plane: length {length}, width {width}")
            }
            Violation::DegeneratePlacement { placement } => {
                write!(f, "{placement}: degenerate footprint")
            }
            Violation::DegenerateFixture { fixture } => {
                write!(f, "{fixture}: degenerate footprint")
            }
            Violation::DuplicateToolId {
                placement,
                first_index,
            } => write!(f, "{placement}: tool id already placed at #{first_index}"),
            Violation::DuplicateFixtureId {
                fixture,
                first_index,
            } => write!(f, "{fixture}: fixture id already used at #{first_index}"),
            Violation::LevelUnavailable { placement } => {
                write!(f, "{placement}: elevated plane not in use")
            }
            Violation::PlacementOutOfBounds { placement } => {
                write!(f, "{placement}: footprint exceeds plane bounds")
            }
            Violation::FixtureOutOfBounds { fixture } => {
                write!(f, "{fixture}: footprint exceeds plane bounds")
            }
            Violation::Overlap {
                level,
                first,
                second,
            } => write!(f, "{first} overlaps {second} on level {level}"),
            Violation::Unsupported {
                placement,
                contact_regions,
            } => write!(
                f,
                "{placement}: unsupported, {contact_regions} contact region(s) on fixtures"
            ),
            Violation::MetricMismatch {
                metric,
                reported,
                computed,
            } => write!(f, "{metric:?} mismatch: reported {reported}, computed {computed}"),
            Violation::LoadExceeded {
                total_weight,
                limit,
            } => write!(f, "load {total_weight} exceeds limit {limit}"),
        }
    }
}
