use crate::geometry::geo_traits::CollidesWith;
use crate::geometry::primitives::Rect;
use itertools::Itertools;

/// How an elevated footprint rests on the support fixtures beneath it.
#[derive(Clone, Debug, PartialEq)]
pub struct SupportAssessment {
    /// Bounding boxes of the disjoint contact regions between the footprint and the fixtures
    pub contact_regions: Vec<Rect>,
    /// True if the contact regions together span the centroid of the footprint
    pub balanced: bool,
}

impl SupportAssessment {
    /// A tool is stable when it rests on at least two separate contact regions on opposite sides of its centroid.
    pub fn is_stable(&self) -> bool {
        self.contact_regions.len() >= 2 && self.balanced
    }
}

/// Determines the contact regions between `footprint` and `fixtures`.
///
/// Every fixture sharing a region of positive area with the footprint is clipped to it.
/// Clipped regions that overlap or touch form a single connected contact region.
pub fn assess_support(footprint: Rect, fixtures: impl IntoIterator<Item = Rect>) -> SupportAssessment {
    let contacts = fixtures
        .into_iter()
        .filter_map(|f| Rect::intersection(footprint, f))
        .collect_vec();

    let contact_regions = connected_regions(&contacts);

    let balanced = contact_regions
        .iter()
        .copied()
        .reduce(Rect::bounding_rect)
        .is_some_and(|span| span.collides_with(&footprint.centroid()));

    SupportAssessment {
        contact_regions,
        balanced,
    }
}

/// Groups rectangles into connected components (touching counts as connected) and returns the bounding box of each.
fn connected_regions(rects: &[Rect]) -> Vec<Rect> {
    let mut component = vec![usize::MAX; rects.len()];
    let mut regions: Vec<Rect> = vec![];

    for start in 0..rects.len() {
        if component[start] != usize::MAX {
            continue;
        }
        let c_idx = regions.len();
        let mut bbox = rects[start];
        let mut stack = vec![start];
        component[start] = c_idx;
        while let Some(i) = stack.pop() {
            bbox = Rect::bounding_rect(bbox, rects[i]);
            for j in 0..rects.len() {
                if component[j] == usize::MAX && rects[i].collides_with(&rects[j]) {
                    component[j] = c_idx;
                    stack.push(j);
                }
            }
        }
        regions.push(bbox);
    }
    regions
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tool() -> Rect {
        Rect::from_corner(10.0, 10.0, 30.0, 10.0)
    }

    #[test]
    fn fixtures_at_opposite_ends_are_stable() {
        let s = assess_support(
            tool(),
            [
                Rect::from_corner(10.0, 10.0, 5.0, 10.0),
                Rect::from_corner(35.0, 10.0, 5.0, 10.0),
            ],
        );
        assert_eq!(s.contact_regions.len(), 2);
        assert!(s.is_stable());
    }

    #[test]
    fn single_fixture_is_unstable() {
        let s = assess_support(tool(), [Rect::from_corner(10.0, 10.0, 5.0, 10.0)]);
        assert_eq!(s.contact_regions.len(), 1);
        assert!(!s.is_stable());
    }

    #[test]
    fn touching_fixtures_form_one_region() {
        let s = assess_support(
            tool(),
            [
                Rect::from_corner(10.0, 10.0, 5.0, 10.0),
                Rect::from_corner(15.0, 10.0, 5.0, 10.0),
            ],
        );
        assert_eq!(s.contact_regions.len(), 1);
        assert!(!s.is_stable());
    }

    #[test]
    fn two_regions_on_the_same_side_are_unbalanced() {
        let s = assess_support(
            tool(),
            [
                Rect::from_corner(10.0, 10.0, 3.0, 10.0),
                Rect::from_corner(16.0, 10.0, 3.0, 10.0),
            ],
        );
        assert_eq!(s.contact_regions.len(), 2);
        assert!(!s.balanced);
        assert!(!s.is_stable());
    }

    #[test]
    fn fixtures_only_touching_the_footprint_do_not_count() {
        let s = assess_support(
            tool(),
            [
                Rect::from_corner(0.0, 10.0, 10.0, 10.0),
                Rect::from_corner(40.0, 10.0, 5.0, 10.0),
            ],
        );
        assert!(s.contact_regions.is_empty());
        assert!(!s.is_stable());
    }

    #[test]
    fn front_and_back_fixtures_are_stable() {
        let s = assess_support(
            tool(),
            [
                Rect::from_corner(5.0, 8.0, 40.0, 4.0),
                Rect::from_corner(5.0, 18.0, 40.0, 4.0),
            ],
        );
        assert_eq!(s.contact_regions.len(), 2);
        assert!(s.is_stable());
    }
}
