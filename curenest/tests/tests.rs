#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use curenest::entities::{
        Autoclave, BatchMetrics, BatchStatus, Level, NestingBatch, SupportFixture, ToolPlacement,
    };
    use curenest::geometry::primitives::Point;
    use curenest::io::export::export_batch;
    use curenest::io::ext_repr::ExtNestingBatch;
    use curenest::io::import::import_batch;
    use curenest::validation::{Metric, Rule, Violation, validate};
    use curenest::view::LayoutView;
    use test_case::test_case;

    fn init_logger() {
        let _ = env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .is_test(true)
            .try_init();
    }

    fn autoclave(uses_secondary_plane: bool) -> Autoclave {
        Autoclave {
            id: Some(1),
            name: Some("AC-01".to_string()),
            length: 100.0,
            width: 50.0,
            max_temperature: Some(180.0),
            max_pressure: Some(7.0),
            max_load_weight: None,
            uses_secondary_plane,
            vacuum_lines: None,
        }
    }

    fn tool(tool_id: u64, level: Level, (x, y, width, height): (f32, f32, f32, f32)) -> ToolPlacement {
        ToolPlacement {
            tool_id,
            work_order_id: 1000 + tool_id,
            part_number: Some(format!("PN-{tool_id}")),
            level,
            x,
            y,
            width,
            height,
            rotated: false,
            valve_count: 1,
            weight: None,
        }
    }

    fn fixture(id: u64, (x, y, width, height): (f32, f32, f32, f32)) -> SupportFixture {
        SupportFixture {
            id,
            level: None,
            x,
            y,
            width,
            height,
            tool_id: None,
        }
    }

    /// Batch with metrics consistent with its contents
    fn batch(
        autoclave: Autoclave,
        placements: Vec<ToolPlacement>,
        fixtures: Vec<SupportFixture>,
    ) -> NestingBatch {
        let metrics = BatchMetrics::compute(&autoclave, &placements);
        NestingBatch {
            batch_id: "B-1".to_string(),
            autoclave,
            placements,
            fixtures,
            metrics,
            status: BatchStatus::Draft,
        }
    }

    fn rules(batch: &NestingBatch) -> Vec<Rule> {
        validate(batch).violations().iter().map(|v| v.rule()).collect()
    }

    #[test]
    fn two_disjoint_base_placements_are_valid() {
        let b = batch(
            autoclave(true),
            vec![
                tool(1, Level::Base, (0.0, 0.0, 20.0, 20.0)),
                tool(2, Level::Base, (30.0, 0.0, 20.0, 20.0)),
            ],
            vec![],
        );
        assert!(validate(&b).is_valid());
    }

    #[test]
    fn overlapping_third_placement_names_both_ids() {
        let b = batch(
            autoclave(true),
            vec![
                tool(1, Level::Base, (0.0, 0.0, 20.0, 20.0)),
                tool(2, Level::Base, (30.0, 0.0, 20.0, 20.0)),
                tool(3, Level::Base, (10.0, 10.0, 20.0, 20.0)),
            ],
            vec![],
        );
        let result = validate(&b);
        assert!(!result.is_valid());
        let overlap = result
            .violations()
            .iter()
            .find(|v| v.rule() == Rule::Overlap && v.names_tool(1))
            .expect("overlap between tool 1 and 3 should be reported");
        assert!(overlap.names_tool(3));
        assert!(!overlap.names_tool(2));
        assert_eq!(rules(&b), vec![Rule::Overlap]);
    }

    #[test]
    fn touching_edges_are_allowed() {
        let b = batch(
            autoclave(false),
            vec![
                tool(1, Level::Base, (0.0, 0.0, 20.0, 20.0)),
                tool(2, Level::Base, (20.0, 0.0, 20.0, 20.0)),
                tool(3, Level::Base, (0.0, 20.0, 40.0, 30.0)),
            ],
            vec![],
        );
        assert!(validate(&b).is_valid());
    }

    #[test]
    fn placements_on_different_levels_may_overlap() {
        let b = batch(
            autoclave(true),
            vec![
                tool(1, Level::Base, (10.0, 10.0, 30.0, 10.0)),
                tool(2, Level::Elevated, (10.0, 10.0, 30.0, 10.0)),
            ],
            vec![
                fixture(1, (10.0, 10.0, 5.0, 10.0)),
                fixture(2, (35.0, 10.0, 5.0, 10.0)),
            ],
        );
        assert!(validate(&b).is_valid());
    }

    #[test_case((90.0, 0.0, 20.0, 20.0); "past length")]
    #[test_case((0.0, 40.0, 20.0, 20.0); "past width")]
    #[test_case((-1.0, 0.0, 20.0, 20.0); "negative x")]
    #[test_case((0.0, -0.5, 20.0, 20.0); "negative y")]
    fn partially_outside_placement_is_named(footprint: (f32, f32, f32, f32)) {
        let b = batch(
            autoclave(false),
            vec![
                tool(1, Level::Base, (50.0, 20.0, 10.0, 10.0)),
                tool(7, Level::Base, footprint),
            ],
            vec![],
        );
        let result = validate(&b);
        let violations = result.violations();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].rule(), Rule::OutOfBounds);
        assert!(violations[0].names_tool(7));
    }

    #[test]
    fn rotated_footprint_is_used_for_bounds() {
        let mut t = tool(1, Level::Base, (0.0, 0.0, 60.0, 10.0));
        t.rotated = true;
        let b = batch(autoclave(false), vec![t], vec![]);
        // 10 x 60 after rotation does not fit a plane that is 50 wide
        assert_eq!(rules(&b), vec![Rule::OutOfBounds]);
    }

    #[test]
    fn elevated_placement_on_two_opposite_fixtures_is_valid() {
        let b = batch(
            autoclave(true),
            vec![tool(1, Level::Elevated, (10.0, 10.0, 30.0, 10.0))],
            vec![
                fixture(1, (10.0, 10.0, 5.0, 10.0)),
                fixture(2, (35.0, 10.0, 5.0, 10.0)),
            ],
        );
        assert!(validate(&b).is_valid());
    }

    #[test]
    fn elevated_placement_on_a_single_fixture_is_unsupported() {
        let b = batch(
            autoclave(true),
            vec![tool(1, Level::Elevated, (10.0, 10.0, 30.0, 10.0))],
            vec![fixture(1, (10.0, 10.0, 5.0, 10.0))],
        );
        let result = validate(&b);
        assert_eq!(
            result.violations(),
            &[Violation::Unsupported {
                placement: curenest::validation::PlacementRef {
                    index: 0,
                    tool_id: 1
                },
                contact_regions: 1,
            }]
        );
    }

    #[test]
    fn elevated_placement_without_fixtures_is_unsupported() {
        let b = batch(
            autoclave(true),
            vec![tool(4, Level::Elevated, (10.0, 10.0, 30.0, 10.0))],
            vec![fixture(1, (60.0, 10.0, 5.0, 10.0))],
        );
        let result = validate(&b);
        assert_eq!(rules(&b), vec![Rule::Unsupported]);
        assert!(result.violations()[0].names_tool(4));
    }

    #[test_case(fixture(2, (35.0, 40.0, 5.0, 30.0)), Rule::OutOfBounds; "fixture outside the plane")]
    #[test_case(fixture(1, (35.0, 40.0, 5.0, 10.0)), Rule::DuplicateId; "fixture with a repeated id")]
    fn rejected_fixture_does_not_carry_load(second: SupportFixture, fixture_rule: Rule) {
        init_logger();
        let b = batch(
            autoclave(true),
            vec![tool(1, Level::Elevated, (10.0, 40.0, 30.0, 10.0))],
            vec![fixture(1, (10.0, 40.0, 5.0, 10.0)), second],
        );
        assert_eq!(rules(&b), vec![fixture_rule, Rule::Unsupported]);

        let view = LayoutView::new(Arc::new(b));
        assert_eq!(view.renderable_placements(Level::Elevated).count(), 0);
        assert_eq!(
            view.renderable_fixtures().map(|f| f.x).collect::<Vec<_>>(),
            vec![10.0]
        );
    }

    #[test]
    fn elevated_placement_needs_a_secondary_plane() {
        let b = batch(
            autoclave(false),
            vec![tool(1, Level::Elevated, (10.0, 10.0, 30.0, 10.0))],
            vec![
                fixture(1, (10.0, 10.0, 5.0, 10.0)),
                fixture(2, (35.0, 10.0, 5.0, 10.0)),
            ],
        );
        assert_eq!(rules(&b), vec![Rule::LevelUnavailable]);
    }

    #[test]
    fn all_violations_are_collected_in_check_order() {
        init_logger();
        let mut b = batch(
            autoclave(true),
            vec![
                tool(1, Level::Base, (90.0, 0.0, 20.0, 20.0)),
                tool(2, Level::Base, (0.0, 0.0, 20.0, 20.0)),
                tool(3, Level::Base, (10.0, 10.0, 20.0, 20.0)),
                tool(4, Level::Elevated, (10.0, 10.0, 30.0, 10.0)),
            ],
            vec![fixture(9, (95.0, 45.0, 10.0, 10.0))],
        );
        b.metrics.utilized_valve_count += 1;

        assert_eq!(
            rules(&b),
            vec![
                Rule::OutOfBounds,
                Rule::OutOfBounds,
                Rule::Overlap,
                Rule::Unsupported,
                Rule::MetricMismatch,
            ]
        );
        let violations = validate(&b);
        assert!(violations.violations()[1].names_fixture(9));
    }

    #[test]
    fn validation_does_not_touch_the_batch() {
        let b = batch(
            autoclave(true),
            vec![tool(1, Level::Elevated, (10.0, 10.0, 30.0, 10.0))],
            vec![],
        );
        let before = b.clone();
        let _ = validate(&b);
        assert_eq!(b, before);
    }

    #[test_case(Metric::UtilizedArea; "utilized area")]
    #[test_case(Metric::TotalArea; "total area")]
    #[test_case(Metric::UtilizedValveCount; "utilized valves")]
    #[test_case(Metric::TotalValveCount; "total valves")]
    fn metric_mismatch_is_reported_not_corrected(metric: Metric) {
        let mut ac = autoclave(true);
        ac.vacuum_lines = Some(12);
        let mut b = batch(
            ac,
            vec![tool(1, Level::Base, (0.0, 0.0, 20.0, 20.0))],
            vec![],
        );
        assert!(validate(&b).is_valid());
        assert_eq!(b.metrics.total_area, 10_000.0);

        match metric {
            Metric::UtilizedArea => b.metrics.utilized_area = 399.0,
            Metric::TotalArea => b.metrics.total_area = 5_000.0,
            Metric::UtilizedValveCount => b.metrics.utilized_valve_count = 0,
            Metric::TotalValveCount => b.metrics.total_valve_count = 10,
        }
        let snapshot = b.metrics;
        let result = validate(&b);
        match result.violations() {
            [Violation::MetricMismatch { metric: m, .. }] => assert_eq!(*m, metric),
            other => panic!("unexpected violations: {other:?}"),
        }
        assert_eq!(b.metrics, snapshot);
    }

    #[test]
    fn load_limit_is_enforced_when_weights_are_known() {
        let mut ac = autoclave(false);
        ac.max_load_weight = Some(100.0);
        let mut t1 = tool(1, Level::Base, (0.0, 0.0, 20.0, 20.0));
        let mut t2 = tool(2, Level::Base, (30.0, 0.0, 20.0, 20.0));
        t1.weight = Some(60.0);
        t2.weight = Some(50.0);
        assert_eq!(rules(&batch(ac.clone(), vec![t1.clone(), t2.clone()], vec![])), vec![Rule::LoadExceeded]);

        t2.weight = None;
        assert!(validate(&batch(ac, vec![t1, t2], vec![])).is_valid());
    }

    #[test]
    fn duplicate_and_degenerate_entries_are_reported() {
        let b = batch(
            autoclave(false),
            vec![
                tool(1, Level::Base, (0.0, 0.0, 20.0, 20.0)),
                tool(1, Level::Base, (30.0, 0.0, 20.0, 20.0)),
                tool(2, Level::Base, (60.0, 0.0, 0.0, 20.0)),
            ],
            vec![],
        );
        assert_eq!(
            rules(&b),
            vec![Rule::DuplicateId, Rule::DegenerateFootprint]
        );
    }

    #[test]
    fn invalid_plane_is_reported_and_nothing_renders() {
        let mut ac = autoclave(false);
        ac.width = 0.0;
        let b = batch(ac, vec![tool(1, Level::Base, (0.0, 0.0, 20.0, 20.0))], vec![]);
        assert_eq!(rules(&b), vec![Rule::InvalidPlane]);

        let view = LayoutView::new(Arc::new(b));
        assert_eq!(view.renderable_placements(Level::Base).count(), 0);
        assert!(view.hit_test(Point(5.0, 5.0)).is_none());
    }

    #[test]
    fn view_renders_only_the_valid_subset() {
        init_logger();
        let b = batch(
            autoclave(true),
            vec![
                tool(1, Level::Base, (0.0, 0.0, 20.0, 20.0)),
                tool(2, Level::Base, (30.0, 0.0, 20.0, 20.0)),
                tool(3, Level::Base, (10.0, 10.0, 20.0, 20.0)),
                tool(4, Level::Elevated, (60.0, 10.0, 30.0, 10.0)),
            ],
            vec![fixture(1, (60.0, 10.0, 5.0, 10.0))],
        );
        let view = LayoutView::new(Arc::new(b));

        assert_eq!(view.violations().len(), 2);
        let base: Vec<u64> = view
            .renderable_placements(Level::Base)
            .map(|p| p.tool_id)
            .collect();
        assert_eq!(base, vec![2]);
        assert_eq!(view.renderable_placements(Level::Elevated).count(), 0);
        let rejected: Vec<u64> = view.rejected_placements().map(|p| p.tool_id).collect();
        assert_eq!(rejected, vec![1, 3, 4]);
        assert_eq!(view.renderable_fixtures().count(), 1);

        assert!(view.hit_test(Point(5.0, 5.0)).is_none());
        assert_eq!(view.hit_test(Point(40.0, 10.0)).map(|p| p.tool_id), Some(2));
    }

    #[test]
    fn hit_testing_uses_the_rotated_footprint() {
        let mut t = tool(1, Level::Base, (0.0, 0.0, 10.0, 4.0));
        t.rotated = true;
        let view = LayoutView::new(Arc::new(batch(autoclave(false), vec![t], vec![])));

        assert_eq!(view.hit_test(Point(2.0, 8.0)).map(|p| p.tool_id), Some(1));
        assert!(view.hit_test(Point(8.0, 2.0)).is_none());
    }

    fn stacked_batch() -> NestingBatch {
        batch(
            autoclave(true),
            vec![
                tool(1, Level::Base, (10.0, 10.0, 30.0, 10.0)),
                tool(2, Level::Elevated, (10.0, 10.0, 30.0, 10.0)),
            ],
            vec![
                fixture(1, (10.0, 10.0, 5.0, 10.0)),
                fixture(2, (35.0, 10.0, 5.0, 10.0)),
            ],
        )
    }

    #[test]
    fn hit_testing_prefers_the_elevated_plane_and_respects_visibility() {
        let mut view = LayoutView::new(Arc::new(stacked_batch()));
        let point = Point(20.0, 15.0);
        assert_eq!(view.hit_test(point).map(|p| p.tool_id), Some(2));

        assert!(!view.toggle_level(Level::Elevated));
        assert_eq!(view.hit_test(point).map(|p| p.tool_id), Some(1));
        assert_eq!(view.visible_placements(Level::Elevated).count(), 0);

        view.set_level_visible(Level::Base, false);
        assert!(view.hit_test(point).is_none());
    }

    #[test]
    fn selection_is_view_state_only() {
        let batch = Arc::new(stacked_batch());
        let mut view = LayoutView::new(batch.clone());

        assert_eq!(
            view.select_at(Point(20.0, 15.0)).map(|p| p.tool_id),
            Some(2)
        );
        assert!(view.select(1));
        assert_eq!(view.selected().map(|p| p.tool_id), Some(1));
        assert!(!view.select(42));
        assert_eq!(view.selected().map(|p| p.tool_id), Some(1));

        view.set_level_visible(Level::Base, false);
        assert!(view.selected().is_none());
        assert!(!view.select(1));

        view.clear_selection();
        assert_eq!(*batch, stacked_batch());
    }

    #[test]
    fn replacing_the_batch_rebuilds_only_for_a_new_reference() {
        let first = Arc::new(stacked_batch());
        let mut view = LayoutView::new(first.clone());
        view.set_level_visible(Level::Elevated, false);
        assert!(view.select(1));

        assert!(!view.replace_batch(first.clone()));
        assert_eq!(view.selected().map(|p| p.tool_id), Some(1));

        let second = Arc::new(batch(
            autoclave(false),
            vec![tool(5, Level::Base, (50.0, 0.0, 20.0, 20.0))],
            vec![],
        ));
        assert!(view.replace_batch(second));
        assert!(view.selected().is_none());
        assert!(!view.is_level_visible(Level::Elevated));
        assert!(view.hit_test(Point(20.0, 15.0)).is_none());
        assert_eq!(view.hit_test(Point(60.0, 10.0)).map(|p| p.tool_id), Some(5));
    }

    const WIRE_BATCH: &str = r#"{
        "batch_id": "B-2024-117",
        "autoclave": {"id": 3, "name": "Scholz", "length": 100.0, "width": 50.0, "uses_secondary_plane": true},
        "positioned_tools": [
            {"tool_id": 11, "odl_id": 501, "part_number": "8A-2231", "level": 0, "x": 0.0, "y": 0.0, "width": 20.0, "height": 20.0, "rotated": false, "valve_count": 2},
            {"tool_id": 12, "odl_id": 502, "level": 1, "x": 10.0, "y": 10.0, "width": 10.0, "height": 30.0, "rotated": true, "valve_count": 1}
        ],
        "cavalletti": [
            {"id": 1, "level": 0, "x": 10.0, "y": 10.0, "width": 5.0, "height": 10.0},
            {"id": 2, "x": 35.0, "y": 10.0, "width": 5.0, "height": 10.0}
        ],
        "utilized_area": 700.0,
        "total_area": 10000.0,
        "utilized_valve_count": 3,
        "total_valve_count": 0,
        "status": "DRAFT"
    }"#;

    #[test]
    fn wire_batch_is_imported_and_rendered() {
        init_logger();
        let ext: ExtNestingBatch = serde_json::from_str(WIRE_BATCH).unwrap();
        let view = LayoutView::from_ext(&ext).unwrap();
        assert!(view.validation().is_valid(), "{:?}", view.violations());
        assert_eq!(view.batch().status, BatchStatus::Draft);
        assert_eq!(view.hit_test(Point(12.0, 12.0)).map(|p| p.tool_id), Some(12));

        let exported = export_batch(&import_batch(&ext).unwrap());
        assert_eq!(exported.positioned_tools, ext.positioned_tools);
        assert_eq!(exported.cavalletti, ext.cavalletti);
    }

    #[test_case(r#""level": 0, "x": 0.0"#, r#""level": 2, "x": 0.0"#; "unknown tool level")]
    #[test_case(r#""id": 2, "x""#, r#""id": 2, "level": 3, "x""#; "unknown cavalletto level")]
    #[test_case(r#""status": "DRAFT""#, r#""status": "archived""#; "unknown status")]
    fn malformed_payloads_are_rejected_at_the_boundary(from: &str, to: &str) {
        let wire = WIRE_BATCH.replacen(from, to, 1);
        assert_ne!(wire, WIRE_BATCH);
        let rejected = serde_json::from_str::<ExtNestingBatch>(&wire)
            .map_err(anyhow::Error::from)
            .and_then(|ext| LayoutView::from_ext(&ext));
        assert!(rejected.is_err());
    }
}
