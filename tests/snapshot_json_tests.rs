use chart_drawings::annotation::{
    AnnotationId, AnnotationKind, AnnotationSnapshot, AnnotationStore, Appearance, Geometry, RetracementLevels,
};
use chart_drawings::api::{
    ANNOTATIONS_JSON_SCHEMA_V1, DrawingEngine, DrawingEngineConfig, EngineSnapshot, ToolMode,
};
use chart_drawings::core::{DataPoint, PriceScaleMode, Viewport};
use chart_drawings::interaction::InteractionMode;
use chart_drawings::render::NullRenderer;
use smallvec::smallvec;

fn sample_snapshot() -> AnnotationSnapshot {
    let mut store = AnnotationStore::new();
    let geometries = [
        Geometry::Line {
            start: DataPoint::new(10.0, 100.0),
            end: DataPoint::new(20.0, 150.0),
        },
        Geometry::TrendChannel {
            start: DataPoint::new(10.0, 100.0),
            end: DataPoint::new(20.0, 120.0),
            offset: 12.5,
        },
        Geometry::Polygon {
            vertices: smallvec![
                DataPoint::new(10.0, 100.0),
                DataPoint::new(15.0, 130.0),
                DataPoint::new(20.0, 90.0),
            ],
        },
        Geometry::Label {
            anchor: DataPoint::new(42.5, 75.25),
            text: "Support".to_owned(),
        },
    ];
    for geometry in geometries {
        let kind = geometry.kind();
        store
            .insert(geometry, Appearance::default_for(kind))
            .expect("insert");
    }
    store.snapshot()
}

fn engine() -> DrawingEngine<NullRenderer> {
    let config = DrawingEngineConfig::new(Viewport::new(1000, 500), 0.0, 100.0)
        .with_price_domain(0.0, 200.0);
    DrawingEngine::new(NullRenderer::default(), config).expect("engine init")
}

#[test]
fn config_json_fills_defaults() {
    let json = r#"{
        "viewport": { "width": 800, "height": 400 },
        "bar_start": 0.0,
        "bar_end": 50.0,
        "price_min": 10.0,
        "price_max": 20.0
    }"#;
    let config = DrawingEngineConfig::from_json_str(json).expect("parse config");

    assert_eq!(config.viewport, Viewport::new(800, 400));
    assert_eq!(config.hit_tolerance_px, 6.0);
    assert_eq!(config.handle_radius_px, 6.0);
    assert_eq!(config.history_limit, 100);
    assert_eq!(config.label.default_text, "Text");
    assert_eq!(config.retracement_levels, RetracementLevels::default());
    assert_eq!(config.price_scale_mode, PriceScaleMode::default());
    assert!(config.appearances.is_empty());
}

#[test]
fn config_round_trips_through_json() {
    let config = DrawingEngineConfig::new(Viewport::new(640, 360), 5.0, 25.0)
        .with_price_domain(1.0, 1000.0)
        .with_price_scale_mode(PriceScaleMode::Log)
        .with_hit_tolerance_px(8.0)
        .with_history_limit(20)
        .with_appearance(AnnotationKind::Line, Appearance::default_for(AnnotationKind::Polygon));

    let json = config.to_json_pretty().expect("serialize");
    let parsed = DrawingEngineConfig::from_json_str(&json).expect("parse");
    assert_eq!(parsed, config);
}

#[test]
fn invalid_config_is_rejected() {
    let zero_viewport = DrawingEngineConfig::new(Viewport::new(0, 400), 0.0, 10.0);
    assert!(DrawingEngine::new(NullRenderer::default(), zero_viewport).is_err());

    let no_history = DrawingEngineConfig::new(Viewport::new(100, 100), 0.0, 10.0)
        .with_history_limit(0);
    assert!(no_history.validate().is_err());

    let json = r#"{
        "viewport": { "width": 800, "height": 400 },
        "bar_start": 0.0,
        "bar_end": 50.0,
        "price_min": 10.0,
        "price_max": 20.0,
        "retracement_levels": []
    }"#;
    assert!(DrawingEngineConfig::from_json_str(json).is_err());
}

#[test]
fn annotations_contract_round_trips() {
    let snapshot = sample_snapshot();
    let json = snapshot.to_json_contract_v1_pretty().expect("serialize");
    assert!(json.contains("\"schema_version\": 1"));
    assert!(json.contains("\"trend_channel\""));

    let parsed = AnnotationSnapshot::from_json_compat_str(&json).expect("parse contract");
    assert_eq!(parsed, snapshot);
}

#[test]
fn bare_annotation_snapshot_is_accepted() {
    let snapshot = sample_snapshot();
    let bare = serde_json::to_string(&snapshot).expect("serialize bare");
    let parsed = AnnotationSnapshot::from_json_compat_str(&bare).expect("parse bare");
    assert_eq!(parsed, snapshot);
}

#[test]
fn unknown_schema_version_is_rejected() {
    let json = format!(
        r#"{{ "schema_version": {}, "annotations": {{ "collections": {{}} }} }}"#,
        ANNOTATIONS_JSON_SCHEMA_V1 + 1
    );
    assert!(AnnotationSnapshot::from_json_compat_str(&json).is_err());
    assert!(AnnotationSnapshot::from_json_compat_str("not json").is_err());
}

#[test]
fn engine_loads_annotations_json_as_new_baseline() {
    let mut engine = engine();
    let snapshot = sample_snapshot();
    let json = snapshot.to_json_contract_v1_pretty().expect("serialize");

    engine.load_annotations_json(&json).expect("load");
    assert_eq!(engine.annotation_count(), 4);
    assert!(!engine.can_undo());
    assert_eq!(engine.export_annotations(), snapshot);

    let exported = engine
        .annotations_json_contract_v1_pretty()
        .expect("export");
    assert_eq!(
        AnnotationSnapshot::from_json_compat_str(&exported).expect("reparse"),
        snapshot
    );
}

#[test]
fn loading_mismatched_collection_fails() {
    let mut engine = engine();
    let json = sample_snapshot()
        .to_json_contract_v1_pretty()
        .expect("serialize")
        .replacen("\"line\": [", "\"not_a_kind\": [", 1);
    assert!(engine.load_annotations_json(&json).is_err());

    let mut snapshot = sample_snapshot();
    let line = snapshot
        .collections
        .get(&AnnotationKind::Line)
        .and_then(|items| items.first())
        .cloned()
        .expect("line");
    snapshot
        .collections
        .entry(AnnotationKind::Ray)
        .or_default()
        .push(line);
    assert!(engine.load_annotations(snapshot).is_err());
    assert_eq!(engine.annotation_count(), 0);
}

#[test]
fn loading_out_of_range_id_fails_without_panicking() {
    let mut engine = engine();
    let mut snapshot = sample_snapshot();
    snapshot
        .collections
        .get_mut(&AnnotationKind::Line)
        .and_then(|items| items.first_mut())
        .expect("line")
        .id = AnnotationId(u64::MAX);
    let json = snapshot.to_json_contract_v1_pretty().expect("serialize");
    assert!(json.contains("18446744073709551615"));

    assert!(engine.load_annotations_json(&json).is_err());
    assert_eq!(engine.annotation_count(), 0);
}

#[test]
fn engine_snapshot_reflects_state() {
    let mut engine = engine();
    engine
        .load_annotations(sample_snapshot())
        .expect("load");
    engine.set_tool_mode(ToolMode::Draw(AnnotationKind::Retracement));

    let snapshot = engine.snapshot();
    assert_eq!(snapshot.viewport, Viewport::new(1000, 500));
    assert_eq!(snapshot.time_full_range, (0.0, 100.0));
    assert_eq!(snapshot.price_domain, (0.0, 200.0));
    assert_eq!(snapshot.tool_mode, ToolMode::Draw(AnnotationKind::Retracement));
    assert_eq!(snapshot.interaction_mode, InteractionMode::Idle);
    assert_eq!(snapshot.annotations.len(), 4);
    assert!(snapshot.selection.is_empty());
    assert_eq!(snapshot.undo_depth, 0);
    assert_eq!(snapshot.replay, None);

    let json = engine.snapshot_json_contract_v1_pretty().expect("contract");
    let parsed = EngineSnapshot::from_json_compat_str(&json).expect("parse");
    assert_eq!(parsed, snapshot);

    let bare = engine.snapshot_json_pretty().expect("bare");
    assert_eq!(EngineSnapshot::from_json_compat_str(&bare).expect("parse bare"), snapshot);
}
