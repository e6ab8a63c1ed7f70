use chart_drawings::annotation::{AnnotationId, AnnotationKind, Appearance, Geometry};
use chart_drawings::api::{DrawingEngine, DrawingEngineConfig, ToolMode};
use chart_drawings::core::{DataPoint, PixelPoint, Viewport};
use chart_drawings::interaction::{Key, KeyInput, Modifiers, PointerInput};
use chart_drawings::render::{Color, LineStrokeStyle, NullRenderer};

fn engine() -> DrawingEngine<NullRenderer> {
    let config = DrawingEngineConfig::new(Viewport::new(1000, 500), 0.0, 100.0)
        .with_price_domain(0.0, 200.0);
    DrawingEngine::new(NullRenderer::default(), config).expect("engine init")
}

fn pixel(engine: &DrawingEngine<NullRenderer>, bar: f64, price: f64) -> PixelPoint {
    engine
        .mapper()
        .to_pixel(DataPoint::new(bar, price))
        .expect("to pixel")
}

fn draw(engine: &mut DrawingEngine<NullRenderer>, kind: AnnotationKind, points: &[(f64, f64)]) -> AnnotationId {
    engine.set_tool_mode(ToolMode::Draw(kind));
    for (bar, price) in points {
        let at = pixel(engine, *bar, *price);
        let input = PointerInput::new(at.x, at.y);
        engine.pointer_down(input).expect("pointer down");
        engine.pointer_up(input).expect("pointer up");
    }
    engine
        .annotations(kind)
        .last()
        .map(|annotation| annotation.id)
        .expect("drawn annotation")
}

fn click(engine: &mut DrawingEngine<NullRenderer>, at: PixelPoint, modifiers: Modifiers) {
    let input = PointerInput::new(at.x, at.y).with_modifiers(modifiers);
    engine.pointer_down(input).expect("pointer down");
    engine.pointer_up(input).expect("pointer up");
}

#[test]
fn click_selects_and_click_on_empty_space_clears() {
    let mut engine = engine();
    let id = draw(&mut engine, AnnotationKind::Line, &[(10.0, 100.0), (30.0, 100.0)]);

    let at = pixel(&engine, 20.0, 100.0);
    click(&mut engine, at, Modifiers::NONE);
    assert_eq!(engine.selected_ids(), vec![id]);

    click(&mut engine, PixelPoint::new(900.0, 30.0), Modifiers::NONE);
    assert!(engine.selected_ids().is_empty());
}

#[test]
fn shift_click_extends_selection() {
    let mut engine = engine();
    let first = draw(&mut engine, AnnotationKind::Line, &[(10.0, 100.0), (30.0, 100.0)]);
    let second = draw(&mut engine, AnnotationKind::VerticalLine, &[(60.0, 20.0)]);

    let at = pixel(&engine, 20.0, 100.0);
    click(&mut engine, at, Modifiers::NONE);
    let at = pixel(&engine, 60.0, 150.0);
    click(&mut engine, at, Modifiers::NONE.with_shift());
    let mut selected = engine.selected_ids();
    selected.sort();
    assert_eq!(selected, vec![first, second]);

    let at = pixel(&engine, 60.0, 150.0);
    click(&mut engine, at, Modifiers::NONE);
    assert_eq!(engine.selected_ids(), vec![first]);
}

#[test]
fn plain_click_replaces_selection() {
    let mut engine = engine();
    let first = draw(&mut engine, AnnotationKind::Line, &[(10.0, 100.0), (30.0, 100.0)]);
    let second = draw(&mut engine, AnnotationKind::VerticalLine, &[(60.0, 20.0)]);
    assert!(engine.select(first, false));

    let at = pixel(&engine, 60.0, 150.0);
    click(&mut engine, at, Modifiers::NONE);
    assert_eq!(engine.selected_ids(), vec![second]);
}

#[test]
fn delete_removes_selection_across_kinds() {
    let mut engine = engine();
    let line = draw(&mut engine, AnnotationKind::Line, &[(10.0, 100.0), (30.0, 100.0)]);
    let keep = draw(&mut engine, AnnotationKind::HorizontalLine, &[(10.0, 40.0)]);
    let polygon = draw(
        &mut engine,
        AnnotationKind::Polygon,
        &[(50.0, 100.0), (70.0, 100.0), (60.0, 160.0)],
    );
    engine.select(line, false);
    engine.select(polygon, true);

    let deleted = engine
        .key_down(KeyInput::new(Key::Delete))
        .expect("delete");
    assert!(deleted);
    assert_eq!(engine.annotation_count(), 1);
    assert!(engine.annotation(keep).is_some());
    assert!(engine.annotation(line).is_none());
    assert!(engine.annotation(polygon).is_none());
    assert!(engine.selected_ids().is_empty());
}

#[test]
fn repeated_delete_is_safe() {
    let mut engine = engine();
    let id = draw(&mut engine, AnnotationKind::Ray, &[(10.0, 100.0), (30.0, 120.0)]);
    engine.select(id, false);

    let mut removed = Vec::new();
    for _ in 0..5 {
        removed.push(engine.delete_selected());
    }
    assert_eq!(removed, vec![1, 0, 0, 0, 0]);
    assert_eq!(engine.undo_depth(), 2);
}

#[test]
fn delete_key_on_empty_engine_is_ignored() {
    let mut engine = engine();
    let before = engine.export_annotations();

    for _ in 0..5 {
        assert!(!engine.key_down(KeyInput::new(Key::Delete)).expect("delete key"));
    }
    assert_eq!(engine.export_annotations(), before);
    assert_eq!(engine.undo_depth(), 0);
}

#[test]
fn delete_key_without_selection_leaves_collections_unchanged() {
    let mut engine = engine();
    draw(&mut engine, AnnotationKind::Line, &[(10.0, 100.0), (20.0, 150.0)]);
    draw(&mut engine, AnnotationKind::HorizontalLine, &[(40.0, 80.0)]);
    engine.clear_selection();
    assert!(engine.selected_ids().is_empty());
    let before = engine.export_annotations();
    let depth = engine.undo_depth();

    for _ in 0..5 {
        assert!(!engine.key_down(KeyInput::new(Key::Delete)).expect("delete key"));
    }
    assert_eq!(engine.export_annotations(), before);
    assert_eq!(engine.annotation_count(), 2);
    assert_eq!(engine.undo_depth(), depth);
}

#[test]
fn backspace_deletes_but_modified_backspace_does_not() {
    let mut engine = engine();
    let id = draw(&mut engine, AnnotationKind::Line, &[(10.0, 100.0), (30.0, 100.0)]);
    engine.select(id, false);

    let modified = KeyInput::new(Key::Backspace).with_modifiers(Modifiers::NONE.with_ctrl());
    assert!(!engine.key_down(modified).expect("ctrl+backspace"));
    assert_eq!(engine.annotation_count(), 1);

    assert!(engine.key_down(KeyInput::new(Key::Backspace)).expect("backspace"));
    assert_eq!(engine.annotation_count(), 0);
}

#[test]
fn escape_clears_selection_in_cursor_mode() {
    let mut engine = engine();
    let id = draw(&mut engine, AnnotationKind::Line, &[(10.0, 100.0), (30.0, 100.0)]);
    engine.select(id, false);

    assert!(engine.key_down(KeyInput::new(Key::Escape)).expect("escape"));
    assert!(engine.selected_ids().is_empty());
    assert!(!engine.key_down(KeyInput::new(Key::Escape)).expect("escape"));
}

#[test]
fn selected_appearance_edit_is_undoable() {
    let mut engine = engine();
    let line = draw(&mut engine, AnnotationKind::Line, &[(10.0, 100.0), (30.0, 100.0)]);
    let other = draw(&mut engine, AnnotationKind::Line, &[(10.0, 50.0), (30.0, 50.0)]);
    let original = engine.annotation(line).expect("line").appearance;
    engine.select(line, false);

    let styled = Appearance {
        stroke: Color::rgb(1.0, 0.0, 0.0),
        stroke_width: 3.0,
        stroke_style: LineStrokeStyle::Dotted,
        ..Appearance::default()
    };
    assert_eq!(engine.set_selected_appearance(styled).expect("appearance"), 1);
    assert_eq!(engine.annotation(line).expect("line").appearance, styled);
    assert_eq!(engine.annotation(other).expect("other").appearance, original);

    assert!(engine.undo());
    assert_eq!(engine.annotation(line).expect("line").appearance, original);

    let invalid = Appearance {
        opacity: 1.5,
        ..Appearance::default()
    };
    assert!(engine.set_selected_appearance(invalid).is_err());
}

#[test]
fn label_text_edit_is_undoable() {
    let mut engine = engine();
    let label = draw(&mut engine, AnnotationKind::Label, &[(40.0, 90.0)]);
    let line = draw(&mut engine, AnnotationKind::Line, &[(10.0, 100.0), (30.0, 100.0)]);

    assert!(engine.set_label_text(label, "Breakout").expect("set text"));
    let Geometry::Label { text, .. } = &engine.annotation(label).expect("label").geometry else {
        panic!("expected label");
    };
    assert_eq!(text, "Breakout");
    assert!(!engine.set_label_text(label, "Breakout").expect("same text"));
    assert!(engine.set_label_text(line, "nope").is_err());
    assert!(!engine.set_label_text(AnnotationId(999), "missing").expect("unknown id"));

    assert!(engine.undo());
    let Geometry::Label { text, .. } = &engine.annotation(label).expect("label").geometry else {
        panic!("expected label");
    };
    assert_eq!(text, "Text");
}

#[test]
fn deleting_a_label_drops_its_pending_edit() {
    let mut engine = engine();
    let label = draw(&mut engine, AnnotationKind::Label, &[(40.0, 90.0)]);
    engine.select(label, false);
    assert_eq!(engine.delete_selected(), 1);
    assert_eq!(engine.take_pending_label_edit(), None);
}
