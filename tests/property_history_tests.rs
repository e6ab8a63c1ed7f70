use chart_drawings::annotation::{AnnotationKind, HistoryManager};
use chart_drawings::api::{DrawingEngine, DrawingEngineConfig, ToolMode};
use chart_drawings::core::{DataPoint, Viewport};
use chart_drawings::interaction::PointerInput;
use chart_drawings::render::NullRenderer;
use proptest::prelude::*;

#[derive(Debug, Clone, Copy)]
enum Op {
    Mutate(u32),
    Undo,
    Redo,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0u32..1_000).prop_map(Op::Mutate),
        Just(Op::Undo),
        Just(Op::Redo),
    ]
}

proptest! {
    #[test]
    fn history_matches_linear_timeline_model(
        ops in proptest::collection::vec(op_strategy(), 0..64),
        limit in 1usize..16
    ) {
        let mut history = HistoryManager::with_limit(limit);
        let mut state: Vec<u32> = Vec::new();
        let mut past: Vec<Vec<u32>> = Vec::new();
        let mut future: Vec<Vec<u32>> = Vec::new();

        for op in ops {
            match op {
                Op::Mutate(value) => {
                    history.record(state.clone());
                    past.push(state.clone());
                    if past.len() > limit {
                        past.remove(0);
                    }
                    future.clear();
                    state.push(value);
                }
                Op::Undo => {
                    let restored = history.undo(state.clone());
                    let expected = past.pop();
                    prop_assert_eq!(restored.clone(), expected.clone());
                    if let Some(previous) = expected {
                        future.push(std::mem::replace(&mut state, previous));
                    }
                }
                Op::Redo => {
                    let restored = history.redo(state.clone());
                    let expected = future.pop();
                    prop_assert_eq!(restored.clone(), expected.clone());
                    if let Some(next) = expected {
                        past.push(std::mem::replace(&mut state, next));
                    }
                }
            }
            prop_assert_eq!(history.undo_depth(), past.len());
            prop_assert_eq!(history.redo_depth(), future.len());
            prop_assert!(history.undo_depth() <= limit);
        }
    }

    #[test]
    fn undo_all_then_redo_all_restores_annotations(
        prices in proptest::collection::vec(1.0f64..199.0, 1..8)
    ) {
        let config = DrawingEngineConfig::new(Viewport::new(1000, 500), 0.0, 100.0)
            .with_price_domain(0.0, 200.0);
        let mut engine = DrawingEngine::new(NullRenderer::default(), config).expect("engine init");

        for (index, price) in prices.iter().enumerate() {
            engine.set_tool_mode(ToolMode::Draw(AnnotationKind::HorizontalRay));
            let pixel = engine
                .mapper()
                .to_pixel(DataPoint::new(index as f64 * 5.0, *price))
                .expect("to pixel");
            let input = PointerInput::new(pixel.x, pixel.y);
            engine.pointer_down(input).expect("pointer down");
            engine.pointer_up(input).expect("pointer up");
        }
        let before = engine.export_annotations();
        prop_assert_eq!(before.len(), prices.len());

        while engine.undo() {}
        prop_assert_eq!(engine.annotation_count(), 0);
        while engine.redo() {}

        prop_assert_eq!(engine.export_annotations(), before);
    }
}
