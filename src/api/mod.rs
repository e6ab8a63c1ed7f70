//! Engine facade and its controllers.
//!
//! `DrawingEngine` is split across several `impl` blocks, one per concern:
//! tool mode, pointer/keyboard routing, selection, annotation editing,
//! history, replay, view window, rendering and snapshots.

mod annotation_controller;
mod engine;
mod engine_config;
mod engine_init;
mod engine_snapshot;
mod history_controller;
mod json_contract;
mod observer;
mod observer_registry;
mod pointer_coordinator;
mod render_frame_builder;
mod replay_controller;
mod selection_controller;
mod snapshot_controller;
mod tool_mode_controller;
mod view_controller;

pub use engine::DrawingEngine;
pub use engine_config::{DrawingEngineConfig, LabelConfig, PriceScaleMargins};
pub use engine_snapshot::EngineSnapshot;
pub use json_contract::{
    ANNOTATIONS_JSON_SCHEMA_V1, AnnotationsJsonContractV1, ENGINE_SNAPSHOT_JSON_SCHEMA_V1,
    EngineSnapshotJsonContractV1,
};
pub use observer::{AnnotationObserver, DrawingEvent, HistoryDirection};
pub use replay_controller::ReplayStatus;
use replay_controller::ReplaySession;
pub use tool_mode_controller::ToolMode;
