//! Annotation records, collections and undo history.

pub mod history;
pub mod model;
pub mod projection;
pub mod retracement;
pub mod store;

pub use history::HistoryManager;
pub use model::{Annotation, AnnotationId, AnnotationKind, Appearance, Geometry, LabelMetrics};
pub use projection::{ProjectedLevel, ProjectedShape};
pub use retracement::{DEFAULT_RETRACEMENT_RATIOS, RetracementLevel, RetracementLevels};
pub use store::{AnnotationRef, AnnotationSnapshot, AnnotationStore};
