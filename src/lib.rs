//! chart-drawings: headless drawing-tools core for financial charts.
//!
//! Turns pointer and keyboard events into trendlines, channels, Fibonacci
//! retracements, patterns and labels stored in data coordinates, with
//! hit-testing, drag editing, undo/redo and a bar replay mode. Rendering is
//! delegated to a backend-agnostic [`render::Renderer`].

pub mod annotation;
pub mod api;
pub mod core;
pub mod error;
pub mod interaction;
pub mod render;
pub mod telemetry;

pub use api::{DrawingEngine, DrawingEngineConfig};
pub use error::{DrawingError, DrawingResult};
