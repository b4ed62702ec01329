//! Terminal output helpers

pub mod display;

pub use display::{CatalogRow, Color, ColorOutput, FrameFormatter, TerminalSink};
