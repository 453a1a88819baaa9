// Resume document reconstruction.
// Turns the flat text produced by the generation step into six named
// sections, and lays those sections out for display.

pub mod classifier;
pub mod renderer;
pub mod segmenter;

pub use renderer::{render_document, RenderedDocument};
pub use segmenter::{segment, StructuredDocument};
