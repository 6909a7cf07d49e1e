//! Report shape and the renderers that print it.
mod format;
mod render;
mod types;
mod writers;


pub use render::{CsvRenderer, HtmlRenderer, JsonRenderer, Renderer, TextRenderer, renderer_for};
pub use types::{AssetSummary, Report};
pub use writers::write_output;
