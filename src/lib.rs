mod error;
mod glyph_order;
mod merger;
mod options;
mod output;
mod registry;
mod source;
pub mod strategies;
pub mod tables;
mod types;

pub use error::{MergeError, Result};
pub use glyph_order::{GlyphName, GlyphOrder, unify_glyph_orders};
pub use merger::{MergedFont, Merger};
pub use options::{DEFAULT_DROP_TABLES, Options};
pub use output::build_font;
pub use registry::{MergeFn, StrategyRegistry};
pub use source::{FontSource, read_glyph_order};
pub use types::{Codepoint, FontIndex, TableTag};

/// Merge multiple fonts from raw byte slices using default options and
/// serialize the result in one call.
///
/// This is a convenience wrapper around [`Merger`] and [`build_font`] for
/// the common case of merging fonts with default settings.
///
/// # Example
///
/// ```no_run
/// use fontmerge::merge_fonts_bytes;
///
/// let font1 = std::fs::read("font1.ttf").unwrap();
/// let font2 = std::fs::read("font2.ttf").unwrap();
/// let merged = merge_fonts_bytes(&[&font1, &font2]).unwrap();
/// ```
pub fn merge_fonts_bytes(fonts: &[&[u8]]) -> Result<Vec<u8>> {
    let merged = Merger::default().merge(fonts)?;
    build_font(&merged)
}
