//! Asset discovery: finds script, stylesheet and image references in an HTML body.
mod extract;


pub use extract::{AssetExtractor, AssetKind, ExtractMode, ExtractedAssets};
