//! fude-export: Pure format serializers (sans-IO)
//!
//! Converts glyph outlines and skeletons into output formats. Currently
//! supports SVG.

pub mod svg;

pub use svg::{GLYPH_SIZE, SvgMetadata, build_path_data, to_skeleton_svg, to_svg};
