//! SVG export serializer.
//!
//! Converts glyph paths into an SVG string using the [`svg`] crate for
//! document construction, XML escaping and path data formatting. Glyphs
//! live in a `200 x 200` em box, which becomes the document `viewBox`.
//!
//! Two renderings are offered:
//!
//! - [`to_svg`]: filled outlines, one closed `<path>` per outline, drawn
//!   with the nonzero fill rule so fused and overlapping outlines render
//!   as solid ink.
//! - [`to_skeleton_svg`]: open centerline paths drawn with a round pen of
//!   the stroke width.
//!
//! Both are pure functions with no I/O -- they return a `String`.

use svg::Document;
use svg::node::element::path::Data;
use svg::node::element::{Description, Element, Path as SvgPath, Title};
use svg::node::{Node, Text, Value};

use fude_outline::{Curve, Path};

/// Side of the square em box glyph coordinates live in.
pub const GLYPH_SIZE: f64 = 200.0;

/// Metadata to embed in the SVG document.
///
/// All fields are optional. Text values are XML-escaped by the `svg`
/// crate.
#[derive(Debug, Clone, Default)]
pub struct SvgMetadata<'a> {
    /// Document title, emitted as `<title>`.
    pub title: Option<&'a str>,

    /// Document description, emitted as `<desc>`.
    ///
    /// Typically the stroke records the glyph was built from.
    pub description: Option<&'a str>,

    /// Serialized style configuration, emitted inside `<metadata>` so the
    /// file carries the exact settings it was produced with.
    pub config_json: Option<&'a str>,
}

/// Build an SVG path `d` attribute string from a curve path.
///
/// Emits `M` for the start point, then `L`, `Q` or `C` per curve by
/// degree. With `close` set the path ends in `z`. Returns an empty string
/// for an empty path.
///
/// Coordinates are formatted by the [`svg`] crate using `f32` precision.
///
/// # Examples
///
/// ```
/// use fude_outline::{Curve, Path, Point};
/// use fude_export::build_path_data;
///
/// let path = Path::new(vec![Curve::Line([Point::new(10.0, 20.0), Point::new(30.0, 40.0)])]);
/// assert_eq!(build_path_data(&path, false), "M10,20 L30,40");
/// ```
#[must_use]
pub fn build_path_data(path: &Path, close: bool) -> String {
    let Some(start) = path.start_point() else {
        return String::new();
    };

    let mut data = Data::new().move_to((start.x, start.y));
    for curve in path.curves() {
        data = match *curve {
            Curve::Line([_, end]) => data.line_to((end.x, end.y)),
            Curve::Quad([_, c, end]) => data.quadratic_curve_to((c.x, c.y, end.x, end.y)),
            Curve::Cubic([_, c1, c2, end]) => {
                data.cubic_curve_to((c1.x, c1.y, c2.x, c2.y, end.x, end.y))
            }
        };
    }
    if close {
        data = data.close();
    }
    String::from(Value::from(data))
}

/// Serialize filled glyph outlines into an SVG string.
///
/// Each non-empty path becomes a closed, black-filled `<path>` with
/// `fill-rule="nonzero"`.
///
/// # Examples
///
/// ```
/// use fude_export::{SvgMetadata, to_svg};
///
/// let svg = to_svg(&[], &SvgMetadata { title: Some("empty"), ..SvgMetadata::default() });
/// assert!(svg.contains("<title>empty</title>"));
/// assert!(svg.contains(r#"viewBox="0 0 200 200""#));
/// ```
#[must_use]
pub fn to_svg(outlines: &[Path], metadata: &SvgMetadata<'_>) -> String {
    let mut doc = document(metadata);
    for outline in outlines {
        let d = build_path_data(outline, true);
        if d.is_empty() {
            continue;
        }
        let path = SvgPath::new()
            .set("d", d)
            .set("fill", "black")
            .set("fill-rule", "nonzero")
            .set("stroke", "none");
        doc = doc.add(path);
    }
    finish(&doc)
}

/// Serialize centerline skeletons into an SVG string.
///
/// Each non-empty path becomes an open `<path>` stroked with
/// `stroke_width` and round caps and joins.
#[must_use]
pub fn to_skeleton_svg(
    skeletons: &[Path],
    stroke_width: f64,
    metadata: &SvgMetadata<'_>,
) -> String {
    let mut doc = document(metadata);
    for skeleton in skeletons {
        let d = build_path_data(skeleton, false);
        if d.is_empty() {
            continue;
        }
        let path = SvgPath::new()
            .set("d", d)
            .set("fill", "none")
            .set("stroke", "black")
            .set("stroke-width", stroke_width)
            .set("stroke-linecap", "round")
            .set("stroke-linejoin", "round");
        doc = doc.add(path);
    }
    finish(&doc)
}

/// Empty em-box document with the optional metadata elements.
fn document(metadata: &SvgMetadata<'_>) -> Document {
    let mut doc = Document::new()
        .set("width", GLYPH_SIZE)
        .set("height", GLYPH_SIZE)
        .set("viewBox", format!("0 0 {GLYPH_SIZE} {GLYPH_SIZE}"));

    if let Some(title) = metadata.title {
        doc = doc.add(Title::new(title));
    }
    if let Some(description) = metadata.description {
        doc = doc.add(Description::new().add(Text::new(description)));
    }
    if let Some(config_json) = metadata.config_json {
        let mut style_el = Element::new("fude:style");
        style_el.assign("xmlns:fude", "urn:fude:style:1");
        style_el.append(Text::new(config_json));
        let mut metadata_el = Element::new("metadata");
        metadata_el.append(style_el);
        doc = doc.add(metadata_el);
    }
    doc
}

/// The svg crate omits the XML declaration, so it is prepended here.
fn finish(doc: &Document) -> String {
    format!("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n{doc}\n")
}
