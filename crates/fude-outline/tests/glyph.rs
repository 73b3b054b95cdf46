//! Integration test: run a multi-stroke glyph through assembly, fusion and
//! path conversion.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use fude_outline::{CurveOffsetMethod, Path, StrokeDescriptor, StyleConfig};

/// Three strokes: a free horizontal, a horizontal connecting into a round
/// bend, and the bend itself ending in an upward hook.
fn sample_glyph() -> Vec<StrokeDescriptor> {
    [
        "1:0:0:20:32:180:32",
        "1:0:2:32:61:143:61",
        "4:22:5:143:61:12:168:174:168",
    ]
    .iter()
    .map(|record| {
        let fields: Vec<f64> = record.split(':').map(|f| f.parse().unwrap()).collect();
        StrokeDescriptor::from_fields(&fields).unwrap()
    })
    .collect()
}

fn assert_closed_ccw(paths: &[Path]) {
    for (i, path) in paths.iter().enumerate() {
        assert!(path.is_closed(1e-9), "path {i} is not closed");
        let area = path.signed_area();
        assert!(area > 0.0, "path {i} has non-positive area {area}");
    }
}

#[test]
fn sample_glyph_fuses_connected_strokes() {
    let result = fude_outline::process(&sample_glyph(), &StyleConfig::default())
        .expect("glyph processing should succeed");
    eprintln!(
        "{} outlines: {:?}",
        result.paths.len(),
        result
            .paths
            .iter()
            .map(|p| p.to_drawing_sequence(2))
            .collect::<Vec<_>>()
    );
    assert_eq!(result.paths.len(), 2);
    assert_eq!(result.outlines.len(), result.paths.len());
    assert_closed_ccw(&result.paths);
    // The hook survives fusion as the tail of the merged outline.
    assert!(!result.outlines[1].tail.is_empty());
}

#[test]
fn sample_glyph_without_fusion() {
    let style = StyleConfig {
        fuse_connected: false,
        ..StyleConfig::default()
    };
    let result = fude_outline::process(&sample_glyph(), &style).unwrap();
    assert_eq!(result.paths.len(), 3);
    assert_closed_ccw(&result.paths);
}

#[test]
fn sample_glyph_with_control_polygon_offsets() {
    let style = StyleConfig {
        curve_offset: CurveOffsetMethod::ControlPolygon,
        ..StyleConfig::for_width(8.0)
    };
    let result = fude_outline::process(&sample_glyph(), &style).unwrap();
    assert_eq!(result.paths.len(), 2);
    assert_closed_ccw(&result.paths);
}

#[test]
fn drawing_sequences_use_requested_precision() {
    let result = fude_outline::process(&sample_glyph(), &StyleConfig::default()).unwrap();
    let first = result.paths[0].to_drawing_sequence(0);
    assert!(first.starts_with("M "));
    assert!(!first.contains('.'));
    assert!(!first.contains('Z'));
}

#[test]
fn skeleton_mode_connects_strokes() {
    let records: [&[f64]; 2] = [
        &[1.0, 0.0, 2.0, 32.0, 61.0, 143.0, 61.0],
        &[3.0, 0.0, 5.0, 143.0, 61.0, 143.0, 168.0, 174.0, 168.0],
    ];
    let strokes: Vec<StrokeDescriptor> = records
        .iter()
        .map(|fields| StrokeDescriptor::from_fields(fields).unwrap())
        .collect();
    let paths = fude_outline::skeleton_paths(&strokes, &StyleConfig::default()).unwrap();
    assert_eq!(paths.len(), 1);
    // Straight, then the bend (line, quad, line), then the hook.
    assert_eq!(paths[0].len(), 5);
    assert_eq!(paths[0].start_point(), Some(fude_outline::Point::new(32.0, 61.0)));
}

#[test]
fn outline_result_serializes() {
    let result = fude_outline::process(&sample_glyph(), &StyleConfig::default()).unwrap();
    let json = serde_json::to_string(&result).unwrap();
    let back: fude_outline::GlyphResult = serde_json::from_str(&json).unwrap();
    assert_eq!(back.paths.len(), result.paths.len());
}
