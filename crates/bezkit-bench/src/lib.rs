//! # BezKit Bench
//!
//! Fixtures for benchmarking the BezKit document model and exporter.
//!
//! ## Features
//!
//! - Deterministic path generators mixing lines, curves and stars
//! - Layered documents of configurable size and group depth
//! - A counting sink that measures output without storing it
//!
//! ## Usage
//!
//! ```rust,ignore
//! use bezkit_bench::{generate_document, FixtureSize};
//!
//! let doc = generate_document(&FixtureSize::medium());
//! ```

use bezkit_common::{BezKitError, Result};
use bezkit_doc::{Custom, Document, DocumentInfo, Group, Layer, PointText, Shape};
use bezkit_export::{Sink, NEWLINE};
use bezkit_path::{color, shapes, Path};
use serde::{Deserialize, Serialize};
use tracing::debug;

// ==================== Fixture sizes ====================

/// Shape of a generated document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixtureSize {
    pub layers: usize,
    pub groups_per_layer: usize,
    pub shapes_per_group: usize,
    /// Groups nested inside each top group.
    pub depth: usize,
}

impl FixtureSize {
    pub fn small() -> Self {
        Self {
            layers: 1,
            groups_per_layer: 2,
            shapes_per_group: 5,
            depth: 1,
        }
    }

    pub fn medium() -> Self {
        Self {
            layers: 4,
            groups_per_layer: 10,
            shapes_per_group: 10,
            depth: 2,
        }
    }

    pub fn large() -> Self {
        Self {
            layers: 8,
            groups_per_layer: 25,
            shapes_per_group: 20,
            depth: 3,
        }
    }

    /// Shapes in a document of this size.
    pub fn shape_count(&self) -> usize {
        self.layers * self.groups_per_layer * self.shapes_per_group * self.depth.max(1)
    }
}

// ==================== Generators ====================

const PAGE_WIDTH: f64 = 612.0;
const PAGE_HEIGHT: f64 = 792.0;

/// The `index`-th path of a fixed cycle of shapes spread over the page.
pub fn sample_path(index: usize) -> Path {
    let x = 20.0 + (index * 37 % 560) as f64;
    let y = 20.0 + (index * 53 % 740) as f64;
    let mut path = match index % 6 {
        0 => shapes::rectangle(x, y, x + 24.0, y + 16.0),
        1 => shapes::circle(x, y, 12.0),
        2 => shapes::triangle(x, y, x + 20.0, y, x + 10.0, y + 18.0),
        3 => shapes::curve(x, y, x + 10.0, y - 20.0, x + 30.0, y + 20.0, x + 40.0, y),
        4 => shapes::star(x, y, 14.0, 6.0, 5).unwrap_or_else(|_| shapes::circle(x, y, 14.0)),
        _ => shapes::line(x, y, x + 30.0, y + 30.0),
    };
    let shade = (index % 256) as i32;
    path.set_fill_color(color::rgb(shade, 255 - shade, 128));
    if index % 4 == 0 {
        path.set_no_stroke();
    }
    path
}

pub fn generate_paths(count: usize) -> Vec<Path> {
    (0..count).map(sample_path).collect()
}

/// Build a document with `size.layers` layers, each holding group chains
/// of `size.depth` levels with shapes at every level.
pub fn generate_document(size: &FixtureSize) -> Document {
    let info = DocumentInfo::new("bench", PAGE_WIDTH as i32, PAGE_HEIGHT as i32);
    let mut doc = Document::with_info(info);
    let mut next = 0;
    for l in 0..size.layers {
        let mut layer = Layer::new(format!("Layer {}", l + 1));
        for g in 0..size.groups_per_layer {
            layer.push(nested_group(size, size.depth.max(1), &mut next));
            if g == 0 {
                layer.push(PointText::new(10.0, 10.0 + l as f64 * 12.0, "caption"));
                layer.push(Custom::new("layer", l.to_string()));
            }
        }
        doc.push_layer(layer);
    }
    for argb in [color::BLACK, color::WHITE, color::GRAY] {
        doc.palette_mut().add_color(argb);
    }
    debug!(shapes = next, layers = size.layers, "generated document");
    doc
}

fn nested_group(size: &FixtureSize, levels: usize, next: &mut usize) -> Group {
    let mut group = Group::new();
    for _ in 0..size.shapes_per_group {
        group.push(Shape::new(sample_path(*next)));
        *next += 1;
    }
    if levels > 1 {
        group.push(nested_group(size, levels - 1, next));
    }
    group
}

// ==================== CountingSink ====================

/// Sink that only counts what it is given.
#[derive(Debug, Default)]
pub struct CountingSink {
    lines: usize,
    bytes: usize,
    closed: bool,
}

impl CountingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> usize {
        self.lines
    }

    /// Bytes including line terminators.
    pub fn bytes(&self) -> usize {
        self.bytes
    }
}

impl Sink for CountingSink {
    fn emit(&mut self, line: &str) -> Result<()> {
        if self.closed {
            return Err(BezKitError::SinkClosed("counting sink".to_string()));
        }
        self.lines += 1;
        self.bytes += line.len() + NEWLINE.len();
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.closed = true;
        Ok(())
    }
}
