//! # BezKit Export
//!
//! Writes BezKit documents as Adobe Illustrator 7 text files.
//!
//! ## Features
//!
//! - **Exact numbers**: four decimal places with a `.` separator on every
//!   host
//! - **Sinks**: any `io::Write`, files, or an in-memory string
//! - **Directives**: header, graphics state, palette, layers, groups,
//!   paths, point text, custom objects and trailer
//! - **Safe flipping**: the y-flip applied for the body is always undone
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────┐
//! │               Exporter                 │
//! │  document walk, brackets, paint ops    │
//! └───────────────────┬────────────────────┘
//!                     │
//! ┌───────────────────▼────────────────────┐
//! │           DirectiveWriter              │
//! │  one method per directive, PathEmitter │
//! └───────────────────┬────────────────────┘
//!                     │
//! ┌───────────────────▼────────────────────┐
//! │                 Sink                   │
//! │  emit / flush / close                  │
//! └────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use bezkit_doc::{Document, Shape};
//! use bezkit_export::{Exporter, StringSink};
//! use bezkit_path::shapes;
//!
//! let mut doc = Document::new();
//! doc.push_item(Shape::new(shapes::circle(100.0, 100.0, 50.0)));
//!
//! let mut exporter = Exporter::new(StringSink::new());
//! exporter.write_document(&mut doc).unwrap();
//! assert!(exporter.into_sink().as_str().ends_with("%%EOF\n"));
//! ```

pub mod config;
pub mod format;
pub mod serialize;
pub mod sink;
pub mod writer;

pub use config::ExportConfig;
pub use format::four_places;
pub use serialize::Exporter;
pub use sink::{Sink, StringSink, WriteSink, NEWLINE};
pub use writer::{paint_op, DirectiveWriter, Header, PAINT_OPS};

use std::path::Path;

use bezkit_common::Result;
use bezkit_doc::Document;

/// Write `document` to a file with the given configuration.
pub fn export_to_file(
    document: &mut Document,
    path: impl AsRef<Path>,
    config: ExportConfig,
) -> Result<()> {
    let sink = WriteSink::create(path)?;
    Exporter::with_config(sink, config).write_document(document)
}
