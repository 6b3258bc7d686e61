//! Directive writer.
//!
//! One method per output directive. Numbers go through
//! [`four_places`]; integers are written as-is. The writer knows nothing
//! about documents; [`crate::Exporter`] decides what to write and in which
//! order.

use bezkit_common::Result;
use bezkit_path::{color, PathEmitter};
use chrono::NaiveDateTime;
use tracing::trace;

use crate::format::four_places;
use crate::sink::Sink;

// ==================== Paint operators ====================

/// Path paint operators indexed by `fill << 2 | stroke << 1 | closed`.
pub const PAINT_OPS: [char; 8] = ['N', 'n', 'S', 's', 'F', 'f', 'B', 'b'];

pub const FILL: usize = 4;
pub const STROKE: usize = 2;
pub const CLOSE: usize = 1;

/// Operator that ends a path with the given paint state.
pub fn paint_op(has_fill: bool, has_stroke: bool, closed: bool) -> char {
    let mut index = 0;
    if has_fill {
        index += FILL;
    }
    if has_stroke {
        index += STROKE;
    }
    if closed {
        index += CLOSE;
    }
    PAINT_OPS[index]
}

/// Escape the characters that end or break a parenthesized string.
pub fn escape_string(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        if matches!(ch, '(' | ')' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

// ==================== Fixed blocks ====================

const PROCSETS: [&str; 5] = [
    "Adobe_packedarray 2.0 0",
    "Adobe_cmykcolor 1.1 0",
    "Adobe_cshow 1.1 0",
    "Adobe_customcolor 1.0 0",
    "Adobe_IllustratorA_AI3 1.0 1",
];

const STATE: [&str; 6] = [
    "0 A",
    "0 R",
    "0 G",
    "0 i 0 J 0 j 1 w 4 M []0 d",
    "%AI3_Note:",
    "0 D",
];

/// Header fields.
#[derive(Debug, Clone, Copy)]
pub struct Header<'a> {
    pub title: &'a str,
    pub creator: &'a str,
    pub org: &'a str,
    pub width: i32,
    pub height: i32,
    /// `(x, y, width, height)`.
    pub bounding_box: (i32, i32, i32, i32),
    pub created: NaiveDateTime,
}

/// Writes directives to a [`Sink`].
#[derive(Debug)]
pub struct DirectiveWriter<S: Sink> {
    sink: S,
}

impl<S: Sink> DirectiveWriter<S> {
    pub fn new(sink: S) -> Self {
        Self { sink }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Write one raw line.
    pub fn line(&mut self, text: &str) -> Result<()> {
        self.sink.emit(text)
    }

    pub fn flush(&mut self) -> Result<()> {
        self.sink.flush()
    }

    pub fn close(&mut self) -> Result<()> {
        self.sink.close()
    }

    // ==================== Document blocks ====================

    pub fn header(&mut self, header: &Header<'_>) -> Result<()> {
        trace!(title = header.title, "header");
        let (x, y, w, h) = header.bounding_box;
        let (mid_x, mid_y) = (x + w / 2, y + h / 2);

        self.line("%!PS-Adobe-7.0")?;
        self.line("%%Creator: Adobe Illustrator(TM) 7.0.0")?;
        self.line(&format!(
            "%%For: ({}) ({})",
            escape_string(header.creator),
            escape_string(header.org)
        ))?;
        self.line(&format!("%%Title: ({})", escape_string(header.title)))?;
        self.line(&format!(
            "%%CreationDate: ({}) ({})",
            header.created.format("%m/%d/%Y"),
            header.created.format("%H:%M")
        ))?;
        self.line(&format!("%%BoundingBox: {} {} {} {}", x, y, x + w, y + h))?;
        self.line("%%DocumentProcessColors: Black")?;
        for (i, procset) in PROCSETS.iter().enumerate() {
            if i == 0 {
                self.line(&format!("%%DocumentNeededResources: procset {}", procset))?;
            } else {
                self.line(&format!("%%+ procset {}", procset))?;
            }
        }
        self.line("%AI3_ColorUsage: Black&White")?;
        self.line(&format!(
            "%AI3_TemplateBox: {} {} {} {}",
            mid_x, mid_y, mid_x, mid_y
        ))?;
        self.line("%AI3_TileBox: 0 0 576 750")?;
        self.line("%AI3_DocumentPreview: None")?;
        self.line(&format!("%AI5_ArtSize: {} {}", header.width, header.height))?;
        self.line("%%EndComments")?;

        self.line("%%BeginProlog")?;
        for (i, procset) in PROCSETS.iter().enumerate() {
            self.line(&format!("%%IncludeResource: procset {}", procset))?;
            if i == 0 {
                self.line("Adobe_packedarray /initialize get exec")?;
            }
        }
        self.line("%%EndProlog")?;

        self.line("%%BeginSetup")?;
        for procset in &PROCSETS[1..] {
            self.line(&format!("{} /initialize get exec", procset_name(procset)))?;
        }
        self.line("%%EndSetup")
    }

    /// Initial graphics state.
    pub fn state(&mut self) -> Result<()> {
        STATE.iter().try_for_each(|line| self.line(line))
    }

    /// Terminate every procset in reverse order and end the file. Does not
    /// flush or close.
    pub fn trailer(&mut self) -> Result<()> {
        trace!("trailer");
        self.line("%%Trailer")?;
        for procset in PROCSETS.iter().rev() {
            self.line(&format!("{} /terminate get exec", procset_name(procset)))?;
        }
        self.line("%%EOF")
    }

    // ==================== Structure ====================

    pub fn begin_group(&mut self) -> Result<()> {
        self.line("u")
    }

    pub fn end_group(&mut self) -> Result<()> {
        self.line("U")
    }

    /// Open a layer. A locked layer is written as not enabled.
    pub fn begin_layer(
        &mut self,
        name: &str,
        color_index: i32,
        visible: bool,
        locked: bool,
    ) -> Result<()> {
        self.line("%AI5_BeginLayer")?;
        self.line(&format!(
            "{} 1 {} 1 0 0 {} 255 80 80 Lb",
            u8::from(visible),
            u8::from(!locked),
            color_index
        ))?;
        self.line(&format!("({}) Ln", escape_string(name)))
    }

    pub fn end_layer(&mut self) -> Result<()> {
        self.line("LB")?;
        self.line("%AI5_EndLayer--")
    }

    pub fn set_visible(&mut self, visible: bool) -> Result<()> {
        self.line(if visible { "0 Xw" } else { "1 Xw" })
    }

    pub fn set_locked(&mut self, locked: bool) -> Result<()> {
        self.line(if locked { "1 A" } else { "0 A" })
    }

    // ==================== Paint state ====================

    /// RGB fill from a packed color; alpha is ignored.
    pub fn fill_rgb(&mut self, argb: u32) -> Result<()> {
        self.line(&format!("{} Xa", rgb_triplet(argb)))
    }

    pub fn stroke_rgb(&mut self, argb: u32) -> Result<()> {
        self.line(&format!("{} XA", rgb_triplet(argb)))
    }

    /// Gray fill, 0 black to 1 white.
    pub fn fill_gray(&mut self, shade: f64) -> Result<()> {
        self.line(&format!("{} g", four_places(shade)))
    }

    pub fn stroke_gray(&mut self, shade: f64) -> Result<()> {
        self.line(&format!("{} G", four_places(shade)))
    }

    pub fn fill_cmyk(&mut self, cmyk: [f64; 4]) -> Result<()> {
        self.line(&format!("{} k", cmyk_quad(cmyk)))
    }

    pub fn stroke_cmyk(&mut self, cmyk: [f64; 4]) -> Result<()> {
        self.line(&format!("{} K", cmyk_quad(cmyk)))
    }

    pub fn weight(&mut self, weight: f64) -> Result<()> {
        self.line(&format!("{} w", four_places(weight)))
    }

    /// Line join, cap and miter limit.
    pub fn line_attributes(&mut self, cap: i32, join: i32, miter_limit: f64) -> Result<()> {
        self.line(&format!(
            "{} j {} J {} M",
            join,
            cap,
            four_places(miter_limit)
        ))
    }

    /// Dash pattern as alternating dash and gap lengths. An empty pattern
    /// restores solid lines.
    pub fn dash_pattern(&mut self, pattern: &[f64]) -> Result<()> {
        let values: Vec<String> = pattern.iter().map(|v| four_places(*v)).collect();
        self.line(&format!("[{}]0 d", values.join(" ")))
    }

    /// Opacity for the following objects, 0 transparent to 1 opaque. Not
    /// part of the published format but read by Illustrator.
    pub fn transparency(&mut self, opacity: f64) -> Result<()> {
        self.line(&format!("0 {} 0 0 0 Xy", four_places(opacity)))
    }

    pub fn reset_transparency(&mut self) -> Result<()> {
        self.line("0 1 0 0 0 Xy")
    }

    // ==================== Palette ====================

    pub fn begin_palette(&mut self) -> Result<()> {
        self.line("%AI5_BeginPalette")?;
        self.line("0 0 Pb")?;
        self.line("Pn")
    }

    pub fn palette_rgb_cell(&mut self, argb: u32) -> Result<()> {
        self.line("Pc")?;
        self.fill_rgb(argb)
    }

    pub fn palette_gray_cell(&mut self, shade: f64) -> Result<()> {
        self.line("Pc")?;
        self.fill_gray(shade)
    }

    pub fn palette_cmyk_cell(&mut self, cmyk: [f64; 4]) -> Result<()> {
        self.line("Pc")?;
        self.fill_cmyk(cmyk)
    }

    pub fn end_palette(&mut self) -> Result<()> {
        self.line("Pc")?;
        self.line("PB")?;
        self.line("%AI5_EndPalette")
    }

    // ==================== Objects ====================

    pub fn paint(&mut self, op: char) -> Result<()> {
        let mut buf = [0u8; 4];
        self.line(op.encode_utf8(&mut buf))
    }

    /// Tagged user object.
    pub fn custom(&mut self, tag: &str, value: &str) -> Result<()> {
        self.line(&format!("/{} ({}) XT", tag, escape_string(value)))
    }
}

impl<S: Sink> PathEmitter for DirectiveWriter<S> {
    fn move_to(&mut self, x: f64, y: f64) -> Result<()> {
        self.line(&format!("{} {} m", four_places(x), four_places(y)))
    }

    fn line_to(&mut self, x: f64, y: f64) -> Result<()> {
        self.line(&format!("{} {} L", four_places(x), four_places(y)))
    }

    fn curve_to(&mut self, cx1: f64, cy1: f64, cx2: f64, cy2: f64, x: f64, y: f64) -> Result<()> {
        self.line(&format!(
            "{} {} {} {} {} {} c",
            four_places(cx1),
            four_places(cy1),
            four_places(cx2),
            four_places(cy2),
            four_places(x),
            four_places(y)
        ))
    }
}

fn procset_name(procset: &str) -> &str {
    procset.split_whitespace().next().unwrap_or(procset)
}

fn rgb_triplet(argb: u32) -> String {
    let (r, g, b) = color::rgb_unit(argb);
    format!("{} {} {}", four_places(r), four_places(g), four_places(b))
}

fn cmyk_quad(cmyk: [f64; 4]) -> String {
    let [c, m, y, k] = cmyk;
    format!(
        "{} {} {} {}",
        four_places(c),
        four_places(m),
        four_places(y),
        four_places(k)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::StringSink;
    use chrono::NaiveDate;

    fn writer() -> DirectiveWriter<StringSink> {
        DirectiveWriter::new(StringSink::new())
    }

    fn output(w: DirectiveWriter<StringSink>) -> Vec<String> {
        w.into_sink().lines().map(str::to_string).collect()
    }

    #[test]
    fn test_paint_op_table() {
        assert_eq!(paint_op(false, false, false), 'N');
        assert_eq!(paint_op(false, false, true), 'n');
        assert_eq!(paint_op(false, true, false), 'S');
        assert_eq!(paint_op(false, true, true), 's');
        assert_eq!(paint_op(true, false, false), 'F');
        assert_eq!(paint_op(true, false, true), 'f');
        assert_eq!(paint_op(true, true, false), 'B');
        assert_eq!(paint_op(true, true, true), 'b');
    }

    #[test]
    fn test_path_directives() {
        let mut w = writer();
        w.move_to(1.0, 2.5).unwrap();
        w.line_to(-3.0, 0.0).unwrap();
        w.curve_to(0.0, 1.0, 2.0, 3.0, 4.0, 5.0).unwrap();
        w.paint('f').unwrap();
        assert_eq!(
            output(w),
            vec![
                "1.0000 2.5000 m",
                "-3.0000 0.0000 L",
                "0.0000 1.0000 2.0000 3.0000 4.0000 5.0000 c",
                "f",
            ]
        );
    }

    #[test]
    fn test_color_directives() {
        let mut w = writer();
        w.fill_rgb(0xFFFF_0000).unwrap();
        w.stroke_rgb(0x8000_00FF).unwrap();
        w.fill_gray(0.5).unwrap();
        w.stroke_gray(1.0).unwrap();
        w.fill_cmyk([0.0, 0.5, 1.0, 0.25]).unwrap();
        w.stroke_cmyk([1.0, 0.0, 0.0, 0.0]).unwrap();
        w.weight(2.0).unwrap();
        assert_eq!(
            output(w),
            vec![
                "1.0000 0.0000 0.0000 Xa",
                "0.0000 0.0000 1.0000 XA",
                "0.5000 g",
                "1.0000 G",
                "0.0000 0.5000 1.0000 0.2500 k",
                "1.0000 0.0000 0.0000 0.0000 K",
                "2.0000 w",
            ]
        );
    }

    #[test]
    fn test_state_toggles() {
        let mut w = writer();
        w.set_visible(false).unwrap();
        w.set_locked(true).unwrap();
        w.set_locked(false).unwrap();
        w.set_visible(true).unwrap();
        w.transparency(0.5).unwrap();
        w.reset_transparency().unwrap();
        assert_eq!(
            output(w),
            vec!["1 Xw", "1 A", "0 A", "0 Xw", "0 0.5000 0 0 0 Xy", "0 1 0 0 0 Xy"]
        );
    }

    #[test]
    fn test_layer_lines() {
        let mut w = writer();
        w.begin_layer("Layer 1", 3, true, false).unwrap();
        w.end_layer().unwrap();
        w.begin_layer("hidden (old)", 1, false, true).unwrap();
        assert_eq!(
            output(w),
            vec![
                "%AI5_BeginLayer",
                "1 1 1 1 0 0 3 255 80 80 Lb",
                "(Layer 1) Ln",
                "LB",
                "%AI5_EndLayer--",
                "%AI5_BeginLayer",
                "0 1 0 1 0 0 1 255 80 80 Lb",
                "(hidden \\(old\\)) Ln",
            ]
        );
    }

    #[test]
    fn test_line_attributes_and_dash() {
        let mut w = writer();
        w.line_attributes(1, 2, 4.0).unwrap();
        w.dash_pattern(&[3.0, 1.5]).unwrap();
        w.dash_pattern(&[]).unwrap();
        assert_eq!(
            output(w),
            vec!["2 j 1 J 4.0000 M", "[3.0000 1.5000]0 d", "[]0 d"]
        );
    }

    #[test]
    fn test_palette_cells() {
        let mut w = writer();
        w.begin_palette().unwrap();
        w.palette_rgb_cell(color::WHITE).unwrap();
        w.palette_gray_cell(0.0).unwrap();
        w.palette_cmyk_cell([0.0, 0.0, 0.0, 1.0]).unwrap();
        w.end_palette().unwrap();
        assert_eq!(
            output(w),
            vec![
                "%AI5_BeginPalette",
                "0 0 Pb",
                "Pn",
                "Pc",
                "1.0000 1.0000 1.0000 Xa",
                "Pc",
                "0.0000 g",
                "Pc",
                "0.0000 0.0000 0.0000 1.0000 k",
                "Pc",
                "PB",
                "%AI5_EndPalette",
            ]
        );
    }

    #[test]
    fn test_header_fields() {
        let created = NaiveDate::from_ymd_opt(2024, 3, 7)
            .and_then(|d| d.and_hms_opt(9, 5, 0))
            .unwrap();
        let mut w = writer();
        w.header(&Header {
            title: "Poster",
            creator: "Ana",
            org: "Studio",
            width: 600,
            height: 400,
            bounding_box: (10, 20, 600, 400),
            created,
        })
        .unwrap();
        let lines = output(w);
        assert_eq!(lines[0], "%!PS-Adobe-7.0");
        assert!(lines.contains(&"%%For: (Ana) (Studio)".to_string()));
        assert!(lines.contains(&"%%Title: (Poster)".to_string()));
        assert!(lines.contains(&"%%CreationDate: (03/07/2024) (09:05)".to_string()));
        assert!(lines.contains(&"%%BoundingBox: 10 20 610 420".to_string()));
        assert!(lines.contains(&"%AI3_TemplateBox: 310 220 310 220".to_string()));
        assert!(lines.contains(&"%AI5_ArtSize: 600 400".to_string()));
        assert!(lines.contains(&"Adobe_packedarray /initialize get exec".to_string()));
        assert!(lines.contains(&"Adobe_IllustratorA_AI3 /initialize get exec".to_string()));
        assert_eq!(lines.last().map(String::as_str), Some("%%EndSetup"));
    }

    #[test]
    fn test_trailer_order() {
        let mut w = writer();
        w.trailer().unwrap();
        assert_eq!(
            output(w),
            vec![
                "%%Trailer",
                "Adobe_IllustratorA_AI3 /terminate get exec",
                "Adobe_customcolor /terminate get exec",
                "Adobe_cshow /terminate get exec",
                "Adobe_cmykcolor /terminate get exec",
                "Adobe_packedarray /terminate get exec",
                "%%EOF",
            ]
        );
    }

    #[test]
    fn test_custom_object() {
        let mut w = writer();
        w.custom("note", "a (b)").unwrap();
        assert_eq!(output(w), vec!["/note (a \\(b\\)) XT"]);
    }
}
