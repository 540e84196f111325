//! Drawing primitives, frames and surfaces.
//!
//! A `Frame` is a plain list of drawing commands. Concepts produce
//! frames; surfaces consume them. Nothing here rasterizes.

use crate::types::LogicalTime;
use serde::Serialize;
use std::fmt::Write as _;

pub type Point = (f64, f64);

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Rgba {
    /// Opaque colour from a 0xRRGGBB literal.
    pub const fn hex(rgb: u32) -> Self {
        Self {
            r: ((rgb >> 16) & 0xff) as u8,
            g: ((rgb >> 8) & 0xff) as u8,
            b: (rgb & 0xff) as u8,
            a: 1.0,
        }
    }

    pub fn with_alpha(self, a: f64) -> Self {
        Self { a: a.clamp(0.0, 1.0), ..self }
    }

    pub fn css(&self) -> String {
        if self.a >= 1.0 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("rgba({},{},{},{:.3})", self.r, self.g, self.b, self.a)
        }
    }
}

/// Palette shared by the concept renderers.
pub mod palette {
    use super::Rgba;

    pub const BACKGROUND: Rgba = Rgba::hex(0x1e293b);
    pub const GRID:       Rgba = Rgba::hex(0x374151);
    pub const LABEL:      Rgba = Rgba::hex(0xe2e8f0);
    pub const MUTED:      Rgba = Rgba::hex(0x64748b);
    pub const CYAN:       Rgba = Rgba::hex(0x06b6d4);
    pub const SKY:        Rgba = Rgba::hex(0x22d3ee);
    pub const BLUE:       Rgba = Rgba::hex(0x3b82f6);
    pub const VIOLET:     Rgba = Rgba::hex(0x8b5cf6);
    pub const AMBER:      Rgba = Rgba::hex(0xf59e0b);
    pub const YELLOW:     Rgba = Rgba::hex(0xfbbf24);
    pub const RED:        Rgba = Rgba::hex(0xef4444);
    pub const GREEN:      Rgba = Rgba::hex(0x22c55e);
    pub const EMERALD:    Rgba = Rgba::hex(0x10b981);
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    Clear {
        color: Rgba,
    },
    Line {
        from:   Point,
        to:     Point,
        color:  Rgba,
        width:  f64,
        dashed: bool,
    },
    Polyline {
        points: Vec<Point>,
        color:  Rgba,
        width:  f64,
    },
    Polygon {
        points: Vec<Point>,
        fill:   Rgba,
    },
    Rect {
        x:    f64,
        y:    f64,
        w:    f64,
        h:    f64,
        fill: Rgba,
    },
    Circle {
        center: Point,
        radius: f64,
        fill:   Rgba,
    },
    Ring {
        center: Point,
        radius: f64,
        color:  Rgba,
        width:  f64,
    },
    Text {
        at:    Point,
        text:  String,
        color: Rgba,
        size:  f64,
    },
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct SurfaceSize {
    pub width:  f64,
    pub height: f64,
}

impl SurfaceSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// One rendered frame.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Frame {
    pub size:     SurfaceSize,
    pub time:     LogicalTime,
    pub commands: Vec<DrawCommand>,
}

impl Frame {
    /// Start a frame with a background clear.
    pub fn new(size: SurfaceSize, time: LogicalTime) -> Self {
        Self {
            size,
            time,
            commands: vec![DrawCommand::Clear { color: palette::BACKGROUND }],
        }
    }

    pub fn push(&mut self, cmd: DrawCommand) {
        self.commands.push(cmd);
    }

    pub fn len(&self) -> usize { self.commands.len() }
    pub fn is_empty(&self) -> bool { self.commands.is_empty() }

    pub fn line(&mut self, from: Point, to: Point, color: Rgba, width: f64) {
        self.push(DrawCommand::Line { from, to, color, width, dashed: false });
    }

    pub fn dashed_line(&mut self, from: Point, to: Point, color: Rgba, width: f64) {
        self.push(DrawCommand::Line { from, to, color, width, dashed: true });
    }

    pub fn polyline(&mut self, points: Vec<Point>, color: Rgba, width: f64) {
        if points.len() >= 2 {
            self.push(DrawCommand::Polyline { points, color, width });
        }
    }

    pub fn polygon(&mut self, points: Vec<Point>, fill: Rgba) {
        if points.len() >= 3 {
            self.push(DrawCommand::Polygon { points, fill });
        }
    }

    pub fn rect(&mut self, x: f64, y: f64, w: f64, h: f64, fill: Rgba) {
        self.push(DrawCommand::Rect { x, y, w, h, fill });
    }

    pub fn circle(&mut self, center: Point, radius: f64, fill: Rgba) {
        self.push(DrawCommand::Circle { center, radius, fill });
    }

    pub fn ring(&mut self, center: Point, radius: f64, color: Rgba, width: f64) {
        self.push(DrawCommand::Ring { center, radius, color, width });
    }

    pub fn text(&mut self, at: Point, text: impl Into<String>, color: Rgba, size: f64) {
        self.push(DrawCommand::Text { at, text: text.into(), color, size });
    }

    /// Serialize the frame as a standalone SVG document.
    pub fn to_svg(&self) -> String {
        let SurfaceSize { width, height } = self.size;
        let mut out = String::new();
        let _ = writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#
        );
        for cmd in &self.commands {
            match cmd {
                DrawCommand::Clear { color } => {
                    let _ = writeln!(out, r#"  <rect width="100%" height="100%" fill="{}"/>"#, color.css());
                }
                DrawCommand::Line { from, to, color, width, dashed } => {
                    let dash = if *dashed { r#" stroke-dasharray="5,5""# } else { "" };
                    let _ = writeln!(
                        out,
                        r#"  <line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="{}" stroke-width="{}"{dash}/>"#,
                        from.0, from.1, to.0, to.1, color.css(), width
                    );
                }
                DrawCommand::Polyline { points, color, width } => {
                    let _ = writeln!(
                        out,
                        r#"  <polyline points="{}" fill="none" stroke="{}" stroke-width="{}"/>"#,
                        svg_points(points), color.css(), width
                    );
                }
                DrawCommand::Polygon { points, fill } => {
                    let _ = writeln!(out, r#"  <polygon points="{}" fill="{}"/>"#, svg_points(points), fill.css());
                }
                DrawCommand::Rect { x, y, w, h, fill } => {
                    let _ = writeln!(
                        out,
                        r#"  <rect x="{x:.2}" y="{y:.2}" width="{:.2}" height="{:.2}" fill="{}"/>"#,
                        w.max(0.0), h.max(0.0), fill.css()
                    );
                }
                DrawCommand::Circle { center, radius, fill } => {
                    let _ = writeln!(
                        out,
                        r#"  <circle cx="{:.2}" cy="{:.2}" r="{:.2}" fill="{}"/>"#,
                        center.0, center.1, radius, fill.css()
                    );
                }
                DrawCommand::Ring { center, radius, color, width } => {
                    let _ = writeln!(
                        out,
                        r#"  <circle cx="{:.2}" cy="{:.2}" r="{:.2}" fill="none" stroke="{}" stroke-width="{}"/>"#,
                        center.0, center.1, radius, color.css(), width
                    );
                }
                DrawCommand::Text { at, text, color, size } => {
                    let _ = writeln!(
                        out,
                        r#"  <text x="{:.2}" y="{:.2}" fill="{}" font-size="{}" font-family="sans-serif">{}</text>"#,
                        at.0, at.1, color.css(), size, escape_xml(text)
                    );
                }
            }
        }
        out.push_str("</svg>\n");
        out
    }
}

fn svg_points(points: &[Point]) -> String {
    points
        .iter()
        .map(|(x, y)| format!("{x:.2},{y:.2}"))
        .collect::<Vec<_>>()
        .join(" ")
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

/// Where frames end up. A surface may disappear at any time (view torn
/// down, not yet mounted); runners check `is_available` before drawing.
pub trait Surface {
    fn is_available(&self) -> bool;
    fn present(&mut self, frame: &Frame);
}

/// Surface that keeps the last frame and counts presentations.
/// Used by tests and the headless runner.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    presented: u64,
    last:      Option<Frame>,
    disposed:  bool,
}

impl RecordingSurface {
    pub fn new() -> Self { Self::default() }

    /// Mark the surface as torn down; later frames are refused.
    pub fn dispose(&mut self) { self.disposed = true; }

    pub fn presented(&self) -> u64 { self.presented }
    pub fn last_frame(&self) -> Option<&Frame> { self.last.as_ref() }
}

impl Surface for RecordingSurface {
    fn is_available(&self) -> bool { !self.disposed }

    fn present(&mut self, frame: &Frame) {
        self.presented += 1;
        self.last = Some(frame.clone());
    }
}
