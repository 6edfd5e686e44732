//! Minimal deferred-rendering SVG canvas for the court chart.

use std::fmt::Write as FmtWrite;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub fn hex(s: &str) -> Self {
        let s = s.strip_prefix('#').unwrap_or(s);
        let r = u8::from_str_radix(s.get(0..2).unwrap_or("00"), 16).unwrap_or(0);
        let g = u8::from_str_radix(s.get(2..4).unwrap_or("00"), 16).unwrap_or(0);
        let b = u8::from_str_radix(s.get(4..6).unwrap_or("00"), 16).unwrap_or(0);
        Self { r, g, b, a: 1.0 }
    }

    pub const fn with_alpha(mut self, a: f64) -> Self {
        self.a = a;
        self
    }

    fn svg(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Fill + stroke style for shapes.
#[derive(Debug, Clone, Default)]
pub struct Style {
    pub fill: Option<Color>,
    pub stroke: Option<Color>,
    pub stroke_width: f64,
}

impl Style {
    pub fn filled(color: Color) -> Self {
        Self {
            fill: Some(color),
            ..Self::default()
        }
    }

    pub fn stroked(color: Color, width: f64) -> Self {
        Self {
            stroke: Some(color),
            stroke_width: width,
            ..Self::default()
        }
    }

    pub fn fill_stroke(fill: Color, stroke: Color, width: f64) -> Self {
        Self {
            fill: Some(fill),
            stroke: Some(stroke),
            stroke_width: width,
        }
    }

    fn svg_attrs(&self) -> String {
        let mut out = String::new();
        match self.fill {
            Some(color) => {
                let _ = write!(out, " fill=\"{}\"", color.svg());
                if color.a < 1.0 {
                    let _ = write!(out, " fill-opacity=\"{}\"", color.a);
                }
            }
            None => out.push_str(" fill=\"none\""),
        }
        if let Some(color) = self.stroke {
            let _ = write!(
                out,
                " stroke=\"{}\" stroke-width=\"{}\"",
                color.svg(),
                self.stroke_width
            );
            if color.a < 1.0 {
                let _ = write!(out, " stroke-opacity=\"{}\"", color.a);
            }
        }
        out
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontWeight {
    Regular,
    Bold,
}

impl FontWeight {
    fn as_str(&self) -> &'static str {
        match self {
            FontWeight::Regular => "normal",
            FontWeight::Bold => "bold",
        }
    }
}

#[derive(Debug, Clone)]
enum SvgElement {
    Rect {
        x: f64,
        y: f64,
        w: f64,
        h: f64,
        style: Style,
    },
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        color: Color,
        width: f64,
    },
    Circle {
        cx: f64,
        cy: f64,
        r: f64,
        style: Style,
    },
    Polyline {
        points: Vec<(f64, f64)>,
        color: Color,
        width: f64,
    },
    Polygon {
        points: Vec<(f64, f64)>,
        style: Style,
    },
    Text {
        x: f64,
        y: f64,
        content: String,
        size: f64,
        color: Color,
        weight: FontWeight,
    },
    Image {
        x: f64,
        y: f64,
        w: f64,
        h: f64,
        href: String,
    },
}

/// Deferred-rendering canvas; elements draw in insertion order.
pub struct Canvas {
    pub width: f64,
    pub height: f64,
    elements: Vec<SvgElement>,
}

impl Canvas {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            elements: Vec::new(),
        }
    }

    pub fn rect(&mut self, x: f64, y: f64, w: f64, h: f64, style: Style) {
        self.elements.push(SvgElement::Rect { x, y, w, h, style });
    }

    pub fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, color: Color, width: f64) {
        self.elements.push(SvgElement::Line {
            x1,
            y1,
            x2,
            y2,
            color,
            width,
        });
    }

    pub fn circle(&mut self, cx: f64, cy: f64, r: f64, style: Style) {
        self.elements.push(SvgElement::Circle { cx, cy, r, style });
    }

    pub fn polyline(&mut self, points: Vec<(f64, f64)>, color: Color, width: f64) {
        self.elements.push(SvgElement::Polyline {
            points,
            color,
            width,
        });
    }

    pub fn polygon(&mut self, points: Vec<(f64, f64)>, style: Style) {
        self.elements.push(SvgElement::Polygon { points, style });
    }

    pub fn text(
        &mut self,
        x: f64,
        y: f64,
        content: impl Into<String>,
        size: f64,
        color: Color,
        weight: FontWeight,
    ) {
        self.elements.push(SvgElement::Text {
            x,
            y,
            content: content.into(),
            size,
            color,
            weight,
        });
    }

    pub fn image(&mut self, x: f64, y: f64, w: f64, h: f64, href: String) {
        self.elements.push(SvgElement::Image { x, y, w, h, href });
    }

    pub fn to_svg(&self) -> String {
        let mut out = format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" xmlns:xlink=\"http://www.w3.org/1999/xlink\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">\n",
            w = self.width,
            h = self.height,
        );
        for element in &self.elements {
            render_element(&mut out, element);
        }
        out.push_str("</svg>\n");
        out
    }
}

fn render_element(out: &mut String, element: &SvgElement) {
    match element {
        SvgElement::Rect { x, y, w, h, style } => {
            let _ = writeln!(
                out,
                "<rect x=\"{x}\" y=\"{y}\" width=\"{w}\" height=\"{h}\"{}/>",
                style.svg_attrs()
            );
        }
        SvgElement::Line {
            x1,
            y1,
            x2,
            y2,
            color,
            width,
        } => {
            let _ = writeln!(
                out,
                "<line x1=\"{x1}\" y1=\"{y1}\" x2=\"{x2}\" y2=\"{y2}\" stroke=\"{}\" stroke-width=\"{width}\"/>",
                color.svg()
            );
        }
        SvgElement::Circle { cx, cy, r, style } => {
            let _ = writeln!(
                out,
                "<circle cx=\"{cx}\" cy=\"{cy}\" r=\"{r}\"{}/>",
                style.svg_attrs()
            );
        }
        SvgElement::Polyline {
            points,
            color,
            width,
        } => {
            let _ = writeln!(
                out,
                "<polyline points=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{width}\"/>",
                points_attr(points),
                color.svg()
            );
        }
        SvgElement::Polygon { points, style } => {
            let _ = writeln!(
                out,
                "<polygon points=\"{}\"{}/>",
                points_attr(points),
                style.svg_attrs()
            );
        }
        SvgElement::Text {
            x,
            y,
            content,
            size,
            color,
            weight,
        } => {
            let _ = writeln!(
                out,
                "<text x=\"{x}\" y=\"{y}\" font-family=\"sans-serif\" font-size=\"{size}\" font-weight=\"{}\" fill=\"{}\">{}</text>",
                weight.as_str(),
                color.svg(),
                escape_text(content)
            );
        }
        SvgElement::Image { x, y, w, h, href } => {
            let _ = writeln!(
                out,
                "<image x=\"{x}\" y=\"{y}\" width=\"{w}\" height=\"{h}\" xlink:href=\"{href}\"/>"
            );
        }
    }
}

fn points_attr(points: &[(f64, f64)]) -> String {
    let mut out = String::with_capacity(points.len() * 12);
    for (idx, (x, y)) in points.iter().enumerate() {
        if idx > 0 {
            out.push(' ');
        }
        let _ = write!(out, "{x:.2},{y:.2}");
    }
    out
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Sample an arc (degrees, counter-clockwise from `start_deg` to `end_deg`)
/// into points in the caller's coordinate space.
pub fn arc_points(cx: f64, cy: f64, r: f64, start_deg: f64, end_deg: f64) -> Vec<(f64, f64)> {
    let mut end = end_deg;
    if end <= start_deg {
        end += 360.0;
    }
    let sweep = end - start_deg;
    let steps = (sweep / 2.0).ceil().max(2.0) as usize;
    (0..=steps)
        .map(|step| {
            let theta = (start_deg + sweep * step as f64 / steps as f64).to_radians();
            (cx + r * theta.cos(), cy + r * theta.sin())
        })
        .collect()
}
