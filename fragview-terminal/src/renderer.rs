/// ASCII rasterizer painting fragments into terminal cells
use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use fragview_core::{
    geometry::Finite, Fragment, FragmentKind, LineProp, MarkerPath, PaintSurface, PathParams, SurfaceProp,
};
use nalgebra::{Point2, Point3, Vector2};
use std::io::Write;

/// Character luminosity ramp for shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &['.', ':', '-', '=', '+', '*', '#', '%', '@'];

const SURFACE_COLORS: &[Color] = &[Color::Cyan, Color::Green, Color::Blue, Color::Magenta];
const LINE_COLORS: &[Color] = &[Color::White, Color::Grey, Color::Yellow, Color::Red];

// Lines and markers sit slightly in front of surfaces at the same depth
const LINE_DEPTH_BIAS: f64 = 1e-3;

/// Light direction in screen space (toward the viewer, slightly from above)
const LIGHT: [f64; 3] = [0.0, -0.4, 1.0];

/// Depth-buffered character canvas. Larger depth is nearer.
///
/// Also acts as the [`PaintSurface`] handed to text and label callbacks;
/// callback text is written on top of everything else.
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    depth_buffer: Vec<f64>,
    char_buffer: Vec<char>,
    color_buffer: Vec<Color>,
    offset: Vector2<f64>,
    saved: Vec<Vector2<f64>>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            depth_buffer: vec![f64::NEG_INFINITY; size],
            char_buffer: vec![' '; size],
            color_buffer: vec![Color::Reset; size],
            offset: Vector2::zeros(),
            saved: Vec::new(),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn clear(&mut self) {
        self.depth_buffer.fill(f64::NEG_INFINITY);
        self.char_buffer.fill(' ');
        self.color_buffer.fill(Color::Reset);
        self.offset = Vector2::zeros();
        self.saved.clear();
    }

    /// Character at a cell, mostly for inspection
    pub fn cell(&self, x: usize, y: usize) -> Option<char> {
        (x < self.width && y < self.height).then(|| self.char_buffer[y * self.width + x])
    }

    /// Paint geometry first, then run path callbacks so their text lands on
    /// top.
    pub fn paint(&mut self, fragments: &[Fragment<'_>]) {
        let mut callbacks = Vec::new();
        for frag in fragments {
            if !frag.used_points().iter().all(|p| p.all_finite()) {
                continue;
            }
            match frag.kind {
                FragmentKind::Triangle => self.paint_triangle(frag),
                FragmentKind::LineSegment => {
                    let color = line_color(frag.line);
                    self.paint_line(&frag.points[0], &frag.points[1], None, color);
                }
                FragmentKind::Path => match frag.params {
                    Some(PathParams::Marker { path, .. }) => self.paint_marker(frag, path),
                    Some(PathParams::Callback(_)) => callbacks.push(frag),
                    None => {}
                },
            }
        }

        for frag in callbacks {
            if let Some(PathParams::Callback(cb)) = frag.params {
                let pt1 = Point2::new(frag.points[0].x, frag.points[0].y);
                let pt2 = Point2::new(frag.points[1].x, frag.points[1].y);
                cb.call(self, pt1, pt2, frag.index, frag.path_size, 1.0);
            }
        }
    }

    fn paint_triangle(&mut self, frag: &Fragment<'_>) {
        let [v0, v1, v2] = frag.points;

        // Shade from the screen-space normal; either winding is lit.
        let normal = (v1 - v0).cross(&(v2 - v0));
        let light = nalgebra::Vector3::from(LIGHT).normalize();
        let brightness = if normal.norm() > 0.0 {
            normal.normalize().dot(&light).abs()
        } else {
            0.0
        };
        let char_index = (brightness * (LUMINOSITY_RAMP.len() - 1) as f64) as usize;
        let character = LUMINOSITY_RAMP[char_index.min(LUMINOSITY_RAMP.len() - 1)];
        let color = surface_color(frag.surface);

        self.rasterize_triangle(&[v0, v1, v2], character, color);
    }

    fn rasterize_triangle(&mut self, coords: &[Point3<f64>; 3], character: char, color: Color) {
        let [v0, v1, v2] = coords;

        // Bounding box, clipped to the screen
        let min_x = (v0.x.min(v1.x).min(v2.x).floor() as i64).max(0);
        let max_x = (v0.x.max(v1.x).max(v2.x).ceil() as i64).min(self.width as i64 - 1);
        let min_y = (v0.y.min(v1.y).min(v2.y).floor() as i64).max(0);
        let max_y = (v0.y.max(v1.y).max(v2.y).ceil() as i64).min(self.height as i64 - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let p = Point2::new(x as f64 + 0.5, y as f64 + 0.5);
                if let Some((w0, w1, w2)) = barycentric(v0, v1, v2, &p) {
                    if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                        let depth = w0 * v0.z + w1 * v1.z + w2 * v2.z;
                        self.plot(x, y, depth, character, color);
                    }
                }
            }
        }
    }

    /// DDA line. Without an explicit glyph the slope picks one.
    fn paint_line(&mut self, p0: &Point3<f64>, p1: &Point3<f64>, glyph: Option<char>, color: Color) {
        let (dx, dy) = (p1.x - p0.x, p1.y - p0.y);
        let character = glyph.unwrap_or_else(|| slope_glyph(dx, dy));

        // Skip lines far too long to be on screen
        let steps = dx.abs().max(dy.abs()).ceil();
        if steps > 4.0 * (self.width + self.height) as f64 {
            return;
        }
        let steps = steps.max(1.0) as i64;

        for i in 0..=steps {
            let t = i as f64 / steps as f64;
            let x = (p0.x + dx * t).floor() as i64;
            let y = (p0.y + dy * t).floor() as i64;
            let depth = p0.z + (p1.z - p0.z) * t + LINE_DEPTH_BIAS;
            self.plot(x, y, depth, character, color);
        }
    }

    fn paint_marker(&mut self, frag: &Fragment<'_>, path: &MarkerPath) {
        let centre = frag.points[0];
        let color = match (frag.line, frag.surface) {
            (Some(line), _) => line_color(Some(line)),
            (None, Some(surface)) => surface_color(Some(surface)),
            (None, None) => return,
        };

        // Terminal cells are about twice as tall as wide
        let scale = Vector2::new(frag.path_size * 2.0, frag.path_size);
        if frag.path_size < 1.0 || path.vertices.len() < 2 {
            self.plot(
                centre.x.floor() as i64,
                centre.y.floor() as i64,
                centre.z + LINE_DEPTH_BIAS,
                'o',
                color,
            );
            return;
        }

        let corner = |v: &Point2<f64>| {
            Point3::new(centre.x + v.x * scale.x, centre.y + v.y * scale.y, centre.z)
        };
        let outline: Vec<Point3<f64>> = path.vertices.iter().map(corner).collect();
        let edges = if path.closed { outline.len() } else { outline.len() - 1 };
        for i in 0..edges {
            let (a, b) = (outline[i], outline[(i + 1) % outline.len()]);
            self.paint_line(&a, &b, Some('o'), color);
        }
    }

    fn plot(&mut self, x: i64, y: i64, depth: f64, character: char, color: Color) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        let idx = y as usize * self.width + x as usize;
        if depth > self.depth_buffer[idx] {
            self.depth_buffer[idx] = depth;
            self.char_buffer[idx] = character;
            self.color_buffer[idx] = color;
        }
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for y in 0..self.height {
            for x in 0..self.width {
                let idx = y * self.width + x;
                writer.queue(SetForegroundColor(self.color_buffer[idx]))?;
                writer.queue(Print(self.char_buffer[idx]))?;
            }
            if y + 1 < self.height {
                writer.queue(Print("\r\n"))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

impl PaintSurface for AsciiRenderer {
    fn save(&mut self) {
        self.saved.push(self.offset);
    }

    fn restore(&mut self) {
        if let Some(offset) = self.saved.pop() {
            self.offset = offset;
        }
    }

    fn translate(&mut self, offset: Vector2<f64>) {
        self.offset += offset;
    }

    fn draw_text(&mut self, anchor: Point2<f64>, text: &str) {
        let at = anchor + self.offset;
        let y = at.y.floor() as i64;
        let x0 = at.x.floor() as i64;
        for (i, c) in text.chars().enumerate() {
            self.plot(x0 + i as i64, y, f64::INFINITY, c, Color::Yellow);
        }
    }
}

fn surface_color(surface: Option<SurfaceProp>) -> Color {
    let idx = surface.map_or(0, |s| s.0 as usize);
    SURFACE_COLORS[idx % SURFACE_COLORS.len()]
}

fn line_color(line: Option<LineProp>) -> Color {
    let idx = line.map_or(0, |l| l.0 as usize);
    LINE_COLORS[idx % LINE_COLORS.len()]
}

// Screen y grows downward, so a positive dy/dx leans like a backslash.
fn slope_glyph(dx: f64, dy: f64) -> char {
    // cells are about twice as tall as wide
    let (ax, ay) = (dx.abs(), dy.abs() * 2.0);
    if ay < ax * 0.5 {
        '-'
    } else if ax < ay * 0.5 {
        '|'
    } else if (dx > 0.0) == (dy > 0.0) {
        '\\'
    } else {
        '/'
    }
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: &Point3<f64>,
    v1: &Point3<f64>,
    v2: &Point3<f64>,
    p: &Point2<f64>,
) -> Option<(f64, f64, f64)> {
    let denom = (v1.y - v2.y) * (v0.x - v2.x) + (v2.x - v1.x) * (v0.y - v2.y);

    if denom.abs() < 1e-9 {
        return None;
    }

    let w0 = ((v1.y - v2.y) * (p.x - v2.x) + (v2.x - v1.x) * (p.y - v2.y)) / denom;
    let w1 = ((v2.y - v0.y) * (p.x - v2.x) + (v0.x - v2.x) * (p.y - v2.y)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}
