//! Demo scene: a function surface inside a labelled box
use fragview_core::{
    sample_grid, AxisTickLabels, DataMesh, FacingContainer, HeightAxis, LabelDraw, LineProp, MarkerPath, Mesh,
    Object, ObjectContainer, PaintSurface, Points, PolyLine, SurfaceProp, Text, TextDraw,
};
use nalgebra::{Matrix4, Point2, Point3, Vector3};

use crate::config::{SurfaceKind, ViewerConfig};

const WALL_LINE: LineProp = LineProp(1);
const SURFACE: SurfaceProp = SurfaceProp(0);
const SURFACE_LINE: LineProp = LineProp(0);
const HELIX_LINE: LineProp = LineProp(2);
const MARKER_LINE: LineProp = LineProp(3);

const WALL_STEPS: usize = 5;
const TICKS: [f64; 5] = [-1.0, -0.5, 0.0, 0.5, 1.0];

fn surface_fn(a: f64, b: f64) -> f64 {
    0.6 * (2.0 * a).sin() * (2.0 * b).cos()
}

fn linspace(lo: f64, hi: f64, n: usize) -> Vec<f64> {
    let step = (hi - lo) / (n.max(2) - 1) as f64;
    (0..n).map(|i| lo + step * i as f64).collect()
}

/// Draws tick values, centred on the anchor
struct TickLabels(Vec<String>);

impl LabelDraw for TickLabels {
    fn draw_label(&self, surface: &mut dyn PaintSurface, index: usize, _align_horz: i32, _align_vert: i32) {
        if let Some(label) = self.0.get(index) {
            let half = label.chars().count() as f64 / 2.0;
            surface.draw_text(Point2::new(-half, 1.0), label);
        }
    }
}

struct Title(String);

impl TextDraw for Title {
    fn draw(
        &self,
        surface: &mut dyn PaintSurface,
        pt1: Point2<f64>,
        _pt2: Point2<f64>,
        _index: usize,
        _scale: f64,
        _line_scale: f64,
    ) {
        let half = self.0.chars().count() as f64 / 2.0;
        surface.draw_text(Point2::new(pt1.x - half, pt1.y), &self.0);
    }
}

/// Grid lines on each face of the [-1, 1] box, shown only while the face is
/// behind the data.
fn back_walls() -> Vec<FacingContainer> {
    let grid = linspace(-1.0, 1.0, WALL_STEPS);
    let mut walls = Vec::new();
    for axis in [HeightAxis::X, HeightAxis::Y, HeightAxis::Z] {
        let (slot, _, _) = axis.slots();
        for side in [-1.0, 1.0] {
            // inward normal
            let mut normal = Vector3::zeros();
            normal[slot] = -side;

            let mut wall = FacingContainer::new(normal, Matrix4::identity());
            wall.add_object(Mesh::new(
                grid.clone(),
                grid.clone(),
                vec![side; WALL_STEPS * WALL_STEPS],
                axis,
                Some(WALL_LINE),
                None,
            ));
            walls.push(wall);
        }
    }
    walls
}

fn function_surface(config: &ViewerConfig) -> Object {
    let line = config.wireframe.then_some(SURFACE_LINE);
    let steps = config.surface_steps;
    match config.surface {
        SurfaceKind::Mesh => {
            let (pos1, pos2, heights) = sample_grid(surface_fn, (-1.0, 1.0), (-1.0, 1.0), steps);
            // heights along y, pos1 along z, pos2 along x
            Mesh::new(pos1, pos2, heights, HeightAxis::Y, line, Some(SURFACE)).into()
        }
        SurfaceKind::DataMesh => {
            let edges = linspace(-1.0, 1.0, steps + 1);
            let centres: Vec<f64> = edges.windows(2).map(|w| 0.5 * (w[0] + w[1])).collect();
            let vals = centres
                .iter()
                .flat_map(|&a| centres.iter().map(move |&b| surface_fn(a, b)))
                .collect();
            // value along y, edges1 along z, edges2 along x
            DataMesh::new(edges.clone(), edges, vals, 1, 2, 0, config.high_res, line, Some(SURFACE)).into()
        }
    }
}

fn helix() -> PolyLine {
    let n = 120;
    let t: Vec<f64> = (0..n).map(|i| i as f64 * 0.15).collect();
    let xs: Vec<f64> = t.iter().map(|t| 0.8 * t.cos()).collect();
    let ys: Vec<f64> = (0..n).map(|i| -1.0 + 2.0 * i as f64 / (n - 1) as f64).collect();
    let zs: Vec<f64> = t.iter().map(|t| 0.8 * t.sin()).collect();

    let mut line = PolyLine::new(Some(HELIX_LINE));
    line.add_points(&xs, &ys, &zs);
    line
}

fn scatter() -> Points {
    let n = 12;
    let angle = |i: usize| i as f64 * std::f64::consts::TAU / n as f64;
    let xs = (0..n).map(|i| 0.5 * angle(i).cos()).collect();
    let ys = vec![0.9; n];
    let zs = (0..n).map(|i| 0.5 * angle(i).sin()).collect();
    Points::new(xs, ys, zs, MarkerPath::diamond(), None, Some(MARKER_LINE))
}

fn x_axis_labels() -> AxisTickLabels {
    let fracs = TICKS.iter().map(|t| (t + 1.0) / 2.0).collect();
    let labels = TickLabels(TICKS.iter().map(|t| format!("{t}")).collect());
    let mut axis = AxisTickLabels::new(Point3::new(-1.0, -1.0, -1.0), Point3::new(1.0, 1.0, 1.0), fracs, labels);
    for y in [-1.0, 1.0] {
        for z in [-1.0, 1.0] {
            axis.add_axis_choice(Point3::new(-1.0, y, z), Point3::new(1.0, y, z));
        }
    }
    axis
}

/// Build the demo scene described by `config`
pub fn build_scene(config: &ViewerConfig) -> ObjectContainer {
    let mut root = ObjectContainer::default();
    for wall in back_walls() {
        root.add_object(wall);
    }
    root.add_object(function_surface(config));
    root.add_object(helix());
    root.add_object(scatter());
    root.add_object(x_axis_labels());
    root.add_object(Text::new(
        vec![0.0, 1.4, 0.0],
        vec![0.1, 1.4, 0.0],
        Title("fragview".to_string()),
    ));

    log::debug!("demo scene with {} objects", root.len());
    root
}
