//! Paint-surface capability and the callbacks carried by path fragments
//!
//! Nothing here paints pixels. A downstream rasterizer implements
//! [`PaintSurface`] and, for every path fragment whose params hold a
//! callback, hands itself to [`PathCallback::call`].
use nalgebra::{Point2, Vector2};
use std::ops::{Deref, DerefMut};

/// The drawing operations label and text callbacks may use.
pub trait PaintSurface {
    /// Push the current transform state.
    fn save(&mut self);
    /// Pop back to the most recently saved transform state.
    fn restore(&mut self);
    /// Offset subsequent drawing by `offset`.
    fn translate(&mut self, offset: Vector2<f64>);
    /// Draw `text` with its anchor at `anchor` in the current transform.
    fn draw_text(&mut self, anchor: Point2<f64>, text: &str);
}

/// Saves the surface state on creation and restores it when dropped, so the
/// state is restored identically on every exit path of a callback.
pub struct SurfaceGuard<'s> {
    surface: &'s mut dyn PaintSurface,
}

impl<'s> SurfaceGuard<'s> {
    pub fn new(surface: &'s mut dyn PaintSurface) -> Self {
        surface.save();
        Self { surface }
    }
}

impl<'s> Deref for SurfaceGuard<'s> {
    type Target = dyn PaintSurface + 's;

    fn deref(&self) -> &Self::Target {
        &*self.surface
    }
}

impl<'s> DerefMut for SurfaceGuard<'s> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.surface
    }
}

impl Drop for SurfaceGuard<'_> {
    fn drop(&mut self) {
        self.surface.restore();
    }
}

/// Per-item draw callback invoked by the rasterizer for path fragments.
///
/// `pt1` is the projected anchor, `pt2` a second projected point giving the
/// local orientation, `index` the fragment's index.
pub trait PathCallback: Send + Sync {
    fn call(
        &self,
        surface: &mut dyn PaintSurface,
        pt1: Point2<f64>,
        pt2: Point2<f64>,
        index: usize,
        scale: f64,
        line_scale: f64,
    );
}

/// Strategy drawing one item of a [`Text`](crate::text::Text) object.
pub trait TextDraw: Send + Sync {
    fn draw(
        &self,
        surface: &mut dyn PaintSurface,
        pt1: Point2<f64>,
        pt2: Point2<f64>,
        index: usize,
        scale: f64,
        line_scale: f64,
    );
}

/// Strategy drawing one tick label of an
/// [`AxisTickLabels`](crate::axis_labels::AxisTickLabels) object. The surface
/// is already translated to the tick's anchor.
pub trait LabelDraw: Send + Sync {
    fn draw_label(&self, surface: &mut dyn PaintSurface, index: usize, align_horz: i32, align_vert: i32);
}

/// Outline used to draw point markers, in marker units centred on the point
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerPath {
    pub vertices: Vec<Point2<f64>>,
    pub closed: bool,
}

impl MarkerPath {
    pub fn new(vertices: Vec<Point2<f64>>, closed: bool) -> Self {
        Self { vertices, closed }
    }

    pub fn square() -> Self {
        Self::new(
            vec![
                Point2::new(-0.5, -0.5),
                Point2::new(0.5, -0.5),
                Point2::new(0.5, 0.5),
                Point2::new(-0.5, 0.5),
            ],
            true,
        )
    }

    pub fn diamond() -> Self {
        Self::new(
            vec![
                Point2::new(0.0, -0.5),
                Point2::new(0.5, 0.0),
                Point2::new(0.0, 0.5),
                Point2::new(-0.5, 0.0),
            ],
            true,
        )
    }
}
