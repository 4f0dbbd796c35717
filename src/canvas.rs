// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::rc::Rc;

use rgb::FromSlice;

use crate::error::Error;
use crate::geom::{BBox, IntRegion};
use crate::gradient::Gradient;
use crate::path::Path;
use crate::surface::{self, Surface};
use crate::Image;

/// How far curve flattening may deviate, in fractions of a pixel.
/// Matches the quality of the anti-aliased rasterizer underneath.
const APPROXIMATION_SCALE: f32 = 10.0;

/// Zero-length dashes and gaps are clamped to this value.
const DASH_EPSILON: f32 = 1e-2;

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum FillRule {
    NonZero,
    EvenOdd,
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum LineCap {
    Butt,
    Round,
    Square,
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum LineJoin {
    Miter,
    Round,
    Bevel,
}

enum Source {
    Color(tiny_skia::Color),
    Gradient(Rc<Gradient>),
}

struct Context {
    matrix: tiny_skia::Transform,
    source: Source,
    fill_rule: FillRule,
    line_width: f32,
    line_cap: LineCap,
    line_join: LineJoin,
    dash_array: Vec<f32>,
    dash_offset: f32,
}

impl Default for Context {
    fn default() -> Self {
        Context {
            matrix: tiny_skia::Transform::identity(),
            source: Source::Color(tiny_skia::Color::TRANSPARENT),
            fill_rule: FillRule::NonZero,
            line_width: 1.0,
            line_cap: LineCap::Butt,
            line_join: LineJoin::Miter,
            dash_array: Vec::new(),
            dash_offset: 0.0,
        }
    }
}

/// A stateful drawing surface.
///
/// Owns a stack of full-size drawing groups; the bottom group is the
/// final output. Maintains a current path, an affine transform and the
/// active paint state. Rasterization is delegated to `tiny_skia`.
pub struct Canvas {
    width: u32,
    height: u32,
    groups: Vec<tiny_skia::Pixmap>,
    path: Path,
    context: Context,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Result<Self, Error> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidArgument(format!(
                "zero canvas size: {}x{}",
                width, height
            )));
        }

        let group = tiny_skia::Pixmap::new(width, height).ok_or(Error::OutOfMemory)?;

        Ok(Canvas {
            width,
            height,
            groups: vec![group],
            path: Path::new(),
            context: Context::default(),
        })
    }

    // transform

    pub fn transform(&mut self, ts: tiny_skia::Transform) {
        self.context.matrix = self.context.matrix.pre_concat(ts);
    }

    pub fn translate(&mut self, x: f32, y: f32) {
        self.context.matrix = self.context.matrix.pre_translate(x, y);
    }

    pub fn rotate(&mut self, radians: f32) {
        self.transform(tiny_skia::Transform::from_rotate(radians.to_degrees()));
    }

    /// A non-invertible scale is ignored, to stay compatible with SVG
    /// content that scales by zero.
    pub fn scale(&mut self, x: f32, y: f32) {
        if x * y == 0.0 {
            log::warn!("non-invertible scaling ({}, {}) ignored", x, y);
            return;
        }
        self.context.matrix = self.context.matrix.pre_scale(x, y);
    }

    pub fn get_matrix(&self) -> tiny_skia::Transform {
        self.context.matrix
    }

    pub fn set_matrix(&mut self, m: tiny_skia::Transform) {
        self.context.matrix = m;
    }

    /// Maps a point from user space to device space.
    pub fn matrix_mul(&self, x: f32, y: f32) -> (f32, f32) {
        let m = &self.context.matrix;
        (m.sx * x + m.kx * y + m.tx, m.ky * x + m.sy * y + m.ty)
    }

    /// Maps a distance vector from user space to device space,
    /// ignoring the translation part.
    pub fn matrix_mul_distance(&self, x: f32, y: f32) -> (f32, f32) {
        let m = &self.context.matrix;
        (m.sx * x + m.kx * y, m.ky * x + m.sy * y)
    }

    // path construction

    pub fn move_abs(&mut self, x: f32, y: f32) {
        self.path.move_abs(x, y);
    }

    pub fn move_rel(&mut self, dx: f32, dy: f32) {
        self.path.move_rel(dx, dy);
    }

    pub fn line_abs(&mut self, x: f32, y: f32) {
        self.path.line_abs(x, y);
    }

    pub fn line_rel(&mut self, dx: f32, dy: f32) {
        self.path.line_rel(dx, dy);
    }

    pub fn quadratic_curve_abs(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        self.path.quadratic_abs(x1, y1, x, y);
    }

    pub fn quadratic_curve_rel(&mut self, dx1: f32, dy1: f32, dx: f32, dy: f32) {
        self.path.quadratic_rel(dx1, dy1, dx, dy);
    }

    pub fn cubic_curve_abs(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        self.path.cubic_abs(x1, y1, x2, y2, x, y);
    }

    pub fn cubic_curve_rel(&mut self, dx1: f32, dy1: f32, dx2: f32, dy2: f32, dx: f32, dy: f32) {
        self.path.cubic_rel(dx1, dy1, dx2, dy2, dx, dy);
    }

    pub fn arc_abs(
        &mut self,
        x: f32,
        y: f32,
        rx: f32,
        ry: f32,
        x_axis_rotation: f32,
        large_arc: bool,
        sweep: bool,
    ) {
        self.path
            .arc_abs(x, y, rx, ry, x_axis_rotation, large_arc, sweep);
    }

    pub fn arc_rel(
        &mut self,
        dx: f32,
        dy: f32,
        rx: f32,
        ry: f32,
        x_axis_rotation: f32,
        large_arc: bool,
        sweep: bool,
    ) {
        self.path
            .arc_rel(dx, dy, rx, ry, x_axis_rotation, large_arc, sweep);
    }

    pub fn arc_center_abs(
        &mut self,
        center: (f32, f32),
        radii: (f32, f32),
        start_angle: f32,
        sweep_angle: f32,
    ) {
        self.path
            .arc_center_abs(center, radii, start_angle, sweep_angle);
    }

    pub fn close_path(&mut self) {
        self.path.close();
    }

    pub fn clear_path(&mut self) {
        self.path.clear();
    }

    pub fn rectangle(&mut self, x: f32, y: f32, w: f32, h: f32, rx: f32, ry: f32) {
        self.path.rectangle(x, y, w, h, rx, ry);
    }

    pub fn circle(&mut self, cx: f32, cy: f32, r: f32) {
        self.path.circle(cx, cy, r);
    }

    pub fn get_current_point(&self) -> (f32, f32) {
        self.path.current_point().unwrap_or((0.0, 0.0))
    }

    /// The tight box of the current path in user space, exclusive of
    /// stroke width, clipping and filters.
    pub fn get_shape_bounding_box(&self) -> BBox {
        self.path.bounds()
    }

    // paint state

    pub fn set_fill_rule(&mut self, rule: FillRule) {
        self.context.fill_rule = rule;
    }

    pub fn set_source_color(&mut self, color: tiny_skia::Color) {
        self.context.source = Source::Color(color);
    }

    /// The gradient is shared: it stays alive as the canvas paint source
    /// even after the caller drops its own reference.
    pub fn set_source_gradient(&mut self, gradient: Rc<Gradient>) {
        self.context.source = Source::Gradient(gradient);
    }

    pub fn set_line_width(&mut self, width: f32) {
        self.context.line_width = width;
    }

    pub fn set_line_cap(&mut self, cap: LineCap) {
        self.context.line_cap = cap;
    }

    pub fn set_line_join(&mut self, join: LineJoin) {
        self.context.line_join = join;
    }

    /// Sets the stroke dash pattern.
    ///
    /// An empty `dashes` disables dashing. An odd-length array is treated
    /// as itself repeated twice. Zero lengths are clamped to a small
    /// epsilon. Negative lengths are a caller error.
    /// The offset may be negative, which wraps around the pattern length.
    pub fn set_dash_pattern(&mut self, dashes: &[f32], offset: f32) -> Result<(), Error> {
        if dashes.iter().any(|v| *v < 0.0) {
            return Err(Error::InvalidArgument(
                "negative dash length".to_string(),
            ));
        }

        self.context.dash_array.clear();
        self.context.dash_offset = offset;
        if dashes.is_empty() {
            return Ok(());
        }

        let repeats = if dashes.len() % 2 == 1 { 2 } else { 1 };
        for _ in 0..repeats {
            for v in dashes {
                self.context
                    .dash_array
                    .push(if *v == 0.0 { DASH_EPSILON } else { *v });
            }
        }

        Ok(())
    }

    // rendering

    fn make_paint(&self) -> Option<tiny_skia::Paint<'static>> {
        let mut paint = tiny_skia::Paint::default();
        paint.anti_alias = true;

        match self.context.source {
            Source::Color(color) => paint.set_color(color),
            Source::Gradient(ref gradient) => {
                paint.shader = gradient.to_shader(self.context.matrix)?;
            }
        }

        Some(paint)
    }

    /// Fills the current path with the active source. The path is kept.
    pub fn fill(&mut self) {
        let skia_path = match self.path.to_skia_path() {
            Some(v) => v,
            None => return,
        };
        let paint = match self.make_paint() {
            Some(v) => v,
            None => return,
        };

        let rule = match self.context.fill_rule {
            FillRule::NonZero => tiny_skia::FillRule::Winding,
            FillRule::EvenOdd => tiny_skia::FillRule::EvenOdd,
        };

        self.groups.last_mut().unwrap().as_mut().fill_path(
            &skia_path,
            &paint,
            rule,
            self.context.matrix,
            None,
        );
    }

    /// Strokes the current path with the active source, width, caps,
    /// joins and dash pattern. The path is kept.
    pub fn stroke(&mut self) {
        if self.context.line_width <= 0.0 {
            return;
        }

        let polyline = self.path.flatten(APPROXIMATION_SCALE);
        let skia_path = if self.context.dash_array.is_empty() {
            polyline.to_skia_path()
        } else {
            polyline
                .dash(&self.context.dash_array, self.context.dash_offset)
                .to_skia_path()
        };

        let skia_path = match skia_path {
            Some(v) => v,
            None => return,
        };
        let paint = match self.make_paint() {
            Some(v) => v,
            None => return,
        };

        let stroke = tiny_skia::Stroke {
            width: self.context.line_width,
            miter_limit: 4.0,
            line_cap: match self.context.line_cap {
                LineCap::Butt => tiny_skia::LineCap::Butt,
                LineCap::Round => tiny_skia::LineCap::Round,
                LineCap::Square => tiny_skia::LineCap::Square,
            },
            line_join: match self.context.line_join {
                LineJoin::Miter => tiny_skia::LineJoin::Miter,
                LineJoin::Round => tiny_skia::LineJoin::Round,
                LineJoin::Bevel => tiny_skia::LineJoin::Bevel,
            },
            dash: None,
        };

        self.groups.last_mut().unwrap().as_mut().stroke_path(
            &skia_path,
            &paint,
            &stroke,
            self.context.matrix,
            None,
        );
    }

    // groups

    pub fn group_level(&self) -> usize {
        self.groups.len()
    }

    /// Allocates a zeroed group surface and makes it the drawing target.
    pub fn push_group(&mut self) -> Result<(), Error> {
        let group = tiny_skia::Pixmap::new(self.width, self.height).ok_or(Error::OutOfMemory)?;
        self.groups.push(group);
        Ok(())
    }

    /// Blends the top group into the group beneath it with the given
    /// opacity and discards it.
    pub fn pop_group(&mut self, opacity: f32) -> Result<(), Error> {
        if self.groups.len() < 2 {
            return Err(Error::Internal("group stack underflow"));
        }

        let top = self.groups.pop().unwrap();
        let paint = tiny_skia::PixmapPaint {
            opacity,
            blend_mode: tiny_skia::BlendMode::SourceOver,
            quality: tiny_skia::FilterQuality::Nearest,
        };

        self.groups.last_mut().unwrap().as_mut().draw_pixmap(
            0,
            0,
            top.as_ref(),
            &paint,
            tiny_skia::Transform::identity(),
            None,
        );

        Ok(())
    }

    /// Interprets the top group as a luminance mask for the group right
    /// beneath it: multiplies that group by the mask, discards the mask
    /// and then pops the masked group normally.
    pub fn pop_mask_and_group(&mut self) -> Result<(), Error> {
        if self.groups.len() < 3 {
            return Err(Error::Internal("group stack underflow"));
        }

        let mask = self.groups.pop().unwrap();
        surface::apply_luminance_mask(self.groups.last_mut().unwrap(), &mask);

        self.pop_group(1.0)
    }

    /// A copy of the top group restricted to `region`.
    pub fn sub_surface(&self, region: IntRegion) -> Option<Surface> {
        self.group_sub_surface(self.groups.len() - 1, region)
    }

    /// A copy of an arbitrary group restricted to `region`.
    ///
    /// Used by filters to read the background group.
    pub fn group_sub_surface(&self, level: usize, region: IntRegion) -> Option<Surface> {
        let group = self.groups.get(level)?;
        let surface = Surface {
            x: 0,
            y: 0,
            pixmap: group.clone(),
        };

        surface.intersection(region.intersection(IntRegion::from_dims(self.width, self.height)))
    }

    /// Copies a filter result back into the top group, replacing pixels.
    pub fn blit(&mut self, s: &Surface) {
        surface::blit(self.groups.last_mut().unwrap(), s);
    }

    /// Releases the final image, unpremultiplying the alpha exactly once.
    pub fn release(mut self) -> Image {
        debug_assert_eq!(self.groups.len(), 1);

        let pixmap = self.groups.pop().unwrap();
        let mut data = pixmap.take();
        rasterfx::demultiply_alpha(data.as_rgba_mut());

        Image {
            width: self.width,
            height: self.height,
            data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pixel(canvas: &Canvas, x: u32, y: u32) -> rgb::RGBA8 {
        canvas.groups[0].data().as_rgba()[(y * canvas.width + x) as usize]
    }

    #[test]
    fn set_matrix_of_get_matrix_is_a_noop() {
        let mut canvas = Canvas::new(10, 10).unwrap();
        canvas.translate(3.0, 4.0);
        canvas.scale(2.0, 2.0);
        canvas.rotate(0.5);

        let m = canvas.get_matrix();
        canvas.set_matrix(m);
        assert_eq!(canvas.get_matrix(), m);
    }

    #[test]
    fn matrix_mul_round_trips_through_the_inverse() {
        let mut canvas = Canvas::new(10, 10).unwrap();
        canvas.translate(5.0, -2.0);
        canvas.scale(3.0, 0.5);
        canvas.rotate(1.0);

        let (dx, dy) = canvas.matrix_mul(7.0, 11.0);
        let inv = canvas.get_matrix().invert().unwrap();
        let mut p = tiny_skia::Point::from_xy(dx, dy);
        inv.map_point(&mut p);

        assert!((p.x - 7.0).abs() < 1e-3);
        assert!((p.y - 11.0).abs() < 1e-3);
    }

    #[test]
    fn zero_scale_is_ignored() {
        let mut canvas = Canvas::new(10, 10).unwrap();
        let before = canvas.get_matrix();
        canvas.scale(0.0, 5.0);
        assert_eq!(canvas.get_matrix(), before);
    }

    #[test]
    fn rectangle_matches_manual_lines() {
        let mut a = Canvas::new(20, 20).unwrap();
        a.set_source_color(tiny_skia::Color::from_rgba8(200, 10, 10, 255));
        a.rectangle(5.0, 5.0, 10.0, 10.0, 0.0, 0.0);
        a.fill();

        let mut b = Canvas::new(20, 20).unwrap();
        b.set_source_color(tiny_skia::Color::from_rgba8(200, 10, 10, 255));
        b.move_abs(5.0, 5.0);
        b.line_abs(15.0, 5.0);
        b.line_abs(15.0, 15.0);
        b.line_abs(5.0, 15.0);
        b.close_path();
        b.fill();

        assert_eq!(a.groups[0].data(), b.groups[0].data());
    }

    #[test]
    fn zero_width_stroke_renders_nothing() {
        let mut canvas = Canvas::new(10, 10).unwrap();
        canvas.set_source_color(tiny_skia::Color::from_rgba8(255, 255, 255, 255));
        canvas.set_line_width(0.0);
        canvas.move_abs(0.0, 5.0);
        canvas.line_abs(10.0, 5.0);
        canvas.stroke();

        assert!(canvas.groups[0].data().iter().all(|b| *b == 0));
    }

    #[test]
    fn negative_dash_is_an_error() {
        let mut canvas = Canvas::new(10, 10).unwrap();
        assert!(matches!(
            canvas.set_dash_pattern(&[1.0, -2.0], 0.0),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn odd_dash_array_is_doubled() {
        let mut canvas = Canvas::new(10, 10).unwrap();
        canvas.set_dash_pattern(&[1.0, 2.0, 3.0], 0.0).unwrap();
        assert_eq!(
            canvas.context.dash_array,
            vec![1.0, 2.0, 3.0, 1.0, 2.0, 3.0]
        );
    }

    #[test]
    fn pop_group_applies_opacity() {
        let mut canvas = Canvas::new(4, 4).unwrap();
        canvas.push_group().unwrap();
        canvas.set_source_color(tiny_skia::Color::from_rgba8(255, 255, 255, 255));
        canvas.rectangle(0.0, 0.0, 4.0, 4.0, 0.0, 0.0);
        canvas.fill();
        canvas.pop_group(0.5).unwrap();

        assert_eq!(canvas.group_level(), 1);
        let p = pixel(&canvas, 2, 2);
        assert!((p.a as i32 - 128).abs() <= 2);
    }

    #[test]
    fn unbalanced_pop_is_an_internal_error() {
        let mut canvas = Canvas::new(4, 4).unwrap();
        assert!(matches!(
            canvas.pop_group(1.0),
            Err(Error::Internal(_))
        ));
    }

    #[test]
    fn mask_pop_multiplies_by_luminance() {
        let mut canvas = Canvas::new(4, 4).unwrap();

        // the masked content: opaque white
        canvas.push_group().unwrap();
        canvas.set_source_color(tiny_skia::Color::from_rgba8(255, 255, 255, 255));
        canvas.rectangle(0.0, 0.0, 4.0, 4.0, 0.0, 0.0);
        canvas.fill();
        canvas.clear_path();

        // the mask: a mid-gray
        canvas.push_group().unwrap();
        canvas.set_source_color(tiny_skia::Color::from_rgba8(128, 128, 128, 255));
        canvas.rectangle(0.0, 0.0, 4.0, 4.0, 0.0, 0.0);
        canvas.fill();

        canvas.pop_mask_and_group().unwrap();
        assert_eq!(canvas.group_level(), 1);

        let p = pixel(&canvas, 1, 1);
        assert!(p.a > 100 && p.a < 150, "alpha = {}", p.a);
    }

    #[test]
    fn filled_circle_has_antialiased_boundary() {
        let mut canvas = Canvas::new(57, 57).unwrap();
        canvas.set_source_color(tiny_skia::Color::from_rgba8(1, 1, 1, 255));
        canvas.circle(28.5, 28.5, 28.5);
        canvas.fill();

        let center = pixel(&canvas, 28, 28);
        assert_eq!(center.a, 255);
        assert_eq!(center.r, 1);

        let corner = pixel(&canvas, 0, 0);
        assert_eq!(corner.a, 0);
    }
}
