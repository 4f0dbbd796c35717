// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use svgdomtree::{AttributeId as AId, Document, ElementId as EId, Node};
use svgtypes::{Align, AspectRatio, Length, LengthUnit, ViewBox};

use crate::canvas::{Canvas, FillRule, LineCap, LineJoin};
use crate::error::Error;
use crate::geom::BBox;
use crate::style::StyleStack;
use crate::units::{self, Axis};

/// How deep reference chains (`use`, gradient `href`) may recurse before
/// the lookup is treated as missing.
pub const MAX_REFERENCE_DEPTH: usize = 10;

/// The group whose pixels are visible to the `BackgroundImage`
/// filter input.
#[derive(Clone, Copy)]
pub struct Background {
    pub group: usize,
}

pub struct Renderer<'a, 'input: 'a> {
    pub canvas: &'a mut Canvas,
    pub doc: &'a Document<'input>,
    pub dpi: f64,
    pub viewport: (f32, f32),
    pub style_stack: StyleStack<'a, 'input>,
    /// The current shape's bounding box in user space. Used for
    /// `objectBoundingBox` gradients and filters.
    pub user_bbox: BBox,
    /// The device-space bounding box accumulated across the current group.
    /// Used for filter region calculation.
    pub device_bbox: BBox,
    pub background: Background,
    is_outermost: bool,
    use_targets: Vec<Node<'a, 'input>>,
}

/// The per-element state restored by `Renderer::pop_common`.
pub(crate) struct CommonPush<'a, 'input: 'a> {
    group_pushed: bool,
    opacity: f32,
    mask: Option<Node<'a, 'input>>,
    saved_matrix: tiny_skia::Transform,
    saved_device_bbox: BBox,
    saved_background: Option<Background>,
}

/// Walks the SVG tree and draws it onto the canvas.
pub fn render_document(
    canvas: &mut Canvas,
    doc: &Document,
    dpi: f64,
    viewport: (f32, f32),
) -> Result<(), Error> {
    let mut renderer = Renderer {
        canvas,
        doc,
        dpi,
        viewport,
        style_stack: StyleStack::new(),
        user_bbox: BBox::new_empty(),
        device_bbox: BBox::new_empty(),
        background: Background { group: 0 },
        is_outermost: true,
        use_targets: Vec::new(),
    };

    let root = doc.root_element();
    let (x, y, w, h) = svg_geometry(root);
    renderer.render_svg(root, x, y, w, h)
}

fn number(n: f64) -> Length {
    Length {
        number: n,
        unit: LengthUnit::None,
    }
}

fn percent(n: f64) -> Length {
    Length {
        number: n,
        unit: LengthUnit::Percent,
    }
}

fn svg_geometry(node: Node) -> (Length, Length, Length, Length) {
    (
        node.attribute(AId::X).unwrap_or(number(0.0)),
        node.attribute(AId::Y).unwrap_or(number(0.0)),
        node.attribute(AId::Width).unwrap_or(percent(100.0)),
        node.attribute(AId::Height).unwrap_or(percent(100.0)),
    )
}

impl<'a, 'input: 'a> Renderer<'a, 'input> {
    pub(crate) fn length_to_px(&self, l: Length, axis: Axis) -> f32 {
        units::length_to_px(l, self.dpi, self.viewport, axis)
    }

    pub(crate) fn length_to_px_pair(&self, x: Length, y: Length) -> (f32, f32) {
        (
            self.length_to_px(x, Axis::X),
            self.length_to_px(y, Axis::Y),
        )
    }

    /// `display: none` skips the whole subtree.
    fn is_group_invisible(&self) -> bool {
        self.style_stack.get_str(AId::Display) == Some("none")
    }

    /// `visibility` other than `visible` skips the element's own geometry
    /// but not its children.
    fn is_invisible(&self) -> bool {
        if let Some(v) = self.style_stack.get_str(AId::Visibility) {
            if v != "visible" {
                return true;
            }
        }
        self.is_group_invisible()
    }

    pub(crate) fn render_element(&mut self, node: Node<'a, 'input>) -> Result<(), Error> {
        match node.tag_name() {
            Some(EId::Svg) => {
                let (x, y, w, h) = svg_geometry(node);
                self.render_svg(node, x, y, w, h)
            }
            Some(EId::G) => self.render_group_element(node),
            Some(EId::Use) => self.render_use(node),
            Some(
                EId::Path
                | EId::Rect
                | EId::Circle
                | EId::Ellipse
                | EId::Line
                | EId::Polyline
                | EId::Polygon,
            ) => self.render_shape_element(node),
            // definitions and unknown containers are not rendered directly
            _ => Ok(()),
        }
    }

    fn render_children(&mut self, node: Node<'a, 'input>) -> Result<(), Error> {
        for child in node.children().filter(|n| n.is_element()) {
            self.render_element(child)?;
        }
        Ok(())
    }

    // `g`

    fn render_group_element(&mut self, node: Node<'a, 'input>) -> Result<(), Error> {
        self.style_stack.push(node);
        let res = self.render_group_content(node);
        self.style_stack.pop();
        res
    }

    fn render_group_content(&mut self, node: Node<'a, 'input>) -> Result<(), Error> {
        if self.is_group_invisible() {
            return Ok(());
        }

        let push = self.push_common(true)?;

        self.apply_transform_attr(node);
        let res = self
            .render_children(node)
            .and_then(|_| self.apply_filter());

        let pop = self.pop_common(push);
        res.and(pop)
    }

    // `svg` and `symbol` via `use`

    pub(crate) fn render_svg(
        &mut self,
        node: Node<'a, 'input>,
        x: Length,
        y: Length,
        width: Length,
        height: Length,
    ) -> Result<(), Error> {
        self.style_stack.push(node);
        let res = self.render_svg_content(node, x, y, width, height);
        self.style_stack.pop();
        res
    }

    fn render_svg_content(
        &mut self,
        node: Node<'a, 'input>,
        x: Length,
        y: Length,
        width: Length,
        height: Length,
    ) -> Result<(), Error> {
        if self.is_group_invisible() {
            return Ok(());
        }

        let push = self.push_common(true)?;

        // the outermost `svg` ignores its own x/y
        if !self.is_outermost {
            let (tx, ty) = self.length_to_px_pair(x, y);
            self.canvas.translate(tx, ty);
        }

        let saved_viewport = self.viewport;
        self.viewport = self.length_to_px_pair(width, height);
        self.apply_viewbox(node);

        let saved_outermost = self.is_outermost;
        self.is_outermost = false;
        let res = self.render_children(node);
        self.is_outermost = saved_outermost;

        let res = res.and_then(|_| self.apply_filter());
        self.viewport = saved_viewport;

        let pop = self.pop_common(push);
        res.and(pop)
    }

    fn apply_viewbox(&mut self, node: Node) {
        let vb: ViewBox = match node.attribute(AId::ViewBox) {
            Some(v) => v,
            None => return,
        };
        let aspect: AspectRatio = node
            .attribute(AId::PreserveAspectRatio)
            .unwrap_or(AspectRatio {
                defer: false,
                align: Align::XMidYMid,
                slice: false,
            });

        if vb.w <= 0.0 || vb.h <= 0.0 || self.viewport.0 <= 0.0 || self.viewport.1 <= 0.0 {
            return;
        }

        let sx = self.viewport.0 as f64 / vb.w;
        let sy = self.viewport.1 as f64 / vb.h;

        let (sx, sy) = if aspect.align == Align::None {
            (sx, sy)
        } else {
            let s = if aspect.slice {
                sx.max(sy)
            } else {
                sx.min(sy)
            };
            (s, s)
        };

        let x = -vb.x * sx;
        let y = -vb.y * sy;
        let w = self.viewport.0 as f64 - vb.w * sx;
        let h = self.viewport.1 as f64 - vb.h * sy;
        let (tx, ty) = aligned_pos(aspect.align, x, y, w, h);

        self.canvas.transform(tiny_skia::Transform::from_row(
            sx as f32, 0.0, 0.0, sy as f32, tx as f32, ty as f32,
        ));
    }

    // `use`

    fn render_use(&mut self, node: Node<'a, 'input>) -> Result<(), Error> {
        let target = match node.attribute::<Node>(AId::Href) {
            Some(v) => v,
            None => return Ok(()),
        };

        if self.use_targets.len() >= MAX_REFERENCE_DEPTH || self.use_targets.contains(&target) {
            log::warn!("a cyclic or too deep 'use' reference was skipped");
            return Ok(());
        }

        self.use_targets.push(target);
        self.style_stack.push(node);
        let res = self.render_use_content(node, target);
        self.style_stack.pop();
        self.use_targets.pop();
        res
    }

    fn render_use_content(
        &mut self,
        node: Node<'a, 'input>,
        target: Node<'a, 'input>,
    ) -> Result<(), Error> {
        if self.is_group_invisible() {
            return Ok(());
        }

        let push = self.push_common(true)?;

        self.apply_transform_attr(node);
        let (tx, ty) = self.length_to_px_pair(
            node.attribute(AId::X).unwrap_or(number(0.0)),
            node.attribute(AId::Y).unwrap_or(number(0.0)),
        );
        self.canvas.translate(tx, ty);

        let res = match target.tag_name() {
            Some(EId::Symbol) => {
                // a symbol renders like an `svg`; the use element's size
                // wins, missing values default to 100%
                let width = node.attribute(AId::Width).unwrap_or(percent(100.0));
                let height = node.attribute(AId::Height).unwrap_or(percent(100.0));
                self.render_svg(target, number(0.0), number(0.0), width, height)
            }
            Some(EId::Svg) => {
                // width and height of `use` override those of `svg`
                let (sx, sy, sw, sh) = svg_geometry(target);
                let width = node.attribute(AId::Width).unwrap_or(sw);
                let height = node.attribute(AId::Height).unwrap_or(sh);
                self.render_svg(target, sx, sy, width, height)
            }
            _ => self.render_element(target),
        };

        let pop = self.pop_common(push);
        res.and(pop)
    }

    // shapes

    fn render_shape_element(&mut self, node: Node<'a, 'input>) -> Result<(), Error> {
        self.style_stack.push(node);
        let res = self.render_shape_content(node);
        self.style_stack.pop();
        res
    }

    fn render_shape_content(&mut self, node: Node<'a, 'input>) -> Result<(), Error> {
        if self.is_invisible() {
            return Ok(());
        }

        let push = self.push_common(false)?;

        self.apply_transform_attr(node);
        let res = match crate::shapes::emit_geometry(self, node) {
            Ok(true) => self.render_shape(push.group_pushed),
            Ok(false) => Ok(()),
            Err(e) => Err(e),
        };

        let pop = self.pop_common(push);
        res.and(pop)
    }

    /// Paints the path that was just emitted to the canvas: fill first,
    /// then stroke, then runs the element's filter.
    fn render_shape(&mut self, group_pushed: bool) -> Result<(), Error> {
        self.update_bounding_box();

        match self.style_stack.get_str(AId::FillRule) {
            Some("evenodd") => self.canvas.set_fill_rule(FillRule::EvenOdd),
            _ => self.canvas.set_fill_rule(FillRule::NonZero),
        }

        // when no group was pushed, the element opacity is folded into the
        // solid fill/stroke color instead
        let opacity = if group_pushed {
            1.0
        } else {
            self.style_stack
                .get::<f64>(AId::Opacity)
                .map_or(1.0, |v| v.clamp(0.0, 1.0))
        };

        // fill defaults to opaque black
        let fill = self.style_stack.get_str(AId::Fill).unwrap_or("black");
        if fill != "none" {
            self.set_paint_source(fill, AId::FillOpacity, opacity)?;
            self.canvas.fill();
        }

        let stroke = self.style_stack.get_str(AId::Stroke).unwrap_or("none");
        if stroke != "none" {
            let width = self
                .style_stack
                .get::<Length>(AId::StrokeWidth)
                .map_or(1.0, |l| self.length_to_px(l, Axis::X));
            self.canvas.set_line_width(width);

            let cap = match self.style_stack.get_str(AId::StrokeLinecap) {
                Some("round") => LineCap::Round,
                Some("square") => LineCap::Square,
                _ => LineCap::Butt,
            };
            self.canvas.set_line_cap(cap);

            let join = match self.style_stack.get_str(AId::StrokeLinejoin) {
                Some("round") => LineJoin::Round,
                Some("bevel") => LineJoin::Bevel,
                _ => LineJoin::Miter,
            };
            self.canvas.set_line_join(join);

            self.set_dash_pattern()?;
            self.set_paint_source(stroke, AId::StrokeOpacity, opacity)?;
            self.canvas.stroke();
        }

        self.canvas.clear_path();

        self.apply_filter()
    }

    fn set_dash_pattern(&mut self) -> Result<(), Error> {
        let dashes: Option<Vec<Length>> = match self.style_stack.get_str(AId::StrokeDasharray) {
            Some("none") | None => None,
            Some(_) => self.style_stack.get(AId::StrokeDasharray),
        };

        match dashes {
            Some(list) if !list.is_empty() => {
                let list: Vec<f32> = list
                    .into_iter()
                    .map(|l| self.length_to_px(l, Axis::X))
                    .collect();
                let offset = self
                    .style_stack
                    .get::<Length>(AId::StrokeDashoffset)
                    .map_or(0.0, |l| self.length_to_px(l, Axis::X));
                self.canvas.set_dash_pattern(&list, offset)
            }
            _ => self.canvas.set_dash_pattern(&[], 0.0),
        }
    }

    /// Configures the canvas paint source from a `fill`/`stroke` value.
    fn set_paint_source(
        &mut self,
        value: &str,
        opacity_aid: AId,
        extra_opacity: f64,
    ) -> Result<(), Error> {
        match svgtypes::Paint::from_str(value) {
            Ok(svgtypes::Paint::FuncIRI(id, _)) => {
                crate::paint_server::set_gradient(self, id);
                Ok(())
            }
            Ok(svgtypes::Paint::Color(c)) => {
                self.set_solid_source(c, opacity_aid, extra_opacity);
                Ok(())
            }
            Ok(svgtypes::Paint::CurrentColor) => {
                let c = self
                    .style_stack
                    .get::<svgtypes::Color>(AId::Color)
                    .unwrap_or(svgtypes::Color::black());
                self.set_solid_source(c, opacity_aid, extra_opacity);
                Ok(())
            }
            _ => {
                log::warn!("unsupported paint value: '{}'", value);
                self.canvas
                    .set_source_color(tiny_skia::Color::TRANSPARENT);
                Ok(())
            }
        }
    }

    fn set_solid_source(&mut self, c: svgtypes::Color, opacity_aid: AId, extra_opacity: f64) {
        let paint_opacity = self
            .style_stack
            .get::<f64>(opacity_aid)
            .map_or(1.0, |v| v.clamp(0.0, 1.0));

        let a = (c.alpha as f64 / 255.0) * paint_opacity * extra_opacity;
        let color = tiny_skia::Color::from_rgba(
            c.red as f32 / 255.0,
            c.green as f32 / 255.0,
            c.blue as f32 / 255.0,
            a as f32,
        )
        .unwrap_or(tiny_skia::Color::TRANSPARENT);

        self.canvas.set_source_color(color);
    }

    pub(crate) fn apply_transform_attr(&mut self, node: Node) {
        if let Some(ts) = node.attribute::<svgtypes::Transform>(AId::Transform) {
            self.canvas.transform(tiny_skia::Transform::from_row(
                ts.a as f32,
                ts.b as f32,
                ts.c as f32,
                ts.d as f32,
                ts.e as f32,
                ts.f as f32,
            ));
        }
    }

    /// Reads the current path's bounding box from the canvas and merges
    /// its device-space projection into the current group's box.
    fn update_bounding_box(&mut self) {
        self.user_bbox = self.canvas.get_shape_bounding_box();
        if self.user_bbox.is_empty() || self.user_bbox.width() == 0.0 {
            // empty path
            return;
        }

        let (x, y) = (self.user_bbox.x(), self.user_bbox.y());
        let (w, h) = (self.user_bbox.width(), self.user_bbox.height());
        for corner in [(x, y), (x + w, y), (x, y + h), (x + w, y + h)] {
            let (dx, dy) = self.canvas.matrix_mul(corner.0, corner.1);
            self.device_bbox.add_point(dx, dy);
        }
    }

    // common element push/pop

    pub(crate) fn push_common(&mut self, is_container: bool) -> Result<CommonPush<'a, 'input>, Error> {
        let saved_matrix = self.canvas.get_matrix();
        let saved_device_bbox = self.device_bbox;
        self.device_bbox = BBox::new_empty();

        let bg_new = self
            .style_stack
            .get_str(AId::EnableBackground)
            .map_or(false, |v| v.starts_with("new"));

        let filter_present = self
            .style_stack
            .get_str(AId::Filter)
            .map_or(false, |v| v != "none");

        let mask = match self.style_stack.get_str(AId::Mask) {
            Some(v) if v != "none" => self
                .style_stack
                .get::<Node>(AId::Mask)
                .filter(|n| n.tag_name() == Some(EId::Mask)),
            _ => None,
        };

        let mut group_pushed = filter_present || mask.is_some() || bg_new;

        // when the element opacity can be folded into a single solid
        // paint, the off-screen group is skipped
        let mut opacity = 1.0f32;
        {
            let fill = self.style_stack.get_str(AId::Fill);
            let stroke = self.style_stack.get_str(AId::Stroke);
            let is_iri = |v: Option<&str>| v.map_or(false, |v| v.starts_with("url("));
            let painted = |v: Option<&str>| v.map_or(false, |v| v != "none");

            if group_pushed
                || is_container
                || is_iri(fill)
                || is_iri(stroke)
                || (painted(fill) && painted(stroke))
            {
                if let Some(v) = self.style_stack.get::<f64>(AId::Opacity) {
                    opacity = v.clamp(0.0, 1.0) as f32;
                    if opacity < 1.0 {
                        group_pushed = true;
                    }
                }
            }
        }

        if group_pushed {
            if let Err(e) = self.canvas.push_group() {
                self.device_bbox = saved_device_bbox;
                return Err(e);
            }
        } else {
            opacity = 1.0;
        }

        let saved_background = if bg_new {
            let old = self.background;
            self.background = Background {
                group: self.canvas.group_level() - 1,
            };
            Some(old)
        } else {
            None
        };

        Ok(CommonPush {
            group_pushed,
            opacity,
            mask,
            saved_matrix,
            saved_device_bbox,
            saved_background,
        })
    }

    pub(crate) fn pop_common(&mut self, push: CommonPush<'a, 'input>) -> Result<(), Error> {
        let mut merged = push.saved_device_bbox;
        merged.unite(self.device_bbox);
        self.device_bbox = merged;

        let result = if push.group_pushed {
            if let Some(mask_node) = push.mask {
                self.render_mask(mask_node)
            } else {
                self.canvas.pop_group(push.opacity)
            }
        } else {
            Ok(())
        };

        if let Some(old) = push.saved_background {
            self.background = old;
        }
        self.canvas.set_matrix(push.saved_matrix);

        result
    }

    /// Renders the mask content into its own group and merges it as a
    /// luminance mask. On failure both the mask and the masked group are
    /// discarded so the stack stays balanced.
    fn render_mask(&mut self, mask_node: Node<'a, 'input>) -> Result<(), Error> {
        if let Err(e) = self.canvas.push_group() {
            let _ = self.canvas.pop_group(0.0);
            return Err(e);
        }

        self.style_stack.push(mask_node);
        let res = self.render_children(mask_node);
        self.style_stack.pop();

        match res {
            Ok(()) => self.canvas.pop_mask_and_group(),
            Err(e) => {
                let _ = self.canvas.pop_group(0.0);
                let _ = self.canvas.pop_group(0.0);
                Err(e)
            }
        }
    }

    fn apply_filter(&mut self) -> Result<(), Error> {
        let value = match self.style_stack.get_str(AId::Filter) {
            Some(v) if v != "none" => v,
            _ => return Ok(()),
        };

        let id = match svgtypes::FuncIRI::from_str(value) {
            Ok(iri) => iri.0,
            Err(_) => {
                log::warn!("failed to parse filter value: '{}'", value);
                return Ok(());
            }
        };

        crate::filter::apply_filter(self, id)
    }
}

/// Returns the position of a viewBox-scaled object per the
/// `preserveAspectRatio` align value.
fn aligned_pos(align: Align, x: f64, y: f64, w: f64, h: f64) -> (f64, f64) {
    match align {
        Align::None => (x, y),
        Align::XMinYMin => (x, y),
        Align::XMidYMin => (x + w / 2.0, y),
        Align::XMaxYMin => (x + w, y),
        Align::XMinYMid => (x, y + h / 2.0),
        Align::XMidYMid => (x + w / 2.0, y + h / 2.0),
        Align::XMaxYMid => (x + w, y + h / 2.0),
        Align::XMinYMax => (x, y + h),
        Align::XMidYMax => (x + w / 2.0, y + h),
        Align::XMaxYMax => (x + w, y + h),
    }
}
