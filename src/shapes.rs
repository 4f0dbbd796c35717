// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use svgdomtree::{AttributeId as AId, ElementId as EId, Node};
use svgtypes::{Length, PathSegment};

use crate::error::Error;
use crate::render::Renderer;
use crate::units::Axis;

/// Emits the element's geometry to the canvas path.
///
/// Returns `Ok(false)` when the element produces nothing and should not
/// be painted at all (zero-sized rect, empty point list).
pub(crate) fn emit_geometry(r: &mut Renderer, node: Node) -> Result<bool, Error> {
    match node.tag_name() {
        Some(EId::Path) => emit_path(r, node),
        Some(EId::Rect) => emit_rect(r, node),
        Some(EId::Circle) => emit_circle(r, node),
        Some(EId::Ellipse) => emit_ellipse(r, node),
        Some(EId::Line) => emit_line(r, node),
        Some(EId::Polyline) => emit_poly(r, node, false),
        Some(EId::Polygon) => emit_poly(r, node, true),
        _ => Ok(false),
    }
}

fn length_or_zero(r: &Renderer, node: Node, aid: AId, axis: Axis) -> f32 {
    node.attribute::<Length>(aid)
        .map_or(0.0, |l| r.length_to_px(l, axis))
}

fn emit_path(r: &mut Renderer, node: Node) -> Result<bool, Error> {
    let data = match node.attribute_str(AId::D) {
        Some(v) => v,
        None => return Ok(false),
    };

    // The last control point of the previous curve, in absolute
    // coordinates. `S` and `T` reflect it around the current point;
    // when the previous step is from the other curve family the implicit
    // control point degrades to the current point itself.
    let mut prev_cubic_ctrl: Option<(f32, f32)> = None;
    let mut prev_quad_ctrl: Option<(f32, f32)> = None;

    for segment in svgtypes::PathParser::from(data) {
        let segment = match segment {
            Ok(v) => v,
            Err(_) => break,
        };

        let cur = r.canvas.get_current_point();

        match segment {
            PathSegment::MoveTo { abs, x, y } => {
                if abs {
                    r.canvas.move_abs(x as f32, y as f32);
                } else {
                    r.canvas.move_rel(x as f32, y as f32);
                }
            }
            PathSegment::LineTo { abs, x, y } => {
                if abs {
                    r.canvas.line_abs(x as f32, y as f32);
                } else {
                    r.canvas.line_rel(x as f32, y as f32);
                }
            }
            PathSegment::HorizontalLineTo { abs, x } => {
                if abs {
                    r.canvas.line_abs(x as f32, cur.1);
                } else {
                    r.canvas.line_rel(x as f32, 0.0);
                }
            }
            PathSegment::VerticalLineTo { abs, y } => {
                if abs {
                    r.canvas.line_abs(cur.0, y as f32);
                } else {
                    r.canvas.line_rel(0.0, y as f32);
                }
            }
            PathSegment::CurveTo {
                abs,
                x1,
                y1,
                x2,
                y2,
                x,
                y,
            } => {
                let (x1, y1) = (x1 as f32, y1 as f32);
                let (x2, y2) = (x2 as f32, y2 as f32);
                let (x, y) = (x as f32, y as f32);
                if abs {
                    r.canvas.cubic_curve_abs(x1, y1, x2, y2, x, y);
                    prev_cubic_ctrl = Some((x2, y2));
                } else {
                    r.canvas.cubic_curve_rel(x1, y1, x2, y2, x, y);
                    prev_cubic_ctrl = Some((cur.0 + x2, cur.1 + y2));
                }
            }
            PathSegment::SmoothCurveTo { abs, x2, y2, x, y } => {
                let ctrl1 = reflect(prev_cubic_ctrl, cur);
                let (x2, y2) = (x2 as f32, y2 as f32);
                let (x, y) = (x as f32, y as f32);
                if abs {
                    r.canvas.cubic_curve_abs(ctrl1.0, ctrl1.1, x2, y2, x, y);
                    prev_cubic_ctrl = Some((x2, y2));
                } else {
                    r.canvas.cubic_curve_rel(
                        ctrl1.0 - cur.0,
                        ctrl1.1 - cur.1,
                        x2,
                        y2,
                        x,
                        y,
                    );
                    prev_cubic_ctrl = Some((cur.0 + x2, cur.1 + y2));
                }
            }
            PathSegment::Quadratic { abs, x1, y1, x, y } => {
                let (x1, y1) = (x1 as f32, y1 as f32);
                let (x, y) = (x as f32, y as f32);
                if abs {
                    r.canvas.quadratic_curve_abs(x1, y1, x, y);
                    prev_quad_ctrl = Some((x1, y1));
                } else {
                    r.canvas.quadratic_curve_rel(x1, y1, x, y);
                    prev_quad_ctrl = Some((cur.0 + x1, cur.1 + y1));
                }
            }
            PathSegment::SmoothQuadratic { abs, x, y } => {
                let ctrl = reflect(prev_quad_ctrl, cur);
                let (x, y) = (x as f32, y as f32);
                if abs {
                    r.canvas.quadratic_curve_abs(ctrl.0, ctrl.1, x, y);
                } else {
                    r.canvas
                        .quadratic_curve_rel(ctrl.0 - cur.0, ctrl.1 - cur.1, x, y);
                }
                prev_quad_ctrl = Some(ctrl);
            }
            PathSegment::EllipticalArc {
                abs,
                rx,
                ry,
                x_axis_rotation,
                large_arc,
                sweep,
                x,
                y,
            } => {
                let rotation = (x_axis_rotation as f32).to_radians();
                if abs {
                    r.canvas.arc_abs(
                        x as f32,
                        y as f32,
                        rx as f32,
                        ry as f32,
                        rotation,
                        large_arc,
                        sweep,
                    );
                } else {
                    r.canvas.arc_rel(
                        x as f32,
                        y as f32,
                        rx as f32,
                        ry as f32,
                        rotation,
                        large_arc,
                        sweep,
                    );
                }
            }
            PathSegment::ClosePath { .. } => {
                r.canvas.close_path();
            }
        }

        // forget the reflection point once the curve family changes
        match segment {
            PathSegment::CurveTo { .. } | PathSegment::SmoothCurveTo { .. } => {
                prev_quad_ctrl = None;
            }
            PathSegment::Quadratic { .. } | PathSegment::SmoothQuadratic { .. } => {
                prev_cubic_ctrl = None;
            }
            _ => {
                prev_cubic_ctrl = None;
                prev_quad_ctrl = None;
            }
        }
    }

    Ok(true)
}

#[inline]
fn reflect(prev_ctrl: Option<(f32, f32)>, cur: (f32, f32)) -> (f32, f32) {
    match prev_ctrl {
        Some((px, py)) => (2.0 * cur.0 - px, 2.0 * cur.1 - py),
        None => cur,
    }
}

fn emit_rect(r: &mut Renderer, node: Node) -> Result<bool, Error> {
    let w = length_or_zero(r, node, AId::Width, Axis::X);
    let h = length_or_zero(r, node, AId::Height, Axis::Y);

    // zero values disable rendering of the element
    if w <= 0.0 || h <= 0.0 {
        return Ok(false);
    }

    let x = length_or_zero(r, node, AId::X, Axis::X);
    let y = length_or_zero(r, node, AId::Y, Axis::Y);

    let rx: Option<Length> = node.attribute(AId::Rx);
    let ry: Option<Length> = node.attribute(AId::Ry);

    // a missing radius inherits from the other one
    let (rx, ry) = match (rx, ry) {
        (None, None) => (None, None),
        (Some(rx), None) => (Some(rx), Some(rx)),
        (None, Some(ry)) => (Some(ry), Some(ry)),
        (Some(rx), Some(ry)) => (Some(rx), Some(ry)),
    };

    let mut rx = rx.map_or(0.0, |l| r.length_to_px(l, Axis::X));
    let mut ry = ry.map_or(0.0, |l| r.length_to_px(l, Axis::Y));

    // clamp the radii to the half of the respective side
    rx = rx.min(w / 2.0);
    ry = ry.min(h / 2.0);

    r.canvas.rectangle(x, y, w, h, rx, ry);
    Ok(true)
}

fn emit_circle(r: &mut Renderer, node: Node) -> Result<bool, Error> {
    let radius = length_or_zero(r, node, AId::R, Axis::X);
    if radius <= 0.0 {
        return Ok(false);
    }

    let cx = length_or_zero(r, node, AId::Cx, Axis::X);
    let cy = length_or_zero(r, node, AId::Cy, Axis::Y);

    r.canvas.circle(cx, cy, radius);
    Ok(true)
}

fn emit_ellipse(r: &mut Renderer, node: Node) -> Result<bool, Error> {
    let rx = length_or_zero(r, node, AId::Rx, Axis::X);
    let ry = length_or_zero(r, node, AId::Ry, Axis::Y);
    if rx <= 0.0 || ry <= 0.0 {
        return Ok(false);
    }

    let cx = length_or_zero(r, node, AId::Cx, Axis::X);
    let cy = length_or_zero(r, node, AId::Cy, Axis::Y);

    r.canvas.move_abs(cx + rx, cy);
    r.canvas
        .arc_center_abs((cx, cy), (rx, ry), 0.0, 2.0 * std::f32::consts::PI);
    r.canvas.close_path();
    Ok(true)
}

fn emit_line(r: &mut Renderer, node: Node) -> Result<bool, Error> {
    let x1 = length_or_zero(r, node, AId::X1, Axis::X);
    let y1 = length_or_zero(r, node, AId::Y1, Axis::Y);
    let x2 = length_or_zero(r, node, AId::X2, Axis::X);
    let y2 = length_or_zero(r, node, AId::Y2, Axis::Y);

    r.canvas.move_abs(x1, y1);
    r.canvas.line_abs(x2, y2);
    Ok(true)
}

fn emit_poly(r: &mut Renderer, node: Node, close: bool) -> Result<bool, Error> {
    let points = match node.attribute_str(AId::Points) {
        Some(v) => v,
        None => return Ok(false),
    };

    let mut parser = svgtypes::PointsParser::from(points);
    let first = match parser.next() {
        Some(v) => v,
        None => return Ok(false),
    };

    r.canvas.move_abs(first.0 as f32, first.1 as f32);
    for (x, y) in parser {
        r.canvas.line_abs(x as f32, y as f32);
    }

    if close {
        r.canvas.close_path();
    }

    Ok(true)
}
