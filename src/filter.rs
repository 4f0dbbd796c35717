// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use rasterfx::{BlendMode, ColorMatrix, CompositeOperator, ImageRef, ImageRefMut};
use svgdomtree::{AttributeId as AId, ElementId as EId, Node};
use svgtypes::{Length, LengthUnit};

use crate::error::Error;
use crate::geom::{BBox, IntRegion};
use crate::render::Renderer;
use crate::surface::Surface;
use crate::units::{percent_to_fraction, CoordUnits};

/// A named intermediate surface produced by a filter primitive.
struct FilterResult {
    name: String,
    surface: Surface,
}

/// Evaluates a `filter` element over the top canvas group.
///
/// Primitives chain through the result table; the final result replaces
/// the group pixels inside the filter region.
pub(crate) fn apply_filter(r: &mut Renderer, id: &str) -> Result<(), Error> {
    let filter_node = match r.doc.element_by_id(id) {
        Some(n) if n.tag_name() == Some(EId::Filter) => n,
        _ => return Ok(()),
    };

    let region = filter_region(r, filter_node);
    if region.is_empty() {
        return Ok(());
    }

    let primitive_units = filter_node
        .attribute_str(AId::PrimitiveUnits)
        .and_then(CoordUnits::from_str)
        .unwrap_or(CoordUnits::UserSpaceOnUse);

    let mut results: Vec<FilterResult> = Vec::new();

    for child in filter_node.children().filter(|n| n.is_element()) {
        match child.tag_name() {
            Some(EId::FeGaussianBlur) => {
                apply_blur(r, child, region, primitive_units, &mut results)?
            }
            Some(EId::FeColorMatrix) => apply_color_matrix(r, child, region, &mut results)?,
            Some(EId::FeBlend) => apply_blend(r, child, region, &mut results)?,
            Some(EId::FeComposite) => apply_composite(r, child, region, &mut results)?,
            // unsupported primitives are skipped
            _ => {}
        }
    }

    if let Some(last) = results.last() {
        r.canvas.blit(&last.surface);
    }

    Ok(())
}

/// Computes the filter region in device pixels.
fn filter_region(r: &Renderer, filter_node: Node) -> IntRegion {
    let units = filter_node
        .attribute_str(AId::FilterUnits)
        .and_then(CoordUnits::from_str)
        .unwrap_or(CoordUnits::ObjectBoundingBox);

    let x = filter_node.attribute(AId::X).unwrap_or(percent(-10.0));
    let y = filter_node.attribute(AId::Y).unwrap_or(percent(-10.0));
    let w = filter_node.attribute(AId::Width).unwrap_or(percent(120.0));
    let h = filter_node.attribute(AId::Height).unwrap_or(percent(120.0));

    match units {
        CoordUnits::ObjectBoundingBox => {
            let bb = r.device_bbox;
            if bb.is_empty() {
                return IntRegion::zero();
            }

            BBox::from_xywh(
                bb.x() + percent_to_fraction(x) * bb.width(),
                bb.y() + percent_to_fraction(y) * bb.height(),
                percent_to_fraction(w) * bb.width(),
                percent_to_fraction(h) * bb.height(),
            )
            .to_int_region()
        }
        CoordUnits::UserSpaceOnUse => {
            let (x1, y1) = r.length_to_px_pair(x, y);
            let (w, h) = r.length_to_px_pair(w, h);
            let (x2, y2) = (x1 + w, y1 + h);

            let mut bb = BBox::new_empty();
            for corner in [(x1, y1), (x2, y2), (x1, y2), (x2, y1)] {
                let (dx, dy) = r.canvas.matrix_mul(corner.0, corner.1);
                bb.add_point(dx, dy);
            }

            bb.to_int_region()
        }
    }
}

fn percent(n: f64) -> Length {
    Length {
        number: n,
        unit: LengthUnit::Percent,
    }
}

/// Resolves a filter primitive input name.
///
/// An empty name means the most recent result, or `SourceGraphic` when
/// there is none yet. Unknown names resolve to an empty surface.
fn get_source(
    r: &Renderer,
    results: &[FilterResult],
    region: IntRegion,
    name: &str,
) -> Result<Option<Surface>, Error> {
    match name {
        "SourceGraphic" => Ok(r.canvas.sub_surface(region)),
        "BackgroundImage" => Ok(r.canvas.group_sub_surface(r.background.group, region)),
        "SourceAlpha" | "BackgroundAlpha" | "FillPaint" | "StrokePaint" => {
            Err(Error::Unimplemented(format!("filter input '{}'", name)))
        }
        "" => match results.last() {
            Some(last) => Ok(Some(last.surface.clone())),
            None => Ok(r.canvas.sub_surface(region)),
        },
        _ => match results.iter().rev().find(|v| v.name == name) {
            Some(v) => Ok(Some(v.surface.clone())),
            None => Ok(None),
        },
    }
}

fn input(
    r: &Renderer,
    results: &[FilterResult],
    region: IntRegion,
    node: Node,
    aid: AId,
) -> Result<Option<Surface>, Error> {
    let name = node.attribute_str(aid).unwrap_or("");
    let source = get_source(r, results, region, name)?;
    Ok(source.and_then(|s| s.intersection(region)))
}

fn set_result(results: &mut Vec<FilterResult>, node: Node, surface: Surface) {
    results.push(FilterResult {
        name: node.attribute_str(AId::Result).unwrap_or("").to_string(),
        surface,
    });
}

fn apply_blur(
    r: &mut Renderer,
    node: Node,
    region: IntRegion,
    primitive_units: CoordUnits,
    results: &mut Vec<FilterResult>,
) -> Result<(), Error> {
    let std_dev: Vec<f64> = match node.attribute(AId::StdDeviation) {
        Some(v) => v,
        None => return Ok(()),
    };

    let sx = std_dev.first().copied().unwrap_or(0.0) as f32;
    let sy = std_dev.get(1).copied().unwrap_or(sx as f64) as f32;
    if sx < 0.0 || sy < 0.0 {
        // a negative value disables the primitive
        return Ok(());
    }

    let (sx, sy) = match primitive_units {
        CoordUnits::UserSpaceOnUse => r.canvas.matrix_mul_distance(sx, sy),
        CoordUnits::ObjectBoundingBox => {
            let bb = r.user_bbox;
            if bb.is_empty() {
                return Ok(());
            }
            r.canvas
                .matrix_mul_distance(bb.width() * sx, bb.height() * sy)
        }
    };

    let mut surface = match input(r, results, region, node, AId::In)? {
        Some(v) => v,
        None => return Ok(()),
    };

    let (w, h) = (surface.pixmap.width(), surface.pixmap.height());
    rasterfx::box_blur(
        sx.abs() as f64,
        sy.abs() as f64,
        ImageRefMut::new(w, h, surface.as_rgba_mut()),
    );

    set_result(results, node, surface);
    Ok(())
}

fn apply_color_matrix(
    r: &mut Renderer,
    node: Node,
    region: IntRegion,
    results: &mut Vec<FilterResult>,
) -> Result<(), Error> {
    #[rustfmt::skip]
    const IDENTITY: [f64; 20] = [
        1.0, 0.0, 0.0, 0.0, 0.0,
        0.0, 1.0, 0.0, 0.0, 0.0,
        0.0, 0.0, 1.0, 0.0, 0.0,
        0.0, 0.0, 0.0, 1.0, 0.0,
    ];

    let values: Vec<f64> = node.attribute(AId::Values).unwrap_or_default();

    let mut matrix = IDENTITY;
    let kind = match node.attribute_str(AId::Type).unwrap_or("matrix") {
        "saturate" => ColorMatrix::Saturate(values.first().copied().unwrap_or(1.0)),
        "hueRotate" => ColorMatrix::HueRotate(values.first().copied().unwrap_or(0.0)),
        "luminanceToAlpha" => ColorMatrix::LuminanceToAlpha,
        _ => {
            if values.len() == 20 {
                matrix.copy_from_slice(&values);
            }
            ColorMatrix::Matrix(&matrix)
        }
    };

    let mut surface = match input(r, results, region, node, AId::In)? {
        Some(v) => v,
        None => return Ok(()),
    };

    let (w, h) = (surface.pixmap.width(), surface.pixmap.height());
    rasterfx::color_matrix(kind, ImageRefMut::new(w, h, surface.as_rgba_mut()));

    set_result(results, node, surface);
    Ok(())
}

/// Restricts two inputs to their shared region and allocates an output
/// surface of the same size.
fn shared_inputs(
    s1: Surface,
    s2: Surface,
    region: IntRegion,
) -> Result<Option<(Surface, Surface, Surface)>, Error> {
    let shared = s1
        .region()
        .intersection(s2.region())
        .intersection(region);
    if shared.is_empty() {
        return Ok(None);
    }

    let s1 = match s1.intersection(shared) {
        Some(v) => v,
        None => return Ok(None),
    };
    let s2 = match s2.intersection(shared) {
        Some(v) => v,
        None => return Ok(None),
    };

    let pixmap =
        tiny_skia::Pixmap::new(shared.width, shared.height).ok_or(Error::OutOfMemory)?;
    let out = Surface {
        x: shared.x,
        y: shared.y,
        pixmap,
    };

    Ok(Some((s1, s2, out)))
}

fn apply_blend(
    r: &mut Renderer,
    node: Node,
    region: IntRegion,
    results: &mut Vec<FilterResult>,
) -> Result<(), Error> {
    let s1 = match input(r, results, region, node, AId::In)? {
        Some(v) => v,
        None => return Ok(()),
    };
    let s2 = match input(r, results, region, node, AId::In2)? {
        Some(v) => v,
        None => return Ok(()),
    };

    let mode = match node.attribute_str(AId::Mode) {
        Some("multiply") => BlendMode::Multiply,
        Some("screen") => BlendMode::Screen,
        Some("darken") => BlendMode::Darken,
        Some("lighten") => BlendMode::Lighten,
        _ => BlendMode::Normal,
    };

    let (s1, s2, mut out) = match shared_inputs(s1, s2, region)? {
        Some(v) => v,
        None => return Ok(()),
    };

    let (w, h) = (out.pixmap.width(), out.pixmap.height());
    rasterfx::blend(
        mode,
        ImageRef::new(w, h, s1.as_rgba()),
        ImageRef::new(w, h, s2.as_rgba()),
        ImageRefMut::new(w, h, out.as_rgba_mut()),
    );

    set_result(results, node, out);
    Ok(())
}

fn apply_composite(
    r: &mut Renderer,
    node: Node,
    region: IntRegion,
    results: &mut Vec<FilterResult>,
) -> Result<(), Error> {
    let s1 = match input(r, results, region, node, AId::In)? {
        Some(v) => v,
        None => return Ok(()),
    };
    let s2 = match input(r, results, region, node, AId::In2)? {
        Some(v) => v,
        None => return Ok(()),
    };

    let k = |aid: AId| node.attribute::<f64>(aid).unwrap_or(0.0);
    let operator = match node.attribute_str(AId::Operator) {
        Some("in") => CompositeOperator::In,
        Some("out") => CompositeOperator::Out,
        Some("atop") => CompositeOperator::Atop,
        Some("xor") => CompositeOperator::Xor,
        Some("arithmetic") => CompositeOperator::Arithmetic {
            k1: k(AId::K1),
            k2: k(AId::K2),
            k3: k(AId::K3),
            k4: k(AId::K4),
        },
        _ => CompositeOperator::Over,
    };

    let (s1, s2, mut out) = match shared_inputs(s1, s2, region)? {
        Some(v) => v,
        None => return Ok(()),
    };

    let (w, h) = (out.pixmap.width(), out.pixmap.height());
    rasterfx::composite(
        operator,
        ImageRef::new(w, h, s1.as_rgba()),
        ImageRef::new(w, h, s2.as_rgba()),
        ImageRefMut::new(w, h, out.as_rgba_mut()),
    );

    set_result(results, node, out);
    Ok(())
}
