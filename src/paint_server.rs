// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::rc::Rc;

use svgdomtree::{AttributeId as AId, ElementId as EId, FromValue, Node};
use svgtypes::{Length, LengthUnit};

use crate::gradient::{Gradient, GradientStop, SpreadMethod};
use crate::render::{Renderer, MAX_REFERENCE_DEPTH};
use crate::units::{percent_to_fraction, Axis, CoordUnits};

/// Resolves a paint-server reference and configures the canvas source.
///
/// Unresolvable references paint nothing (a transparent source).
/// Gradient properties not present on the element are inherited through
/// its `href` chain.
pub(crate) fn set_gradient(r: &mut Renderer, id: &str) {
    let node = match r.doc.element_by_id(id) {
        Some(n) if n.tag_name().map_or(false, |t| t.is_gradient()) => n,
        _ => {
            log::warn!("paint server '{}' was not found", id);
            r.canvas.set_source_color(tiny_skia::Color::TRANSPARENT);
            return;
        }
    };

    let units = chain_attr::<&str>(node, AId::GradientUnits)
        .and_then(CoordUnits::from_str)
        .unwrap_or(CoordUnits::ObjectBoundingBox);

    let saved_matrix = r.canvas.get_matrix();
    let mut saved_viewport = None;

    if units == CoordUnits::ObjectBoundingBox {
        let bbox = r.user_bbox;
        if !bbox.is_empty() {
            r.canvas.translate(bbox.x(), bbox.y());
            // scale only by non-degenerate dimensions to keep the
            // gradient matrix invertible
            if bbox.width() > 0.0 && bbox.height() > 0.0 {
                r.canvas.scale(bbox.width(), bbox.height());
            }
        }

        saved_viewport = Some(r.viewport);
        r.viewport = (1.0, 1.0);
    }

    if let Some(ts) = chain_attr::<svgtypes::Transform>(node, AId::GradientTransform) {
        r.canvas.transform(tiny_skia::Transform::from_row(
            ts.a as f32,
            ts.b as f32,
            ts.c as f32,
            ts.d as f32,
            ts.e as f32,
            ts.f as f32,
        ));
    }

    let mut gradient = match node.tag_name() {
        Some(EId::LinearGradient) => {
            let x1 = chain_length(node, AId::X1, percent(0.0));
            let y1 = chain_length(node, AId::Y1, percent(0.0));
            let x2 = chain_length(node, AId::X2, percent(100.0));
            let y2 = chain_length(node, AId::Y2, percent(0.0));

            Gradient::new_linear(
                r.length_to_px_pair(x1, y1),
                r.length_to_px_pair(x2, y2),
                r.canvas.get_matrix(),
            )
        }
        _ => {
            let cx = chain_length(node, AId::Cx, percent(50.0));
            let cy = chain_length(node, AId::Cy, percent(50.0));
            let radius = chain_length(node, AId::R, percent(50.0));
            // the focal point defaults to the center
            let fx = chain_length(node, AId::Fx, cx);
            let fy = chain_length(node, AId::Fy, cy);

            Gradient::new_radial(
                r.length_to_px_pair(fx, fy),
                r.length_to_px_pair(cx, cy),
                r.length_to_px(radius, Axis::X),
                r.canvas.get_matrix(),
            )
        }
    };

    let spread = match chain_attr::<&str>(node, AId::SpreadMethod) {
        Some("reflect") => SpreadMethod::Reflect,
        Some("repeat") => SpreadMethod::Repeat,
        _ => SpreadMethod::Pad,
    };
    gradient.set_spread_method(spread);

    gradient.set_stops(&collect_stops(r, node));

    if let Some(viewport) = saved_viewport {
        r.viewport = viewport;
    }
    r.canvas.set_matrix(saved_matrix);

    r.canvas.set_source_gradient(Rc::new(gradient));
}

fn percent(n: f64) -> Length {
    Length {
        number: n,
        unit: LengthUnit::Percent,
    }
}

/// Finds an attribute on the gradient or anywhere up its `href` chain.
fn chain_node<'a, 'input>(start: Node<'a, 'input>, aid: AId) -> Option<Node<'a, 'input>> {
    let mut node = start;
    for _ in 0..=MAX_REFERENCE_DEPTH {
        if node.has_attribute(aid) {
            return Some(node);
        }

        node = node
            .attribute::<Node>(AId::Href)
            .filter(|n| n.tag_name().map_or(false, |t| t.is_gradient()))?;
    }

    log::warn!("a gradient 'href' chain is too long or cyclic");
    None
}

fn chain_attr<'a, 'input: 'a, T: FromValue<'a, 'input>>(
    start: Node<'a, 'input>,
    aid: AId,
) -> Option<T> {
    chain_node(start, aid).and_then(|n| n.attribute(aid))
}

fn chain_length(node: Node, aid: AId, default: Length) -> Length {
    chain_attr::<Length>(node, aid).unwrap_or(default)
}

/// The first gradient in the chain that carries stop children provides
/// all of them.
fn stops_owner<'a, 'input>(start: Node<'a, 'input>) -> Option<Node<'a, 'input>> {
    let mut node = start;
    for _ in 0..=MAX_REFERENCE_DEPTH {
        if node
            .children()
            .any(|c| c.tag_name() == Some(EId::Stop))
        {
            return Some(node);
        }

        node = node
            .attribute::<Node>(AId::Href)
            .filter(|n| n.tag_name().map_or(false, |t| t.is_gradient()))?;
    }

    None
}

fn collect_stops<'a, 'input: 'a>(
    r: &mut Renderer<'a, 'input>,
    node: Node<'a, 'input>,
) -> Vec<GradientStop> {
    let owner = match stops_owner(node) {
        Some(v) => v,
        None => return Vec::new(),
    };

    let mut stops = Vec::new();
    let mut prev_offset = 0.0f32;

    for stop in owner
        .children()
        .filter(|c| c.tag_name() == Some(EId::Stop))
    {
        r.style_stack.push(stop);

        // offsets are clamped to 0..=1 and must not decrease
        let offset = stop
            .attribute::<Length>(AId::Offset)
            .map_or(0.0, percent_to_fraction)
            .clamp(0.0, 1.0)
            .max(prev_offset);
        prev_offset = offset;

        let color = match r.style_stack.get_str(AId::StopColor) {
            None => svgtypes::Color::black(),
            Some("currentColor") => r
                .style_stack
                .get::<svgtypes::Color>(AId::Color)
                .unwrap_or(svgtypes::Color::black()),
            Some(_) => r
                .style_stack
                .get::<svgtypes::Color>(AId::StopColor)
                .unwrap_or(svgtypes::Color::black()),
        };

        let opacity = r
            .style_stack
            .get::<f64>(AId::StopOpacity)
            .map_or(1.0, |v| v.clamp(0.0, 1.0));

        let alpha = (color.alpha as f64 / 255.0) * opacity;
        let color = tiny_skia::Color::from_rgba(
            color.red as f32 / 255.0,
            color.green as f32 / 255.0,
            color.blue as f32 / 255.0,
            alpha as f32,
        )
        .unwrap_or(tiny_skia::Color::TRANSPARENT);

        stops.push(GradientStop { offset, color });

        r.style_stack.pop();
    }

    stops
}
