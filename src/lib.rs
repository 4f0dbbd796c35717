// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
`svgrast` is an SVG rasterization library.

It renders a parsed SVG document (see [`svgdomtree`]) into a raster RGBA
image based on a static [SVG Full 1.1](https://www.w3.org/TR/SVG11/)
subset: no animations and no scripting.
*/

#![forbid(unsafe_code)]
#![allow(clippy::uninlined_format_args)]

pub use svgdomtree;
pub use tiny_skia;

pub mod canvas;
mod error;
mod filter;
pub mod geom;
pub mod gradient;
mod paint_server;
mod path;
mod render;
mod shapes;
mod style;
pub mod surface;
mod units;

pub use error::Error;

use svgdomtree::{AttributeId as AId, Document, Node};
use svgtypes::{Length, LengthUnit};

/// Rasterization parameters.
#[derive(Clone, Copy, Debug)]
pub struct Parameters {
    /// Dots per inch, used to convert absolute length units to pixels.
    pub dpi: f64,

    /// Requested output dimensions in pixels.
    ///
    /// When both are zero the size comes from the SVG root. When one is
    /// zero it is computed from the other one preserving the root's
    /// aspect ratio. When both are set they are used as-is, which may
    /// scale anisotropically.
    pub dims_request: (u32, u32),

    /// When set, the output is filled with this RGBA color before
    /// rendering; otherwise it starts fully transparent.
    pub background: Option<[u8; 4]>,
}

impl Default for Parameters {
    fn default() -> Self {
        Parameters {
            dpi: 96.0,
            dims_request: (0, 0),
            background: None,
        }
    }
}

/// The rasterization result.
///
/// Row-major pixels, 4 bytes each in R, G, B, A order with a
/// **straight** (not premultiplied) alpha.
pub struct Image {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl Image {
    /// Returns the `[r, g, b, a]` bytes of a pixel.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        assert!(x < self.width && y < self.height);
        let idx = ((y * self.width + x) * 4) as usize;
        [
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        ]
    }
}

/// Renders a document into an image.
///
/// The output is produced only when the whole tree walk succeeds;
/// there are no partial results.
pub fn render(doc: &Document, params: &Parameters) -> Result<Image, Error> {
    if !(params.dpi.is_finite() && params.dpi > 0.0) {
        return Err(Error::InvalidArgument(format!(
            "dpi must be positive, got {}",
            params.dpi
        )));
    }

    let root = doc.root_element();
    let (intrinsic_w, intrinsic_h) = intrinsic_size(root, params.dpi)?;

    let (mut out_w, mut out_h) = params.dims_request;
    if out_w == 0 && out_h == 0 {
        out_w = intrinsic_w.round() as u32;
        out_h = intrinsic_h.round() as u32;
    } else if out_w == 0 {
        out_w = (out_h as f64 * intrinsic_w / intrinsic_h).round() as u32;
    } else if out_h == 0 {
        out_h = (out_w as f64 * intrinsic_h / intrinsic_w).round() as u32;
    }

    if out_w == 0 || out_h == 0 {
        return Err(Error::InvalidArgument(
            "the output size is zero".to_string(),
        ));
    }

    let mut canvas = canvas::Canvas::new(out_w, out_h)?;
    canvas.scale(
        out_w as f32 / intrinsic_w as f32,
        out_h as f32 / intrinsic_h as f32,
    );

    if let Some([red, green, blue, alpha]) = params.background {
        canvas.set_source_color(tiny_skia::Color::from_rgba8(red, green, blue, alpha));
        canvas.rectangle(0.0, 0.0, intrinsic_w as f32, intrinsic_h as f32, 0.0, 0.0);
        canvas.fill();
        canvas.clear_path();
        canvas.set_source_color(tiny_skia::Color::TRANSPARENT);
    }

    render::render_document(
        &mut canvas,
        doc,
        params.dpi,
        (intrinsic_w as f32, intrinsic_h as f32),
    )?;

    if canvas.group_level() != 1 {
        return Err(Error::Internal("the group stack is not balanced"));
    }

    Ok(canvas.release())
}

/// The size of the SVG root in pixels.
///
/// Percent and missing dimensions fall back to the `viewBox` size.
fn intrinsic_size(root: Node, dpi: f64) -> Result<(f64, f64), Error> {
    let view_box: Option<svgtypes::ViewBox> = root.attribute(AId::ViewBox);

    let resolve = |l: Option<Length>, vb_len: Option<f64>| -> Option<f64> {
        match l {
            Some(l) if l.unit != LengthUnit::Percent => {
                Some(units::length_to_px(l, dpi, (0.0, 0.0), units::Axis::X) as f64)
            }
            Some(l) => vb_len.map(|v| v * l.number / 100.0),
            None => vb_len,
        }
    };

    let w = resolve(root.attribute(AId::Width), view_box.map(|vb| vb.w));
    let h = resolve(root.attribute(AId::Height), view_box.map(|vb| vb.h));

    match (w, h) {
        (Some(w), Some(h)) if w > 0.0 && h > 0.0 => Ok((w, h)),
        _ => Err(Error::InvalidArgument(
            "the SVG root has no usable size".to_string(),
        )),
    }
}
