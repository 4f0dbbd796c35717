// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
`rasterfx` provides the raster half of an
[SVG filters](https://www.w3.org/TR/SVG11/filters.html) implementation.

Only operations on pixel buffers live here. Filter region calculation,
input resolution, primitive ordering and coordinate transformations are
the caller's job.

Implemented primitives:

- feGaussianBlur (three-pass box blur approximation)
- feColorMatrix
- feBlend
- feComposite
*/

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![allow(clippy::many_single_char_names)]

use float_cmp::ApproxEqUlps;
pub use rgb::RGBA8;

mod blend;
mod box_blur;
mod color_matrix;
mod composite;

pub use blend::{blend, BlendMode};
pub use box_blur::box_blur;
pub use color_matrix::{color_matrix, ColorMatrix};
pub use composite::{composite, CompositeOperator};

/// An image reference.
///
/// Image pixels should be stored in RGBA order.
///
/// All primitives in this crate expect **premultiplied** channels.
#[derive(Clone, Copy)]
pub struct ImageRef<'a> {
    data: &'a [RGBA8],
    width: u32,
    height: u32,
}

impl<'a> ImageRef<'a> {
    /// Creates a new image reference.
    ///
    /// Doesn't clone the provided data.
    #[inline]
    pub fn new(width: u32, height: u32, data: &'a [RGBA8]) -> Self {
        debug_assert!(data.len() >= (width * height) as usize);
        ImageRef {
            data,
            width,
            height,
        }
    }
}

/// A mutable `ImageRef` variant.
pub struct ImageRefMut<'a> {
    data: &'a mut [RGBA8],
    width: u32,
    height: u32,
}

impl<'a> ImageRefMut<'a> {
    /// Creates a new mutable image reference.
    ///
    /// Doesn't clone the provided data.
    #[inline]
    pub fn new(width: u32, height: u32, data: &'a mut [RGBA8]) -> Self {
        debug_assert!(data.len() >= (width * height) as usize);
        ImageRefMut {
            data,
            width,
            height,
        }
    }
}

/// Multiplies provided pixels alpha.
pub fn multiply_alpha(data: &mut [RGBA8]) {
    for p in data {
        let a = p.a as f64 / 255.0;
        p.b = (p.b as f64 * a + 0.5) as u8;
        p.g = (p.g as f64 * a + 0.5) as u8;
        p.r = (p.r as f64 * a + 0.5) as u8;
    }
}

/// Demultiplies provided pixels alpha.
///
/// Pixels with zero alpha are kept as is.
pub fn demultiply_alpha(data: &mut [RGBA8]) {
    for p in data {
        if p.a == 0 {
            continue;
        }

        let a = p.a as f64 / 255.0;
        p.b = (p.b as f64 / a + 0.5) as u8;
        p.g = (p.g as f64 / a + 0.5) as u8;
        p.r = (p.r as f64 / a + 0.5) as u8;
    }
}

/// Returns the CIE luminance of a premultiplied pixel.
///
/// Since the color channels are already scaled by alpha there is no need
/// to multiply the result by it once more.
#[inline]
pub fn luminance(p: RGBA8) -> u8 {
    let l = p.r as f64 * 0.2125 + p.g as f64 * 0.7154 + p.b as f64 * 0.0721;
    l as u8
}

#[inline]
fn f64_bound(min: f64, val: f64, max: f64) -> f64 {
    debug_assert!(min.is_finite());
    debug_assert!(val.is_finite());
    debug_assert!(max.is_finite());

    if val > max {
        max
    } else if val < min {
        min
    } else {
        val
    }
}

trait FuzzyZero {
    fn is_fuzzy_zero(&self) -> bool;
}

impl FuzzyZero for f64 {
    #[inline]
    fn is_fuzzy_zero(&self) -> bool {
        self.approx_eq_ulps(&0.0, 4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn luminance_of_white() {
        let p = RGBA8::new(255, 255, 255, 255);
        assert_eq!(luminance(p), 254);
    }

    #[test]
    fn alpha_round_trip() {
        let mut data = vec![RGBA8::new(200, 100, 50, 128)];
        demultiply_alpha(&mut data);
        multiply_alpha(&mut data);
        // one step of rounding is allowed
        assert!((data[0].r as i32 - 200).abs() <= 1);
        assert!((data[0].g as i32 - 100).abs() <= 1);
        assert!((data[0].b as i32 - 50).abs() <= 1);
        assert_eq!(data[0].a, 128);
    }

    #[test]
    fn demultiply_keeps_transparent() {
        let mut data = vec![RGBA8::new(0, 0, 0, 0)];
        demultiply_alpha(&mut data);
        assert_eq!(data[0], RGBA8::new(0, 0, 0, 0));
    }
}
