// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::{f64_bound, ImageRefMut};

/// A color matrix used by `color_matrix`.
#[derive(Clone, Copy, Debug)]
#[allow(missing_docs)]
pub enum ColorMatrix<'a> {
    Matrix(&'a [f64; 20]),
    Saturate(f64),
    HueRotate(f64),
    LuminanceToAlpha,
}

/// Applies a color matrix filter.
///
/// Input image pixels should have a **premultiplied alpha**;
/// the result is premultiplied as well. A pixel is unpremultiplied only
/// when its alpha is neither 0 nor 255.
pub fn color_matrix(matrix: ColorMatrix, src: ImageRefMut) {
    let m = resolve_matrix(matrix);

    for pixel in src.data.iter_mut() {
        let mut r = pixel.r as f64;
        let mut g = pixel.g as f64;
        let mut b = pixel.b as f64;
        let a = pixel.a as f64;

        if pixel.a != 0 && pixel.a != 255 {
            r = r * 255.0 / a;
            g = g * 255.0 / a;
            b = b * 255.0 / a;
        }

        let r = f64_bound(0.0, r / 255.0, 1.0);
        let g = f64_bound(0.0, g / 255.0, 1.0);
        let b = f64_bound(0.0, b / 255.0, 1.0);
        let a = a / 255.0;

        let new_r = r * m[0] + g * m[1] + b * m[2] + a * m[3] + m[4];
        let new_g = r * m[5] + g * m[6] + b * m[7] + a * m[8] + m[9];
        let new_b = r * m[10] + g * m[11] + b * m[12] + a * m[13] + m[14];
        let new_a = f64_bound(0.0, r * m[15] + g * m[16] + b * m[17] + a * m[18] + m[19], 1.0);

        // alpha may have changed, so always premultiply back
        pixel.r = (f64_bound(0.0, new_r * new_a, 1.0) * 255.0 + 0.5) as u8;
        pixel.g = (f64_bound(0.0, new_g * new_a, 1.0) * 255.0 + 0.5) as u8;
        pixel.b = (f64_bound(0.0, new_b * new_a, 1.0) * 255.0 + 0.5) as u8;
        pixel.a = (new_a * 255.0 + 0.5) as u8;
    }
}

#[rustfmt::skip]
fn resolve_matrix(matrix: ColorMatrix) -> [f64; 20] {
    match matrix {
        ColorMatrix::Matrix(m) => *m,
        ColorMatrix::Saturate(v) => {
            let v = v.max(0.0);
            [
                0.213 + 0.787 * v, 0.715 - 0.715 * v, 0.072 - 0.072 * v, 0.0, 0.0,
                0.213 - 0.213 * v, 0.715 + 0.285 * v, 0.072 - 0.072 * v, 0.0, 0.0,
                0.213 - 0.213 * v, 0.715 - 0.715 * v, 0.072 + 0.928 * v, 0.0, 0.0,
                0.0,               0.0,               0.0,               1.0, 0.0,
            ]
        }
        ColorMatrix::HueRotate(angle) => {
            let angle = angle.to_radians();
            let c = angle.cos();
            let s = angle.sin();
            [
                0.213 + c * 0.787 - s * 0.213,
                0.715 - c * 0.715 - s * 0.715,
                0.072 - c * 0.072 + s * 0.928,
                0.0, 0.0,
                0.213 - c * 0.213 + s * 0.143,
                0.715 + c * 0.285 + s * 0.140,
                0.072 - c * 0.072 - s * 0.283,
                0.0, 0.0,
                0.213 - c * 0.213 - s * 0.787,
                0.715 - c * 0.715 + s * 0.715,
                0.072 + c * 0.928 + s * 0.072,
                0.0, 0.0,
                0.0, 0.0, 0.0, 1.0, 0.0,
            ]
        }
        ColorMatrix::LuminanceToAlpha => {
            [
                0.0,    0.0,    0.0,    0.0, 0.0,
                0.0,    0.0,    0.0,    0.0, 0.0,
                0.0,    0.0,    0.0,    0.0, 0.0,
                0.2125, 0.7154, 0.0721, 0.0, 0.0,
            ]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ImageRefMut, RGBA8};

    #[rustfmt::skip]
    const IDENTITY: [f64; 20] = [
        1.0, 0.0, 0.0, 0.0, 0.0,
        0.0, 1.0, 0.0, 0.0, 0.0,
        0.0, 0.0, 1.0, 0.0, 0.0,
        0.0, 0.0, 0.0, 1.0, 0.0,
    ];

    #[test]
    fn identity_is_bit_exact() {
        let mut data = vec![
            RGBA8::new(0, 0, 0, 0),
            RGBA8::new(255, 255, 255, 255),
            RGBA8::new(10, 20, 30, 255),
            RGBA8::new(64, 32, 16, 128),
            RGBA8::new(1, 1, 1, 2),
        ];
        let orig = data.clone();
        color_matrix(ColorMatrix::Matrix(&IDENTITY), ImageRefMut::new(5, 1, &mut data));
        assert_eq!(data, orig);
    }

    #[test]
    fn luminance_to_alpha_discards_color() {
        let mut data = vec![RGBA8::new(255, 255, 255, 255)];
        color_matrix(ColorMatrix::LuminanceToAlpha, ImageRefMut::new(1, 1, &mut data));
        assert_eq!(data[0].r, 0);
        assert_eq!(data[0].g, 0);
        assert_eq!(data[0].b, 0);
        assert_eq!(data[0].a, 255);
    }

    #[test]
    fn saturate_zero_is_grayscale() {
        let mut data = vec![RGBA8::new(255, 0, 0, 255)];
        color_matrix(ColorMatrix::Saturate(0.0), ImageRefMut::new(1, 1, &mut data));
        assert_eq!(data[0].r, data[0].g);
        assert_eq!(data[0].g, data[0].b);
        assert_eq!(data[0].a, 255);
    }

    #[test]
    fn hue_rotate_full_turn_is_identity_within_rounding() {
        let mut data = vec![RGBA8::new(200, 100, 50, 255)];
        color_matrix(ColorMatrix::HueRotate(360.0), ImageRefMut::new(1, 1, &mut data));
        assert!((data[0].r as i32 - 200).abs() <= 1);
        assert!((data[0].g as i32 - 100).abs() <= 1);
        assert!((data[0].b as i32 - 50).abs() <= 1);
    }
}
