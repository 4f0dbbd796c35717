// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::{ImageRef, ImageRefMut, RGBA8};

/// A blending mode used by `blend`.
#[derive(Clone, Copy, PartialEq, Debug)]
#[allow(missing_docs)]
pub enum BlendMode {
    Normal,
    Multiply,
    Screen,
    Darken,
    Lighten,
}

/// Blends `src1` over `src2` into `dest`.
///
/// All images must have a **premultiplied alpha** and the same size.
///
/// The result opacity is `1 - (1 - qa) * (1 - qb)`.
///
/// # Panics
///
/// When `src1`, `src2` and `dest` have different sizes.
pub fn blend(mode: BlendMode, src1: ImageRef, src2: ImageRef, dest: ImageRefMut) {
    assert!(src1.width == src2.width && src1.width == dest.width);
    assert!(src1.height == src2.height && src1.height == dest.height);

    for ((p1, p2), d) in src1
        .data
        .iter()
        .zip(src2.data.iter())
        .zip(dest.data.iter_mut())
    {
        let ca = [
            p1.r as f64 / 255.0,
            p1.g as f64 / 255.0,
            p1.b as f64 / 255.0,
        ];
        let cb = [
            p2.r as f64 / 255.0,
            p2.g as f64 / 255.0,
            p2.b as f64 / 255.0,
        ];
        let qa = p1.a as f64 / 255.0;
        let qb = p2.a as f64 / 255.0;

        let mut cr = [0.0; 3];
        for i in 0..3 {
            cr[i] = match mode {
                BlendMode::Normal => cb[i] * (1.0 - qa) + ca[i],
                BlendMode::Multiply => {
                    cb[i] * (1.0 - qa) + ca[i] * (1.0 - qb) + ca[i] * cb[i]
                }
                BlendMode::Screen => cb[i] + ca[i] - ca[i] * cb[i],
                BlendMode::Darken => {
                    (cb[i] * (1.0 - qa) + ca[i]).min(ca[i] * (1.0 - qb) + cb[i])
                }
                BlendMode::Lighten => {
                    (cb[i] * (1.0 - qa) + ca[i]).max(ca[i] * (1.0 - qb) + cb[i])
                }
            };
        }

        let qr = 1.0 - (1.0 - qa) * (1.0 - qb);

        *d = RGBA8::new(
            (cr[0] * 255.0 + 0.5) as u8,
            (cr[1] * 255.0 + 0.5) as u8,
            (cr[2] * 255.0 + 0.5) as u8,
            (qr * 255.0 + 0.5) as u8,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ImageRef, ImageRefMut};

    #[test]
    fn normal_over_transparent_is_source() {
        let src = vec![RGBA8::new(100, 50, 25, 200), RGBA8::new(0, 0, 0, 0)];
        let backdrop = vec![RGBA8::new(0, 0, 0, 0); 2];
        let mut out = vec![RGBA8::default(); 2];

        blend(
            BlendMode::Normal,
            ImageRef::new(2, 1, &src),
            ImageRef::new(2, 1, &backdrop),
            ImageRefMut::new(2, 1, &mut out),
        );

        assert_eq!(out, src);
    }

    #[test]
    fn multiply_of_opaque_blacks_is_black() {
        let a = vec![RGBA8::new(0, 0, 0, 255)];
        let b = vec![RGBA8::new(0, 0, 0, 255)];
        let mut out = vec![RGBA8::default()];

        blend(
            BlendMode::Multiply,
            ImageRef::new(1, 1, &a),
            ImageRef::new(1, 1, &b),
            ImageRefMut::new(1, 1, &mut out),
        );

        assert_eq!(out[0], RGBA8::new(0, 0, 0, 255));
    }

    #[test]
    fn darken_and_lighten_bound_each_other() {
        let a = vec![RGBA8::new(200, 10, 100, 255)];
        let b = vec![RGBA8::new(50, 90, 100, 255)];
        let mut dark = vec![RGBA8::default()];
        let mut light = vec![RGBA8::default()];

        blend(
            BlendMode::Darken,
            ImageRef::new(1, 1, &a),
            ImageRef::new(1, 1, &b),
            ImageRefMut::new(1, 1, &mut dark),
        );
        blend(
            BlendMode::Lighten,
            ImageRef::new(1, 1, &a),
            ImageRef::new(1, 1, &b),
            ImageRefMut::new(1, 1, &mut light),
        );

        assert!(dark[0].r <= light[0].r);
        assert!(dark[0].g <= light[0].g);
        assert!(dark[0].b <= light[0].b);
    }
}
