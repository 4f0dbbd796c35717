// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::{FuzzyZero, ImageRef, ImageRefMut, RGBA8};

/// A compositing operator used by `composite`.
#[derive(Clone, Copy, PartialEq, Debug)]
#[allow(missing_docs)]
pub enum CompositeOperator {
    Over,
    In,
    Out,
    Atop,
    Xor,
    Arithmetic { k1: f64, k2: f64, k3: f64, k4: f64 },
}

/// Composites `src1` against `src2` into `dest`.
///
/// All images must have a **premultiplied alpha** and the same size.
///
/// The arithmetic operator computes `k1*i1*i2 + k2*i1 + k3*i2 + k4`
/// channel-wise, clamped to 1.
///
/// # Panics
///
/// When `src1`, `src2` and `dest` have different sizes.
pub fn composite(op: CompositeOperator, src1: ImageRef, src2: ImageRef, dest: ImageRefMut) {
    assert!(src1.width == src2.width && src1.width == dest.width);
    assert!(src1.height == src2.height && src1.height == dest.height);

    for ((p1, p2), d) in src1
        .data
        .iter()
        .zip(src2.data.iter())
        .zip(dest.data.iter_mut())
    {
        let c1 = to_normalized(*p1);
        let c2 = to_normalized(*p2);
        let a1 = c1[3];
        let a2 = c2[3];

        let mut o = [0.0f64; 4];
        for i in 0..4 {
            o[i] = match op {
                CompositeOperator::Over => c1[i] + c2[i] * (1.0 - a1),
                CompositeOperator::In => c1[i] * a2,
                CompositeOperator::Out => c1[i] * (1.0 - a2),
                CompositeOperator::Atop => c1[i] * a2 + c2[i] * (1.0 - a1),
                CompositeOperator::Xor => c1[i] * (1.0 - a2) + c2[i] * (1.0 - a1),
                CompositeOperator::Arithmetic { k1, k2, k3, k4 } => {
                    (k1 * c1[i] * c2[i] + k2 * c1[i] + k3 * c2[i] + k4).clamp(0.0, 1.0)
                }
            };
        }

        if o[3].is_fuzzy_zero() {
            *d = RGBA8::default();
            continue;
        }

        *d = RGBA8::new(
            (o[0] * 255.0 + 0.5) as u8,
            (o[1] * 255.0 + 0.5) as u8,
            (o[2] * 255.0 + 0.5) as u8,
            (o[3] * 255.0 + 0.5) as u8,
        );
    }
}

#[inline]
fn to_normalized(p: RGBA8) -> [f64; 4] {
    [
        p.r as f64 / 255.0,
        p.g as f64 / 255.0,
        p.b as f64 / 255.0,
        p.a as f64 / 255.0,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ImageRef, ImageRefMut};

    fn run(op: CompositeOperator, p1: RGBA8, p2: RGBA8) -> RGBA8 {
        let a = vec![p1];
        let b = vec![p2];
        let mut out = vec![RGBA8::default()];
        composite(
            op,
            ImageRef::new(1, 1, &a),
            ImageRef::new(1, 1, &b),
            ImageRefMut::new(1, 1, &mut out),
        );
        out[0]
    }

    #[test]
    fn over_with_opaque_source_hides_backdrop() {
        let out = run(
            CompositeOperator::Over,
            RGBA8::new(255, 0, 0, 255),
            RGBA8::new(0, 255, 0, 255),
        );
        assert_eq!(out, RGBA8::new(255, 0, 0, 255));
    }

    #[test]
    fn in_keeps_source_where_backdrop_is() {
        let out = run(
            CompositeOperator::In,
            RGBA8::new(255, 0, 0, 255),
            RGBA8::new(0, 0, 0, 0),
        );
        assert_eq!(out, RGBA8::new(0, 0, 0, 0));
    }

    #[test]
    fn xor_of_same_opaque_inputs_is_empty() {
        let out = run(
            CompositeOperator::Xor,
            RGBA8::new(10, 10, 10, 255),
            RGBA8::new(10, 10, 10, 255),
        );
        assert_eq!(out, RGBA8::new(0, 0, 0, 0));
    }

    #[test]
    fn arithmetic_clamps() {
        // k4 = 2 would overflow every channel without the clamp
        let out = run(
            CompositeOperator::Arithmetic {
                k1: 0.0,
                k2: 0.0,
                k3: 0.0,
                k4: 2.0,
            },
            RGBA8::new(0, 0, 0, 0),
            RGBA8::new(0, 0, 0, 0),
        );
        assert_eq!(out, RGBA8::new(255, 255, 255, 255));
    }

    #[test]
    fn arithmetic_identity_on_first_input() {
        let p = RGBA8::new(120, 60, 30, 200);
        let out = run(
            CompositeOperator::Arithmetic {
                k1: 0.0,
                k2: 1.0,
                k3: 0.0,
                k4: 0.0,
            },
            p,
            RGBA8::new(0, 0, 0, 0),
        );
        assert_eq!(out, p);
    }
}
