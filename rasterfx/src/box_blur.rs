// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::{ImageRefMut, RGBA8};

/// Applies a Gaussian blur approximated by three box blurs per axis.
///
/// See <https://www.w3.org/TR/SVG11/filters.html#feGaussianBlurElement>
/// for the approximation algorithm.
///
/// Input image pixels should have a **premultiplied alpha**.
///
/// A zero or negative `sigma_x`/`sigma_y` disables the blur along that axis.
///
/// # Allocations
///
/// This method will allocate two temporary buffers of the `src` image size.
pub fn box_blur(sigma_x: f64, sigma_y: f64, src: ImageRefMut) {
    let dx = box_size(sigma_x);
    let dy = box_size(sigma_y);
    if dx == 0 && dy == 0 {
        return;
    }

    let w = src.width;
    let h = src.height;

    let mut front: Vec<RGBA8> = src.data.to_vec();
    let mut back: Vec<RGBA8> = vec![RGBA8::default(); front.len()];

    // A box size of zero is skipped before it reaches the pass functions,
    // so the `size/2 - 1` offset below is never evaluated for it.
    if dx != 0 {
        for (size, offset) in passes(dx) {
            blur_pass_horz(&front, &mut back, w, h, size, offset);
            std::mem::swap(&mut front, &mut back);
        }
    }

    if dy != 0 {
        for (size, offset) in passes(dy) {
            blur_pass_vert(&front, &mut back, w, h, size, offset);
            std::mem::swap(&mut front, &mut back);
        }
    }

    src.data.copy_from_slice(&front);
}

/// The box size `d` for a standard deviation, as defined by the SVG spec.
fn box_size(sigma: f64) -> u32 {
    if sigma <= 0.0 {
        return 0;
    }

    let d = sigma * 3.0 * (2.0 * std::f64::consts::PI).sqrt() / 4.0 + 0.5;
    d as u32
}

fn passes(d: u32) -> [(u32, u32); 3] {
    debug_assert!(d != 0);
    if d % 2 == 0 {
        [(d, d / 2), (d, d / 2 - 1), (d + 1, d / 2)]
    } else {
        [(d, d / 2), (d, d / 2), (d, d / 2)]
    }
}

fn blur_pass_horz(src: &[RGBA8], dst: &mut [RGBA8], w: u32, h: u32, size: u32, offset: u32) {
    debug_assert!(size != 0);
    let w = w as i32;
    let clamp_x = |x: i32| x.clamp(0, w - 1) as usize;

    for y in 0..h as usize {
        let row = &src[y * w as usize..(y + 1) * w as usize];

        let mut sum = [0i32; 4];
        for i in 0..size as i32 {
            let p = row[clamp_x(i - offset as i32)];
            accumulate(&mut sum, p, 1);
        }

        for x in 0..w {
            dst[y * w as usize + x as usize] = average(&sum, size);

            let last = clamp_x(x - offset as i32);
            let next = clamp_x(x - offset as i32 + size as i32);
            accumulate(&mut sum, row[next], 1);
            accumulate(&mut sum, row[last], -1);
        }
    }
}

fn blur_pass_vert(src: &[RGBA8], dst: &mut [RGBA8], w: u32, h: u32, size: u32, offset: u32) {
    debug_assert!(size != 0);
    let h = h as i32;
    let stride = w as usize;
    let clamp_y = |y: i32| y.clamp(0, h - 1) as usize;

    for x in 0..w as usize {
        let mut sum = [0i32; 4];
        for i in 0..size as i32 {
            let p = src[clamp_y(i - offset as i32) * stride + x];
            accumulate(&mut sum, p, 1);
        }

        for y in 0..h {
            dst[y as usize * stride + x] = average(&sum, size);

            let last = clamp_y(y - offset as i32);
            let next = clamp_y(y - offset as i32 + size as i32);
            accumulate(&mut sum, src[next * stride + x], 1);
            accumulate(&mut sum, src[last * stride + x], -1);
        }
    }
}

#[inline]
fn accumulate(sum: &mut [i32; 4], p: RGBA8, sign: i32) {
    sum[0] += p.r as i32 * sign;
    sum[1] += p.g as i32 * sign;
    sum[2] += p.b as i32 * sign;
    sum[3] += p.a as i32 * sign;
}

#[inline]
fn average(sum: &[i32; 4], size: u32) -> RGBA8 {
    let size = size as i32;
    RGBA8::new(
        (sum[0] / size) as u8,
        (sum[1] / size) as u8,
        (sum[2] / size) as u8,
        (sum[3] / size) as u8,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ImageRefMut;

    fn image(w: u32, h: u32) -> Vec<RGBA8> {
        let mut data = vec![RGBA8::default(); (w * h) as usize];
        for (i, p) in data.iter_mut().enumerate() {
            let v = (i * 13 % 251) as u8;
            *p = RGBA8::new(v, v / 2, v / 3, 255);
        }
        data
    }

    #[test]
    fn zero_sigma_is_identity() {
        let mut data = image(8, 6);
        let orig = data.clone();
        box_blur(0.0, 0.0, ImageRefMut::new(8, 6, &mut data));
        assert_eq!(data, orig);
    }

    #[test]
    fn box_size_follows_spec() {
        // d = sigma * 3 * sqrt(2 * pi) / 4, rounded
        assert_eq!(box_size(5.0), 9);
        assert_eq!(box_size(1.0), 2);
        assert_eq!(box_size(0.0), 0);
        assert_eq!(box_size(-1.0), 0);
    }

    #[test]
    fn even_box_uses_wider_third_pass() {
        assert_eq!(passes(4), [(4, 2), (4, 1), (5, 2)]);
        assert_eq!(passes(9), [(9, 4), (9, 4), (9, 4)]);
    }

    #[test]
    fn uniform_image_stays_uniform() {
        let mut data = vec![RGBA8::new(10, 20, 30, 255); 100];
        box_blur(3.0, 3.0, ImageRefMut::new(10, 10, &mut data));
        for p in &data {
            assert_eq!(*p, RGBA8::new(10, 20, 30, 255));
        }
    }

    #[test]
    fn single_axis_blur_keeps_other_axis() {
        // a vertical edge blurred only vertically must not move
        let mut data = vec![RGBA8::default(); 64];
        for y in 0..8 {
            for x in 0..4 {
                data[y * 8 + x] = RGBA8::new(255, 255, 255, 255);
            }
        }
        let orig = data.clone();
        box_blur(0.0, 2.0, ImageRefMut::new(8, 8, &mut data));
        assert_eq!(data, orig);
    }
}
