// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use rgb::FromSlice;

use crate::geom::IntRegion;

/// A positioned snapshot of a canvas region.
///
/// The filter pipeline works on owned copies: an intersection produces a
/// cropped copy rather than a borrowed view, which is also what the
/// pipeline stores in its result table.
#[derive(Clone)]
pub struct Surface {
    /// Position of the top-left pixel in canvas coordinates.
    pub x: u32,
    pub y: u32,
    /// Premultiplied RGBA pixels.
    pub pixmap: tiny_skia::Pixmap,
}

impl Surface {
    /// The canvas-space region this surface covers.
    pub fn region(&self) -> IntRegion {
        IntRegion {
            x: self.x,
            y: self.y,
            width: self.pixmap.width(),
            height: self.pixmap.height(),
        }
    }

    /// Restricts the surface to `region`, producing a cropped copy.
    ///
    /// Returns `None` when the intersection is empty.
    pub fn intersection(&self, region: IntRegion) -> Option<Surface> {
        let overlap = self.region().intersection(region);
        if overlap.is_empty() {
            return None;
        }

        let rect = tiny_skia::IntRect::from_xywh(
            (overlap.x - self.x) as i32,
            (overlap.y - self.y) as i32,
            overlap.width,
            overlap.height,
        )?;
        let pixmap = self.pixmap.clone_rect(rect)?;

        Some(Surface {
            x: overlap.x,
            y: overlap.y,
            pixmap,
        })
    }

    /// Mutable RGBA view over the pixels.
    pub fn as_rgba_mut(&mut self) -> &mut [rgb::RGBA8] {
        self.pixmap.data_mut().as_rgba_mut()
    }

    /// Shared RGBA view over the pixels.
    pub fn as_rgba(&self) -> &[rgb::RGBA8] {
        self.pixmap.data().as_rgba()
    }
}

/// Copies `src` into `dst` at the surface position, replacing pixels.
///
/// This is a raw copy and not a blend: filter results overwrite the group
/// content they were computed from. The copy is clipped to `dst`.
pub fn blit(dst: &mut tiny_skia::Pixmap, src: &Surface) {
    let dst_w = dst.width();
    let dst_h = dst.height();
    if src.x >= dst_w || src.y >= dst_h {
        log::warn!("filter result is outside of the canvas");
        return;
    }

    let w = src.pixmap.width().min(dst_w - src.x) as usize;
    let h = src.pixmap.height().min(dst_h - src.y) as usize;
    let src_stride = src.pixmap.width() as usize;
    let dst_stride = dst_w as usize;

    let src_data = src.pixmap.data().as_rgba();
    let dst_data = dst.data_mut().as_rgba_mut();

    for row in 0..h {
        let s = &src_data[row * src_stride..row * src_stride + w];
        let d_start = (src.y as usize + row) * dst_stride + src.x as usize;
        dst_data[d_start..d_start + w].copy_from_slice(s);
    }
}

/// Multiplies `group` by the per-pixel luminance of `mask`.
///
/// Both pixmaps are premultiplied, so the group pixels are scaled
/// channel-wise without unpremultiplication.
pub fn apply_luminance_mask(group: &mut tiny_skia::Pixmap, mask: &tiny_skia::Pixmap) {
    debug_assert_eq!(group.width(), mask.width());
    debug_assert_eq!(group.height(), mask.height());

    let group_data = group.data_mut().as_rgba_mut();
    let mask_data = mask.data().as_rgba();

    for (g, m) in group_data.iter_mut().zip(mask_data.iter()) {
        let ma = rasterfx::luminance(*m) as u16;
        g.r = (g.r as u16 * ma / 255) as u8;
        g.g = (g.g as u16 * ma / 255) as u8;
        g.b = (g.b as u16 * ma / 255) as u8;
        g.a = (g.a as u16 * ma / 255) as u8;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn surface(x: u32, y: u32, w: u32, h: u32) -> Surface {
        Surface {
            x,
            y,
            pixmap: tiny_skia::Pixmap::new(w, h).unwrap(),
        }
    }

    #[test]
    fn intersection_is_positioned_in_canvas_space() {
        let s = surface(10, 10, 20, 20);
        let r = IntRegion {
            x: 15,
            y: 5,
            width: 30,
            height: 30,
        };

        let cropped = s.intersection(r).unwrap();
        assert_eq!(cropped.x, 15);
        assert_eq!(cropped.y, 10);
        assert_eq!(cropped.pixmap.width(), 15);
        assert_eq!(cropped.pixmap.height(), 20);
    }

    #[test]
    fn empty_intersection_is_none() {
        let s = surface(0, 0, 10, 10);
        let r = IntRegion {
            x: 100,
            y: 100,
            width: 5,
            height: 5,
        };
        assert!(s.intersection(r).is_none());
    }

    #[test]
    fn blit_replaces_pixels() {
        let mut dst = tiny_skia::Pixmap::new(4, 4).unwrap();
        dst.fill(tiny_skia::Color::from_rgba8(255, 0, 0, 255));

        let mut src = surface(1, 1, 2, 2);
        src.pixmap.fill(tiny_skia::Color::TRANSPARENT);

        blit(&mut dst, &src);

        let data = dst.data().as_rgba();
        // inside the blitted region: transparent, replaced not blended
        assert_eq!(data[1 * 4 + 1].a, 0);
        // outside: untouched
        assert_eq!(data[0].a, 255);
    }

    #[test]
    fn white_mask_is_identity_up_to_rounding() {
        let mut group = tiny_skia::Pixmap::new(1, 1).unwrap();
        group.fill(tiny_skia::Color::from_rgba8(100, 100, 100, 255));

        let mut mask = tiny_skia::Pixmap::new(1, 1).unwrap();
        mask.fill(tiny_skia::Color::from_rgba8(255, 255, 255, 255));

        apply_luminance_mask(&mut group, &mask);
        let p = group.data().as_rgba()[0];
        assert!(p.r >= 99 && p.a >= 253);
    }

    #[test]
    fn black_mask_clears_the_group() {
        let mut group = tiny_skia::Pixmap::new(1, 1).unwrap();
        group.fill(tiny_skia::Color::from_rgba8(100, 100, 100, 255));

        let mut mask = tiny_skia::Pixmap::new(1, 1).unwrap();
        mask.fill(tiny_skia::Color::from_rgba8(0, 0, 0, 255));

        apply_luminance_mask(&mut group, &mask);
        let p = group.data().as_rgba()[0];
        assert_eq!(p, rgb::RGBA8::new(0, 0, 0, 0));
    }
}
