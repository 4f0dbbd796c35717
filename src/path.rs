// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::geom::BBox;

/// Approximates a 90 degree arc with a cubic Bezier curve which matches
/// the arc at the 45 degree point and has the same tangent there.
const ARC_BEZIER_PARAM: f32 = 4.0 * (std::f32::consts::SQRT_2 - 1.0) / 3.0;

const CURRENT_POINT_EPSILON: f32 = 1e-4;

#[derive(Clone, Copy, Debug)]
enum PathCommand {
    MoveTo { x: f32, y: f32 },
    LineTo { x: f32, y: f32 },
    QuadTo { x1: f32, y1: f32, x: f32, y: f32 },
    CubicTo { x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32 },
    Close,
}

/// A path under construction.
///
/// Stores move/line/quadratic/cubic/close commands; elliptic arcs are
/// decomposed into cubic curves on insertion. Tracks the current point and
/// the subpath start point. A flattened polyline is produced on demand and
/// cached until the next mutation.
pub struct Path {
    commands: Vec<PathCommand>,
    subpath_start: (f32, f32),
    current: Option<(f32, f32)>,
    polyline: Option<Polyline>,
}

impl Path {
    pub fn new() -> Self {
        Path {
            commands: Vec::new(),
            subpath_start: (0.0, 0.0),
            current: None,
            polyline: None,
        }
    }

    #[inline]
    fn invalidate(&mut self) {
        self.polyline = None;
    }

    pub fn current_point(&self) -> Option<(f32, f32)> {
        self.current
    }

    pub fn clear(&mut self) {
        self.commands.clear();
        self.subpath_start = (0.0, 0.0);
        self.current = None;
        self.invalidate();
    }

    pub fn move_abs(&mut self, x: f32, y: f32) {
        self.commands.push(PathCommand::MoveTo { x, y });
        self.subpath_start = (x, y);
        self.current = Some((x, y));
        self.invalidate();
    }

    pub fn move_rel(&mut self, dx: f32, dy: f32) {
        let (cx, cy) = self.current.unwrap_or((0.0, 0.0));
        self.move_abs(cx + dx, cy + dy);
    }

    pub fn line_abs(&mut self, x: f32, y: f32) {
        if self.current.is_none() {
            self.move_abs(x, y);
            return;
        }

        self.commands.push(PathCommand::LineTo { x, y });
        self.current = Some((x, y));
        self.invalidate();
    }

    pub fn line_rel(&mut self, dx: f32, dy: f32) {
        let (cx, cy) = self.current.unwrap_or((0.0, 0.0));
        self.line_abs(cx + dx, cy + dy);
    }

    pub fn quadratic_abs(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        if self.current.is_none() {
            self.move_abs(0.0, 0.0);
        }

        self.commands.push(PathCommand::QuadTo { x1, y1, x, y });
        self.current = Some((x, y));
        self.invalidate();
    }

    pub fn quadratic_rel(&mut self, dx1: f32, dy1: f32, dx: f32, dy: f32) {
        let (cx, cy) = self.current.unwrap_or((0.0, 0.0));
        self.quadratic_abs(cx + dx1, cy + dy1, cx + dx, cy + dy);
    }

    pub fn cubic_abs(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        if self.current.is_none() {
            self.move_abs(0.0, 0.0);
        }

        self.commands.push(PathCommand::CubicTo {
            x1,
            y1,
            x2,
            y2,
            x,
            y,
        });
        self.current = Some((x, y));
        self.invalidate();
    }

    pub fn cubic_rel(&mut self, dx1: f32, dy1: f32, dx2: f32, dy2: f32, dx: f32, dy: f32) {
        let (cx, cy) = self.current.unwrap_or((0.0, 0.0));
        self.cubic_abs(
            cx + dx1,
            cy + dy1,
            cx + dx2,
            cy + dy2,
            cx + dx,
            cy + dy,
        );
    }

    pub fn close(&mut self) {
        self.commands.push(PathCommand::Close);
        self.current = Some(self.subpath_start);
        self.invalidate();
    }

    /// Appends an elliptic arc given by its endpoint and flags,
    /// as produced by the SVG `A` path command.
    ///
    /// `x_axis_rotation` is in radians.
    ///
    /// An arc with a non-positive `rx` or a non-positive `ry/rx` ratio
    /// appends nothing and does not move the current point.
    pub fn arc_abs(
        &mut self,
        x: f32,
        y: f32,
        rx: f32,
        ry: f32,
        x_axis_rotation: f32,
        large_arc: bool,
        sweep: bool,
    ) {
        let cur = self.current.unwrap_or((0.0, 0.0));

        if rx <= 0.0 {
            return;
        }
        let radii_ratio = ry / rx;
        if radii_ratio <= 0.0 {
            return;
        }

        // the end point relative to the current point, with the axis
        // rotation cancelled and the ellipse squashed into a circle
        let (ex, mut ey) = rotate((x - cur.0, y - cur.1), -x_axis_rotation);
        ey /= radii_ratio;

        // the angle between the end point and the x axis
        let angle = ey.atan2(ex);

        // put the end point onto the x axis
        let len = (ex * ex + ey * ey).sqrt();

        // update the x radius if it is too small
        let rx = rx.max(len / 2.0);

        // one of the two circle centers
        let half = len / 2.0;
        let mut center = (half, (rx * rx - half * half).max(0.0).sqrt());

        // choose between the two circles according to the flags
        if !(large_arc ^ sweep) {
            center.1 = -center.1;
        }

        // put the end point and the center back to their positions
        let end = rotate((len, 0.0), angle);
        let center = rotate(center, angle);

        let mut angle1 = (-center.1).atan2(-center.0);
        let mut angle2 = (end.1 - center.1).atan2(end.0 - center.0);

        use std::f32::consts::PI;
        if sweep {
            if angle1 > angle2 {
                angle1 -= 2.0 * PI;
            }
        } else {
            if angle2 > angle1 {
                angle2 -= 2.0 * PI;
            }
        }

        // local arc space -> user space:
        // translate(cur) * rotate(x_axis_rotation) * scale(1, radii_ratio)
        let map = move |p: (f32, f32)| {
            let p = rotate((p.0, p.1 * radii_ratio), x_axis_rotation);
            (p.0 + cur.0, p.1 + cur.1)
        };

        self.emit_arc(center, (rx, rx), angle1, angle2 - angle1, map);
    }

    /// A relative version of [`Path::arc_abs`].
    pub fn arc_rel(
        &mut self,
        dx: f32,
        dy: f32,
        rx: f32,
        ry: f32,
        x_axis_rotation: f32,
        large_arc: bool,
        sweep: bool,
    ) {
        let (cx, cy) = self.current.unwrap_or((0.0, 0.0));
        self.arc_abs(cx + dx, cy + dy, rx, ry, x_axis_rotation, large_arc, sweep);
    }

    /// Appends an elliptic arc given by its center, radii and angles.
    pub fn arc_center_abs(
        &mut self,
        center: (f32, f32),
        radii: (f32, f32),
        start_angle: f32,
        sweep_angle: f32,
    ) {
        self.emit_arc(center, radii, start_angle, sweep_angle, |p| p);
    }

    /// Approximates an arc with cubic curves, at most 90 degrees each,
    /// mapping every emitted point through `map`.
    fn emit_arc(
        &mut self,
        center: (f32, f32),
        radii: (f32, f32),
        start_angle: f32,
        sweep_angle: f32,
        map: impl Fn((f32, f32)) -> (f32, f32),
    ) {
        if sweep_angle == 0.0 {
            return;
        }

        let (cx, cy) = center;
        let (rx, ry) = radii;

        let point_at = |a: f32| (cx + rx * a.cos(), cy + ry * a.sin());
        let tangent_at = |a: f32| (-rx * a.sin(), ry * a.cos());

        let start = map(point_at(start_angle));
        match self.current {
            Some((cx, cy))
                if (cx - start.0).abs() < CURRENT_POINT_EPSILON
                    && (cy - start.1).abs() < CURRENT_POINT_EPSILON => {}
            Some(_) => self.line_abs(start.0, start.1),
            None => self.move_abs(start.0, start.1),
        }

        let segments = (sweep_angle.abs() / std::f32::consts::FRAC_PI_2)
            .ceil()
            .max(1.0) as usize;
        let delta = sweep_angle / segments as f32;
        let k = 4.0 / 3.0 * (delta / 4.0).tan();

        let mut a = start_angle;
        for _ in 0..segments {
            let b = a + delta;
            let p0 = point_at(a);
            let p3 = point_at(b);
            let t0 = tangent_at(a);
            let t3 = tangent_at(b);

            let c1 = map((p0.0 + k * t0.0, p0.1 + k * t0.1));
            let c2 = map((p3.0 - k * t3.0, p3.1 - k * t3.1));
            let p3 = map(p3);
            self.cubic_abs(c1.0, c1.1, c2.0, c2.1, p3.0, p3.1);

            a = b;
        }
    }

    /// Appends a rectangle, with rounded corners when radii are positive.
    pub fn rectangle(&mut self, x: f32, y: f32, w: f32, h: f32, rx: f32, ry: f32) {
        if rx <= 0.0 || ry <= 0.0 {
            self.move_abs(x, y);
            self.line_abs(x + w, y);
            self.line_abs(x + w, y + h);
            self.line_abs(x, y + h);
            self.close();
            return;
        }

        let k = ARC_BEZIER_PARAM;

        self.move_abs(x + rx, y);
        self.line_abs(x + w - rx, y);
        self.cubic_rel(k * rx, 0.0, rx, ry * (1.0 - k), rx, ry);
        self.line_abs(x + w, y + h - ry);
        self.cubic_rel(0.0, k * ry, -rx * (1.0 - k), ry, -rx, ry);
        self.line_abs(x + rx, y + h);
        self.cubic_rel(-k * rx, 0.0, -rx, -(1.0 - k) * ry, -rx, -ry);
        self.line_abs(x, y + ry);
        self.cubic_rel(0.0, -k * ry, (1.0 - k) * rx, -ry, rx, -ry);
        self.close();
    }

    /// Appends a circle built from four 90 degree cubic arcs.
    pub fn circle(&mut self, cx: f32, cy: f32, r: f32) {
        let k = ARC_BEZIER_PARAM;

        self.move_abs(cx + r, cy);
        self.cubic_rel(0.0, k * r, -r * (1.0 - k), r, -r, r);
        self.cubic_rel(-k * r, 0.0, -r, -r * (1.0 - k), -r, -r);
        self.cubic_rel(0.0, -k * r, r * (1.0 - k), -r, r, -r);
        self.cubic_rel(k * r, 0.0, r, r * (1.0 - k), r, r);
        self.close();
    }

    /// Returns the bounding box of all submitted vertices and control
    /// points, exclusive of stroking.
    pub fn bounds(&self) -> BBox {
        let mut bbox = BBox::new_empty();
        for cmd in &self.commands {
            match *cmd {
                PathCommand::MoveTo { x, y } | PathCommand::LineTo { x, y } => {
                    bbox.add_point(x, y);
                }
                PathCommand::QuadTo { x1, y1, x, y } => {
                    bbox.add_point(x1, y1);
                    bbox.add_point(x, y);
                }
                PathCommand::CubicTo {
                    x1,
                    y1,
                    x2,
                    y2,
                    x,
                    y,
                } => {
                    bbox.add_point(x1, y1);
                    bbox.add_point(x2, y2);
                    bbox.add_point(x, y);
                }
                PathCommand::Close => {}
            }
        }

        bbox
    }

    /// Converts the stored commands into a `tiny_skia` path.
    ///
    /// Returns `None` for an empty path.
    pub fn to_skia_path(&self) -> Option<tiny_skia::Path> {
        let mut pb = tiny_skia::PathBuilder::new();
        let mut start = (0.0, 0.0);
        let mut after_close = false;
        let reopen = |pb: &mut tiny_skia::PathBuilder, after_close: &mut bool, start: (f32, f32)| {
            if *after_close {
                pb.move_to(start.0, start.1);
                *after_close = false;
            }
        };

        for cmd in &self.commands {
            match *cmd {
                PathCommand::MoveTo { x, y } => {
                    pb.move_to(x, y);
                    start = (x, y);
                    after_close = false;
                }
                PathCommand::LineTo { x, y } => {
                    reopen(&mut pb, &mut after_close, start);
                    pb.line_to(x, y);
                }
                PathCommand::QuadTo { x1, y1, x, y } => {
                    reopen(&mut pb, &mut after_close, start);
                    pb.quad_to(x1, y1, x, y);
                }
                PathCommand::CubicTo {
                    x1,
                    y1,
                    x2,
                    y2,
                    x,
                    y,
                } => {
                    reopen(&mut pb, &mut after_close, start);
                    pb.cubic_to(x1, y1, x2, y2, x, y);
                }
                PathCommand::Close => {
                    pb.close();
                    after_close = true;
                }
            }
        }

        pb.finish()
    }

    /// Flattens the path into a polyline, caching the result until the
    /// next mutation.
    pub fn flatten(&mut self, approximation_scale: f32) -> &Polyline {
        if self.polyline.is_none() {
            self.polyline = Some(self.flatten_uncached(approximation_scale));
        }

        self.polyline.as_ref().unwrap()
    }

    fn flatten_uncached(&self, approximation_scale: f32) -> Polyline {
        let tolerance = 1.0 / (4.0 * approximation_scale);

        let mut subpaths = Vec::new();
        let mut points: Vec<(f32, f32)> = Vec::new();
        let mut start = (0.0, 0.0);
        let mut closed = false;

        macro_rules! finish_subpath {
            () => {
                if points.len() > 1 {
                    subpaths.push(Subpath {
                        points: std::mem::take(&mut points),
                        closed,
                    });
                } else {
                    points.clear();
                }
                closed = false;
            };
        }

        for cmd in &self.commands {
            // a draw command right after a close reopens the subpath
            // at its start point
            if closed {
                if let PathCommand::Close | PathCommand::MoveTo { .. } = cmd {
                } else {
                    finish_subpath!();
                    points.push(start);
                }
            }

            let last = *points.last().unwrap_or(&(0.0, 0.0));
            match *cmd {
                PathCommand::MoveTo { x, y } => {
                    finish_subpath!();
                    start = (x, y);
                    points.push(start);
                }
                PathCommand::LineTo { x, y } => {
                    points.push((x, y));
                }
                PathCommand::QuadTo { x1, y1, x, y } => {
                    // elevate the quadratic to a cubic
                    let c1 = (
                        2.0 / 3.0 * x1 + 1.0 / 3.0 * last.0,
                        2.0 / 3.0 * y1 + 1.0 / 3.0 * last.1,
                    );
                    let c2 = (2.0 / 3.0 * x1 + 1.0 / 3.0 * x, 2.0 / 3.0 * y1 + 1.0 / 3.0 * y);
                    flatten_cubic(last, c1, c2, (x, y), tolerance, 0, &mut points);
                }
                PathCommand::CubicTo {
                    x1,
                    y1,
                    x2,
                    y2,
                    x,
                    y,
                } => {
                    flatten_cubic(last, (x1, y1), (x2, y2), (x, y), tolerance, 0, &mut points);
                }
                PathCommand::Close => {
                    closed = true;
                }
            }
        }
        finish_subpath!();

        Polyline { subpaths }
    }
}

/// A flattened path: line segments only.
#[derive(Clone, Debug)]
pub struct Polyline {
    pub subpaths: Vec<Subpath>,
}

#[derive(Clone, Debug)]
pub struct Subpath {
    pub points: Vec<(f32, f32)>,
    pub closed: bool,
}

impl Polyline {
    /// Splits the polyline into dash/gap subsegments.
    ///
    /// `pattern` must be an even-length list of positive lengths
    /// (see `Canvas::set_dash_pattern` for the normalization rules).
    /// A negative `offset` is taken from the end of the pattern.
    /// The dash pattern restarts at every subpath.
    pub fn dash(&self, pattern: &[f32], offset: f32) -> Polyline {
        debug_assert!(pattern.len() % 2 == 0);

        let total: f32 = pattern.iter().sum();
        if pattern.is_empty() || total <= 1e-3 {
            return self.clone();
        }

        let mut out = Vec::new();

        for subpath in &self.subpaths {
            if subpath.points.len() < 2 {
                continue;
            }

            // apply the dash offset
            let mut off = offset % total;
            if off < 0.0 {
                off += total;
            }
            let mut idx = 0;
            let mut rem = pattern[0];
            while off >= rem {
                off -= rem;
                idx = (idx + 1) % pattern.len();
                rem = pattern[idx];
            }
            rem -= off;

            let mut on = idx % 2 == 0;
            let mut dash: Vec<(f32, f32)> = Vec::new();
            if on {
                dash.push(subpath.points[0]);
            }

            let segments = subpath
                .points
                .windows(2)
                .map(|w| (w[0], w[1]))
                .chain(if subpath.closed {
                    Some((
                        *subpath.points.last().unwrap(),
                        subpath.points[0],
                    ))
                } else {
                    None
                });

            for (p, q) in segments {
                let (dx, dy) = (q.0 - p.0, q.1 - p.1);
                let seg_len = (dx * dx + dy * dy).sqrt();
                if seg_len <= 0.0 {
                    continue;
                }

                let mut pos = 0.0;
                while pos < seg_len {
                    let take = rem.min(seg_len - pos);
                    pos += take;
                    rem -= take;

                    let t = pos / seg_len;
                    let pt = (p.0 + dx * t, p.1 + dy * t);
                    if on {
                        dash.push(pt);
                    }

                    if rem <= 1e-6 {
                        if on && dash.len() > 1 {
                            out.push(Subpath {
                                points: std::mem::take(&mut dash),
                                closed: false,
                            });
                        }

                        idx = (idx + 1) % pattern.len();
                        rem = pattern[idx];
                        on = !on;
                        if on {
                            dash = vec![pt];
                        }
                    }
                }
            }

            if on && dash.len() > 1 {
                out.push(Subpath {
                    points: dash,
                    closed: false,
                });
            }
        }

        Polyline { subpaths: out }
    }

    /// Converts the polyline into a `tiny_skia` path.
    pub fn to_skia_path(&self) -> Option<tiny_skia::Path> {
        let mut pb = tiny_skia::PathBuilder::new();
        for subpath in &self.subpaths {
            if subpath.points.len() < 2 {
                continue;
            }

            pb.move_to(subpath.points[0].0, subpath.points[0].1);
            for p in &subpath.points[1..] {
                pb.line_to(p.0, p.1);
            }
            if subpath.closed {
                pb.close();
            }
        }

        pb.finish()
    }
}

#[inline]
fn rotate(v: (f32, f32), angle: f32) -> (f32, f32) {
    let (sin, cos) = angle.sin_cos();
    (v.0 * cos - v.1 * sin, v.0 * sin + v.1 * cos)
}

fn flatten_cubic(
    p0: (f32, f32),
    p1: (f32, f32),
    p2: (f32, f32),
    p3: (f32, f32),
    tolerance: f32,
    depth: u8,
    out: &mut Vec<(f32, f32)>,
) {
    let d1 = segment_distance(p1, p0, p3);
    let d2 = segment_distance(p2, p0, p3);

    if depth >= 16 || (d1 <= tolerance && d2 <= tolerance) {
        out.push(p3);
        return;
    }

    // de Casteljau split at t = 0.5
    let mid = |a: (f32, f32), b: (f32, f32)| ((a.0 + b.0) * 0.5, (a.1 + b.1) * 0.5);
    let p01 = mid(p0, p1);
    let p12 = mid(p1, p2);
    let p23 = mid(p2, p3);
    let p012 = mid(p01, p12);
    let p123 = mid(p12, p23);
    let p0123 = mid(p012, p123);

    flatten_cubic(p0, p01, p012, p0123, tolerance, depth + 1, out);
    flatten_cubic(p0123, p123, p23, p3, tolerance, depth + 1, out);
}

/// Distance from `p` to the segment `a..b`.
fn segment_distance(p: (f32, f32), a: (f32, f32), b: (f32, f32)) -> f32 {
    let (abx, aby) = (b.0 - a.0, b.1 - a.1);
    let (apx, apy) = (p.0 - a.0, p.1 - a.1);
    let len_sq = abx * abx + aby * aby;
    if len_sq < 1e-12 {
        return (apx * apx + apy * apy).sqrt();
    }

    (abx * apy - aby * apx).abs() / len_sq.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_commands_promote_to_absolute() {
        let mut p = Path::new();
        p.move_rel(10.0, 20.0);
        assert_eq!(p.current_point(), Some((10.0, 20.0)));

        let mut p = Path::new();
        p.line_rel(5.0, 5.0);
        assert_eq!(p.current_point(), Some((5.0, 5.0)));
    }

    #[test]
    fn close_resets_current_point_to_subpath_start() {
        let mut p = Path::new();
        p.move_abs(1.0, 2.0);
        p.line_abs(10.0, 2.0);
        p.line_abs(10.0, 12.0);
        p.close();
        assert_eq!(p.current_point(), Some((1.0, 2.0)));
    }

    #[test]
    fn degenerate_arc_does_not_move_current_point() {
        let mut p = Path::new();
        p.move_abs(1.0, 1.0);
        p.arc_abs(10.0, 10.0, 0.0, 5.0, 0.0, false, true);
        assert_eq!(p.current_point(), Some((1.0, 1.0)));

        p.arc_abs(10.0, 10.0, 5.0, -5.0, 0.0, false, true);
        assert_eq!(p.current_point(), Some((1.0, 1.0)));
    }

    #[test]
    fn arc_ends_at_the_requested_point() {
        let mut p = Path::new();
        p.move_abs(0.0, 0.0);
        p.arc_abs(10.0, 0.0, 5.0, 5.0, 0.0, false, true);
        let (x, y) = p.current_point().unwrap();
        assert!((x - 10.0).abs() < 1e-3);
        assert!(y.abs() < 1e-3);
    }

    #[test]
    fn bounds_contain_control_points() {
        let mut p = Path::new();
        p.move_abs(0.0, 0.0);
        p.cubic_abs(0.0, -50.0, 100.0, 50.0, 100.0, 0.0);

        let b = p.bounds();
        assert_eq!(b.y(), -50.0);
        assert_eq!(b.height(), 100.0);
        assert_eq!(b.width(), 100.0);
    }

    #[test]
    fn circle_bounds() {
        let mut p = Path::new();
        p.circle(50.0, 50.0, 10.0);
        let b = p.bounds();
        assert!((b.x() - 40.0).abs() < 1e-4);
        assert!((b.y() - 40.0).abs() < 1e-4);
        assert!((b.width() - 20.0).abs() < 1e-4);
    }

    #[test]
    fn flatten_caches_until_mutation() {
        let mut p = Path::new();
        p.move_abs(0.0, 0.0);
        p.line_abs(10.0, 0.0);
        let n = p.flatten(10.0).subpaths.len();
        assert_eq!(n, 1);

        p.line_abs(10.0, 10.0);
        let pl = p.flatten(10.0);
        assert_eq!(pl.subpaths[0].points.len(), 3);
    }

    #[test]
    fn flattened_arc_stays_near_the_circle() {
        let mut p = Path::new();
        p.circle(0.0, 0.0, 100.0);
        let pl = p.flatten(10.0);
        for sub in &pl.subpaths {
            for &(x, y) in &sub.points {
                let r = (x * x + y * y).sqrt();
                assert!((r - 100.0).abs() < 0.5, "point too far from circle: {}", r);
            }
        }
    }

    #[test]
    fn dash_splits_a_line() {
        let pl = Polyline {
            subpaths: vec![Subpath {
                points: vec![(0.0, 0.0), (10.0, 0.0)],
                closed: false,
            }],
        };

        let dashed = pl.dash(&[2.0, 3.0], 0.0);
        assert_eq!(dashed.subpaths.len(), 2);
        assert_close(dashed.subpaths[0].points[0], (0.0, 0.0));
        assert_close(*dashed.subpaths[0].points.last().unwrap(), (2.0, 0.0));
        assert_close(dashed.subpaths[1].points[0], (5.0, 0.0));
        assert_close(*dashed.subpaths[1].points.last().unwrap(), (7.0, 0.0));
    }

    fn assert_close(a: (f32, f32), b: (f32, f32)) {
        assert!(
            (a.0 - b.0).abs() < 1e-3 && (a.1 - b.1).abs() < 1e-3,
            "{:?} != {:?}",
            a,
            b
        );
    }

    #[test]
    fn negative_dash_offset_wraps() {
        let pl = Polyline {
            subpaths: vec![Subpath {
                points: vec![(0.0, 0.0), (10.0, 0.0)],
                closed: false,
            }],
        };

        // offset -1 == offset 4 for a [2, 3] pattern: the first dash
        // starts at x = 1
        let dashed = pl.dash(&[2.0, 3.0], -1.0);
        assert_close(dashed.subpaths[0].points[0], (1.0, 0.0));
    }
}
