// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/// How a gradient continues outside of its defined range.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum SpreadMethod {
    Pad,
    Reflect,
    Repeat,
}

/// A gradient color stop.
#[derive(Clone, Copy, Debug)]
pub struct GradientStop {
    /// Position in the 0..=1 range.
    pub offset: f32,
    /// Straight-alpha stop color.
    pub color: tiny_skia::Color,
}

#[derive(Clone, Copy, Debug)]
pub enum GradientKind {
    Linear {
        p0: (f32, f32),
        p1: (f32, f32),
    },
    Radial {
        focal: (f32, f32),
        center: (f32, f32),
        radius: f32,
    },
}

/// A linear or radial gradient paint source.
///
/// The gradient geometry is expressed in the user space that was active
/// when the gradient was constructed; `matrix` maps that space to screen
/// space. Gradients are shared by the canvas via `Rc`, so a configured
/// paint source stays alive until it is replaced.
pub struct Gradient {
    kind: GradientKind,
    stops: Vec<GradientStop>,
    spread: SpreadMethod,
    matrix: tiny_skia::Transform,
}

impl Gradient {
    pub fn new_linear(p0: (f32, f32), p1: (f32, f32), matrix: tiny_skia::Transform) -> Self {
        Gradient {
            kind: GradientKind::Linear { p0, p1 },
            stops: Vec::new(),
            spread: SpreadMethod::Pad,
            matrix,
        }
    }

    pub fn new_radial(
        focal: (f32, f32),
        center: (f32, f32),
        radius: f32,
        matrix: tiny_skia::Transform,
    ) -> Self {
        Gradient {
            kind: GradientKind::Radial {
                focal,
                center,
                radius,
            },
            stops: Vec::new(),
            spread: SpreadMethod::Pad,
            matrix,
        }
    }

    pub fn set_spread_method(&mut self, spread: SpreadMethod) {
        self.spread = spread;
    }

    /// Sets the stop list.
    ///
    /// A single stop is duplicated at offsets 0 and 1, so that it renders
    /// as a solid color.
    pub fn set_stops(&mut self, stops: &[GradientStop]) {
        self.stops.clear();
        if stops.len() == 1 {
            self.stops.push(GradientStop {
                offset: 0.0,
                color: stops[0].color,
            });
            self.stops.push(GradientStop {
                offset: 1.0,
                color: stops[0].color,
            });
        } else {
            self.stops.extend_from_slice(stops);
        }
    }

    pub fn stops(&self) -> &[GradientStop] {
        &self.stops
    }

    /// Builds a shader for a fill/stroke happening under `fill_matrix`.
    ///
    /// The shader transform is `fill_matrix⁻¹ * matrix`: it maps gradient
    /// definition space into the current user space, so that after the
    /// rasterizer applies `fill_matrix` the gradient lands on screen where
    /// it was defined.
    ///
    /// Returns `None` when there is nothing to paint (no stops) or when
    /// `fill_matrix` is not invertible.
    pub(crate) fn to_shader(
        &self,
        fill_matrix: tiny_skia::Transform,
    ) -> Option<tiny_skia::Shader<'static>> {
        if self.stops.is_empty() {
            return None;
        }

        let inv = match fill_matrix.invert() {
            Some(v) => v,
            None => {
                log::warn!("gradient used under a non-invertible transform");
                return None;
            }
        };
        let ts = inv.pre_concat(self.matrix);

        let mode = match self.spread {
            SpreadMethod::Pad => tiny_skia::SpreadMode::Pad,
            SpreadMethod::Reflect => tiny_skia::SpreadMode::Reflect,
            SpreadMethod::Repeat => tiny_skia::SpreadMode::Repeat,
        };

        let points = self
            .stops
            .iter()
            .map(|s| tiny_skia::GradientStop::new(s.offset, s.color))
            .collect::<Vec<_>>();

        let shader = match self.kind {
            GradientKind::Linear { p0, p1 } => tiny_skia::LinearGradient::new(
                tiny_skia::Point::from_xy(p0.0, p0.1),
                tiny_skia::Point::from_xy(p1.0, p1.1),
                points,
                mode,
                ts,
            ),
            GradientKind::Radial {
                focal,
                center,
                radius,
            } => tiny_skia::RadialGradient::new(
                tiny_skia::Point::from_xy(focal.0, focal.1),
                tiny_skia::Point::from_xy(center.0, center.1),
                radius,
                points,
                mode,
                ts,
            ),
        };

        // Degenerate geometry (zero radius, coincident points) cannot be
        // expressed as a gradient shader. SVG wants the last stop color.
        shader.or_else(|| {
            let last = self.stops.last()?;
            Some(tiny_skia::Shader::SolidColor(last.color))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_stop_is_expanded() {
        let mut g = Gradient::new_linear((0.0, 0.0), (1.0, 0.0), tiny_skia::Transform::identity());
        g.set_stops(&[GradientStop {
            offset: 0.5,
            color: tiny_skia::Color::from_rgba8(10, 20, 30, 255),
        }]);

        assert_eq!(g.stops().len(), 2);
        assert_eq!(g.stops()[0].offset, 0.0);
        assert_eq!(g.stops()[1].offset, 1.0);
    }

    #[test]
    fn no_stops_produce_no_shader() {
        let g = Gradient::new_linear((0.0, 0.0), (1.0, 0.0), tiny_skia::Transform::identity());
        assert!(g.to_shader(tiny_skia::Transform::identity()).is_none());
    }

    #[test]
    fn degenerate_radius_falls_back_to_solid() {
        let mut g = Gradient::new_radial(
            (0.0, 0.0),
            (0.0, 0.0),
            0.0,
            tiny_skia::Transform::identity(),
        );
        g.set_stops(&[
            GradientStop {
                offset: 0.0,
                color: tiny_skia::Color::from_rgba8(255, 0, 0, 255),
            },
            GradientStop {
                offset: 1.0,
                color: tiny_skia::Color::from_rgba8(0, 0, 255, 255),
            },
        ]);

        match g.to_shader(tiny_skia::Transform::identity()) {
            Some(tiny_skia::Shader::SolidColor(c)) => {
                assert_eq!(c.to_color_u8().blue(), 255);
            }
            other => panic!("expected a solid color fallback, got {:?}", other.is_some()),
        }
    }
}
