// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use svgtypes::{Length, LengthUnit};

/// The axis a percentage length resolves against.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum Axis {
    X,
    Y,
}

/// A coordinate system selector shared by gradients, masks and filters.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum CoordUnits {
    UserSpaceOnUse,
    ObjectBoundingBox,
}

impl CoordUnits {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "userSpaceOnUse" => Some(CoordUnits::UserSpaceOnUse),
            "objectBoundingBox" => Some(CoordUnits::ObjectBoundingBox),
            _ => None,
        }
    }
}

/// Converts a length into pixels.
///
/// Absolute units are resolved through `dpi`, percentages against the
/// current viewport: widths against its x dimension, heights against y.
pub fn length_to_px(l: Length, dpi: f64, viewport: (f32, f32), axis: Axis) -> f32 {
    let n = l.number;
    let px = match l.unit {
        LengthUnit::None | LengthUnit::Px => n,
        // no text support, so font-relative units resolve against the
        // initial font size
        LengthUnit::Em => n * 16.0,
        LengthUnit::Ex => n * 8.0,
        LengthUnit::In => n * dpi,
        LengthUnit::Cm => n * dpi / 2.54,
        LengthUnit::Mm => n * dpi / 25.4,
        LengthUnit::Pt => n * dpi / 72.0,
        LengthUnit::Pc => n * dpi / 6.0,
        LengthUnit::Percent => {
            let base = match axis {
                Axis::X => viewport.0,
                Axis::Y => viewport.1,
            };
            base as f64 * n / 100.0
        }
    };

    px as f32
}

/// Interprets a length as a fraction: percentages divide by 100,
/// plain numbers pass through, anything else is zero.
pub fn percent_to_fraction(l: Length) -> f32 {
    match l.unit {
        LengthUnit::Percent => (l.number / 100.0) as f32,
        LengthUnit::None => l.number as f32,
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn length(number: f64, unit: LengthUnit) -> Length {
        Length { number, unit }
    }

    #[test]
    fn absolute_units_use_dpi() {
        let vp = (100.0, 50.0);
        assert_eq!(length_to_px(length(1.0, LengthUnit::In), 96.0, vp, Axis::X), 96.0);
        assert_eq!(length_to_px(length(72.0, LengthUnit::Pt), 96.0, vp, Axis::X), 96.0);
        assert_eq!(length_to_px(length(2.54, LengthUnit::Cm), 96.0, vp, Axis::X), 96.0);
    }

    #[test]
    fn percent_resolves_against_the_viewport_axis() {
        let vp = (100.0, 50.0);
        assert_eq!(length_to_px(length(50.0, LengthUnit::Percent), 96.0, vp, Axis::X), 50.0);
        assert_eq!(length_to_px(length(50.0, LengthUnit::Percent), 96.0, vp, Axis::Y), 25.0);
    }

    #[test]
    fn fraction_conversion() {
        assert_eq!(percent_to_fraction(length(120.0, LengthUnit::Percent)), 1.2);
        assert_eq!(percent_to_fraction(length(0.5, LengthUnit::None)), 0.5);
        assert_eq!(percent_to_fraction(length(5.0, LengthUnit::Px)), 0.0);
    }
}
