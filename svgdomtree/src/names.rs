use std::fmt;

/// A tag name of a known SVG element.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[allow(missing_docs)]
pub enum ElementId {
    A,
    Circle,
    Defs,
    Ellipse,
    FeBlend,
    FeColorMatrix,
    FeComposite,
    FeGaussianBlur,
    Filter,
    G,
    Line,
    LinearGradient,
    Mask,
    Path,
    Polygon,
    Polyline,
    RadialGradient,
    Rect,
    Stop,
    Style,
    Svg,
    Symbol,
    Use,
}

impl ElementId {
    /// Parses a tag name. Unknown names return `None`.
    pub fn from_str(s: &str) -> Option<Self> {
        Some(match s {
            "a" => ElementId::A,
            "circle" => ElementId::Circle,
            "defs" => ElementId::Defs,
            "ellipse" => ElementId::Ellipse,
            "feBlend" => ElementId::FeBlend,
            "feColorMatrix" => ElementId::FeColorMatrix,
            "feComposite" => ElementId::FeComposite,
            "feGaussianBlur" => ElementId::FeGaussianBlur,
            "filter" => ElementId::Filter,
            "g" => ElementId::G,
            "line" => ElementId::Line,
            "linearGradient" => ElementId::LinearGradient,
            "mask" => ElementId::Mask,
            "path" => ElementId::Path,
            "polygon" => ElementId::Polygon,
            "polyline" => ElementId::Polyline,
            "radialGradient" => ElementId::RadialGradient,
            "rect" => ElementId::Rect,
            "stop" => ElementId::Stop,
            "style" => ElementId::Style,
            "svg" => ElementId::Svg,
            "symbol" => ElementId::Symbol,
            "use" => ElementId::Use,
            _ => return None,
        })
    }

    /// Returns the SVG tag name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementId::A => "a",
            ElementId::Circle => "circle",
            ElementId::Defs => "defs",
            ElementId::Ellipse => "ellipse",
            ElementId::FeBlend => "feBlend",
            ElementId::FeColorMatrix => "feColorMatrix",
            ElementId::FeComposite => "feComposite",
            ElementId::FeGaussianBlur => "feGaussianBlur",
            ElementId::Filter => "filter",
            ElementId::G => "g",
            ElementId::Line => "line",
            ElementId::LinearGradient => "linearGradient",
            ElementId::Mask => "mask",
            ElementId::Path => "path",
            ElementId::Polygon => "polygon",
            ElementId::Polyline => "polyline",
            ElementId::RadialGradient => "radialGradient",
            ElementId::Rect => "rect",
            ElementId::Stop => "stop",
            ElementId::Style => "style",
            ElementId::Svg => "svg",
            ElementId::Symbol => "symbol",
            ElementId::Use => "use",
        }
    }

    /// Checks if this is a
    /// [gradient element](https://www.w3.org/TR/SVG11/intro.html#TermGradientElement).
    pub fn is_gradient(&self) -> bool {
        matches!(self, ElementId::LinearGradient | ElementId::RadialGradient)
    }

    /// Checks if this is a
    /// [shape element](https://www.w3.org/TR/SVG11/intro.html#TermShapeElement)
    /// or a `path`.
    pub fn is_shape(&self) -> bool {
        matches!(
            self,
            ElementId::Circle
                | ElementId::Ellipse
                | ElementId::Line
                | ElementId::Path
                | ElementId::Polygon
                | ElementId::Polyline
                | ElementId::Rect
        )
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A name of a known SVG attribute.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[allow(missing_docs)]
pub enum AttributeId {
    Class,
    Color,
    Cx,
    Cy,
    D,
    Display,
    EnableBackground,
    Fill,
    FillOpacity,
    FillRule,
    Filter,
    FilterUnits,
    Fx,
    Fy,
    GradientTransform,
    GradientUnits,
    Height,
    Href,
    Id,
    In,
    In2,
    K1,
    K2,
    K3,
    K4,
    Mask,
    Mode,
    Offset,
    Opacity,
    Operator,
    Points,
    PreserveAspectRatio,
    PrimitiveUnits,
    R,
    Result,
    Rx,
    Ry,
    SpreadMethod,
    StdDeviation,
    StopColor,
    StopOpacity,
    Stroke,
    StrokeDasharray,
    StrokeDashoffset,
    StrokeLinecap,
    StrokeLinejoin,
    StrokeMiterlimit,
    StrokeOpacity,
    StrokeWidth,
    Style,
    Transform,
    Type,
    Values,
    ViewBox,
    Visibility,
    Width,
    X,
    X1,
    X2,
    Y,
    Y1,
    Y2,
}

impl AttributeId {
    /// Parses an attribute name. Unknown names return `None`.
    pub fn from_str(s: &str) -> Option<Self> {
        Some(match s {
            "class" => AttributeId::Class,
            "color" => AttributeId::Color,
            "cx" => AttributeId::Cx,
            "cy" => AttributeId::Cy,
            "d" => AttributeId::D,
            "display" => AttributeId::Display,
            "enable-background" => AttributeId::EnableBackground,
            "fill" => AttributeId::Fill,
            "fill-opacity" => AttributeId::FillOpacity,
            "fill-rule" => AttributeId::FillRule,
            "filter" => AttributeId::Filter,
            "filterUnits" => AttributeId::FilterUnits,
            "fx" => AttributeId::Fx,
            "fy" => AttributeId::Fy,
            "gradientTransform" => AttributeId::GradientTransform,
            "gradientUnits" => AttributeId::GradientUnits,
            "height" => AttributeId::Height,
            "href" => AttributeId::Href,
            "id" => AttributeId::Id,
            "in" => AttributeId::In,
            "in2" => AttributeId::In2,
            "k1" => AttributeId::K1,
            "k2" => AttributeId::K2,
            "k3" => AttributeId::K3,
            "k4" => AttributeId::K4,
            "mask" => AttributeId::Mask,
            "mode" => AttributeId::Mode,
            "offset" => AttributeId::Offset,
            "opacity" => AttributeId::Opacity,
            "operator" => AttributeId::Operator,
            "points" => AttributeId::Points,
            "preserveAspectRatio" => AttributeId::PreserveAspectRatio,
            "primitiveUnits" => AttributeId::PrimitiveUnits,
            "r" => AttributeId::R,
            "result" => AttributeId::Result,
            "rx" => AttributeId::Rx,
            "ry" => AttributeId::Ry,
            "spreadMethod" => AttributeId::SpreadMethod,
            "stdDeviation" => AttributeId::StdDeviation,
            "stop-color" => AttributeId::StopColor,
            "stop-opacity" => AttributeId::StopOpacity,
            "stroke" => AttributeId::Stroke,
            "stroke-dasharray" => AttributeId::StrokeDasharray,
            "stroke-dashoffset" => AttributeId::StrokeDashoffset,
            "stroke-linecap" => AttributeId::StrokeLinecap,
            "stroke-linejoin" => AttributeId::StrokeLinejoin,
            "stroke-miterlimit" => AttributeId::StrokeMiterlimit,
            "stroke-opacity" => AttributeId::StrokeOpacity,
            "stroke-width" => AttributeId::StrokeWidth,
            "style" => AttributeId::Style,
            "transform" => AttributeId::Transform,
            "type" => AttributeId::Type,
            "values" => AttributeId::Values,
            "viewBox" => AttributeId::ViewBox,
            "visibility" => AttributeId::Visibility,
            "width" => AttributeId::Width,
            "x" => AttributeId::X,
            "x1" => AttributeId::X1,
            "x2" => AttributeId::X2,
            "y" => AttributeId::Y,
            "y1" => AttributeId::Y1,
            "y2" => AttributeId::Y2,
            _ => return None,
        })
    }

    /// Returns the SVG attribute name.
    pub fn as_str(&self) -> &'static str {
        match self {
            AttributeId::Class => "class",
            AttributeId::Color => "color",
            AttributeId::Cx => "cx",
            AttributeId::Cy => "cy",
            AttributeId::D => "d",
            AttributeId::Display => "display",
            AttributeId::EnableBackground => "enable-background",
            AttributeId::Fill => "fill",
            AttributeId::FillOpacity => "fill-opacity",
            AttributeId::FillRule => "fill-rule",
            AttributeId::Filter => "filter",
            AttributeId::FilterUnits => "filterUnits",
            AttributeId::Fx => "fx",
            AttributeId::Fy => "fy",
            AttributeId::GradientTransform => "gradientTransform",
            AttributeId::GradientUnits => "gradientUnits",
            AttributeId::Height => "height",
            AttributeId::Href => "href",
            AttributeId::Id => "id",
            AttributeId::In => "in",
            AttributeId::In2 => "in2",
            AttributeId::K1 => "k1",
            AttributeId::K2 => "k2",
            AttributeId::K3 => "k3",
            AttributeId::K4 => "k4",
            AttributeId::Mask => "mask",
            AttributeId::Mode => "mode",
            AttributeId::Offset => "offset",
            AttributeId::Opacity => "opacity",
            AttributeId::Operator => "operator",
            AttributeId::Points => "points",
            AttributeId::PreserveAspectRatio => "preserveAspectRatio",
            AttributeId::PrimitiveUnits => "primitiveUnits",
            AttributeId::R => "r",
            AttributeId::Result => "result",
            AttributeId::Rx => "rx",
            AttributeId::Ry => "ry",
            AttributeId::SpreadMethod => "spreadMethod",
            AttributeId::StdDeviation => "stdDeviation",
            AttributeId::StopColor => "stop-color",
            AttributeId::StopOpacity => "stop-opacity",
            AttributeId::Stroke => "stroke",
            AttributeId::StrokeDasharray => "stroke-dasharray",
            AttributeId::StrokeDashoffset => "stroke-dashoffset",
            AttributeId::StrokeLinecap => "stroke-linecap",
            AttributeId::StrokeLinejoin => "stroke-linejoin",
            AttributeId::StrokeMiterlimit => "stroke-miterlimit",
            AttributeId::StrokeOpacity => "stroke-opacity",
            AttributeId::StrokeWidth => "stroke-width",
            AttributeId::Style => "style",
            AttributeId::Transform => "transform",
            AttributeId::Type => "type",
            AttributeId::Values => "values",
            AttributeId::ViewBox => "viewBox",
            AttributeId::Visibility => "visibility",
            AttributeId::Width => "width",
            AttributeId::X => "x",
            AttributeId::X1 => "x1",
            AttributeId::X2 => "x2",
            AttributeId::Y => "y",
            AttributeId::Y1 => "y1",
            AttributeId::Y2 => "y2",
        }
    }

    /// Checks if this is a presentation attribute.
    pub fn is_presentation(&self) -> bool {
        matches!(
            self,
            AttributeId::Color
                | AttributeId::Display
                | AttributeId::EnableBackground
                | AttributeId::Fill
                | AttributeId::FillOpacity
                | AttributeId::FillRule
                | AttributeId::Filter
                | AttributeId::Mask
                | AttributeId::Opacity
                | AttributeId::StopColor
                | AttributeId::StopOpacity
                | AttributeId::Stroke
                | AttributeId::StrokeDasharray
                | AttributeId::StrokeDashoffset
                | AttributeId::StrokeLinecap
                | AttributeId::StrokeLinejoin
                | AttributeId::StrokeMiterlimit
                | AttributeId::StrokeOpacity
                | AttributeId::StrokeWidth
                | AttributeId::Visibility
        )
    }

    /// Checks if the current attribute is inheritable.
    pub fn is_inheritable(&self) -> bool {
        self.is_presentation() && !self.is_non_inheritable()
    }

    fn is_non_inheritable(&self) -> bool {
        matches!(
            self,
            AttributeId::Display
                | AttributeId::EnableBackground
                | AttributeId::Filter
                | AttributeId::Mask
                | AttributeId::Opacity
                | AttributeId::StopColor
                | AttributeId::StopOpacity
        )
    }

    pub(crate) fn allows_inherit_value(&self) -> bool {
        self.is_presentation()
    }
}

impl fmt::Display for AttributeId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
