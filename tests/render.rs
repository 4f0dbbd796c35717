use once_cell::sync::Lazy;

use svgrast::svgdomtree::Document;
use svgrast::{Image, Parameters};

static CAMERA_SVG: Lazy<String> =
    Lazy::new(|| std::fs::read_to_string("tests/camera.svg").unwrap());

fn render(svg: &str) -> Image {
    render_with(svg, Parameters::default())
}

fn render_with(svg: &str, params: Parameters) -> Image {
    let doc = Document::parse_str(svg).unwrap();
    svgrast::render(&doc, &params).unwrap()
}

fn assert_pixel_near(p: [u8; 4], expected: [u8; 4], tolerance: i32) {
    for i in 0..4 {
        assert!(
            (p[i] as i32 - expected[i] as i32).abs() <= tolerance,
            "pixel {:?} != {:?}",
            p,
            expected
        );
    }
}

#[test]
fn requested_dimensions() {
    let image = render_with(
        &CAMERA_SVG,
        Parameters {
            dims_request: (10, 10),
            ..Parameters::default()
        },
    );

    assert_eq!(image.width, 10);
    assert_eq!(image.height, 10);
}

#[test]
fn dimensions_from_the_root() {
    let image = render(&CAMERA_SVG);
    assert_eq!(image.width, 64);
    assert_eq!(image.height, 64);
}

#[test]
fn one_zero_dimension_preserves_aspect_ratio() {
    let image = render_with(
        "<svg xmlns='http://www.w3.org/2000/svg' width='100' height='50'/>",
        Parameters {
            dims_request: (0, 100),
            ..Parameters::default()
        },
    );

    assert_eq!(image.width, 200);
    assert_eq!(image.height, 100);
}

#[test]
fn solid_circle() {
    let image = render(
        "<svg xmlns='http://www.w3.org/2000/svg' width='57' height='57'>\
            <path d='M28.5 0a28.5 28.5 0 100 57 28.5 28.5 0 100-57z' fill='#010101'/>\
        </svg>",
    );

    let center = image.pixel(28, 28);
    assert_eq!(center, [1, 1, 1, 255]);

    let corner = image.pixel(0, 0);
    assert_eq!(corner[3], 0);
}

#[test]
fn gaussian_blur_of_a_black_rect() {
    let image = render(
        "<svg xmlns='http://www.w3.org/2000/svg' width='100' height='100'>\
            <defs>\
                <filter id='f'><feGaussianBlur stdDeviation='5'/></filter>\
            </defs>\
            <rect x='30' y='30' width='40' height='40' filter='url(#f)'/>\
        </svg>",
    );

    // the exact center is still solid black
    let center = image.pixel(50, 50);
    assert!(center[3] >= 250, "center alpha = {}", center[3]);
    assert_eq!(center[0], 0);

    // far away from the filter region nothing is painted
    assert_eq!(image.pixel(0, 0)[3], 0);

    // along the left edge of the original rect the alpha falls off
    // monotonically away from the rect
    let mut prev = 255u8;
    for y in 50..100 {
        let a = image.pixel(30, y)[3];
        assert!(a <= prev, "alpha is not monotone at y = {}", y);
        prev = a;
    }
}

#[test]
fn linear_gradient_two_stops() {
    let image = render(
        "<svg xmlns='http://www.w3.org/2000/svg' width='100' height='1'>\
            <defs>\
                <linearGradient id='g' gradientUnits='userSpaceOnUse' \
                    x1='0' y1='0' x2='100' y2='0'>\
                    <stop offset='0' stop-color='red'/>\
                    <stop offset='1' stop-color='blue'/>\
                </linearGradient>\
            </defs>\
            <rect width='100' height='1' fill='url(#g)'/>\
        </svg>",
    );

    assert_pixel_near(image.pixel(0, 0), [255, 0, 0, 255], 2);
    assert_pixel_near(image.pixel(99, 0), [0, 0, 255, 255], 2);
    assert_pixel_near(image.pixel(50, 0), [127, 0, 127, 255], 2);
}

#[test]
fn gradient_with_one_stop_is_solid() {
    let image = render(
        "<svg xmlns='http://www.w3.org/2000/svg' width='10' height='10'>\
            <defs>\
                <linearGradient id='g'>\
                    <stop offset='0.5' stop-color='#204060'/>\
                </linearGradient>\
            </defs>\
            <rect width='10' height='10' fill='url(#g)'/>\
        </svg>",
    );

    assert_pixel_near(image.pixel(2, 2), [32, 64, 96, 255], 1);
    assert_pixel_near(image.pixel(8, 8), [32, 64, 96, 255], 1);
}

#[test]
fn gradient_inherits_through_href() {
    let image = render(
        "<svg xmlns='http://www.w3.org/2000/svg' width='100' height='1'>\
            <defs>\
                <linearGradient id='base' gradientUnits='userSpaceOnUse' \
                    x1='0' y1='0' x2='100' y2='0'>\
                    <stop offset='0' stop-color='red'/>\
                    <stop offset='1' stop-color='blue'/>\
                </linearGradient>\
                <linearGradient id='g' href='#base'/>\
            </defs>\
            <rect width='100' height='1' fill='url(#g)'/>\
        </svg>",
    );

    assert_pixel_near(image.pixel(0, 0), [255, 0, 0, 255], 2);
    assert_pixel_near(image.pixel(99, 0), [0, 0, 255, 255], 2);
}

#[test]
fn identity_color_matrix_changes_nothing() {
    let plain = "<svg xmlns='http://www.w3.org/2000/svg' width='40' height='40'>\
        <rect x='5' y='5' width='20' height='20' fill='#336699'/>\
        <circle cx='25' cy='25' r='10' fill='#993366' fill-opacity='0.5'/>\
    </svg>";

    let filtered = "<svg xmlns='http://www.w3.org/2000/svg' width='40' height='40'>\
        <defs>\
            <filter id='f'>\
                <feColorMatrix type='matrix' \
                    values='1 0 0 0 0 0 1 0 0 0 0 0 1 0 0 0 0 0 1 0'/>\
            </filter>\
        </defs>\
        <g filter='url(#f)'>\
            <rect x='5' y='5' width='20' height='20' fill='#336699'/>\
            <circle cx='25' cy='25' r='10' fill='#993366' fill-opacity='0.5'/>\
        </g>\
    </svg>";

    let a = render(plain);
    let b = render(filtered);
    assert_eq!(a.data, b.data);
}

#[test]
fn use_symbol_width_override() {
    let via_use = render(
        "<svg xmlns='http://www.w3.org/2000/svg' width='100' height='100'>\
            <symbol id='s' viewBox='0 0 10 10' width='50' height='50'>\
                <rect x='1' y='1' width='8' height='8' fill='green'/>\
            </symbol>\
            <use href='#s' width='100' height='100'/>\
        </svg>",
    );

    let direct = render(
        "<svg xmlns='http://www.w3.org/2000/svg' width='100' height='100'>\
            <svg width='100' height='100' viewBox='0 0 10 10'>\
                <rect x='1' y='1' width='8' height='8' fill='green'/>\
            </svg>\
        </svg>",
    );

    assert_eq!(via_use.data, direct.data);
}

#[test]
fn use_references_a_shape() {
    let image = render(
        "<svg xmlns='http://www.w3.org/2000/svg' width='20' height='20'>\
            <defs><rect id='r' width='5' height='5' fill='black'/></defs>\
            <use href='#r' x='10' y='10'/>\
        </svg>",
    );

    assert_eq!(image.pixel(12, 12)[3], 255);
    assert_eq!(image.pixel(2, 2)[3], 0);
}

#[test]
fn zero_sized_rect_renders_nothing() {
    let image = render(
        "<svg xmlns='http://www.w3.org/2000/svg' width='10' height='10'>\
            <rect width='0' height='10' fill='black'/>\
        </svg>",
    );

    assert!(image.data.iter().all(|b| *b == 0));
}

#[test]
fn display_none_skips_the_subtree() {
    let image = render(
        "<svg xmlns='http://www.w3.org/2000/svg' width='10' height='10'>\
            <g display='none'>\
                <rect width='10' height='10' fill='black' display='inline'/>\
            </g>\
        </svg>",
    );

    assert!(image.data.iter().all(|b| *b == 0));
}

#[test]
fn hidden_visibility_is_overridable_by_children() {
    let image = render(
        "<svg xmlns='http://www.w3.org/2000/svg' width='10' height='10'>\
            <g visibility='hidden'>\
                <rect width='4' height='10' fill='black'/>\
                <rect x='5' width='5' height='10' fill='black' visibility='visible'/>\
            </g>\
        </svg>",
    );

    assert_eq!(image.pixel(2, 5)[3], 0);
    assert_eq!(image.pixel(7, 5)[3], 255);
}

#[test]
fn group_opacity_is_applied_on_pop() {
    let image = render(
        "<svg xmlns='http://www.w3.org/2000/svg' width='10' height='10'>\
            <g opacity='0.5'>\
                <rect width='10' height='10' fill='black'/>\
            </g>\
        </svg>",
    );

    let p = image.pixel(5, 5);
    assert!((p[3] as i32 - 128).abs() <= 2, "alpha = {}", p[3]);
}

#[test]
fn luminance_mask() {
    let image = render(
        "<svg xmlns='http://www.w3.org/2000/svg' width='20' height='10'>\
            <defs>\
                <mask id='m'>\
                    <rect width='10' height='10' fill='white'/>\
                    <rect x='10' width='10' height='10' fill='black'/>\
                </mask>\
            </defs>\
            <rect width='20' height='10' fill='red' mask='url(#m)'/>\
        </svg>",
    );

    // under the white half the content is kept
    assert!(image.pixel(5, 5)[3] >= 250);
    // under the black half it is masked out
    assert_eq!(image.pixel(15, 5)[3], 0);
}

#[test]
fn dashed_stroke() {
    let image = render(
        "<svg xmlns='http://www.w3.org/2000/svg' width='20' height='10'>\
            <line x1='0' y1='5' x2='20' y2='5' stroke='black' \
                stroke-width='2' stroke-dasharray='5 5'/>\
        </svg>",
    );

    // inside the first dash
    assert!(image.pixel(2, 5)[3] > 0);
    // inside the first gap
    assert_eq!(image.pixel(7, 5)[3], 0);
    // inside the second dash
    assert!(image.pixel(12, 5)[3] > 0);
}

#[test]
fn unsupported_filter_input_is_reported() {
    let doc = Document::parse_str(
        "<svg xmlns='http://www.w3.org/2000/svg' width='10' height='10'>\
            <defs>\
                <filter id='f'><feGaussianBlur in='SourceAlpha' stdDeviation='1'/></filter>\
            </defs>\
            <rect width='10' height='10' filter='url(#f)'/>\
        </svg>",
    )
    .unwrap();

    match svgrast::render(&doc, &Parameters::default()) {
        Err(svgrast::Error::Unimplemented(_)) => {}
        other => panic!("expected an Unimplemented error, got ok = {}", other.is_ok()),
    }
}

#[test]
fn background_color_fills_the_output() {
    let image = render_with(
        "<svg xmlns='http://www.w3.org/2000/svg' width='10' height='10'/>",
        Parameters {
            background: Some([10, 20, 30, 255]),
            ..Parameters::default()
        },
    );

    assert_pixel_near(image.pixel(0, 0), [10, 20, 30, 255], 1);
    assert_pixel_near(image.pixel(9, 9), [10, 20, 30, 255], 1);
}

#[test]
fn nested_svg_uses_its_own_viewport() {
    let image = render(
        "<svg xmlns='http://www.w3.org/2000/svg' width='20' height='20'>\
            <svg x='10' y='10' width='10' height='10'>\
                <rect width='100%' height='100%' fill='black'/>\
            </svg>\
        </svg>",
    );

    assert_eq!(image.pixel(5, 5)[3], 0);
    assert_eq!(image.pixel(15, 15)[3], 255);
}

#[test]
fn stroke_with_zero_width_renders_nothing() {
    let image = render(
        "<svg xmlns='http://www.w3.org/2000/svg' width='10' height='10'>\
            <line x1='0' y1='5' x2='10' y2='5' stroke='black' stroke-width='0'/>\
        </svg>",
    );

    assert!(image.data.iter().all(|b| *b == 0));
}
