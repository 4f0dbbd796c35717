// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path;

const HELP: &str = "\
svgrast is an SVG rendering application.

USAGE:
  svgrast [OPTIONS] <in-svg> <out-png>

OPTIONS:
  -h, --help                    Prints this help
      --dpi DPI                 Sets the resolution [default: 96]
      --width LENGTH            Sets the width in pixels
      --height LENGTH           Sets the height in pixels
      --background COLOR        Sets the background color
                                Examples: red, #fff, #fff000
      --quiet                   Disables warnings

ARGS:
  <in-svg>                      Input file
  <out-png>                     Output file
";

struct Args {
    dpi: f64,
    width: u32,
    height: u32,
    background: Option<svgtypes::Color>,
    quiet: bool,
    in_svg: path::PathBuf,
    out_png: path::PathBuf,
}

fn main() {
    if let Err(e) = process() {
        eprintln!("Error: {}.", e);
        std::process::exit(1);
    }
}

fn parse_args() -> Result<Args, String> {
    let mut input = pico_args::Arguments::from_env();

    if input.contains(["-h", "--help"]) {
        print!("{}", HELP);
        std::process::exit(0);
    }

    let args = Args {
        dpi: input
            .opt_value_from_str("--dpi")
            .map_err(|e| e.to_string())?
            .unwrap_or(96.0),
        width: input
            .opt_value_from_str("--width")
            .map_err(|e| e.to_string())?
            .unwrap_or(0),
        height: input
            .opt_value_from_str("--height")
            .map_err(|e| e.to_string())?
            .unwrap_or(0),
        background: input
            .opt_value_from_str("--background")
            .map_err(|e| e.to_string())?,
        quiet: input.contains("--quiet"),
        in_svg: input.free_from_str().map_err(|_| "input file is not set")?,
        out_png: input.free_from_str().map_err(|_| "output file is not set")?,
    };

    let remaining = input.finish();
    if !remaining.is_empty() {
        return Err(format!("unknown arguments: {:?}", remaining));
    }

    Ok(args)
}

fn process() -> Result<(), String> {
    let args = match parse_args() {
        Ok(args) => args,
        Err(e) => {
            println!("{}", HELP);
            return Err(e);
        }
    };

    if !args.quiet {
        if let Ok(()) = log::set_logger(&LOGGER) {
            log::set_max_level(log::LevelFilter::Warn);
        }
    }

    let svg_text = std::fs::read_to_string(&args.in_svg)
        .map_err(|_| "failed to open the provided file".to_string())?;

    let doc = svgrast::svgdomtree::Document::parse_str(&svg_text).map_err(|e| e.to_string())?;

    let params = svgrast::Parameters {
        dpi: args.dpi,
        dims_request: (args.width, args.height),
        background: args
            .background
            .map(|c| [c.red, c.green, c.blue, c.alpha]),
    };

    let image = svgrast::render(&doc, &params).map_err(|e| e.to_string())?;

    write_png(&args.out_png, &image).map_err(|e| e.to_string())
}

fn write_png(path: &path::Path, image: &svgrast::Image) -> Result<(), png::EncodingError> {
    let file = std::fs::File::create(path)?;
    let buf = std::io::BufWriter::new(file);

    let mut encoder = png::Encoder::new(buf, image.width, image.height);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);

    let mut writer = encoder.write_header()?;
    writer.write_image_data(&image.data)
}

/// A simple stderr logger.
static LOGGER: SimpleLogger = SimpleLogger;
struct SimpleLogger;
impl log::Log for SimpleLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::LevelFilter::Warn
    }

    fn log(&self, record: &log::Record) {
        if self.enabled(record.metadata()) {
            let target = if !record.target().is_empty() {
                record.target()
            } else {
                record.module_path().unwrap_or_default()
            };

            match record.level() {
                log::Level::Error => eprintln!("Error (in {}): {}", target, record.args()),
                log::Level::Warn => eprintln!("Warning (in {}): {}", target, record.args()),
                _ => eprintln!("{} (in {}): {}", record.level(), target, record.args()),
            }
        }
    }

    fn flush(&self) {}
}
