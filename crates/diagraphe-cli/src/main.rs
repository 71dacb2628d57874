use diagraphe::render::raster::{RasterError, RasterOptions};
use diagraphe::render::{ContentFrame, HeadlessError, HeadlessRenderer, scene_json};
use diagraphe::{ConfigFormat, DiagramConfig};
use serde::Serialize;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "DIAGRAPHE_LOG";

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Config(diagraphe::Error),
    Render(diagraphe_render::Error),
    Headless(HeadlessError),
    Raster(RasterError),
    Json(serde_json::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Config(err) => write!(f, "{err}"),
            CliError::Render(err) => write!(f, "{err}"),
            CliError::Headless(err) => write!(f, "{err}"),
            CliError::Raster(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<diagraphe::Error> for CliError {
    fn from(value: diagraphe::Error) -> Self {
        Self::Config(value)
    }
}

impl From<diagraphe_render::Error> for CliError {
    fn from(value: diagraphe_render::Error) -> Self {
        Self::Render(value)
    }
}

impl From<HeadlessError> for CliError {
    fn from(value: HeadlessError) -> Self {
        Self::Headless(value)
    }
}

impl From<RasterError> for CliError {
    fn from(value: RasterError) -> Self {
        Self::Raster(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone, Copy, Default)]
enum Command {
    #[default]
    Check,
    Layout,
    Render,
}

#[derive(Debug, Clone, Copy, Default)]
enum RenderFormat {
    #[default]
    Svg,
    Png,
    Jpeg,
    Pdf,
}

impl RenderFormat {
    fn extension(self) -> &'static str {
        match self {
            Self::Svg => "svg",
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::Pdf => "pdf",
        }
    }
}

impl FromStr for RenderFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "svg" => Ok(Self::Svg),
            "png" => Ok(Self::Png),
            "jpg" | "jpeg" => Ok(Self::Jpeg),
            "pdf" => Ok(Self::Pdf),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    input: Option<String>,
    input_format: Option<ConfigFormat>,
    pretty: bool,
    fill_fallback: Option<f64>,
    render_format: RenderFormat,
    render_scale: f32,
    background: Option<String>,
    diagram_id: Option<String>,
    out: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CheckOut<'a> {
    elements: usize,
    frame: &'a ContentFrame,
}

fn usage() -> &'static str {
    "diagraphe-cli\n\
\n\
USAGE:\n\
  diagraphe-cli [check] [--pretty] [--input-format json|yaml|json5] [--fill-fallback <px>] [<path>|-]\n\
  diagraphe-cli layout [--pretty] [--input-format json|yaml|json5] [--fill-fallback <px>] [--id <diagram-id>] [<path>|-]\n\
  diagraphe-cli render [--format svg|png|jpg|pdf] [--scale <n>] [--background <css-color>] [--input-format json|yaml|json5] [--fill-fallback <px>] [--id <diagram-id>] [--out <path>] [<path>|-]\n\
\n\
NOTES:\n\
  - If <path> is omitted or '-', input is read from stdin.\n\
  - The input format defaults to the file extension, or JSON for stdin.\n\
  - check validates the configuration and prints the resolved frame as JSON.\n\
  - layout prints the composed scene tree as JSON.\n\
  - render prints SVG to stdout by default; use --out to write a file.\n\
  - PNG/JPG/PDF output defaults to writing next to the input file (or ./out.<ext> for stdin).\n\
  - Set DIAGRAPHE_LOG (e.g. debug) to see diagnostics on stderr.\n\
"
}

fn next_value<'a>(it: &mut impl Iterator<Item = &'a String>) -> Result<&'a String, CliError> {
    it.next().ok_or(CliError::Usage(usage()))
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args {
        render_scale: 1.0,
        ..Default::default()
    };

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "check" => args.command = Command::Check,
            "layout" => args.command = Command::Layout,
            "render" => args.command = Command::Render,
            "--pretty" => args.pretty = true,
            "--input-format" => {
                let fmt = next_value(&mut it)?;
                args.input_format = Some(fmt.parse().map_err(|_| CliError::Usage(usage()))?);
            }
            "--fill-fallback" => {
                let px = next_value(&mut it)?
                    .parse::<f64>()
                    .map_err(|_| CliError::Usage(usage()))?;
                if !(px.is_finite() && px > 0.0) {
                    return Err(CliError::Usage(usage()));
                }
                args.fill_fallback = Some(px);
            }
            "--format" => {
                args.render_format = next_value(&mut it)?
                    .parse::<RenderFormat>()
                    .map_err(|_| CliError::Usage(usage()))?;
            }
            "--scale" => {
                args.render_scale = next_value(&mut it)?
                    .parse::<f32>()
                    .map_err(|_| CliError::Usage(usage()))?;
                if !(args.render_scale.is_finite() && args.render_scale > 0.0) {
                    return Err(CliError::Usage(usage()));
                }
            }
            "--background" => {
                let bg = next_value(&mut it)?;
                if !bg.trim().is_empty() {
                    args.background = Some(bg.trim().to_string());
                }
            }
            "--id" => args.diagram_id = Some(next_value(&mut it)?.clone()),
            "--out" => args.out = Some(next_value(&mut it)?.clone()),
            "--" => {
                if let Some(rest) = it.next() {
                    if args.input.is_some() {
                        return Err(CliError::Usage(usage()));
                    }
                    args.input = Some(rest.clone());
                }
                if it.next().is_some() {
                    return Err(CliError::Usage(usage()));
                }
            }
            other if other.starts_with('-') && other != "-" => {
                return Err(CliError::Usage(usage()));
            }
            path => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some(path.to_string());
            }
        }
    }

    Ok(args)
}

fn read_input(input: Option<&str>) -> Result<String, CliError> {
    match input {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        Some(path) => Ok(std::fs::read_to_string(path)?),
    }
}

fn input_format(args: &Args) -> ConfigFormat {
    if let Some(format) = args.input_format {
        return format;
    }
    args.input
        .as_deref()
        .filter(|p| *p != "-")
        .and_then(|p| Path::new(p).extension())
        .and_then(|ext| ext.to_str())
        .and_then(ConfigFormat::from_extension)
        .unwrap_or_default()
}

fn write_json(value: &impl Serialize, pretty: bool) -> Result<(), CliError> {
    let mut out = std::io::stdout().lock();
    if pretty {
        serde_json::to_writer_pretty(&mut out, value)?;
    } else {
        serde_json::to_writer(&mut out, value)?;
    }
    writeln!(out)?;
    Ok(())
}

fn default_out_path(input: Option<&str>, ext: &str) -> PathBuf {
    match input {
        Some(path) if path != "-" => PathBuf::from(path).with_extension(ext),
        _ => PathBuf::from(format!("out.{ext}")),
    }
}

fn write_bytes(bytes: &[u8], out: &str) -> Result<(), CliError> {
    if out == "-" {
        std::io::stdout().lock().write_all(bytes)?;
    } else {
        std::fs::write(out, bytes)?;
    }
    Ok(())
}

fn build_renderer(args: &Args, format: ConfigFormat) -> HeadlessRenderer {
    let mut renderer = HeadlessRenderer::new().with_format(format);
    if let Some(id) = &args.diagram_id {
        renderer = renderer.with_diagram_id(id);
    }
    if let Some(px) = args.fill_fallback {
        renderer = renderer.with_fill_fallback(px);
    }
    renderer
}

fn run(args: Args) -> Result<(), CliError> {
    let text = read_input(args.input.as_deref())?;
    let format = input_format(&args);
    debug!(?format, command = ?args.command, "read input");
    let renderer = build_renderer(&args, format);

    match args.command {
        Command::Check => {
            let config: DiagramConfig = renderer.parse_sync(&text)?;
            let frame = ContentFrame::resolve(&config, &renderer.options.frame)?;
            write_json(
                &CheckOut {
                    elements: config.elements.len(),
                    frame: &frame,
                },
                args.pretty,
            )
        }
        Command::Layout => {
            let scene = renderer.compose_sync(&text)?;
            let json = scene_json(&scene, args.pretty)?;
            println!("{json}");
            Ok(())
        }
        Command::Render => {
            let bytes = match args.render_format {
                RenderFormat::Svg => {
                    let svg = renderer.render_svg_sync(&text)?;
                    return match args.out.as_deref() {
                        None => {
                            print!("{svg}");
                            Ok(())
                        }
                        Some(path) => write_bytes(svg.as_bytes(), path),
                    };
                }
                RenderFormat::Png => {
                    renderer.render_png_sync(&text, &raster_options(&args))?
                }
                RenderFormat::Jpeg => {
                    renderer.render_jpeg_sync(&text, &raster_options(&args))?
                }
                RenderFormat::Pdf => renderer.render_pdf_sync(&text)?,
            };
            let out = args.out.clone().unwrap_or_else(|| {
                default_out_path(args.input.as_deref(), args.render_format.extension())
                    .to_string_lossy()
                    .to_string()
            });
            debug!(%out, bytes = bytes.len(), "writing raster output");
            write_bytes(&bytes, &out)
        }
    }
}

fn raster_options(args: &Args) -> RasterOptions {
    RasterOptions {
        scale: args.render_scale,
        background: args.background.clone(),
        ..RasterOptions::default()
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() {
    init_tracing();

    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) if std::env::args().any(|a| a == "--help" || a == "-h") => {
            println!("{msg}");
            return;
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    if let Err(err) = run(args) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
