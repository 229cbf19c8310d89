use meshview::raster::{RasterError, RasterOptions, svg_to_png};
use meshview::{Grid, MeshRenderOptions, MeshViewConfig, SvgCanvas};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Mesh(meshview::Error),
    Raster(RasterError),
    Json(serde_json::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Mesh(err) => write!(f, "{err}"),
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

impl From<meshview::Error> for CliError {
    fn from(value: meshview::Error) -> Self {
        Self::Mesh(value)
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
    Render,
    Inspect,
}

#[derive(Debug, Clone, Copy, Default)]
enum RenderFormat {
    #[default]
    Svg,
    Png,
}

impl FromStr for RenderFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "svg" => Ok(Self::Svg),
            "png" => Ok(Self::Png),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    url: Option<String>,
    input: Option<String>,
    canvas: Option<String>,
    config: Option<String>,
    width: Option<f64>,
    height: Option<f64>,
    curve: Option<String>,
    lattice: bool,
    neighborhoods: bool,
    pretty: bool,
    render_format: RenderFormat,
    render_scale: f32,
    background: Option<String>,
    out: Option<String>,
}

fn usage() -> &'static str {
    "meshview-cli\n\
\n\
USAGE:\n\
  meshview-cli [render] [--url <url>] [--input <grid.json>|-] [--canvas <doc.svg>] [--width <w>] [--height <h>] [--curve <name>] [--config <file>] [--lattice] [--neighborhoods] [--format svg|png] [--scale <n>] [--background <css-color>] [--out <path>]\n\
  meshview-cli inspect [--url <url>] [--input <grid.json>|-] [--config <file>] [--pretty]\n\
\n\
NOTES:\n\
  - Without --input the grid is fetched from --url (default http://localhost:8080).\n\
  - --input '-' reads the grid document from stdin.\n\
  - --canvas renders into the first <svg> of an existing document; otherwise a blank canvas is used.\n\
  - --config reads JSON, or YAML for .yaml/.yml files; flags override it.\n\
  - render prints SVG to stdout by default; use --out to write a file.\n\
  - PNG output defaults to ./out.png.\n\
  - RUST_LOG controls log output on stderr (default: warn).\n\
"
}

fn next_value<'a>(it: &mut impl Iterator<Item = &'a String>) -> Result<&'a String, CliError> {
    it.next().ok_or(CliError::Usage(usage()))
}

fn parse_positive(raw: &str) -> Result<f64, CliError> {
    let v = raw.parse::<f64>().map_err(|_| CliError::Usage(usage()))?;
    if !(v.is_finite() && v > 0.0) {
        return Err(CliError::Usage(usage()));
    }
    Ok(v)
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
            "render" => args.command = Command::Render,
            "inspect" => args.command = Command::Inspect,
            "--pretty" => args.pretty = true,
            "--lattice" => args.lattice = true,
            "--neighborhoods" => args.neighborhoods = true,
            "--url" => args.url = Some(next_value(&mut it)?.clone()),
            "--input" => args.input = Some(next_value(&mut it)?.clone()),
            "--canvas" => args.canvas = Some(next_value(&mut it)?.clone()),
            "--config" => args.config = Some(next_value(&mut it)?.clone()),
            "--curve" => args.curve = Some(next_value(&mut it)?.clone()),
            "--out" => args.out = Some(next_value(&mut it)?.clone()),
            "--width" => args.width = Some(parse_positive(next_value(&mut it)?)?),
            "--height" => args.height = Some(parse_positive(next_value(&mut it)?)?),
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
            _ => return Err(CliError::Usage(usage())),
        }
    }

    Ok(args)
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("warn"))
        .unwrap_or_default();
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// The config file (or defaults) with command-line overrides applied.
fn load_config(args: &Args) -> Result<MeshViewConfig, CliError> {
    let mut config = match args.config.as_deref() {
        Some(path) => MeshViewConfig::from_path(Path::new(path)).map_err(meshview::Error::from)?,
        None => MeshViewConfig::default(),
    };
    if let Some(url) = &args.url {
        config.endpoint = url.clone();
    }
    if let Some(w) = args.width {
        config.canvas.width = w;
    }
    if let Some(h) = args.height {
        config.canvas.height = h;
    }
    if let Some(curve) = &args.curve {
        config.curve = curve.clone();
    }
    config.include_lattice |= args.lattice;
    config.include_neighborhoods |= args.neighborhoods;
    config.validate().map_err(meshview::Error::from)?;
    Ok(config)
}

fn read_input(input: &str) -> Result<String, CliError> {
    match input {
        "-" => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        path => Ok(std::fs::read_to_string(path)?),
    }
}

fn load_grid(
    runtime: &tokio::runtime::Runtime,
    args: &Args,
    config: &MeshViewConfig,
) -> Result<Grid, CliError> {
    match args.input.as_deref() {
        Some(input) => {
            let text = read_input(input)?;
            Ok(meshview::parse_grid(&text).map_err(meshview::Error::from)?)
        }
        None => Ok(runtime.block_on(meshview::fetch_grid(config))?),
    }
}

fn write_text(text: &str, out: Option<&str>) -> Result<(), CliError> {
    match out {
        None | Some("-") => {
            print!("{text}");
            Ok(())
        }
        Some(path) => {
            std::fs::write(path, text)?;
            Ok(())
        }
    }
}

fn write_bytes(bytes: &[u8], out: Option<&str>, default_path: &str) -> Result<(), CliError> {
    match out {
        Some("-") => {
            std::io::stdout().lock().write_all(bytes)?;
            Ok(())
        }
        Some(path) => {
            std::fs::write(path, bytes)?;
            Ok(())
        }
        None => {
            std::fs::write(PathBuf::from(default_path), bytes)?;
            Ok(())
        }
    }
}

fn run(args: Args) -> Result<(), CliError> {
    let config = load_config(&args)?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    match args.command {
        Command::Inspect => {
            let grid = load_grid(&runtime, &args, &config)?;
            let mut stdout = std::io::stdout().lock();
            if args.pretty {
                serde_json::to_writer_pretty(&mut stdout, &grid)?;
            } else {
                serde_json::to_writer(&mut stdout, &grid)?;
            }
            writeln!(stdout)?;
            Ok(())
        }
        Command::Render => {
            let host = args.canvas.as_deref().map(std::fs::read_to_string).transpose()?;
            let mut canvas: SvgCanvas = meshview::canvas_for(&config, host.as_deref())?;
            let options = MeshRenderOptions::from_config(&config).map_err(meshview::Error::from)?;

            let grid = load_grid(&runtime, &args, &config)?;
            let summary = meshview::render_mesh(&mut canvas, &grid, &options);
            tracing::info!(
                segments = summary.segment_count,
                appended = summary.appended,
                "mesh rendered"
            );

            let svg = canvas.to_svg_string();
            match args.render_format {
                RenderFormat::Svg => write_text(&svg, args.out.as_deref())?,
                RenderFormat::Png => {
                    let raster = RasterOptions {
                        scale: args.render_scale,
                        background: args.background.clone(),
                    };
                    let bytes = svg_to_png(&svg, &raster)?;
                    write_bytes(&bytes, args.out.as_deref(), "out.png")?;
                }
            }
            Ok(())
        }
    }
}

fn main() {
    init_logging();

    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
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
