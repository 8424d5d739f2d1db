use clap::{Args, Parser, Subcommand, ValueEnum};
use flowchord::render::raster::{self, RasterOptions};
use flowchord::render::{
    ChordChart, HoverState, Point, PointerContext, SceneOp, Size, Surface, Tooltip,
};
use flowchord::{ChordConfig, FlowTable};
use serde::Serialize;
use std::io::{Read, Write};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug)]
enum CliError {
    Usage(String),
    Io(std::io::Error),
    Input(flowchord::Error),
    Render(flowchord::render::HeadlessError),
    Raster(raster::RasterError),
    Json(serde_json::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Input(err) => write!(f, "{err}"),
            CliError::Render(err) => write!(f, "{err}"),
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

impl From<flowchord::Error> for CliError {
    fn from(value: flowchord::Error) -> Self {
        Self::Input(value)
    }
}

impl From<flowchord::render::HeadlessError> for CliError {
    fn from(value: flowchord::render::HeadlessError) -> Self {
        Self::Render(value)
    }
}

impl From<flowchord::render::RenderError> for CliError {
    fn from(value: flowchord::render::RenderError) -> Self {
        Self::Render(value.into())
    }
}

impl From<raster::RasterError> for CliError {
    fn from(value: raster::RasterError) -> Self {
        Self::Raster(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Parser)]
#[command(name = "flowchord-cli")]
#[command(about = "Chord diagrams from JSON flow matrices")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print labels and the symmetric expanded matrix
    Prepare {
        #[command(flatten)]
        common: Common,
    },
    /// Print the chord layout (groups, chords, radii)
    Layout {
        #[command(flatten)]
        common: Common,
    },
    /// Render the diagram
    Render {
        #[command(flatten)]
        common: Common,
        #[arg(long, value_enum, default_value_t = RenderFormat::Svg)]
        format: RenderFormat,
        /// Output path; SVG and HTML go to stdout when omitted, PNG next to the input
        #[arg(long)]
        out: Option<String>,
        /// Raster scale factor (PNG only)
        #[arg(long, default_value_t = 1.0)]
        scale: f32,
        /// Raster background color (PNG only)
        #[arg(long)]
        background: Option<String>,
    },
    /// Render, hover one group and print the resulting state and scene ops
    Hover {
        #[command(flatten)]
        common: Common,
        /// Group index (rows first, then columns)
        #[arg(long)]
        index: usize,
        /// Pointer x in page coordinates
        #[arg(long)]
        x: f64,
        /// Pointer y in page coordinates
        #[arg(long)]
        y: f64,
        #[arg(long, default_value_t = 800.0)]
        viewport_width: f64,
        #[arg(long, default_value_t = 600.0)]
        viewport_height: f64,
        #[arg(long, default_value_t = 120.0)]
        tooltip_width: f64,
        #[arg(long, default_value_t = 40.0)]
        tooltip_height: f64,
    },
}

#[derive(Args)]
struct Common {
    /// JSON flow matrix; stdin when omitted or `-`
    input: Option<String>,
    /// JSON configuration applied over the defaults
    #[arg(long)]
    config: Option<PathBuf>,
    /// Swap rows and columns before laying out
    #[arg(long)]
    flip: bool,
    #[arg(long)]
    width: Option<f64>,
    #[arg(long)]
    height: Option<f64>,
    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum RenderFormat {
    Svg,
    Html,
    Png,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PrepareOut<'a> {
    labels: &'a [String],
    row_count: usize,
    column_count: usize,
    expanded: &'a [Vec<f64>],
}

#[derive(Serialize)]
struct HoverOut<'a> {
    state: HoverState,
    tooltip: &'a Tooltip,
    ops: Vec<SceneOp>,
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

fn write_text(text: &str, out: Option<&str>) -> Result<(), CliError> {
    match out {
        None | Some("-") => {
            print!("{text}");
            Ok(())
        }
        Some(path) => Ok(std::fs::write(path, text)?),
    }
}

fn default_raster_out_path(input: Option<&str>) -> PathBuf {
    match input {
        Some(path) if path != "-" => PathBuf::from(path).with_extension("png"),
        _ => PathBuf::from("out.png"),
    }
}

fn load_config(common: &Common) -> Result<ChordConfig, CliError> {
    let mut config = match &common.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)?;
            let value: serde_json::Value = serde_json::from_str(&text)?;
            ChordConfig::default().merge_json(&value)?
        }
        None => ChordConfig::default(),
    };
    if common.flip {
        config = config.flipped();
    }
    if let Some(width) = common.width {
        config = config.with_width(width);
    }
    if let Some(height) = common.height {
        config = config.with_height(height);
    }
    Ok(config)
}

fn load_table(common: &Common) -> Result<FlowTable, CliError> {
    let text = read_input(common.input.as_deref())?;
    Ok(FlowTable::from_json_str(&text)?)
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Prepare { common } => {
            let config = load_config(&common)?;
            let prepared = flowchord::prepare(&load_table(&common)?, config.flip)?;
            write_json(
                &PrepareOut {
                    labels: prepared.labels.as_slice(),
                    row_count: prepared.labels.row_count(),
                    column_count: prepared.labels.column_count(),
                    expanded: prepared.expanded.rows(),
                },
                common.pretty,
            )
        }
        Command::Layout { common } => {
            let config = load_config(&common)?;
            let layout = flowchord::render::layout_chord_diagram(&load_table(&common)?, &config)?;
            let mut json = flowchord::render::layout_to_json(&layout, common.pretty)?;
            json.push('\n');
            write_text(&json, None)
        }
        Command::Render {
            common,
            format,
            out,
            scale,
            background,
        } => {
            let config = load_config(&common)?;
            let table = load_table(&common)?;
            tracing::info!(?format, input = ?common.input, "rendering chord diagram");
            match format {
                RenderFormat::Svg => {
                    let svg = flowchord::render::render_svg_sync(&table, &config)?;
                    write_text(&svg, out.as_deref())
                }
                RenderFormat::Html => {
                    let html = flowchord::render::render_html_sync(&table, &config)?;
                    write_text(&html, out.as_deref())
                }
                RenderFormat::Png => {
                    let options = RasterOptions {
                        scale,
                        background: background.filter(|bg| !bg.trim().is_empty()),
                    };
                    let bytes = raster::render_png_sync(&table, &config, &options)?;
                    let out = out.map(PathBuf::from).unwrap_or_else(|| {
                        default_raster_out_path(common.input.as_deref())
                    });
                    if out.as_os_str() == "-" {
                        std::io::stdout().lock().write_all(&bytes)?;
                    } else {
                        std::fs::write(out, bytes)?;
                    }
                    Ok(())
                }
            }
        }
        Command::Hover {
            common,
            index,
            x,
            y,
            viewport_width,
            viewport_height,
            tooltip_width,
            tooltip_height,
        } => {
            let config = load_config(&common)?;
            let table = load_table(&common)?;
            let mut surface = Surface::new();
            ChordChart::new(config).render(&mut surface, &table)?;

            let groups = surface.layout().map_or(0, |l| l.groups.len());
            if index >= groups {
                return Err(CliError::Usage(format!(
                    "group index {index} is out of range; the diagram has {groups} groups"
                )));
            }
            let ctx = PointerContext {
                page: Point::new(x, y),
                viewport: Size::new(viewport_width, viewport_height),
                tooltip: Size::new(tooltip_width, tooltip_height),
            };
            let ops = surface.pointer_enter(index, &ctx);
            let Some(scene) = surface.scene() else {
                return Err(flowchord::render::HeadlessError::EmptySurface.into());
            };
            write_json(
                &HoverOut {
                    state: surface.hover_state(),
                    tooltip: &scene.tooltip,
                    ops,
                },
                common.pretty,
            )
        }
    }
}

fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => {}
        Err(err @ CliError::Usage(_)) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}
