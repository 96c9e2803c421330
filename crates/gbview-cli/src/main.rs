use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use gbview_algo::bounds::compute_bounds;
use gbview_algo::camera::CameraFraming;
use gbview_algo::extrusion::{ExtrusionRenderer, MaterialOptions};
use gbview_algo::projection::{project, ScaleControl};
use gbview_algo::scene::Scene;
use gbview_algo::svg_writer::write_svg;
use gbview_core::ingest::{load, IngestSource};
use gbview_core::model::Building;
use gbview_core::report::summarize;
use serde::Serialize;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "gbview")]
#[command(about = "Validate, inspect and project graph-building JSON models.")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Args)]
struct InputArgs {
    /// Building JSON file, or `-` for stdin.
    input: Option<PathBuf>,
    /// Use the bundled sample building instead of an input file.
    #[arg(long, conflicts_with = "input")]
    sample: bool,
}

#[derive(Debug, Args)]
struct MaterialArgs {
    #[arg(long, value_parser = parse_color)]
    base_color: Option<u32>,
    #[arg(long, value_parser = parse_color)]
    selected_color: Option<u32>,
    #[arg(long)]
    opacity: Option<f64>,
    #[arg(long)]
    roughness: Option<f64>,
    #[arg(long)]
    metalness: Option<f64>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Check that the input converts; prints the first violation.
    Validate {
        #[command(flatten)]
        input: InputArgs,
    },
    /// Per-level summary and non-fatal diagnostics.
    Report {
        #[command(flatten)]
        input: InputArgs,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// 2D projection of one level.
    Plan {
        #[command(flatten)]
        input: InputArgs,
        #[arg(long, default_value_t = 0)]
        level: usize,
        #[arg(long, default_value_t = 1.0)]
        scale: f64,
        /// Also write the projection as an SVG document.
        #[arg(long)]
        svg: Option<PathBuf>,
    },
    /// Stacked 3D solids for the whole building.
    Extrude {
        #[command(flatten)]
        input: InputArgs,
        #[arg(long, default_value_t = 0)]
        selected_level: usize,
        #[command(flatten)]
        materials: MaterialArgs,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Scene bounds and the framed camera.
    Bounds {
        #[command(flatten)]
        input: InputArgs,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Validate { input } => validate(&input),
        Command::Report { input, out } => {
            let building = load_input(&input)?;
            emit(&summarize(&building), out.as_deref())
        }
        Command::Plan {
            input,
            level,
            scale,
            svg,
        } => plan(&input, level, scale, svg.as_deref()),
        Command::Extrude {
            input,
            selected_level,
            materials,
            out,
        } => extrude(&input, selected_level, &materials, out.as_deref()),
        Command::Bounds { input } => bounds(&input),
    }
}

#[derive(Serialize)]
struct ValidationOutcome {
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    levels: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    units: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    kind: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

fn validate(input: &InputArgs) -> Result<()> {
    let source = source_for(input)?;
    match load(&source) {
        Ok(building) => emit(
            &ValidationOutcome {
                ok: true,
                levels: Some(building.levels.len()),
                units: Some(building.units.len()),
                kind: None,
                path: None,
                message: None,
            },
            None,
        ),
        Err(err) => {
            let conversion = match err.failure() {
                gbview_core::error::IngestFailure::Conversion(c) => Some(c),
                _ => None,
            };
            emit(
                &ValidationOutcome {
                    ok: false,
                    levels: None,
                    units: None,
                    kind: conversion.map(|c| c.kind()),
                    path: conversion.map(|c| c.path()),
                    message: Some(err.to_string()),
                },
                None,
            )?;
            bail!(err)
        }
    }
}

fn plan(input: &InputArgs, level: usize, scale: f64, svg: Option<&Path>) -> Result<()> {
    let building = load_input(input)?;
    let Some(level_data) = building.level(level) else {
        bail!("level {level} out of range ({} levels)", building.levels.len());
    };
    // Same clamp as the viewer's zoom buttons.
    let scale = ScaleControl::new(scale).scale();
    let projection = project(level_data, scale);

    if let Some(path) = svg {
        let doc = write_svg(&projection).context("format svg")?;
        ensure_parent(path);
        doc.save_to_file(path)
            .with_context(|| format!("write svg: {path:?}"))?;
        info!(path = %path.display(), "wrote svg");
    }
    emit(&projection, None)
}

#[derive(Serialize)]
struct ExtrudeOutput<'a> {
    stats: gbview_algo::extrusion::RenderStats,
    scene: &'a Scene,
}

fn extrude(input: &InputArgs, selected_level: usize, args: &MaterialArgs, out: Option<&Path>) -> Result<()> {
    let building = load_input(input)?;
    let mut options = MaterialOptions::default();
    if let Some(c) = args.base_color {
        options.base_color = c;
    }
    if let Some(c) = args.selected_color {
        options.selected_color = c;
    }
    if let Some(v) = args.opacity {
        options.opacity = v;
    }
    if let Some(v) = args.roughness {
        options.roughness = v;
    }
    if let Some(v) = args.metalness {
        options.metalness = v;
    }

    let mut scene = Scene::new();
    let stats = ExtrusionRenderer::new(options).render(&mut scene, &building, selected_level);
    emit(&ExtrudeOutput { stats, scene: &scene }, out)
}

#[derive(Serialize)]
struct BoundsOutput {
    bounds: gbview_algo::bounds::SceneBounds,
    camera: CameraFraming,
}

fn bounds(input: &InputArgs) -> Result<()> {
    let building = load_input(input)?;
    let bounds = compute_bounds(&building);
    emit(
        &BoundsOutput {
            bounds,
            camera: CameraFraming::from_bounds(&bounds),
        },
        None,
    )
}

fn source_for(input: &InputArgs) -> Result<IngestSource> {
    if input.sample {
        return Ok(IngestSource::Sample);
    }
    match input.input.as_deref() {
        None => bail!("no input given; pass a file, `-` for stdin, or --sample"),
        Some(p) if p == Path::new("-") => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("read stdin")?;
            Ok(IngestSource::Text(text))
        }
        Some(p) => Ok(IngestSource::File(p.to_path_buf())),
    }
}

fn load_input(input: &InputArgs) -> Result<Building> {
    let source = source_for(input)?;
    Ok(load(&source)?)
}

fn emit<T: Serialize>(value: &T, out: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("serialize output")?;
    match out {
        Some(path) => {
            ensure_parent(path);
            std::fs::write(path, &json).with_context(|| format!("write output: {path:?}"))?;
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn ensure_parent(path: &Path) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).ok();
    }
}

fn parse_color(s: &str) -> Result<u32, String> {
    let digits = s
        .trim_start_matches('#')
        .trim_start_matches("0x")
        .trim_start_matches("0X");
    u32::from_str_radix(digits, 16)
        .ok()
        .filter(|c| *c <= 0xff_ffff)
        .ok_or_else(|| format!("expected a hex colour like #ffd8a8, got {s:?}"))
}
