#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that builds a Ball Drop board and replays pointer
//! input against it.

mod script;
mod text_backend;

use std::{io, path::PathBuf};

use anyhow::{anyhow, Context, Result};
use ball_drop_core::PointerId;
use ball_drop_engine::{Engine, EngineConfig};
use ball_drop_rendering::{
    Color, Palette, Presentation, RenderingBackend, Scene, STANDARD_SELECTION_HEX,
    STANDARD_TOKEN_HEX,
};
use chrono::{Local, NaiveDate};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::{
    script::{drag_inputs, parse_drag, PointerScript},
    text_backend::TextBackend,
};

/// Pointer used for grid-space drags given on the command line.
const DRAG_POINTER: PointerId = PointerId::new(0);

/// Builds a Ball Drop board and replays pointer input against it.
#[derive(Debug, Parser)]
#[command(name = "ball-drop", version)]
struct Cli {
    /// TOML engine configuration; flags below override its values.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Seed the column generators are derived from; defaults to today's date.
    #[arg(long)]
    seed: Option<String>,
    /// Rows and columns of the board.
    #[arg(long)]
    grid_size: Option<u32>,
    /// Number of distinct token colors.
    #[arg(long)]
    colors: Option<u32>,
    /// Side length of the square board in pixels.
    #[arg(long)]
    board_pixels: Option<u32>,
    /// Drop the half-cell margin around the board.
    #[arg(long)]
    no_margin: bool,
    /// Comma-separated token fills such as `#d73033,#f98500`.
    #[arg(long)]
    palette: Option<String>,
    /// Halo color of selected tokens, as `#rrggbb`.
    #[arg(long)]
    selection_color: Option<String>,
    /// TOML file of pointer events to replay.
    #[arg(long)]
    script: Option<PathBuf>,
    /// Grid-space drag such as `0,0:0,1:1,1`, replayed after the script.
    #[arg(long)]
    drag: Option<String>,
    /// Log ignored and rejected input.
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn engine_config(&self) -> Result<EngineConfig> {
        let mut config = match &self.config {
            Some(path) => EngineConfig::load(path)
                .with_context(|| format!("failed to load engine config {}", path.display()))?,
            None => EngineConfig::default(),
        };
        config.seed = self
            .seed
            .clone()
            .or(config.seed)
            .or_else(|| Some(daily_seed(Local::now().date_naive())));
        if let Some(grid_size) = self.grid_size {
            config.grid_size = grid_size;
        }
        if let Some(colors) = self.colors {
            config.color_variants = colors;
        }
        if let Some(board_pixels) = self.board_pixels {
            config.board_pixels = board_pixels;
        }
        if self.no_margin {
            config.standard_margin = false;
        }
        Ok(config)
    }

    fn palette(&self) -> Result<Palette> {
        if self.palette.is_none() && self.selection_color.is_none() {
            return Ok(Palette::standard());
        }
        let tokens: Vec<&str> = match &self.palette {
            Some(list) => list
                .split(',')
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .collect(),
            None => STANDARD_TOKEN_HEX.to_vec(),
        };
        let selection = self
            .selection_color
            .as_deref()
            .unwrap_or(STANDARD_SELECTION_HEX);
        Palette::from_hex(&tokens, selection).context("invalid --palette or --selection-color")
    }
}

/// Seed of the daily board, formatted `YYYY-M-D` without zero padding.
fn daily_seed(date: NaiveDate) -> String {
    date.format("%Y-%-m-%-d").to_string()
}

/// Entry point for the Ball Drop command-line interface.
fn main() -> Result<()> {
    let cli = Cli::parse();
    install_tracing(cli.verbose)?;

    let config = cli.engine_config()?;
    let mut engine = config.build().context("failed to create board")?;
    let palette = cli.palette()?;
    if palette.len() < engine.color_variants() as usize {
        warn!(
            colors = engine.color_variants(),
            palette = palette.len(),
            "palette has fewer fills than the board has colors; fills repeat"
        );
    }
    let mut backend = TextBackend::new(io::stdout().lock(), palette.clone());

    backend.present(&presentation(&engine, &palette))?;

    let mut inputs = Vec::new();
    if let Some(path) = &cli.script {
        inputs.extend(PointerScript::load(path)?.inputs()?);
    }
    if let Some(drag) = &cli.drag {
        let path = parse_drag(drag).context("invalid --drag")?;
        inputs.extend(drag_inputs(engine.sizing(), &path, DRAG_POINTER));
    }
    if inputs.is_empty() {
        return Ok(());
    }

    info!(inputs = inputs.len(), "replaying pointer input");
    let events = engine
        .handle_batch(inputs)
        .context("pointer replay aborted")?;
    backend.write_events(&events)?;
    backend.present(&presentation(&engine, &palette))
}

fn install_tracing(verbose: bool) -> Result<()> {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init()
        .map_err(|error| anyhow!(error))
}

fn presentation(engine: &Engine, palette: &Palette) -> Presentation {
    let scene = Scene::new(*engine.sizing(), engine.for_each_cell(), palette);
    let title = format!(
        "ball-drop seed={:?} {size}x{size} colors={}",
        engine.seed(),
        engine.color_variants(),
        size = engine.grid_size(),
    );
    Presentation::new(title, Color::from_rgb_u8(255, 255, 255), scene)
}
