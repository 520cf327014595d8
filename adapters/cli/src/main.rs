#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the Wishwalk experience.

mod config;
mod simulation;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;
use wishwalk_core::WINDOW_TITLE;
use wishwalk_rendering::{Presentation, RenderingBackend, VOID_COLOR};
use wishwalk_rendering_macroquad::MacroquadBackend;
use wishwalk_world::World;

use crate::{
    config::{FileConfig, Overrides},
    simulation::Simulation,
};

/// Walk the meadow and collect a birthday wish from everyone you meet.
#[derive(Debug, Parser)]
#[command(name = "wishwalk", version, about, long_about = None)]
struct CliArgs {
    /// TOML file describing the map, spawn and NPCs.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Milliseconds the player must wait between steps.
    #[arg(long = "step-ms", value_name = "MILLISECONDS")]
    step_ms: Option<u64>,

    /// Generates a scattered map from this seed instead of the hand-authored meadow.
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Edge length of a tile in source pixels.
    #[arg(long = "tile-size", value_name = "PIXELS")]
    tile_size: Option<f32>,

    /// Integer scale applied to every tile.
    #[arg(long, value_name = "FACTOR")]
    scale: Option<f32>,

    /// Synchronises presentation with the display refresh rate.
    #[arg(long)]
    vsync: bool,

    /// Logs frame timing metrics once per second.
    #[arg(long = "show-fps")]
    show_fps: bool,
}

impl CliArgs {
    fn overrides(&self) -> Overrides {
        Overrides {
            step_ms: self.step_ms,
            seed: self.seed,
            tile_size: self.tile_size,
            scale: self.scale,
            vsync: self.vsync,
            show_fps: self.show_fps,
        }
    }
}

/// Entry point for the Wishwalk command-line interface.
fn main() -> Result<()> {
    init_tracing();
    let args = CliArgs::parse();

    let file = match args.config.as_deref() {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };
    let settings = config::resolve(file, &args.overrides())?;

    let world = World::from_setup(settings.setup.clone()).context("invalid world setup")?;
    let mut simulation = Simulation::new(world);
    let scene = simulation.initial_scene()?;
    let presentation = Presentation::new(
        WINDOW_TITLE,
        VOID_COLOR,
        settings.tile_draw_size(),
        scene,
    );

    let mut backend = MacroquadBackend::new().with_show_fps(settings.show_fps);
    if settings.vsync {
        backend = backend.with_vsync(true);
    }

    info!("starting session");
    backend.run(presentation, move |dt, input, scene| {
        simulation.advance(dt, input);
        simulation.populate_scene(scene);
    })
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}
