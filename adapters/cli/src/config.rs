//! Session configuration resolved from defaults, an optional TOML file and CLI flags.

use std::{fs, path::Path, time::Duration};

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use tracing::info;
use wishwalk_core::{ActorColor, TilePosition};
use wishwalk_rendering::{DEFAULT_SCALE, DEFAULT_TILE_SIZE};
use wishwalk_world::{MapSource, NpcDefinition, WorldSetup};

/// Ponds carved by `--seed` when the file does not configure a scattered map.
const DEFAULT_PONDS: u32 = 3;
/// Obstacle runs placed by `--seed` when the file does not configure a scattered map.
const DEFAULT_OBSTACLES: u32 = 6;

/// Fully resolved settings for one session.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Settings {
    pub(crate) setup: WorldSetup,
    pub(crate) tile_size: f32,
    pub(crate) scale: f32,
    pub(crate) vsync: bool,
    pub(crate) show_fps: bool,
}

impl Settings {
    /// Edge length of a tile on screen.
    pub(crate) fn tile_draw_size(&self) -> f32 {
        self.tile_size * self.scale
    }
}

/// Values supplied on the command line. They win over the file.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct Overrides {
    pub(crate) step_ms: Option<u64>,
    pub(crate) seed: Option<u64>,
    pub(crate) tile_size: Option<f32>,
    pub(crate) scale: Option<f32>,
    pub(crate) vsync: bool,
    pub(crate) show_fps: bool,
}

/// Contents of a TOML configuration file. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct FileConfig {
    step_duration_ms: Option<u64>,
    tile_size: Option<f32>,
    scale: Option<f32>,
    spawn: Option<TilePosition>,
    map: Option<MapConfig>,
    npcs: Option<Vec<NpcConfig>>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct MapConfig {
    kind: MapKind,
    size: Option<[u32; 2]>,
    seed: Option<u64>,
    ponds: Option<u32>,
    obstacles: Option<u32>,
    #[serde(default)]
    rows: Vec<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
enum MapKind {
    Reference,
    Scattered,
    Rows,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct NpcConfig {
    name: String,
    position: TilePosition,
    color: String,
    lines: Vec<String>,
}

impl FileConfig {
    /// Parses a TOML document.
    pub(crate) fn from_toml(source: &str) -> Result<Self> {
        toml::from_str(source).context("failed to parse configuration TOML")
    }

    /// Reads and parses the TOML file at `path`.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let source = fs::read_to_string(path)
            .with_context(|| format!("failed to read configuration file {}", path.display()))?;
        Self::from_toml(&source)
            .with_context(|| format!("invalid configuration file {}", path.display()))
    }
}

/// Layers the file and the command line over the built-in defaults.
pub(crate) fn resolve(file: FileConfig, overrides: &Overrides) -> Result<Settings> {
    let mut setup = WorldSetup::reference();

    if let Some(millis) = overrides.step_ms.or(file.step_duration_ms) {
        setup.step_duration = Duration::from_millis(millis);
    }
    if let Some(spawn) = file.spawn {
        setup.spawn = spawn;
    }
    if let Some(map) = file.map {
        apply_map(&mut setup, map)?;
    }
    if let Some(seed) = overrides.seed {
        setup.map = match setup.map {
            MapSource::Scattered {
                ponds, obstacles, ..
            } => MapSource::Scattered {
                seed,
                ponds,
                obstacles,
            },
            _ => MapSource::Scattered {
                seed,
                ponds: DEFAULT_PONDS,
                obstacles: DEFAULT_OBSTACLES,
            },
        };
    }
    if let Some(npcs) = file.npcs {
        setup.npcs = npcs
            .into_iter()
            .map(NpcConfig::into_definition)
            .collect::<Result<_>>()?;
    }

    let tile_size = positive(
        "tile size",
        overrides
            .tile_size
            .or(file.tile_size)
            .unwrap_or(DEFAULT_TILE_SIZE),
    )?;
    let scale = positive(
        "scale",
        overrides.scale.or(file.scale).unwrap_or(DEFAULT_SCALE),
    )?;

    info!(
        step_ms = setup.step_duration.as_millis() as u64,
        tile_size,
        scale,
        npcs = setup.npcs.len(),
        "configuration resolved"
    );

    Ok(Settings {
        setup,
        tile_size,
        scale,
        vsync: overrides.vsync,
        show_fps: overrides.show_fps,
    })
}

fn apply_map(setup: &mut WorldSetup, map: MapConfig) -> Result<()> {
    if let Some([columns, rows]) = map.size {
        setup.columns = columns;
        setup.rows = rows;
    }
    setup.map = match map.kind {
        MapKind::Reference => MapSource::Reference,
        MapKind::Scattered => MapSource::Scattered {
            seed: map.seed.unwrap_or_default(),
            ponds: map.ponds.unwrap_or(DEFAULT_PONDS),
            obstacles: map.obstacles.unwrap_or(DEFAULT_OBSTACLES),
        },
        MapKind::Rows => {
            if map.rows.is_empty() {
                bail!("map kind `rows` requires a non-empty `rows` list");
            }
            MapSource::Rows(map.rows)
        }
    };
    Ok(())
}

impl NpcConfig {
    fn into_definition(self) -> Result<NpcDefinition> {
        let Some(color) = ActorColor::from_hex(&self.color) else {
            bail!(
                "NPC `{}` has colour `{}`, expected #rrggbb",
                self.name,
                self.color
            );
        };
        Ok(NpcDefinition::new(self.name, self.position, color, self.lines))
    }
}

fn positive(name: &str, value: f32) -> Result<f32> {
    if !value.is_finite() || value <= 0.0 {
        bail!("{name} must be a positive number (received {value})");
    }
    Ok(value)
}
