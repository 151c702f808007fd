use std::env;
use std::path::PathBuf;

use thiserror::Error;
use tilerun_engine::{resolve_app_paths, LevelSource, LoopConfig, SimulationConfig, StartupError};
use tracing::info;
use tracing_subscriber::EnvFilter;

use super::config::{load_config, ConfigError, CONFIG_ENV_VAR};
use super::script::{read_script, ScriptError, ScriptedFrames};

/// Frames simulated when no input script is given.
const DEFAULT_IDLE_FRAMES: u64 = 600;

pub(crate) const USAGE: &str = "\
usage: tilerun [--maps-dir DIR] [--map FILE] [--script FILE] [--frames N] [--config FILE]

  --maps-dir DIR   directory holding map1.txt, map2.txt, ... (default: <root>/maps)
  --map FILE       start from this map file; deaths reload it
  --script FILE    input script to replay (default: idle frames)
  --frames N       stop after N frames
  --config FILE    JSON config (default: $TILERUN_CONFIG)";

#[derive(Debug, Error)]
pub(crate) enum BootstrapError {
    #[error("{0}")]
    Usage(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Startup(#[from] StartupError),
    #[error(transparent)]
    Script(#[from] ScriptError),
}

#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct CliOptions {
    pub(crate) maps_dir: Option<PathBuf>,
    pub(crate) map: Option<PathBuf>,
    pub(crate) script: Option<PathBuf>,
    pub(crate) frames: Option<u64>,
    pub(crate) config: Option<PathBuf>,
    pub(crate) help: bool,
}

pub(crate) fn parse_cli_args(args: &[String]) -> Result<CliOptions, BootstrapError> {
    let mut options = CliOptions::default();
    let mut index = 0usize;
    while index < args.len() {
        let flag = args[index].as_str();
        if flag == "-h" || flag == "--help" {
            options.help = true;
            index += 1;
            continue;
        }
        let value = args
            .get(index + 1)
            .ok_or_else(|| BootstrapError::Usage(format!("missing value for {flag}")))?;
        match flag {
            "--maps-dir" => options.maps_dir = Some(PathBuf::from(value)),
            "--map" => options.map = Some(PathBuf::from(value)),
            "--script" => options.script = Some(PathBuf::from(value)),
            "--config" => options.config = Some(PathBuf::from(value)),
            "--frames" => {
                let frames = value.parse::<u64>().map_err(|_| {
                    BootstrapError::Usage(format!(
                        "invalid --frames value '{value}' (expected u64)"
                    ))
                })?;
                options.frames = Some(frames);
            }
            other => return Err(BootstrapError::Usage(format!("unknown argument '{other}'"))),
        }
        index += 2;
    }
    Ok(options)
}

pub(crate) struct AppWiring {
    pub(crate) loop_config: LoopConfig,
    pub(crate) simulation: SimulationConfig,
    pub(crate) maps_dir: PathBuf,
    pub(crate) source: Option<LevelSource>,
    pub(crate) frames: ScriptedFrames,
}

pub(crate) fn build_app(options: CliOptions) -> Result<AppWiring, BootstrapError> {
    init_tracing();
    info!("=== tilerun startup ===");

    let config_path = options
        .config
        .clone()
        .or_else(|| env::var_os(CONFIG_ENV_VAR).map(PathBuf::from));
    let config = load_config(config_path.as_deref())?;

    let maps_dir = match options.maps_dir {
        Some(dir) => dir,
        None => resolve_app_paths()?.maps_dir,
    };

    let mut loop_config = config.frame_loop.to_loop_config();
    if options.frames.is_some() {
        loop_config.max_frames = options.frames;
    }

    let frames = match &options.script {
        Some(path) => ScriptedFrames::new(read_script(path)?, loop_config.default_frame_delta),
        None => ScriptedFrames::idle(
            loop_config.max_frames.unwrap_or(DEFAULT_IDLE_FRAMES),
            loop_config.default_frame_delta,
        ),
    };

    info!(
        maps_dir = %maps_dir.display(),
        map = ?options.map,
        script = ?options.script,
        config = ?config_path,
        "app_wiring"
    );

    Ok(AppWiring {
        loop_config,
        simulation: config.simulation,
        maps_dir,
        source: options.map.map(LevelSource::new),
        frames,
    })
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}
