use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::sim::{Level, LevelLoader, LevelSource, LoaderError, SimulationConfig};

use super::map::parse_map;

pub fn map_file_name(number: u32) -> String {
    format!("map{number}.txt")
}

/// Numbers of every `mapN.txt` directly inside `maps_dir`, sorted.
pub fn discover_map_numbers(maps_dir: &Path) -> Result<Vec<u32>, LoaderError> {
    let entries = fs::read_dir(maps_dir).map_err(|source| LoaderError::Read {
        path: maps_dir.to_path_buf(),
        source,
    })?;

    let mut numbers = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| LoaderError::Read {
            path: maps_dir.to_path_buf(),
            source,
        })?;
        let file_name = entry.file_name();
        let Some(name) = file_name.to_str() else {
            continue;
        };
        let number = name
            .strip_prefix("map")
            .and_then(|rest| rest.strip_suffix(".txt"))
            .and_then(|digits| digits.parse::<u32>().ok());
        if let Some(number) = number.filter(|number| *number > 0) {
            numbers.push(number);
        }
    }
    numbers.sort_unstable();
    Ok(numbers)
}

/// Loads numbered maps from a directory, starting from `map1.txt`.
///
/// Advancing past the last consecutive map wraps back to `map1.txt`.
#[derive(Debug, Clone)]
pub struct MapDirectoryLoader {
    maps_dir: PathBuf,
    current_map: u32,
    config: SimulationConfig,
}

impl MapDirectoryLoader {
    pub fn new(maps_dir: impl Into<PathBuf>, config: SimulationConfig) -> Self {
        Self {
            maps_dir: maps_dir.into(),
            current_map: 0,
            config,
        }
    }

    pub fn maps_dir(&self) -> &Path {
        &self.maps_dir
    }

    /// Number of the map most recently loaded from the sequence, `0` before
    /// the first load.
    pub fn current_map(&self) -> u32 {
        self.current_map
    }

    fn map_path(&self, number: u32) -> PathBuf {
        self.maps_dir.join(map_file_name(number))
    }

    fn load_file(&self, path: &Path) -> Result<Level, LoaderError> {
        let raw = fs::read_to_string(path).map_err(|source| LoaderError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let name = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("level");
        let level = parse_map(name, path, &raw, &self.config)?;
        info!(
            map = %path.display(),
            width = level.grid().width(),
            height = level.grid().height(),
            sprites = level.sprites().len(),
            "level_loaded"
        );
        Ok(level)
    }
}

impl LevelLoader for MapDirectoryLoader {
    fn reload_current_level(&mut self) -> Result<Level, LoaderError> {
        if self.current_map == 0 {
            return self.load_next_level();
        }
        self.load_file(&self.map_path(self.current_map))
    }

    fn load_next_level(&mut self) -> Result<Level, LoaderError> {
        loop {
            self.current_map += 1;
            let path = self.map_path(self.current_map);
            match self.load_file(&path) {
                Err(LoaderError::Read { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
                    if self.current_map == 1 {
                        self.current_map = 0;
                        return Err(LoaderError::NoLevelAvailable {
                            location: self.maps_dir.display().to_string(),
                        });
                    }
                    info!(missing = %path.display(), "map_sequence_wrapped");
                    self.current_map = 0;
                }
                other => return other,
            }
        }
    }

    fn load_level_from_source(&mut self, source: &LevelSource) -> Result<Level, LoaderError> {
        self.load_file(source.path())
    }
}
