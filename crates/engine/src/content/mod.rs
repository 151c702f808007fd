mod loader;
mod map;

pub use loader::{discover_map_numbers, map_file_name, MapDirectoryLoader};
pub use map::{parse_map, MapError, MapErrorCode, SourceLocation};
