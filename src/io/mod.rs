pub mod csv;

pub use csv::{CoordinateSource, CsvTileConfig, CsvToTiles, GeometryFormat, csv_to_tile_csv};
